//! Trait-based processing stages bound to streams.
//!
//! A [`Stage`] is the typed replacement for an opaque callback-plus-argument
//! pair: the engine passes the stream and, for dimension-separable work, the
//! current dimension index directly. Closures with the right signature
//! implement `Stage` automatically.

use crate::error::{Result, StreamError};
use crate::invariant_ppt::{assert_invariant, EXEC_PER_DIM_ORDER};
use crate::stream::Stream;
use log::trace;

/// One processing step of a pipeline stage.
///
/// `dim` is `None` for a whole-stream invocation and `Some(d)` when the
/// engine drives the stage once per dimension. The engine imposes no
/// structure on what `process` does to the stream's buffers.
pub trait Stage {
    /// Process the stream, optionally along one dimension.
    fn process(&mut self, stream: &mut Stream, dim: Option<usize>) -> Result<()>;
}

impl<F> Stage for F
where
    F: FnMut(&mut Stream, Option<usize>) -> Result<()>,
{
    fn process(&mut self, stream: &mut Stream, dim: Option<usize>) -> Result<()> {
        self(stream, dim)
    }
}

impl Stream {
    /// Bind a processing stage to this stream, replacing any previous one.
    pub fn set_stage<S: Stage + 'static>(&mut self, stage: S) {
        self.stage = Some(Box::new(stage));
    }

    /// Unbind the current stage, returning it if one was bound.
    pub fn clear_stage(&mut self) -> Option<Box<dyn Stage>> {
        self.stage.take()
    }

    /// Whether a stage is currently bound.
    pub fn has_stage(&self) -> bool {
        self.stage.is_some()
    }

    /// Invoke the bound stage once for the whole stream.
    ///
    /// Fails with [`StreamError::NoStage`] if nothing is bound.
    pub fn exec(&mut self) -> Result<()> {
        // Take the stage out so it can borrow the stream mutably.
        let mut stage = self.stage.take().ok_or(StreamError::NoStage)?;
        let result = stage.process(self, None);
        self.stage = Some(stage);
        result
    }

    /// Invoke the bound stage once per dimension, in order 0, 1, ...
    ///
    /// Returns the number of invocations. A stream with zero dimensions is
    /// the defined no-op: `Ok(0)`, without touching the stage.
    pub fn exec_per_dim(&mut self) -> Result<usize> {
        if self.dims() == 0 {
            trace!("exec_per_dim on empty stream: nothing to execute");
            return Ok(0);
        }
        let mut stage = self.stage.take().ok_or(StreamError::NoStage)?;
        let mut ran = 0;
        for dim in 0..self.dims() {
            if let Err(e) = stage.process(self, Some(dim)) {
                self.stage = Some(stage);
                return Err(e);
            }
            ran += 1;
        }
        self.stage = Some(stage);
        assert_invariant(
            EXEC_PER_DIM_ORDER,
            ran == self.dims(),
            "stage invoked exactly once per dimension",
            Some("exec_per_dim"),
        );
        Ok(ran)
    }
}
