//! The `Stream` container: an N-dimensional numeric buffer for DSP pipelines.
//!
//! A stream starts as a scalar (zero dimensions, one element) and is grown by
//! repeated [`Stream::add_dim`] calls, the single shape mutator. Shape,
//! cursor position and region of interest live in one per-axis record, so
//! they cannot fall out of lockstep. The two staging buffers, `input` and
//! `output`, are always allocated and always hold exactly `len` elements.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use crate::error::{Result, StreamError};
use crate::invariant_ppt::{
    assert_invariant, BUFFER_BIND_CHECKED, BUFFER_LIVENESS, COORD_ROUNDTRIP,
    DUPLICATE_INDEPENDENT, SHAPE_LOCKSTEP, SHAPE_REJECTS_INVALID,
};
use crate::roi::Region;
use crate::stage::Stage;
use chrono::{DateTime, Utc};
use log::trace;
use std::cell::RefCell;
use std::fmt;
use std::rc::Weak;

/// One axis of a stream's shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Axis {
    /// Extent of this axis (always at least 1).
    pub size: usize,
    /// Current coordinate along this axis, maintained by `decompose`.
    pub pos: usize,
    /// Region of interest along this axis, used by `crop`.
    pub roi: Region,
}

/// An N-dimensional numeric buffer with shape, dual staging buffers,
/// optional parent/child links and a pluggable processing stage.
pub struct Stream {
    pub(crate) axes: Vec<Axis>,
    len: usize,
    input: Vec<f64>,
    output: Vec<f64>,
    index: usize,
    /// Observer position; opaque payload, not interpreted by the engine.
    pub location: [f64; 3],
    /// Pointing direction; opaque payload.
    pub target: [f64; 3],
    /// Wavelength metadata; opaque payload.
    pub lambda: f64,
    /// Sampling rate metadata; opaque payload.
    pub samplerate: f64,
    /// Capture start timestamp; opaque payload.
    pub start_time: DateTime<Utc>,
    pub(crate) children: Vec<Weak<RefCell<Stream>>>,
    pub(crate) parent: Option<Weak<RefCell<Stream>>>,
    pub(crate) stage: Option<Box<dyn Stage>>,
}

impl Stream {
    /// Create an empty stream: zero dimensions, one element in each buffer.
    pub fn new() -> Self {
        Self {
            axes: Vec::new(),
            len: 1,
            input: vec![0.0],
            output: vec![0.0],
            index: 0,
            location: [0.0; 3],
            target: [0.0; 3],
            lambda: 0.0,
            samplerate: 0.0,
            start_time: DateTime::UNIX_EPOCH,
            children: Vec::new(),
            parent: None,
            stage: None,
        }
    }

    // ------------------------------------------------------------------
    // Shape
    // ------------------------------------------------------------------

    /// The number of dimensions.
    #[inline]
    pub fn dims(&self) -> usize {
        self.axes.len()
    }

    /// The total element count (product of all extents; 1 when empty).
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the stream is still a scalar container (no dimensions).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.axes.is_empty()
    }

    /// The per-axis records.
    #[inline]
    pub fn axes(&self) -> &[Axis] {
        &self.axes
    }

    /// The extent of one axis.
    pub fn size(&self, axis: usize) -> Result<usize> {
        self.axes
            .get(axis)
            .map(|a| a.size)
            .ok_or(StreamError::AxisOutOfBounds {
                axis,
                dims: self.dims(),
            })
    }

    /// All extents, outermost last.
    pub fn sizes(&self) -> Vec<usize> {
        self.axes.iter().map(|a| a.size).collect()
    }

    /// Append a dimension of the given extent.
    ///
    /// Multiplies `len` by `size` and grows both buffers to the new length,
    /// zero-filling the added capacity. A zero extent is rejected.
    pub fn add_dim(&mut self, size: usize) -> Result<()> {
        if size == 0 {
            assert_invariant(
                SHAPE_REJECTS_INVALID,
                true,
                "zero extent rejected",
                Some("add_dim"),
            );
            return Err(StreamError::InvalidShape { size });
        }
        self.push_axis(size);
        trace!("add_dim({}): dims={} len={}", size, self.dims(), self.len);
        Ok(())
    }

    /// Append a pre-validated axis. The sole place shape and buffers change.
    fn push_axis(&mut self, size: usize) {
        self.axes.push(Axis {
            size,
            pos: 0,
            roi: Region::full(size),
        });
        self.len *= size;
        self.input.resize(self.len, 0.0);
        self.output.resize(self.len, 0.0);
        assert_invariant(
            SHAPE_LOCKSTEP,
            self.len == self.axes.iter().map(|a| a.size).product::<usize>(),
            "len equals the product of all extents",
            Some("push_axis"),
        );
        assert_invariant(
            BUFFER_LIVENESS,
            self.input.len() == self.len && self.output.len() == self.len,
            "both buffers sized exactly len",
            Some("push_axis"),
        );
    }

    // ------------------------------------------------------------------
    // Buffers
    // ------------------------------------------------------------------

    /// The input staging buffer.
    #[inline]
    pub fn input(&self) -> &[f64] {
        &self.input
    }

    /// The input staging buffer, mutably.
    #[inline]
    pub fn input_mut(&mut self) -> &mut [f64] {
        &mut self.input
    }

    /// The output staging buffer.
    #[inline]
    pub fn output(&self) -> &[f64] {
        &self.output
    }

    /// The output staging buffer, mutably.
    #[inline]
    pub fn output_mut(&mut self) -> &mut [f64] {
        &mut self.output
    }

    /// Borrow the input for reading and the output for writing at once —
    /// the access pattern of a typical processing stage.
    #[inline]
    pub fn io(&mut self) -> (&[f64], &mut [f64]) {
        (&self.input, &mut self.output)
    }

    /// Bind an externally produced buffer as the input without copying.
    ///
    /// The stream takes ownership and returns the previously bound buffer.
    /// The buffer length must equal the current `len`; the shape stays the
    /// single source of truth for the element count.
    pub fn set_input_buffer(&mut self, buffer: Vec<f64>) -> Result<Vec<f64>> {
        if buffer.len() != self.len {
            return Err(StreamError::BufferMismatch {
                expected: self.len,
                got: buffer.len(),
            });
        }
        assert_invariant(
            BUFFER_BIND_CHECKED,
            true,
            "bound buffer length matches shape",
            Some("set_input_buffer"),
        );
        Ok(std::mem::replace(&mut self.input, buffer))
    }

    /// Bind an externally produced buffer as the output without copying.
    ///
    /// Same contract as [`Stream::set_input_buffer`].
    pub fn set_output_buffer(&mut self, buffer: Vec<f64>) -> Result<Vec<f64>> {
        if buffer.len() != self.len {
            return Err(StreamError::BufferMismatch {
                expected: self.len,
                got: buffer.len(),
            });
        }
        assert_invariant(
            BUFFER_BIND_CHECKED,
            true,
            "bound buffer length matches shape",
            Some("set_output_buffer"),
        );
        Ok(std::mem::replace(&mut self.output, buffer))
    }

    /// Hand the input buffer back to the caller, leaving a zeroed
    /// replacement of the same length so the stream stays well-formed.
    pub fn take_input_buffer(&mut self) -> Vec<f64> {
        std::mem::replace(&mut self.input, vec![0.0; self.len])
    }

    /// Hand the output buffer back to the caller, leaving a zeroed
    /// replacement of the same length.
    pub fn take_output_buffer(&mut self) -> Vec<f64> {
        std::mem::replace(&mut self.output, vec![0.0; self.len])
    }

    /// Exchange the input and output buffers without copying data.
    ///
    /// Chains stages at zero cost: one stage's output becomes the next
    /// stage's input. Swapping twice restores the original binding.
    pub fn swap_buffers(&mut self) {
        std::mem::swap(&mut self.input, &mut self.output);
    }

    // ------------------------------------------------------------------
    // Coordinate conversion
    // ------------------------------------------------------------------

    /// The current linear offset.
    ///
    /// Consistent with the per-axis positions only after an explicit
    /// [`Stream::decompose`] or [`Stream::compose`] call.
    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Set the linear offset. Must be inside `[0, len)`.
    pub fn set_index(&mut self, index: usize) -> Result<()> {
        if index >= self.len {
            return Err(StreamError::IndexOutOfBounds {
                index,
                len: self.len,
            });
        }
        self.index = index;
        Ok(())
    }

    /// The current multi-dimensional coordinate, dimension 0 first.
    pub fn pos(&self) -> Vec<usize> {
        self.axes.iter().map(|a| a.pos).collect()
    }

    /// Set the coordinate along one axis. Must be inside the axis extent.
    pub fn set_pos(&mut self, axis: usize, pos: usize) -> Result<()> {
        let dims = self.dims();
        let ax = self
            .axes
            .get_mut(axis)
            .ok_or(StreamError::AxisOutOfBounds { axis, dims })?;
        if pos >= ax.size {
            return Err(StreamError::IndexOutOfBounds {
                index: pos,
                len: ax.size,
            });
        }
        ax.pos = pos;
        Ok(())
    }

    /// Recover the multi-dimensional coordinate from the linear index.
    ///
    /// `pos[d] = (index / stride(d)) % size[d]` with dimension 0
    /// fastest-varying (stride 1). Does not mutate the index.
    pub fn decompose(&mut self) {
        let index = self.index;
        let mut stride = 1;
        for ax in &mut self.axes {
            ax.pos = (index / stride) % ax.size;
            stride *= ax.size;
        }
    }

    /// Recompute the linear index from the per-axis coordinate.
    ///
    /// Inverse of [`Stream::decompose`]; same stride convention.
    pub fn compose(&mut self) {
        let mut index = 0;
        let mut stride = 1;
        for ax in &self.axes {
            index += ax.pos * stride;
            stride *= ax.size;
        }
        assert_invariant(
            COORD_ROUNDTRIP,
            index < self.len,
            "composed index stays inside the buffer",
            Some("compose"),
        );
        self.index = index;
    }

    /// Per-axis strides under the dimension-0-fastest convention.
    pub(crate) fn strides(&self) -> Vec<usize> {
        let mut strides = Vec::with_capacity(self.axes.len());
        let mut stride = 1;
        for ax in &self.axes {
            strides.push(stride);
            stride *= ax.size;
        }
        strides
    }

    // ------------------------------------------------------------------
    // Duplication
    // ------------------------------------------------------------------

    /// Shape-and-data clone with independent storage.
    ///
    /// Replays every dimension append (preserving each axis ROI), copies the
    /// scalar metadata and both buffers verbatim. Children, parent and the
    /// bound stage are not copied; the cursor starts fresh at zero.
    pub fn duplicate(&self) -> Stream {
        let mut dest = Stream::new();
        for ax in &self.axes {
            dest.push_axis(ax.size);
            if let Some(last) = dest.axes.last_mut() {
                last.roi = ax.roi;
            }
        }
        dest.lambda = self.lambda;
        dest.samplerate = self.samplerate;
        dest.start_time = self.start_time;
        dest.location = self.location;
        dest.target = self.target;
        dest.input.copy_from_slice(&self.input);
        dest.output.copy_from_slice(&self.output);
        assert_invariant(
            DUPLICATE_INDEPENDENT,
            dest.len == self.len,
            "duplicate carries the source's full element count",
            Some("duplicate"),
        );
        dest
    }
}

impl Default for Stream {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Stream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Stream")
            .field("dims", &self.dims())
            .field("len", &self.len)
            .field("sizes", &self.sizes())
            .field("index", &self.index)
            .field("stage", &self.stage.is_some())
            .field("children", &self.children.len())
            .finish()
    }
}
