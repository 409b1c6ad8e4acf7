//! N-dimensional numeric stream engine for DSP pipelines.
//!
//! A [`Stream`] is a dynamically shaped numeric buffer with dual input/output
//! staging areas, a region of interest per axis, and an optional processing
//! [`Stage`]. Streams compose into pipelines through non-owning parent/child
//! links ([`pipeline`]), combine elementwise ([`combine`]) and crop to their
//! ROI sub-volume ([`roi`]).

pub mod combine;
pub mod error;
#[doc(hidden)]
pub mod invariant_ppt;
pub mod pipeline;
pub mod roi;
pub mod stage;
pub mod stream;

pub use error::{Result, StreamError};
pub use roi::Region;
pub use stage::Stage;
pub use stream::{Axis, Stream};
