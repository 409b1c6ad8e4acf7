//! Parent/child composition of streams into pipelines.
//!
//! A pipeline is a tree of streams the *owner* holds as `Rc` handles. The
//! links recorded here are weak in both directions, so no stream ever owns
//! another and dropping a handle is always safe: a dead child simply
//! disappears from traversal.

use crate::error::Result;
use crate::invariant_ppt::{assert_invariant, CHILD_LINK_SYMMETRY};
use crate::stream::Stream;
use std::cell::RefCell;
use std::rc::{Rc, Weak};

/// Shared-ownership handle to a stream, held by the pipeline owner.
pub type StreamHandle = Rc<RefCell<Stream>>;

/// Wrap a stream into a pipeline handle.
pub fn handle(stream: Stream) -> StreamHandle {
    Rc::new(RefCell::new(stream))
}

/// Record `child` as a member of `parent`'s pipeline.
///
/// Sets the child's back-reference and appends a weak link to the parent's
/// membership list. Ownership stays with whoever holds the `Rc` handles.
pub fn add_child(parent: &StreamHandle, child: &StreamHandle) {
    child.borrow_mut().parent = Some(Rc::downgrade(parent));
    parent.borrow_mut().children.push(Rc::downgrade(child));
    assert_invariant(
        CHILD_LINK_SYMMETRY,
        child
            .borrow()
            .parent
            .as_ref()
            .and_then(Weak::upgrade)
            .map(|p| Rc::ptr_eq(&p, parent))
            .unwrap_or(false),
        "child back-reference points at the recording parent",
        Some("add_child"),
    );
}

/// The still-live children of a stream, in insertion order.
pub fn children(stream: &StreamHandle) -> Vec<StreamHandle> {
    stream
        .borrow()
        .children
        .iter()
        .filter_map(Weak::upgrade)
        .collect()
}

/// The parent of a stream, if recorded and still alive.
pub fn parent(stream: &StreamHandle) -> Option<StreamHandle> {
    stream.borrow().parent.as_ref().and_then(Weak::upgrade)
}

/// Execute a pipeline depth-first: the stream's own stage, then every
/// still-live child in insertion order.
///
/// After each stage runs, the stream's buffers are swapped so the produced
/// output is readable on the input side by whatever consumes it next.
/// Streams with no bound stage are traversed but not executed. Returns the
/// number of stages executed.
pub fn run_chain(root: &StreamHandle) -> Result<usize> {
    let mut ran = 0;
    {
        let mut stream = root.borrow_mut();
        if stream.has_stage() {
            stream.exec()?;
            stream.swap_buffers();
            ran += 1;
        }
    }
    for child in children(root) {
        ran += run_chain(&child)?;
    }
    Ok(ran)
}
