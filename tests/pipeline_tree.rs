//! Pipeline composition: non-owning parent/child trees and chained runs.

use ndstream::pipeline::{add_child, children, handle, parent, run_chain};
use ndstream::Stream;
use std::rc::Rc;

#[test]
fn tree_membership_is_recorded_in_insertion_order() {
    let root = handle(Stream::new());
    let a = handle(Stream::new());
    let b = handle(Stream::new());
    a.borrow_mut().lambda = 1.0;
    b.borrow_mut().lambda = 2.0;

    add_child(&root, &a);
    add_child(&root, &b);

    let kids = children(&root);
    assert_eq!(kids.len(), 2);
    assert_eq!(kids[0].borrow().lambda, 1.0);
    assert_eq!(kids[1].borrow().lambda, 2.0);
    assert!(Rc::ptr_eq(&parent(&a).unwrap(), &root));
    assert!(Rc::ptr_eq(&parent(&b).unwrap(), &root));
}

#[test]
fn children_can_outlive_nothing_they_are_not_owned() {
    let root = handle(Stream::new());
    {
        let transient = handle(Stream::new());
        add_child(&root, &transient);
        assert_eq!(children(&root).len(), 1);
        // transient dropped here; the pipeline owner released its handle
    }
    assert!(children(&root).is_empty());
}

#[test]
fn dropping_parent_leaves_child_rootless() {
    let child = handle(Stream::new());
    {
        let root = handle(Stream::new());
        add_child(&root, &child);
        assert!(parent(&child).is_some());
    }
    assert!(parent(&child).is_none());
}

#[test]
fn run_chain_executes_parent_then_children() {
    let root = handle(Stream::new());
    let child = handle(Stream::new());

    {
        let mut s = root.borrow_mut();
        s.add_dim(4).unwrap();
        s.input_mut().copy_from_slice(&[1.0, 2.0, 3.0, 4.0]);
        s.set_stage(|stream: &mut Stream, _: Option<usize>| {
            let (input, output) = stream.io();
            for (o, &i) in output.iter_mut().zip(input) {
                *o = i + 1.0;
            }
            Ok(())
        });
    }
    {
        let mut s = child.borrow_mut();
        s.add_dim(2).unwrap();
        s.input_mut().copy_from_slice(&[10.0, 20.0]);
        s.set_stage(|stream: &mut Stream, _: Option<usize>| {
            let (input, output) = stream.io();
            for (o, &i) in output.iter_mut().zip(input) {
                *o = i * 2.0;
            }
            Ok(())
        });
    }
    add_child(&root, &child);

    let ran = run_chain(&root).unwrap();
    assert_eq!(ran, 2);
    // each stream's result was published to its input side by the swap
    assert_eq!(root.borrow().input(), &[2.0, 3.0, 4.0, 5.0]);
    assert_eq!(child.borrow().input(), &[20.0, 40.0]);
}

#[test]
fn run_chain_traverses_grandchildren() {
    let root = handle(Stream::new());
    let mid = handle(Stream::new());
    let leaf = handle(Stream::new());
    add_child(&root, &mid);
    add_child(&mid, &leaf);

    {
        let mut s = leaf.borrow_mut();
        s.add_dim(1).unwrap();
        s.input_mut()[0] = 3.0;
        s.set_stage(|stream: &mut Stream, _: Option<usize>| {
            let v = stream.input()[0];
            stream.output_mut()[0] = v * v;
            Ok(())
        });
    }

    // root and mid have no stage bound and are skipped, not failed
    assert_eq!(run_chain(&root).unwrap(), 1);
    assert_eq!(leaf.borrow().input()[0], 9.0);
}
