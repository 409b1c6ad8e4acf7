//! Contract tests: drive the full operator surface and verify that the
//! required PPT invariants were enforced along the way.
//!
//! One test body: the invariant log is process-global, so phases share a
//! single clear instead of racing against each other.

use ndstream::combine;
use ndstream::invariant_ppt::{
    clear_invariant_log, contract_test, BUFFER_BIND_CHECKED, BUFFER_LIVENESS,
    CHILD_LINK_SYMMETRY, COMBINE_BOUNDED, CROP_IN_BOUNDS, EXEC_PER_DIM_ORDER, ROI_LEGALITY,
    SHAPE_LOCKSTEP, SHAPE_REJECTS_INVALID,
};
use ndstream::pipeline::{add_child, handle};
use ndstream::{Region, Stream};

#[test]
fn contract_full_operator_surface() {
    clear_invariant_log();

    // Shape growth, including an invalid append the engine must reject.
    let mut a = Stream::new();
    a.add_dim(4).unwrap();
    a.add_dim(4).unwrap();
    assert!(a.add_dim(0).is_err());
    contract_test(
        "shape_growth",
        &[SHAPE_LOCKSTEP, BUFFER_LIVENESS, SHAPE_REJECTS_INVALID],
    );

    // External buffer bind.
    a.set_input_buffer((0..16).map(f64::from).collect()).unwrap();

    // Per-dimension execution.
    a.set_stage(|_: &mut Stream, _: Option<usize>| Ok(()));
    assert_eq!(a.exec_per_dim().unwrap(), 2);

    // Combine.
    let mut b = a.duplicate();
    combine::mul(&mut a, &mut b);

    // ROI crop.
    a.set_roi(0, Region { start: 1, len: 2 }).unwrap();
    a.set_roi(1, Region { start: 1, len: 2 }).unwrap();
    let cropped = a.crop().unwrap();
    assert_eq!(cropped.len(), 4);

    // Tree composition.
    let pa = handle(a);
    let pb = handle(b);
    add_child(&pa, &pb);

    contract_test(
        "full_surface",
        &[
            SHAPE_LOCKSTEP,
            BUFFER_LIVENESS,
            BUFFER_BIND_CHECKED,
            EXEC_PER_DIM_ORDER,
            COMBINE_BOUNDED,
            ROI_LEGALITY,
            CROP_IN_BOUNDS,
            CHILD_LINK_SYMMETRY,
        ],
    );
}
