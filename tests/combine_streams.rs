//! Elementwise combination across matched and mismatched shapes.

use ndstream::combine;
use ndstream::Stream;

fn stream_1d(values: &[f64]) -> Stream {
    let mut s = Stream::new();
    s.add_dim(values.len()).unwrap();
    s.input_mut().copy_from_slice(values);
    s
}

#[test]
fn mul_updates_exactly_min_len_pairs() {
    let mut a = stream_1d(&[1.0, 2.0, 3.0, 4.0]);
    let mut b = stream_1d(&[2.0, 2.0, 2.0, 2.0, 2.0, 2.0]);
    // Sentinels in the tail of the longer output must survive.
    b.output_mut()[4] = 99.0;
    b.output_mut()[5] = 99.0;

    let written = combine::mul(&mut a, &mut b);

    assert_eq!(written, 4);
    assert_eq!(a.output(), &[2.0, 4.0, 6.0, 8.0]);
    assert_eq!(b.output(), &[2.0, 4.0, 6.0, 8.0, 99.0, 99.0]);
}

#[test]
fn sum_writes_same_scalar_to_both_sides() {
    let mut a = stream_1d(&[1.0, 2.0, 3.0]);
    let mut b = stream_1d(&[0.5, 0.5, 0.5]);
    combine::sum(&mut a, &mut b);
    assert_eq!(a.output(), b.output());
    assert_eq!(a.output(), &[1.5, 2.5, 3.5]);
}

#[test]
fn combine_with_empty_stream_is_noop() {
    let mut a = Stream::new();
    let mut b = stream_1d(&[1.0, 2.0, 3.0]);
    assert_eq!(combine::mul(&mut a, &mut b), 0);
    assert_eq!(combine::sum(&mut a, &mut b), 0);
    assert!(b.output().iter().all(|&x| x == 0.0));
    assert_eq!(a.output(), &[0.0]);
}

#[test]
fn mul_2d_same_shape_covers_everything() {
    let mut a = Stream::new();
    a.add_dim(2).unwrap();
    a.add_dim(2).unwrap();
    a.input_mut().copy_from_slice(&[1.0, 2.0, 3.0, 4.0]);
    let mut b = a.duplicate();
    b.input_mut().copy_from_slice(&[10.0, 10.0, 10.0, 10.0]);

    assert_eq!(combine::mul(&mut a, &mut b), 4);
    assert_eq!(a.output(), &[10.0, 20.0, 30.0, 40.0]);
    assert_eq!(b.output(), a.output());
}

#[test]
fn mul_2d_mismatched_extents_walks_common_subvolume() {
    // 3x2 against 2x3: common sub-volume is 2x2.
    let mut a = Stream::new();
    a.add_dim(3).unwrap();
    a.add_dim(2).unwrap();
    a.input_mut()
        .copy_from_slice(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    let mut b = Stream::new();
    b.add_dim(2).unwrap();
    b.add_dim(3).unwrap();
    b.input_mut()
        .copy_from_slice(&[1.0, 1.0, 1.0, 1.0, 1.0, 1.0]);

    let written = combine::mul(&mut a, &mut b);
    assert_eq!(written, 4);

    // a's hits: coords (0,0) (1,0) (0,1) (1,1) -> linear 0, 1, 3, 4
    assert_eq!(a.output(), &[1.0, 2.0, 0.0, 4.0, 5.0, 0.0]);
    // b's hits with strides [1, 2]: linear 0, 1, 2, 3
    assert_eq!(b.output(), &[1.0, 2.0, 4.0, 5.0, 0.0, 0.0]);
}

#[test]
fn sum_and_mul_share_the_same_walk() {
    // Same shapes must touch the same positions for both operators.
    let mut a1 = stream_1d(&[1.0; 5]);
    let mut b1 = stream_1d(&[1.0; 3]);
    let mut a2 = stream_1d(&[1.0; 5]);
    let mut b2 = stream_1d(&[1.0; 3]);
    assert_eq!(
        combine::mul(&mut a1, &mut b1),
        combine::sum(&mut a2, &mut b2)
    );
    let touched_mul: Vec<bool> = a1.output().iter().map(|&x| x != 0.0).collect();
    let touched_sum: Vec<bool> = a2.output().iter().map(|&x| x != 0.0).collect();
    assert_eq!(touched_mul, touched_sum);
}
