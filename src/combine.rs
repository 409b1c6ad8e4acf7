//! Dual-sided elementwise combination of two streams.
//!
//! `mul` and `sum` walk the common sub-volume of two streams — the leading
//! `min(a.dims, b.dims)` dimensions, clipped to `min(a.size, b.size)` on each
//! — and write every combined scalar into *both* streams' output buffers at
//! their respective positions. Elements outside the common sub-volume are
//! left untouched; callers must not assume the whole output was refreshed.
//!
//! Each side maps sub-volume coordinates through its own strides, using the
//! same dimension-0-fastest convention as `decompose`/`compose`.

use crate::invariant_ppt::{assert_invariant, COMBINE_BOUNDED};
use crate::stream::Stream;
use log::trace;

/// Elementwise product over the common sub-volume.
///
/// Returns the number of element pairs written. Zero common dimensions is
/// the defined no-op and returns 0.
pub fn mul(a: &mut Stream, b: &mut Stream) -> usize {
    combine_with(a, b, |x, y| x * y)
}

/// Elementwise sum over the common sub-volume.
///
/// Same walk and return contract as [`mul`].
pub fn sum(a: &mut Stream, b: &mut Stream) -> usize {
    combine_with(a, b, |x, y| x + y)
}

fn combine_with(a: &mut Stream, b: &mut Stream, f: impl Fn(f64, f64) -> f64) -> usize {
    let dims = a.dims().min(b.dims());
    if dims == 0 {
        return 0;
    }
    let extents: Vec<usize> = a
        .axes()
        .iter()
        .zip(b.axes())
        .take(dims)
        .map(|(ax, bx)| ax.size.min(bx.size))
        .collect();
    let strides_a = a.strides();
    let strides_b = b.strides();
    let total: usize = extents.iter().product();

    let mut coord = vec![0usize; dims];
    for _ in 0..total {
        let ia: usize = coord.iter().zip(&strides_a).map(|(c, s)| c * s).sum();
        let ib: usize = coord.iter().zip(&strides_b).map(|(c, s)| c * s).sum();
        let v = f(a.input()[ia], b.input()[ib]);
        a.output_mut()[ia] = v;
        b.output_mut()[ib] = v;
        // Odometer step, dimension 0 fastest.
        for d in 0..dims {
            coord[d] += 1;
            if coord[d] < extents[d] {
                break;
            }
            coord[d] = 0;
        }
    }

    assert_invariant(
        COMBINE_BOUNDED,
        total <= a.len() && total <= b.len(),
        "combine wrote no more pairs than either stream holds",
        Some("combine_with"),
    );
    trace!("combined {} pairs over {} common dims", total, dims);
    total
}
