//! Region-of-interest selection and cropping.
//!
//! Every axis of a [`Stream`] carries a `{start, len}` region. A fresh axis
//! covers its full extent; [`Stream::set_roi`] narrows it, and
//! [`Stream::crop`] copies the selected sub-volume of both buffers into a
//! newly shaped stream. All index math uses the same dimension-0-fastest
//! stride convention as `decompose`/`compose`.

use crate::error::{Result, StreamError};
use crate::invariant_ppt::{assert_invariant, CROP_IN_BOUNDS, ROI_LEGALITY};
use crate::stream::Stream;
use log::debug;

/// A sub-range along one axis: `start` offset and `len` elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    /// First index of the region along its axis.
    pub start: usize,
    /// Number of elements the region covers.
    pub len: usize,
}

impl Region {
    /// The region covering an entire axis of the given extent.
    pub fn full(size: usize) -> Self {
        Self { start: 0, len: size }
    }
}

impl Stream {
    /// Set the region of interest along one axis.
    ///
    /// The region must have at least one element and fit inside the axis.
    pub fn set_roi(&mut self, axis: usize, region: Region) -> Result<()> {
        let dims = self.dims();
        let ax = self
            .axes
            .get_mut(axis)
            .ok_or(StreamError::AxisOutOfBounds { axis, dims })?;
        if region.len == 0 || region.start + region.len > ax.size {
            return Err(StreamError::RoiOutOfRange {
                axis,
                start: region.start,
                len: region.len,
                size: ax.size,
            });
        }
        ax.roi = region;
        assert_invariant(
            ROI_LEGALITY,
            true,
            "ROI fits inside its axis",
            Some("set_roi"),
        );
        Ok(())
    }

    /// The region of interest along one axis.
    pub fn roi(&self, axis: usize) -> Result<Region> {
        self.axes
            .get(axis)
            .map(|ax| ax.roi)
            .ok_or(StreamError::AxisOutOfBounds {
                axis,
                dims: self.dims(),
            })
    }

    /// Copy the ROI sub-volume of both buffers into a new stream.
    ///
    /// The result is shaped `[roi[0].len, roi[1].len, ...]` and its input and
    /// output buffers hold the corresponding sub-blocks of this stream's
    /// buffers. The source stream is untouched. Every region is re-validated
    /// against the current shape before any element is copied.
    pub fn crop(&self) -> Result<Stream> {
        if self.dims() == 0 {
            return Err(StreamError::EmptyStream);
        }
        for (axis, ax) in self.axes.iter().enumerate() {
            if ax.roi.len == 0 || ax.roi.start + ax.roi.len > ax.size {
                return Err(StreamError::RoiOutOfRange {
                    axis,
                    start: ax.roi.start,
                    len: ax.roi.len,
                    size: ax.size,
                });
            }
        }

        let mut dest = Stream::new();
        for ax in &self.axes {
            dest.add_dim(ax.roi.len)?;
        }

        let src_strides = self.strides();
        let dims = self.dims();
        let mut coord = vec![0usize; dims];
        for k in 0..dest.len() {
            // Source offset: destination coordinate shifted by each ROI start.
            let src: usize = coord
                .iter()
                .zip(&self.axes)
                .zip(&src_strides)
                .map(|((c, ax), stride)| (ax.roi.start + c) * stride)
                .sum();
            dest.input_mut()[k] = self.input()[src];
            dest.output_mut()[k] = self.output()[src];
            // Odometer step, dimension 0 fastest.
            for d in 0..dims {
                coord[d] += 1;
                if coord[d] < self.axes[d].roi.len {
                    break;
                }
                coord[d] = 0;
            }
        }

        assert_invariant(
            CROP_IN_BOUNDS,
            true,
            "crop read only inside the declared sub-volume",
            Some("crop"),
        );
        debug!(
            "cropped {} dims, {} -> {} elements",
            dims,
            self.len(),
            dest.len()
        );
        Ok(dest)
    }
}
