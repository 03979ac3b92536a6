//! Pure calculation functions for render geometry.
//!
//! All functions here are pure and testable without any I/O or images. The
//! [`Session`](crate::session::Session) computes its operation parameters
//! through this module and hands the results to the backend untouched.

use crate::params::CropRegion;

/// Uniform scale factor that brings the larger dimension of `source` to
/// `edge`, preserving aspect ratio.
///
/// The larger dimension governs, so the scaled image always fits within an
/// `edge`-sided square. A square source takes either branch of the
/// comparison with the same outcome.
///
/// # Examples
/// ```
/// # use easel::calculations::uniform_scale;
/// assert_eq!(uniform_scale((1000, 500), 100), 0.1);
/// assert_eq!(uniform_scale((500, 1000), 100), 0.1);
/// assert_eq!(uniform_scale((200, 200), 100), 0.5);
/// ```
pub fn uniform_scale(source: (u32, u32), edge: u32) -> f64 {
    let (width, height) = source;
    edge as f64 / width.max(height) as f64
}

/// Scale factor that fits `source` inside a `max_width` x `max_height`
/// bounding box, preserving aspect ratio.
///
/// The limiting dimension is selected by comparing
/// `height * (max_width / max_height)` against `width`: when that product
/// exceeds the width, the image is taller than the box and height limits
/// the scale; otherwise width does. The test is kept in exactly this form.
///
/// # Examples
/// ```
/// # use easel::calculations::fit_scale;
/// // Taller than a square box: height limits
/// assert_eq!(fit_scale((100, 200), 50, 50), 0.25);
/// // Wider than a square box: width limits
/// assert_eq!(fit_scale((200, 100), 50, 50), 0.25);
/// ```
pub fn fit_scale(source: (u32, u32), max_width: u32, max_height: u32) -> f64 {
    let (width, height) = source;
    let tall = height as f64 * (max_width as f64 / max_height as f64) > width as f64;
    if tall {
        max_height as f64 / height as f64
    } else {
        max_width as f64 / width as f64
    }
}

/// Whether `source` already fits inside the bounding box on both axes.
pub fn fits_within(source: (u32, u32), max_width: u32, max_height: u32) -> bool {
    source.0 <= max_width && source.1 <= max_height
}

/// Apply a scale factor to both dimensions, rounding to whole pixels.
///
/// Dimensions are floored at one pixel so extreme factors never produce an
/// empty image.
pub fn scaled_dimensions(source: (u32, u32), modifier: f64) -> (u32, u32) {
    let (width, height) = source;
    (
        (width as f64 * modifier).round().max(1.0) as u32,
        (height as f64 * modifier).round().max(1.0) as u32,
    )
}

/// Region left after trimming `trim_x` total columns and `trim_y` total
/// rows, split evenly between the sides.
///
/// Odd trims put the extra pixel on the right/bottom. Returns `None` when
/// a trim consumes the whole dimension, which is the caller's geometry
/// error. A zero trim is a valid full-frame region.
///
/// # Examples
/// ```
/// # use easel::calculations::centered_trim;
/// let region = centered_trim((100, 80), 10, 20).unwrap();
/// assert_eq!((region.x, region.y), (5, 10));
/// assert_eq!((region.width, region.height), (90, 60));
/// assert!(centered_trim((100, 80), 100, 0).is_none());
/// ```
pub fn centered_trim(source: (u32, u32), trim_x: u32, trim_y: u32) -> Option<CropRegion> {
    let (width, height) = source;
    if trim_x >= width || trim_y >= height {
        return None;
    }
    Some(CropRegion {
        x: trim_x / 2,
        y: trim_y / 2,
        width: width - trim_x,
        height: height - trim_y,
    })
}

/// Trim amounts that reduce `source` to a centered square at its smaller
/// dimension.
///
/// Landscape sources trim width, portrait sources trim height, squares
/// trim nothing.
pub fn square_trim(source: (u32, u32)) -> (u32, u32) {
    let (width, height) = source;
    if width >= height {
        (width - height, 0)
    } else {
        (0, height - width)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // =========================================================================
    // uniform_scale tests
    // =========================================================================

    #[test]
    fn uniform_scale_landscape_uses_width() {
        assert_eq!(uniform_scale((2000, 1500), 100), 0.05);
    }

    #[test]
    fn uniform_scale_portrait_uses_height() {
        assert_eq!(uniform_scale((1500, 2000), 100), 0.05);
    }

    #[test]
    fn uniform_scale_square_is_unambiguous() {
        assert_eq!(uniform_scale((400, 400), 100), 0.25);
    }

    #[test]
    fn uniform_scale_can_upscale() {
        assert_eq!(uniform_scale((50, 25), 100), 2.0);
    }

    // =========================================================================
    // fit_scale tests
    // =========================================================================

    #[test]
    fn fit_scale_height_limited_in_square_box() {
        // 100x200 into 50x50: 200 * (50/50) = 200 > 100, height limits
        assert_eq!(fit_scale((100, 200), 50, 50), 0.25);
    }

    #[test]
    fn fit_scale_width_limited_in_square_box() {
        // 200x100 into 50x50: 100 * (50/50) = 100 < 200, width limits
        assert_eq!(fit_scale((200, 100), 50, 50), 0.25);
    }

    #[test]
    fn fit_scale_wide_box_flips_the_limit() {
        // 100x100 into 200x50: 100 * (200/50) = 400 > 100, height limits
        assert_eq!(fit_scale((100, 100), 200, 50), 0.5);
    }

    #[test]
    fn fit_scale_matching_aspect_hits_both_edges() {
        // 400x300 into 100x75: either dimension gives 0.25
        assert_eq!(fit_scale((400, 300), 100, 75), 0.25);
    }

    // =========================================================================
    // fits_within / scaled_dimensions tests
    // =========================================================================

    #[test]
    fn fits_within_requires_both_axes() {
        assert!(fits_within((100, 80), 100, 80));
        assert!(!fits_within((101, 80), 100, 80));
        assert!(!fits_within((100, 81), 100, 80));
    }

    #[test]
    fn scaled_dimensions_round_to_nearest() {
        assert_eq!(scaled_dimensions((1000, 750), 0.1), (100, 75));
        // 333 * 0.1 = 33.3 rounds down, 335 * 0.1 = 33.5 rounds up
        assert_eq!(scaled_dimensions((333, 335), 0.1), (33, 34));
    }

    #[test]
    fn scaled_dimensions_never_empty() {
        assert_eq!(scaled_dimensions((100, 3), 0.01), (1, 1));
    }

    // =========================================================================
    // centered_trim tests
    // =========================================================================

    #[test]
    fn centered_trim_splits_evenly() {
        let region = centered_trim((100, 80), 10, 20).unwrap();
        assert_eq!(
            (region.x, region.y, region.width, region.height),
            (5, 10, 90, 60)
        );
    }

    #[test]
    fn centered_trim_odd_trim_floors_the_offset() {
        let region = centered_trim((100, 80), 7, 0).unwrap();
        assert_eq!((region.x, region.width), (3, 93));
    }

    #[test]
    fn centered_trim_zero_is_full_frame() {
        let region = centered_trim((100, 80), 0, 0).unwrap();
        assert_eq!(
            (region.x, region.y, region.width, region.height),
            (0, 0, 100, 80)
        );
    }

    #[test]
    fn centered_trim_rejects_consuming_trims() {
        assert!(centered_trim((100, 80), 100, 0).is_none());
        assert!(centered_trim((100, 80), 120, 0).is_none());
        assert!(centered_trim((100, 80), 0, 80).is_none());
    }

    // =========================================================================
    // square_trim tests
    // =========================================================================

    #[test]
    fn square_trim_landscape_trims_width() {
        assert_eq!(square_trim((100, 80)), (20, 0));
    }

    #[test]
    fn square_trim_portrait_trims_height() {
        assert_eq!(square_trim((80, 100)), (0, 20));
    }

    #[test]
    fn square_trim_square_trims_nothing() {
        assert_eq!(square_trim((64, 64)), (0, 0));
    }
}
