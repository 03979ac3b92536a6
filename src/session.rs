//! Render sessions and the studio that creates them.
//!
//! A [`Session`] holds up to five image handles and runs one rendering
//! operation at a time:
//!
//! ```text
//! load → (load_mask / load_alpha) → transform → write_result
//!                                      ↑            │
//!                                      └ swap_source ┘
//! ```
//!
//! - `image` is the current working image; transforms read it and fill
//!   `result`, never mutating `image` in place.
//! - `result` holds the last transform output until it is written out or
//!   swapped back into `image` with [`swap_source`](Session::swap_source)
//!   to chain another transform.
//! - `original` is an explicit snapshot slot for experiment-and-rollback
//!   workflows ([`save_original`](Session::save_original) /
//!   [`restore_original`](Session::restore_original)).
//! - `mask` and `alpha` are the composite inputs, loaded through the
//!   studio's shared [`OverlayCache`].
//!
//! Handles are `Arc<DynamicImage>`, so "no resample needed" paths alias
//! the working image into `result` without copying pixels. Snapshots stay
//! independent because no operation writes through a handle.
//!
//! A session is single-threaded, synchronous state for one caller. The
//! [`Studio`] is the shared part: it owns the backend and the overlay
//! cache, and stamps out sessions that share both.

use crate::backend::{BackendError, RenderBackend};
use crate::cache::OverlayCache;
use crate::calculations::{
    centered_trim, fit_scale, fits_within, scaled_dimensions, square_trim, uniform_scale,
};
use crate::params::{Interpolation, OutputFormat, Quality, RenderingMode, ScaleParams};
use crate::rust_backend::RustBackend;
use image::DynamicImage;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("decode failed: {0}")]
    Decode(#[source] BackendError),
    #[error("encode failed: {0}")]
    Encode(#[source] BackendError),
    #[error("render operation failed: {0}")]
    Render(#[source] BackendError),
    #[error("trimming {trim_x}x{trim_y} from a {width}x{height} image leaves no pixels")]
    InvalidGeometry {
        trim_x: u32,
        trim_y: u32,
        width: u32,
        height: u32,
    },
    #[error("composite inputs differ: image {image:?}, mask {mask:?}, alpha {alpha:?}")]
    DimensionMismatch {
        image: (u32, u32),
        mask: (u32, u32),
        alpha: (u32, u32),
    },
    #[error("no image loaded")]
    NoImage,
    #[error("no result to consume")]
    NoResult,
    #[error("no saved original to restore")]
    NoOriginal,
    #[error("mask and alpha must both be loaded before compositing")]
    NoOverlay,
}

type Handle = Arc<DynamicImage>;

/// Session factory owning the pieces sessions share: the render backend
/// and the overlay cache.
pub struct Studio<B: RenderBackend = RustBackend> {
    backend: Arc<B>,
    overlays: Arc<OverlayCache>,
}

impl Studio<RustBackend> {
    /// Studio over the production pure-Rust backend.
    pub fn new() -> Self {
        Self::with_backend(RustBackend::new())
    }
}

impl Default for Studio<RustBackend> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: RenderBackend> Studio<B> {
    pub fn with_backend(backend: B) -> Self {
        Self {
            backend: Arc::new(backend),
            overlays: Arc::new(OverlayCache::new()),
        }
    }

    /// Create a fresh session sharing this studio's backend and overlay
    /// cache.
    pub fn session(&self) -> Session<B> {
        Session {
            backend: Arc::clone(&self.backend),
            overlays: Arc::clone(&self.overlays),
            original: None,
            image: None,
            result: None,
            mask: None,
            alpha: None,
            decrease_only: false,
            quality: Quality::default(),
        }
    }

    pub fn overlays(&self) -> &OverlayCache {
        &self.overlays
    }
}

/// Stateful holder of one chain of rendering operations.
///
/// See the [module docs](self) for the slot model.
pub struct Session<B: RenderBackend = RustBackend> {
    backend: Arc<B>,
    overlays: Arc<OverlayCache>,
    original: Option<Handle>,
    image: Option<Handle>,
    result: Option<Handle>,
    mask: Option<Handle>,
    alpha: Option<Handle>,
    decrease_only: bool,
    quality: Quality,
}

impl<B: RenderBackend> Session<B> {
    // --- loading ---

    /// Decode a full image from a file into the working slot.
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<(), SessionError> {
        let path = path.as_ref();
        let decoded = self.backend.decode_path(path).map_err(SessionError::Decode)?;
        debug!(
            path = %path.display(),
            width = decoded.width(),
            height = decoded.height(),
            "loaded image"
        );
        self.image = Some(Arc::new(decoded));
        Ok(())
    }

    /// Decode a full image from an in-memory buffer into the working slot.
    pub fn load_bytes(&mut self, bytes: &[u8]) -> Result<(), SessionError> {
        let decoded = self
            .backend
            .decode_bytes(bytes)
            .map_err(SessionError::Decode)?;
        self.image = Some(Arc::new(decoded));
        Ok(())
    }

    /// Load the composite mask through the shared overlay cache.
    pub fn load_mask(&mut self, path: impl AsRef<Path>) -> Result<(), SessionError> {
        let overlay = self
            .overlays
            .get_or_load(path.as_ref(), self.backend.as_ref())
            .map_err(SessionError::Decode)?;
        self.mask = Some(overlay);
        Ok(())
    }

    /// Load the composite blend weights through the shared overlay cache.
    pub fn load_alpha(&mut self, path: impl AsRef<Path>) -> Result<(), SessionError> {
        let overlay = self
            .overlays
            .get_or_load(path.as_ref(), self.backend.as_ref())
            .map_err(SessionError::Decode)?;
        self.alpha = Some(overlay);
        Ok(())
    }

    // --- snapshots and chaining ---

    /// Snapshot the working image so a later
    /// [`restore_original`](Self::restore_original) can roll back.
    pub fn save_original(&mut self) -> Result<(), SessionError> {
        let image = self.image.clone().ok_or(SessionError::NoImage)?;
        self.original = Some(image);
        Ok(())
    }

    /// Replace the working image with the saved snapshot. The snapshot
    /// stays in place, so it can be restored again.
    pub fn restore_original(&mut self) -> Result<(), SessionError> {
        let original = self.original.clone().ok_or(SessionError::NoOriginal)?;
        self.image = Some(original);
        Ok(())
    }

    /// Promote the last result to the working image, clearing the result
    /// slot. This is how transforms chain without reloading the source.
    pub fn swap_source(&mut self) -> Result<(), SessionError> {
        let result = self.result.take().ok_or(SessionError::NoResult)?;
        self.image = Some(result);
        Ok(())
    }

    // --- transforms ---

    /// Uniformly scale the working image so its larger dimension equals
    /// `edge`, preserving aspect ratio.
    ///
    /// With [`set_decrease_only`](Self::set_decrease_only) active, an image
    /// already fitting the edge is aliased into the result slot untouched.
    pub fn thumbnail(&mut self, edge: u32, filter: Interpolation) -> Result<(), SessionError> {
        let image = self.image.clone().ok_or(SessionError::NoImage)?;
        let source = (image.width(), image.height());

        if self.decrease_only && fits_within(source, edge, edge) {
            debug!(width = source.0, height = source.1, edge, "thumbnail skipped, already fits");
            self.result = Some(image);
            return Ok(());
        }

        let modifier = uniform_scale(source, edge);
        let (width, height) = scaled_dimensions(source, modifier);
        self.resample_into_result(&image, width, height, filter, RenderingMode::Scale)
    }

    /// Scale the working image to fit a bounding box, preserving aspect
    /// ratio. Never upscales: a source already inside the box is aliased
    /// into the result slot untouched.
    ///
    /// `mode` picks the direct kernel pass or subsample averaging; the
    /// latter holds up better at large downscale ratios.
    pub fn thumbnail_fit(
        &mut self,
        max_width: u32,
        max_height: u32,
        filter: Interpolation,
        mode: RenderingMode,
    ) -> Result<(), SessionError> {
        let image = self.image.clone().ok_or(SessionError::NoImage)?;
        let source = (image.width(), image.height());

        if fits_within(source, max_width, max_height) {
            debug!(
                width = source.0,
                height = source.1,
                max_width,
                max_height,
                "fit skipped, already inside the box"
            );
            self.result = Some(image);
            return Ok(());
        }

        let modifier = fit_scale(source, max_width, max_height);
        let (width, height) = scaled_dimensions(source, modifier);
        self.resample_into_result(&image, width, height, filter, mode)
    }

    /// Trim `trim_x` total columns and `trim_y` total rows, split evenly
    /// between the sides.
    pub fn crop(&mut self, trim_x: u32, trim_y: u32) -> Result<(), SessionError> {
        let image = self.image.clone().ok_or(SessionError::NoImage)?;
        let source = (image.width(), image.height());

        let region =
            centered_trim(source, trim_x, trim_y).ok_or(SessionError::InvalidGeometry {
                trim_x,
                trim_y,
                width: source.0,
                height: source.1,
            })?;
        debug!(?region, "crop");

        let cropped = self
            .backend
            .crop(&image, &region)
            .map_err(SessionError::Render)?;
        self.result = Some(Arc::new(cropped));
        Ok(())
    }

    /// Center-crop the working image to a square at its smaller dimension.
    pub fn square(&mut self) -> Result<(), SessionError> {
        let source = self.image_dimensions().ok_or(SessionError::NoImage)?;
        let (trim_x, trim_y) = square_trim(source);
        self.crop(trim_x, trim_y)
    }

    /// Composite the working image over the mask, weighted per pixel by
    /// the alpha overlay's luminance.
    ///
    /// All three inputs must be loaded and dimensionally identical. On any
    /// failure the result slot keeps its previous value.
    pub fn apply_mask(&mut self) -> Result<(), SessionError> {
        let image = self.image.clone().ok_or(SessionError::NoImage)?;
        let mask = self.mask.clone().ok_or(SessionError::NoOverlay)?;
        let alpha = self.alpha.clone().ok_or(SessionError::NoOverlay)?;

        let image_dims = (image.width(), image.height());
        let mask_dims = (mask.width(), mask.height());
        let alpha_dims = (alpha.width(), alpha.height());
        if image_dims != mask_dims || image_dims != alpha_dims {
            return Err(SessionError::DimensionMismatch {
                image: image_dims,
                mask: mask_dims,
                alpha: alpha_dims,
            });
        }

        let composited = self
            .backend
            .composite(&mask, &image, &alpha)
            .map_err(SessionError::Render)?;
        self.result = Some(Arc::new(composited));
        Ok(())
    }

    fn resample_into_result(
        &mut self,
        image: &DynamicImage,
        width: u32,
        height: u32,
        filter: Interpolation,
        mode: RenderingMode,
    ) -> Result<(), SessionError> {
        let params = ScaleParams {
            width,
            height,
            filter,
            mode,
        };
        let resampled = self
            .backend
            .resample(image, &params)
            .map_err(SessionError::Render)?;
        self.result = Some(Arc::new(resampled));
        Ok(())
    }

    // --- output ---

    /// Encode the result in the requested format and return the bytes.
    pub fn encode_result(&self, format: OutputFormat) -> Result<Vec<u8>, SessionError> {
        let result = self.result.as_ref().ok_or(SessionError::NoResult)?;
        self.backend
            .encode(result, format, self.quality)
            .map_err(SessionError::Encode)
    }

    /// Encode the result in the requested format and write it to a file.
    pub fn write_result(
        &self,
        path: impl AsRef<Path>,
        format: OutputFormat,
    ) -> Result<(), SessionError> {
        let bytes = self.encode_result(format)?;
        std::fs::write(path.as_ref(), bytes)
            .map_err(|e| SessionError::Encode(BackendError::Io(e)))
    }

    // --- accessors ---

    /// Dimensions of the working image, if one is loaded.
    pub fn image_dimensions(&self) -> Option<(u32, u32)> {
        self.image.as_ref().map(|i| (i.width(), i.height()))
    }

    /// Dimensions of the last transform output, if any.
    pub fn result_dimensions(&self) -> Option<(u32, u32)> {
        self.result.as_ref().map(|i| (i.width(), i.height()))
    }

    pub fn decrease_only(&self) -> bool {
        self.decrease_only
    }

    /// When set, [`thumbnail`](Self::thumbnail) refuses to upscale an
    /// image that already fits the requested edge.
    pub fn set_decrease_only(&mut self, decrease_only: bool) {
        self.decrease_only = decrease_only;
    }

    pub fn quality(&self) -> Quality {
        self.quality
    }

    /// Quality used when encoding results to lossy formats.
    pub fn set_quality(&mut self, quality: Quality) {
        self.quality = quality;
    }
}
