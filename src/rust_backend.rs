//! Pure Rust render backend — zero external dependencies.
//!
//! Everything is statically linked into the binary.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (JPEG, PNG, TIFF, BMP, WebP) | `image` crate (pure Rust decoders) |
//! | Direct scale | `image::imageops::resize` via `DynamicImage::resize_exact` |
//! | Subsample averaging | `image::imageops::thumbnail` via `DynamicImage::thumbnail_exact` |
//! | Crop | `image::DynamicImage::crop_imm` |
//! | Composite | per-pixel lerp over RGBA, weighted by a luma plane |
//! | Encode | `image::codecs::{jpeg, png, tiff, bmp, webp}` |

use crate::backend::{BackendError, RenderBackend};
use crate::params::{CropRegion, Interpolation, OutputFormat, Quality, RenderingMode, ScaleParams};
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat, ImageReader, Rgba, RgbaImage};
use std::io::Cursor;
use std::path::Path;
use tracing::trace;

/// Production backend using the `image` crate ecosystem.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

fn kernel(filter: Interpolation) -> FilterType {
    match filter {
        Interpolation::Nearest => FilterType::Nearest,
        Interpolation::Bilinear => FilterType::Triangle,
        Interpolation::Bicubic => FilterType::CatmullRom,
        Interpolation::BicubicSharper => FilterType::Lanczos3,
    }
}

fn container(format: OutputFormat) -> ImageFormat {
    match format {
        OutputFormat::Jpeg => ImageFormat::Jpeg,
        OutputFormat::Png => ImageFormat::Png,
        OutputFormat::Tiff => ImageFormat::Tiff,
        OutputFormat::Bmp => ImageFormat::Bmp,
        OutputFormat::WebP => ImageFormat::WebP,
    }
}

impl RenderBackend for RustBackend {
    fn decode_path(&self, path: &Path) -> Result<DynamicImage, BackendError> {
        ImageReader::open(path)
            .map_err(BackendError::Io)?
            .decode()
            .map_err(|e| BackendError::Decode(format!("{}: {}", path.display(), e)))
    }

    fn decode_bytes(&self, bytes: &[u8]) -> Result<DynamicImage, BackendError> {
        image::load_from_memory(bytes).map_err(|e| BackendError::Decode(e.to_string()))
    }

    fn resample(
        &self,
        image: &DynamicImage,
        params: &ScaleParams,
    ) -> Result<DynamicImage, BackendError> {
        trace!(
            from_width = image.width(),
            from_height = image.height(),
            width = params.width,
            height = params.height,
            mode = ?params.mode,
            "resample"
        );
        let out = match params.mode {
            RenderingMode::Scale => {
                image.resize_exact(params.width, params.height, kernel(params.filter))
            }
            RenderingMode::Subsample => image.thumbnail_exact(params.width, params.height),
        };
        Ok(out)
    }

    fn crop(&self, image: &DynamicImage, region: &CropRegion) -> Result<DynamicImage, BackendError> {
        trace!(
            x = region.x,
            y = region.y,
            width = region.width,
            height = region.height,
            "crop"
        );
        Ok(image.crop_imm(region.x, region.y, region.width, region.height))
    }

    fn composite(
        &self,
        mask: &DynamicImage,
        image: &DynamicImage,
        alpha: &DynamicImage,
    ) -> Result<DynamicImage, BackendError> {
        // Dimensions are validated by the caller.
        let fg = image.to_rgba8();
        let bg = mask.to_rgba8();
        let weights = alpha.to_luma8();

        let mut out = RgbaImage::new(fg.width(), fg.height());
        for (x, y, pixel) in out.enumerate_pixels_mut() {
            let weight = weights.get_pixel(x, y)[0] as f32 / 255.0;
            let f = fg.get_pixel(x, y);
            let b = bg.get_pixel(x, y);
            let blend =
                |f: u8, b: u8| -> u8 { (f as f32 * weight + b as f32 * (1.0 - weight)).round() as u8 };
            *pixel = Rgba([
                blend(f[0], b[0]),
                blend(f[1], b[1]),
                blend(f[2], b[2]),
                blend(f[3], b[3]),
            ]);
        }
        Ok(DynamicImage::ImageRgba8(out))
    }

    fn encode(
        &self,
        image: &DynamicImage,
        format: OutputFormat,
        quality: Quality,
    ) -> Result<Vec<u8>, BackendError> {
        trace!(%format, quality = quality.value(), "encode");
        let mut buf = Cursor::new(Vec::new());
        match format {
            OutputFormat::Jpeg => {
                // JPEG carries no alpha channel; flatten to packed RGB first
                let flat = DynamicImage::ImageRgb8(image.to_rgb8());
                let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(
                    &mut buf,
                    quality.value() as u8,
                );
                flat.write_with_encoder(encoder)
                    .map_err(|e| BackendError::Encode(e.to_string()))?;
            }
            lossless => {
                image
                    .write_to(&mut buf, container(lossless))
                    .map_err(|e| BackendError::Encode(e.to_string()))?;
            }
        }
        Ok(buf.into_inner())
    }
}
