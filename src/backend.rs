//! Render backend trait and shared error type.
//!
//! The [`RenderBackend`] trait defines the five pixel operations a session
//! delegates: decode, resample, crop, composite, and encode. Sessions route
//! handles between these calls and compute their parameters; they never
//! touch pixels themselves.
//!
//! The production implementation is
//! [`RustBackend`](crate::rust_backend::RustBackend) — pure Rust, statically
//! linked. Tests swap in the recording mock from [`tests`].

use crate::params::{CropRegion, OutputFormat, Quality, ScaleParams};
use image::DynamicImage;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("decode failed: {0}")]
    Decode(String),
    #[error("encode failed: {0}")]
    Encode(String),
}

/// Trait for render backends.
///
/// Every backend must implement all five operations so sessions stay
/// backend-agnostic. Operations take and return whole decoded images;
/// nothing here is streaming or tiled.
pub trait RenderBackend {
    /// Decode a full image from a file.
    fn decode_path(&self, path: &Path) -> Result<DynamicImage, BackendError>;

    /// Decode a full image from an in-memory byte buffer.
    fn decode_bytes(&self, bytes: &[u8]) -> Result<DynamicImage, BackendError>;

    /// Resample to the target dimensions in `params`.
    fn resample(
        &self,
        image: &DynamicImage,
        params: &ScaleParams,
    ) -> Result<DynamicImage, BackendError>;

    /// Extract the given region as a new image.
    fn crop(&self, image: &DynamicImage, region: &CropRegion) -> Result<DynamicImage, BackendError>;

    /// Blend `image` over `mask` using the luminance of `alpha` as the
    /// per-pixel weight. All three inputs have identical dimensions; the
    /// caller checks this before delegating.
    fn composite(
        &self,
        mask: &DynamicImage,
        image: &DynamicImage,
        alpha: &DynamicImage,
    ) -> Result<DynamicImage, BackendError>;

    /// Encode to a byte buffer in the requested format. `quality` applies
    /// to lossy formats only.
    fn encode(
        &self,
        image: &DynamicImage,
        format: OutputFormat,
        quality: Quality,
    ) -> Result<Vec<u8>, BackendError>;
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use crate::params::{Interpolation, RenderingMode};
    use image::{Rgba, RgbaImage};
    use std::sync::Mutex;

    /// Mock backend that records operations and returns synthetic images.
    ///
    /// Decodes pop their dimensions from `decode_dims` (back first), so
    /// tests queue expected sources in reverse call order. Transform
    /// operations return a flat image of the requested output size, which
    /// lets session tests assert computed parameters through the result
    /// dimensions alone.
    #[derive(Default)]
    pub struct MockBackend {
        pub decode_dims: Mutex<Vec<(u32, u32)>>,
        pub operations: Mutex<Vec<RecordedOp>>,
    }

    #[derive(Debug, Clone, PartialEq)]
    pub enum RecordedOp {
        DecodePath(String),
        DecodeBytes(usize),
        Resample {
            width: u32,
            height: u32,
            filter: Interpolation,
            mode: RenderingMode,
        },
        Crop {
            x: u32,
            y: u32,
            width: u32,
            height: u32,
        },
        Composite {
            width: u32,
            height: u32,
        },
        Encode {
            format: OutputFormat,
            quality: u32,
        },
    }

    fn flat_image(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(
            width,
            height,
            Rgba([128, 128, 128, 255]),
        ))
    }

    impl MockBackend {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_dimensions(dims: Vec<(u32, u32)>) -> Self {
            Self {
                decode_dims: Mutex::new(dims),
                operations: Mutex::new(Vec::new()),
            }
        }

        pub fn get_operations(&self) -> Vec<RecordedOp> {
            self.operations.lock().unwrap().clone()
        }

        fn record(&self, op: RecordedOp) {
            self.operations.lock().unwrap().push(op);
        }

        fn next_decode(&self) -> Result<DynamicImage, BackendError> {
            self.decode_dims
                .lock()
                .unwrap()
                .pop()
                .map(|(w, h)| flat_image(w, h))
                .ok_or_else(|| BackendError::Decode("no mock dimensions queued".to_string()))
        }
    }

    impl RenderBackend for MockBackend {
        fn decode_path(&self, path: &Path) -> Result<DynamicImage, BackendError> {
            self.record(RecordedOp::DecodePath(path.to_string_lossy().to_string()));
            self.next_decode()
        }

        fn decode_bytes(&self, bytes: &[u8]) -> Result<DynamicImage, BackendError> {
            self.record(RecordedOp::DecodeBytes(bytes.len()));
            self.next_decode()
        }

        fn resample(
            &self,
            _image: &DynamicImage,
            params: &ScaleParams,
        ) -> Result<DynamicImage, BackendError> {
            self.record(RecordedOp::Resample {
                width: params.width,
                height: params.height,
                filter: params.filter,
                mode: params.mode,
            });
            Ok(flat_image(params.width, params.height))
        }

        fn crop(
            &self,
            _image: &DynamicImage,
            region: &CropRegion,
        ) -> Result<DynamicImage, BackendError> {
            self.record(RecordedOp::Crop {
                x: region.x,
                y: region.y,
                width: region.width,
                height: region.height,
            });
            Ok(flat_image(region.width, region.height))
        }

        fn composite(
            &self,
            _mask: &DynamicImage,
            image: &DynamicImage,
            _alpha: &DynamicImage,
        ) -> Result<DynamicImage, BackendError> {
            self.record(RecordedOp::Composite {
                width: image.width(),
                height: image.height(),
            });
            Ok(flat_image(image.width(), image.height()))
        }

        fn encode(
            &self,
            _image: &DynamicImage,
            format: OutputFormat,
            quality: Quality,
        ) -> Result<Vec<u8>, BackendError> {
            self.record(RecordedOp::Encode {
                format,
                quality: quality.value(),
            });
            Ok(b"mock-encoded".to_vec())
        }
    }

    #[test]
    fn mock_records_decode_path() {
        let backend = MockBackend::with_dimensions(vec![(800, 600)]);

        let decoded = backend.decode_path(Path::new("/test/image.jpg")).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (800, 600));

        let ops = backend.get_operations();
        assert_eq!(ops.len(), 1);
        assert!(matches!(&ops[0], RecordedOp::DecodePath(p) if p == "/test/image.jpg"));
    }

    #[test]
    fn mock_decode_fails_when_queue_is_empty() {
        let backend = MockBackend::new();
        assert!(matches!(
            backend.decode_bytes(b"xx"),
            Err(BackendError::Decode(_))
        ));
    }

    #[test]
    fn mock_resample_returns_target_dimensions() {
        let backend = MockBackend::new();
        let source = flat_image(10, 10);

        let out = backend
            .resample(
                &source,
                &ScaleParams {
                    width: 320,
                    height: 180,
                    filter: Interpolation::Bicubic,
                    mode: RenderingMode::Scale,
                },
            )
            .unwrap();

        assert_eq!((out.width(), out.height()), (320, 180));
        assert!(matches!(
            &backend.get_operations()[0],
            RecordedOp::Resample {
                width: 320,
                height: 180,
                filter: Interpolation::Bicubic,
                mode: RenderingMode::Scale,
            }
        ));
    }
}
