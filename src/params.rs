//! Typed vocabulary for render operations.
//!
//! These types describe *what* to do, not *how* to do it. They are the
//! interface between the [`Session`](crate::session::Session) (which decides
//! which operation to run and computes its numbers) and the
//! [`backend`](crate::backend) (which does the actual pixel work). Keeping
//! the vocabulary closed — enums instead of opcode strings, clamped
//! newtypes instead of bare integers — means a backend never has to parse
//! or validate what a session hands it.
//!
//! ## Types
//!
//! - [`Interpolation`] — Resampling kernel, with quality/cost trade-offs documented per variant.
//! - [`RenderingMode`] — Direct scale vs. subsample averaging.
//! - [`OutputFormat`] — Closed set of encodable formats, parseable from the usual strings.
//! - [`Quality`] — Lossy encoding quality (1–100, default 90). Clamped on construction.
//! - [`ScaleParams`] — Full specification for a resample: target dimensions, kernel, mode.
//! - [`CropRegion`] — Pixel rectangle for a crop.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Interpolation kernel used when resampling.
///
/// Listed from cheapest to most expensive. The cost difference only matters
/// for large sources; for thumbnail-sized output any kernel is fast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Interpolation {
    /// Nearest neighbour. No smoothing at all; blocky under magnification,
    /// shimmering under minification. Only sensible for pixel art.
    Nearest,
    /// Linear interpolation over a 2x2 neighbourhood. Soft results,
    /// cheapest kernel that does not alias badly.
    Bilinear,
    /// Catmull-Rom cubic. The general-purpose default: sharp edges without
    /// visible ringing.
    Bicubic,
    /// Lanczos windowed sinc. Sharper than [`Bicubic`](Self::Bicubic) at
    /// the price of slight ringing on hard edges; the usual choice for
    /// photographic downscaling.
    BicubicSharper,
}

/// How a resample reaches its target dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RenderingMode {
    /// One direct resampling pass with the selected [`Interpolation`]
    /// kernel.
    Scale,
    /// Box averaging: every source pixel contributes to exactly one target
    /// pixel. Preferred for large downscale ratios, where a fixed-footprint
    /// kernel would skip source pixels entirely and alias.
    Subsample,
}

/// Encodable output formats.
///
/// The set is fixed by the codec features compiled into the crate. JPEG is
/// the only lossy member; it is also the only format without an alpha
/// channel, so RGBA results are flattened on encode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Jpeg,
    Png,
    Tiff,
    Bmp,
    WebP,
}

impl OutputFormat {
    /// Canonical lowercase name, matching what [`FromStr`] accepts.
    pub fn as_str(self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "jpeg",
            OutputFormat::Png => "png",
            OutputFormat::Tiff => "tiff",
            OutputFormat::Bmp => "bmp",
            OutputFormat::WebP => "webp",
        }
    }

    /// Conventional file extension for the format.
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "jpg",
            other => other.as_str(),
        }
    }

    /// True for formats that discard information on encode. [`Quality`]
    /// only affects these; lossless formats ignore it.
    pub fn is_lossy(self) -> bool {
        matches!(self, OutputFormat::Jpeg)
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unsupported output format '{0}'. Expected jpeg, png, tiff, bmp, or webp")]
pub struct UnknownFormatError(String);

impl FromStr for OutputFormat {
    type Err = UnknownFormatError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "jpeg" | "jpg" => Ok(OutputFormat::Jpeg),
            "png" => Ok(OutputFormat::Png),
            "tiff" | "tif" => Ok(OutputFormat::Tiff),
            "bmp" => Ok(OutputFormat::Bmp),
            "webp" => Ok(OutputFormat::WebP),
            other => Err(UnknownFormatError(other.to_string())),
        }
    }
}

/// Quality setting for lossy image encoding (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "u32", into = "u32")]
pub struct Quality(u32);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.clamp(1, 100))
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(90)
    }
}

impl From<u32> for Quality {
    fn from(value: u32) -> Self {
        Self::new(value)
    }
}

impl From<Quality> for u32 {
    fn from(quality: Quality) -> Self {
        quality.0
    }
}

/// Parameters for a resample operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScaleParams {
    /// Target width in pixels.
    pub width: u32,
    /// Target height in pixels.
    pub height: u32,
    pub filter: Interpolation,
    pub mode: RenderingMode,
}

/// Pixel rectangle selected by a crop operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropRegion {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}
