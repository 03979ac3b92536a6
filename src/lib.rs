//! # Easel
//!
//! Image rendering sessions: load an image, run one rendering operation —
//! thumbnail, bounding-box fit, centered crop, square crop, mask
//! composite — and write the result back out. Operations chain by swapping
//! the result back into the working slot, so a batch tool can thumbnail,
//! square, and encode without touching the source file twice.
//!
//! ```no_run
//! use easel::{Interpolation, OutputFormat, Studio};
//!
//! # fn main() -> Result<(), easel::SessionError> {
//! let studio = Studio::new();
//! let mut session = studio.session();
//!
//! session.load("photos/dawn.jpg")?;
//! session.thumbnail(400, Interpolation::Bicubic)?;
//! session.swap_source()?;
//! session.square()?;
//! session.write_result("thumbs/dawn.jpg", OutputFormat::Jpeg)?;
//! # Ok(())
//! # }
//! ```
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`session`] | The [`Session`] slot model and its operations, plus the [`Studio`] factory |
//! | [`params`] | Typed operation vocabulary: kernels, rendering modes, formats, quality |
//! | [`calculations`] | Pure dimension math behind every transform |
//! | [`backend`] | The [`RenderBackend`] collaborator trait sessions delegate pixel work to |
//! | [`rust_backend`] | Production backend on the `image` crate |
//! | [`cache`] | Shared mask/alpha memoization owned by the studio |
//!
//! # Design Decisions
//!
//! ## Typed Operators, Not Opcode Strings
//!
//! Every operation a session can ask of a backend is a typed parameter
//! struct over closed enums ([`ScaleParams`], [`CropRegion`],
//! [`Interpolation`], [`RenderingMode`], [`OutputFormat`]). A backend
//! never parses or validates strings, and an impossible request does not
//! typecheck. The string surface survives only where callers genuinely
//! hold strings: [`OutputFormat`] implements `FromStr` for the usual
//! format names.
//!
//! ## Shared Handles, Not Copies
//!
//! Session slots hold `Arc<image::DynamicImage>`. Paths that need no
//! pixel work — a decrease-only thumbnail of an image that already fits —
//! alias the working image into the result slot for free, and snapshots
//! are reference-count clones. This stays sound because no operation
//! mutates an image in place; transforms always produce fresh images.
//!
//! ## The Cache Lives in the Studio
//!
//! Mask/alpha memoization is an explicit [`OverlayCache`] owned by the
//! [`Studio`] rather than ambient global state. Sessions created by one
//! studio share it; independent studios are fully isolated, which keeps
//! tests and multi-tenant hosts honest. Lookup-and-insert is one critical
//! section, so threaded hosts cannot decode the same overlay twice.
//!
//! ## Pure-Rust Imaging
//!
//! All pixel work goes through the `image` crate's pure-Rust codecs and
//! resamplers — no ImageMagick, no system libraries, nothing to install.
//! The backend seam ([`RenderBackend`]) exists for tests and for hosts
//! with their own pixel pipeline, not to paper over C dependencies.

pub mod backend;
pub mod cache;
pub mod calculations;
pub mod params;
pub mod rust_backend;
pub mod session;

pub use backend::{BackendError, RenderBackend};
pub use cache::{CacheStats, OverlayCache};
pub use params::{
    CropRegion, Interpolation, OutputFormat, Quality, RenderingMode, ScaleParams,
    UnknownFormatError,
};
pub use rust_backend::RustBackend;
pub use session::{Session, SessionError, Studio};
