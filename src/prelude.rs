//! # peversion Prelude
//!
//! Convenient re-exports of the types most callers need.
//!
//! ```rust,no_run
//! use peversion::prelude::*;
//!
//! let info = VersionInfo::from_file("app.exe")?;
//! for field in StringField::iter() {
//!     if let Some(value) = info.field(field) {
//!         println!("{field}: {value}");
//!     }
//! }
//! # Ok::<(), Error>(())
//! ```

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all peversion operations
pub use crate::Error;

/// The result type used throughout peversion
pub use crate::Result;

// ================================================================================================
// Entry Points
// ================================================================================================

/// Decode from a buffer or a stream
pub use crate::{decode, decode_stream};

/// Loaded image and cursors
pub use crate::{Cursor, File, Parser, StreamParser};

// ================================================================================================
// Results
// ================================================================================================

/// Decoded version information
pub use crate::version::{FixedVersion, StringField, VersionInfo};

/// Iteration over [`StringField`] variants
pub use strum::IntoEnumIterator;
