//! VERSIONINFO decoding.
//!
//! The version resource is a tree of self-describing blocks rooted at `VS_VERSION_INFO`. A
//! typical resource looks like this:
//!
//! ```text
//! VS_VERSION_INFO            binary, VS_FIXEDFILEINFO
//! ├── StringFileInfo         text, no value
//! │   └── 040904b0           text, no value (language + code page)
//! │       ├── CompanyName    text
//! │       ├── FileVersion    text
//! │       └── ...
//! └── VarFileInfo            text, no value
//!     └── Translation        binary
//! ```
//!
//! [`parse_version_info`] does not materialise this tree. It visits the blocks depth-first and
//! folds every text entry into a single [`VersionInfo`], matching keys without regard to where in
//! the tree they appear. When a key occurs more than once, for example in two language tables,
//! the last one visited wins.

mod block;
mod types;

pub use block::{
    parse_version_info, FIXED_VERSION_SIZE, MAX_BLOCK_DEPTH, MAX_KEY_LENGTH, VS_VERSION_INFO_KEY,
};
pub use types::{FixedVersion, StringField, VersionInfo};
