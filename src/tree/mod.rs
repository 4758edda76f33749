//! Path Addressing
//!
//! Converts dotted paths to and from locations in the live data tree.

pub mod path;
pub mod resolve;

pub use path::{IntoPath, Path};
pub use resolve::{resolve_container, resolve_value};
