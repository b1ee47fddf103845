//! Cross-platform accessibility abstractions.
//!
//! The semantic vocabulary shared with the host's accessibility layer.
//! Platform role strings (macOS `AXRole`, Windows UIA `ControlType`) are
//! mapped to [`Role`] by whoever implements the tree cursor trait.

mod role;

pub use role::Role;
