//! Command implementations
//!
//! All user-facing operations live in `porcelain`; the lower-level pieces
//! they are built from are the `areas` and `artifacts` modules.

pub mod porcelain;
