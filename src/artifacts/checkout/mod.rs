//! Checkout operations and conflict handling
//!
//! Switching between commits:
//! - Computes the differences between the current and target trees
//! - Detects conflicts with local modifications
//! - Updates the working tree and the index to match the target
//!
//! Conflicts are detected before any change is made to the working tree.

pub mod conflict;
pub mod migration;
