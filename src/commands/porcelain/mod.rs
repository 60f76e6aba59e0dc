//! Porcelain commands
//!
//! Each command is an `impl Repository` block in its own file. Commands
//! print human-readable output to the repository writer and return a value
//! describing what they did, so library callers can inspect the result
//! without parsing output.
//!
//! - `init`: create the metadata directory
//! - `add`: stage files and directories
//! - `commit`: record the index as a commit
//! - `status`: staged, unstaged and untracked changes
//! - `diff`: unified diffs between commits, index and working tree
//! - `log`: first-parent history
//! - `branch`: list and create branches
//! - `checkout`: switch branches, optionally creating one
//! - `merge`: fast-forward or three-way merge of a branch

pub mod add;
pub mod branch;
pub mod checkout;
pub mod commit;
pub mod diff;
pub mod init;
pub mod log;
pub mod merge;
pub mod status;

pub use add::AddSummary;
pub use diff::DiffOptions;
pub use log::LogOptions;
pub use status::StatusOptions;
