//! Branch names and revisions
//!
//! - `branch_name`: validated branch names and their ref paths
//! - `revision`: user-supplied commit arguments (`HEAD`, branch, hash, `^`, `~n`)

pub mod branch_name;
pub mod revision;

/// Rejects leading `-` or `.`, trailing `.` or `/`, `..`, `/.`, `@{`, a
/// `.lock` suffix, whitespace, control characters and `~^:?*[]\`
pub const INVALID_BRANCH_NAME_REGEX: &str =
    r"^[\.-]|\/\.|\.\.|^\/|\/$|\.$|\.lock$|@\{|\s|[\x00-\x20\*:\?\[\]\\~\^\x7f]";
pub const PARENT_REGEX: &str = r"^(.+)\^$";
pub const ANCESTOR_REGEX: &str = r"^(.+)\~(\d+)$";

pub const HEAD: &str = "HEAD";
pub const DEFAULT_BRANCH: &str = "main";
pub const REF_PREFIX: &str = "refs/heads/";
