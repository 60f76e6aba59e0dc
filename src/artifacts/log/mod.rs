//! Commit history traversal
//!
//! - `rev_list`: first-parent walk from a starting commit

pub mod rev_list;
