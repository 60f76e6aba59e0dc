#[path = "../common/mod.rs"]
mod common;

mod branching;
mod init;
mod snapshot;
