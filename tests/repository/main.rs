#[path = "../common/mod.rs"]
mod common;

mod commit;
mod diff_and_log;
mod merge;
mod status;
