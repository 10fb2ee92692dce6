pub mod flow;
pub mod handlers;

pub use flow::{check_upload, run_upload, FileKind, MAX_UPLOAD_BYTES};
