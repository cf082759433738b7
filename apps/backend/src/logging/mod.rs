pub mod format;
pub mod pii;

pub use format::{LogFormat, DEFAULT_FILTER};
