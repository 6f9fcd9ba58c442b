//! Library components of the `censo` command-line tool.

pub mod logging;
pub mod request;
