//! Library side of the `hecon` binary: configuration, logging and the
//! file-level pipeline the subcommands drive.

pub mod config;
pub mod logging;
pub mod pipeline;
