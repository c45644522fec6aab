//! Infrastructure layer for filesystem and environment interactions.
//!
//! This module resolves where homescout keeps its files on the host: the
//! configuration file, the durable settings cache, and trace output.

pub mod paths;

pub use paths::{default_config_file, expand_tilde, expand_tilde_with, get_data_dir};
