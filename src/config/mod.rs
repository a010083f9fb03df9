//! Configuration management
//!
//! Settings for the command-line client, read from `WEAVE_*` environment
//! variables: where the local ledger lives, which key file signs uploads, and
//! how large each chunk may be.

pub mod settings;

pub use settings::{Config, GLOBAL_CONFIG};
