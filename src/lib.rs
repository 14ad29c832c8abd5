#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

pub mod compiler;
pub mod config;
pub mod dev_server;
pub mod error;
pub mod logging;
pub mod manifest;
pub mod models;
pub mod pack_type;

pub use compiler::{CommandCompiler, Compiler};
pub use config::ManifestConfig;
pub use dev_server::{DevServerProbe, DevServerStatus, NoDevServer};
pub use error::{ConfigError, ManifestError};
pub use manifest::{Manifest, ManifestData};
pub use models::Asset;
pub use pack_type::PackType;
