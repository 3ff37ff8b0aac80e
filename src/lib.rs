#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

pub mod config;
pub mod minify;
pub mod mirror;
pub mod models;
pub mod pipeline;
pub mod project;
pub mod tag;

pub use config::BundlerConfig;
pub use minify::MinifierSet;
pub use mirror::mirror_into_build;
pub use models::{MirrorReport, PackOutcome, PackedAsset, Substitutions};
pub use pipeline::pack_assets;
pub use project::{BundleLayout, MAIN_SCRIPT_ASSET, REQUIRED_ASSETS};
