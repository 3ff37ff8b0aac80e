//! Data structures produced while packing assets for embedding.

use std::path::PathBuf;

/// Values substituted for the placeholder tokens in the main script asset.
#[derive(Debug, Clone)]
pub struct Substitutions {
  /// Resolved build tag for this run.
  pub build_tag: String,
  /// Primary role of the device the firmware is built for.
  pub role: String,
  /// Roles string, possibly listing several roles.
  pub roles: String,
}

/// A single compressed artifact written by the pipeline.
#[derive(Debug, Clone)]
pub struct PackedAsset {
  /// Source asset filename.
  pub name: String,
  /// Uncompressed payload size in bytes.
  pub raw_len: usize,
  /// Path of the compressed artifact on disk.
  pub path: PathBuf,
}

/// Everything a successful packing run produced.
#[derive(Debug)]
pub struct PackOutcome {
  /// Build tag embedded into the main script asset and the tag file.
  pub build_tag: String,
  /// Path the build tag was written to.
  pub tag_path: PathBuf,
  /// Stamp file touched for incremental-build detection.
  pub stamp_path: PathBuf,
  /// Compressed artifacts in packing order.
  pub artifacts: Vec<PackedAsset>,
}

/// How a mirror pass into the outer build tree ended.
#[derive(Debug, PartialEq, Eq)]
pub enum MirrorReport {
  /// Artifacts were copied into these destinations.
  Copied(Vec<PathBuf>),
  /// The outer build root does not exist yet.
  NoBuildRoot,
  /// The build root exists but no candidate destination has been created.
  NoDestinations,
}
