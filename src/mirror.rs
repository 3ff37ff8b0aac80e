//! Opportunistic copy of generated artifacts into the outer build tree.
//!
//! The outer build system owns the destination folders; this pass only
//! refreshes artifacts in destinations that already exist, so a stale build
//! directory never embeds outdated assets. First-time builds create the
//! destinations through their own configure step later.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use same_file::is_same_file;

use crate::models::{MirrorReport, PackOutcome};

/// Copy every artifact and the stamp file into each existing candidate.
///
/// Candidates are resolved relative to `build_root`. A missing build root or
/// an empty set of existing candidates is an informational skip, not an
/// error.
pub fn mirror_into_build(
  outcome: &PackOutcome,
  build_root: &Path,
  candidates: &[PathBuf],
) -> Result<MirrorReport> {
  if !build_root.exists() {
    println!("Build dir not found; skipping copy into build output.");
    return Ok(MirrorReport::NoBuildRoot);
  }

  let mut copied = Vec::new();
  for candidate in candidates {
    let dest = build_root.join(candidate);
    if !dest.exists() {
      continue;
    }

    for artifact in &outcome.artifacts {
      copy_into(&artifact.path, &dest)?;
    }
    copy_into(&outcome.stamp_path, &dest)?;

    println!("Copied assets to {}", dest.display());
    copied.push(dest);
  }

  if copied.is_empty() {
    println!("Build dir present but no destination folder yet; skipping copy.");
    return Ok(MirrorReport::NoDestinations);
  }

  Ok(MirrorReport::Copied(copied))
}

/// Copy one file into a destination directory unless it already is that file.
fn copy_into(source: &Path, dest_dir: &Path) -> Result<()> {
  let file_name = source
    .file_name()
    .with_context(|| format!("artifact {} has no file name", source.display()))?;
  let destination = dest_dir.join(file_name);

  if destination.exists() && is_same_file(source, &destination)? {
    return Ok(());
  }

  fs::copy(source, &destination).with_context(|| {
    format!(
      "failed to copy {} to {}",
      source.display(),
      destination.display()
    )
  })?;
  Ok(())
}
