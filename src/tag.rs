//! Build tag resolution and persistence.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::Local;
use uuid::Uuid;

/// Resolve the build tag for this run.
///
/// An explicit non-empty tag wins, then the contents of an existing tag file,
/// then a freshly synthesized tag. Resolution never fails; a fully degraded
/// environment still yields a synthesized tag.
pub fn resolve_build_tag(explicit: Option<&str>, tag_file: Option<&Path>) -> String {
  if let Some(tag) = explicit
    && !tag.is_empty()
  {
    return tag.to_string();
  }

  if let Some(path) = tag_file
    && let Ok(contents) = fs::read_to_string(path)
  {
    let trimmed = contents.trim();
    if !trimmed.is_empty() {
      return trimmed.to_string();
    }
  }

  synthesize_build_tag()
}

/// Persist the resolved tag, creating parent directories as needed.
pub fn write_build_tag(tag: &str, path: &Path) -> Result<()> {
  if let Some(parent) = path.parent()
    && !parent.as_os_str().is_empty()
  {
    fs::create_dir_all(parent).with_context(|| format!("failed to create {}", parent.display()))?;
  }

  fs::write(path, tag).with_context(|| format!("failed to write {}", path.display()))
}

/// Timestamped tag with a short random suffix, distinct per invocation.
fn synthesize_build_tag() -> String {
  let stamp = Local::now().format("UI_BUILD_%Y-%m-%d_%H%M%S");
  let suffix: String = Uuid::new_v4()
    .simple()
    .to_string()
    .chars()
    .take(6)
    .collect::<String>()
    .to_ascii_uppercase();
  format!("{stamp}_{suffix}")
}
