//! Project configuration loader for describing the packaging layout.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::project::BundleLayout;

const DEFAULT_CONFIG_FILE: &str = "bundler.config.json";

/// Discoverable project configuration with environment-style defaults.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BundlerConfig {
    /// Relative path from the project root to the authored assets.
    pub data_dir: String,
    /// Relative path receiving compressed artifacts.
    pub out_dir: String,
    /// Explicit build tag overriding all other tag sources.
    pub build_tag: Option<String>,
    /// Alternate file the build tag is read back from and written to.
    pub build_tag_file: Option<String>,
    /// Primary role substituted into the main script asset.
    pub role: String,
    /// Roles string; falls back to the primary role when unset.
    pub roles: Option<String>,
    /// Root of the outer build tree probed for mirror destinations.
    pub build_root: String,
    /// Candidate mirror destinations relative to the build root.
    pub mirror_dirs: Vec<String>,
}

impl Default for BundlerConfig {
    fn default() -> Self {
        Self {
            data_dir: "data".into(),
            out_dir: "embedded".into(),
            build_tag: None,
            build_tag_file: None,
            role: "bed".into(),
            roles: None,
            build_root: "build".into(),
            mirror_dirs: vec!["esp-idf/network_manager/embedded".into()],
        }
    }
}

impl BundlerConfig {
    /// Attempt to load configuration from the provided project root.
    ///
    /// When the configuration file does not exist or fails to parse we fall
    /// back to default values so the packer keeps working in a bare checkout.
    pub fn discover(root: &Path) -> Self {
        let candidate = root.join(DEFAULT_CONFIG_FILE);
        Self::from_path(&candidate).unwrap_or_default()
    }

    /// Read configuration from a specific JSON file.
    pub fn from_path(path: &Path) -> Option<Self> {
        let content = fs::read_to_string(path).ok()?;
        serde_json::from_str(&content).ok()
    }

    /// Resolve relative paths against the project root into a runtime layout.
    pub fn into_layout(self, root: &Path) -> BundleLayout {
        let roles = self.roles.unwrap_or_else(|| self.role.clone());
        BundleLayout {
            data_dir: root.join(&self.data_dir),
            out_dir: root.join(&self.out_dir),
            build_tag: self.build_tag.filter(|tag| !tag.is_empty()),
            build_tag_file: self.build_tag_file.map(|path| root.join(path)),
            role: self.role,
            roles,
            build_root: root.join(&self.build_root),
            mirror_dirs: self.mirror_dirs.into_iter().map(PathBuf::from).collect(),
        }
    }
}
