//! Fixed project layout shared by the packing pipeline and the CLI.

use std::path::PathBuf;

/// Source assets every firmware build must provide, in packing order.
pub const REQUIRED_ASSETS: [&str; 7] = [
    "index.html",
    "app.js",
    "bed-visualizer.js",
    "style.css",
    "sw.js",
    "branding.json",
    "favicon.png",
];

/// The only asset that receives placeholder substitution.
pub const MAIN_SCRIPT_ASSET: &str = "app.js";

/// Placeholder replaced with the resolved build tag.
pub const TOKEN_BUILD_TAG: &str = "__UI_BUILD_TAG__";
/// Placeholder replaced with the primary role.
pub const TOKEN_ROLE: &str = "__UI_ROLE__";
/// Placeholder replaced with the roles string.
pub const TOKEN_ROLES: &str = "__UI_ROLES__";

/// Suffix appended to every compressed artifact name.
pub const COMPRESSION_SUFFIX: &str = ".gz";

/// Default build-tag file name inside the output directory.
pub const DEFAULT_TAG_FILE: &str = "ui_build_tag.txt";
/// Stamp file touched after every successful run.
pub const STAMP_FILE: &str = "assets.stamp";

/// Resolved filesystem layout for one packing run.
#[derive(Debug, Clone)]
pub struct BundleLayout {
    /// Directory holding the authored source assets.
    pub data_dir: PathBuf,
    /// Directory receiving compressed artifacts, the tag file and the stamp.
    pub out_dir: PathBuf,
    /// Explicit build tag override, if any.
    pub build_tag: Option<String>,
    /// Alternate path the build tag is read back from and persisted to.
    pub build_tag_file: Option<PathBuf>,
    /// Primary role substituted into the main script asset.
    pub role: String,
    /// Roles string substituted into the main script asset.
    pub roles: String,
    /// Root of the outer build tree probed for mirror destinations.
    pub build_root: PathBuf,
    /// Candidate mirror destinations, relative to `build_root`.
    pub mirror_dirs: Vec<PathBuf>,
}

impl BundleLayout {
    /// Artifact name for a source asset.
    pub fn artifact_name(asset: &str) -> String {
        format!("{asset}{COMPRESSION_SUFFIX}")
    }

    /// Path the resolved build tag is persisted to.
    pub fn tag_path(&self) -> PathBuf {
        match &self.build_tag_file {
            Some(path) => path.clone(),
            None => self.out_dir.join(DEFAULT_TAG_FILE),
        }
    }

    /// Path of the stamp file inside the output directory.
    pub fn stamp_path(&self) -> PathBuf {
        self.out_dir.join(STAMP_FILE)
    }
}
