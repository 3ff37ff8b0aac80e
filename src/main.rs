use std::path::PathBuf;

use clap::Parser;
use color_print::ceprintln;

use embedded_ui_bundler::config::BundlerConfig;
use embedded_ui_bundler::minify::MinifierSet;
use embedded_ui_bundler::mirror::mirror_into_build;
use embedded_ui_bundler::pipeline::pack_assets;

/// Package web UI assets for embedding into the firmware image.
#[derive(Parser)]
#[command(version, about)]
struct Cli {
  /// Project root that relative paths and defaults are resolved against.
  #[arg(long, default_value = ".")]
  root: PathBuf,

  /// Source directory holding the authored assets.
  #[arg(long)]
  data_dir: Option<String>,

  /// Output directory for compressed artifacts.
  #[arg(long, env = "OUT_DIR")]
  out_dir: Option<String>,

  /// Explicit build tag overriding all other tag sources.
  #[arg(long, env = "UI_BUILD_TAG")]
  tag: Option<String>,

  /// File the build tag is read back from and written to.
  #[arg(long, env = "UI_BUILD_TAG_FILE")]
  tag_file: Option<String>,

  /// Primary role substituted into the main script asset.
  #[arg(long, env = "UI_ROLE")]
  role: Option<String>,

  /// Roles string substituted into the main script asset.
  #[arg(long, env = "UI_ROLES")]
  roles: Option<String>,

  /// Root of the outer build tree probed for mirror destinations.
  #[arg(long)]
  build_root: Option<String>,

  /// Enable the built-in minification transforms.
  #[arg(long)]
  minify: bool,

  /// Skip copying artifacts into the outer build tree.
  #[arg(long)]
  no_mirror: bool,
}

fn main() {
  let cli = Cli::parse();

  if let Err(err) = run(cli) {
    ceprintln!("<r!><s>Error:</></> {err:#}");
    std::process::exit(1);
  }
}

fn run(cli: Cli) -> anyhow::Result<()> {
  let mut config = BundlerConfig::discover(&cli.root);
  if let Some(data_dir) = cli.data_dir {
    config.data_dir = data_dir;
  }
  if let Some(out_dir) = cli.out_dir {
    config.out_dir = out_dir;
  }
  if cli.tag.is_some() {
    config.build_tag = cli.tag;
  }
  if cli.tag_file.is_some() {
    config.build_tag_file = cli.tag_file;
  }
  if let Some(role) = cli.role {
    config.role = role;
  }
  if cli.roles.is_some() {
    config.roles = cli.roles;
  }
  if let Some(build_root) = cli.build_root {
    config.build_root = build_root;
  }

  let layout = config.into_layout(&cli.root);
  let minifiers = if cli.minify {
    MinifierSet::builtin()
  } else {
    MinifierSet::disabled()
  };

  let outcome = pack_assets(&layout, &minifiers)?;
  if !cli.no_mirror {
    mirror_into_build(&outcome, &layout.build_root, &layout.mirror_dirs)?;
  }

  Ok(())
}
