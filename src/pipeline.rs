//! Packing pipeline turning authored assets into compressed artifacts.

use std::fs;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use chrono::Utc;
use flate2::Compression;
use flate2::write::GzEncoder;

use crate::minify::MinifierSet;
use crate::models::{PackOutcome, PackedAsset, Substitutions};
use crate::project::{
  BundleLayout, MAIN_SCRIPT_ASSET, REQUIRED_ASSETS, TOKEN_BUILD_TAG, TOKEN_ROLE, TOKEN_ROLES,
};
use crate::tag::{resolve_build_tag, write_build_tag};

/// Pack every required asset and finalize the run.
///
/// Assets are processed in the fixed order of [`REQUIRED_ASSETS`]; a missing
/// source file aborts the run with the expected path in the error. Artifacts
/// already written stay on disk, downstream tooling only consumes the output
/// directory after a fully successful run.
pub fn pack_assets(layout: &BundleLayout, minifiers: &MinifierSet) -> Result<PackOutcome> {
  let build_tag = resolve_build_tag(
    layout.build_tag.as_deref(),
    layout.build_tag_file.as_deref(),
  );
  let substitutions = Substitutions {
    build_tag: build_tag.clone(),
    role: layout.role.clone(),
    roles: layout.roles.clone(),
  };

  fs::create_dir_all(&layout.out_dir)
    .with_context(|| format!("failed to create {}", layout.out_dir.display()))?;

  let mut artifacts = Vec::with_capacity(REQUIRED_ASSETS.len());
  for name in REQUIRED_ASSETS {
    let source = layout.data_dir.join(name);
    if !source.exists() {
      return Err(anyhow!("missing asset: {}", source.display()));
    }

    let payload = load_payload(&source, name, &substitutions, minifiers)?;
    let artifact_path = layout.out_dir.join(BundleLayout::artifact_name(name));
    write_gzip(&payload, &artifact_path)?;
    println!(
      "Wrote {} ({} bytes raw)",
      artifact_path.display(),
      payload.len()
    );

    artifacts.push(PackedAsset {
      name: name.to_string(),
      raw_len: payload.len(),
      path: artifact_path,
    });
  }

  let tag_path = layout.tag_path();
  write_build_tag(&build_tag, &tag_path)?;
  println!("Wrote build tag {} -> {}", build_tag, tag_path.display());

  let stamp_path = layout.stamp_path();
  write_stamp(&stamp_path)?;
  println!("Updated stamp {}", stamp_path.display());

  Ok(PackOutcome {
    build_tag,
    tag_path,
    stamp_path,
    artifacts,
  })
}

/// Read one asset and apply substitution or minification as appropriate.
///
/// The main script asset always takes the substitution path; minification
/// only applies to the remaining assets whose extension has a registered
/// transform.
fn load_payload(
  source: &Path,
  name: &str,
  substitutions: &Substitutions,
  minifiers: &MinifierSet,
) -> Result<Vec<u8>> {
  if name == MAIN_SCRIPT_ASSET {
    let text = fs::read_to_string(source)
      .with_context(|| format!("failed to read {}", source.display()))?;
    let text = text
      .replace(TOKEN_BUILD_TAG, &substitutions.build_tag)
      .replace(TOKEN_ROLE, &substitutions.role)
      .replace(TOKEN_ROLES, &substitutions.roles);
    return Ok(text.into_bytes());
  }

  let extension = source.extension().and_then(|ext| ext.to_str()).unwrap_or("");
  if let Some(minify) = minifiers.get(extension) {
    let text = fs::read_to_string(source)
      .with_context(|| format!("failed to read {}", source.display()))?;
    return Ok(minify(&text).into_bytes());
  }

  fs::read(source).with_context(|| format!("failed to read {}", source.display()))
}

/// Gzip the payload at maximum effort and write it to `path`.
fn write_gzip(payload: &[u8], path: &Path) -> Result<()> {
  let file =
    fs::File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
  let mut encoder = GzEncoder::new(file, Compression::best());
  encoder
    .write_all(payload)
    .with_context(|| format!("failed to compress {}", path.display()))?;
  encoder
    .finish()
    .with_context(|| format!("failed to finish {}", path.display()))?;
  Ok(())
}

/// Touch the stamp file so stale build directories pick up fresh assets.
fn write_stamp(path: &Path) -> Result<()> {
  fs::write(path, Utc::now().timestamp().to_string())
    .with_context(|| format!("failed to write {}", path.display()))
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::io::Read;
  use std::path::PathBuf;

  use flate2::read::GzDecoder;
  use tempfile::{TempDir, tempdir};

  use crate::project::{DEFAULT_TAG_FILE, STAMP_FILE};

  fn write_source_tree(root: &Path) {
    let data_dir = root.join("data");
    fs::create_dir_all(&data_dir).unwrap();
    fs::write(data_dir.join("index.html"), "<html><body>bed</body></html>").unwrap();
    fs::write(
      data_dir.join("app.js"),
      "const TAG = '__UI_BUILD_TAG__';\nconst ROLE = '__UI_ROLE__';\n",
    )
    .unwrap();
    fs::write(data_dir.join("bed-visualizer.js"), "draw();\n").unwrap();
    fs::write(data_dir.join("style.css"), "body {\n  color: red;\n}\n").unwrap();
    fs::write(data_dir.join("sw.js"), "self.addEventListener('fetch', noop);\n").unwrap();
    fs::write(data_dir.join("branding.json"), "{\n  \"name\": \"bed\"\n}").unwrap();
    fs::write(data_dir.join("favicon.png"), [0x89u8, 0x50, 0x4e, 0x47, 0x00, 0x01]).unwrap();
  }

  fn layout(root: &Path) -> BundleLayout {
    BundleLayout {
      data_dir: root.join("data"),
      out_dir: root.join("embedded"),
      build_tag: None,
      build_tag_file: None,
      role: "bed".into(),
      roles: "bed".into(),
      build_root: root.join("build"),
      mirror_dirs: Vec::new(),
    }
  }

  fn packed_tree() -> (TempDir, BundleLayout, PackOutcome) {
    let temp = tempdir().unwrap();
    write_source_tree(temp.path());
    let layout = layout(temp.path());
    let outcome = pack_assets(&layout, &MinifierSet::disabled()).unwrap();
    (temp, layout, outcome)
  }

  fn decompress(path: &Path) -> Vec<u8> {
    let file = fs::File::open(path).unwrap();
    let mut decoder = GzDecoder::new(file);
    let mut payload = Vec::new();
    decoder.read_to_end(&mut payload).unwrap();
    payload
  }

  #[test]
  fn packs_one_artifact_per_required_asset() {
    let (_temp, layout, outcome) = packed_tree();

    assert_eq!(outcome.artifacts.len(), REQUIRED_ASSETS.len());
    for (asset, artifact) in REQUIRED_ASSETS.iter().zip(&outcome.artifacts) {
      assert_eq!(artifact.name, *asset);
      assert_eq!(
        artifact.path,
        layout.out_dir.join(format!("{asset}.gz"))
      );
      assert!(artifact.path.exists());
    }

    let mut entries: Vec<PathBuf> = fs::read_dir(&layout.out_dir)
      .unwrap()
      .map(|entry| entry.unwrap().path())
      .filter(|path| path.extension().is_some_and(|ext| ext == "gz"))
      .collect();
    entries.sort();
    assert_eq!(entries.len(), REQUIRED_ASSETS.len());
  }

  #[test]
  fn untouched_assets_survive_compression_byte_identical() {
    let (temp, layout, _outcome) = packed_tree();

    for asset in ["style.css", "favicon.png", "branding.json"] {
      let original = fs::read(temp.path().join("data").join(asset)).unwrap();
      let restored = decompress(&layout.out_dir.join(format!("{asset}.gz")));
      assert_eq!(restored, original, "payload drifted for {asset}");
    }
  }

  #[test]
  fn substitutes_tokens_in_main_script() {
    let temp = tempdir().unwrap();
    write_source_tree(temp.path());
    fs::write(
      temp.path().join("data").join("app.js"),
      "__UI_BUILD_TAG__ __UI_ROLE__ __UI_ROLES__",
    )
    .unwrap();

    let mut layout = layout(temp.path());
    layout.build_tag = Some("release-42".into());
    layout.roles = "bed,light".into();

    let outcome = pack_assets(&layout, &MinifierSet::disabled()).unwrap();
    assert_eq!(outcome.build_tag, "release-42");

    let restored = decompress(&layout.out_dir.join("app.js.gz"));
    assert_eq!(restored, b"release-42 bed bed,light");
  }

  #[test]
  fn synthesized_tag_reaches_main_script_and_tag_file() {
    let temp = tempdir().unwrap();
    write_source_tree(temp.path());
    fs::write(
      temp.path().join("data").join("app.js"),
      "__UI_BUILD_TAG__ __UI_ROLE__ __UI_ROLES__",
    )
    .unwrap();

    let layout = layout(temp.path());
    let outcome = pack_assets(&layout, &MinifierSet::disabled()).unwrap();

    assert!(outcome.build_tag.starts_with("UI_BUILD_"));
    let restored = String::from_utf8(decompress(&layout.out_dir.join("app.js.gz"))).unwrap();
    assert_eq!(restored, format!("{} bed bed", outcome.build_tag));

    let written = fs::read_to_string(layout.out_dir.join(DEFAULT_TAG_FILE)).unwrap();
    assert_eq!(written, outcome.build_tag);
  }

  #[test]
  fn missing_asset_aborts_with_expected_path() {
    let temp = tempdir().unwrap();
    write_source_tree(temp.path());
    fs::remove_file(temp.path().join("data").join("sw.js")).unwrap();

    let layout = layout(temp.path());
    let err = pack_assets(&layout, &MinifierSet::disabled()).unwrap_err();
    assert!(err.to_string().contains("sw.js"), "unexpected error {err}");
    assert!(!layout.out_dir.join("sw.js.gz").exists());
  }

  #[test]
  fn registered_minifier_transforms_payload() {
    let temp = tempdir().unwrap();
    write_source_tree(temp.path());

    let layout = layout(temp.path());
    pack_assets(&layout, &MinifierSet::builtin()).unwrap();

    let restored = decompress(&layout.out_dir.join("style.css.gz"));
    assert_eq!(restored, b"body{color:red}");
  }

  #[test]
  fn finalizer_writes_stamp_and_honours_tag_file_path() {
    let temp = tempdir().unwrap();
    write_source_tree(temp.path());

    let mut layout = layout(temp.path());
    layout.build_tag = Some("release-42".into());
    layout.build_tag_file = Some(temp.path().join("tags").join("current.txt"));

    let outcome = pack_assets(&layout, &MinifierSet::disabled()).unwrap();

    assert_eq!(outcome.tag_path, temp.path().join("tags").join("current.txt"));
    assert_eq!(fs::read_to_string(&outcome.tag_path).unwrap(), "release-42");
    assert!(layout.out_dir.join(STAMP_FILE).exists());
    let stamp = fs::read_to_string(&outcome.stamp_path).unwrap();
    assert!(stamp.parse::<i64>().is_ok(), "unexpected stamp {stamp}");
  }

  #[test]
  fn reuses_tag_from_existing_tag_file() {
    let temp = tempdir().unwrap();
    write_source_tree(temp.path());

    let tag_file = temp.path().join("tag.txt");
    fs::write(&tag_file, "nightly-7\n").unwrap();

    let mut layout = layout(temp.path());
    layout.build_tag_file = Some(tag_file.clone());

    let outcome = pack_assets(&layout, &MinifierSet::disabled()).unwrap();
    assert_eq!(outcome.build_tag, "nightly-7");
    assert_eq!(fs::read_to_string(&tag_file).unwrap(), "nightly-7");
  }
}
