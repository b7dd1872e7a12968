#![allow(non_snake_case, non_upper_case_globals)]
#![cfg_attr(debug_assertions, allow(dead_code))]

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use ::anyhow::{Context, Result};
use ::serde::{Deserialize, Serialize};
use crate::containers::Format;
use crate::version::VersionTriple;

const IndexFileName: &str = "index.json";

#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize)]
pub struct IndexedVersion
{
	pub Major: u16,
	pub Minor: u16,
	pub Preview: u8,
}

impl From<VersionTriple> for IndexedVersion
{
	fn from(triple: VersionTriple) -> Self
	{
		Self { Major: triple.major, Minor: triple.minor, Preview: triple.preview }
	}
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct VideoFileEntry
{
	pub Format: String,
	pub Version: IndexedVersion,
	pub Names: Vec<String>,
	pub Runtime: i64,
}

/** The persisted layout of a library root: `dat/`, `pic/`, `spr/`, `videos/`, plus this index. */
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct Index
{
	pub Version: u32,
	pub DatFiles: Vec<u32>,
	pub PicFiles: Vec<u32>,
	pub SprFiles: Vec<u32>,
	pub VideoFiles: HashMap<String, VideoFileEntry>,
}

impl Index
{
	/** Loads `root/index.json`, or an empty index if the file doesn't exist yet. */
	pub fn load(root: &Path) -> Result<Self>
	{
		let path = root.join(IndexFileName);
		if !path.exists()
		{
			return Ok(Self::default());
		}

		let text = fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))?;
		::serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
	}

	/** Writes `root/index.json` atomically: serialize to a temp file, then rename over the target. */
	pub fn save(&self, root: &Path) -> Result<()>
	{
		let path = root.join(IndexFileName);
		let tempPath = root.join(format!("{IndexFileName}.tmp"));

		let text = ::serde_json::to_string_pretty(self)?;
		fs::write(&tempPath, text).with_context(|| format!("writing {}", tempPath.display()))?;
		fs::rename(&tempPath, &path).with_context(|| format!("renaming {} to {}", tempPath.display(), path.display()))?;
		Ok(())
	}

	pub fn recordingPath(root: &Path, checksumHex: &str) -> PathBuf
	{
		root.join("videos").join(checksumHex)
	}

	pub fn dataPath(root: &Path, signature: u32, kind: crate::collation::DataFileKind) -> PathBuf
	{
		let subfolder = match kind
		{
			crate::collation::DataFileKind::Dat => "dat",
			crate::collation::DataFileKind::Pic => "pic",
			crate::collation::DataFileKind::Spr => "spr",
		};
		root.join(subfolder).join(format!("{signature:08x}"))
	}
}

pub fn formatName(format: Format) -> &'static str
{
	match format
	{
		Format::Cam => "cam",
		Format::Rec => "rec",
		Format::Tibiacast => "tibiacast",
		Format::Tmv1 => "tmv1",
		Format::Tmv2 => "tmv2",
		Format::Trp => "trp",
		Format::Ttm => "ttm",
		Format::Yatc => "yatc",
	}
}

#[cfg(test)]
mod tests
{
	use super::*;

	#[test]
	fn LoadOnMissingFileReturnsEmptyIndex()
	{
		let index = Index::load(Path::new("/nonexistent-library-root")).unwrap();
		assert_eq!(0, index.DatFiles.len());
	}

	#[test]
	fn SaveThenLoadRoundTrips()
	{
		let dir = std::env::temp_dir().join(format!("tile-mmo-recorder-library-test-{}", std::process::id()));
		let _ = fs::create_dir_all(&dir);

		let mut index = Index::default();
		index.DatFiles.push(0xDEADBEEF);
		index.save(&dir).unwrap();

		let reloaded = Index::load(&dir).unwrap();
		assert_eq!(vec![0xDEADBEEFu32], reloaded.DatFiles);

		let _ = fs::remove_dir_all(&dir);
	}

	#[test]
	fn DataPathNestsUnderKindSubfolder()
	{
		let path = Index::dataPath(Path::new("/lib"), 0x4B12, crate::collation::DataFileKind::Spr);
		assert_eq!(Path::new("/lib/spr/00004b12"), path);
	}
}
