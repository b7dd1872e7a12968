#![allow(non_snake_case, non_upper_case_globals)]
#![cfg_attr(debug_assertions, allow(dead_code))]

use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use ::anyhow::{Context, Result};
use ::sha1::{Digest, Sha1};

/** A SHA-1 digest, 20 bytes, used both as a recording's identity and as an asset file's storage key. */
#[derive(Clone, Copy, Eq, Hash, PartialEq)]
pub struct Checksum([u8; 20]);

impl Checksum
{
	pub fn New(bytes: [u8; 20]) -> Self
	{
		Self(bytes)
	}

	pub fn toHex(&self) -> String
	{
		self.0.iter().map(|byte| format!("{byte:02x}")).collect()
	}

	pub fn fromHex(hex: &str) -> Option<Self>
	{
		if hex.len() != 40
		{
			return None;
		}
		let mut bytes = [0u8; 20];
		for (index, byte) in bytes.iter_mut().enumerate()
		{
			*byte = u8::from_str_radix(&hex[index * 2..index * 2 + 2], 16).ok()?;
		}
		Some(Self(bytes))
	}
}

impl fmt::Debug for Checksum
{
	fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result
	{
		write!(formatter, "Checksum({})", self.toHex())
	}
}

/** A recording file discovered under a library root, identified by its content checksum. */
#[derive(Clone, Debug)]
pub struct RecordingFile
{
	pub path: PathBuf,
	pub checksum: Checksum,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DataFileKind
{
	Dat,
	Pic,
	Spr,
}

/** An asset file discovered under a library root, classified by its embedded signature. */
#[derive(Clone, Debug)]
pub struct DataFile
{
	pub path: PathBuf,
	pub signature: u32,
	pub kind: DataFileKind,
}

/** A set of recording checksums to exclude from collation, one hex string per line. */
#[derive(Clone, Debug, Default)]
pub struct DenyList(HashSet<Checksum>);

impl DenyList
{
	pub fn fromFile(path: &Path) -> Result<Self>
	{
		let text = fs::read_to_string(path)
			.with_context(|| format!("reading deny list {}", path.display()))?;

		let entries = text.lines()
			.map(str::trim)
			.filter(|line| !line.is_empty())
			.filter_map(Checksum::fromHex)
			.collect();

		Ok(Self(entries))
	}

	pub fn contains(&self, checksum: &Checksum) -> bool
	{
		self.0.contains(checksum)
	}
}

const RecordingExtensions: &[&str] = &["cam", "rec", "tibiacast", "tmv1", "tmv2", "trp", "ttm", "yatc"];
const DataExtensions: &[&str] = &["dat", "pic", "spr"];

fn hasExtension(path: &Path, extensions: &[&str]) -> bool
{
	path.extension()
		.and_then(|extension| extension.to_str())
		.map(|extension| extensions.iter().any(|candidate| candidate.eq_ignore_ascii_case(extension)))
		.unwrap_or(false)
}

/** Walks `root` one level deep, returning every file whose extension names a known recording format. */
pub fn gatherRecordingPaths(root: &Path) -> Result<Vec<PathBuf>>
{
	gatherByExtension(root, RecordingExtensions)
}

/** Walks `root` one level deep, returning every file whose extension names a known asset format. */
pub fn gatherDataPaths(root: &Path) -> Result<Vec<PathBuf>>
{
	gatherByExtension(root, DataExtensions)
}

fn gatherByExtension(root: &Path, extensions: &[&str]) -> Result<Vec<PathBuf>>
{
	let mut found = vec![];
	for entry in fs::read_dir(root).with_context(|| format!("scanning {}", root.display()))?
	{
		let entry = entry?;
		let path = entry.path();
		if path.is_file() && hasExtension(&path, extensions)
		{
			found.push(path);
		}
	}
	found.sort();
	Ok(found)
}

/** Reads and hashes every path from [`gatherRecordingPaths`] into `RecordingFile`s. */
pub fn gatherRecordingFiles(root: &Path) -> Result<Vec<RecordingFile>>
{
	gatherRecordingPaths(root)?
		.into_iter()
		.map(|path|
		{
			let bytes = fs::read(&path).with_context(|| format!("reading {}", path.display()))?;
			Ok(RecordingFile { checksum: sha1(&bytes), path })
		})
		.collect()
}

/** Reads and classifies every path from [`gatherDataPaths`] into `DataFile`s by its leading u32 signature. */
pub fn gatherDataFiles(root: &Path) -> Result<Vec<DataFile>>
{
	gatherDataPaths(root)?
		.into_iter()
		.filter_map(|path|
		{
			let kind = match path.extension().and_then(|extension| extension.to_str()).unwrap_or("").to_ascii_lowercase().as_str()
			{
				"dat" => DataFileKind::Dat,
				"pic" => DataFileKind::Pic,
				"spr" => DataFileKind::Spr,
				_ => return None,
			};

			let bytes = match fs::read(&path) { Ok(bytes) => bytes, Err(error) => return Some(Err(error.into())) };
			if bytes.len() < 4
			{
				return None;
			}
			let signature = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
			Some(Ok(DataFile { path, signature, kind }))
		})
		.collect()
}

/** Content-addresses a recording or asset file; not used for any security property. */
fn sha1(data: &[u8]) -> Checksum
{
	let mut hasher = Sha1::new();
	hasher.update(data);
	Checksum(hasher.finalize().into())
}

#[cfg(test)]
mod tests
{
	use super::*;

	#[test]
	fn Sha1OfEmptyInputMatchesKnownDigest()
	{
		assert_eq!("da39a3ee5e6b4b0d3255bfef95601890afd80709", sha1(b"").toHex());
	}

	#[test]
	fn Sha1OfAbcMatchesKnownDigest()
	{
		assert_eq!("a9993e364706816aba3e25717850c26c9cd0d89d", sha1(b"abc").toHex());
	}

	#[test]
	fn ChecksumHexRoundTrips()
	{
		let checksum = sha1(b"round trip me");
		let hex = checksum.toHex();
		assert_eq!(Some(checksum), Checksum::fromHex(&hex));
	}
}
