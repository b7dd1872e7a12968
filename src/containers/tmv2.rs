#![allow(non_snake_case, non_upper_case_globals)]
#![cfg_attr(debug_assertions, allow(dead_code))]

use ::anyhow::Result;
use ::flate2::read::ZlibDecoder;
use crate::error::CoreError;
use crate::parser::Parser;
use crate::reader::DataReader;
use crate::version::VersionTriple;

use super::{recoverable, Recording, RecoveryMode};

const Magic: &[u8; 4] = b"TMV2";
const Compressed: u32 = 1 << 0;

pub fn queryVersion(bytes: &[u8]) -> Result<Option<VersionTriple>>
{
	if bytes.len() < 13 || &bytes[0..4] != Magic
	{
		return Ok(None);
	}
	let mut reader = DataReader::New(&bytes[4..]);
	let _options = reader.readU32()?;
	let _formatVersion = reader.readU16()?;
	let major = reader.readU8()? as u16;
	let minor = reader.readU8()? as u16;
	let preview = reader.readU8()?;
	Ok(Some(VersionTriple::New(major, minor, preview)))
}

pub fn parse(bytes: &[u8], parser: &mut Parser, recovery: RecoveryMode) -> Result<(Recording, bool)>
{
	let mut header = DataReader::New(bytes);
	let magic = header.readBytes(4)?;
	if magic != Magic
	{
		return Err(CoreError::InvalidData("missing TMV2 magic".into()).into());
	}

	let options = header.readU32()?;
	let _formatVersion = header.readU16()?;
	let _tibiaMajor = header.readU8()?;
	let _tibiaMinor = header.readU8()?;
	let _tibiaPreview = header.readU8()?;
	let _epoch = header.readU32()?;
	let count = header.readU32()?;
	let _unused = header.readU32()?;
	let decompressedSize = header.readU32()? as usize;

	let remaining = header.readBytes(header.remaining())?;
	let body = if options & Compressed != 0
	{
		decompress(&remaining, decompressedSize)?
	}
	else
	{
		remaining
	};

	let mut reader = DataReader::New(&body);
	let mut recording = Recording::default();
	let mut partial = false;

	for _ in 0..count
	{
		let outcome = parseRecord(&mut reader, parser, &mut recording);
		if !recoverable(recovery, outcome)?
		{
			partial = true;
			break;
		}
	}

	Ok((recording, partial))
}

fn parseRecord(reader: &mut DataReader, parser: &mut Parser, recording: &mut Recording) -> Result<()>
{
	let _outerLength = reader.readU16()?;
	let timestampMs = reader.readU32()?;
	let innerLength = reader.readU16()? as usize;
	let mut inner = reader.slice(innerLength)?;

	let events = parser.parsePacket(&mut inner)?;
	recording.pushFrame(timestampMs, events);
	Ok(())
}

fn decompress(bytes: &[u8], expectedSize: usize) -> Result<Vec<u8>>
{
	use std::io::Read;

	let mut decoder = ZlibDecoder::new(bytes);
	let mut plain = Vec::with_capacity(expectedSize);
	decoder.read_to_end(&mut plain)
		.map_err(|error| CoreError::InvalidData(format!("malformed zlib stream: {error}")))?;
	Ok(plain)
}

#[cfg(test)]
mod tests
{
	use super::*;

	#[test]
	fn QueryVersionRejectsMissingMagic()
	{
		assert!(queryVersion(b"NOPE").unwrap().is_none());
	}

	#[test]
	fn QueryVersionReadsTriple()
	{
		let mut bytes = vec![];
		bytes.extend_from_slice(Magic);
		bytes.extend_from_slice(&1u32.to_le_bytes());
		bytes.extend_from_slice(&1u16.to_le_bytes());
		bytes.push(7);
		bytes.push(40);
		bytes.push(0);

		let version = queryVersion(&bytes).unwrap().unwrap();
		assert_eq!(VersionTriple::New(7, 40, 0), version);
	}
}
