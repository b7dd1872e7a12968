#![allow(non_snake_case, non_upper_case_globals)]
#![cfg_attr(debug_assertions, allow(dead_code))]

use ::anyhow::Result;
use ::xz2::read::XzDecoder;
use ::xz2::stream::Stream;
use crate::demux::Demuxer;
use crate::error::CoreError;
use crate::parser::Parser;
use crate::reader::DataReader;
use crate::version::VersionTriple;

use super::{recoverable, Recording, RecoveryMode};

const HeaderSize: usize = 32;

/**
Reads the 4-byte version block at offset 32: `[major, minorTens, minorOnes,
_unused]`. `minor` is not a raw byte, it's `minorTens*10 + minorOnes` (so a
v7.40 capture stores `[7, 4, 0, _]`, not `[7, 40, _, _]`).
*/
pub fn queryVersion(bytes: &[u8]) -> Result<Option<VersionTriple>>
{
	if bytes.len() < HeaderSize + 4
	{
		return Ok(None);
	}
	let mut reader = DataReader::New(&bytes[HeaderSize..]);
	let major = reader.readU8()? as u16;
	let minorTens = reader.readU8()? as u16;
	let minorOnes = reader.readU8()? as u16;
	Ok(Some(VersionTriple::New(major, minorTens * 10 + minorOnes, 0)))
}

pub fn parse(bytes: &[u8], parser: &mut Parser, recovery: RecoveryMode) -> Result<(Recording, bool)>
{
	let mut header = DataReader::New(bytes);
	header.skip(HeaderSize)?;
	header.skip(4)?; // Tibia version block, already read by queryVersion

	let metaLength = header.readU32()?;
	header.skip(metaLength as usize)?;

	let compressedSize = header.readU32()? as usize;
	let properties = header.readBytes(5)?;
	let decompressedSize = header.readU64()?;
	let compressed = header.readBytes(compressedSize)?;

	let plain = decompressLzma(&properties, decompressedSize, &compressed)?;
	let mut inner = DataReader::New(&plain);
	inner.skip(2)?; // bogus container version

	let frameCount = inner.readI32()?;
	if frameCount < 58
	{
		return Err(CoreError::InvalidData(format!("cam frame count {frameCount} too small")).into());
	}
	let frameCount = frameCount - 57;

	let mut recording = Recording::default();
	let mut demuxer = Demuxer::New(2);
	let mut partial = false;

	for _ in 0..frameCount
	{
		let length = inner.readU16()? as usize;
		let timestampMs = inner.readU32()?;
		let payload = inner.readBytes(length)?;
		inner.skip(4)?; // fragment checksum, usually not even valid

		let mut frameReader = DataReader::New(&payload);
		let outcome = demuxer.submit(timestampMs, &mut frameReader, |packet, ts|
		{
			let events = parser.parsePacket(packet)?;
			recording.pushFrame(ts, events);
			Ok(())
		});

		if !recoverable(recovery, outcome)?
		{
			partial = true;
			break;
		}
	}

	Ok((recording, partial))
}

fn decompressLzma(properties: &[u8], decompressedSize: u64, compressed: &[u8]) -> Result<Vec<u8>>
{
	use std::io::Read;

	let mut alone = Vec::with_capacity(properties.len() + 8 + compressed.len());
	alone.extend_from_slice(properties);
	alone.extend_from_slice(&decompressedSize.to_le_bytes());
	alone.extend_from_slice(compressed);

	let stream = Stream::new_lzma_decoder(u64::MAX)
		.map_err(|error| CoreError::NotSupported(format!("LZMA decoder unavailable: {error}")))?;

	let mut decoder = XzDecoder::new_stream(&alone[..], stream);
	let mut plain = Vec::with_capacity(decompressedSize as usize);
	decoder.read_to_end(&mut plain)
		.map_err(|error| CoreError::InvalidData(format!("malformed LZMA stream: {error}")))?;

	Ok(plain)
}

#[cfg(test)]
mod tests
{
	use super::*;

	#[test]
	fn QueryVersionCombinesMinorFromTwoDigitBytes()
	{
		let mut bytes = vec![0u8; HeaderSize + 4];
		bytes[HeaderSize] = 7;
		bytes[HeaderSize + 1] = 4;
		bytes[HeaderSize + 2] = 0;
		let version = queryVersion(&bytes).unwrap().unwrap();
		assert_eq!(VersionTriple::New(7, 40, 0), version);
	}

	#[test]
	fn QueryVersionOnTruncatedHeaderIsNone()
	{
		assert!(queryVersion(&[1, 2, 3]).unwrap().is_none());
	}
}
