#![allow(non_snake_case, non_upper_case_globals)]
#![cfg_attr(debug_assertions, allow(dead_code))]

use ::anyhow::Result;
use ::flate2::read::GzDecoder;
use crate::demux::Demuxer;
use crate::error::CoreError;
use crate::parser::Parser;
use crate::reader::DataReader;
use crate::version::VersionTriple;

use super::{recoverable, Recording, RecoveryMode};

fn inflate(bytes: &[u8]) -> Result<Vec<u8>>
{
	use std::io::Read;

	let mut decoder = GzDecoder::new(bytes);
	let mut plain = Vec::new();
	decoder.read_to_end(&mut plain)
		.map_err(|error| CoreError::InvalidData(format!("malformed gzip stream: {error}")))?;
	Ok(plain)
}

pub fn queryVersion(bytes: &[u8]) -> Result<Option<VersionTriple>>
{
	let plain = match inflate(bytes) { Ok(plain) => plain, Err(_) => return Ok(None) };
	if plain.len() < 4
	{
		return Ok(None);
	}
	let mut reader = DataReader::New(&plain);
	let _container = reader.readU16()?;
	let versionWord = reader.readU16()?;
	Ok(Some(VersionTriple::New(versionWord / 100, versionWord % 100, 0)))
}

pub fn parse(bytes: &[u8], parser: &mut Parser, recovery: RecoveryMode) -> Result<(Recording, bool)>
{
	let plain = inflate(bytes)?;
	let mut reader = DataReader::New(&plain);

	let _container = reader.readU16()?;
	let _versionWord = reader.readU16()?;
	let _runtime = reader.readU32()?;

	let mut recording = Recording::default();
	let mut demuxer = Demuxer::New(2);
	let mut partial = false;
	let mut timestampMs: u32 = 0;

	while !reader.isAtEnd()
	{
		let tag = reader.readU8()?;
		if tag == 0
		{
			let delay = reader.readU32()?;
			timestampMs += delay;
		}

		let length = reader.readU16()? as usize;
		let payload = reader.readBytes(length)?;

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

#[cfg(test)]
mod tests
{
	use super::*;

	#[test]
	fn QueryVersionOnNonGzipBytesIsNone()
	{
		assert!(queryVersion(&[1, 2, 3, 4]).unwrap().is_none());
	}
}
