#![allow(non_snake_case, non_upper_case_globals)]
#![cfg_attr(debug_assertions, allow(dead_code))]

use ::anyhow::Result;
use crate::parser::Parser;
use crate::reader::DataReader;
use crate::version::VersionTriple;

use super::{recoverable, Recording, RecoveryMode};

const FixedDelayMs: u32 = 1000;

pub fn queryVersion(bytes: &[u8]) -> Result<Option<VersionTriple>>
{
	if bytes.len() < 2
	{
		return Ok(None);
	}
	let mut reader = DataReader::New(bytes);
	let versionWord = reader.readU16()?;
	Ok(Some(VersionTriple::New(versionWord / 100, versionWord % 100, 0)))
}

pub fn parse(bytes: &[u8], parser: &mut Parser, recovery: RecoveryMode) -> Result<(Recording, bool)>
{
	let mut reader = DataReader::New(bytes);

	let _versionWord = reader.readU16()?;
	let serverNameLength = reader.readU8()? as usize;
	let _serverName = reader.readBytes(serverNameLength)?;
	if serverNameLength > 0
	{
		let _port = reader.readU16()?;
	}
	let _runtime = reader.readU32()?;

	let mut recording = Recording::default();
	let mut partial = false;
	let mut timestampMs: u32 = 0;

	while !reader.isAtEnd()
	{
		let outcome = parseRecord(&mut reader, parser, &mut recording, &mut timestampMs);
		if !recoverable(recovery, outcome)?
		{
			partial = true;
			break;
		}
	}

	Ok((recording, partial))
}

fn parseRecord(reader: &mut DataReader, parser: &mut Parser, recording: &mut Recording, timestampMs: &mut u32) -> Result<()>
{
	let length = reader.readU16()? as usize;
	let mut packet = reader.slice(length)?;
	let tag = reader.readU8()?;

	if tag == 0
	{
		*timestampMs += reader.readU16()? as u32;
	}
	else
	{
		*timestampMs += FixedDelayMs;
	}

	let events = parser.parsePacket(&mut packet)?;
	recording.pushFrame(*timestampMs, events);
	Ok(())
}

#[cfg(test)]
mod tests
{
	use super::*;

	#[test]
	fn QueryVersionDecodesPackedWord()
	{
		let bytes = [84u8, 2]; // 0x0254 = 596 -> (5, 96, 0)
		let version = queryVersion(&bytes).unwrap().unwrap();
		assert_eq!(VersionTriple::New(5, 96, 0), version);
	}
}
