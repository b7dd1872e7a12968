#![allow(non_snake_case, non_upper_case_globals)]
#![cfg_attr(debug_assertions, allow(dead_code))]

use ::anyhow::Result;
use crate::parser::Parser;
use crate::reader::DataReader;
use crate::version::VersionTriple;

use super::{recoverable, Recording, RecoveryMode};

const Magic: u16 = 0x1337;

fn skipOptionalMagic(reader: &mut DataReader) -> Result<()>
{
	let marker = reader.peek(2)?;
	if u16::from_le_bytes([marker[0], marker[1]]) == Magic
	{
		reader.skip(2)?;
		reader.skip(2)?; // two further skipped bytes once the magic is present
	}
	Ok(())
}

pub fn queryVersion(bytes: &[u8]) -> Result<Option<VersionTriple>>
{
	if bytes.len() < 2
	{
		return Ok(None);
	}
	let mut reader = DataReader::New(bytes);
	skipOptionalMagic(&mut reader)?;
	let versionWord = reader.readU16()?;
	Ok(Some(VersionTriple::New(versionWord / 100, versionWord % 100, 0)))
}

pub fn parse(bytes: &[u8], parser: &mut Parser, recovery: RecoveryMode) -> Result<(Recording, bool)>
{
	let mut reader = DataReader::New(bytes);
	skipOptionalMagic(&mut reader)?;

	let _versionWord = reader.readU16()?;
	let _runtime = reader.readU32()?;
	let count = reader.readU32()?;

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
	let timestampMs = reader.readU32()?;
	let length = reader.readU16()? as usize;
	let mut packet = reader.slice(length)?;
	let events = parser.parsePacket(&mut packet)?;
	recording.pushFrame(timestampMs, events);
	Ok(())
}

#[cfg(test)]
mod tests
{
	use super::*;

	#[test]
	fn QueryVersionWithoutMagicReadsVersionDirectly()
	{
		let bytes = [40u8, 3]; // 0x0328 = 808 -> (8, 8, 0)
		let version = queryVersion(&bytes).unwrap().unwrap();
		assert_eq!(VersionTriple::New(8, 8, 0), version);
	}
}
