#![allow(non_snake_case, non_upper_case_globals)]
#![cfg_attr(debug_assertions, allow(dead_code))]

use ::anyhow::Result;
use crate::parser::Parser;
use crate::reader::DataReader;
use crate::version::VersionTriple;

use super::{recoverable, Recording, RecoveryMode};

/** YATC carries no embedded protocol version; callers must supply one via `--input-version`. */
pub fn queryVersion(_bytes: &[u8]) -> Result<Option<VersionTriple>>
{
	Ok(None)
}

pub fn parse(bytes: &[u8], parser: &mut Parser, recovery: RecoveryMode) -> Result<(Recording, bool)>
{
	let mut reader = DataReader::New(bytes);
	let mut recording = Recording::default();
	let mut partial = false;

	while !reader.isAtEnd()
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
	fn QueryVersionIsAlwaysNone()
	{
		assert!(queryVersion(&[1, 2, 3]).unwrap().is_none());
	}

	#[test]
	fn ParseOnEmptyBytesProducesNoFrames()
	{
		let mut parser = crate::parser::Parser::New(
			crate::version::Version::New(VersionTriple::New(7, 40, 0)).unwrap(),
			&crate::assets::AssetStore::default());
		let (recording, partial) = parse(&[], &mut parser, RecoveryMode::None).unwrap();
		assert!(recording.frames.is_empty());
		assert!(!partial);
	}
}
