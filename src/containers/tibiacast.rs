#![allow(non_snake_case, non_upper_case_globals)]
#![cfg_attr(debug_assertions, allow(dead_code))]

use ::anyhow::Result;
use ::flate2::read::DeflateDecoder;
use crate::error::CoreError;
use crate::parser::Parser;
use crate::reader::DataReader;
use crate::version::VersionTriple;

use super::{recoverable, Recording, RecoveryMode};

const StateCorrection: u8 = 6;
const Initialization: u8 = 7;
const TibiaData: u8 = 8;
const OutgoingMessage: u8 = 9;

/** Tibiacast's container `(major, minor)` maps onto Tibia client versions via this table. */
fn tibiaVersionForContainer(major: u8, minor: u8) -> VersionTriple
{
	match (major, minor)
	{
		(3, 7) => VersionTriple::New(8, 62, 0),
		(_, 0..=2) => VersionTriple::New(7, 0, 0),
		(_, 3..=5) => VersionTriple::New(7, 4, 0),
		(_, 6) => VersionTriple::New(7, 9, 0),
		(_, 8) => VersionTriple::New(7, 92, 0),
		(_, 9) => VersionTriple::New(8, 0, 0),
		// Minor 10 maps to "9.83 old" per a non-distinguishing source comment; treated
		// identically to 9.83 since no corpus evidence separates the two.
		(_, 10) => VersionTriple::New(9, 83, 0),
		(_, 11) => VersionTriple::New(9, 86, 0),
		_ => VersionTriple::New(8, 62, 0),
	}
}

pub fn queryVersion(bytes: &[u8]) -> Result<Option<VersionTriple>>
{
	if bytes.len() < 2
	{
		return Ok(None);
	}
	Ok(Some(tibiaVersionForContainer(bytes[0], bytes[1])))
}

pub fn parse(bytes: &[u8], parser: &mut Parser, recovery: RecoveryMode) -> Result<(Recording, bool)>
{
	use std::io::Read;

	let mut header = DataReader::New(bytes);
	let major = header.readU8()?;
	let minor = header.readU8()?;
	let version = tibiaVersionForContainer(major, minor);

	if version.atLeast(9, 54)
	{
		let _runtime = header.readU32()?;
	}
	if version.atLeast(9, 80)
	{
		let _preview = header.readU8()?;
	}

	let compressed = header.readBytes(header.remaining())?;
	let mut decoder = DeflateDecoder::new(&compressed[..]);
	let mut plain = Vec::new();
	decoder.read_to_end(&mut plain)
		.map_err(|error| CoreError::InvalidData(format!("malformed deflate stream: {error}")))?;

	let mut inner = DataReader::New(&plain);
	let mut recording = Recording::default();
	let mut partial = false;

	while !inner.isAtEnd()
	{
		let timestampMs = inner.readU32()?;
		let length = if version.atLeast(9, 54) { inner.readU32()? as usize } else { inner.readU16()? as usize };
		let packetType = inner.readU8()?;
		let body = inner.readBytes(length)?;

		let outcome = match packetType
		{
			TibiaData => parseTibiaData(&body, parser, timestampMs, &mut recording),
			Initialization | StateCorrection | OutgoingMessage => Ok(()),
			other => Err(CoreError::InvalidData(format!("unrecognised tibiacast outer packet type {other}")).into()),
		};

		if !recoverable(recovery, outcome)?
		{
			partial = true;
			break;
		}
	}

	Ok((recording, partial))
}

/** A `TibiaData` body is a u16-count sequence of u16-length-prefixed inner wire packets. */
fn parseTibiaData(body: &[u8], parser: &mut Parser, timestampMs: u32, recording: &mut Recording) -> Result<()>
{
	let mut reader = DataReader::New(body);
	let count = reader.readU16()?;

	let mut events = vec![];
	for _ in 0..count
	{
		let length = reader.readU16()? as usize;
		let mut packet = reader.slice(length)?;
		events.extend(parser.parsePacket(&mut packet)?);
	}

	recording.pushFrame(timestampMs, events);
	Ok(())
}

#[cfg(test)]
mod tests
{
	use super::*;

	#[test]
	fn MapsContainerMinorToTibiaVersion()
	{
		assert_eq!(VersionTriple::New(8, 62, 0), tibiaVersionForContainer(0, 255));
		assert_eq!(VersionTriple::New(9, 83, 0), tibiaVersionForContainer(0, 10));
	}

	#[test]
	fn QueryVersionMatchesKnownSample()
	{
		let version = queryVersion(&[3, 7]).unwrap().unwrap();
		assert_eq!(VersionTriple::New(8, 62, 0), version);
	}
}
