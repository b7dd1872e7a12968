#![allow(non_snake_case, non_upper_case_globals)]
#![cfg_attr(debug_assertions, allow(dead_code))]

mod cam;
mod rec;
mod tibiacast;
mod tmv1;
mod tmv2;
mod trp;
mod ttm;
mod yatc;

use ::anyhow::Result;
use crate::error::CoreError;
use crate::events::Event;
use crate::parser::Parser;
use crate::version::VersionTriple;

/** One demuxed, parsed inner packet's worth of events, stamped with its recording-relative timestamp. */
#[derive(Clone, Debug, Default)]
pub struct Frame
{
	pub timestampMs: u32,
	pub events: Vec<Event>,
}

/** The fully decoded contents of one capture file. */
#[derive(Clone, Debug, Default)]
pub struct Recording
{
	pub runtimeMs: u32,
	pub frames: Vec<Frame>,
}

impl Recording
{
	fn pushFrame(&mut self, timestampMs: u32, events: Vec<Event>)
	{
		if !events.is_empty()
		{
			self.frames.push(Frame { timestampMs, events });
		}
	}
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Format
{
	Cam,
	Rec,
	Tibiacast,
	Tmv1,
	Tmv2,
	Trp,
	Ttm,
	Yatc,
}

impl Format
{
	pub fn fromExtension(extension: &str) -> Option<Self>
	{
		Some(match extension.to_ascii_lowercase().as_str()
		{
			"cam" => Format::Cam,
			"rec" => Format::Rec,
			"tibiacast" => Format::Tibiacast,
			"tmv1" => Format::Tmv1,
			"tmv2" => Format::Tmv2,
			"trp" => Format::Trp,
			"ttm" => Format::Ttm,
			"yatc" => Format::Yatc,
			_ => return None,
		})
	}

	/** Byte-pattern heuristic used when the extension is missing or unrecognised. */
	pub fn detect(bytes: &[u8]) -> Option<Self>
	{
		if bytes.len() >= 4 && &bytes[0..4] == b"TMV2"
		{
			return Some(Format::Tmv2);
		}
		if bytes.len() >= 2 && bytes[0] == 0x13 && bytes[1] == 0x37
		{
			return Some(Format::Trp);
		}
		if bytes.len() >= 2 && matches!(u16::from_le_bytes([bytes[0], bytes[1]]), 259 | 515..=518)
		{
			return Some(Format::Rec);
		}
		None
	}
}

/**
How a Container Reader responds to a mid-stream `InvalidDataError`. `None`
propagates it to the caller; `PartialReturn` stops and hands back whatever
was decoded so far with `partial=true`; `Repair` additionally resynchronizes
by rescanning for a recognisable packet prefix (Rec format only).
*/
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RecoveryMode
{
	None,
	PartialReturn,
	Repair,
}

/** Probe a file's bytes for the protocol version it was recorded against, without fully decoding it. */
pub fn queryVersion(format: Format, bytes: &[u8]) -> Result<Option<VersionTriple>>
{
	Ok(match format
	{
		Format::Cam => cam::queryVersion(bytes)?,
		Format::Rec => rec::queryVersion(bytes)?,
		Format::Tibiacast => tibiacast::queryVersion(bytes)?,
		Format::Tmv1 => tmv1::queryVersion(bytes)?,
		Format::Tmv2 => tmv2::queryVersion(bytes)?,
		Format::Trp => trp::queryVersion(bytes)?,
		Format::Ttm => ttm::queryVersion(bytes)?,
		Format::Yatc => yatc::queryVersion(bytes)?,
	})
}

/** Decode `bytes` into a `Recording`, returning whether recovery cut it short. */
pub fn parse(format: Format, bytes: &[u8], parser: &mut Parser, recovery: RecoveryMode) -> Result<(Recording, bool)>
{
	match format
	{
		Format::Cam => cam::parse(bytes, parser, recovery),
		Format::Rec => rec::parse(bytes, parser, recovery),
		Format::Tibiacast => tibiacast::parse(bytes, parser, recovery),
		Format::Tmv1 => tmv1::parse(bytes, parser, recovery),
		Format::Tmv2 => tmv2::parse(bytes, parser, recovery),
		Format::Trp => trp::parse(bytes, parser, recovery),
		Format::Ttm => ttm::parse(bytes, parser, recovery),
		Format::Yatc => yatc::parse(bytes, parser, recovery),
	}
}

/**
Runs `step`, which decodes one inner frame's events, while honoring
`recovery`'s stop-on-error policy. Returns `Ok(true)` to keep iterating,
`Ok(false)` once recovery has decided to stop (the caller should return
`partial=true`), or an error when `recovery` is `None`.
*/
fn recoverable(recovery: RecoveryMode, result: Result<()>) -> Result<bool>
{
	match result
	{
		Ok(()) => Ok(true),
		Err(error) =>
		{
			let isInvalidData = error.downcast_ref::<CoreError>().map(CoreError::isInvalidData).unwrap_or(false);
			match (recovery, isInvalidData)
			{
				(RecoveryMode::None, _) | (_, false) => Err(error),
				(RecoveryMode::PartialReturn, true) | (RecoveryMode::Repair, true) => Ok(false),
			}
		}
	}
}

#[cfg(test)]
mod tests
{
	use super::*;

	#[test]
	fn DetectsTmv2ByMagic()
	{
		assert_eq!(Some(Format::Tmv2), Format::detect(b"TMV2\x01\x00\x00\x00"));
	}

	#[test]
	fn DetectsTrpByMagic()
	{
		assert_eq!(Some(Format::Trp), Format::detect(&[0x13, 0x37, 0, 0]));
	}

	#[test]
	fn FormatFromExtensionIsCaseInsensitive()
	{
		assert_eq!(Some(Format::Cam), Format::fromExtension("CAM"));
	}

	#[test]
	fn UnrecognisedExtensionIsNone()
	{
		assert_eq!(None, Format::fromExtension("mp4"));
	}
}
