#![allow(non_snake_case, non_upper_case_globals)]
#![cfg_attr(debug_assertions, allow(dead_code))]

use ::anyhow::Result;
use crate::error::CoreError;
use crate::reader::DataReader;

/** Minimum inner-frame buffer size; formats declaring a larger header length still fit within this. */
const MinBufferSize: usize = 128 * 1024;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum DemuxState
{
	AwaitingHeader,
	AwaitingPayload { length: usize, firstTimestampMs: u32 },
}

/**
A stateful reassembler for length-prefixed inner frames split arbitrarily
across outer container records. Configured once with a header width (2 or
4 bytes); `submit` may be called any number of times with successive
outer fragments, and invokes `callback` once per fully reassembled inner
frame, stamped with the timestamp of the fragment that started it.
*/
pub struct Demuxer
{
	headerSize: usize,
	state: DemuxState,
	buffer: Vec<u8>,
}

impl Demuxer
{
	pub fn New(headerSize: usize) -> Self
	{
		assert!(headerSize == 2 || headerSize == 4, "demuxer header size must be 2 or 4 bytes");
		Self { headerSize, state: DemuxState::AwaitingHeader, buffer: Vec::with_capacity(MinBufferSize) }
	}

	/**
	Feed `reader`'s remaining bytes (all from one outer record stamped
	`timestampMs`) into the reassembler, invoking `callback` for every
	inner frame completed along the way.
	*/
	pub fn submit(&mut self, timestampMs: u32, reader: &mut DataReader, mut callback: impl FnMut(&mut DataReader, u32) -> Result<()>) -> Result<()>
	{
		while !reader.isAtEnd()
		{
			match self.state
			{
				DemuxState::AwaitingHeader =>
				{
					let need = self.headerSize - self.buffer.len();
					let take = need.min(reader.remaining());
					self.buffer.extend_from_slice(&reader.readBytes(take)?);

					if self.buffer.len() == self.headerSize
					{
						let length = self.decodeHeader()?;
						self.buffer.clear();

						if length > MinBufferSize
						{
							return Err(CoreError::InvalidData(format!(
								"demuxer frame length {length} exceeds buffer size {MinBufferSize}")).into());
						}

						self.state = DemuxState::AwaitingPayload { length, firstTimestampMs: timestampMs };
					}
				}

				DemuxState::AwaitingPayload { length, firstTimestampMs } =>
				{
					let need = length - self.buffer.len();
					let take = need.min(reader.remaining());
					self.buffer.extend_from_slice(&reader.readBytes(take)?);

					if self.buffer.len() == length
					{
						let mut payloadReader = DataReader::New(&self.buffer);
						callback(&mut payloadReader, firstTimestampMs)?;
						self.buffer.clear();
						self.state = DemuxState::AwaitingHeader;
					}
				}
			}
		}

		Ok(())
	}

	fn decodeHeader(&self) -> Result<usize>
	{
		Ok(if self.headerSize == 2
		{
			u16::from_le_bytes([self.buffer[0], self.buffer[1]]) as usize
		}
		else
		{
			u32::from_le_bytes([self.buffer[0], self.buffer[1], self.buffer[2], self.buffer[3]]) as usize
		})
	}

	/** Fails if a frame is still being assembled; called once all outer records have been submitted. */
	pub fn finish(&self) -> Result<()>
	{
		match self.state
		{
			DemuxState::AwaitingHeader if self.buffer.is_empty() => Ok(()),
			_ => Err(CoreError::InvalidData("demuxer finished mid-frame".into()).into()),
		}
	}
}

#[cfg(test)]
mod tests
{
	use super::*;

	#[test]
	fn ReassemblesFrameSplitAcrossSubmissions()
	{
		let mut demux = Demuxer::New(2);
		let mut seen = vec![];

		let mut first = DataReader::New(&[3, 0, b'a']);
		demux.submit(100, &mut first, |reader, ts| { seen.push((reader.readBytes(reader.remaining())?, ts)); Ok(()) }).unwrap();

		let mut second = DataReader::New(&[b'b', b'c']);
		demux.submit(200, &mut second, |reader, ts| { seen.push((reader.readBytes(reader.remaining())?, ts)); Ok(()) }).unwrap();

		assert_eq!(1, seen.len());
		assert_eq!(b"abc".to_vec(), seen[0].0);
		assert_eq!(100, seen[0].1);
	}

	#[test]
	fn OversizedFrameIsFatal()
	{
		let mut demux = Demuxer::New(4);
		let oversized = (MinBufferSize as u32 + 1).to_le_bytes();
		let mut reader = DataReader::New(&oversized);
		assert!(demux.submit(0, &mut reader, |_, _| Ok(())).is_err());
	}

	#[test]
	fn FinishFailsMidFrame()
	{
		let mut demux = Demuxer::New(2);
		let mut reader = DataReader::New(&[5, 0, b'x']);
		demux.submit(0, &mut reader, |_, _| Ok(())).unwrap();
		assert!(demux.finish().is_err());
	}

	#[test]
	fn FinishSucceedsAtFrameBoundary()
	{
		let mut demux = Demuxer::New(2);
		let mut reader = DataReader::New(&[1, 0, b'x']);
		demux.submit(0, &mut reader, |_, _| Ok(())).unwrap();
		assert!(demux.finish().is_ok());
	}
}
