#![allow(non_snake_case, non_upper_case_globals)]
#![cfg_attr(debug_assertions, allow(dead_code))]

use ::anyhow::Result;
use ::byteorder::{LittleEndian, ReadBytesExt};
use crate::bytes::Windows1252ToUtf8;
use crate::error::CoreError;

/**
A bounded, position-tracked, read-only view over a byte slice.

Every read validates that enough bytes remain and raises
[`CoreError::InvalidData`] on underflow; there is no silent truncation or
zero-fill anywhere in this type. `slice` hands out an independent child
reader over exactly `length` bytes and advances the parent past them,
which is how the Demuxer and Container Readers split an outer buffer into
inner frames without copying.
*/
#[derive(Clone, Debug)]
pub struct DataReader<'a>
{
	bytes: &'a [u8],
	position: usize,
}

impl<'a> DataReader<'a>
{
	pub fn New(bytes: &'a [u8]) -> Self
	{
		Self { bytes, position: 0 }
	}

	pub fn remaining(&self) -> usize
	{
		self.bytes.len() - self.position
	}

	pub fn position(&self) -> usize
	{
		self.position
	}

	pub fn isAtEnd(&self) -> bool
	{
		self.remaining() == 0
	}

	fn require(&self, count: usize) -> Result<()>
	{
		if self.remaining() < count
		{
			return Err(CoreError::InvalidData(format!(
				"underflow: needed {count} bytes, {} remain", self.remaining())).into());
		}
		Ok(())
	}

	pub fn readU8(&mut self) -> Result<u8>
	{
		self.require(1)?;
		let value = self.bytes[self.position];
		self.position += 1;
		Ok(value)
	}

	pub fn readI8(&mut self) -> Result<i8>
	{
		Ok(self.readU8()? as i8)
	}

	pub fn readU16(&mut self) -> Result<u16>
	{
		self.require(2)?;
		let mut cursor = &self.bytes[self.position..self.position + 2];
		let value = cursor.read_u16::<LittleEndian>()?;
		self.position += 2;
		Ok(value)
	}

	pub fn readI16(&mut self) -> Result<i16>
	{
		Ok(self.readU16()? as i16)
	}

	pub fn readU32(&mut self) -> Result<u32>
	{
		self.require(4)?;
		let mut cursor = &self.bytes[self.position..self.position + 4];
		let value = cursor.read_u32::<LittleEndian>()?;
		self.position += 4;
		Ok(value)
	}

	pub fn readI32(&mut self) -> Result<i32>
	{
		Ok(self.readU32()? as i32)
	}

	pub fn readU64(&mut self) -> Result<u64>
	{
		self.require(8)?;
		let mut cursor = &self.bytes[self.position..self.position + 8];
		let value = cursor.read_u64::<LittleEndian>()?;
		self.position += 8;
		Ok(value)
	}

	/**
	Range-bounded read: decodes a `u32` and validates it falls within
	`[min, max]` inclusive, raising `InvalidDataError` otherwise.
	*/
	pub fn readRangedU32(&mut self, min: u32, max: u32) -> Result<u32>
	{
		let value = self.readU32()?;
		if value < min || value > max
		{
			return Err(CoreError::InvalidData(format!(
				"value {value} out of range [{min}, {max}]")).into());
		}
		Ok(value)
	}

	pub fn readRangedU8(&mut self, min: u8, max: u8) -> Result<u8>
	{
		let value = self.readU8()?;
		if value < min || value > max
		{
			return Err(CoreError::InvalidData(format!(
				"value {value} out of range [{min}, {max}]")).into());
		}
		Ok(value)
	}

	/**
	Bulk copy of `length` bytes into a fresh owned `Vec<u8>`.
	*/
	pub fn readBytes(&mut self, length: usize) -> Result<Vec<u8>>
	{
		self.require(length)?;
		let bytes = self.bytes[self.position..self.position + length].to_vec();
		self.position += length;
		Ok(bytes)
	}

	/**
	Read a u16 length-prefix followed by that many raw bytes, converting
	from Windows-1252 to UTF-8.
	*/
	pub fn readString(&mut self) -> Result<String>
	{
		let length = self.readU16()? as usize;
		let bytes = self.readBytes(length)?;
		Ok(Windows1252ToUtf8(&bytes))
	}

	pub fn skip(&mut self, count: usize) -> Result<()>
	{
		self.require(count)?;
		self.position += count;
		Ok(())
	}

	/**
	Read `length` bytes without advancing the cursor.
	*/
	pub fn peek(&self, length: usize) -> Result<&'a [u8]>
	{
		self.require(length)?;
		Ok(&self.bytes[self.position..self.position + length])
	}

	/**
	Produce an independent child reader over exactly `length` bytes,
	advancing this reader past them.
	*/
	pub fn slice(&mut self, length: usize) -> Result<DataReader<'a>>
	{
		self.require(length)?;
		let child = DataReader::New(&self.bytes[self.position..self.position + length]);
		self.position += length;
		Ok(child)
	}

	/**
	Error if anything remains; used after parsing a sub-packet whose
	declared length must be consumed exactly.
	*/
	pub fn expectExhausted(&self) -> Result<()>
	{
		if !self.isAtEnd()
		{
			return Err(CoreError::InvalidData(format!(
				"{} leftover bytes after parsing sub-packet", self.remaining())).into());
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests
{
	use super::*;

	#[test]
	fn ReadsLittleEndianScalars()
	{
		let bytes = [0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08];
		let mut reader = DataReader::New(&bytes);

		assert_eq!(0x01, reader.readU8().unwrap());
		assert_eq!(0x0302, reader.readU16().unwrap());
		assert_eq!(0x08070605, reader.readU32().unwrap());
	}

	#[test]
	fn UnderflowRaisesInvalidData()
	{
		let bytes = [0x01];
		let mut reader = DataReader::New(&bytes);
		assert!(reader.readU32().is_err());
	}

	#[test]
	fn SliceAdvancesParentIndependently()
	{
		let bytes = [1, 2, 3, 4, 5, 6];
		let mut reader = DataReader::New(&bytes);

		let mut child = reader.slice(3).unwrap();
		assert_eq!(3, reader.remaining());
		assert_eq!(1, child.readU8().unwrap());
		assert_eq!(2, child.remaining());
	}

	#[test]
	fn RangedReadRejectsOutOfRange()
	{
		let bytes = [0xFF, 0, 0, 0];
		let mut reader = DataReader::New(&bytes);
		assert!(reader.readRangedU32(0, 10).is_err());
	}

	#[test]
	fn ExpectExhaustedCatchesLeftoverBytes()
	{
		let bytes = [1, 2, 3];
		let mut reader = DataReader::New(&bytes);
		reader.readU8().unwrap();
		assert!(reader.expectExhausted().is_err());
	}
}
