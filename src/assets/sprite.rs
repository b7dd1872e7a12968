#![allow(non_snake_case, non_upper_case_globals)]
#![cfg_attr(debug_assertions, allow(dead_code))]

use ::anyhow::Result;
use crate::error::CoreError;
use crate::pixel::Pixel;
use crate::reader::DataReader;

pub const SpriteDimension: usize = 32;

/** A single decoded, transparent-keyed 32x32 sprite. */
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Sprite
{
	pub width: usize,
	pub height: usize,
	pixels: Vec<Pixel>,
}

impl Sprite
{
	/** Build a sprite directly from an already-decoded pixel buffer (used by font/icon extraction, which read a [`crate::assets::picture::Picture`] rather than an RLE stream). */
	pub fn fromOwnedPixels(pixels: Vec<Pixel>, width: usize, height: usize) -> Self
	{
		Self { width, height, pixels }
	}

	pub fn getPixel(&self, x: usize, y: usize) -> Pixel
	{
		if x >= self.width || y >= self.height
		{
			return Pixel::Transparent;
		}
		self.pixels[y * self.width + x]
	}

	/**
	Decode one RLE-compressed transparent-keyed sprite from `reader`.

	Layout (per entry): a u16 run of transparent pixels, a u16 count of
	opaque pixels, then `count` RGB triples; repeated until the pixel
	budget (`width * height`) is filled.
	*/
	pub fn decodeRle(reader: &mut DataReader, width: usize, height: usize) -> Result<Self>
	{
		let budget = width * height;
		let mut pixels = vec![Pixel::Transparent; budget];
		let mut cursor = 0usize;

		while cursor < budget && !reader.isAtEnd()
		{
			let transparentRun = reader.readU16()? as usize;
			cursor += transparentRun;
			if cursor > budget
			{
				return Err(CoreError::InvalidData("sprite RLE transparent run overflows pixel budget".into()).into());
			}

			if cursor >= budget
			{
				break;
			}

			let opaqueRun = reader.readU16()? as usize;
			if cursor + opaqueRun > budget
			{
				return Err(CoreError::InvalidData("sprite RLE opaque run overflows pixel budget".into()).into());
			}

			for _ in 0..opaqueRun
			{
				let rgb = reader.readBytes(3)?;
				pixels[cursor] = Pixel::opaque(rgb[0], rgb[1], rgb[2]);
				cursor += 1;
			}
		}

		Ok(Self { width, height, pixels })
	}
}

/** The full decoded sprite table, indexed by a 16- or 32-bit id depending on version feature flags. */
#[derive(Clone, Debug, Default)]
pub struct SpriteTable
{
	sprites: Vec<Sprite>,
}

impl SpriteTable
{
	pub fn get(&self, id: u32) -> Option<&Sprite>
	{
		self.sprites.get(id as usize)
	}

	pub fn len(&self) -> usize
	{
		self.sprites.len()
	}

	pub fn isEmpty(&self) -> bool
	{
		self.sprites.is_empty()
	}

	/**
	Decode a `Tibia.spr` blob: u32 signature, then a sprite count (u32 if
	`spriteIndexU32`, else u16), an offset table of that many u32 values,
	then per-sprite {u16 data-length, RLE pixel data}.
	*/
	pub fn fromBlob(blob: &[u8], spriteIndexU32: bool) -> Result<Self>
	{
		let mut reader = DataReader::New(blob);
		let _signature = reader.readU32()?;

		let count = if spriteIndexU32 { reader.readU32()? } else { reader.readU16()? as u32 };

		let mut offsets = Vec::with_capacity(count as usize);
		for _ in 0..count
		{
			offsets.push(reader.readU32()?);
		}

		let mut sprites = Vec::with_capacity(count as usize);
		for &offset in &offsets
		{
			if offset == 0 || offset as usize >= blob.len()
			{
				sprites.push(Sprite::default());
				continue;
			}

			let mut spriteReader = DataReader::New(&blob[offset as usize..]);
			// Color-key byte (always magenta, 0xFF00FF) precedes the RLE stream.
			spriteReader.skip(3)?;
			let dataLength = spriteReader.readU16()? as usize;
			let mut body = spriteReader.slice(dataLength.min(spriteReader.remaining()))?;
			sprites.push(Sprite::decodeRle(&mut body, SpriteDimension, SpriteDimension)?);
		}

		Ok(Self { sprites })
	}
}

#[cfg(test)]
mod tests
{
	use super::*;
	use ::byteorder::{LittleEndian, WriteBytesExt};

	fn encodeRleSprite(runs: &[(u16, &[(u8, u8, u8)])]) -> Vec<u8>
	{
		let mut bytes = vec![];
		for (transparentRun, opaquePixels) in runs
		{
			bytes.write_u16::<LittleEndian>(*transparentRun).unwrap();
			bytes.write_u16::<LittleEndian>(opaquePixels.len() as u16).unwrap();
			for (r, g, b) in *opaquePixels
			{
				bytes.push(*r);
				bytes.push(*g);
				bytes.push(*b);
			}
		}
		bytes
	}

	#[test]
	fn DecodesSingleOpaquePixel()
	{
		let bytes = encodeRleSprite(&[(0, &[(255, 0, 0)])]);
		let mut reader = DataReader::New(&bytes);
		let sprite = Sprite::decodeRle(&mut reader, 1, 1).unwrap();

		assert_eq!(Pixel::opaque(255, 0, 0), sprite.getPixel(0, 0));
	}

	#[test]
	fn LeadingTransparentRunSkipsPixels()
	{
		let bytes = encodeRleSprite(&[(2, &[(10, 20, 30)])]);
		let mut reader = DataReader::New(&bytes);
		let sprite = Sprite::decodeRle(&mut reader, 3, 1).unwrap();

		assert!(sprite.getPixel(0, 0).isTransparent());
		assert!(sprite.getPixel(1, 0).isTransparent());
		assert_eq!(Pixel::opaque(10, 20, 30), sprite.getPixel(2, 0));
	}

	#[test]
	fn OutOfBoundsPixelIsTransparent()
	{
		let sprite = Sprite::default();
		assert!(sprite.getPixel(5, 5).isTransparent());
	}
}
