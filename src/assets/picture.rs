#![allow(non_snake_case, non_upper_case_globals)]
#![cfg_attr(debug_assertions, allow(dead_code))]

use ::anyhow::Result;
use crate::error::CoreError;
use crate::pixel::Pixel;
use crate::reader::DataReader;

pub const PictureTileDimension: usize = 32;

/** One pre-composed RGBA picture, assembled from a grid of 32x32 uncompressed tiles. */
#[derive(Clone, Debug, Default)]
pub struct Picture
{
	pub width: usize,
	pub height: usize,
	pixels: Vec<Pixel>,
}

impl Picture
{
	pub fn getPixel(&self, x: usize, y: usize) -> Pixel
	{
		if x >= self.width || y >= self.height { return Pixel::Transparent; }
		self.pixels[y * self.width + x]
	}

	fn blitTile(&mut self, tile: &[Pixel], tileX: usize, tileY: usize)
	{
		for row in 0..PictureTileDimension
		{
			for col in 0..PictureTileDimension
			{
				let (destX, destY) = (tileX * PictureTileDimension + col, tileY * PictureTileDimension + row);
				if destX < self.width && destY < self.height
				{
					self.pixels[destY * self.width + destX] = tile[row * PictureTileDimension + col];
				}
			}
		}
	}

	/** Decode one `widthTiles` x `heightTiles` picture: a grid of raw (no RLE) RGB+alpha-key tiles. */
	pub fn decode(reader: &mut DataReader, widthTiles: usize, heightTiles: usize) -> Result<Self>
	{
		let width = widthTiles * PictureTileDimension;
		let height = heightTiles * PictureTileDimension;
		let mut picture = Self { width, height, pixels: vec![Pixel::Transparent; width * height] };

		for tileY in 0..heightTiles
		{
			for tileX in 0..widthTiles
			{
				let mut tile = vec![Pixel::Transparent; PictureTileDimension * PictureTileDimension];
				for index in 0..tile.len()
				{
					let rgb = reader.readBytes(3)?;
					tile[index] = Pixel::opaque(rgb[0], rgb[1], rgb[2]);
				}
				picture.blitTile(&tile, tileX, tileY);
			}
		}

		Ok(picture)
	}
}

/** Which logical slot of the picture atlas a decoded [`Picture`] occupies. */
#[derive(Clone, Copy, Eq, PartialEq, Hash)]
pub enum PictureSlot
{
	LoginBackground,
	IconAtlas,
	GameFontAtlas,
	InterfaceSmallFontAtlas,
	InterfaceLargeFontAtlas,
}

#[derive(Clone, Debug, Default)]
pub struct PictureAtlas
{
	loginBackground: Option<Picture>,
	iconAtlas: Option<Picture>,
	gameFontAtlas: Option<Picture>,
	interfaceSmallFontAtlas: Option<Picture>,
	interfaceLargeFontAtlas: Option<Picture>,
}

impl PictureAtlas
{
	pub fn insert(&mut self, slot: PictureSlot, picture: Picture)
	{
		match slot
		{
			PictureSlot::LoginBackground => self.loginBackground = Some(picture),
			PictureSlot::IconAtlas => self.iconAtlas = Some(picture),
			PictureSlot::GameFontAtlas => self.gameFontAtlas = Some(picture),
			PictureSlot::InterfaceSmallFontAtlas => self.interfaceSmallFontAtlas = Some(picture),
			PictureSlot::InterfaceLargeFontAtlas => self.interfaceLargeFontAtlas = Some(picture),
		}
	}

	pub fn get(&self, slot: PictureSlot) -> Option<&Picture>
	{
		match slot
		{
			PictureSlot::LoginBackground => self.loginBackground.as_ref(),
			PictureSlot::IconAtlas => self.iconAtlas.as_ref(),
			PictureSlot::GameFontAtlas => self.gameFontAtlas.as_ref(),
			PictureSlot::InterfaceSmallFontAtlas => self.interfaceSmallFontAtlas.as_ref(),
			PictureSlot::InterfaceLargeFontAtlas => self.interfaceLargeFontAtlas.as_ref(),
		}
	}

	pub fn require(&self, slot: PictureSlot) -> Result<&Picture>
	{
		self.get(slot).ok_or_else(|| CoreError::InvalidData(format!("picture slot {slot:?} missing from atlas")).into())
	}
}

impl std::fmt::Debug for PictureSlot
{
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result
	{
		let name = match self
		{
			PictureSlot::LoginBackground => "LoginBackground",
			PictureSlot::IconAtlas => "IconAtlas",
			PictureSlot::GameFontAtlas => "GameFontAtlas",
			PictureSlot::InterfaceSmallFontAtlas => "InterfaceSmallFontAtlas",
			PictureSlot::InterfaceLargeFontAtlas => "InterfaceLargeFontAtlas",
		};
		write!(f, "{name}")
	}
}

#[cfg(test)]
mod tests
{
	use super::*;

	#[test]
	fn DecodesSingleTilePicture()
	{
		let mut bytes = vec![];
		for _ in 0..(PictureTileDimension * PictureTileDimension)
		{
			bytes.extend_from_slice(&[10, 20, 30]);
		}
		let mut reader = DataReader::New(&bytes);
		let picture = Picture::decode(&mut reader, 1, 1).unwrap();

		assert_eq!(Pixel::opaque(10, 20, 30), picture.getPixel(0, 0));
		assert_eq!(PictureTileDimension, picture.width);
	}

	#[test]
	fn AtlasRoundTripsBySlot()
	{
		let mut atlas = PictureAtlas::default();
		atlas.insert(PictureSlot::IconAtlas, Picture { width: 1, height: 1, pixels: vec![Pixel::White] });
		assert_eq!(Pixel::White, atlas.get(PictureSlot::IconAtlas).unwrap().getPixel(0, 0));
		assert!(atlas.get(PictureSlot::LoginBackground).is_none());
	}
}
