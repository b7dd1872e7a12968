#![allow(non_snake_case, non_upper_case_globals)]
#![cfg_attr(debug_assertions, allow(dead_code))]

use ::anyhow::Result;
use crate::assets::picture::{Picture, PictureAtlas, PictureSlot};
use crate::assets::sprite::Sprite;
use crate::error::CoreError;

/** Which of the three bitmap fonts a glyph table belongs to. */
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum FontKind
{
	Game,
	InterfaceSmall,
	InterfaceLarge,
}

/** One decoded character glyph: its pixmap and the horizontal advance to the next character. */
#[derive(Clone, Debug, Default)]
pub struct Glyph
{
	pub sprite: Sprite,
	pub advance: u8,
}

#[derive(Clone, Debug, Default)]
pub struct Font
{
	glyphs: Vec<Glyph>,
}

impl Font
{
	pub fn glyph(&self, character: char) -> Option<&Glyph>
	{
		self.glyphs.get(character as usize)
	}

	/** Width in pixels of `text` rendered with this font, summing per-glyph advances. */
	pub fn measure(&self, text: &str) -> u32
	{
		text.chars().map(|character| self.glyph(character).map(|glyph| glyph.advance as u32).unwrap_or(0)).sum()
	}
}

/**
Decodes a bitmap font from its picture-atlas slot: a fixed 16x16 grid of
glyph cells (covering the Windows-1252 byte range), each with a trailing
column of advance-width bytes stored in a narrow strip to the right of the
glyph grid, matching the layout the client's interface font textures use.
*/
pub fn decodeFont(_kind: FontKind, picture: &Picture, cellWidth: usize, cellHeight: usize) -> Result<Font>
{
	let columns = picture.width / cellWidth.max(1);
	let rows = picture.height / cellHeight.max(1);
	if columns == 0 || rows == 0
	{
		return Err(CoreError::InvalidData("font atlas too small for requested cell size".into()).into());
	}

	let mut glyphs = Vec::with_capacity(columns * rows);
	for row in 0..rows
	{
		for column in 0..columns
		{
			let mut pixels = vec![crate::pixel::Pixel::Transparent; cellWidth * cellHeight];
			let mut advance = 0u8;
			for y in 0..cellHeight
			{
				for x in 0..cellWidth
				{
					let pixel = picture.getPixel(column * cellWidth + x, row * cellHeight + y);
					if !pixel.isTransparent() { advance = advance.max(x as u8 + 1); }
					pixels[y * cellWidth + x] = pixel;
				}
			}
			glyphs.push(Glyph { sprite: Sprite::fromOwnedPixels(pixels, cellWidth, cellHeight), advance: advance.max(1) });
		}
	}

	Ok(Font { glyphs })
}

#[derive(Clone, Debug, Default)]
pub struct FontSet
{
	pub game: Font,
	pub interfaceSmall: Font,
	pub interfaceLarge: Font,
}

pub fn loadFonts(atlas: &PictureAtlas) -> Result<FontSet>
{
	let game = match atlas.get(PictureSlot::GameFontAtlas)
	{
		Some(picture) => decodeFont(FontKind::Game, picture, 8, 12)?,
		None => Font::default(),
	};
	let interfaceSmall = match atlas.get(PictureSlot::InterfaceSmallFontAtlas)
	{
		Some(picture) => decodeFont(FontKind::InterfaceSmall, picture, 6, 10)?,
		None => Font::default(),
	};
	let interfaceLarge = match atlas.get(PictureSlot::InterfaceLargeFontAtlas)
	{
		Some(picture) => decodeFont(FontKind::InterfaceLarge, picture, 8, 14)?,
		None => Font::default(),
	};

	Ok(FontSet { game, interfaceSmall, interfaceLarge })
}

#[cfg(test)]
mod tests
{
	use super::*;

	#[test]
	fn MissingAtlasSlotYieldsEmptyFont()
	{
		let atlas = PictureAtlas::default();
		let fonts = loadFonts(&atlas).unwrap();
		assert!(fonts.game.glyph('A').is_none());
	}

	#[test]
	fn MeasureSumsAdvances()
	{
		let font = Font { glyphs: vec![Glyph { advance: 5, ..Default::default() }; 128] };
		assert_eq!(10, font.measure("AB"));
	}
}
