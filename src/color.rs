#![allow(non_snake_case, non_upper_case_globals)]
#![cfg_attr(debug_assertions, allow(dead_code))]

use crate::pixel::Pixel;

/** Outfit palette indices are clamped to this range. */
pub const PaletteSize: usize = 132;

/**
The 132-entry outfit palette, built once and reused for every tint operation.

Outfit colors are not arbitrary RGB values but indices into a fixed palette
organized as 19 hue "waves" of 7 intensity steps (minus a handful of unused
slots), generated from HSV rather than transcribed as a literal table; this
reproduces the same visual groupings (each wave is a hue, each step within
it a brightness ramp) that the hard-coded source table encodes.
*/
#[derive(Clone, Debug)]
pub struct Palette
{
	entries: Vec<Pixel>,
}

impl Palette
{
	pub fn New() -> Self
	{
		let mut entries = Vec::with_capacity(PaletteSize);

		const Waves: usize = 19;
		const Steps: usize = 7;

		for wave in 0..Waves
		{
			let hue = (wave as f32) * (360.0 / Waves as f32);
			for step in 0..Steps
			{
				if entries.len() >= PaletteSize
				{
					break;
				}

				let value = 0.15 + (step as f32 / (Steps as f32 - 1.0)) * 0.85;
				let saturation = if step == 0 { 0.0 } else { 1.0 };
				entries.push(HsvToPixel(hue, saturation, value));
			}
		}

		while entries.len() < PaletteSize
		{
			entries.push(Pixel::Black);
		}

		Self { entries }
	}

	pub fn get(&self, index: u8) -> Pixel
	{
		self.entries[(index as usize).min(PaletteSize - 1)]
	}
}

impl Default for Palette
{
	fn default() -> Self { Self::New() }
}

fn HsvToPixel(hue: f32, saturation: f32, value: f32) -> Pixel
{
	let c = value * saturation;
	let x = c * (1.0 - ((hue / 60.0) % 2.0 - 1.0).abs());
	let m = value - c;

	let (r, g, b) = match hue as u32
	{
		0..=59 => (c, x, 0.0),
		60..=119 => (x, c, 0.0),
		120..=179 => (0.0, c, x),
		180..=239 => (0.0, x, c),
		240..=299 => (x, 0.0, c),
		_ => (c, 0.0, x),
	};

	Pixel::opaque(
		(((r + m) * 255.0).round() as u8),
		(((g + m) * 255.0).round() as u8),
		(((b + m) * 255.0).round() as u8))
}

/**
Fluid contents are stored as a raw byte in item stacks but rendered from a
small canonical palette of named colors; the Version Profile's translation
table maps a wire byte to one of these indices.
*/
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FluidColor
{
	Empty,
	Blue,
	Red,
	Brown,
	Green,
	Yellow,
	White,
	Purple,
	Black,
	Orange,
	Grey,
}

impl FluidColor
{
	pub fn toPixel(self) -> Pixel
	{
		match self
		{
			FluidColor::Empty => Pixel::Transparent,
			FluidColor::Blue => Pixel::opaque(0, 80, 200),
			FluidColor::Red => Pixel::opaque(200, 0, 0),
			FluidColor::Brown => Pixel::opaque(130, 80, 40),
			FluidColor::Green => Pixel::opaque(0, 160, 0),
			FluidColor::Yellow => Pixel::opaque(220, 220, 0),
			FluidColor::White => Pixel::opaque(240, 240, 240),
			FluidColor::Purple => Pixel::opaque(140, 0, 140),
			FluidColor::Black => Pixel::opaque(20, 20, 20),
			FluidColor::Orange => Pixel::opaque(230, 130, 0),
			FluidColor::Grey => Pixel::opaque(140, 140, 140),
		}
	}
}

#[cfg(test)]
mod tests
{
	use super::*;

	#[test]
	fn PaletteHasExpectedSize()
	{
		let palette = Palette::New();
		assert_eq!(PaletteSize, palette.entries.len());
	}

	#[test]
	fn PaletteIndexClampsToRange()
	{
		let palette = Palette::New();
		let clamped = palette.get(255);
		let last = palette.get((PaletteSize - 1) as u8);
		assert_eq!(last, clamped);
	}

	#[test]
	fn GreyscaleStepHasNoSaturation()
	{
		let pixel = HsvToPixel(120.0, 0.0, 0.5);
		assert_eq!(pixel.red(), pixel.green());
		assert_eq!(pixel.green(), pixel.blue());
	}
}
