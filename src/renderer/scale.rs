#![allow(non_snake_case, non_upper_case_globals)]
#![cfg_attr(debug_assertions, allow(dead_code))]

use ::rayon::prelude::*;
use crate::canvas::Canvas;
use crate::pixel::Pixel;

/**
Bilinear-rescales `source` into a freshly allocated canvas of `(destWidth,
destHeight)`. Each output row is independent, so rows are computed in
parallel via `par_chunks_mut` over the destination buffer — the one place
in this crate rayon crosses from batch/offline parallelism into the render
path itself, matching the sanctioned "embarrassingly parallel, no shared
mutable state" carve-out.
*/
pub fn rescale(source: &Canvas, destWidth: usize, destHeight: usize) -> Canvas
{
	if destWidth == source.width && destHeight == source.height
	{
		return source.clone();
	}

	let mut dest = Canvas::New(destWidth, destHeight);
	let scaleX = source.width as f32 / destWidth as f32;
	let scaleY = source.height as f32 / destHeight as f32;

	let rows: Vec<(usize, Vec<Pixel>)> = (0..destHeight)
		.into_par_iter()
		.map(|y| (y, rescaleRow(source, y, destWidth, scaleX, scaleY)))
		.collect();

	for (y, row) in rows
	{
		dest.rawRowMut(y).copy_from_slice(&row);
	}

	dest
}

fn rescaleRow(source: &Canvas, destY: usize, destWidth: usize, scaleX: f32, scaleY: f32) -> Vec<Pixel>
{
	let srcYf = (destY as f32 + 0.5) * scaleY - 0.5;
	let srcY0 = srcYf.floor().max(0.0) as usize;
	let srcY1 = (srcY0 + 1).min(source.height - 1);
	let fracY = (srcYf - srcY0 as f32).clamp(0.0, 1.0);

	let mut row = Vec::with_capacity(destWidth);
	for destX in 0..destWidth
	{
		let srcXf = (destX as f32 + 0.5) * scaleX - 0.5;
		let srcX0 = srcXf.floor().max(0.0) as usize;
		let srcX1 = (srcX0 + 1).min(source.width - 1);
		let fracX = (srcXf - srcX0 as f32).clamp(0.0, 1.0);

		let topLeft = source.getPixel(srcX0, srcY0);
		let topRight = source.getPixel(srcX1, srcY0);
		let bottomLeft = source.getPixel(srcX0, srcY1);
		let bottomRight = source.getPixel(srcX1, srcY1);

		let top = topLeft.lerp(&topRight, fracX);
		let bottom = bottomLeft.lerp(&bottomRight, fracX);
		row.push(top.lerp(&bottom, fracY));
	}
	row
}

#[cfg(test)]
mod tests
{
	use super::*;

	#[test]
	fn RescaleToSameSizeIsIdentity()
	{
		let mut source = Canvas::New(4, 4);
		source.setPixel(1, 1, Pixel::White);
		let result = rescale(&source, 4, 4);
		assert_eq!(Pixel::White, result.getPixel(1, 1));
	}

	#[test]
	fn RescaleUpPreservesOutputDimensions()
	{
		let source = Canvas::New(2, 2);
		let result = rescale(&source, 8, 6);
		assert_eq!(8, result.width);
		assert_eq!(6, result.height);
	}

	#[test]
	fn RescaleDownAveragesNeighboringPixels()
	{
		let mut source = Canvas::New(2, 1);
		source.setPixel(0, 0, Pixel::opaque(0, 0, 0));
		source.setPixel(1, 0, Pixel::opaque(200, 200, 200));

		let result = rescale(&source, 1, 1);
		let pixel = result.getPixel(0, 0);
		assert!(pixel.red() > 0 && pixel.red() < 200);
	}
}
