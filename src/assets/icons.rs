#![allow(non_snake_case, non_upper_case_globals)]
#![cfg_attr(debug_assertions, allow(dead_code))]

use crate::assets::picture::Picture;
use crate::assets::sprite::Sprite;
use crate::pixel::Pixel;

/** A small fixed-rectangle sprite cut from the icon atlas. */
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum IconKind
{
	ShieldNone, ShieldWhiteYellow, ShieldWhiteBlue, ShieldBlue, ShieldYellow, ShieldGray,
	SkullNone, SkullYellow, SkullGreen, SkullWhite, SkullRed, SkullBlack, SkullOrange,
	WarIconAlly, WarIconEnemy, WarIconNeutral, WarIconMember, WarIconOther,
	StatusPoison, StatusBurning, StatusEnergy, StatusDrunk,
	EmptyInventorySlot,
	HealthBarFill, ManaBarFill,
}

struct IconRect { kind: IconKind, x: usize, y: usize, width: usize, height: usize, minVersionMajor: u16 }

/**
Fixed (x, y, w, h) coordinates of each icon within the icon atlas. Entries
whose rect falls outside the atlas for the active version's atlas layout
are silently skipped rather than failing the whole asset load, matching
the source's per-icon tolerance for older, smaller atlas textures.
*/
const IconRects: &[IconRect] = &[
	IconRect { kind: IconKind::ShieldNone, x: 0, y: 0, width: 11, height: 11, minVersionMajor: 0 },
	IconRect { kind: IconKind::ShieldWhiteYellow, x: 11, y: 0, width: 11, height: 11, minVersionMajor: 0 },
	IconRect { kind: IconKind::ShieldWhiteBlue, x: 22, y: 0, width: 11, height: 11, minVersionMajor: 0 },
	IconRect { kind: IconKind::ShieldBlue, x: 33, y: 0, width: 11, height: 11, minVersionMajor: 0 },
	IconRect { kind: IconKind::ShieldYellow, x: 44, y: 0, width: 11, height: 11, minVersionMajor: 0 },
	IconRect { kind: IconKind::ShieldGray, x: 55, y: 0, width: 11, height: 11, minVersionMajor: 9 },
	IconRect { kind: IconKind::SkullNone, x: 0, y: 11, width: 11, height: 11, minVersionMajor: 0 },
	IconRect { kind: IconKind::SkullYellow, x: 11, y: 11, width: 11, height: 11, minVersionMajor: 0 },
	IconRect { kind: IconKind::SkullGreen, x: 22, y: 11, width: 11, height: 11, minVersionMajor: 0 },
	IconRect { kind: IconKind::SkullWhite, x: 33, y: 11, width: 11, height: 11, minVersionMajor: 0 },
	IconRect { kind: IconKind::SkullRed, x: 44, y: 11, width: 11, height: 11, minVersionMajor: 0 },
	IconRect { kind: IconKind::SkullBlack, x: 55, y: 11, width: 11, height: 11, minVersionMajor: 9 },
	IconRect { kind: IconKind::SkullOrange, x: 66, y: 11, width: 11, height: 11, minVersionMajor: 9 },
	IconRect { kind: IconKind::WarIconAlly, x: 0, y: 22, width: 11, height: 11, minVersionMajor: 9 },
	IconRect { kind: IconKind::WarIconEnemy, x: 11, y: 22, width: 11, height: 11, minVersionMajor: 9 },
	IconRect { kind: IconKind::WarIconNeutral, x: 22, y: 22, width: 11, height: 11, minVersionMajor: 9 },
	IconRect { kind: IconKind::WarIconMember, x: 33, y: 22, width: 11, height: 11, minVersionMajor: 9 },
	IconRect { kind: IconKind::WarIconOther, x: 44, y: 22, width: 11, height: 11, minVersionMajor: 9 },
	IconRect { kind: IconKind::StatusPoison, x: 0, y: 33, width: 9, height: 9, minVersionMajor: 0 },
	IconRect { kind: IconKind::StatusBurning, x: 9, y: 33, width: 9, height: 9, minVersionMajor: 0 },
	IconRect { kind: IconKind::StatusEnergy, x: 18, y: 33, width: 9, height: 9, minVersionMajor: 0 },
	IconRect { kind: IconKind::StatusDrunk, x: 27, y: 33, width: 9, height: 9, minVersionMajor: 0 },
	IconRect { kind: IconKind::EmptyInventorySlot, x: 0, y: 42, width: 32, height: 32, minVersionMajor: 0 },
	IconRect { kind: IconKind::HealthBarFill, x: 32, y: 42, width: 24, height: 4, minVersionMajor: 0 },
	IconRect { kind: IconKind::ManaBarFill, x: 56, y: 42, width: 24, height: 4, minVersionMajor: 0 },
];

#[derive(Clone, Debug, Default)]
pub struct IconSet
{
	sprites: std::collections::HashMap<&'static str, Sprite>,
}

fn keyFor(kind: IconKind) -> &'static str
{
	match kind
	{
		IconKind::ShieldNone => "ShieldNone", IconKind::ShieldWhiteYellow => "ShieldWhiteYellow",
		IconKind::ShieldWhiteBlue => "ShieldWhiteBlue", IconKind::ShieldBlue => "ShieldBlue",
		IconKind::ShieldYellow => "ShieldYellow", IconKind::ShieldGray => "ShieldGray",
		IconKind::SkullNone => "SkullNone", IconKind::SkullYellow => "SkullYellow",
		IconKind::SkullGreen => "SkullGreen", IconKind::SkullWhite => "SkullWhite",
		IconKind::SkullRed => "SkullRed", IconKind::SkullBlack => "SkullBlack", IconKind::SkullOrange => "SkullOrange",
		IconKind::WarIconAlly => "WarIconAlly", IconKind::WarIconEnemy => "WarIconEnemy",
		IconKind::WarIconNeutral => "WarIconNeutral", IconKind::WarIconMember => "WarIconMember", IconKind::WarIconOther => "WarIconOther",
		IconKind::StatusPoison => "StatusPoison", IconKind::StatusBurning => "StatusBurning",
		IconKind::StatusEnergy => "StatusEnergy", IconKind::StatusDrunk => "StatusDrunk",
		IconKind::EmptyInventorySlot => "EmptyInventorySlot",
		IconKind::HealthBarFill => "HealthBarFill", IconKind::ManaBarFill => "ManaBarFill",
	}
}

impl IconSet
{
	pub fn get(&self, kind: IconKind) -> Option<&Sprite>
	{
		self.sprites.get(keyFor(kind))
	}
}

/** Extract every icon rect that fits within `atlas`'s icon-atlas picture and the active version. */
pub fn extractIcons(icon: &Picture, versionMajor: u16) -> IconSet
{
	let mut set = IconSet::default();

	for rect in IconRects
	{
		if rect.minVersionMajor > versionMajor { continue; }
		if rect.x + rect.width > icon.width || rect.y + rect.height > icon.height { continue; }

		let mut pixels = vec![Pixel::Transparent; rect.width * rect.height];
		for y in 0..rect.height
		{
			for x in 0..rect.width
			{
				pixels[y * rect.width + x] = icon.getPixel(rect.x + x, rect.y + y);
			}
		}

		set.sprites.insert(keyFor(rect.kind), spriteFromOwnedPixels(pixels, rect.width, rect.height));
	}

	set
}

fn spriteFromOwnedPixels(pixels: Vec<Pixel>, width: usize, height: usize) -> Sprite
{
	crate::assets::sprite::Sprite::fromOwnedPixels(pixels, width, height)
}

#[cfg(test)]
mod tests
{
	use super::*;

	#[test]
	fn SkipsRectsOutsideSmallAtlas()
	{
		let icon = Picture::default();
		let set = extractIcons(&icon, 10);
		assert!(set.get(IconKind::ShieldNone).is_none());
	}

	#[test]
	fn NewerOnlyIconsAreGatedByVersion()
	{
		let icon = Picture { width: 200, height: 200, ..Default::default() };
		let old = extractIcons(&icon, 7);
		let modern = extractIcons(&icon, 9);

		assert!(old.get(IconKind::WarIconAlly).is_none());
		assert!(modern.get(IconKind::WarIconAlly).is_some());
	}
}
