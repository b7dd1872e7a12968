#![allow(non_snake_case, non_upper_case_globals)]
#![cfg_attr(debug_assertions, allow(dead_code))]

pub mod dat;
pub mod fonts;
pub mod icons;
pub mod picture;
pub mod sprite;
pub mod types;

use ::anyhow::{Context, Result};
use crate::version::Version;

use dat::TypeTables;
use fonts::FontSet;
use icons::IconSet;
use picture::{Picture, PictureAtlas, PictureSlot};
use sprite::SpriteTable;

/**
Logical picture-slot layout, in storage order, within a `Tibia.pic` blob.
Dimensions are in 32x32 tiles. The login background is always present;
the rest were added across versions and are read only when the blob has
enough remaining bytes, matching the source's tolerant picture-count
handling for older clients.
*/
struct PictureLayout { slot: PictureSlot, widthTiles: usize, heightTiles: usize }

const PictureLayouts: &[PictureLayout] = &[
	PictureLayout { slot: PictureSlot::LoginBackground, widthTiles: 15, heightTiles: 10 },
	PictureLayout { slot: PictureSlot::IconAtlas, widthTiles: 3, heightTiles: 2 },
	PictureLayout { slot: PictureSlot::GameFontAtlas, widthTiles: 4, heightTiles: 7 },
	PictureLayout { slot: PictureSlot::InterfaceSmallFontAtlas, widthTiles: 3, heightTiles: 7 },
	PictureLayout { slot: PictureSlot::InterfaceLargeFontAtlas, widthTiles: 4, heightTiles: 7 },
];

fn decodePictureAtlas(blob: &[u8]) -> Result<PictureAtlas>
{
	let mut reader = crate::reader::DataReader::New(blob);
	let _signature = reader.readU32()?;
	let _pictureCount = reader.readU32()?;

	let mut atlas = PictureAtlas::default();
	for layout in PictureLayouts
	{
		let byteLength = layout.widthTiles * layout.heightTiles * picture::PictureTileDimension * picture::PictureTileDimension * 3;
		if reader.remaining() < byteLength
		{
			break;
		}
		let mut slice = reader.slice(byteLength)?;
		let picture = Picture::decode(&mut slice, layout.widthTiles, layout.heightTiles)?;
		atlas.insert(layout.slot, picture);
	}

	Ok(atlas)
}

/**
Everything decoded from a recording's three asset blobs (`pic`, `spr`,
`dat`) for one protocol version: the sprite table, picture atlas, fonts,
icon set, and the four entity type tables. Construction fails with
`InvalidDataError`/`NotSupportedError` exactly as the individual decoders
do; nothing here retries or falls back silently.
*/
#[derive(Clone, Debug, Default)]
pub struct AssetStore
{
	pub sprites: SpriteTable,
	pub pictures: PictureAtlas,
	pub fonts: FontSet,
	pub icons: IconSet,
	pub types: TypeTables,
}

impl AssetStore
{
	pub fn fromBlobs(pic: &[u8], spr: &[u8], dat: &[u8], version: &Version) -> Result<Self>
	{
		let sprites = SpriteTable::fromBlob(spr, version.features.spriteIndexU32)
			.context("decoding sprite table")?;
		let pictures = decodePictureAtlas(pic).context("decoding picture atlas")?;
		let fonts = fonts::loadFonts(&pictures).context("decoding bitmap fonts")?;
		let icons = pictures.get(PictureSlot::IconAtlas)
			.map(|atlas| icons::extractIcons(atlas, version.triple.major))
			.unwrap_or_default();
		let types = dat::decodeDat(dat, version).context("decoding type tables")?;

		Ok(Self { sprites, pictures, fonts, icons, types })
	}

	/** Stack-priority class used by [`crate::gamestate`] to order tile objects without itself knowing about frame groups. */
	pub fn stackPriorityClass(&self, object: &crate::object::Object) -> u8
	{
		use crate::object::Object;
		use crate::version::TypeProperty;

		match object
		{
			Object::Creature(_) => 4,
			Object::Item(item) =>
			{
				let Some(entityType) = self.types.items.get(item.id as u32) else { return 2 };
				if entityType.hasFlag(TypeProperty::Ground) { 0 }
				else if entityType.hasFlag(TypeProperty::BottomOrdered) { 1 }
				else if entityType.hasFlag(TypeProperty::TopOrdered) { 5 }
				else { 2 }
			}
		}
	}

	/** Ground speed a creature moving onto this item's tile inherits, falling back to 0 (no ground) if unset. */
	pub fn groundSpeed(&self, itemId: u16) -> u16
	{
		use crate::version::TypeProperty;
		self.types.items.get(itemId as u32)
			.and_then(|entityType| entityType.valueOf(TypeProperty::GroundSpeed))
			.unwrap_or(0) as u16
	}
}

#[cfg(test)]
mod tests
{
	use super::*;

	#[test]
	fn EmptyStoreHasNoSprites()
	{
		let store = AssetStore::default();
		assert!(store.sprites.isEmpty());
	}

	#[test]
	fn StackPriorityDefaultsToRegularForUnknownItem()
	{
		let store = AssetStore::default();
		let object = crate::object::Object::Item(crate::object::ItemStack::New(9999));
		assert_eq!(2, store.stackPriorityClass(&object));
	}
}
