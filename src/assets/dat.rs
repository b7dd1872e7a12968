#![allow(non_snake_case, non_upper_case_globals)]
#![cfg_attr(debug_assertions, allow(dead_code))]

use ::anyhow::Result;
use crate::assets::types::{parseFrameGroup, parseProperties, EntityType, TypeTable};
use crate::reader::DataReader;
use crate::version::Version;

/** The four category counts declared at the top of a `Tibia.dat` blob. */
#[derive(Clone, Copy, Debug, Default)]
pub struct DatHeader
{
	pub itemCount: u32,
	pub outfitCount: u32,
	pub effectCount: u32,
	pub missileCount: u32,
}

#[derive(Clone, Debug, Default)]
pub struct TypeTables
{
	pub items: TypeTable,
	pub outfits: TypeTable,
	pub effects: TypeTable,
	pub missiles: TypeTable,
}

/** Item ids below this are reserved (the client has no type record for them). */
const FirstItemId: u32 = 100;

/**
Decodes a `Tibia.dat` blob into four type tables. Frame-group count per
entity is 1 unless the version's `frameGroups` feature is set, in which
case a leading count byte selects how many groups (idle, walking, ...)
follow — matching the source's `frame_groups` protocol-era branch.
*/
pub fn decodeDat(blob: &[u8], version: &Version) -> Result<TypeTables>
{
	let mut reader = DataReader::New(blob);
	let _signature = reader.readU32()?;

	let header = DatHeader
	{
		itemCount: reader.readU16()? as u32,
		outfitCount: reader.readU16()? as u32,
		effectCount: reader.readU16()? as u32,
		missileCount: reader.readU16()? as u32,
	};

	let mut tables = TypeTables::default();

	for id in FirstItemId..=header.itemCount
	{
		tables.items.insert(decodeEntity(&mut reader, id, version)?);
	}
	for id in 1..=header.outfitCount
	{
		tables.outfits.insert(decodeEntity(&mut reader, id, version)?);
	}
	for id in 1..=header.effectCount
	{
		tables.effects.insert(decodeEntity(&mut reader, id, version)?);
	}
	for id in 1..=header.missileCount
	{
		tables.missiles.insert(decodeEntity(&mut reader, id, version)?);
	}

	Ok(tables)
}

fn decodeEntity(reader: &mut DataReader, id: u32, version: &Version) -> Result<EntityType>
{
	let properties = parseProperties(reader, version)?;

	let groupCount = if version.features.frameGroups { reader.readU8()? } else { 1 };
	let mut frameGroups = Vec::with_capacity(groupCount as usize);
	for _ in 0..groupCount.max(1)
	{
		if version.features.frameGroups
		{
			let _groupType = reader.readU8()?;
		}
		frameGroups.push(parseFrameGroup(reader, version)?);
	}

	Ok(EntityType { id, properties, frameGroups })
}

#[cfg(test)]
mod tests
{
	use super::*;
	use crate::version::VersionTriple;
	use ::byteorder::{LittleEndian, WriteBytesExt};

	fn buildMinimalDat() -> Vec<u8>
	{
		let mut bytes = vec![];
		bytes.write_u32::<LittleEndian>(0xDEAD_BEEF).unwrap(); // signature
		bytes.write_u16::<LittleEndian>(100).unwrap(); // itemCount (one item: id 100)
		bytes.write_u16::<LittleEndian>(0).unwrap(); // outfitCount
		bytes.write_u16::<LittleEndian>(0).unwrap(); // effectCount
		bytes.write_u16::<LittleEndian>(0).unwrap(); // missileCount

		// One item entity: Ground property (opcode 0x00) then end marker, one 1x1x1 frame group.
		bytes.push(0x00);
		bytes.push(0xFF);
		bytes.push(1); // width
		bytes.push(1); // height
		// exactSize omitted (width/height both 1)
		bytes.push(1); // layers
		bytes.push(1); // patternX
		bytes.push(1); // patternY
		// patternZ omitted (typeZDiv false for this version)
		bytes.push(1); // frameCount
		bytes.write_u16::<LittleEndian>(777).unwrap(); // one sprite id

		bytes
	}

	#[test]
	fn DecodesSingleGroundItem()
	{
		let version = Version::New(VersionTriple::New(7, 40, 0)).unwrap();
		let tables = decodeDat(&buildMinimalDat(), &version).unwrap();

		let item = tables.items.get(FirstItemId).unwrap();
		assert!(item.hasFlag(crate::version::TypeProperty::Ground));
		assert_eq!(1, item.frameGroups.len());
	}
}
