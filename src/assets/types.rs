#![allow(non_snake_case, non_upper_case_globals)]
#![cfg_attr(debug_assertions, allow(dead_code))]

use std::collections::HashMap;
use ::anyhow::Result;
use crate::reader::DataReader;
use crate::version::{TypeProperty, Version};

/** One (min, max) animation-phase duration pair, in milliseconds. */
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PhaseDuration
{
	pub minMs: u32,
	pub maxMs: u32,
}

/** Per-frame-group sprite geometry: tile footprint, layering, and animation timing. */
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrameGroup
{
	pub width: u8,
	pub height: u8,
	pub exactSize: u8,
	pub layers: u8,
	pub patternX: u8,
	pub patternY: u8,
	pub patternZ: u8,
	pub frameCount: u8,
	pub phases: Vec<PhaseDuration>,
	pub spriteIds: Vec<u32>,
}

impl FrameGroup
{
	/** Sprite id for an object at `(worldX, worldY, worldZ)` stacked `stackOffset` deep, resolving the xyz-divisor tiling rule. */
	pub fn spriteIdFor(&self, worldX: i32, worldY: i32, worldZ: i32, stackOffset: u8, frame: u8) -> Option<u32>
	{
		if self.width == 0 || self.height == 0
		{
			return None;
		}

		let patternX = (worldX.rem_euclid(self.patternX.max(1) as i32)) as u32;
		let patternY = (worldY.rem_euclid(self.patternY.max(1) as i32)) as u32;
		let patternZ = (worldZ.rem_euclid(self.patternZ.max(1) as i32)) as u32;
		let layer = (stackOffset as u32) % self.layers.max(1) as u32;

		let framesStride = self.frameCount.max(1) as u32;
		let patternZStride = self.patternZ.max(1) as u32;
		let patternYStride = self.patternY.max(1) as u32;
		let patternXStride = self.patternX.max(1) as u32;
		let layersStride = self.layers.max(1) as u32;

		let index = frame as u32
			+ framesStride * (patternZ + patternZStride * (patternY + patternYStride * (patternX + patternXStride * (layer + layersStride * 0))));

		self.spriteIds.get(index as usize).copied()
	}
}

/** A boolean or numeric type property, as decoded by the version's opcode translation table. */
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PropertyValue
{
	Flag,
	Value(u32),
}

/** A single Item/Outfit/Effect/Missile record: one or more frame groups plus a property set. */
#[derive(Clone, Debug, Default)]
pub struct EntityType
{
	pub id: u32,
	pub properties: HashMap<TypeProperty, PropertyValue>,
	pub frameGroups: Vec<FrameGroup>,
}

impl EntityType
{
	pub fn hasFlag(&self, property: TypeProperty) -> bool
	{
		matches!(self.properties.get(&property), Some(PropertyValue::Flag) | Some(PropertyValue::Value(_)))
	}

	pub fn valueOf(&self, property: TypeProperty) -> Option<u32>
	{
		match self.properties.get(&property)
		{
			Some(PropertyValue::Value(value)) => Some(*value),
			_ => None,
		}
	}

	/** Frame group 0 unless the version supports distinct walking/idle groups (`frameGroups` feature). */
	pub fn idleGroup(&self) -> Option<&FrameGroup>
	{
		self.frameGroups.first()
	}

	pub fn walkingGroup(&self) -> Option<&FrameGroup>
	{
		if self.frameGroups.len() > 1 { self.frameGroups.get(1) } else { self.frameGroups.first() }
	}
}

/**
Parses one entity's property stream: a sequence of opcode bytes, each
optionally followed by a value payload, terminated by the version's
end-marker (0xFF). Unknown opcodes (translated to `None` by the Version
Profile) are skipped using their declared payload width where known, or
abort parsing otherwise — matching the source's "unsupported property
halts the type table load" behavior.
*/
pub fn parseProperties(reader: &mut DataReader, version: &Version) -> Result<HashMap<TypeProperty, PropertyValue>>
{
	let mut properties = HashMap::new();

	loop
	{
		let opcode = reader.readU8()?;
		if opcode == 0xFF
		{
			break;
		}

		let Some(property) = version.propertyForOpcode(opcode) else { continue };

		let value = match property
		{
			TypeProperty::DisplacementX | TypeProperty::DisplacementY | TypeProperty::HeightDisplacement
			| TypeProperty::LightIntensity | TypeProperty::LightColor | TypeProperty::AutomapColor
			| TypeProperty::LensHelpId | TypeProperty::GroundSpeed | TypeProperty::EquipmentSlot
			| TypeProperty::MarketCategory =>
			{
				PropertyValue::Value(reader.readU16()? as u32)
			}
			_ => PropertyValue::Flag,
		};

		properties.insert(property, value);
	}

	Ok(properties)
}

/** Parse one frame group's geometry, layer/pattern sizes, and animation phase table. */
pub fn parseFrameGroup(reader: &mut DataReader, version: &Version) -> Result<FrameGroup>
{
	let width = reader.readU8()?;
	let height = reader.readU8()?;
	let exactSize = if width > 1 || height > 1 { reader.readU8()? } else { 0 };
	let layers = reader.readU8()?;
	let patternX = reader.readU8()?;
	let patternY = reader.readU8()?;
	let patternZ = if version.features.typeZDiv { reader.readU8()? } else { 1 };
	let frameCount = reader.readU8()?;

	let mut phases = Vec::new();
	if version.features.animationPhases && frameCount > 1
	{
		let _animationMode = reader.readU8()?;
		let _loopCount = reader.readI32()?;
		let _startPhase = reader.readI8()?;

		for _ in 0..frameCount
		{
			phases.push(PhaseDuration { minMs: reader.readU32()?, maxMs: reader.readU32()? });
		}
	}

	let spriteCount = (width as u32) * (height as u32) * (layers as u32)
		* (patternX as u32) * (patternY as u32) * (patternZ as u32) * (frameCount as u32);

	let mut spriteIds = Vec::with_capacity(spriteCount as usize);
	for _ in 0..spriteCount
	{
		spriteIds.push(if version.features.spriteIndexU32 { reader.readU32()? } else { reader.readU16()? as u32 });
	}

	Ok(FrameGroup { width, height, exactSize, layers, patternX, patternY, patternZ, frameCount, phases, spriteIds })
}

#[derive(Clone, Debug, Default)]
pub struct TypeTable
{
	entries: HashMap<u32, EntityType>,
}

impl TypeTable
{
	pub fn get(&self, id: u32) -> Option<&EntityType>
	{
		self.entries.get(&id)
	}

	pub fn insert(&mut self, entityType: EntityType)
	{
		self.entries.insert(entityType.id, entityType);
	}

	pub fn len(&self) -> usize
	{
		self.entries.len()
	}
}

#[cfg(test)]
mod tests
{
	use super::*;
	use crate::version::VersionTriple;

	#[test]
	fn ParsePropertiesStopsAtEndMarker()
	{
		let version = Version::New(VersionTriple::New(8, 0, 0)).unwrap();
		let bytes = [0x00, 0x07, 0xFF];
		let mut reader = DataReader::New(&bytes);

		let properties = parseProperties(&mut reader, &version).unwrap();
		assert!(properties.contains_key(&TypeProperty::Ground));
		assert!(properties.contains_key(&TypeProperty::Takeable));
	}

	#[test]
	fn FrameGroupComputesSpriteIdForSimpleSingleFrame()
	{
		let group = FrameGroup { width: 1, height: 1, layers: 1, patternX: 1, patternY: 1, patternZ: 1, frameCount: 1, spriteIds: vec![42], ..Default::default() };
		assert_eq!(Some(42), group.spriteIdFor(0, 0, 0, 0, 0));
	}

	#[test]
	fn TypeTableRoundTripsById()
	{
		let mut table = TypeTable::default();
		table.insert(EntityType { id: 100, ..Default::default() });
		assert_eq!(100, table.get(100).unwrap().id);
	}
}
