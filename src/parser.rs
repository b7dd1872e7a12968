#![allow(non_snake_case, non_upper_case_globals)]
#![cfg_attr(debug_assertions, allow(dead_code))]

use std::collections::HashSet;
use ::anyhow::Result;
use crate::assets::AssetStore;
use crate::error::CoreError;
use crate::events::Event;
use crate::gamestate::creature::{CharacterSkull, Direction, Light, NpcCategory, Outfit, PartyShield, WarIcon};
use crate::object::{CreatureRef, ItemStack, Object};
use crate::position::Position;
use crate::reader::DataReader;
use crate::version::{TypeProperty, Version};

/** A "top of stack" sentinel used by several opcodes in place of an explicit index. */
const AutoStackPosition: u8 = 0xFF;

/**
Holds the version profile, asset store (for item property lookups the
wire format itself never spells out, like "is this item stackable"), the
set of creature ids already fully described, and the last known player
position (needed because some opcodes encode movement as signed deltas
relative to it).

Dispatch is a `HashMap<u8, Handler>` built once per parser instance
rather than a single large `match`, so each protocol era's opcode set is
explicit data rather than scattered `if version.atLeast(...)` branches
inline in a switch.
*/
pub struct Parser<'a>
{
	version: Version,
	assets: &'a AssetStore,
	seenCreatures: HashSet<u32>,
	lastPlayerPosition: Position,
	handlers: std::collections::HashMap<u8, Handler>,
}

type Handler = fn(&mut Parser, &mut DataReader) -> Result<Vec<Event>>;

impl<'a> Parser<'a>
{
	pub fn New(version: Version, assets: &'a AssetStore) -> Self
	{
		Self
		{
			version,
			assets,
			seenCreatures: HashSet::new(),
			lastPlayerPosition: Position::default(),
			handlers: buildOpcodeTable(),
		}
	}

	/**
	Parse one inner packet: opcode byte, then a dispatch-table handler.
	Returns the events produced (most handlers produce exactly one, a few
	produce zero or two). Every read must be exact: leftover bytes after
	an opcode's declared fields are a parse error, matching the failure
	policy of every other sub-packet boundary in this crate.
	*/
	pub fn parsePacket(&mut self, reader: &mut DataReader) -> Result<Vec<Event>>
	{
		let opcode = reader.readU8()?;
		let handler = *self.handlers.get(&opcode)
			.ok_or_else(|| CoreError::InvalidData(format!("no handler for opcode 0x{opcode:02X}")))?;
		let events = handler(self, reader)?;
		reader.expectExhausted()?;
		Ok(events)
	}

	fn readPosition(&self, reader: &mut DataReader) -> Result<Position>
	{
		Ok(Position::New(reader.readU16()? as i32, reader.readU16()? as i32, reader.readU8()?))
	}

	fn readOutfit(&self, reader: &mut DataReader) -> Result<Outfit>
	{
		let outfitId = reader.readU16()?;
		if outfitId == 0
		{
			return Ok(Outfit::Item { id: reader.readU16()? });
		}

		let head = reader.readU8()?;
		let primary = reader.readU8()?;
		let secondary = reader.readU8()?;
		let detail = reader.readU8()?;
		let addons = if self.version.protocol.outfitAddons { reader.readU8()? } else { 0 };
		let mountOutfitId = if self.version.protocol.mounts
		{
			let mount = reader.readU16()?;
			if mount != 0 { Some(mount) } else { None }
		}
		else
		{
			None
		};

		Ok(Outfit::Character { outfitId, head, primary, secondary, detail, addons, mountOutfitId })
	}

	/**
	Reads one tile-stack entry: either a creature reference (preceded by
	the version's creature-marker sentinel id) or an item. Returns the
	object plus any `CreatureSeen` event produced when the creature is
	being described for the first time this session.
	*/
	fn readObject(&mut self, reader: &mut DataReader) -> Result<(Object, Option<Event>)>
	{
		let id = reader.readU16()?;

		if id == self.version.creatureMarker()
		{
			let knownFlag = reader.readU16()?;
			let creatureId = if knownFlag == 0 || !self.seenCreatures.contains(&(knownFlag as u32))
			{
				reader.readU32()?
			}
			else
			{
				knownFlag as u32
			};

			if self.seenCreatures.contains(&creatureId)
			{
				return Ok((Object::Creature(CreatureRef { creatureId }), None));
			}

			self.seenCreatures.insert(creatureId);

			let name = reader.readString()?;
			let healthPercent = reader.readU8()?;
			let direction = directionFromByte(reader.readU8()?);
			let outfit = self.readOutfit(reader)?;
			let light = Light { intensity: reader.readU8()?, color: reader.readU8()? };
			let speed = reader.readU16()?;
			if self.version.protocol.creatureSpeedPadding { reader.skip(2)?; }
			let skull = if self.version.protocol.creatureMarks { skullFromByte(reader.readU8()?) } else { CharacterSkull::None };
			let shield = if self.version.protocol.creatureMarks { shieldFromByte(reader.readU8()?) } else { PartyShield::None };
			let impassable = if self.version.protocol.passableCreatures { reader.readU8()? != 0 } else { false };

			let event = Event::CreatureSeen
			{
				id: creatureId, name, creatureType: crate::gamestate::creature::CreatureType::Monster,
				healthPercent, direction, outfit, light, speed, skull, shield, impassable,
			};

			Ok((Object::Creature(CreatureRef { creatureId }), Some(event)))
		}
		else
		{
			let itemId = id;
			let entityType = self.assets.types.items.get(itemId as u32);

			let extraByte = match entityType
			{
				Some(entityType) if entityType.hasFlag(TypeProperty::Stackable) || entityType.hasFlag(TypeProperty::Fluid) =>
				{
					Some(reader.readU8()?)
				}
				_ => None,
			};

			let animationPhase = match entityType
			{
				Some(entityType) if entityType.hasFlag(TypeProperty::AnimateIdle) && self.version.features.animationPhases =>
				{
					Some(reader.readU8()?)
				}
				_ => None,
			};

			let markColor = if self.version.protocol.itemMarks
			{
				let flag = reader.readU8()?;
				if flag != 0 { Some(reader.readU8()?) } else { None }
			}
			else
			{
				None
			};

			Ok((Object::Item(ItemStack { id: itemId, extraByte, animationPhase, markColor }), None))
		}
	}

	/**
	Reads one tile's object stack, stopping at the wire format's
	end-of-stack marker: a little-endian u16 `>= 0xFF00`, a value no real
	item or creature id ever takes. The marker's low byte is a skip count —
	how many subsequent tiles carry no content at all and are omitted from
	the stream entirely. Returns that count alongside the stack read so far.
	*/
	fn readTileStack(&mut self, reader: &mut DataReader) -> Result<(Vec<Object>, Vec<Event>, u8)>
	{
		let mut objects = vec![];
		let mut events = vec![];

		loop
		{
			let marker = reader.peek(2)?;
			let candidate = u16::from_le_bytes([marker[0], marker[1]]);
			if candidate >= 0xFF00
			{
				reader.skip(2)?;
				return Ok((objects, events, (candidate & 0xFF) as u8));
			}

			let (object, event) = self.readObject(reader)?;
			objects.push(object);
			events.extend(event);
		}
	}

	/**
	Reads one floor's `width` x `height` grid of tile stacks in row-major
	order starting at world `(originX, originY, z)`. `tileSkip` is the
	outstanding "tiles with no content" count carried in from whatever read
	immediately before this floor (another tile, or the previous floor); a
	skip can span a floor boundary, so the remaining count is returned to
	be threaded into the next call.
	*/
	fn readFloorDescription(&mut self, reader: &mut DataReader, originX: i32, originY: i32, z: u8, width: i32, height: i32, mut tileSkip: u8) -> Result<(Vec<(Position, Vec<Object>)>, Vec<Event>, u8)>
	{
		let mut tiles = vec![];
		let mut events = vec![];

		for y in 0..height
		{
			for x in 0..width
			{
				if tileSkip > 0
				{
					tileSkip -= 1;
					continue;
				}

				let (objects, tileEvents, skip) = self.readTileStack(reader)?;
				events.extend(tileEvents);
				tiles.push((Position::New(originX + x, originY + y, z), objects));
				tileSkip = skip;
			}
		}

		Ok((tiles, events, tileSkip))
	}

	/**
	Reads the full set of floors a `FullMapDescription` covers: the two
	floors immediately above and below when underground, or sea level down
	to the ground floor when at or above it, each as an 18x14 grid centered
	on `origin`. Matches [`crate::renderer::bottomVisibleFloor`]'s notion of
	the underground window; the overground case always reads every floor
	down to 0 rather than the render-time "stop at the first obscuring
	roof" heuristic, since that heuristic depends on tiles this same read
	hasn't populated yet.
	*/
	fn readMapDescription(&mut self, reader: &mut DataReader, origin: Position) -> Result<(Vec<(Position, Vec<Object>)>, Vec<Event>)>
	{
		let originX = origin.x - crate::gamestate::map::MapWidth as i32 / 2;
		let originY = origin.y - crate::gamestate::map::MapHeight as i32 / 2;

		let floors: Vec<u8> = if origin.z > 7
		{
			let start = origin.z.saturating_sub(2);
			let end = (origin.z + 2).min(15);
			(start..=end).collect()
		}
		else
		{
			(0..=7).rev().collect()
		};

		let mut tiles = vec![];
		let mut events = vec![];
		let mut tileSkip = 0u8;

		for floor in floors
		{
			let (floorTiles, floorEvents, skip) = self.readFloorDescription(
				reader, originX, originY, floor,
				crate::gamestate::map::MapWidth as i32, crate::gamestate::map::MapHeight as i32,
				tileSkip)?;
			tiles.extend(floorTiles);
			events.extend(floorEvents);
			tileSkip = skip;
		}

		Ok((tiles, events))
	}
}

fn directionFromByte(byte: u8) -> Direction
{
	match byte { 1 => Direction::East, 2 => Direction::South, 3 => Direction::West, _ => Direction::North }
}

fn skullFromByte(byte: u8) -> CharacterSkull
{
	match byte
	{
		1 => CharacterSkull::Yellow, 2 => CharacterSkull::Green, 3 => CharacterSkull::White,
		4 => CharacterSkull::Red, 5 => CharacterSkull::Black, 6 => CharacterSkull::Orange,
		_ => CharacterSkull::None,
	}
}

fn shieldFromByte(byte: u8) -> PartyShield
{
	match byte
	{
		1 => PartyShield::WhiteYellow, 2 => PartyShield::WhiteBlue, 3 => PartyShield::Blue, 4 => PartyShield::Yellow,
		5 => PartyShield::BlueSharedExp, 6 => PartyShield::YellowSharedExp,
		7 => PartyShield::BlueNoShareExpBlink, 8 => PartyShield::YellowNoShareExpBlink,
		9 => PartyShield::BlueNoShareExp, 10 => PartyShield::YellowNoShareExp,
		11 => PartyShield::Gray, _ => PartyShield::None,
	}
}

fn warIconFromByte(byte: u8) -> WarIcon
{
	match byte { 1 => WarIcon::Ally, 2 => WarIcon::Enemy, 3 => WarIcon::Neutral, 4 => WarIcon::Member, _ => WarIcon::Other }
}

fn npcCategoryFromByte(byte: u8) -> NpcCategory
{
	match byte { 1 => NpcCategory::Normal, 2 => NpcCategory::Trader, 3 => NpcCategory::Quest, 4 => NpcCategory::TraderQuest, _ => NpcCategory::None }
}

fn buildOpcodeTable() -> std::collections::HashMap<u8, Handler>
{
	let mut table: std::collections::HashMap<u8, Handler> = std::collections::HashMap::new();

	table.insert(0x0A, |parser, reader|
	{
		let playerId = reader.readU32()?;
		let playerName = reader.readString()?;
		let position = parser.readPosition(reader)?;
		parser.lastPlayerPosition = position;
		Ok(vec![Event::WorldInitialized { playerId, playerName, position }])
	});

	table.insert(0x15, |_parser, reader|
	{
		Ok(vec![Event::AmbientLightChanged { intensity: reader.readU8()?, color: reader.readU8()? }])
	});

	table.insert(0x64, |parser, reader|
	{
		let origin = parser.readPosition(reader)?;
		parser.lastPlayerPosition = origin;
		let (tiles, mut events) = parser.readMapDescription(reader, origin)?;
		events.insert(0, Event::FullMapDescription { origin, tiles });
		Ok(events)
	});

	table.insert(0x65, |_parser, _reader| Ok(vec![Event::FloorChangeUp]));
	table.insert(0x66, |_parser, _reader| Ok(vec![Event::FloorChangeDown]));

	table.insert(0x69, |parser, reader|
	{
		let position = parser.readPosition(reader)?;
		let (objects, mut events, _skip) = parser.readTileStack(reader)?;
		events.push(Event::TileUpdated { position, objects });
		Ok(events)
	});

	table.insert(0x6A, |parser, reader|
	{
		let position = parser.readPosition(reader)?;
		let stackByte = reader.readU8()?;
		let (object, seen) = parser.readObject(reader)?;
		let mut events: Vec<Event> = seen.into_iter().collect();
		let stackPosition = if stackByte == AutoStackPosition { None } else { Some(stackByte) };
		events.push(Event::TileObjectAdded { position, stackPosition, object });
		Ok(events)
	});

	table.insert(0x6B, |parser, reader|
	{
		let position = parser.readPosition(reader)?;
		let stackPosition = reader.readU8()?;
		let (object, seen) = parser.readObject(reader)?;
		let mut events: Vec<Event> = seen.into_iter().collect();
		events.push(Event::TileObjectTransformed { position, stackPosition, object });
		Ok(events)
	});

	table.insert(0x6C, |parser, reader|
	{
		let position = parser.readPosition(reader)?;
		let stackPosition = reader.readU8()?;
		Ok(vec![Event::TileObjectRemoved { position, stackPosition }])
	});

	table.insert(0x6D, |parser, reader|
	{
		let from = parser.readPosition(reader)?;
		let stackPosition = reader.readU8()?;
		let to = parser.readPosition(reader)?;
		let id = reader.readU32()?;
		if from == parser.lastPlayerPosition { parser.lastPlayerPosition = to; }
		Ok(vec![Event::CreatureMoved { from, to, stackPosition, id }])
	});

	table.insert(0x70, |_parser, reader| Ok(vec![Event::CreatureHealthChanged { id: reader.readU32()?, healthPercent: reader.readU8()? }]));
	table.insert(0x71, |_parser, reader| Ok(vec![Event::CreatureHeadingChanged { id: reader.readU32()?, direction: directionFromByte(reader.readU8()?) }]));
	table.insert(0x72, |_parser, reader| Ok(vec![Event::CreatureLightChanged { id: reader.readU32()?, light: Light { intensity: reader.readU8()?, color: reader.readU8()? } }]));

	table.insert(0x73, |parser, reader|
	{
		let id = reader.readU32()?;
		let outfit = parser.readOutfit(reader)?;
		Ok(vec![Event::CreatureOutfitChanged { id, outfit }])
	});

	table.insert(0x74, |parser, reader|
	{
		let id = reader.readU32()?;
		let speed = reader.readU16()?;
		if parser.version.protocol.creatureSpeedPadding { reader.skip(2)?; }
		Ok(vec![Event::CreatureSpeedChanged { id, speed }])
	});

	table.insert(0x75, |_parser, reader| Ok(vec![Event::CreatureSkullChanged { id: reader.readU32()?, skull: skullFromByte(reader.readU8()?) }]));
	table.insert(0x76, |_parser, reader| Ok(vec![Event::CreatureShieldChanged { id: reader.readU32()?, shield: shieldFromByte(reader.readU8()?) }]));
	table.insert(0x77, |_parser, reader| Ok(vec![Event::CreatureImpassableChanged { id: reader.readU32()?, impassable: reader.readU8()? != 0 }]));
	table.insert(0x78, |_parser, reader| Ok(vec![Event::CreaturePvPHelpersChanged { id: reader.readU32()?, warIcon: warIconFromByte(reader.readU8()?) }]));
	table.insert(0x79, |_parser, reader| Ok(vec![Event::GuildMembersOnlineChanged { count: reader.readU16()? }]));
	table.insert(0x7A, |_parser, reader| Ok(vec![Event::CreatureTypeChanged { id: reader.readU32()?, creatureType: creatureTypeFromByte(reader.readU8()?) }]));
	table.insert(0x7B, |_parser, reader| Ok(vec![Event::CreatureNpcCategoryChanged { id: reader.readU32()?, npcCategory: npcCategoryFromByte(reader.readU8()?) }]));

	table.insert(0x32, |parser, reader|
	{
		let slot = reader.readU8()?;
		let hasItem = reader.readU8()? != 0;
		let item = if hasItem { Some(parser.readObject(reader)?.0) } else { None };
		Ok(vec![Event::PlayerInventoryUpdated { slot, item }])
	});

	table.insert(0x33, |_parser, reader| Ok(vec![Event::PlayerBlessingsUpdated { blessings: reader.readU8()? }]));
	table.insert(0x34, |_parser, reader| Ok(vec![Event::PlayerHotkeyPresetUpdated { presetId: reader.readU8()? }]));
	table.insert(0x35, |_parser, reader| Ok(vec![Event::PlayerDataBasicUpdated { vocation: reader.readU8()?, isPremium: reader.readU8()? != 0 }]));

	table.insert(0x36, |parser, reader|
	{
		let position = parser.readPosition(reader)?;
		parser.lastPlayerPosition = position;
		Ok(vec![Event::PlayerMoved { to: position }])
	});

	table.insert(0xA0, |parser, reader|
	{
		let health = reader.readU32()?;
		let maxHealth = reader.readU32()?;
		let capacity = if parser.version.features.capacityDivisor > 1 { reader.readU32()? } else { reader.readU16()? as u32 };
		let maxCapacity = capacity;
		let experience = if parser.version.protocol.experienceU64 { reader.readU64()? } else { reader.readU32()? as u64 };
		let level = if parser.version.protocol.levelU16 { reader.readU16()? } else { reader.readU8()? as u16 };
		let magicLevel = reader.readU8()?;
		let mana = reader.readU32()?;
		let maxMana = reader.readU32()?;
		let soul = if parser.version.protocol.soulPoints { reader.readU8()? } else { 0 };
		let stamina = if parser.version.protocol.stamina { reader.readU16()? } else { 0 };
		let speed = reader.readU16()?;
		Ok(vec![Event::PlayerDataUpdated { health, maxHealth, mana, maxMana, capacity, maxCapacity, experience, magicLevel, soul, stamina, speed, level }])
	});

	table.insert(0xA1, |_parser, reader|
	{
		let mut skills = [crate::gamestate::player::Skill::default(); 7];
		for skill in skills.iter_mut()
		{
			skill.effective = reader.readU16()?;
			skill.actual = reader.readU16()?;
		}
		Ok(vec![Event::PlayerSkillsUpdated { skills }])
	});

	table.insert(0xA2, |_parser, reader| Ok(vec![Event::PlayerIconsUpdated { iconsBitmask: reader.readU32()? }]));

	table.insert(0xA3, |_parser, reader|
	{
		Ok(vec![Event::PlayerTacticsUpdated { attackMode: reader.readU8()?, chaseMode: reader.readU8()?, secureMode: reader.readU8()? != 0 }])
	});

	table.insert(0xA4, |_parser, reader| Ok(vec![Event::PvPSituationsChanged { pvpMode: reader.readU8()? }]));

	table.insert(0xAA, |parser, reader|
	{
		let modeByte = reader.readU8()?;
		let author = reader.readString()?;
		let text = reader.readString()?;
		match parser.version.speakModeForByte(modeByte)
		{
			Some(mode) => Ok(vec![Event::CreatureSpoke { mode, author, text }]),
			None => Ok(vec![]),
		}
	});

	table.insert(0xAB, |parser, reader|
	{
		let modeByte = reader.readU8()?;
		let author = reader.readString()?;
		let position = parser.readPosition(reader)?;
		let text = reader.readString()?;
		match parser.version.speakModeForByte(modeByte)
		{
			Some(mode) => Ok(vec![Event::CreatureSpokeOnMap { mode, author, text, position }]),
			None => Ok(vec![]),
		}
	});

	table.insert(0xAC, |parser, reader|
	{
		let modeByte = reader.readU8()?;
		let author = reader.readString()?;
		let channelId = reader.readU16()?;
		let text = reader.readString()?;
		match parser.version.speakModeForByte(modeByte)
		{
			Some(mode) => Ok(vec![Event::CreatureSpokeInChannel { mode, author, text, channelId }]),
			None => Ok(vec![]),
		}
	});

	table.insert(0xAD, |_parser, reader|
	{
		let count = reader.readU8()?;
		let mut channels = vec![];
		for _ in 0..count { channels.push((reader.readU16()?, reader.readString()?)); }
		Ok(vec![Event::ChannelListUpdated { channels }])
	});

	table.insert(0xAE, |_parser, reader| Ok(vec![Event::ChannelOpened { channelId: reader.readU16()?, name: reader.readString()? }]));
	table.insert(0xAF, |_parser, reader| Ok(vec![Event::ChannelClosed { channelId: reader.readU16()? }]));
	table.insert(0xB0, |_parser, reader| Ok(vec![Event::PrivateConversationOpened { withPlayer: reader.readString()? }]));

	table.insert(0xB1, |parser, reader|
	{
		let modeByte = reader.readU8()?;
		let text = reader.readString()?;
		match parser.version.statusMessageModeForByte(modeByte)
		{
			Some(mode) => Ok(vec![Event::StatusMessageReceived { mode, text }]),
			None => Ok(vec![]),
		}
	});

	table.insert(0xB2, |parser, reader|
	{
		let modeByte = reader.readU8()?;
		let channelId = reader.readU16()?;
		let text = reader.readString()?;
		match parser.version.statusMessageModeForByte(modeByte)
		{
			Some(mode) => Ok(vec![Event::StatusMessageReceivedInChannel { mode, text, channelId }]),
			None => Ok(vec![]),
		}
	});

	table.insert(0xC0, |parser, reader|
	{
		let id = reader.readU32()?;
		let iconItemId = reader.readU16()?;
		let name = reader.readString()?;
		let slotsPerPage = if parser.version.protocol.containerPagination { reader.readU8()? } else { 20 };
		let hasParent = reader.readU8()? != 0;
		let itemCount = if parser.version.protocol.containerIndexU16 { reader.readU16()? } else { reader.readU8()? as u16 };

		let mut items = vec![];
		let mut events = vec![];
		for _ in 0..itemCount
		{
			let (object, seen) = parser.readObject(reader)?;
			events.extend(seen);
			items.push(object);
		}

		events.push(Event::ContainerOpened { id, name, iconItemId, slotsPerPage, items, hasParent });
		Ok(events)
	});

	table.insert(0xC1, |_parser, reader| Ok(vec![Event::ContainerClosed { id: reader.readU32()? }]));

	table.insert(0xC2, |parser, reader|
	{
		let id = reader.readU32()?;
		let index = if parser.version.protocol.containerIndexU16 { reader.readU16()? } else { reader.readU8()? as u16 };
		let (item, seen) = parser.readObject(reader)?;
		let mut events: Vec<Event> = seen.into_iter().collect();
		events.push(Event::ContainerAddedItem { id, index, item });
		Ok(events)
	});

	table.insert(0xC3, |parser, reader|
	{
		let id = reader.readU32()?;
		let index = if parser.version.protocol.containerIndexU16 { reader.readU16()? } else { reader.readU8()? as u16 };
		let (item, seen) = parser.readObject(reader)?;
		let mut events: Vec<Event> = seen.into_iter().collect();
		events.push(Event::ContainerTransformedItem { id, index, item });
		Ok(events)
	});

	table.insert(0xC4, |parser, reader|
	{
		let id = reader.readU32()?;
		let index = if parser.version.protocol.containerIndexU16 { reader.readU16()? } else { reader.readU8()? as u16 };
		let hasBackfill = reader.readU8()? != 0;
		let (backfill, seen) = if hasBackfill
		{
			let (object, seen) = parser.readObject(reader)?;
			(Some(object), seen)
		}
		else
		{
			(None, None)
		};
		let mut events: Vec<Event> = seen.into_iter().collect();
		events.push(Event::ContainerRemovedItem { id, index, backfill });
		Ok(events)
	});

	table.insert(0xD0, |parser, reader|
	{
		let position = parser.readPosition(reader)?;
		Ok(vec![Event::NumberEffectPopped { position, value: reader.readI32()? }])
	});

	table.insert(0xD1, |parser, reader|
	{
		let position = parser.readPosition(reader)?;
		let effectId = if parser.version.protocol.rawEffectIds { reader.readU16()? } else { reader.readU8()? as u16 };
		Ok(vec![Event::GraphicalEffectPopped { position, effectId }])
	});

	table.insert(0xD2, |parser, reader|
	{
		let origin = parser.readPosition(reader)?;
		let target = parser.readPosition(reader)?;
		Ok(vec![Event::MissileFired { origin, target, missileId: reader.readU8()? }])
	});

	table
}

fn creatureTypeFromByte(byte: u8) -> crate::gamestate::creature::CreatureType
{
	use crate::gamestate::creature::CreatureType::*;
	match byte { 0 => Player, 2 => NPC, 3 => OwnSummon, 4 => OtherSummon, _ => Monster }
}

#[cfg(test)]
mod tests
{
	use super::*;
	use crate::version::VersionTriple;
	use ::byteorder::{LittleEndian, WriteBytesExt};

	fn testParser(assets: &AssetStore) -> Parser
	{
		Parser::New(Version::New(VersionTriple::New(8, 0, 0)).unwrap(), assets)
	}

	#[test]
	fn ParsesWorldInitialized()
	{
		let assets = AssetStore::default();
		let mut parser = testParser(&assets);

		let mut bytes = vec![0x0A];
		bytes.write_u32::<LittleEndian>(7).unwrap();
		bytes.write_u16::<LittleEndian>(6).unwrap();
		bytes.extend_from_slice(b"Rashid");
		bytes.write_u16::<LittleEndian>(100).unwrap();
		bytes.write_u16::<LittleEndian>(100).unwrap();
		bytes.push(7);

		let mut reader = DataReader::New(&bytes);
		let events = parser.parsePacket(&mut reader).unwrap();

		assert_eq!(1, events.len());
		assert!(matches!(&events[0], Event::WorldInitialized { playerId: 7, .. }));
	}

	#[test]
	fn UnknownOpcodeIsAnError()
	{
		let assets = AssetStore::default();
		let mut parser = testParser(&assets);
		let mut reader = DataReader::New(&[0xFE]);
		assert!(parser.parsePacket(&mut reader).is_err());
	}

	#[test]
	fn AmbientLightRoundTrips()
	{
		let assets = AssetStore::default();
		let mut parser = testParser(&assets);
		let mut reader = DataReader::New(&[0x15, 200, 215]);
		let events = parser.parsePacket(&mut reader).unwrap();
		assert_eq!(vec![Event::AmbientLightChanged { intensity: 200, color: 215 }], events);
	}

	#[test]
	fn FloorDescriptionCarriesALeftoverSkipOutToTheCaller()
	{
		let assets = AssetStore::default();
		let mut parser = testParser(&assets);

		// A single-tile floor whose only tile is an empty-stack marker asking
		// to skip 3 more tiles than this floor has left to offer.
		let mut bytes = vec![];
		bytes.write_u16::<LittleEndian>(0xFF00 | 3).unwrap();

		let mut reader = DataReader::New(&bytes);
		let (tiles, events, remainder) = parser.readFloorDescription(&mut reader, 0, 0, 7, 1, 1, 0).unwrap();

		assert_eq!(1, tiles.len());
		assert!(tiles[0].1.is_empty());
		assert!(events.is_empty());
		assert_eq!(3, remainder);
	}

	#[test]
	fn FullMapDescriptionPopulatesEveryTileAcrossAllVisibleFloors()
	{
		let assets = AssetStore::default();
		let mut parser = testParser(&assets);
		let origin = Position::New(100, 100, 7);

		// Overground reads floors 7 downto 0, 18x14 each: 2016 tiles total.
		// Eight back-to-back skip markers (255 skipped past each, the last
		// covering only the 224 tiles actually remaining) cover the lot
		// without describing a single real object.
		let mut bytes = vec![];
		for _ in 0..7
		{
			bytes.write_u16::<LittleEndian>(0xFFFF).unwrap();
		}
		bytes.write_u16::<LittleEndian>(0xFF00 | 223).unwrap();

		let mut reader = DataReader::New(&bytes);
		let (tiles, events) = parser.readMapDescription(&mut reader, origin).unwrap();

		assert_eq!(8 * 18 * 14, tiles.len());
		assert!(events.is_empty());
		assert!(tiles.iter().all(|(_, objects)| objects.is_empty()));
		assert!(reader.expectExhausted().is_ok());
	}
}
