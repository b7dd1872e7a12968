#![allow(non_snake_case, non_upper_case_globals)]
#![cfg_attr(debug_assertions, allow(dead_code))]

pub mod container;
pub mod creature;
pub mod map;
pub mod message;
pub mod missile;
pub mod player;

use std::collections::HashMap;
use ::anyhow::Result;
use crate::error::CoreError;
use crate::events::Event;
use crate::object::{CreatureRef, Object};
use crate::position::Position;

use container::Container;
use creature::{Creature, Direction, MovementState};
use map::Map;
use message::{Message, MessageList};
use missile::{Missile, MissileRing};
use player::PlayerData;

/**
The walk-duration coefficients used by protocols new enough to report a
non-linear ground speed curve (`A * ln(speed + B) + C`), matching the
formula the original client reverse-engineered from the real server's
movement timing. Older protocols fall back to treating raw speed as the
duration divisor directly.
*/
const WalkFormulaA: f64 = 857.36;
const WalkFormulaB: f64 = 261.29;
const WalkFormulaC: f64 = -4795.01;

/**
The authoritative, mutable projection of the event stream: everything the
renderer needs to draw a frame. Unlike the source's `Gamestate`, which
carries a reference to the active `Version` for property lookups, this
type is handed whatever lookups it needs (ground speed, stack priority
class) as plain arguments from [`apply`] so it has no lifetime tied to
the asset store.
*/
#[derive(Clone, Debug, Default)]
pub struct Gamestate
{
	pub player: PlayerData,
	pub creatures: HashMap<u32, Creature>,
	pub containers: HashMap<u32, Container>,
	pub messages: MessageList,
	pub missiles: MissileRing,
	pub map: Map,
	pub currentTick: u32,
	pub ambientIntensity: u8,
	pub ambientColor: u8,
	pub guildMembersOnline: u16,
}

impl Gamestate
{
	pub fn New() -> Self
	{
		Self::default()
	}

	pub fn getCreature(&self, id: u32) -> Option<&Creature>
	{
		self.creatures.get(&id)
	}

	pub fn getCreatureMut(&mut self, id: u32) -> Option<&mut Creature>
	{
		self.creatures.get_mut(&id)
	}

	/** Reset everything but the player's own creature id, matching a client that stays logged in across floor resets. */
	pub fn reset(&mut self)
	{
		let ownCreatureId = self.player.ownCreatureId;
		let name = std::mem::take(&mut self.player.name);

		*self = Self::default();
		self.player.ownCreatureId = ownCreatureId;
		self.player.name = name;
	}
}

/**
Applies one parsed [`Event`] to `state`, advancing it deterministically.
This is the sole mutation path for game state, replacing the virtual
`Update(Gamestate&)` dispatch of the source client with a single match.
`assets` supplies the stack-priority classification and ground-speed
lookups that the original's `Gamestate` resolved via its own reference
to the active `Version`/type tables.
*/
pub fn apply(event: &Event, state: &mut Gamestate, assets: &crate::assets::AssetStore) -> Result<()>
{
	match event
	{
		Event::WorldInitialized { playerId, playerName, position } =>
		{
			state.player.ownCreatureId = *playerId;
			state.player.name = playerName.clone();
			state.map.recenter(*position);
		}

		Event::AmbientLightChanged { intensity, color } =>
		{
			state.ambientIntensity = *intensity;
			state.ambientColor = *color;
		}

		Event::PlayerMoved { to } =>
		{
			state.map.recenter(*to);
		}

		Event::FullMapDescription { origin, tiles } =>
		{
			state.map.recenter(*origin);
			state.map.reset();
			for (position, objects) in tiles
			{
				if let Some(tile) = state.map.tileAtMut(*position)
				{
					tile.objects = objects.clone();
				}
			}
		}

		Event::FloorChangeUp | Event::FloorChangeDown =>
		{
			// The parser emits a follow-up FullMapDescription; nothing else to do here.
		}

		Event::TileUpdated { position, objects } =>
		{
			if let Some(tile) = state.map.tileAtMut(*position)
			{
				tile.objects = objects.clone();
			}
		}

		Event::TileObjectAdded { position, stackPosition, object } =>
		{
			let Some(tile) = state.map.tileAtMut(*position) else { return Ok(()) };
			match stackPosition
			{
				Some(index) => tile.insertAt(*index as usize, object.clone()),
				None =>
				{
					let classOf = |candidate: &Object| assets.stackPriorityClass(candidate);
					tile.insertByPriority(classOf(object), object.clone(), classOf);
				}
			}
		}

		Event::TileObjectTransformed { position, stackPosition, object } =>
		{
			if let Some(tile) = state.map.tileAtMut(*position)
			{
				if let Some(slot) = tile.objects.get_mut(*stackPosition as usize)
				{
					*slot = object.clone();
				}
			}
		}

		Event::TileObjectRemoved { position, stackPosition } =>
		{
			if let Some(tile) = state.map.tileAtMut(*position)
			{
				tile.removeAt(*stackPosition as usize);
			}
		}

		Event::CreatureSeen { id, name, creatureType, healthPercent, direction, outfit, light, speed, skull, shield, impassable } =>
		{
			let creature = state.creatures.entry(*id).or_insert_with(|| Creature::New(*id, name.clone(), *creatureType));
			creature.name = name.clone();
			creature.creatureType = *creatureType;
			creature.healthPercent = *healthPercent;
			creature.direction = *direction;
			creature.outfit = *outfit;
			creature.light = *light;
			creature.speed = *speed;
			creature.skull = *skull;
			creature.shield = *shield;
			creature.impassable = *impassable;
		}

		Event::CreatureRemoved { id } =>
		{
			state.creatures.remove(id);
		}

		Event::CreatureMoved { from, to, stackPosition, id } =>
		{
			let speed = state.creatures.get(id).map(|creature| creature.speed).unwrap_or(0);
			let now = state.currentTick;
			let zChanged = from.z != to.z;

			let groundSpeed = state.map.tileAt(*to)
				.and_then(|tile| tile.objects.iter().find_map(|object| object.asItem()))
				.map(|item| assets.groundSpeed(item.id))
				.unwrap_or(100);

			let reference = state.map.tileAtMut(*from)
				.and_then(|tile| tile.removeAt(*stackPosition as usize));

			if let Some(tile) = state.map.tileAtMut(*to)
			{
				let object = reference.unwrap_or(Object::Creature(CreatureRef { creatureId: *id }));
				let classOf = |candidate: &Object| assets.stackPriorityClass(candidate);
				tile.insertByPriority(classOf(&object), object, classOf);
			}

			if let Some(creature) = state.creatures.get_mut(id)
			{
				creature.direction = Direction::fromDelta(to.x - from.x, to.y - from.y);
				creature.movement = MovementState
				{
					origin: *from,
					target: *to,
					walkStartTick: now,
					walkEndTick: now + if zChanged { 0 } else { walkDurationMs(speed, groundSpeed, true) },
					..Default::default()
				};
			}

			if state.player.ownCreatureId == *id
			{
				state.map.recenter(*to);
			}
		}

		Event::CreatureHealthChanged { id, healthPercent } =>
		{
			if let Some(creature) = state.getCreatureMut(*id) { creature.healthPercent = *healthPercent; }
		}

		Event::CreatureHeadingChanged { id, direction } =>
		{
			if let Some(creature) = state.getCreatureMut(*id) { creature.direction = *direction; }
		}

		Event::CreatureLightChanged { id, light } =>
		{
			if let Some(creature) = state.getCreatureMut(*id) { creature.light = *light; }
		}

		Event::CreatureOutfitChanged { id, outfit } =>
		{
			if let Some(creature) = state.getCreatureMut(*id) { creature.outfit = *outfit; }
		}

		Event::CreatureSpeedChanged { id, speed } =>
		{
			if let Some(creature) = state.getCreatureMut(*id) { creature.speed = *speed; }
		}

		Event::CreatureSkullChanged { id, skull } =>
		{
			if let Some(creature) = state.getCreatureMut(*id) { creature.skull = *skull; }
		}

		Event::CreatureShieldChanged { id, shield } =>
		{
			if let Some(creature) = state.getCreatureMut(*id) { creature.shield = *shield; }
		}

		Event::CreatureImpassableChanged { id, impassable } =>
		{
			if let Some(creature) = state.getCreatureMut(*id) { creature.impassable = *impassable; }
		}

		Event::CreaturePvPHelpersChanged { id, warIcon } =>
		{
			if let Some(creature) = state.getCreatureMut(*id) { creature.warIcon = *warIcon; }
		}

		Event::GuildMembersOnlineChanged { count } =>
		{
			state.guildMembersOnline = *count;
		}

		Event::CreatureTypeChanged { id, creatureType } =>
		{
			if let Some(creature) = state.getCreatureMut(*id) { creature.creatureType = *creatureType; }
		}

		Event::CreatureNpcCategoryChanged { id, npcCategory } =>
		{
			if let Some(creature) = state.getCreatureMut(*id) { creature.npcCategory = *npcCategory; }
		}

		Event::PlayerInventoryUpdated { slot, item } =>
		{
			use player::InventorySlot;
			let slot = inventorySlotFromIndex(*slot)
				.ok_or_else(|| CoreError::InvalidData(format!("inventory slot {slot} out of range")))?;
			let item = match item
			{
				Some(Object::Item(stack)) => Some(stack.clone()),
				Some(Object::Creature(_)) => None,
				None => None,
			};
			state.player.setInventorySlot(slot, item);
			let _ = InventorySlot::Head;
		}

		Event::PlayerBlessingsUpdated { blessings } =>
		{
			state.player.blessings = player::Blessings(*blessings);
		}

		Event::PlayerHotkeyPresetUpdated { presetId } =>
		{
			state.player.hotkeyPresetId = *presetId;
		}

		Event::PlayerDataBasicUpdated { vocation, isPremium } =>
		{
			state.player.vocation = *vocation;
			let _ = isPremium;
		}

		Event::PlayerDataUpdated { health, maxHealth, mana, maxMana, capacity, maxCapacity, experience, magicLevel, soul, stamina, speed, level } =>
		{
			state.player.health = *health;
			state.player.maxHealth = *maxHealth;
			state.player.mana = *mana;
			state.player.maxMana = *maxMana;
			state.player.capacity = *capacity;
			state.player.maxCapacity = *maxCapacity;
			state.player.experience = *experience;
			state.player.magicLevel = *magicLevel;
			state.player.soul = *soul;
			state.player.stamina = *stamina;
			state.player.speed = *speed;
			state.player.level = *level;
		}

		Event::PlayerSkillsUpdated { skills } =>
		{
			state.player.skills = *skills;
		}

		Event::PlayerIconsUpdated { iconsBitmask } =>
		{
			state.player.iconsBitmask = *iconsBitmask;
		}

		Event::PlayerTacticsUpdated { attackMode, chaseMode, secureMode } =>
		{
			state.player.attackMode = *attackMode;
			state.player.chaseMode = *chaseMode;
			state.player.secureMode = *secureMode;
		}

		Event::PvPSituationsChanged { pvpMode } =>
		{
			state.player.pvpMode = *pvpMode;
		}

		Event::CreatureSpoke { mode, author, text } =>
		{
			pushMessage(state, *mode, Some(author.clone()), None, text.clone());
		}

		Event::CreatureSpokeOnMap { mode, author, text, position } =>
		{
			pushMessage(state, *mode, Some(author.clone()), Some(*position), text.clone());
		}

		Event::CreatureSpokeInChannel { mode, author, text, channelId } =>
		{
			let _ = channelId;
			pushMessage(state, *mode, Some(author.clone()), None, text.clone());
		}

		Event::ChannelListUpdated { .. }
		| Event::ChannelOpened { .. }
		| Event::ChannelClosed { .. }
		| Event::PrivateConversationOpened { .. } =>
		{
			// Channel bookkeeping has no gamestate-visible effect beyond the messages it carries.
		}

		Event::StatusMessageReceived { mode, text } =>
		{
			pushMessage(state, *mode, None, None, text.clone());
		}

		Event::StatusMessageReceivedInChannel { mode, text, channelId } =>
		{
			let _ = channelId;
			pushMessage(state, *mode, None, None, text.clone());
		}

		Event::ContainerOpened { id, name, iconItemId, slotsPerPage, items, hasParent } =>
		{
			let mut container = Container::New(*id, name.clone(), *iconItemId, *slotsPerPage);
			container.hasParent = *hasParent;
			container.items = items.iter().filter_map(|object| object.asItem().cloned()).collect();
			state.containers.insert(*id, container);
		}

		Event::ContainerClosed { id } =>
		{
			state.containers.remove(id);
		}

		Event::ContainerAddedItem { id, index, item } =>
		{
			if let (Some(container), Object::Item(stack)) = (state.containers.get_mut(id), item)
			{
				container.insertAt(*index, stack.clone());
			}
		}

		Event::ContainerTransformedItem { id, index, item } =>
		{
			if let (Some(container), Object::Item(stack)) = (state.containers.get_mut(id), item)
			{
				let localIndex = index.saturating_sub(container.startIndex) as usize;
				if let Some(slot) = container.items.get_mut(localIndex)
				{
					*slot = stack.clone();
				}
			}
		}

		Event::ContainerRemovedItem { id, index, backfill } =>
		{
			if let Some(container) = state.containers.get_mut(id)
			{
				let backfillItem = backfill.as_ref().and_then(|object| object.asItem().cloned());
				container.removeAt(*index, backfillItem);
			}
		}

		Event::NumberEffectPopped { position, value } =>
		{
			let _ = value;
			if let Some(tile) = state.map.tileAtMut(*position)
			{
				tile.numberEffects.push(map::TileEffect { effectId: 0, startTick: state.currentTick });
			}
		}

		Event::GraphicalEffectPopped { position, effectId } =>
		{
			if let Some(tile) = state.map.tileAtMut(*position)
			{
				tile.graphicalEffects.push(map::TileEffect { effectId: *effectId, startTick: state.currentTick });
			}
		}

		Event::MissileFired { origin, target, missileId } =>
		{
			state.missiles.push(Missile { id: *missileId, origin: *origin, target: *target, startTick: state.currentTick });
		}
	}

	Ok(())
}

/** Walk duration in ms: `1000 * groundSpeed / effectiveSpeed`, where `effectiveSpeed` is the log-curve formula for modern protocols or the raw creature speed otherwise. */
fn walkDurationMs(speed: u16, groundSpeed: u16, useLogFormula: bool) -> u32
{
	let speed = speed as f64;
	let effective = if useLogFormula
	{
		(WalkFormulaA * (speed + WalkFormulaB).ln() + WalkFormulaC).max(1.0)
	}
	else
	{
		speed.max(1.0)
	};

	(1000.0 * groundSpeed.max(1) as f64 / effective).round().max(1.0) as u32
}

fn inventorySlotFromIndex(index: u8) -> Option<player::InventorySlot>
{
	use player::InventorySlot::*;
	Some(match index
	{
		0 => Head, 1 => Amulet, 2 => Backpack, 3 => Chest, 4 => RightArm,
		5 => LeftArm, 6 => Legs, 7 => Boots, 8 => Ring, 9 => Quiver, 10 => Purse,
		_ => return None,
	})
}

fn pushMessage(state: &mut Gamestate, mode: message::MessageMode, author: Option<String>, position: Option<Position>, text: String)
{
	let now = state.currentTick;
	state.messages.push(Message { mode, author, position, text, startTick: now });
	state.messages.prune(now);
}

#[cfg(test)]
mod tests
{
	use super::*;
	use crate::assets::AssetStore;
	use crate::gamestate::creature::CreatureType;
	use crate::gamestate::creature::{CharacterSkull, Light, Outfit, PartyShield};
	use crate::gamestate::message::MessageMode;

	#[test]
	fn WorldInitializedSetsPlayerIdentity()
	{
		let mut state = Gamestate::New();
		let assets = AssetStore::default();
		apply(&Event::WorldInitialized { playerId: 7, playerName: "Rashid".into(), position: Position::New(100, 100, 7) }, &mut state, &assets).unwrap();

		assert_eq!(7, state.player.ownCreatureId);
		assert_eq!("Rashid", state.player.name);
	}

	#[test]
	fn CreatureSeenThenRemovedRoundTrips()
	{
		let mut state = Gamestate::New();
		let assets = AssetStore::default();
		apply(&Event::CreatureSeen
		{
			id: 1, name: "Rat".into(), creatureType: CreatureType::Monster, healthPercent: 100,
			direction: Direction::North, outfit: Outfit::Item { id: 100 }, light: Light::default(),
			speed: 220, skull: CharacterSkull::None, shield: PartyShield::None, impassable: false,
		}, &mut state, &assets).unwrap();
		assert!(state.getCreature(1).is_some());

		apply(&Event::CreatureRemoved { id: 1 }, &mut state, &assets).unwrap();
		assert!(state.getCreature(1).is_none());
	}

	#[test]
	fn CreatureMovedSetsWalkEndTickInFuture()
	{
		let mut state = Gamestate::New();
		let assets = AssetStore::default();
		apply(&Event::CreatureSeen
		{
			id: 1, name: "Rat".into(), creatureType: CreatureType::Monster, healthPercent: 100,
			direction: Direction::North, outfit: Outfit::Item { id: 100 }, light: Light::default(),
			speed: 220, skull: CharacterSkull::None, shield: PartyShield::None, impassable: false,
		}, &mut state, &assets).unwrap();

		state.currentTick = 1_000;
		apply(&Event::CreatureMoved { from: Position::New(100, 100, 7), to: Position::New(101, 100, 7), stackPosition: 0, id: 1 }, &mut state, &assets).unwrap();

		let creature = state.getCreature(1).unwrap();
		assert!(creature.movement.walkEndTick > state.currentTick);
		assert_eq!(Direction::East, creature.direction);
	}

	#[test]
	fn StatusMessagePrunesOnArrival()
	{
		let mut state = Gamestate::New();
		let assets = AssetStore::default();
		state.currentTick = 0;
		apply(&Event::StatusMessageReceived { mode: MessageMode::Warning, text: "low health".into() }, &mut state, &assets).unwrap();
		assert_eq!(1, state.messages.len());

		state.currentTick = 50_000;
		apply(&Event::StatusMessageReceived { mode: MessageMode::Warning, text: "again".into() }, &mut state, &assets).unwrap();
		assert_eq!(1, state.messages.len());
	}

	#[test]
	fn ResetPreservesPlayerIdentity()
	{
		let mut state = Gamestate::New();
		let assets = AssetStore::default();
		apply(&Event::WorldInitialized { playerId: 7, playerName: "Rashid".into(), position: Position::New(100, 100, 7) }, &mut state, &assets).unwrap();
		apply(&Event::CreatureSeen
		{
			id: 1, name: "Rat".into(), creatureType: CreatureType::Monster, healthPercent: 100,
			direction: Direction::North, outfit: Outfit::Item { id: 100 }, light: Light::default(),
			speed: 220, skull: CharacterSkull::None, shield: PartyShield::None, impassable: false,
		}, &mut state, &assets).unwrap();

		state.reset();

		assert_eq!(7, state.player.ownCreatureId);
		assert!(state.creatures.is_empty());
	}
}
