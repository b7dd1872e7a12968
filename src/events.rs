#![allow(non_snake_case, non_upper_case_globals)]
#![cfg_attr(debug_assertions, allow(dead_code))]

use ::serde::{Deserialize, Serialize};
use crate::gamestate::creature::{CharacterSkull, CreatureType, Light, NpcCategory, Outfit, PartyShield, WarIcon};
use crate::gamestate::message::MessageMode;
use crate::gamestate::player::Skill;
use crate::object::Object;
use crate::position::Position;

/**
The version-neutral event stream the Protocol Parser emits and the Game
State consumes, expressed as a single tagged enum rather than the
virtual-dispatch `Events::Base::Update` hierarchy of the original client
(§9). `apply` (in [`crate::gamestate`]) is the single free function that
matches on this tag; events themselves are inert data, cheaply cloned and
serialized (the JSON miner depends on this).
*/
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(tag = "kind")]
pub enum Event
{
	// -- Lifecycle / world --
	WorldInitialized { playerId: u32, playerName: String, position: Position },
	AmbientLightChanged { intensity: u8, color: u8 },
	PlayerMoved { to: Position },
	FullMapDescription { origin: Position, tiles: Vec<(Position, Vec<Object>)> },
	FloorChangeUp,
	FloorChangeDown,

	// -- Tile mutation --
	TileUpdated { position: Position, objects: Vec<Object> },
	TileObjectAdded { position: Position, stackPosition: Option<u8>, object: Object },
	TileObjectTransformed { position: Position, stackPosition: u8, object: Object },
	TileObjectRemoved { position: Position, stackPosition: u8 },

	// -- Creature --
	CreatureSeen
	{
		id: u32,
		name: String,
		creatureType: CreatureType,
		healthPercent: u8,
		direction: crate::gamestate::creature::Direction,
		outfit: Outfit,
		light: Light,
		speed: u16,
		skull: CharacterSkull,
		shield: PartyShield,
		impassable: bool,
	},
	CreatureRemoved { id: u32 },
	CreatureMoved { from: Position, to: Position, stackPosition: u8, id: u32 },
	CreatureHealthChanged { id: u32, healthPercent: u8 },
	CreatureHeadingChanged { id: u32, direction: crate::gamestate::creature::Direction },
	CreatureLightChanged { id: u32, light: Light },
	CreatureOutfitChanged { id: u32, outfit: Outfit },
	CreatureSpeedChanged { id: u32, speed: u16 },
	CreatureSkullChanged { id: u32, skull: CharacterSkull },
	CreatureShieldChanged { id: u32, shield: PartyShield },
	CreatureImpassableChanged { id: u32, impassable: bool },
	CreaturePvPHelpersChanged { id: u32, warIcon: WarIcon },
	GuildMembersOnlineChanged { count: u16 },
	CreatureTypeChanged { id: u32, creatureType: CreatureType },
	CreatureNpcCategoryChanged { id: u32, npcCategory: NpcCategory },

	// -- Player --
	PlayerInventoryUpdated { slot: u8, item: Option<Object> },
	PlayerBlessingsUpdated { blessings: u8 },
	PlayerHotkeyPresetUpdated { presetId: u8 },
	PlayerDataBasicUpdated { vocation: u8, isPremium: bool },
	PlayerDataUpdated
	{
		health: u32, maxHealth: u32,
		mana: u32, maxMana: u32,
		capacity: u32, maxCapacity: u32,
		experience: u64,
		magicLevel: u8,
		soul: u8,
		stamina: u16,
		speed: u16,
		level: u16,
	},
	PlayerSkillsUpdated { skills: [Skill; 7] },
	PlayerIconsUpdated { iconsBitmask: u32 },
	PlayerTacticsUpdated { attackMode: u8, chaseMode: u8, secureMode: bool },
	PvPSituationsChanged { pvpMode: u8 },

	// -- Chat --
	CreatureSpoke { mode: MessageMode, author: String, text: String },
	CreatureSpokeOnMap { mode: MessageMode, author: String, text: String, position: Position },
	CreatureSpokeInChannel { mode: MessageMode, author: String, text: String, channelId: u16 },
	ChannelListUpdated { channels: Vec<(u16, String)> },
	ChannelOpened { channelId: u16, name: String },
	ChannelClosed { channelId: u16 },
	PrivateConversationOpened { withPlayer: String },
	StatusMessageReceived { mode: MessageMode, text: String },
	StatusMessageReceivedInChannel { mode: MessageMode, text: String, channelId: u16 },

	// -- Containers --
	ContainerOpened { id: u32, name: String, iconItemId: u16, slotsPerPage: u8, items: Vec<Object>, hasParent: bool },
	ContainerClosed { id: u32 },
	ContainerAddedItem { id: u32, index: u16, item: Object },
	ContainerTransformedItem { id: u32, index: u16, item: Object },
	ContainerRemovedItem { id: u32, index: u16, backfill: Option<Object> },

	// -- Effects --
	NumberEffectPopped { position: Position, value: i32 },
	GraphicalEffectPopped { position: Position, effectId: u16 },
	MissileFired { origin: Position, target: Position, missileId: u8 },
}

#[cfg(test)]
mod tests
{
	use super::*;

	#[test]
	fn EventSerializesWithKindTag()
	{
		let event = Event::CreatureRemoved { id: 7 };
		let json = serde_json::to_string(&event).unwrap();
		assert!(json.contains("\"kind\":\"CreatureRemoved\""));
	}
}
