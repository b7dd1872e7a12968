#![allow(non_snake_case, non_upper_case_globals)]
#![cfg_attr(debug_assertions, allow(dead_code))]

use ::serde::{Deserialize, Serialize};
use crate::position::Position;

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum CreatureType
{
	Player,
	Monster,
	NPC,
	OwnSummon,
	OtherSummon,
}

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub enum Direction
{
	#[default]
	North,
	East,
	South,
	West,
}

impl Direction
{
	/** Heading from a movement delta; dx wins ties, matching the source's tie-break rule. */
	pub fn fromDelta(dx: i32, dy: i32) -> Self
	{
		if dx > 0 { Direction::East }
		else if dx < 0 { Direction::West }
		else if dy > 0 { Direction::South }
		else { Direction::North }
	}
}

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub enum CharacterSkull { #[default] None, Yellow, Green, White, Red, Black, Orange }

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub enum PartyShield
{
	#[default]
	None,
	WhiteYellow, WhiteBlue, Blue, Yellow,
	BlueSharedExp, YellowSharedExp,
	BlueNoShareExpBlink, YellowNoShareExpBlink,
	BlueNoShareExp, YellowNoShareExp,
	Gray,
}

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub enum WarIcon { #[default] None, Ally, Enemy, Neutral, Member, Other }

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub enum NpcCategory { #[default] None, Normal, Trader, Quest, TraderQuest }

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct Light
{
	pub intensity: u8,
	pub color: u8,
}

/** Either an item worn as the visible outfit, or a full character outfit description. */
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum Outfit
{
	Item { id: u16 },
	Character
	{
		outfitId: u16,
		head: u8,
		primary: u8,
		secondary: u8,
		detail: u8,
		addons: u8,
		mountOutfitId: Option<u16>,
	},
}

impl Default for Outfit
{
	fn default() -> Self
	{
		Outfit::Character { outfitId: 0, head: 0, primary: 0, secondary: 0, detail: 0, addons: 0, mountOutfitId: None }
	}
}

/** The movement-interpolation state used by `update_walk_offset` during rendering. */
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct MovementState
{
	pub origin: Position,
	pub target: Position,
	pub walkStartTick: u32,
	pub walkEndTick: u32,
	pub lastInterpolationTick: u32,
	pub offsetX: f32,
	pub offsetY: f32,
}

impl MovementState
{
	pub fn isWalking(&self, now: u32) -> bool
	{
		self.walkEndTick > now
	}

	/**
	Linearly interpolates `(target - origin) * ((now - start) / (end - start))`,
	recomputed at most once per tick (callers are expected to call this once
	per render, not per pixel).
	*/
	pub fn updateWalkOffset(&mut self, now: u32)
	{
		if now == self.lastInterpolationTick
		{
			return;
		}
		self.lastInterpolationTick = now;

		if self.walkEndTick <= self.walkStartTick || now >= self.walkEndTick
		{
			self.offsetX = 0.0;
			self.offsetY = 0.0;
			return;
		}

		let span = (self.walkEndTick - self.walkStartTick) as f32;
		let elapsed = now.saturating_sub(self.walkStartTick) as f32;
		let t = (elapsed / span).clamp(0.0, 1.0);

		let dx = (self.target.x - self.origin.x) as f32;
		let dy = (self.target.y - self.origin.y) as f32;

		// Offset expressed relative to the destination tile: starts at
		// -dx*32 px (still at origin) and interpolates to 0 (arrived).
		self.offsetX = -dx * 32.0 * (1.0 - t);
		self.offsetY = -dy * 32.0 * (1.0 - t);
	}
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct Creature
{
	pub id: u32,
	pub name: String,
	pub creatureType: CreatureType_,
	pub healthPercent: u8,
	pub direction: Direction,
	pub light: Light,
	pub speed: u16,
	pub skull: CharacterSkull,
	pub shield: PartyShield,
	pub warIcon: WarIcon,
	pub npcCategory: NpcCategory,
	pub impassable: bool,
	pub outfit: Outfit,
	pub movement: MovementState,
}

// `CreatureType` is re-exported at two names to keep `Default` derivation
// simple for a type whose "zero" variant isn't first in the wire enum.
pub type CreatureType_ = CreatureType;

impl Default for CreatureType
{
	fn default() -> Self { CreatureType::Monster }
}

impl Creature
{
	pub fn New(id: u32, name: String, creatureType: CreatureType) -> Self
	{
		Self { id, name, creatureType, healthPercent: 100, ..Default::default() }
	}
}

#[cfg(test)]
mod tests
{
	use super::*;

	#[test]
	fn DirectionFromDeltaPrefersDx()
	{
		assert_eq!(Direction::East, Direction::fromDelta(1, 1));
		assert_eq!(Direction::West, Direction::fromDelta(-1, 1));
	}

	#[test]
	fn WalkOffsetInterpolatesToZero()
	{
		let mut movement = MovementState
		{
			origin: Position::New(100, 100, 7),
			target: Position::New(101, 100, 7),
			walkStartTick: 0,
			walkEndTick: 1000,
			..Default::default()
		};

		movement.updateWalkOffset(500);
		assert_eq!(-16.0, movement.offsetX);

		movement.updateWalkOffset(1000);
		assert_eq!(0.0, movement.offsetX);
	}

	#[test]
	fn IsWalkingReflectsEndTick()
	{
		let movement = MovementState { walkEndTick: 500, ..Default::default() };
		assert!(movement.isWalking(100));
		assert!(!movement.isWalking(600));
	}
}
