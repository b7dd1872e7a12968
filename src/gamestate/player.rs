#![allow(non_snake_case, non_upper_case_globals)]
#![cfg_attr(debug_assertions, allow(dead_code))]

use ::strum::EnumIter;

pub const PlayerSkillCount: usize = 7;
pub const MaxCapacity: u32 = u32::MAX;

#[derive(Clone, Copy, Debug, Eq, EnumIter, PartialEq)]
pub enum InventorySlot
{
	Head, Amulet, Backpack, Chest, RightArm, LeftArm, Legs, Boots, Ring, Quiver, Purse,
}

impl InventorySlot
{
	pub const Count: usize = 11;

	pub fn index(self) -> usize
	{
		self as usize
	}
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Skill
{
	pub effective: u16,
	pub actual: u16,
	pub percent: u8,
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Blessings(pub u8);

#[derive(Clone, Debug, Default)]
pub struct PlayerData
{
	pub ownCreatureId: u32,
	pub name: String,
	pub level: u16,
	pub health: u32,
	pub maxHealth: u32,
	pub mana: u32,
	pub maxMana: u32,
	pub capacity: u32,
	pub maxCapacity: u32,
	pub experience: u64,
	pub magicLevel: u8,
	pub soul: u8,
	pub stamina: u16,
	pub speed: u16,
	pub blessings: Blessings,
	pub hotkeyPresetId: u8,
	pub vocation: u8,
	pub iconsBitmask: u32,
	pub attackMode: u8,
	pub chaseMode: u8,
	pub secureMode: bool,
	pub pvpMode: u8,
	pub inventory: [Option<crate::object::ItemStack>; InventorySlot::Count],
	pub skills: [Skill; PlayerSkillCount],
}

impl PlayerData
{
	pub fn New() -> Self
	{
		Self { maxCapacity: MaxCapacity, ..Default::default() }
	}

	pub fn inventorySlot(&self, slot: InventorySlot) -> &Option<crate::object::ItemStack>
	{
		&self.inventory[slot.index()]
	}

	pub fn setInventorySlot(&mut self, slot: InventorySlot, item: Option<crate::object::ItemStack>)
	{
		self.inventory[slot.index()] = item;
	}
}

#[cfg(test)]
mod tests
{
	use super::*;

	#[test]
	fn NewPlayerHasMaxCapacityDefault()
	{
		let player = PlayerData::New();
		assert_eq!(MaxCapacity, player.maxCapacity);
	}

	#[test]
	fn InventorySlotRoundTrips()
	{
		let mut player = PlayerData::New();
		player.setInventorySlot(InventorySlot::Backpack, Some(crate::object::ItemStack::New(42)));
		assert_eq!(42, player.inventorySlot(InventorySlot::Backpack).as_ref().unwrap().id);
	}
}
