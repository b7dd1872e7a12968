#![allow(non_snake_case, non_upper_case_globals)]
#![cfg_attr(debug_assertions, allow(dead_code))]

use ::serde::{Deserialize, Serialize};

/**
A stack slot's payload, rewritten as an explicit sum type rather than the
single struct-with-a-sentinel-id discriminant of the original client. The
wire format still distinguishes creature references with a reserved id in
`0x61..=0x63` (see [`crate::version::Version::creatureMarker`]); the parser
is the only place that sentinel value is ever inspected.
*/
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum Object
{
	Creature(CreatureRef),
	Item(ItemStack),
}

impl Object
{
	pub fn asCreatureId(&self) -> Option<u32>
	{
		match self
		{
			Object::Creature(reference) => Some(reference.creatureId),
			Object::Item(_) => None,
		}
	}

	pub fn asItem(&self) -> Option<&ItemStack>
	{
		match self
		{
			Object::Item(item) => Some(item),
			Object::Creature(_) => None,
		}
	}
}

/** Either a freshly-sighted creature id, or a reference to an already-known one. */
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct CreatureRef
{
	pub creatureId: u32,
}

/** An item occupying a tile, container slot, or inventory slot. */
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct ItemStack
{
	pub id: u16,

	/** Stack count, fluid color byte, or container-mark byte depending on the type's properties. */
	pub extraByte: Option<u8>,

	pub animationPhase: Option<u8>,

	/** Tint applied to certain marked items (e.g. loot highlighting), when the protocol flag is set. */
	pub markColor: Option<u8>,
}

impl ItemStack
{
	pub fn New(id: u16) -> Self
	{
		Self { id, extraByte: None, animationPhase: None, markColor: None }
	}

	pub fn stackCountBucket(&self) -> u8
	{
		let count = self.extraByte.unwrap_or(1);
		match count
		{
			0 => 0,
			1 => 1,
			2 => 2,
			3 => 3,
			4 => 4,
			5..=9 => 5,
			10..=24 => 6,
			25..=49 => 7,
			_ => 8,
		}
	}
}

#[cfg(test)]
mod tests
{
	use super::*;

	#[test]
	fn ObjectCreatureAccessorReturnsId()
	{
		let object = Object::Creature(CreatureRef { creatureId: 42 });
		assert_eq!(Some(42), object.asCreatureId());
	}

	#[test]
	fn StackCountBucketsAreMonotonic()
	{
		let mut item = ItemStack::New(100);
		item.extraByte = Some(60);
		assert_eq!(8, item.stackCountBucket());

		item.extraByte = Some(1);
		assert_eq!(1, item.stackCountBucket());
	}
}
