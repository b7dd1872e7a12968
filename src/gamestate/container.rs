#![allow(non_snake_case, non_upper_case_globals)]
#![cfg_attr(debug_assertions, allow(dead_code))]

use crate::object::ItemStack;

/** An open container window (backpack, depot chest, etc). */
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Container
{
	pub id: u32,
	pub name: String,
	pub iconItemId: u16,
	pub slotsPerPage: u8,
	pub startIndex: u16,
	pub totalItemCount: u16,
	pub items: Vec<ItemStack>,
	pub hasParent: bool,
	pub dragAndDrop: bool,
}

impl Container
{
	pub fn New(id: u32, name: String, iconItemId: u16, slotsPerPage: u8) -> Self
	{
		Self { id, name, iconItemId, slotsPerPage, ..Default::default() }
	}

	/** Insert at `externalIndex - startIndex`, per §4.G. */
	pub fn insertAt(&mut self, externalIndex: u16, item: ItemStack)
	{
		let localIndex = externalIndex.saturating_sub(self.startIndex) as usize;
		if localIndex <= self.items.len()
		{
			self.items.insert(localIndex, item);
			self.items.truncate(self.slotsPerPage as usize);
		}
	}

	/** Remove at `externalIndex - startIndex`, appending a backfill item if the container was full. */
	pub fn removeAt(&mut self, externalIndex: u16, backfill: Option<ItemStack>)
	{
		let localIndex = externalIndex.saturating_sub(self.startIndex) as usize;
		if localIndex < self.items.len()
		{
			self.items.remove(localIndex);
		}

		if let Some(item) = backfill
		{
			if self.items.len() < self.slotsPerPage as usize
			{
				self.items.push(item);
			}
		}
	}
}

#[cfg(test)]
mod tests
{
	use super::*;

	#[test]
	fn InsertRespectsStartIndexOffset()
	{
		let mut container = Container::New(1, "Backpack".into(), 100, 20);
		container.startIndex = 5;
		container.insertAt(5, ItemStack::New(200));
		assert_eq!(1, container.items.len());
	}

	#[test]
	fn RemoveAppendsBackfillWhenSupplied()
	{
		let mut container = Container::New(1, "Backpack".into(), 100, 20);
		container.items.push(ItemStack::New(200));
		container.removeAt(0, Some(ItemStack::New(300)));

		assert_eq!(1, container.items.len());
		assert_eq!(300, container.items[0].id);
	}
}
