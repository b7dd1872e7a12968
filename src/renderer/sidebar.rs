#![allow(non_snake_case, non_upper_case_globals)]
#![cfg_attr(debug_assertions, allow(dead_code))]

use crate::assets::AssetStore;
use crate::canvas::Canvas;
use crate::gamestate::container::Container;
use crate::gamestate::player::{InventorySlot, PlayerData};
use crate::pixel::Pixel;

const SlotSize: i32 = 34;
const BarHeight: i32 = 10;
const RowSpacing: i32 = 2;

/** Draws the client's static sidebar backdrop; everything else draws on top of it, cursor at `offsetY` untouched. */
pub fn draw_client_background(canvas: &mut Canvas, x: i32, y: i32, width: i32, height: i32)
{
	canvas.drawRectangle(Pixel::opaque(40, 40, 40), x, y, width, height);
}

/** Health/mana fill bars; advances `offsetY` by the space consumed. */
pub fn draw_status_bars(canvas: &mut Canvas, x: i32, offsetY: &mut i32, player: &PlayerData)
{
	let width = 100;

	let healthFraction = if player.maxHealth > 0 { player.health as f32 / player.maxHealth as f32 } else { 0.0 };
	canvas.drawRectangle(Pixel::opaque(60, 0, 0), x, *offsetY, width, BarHeight);
	canvas.drawRectangle(Pixel::opaque(0, 180, 0), x, *offsetY, (width as f32 * healthFraction) as i32, BarHeight);
	*offsetY += BarHeight + RowSpacing;

	let manaFraction = if player.maxMana > 0 { player.mana as f32 / player.maxMana as f32 } else { 0.0 };
	canvas.drawRectangle(Pixel::opaque(0, 0, 60), x, *offsetY, width, BarHeight);
	canvas.drawRectangle(Pixel::opaque(0, 80, 220), x, *offsetY, (width as f32 * manaFraction) as i32, BarHeight);
	*offsetY += BarHeight + RowSpacing;
}

pub fn measure_status_bars_height() -> i32
{
	(BarHeight + RowSpacing) * 2
}

/** The 11-slot equipment grid. */
pub fn draw_inventory_area(canvas: &mut Canvas, x: i32, offsetY: &mut i32, assets: &AssetStore, player: &PlayerData)
{
	use ::strum::IntoEnumIterator;

	for (index, slot) in InventorySlot::iter().enumerate()
	{
		let column = (index % 3) as i32;
		let row = (index / 3) as i32;
		let slotX = x + column * SlotSize;
		let slotY = *offsetY + row * SlotSize;

		canvas.drawRectangle(Pixel::opaque(60, 60, 60), slotX, slotY, SlotSize - 2, SlotSize - 2);

		if let Some(item) = player.inventorySlot(slot)
		{
			if let Some(sprite) = assets.sprites.get(item.id as u32)
			{
				canvas.draw(sprite, slotX + 1, slotY + 1);
			}
		}
	}

	*offsetY += measure_inventory_area_height();
}

pub fn measure_inventory_area_height() -> i32
{
	let rows = (InventorySlot::Count as i32 + 2) / 3;
	rows * SlotSize
}

/** Status icon row (skull, party shield, conditions, ...) driven by the player's icon bitmask. */
pub fn draw_icon_bar(canvas: &mut Canvas, x: i32, offsetY: &mut i32, player: &PlayerData)
{
	let iconSize = 11;
	let mut column = 0;

	for bit in 0..32
	{
		if player.iconsBitmask & (1 << bit) != 0
		{
			canvas.drawRectangle(Pixel::opaque(200, 200, 0), x + column * iconSize, *offsetY, iconSize - 1, iconSize - 1);
			column += 1;
		}
	}

	*offsetY += measure_icon_bar_height();
}

pub fn measure_icon_bar_height() -> i32
{
	11 + RowSpacing
}

/** One open container window: name strip, then its item grid. */
pub fn draw_container(canvas: &mut Canvas, x: i32, offsetY: &mut i32, assets: &AssetStore, container: &Container)
{
	canvas.drawRectangle(Pixel::opaque(30, 30, 30), x, *offsetY, 4 * SlotSize, 12);
	*offsetY += 12;

	for (index, item) in container.items.iter().enumerate()
	{
		let column = (index % 4) as i32;
		let row = (index / 4) as i32;
		let slotX = x + column * SlotSize;
		let slotY = *offsetY + row * SlotSize;

		canvas.drawRectangle(Pixel::opaque(60, 60, 60), slotX, slotY, SlotSize - 2, SlotSize - 2);
		if let Some(sprite) = assets.sprites.get(item.id as u32)
		{
			canvas.draw(sprite, slotX + 1, slotY + 1);
		}
	}

	*offsetY += measure_container_height(container);
}

pub fn measure_container_height(container: &Container) -> i32
{
	let rows = (container.slotsPerPage as i32 + 3) / 4;
	rows * SlotSize
}

#[cfg(test)]
mod tests
{
	use super::*;

	#[test]
	fn StatusBarsAdvanceOffset()
	{
		let mut canvas = Canvas::New(120, 40);
		let mut offsetY = 0;
		draw_status_bars(&mut canvas, 0, &mut offsetY, &PlayerData::New());
		assert_eq!(measure_status_bars_height(), offsetY);
	}

	#[test]
	fn InventoryAreaAdvancesOffsetByMeasuredHeight()
	{
		let mut canvas = Canvas::New(200, 200);
		let mut offsetY = 0;
		let assets = AssetStore::default();
		draw_inventory_area(&mut canvas, 0, &mut offsetY, &assets, &PlayerData::New());
		assert_eq!(measure_inventory_area_height(), offsetY);
	}

	#[test]
	fn ContainerHeightScalesWithSlotCount()
	{
		let container = Container::New(1, "Bag".into(), 100, 20);
		assert!(measure_container_height(&container) > 0);
	}
}
