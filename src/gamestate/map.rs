#![allow(non_snake_case, non_upper_case_globals)]
#![cfg_attr(debug_assertions, allow(dead_code))]

use crate::object::Object;
use crate::position::Position;

pub const MapWidth: usize = 18;
pub const MapHeight: usize = 14;
pub const MapFloors: usize = 15;
pub const MaxTileObjects: usize = 10;

const HalfWidth: i32 = MapWidth as i32 / 2;
const HalfHeight: i32 = MapHeight as i32 / 2;

/** A timestamped graphical or numeric effect overlay on a tile. */
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TileEffect
{
	pub effectId: u16,
	pub startTick: u32,
}

/**
An ordered stack of up to [`MaxTileObjects`] objects, plus short ring-buffers
of transient overlay effects. Objects are kept sorted by stack-priority
class at all times; `insertAuto` is the only path that determines priority,
`insertAt` trusts the caller (used for explicit stack-position packets).
*/
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Tile
{
	pub objects: Vec<Object>,
	pub numberEffects: Vec<TileEffect>,
	pub graphicalEffects: Vec<TileEffect>,
}

impl Tile
{
	/** Insert by explicit stack index, shifting others up and truncating to [`MaxTileObjects`]. */
	pub fn insertAt(&mut self, index: usize, object: Object)
	{
		let index = index.min(self.objects.len());
		self.objects.insert(index, object);
		self.objects.truncate(MaxTileObjects);
	}

	/**
	Insert by priority class, computed by the caller (the Game State holds
	the Asset Store needed to resolve a type's properties); within a class,
	insertion order is preserved.
	*/
	pub fn insertByPriority(&mut self, priorityClass: u8, object: Object, classOf: impl Fn(&Object) -> u8)
	{
		let position = self.objects.iter().position(|existing| classOf(existing) > priorityClass)
			.unwrap_or(self.objects.len());
		self.objects.insert(position, object);
		self.objects.truncate(MaxTileObjects);
	}

	pub fn removeAt(&mut self, index: usize) -> Option<Object>
	{
		if index < self.objects.len() { Some(self.objects.remove(index)) } else { None }
	}

	pub fn isSortedByPriority(&self, classOf: impl Fn(&Object) -> u8) -> bool
	{
		self.objects.windows(2).all(|pair| classOf(&pair[0]) <= classOf(&pair[1]))
	}
}

/**
A cylindrical ring buffer covering an 18x14x15 window around the player.
Storage slots are addressed by world (x, y) modulo (`MapWidth`, `MapHeight`),
not by a slot index relative to the origin, so a slot's contents stay valid
across a recenter as long as its world position is still inside the window.
`recenter` only has to clear the strip of slots the window's edge newly
swept over (they hold whatever world position last occupied that slot modulo
the window size); floors aren't windowed, `z` addresses a floor directly.
*/
#[derive(Clone, Debug)]
pub struct Map
{
	origin: Position,
	tiles: Vec<Tile>,
	/** Highest drawn floor per on-screen column, used to hide tiles obscured by roofs. */
	renderHeight: Vec<i32>,
}

impl Default for Map
{
	fn default() -> Self
	{
		Self
		{
			origin: Position::default(),
			tiles: vec![Tile::default(); MapWidth * MapHeight * MapFloors],
			renderHeight: vec![0; MapWidth * MapHeight],
		}
	}
}

impl Map
{
	pub fn origin(&self) -> Position
	{
		self.origin
	}

	/** Slides the window, clearing only the slots the leading edge swept over so stale tiles from their last occupant don't resurface (`z` isn't windowed, it needs no clearing). */
	pub fn recenter(&mut self, newOrigin: Position)
	{
		let dx = newOrigin.x - self.origin.x;
		let dy = newOrigin.y - self.origin.y;

		if dx.abs() >= MapWidth as i32 || dy.abs() >= MapHeight as i32
		{
			self.reset();
			self.origin = newOrigin;
			return;
		}

		if dx != 0
		{
			let (start, end) = if dx > 0
			{
				(self.origin.x + HalfWidth, newOrigin.x + HalfWidth - 1)
			}
			else
			{
				(newOrigin.x - HalfWidth, self.origin.x - HalfWidth - 1)
			};
			for worldX in start..=end
			{
				self.clearColumn(worldX);
			}
		}

		if dy != 0
		{
			let (start, end) = if dy > 0
			{
				(self.origin.y + HalfHeight, newOrigin.y + HalfHeight - 1)
			}
			else
			{
				(newOrigin.y - HalfHeight, self.origin.y - HalfHeight - 1)
			};
			for worldY in start..=end
			{
				self.clearRow(worldY);
			}
		}

		self.origin = newOrigin;
	}

	fn clearColumn(&mut self, worldX: i32)
	{
		let ringX = worldX.rem_euclid(MapWidth as i32) as usize;
		for floor in 0..MapFloors
		{
			for ringY in 0..MapHeight
			{
				self.tiles[(floor * MapHeight + ringY) * MapWidth + ringX] = Tile::default();
			}
		}
	}

	fn clearRow(&mut self, worldY: i32)
	{
		let ringY = worldY.rem_euclid(MapHeight as i32) as usize;
		for floor in 0..MapFloors
		{
			for ringX in 0..MapWidth
			{
				self.tiles[(floor * MapHeight + ringY) * MapWidth + ringX] = Tile::default();
			}
		}
	}

	fn index(&self, position: Position) -> Option<usize>
	{
		let localX = position.x - self.origin.x + HalfWidth;
		let localY = position.y - self.origin.y + HalfHeight;

		if localX < 0 || localX >= MapWidth as i32 || localY < 0 || localY >= MapHeight as i32
			|| position.z as usize >= MapFloors
		{
			return None;
		}

		let ringX = position.x.rem_euclid(MapWidth as i32) as usize;
		let ringY = position.y.rem_euclid(MapHeight as i32) as usize;

		Some((position.z as usize * MapHeight + ringY) * MapWidth + ringX)
	}

	pub fn tileAt(&self, position: Position) -> Option<&Tile>
	{
		self.index(position).map(|index| &self.tiles[index])
	}

	pub fn tileAtMut(&mut self, position: Position) -> Option<&mut Tile>
	{
		self.index(position).map(move |index| &mut self.tiles[index])
	}

	pub fn renderHeightAt(&self, screenX: usize, screenY: usize) -> i32
	{
		self.renderHeight.get(screenY * MapWidth + screenX).copied().unwrap_or(0)
	}

	pub fn setRenderHeightAt(&mut self, screenX: usize, screenY: usize, height: i32)
	{
		if let Some(slot) = self.renderHeight.get_mut(screenY * MapWidth + screenX)
		{
			*slot = height;
		}
	}

	pub fn reset(&mut self)
	{
		self.tiles.iter_mut().for_each(|tile| *tile = Tile::default());
		self.renderHeight.iter_mut().for_each(|height| *height = 0);
	}
}

#[cfg(test)]
mod tests
{
	use super::*;
	use crate::object::{CreatureRef, Object};

	#[test]
	fn TileTruncatesAtMaxObjects()
	{
		let mut tile = Tile::default();
		for id in 0..(MaxTileObjects as u32 + 5)
		{
			tile.insertAt(0, Object::Creature(CreatureRef { creatureId: id }));
		}
		assert_eq!(MaxTileObjects, tile.objects.len());
	}

	#[test]
	fn MapIndexIsNoneOutsideWindow()
	{
		let map = Map::default();
		let farAway = Position::New(100_000, 100_000, 7);
		assert!(map.tileAt(farAway).is_none());
	}

	#[test]
	fn MapIndexFindsCenterTile()
	{
		let map = Map::default();
		assert!(map.tileAt(map.origin()).is_some());
	}

	#[test]
	fn RecenterPreservesTilesStillInsideTheWindow()
	{
		let mut map = Map::default();
		let origin = map.origin();
		let stillVisible = origin.offsetBy(1, 0, 0);

		map.tileAtMut(stillVisible).unwrap().insertAt(0, Object::Creature(CreatureRef { creatureId: 1 }));
		map.recenter(origin.offsetBy(1, 0, 0));

		assert_eq!(1, map.tileAt(stillVisible).unwrap().objects.len());
	}

	#[test]
	fn RecenterClearsTheSlotTheLeadingEdgeSweepsOver()
	{
		let mut map = Map::default();
		let origin = map.origin();
		let enteringWorldX = origin.x + HalfWidth;
		let ringX = enteringWorldX.rem_euclid(MapWidth as i32) as usize;
		let ringY = origin.y.rem_euclid(MapHeight as i32) as usize;

		map.tiles[ringY * MapWidth + ringX].insertAt(0, Object::Creature(CreatureRef { creatureId: 7 }));
		map.recenter(origin.offsetBy(1, 0, 0));

		let entered = Position::New(enteringWorldX, origin.y, origin.z);
		assert!(map.tileAt(entered).unwrap().objects.is_empty());
	}
}
