//! The 2-D world: a fixed-size grid of tiles, their terrain, resources and
//! occupants. Generalizes the chunked tilemap pattern
//! (`src/tilemap/mod.rs`, `src/tilemap/chunk.rs`) down to a single flat
//! arena sized for the whole run — the engine's grids are small enough
//! (tens of tiles per side) that chunking buys nothing, and the engine fixes
//! dimensions for the run's lifetime.

pub mod generation;
pub mod resource;

pub use resource::{Resource, ResourceKind};

use crate::agent::Category;
use crate::error::{EvosimError, Result};
use crate::ids::AgentId;
use serde::{Deserialize, Serialize};

/// Who occupies a tile. Carries a copy of the occupant's category
/// alongside its id so the sensory encoder can resolve the "same/
/// different category" feature from `World` alone, without holding a
/// reference to the agent itself — a cached copy, not a back-reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Occupant {
    pub id: AgentId,
    pub category: Category,
}

/// Terrain kind of a single tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Terrain {
    Plains,
    Forest,
    Jungle,
    Swamp,
    Water,
    Mountains,
}

impl Terrain {
    pub const ALL: [Terrain; 6] = [
        Terrain::Plains,
        Terrain::Forest,
        Terrain::Jungle,
        Terrain::Swamp,
        Terrain::Water,
        Terrain::Mountains,
    ];

    /// Index into the fixed terrain ordering, used by the sensory encoder
    /// to normalize terrain identity into `[0, 1]`.
    pub fn index(self) -> usize {
        Self::ALL.iter().position(|t| *t == self).unwrap_or(0)
    }

    pub fn is_impassable(self) -> bool {
        matches!(self, Terrain::Mountains)
    }
}

/// A single grid cell: its terrain, optional resource, optional occupant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tile {
    pub x: i32,
    pub y: i32,
    pub terrain: Terrain,
    pub resource: Option<Resource>,
    pub occupant: Option<Occupant>,
}

impl Tile {
    fn new(x: i32, y: i32, terrain: Terrain) -> Self {
        Self {
            x,
            y,
            terrain,
            resource: None,
            occupant: None,
        }
    }

    pub fn is_occupied(&self) -> bool {
        self.occupant.is_some()
    }

    pub fn is_passable(&self) -> bool {
        !self.terrain.is_impassable()
    }
}

/// Relative offsets of the eight compass directions in encoder order
/// (Center excluded), used by both the sensory encoder and movement.
pub const DIRECTIONS_8: [(&str, i32, i32); 8] = [
    ("N", 0, -1),
    ("NE", 1, -1),
    ("E", 1, 0),
    ("SE", 1, 1),
    ("S", 0, 1),
    ("SW", -1, 1),
    ("W", -1, 0),
    ("NW", -1, -1),
];

/// The four cardinal directions used for movement.
pub const DIRECTIONS_4: [(&str, i32, i32); 4] =
    [("N", 0, -1), ("E", 1, 0), ("S", 0, 1), ("W", -1, 0)];

/// Owns the grid's tiles. Dimensions are fixed for the run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct World {
    pub width: i32,
    pub height: i32,
    tiles: Vec<Tile>,
}

impl World {
    /// Build a world filled entirely with `Plains`, ready for terrain
    /// generation to overwrite.
    pub fn new(width: i32, height: i32) -> Self {
        assert!(width > 0 && height > 0, "grid dimensions must be positive");
        let mut tiles = Vec::with_capacity((width * height) as usize);
        for y in 0..height {
            for x in 0..width {
                tiles.push(Tile::new(x, y, Terrain::Plains));
            }
        }
        Self {
            width,
            height,
            tiles,
        }
    }

    #[inline]
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && x < self.width && y < self.height
    }

    #[inline]
    fn index(&self, x: i32, y: i32) -> usize {
        (y * self.width + x) as usize
    }

    /// Immutable tile lookup; fails with `OutOfBounds` when `(x, y)` falls
    /// outside `[0, width) x [0, height)`.
    pub fn tile_at(&self, x: i32, y: i32) -> Result<&Tile> {
        if !self.in_bounds(x, y) {
            return Err(EvosimError::out_of_bounds(x, y));
        }
        Ok(&self.tiles[self.index(x, y)])
    }

    /// Mutable tile lookup; same bounds semantics as [`World::tile_at`].
    pub fn tile_at_mut(&mut self, x: i32, y: i32) -> Result<&mut Tile> {
        if !self.in_bounds(x, y) {
            return Err(EvosimError::out_of_bounds(x, y));
        }
        let idx = self.index(x, y);
        Ok(&mut self.tiles[idx])
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn tiles_mut(&mut self) -> &mut [Tile] {
        &mut self.tiles
    }

    /// Up to eight in-bounds neighbors of `(x, y)`; border tiles omit
    /// out-of-range neighbors rather than padding them.
    pub fn adjacent(&self, x: i32, y: i32) -> Vec<(i32, i32)> {
        DIRECTIONS_8
            .iter()
            .map(|(_, dx, dy)| (x + dx, y + dy))
            .filter(|(nx, ny)| self.in_bounds(*nx, *ny))
            .collect()
    }

    /// Up to four orthogonal in-bounds neighbors of `(x, y)`, used in the
    /// movement-planning context.
    pub fn adjacent4(&self, x: i32, y: i32) -> Vec<(i32, i32)> {
        DIRECTIONS_4
            .iter()
            .map(|(_, dx, dy)| (x + dx, y + dy))
            .filter(|(nx, ny)| self.in_bounds(*nx, *ny))
            .collect()
    }

    /// Place the occupant of `(x, y)`. Fails with `InvariantViolated` if
    /// the tile is already occupied or impassable.
    pub fn set_occupant(&mut self, x: i32, y: i32, occupant: Option<Occupant>) -> Result<()> {
        let tile = self.tile_at_mut(x, y)?;
        if occupant.is_some() {
            if tile.occupant.is_some() {
                return Err(EvosimError::invariant(format!(
                    "tile ({x}, {y}) already occupied"
                )));
            }
            if tile.terrain.is_impassable() {
                return Err(EvosimError::invariant(format!(
                    "tile ({x}, {y}) is impassable"
                )));
            }
        }
        tile.occupant = occupant;
        Ok(())
    }

    /// Count of tiles currently carrying a resource.
    pub fn resource_count(&self) -> usize {
        self.tiles.iter().filter(|t| t.resource.is_some()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tile_at_reports_out_of_bounds() {
        let world = World::new(5, 5);
        assert!(world.tile_at(0, 0).is_ok());
        assert!(matches!(
            world.tile_at(-1, 0),
            Err(EvosimError::OutOfBounds { .. })
        ));
        assert!(matches!(
            world.tile_at(5, 0),
            Err(EvosimError::OutOfBounds { .. })
        ));
    }

    #[test]
    fn adjacent_omits_out_of_range_on_border() {
        let world = World::new(3, 3);
        let neighbors = world.adjacent(0, 0);
        assert_eq!(neighbors.len(), 3); // E, S, SE only
    }

    fn occ(n: u64) -> Occupant {
        Occupant {
            id: AgentId(n),
            category: Category::Herbivore,
        }
    }

    #[test]
    fn set_occupant_rejects_mountains() {
        let mut world = World::new(3, 3);
        world.tile_at_mut(1, 1).unwrap().terrain = Terrain::Mountains;
        assert!(world.set_occupant(1, 1, Some(occ(0))).is_err());
    }

    #[test]
    fn set_occupant_rejects_double_occupancy() {
        let mut world = World::new(3, 3);
        world.set_occupant(1, 1, Some(occ(0))).unwrap();
        assert!(world.set_occupant(1, 1, Some(occ(1))).is_err());
    }
}
