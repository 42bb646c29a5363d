//! Builds the fixed-length sensory input vector an agent's policy consumes.
//!
//! Generalizes the viewport/perception query pattern
//! (`src/ai/herbivore_toolkit.rs`, `src/ai/predator_toolkit.rs` scan
//! nearby tiles for food/threats) into one encoder shared by every
//! category, parameterized only by vision radius.

use crate::agent::Animal;
use crate::constants::INPUT_LEN;
use crate::grid::{Terrain, World};

const NUM_TERRAINS: usize = 6; // len(Terrain::ALL)
const NUM_RESOURCE_KINDS: usize = 4; // len(ResourceKind::ALL)

/// Build the sensory vector for `animal` at its current position in
/// `world`. Directional sampling order: Center first, then the eight
/// compass points in [`crate::grid::DIRECTIONS_8`] order.
pub fn encode(animal: &Animal, world: &World) -> Vec<f32> {
    let mut v = Vec::with_capacity(INPUT_LEN);

    v.push((animal.vitals.health / animal.max_health()).clamp(0.0, 1.0));
    v.push((animal.vitals.hunger / 100.0).clamp(0.0, 1.0));
    v.push((animal.vitals.thirst / 100.0).clamp(0.0, 1.0));
    v.push((animal.vitals.energy / animal.max_energy()).clamp(0.0, 1.0));
    v.push(animal.vitals.instinct.unwrap_or(0.0).clamp(0.0, 1.0));

    // Center: the agent's own tile.
    push_tile_features(&mut v, world, animal, animal.x, animal.y);

    let radius = animal.category.vision_radius();
    for (_, dx, dy) in crate::grid::DIRECTIONS_8 {
        match farthest_in_bounds(world, animal.x, animal.y, dx, dy, radius) {
            Some((tx, ty)) => push_tile_features(&mut v, world, animal, tx, ty),
            None => v.extend([0.0, 0.0, 0.0, 0.0]),
        }
    }

    if v.len() < INPUT_LEN {
        v.resize(INPUT_LEN, 0.0);
    } else {
        v.truncate(INPUT_LEN);
    }
    v
}

/// Walk from `radius` steps away in `(dx, dy)` back toward the origin,
/// returning the first in-bounds tile found — i.e. the tile as far out as
/// the agent's vision allows, clamped to the map edge.
fn farthest_in_bounds(
    world: &World,
    x: i32,
    y: i32,
    dx: i32,
    dy: i32,
    radius: i32,
) -> Option<(i32, i32)> {
    for d in (1..=radius).rev() {
        let (tx, ty) = (x + dx * d, y + dy * d);
        if world.in_bounds(tx, ty) {
            return Some((tx, ty));
        }
    }
    None
}

fn push_tile_features(out: &mut Vec<f32>, world: &World, observer: &Animal, x: i32, y: i32) {
    let tile = match world.tile_at(x, y) {
        Ok(t) => t,
        Err(_) => {
            out.extend([0.0, 0.0, 0.0, 0.0]);
            return;
        }
    };

    let terrain_feature = tile.terrain.index() as f32 / (NUM_TERRAINS - 1) as f32;

    let (resource_feature, uses_feature) = match &tile.resource {
        Some(r) => (
            r.kind.index() as f32 / (NUM_RESOURCE_KINDS - 1) as f32,
            (r.uses_left as f32 / 10.0).min(1.0),
        ),
        None => (0.0, 0.0),
    };

    let occupant_feature = match tile.occupant {
        None => 0.0,
        Some(occ) if occ.id == observer.id => 0.5,
        Some(occ) if occ.category == observer.category => 0.5,
        Some(_) => 1.0,
    };

    out.push(terrain_feature);
    out.push(resource_feature);
    out.push(uses_feature);
    out.push(occupant_feature);
}

/// Whether a tile's terrain is a sensible edibility target, independent of
/// what is actually placed there — used by the rule-based decision
/// fallback to avoid duplicating terrain checks.
pub fn terrain_is_water(terrain: Terrain) -> bool {
    matches!(terrain, Terrain::Water)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::{Category, Traits};
    use crate::ids::AgentId;

    #[test]
    fn vector_has_fixed_length_and_bounded_values() {
        let world = World::new(9, 9);
        let animal = Animal::new(
            AgentId(0),
            Category::Carnivore,
            Traits::new(50, 50, 50, 50, 50),
            4,
            4,
            None,
        );
        let v = encode(&animal, &world);
        assert_eq!(v.len(), INPUT_LEN);
        for value in v {
            assert!((0.0..=1.0).contains(&value));
        }
    }

    #[test]
    fn center_sample_reflects_agents_own_tile() {
        let mut world = World::new(5, 5);
        world.tile_at_mut(2, 2).unwrap().terrain = Terrain::Forest;
        let animal = Animal::new(
            AgentId(0),
            Category::Herbivore,
            Traits::new(50, 50, 50, 50, 50),
            2,
            2,
            None,
        );
        let v = encode(&animal, &world);
        // index 5 is the first feature of the Center sample (terrain).
        let expected = Terrain::Forest.index() as f32 / (NUM_TERRAINS - 1) as f32;
        assert_eq!(v[5], expected);
    }

    #[test]
    fn vision_radius_limits_how_far_direction_samples_reach() {
        let world = World::new(20, 20);
        let herbivore = Animal::new(
            AgentId(0),
            Category::Herbivore,
            Traits::new(50, 50, 50, 50, 50),
            10,
            10,
            None,
        );
        let carnivore = Animal::new(
            AgentId(1),
            Category::Carnivore,
            Traits::new(50, 50, 50, 50, 50),
            10,
            10,
            None,
        );
        assert_eq!(herbivore.category.vision_radius(), 1);
        assert_eq!(carnivore.category.vision_radius(), 3);
        let _ = encode(&herbivore, &world);
        let _ = encode(&carnivore, &world);
    }

    #[test]
    fn occupant_feature_distinguishes_self_same_and_different_category() {
        use crate::grid::Occupant;

        let mut world = World::new(5, 5);
        world
            .set_occupant(
                3,
                2,
                Some(Occupant {
                    id: AgentId(1),
                    category: Category::Herbivore,
                }),
            )
            .unwrap();
        world
            .set_occupant(
                2,
                3,
                Some(Occupant {
                    id: AgentId(2),
                    category: Category::Carnivore,
                }),
            )
            .unwrap();

        let observer = Animal::new(
            AgentId(0),
            Category::Herbivore,
            Traits::new(50, 50, 50, 50, 50),
            2,
            2,
            None,
        );
        let v = encode(&observer, &world);
        // Center sample occupant feature: agent's own tile is unoccupied.
        assert_eq!(v[8], 0.0);
        // Directional order is N, NE, E, SE, S, ...; each sample is 4 wide
        // starting after the 5 scalars + 4-wide Center block at index 9.
        // E is the 3rd direction (index 2) -> block starts at 9 + 4*2 = 17.
        assert_eq!(v[17 + 3], 0.5);
        // S is the 5th direction (index 4) -> block starts at 9 + 4*4 = 25.
        assert_eq!(v[25 + 3], 1.0);
    }
}
