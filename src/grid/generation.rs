//! Deterministic terrain and resource placement.
//!
//! Generalizes the island/height-map terrain generator pattern
//! (`src/tilemap/world_generator.rs`, `src/tilemap/openrct2/`) which grows
//! biomes from a heightmap; this engine instead grows each non-Plains
//! terrain from random seed tiles via clustered BFS, matching the
//! canonical terrain-generation algorithm exactly rather than a noise-based
//! heightmap (the `noise` crate used for heights has no counterpart here —
//! see `DESIGN.md`).

use std::collections::{HashMap, VecDeque};

use rand::Rng;

use super::{Resource, ResourceKind, Terrain, World};

/// Non-Plains terrain kinds that grow by clustered BFS, paired with their
/// continue-probability.
const CLUSTERED_TERRAINS: [(Terrain, f64); 4] = [
    (Terrain::Water, 0.70),
    (Terrain::Forest, 0.60),
    (Terrain::Jungle, 0.65),
    (Terrain::Swamp, 0.55),
];

/// Grow terrain across `world` from a target distribution of weights
/// (which must sum to ~1.0; see `config::EngineConfig::validate`).
///
/// If `mountain_border` is set, all border tiles become `Mountains`
/// first. Interior cells are grown via clustered BFS for Water, Forest,
/// Jungle and Swamp until each reaches its target count (proportional to
/// its configured weight over the full grid); everything left over
/// becomes Plains.
pub fn generate_terrain(
    world: &mut World,
    distribution: &HashMap<Terrain, f32>,
    mountain_border: bool,
    rng: &mut impl Rng,
) {
    let total_cells = (world.width * world.height) as usize;

    if mountain_border {
        for tile in world.tiles_mut() {
            if tile.x == 0 || tile.y == 0 || tile.x == world.width - 1 || tile.y == world.height - 1
            {
                tile.terrain = Terrain::Mountains;
            }
        }
    }

    for (terrain, continue_prob) in CLUSTERED_TERRAINS {
        let weight = *distribution.get(&terrain).unwrap_or(&0.0);
        let target = (weight as f64 * total_cells as f64).round() as usize;
        grow_cluster(world, terrain, target, continue_prob, rng);
    }
    // Remaining Plains-eligible cells keep their default Plains terrain.
}

/// Grow one terrain kind by repeatedly seeding a random available Plains
/// cell and flood-filling outward with probability `continue_prob` per
/// neighbor, until `target` cells are claimed or no Plains cells remain.
fn grow_cluster(
    world: &mut World,
    terrain: Terrain,
    target: usize,
    continue_prob: f64,
    rng: &mut impl Rng,
) {
    let mut placed = 0usize;

    loop {
        if placed >= target {
            break;
        }
        let Some((sx, sy)) = random_plains_tile(world, rng) else {
            break;
        };

        world.tile_at_mut(sx, sy).unwrap().terrain = terrain;
        placed += 1;
        let mut queue = VecDeque::new();
        queue.push_back((sx, sy));

        while let Some((x, y)) = queue.pop_front() {
            if placed >= target {
                break;
            }
            for (nx, ny) in world.adjacent4(x, y) {
                if placed >= target {
                    break;
                }
                if world.tile_at(nx, ny).unwrap().terrain != Terrain::Plains {
                    continue;
                }
                if rng.gen_bool(continue_prob) {
                    world.tile_at_mut(nx, ny).unwrap().terrain = terrain;
                    placed += 1;
                    queue.push_back((nx, ny));
                }
            }
        }
    }
}

fn random_plains_tile(world: &World, rng: &mut impl Rng) -> Option<(i32, i32)> {
    let candidates: Vec<(i32, i32)> = world
        .tiles()
        .iter()
        .filter(|t| t.terrain == Terrain::Plains)
        .map(|t| (t.x, t.y))
        .collect();
    if candidates.is_empty() {
        return None;
    }
    let idx = rng.gen_range(0..candidates.len());
    Some(candidates[idx])
}

/// Terrain-specific food density multiplier.
fn food_terrain_multiplier(terrain: Terrain) -> Option<f32> {
    match terrain {
        Terrain::Plains => Some(1.0),
        Terrain::Forest => Some(1.5),
        Terrain::Jungle => Some(2.0),
        Terrain::Swamp => Some(0.8),
        Terrain::Water | Terrain::Mountains => None,
    }
}

const PLANT_UNITS: f32 = 30.0;

/// Populate tiles with Water and food resources, best-effort (a full grid
/// simply stops placing more; this is not an error).
pub fn place_resources(
    world: &mut World,
    food_density: f32,
    water_density: f32,
    rng: &mut impl Rng,
) {
    let coords: Vec<(i32, i32)> = world.tiles().iter().map(|t| (t.x, t.y)).collect();

    // Water placement: on Water tiles directly, then a weaker splash onto
    // empty non-Water neighbors of Water tiles.
    for &(x, y) in &coords {
        let terrain = world.tile_at(x, y).unwrap().terrain;
        if terrain == Terrain::Water {
            if world.tile_at(x, y).unwrap().resource.is_none() && rng.gen_bool(water_density as f64)
            {
                world.tile_at_mut(x, y).unwrap().resource =
                    Some(Resource::new(ResourceKind::Water, 0.0, 1));
            }
        }
    }
    for &(x, y) in &coords {
        let terrain = world.tile_at(x, y).unwrap().terrain;
        if terrain == Terrain::Water || terrain == Terrain::Mountains {
            continue;
        }
        if world.tile_at(x, y).unwrap().resource.is_some() {
            continue;
        }
        let near_water = world
            .adjacent4(x, y)
            .into_iter()
            .any(|(nx, ny)| world.tile_at(nx, ny).unwrap().terrain == Terrain::Water);
        if near_water && rng.gen_bool((water_density * 0.5) as f64) {
            world.tile_at_mut(x, y).unwrap().resource = Some(Resource::new(ResourceKind::Water, 0.0, 1));
        }
    }

    // Food placement on non-{Water, Mountains} tiles.
    for &(x, y) in &coords {
        let terrain = world.tile_at(x, y).unwrap().terrain;
        let Some(multiplier) = food_terrain_multiplier(terrain) else {
            continue;
        };
        if world.tile_at(x, y).unwrap().resource.is_some() {
            continue;
        }
        let place_prob = (food_density * multiplier) as f64;
        if !rng.gen_bool(place_prob.clamp(0.0, 1.0)) {
            continue;
        }

        let resource = if terrain == Terrain::Swamp {
            weighted_food_choice(rng, &[(ResourceKind::Plant, 0.3), (ResourceKind::Carcass, 0.7)])
        } else {
            weighted_food_choice(rng, &[(ResourceKind::Plant, 0.8), (ResourceKind::Prey, 0.2)])
        };
        world.tile_at_mut(x, y).unwrap().resource = Some(resource);
    }
}

fn weighted_food_choice(rng: &mut impl Rng, weights: &[(ResourceKind, f64)]) -> Resource {
    let total: f64 = weights.iter().map(|(_, w)| w).sum();
    let mut roll = rng.gen_range(0.0..total);
    let mut chosen = weights[0].0;
    for (kind, w) in weights {
        if roll < *w {
            chosen = *kind;
            break;
        }
        roll -= w;
    }
    match chosen {
        ResourceKind::Plant => Resource::new(ResourceKind::Plant, PLANT_UNITS, rng.gen_range(1..=3)),
        ResourceKind::Prey => Resource::new(ResourceKind::Prey, 0.0, 1),
        ResourceKind::Carcass => {
            Resource::new(ResourceKind::Carcass, rng.gen_range(30.0..=60.0), rng.gen_range(1..=2))
        }
        ResourceKind::Water => Resource::new(ResourceKind::Water, 0.0, 1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg64;

    fn distribution() -> HashMap<Terrain, f32> {
        let mut m = HashMap::new();
        m.insert(Terrain::Plains, 0.5);
        m.insert(Terrain::Forest, 0.15);
        m.insert(Terrain::Jungle, 0.1);
        m.insert(Terrain::Swamp, 0.1);
        m.insert(Terrain::Water, 0.1);
        m.insert(Terrain::Mountains, 0.05);
        m
    }

    #[test]
    fn mountain_border_covers_all_border_tiles() {
        let mut world = World::new(10, 10);
        let mut rng = Pcg64::seed_from_u64(1);
        generate_terrain(&mut world, &distribution(), true, &mut rng);
        for tile in world.tiles() {
            if tile.x == 0 || tile.y == 0 || tile.x == 9 || tile.y == 9 {
                assert_eq!(tile.terrain, Terrain::Mountains);
            }
        }
    }

    #[test]
    fn deterministic_given_seed() {
        let mut w1 = World::new(12, 12);
        let mut w2 = World::new(12, 12);
        let mut r1 = Pcg64::seed_from_u64(99);
        let mut r2 = Pcg64::seed_from_u64(99);
        generate_terrain(&mut w1, &distribution(), true, &mut r1);
        generate_terrain(&mut w2, &distribution(), true, &mut r2);
        place_resources(&mut w1, 0.15, 0.15, &mut r1);
        place_resources(&mut w2, 0.15, 0.15, &mut r2);
        for (a, b) in w1.tiles().iter().zip(w2.tiles().iter()) {
            assert_eq!(a.terrain, b.terrain);
            assert_eq!(a.resource, b.resource);
        }
    }

    #[test]
    fn resource_placement_never_overwrites_mountains() {
        let mut world = World::new(8, 8);
        let mut rng = Pcg64::seed_from_u64(7);
        generate_terrain(&mut world, &distribution(), true, &mut rng);
        place_resources(&mut world, 1.0, 1.0, &mut rng);
        for tile in world.tiles() {
            if tile.terrain == Terrain::Mountains {
                assert!(tile.resource.is_none());
            }
        }
    }
}
