//! Decision Phase: one planned action per living agent, computed against a
//! frozen view of the world. No state changes here; [`execution`] is the
//! only phase that mutates tiles or vitals.

use rand::Rng;

use crate::action::{ActionKind, PlannedAction};
use crate::agent::Animal;
use crate::constants::{
    FALLBACK_ENERGY_REST_THRESHOLD, FALLBACK_HEALTH_REST_THRESHOLD,
    FALLBACK_HUNGER_EAT_THRESHOLD, FALLBACK_THIRST_DRINK_THRESHOLD,
};
use crate::grid::{Terrain, World, DIRECTIONS_4, DIRECTIONS_8};

/// Decide every living agent's action for the week and assign a target
/// tile where the action kind needs one.
pub fn plan(animal: &Animal, world: &World, rng: &mut impl Rng) -> PlannedAction {
    let kind = match &animal.policy {
        Some(policy) => ActionKind::from_index(policy.decide(&animal.sense(world))),
        None => rule_based_fallback(animal, world, rng),
    };

    let target = match kind {
        ActionKind::MoveN | ActionKind::MoveE | ActionKind::MoveS | ActionKind::MoveW => {
            let (dx, dy) = kind.movement_offset().expect("movement kind has an offset");
            Some((animal.x + dx, animal.y + dy))
        }
        ActionKind::Eat => find_food_target(animal, world),
        ActionKind::Drink => find_water_target(animal, world),
        ActionKind::Attack => find_attack_target(animal, world),
        ActionKind::Rest => None,
    };

    PlannedAction {
        agent_id: animal.id,
        kind,
        target,
        energy_cost: kind.energy_cost(),
    }
}

/// Rule-based fallback used when an agent has no decision network.
fn rule_based_fallback(animal: &Animal, world: &World, rng: &mut impl Rng) -> ActionKind {
    if animal.vitals.health <= FALLBACK_HEALTH_REST_THRESHOLD {
        return ActionKind::Rest;
    }
    if animal.vitals.hunger <= FALLBACK_HUNGER_EAT_THRESHOLD && find_food_target(animal, world).is_some()
    {
        return ActionKind::Eat;
    }
    if animal.vitals.thirst <= FALLBACK_THIRST_DRINK_THRESHOLD
        && find_water_target(animal, world).is_some()
    {
        return ActionKind::Drink;
    }
    if animal.vitals.energy <= FALLBACK_ENERGY_REST_THRESHOLD {
        return ActionKind::Rest;
    }
    let directions = [ActionKind::MoveN, ActionKind::MoveE, ActionKind::MoveS, ActionKind::MoveW];
    directions[rng.gen_range(0..directions.len())]
}

/// The agent's own tile, then each compass direction in fixed order, is
/// checked for a resource the agent's category can eat.
fn find_food_target(animal: &Animal, world: &World) -> Option<(i32, i32)> {
    if let Ok(tile) = world.tile_at(animal.x, animal.y) {
        if let Some(resource) = &tile.resource {
            if animal.category.can_eat(resource.kind) {
                return Some((animal.x, animal.y));
            }
        }
    }
    for (_, dx, dy) in DIRECTIONS_8 {
        let (x, y) = (animal.x + dx, animal.y + dy);
        if let Ok(tile) = world.tile_at(x, y) {
            if let Some(resource) = &tile.resource {
                if animal.category.can_eat(resource.kind) {
                    return Some((x, y));
                }
            }
        }
    }
    None
}

/// The agent's own tile (Water resource) or any orthogonal neighbor whose
/// terrain is Water satisfies Drink.
fn find_water_target(animal: &Animal, world: &World) -> Option<(i32, i32)> {
    if let Ok(tile) = world.tile_at(animal.x, animal.y) {
        if let Some(resource) = &tile.resource {
            if resource.kind == crate::grid::ResourceKind::Water {
                return Some((animal.x, animal.y));
            }
        }
    }
    for (_, dx, dy) in DIRECTIONS_4 {
        let (x, y) = (animal.x + dx, animal.y + dy);
        if let Ok(tile) = world.tile_at(x, y) {
            if tile.terrain == Terrain::Water {
                return Some((x, y));
            }
        }
    }
    None
}

/// The attacker's own tile's occupant, excluding the attacker itself.
fn find_attack_target(animal: &Animal, world: &World) -> Option<(i32, i32)> {
    let tile = world.tile_at(animal.x, animal.y).ok()?;
    match tile.occupant {
        Some(occ) if occ.id != animal.id => Some((animal.x, animal.y)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::{Category, Traits};
    use crate::grid::Resource;
    use crate::ids::AgentId;
    use rand::SeedableRng;
    use rand_pcg::Pcg64;

    fn herbivore(x: i32, y: i32) -> Animal {
        Animal::new(AgentId(0), Category::Herbivore, Traits::new(50, 50, 50, 50, 50), x, y, None)
    }

    #[test]
    fn low_health_always_rests() {
        let mut world = World::new(5, 5);
        let mut rng = Pcg64::seed_from_u64(1);
        let mut animal = herbivore(2, 2);
        animal.vitals.health = 10.0;
        let planned = plan(&animal, &world, &mut rng);
        assert_eq!(planned.kind, ActionKind::Rest);
    }

    #[test]
    fn hungry_herbivore_targets_adjacent_plant() {
        let mut world = World::new(5, 5);
        world.tile_at_mut(3, 2).unwrap().resource =
            Some(Resource::new(crate::grid::ResourceKind::Plant, 30.0, 2));
        let mut rng = Pcg64::seed_from_u64(1);
        let mut animal = herbivore(2, 2);
        animal.vitals.hunger = 10.0;
        let planned = plan(&animal, &world, &mut rng);
        assert_eq!(planned.kind, ActionKind::Eat);
        assert_eq!(planned.target, Some((3, 2)));
    }

    #[test]
    fn no_food_in_range_falls_through_to_movement() {
        let mut world = World::new(5, 5);
        let mut rng = Pcg64::seed_from_u64(7);
        let mut animal = herbivore(2, 2);
        animal.vitals.hunger = 10.0;
        let planned = plan(&animal, &world, &mut rng);
        assert!(planned.kind.is_movement());
    }
}
