//! End-to-end scenario tests against a full `ActionResolver`/`World`/
//! `Population` stack, all seeded for determinism.

use evosim_core::action::resolver;
use evosim_core::agent::{Category, DeathCause, Traits};
use evosim_core::error::ActionFailure;
use evosim_core::grid::{Occupant, Resource, ResourceKind, Terrain, World};
use evosim_core::network::DecisionNetwork;
use evosim_core::prng::SeedStreams;
use evosim_core::Population;

fn empty_world(width: u32, height: u32) -> World {
    World::new(width, height)
}

/// A one-hidden-unit network with zeroed weights and a biased output layer,
/// so every input decodes to the same action index regardless of sensing —
/// used to force a specific action deterministically in a scenario test.
fn constant_policy(action_index: usize) -> DecisionNetwork {
    let mut bias_output = vec![-10.0; 8];
    bias_output[action_index] = 10.0;
    let json = format!(
        "{{\"input_size\":1,\"hidden_size\":1,\"output_size\":8,\
        \"weights_input_hidden\":[0.0],\"weights_hidden_output\":[0.0,0.0,0.0,0.0,0.0,0.0,0.0,0.0],\
        \"bias_hidden\":[0.0],\"bias_output\":{bias_output:?}}}"
    );
    DecisionNetwork::deserialize(&json).expect("well-formed constant-policy JSON")
}

/// S1: two agents plan to move onto the same tile; the higher-AGI agent
/// wins and the loser's move fails with `ConflictLost`, consuming no energy.
#[test]
fn s1_movement_conflict_resolves_by_agility() {
    let mut world = empty_world(5, 5);
    let mut population = Population::new();
    let a = population.spawn(Category::Herbivore, Traits::new(50, 90, 50, 50, 50), 1, 1, None);
    let b = population.spawn(Category::Herbivore, Traits::new(90, 60, 50, 50, 50), 3, 1, None);
    world.set_occupant(1, 1, Some(Occupant { id: a, category: Category::Herbivore })).unwrap();
    world.set_occupant(3, 1, Some(Occupant { id: b, category: Category::Herbivore })).unwrap();

    let seeds = SeedStreams::new(42);
    let report = resolver::run_week(&seeds, 0, 0, &mut population, &mut world);

    let animal_a = population.get(a).unwrap();
    let animal_b = population.get(b).unwrap();
    assert_eq!((animal_a.x, animal_a.y), (2, 1));
    assert_eq!((animal_b.x, animal_b.y), (3, 1));

    let b_outcome = report.outcomes.iter().find(|o| o.agent_id == b).unwrap();
    assert_eq!(b_outcome.failure, Some(ActionFailure::ConflictLost));
}

/// S2: eating a single-use Plant resource removes it and grants the
/// herbivore nutrition matching `resource_units_consumed`.
#[test]
fn s2_eat_consumes_single_use_resource() {
    let mut world = empty_world(3, 3);
    world.tile_at_mut(1, 0).unwrap().resource = Some(Resource::new(ResourceKind::Plant, 30.0, 1));
    let mut population = Population::new();
    let h = population.spawn(Category::Herbivore, Traits::new(50, 50, 50, 50, 50), 1, 1, None);
    population.get_mut(h).unwrap().vitals.hunger = 0.0;
    world.set_occupant(1, 1, Some(Occupant { id: h, category: Category::Herbivore })).unwrap();

    let seeds = SeedStreams::new(42);
    resolver::run_week(&seeds, 0, 0, &mut population, &mut world);

    assert!(world.tile_at(1, 0).unwrap().resource.is_none());
    let animal = population.get(h).unwrap();
    assert!(animal.fitness.resource_units_consumed >= 30.0);
}

/// S3: a carnivore attacking a weaker herbivore sharing its own tile either
/// kills it (occupying the tile, incrementing kills) or damages it; either
/// way the attack always resolves to one of those two outcomes under a
/// seeded RNG. The herbivore's coordinates are set to match the carnivore's,
/// but the tile's registered occupant is forced to the herbivore, so Attack
/// resolves against it rather than the carnivore itself.
#[test]
fn s3_attack_either_kills_or_damages_target() {
    let mut world = empty_world(5, 5);
    let mut population = Population::new();
    let c = population.spawn(
        Category::Carnivore,
        Traits::new(80, 50, 50, 50, 50),
        2,
        2,
        Some(constant_policy(7)),
    );
    let h = population.spawn(Category::Herbivore, Traits::new(50, 30, 50, 50, 50), 2, 2, None);
    population.get_mut(h).unwrap().vitals.health = 50.0;
    world.set_occupant(2, 2, Some(Occupant { id: h, category: Category::Herbivore })).unwrap();

    let seeds = SeedStreams::new(42);
    resolver::run_week(&seeds, 0, 0, &mut population, &mut world);

    let defender = population.get(h).unwrap();
    if !defender.is_alive() {
        assert_eq!(defender.cause_of_death, Some(DeathCause::Health));
        let attacker = population.get(c).unwrap();
        assert_eq!(attacker.fitness.kills, 1);
        assert_eq!((attacker.x, attacker.y), (2, 2));
        assert_eq!(world.tile_at(2, 2).unwrap().occupant.map(|o| o.id), Some(c));
    } else {
        assert!(defender.vitals.health <= 50.0);
    }
}

/// S6: an agent fully boxed in by Mountain tiles can never move; every
/// planned move fails with `Mountain` and its position/energy is unchanged.
#[test]
fn s6_move_into_mountain_always_fails() {
    let mut world = empty_world(3, 3);
    for y in 0..3 {
        for x in 0..3 {
            if (x, y) != (0, 0) {
                world.tile_at_mut(x, y).unwrap().terrain = Terrain::Mountains;
            }
        }
    }
    let mut population = Population::new();
    let a = population.spawn(Category::Herbivore, Traits::new(50, 50, 50, 50, 50), 0, 0, None);
    population.get_mut(a).unwrap().vitals.hunger = 100.0;
    population.get_mut(a).unwrap().vitals.thirst = 100.0;
    let start_energy = population.get(a).unwrap().vitals.energy;
    world.set_occupant(0, 0, Some(Occupant { id: a, category: Category::Herbivore })).unwrap();

    let seeds = SeedStreams::new(42);
    for week in 0..5 {
        resolver::run_week(&seeds, 0, week, &mut population, &mut world);
        let animal = population.get(a).unwrap();
        if !animal.is_alive() {
            break;
        }
        assert_eq!((animal.x, animal.y), (0, 0));
        assert_eq!(animal.vitals.energy, start_energy);
    }
}
