//! The evolution engine: selection, crossover, mutation and elitism at a
//! generation boundary. Grounded on the reference `Population`/
//! `EvolutionManager` pair (`evosim-simple/src/evolution.py`) — tournament/
//! roulette/rank selection, elitism-by-fresh-clone, and the
//! crossover-then-mutate offspring pipeline are all carried over from
//! there, translated from Python lists into the `DecisionNetwork`
//! contract's own `crossover`/`mutate`.

use rand::distributions::WeightedIndex;
use rand::prelude::*;

use crate::agent::{Category, Traits};
use crate::config::{EngineConfig, SelectionMethod};
use crate::network::DecisionNetwork;
use crate::population::Population;
use crate::prng::{Phase, SeedStreams};
use crate::report::GenerationReport;

/// Fixed `rate` parameter passed to [`DecisionNetwork::mutate`] whenever an
/// offspring mutates, independent of `mutation_rate` (which instead gates
/// *whether* mutation happens at all).
const MUTATION_INTERNAL_RATE: f32 = 0.1;

/// A breeding candidate snapshotted out of the population before it's
/// cleared and rebuilt, since selection reads every parent's fitness
/// several times while the new generation is built incrementally.
struct Parent {
    category: Category,
    traits: Traits,
    policy: DecisionNetwork,
    fitness: f32,
}

/// Run one generation boundary: select parents from `population`'s current
/// members, then clear and rebuild it with elites plus crossed-over,
/// mutated offspring. Positions are left at `(0, 0)`; the driver places
/// each new agent on a valid tile afterward.
pub fn evolve(
    config: &EngineConfig,
    population: &mut Population,
    seeds: &SeedStreams,
    generation: u32,
) -> GenerationReport {
    let mut rng = seeds.stream(generation, 0, Phase::Evolution);

    let total = population.len();
    let alive_count = population.living_count();
    let dead_count = total - alive_count;

    let mut fitness_scores: Vec<f32> = Vec::with_capacity(total);
    let mut breeding_pool: Vec<Parent> = Vec::new();
    let mut alive_pool: Vec<Parent> = Vec::new();
    for animal in population.iter() {
        let Some(policy) = animal.policy.clone() else { continue };
        let fitness = if animal.is_alive() { animal.fitness_value() } else { 0.0 };
        fitness_scores.push(fitness);
        let parent = Parent {
            category: animal.category,
            traits: animal.traits,
            policy,
            fitness,
        };
        if animal.is_alive() {
            alive_pool.push(Parent {
                category: parent.category,
                traits: parent.traits,
                policy: parent.policy.clone(),
                fitness,
            });
        }
        breeding_pool.push(parent);
    }

    let fitness_avg = mean(&fitness_scores);
    let fitness_best = fitness_scores.iter().cloned().fold(f32::MIN, f32::max).max(0.0);
    let fitness_worst = fitness_scores.iter().cloned().fold(f32::MAX, f32::min).max(0.0);
    let fitness_std = std_dev(&fitness_scores, fitness_avg);

    let pool = if alive_pool.len() >= 2 { &alive_pool } else { &breeding_pool };

    let elite_count = config.elite_count().min(alive_pool.len().max(1)).max(1);
    let mut elites: Vec<&Parent> = alive_pool.iter().collect();
    elites.sort_by(|a, b| b.fitness.partial_cmp(&a.fitness).unwrap_or(std::cmp::Ordering::Equal));
    elites.truncate(elite_count.min(elites.len()));

    let population_size = config.population_size as usize;
    let offspring_target = population_size.saturating_sub(elites.len());

    let parents = select_parents(pool, config, population_size.max(offspring_target), &mut rng);

    population.clear();

    for elite in &elites {
        population.spawn(elite.category, elite.traits, 0, 0, Some(elite.policy.clone()));
    }

    let mut offspring_built = elites.len();
    for _ in 0..offspring_target {
        if parents.is_empty() {
            break;
        }
        let parent_a = &parents[rng.gen_range(0..parents.len())];
        let parent_b = &parents[rng.gen_range(0..parents.len())];

        let mut offspring_policy = if rng.gen_bool(config.crossover_rate as f64) {
            parent_a.policy.crossover(&parent_b.policy, 0.5, &mut rng)
        } else {
            parent_a.policy.clone()
        };

        if rng.gen_bool(config.mutation_rate as f64) {
            offspring_policy.mutate(MUTATION_INTERNAL_RATE, config.mutation_strength, &mut rng);
        }

        population.spawn(parent_a.category, parent_a.traits, 0, 0, Some(offspring_policy));
        offspring_built += 1;
    }

    GenerationReport {
        generation,
        alive_count,
        dead_count,
        survival_rate: if total > 0 { alive_count as f32 / total as f32 } else { 0.0 },
        fitness_avg,
        fitness_best,
        fitness_worst,
        fitness_std,
        elite_count: elites.len(),
        offspring_built,
    }
}

/// Select `count` parents from `pool` per the configured method.
fn select_parents(pool: &[Parent], config: &EngineConfig, count: usize, rng: &mut impl Rng) -> Vec<Parent> {
    if pool.is_empty() {
        return Vec::new();
    }
    match config.selection_method {
        SelectionMethod::Tournament => tournament_selection(pool, config.tournament_size as usize, count, rng),
        SelectionMethod::Roulette => roulette_selection(pool, count, rng),
        SelectionMethod::Rank => rank_selection(pool, count, rng),
    }
}

fn clone_parent(p: &Parent) -> Parent {
    Parent {
        category: p.category,
        traits: p.traits,
        policy: p.policy.clone(),
        fitness: p.fitness,
    }
}

/// Repeatedly sample a tournament of `size` distinct competitors and take
/// the best by fitness, `count` times.
fn tournament_selection(pool: &[Parent], size: usize, count: usize, rng: &mut impl Rng) -> Vec<Parent> {
    let size = size.min(pool.len()).max(1);
    (0..count)
        .map(|_| {
            let mut indices: Vec<usize> = (0..pool.len()).collect();
            indices.shuffle(rng);
            indices
                .into_iter()
                .take(size)
                .map(|i| &pool[i])
                .max_by(|a, b| a.fitness.partial_cmp(&b.fitness).unwrap_or(std::cmp::Ordering::Equal))
                .map(clone_parent)
                .unwrap()
        })
        .collect()
}

/// Weighted sampling with replacement; fitness is shifted to strictly
/// positive first so a population with negative scores never breaks the
/// weighting.
fn roulette_selection(pool: &[Parent], count: usize, rng: &mut impl Rng) -> Vec<Parent> {
    let min_fitness = pool.iter().map(|p| p.fitness).fold(f32::MAX, f32::min);
    let weights: Vec<f32> = pool
        .iter()
        .map(|p| if min_fitness < 0.0 { p.fitness - min_fitness + 1.0 } else { p.fitness })
        .collect();

    if weights.iter().all(|w| *w <= 0.0) {
        return (0..count).map(|_| clone_parent(&pool[rng.gen_range(0..pool.len())])).collect();
    }

    let dist = WeightedIndex::new(&weights).expect("at least one positive weight");
    (0..count).map(|_| clone_parent(&pool[dist.sample(rng)])).collect()
}

/// Rank-based weighting: sort by descending fitness and weight the best
/// individual highest, unlike the inverted weighting in the reference
/// implementation (see the rank-selection direction decision).
fn rank_selection(pool: &[Parent], count: usize, rng: &mut impl Rng) -> Vec<Parent> {
    let mut order: Vec<&Parent> = pool.iter().collect();
    order.sort_by(|a, b| b.fitness.partial_cmp(&a.fitness).unwrap_or(std::cmp::Ordering::Equal));

    let n = order.len();
    let weights: Vec<usize> = (0..n).map(|i| n - i).collect();
    let dist = WeightedIndex::new(&weights).expect("non-empty pool");
    (0..count).map(|_| clone_parent(order[dist.sample(rng)])).collect()
}

fn mean(values: &[f32]) -> f32 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f32>() / values.len() as f32
    }
}

fn std_dev(values: &[f32], mean_value: f32) -> f32 {
    if values.is_empty() {
        return 0.0;
    }
    let variance = values.iter().map(|v| (v - mean_value).powi(2)).sum::<f32>() / values.len() as f32;
    variance.sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::Traits;
    use rand::SeedableRng;

    fn seeded_population(size: u32) -> Population {
        let mut population = Population::new();
        let mut rng = rand_pcg::Pcg64::seed_from_u64(1);
        for _ in 0..size {
            let policy = DecisionNetwork::new_random(crate::constants::INPUT_LEN, 8, &mut rng);
            population.spawn(Category::Herbivore, Traits::new(50, 50, 50, 50, 50), 0, 0, Some(policy));
        }
        population
    }

    #[test]
    fn evolve_preserves_population_size() {
        let config = EngineConfig { population_size: 10, ..EngineConfig::default() };
        let mut population = seeded_population(10);
        let seeds = SeedStreams::new(7);
        let report = evolve(&config, &mut population, &seeds, 0);
        assert_eq!(population.len(), 10);
        assert!(report.elite_count >= 1);
    }

    #[test]
    fn evolve_keeps_at_least_one_elite() {
        let config = EngineConfig { population_size: 5, elite_percentage: 0.0, ..EngineConfig::default() };
        let mut population = seeded_population(5);
        let seeds = SeedStreams::new(3);
        let report = evolve(&config, &mut population, &seeds, 0);
        assert_eq!(report.elite_count, 1);
    }

    #[test]
    fn rank_selection_favors_higher_fitness() {
        let mut rng = rand_pcg::Pcg64::seed_from_u64(5);
        let net = DecisionNetwork::new_random(4, 2, &mut rng);
        let pool = vec![
            Parent { category: Category::Herbivore, traits: Traits::new(50, 50, 50, 50, 50), policy: net.clone(), fitness: 0.0 },
            Parent { category: Category::Herbivore, traits: Traits::new(50, 50, 50, 50, 50), policy: net, fitness: 1000.0 },
        ];
        let selected = rank_selection(&pool, 200, &mut rng);
        let high_count = selected.iter().filter(|p| p.fitness == 1000.0).count();
        assert!(high_count > selected.len() / 2);
    }
}
