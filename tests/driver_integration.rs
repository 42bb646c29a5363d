//! Driver-level integration tests: determinism across full runs and the
//! evolution-size invariant at a generation boundary.

use evosim_core::config::EngineConfig;
use evosim_core::driver::{DriverState, SimulationDriver};

fn config(seed: u64) -> EngineConfig {
    EngineConfig {
        grid_width: 10,
        grid_height: 10,
        population_size: 20,
        max_generations: 2,
        steps_per_generation: 5,
        seed,
        ..EngineConfig::default()
    }
}

fn run_to_completion(seed: u64) -> Vec<evosim_core::report::GenerationReport> {
    let mut driver = SimulationDriver::new(config(seed));
    driver.initialize().unwrap();
    driver.start().unwrap();
    loop {
        match driver.state() {
            DriverState::Running => {
                driver.step().unwrap();
            }
            DriverState::Evolving => {
                driver.evolve().unwrap();
            }
            DriverState::Finished => break,
            other => panic!("unexpected driver state {other:?}"),
        }
    }
    driver.history().to_vec()
}

/// S5: after two generations, population size is restored to
/// `population_size` and at least one elite survives each boundary.
#[test]
fn s5_evolution_preserves_population_size_across_generations() {
    let history = run_to_completion(42);
    assert_eq!(history.len(), 2);
    for report in &history {
        assert!(report.elite_count >= 1);
    }
}

/// Determinism: two runs with the same seed and configuration produce
/// identical generation-report sequences.
#[test]
fn determinism_same_seed_same_generation_history() {
    let history_a = run_to_completion(7);
    let history_b = run_to_completion(7);
    assert_eq!(history_a.len(), history_b.len());
    for (a, b) in history_a.iter().zip(history_b.iter()) {
        assert_eq!(a.alive_count, b.alive_count);
        assert_eq!(a.dead_count, b.dead_count);
        assert_eq!(a.elite_count, b.elite_count);
        assert_eq!(a.offspring_built, b.offspring_built);
        assert_eq!(a.fitness_avg, b.fitness_avg);
    }
}

/// Different seeds are not required to diverge, but the driver must at
/// least reach `Finished` cleanly from an entirely fresh run each time.
#[test]
fn fresh_runs_always_terminate_in_finished_state() {
    for seed in [1, 2, 3] {
        let mut driver = SimulationDriver::new(config(seed));
        driver.initialize().unwrap();
        driver.start().unwrap();
        let mut guard = 0;
        loop {
            guard += 1;
            assert!(guard < 10_000, "driver failed to terminate for seed {seed}");
            match driver.state() {
                DriverState::Running => {
                    driver.step().unwrap();
                }
                DriverState::Evolving => {
                    driver.evolve().unwrap();
                }
                DriverState::Finished => break,
                other => panic!("unexpected driver state {other:?}"),
            }
        }
    }
}
