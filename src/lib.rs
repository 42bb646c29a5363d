pub mod action;
pub mod agent;
pub mod config;
pub mod constants;
pub mod driver;
pub mod error;
pub mod evolution;
pub mod events;
pub mod grid;
pub mod ids;
pub mod network;
pub mod population;
pub mod prng;
pub mod report;
pub mod sensing;

pub use agent::{Animal, Category, DeathCause, Traits, Vitals};
pub use config::EngineConfig;
pub use driver::{DriverState, SimulationDriver};
pub use error::{EvosimError, Result};
pub use grid::World;
pub use ids::AgentId;
pub use network::DecisionNetwork;
pub use population::Population;
pub use report::{GenerationReport, WeekReport};
