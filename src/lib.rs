pub mod county;
pub mod engine;
pub mod error;
pub mod flock;
pub mod generate;
pub mod graph;
pub mod rng;
pub mod scenario;
pub mod snapshot;
pub mod strategy;
pub mod web;

pub use county::{County, CountyLimits};
pub use engine::{demo, Engine, EngineSettings};
pub use error::{ConfigurationError, CountyError, PolicyError, StructuralError};
pub use scenario::{Scenario, ScenarioLoader};
pub use snapshot::CountySnapshot;
