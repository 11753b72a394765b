//! Movement policies.
//!
//! A strategy is a pure decision function: it reads the flock and its
//! surroundings and names a destination glen. All state changes stay
//! with the engine. User-supplied strategies implement [`Strategy`];
//! the built-ins are resolved by name through [`builtin_strategy`].

use rand::{Rng, RngCore};

use crate::error::PolicyError;
use crate::flock::{Flock, Sheep};
use crate::graph::{CountyGraph, GlenId, PathId};

/// Read-only window onto a flock and the glen it occupies.
pub struct FlockView<'a> {
    graph: &'a CountyGraph,
    flock: &'a Flock,
}

impl<'a> FlockView<'a> {
    pub fn new(graph: &'a CountyGraph, flock: &'a Flock) -> Self {
        Self { graph, flock }
    }

    pub fn flock_name(&self) -> &str {
        self.flock.name()
    }

    pub fn current_glen(&self) -> GlenId {
        self.flock.current_glen()
    }

    /// Abundance of the currently occupied glen.
    pub fn abundance(&self) -> i64 {
        self.abundance_of(self.flock.current_glen()).unwrap_or(0)
    }

    pub fn abundance_of(&self, glen: GlenId) -> Option<i64> {
        self.graph.glen(glen).map(|g| g.abundance())
    }

    /// Outgoing (path, destination) pairs from the current glen.
    pub fn exits(&self) -> Vec<(PathId, GlenId)> {
        self.graph.exits(self.flock.current_glen())
    }

    pub fn members(&self) -> &[Sheep] {
        self.flock.members()
    }

    pub fn laziness(&self) -> u32 {
        self.flock.laziness()
    }
}

pub trait Strategy: Send + Sync {
    fn name(&self) -> &'static str;

    /// Choose the glen the flock will occupy next tick. Must not
    /// mutate anything; the engine applies the result.
    fn decide(&self, view: &FlockView<'_>, rng: &mut dyn RngCore) -> Result<GlenId, PolicyError>;
}

/// Resolve a built-in strategy by its scenario name.
pub fn builtin_strategy(name: &str) -> Option<Box<dyn Strategy>> {
    match name {
        "flee-low-grass" => Some(Box::new(FleeLowGrass::default())),
        "random" => Some(Box::new(RandomWalk)),
        "max-abundance" => Some(Box::new(MaxAbundance)),
        "weighted" => Some(Box::new(WeightedGraze)),
        _ => None,
    }
}

/// Stay while the grass lasts; once the current glen drops below the
/// threshold, flee along a uniformly random outgoing path. A dead-end
/// glen is not an error: the flock simply stays put.
pub struct FleeLowGrass {
    threshold: i64,
}

impl FleeLowGrass {
    pub fn with_threshold(threshold: i64) -> Self {
        Self { threshold }
    }
}

impl Default for FleeLowGrass {
    fn default() -> Self {
        Self { threshold: 2 }
    }
}

impl Strategy for FleeLowGrass {
    fn name(&self) -> &'static str {
        "flee-low-grass"
    }

    fn decide(&self, view: &FlockView<'_>, rng: &mut dyn RngCore) -> Result<GlenId, PolicyError> {
        if view.abundance() >= self.threshold {
            return Ok(view.current_glen());
        }
        let exits = view.exits();
        if exits.is_empty() {
            return Ok(view.current_glen());
        }
        let (_, destination) = exits[rng.gen_range(0..exits.len())];
        Ok(destination)
    }
}

/// Uniform choice among the current glen and every neighbor.
pub struct RandomWalk;

impl Strategy for RandomWalk {
    fn name(&self) -> &'static str {
        "random"
    }

    fn decide(&self, view: &FlockView<'_>, rng: &mut dyn RngCore) -> Result<GlenId, PolicyError> {
        let options = candidates(view);
        Ok(options[rng.gen_range(0..options.len())])
    }
}

/// Graze wherever the grass is tallest, counting the current glen as a
/// candidate. Ties are broken uniformly at random.
pub struct MaxAbundance;

impl Strategy for MaxAbundance {
    fn name(&self) -> &'static str {
        "max-abundance"
    }

    fn decide(&self, view: &FlockView<'_>, rng: &mut dyn RngCore) -> Result<GlenId, PolicyError> {
        let options = candidates(view);
        let best = options
            .iter()
            .filter_map(|&glen| view.abundance_of(glen))
            .max()
            .unwrap_or(0);
        let peaks: Vec<GlenId> = options
            .into_iter()
            .filter(|&glen| view.abundance_of(glen) == Some(best))
            .collect();
        Ok(peaks[rng.gen_range(0..peaks.len())])
    }
}

/// Abundance-weighted random choice over the current glen and its
/// neighbors. When everything around is barren the flock stays.
pub struct WeightedGraze;

impl Strategy for WeightedGraze {
    fn name(&self) -> &'static str {
        "weighted"
    }

    fn decide(&self, view: &FlockView<'_>, rng: &mut dyn RngCore) -> Result<GlenId, PolicyError> {
        let options = candidates(view);
        let weights: Vec<i64> = options
            .iter()
            .map(|&glen| view.abundance_of(glen).unwrap_or(0).max(0))
            .collect();
        let total: i64 = weights.iter().sum();
        if total == 0 {
            return Ok(view.current_glen());
        }
        let mut target = rng.gen_range(0..total);
        for (glen, weight) in options.iter().zip(&weights) {
            if target < *weight {
                return Ok(*glen);
            }
            target -= weight;
        }
        Ok(view.current_glen())
    }
}

fn candidates(view: &FlockView<'_>) -> Vec<GlenId> {
    let mut options = vec![view.current_glen()];
    options.extend(view.exits().into_iter().map(|(_, glen)| glen));
    options
}
