//! The county: one full simulation instance and its turn driver.

use std::sync::atomic::{AtomicBool, Ordering};

use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::error::StructuralError;
use crate::flock::Flock;
use crate::graph::CountyGraph;
use crate::snapshot::CountySnapshot;
use crate::strategy::FlockView;

/// Generation-time ceilings. These bound what the generator will hand
/// out; nothing at runtime re-checks them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CountyLimits {
    pub max_abundance: i64,
    pub max_growth: i64,
    pub max_paths: usize,
    pub max_length: i64,
    pub max_grade: u32,
    pub max_prosperity: i64,
    pub max_endurance: u32,
    pub max_greed: i64,
}

impl Default for CountyLimits {
    fn default() -> Self {
        Self {
            max_abundance: 128,
            max_growth: 64,
            max_paths: 8,
            max_length: 4,
            max_grade: 4,
            max_prosperity: 8,
            max_endurance: 4,
            max_greed: 4,
        }
    }
}

#[derive(Debug)]
pub struct County {
    graph: CountyGraph,
    flocks: Vec<Flock>,
    limits: CountyLimits,
    ticks_elapsed: u64,
}

impl County {
    pub fn new(graph: CountyGraph, limits: CountyLimits) -> Self {
        Self {
            graph,
            flocks: Vec::new(),
            limits,
            ticks_elapsed: 0,
        }
    }

    pub fn graph(&self) -> &CountyGraph {
        &self.graph
    }

    pub fn graph_mut(&mut self) -> &mut CountyGraph {
        &mut self.graph
    }

    pub fn flocks(&self) -> &[Flock] {
        &self.flocks
    }

    pub fn limits(&self) -> &CountyLimits {
        &self.limits
    }

    pub fn ticks_elapsed(&self) -> u64 {
        self.ticks_elapsed
    }

    /// Add a flock; its starting glen must already be part of this
    /// county's graph.
    pub fn add_flock(&mut self, flock: Flock) -> Result<(), StructuralError> {
        if !self.graph.contains(flock.current_glen()) {
            return Err(StructuralError::ForeignGlen(flock.current_glen()));
        }
        self.flocks.push(flock);
        Ok(())
    }

    /// One full turn: every flock, in insertion order, moves and then
    /// grazes; only after all flocks have acted does every glen grow.
    ///
    /// A strategy that fails, or that names a glen outside this county,
    /// costs that flock its move for the tick (logged, flock stays),
    /// never the tick itself.
    pub fn tick(&mut self, rng: &mut dyn RngCore) {
        for index in 0..self.flocks.len() {
            let decision = {
                let flock = &self.flocks[index];
                let view = FlockView::new(&self.graph, flock);
                flock.strategy().decide(&view, rng)
            };
            let flock = &mut self.flocks[index];
            let destination = match decision {
                Ok(glen) if self.graph.contains(glen) => glen,
                Ok(glen) => {
                    eprintln!(
                        "[county] flock '{}' chose glen {:?} outside the county; staying put",
                        flock.name(),
                        glen
                    );
                    flock.current_glen()
                }
                Err(err) => {
                    eprintln!("[county] flock '{}' move skipped: {err}", flock.name());
                    flock.current_glen()
                }
            };
            flock.relocate(destination);
            flock.graze(&mut self.graph);
        }

        for glen in self.graph.glens_mut() {
            glen.increase(None);
        }
        self.ticks_elapsed += 1;
    }

    /// Advance the simulation by `times` ticks.
    pub fn progress(&mut self, times: u32, rng: &mut dyn RngCore) {
        for _ in 0..times {
            self.tick(rng);
        }
    }

    /// Like [`progress`](Self::progress), but checks `halt` between
    /// ticks (never mid-tick, so each tick stays atomic). Returns the
    /// number of ticks actually completed.
    pub fn progress_until(&mut self, times: u32, rng: &mut dyn RngCore, halt: &AtomicBool) -> u32 {
        let mut completed = 0;
        for _ in 0..times {
            if halt.load(Ordering::SeqCst) {
                break;
            }
            self.tick(rng);
            completed += 1;
        }
        completed
    }

    pub fn snapshot(&self) -> CountySnapshot {
        CountySnapshot::capture(self)
    }
}
