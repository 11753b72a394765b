//! The engine wraps a county with the run-level concerns: the seeded
//! RNG streams, periodic snapshot writing, a per-tick observer hook,
//! and a shared halt flag checked between ticks.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::Result;

use crate::county::County;
use crate::rng::{RngManager, MOVEMENT_STREAM};
use crate::scenario::Scenario;
use crate::snapshot::{CountySnapshot, SnapshotWriter};

pub struct EngineSettings {
    pub scenario_name: String,
    pub seed: u64,
    pub snapshot_interval_ticks: u64,
    pub snapshot_dir: PathBuf,
}

pub struct Engine {
    rng: RngManager,
    writer: SnapshotWriter,
    halt: Arc<AtomicBool>,
    settings: EngineSettings,
}

impl Engine {
    pub fn new(settings: EngineSettings) -> Self {
        Self {
            rng: RngManager::new(settings.seed),
            writer: SnapshotWriter::new(
                settings.snapshot_dir.join(&settings.scenario_name),
                settings.snapshot_interval_ticks,
            ),
            halt: Arc::new(AtomicBool::new(false)),
            settings,
        }
    }

    pub fn scenario_name(&self) -> &str {
        &self.settings.scenario_name
    }

    /// The engine's RNG manager, so county generation can draw from
    /// the same seeded source the run will use.
    pub fn rng_mut(&mut self) -> &mut RngManager {
        &mut self.rng
    }

    /// A flag external code may set to stop the run at the next tick
    /// boundary. Ticks themselves are never interrupted.
    pub fn halt_handle(&self) -> Arc<AtomicBool> {
        self.halt.clone()
    }

    pub fn run(&mut self, county: &mut County, ticks: u64) -> Result<u64> {
        self.run_with_hook(county, ticks, |_| {})
    }

    /// Drive the county for `ticks` turns, handing every per-tick
    /// snapshot to `hook` after the snapshot writer has seen it.
    pub fn run_with_hook(
        &mut self,
        county: &mut County,
        ticks: u64,
        mut hook: impl FnMut(CountySnapshot),
    ) -> Result<u64> {
        let mut completed = 0;
        for _ in 0..ticks {
            if self.halt.load(Ordering::SeqCst) {
                break;
            }
            let mut movement = self.rng.stream(MOVEMENT_STREAM);
            county.progress(1, &mut movement);
            let snapshot = county.snapshot();
            self.writer.maybe_write(&snapshot)?;
            hook(snapshot);
            completed += 1;
        }
        Ok(completed)
    }
}

/// Build the default county and run `turns` cycles of three ticks
/// each, returning the end-of-cycle snapshots for a renderer.
pub fn demo(turns: u32) -> Result<Vec<CountySnapshot>> {
    let scenario = Scenario::greenfold();
    let mut rng = RngManager::new(scenario.seed);
    let mut county = scenario.build_county(&mut rng)?;
    let mut frames = Vec::with_capacity(turns as usize);
    for _ in 0..turns {
        let mut movement = rng.stream(MOVEMENT_STREAM);
        county.progress(3, &mut movement);
        frames.push(county.snapshot());
    }
    Ok(frames)
}
