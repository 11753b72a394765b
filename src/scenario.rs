use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::county::County;
use crate::error::CountyError;
use crate::generate::{self, CountyPlan, FlockPlan, GlenPlan, PathPlan, SheepPlan, Topology};
use crate::rng::{RngManager, GENERATION_STREAM};

fn default_snapshot_interval_ticks() -> u64 {
    5
}

/// A scenario file: name, seed, run length, and the county plan.
#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    pub name: String,
    pub description: Option<String>,
    pub seed: u64,
    #[serde(default)]
    pub ticks: Option<u64>,
    #[serde(default = "default_snapshot_interval_ticks")]
    pub snapshot_interval_ticks: u64,
    pub county: CountyPlan,
}

impl Scenario {
    /// The built-in default: a hex county the binary can run without
    /// any file on disk.
    pub fn greenfold() -> Self {
        Self {
            name: "greenfold".to_string(),
            description: Some("a small hex county with wandering flocks".to_string()),
            seed: 7,
            ticks: Some(30),
            snapshot_interval_ticks: default_snapshot_interval_ticks(),
            county: CountyPlan {
                topology: Topology::Hex,
                glen_count: 0,
                width: 4,
                connectivity: 0.8,
                scale: None,
                glens: GlenPlan {
                    abundance: 10,
                    growth: 10,
                },
                paths: PathPlan::default(),
                flocks: FlockPlan {
                    count: 5,
                    min_sheep: 5,
                    max_sheep: 25,
                    strategy: "flee-low-grass".to_string(),
                },
                sheep: SheepPlan {
                    greed: 1,
                    endurance: 1,
                },
                limits: Default::default(),
            },
        }
    }

    pub fn from_str(text: &str) -> Result<Self> {
        let scenario: Scenario = serde_yaml::from_str(text).context("failed to parse scenario")?;
        Ok(scenario)
    }

    pub fn ticks(&self, override_ticks: Option<u64>) -> u64 {
        override_ticks.or(self.ticks).unwrap_or(30)
    }

    /// Generate the county this scenario describes, drawing all
    /// randomness from the manager's generation stream.
    pub fn build_county(&self, rng: &mut RngManager) -> Result<County, CountyError> {
        let mut stream = rng.stream(GENERATION_STREAM);
        generate::generate(&self.county, &mut stream)
    }
}

pub struct ScenarioLoader {
    base_dir: PathBuf,
}

impl ScenarioLoader {
    pub fn new(base_dir: impl AsRef<Path>) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
        }
    }

    pub fn load(&self, file: impl AsRef<Path>) -> Result<Scenario> {
        let path = self.base_dir.join(file);
        let data = fs::read_to_string(&path)
            .with_context(|| format!("failed to read scenario file {}", path.display()))?;
        let scenario =
            Scenario::from_str(&data).with_context(|| format!("failed to parse {}", path.display()))?;
        Ok(scenario)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn greenfold_generates() {
        let scenario = Scenario::greenfold();
        let mut rng = RngManager::new(scenario.seed);
        let county = scenario.build_county(&mut rng).unwrap();
        // hex width 4: rows 4,5,6,7,6,5,4
        assert_eq!(county.graph().glen_count(), 37);
        assert_eq!(county.flocks().len(), 5);
    }

    #[test]
    fn yaml_defaults_fill_in() {
        let scenario = Scenario::from_str(
            "name: bare\nseed: 3\ncounty:\n  topology: grid\n  width: 2\n",
        )
        .unwrap();
        assert_eq!(scenario.snapshot_interval_ticks, 5);
        assert_eq!(scenario.county.glens.abundance, 10);
        assert_eq!(scenario.county.flocks.strategy, "flee-low-grass");
        assert_eq!(scenario.ticks(None), 30);
        assert_eq!(scenario.ticks(Some(12)), 12);
    }

    #[test]
    fn grade_parses_as_a_pair() {
        let scenario = Scenario::from_str(
            "name: graded\nseed: 3\ncounty:\n  topology: grid\n  width: 2\n  paths:\n    length: 2\n    grade: [3, 4]\n",
        )
        .unwrap();
        assert_eq!(scenario.county.paths.grade.value(), 0.75);
    }
}
