//! Read-only county views and the periodic JSON snapshot writer.
//!
//! Snapshots are plain data: identifiers, numbers, and optional planar
//! coordinates. Rendering collaborators consume these and nothing else.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::county::County;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlenFrame {
    pub identifier: String,
    pub abundance: i64,
    pub growth: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<(f64, f64)>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeFrame {
    pub origin: String,
    pub destination: String,
    pub length: i64,
    pub symmetrical: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SheepFrame {
    pub prosperity: i64,
    pub hunger: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlockFrame {
    pub name: String,
    pub glen: String,
    pub laziness: u32,
    pub members: Vec<SheepFrame>,
}

/// One county, one tick, fully enumerated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountySnapshot {
    pub tick: u64,
    pub glens: Vec<GlenFrame>,
    pub edges: Vec<EdgeFrame>,
    pub flocks: Vec<FlockFrame>,
}

impl CountySnapshot {
    pub fn capture(county: &County) -> Self {
        let graph = county.graph();
        let glens = graph
            .glens()
            .map(|(_, glen)| GlenFrame {
                identifier: glen.identifier().to_string(),
                abundance: glen.abundance(),
                growth: glen.growth(),
                position: glen.position(),
            })
            .collect();
        let edges = graph
            .paths()
            .map(|(_, path)| EdgeFrame {
                origin: graph
                    .glen(path.origin())
                    .map(|g| g.identifier().to_string())
                    .unwrap_or_default(),
                destination: graph
                    .glen(path.destination())
                    .map(|g| g.identifier().to_string())
                    .unwrap_or_default(),
                length: path.length(),
                symmetrical: path.symmetrical(),
            })
            .collect();
        let flocks = county
            .flocks()
            .iter()
            .map(|flock| FlockFrame {
                name: flock.name().to_string(),
                glen: graph
                    .glen(flock.current_glen())
                    .map(|g| g.identifier().to_string())
                    .unwrap_or_default(),
                laziness: flock.laziness(),
                members: flock
                    .members()
                    .iter()
                    .map(|sheep| SheepFrame {
                        prosperity: sheep.prosperity(),
                        hunger: sheep.hunger(),
                    })
                    .collect(),
            })
            .collect();
        Self {
            tick: county.ticks_elapsed(),
            glens,
            edges,
            flocks,
        }
    }
}

/// What actually lands on disk: the snapshot plus a write timestamp.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotRecord {
    pub written_at: DateTime<Utc>,
    pub county: CountySnapshot,
}

pub struct SnapshotWriter {
    dir: PathBuf,
    interval_ticks: u64,
}

impl SnapshotWriter {
    pub fn new(dir: impl AsRef<Path>, interval_ticks: u64) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
            interval_ticks,
        }
    }

    /// Write the snapshot if its tick lands on the interval. Interval 0
    /// disables writing entirely.
    pub fn maybe_write(&self, snapshot: &CountySnapshot) -> Result<Option<PathBuf>> {
        if self.interval_ticks == 0 || snapshot.tick % self.interval_ticks != 0 {
            return Ok(None);
        }
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("failed to create snapshot dir {}", self.dir.display()))?;
        let file_path = self.dir.join(format!("tick_{:06}.json", snapshot.tick));
        let record = SnapshotRecord {
            written_at: Utc::now(),
            county: snapshot.clone(),
        };
        let json = serde_json::to_string_pretty(&record)?;
        fs::write(&file_path, json)
            .with_context(|| format!("failed to write {}", file_path.display()))?;
        Ok(Some(file_path))
    }
}
