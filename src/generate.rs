//! Procedural county generation.
//!
//! A county plan names one of three topologies. Arbitrary counties are
//! best-effort randomized connectivity; the two lattices place glens
//! row by row and link each new glen back to already-placed neighbors.
//! None of the generators promises a connected graph.

use rand::{Rng, RngCore};
use serde::Deserialize;

use crate::county::{County, CountyLimits};
use crate::error::{ConfigurationError, CountyError};
use crate::flock::{Flock, Sheep};
use crate::graph::{CountyGraph, GlenId, Grade};
use crate::strategy::builtin_strategy;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Topology {
    Arbitrary,
    Grid,
    Hex,
}

/// Everything the generator needs to build one county.
#[derive(Debug, Clone, Deserialize)]
pub struct CountyPlan {
    pub topology: Topology,
    /// Glen count for arbitrary counties.
    #[serde(default = "default_glen_count")]
    pub glen_count: usize,
    /// Lattice extent for grid and hex counties.
    #[serde(default = "default_width")]
    pub width: u32,
    /// Probability of each optional link being made.
    #[serde(default = "default_connectivity")]
    pub connectivity: f64,
    /// Horizontal scale of the derived planar layout; defaults to the
    /// lattice width.
    #[serde(default)]
    pub scale: Option<f64>,
    #[serde(default)]
    pub glens: GlenPlan,
    #[serde(default)]
    pub paths: PathPlan,
    #[serde(default)]
    pub flocks: FlockPlan,
    #[serde(default)]
    pub sheep: SheepPlan,
    #[serde(default)]
    pub limits: CountyLimits,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GlenPlan {
    pub abundance: i64,
    pub growth: i64,
}

impl Default for GlenPlan {
    fn default() -> Self {
        Self {
            abundance: 10,
            growth: 10,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PathPlan {
    pub length: i64,
    pub grade: Grade,
}

impl Default for PathPlan {
    fn default() -> Self {
        Self {
            length: 1,
            grade: Grade::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FlockPlan {
    pub count: usize,
    pub min_sheep: usize,
    pub max_sheep: usize,
    pub strategy: String,
}

impl Default for FlockPlan {
    fn default() -> Self {
        Self {
            count: 5,
            min_sheep: 5,
            max_sheep: 25,
            strategy: "flee-low-grass".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SheepPlan {
    pub greed: i64,
    pub endurance: u32,
}

impl Default for SheepPlan {
    fn default() -> Self {
        Self {
            greed: 1,
            endurance: 1,
        }
    }
}

fn default_glen_count() -> usize {
    32
}

fn default_width() -> u32 {
    4
}

fn default_connectivity() -> f64 {
    1.0
}

/// Build a county from a plan: glens and paths first, then flocks
/// scattered over the finished graph.
pub fn generate(plan: &CountyPlan, rng: &mut dyn RngCore) -> Result<County, CountyError> {
    validate(plan)?;

    let mut graph = CountyGraph::new();
    match plan.topology {
        Topology::Arbitrary => build_arbitrary(plan, &mut graph, rng)?,
        Topology::Grid => build_grid(plan, &mut graph, rng)?,
        Topology::Hex => build_hex(plan, &mut graph, rng)?,
    }

    let mut county = County::new(graph, plan.limits.clone());
    seed_flocks(plan, &mut county, rng)?;
    Ok(county)
}

/// Reject degenerate parameters before any glen exists. The county
/// ceilings are applied here, as bounds on what generation hands out,
/// and nowhere else.
pub fn validate(plan: &CountyPlan) -> Result<(), ConfigurationError> {
    match plan.topology {
        Topology::Arbitrary if plan.glen_count == 0 => {
            return Err(ConfigurationError::EmptyCounty);
        }
        Topology::Grid | Topology::Hex if plan.width == 0 => {
            return Err(ConfigurationError::InvalidWidth(plan.width));
        }
        _ => {}
    }
    if !(0.0..=1.0).contains(&plan.connectivity) {
        return Err(ConfigurationError::InvalidConnectivity(plan.connectivity));
    }
    if plan.flocks.min_sheep > plan.flocks.max_sheep {
        return Err(ConfigurationError::FlockSizeRange {
            min: plan.flocks.min_sheep,
            max: plan.flocks.max_sheep,
        });
    }

    let floors: [(&'static str, i64, i64); 3] = [
        ("path length", plan.paths.length, 1),
        ("sheep greed", plan.sheep.greed, 1),
        ("sheep endurance", plan.sheep.endurance as i64, 1),
    ];
    for (field, value, min) in floors {
        if value < min {
            return Err(ConfigurationError::TooSmall { field, value, min });
        }
    }
    if plan.glens.abundance < 0 {
        return Err(ConfigurationError::TooSmall {
            field: "glen abundance",
            value: plan.glens.abundance,
            min: 0,
        });
    }
    if plan.glens.growth < 0 {
        return Err(ConfigurationError::TooSmall {
            field: "glen growth",
            value: plan.glens.growth,
            min: 0,
        });
    }

    let limits = &plan.limits;
    let ceilings: [(&'static str, i64, i64); 5] = [
        ("glen abundance", plan.glens.abundance, limits.max_abundance),
        ("glen growth", plan.glens.growth, limits.max_growth),
        ("path length", plan.paths.length, limits.max_length),
        ("sheep greed", plan.sheep.greed, limits.max_greed),
        (
            "sheep endurance",
            plan.sheep.endurance as i64,
            limits.max_endurance as i64,
        ),
    ];
    for (field, value, max) in ceilings {
        if value > max {
            return Err(ConfigurationError::AboveCeiling { field, value, max });
        }
    }
    Ok(())
}

fn build_arbitrary(
    plan: &CountyPlan,
    graph: &mut CountyGraph,
    rng: &mut dyn RngCore,
) -> Result<(), CountyError> {
    for index in 0..plan.glen_count {
        graph.add_glen(
            format!("glen-{index}"),
            plan.glens.abundance,
            plan.glens.growth,
        );
    }
    connect_glens(plan, graph, rng)
}

/// Every glen gets one connection attempt, and a second with
/// probability `connectivity`.
fn connect_glens(
    plan: &CountyPlan,
    graph: &mut CountyGraph,
    rng: &mut dyn RngCore,
) -> Result<(), CountyError> {
    let ids: Vec<GlenId> = graph.glen_ids().collect();
    for &glen in &ids {
        connect_glen(plan, graph, glen, rng)?;
        if rng.gen_bool(plan.connectivity) {
            connect_glen(plan, graph, glen, rng)?;
        }
    }
    Ok(())
}

/// Link `glen` to one uniformly chosen glen it cannot already reach.
/// An empty candidate set is saturation, a normal outcome: the glen is
/// simply left as it is.
fn connect_glen(
    plan: &CountyPlan,
    graph: &mut CountyGraph,
    glen: GlenId,
    rng: &mut dyn RngCore,
) -> Result<(), CountyError> {
    let candidates: Vec<GlenId> = graph
        .glen_ids()
        .filter(|&other| other != glen && !graph.linked_away(glen, other))
        .collect();
    if candidates.is_empty() {
        return Ok(());
    }
    let other = candidates[rng.gen_range(0..candidates.len())];
    graph.add_path(glen, other, true, plan.paths.length, plan.paths.grade)?;
    Ok(())
}

fn build_grid(
    plan: &CountyPlan,
    graph: &mut CountyGraph,
    rng: &mut dyn RngCore,
) -> Result<(), CountyError> {
    let width = plan.width as usize;
    let scale = plan.scale.unwrap_or(plan.width as f64);
    let mut previous_row: Vec<GlenId> = Vec::new();
    let mut index = 0;

    for y in 0..width {
        let mut row = Vec::with_capacity(width);
        for x in 0..width {
            let id = graph.add_lattice_glen(
                format!("glen-{index}"),
                plan.glens.abundance,
                plan.glens.growth,
                (x as u32, y as u32),
                grid_position(x, y, scale),
            );
            index += 1;
            if x > 0 && rng.gen_bool(plan.connectivity) {
                graph.add_path(id, row[x - 1], true, plan.paths.length, plan.paths.grade)?;
            }
            if y > 0 && rng.gen_bool(plan.connectivity) {
                graph.add_path(
                    id,
                    previous_row[x],
                    true,
                    plan.paths.length,
                    plan.paths.grade,
                )?;
            }
            row.push(id);
        }
        previous_row = row;
    }
    Ok(())
}

/// Hex counties are diamond shaped: `2w - 1` rows that widen to the
/// middle row and narrow again. Which upper neighbors a glen has
/// depends on whether its row is in the expanding or contracting half.
fn build_hex(
    plan: &CountyPlan,
    graph: &mut CountyGraph,
    rng: &mut dyn RngCore,
) -> Result<(), CountyError> {
    let width = plan.width as usize;
    let scale = plan.scale.unwrap_or(plan.width as f64);
    let row_count = 2 * width - 1;
    let mut previous_row: Vec<GlenId> = Vec::new();
    let mut index = 0;

    for y in 0..row_count {
        let row_len = hex_row_len(width, y);
        let mut row = Vec::with_capacity(row_len);
        for x in 0..row_len {
            let id = graph.add_lattice_glen(
                format!("glen-{index}"),
                plan.glens.abundance,
                plan.glens.growth,
                (x as u32, y as u32),
                hex_position(x, y, width, scale),
            );
            index += 1;
            if x > 0 && rng.gen_bool(plan.connectivity) {
                graph.add_path(id, row[x - 1], true, plan.paths.length, plan.paths.grade)?;
            }
            if y > 0 {
                if y < width {
                    // Expanding half: the row above is one shorter, so
                    // the upper-left and upper-right neighbors sit at
                    // x-1 and x.
                    if x > 0 && rng.gen_bool(plan.connectivity) {
                        graph.add_path(
                            id,
                            previous_row[x - 1],
                            true,
                            plan.paths.length,
                            plan.paths.grade,
                        )?;
                    }
                    if x < previous_row.len() && rng.gen_bool(plan.connectivity) {
                        graph.add_path(
                            id,
                            previous_row[x],
                            true,
                            plan.paths.length,
                            plan.paths.grade,
                        )?;
                    }
                } else {
                    // Contracting half: the row above is one longer, so
                    // the upper pair sits at x and x+1.
                    if rng.gen_bool(plan.connectivity) {
                        graph.add_path(
                            id,
                            previous_row[x],
                            true,
                            plan.paths.length,
                            plan.paths.grade,
                        )?;
                    }
                    if rng.gen_bool(plan.connectivity) {
                        graph.add_path(
                            id,
                            previous_row[x + 1],
                            true,
                            plan.paths.length,
                            plan.paths.grade,
                        )?;
                    }
                }
            }
            row.push(id);
        }
        previous_row = row;
    }
    Ok(())
}

pub(crate) fn hex_row_len(width: usize, y: usize) -> usize {
    if y < width {
        width + y
    } else {
        width + (2 * width - y - 2)
    }
}

fn grid_position(x: usize, y: usize, scale: f64) -> (f64, f64) {
    (x as f64 - 0.5 * scale, y as f64)
}

/// Per-row horizontal shear producing the conventional hex-packing
/// skew; every row ends up centered on the same vertical axis.
fn hex_position(x: usize, y: usize, width: usize, scale: f64) -> (f64, f64) {
    let px = if y < width {
        x as f64 - (scale + 0.5 * y as f64)
    } else {
        x as f64 - (2.0 * scale - 1.0 - 0.5 * y as f64)
    };
    (px, y as f64)
}

/// Scatter the plan's flocks over the finished graph, each on a
/// uniformly random glen with a uniformly random member count.
fn seed_flocks(
    plan: &CountyPlan,
    county: &mut County,
    rng: &mut dyn RngCore,
) -> Result<(), CountyError> {
    let ids: Vec<GlenId> = county.graph().glen_ids().collect();
    for index in 0..plan.flocks.count {
        let strategy = builtin_strategy(&plan.flocks.strategy).ok_or_else(|| {
            ConfigurationError::UnknownStrategy(plan.flocks.strategy.clone())
        })?;
        let glen = ids[rng.gen_range(0..ids.len())];
        let mut flock = Flock::new(format!("flock-{index}"), glen, strategy);
        let size = rng.gen_range(plan.flocks.min_sheep..=plan.flocks.max_sheep);
        for _ in 0..size {
            flock.adopt(Sheep::new(plan.sheep.endurance, plan.sheep.greed));
        }
        county.add_flock(flock)?;
    }
    Ok(())
}
