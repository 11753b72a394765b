use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use pastoral::{
    engine::{Engine, EngineSettings},
    scenario::{Scenario, ScenarioLoader},
    web::{self, WebServerConfig},
};

#[derive(Debug, Parser)]
#[command(author, version, about = "pastoral grazing simulation runner")]
struct Cli {
    /// Path to the scenario YAML file; the built-in greenfold county
    /// is used when omitted
    #[arg(long)]
    scenario: Option<PathBuf>,

    /// Override tick count (uses scenario default when omitted)
    #[arg(long)]
    ticks: Option<u64>,

    /// Override the random seed
    #[arg(long)]
    seed: Option<u64>,

    /// Override snapshot interval in ticks (0 disables snapshots)
    #[arg(long)]
    snapshot_interval: Option<u64>,

    /// Directory for snapshots
    #[arg(long)]
    snapshot_dir: Option<PathBuf>,

    /// Serve the live observer UI instead of running headless
    #[arg(long)]
    serve: bool,

    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    #[arg(long, default_value_t = 4180)]
    port: u16,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let scenario = match &cli.scenario {
        Some(path) => ScenarioLoader::new(".").load(path)?,
        None => Scenario::greenfold(),
    };
    let ticks = scenario.ticks(cli.ticks);
    let seed = cli.seed.unwrap_or(scenario.seed);
    let snapshot_interval = cli
        .snapshot_interval
        .unwrap_or(scenario.snapshot_interval_ticks);
    let snapshot_dir = cli
        .snapshot_dir
        .unwrap_or_else(|| PathBuf::from("snapshots"));

    if cli.serve {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()?;
        return runtime.block_on(web::run(WebServerConfig {
            scenario,
            seed,
            ticks,
            snapshot_interval,
            snapshot_dir,
            host: cli.host,
            port: cli.port,
        }));
    }

    let settings = EngineSettings {
        scenario_name: scenario.name.clone(),
        seed,
        snapshot_interval_ticks: snapshot_interval,
        snapshot_dir,
    };
    let mut engine = Engine::new(settings);
    let mut county = scenario.build_county(engine.rng_mut())?;
    let completed = engine.run(&mut county, ticks)?;

    let survey = county.snapshot();
    let total_sheep: usize = survey.flocks.iter().map(|f| f.members.len()).sum();
    let total_abundance: i64 = survey.glens.iter().map(|g| g.abundance).sum();
    let total_prosperity: i64 = survey
        .flocks
        .iter()
        .flat_map(|f| &f.members)
        .map(|s| s.prosperity)
        .sum();
    println!(
        "Scenario '{}' completed {} ticks: {} glens ({} grass), {} flocks, {} sheep, {} total prosperity.",
        scenario.name,
        completed,
        survey.glens.len(),
        total_abundance,
        survey.flocks.len(),
        total_sheep,
        total_prosperity
    );
    Ok(())
}
