use std::fs;
use std::sync::atomic::Ordering;

use tempfile::tempdir;

use pastoral::engine::{demo, Engine, EngineSettings};
use pastoral::scenario::Scenario;
use pastoral::snapshot::SnapshotRecord;

fn settings(seed: u64, interval: u64, dir: &std::path::Path) -> EngineSettings {
    EngineSettings {
        scenario_name: "greenfold".into(),
        seed,
        snapshot_interval_ticks: interval,
        snapshot_dir: dir.to_path_buf(),
    }
}

#[test]
fn engine_runs_hook_each_tick() {
    let scenario = Scenario::greenfold();
    let temp = tempdir().expect("tempdir");
    let mut engine = Engine::new(settings(scenario.seed, 0, temp.path()));
    let mut county = scenario.build_county(engine.rng_mut()).expect("county builds");

    let mut ticks = Vec::new();
    engine
        .run_with_hook(&mut county, 6, |snapshot| ticks.push(snapshot.tick))
        .expect("run succeeds");

    assert_eq!(ticks, vec![1, 2, 3, 4, 5, 6]);
}

#[test]
fn snapshot_files_land_on_the_interval() {
    let scenario = Scenario::greenfold();
    let temp = tempdir().expect("tempdir");
    let mut engine = Engine::new(settings(scenario.seed, 2, temp.path()));
    let mut county = scenario.build_county(engine.rng_mut()).expect("county builds");

    engine.run(&mut county, 5).expect("run succeeds");

    let dir = temp.path().join("greenfold");
    let mut written: Vec<String> = fs::read_dir(&dir)
        .expect("snapshot dir exists")
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    written.sort();
    assert_eq!(written, vec!["tick_000002.json", "tick_000004.json"]);

    let text = fs::read_to_string(dir.join("tick_000004.json")).unwrap();
    let record: SnapshotRecord = serde_json::from_str(&text).expect("snapshot parses back");
    assert_eq!(record.county.tick, 4);
    assert_eq!(record.county.glens.len(), 37);
}

#[test]
fn interval_zero_disables_snapshots() {
    let scenario = Scenario::greenfold();
    let temp = tempdir().expect("tempdir");
    let mut engine = Engine::new(settings(scenario.seed, 0, temp.path()));
    let mut county = scenario.build_county(engine.rng_mut()).expect("county builds");

    engine.run(&mut county, 4).expect("run succeeds");
    assert!(!temp.path().join("greenfold").exists());
}

#[test]
fn halt_flag_stops_the_run_at_a_tick_boundary() {
    let scenario = Scenario::greenfold();
    let temp = tempdir().expect("tempdir");
    let mut engine = Engine::new(settings(scenario.seed, 0, temp.path()));
    let mut county = scenario.build_county(engine.rng_mut()).expect("county builds");

    let halt = engine.halt_handle();
    let mut completed_hooks = 0;
    engine
        .run_with_hook(&mut county, 10, |snapshot| {
            completed_hooks += 1;
            if snapshot.tick == 3 {
                halt.store(true, Ordering::SeqCst);
            }
        })
        .expect("run succeeds");

    assert_eq!(completed_hooks, 3);
    assert_eq!(county.ticks_elapsed(), 3);
}

#[test]
fn shipped_scenario_matches_the_builtin_default() {
    let loader = pastoral::ScenarioLoader::new(env!("CARGO_MANIFEST_DIR"));
    let scenario = loader
        .load("scenarios/greenfold.yaml")
        .expect("scenario should load");
    let builtin = Scenario::greenfold();
    assert_eq!(scenario.name, builtin.name);
    assert_eq!(scenario.seed, builtin.seed);
    assert_eq!(scenario.county.width, builtin.county.width);
    assert_eq!(scenario.county.flocks.strategy, builtin.county.flocks.strategy);
}

#[test]
fn demo_returns_one_frame_per_cycle() {
    let frames = demo(4).expect("demo runs");
    assert_eq!(frames.len(), 4);
    // Three ticks per cycle.
    let ticks: Vec<u64> = frames.iter().map(|frame| frame.tick).collect();
    assert_eq!(ticks, vec![3, 6, 9, 12]);
}
