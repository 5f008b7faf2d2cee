mod common;

use tp_app::{
    RunOptions, RunRequest, ScenarioOverrides, ensure_run, list_runs, load_run,
    load_run_events, query,
};
use tp_results::RunStore;

#[test]
fn run_persists_beside_scenario() {
    let path = common::scenario_copy("steel_pot_ice.yaml", "persist");
    let request = RunRequest {
        scenario_path: &path,
        overrides: ScenarioOverrides::default(),
        options: RunOptions {
            use_cache: false,
            ..RunOptions::default()
        },
    };

    let response = ensure_run(&request).expect("run failed");

    let store = RunStore::for_scenario(&path).unwrap();
    assert!(store.has_run(&response.run_id));

    let runs = list_runs(&path, Some("Steel pot with ice")).unwrap();
    assert!(runs.iter().any(|r| r.run_id == response.run_id));

    let (manifest, records) = load_run(&path, &response.run_id).unwrap();
    assert_eq!(manifest.scenario_name, "Steel pot with ice");
    let summary = query::get_run_summary(&records).unwrap();
    assert_eq!(summary.start_temperature_c, 20.0);
    assert_eq!(summary.final_temperature_c, manifest.final_temperature_c);
    assert!(summary.record_count as u64 > manifest.steps);

    let ice = manifest.ice.expect("ice recorded in manifest");
    assert_eq!(ice.phase, "depleted");

    let events = load_run_events(&path, &response.run_id).unwrap();
    assert_eq!(events.first().unwrap().time_s, 60.0);
    assert_eq!(events.first().unwrap().kind, "ice_added");
    assert_eq!(events.last().unwrap().kind, "ice_depleted");
    assert_eq!(query::filter_events(&events, Some("melting_started")).len(), 1);
}

#[test]
fn overrides_produce_a_distinct_run() {
    let path = common::scenario_copy("kettle_litre.yaml", "persist_overrides");
    let base = ensure_run(&RunRequest {
        scenario_path: &path,
        overrides: ScenarioOverrides::default(),
        options: RunOptions::default(),
    })
    .unwrap();
    let hotter = ensure_run(&RunRequest {
        scenario_path: &path,
        overrides: ScenarioOverrides {
            target_temp_c: Some(80.0),
            ..ScenarioOverrides::default()
        },
        options: RunOptions::default(),
    })
    .unwrap();

    assert_ne!(base.run_id, hotter.run_id);
    assert!(hotter.manifest.elapsed_s > base.manifest.elapsed_s);
    assert_eq!(list_runs(&path, None).unwrap().len(), 2);
}

#[test]
fn csv_export_round_trip() {
    let path = common::scenario_copy("kettle_litre.yaml", "persist_csv");
    let response = ensure_run(&RunRequest {
        scenario_path: &path,
        overrides: ScenarioOverrides::default(),
        options: RunOptions::default(),
    })
    .unwrap();
    let (_, records) = load_run(&path, &response.run_id).unwrap();

    let csv_path = path.with_extension("csv");
    query::write_series_csv(&csv_path, &records).unwrap();
    let content = std::fs::read_to_string(&csv_path).unwrap();
    assert_eq!(content.lines().count(), records.len() + 1);
    assert!(content.starts_with("time_s,temperature_c\n0,20\n"));
}

#[test]
fn unknown_run_is_reported() {
    let path = common::scenario_copy("kettle_litre.yaml", "persist_missing");
    assert!(matches!(
        load_run(&path, "does-not-exist"),
        Err(tp_app::AppError::RunNotFound(_))
    ));
}
