//! Integration tests for run progress and timing reporting.

mod common;

use tp_app::{
    RunOptions, RunProgressEvent, RunRequest, RunStage, ScenarioOverrides,
    ensure_run_with_progress,
};

fn collect_events(request: &RunRequest<'_>) -> (tp_app::RunResponse, Vec<RunProgressEvent>) {
    let mut events = Vec::new();
    let response = ensure_run_with_progress(request, Some(&mut |event| events.push(event)))
        .expect("run with progress should succeed");
    (response, events)
}

#[test]
fn stages_and_steps_are_reported() {
    let path = common::scenario_copy("steel_pot_ice.yaml", "progress");
    let request = RunRequest {
        scenario_path: &path,
        overrides: ScenarioOverrides::default(),
        options: RunOptions {
            use_cache: false,
            ..RunOptions::default()
        },
    };

    let (response, events) = collect_events(&request);
    assert!(!response.loaded_from_cache);

    let stages: Vec<RunStage> = events
        .iter()
        .filter(|e| e.simulation.is_none())
        .map(|e| e.stage.clone())
        .collect();
    assert_eq!(
        stages,
        vec![
            RunStage::LoadingScenario,
            RunStage::CheckingCache,
            RunStage::BuildingVessel,
            RunStage::Simulating,
            RunStage::SavingResults,
            RunStage::Completed,
        ]
    );

    let steps: Vec<_> = events.iter().filter_map(|e| e.simulation.as_ref()).collect();
    assert_eq!(steps.len() as u64, response.timing.steps);
    assert_eq!(response.manifest.steps, response.timing.steps);
    assert!(steps.iter().any(|s| s.ice_phase == "melting"));
    assert!(
        steps
            .iter()
            .all(|s| (0.0..=1.0).contains(&s.fraction_complete))
    );
    assert_eq!(steps.last().unwrap().fraction_complete, 1.0);
}

#[test]
fn cached_run_skips_simulation() {
    let path = common::scenario_copy("kettle_litre.yaml", "progress_cache");
    let request = RunRequest {
        scenario_path: &path,
        overrides: ScenarioOverrides::default(),
        options: RunOptions::default(),
    };

    let (first, _) = collect_events(&request);
    assert!(!first.loaded_from_cache);

    let (second, events) = collect_events(&request);
    assert!(second.loaded_from_cache);
    assert_eq!(second.run_id, first.run_id);
    assert!(events.iter().any(|e| e.stage == RunStage::LoadingCachedResult));
    assert!(!events.iter().any(|e| e.stage == RunStage::Simulating));
}
