//! Run execution and caching service.

use std::path::Path;
use std::time::Instant;

use tp_project::Scenario;
use tp_results::{EventRecord, IceRecord, RunManifest, RunStore, TimeseriesRecord};
use tp_sim::{SimProgress, SimRecord};
use tracing::info;

use crate::error::AppResult;
use crate::progress::{RunProgressEvent, RunStage, SimulationProgress};
use crate::project_service::{self, ScenarioOverrides};

/// Version string mixed into run ids; a new engine never reuses old results.
pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Options for running simulations.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub use_cache: bool,
    pub engine_version: String,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            use_cache: true,
            engine_version: ENGINE_VERSION.to_string(),
        }
    }
}

/// Request to execute a run.
pub struct RunRequest<'a> {
    pub scenario_path: &'a Path,
    pub overrides: ScenarioOverrides,
    pub options: RunOptions,
}

/// Wall-clock timing of a run.
#[derive(Debug, Clone, Default)]
pub struct RunTimingSummary {
    pub load_time_s: f64,
    pub simulate_time_s: f64,
    pub save_time_s: f64,
    pub load_cache_time_s: f64,
    pub total_time_s: f64,
    pub steps: u64,
}

/// Response from a run execution.
#[derive(Debug, Clone)]
pub struct RunResponse {
    pub run_id: String,
    pub manifest: RunManifest,
    pub loaded_from_cache: bool,
    pub timing: RunTimingSummary,
}

fn emit_progress(
    progress_cb: &mut Option<&mut dyn FnMut(RunProgressEvent)>,
    stage: RunStage,
    started: Instant,
    message: &str,
) {
    if let Some(cb) = progress_cb.as_deref_mut() {
        cb(RunProgressEvent::stage(
            stage,
            started.elapsed().as_secs_f64(),
            Some(message.to_string()),
        ));
    }
}

/// Execute or load a run based on request.
pub fn ensure_run(request: &RunRequest) -> AppResult<RunResponse> {
    ensure_run_with_progress(request, None)
}

/// Execute or load a run and stream progress events.
pub fn ensure_run_with_progress(
    request: &RunRequest,
    mut progress_cb: Option<&mut dyn FnMut(RunProgressEvent)>,
) -> AppResult<RunResponse> {
    let started = Instant::now();
    let mut timing = RunTimingSummary::default();

    emit_progress(
        &mut progress_cb,
        RunStage::LoadingScenario,
        started,
        "Loading scenario",
    );
    let mut scenario = project_service::load_scenario(request.scenario_path)?;
    if !request.overrides.is_empty() {
        project_service::apply_overrides(&mut scenario, &request.overrides);
        tp_project::validate_scenario(&scenario).map_err(tp_project::ProjectError::from)?;
    }
    timing.load_time_s = started.elapsed().as_secs_f64();

    emit_progress(
        &mut progress_cb,
        RunStage::CheckingCache,
        started,
        "Checking run cache",
    );
    let run_id = tp_results::compute_run_id(&scenario, &request.options.engine_version);
    let store = RunStore::for_scenario(request.scenario_path)?;

    if request.options.use_cache && store.has_run(&run_id) {
        emit_progress(
            &mut progress_cb,
            RunStage::LoadingCachedResult,
            started,
            "Loading cached run",
        );
        let load_started = Instant::now();
        let manifest = store.load_manifest(&run_id)?;
        timing.load_cache_time_s = load_started.elapsed().as_secs_f64();
        timing.steps = manifest.steps;
        timing.total_time_s = started.elapsed().as_secs_f64();

        emit_progress(
            &mut progress_cb,
            RunStage::Completed,
            started,
            "Loaded cached run",
        );
        info!(run_id = %run_id, "run loaded from cache");
        return Ok(RunResponse {
            run_id,
            manifest,
            loaded_from_cache: true,
            timing,
        });
    }

    let sim_started = Instant::now();
    let record = simulate_with_stages(&scenario, &mut progress_cb, started)?;
    timing.simulate_time_s = sim_started.elapsed().as_secs_f64();
    timing.steps = record.steps;

    emit_progress(
        &mut progress_cb,
        RunStage::SavingResults,
        started,
        "Saving results",
    );
    let save_started = Instant::now();
    let manifest = build_manifest(&run_id, &scenario, &record, &request.options.engine_version);
    store.save_run(&manifest, &timeseries(&record), &event_records(&record))?;
    timing.save_time_s = save_started.elapsed().as_secs_f64();
    timing.total_time_s = started.elapsed().as_secs_f64();

    emit_progress(&mut progress_cb, RunStage::Completed, started, "Run completed");
    info!(
        run_id = %run_id,
        steps = record.steps,
        elapsed_s = record.elapsed_s,
        "run saved"
    );

    Ok(RunResponse {
        run_id,
        manifest,
        loaded_from_cache: false,
        timing,
    })
}

/// Build the vessel and run the engine for a scenario, without touching the
/// results store.
pub fn simulate_scenario(
    scenario: &Scenario,
    mut progress_cb: Option<&mut dyn FnMut(RunProgressEvent)>,
) -> AppResult<SimRecord> {
    simulate_with_stages(scenario, &mut progress_cb, Instant::now())
}

fn simulate_with_stages(
    scenario: &Scenario,
    progress_cb: &mut Option<&mut dyn FnMut(RunProgressEvent)>,
    started: Instant,
) -> AppResult<SimRecord> {
    emit_progress(
        progress_cb,
        RunStage::BuildingVessel,
        started,
        "Building vessel and heater",
    );
    let mut container = project_service::build_container(scenario)?;
    let heater = project_service::build_heater(scenario, &container)?;
    let simulation = project_service::build_simulation(scenario);

    emit_progress(progress_cb, RunStage::Simulating, started, "Simulating");
    let start_c = container.temperature_c;
    let target_c = simulation.config().target_temp_c;

    let record = match progress_cb.as_deref_mut() {
        Some(cb) => {
            let mut on_step = |p: SimProgress| {
                cb(RunProgressEvent {
                    stage: RunStage::Simulating,
                    elapsed_wall_s: started.elapsed().as_secs_f64(),
                    message: None,
                    simulation: Some(SimulationProgress {
                        elapsed_s: p.elapsed_s,
                        temperature_c: p.temperature_c,
                        target_temp_c: target_c,
                        fraction_complete: fraction_complete(start_c, target_c, p.temperature_c),
                        step: p.step,
                        ice_phase: p.ice_phase.label().to_string(),
                    }),
                })
            };
            simulation.run_with_progress(&mut container, &heater, Some(&mut on_step))?
        }
        None => simulation.run(&mut container, &heater)?,
    };
    Ok(record)
}

fn fraction_complete(start_c: f64, target_c: f64, temperature_c: f64) -> f64 {
    let span = target_c - start_c;
    if span <= 0.0 {
        return 1.0;
    }
    ((temperature_c - start_c) / span).clamp(0.0, 1.0)
}

fn build_manifest(
    run_id: &str,
    scenario: &Scenario,
    record: &SimRecord,
    engine_version: &str,
) -> RunManifest {
    RunManifest {
        run_id: run_id.to_string(),
        scenario_name: scenario.name.clone(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        engine_version: engine_version.to_string(),
        time_step_s: scenario.simulation.time_step_s,
        target_temp_c: scenario.simulation.target_temp_c,
        steps: record.steps,
        elapsed_s: record.elapsed_s,
        final_temperature_c: record.final_temperature_c,
        ice: record.ice.as_ref().map(|ice| IceRecord {
            phase: ice.phase.label().to_string(),
            initial_mass_kg: ice.initial_mass_kg,
            remaining_kg: ice.remaining_kg,
            added_volume_m3: ice.added_volume_m3,
            triggered_at_s: ice.triggered_at_s,
        }),
    }
}

fn timeseries(record: &SimRecord) -> Vec<TimeseriesRecord> {
    record
        .series
        .iter()
        .map(|p| TimeseriesRecord {
            time_s: p.time_s,
            temperature_c: p.temperature_c,
        })
        .collect()
}

fn event_records(record: &SimRecord) -> Vec<EventRecord> {
    record
        .events
        .iter()
        .map(|e| EventRecord {
            time_s: e.time_s,
            kind: e.kind.label().to_string(),
            message: e.message.clone(),
        })
        .collect()
}

/// Runs stored beside a scenario, newest first.
pub fn list_runs(scenario_path: &Path, scenario_name: Option<&str>) -> AppResult<Vec<RunManifest>> {
    let store = RunStore::for_scenario(scenario_path)?;
    Ok(store.list_runs(scenario_name)?)
}

/// Load a specific run.
pub fn load_run(
    scenario_path: &Path,
    run_id: &str,
) -> AppResult<(RunManifest, Vec<TimeseriesRecord>)> {
    let store = RunStore::for_scenario(scenario_path)?;

    let manifest = store.load_manifest(run_id)?;
    let records = store.load_timeseries(run_id)?;

    Ok((manifest, records))
}

pub fn load_run_events(scenario_path: &Path, run_id: &str) -> AppResult<Vec<EventRecord>> {
    let store = RunStore::for_scenario(scenario_path)?;
    Ok(store.load_events(run_id)?)
}
