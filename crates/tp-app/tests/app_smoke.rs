mod common;

use tp_app::{
    ScenarioOverrides, SweepParameter, apply_overrides, build_simulation, load_scenario, query,
    run_parameter_sweep, save_scenario, simulate_scenario, summarize_scenario, validate_scenario,
};
use tp_sim::{IcePhase, SweepDefinition};

#[test]
fn steel_pot_summary() {
    let path = common::scenario_copy("steel_pot.yaml", "summary");
    let scenario = load_scenario(&path).unwrap();
    validate_scenario(&scenario).unwrap();

    let summary = summarize_scenario(&scenario).unwrap();
    assert_eq!(summary.fluid, "Water");
    assert!((summary.heater_power_w - 1100.0).abs() < 1e-9);
    assert!(summary.loss_coefficient_w_per_k > 0.0);
    assert!(summary.fluid_volume_m3 > 0.00125 && summary.fluid_volume_m3 < 0.00135);
    assert_eq!(summary.ice_mass_kg, None);
    let diffusivity = summary.wall_diffusivity_m2_s.unwrap();
    assert!((diffusivity - 16.2 / (7900.0 * 502.0)).abs() < 1e-15);
}

#[test]
fn engine_sees_ice_only_when_scenario_has_ice_block() {
    let plain = load_scenario(&common::scenario_copy("steel_pot.yaml", "ice_off")).unwrap();
    assert!(!build_simulation(&plain).config().ice.enabled);

    let iced = load_scenario(&common::scenario_copy("steel_pot_ice.yaml", "ice_on")).unwrap();
    let sim = build_simulation(&iced);
    let ice = &sim.config().ice;
    assert!(ice.enabled);
    assert_eq!(ice.trigger_time_s, 60.0);
}

#[test]
fn scenario_converts_between_yaml_and_json() {
    let path = common::scenario_copy("legacy_v1.yaml", "convert");
    let scenario = load_scenario(&path).unwrap();

    let json = path.with_extension("json");
    save_scenario(&json, &scenario).unwrap();
    let text = std::fs::read_to_string(&json).unwrap();
    assert!(text.trim_start().starts_with('{'));
    assert_eq!(load_scenario(&json).unwrap(), scenario);

    let yaml = path.with_file_name("converted.yaml");
    save_scenario(&yaml, &scenario).unwrap();
    let reloaded = load_scenario(&yaml).unwrap();
    assert_eq!(reloaded, scenario);
    assert_eq!(reloaded.version, tp_project::LATEST_VERSION);
}

#[test]
fn lossless_litre_matches_hand_calculation() {
    let path = common::scenario_copy("kettle_litre.yaml", "lossless");
    let scenario = load_scenario(&path).unwrap();
    let record = simulate_scenario(&scenario, None).unwrap();
    let expected = 40.0 * 4186.0 / 1000.0;
    assert!((record.elapsed_s - expected).abs() <= 1.0);
}

#[test]
fn ice_scenario_melts_completely() {
    let path = common::scenario_copy("steel_pot_ice.yaml", "ice");
    let scenario = load_scenario(&path).unwrap();
    let record = simulate_scenario(&scenario, None).unwrap();

    let ice = record.ice.unwrap();
    assert_eq!(ice.phase, IcePhase::Depleted);
    assert_eq!(ice.triggered_at_s, Some(60.0));
    assert!((ice.added_volume_m3 - 0.1 / 920.0).abs() < 1e-12);
    assert!(record.final_temperature_c >= 60.0);
}

#[test]
fn overrides_change_the_run() {
    let path = common::scenario_copy("kettle_litre.yaml", "overrides");
    let mut scenario = load_scenario(&path).unwrap();
    apply_overrides(
        &mut scenario,
        &ScenarioOverrides {
            target_temp_c: Some(40.0),
            time_step_s: Some(0.5),
            ..ScenarioOverrides::default()
        },
    );
    let record = simulate_scenario(&scenario, None).unwrap();
    let expected = 20.0 * 4186.0 / 1000.0;
    assert!((record.elapsed_s - expected).abs() <= 0.5);

    let records: Vec<tp_results::TimeseriesRecord> = record
        .series
        .iter()
        .map(|p| tp_results::TimeseriesRecord {
            time_s: p.time_s,
            temperature_c: p.temperature_c,
        })
        .collect();
    let t30 = query::time_to_reach(&records, 30.0).unwrap();
    assert!((t30 - 10.0 * 4186.0 / 1000.0).abs() <= 0.5);
}

#[test]
fn power_sweep_is_ordered_and_complete() {
    let path = common::scenario_copy("kettle_litre.yaml", "sweep");
    let scenario = load_scenario(&path).unwrap();
    let def = SweepDefinition::linear(500.0, 2000.0, 4).unwrap();

    let report = run_parameter_sweep(&scenario, SweepParameter::HeaterPower, &def).unwrap();
    assert_eq!(report.stats.successes, 4);
    assert_eq!(report.stats.failures, 0);
    let values: Vec<f64> = report.outcomes.iter().map(|o| o.value).collect();
    assert_eq!(values, vec![500.0, 1000.0, 1500.0, 2000.0]);
    assert!(report.stats.min_time_s.unwrap() < report.stats.max_time_s.unwrap());
}

#[test]
fn ice_mass_sweep_reports_added_volume() {
    let path = common::scenario_copy("kettle_litre.yaml", "ice_sweep");
    let scenario = load_scenario(&path).unwrap();
    let def = SweepDefinition::linear(0.0, 0.2, 3).unwrap();

    let report = run_parameter_sweep(&scenario, SweepParameter::IceMass, &def).unwrap();
    let volumes: Vec<f64> = report
        .outcomes
        .iter()
        .map(|o| o.result.as_ref().unwrap().added_volume_m3)
        .collect();
    assert_eq!(volumes[0], 0.0);
    assert!((volumes[2] - 0.2 / 920.0).abs() < 1e-12);
}

#[test]
fn bad_sweep_points_are_reported_not_fatal() {
    let path = common::scenario_copy("steel_pot.yaml", "bad_sweep");
    let scenario = load_scenario(&path).unwrap();
    let def = SweepDefinition::linear(-0.001, 0.003, 3).unwrap();

    let report = run_parameter_sweep(&scenario, SweepParameter::WallThickness, &def).unwrap();
    assert_eq!(report.stats.failures, 1);
    assert!(report.outcomes[0].result.is_err());
    assert_eq!(report.stats.successes, 2);
}

#[test]
fn sweep_parameter_names_parse() {
    assert_eq!(
        "wall_thickness".parse::<SweepParameter>().unwrap(),
        SweepParameter::WallThickness
    );
    assert_eq!("Ice-Mass".parse::<SweepParameter>().unwrap(), SweepParameter::IceMass);
    assert!("voltage".parse::<SweepParameter>().is_err());
}
