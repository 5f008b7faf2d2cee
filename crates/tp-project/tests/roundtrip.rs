use tp_project::schema::*;
use tp_project::{load_json, load_yaml, save_json, save_yaml, validate_scenario};

fn ice_scenario() -> Scenario {
    Scenario {
        version: 2,
        name: "Roundtrip".to_string(),
        description: Some("copper pan with ice".to_string()),
        vessel: VesselDef {
            shape: ShapeDef::Cylinder {
                radius_m: 0.1,
                height_m: 0.08,
            },
            material: MaterialDef::Catalog {
                name: "copper".to_string(),
            },
            wall_thickness_m: 0.0015,
            fluid: FluidDef::Custom {
                name: "Brine".to_string(),
                density_kg_m3: 1025.0,
                specific_heat_j_per_kg_c: 3990.0,
            },
            fluid_volume_m3: Some(0.0015),
            initial_temp_c: 15.0,
        },
        heater: HeaterDef {
            power_w: Some(1500.0),
            loss_coefficient_w_per_k: Some(4.0),
            ..HeaterDef::default()
        },
        simulation: SimulationDef {
            time_step_s: 0.5,
            ..SimulationDef::default()
        },
        ice: Some(IceDef {
            trigger_time_s: 120.0,
            ..IceDef::default()
        }),
        stop: Some(StopDef::default()),
    }
}

#[test]
fn roundtrip_yaml() {
    let scenario = ice_scenario();
    validate_scenario(&scenario).unwrap();

    let path = std::env::temp_dir().join("tp_project_roundtrip.yaml");
    save_yaml(&path, &scenario).unwrap();
    let loaded = load_yaml(&path).unwrap();
    assert_eq!(scenario, loaded);
}

#[test]
fn roundtrip_json() {
    let scenario = ice_scenario();
    let path = std::env::temp_dir().join("tp_project_roundtrip.json");
    save_json(&path, &scenario).unwrap();
    let loaded = load_json(&path).unwrap();
    assert_eq!(scenario, loaded);
}

#[test]
fn invalid_scenario_is_not_saved() {
    let mut scenario = ice_scenario();
    scenario.vessel.wall_thickness_m = 0.0;
    let path = std::env::temp_dir().join("tp_project_invalid.yaml");
    let _ = std::fs::remove_file(&path);
    assert!(save_yaml(&path, &scenario).is_err());
    assert!(!path.exists());
}
