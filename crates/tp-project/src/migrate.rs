//! Schema migration framework.

use crate::ProjectError;
use crate::schema::Scenario;

pub const LATEST_VERSION: u32 = 2;

pub fn migrate_to_latest(mut scenario: Scenario) -> Result<Scenario, ProjectError> {
    while scenario.version < LATEST_VERSION {
        scenario = migrate_one_version(scenario)?;
    }
    Ok(scenario)
}

fn migrate_one_version(scenario: Scenario) -> Result<Scenario, ProjectError> {
    match scenario.version {
        1 => migrate_v1_to_v2(scenario),
        v => Err(ProjectError::Migration {
            what: format!("No migration path from version {}", v),
        }),
    }
}

/// Version 2 renamed `ice.add_time_s` to `ice.trigger_time_s`.
fn migrate_v1_to_v2(mut scenario: Scenario) -> Result<Scenario, ProjectError> {
    if let Some(ice) = scenario.ice.as_mut()
        && let Some(t) = ice.add_time_s.take()
    {
        ice.trigger_time_s = t;
    }
    scenario.version = 2;
    Ok(scenario)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::*;

    fn scenario(version: u32, ice: Option<IceDef>) -> Scenario {
        Scenario {
            version,
            name: "pot".to_string(),
            description: None,
            vessel: VesselDef {
                shape: ShapeDef::Cylinder {
                    radius_m: 0.079,
                    height_m: 0.1,
                },
                material: MaterialDef::Catalog {
                    name: "stainless steel".to_string(),
                },
                wall_thickness_m: 0.002,
                fluid: FluidDef::Catalog {
                    name: "water".to_string(),
                },
                fluid_volume_m3: None,
                initial_temp_c: 20.0,
            },
            heater: HeaterDef {
                power_w: Some(1100.0),
                ..HeaterDef::default()
            },
            simulation: SimulationDef::default(),
            ice,
            stop: None,
        }
    }

    #[test]
    fn migrate_latest_is_noop() {
        let s = scenario(LATEST_VERSION, Some(IceDef::default()));
        let migrated = migrate_to_latest(s.clone()).unwrap();
        assert_eq!(migrated, s);
    }

    #[test]
    fn migrate_renames_add_time() {
        let s = scenario(
            1,
            Some(IceDef {
                add_time_s: Some(45.0),
                ..IceDef::default()
            }),
        );
        let migrated = migrate_to_latest(s).unwrap();
        assert_eq!(migrated.version, LATEST_VERSION);
        let ice = migrated.ice.unwrap();
        assert_eq!(ice.trigger_time_s, 45.0);
        assert_eq!(ice.add_time_s, None);
    }

    #[test]
    fn migrate_without_ice() {
        let migrated = migrate_to_latest(scenario(1, None)).unwrap();
        assert_eq!(migrated.version, 2);
        assert!(migrated.ice.is_none());
    }

    #[test]
    fn version_zero_has_no_path() {
        assert!(matches!(
            migrate_to_latest(scenario(0, None)),
            Err(ProjectError::Migration { .. })
        ));
    }
}
