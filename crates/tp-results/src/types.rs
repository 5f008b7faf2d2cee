//! Result data types.

use serde::{Deserialize, Serialize};

pub type RunId = String;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunManifest {
    pub run_id: RunId,
    pub scenario_name: String,
    /// RFC 3339
    pub timestamp: String,
    pub engine_version: String,
    pub time_step_s: f64,
    pub target_temp_c: f64,
    pub steps: u64,
    pub elapsed_s: f64,
    pub final_temperature_c: f64,
    /// Present when the scenario added ice
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ice: Option<IceRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IceRecord {
    pub phase: String,
    pub initial_mass_kg: f64,
    pub remaining_kg: f64,
    pub added_volume_m3: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub triggered_at_s: Option<f64>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct TimeseriesRecord {
    pub time_s: f64,
    pub temperature_c: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EventRecord {
    pub time_s: f64,
    pub kind: String,
    pub message: String,
}
