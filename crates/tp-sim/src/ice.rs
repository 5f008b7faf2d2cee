//! Ice addition model.
//!
//! Ice dropped into the fluid first warms to its melting point, then melts at
//! constant temperature. Each stage draws heat from the fluid:
//!
//! - warming: `E = k_warm * (T_fluid - T_ice) * dt`, bounded per step by
//!   `m_ice * c_ice * max_warming_per_step_c` and by what the ice needs to
//!   reach the melting point
//! - melting: `E = k_melt * (T_fluid - T_melt) * dt`, bounded by the latent
//!   heat of what is left and by the melt-rate limit
//!
//! Melted ice becomes fluid volume at `mass / ice_density`.

use tp_vessel::Container;
use tracing::{debug, info, warn};

use crate::config::{IceConfig, IceConstants};
use crate::events::{EventLog, SimEventKind};

/// Ice temperature within this of the melting point counts as melting (°C).
const MELTING_POINT_TOLERANCE_C: f64 = 0.01;
/// Remaining ice below this is considered gone (kg).
const DEPLETION_TOLERANCE_KG: f64 = 1e-6;
/// Melt percentages announced in the event log.
const MELT_MILESTONES: [u8; 3] = [25, 50, 75];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IcePhase {
    /// No ice in the fluid (not configured, or not yet added).
    Inactive,
    /// Solid ice below the melting point absorbing sensible heat.
    Warming,
    /// Ice at the melting point absorbing latent heat.
    Melting,
    /// All ice has melted.
    Depleted,
}

impl IcePhase {
    pub fn label(&self) -> &'static str {
        match self {
            IcePhase::Inactive => "inactive",
            IcePhase::Warming => "warming",
            IcePhase::Melting => "melting",
            IcePhase::Depleted => "depleted",
        }
    }
}

/// Result of one ice step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IceStepOutcome {
    /// Fluid temperature after the ice took its share (°C)
    pub temperature_c: f64,
    /// Heat moved from fluid to ice this step (J)
    pub energy_j: f64,
    /// Ice melted this step (kg)
    pub melted_kg: f64,
    /// Whether ice was present and interacting this step
    pub applied: bool,
}

impl IceStepOutcome {
    fn untouched(temperature_c: f64) -> Self {
        Self {
            temperature_c,
            energy_j: 0.0,
            melted_kg: 0.0,
            applied: false,
        }
    }
}

/// Ice bookkeeping for one run.
#[derive(Clone, Debug, PartialEq)]
pub struct IceState {
    constants: IceConstants,
    phase: IcePhase,
    /// Configured with a positive mass and still waiting for its trigger
    armed: bool,
    trigger_time_s: f64,
    initial_mass_kg: f64,
    remaining_kg: f64,
    temperature_c: f64,
    added_volume_m3: f64,
    fluid_volume_at_addition_m3: f64,
    triggered_at_s: Option<f64>,
    milestones_logged: usize,
}

impl IceState {
    pub fn new(config: &IceConfig, constants: &IceConstants) -> Self {
        let armed = config.enabled && config.mass_kg > 0.0;
        if config.enabled && !armed {
            warn!(
                mass_kg = config.mass_kg,
                "ice addition enabled with non-positive mass; ignoring"
            );
        }
        Self {
            constants: constants.clone(),
            phase: IcePhase::Inactive,
            armed,
            trigger_time_s: config.trigger_time_s,
            initial_mass_kg: if armed { config.mass_kg } else { 0.0 },
            remaining_kg: 0.0,
            temperature_c: config.initial_temp_c,
            added_volume_m3: 0.0,
            fluid_volume_at_addition_m3: 0.0,
            triggered_at_s: None,
            milestones_logged: 0,
        }
    }

    pub fn phase(&self) -> IcePhase {
        self.phase
    }

    pub fn initial_mass_kg(&self) -> f64 {
        self.initial_mass_kg
    }

    pub fn remaining_kg(&self) -> f64 {
        self.remaining_kg
    }

    pub fn temperature_c(&self) -> f64 {
        self.temperature_c
    }

    pub fn added_volume_m3(&self) -> f64 {
        self.added_volume_m3
    }

    /// Fluid volume the ice adds once fully melted.
    pub fn expected_volume_m3(&self) -> f64 {
        self.initial_mass_kg / self.constants.density_kg_m3
    }

    pub fn triggered_at_s(&self) -> Option<f64> {
        self.triggered_at_s
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// Drop the ice in if its time has come.
    ///
    /// Nothing happens once the fluid is already at or above `target_c`.
    /// Adding ice does not change the fluid temperature by itself; the heat
    /// exchange starts with the next call to [`IceState::advance`].
    pub fn try_trigger(
        &mut self,
        time_s: f64,
        fluid_temp_c: f64,
        target_c: f64,
        container: &Container,
        events: &mut EventLog,
    ) -> bool {
        if !self.armed || time_s < self.trigger_time_s {
            return false;
        }
        if fluid_temp_c >= target_c {
            debug!(time_s, fluid_temp_c, "target already reached; ice addition suppressed");
            return false;
        }

        let melting_point = self.constants.melting_point_c;
        let added_temp_c = self.temperature_c;
        self.armed = false;
        self.triggered_at_s = Some(time_s);
        self.remaining_kg = self.initial_mass_kg;
        self.fluid_volume_at_addition_m3 = container.fluid_volume_m3;
        self.phase = if self.temperature_c < melting_point {
            IcePhase::Warming
        } else {
            self.temperature_c = melting_point;
            IcePhase::Melting
        };

        let ice_volume_cm3 = self.expected_volume_m3() * 1e6;
        info!(
            time_s,
            mass_kg = self.initial_mass_kg,
            ice_temp_c = added_temp_c,
            fluid_temp_c,
            ice_volume_cm3,
            "ice added"
        );
        events.record(
            time_s,
            SimEventKind::IceAdded {
                mass_kg: self.initial_mass_kg,
                ice_temp_c: added_temp_c,
                fluid_temp_c,
                phase: self.phase,
            },
            format!(
                "Added {:.0} g of ice at {:.1} °C to fluid at {:.2} °C ({:.1} cm³ once melted)",
                self.initial_mass_kg * 1000.0,
                added_temp_c,
                fluid_temp_c,
                ice_volume_cm3
            ),
        );
        true
    }

    /// Exchange heat between fluid and ice over one step ending at
    /// `elapsed_s`. Melted ice is added to the container's fluid volume.
    pub fn advance(
        &mut self,
        elapsed_s: f64,
        dt_s: f64,
        fluid_temp_c: f64,
        container: &mut Container,
        events: &mut EventLog,
    ) -> IceStepOutcome {
        match self.phase {
            IcePhase::Inactive | IcePhase::Depleted => IceStepOutcome::untouched(fluid_temp_c),
            IcePhase::Warming => self.warm(elapsed_s, dt_s, fluid_temp_c, container, events),
            IcePhase::Melting => self.melt(elapsed_s, dt_s, fluid_temp_c, container, events),
        }
    }

    fn warm(
        &mut self,
        elapsed_s: f64,
        dt_s: f64,
        fluid_temp_c: f64,
        container: &Container,
        events: &mut EventLog,
    ) -> IceStepOutcome {
        let k = &self.constants;
        let fluid_capacity = container.heat_capacity_j_per_c();
        let ice_capacity = self.remaining_kg * k.specific_heat_j_per_kg_c;

        let available = k.warming_factor_w_per_c * (fluid_temp_c - self.temperature_c).max(0.0) * dt_s;
        let step_limit = ice_capacity * k.max_warming_per_step_c;
        let needed = ice_capacity * (k.melting_point_c - self.temperature_c).max(0.0);
        let energy = available.min(step_limit).min(needed);

        self.temperature_c = (self.temperature_c + energy / ice_capacity).min(k.melting_point_c);
        let temperature_c = (fluid_temp_c - energy / fluid_capacity).max(self.temperature_c);

        debug!(
            elapsed_s,
            energy_j = energy,
            ice_temp_c = self.temperature_c,
            fluid_temp_c = temperature_c,
            "ice warming"
        );

        if k.melting_point_c - self.temperature_c < MELTING_POINT_TOLERANCE_C {
            self.temperature_c = k.melting_point_c;
            self.phase = IcePhase::Melting;
            info!(elapsed_s, fluid_temp_c = temperature_c, "ice reached melting point");
            events.record(
                elapsed_s,
                SimEventKind::MeltingStarted {
                    fluid_temp_c: temperature_c,
                },
                format!(
                    "Ice reached its melting point ({:.1} °C), fluid at {:.2} °C",
                    k.melting_point_c, temperature_c
                ),
            );
        }

        IceStepOutcome {
            temperature_c,
            energy_j: energy,
            melted_kg: 0.0,
            applied: true,
        }
    }

    fn melt(
        &mut self,
        elapsed_s: f64,
        dt_s: f64,
        fluid_temp_c: f64,
        container: &mut Container,
        events: &mut EventLog,
    ) -> IceStepOutcome {
        let k = &self.constants;
        let fluid_capacity = container.heat_capacity_j_per_c();

        let available = k.melting_factor_w_per_c * (fluid_temp_c - k.melting_point_c).max(0.0) * dt_s;
        let all_remaining = self.remaining_kg * k.latent_heat_j_per_kg;
        let rate_limit =
            self.initial_mass_kg * k.max_melt_fraction_per_s * dt_s * k.latent_heat_j_per_kg;
        let energy = available.min(all_remaining).min(rate_limit);

        let melted_kg = (energy / k.latent_heat_j_per_kg).min(self.remaining_kg);
        self.remaining_kg -= melted_kg;

        let volume_m3 = melted_kg / k.density_kg_m3;
        container.add_fluid_volume(volume_m3);
        self.added_volume_m3 += volume_m3;

        let floor_c = k.melting_point_c.min(fluid_temp_c);
        let temperature_c = (fluid_temp_c - energy / fluid_capacity).max(floor_c);

        debug!(
            elapsed_s,
            energy_j = energy,
            melted_kg,
            remaining_kg = self.remaining_kg,
            fluid_temp_c = temperature_c,
            "ice melting"
        );

        self.log_milestones(elapsed_s, events);

        if self.remaining_kg <= DEPLETION_TOLERANCE_KG {
            self.deplete(elapsed_s, temperature_c, container, events);
        }

        IceStepOutcome {
            temperature_c,
            energy_j: energy,
            melted_kg,
            applied: true,
        }
    }

    fn melted_percent(&self) -> f64 {
        100.0 * (1.0 - self.remaining_kg / self.initial_mass_kg)
    }

    fn log_milestones(&mut self, elapsed_s: f64, events: &mut EventLog) {
        let percent = self.melted_percent();
        while let Some(&milestone) = MELT_MILESTONES.get(self.milestones_logged) {
            if percent < f64::from(milestone) {
                break;
            }
            self.milestones_logged += 1;
            events.record(
                elapsed_s,
                SimEventKind::MeltProgress {
                    percent: milestone,
                    remaining_kg: self.remaining_kg,
                },
                format!(
                    "Ice {}% melted, {:.1} g remaining",
                    milestone,
                    self.remaining_kg * 1000.0
                ),
            );
        }
    }

    fn deplete(
        &mut self,
        elapsed_s: f64,
        fluid_temp_c: f64,
        container: &mut Container,
        events: &mut EventLog,
    ) {
        // Credit the sliver below tolerance so the total volume matches the
        // initial ice mass exactly.
        let leftover_m3 = self.remaining_kg / self.constants.density_kg_m3;
        container.add_fluid_volume(leftover_m3);
        self.added_volume_m3 += leftover_m3;
        self.remaining_kg = 0.0;
        self.phase = IcePhase::Depleted;

        let percent_of_volume = if self.fluid_volume_at_addition_m3 > 0.0 {
            100.0 * self.added_volume_m3 / self.fluid_volume_at_addition_m3
        } else {
            0.0
        };
        let added_cm3 = self.added_volume_m3 * 1e6;
        info!(
            elapsed_s,
            added_cm3,
            percent_of_volume,
            fluid_temp_c,
            "all ice melted"
        );
        events.record(
            elapsed_s,
            SimEventKind::IceDepleted {
                added_volume_m3: self.added_volume_m3,
                percent_of_volume,
                fluid_temp_c,
            },
            format!(
                "All ice melted at {:.2} °C: volume {:.1} cm³ -> {:.1} cm³ (+{:.1} cm³, +{:.1}%)",
                fluid_temp_c,
                self.fluid_volume_at_addition_m3 * 1e6,
                container.fluid_volume_m3 * 1e6,
                added_cm3,
                percent_of_volume
            ),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use tp_vessel::Fluid;

    fn litre_of_water(temp_c: f64) -> Container {
        Container::new(Fluid::water(), 0.001, temp_c).unwrap()
    }

    fn ice(mass_kg: f64, temp_c: f64, trigger_time_s: f64) -> IceState {
        IceState::new(
            &IceConfig {
                enabled: true,
                trigger_time_s,
                mass_kg,
                initial_temp_c: temp_c,
            },
            &IceConstants::default(),
        )
    }

    #[test]
    fn waits_for_trigger_time() {
        let c = litre_of_water(20.0);
        let mut events = EventLog::new();
        let mut state = ice(0.1, -10.0, 50.0);
        assert!(!state.try_trigger(49.0, 20.0, 60.0, &c, &mut events));
        assert_eq!(state.phase(), IcePhase::Inactive);
        assert!(state.try_trigger(50.0, 20.0, 60.0, &c, &mut events));
        assert_eq!(state.phase(), IcePhase::Warming);
        assert_eq!(state.remaining_kg(), 0.1);
        assert_eq!(events.len(), 1);
        // fires once
        assert!(!state.try_trigger(51.0, 20.0, 60.0, &c, &mut events));
    }

    #[test]
    fn suppressed_once_target_reached() {
        let mut c = litre_of_water(61.0);
        let mut events = EventLog::new();
        let mut state = ice(0.1, -10.0, 0.0);
        assert!(!state.try_trigger(10.0, 61.0, 60.0, &c, &mut events));
        assert_eq!(state.phase(), IcePhase::Inactive);
        let out = state.advance(11.0, 1.0, 61.0, &mut c, &mut events);
        assert_eq!(out.temperature_c, 61.0);
        assert!(!out.applied);
        assert!(events.is_empty());
    }

    #[test]
    fn zero_mass_never_triggers() {
        let c = litre_of_water(20.0);
        let mut events = EventLog::new();
        let mut state = ice(0.0, -10.0, 0.0);
        assert!(!state.is_armed());
        assert!(!state.try_trigger(0.0, 20.0, 60.0, &c, &mut events));
        assert!(events.is_empty());
    }

    #[test]
    fn ice_at_melting_point_skips_warming() {
        let c = litre_of_water(20.0);
        let mut events = EventLog::new();
        let mut state = ice(0.05, 0.0, 0.0);
        state.try_trigger(0.0, 20.0, 60.0, &c, &mut events);
        assert_eq!(state.phase(), IcePhase::Melting);
        assert_eq!(events.phase_sequence(), vec![IcePhase::Melting]);
    }

    #[test]
    fn added_event_reports_configured_ice_temperature() {
        let c = litre_of_water(20.0);
        let mut events = EventLog::new();
        let mut state = ice(0.05, 2.5, 0.0);
        state.try_trigger(0.0, 20.0, 60.0, &c, &mut events);

        assert_eq!(state.phase(), IcePhase::Melting);
        assert_eq!(state.temperature_c(), 0.0);
        let added = events.get(0.0).unwrap();
        assert!(matches!(
            added.kind,
            SimEventKind::IceAdded { ice_temp_c, .. } if ice_temp_c == 2.5
        ));
        assert!(added.message.contains("at 2.5 °C"), "{}", added.message);
    }

    #[test]
    fn warming_step_conserves_energy() {
        let mut c = litre_of_water(20.0);
        let mut events = EventLog::new();
        let mut state = ice(0.1, -10.0, 0.0);
        state.try_trigger(0.0, 20.0, 60.0, &c, &mut events);

        let fluid_capacity = c.heat_capacity_j_per_c();
        let ice_capacity = 0.1 * IceConstants::default().specific_heat_j_per_kg_c;
        let ice_before = state.temperature_c();

        let out = state.advance(1.0, 1.0, 20.0, &mut c, &mut events);
        let fluid_loss = (20.0 - out.temperature_c) * fluid_capacity;
        let ice_gain = (state.temperature_c() - ice_before) * ice_capacity;

        assert!(out.energy_j > 0.0);
        assert!((fluid_loss - out.energy_j).abs() < 1e-9);
        assert!((ice_gain - out.energy_j).abs() < 1e-9);
        // capped at 1 °C per step
        assert!((state.temperature_c() - (ice_before + 1.0)).abs() < 1e-9);
    }

    #[test]
    fn warming_then_melting_then_depleted() {
        let mut c = litre_of_water(40.0);
        let mut events = EventLog::new();
        let mut state = ice(0.02, -3.0, 0.0);
        state.try_trigger(0.0, 40.0, 60.0, &c, &mut events);

        let mut t = 0.0;
        while state.phase() != IcePhase::Depleted {
            t += 1.0;
            // keep the fluid warm as if a heater were running
            state.advance(t, 1.0, 40.0, &mut c, &mut events);
            assert!(t < 10_000.0, "ice never depleted");
        }

        assert_eq!(
            events.phase_sequence(),
            vec![IcePhase::Warming, IcePhase::Melting, IcePhase::Depleted]
        );
        assert_eq!(state.remaining_kg(), 0.0);
        let expected = 0.02 / IceConstants::default().density_kg_m3;
        assert!((state.added_volume_m3() - expected).abs() < 1e-12);
        assert!((c.fluid_volume_m3 - (0.001 + expected)).abs() < 1e-12);
    }

    #[test]
    fn melting_never_cools_fluid_below_melting_point() {
        let mut c = litre_of_water(0.2);
        let mut events = EventLog::new();
        let mut state = ice(0.5, 0.0, 0.0);
        state.try_trigger(0.0, 0.2, 60.0, &c, &mut events);
        let mut temp = 0.2;
        for step in 1..50 {
            temp = state
                .advance(step as f64, 1.0, temp, &mut c, &mut events)
                .temperature_c;
            assert!(temp >= 0.0);
        }
    }

    #[test]
    fn milestones_logged_in_order() {
        let mut c = litre_of_water(50.0);
        let mut events = EventLog::new();
        let mut state = ice(0.01, 0.0, 0.0);
        state.try_trigger(0.0, 50.0, 60.0, &c, &mut events);
        let mut t = 0.0;
        while state.phase() == IcePhase::Melting {
            t += 1.0;
            state.advance(t, 1.0, 50.0, &mut c, &mut events);
        }
        let percents: Vec<u8> = events
            .iter()
            .filter_map(|e| match e.kind {
                SimEventKind::MeltProgress { percent, .. } => Some(percent),
                _ => None,
            })
            .collect();
        assert!(percents.windows(2).all(|w| w[0] < w[1]));
        assert!(!percents.is_empty());
    }

    proptest! {
        #[test]
        fn mass_and_volume_invariants(
            temps in prop::collection::vec(0.0_f64..95.0, 1..300),
            mass in 0.001_f64..0.5,
            ice_temp in -30.0_f64..0.0,
        ) {
            let mut c = litre_of_water(temps[0]);
            let mut events = EventLog::new();
            let mut state = ice(mass, ice_temp, 0.0);
            state.try_trigger(0.0, temps[0], 100.0, &c, &mut events);

            let mut last_volume = 0.0;
            for (i, &t) in temps.iter().enumerate() {
                state.advance((i + 1) as f64, 1.0, t, &mut c, &mut events);
                prop_assert!(state.remaining_kg() >= 0.0);
                prop_assert!(state.remaining_kg() <= mass);
                prop_assert!(state.added_volume_m3() >= last_volume);
                last_volume = state.added_volume_m3();
                if state.phase() == IcePhase::Melting {
                    prop_assert_eq!(state.temperature_c(), 0.0);
                }
            }
        }
    }
}
