//! Simulation driver.

use std::collections::VecDeque;

use tp_core::{ensure_finite, ensure_positive};
use tp_vessel::{Container, PowerSource};
use tracing::{debug, info, warn};

use crate::config::{EquilibriumCheck, IceConfig, SimConfig, StopCriteria};
use crate::error::{SimError, SimResult, StopReason};
use crate::events::EventLog;
use crate::heat::step_heat;
use crate::ice::{IcePhase, IceState};
use crate::interpolate::{SamplePoint, intermediate_points};

/// Snapshot handed to progress callbacks after each step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SimProgress {
    pub elapsed_s: f64,
    pub temperature_c: f64,
    pub step: u64,
    pub ice_phase: IcePhase,
}

/// Final state of the ice model at the end of a run.
#[derive(Clone, Debug, PartialEq)]
pub struct IceSummary {
    pub phase: IcePhase,
    pub initial_mass_kg: f64,
    pub remaining_kg: f64,
    pub added_volume_m3: f64,
    pub triggered_at_s: Option<f64>,
}

impl IceSummary {
    fn from_state(state: &IceState) -> Self {
        Self {
            phase: state.phase(),
            initial_mass_kg: state.initial_mass_kg(),
            remaining_kg: state.remaining_kg(),
            added_volume_m3: state.added_volume_m3(),
            triggered_at_s: state.triggered_at_s(),
        }
    }
}

/// Everything a run produced.
#[derive(Clone, Debug, PartialEq)]
pub struct SimRecord {
    /// (elapsed time, temperature) samples, starting with the initial state
    pub series: Vec<SamplePoint>,
    pub events: EventLog,
    pub final_temperature_c: f64,
    pub elapsed_s: f64,
    pub steps: u64,
    /// `None` when ice addition was not enabled
    pub ice: Option<IceSummary>,
}

/// Heating simulation for one container and power source.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Simulation {
    config: SimConfig,
}

impl Simulation {
    pub fn new(config: SimConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn configure_simulation(
        &mut self,
        target_temp_c: f64,
        ambient_temp_c: f64,
        time_step_s: f64,
        include_heat_loss: bool,
        correction_factor: f64,
    ) -> &mut Self {
        self.config.target_temp_c = target_temp_c;
        self.config.ambient_temp_c = ambient_temp_c;
        self.config.time_step_s = time_step_s;
        self.config.include_heat_loss = include_heat_loss;
        self.config.correction_factor = correction_factor;
        self
    }

    pub fn configure_ice(
        &mut self,
        enabled: bool,
        trigger_time_s: f64,
        mass_kg: f64,
        initial_temp_c: f64,
    ) -> &mut Self {
        self.config.ice = IceConfig {
            enabled,
            trigger_time_s,
            mass_kg,
            initial_temp_c,
        };
        self
    }

    pub fn configure_stop(&mut self, stop: StopCriteria) -> &mut Self {
        self.config.stop = stop;
        self
    }

    pub fn run(
        &self,
        container: &mut Container,
        source: &dyn PowerSource,
    ) -> SimResult<SimRecord> {
        self.run_with_progress(container, source, None)
    }

    /// Step the container until it reaches the target temperature.
    ///
    /// Fails with [`SimError::NonConvergence`] when a stop criterion fires
    /// first. The container is left in its state at the moment of failure.
    pub fn run_with_progress(
        &self,
        container: &mut Container,
        source: &dyn PowerSource,
        mut progress: Option<&mut dyn FnMut(SimProgress)>,
    ) -> SimResult<SimRecord> {
        let cfg = &self.config;
        cfg.validate()?;
        check_container(container)?;

        let dt = cfg.time_step_s;
        let mut ice = IceState::new(&cfg.ice, &cfg.ice_constants);
        let mut events = EventLog::new();
        let mut plateau = cfg.stop.equilibrium.as_ref().map(PlateauDetector::new);

        let mut temp = container.temperature_c;
        let mut series = vec![SamplePoint {
            time_s: 0.0,
            temperature_c: temp,
        }];
        let mut step: u64 = 0;

        info!(
            start_c = temp,
            target_c = cfg.target_temp_c,
            power_w = tp_core::units::watts(source.power()),
            heat_loss = cfg.include_heat_loss,
            ice = ice.is_armed(),
            "simulation started"
        );

        while temp < cfg.target_temp_c {
            let start_s = step as f64 * dt;
            if start_s >= cfg.stop.max_elapsed_s {
                return Err(non_convergence(
                    start_s,
                    temp,
                    StopReason::TimeLimit {
                        max_elapsed_s: cfg.stop.max_elapsed_s,
                    },
                ));
            }

            ice.try_trigger(start_s, temp, cfg.target_temp_c, container, &mut events);

            step += 1;
            let elapsed_s = step as f64 * dt;
            let heat = step_heat(source, container, temp, cfg)?;
            let outcome = ice.advance(elapsed_s, dt, temp + heat.net_c(), container, &mut events);
            let next = outcome.temperature_c;
            if !next.is_finite() {
                return Err(SimError::NonPhysical {
                    what: "fluid temperature is not finite",
                });
            }

            container.set_temperature(next);
            if outcome.applied {
                series.extend(intermediate_points(start_s, elapsed_s, temp, next));
            }
            series.push(SamplePoint {
                time_s: elapsed_s,
                temperature_c: next,
            });
            temp = next;

            if let Some(cb) = progress.as_deref_mut() {
                cb(SimProgress {
                    elapsed_s,
                    temperature_c: temp,
                    step,
                    ice_phase: ice.phase(),
                });
            }

            if let Some(detector) = plateau.as_mut()
                && let Some(spread_c) = detector.observe(elapsed_s, temp)
            {
                return Err(non_convergence(
                    elapsed_s,
                    temp,
                    StopReason::Equilibrium { spread_c },
                ));
            }
        }

        let elapsed_s = step as f64 * dt;
        info!(
            elapsed_s,
            final_c = temp,
            steps = step,
            events = events.len(),
            "target temperature reached"
        );

        Ok(SimRecord {
            series,
            events,
            final_temperature_c: temp,
            elapsed_s,
            steps: step,
            ice: cfg.ice.enabled.then(|| IceSummary::from_state(&ice)),
        })
    }
}

fn check_container(container: &Container) -> SimResult<()> {
    ensure_positive(container.fluid_volume_m3, "fluid volume")?;
    ensure_positive(container.fluid.density_kg_m3, "fluid density")?;
    ensure_positive(container.fluid.specific_heat_j_per_kg_c, "fluid specific heat")?;
    ensure_finite(container.temperature_c, "fluid temperature")?;
    Ok(())
}

fn non_convergence(elapsed_s: f64, temperature_c: f64, reason: StopReason) -> SimError {
    warn!(elapsed_s, temperature_c, %reason, "simulation stopped before target");
    SimError::NonConvergence {
        elapsed_s,
        temperature_c,
        reason,
    }
}

/// Samples the temperature on a fixed interval and reports the spread once
/// the window is full and flat.
struct PlateauDetector {
    interval_s: f64,
    tolerance_c: f64,
    capacity: usize,
    next_sample_s: f64,
    window: VecDeque<f64>,
}

impl PlateauDetector {
    fn new(check: &EquilibriumCheck) -> Self {
        Self {
            interval_s: check.interval_s,
            tolerance_c: check.tolerance_c,
            capacity: check.samples,
            next_sample_s: check.interval_s,
            window: VecDeque::with_capacity(check.samples),
        }
    }

    fn observe(&mut self, elapsed_s: f64, temperature_c: f64) -> Option<f64> {
        if elapsed_s < self.next_sample_s {
            return None;
        }
        self.next_sample_s += self.interval_s;
        if self.window.len() == self.capacity {
            self.window.pop_front();
        }
        self.window.push_back(temperature_c);
        if self.window.len() < self.capacity {
            return None;
        }

        let (lo, hi) = self
            .window
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &t| {
                (lo.min(t), hi.max(t))
            });
        let spread = hi - lo;
        debug!(elapsed_s, spread, "equilibrium check");
        (spread < self.tolerance_c).then_some(spread)
    }
}
