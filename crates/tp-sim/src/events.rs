//! Event log for a single run.

use tp_core::{Tolerances, nearly_equal};

use crate::ice::IcePhase;

/// What happened.
#[derive(Clone, Debug, PartialEq)]
pub enum SimEventKind {
    IceAdded {
        mass_kg: f64,
        ice_temp_c: f64,
        fluid_temp_c: f64,
        /// Phase the ice starts in: warming, or melting when it is already at
        /// the melting point.
        phase: IcePhase,
    },
    MeltingStarted {
        fluid_temp_c: f64,
    },
    MeltProgress {
        percent: u8,
        remaining_kg: f64,
    },
    IceDepleted {
        added_volume_m3: f64,
        /// Added volume relative to the fluid volume when the ice went in
        percent_of_volume: f64,
        fluid_temp_c: f64,
    },
}

impl SimEventKind {
    /// Ice phase this event moves the model into, if any.
    pub fn phase(&self) -> Option<IcePhase> {
        match self {
            SimEventKind::IceAdded { phase, .. } => Some(*phase),
            SimEventKind::MeltingStarted { .. } => Some(IcePhase::Melting),
            SimEventKind::IceDepleted { .. } => Some(IcePhase::Depleted),
            SimEventKind::MeltProgress { .. } => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SimEventKind::IceAdded { .. } => "ice_added",
            SimEventKind::MeltingStarted { .. } => "melting_started",
            SimEventKind::MeltProgress { .. } => "melt_progress",
            SimEventKind::IceDepleted { .. } => "ice_depleted",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SimEvent {
    /// Elapsed simulated time (seconds)
    pub time_s: f64,
    pub kind: SimEventKind,
    pub message: String,
}

/// Time-ordered events of one run. An event recorded at exactly the same
/// elapsed time as the previous one replaces it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EventLog {
    entries: Vec<SimEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, time_s: f64, kind: SimEventKind, message: impl Into<String>) {
        let event = SimEvent {
            time_s,
            kind,
            message: message.into(),
        };
        match self.entries.last_mut() {
            Some(last) if nearly_equal(last.time_s, time_s, Tolerances::default()) => {
                *last = event;
            }
            _ => self.entries.push(event),
        }
    }

    pub fn get(&self, time_s: f64) -> Option<&SimEvent> {
        self.entries
            .iter()
            .find(|e| nearly_equal(e.time_s, time_s, Tolerances::default()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &SimEvent> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sequence of ice phases entered, in log order.
    pub fn phase_sequence(&self) -> Vec<IcePhase> {
        self.entries.iter().filter_map(|e| e.kind.phase()).collect()
    }
}

impl<'a> IntoIterator for &'a EventLog {
    type Item = &'a SimEvent;
    type IntoIter = std::slice::Iter<'a, SimEvent>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn progress(percent: u8) -> SimEventKind {
        SimEventKind::MeltProgress {
            percent,
            remaining_kg: 0.0,
        }
    }

    #[test]
    fn keeps_time_order() {
        let mut log = EventLog::new();
        log.record(1.0, progress(25), "a");
        log.record(2.0, progress(50), "b");
        assert_eq!(log.len(), 2);
        let times: Vec<f64> = log.iter().map(|e| e.time_s).collect();
        assert_eq!(times, vec![1.0, 2.0]);
    }

    #[test]
    fn same_time_overwrites() {
        let mut log = EventLog::new();
        log.record(3.0, progress(50), "half");
        log.record(3.0, progress(75), "three quarters");
        assert_eq!(log.len(), 1);
        assert_eq!(log.get(3.0).unwrap().message, "three quarters");
    }

    #[test]
    fn phase_sequence_skips_progress() {
        let mut log = EventLog::new();
        log.record(
            0.0,
            SimEventKind::IceAdded {
                mass_kg: 0.1,
                ice_temp_c: -10.0,
                fluid_temp_c: 20.0,
                phase: IcePhase::Warming,
            },
            "added",
        );
        log.record(5.0, SimEventKind::MeltingStarted { fluid_temp_c: 19.0 }, "melting");
        log.record(9.0, progress(25), "25%");
        assert_eq!(
            log.phase_sequence(),
            vec![IcePhase::Warming, IcePhase::Melting]
        );
    }
}
