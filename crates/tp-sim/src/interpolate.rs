//! Smoothing points for the recorded temperature series.

use tp_core::lerp;

/// Number of interior points generated per smoothed step.
pub const INTERMEDIATE_POINTS: usize = 5;
/// Steps changing less than this (°C) are not smoothed.
pub const MIN_SMOOTHED_CHANGE_C: f64 = 0.01;

/// One (elapsed time, temperature) sample.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SamplePoint {
    pub time_s: f64,
    pub temperature_c: f64,
}

/// Evenly spaced interior points on the straight line between the start and
/// end of a step. Neither endpoint is included. Returns nothing when the
/// temperature barely moved.
pub fn intermediate_points(
    start_s: f64,
    end_s: f64,
    start_c: f64,
    end_c: f64,
) -> Vec<SamplePoint> {
    if (end_c - start_c).abs() <= MIN_SMOOTHED_CHANGE_C {
        return Vec::new();
    }

    (1..=INTERMEDIATE_POINTS)
        .map(|i| {
            let fraction = i as f64 / (INTERMEDIATE_POINTS + 1) as f64;
            SamplePoint {
                time_s: lerp(start_s, end_s, fraction),
                temperature_c: lerp(start_c, end_c, fraction),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn five_points_strictly_inside() {
        let pts = intermediate_points(10.0, 11.0, 30.0, 29.4);
        assert_eq!(pts.len(), INTERMEDIATE_POINTS);
        for p in &pts {
            assert!(p.time_s > 10.0 && p.time_s < 11.0);
            assert!(p.temperature_c < 30.0 && p.temperature_c > 29.4);
        }
        assert!(pts.windows(2).all(|w| w[0].time_s < w[1].time_s));
        assert!((pts[2].time_s - 10.5).abs() < 1e-12);
        assert!((pts[2].temperature_c - 29.7).abs() < 1e-12);
    }

    #[test]
    fn negligible_change_gives_nothing() {
        assert!(intermediate_points(0.0, 1.0, 20.0, 20.005).is_empty());
    }
}
