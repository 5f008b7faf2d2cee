//! Integration tests: heating runs with ice dropped into the fluid.

use tp_core::units::w;
use tp_sim::{IcePhase, SimEventKind, SimRecord, Simulation};
use tp_vessel::{Container, ElectricHeater, Fluid};

fn kilo_of_water(temp_c: f64) -> Container {
    Container::new(Fluid::water(), 0.001, temp_c).unwrap()
}

fn run_with_ice(trigger_s: f64, mass_kg: f64, ice_c: f64) -> (SimRecord, Container) {
    let mut sim = Simulation::default();
    sim.configure_simulation(60.0, 25.0, 1.0, false, 1.0)
        .configure_ice(true, trigger_s, mass_kg, ice_c);
    let mut c = kilo_of_water(20.0);
    let heater = ElectricHeater::new(w(1000.0)).unwrap();
    let rec = sim.run(&mut c, &heater).unwrap();
    (rec, c)
}

#[test]
fn hundred_grams_of_ice_at_start() {
    let (rec, c) = run_with_ice(0.0, 0.1, -10.0);

    let added = rec.events.get(0.0).expect("addition logged at t = 0");
    assert!(matches!(
        added.kind,
        SimEventKind::IceAdded {
            mass_kg,
            ice_temp_c,
            phase: IcePhase::Warming,
            ..
        } if mass_kg == 0.1 && ice_temp_c == -10.0
    ));

    let melting = rec
        .events
        .iter()
        .find(|e| matches!(e.kind, SimEventKind::MeltingStarted { .. }))
        .expect("melting logged");
    assert!(melting.time_s > 0.0);

    let last = rec.events.iter().last().unwrap();
    match last.kind {
        SimEventKind::IceDepleted {
            added_volume_m3, ..
        } => {
            assert!(last.time_s > melting.time_s);
            assert!((added_volume_m3 * 1e6 - 108.7).abs() < 0.1);
        }
        ref other => panic!("last event should be depletion, got {other:?}"),
    }

    let ice = rec.ice.as_ref().unwrap();
    assert_eq!(ice.phase, IcePhase::Depleted);
    assert_eq!(ice.remaining_kg, 0.0);
    assert_eq!(ice.triggered_at_s, Some(0.0));
    assert!((c.fluid_volume_m3 - (0.001 + 0.1 / 920.0)).abs() < 1e-12);
    assert!(rec.final_temperature_c >= 60.0);
}

#[test]
fn ice_slows_heating() {
    let (with_ice, _) = run_with_ice(0.0, 0.1, -10.0);
    let (without, _) = run_with_ice(0.0, 0.0, -10.0);
    assert!(with_ice.elapsed_s > without.elapsed_s);
    assert!(without.events.is_empty());
}

#[test]
fn zero_mass_ice_is_ignored() {
    let (rec, c) = run_with_ice(0.0, 0.0, -10.0);
    let ice = rec.ice.unwrap();
    assert_eq!(ice.phase, IcePhase::Inactive);
    assert_eq!(ice.triggered_at_s, None);
    assert_eq!(c.fluid_volume_m3, 0.001);
}

#[test]
fn phase_order_is_warming_melting_depleted() {
    let (rec, _) = run_with_ice(20.0, 0.05, -4.0);
    assert_eq!(
        rec.events.phase_sequence(),
        vec![IcePhase::Warming, IcePhase::Melting, IcePhase::Depleted]
    );
    assert_eq!(rec.events.iter().next().unwrap().time_s, 20.0);
}

#[test]
fn ice_at_melting_point_skips_warming() {
    let (rec, _) = run_with_ice(0.0, 0.05, 0.0);
    assert_eq!(
        rec.events.phase_sequence(),
        vec![IcePhase::Melting, IcePhase::Depleted]
    );
}

#[test]
fn ice_after_target_does_nothing() {
    // 1000 W reaches 60 °C long before t = 10 000 s
    let (rec, c) = run_with_ice(10_000.0, 0.1, -10.0);
    assert!(rec.events.is_empty());
    assert_eq!(rec.ice.unwrap().phase, IcePhase::Inactive);
    assert_eq!(c.fluid_volume_m3, 0.001);
}

#[test]
fn ice_steps_are_smoothed() {
    let (rec, _) = run_with_ice(0.0, 0.1, -10.0);
    assert!(rec.series.len() as u64 > rec.steps + 1);
    assert!(rec.series.windows(2).all(|p| p[1].time_s > p[0].time_s));
}
