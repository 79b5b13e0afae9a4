//! Event-driven recompute cycles against a counting solver stub.

use dp_app::{AppConfig, FrameRecorder, PresentationFrame, Session, SessionEvent};
use dp_core::units::{MassRate, kgps};
use dp_meters::{MeterInputs, MeterResult, NominalCoefficientMeter, TapPosition};
use dp_sweep::{Channel, Field, PhaseMode};
use std::cell::{Cell, RefCell};

fn config() -> AppConfig {
    AppConfig::from_yaml_str(
        r#"
title: FT-101
sweep_steps: 20
defaults:
  isentropic_exponent: "1.1"
"#,
    )
    .unwrap()
}

#[test]
fn toggle_relabels_without_second_sweep() {
    let calls = Cell::new(0usize);
    let solver = |i: &MeterInputs| -> MeterResult<MassRate> {
        calls.set(calls.get() + 1);
        Ok(kgps(i.differential_pa().sqrt() * 1e-3))
    };

    let mut session = Session::new(&config()).unwrap();
    let mut recorder = FrameRecorder::default();
    session
        .handle(SessionEvent::Refresh, &solver, &mut recorder)
        .unwrap();
    assert_eq!(calls.get(), 21);

    session
        .handle(SessionEvent::TogglePhase, &solver, &mut recorder)
        .unwrap();
    assert_eq!(calls.get(), 21, "phase toggle must not re-run the solver");

    let gas = &recorder.frames[0];
    let liquid = &recorder.frames[1];
    assert_eq!(gas.phase, PhaseMode::Gas);
    assert_eq!(liquid.phase, PhaseMode::Liquid);
    assert_eq!(gas.y_label, "Flow at Base conditions [MMSCFD]");
    assert_eq!(liquid.y_label, "Flow at Base conditions [MBPD]");
    assert_eq!(gas.primary, liquid.secondary);
    assert_eq!(gas.secondary, liquid.primary);
    assert_eq!(gas.fingerprint, liquid.fingerprint);
    assert_eq!(liquid.table.columns.len(), 4);

    // Raw mass flow is unchanged by the toggle
    let mass = session.last_result().unwrap().series(Channel::MassFlow);
    assert!(mass.iter().all(Option::is_some));
}

#[test]
fn edits_while_in_other_mode_are_picked_up() {
    let mut session = Session::new(&config()).unwrap();
    let meter = NominalCoefficientMeter::new();
    let mut recorder = FrameRecorder::default();

    session
        .handle(SessionEvent::SetPhase(PhaseMode::Liquid), &meter, &mut recorder)
        .unwrap();
    session
        .handle(
            SessionEvent::SetField {
                field: Field::BaseDensity,
                text: "850".into(),
            },
            &meter,
            &mut recorder,
        )
        .unwrap();
    session
        .handle(SessionEvent::TogglePhase, &meter, &mut recorder)
        .unwrap();

    assert_eq!(session.sweeps_run(), 2);
    let last = recorder.frames.last().unwrap();
    assert_eq!(last.phase, PhaseMode::Gas);
    assert_eq!(last.fingerprint, session.parameters().fingerprint());
    assert_eq!(session.parameters().value(Field::BaseDensity), 850.0);
}

#[test]
fn concentric_meter_clears_tap_position_before_next_sweep() {
    let seen = RefCell::new(Vec::new());
    let recorder_solver = |i: &MeterInputs| -> MeterResult<MassRate> {
        seen.borrow_mut().push(i.selection.tap_position());
        Ok(kgps(1.0))
    };
    let mut session = Session::new(&config()).unwrap();
    let mut frames = FrameRecorder::default();

    for event in [
        SessionEvent::SetMeter("Miller eccentric orifice".into()),
        SessionEvent::SetTapPosition("90 degree".into()),
    ] {
        session.handle(event, &recorder_solver, &mut frames).unwrap();
    }
    assert_eq!(seen.borrow().last(), Some(&Some(TapPosition::Side)));
    assert!(frames.last().unwrap().tap_position_enabled);

    seen.borrow_mut().clear();
    session
        .handle(
            SessionEvent::SetMeter("wedge meter".into()),
            &recorder_solver,
            &mut frames,
        )
        .unwrap();
    assert_eq!(seen.borrow().len(), 21);
    assert!(seen.borrow().iter().all(Option::is_none));
    assert!(!frames.last().unwrap().tap_position_enabled);
}

#[test]
fn rejected_input_keeps_last_valid_frame() {
    let mut session = Session::new(&config()).unwrap();
    let meter = NominalCoefficientMeter::new();
    let mut presented: Vec<PresentationFrame> = Vec::new();
    let mut adapter = |f: &PresentationFrame| presented.push(f.clone());

    session
        .handle(SessionEvent::Refresh, &meter, &mut adapter)
        .unwrap();
    for bad in [
        SessionEvent::SetField {
            field: Field::UpstreamPressure,
            text: "lots".into(),
        },
        SessionEvent::SetDpRange {
            min: "100".into(),
            max: "10".into(),
        },
        SessionEvent::SetMeter("rotameter".into()),
        SessionEvent::SetTaps("radius".into()),
        SessionEvent::SetField {
            field: Field::BaseDensity,
            text: "900".into(),
        },
    ] {
        assert!(session.handle(bad, &meter, &mut adapter).is_err());
    }
    drop(adapter);

    assert_eq!(presented.len(), 6);
    assert!(presented.windows(2).all(|w| w[0] == w[1]));
    assert_eq!(session.sweeps_run(), 1);
    assert_eq!(presented[0].title, "FT-101");
}

mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn event() -> impl Strategy<Value = SessionEvent> {
        prop_oneof![
            (0usize..8, 0.1f64..1000.0).prop_map(|(i, v)| SessionEvent::SetField {
                field: Field::ALL[i],
                text: format!("{v}"),
            }),
            (0.01f64..10.0, 20.0f64..500.0).prop_map(|(a, b)| SessionEvent::SetDpRange {
                min: format!("{a}"),
                max: format!("{b}"),
            }),
            prop::sample::select(vec![
                "orifice",
                "eccentric orifice",
                "cone meter",
                "ISO 15377 eccentric orifice",
                "long radius nozzle",
            ])
            .prop_map(|m| SessionEvent::SetMeter(m.to_string())),
            prop::sample::select(vec!["180 degree", "90 degree", ""])
                .prop_map(|p| SessionEvent::SetTapPosition(p.to_string())),
            Just(SessionEvent::TogglePhase),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn presented_frame_always_matches_active_snapshot(
            events in prop::collection::vec(event(), 1..12)
        ) {
            let settings = dp_sweep::SweepSettings::new(5, dp_sweep::GasFlowUnit::Mmscfd).unwrap();
            let mut session = Session::with_parameters(Default::default(), settings);
            let meter = NominalCoefficientMeter::new();
            let mut recorder = FrameRecorder::default();

            for event in events {
                let _ = session.handle(event, &meter, &mut recorder);
                let frame = recorder.last().unwrap();
                prop_assert_eq!(&frame.fingerprint, &session.parameters().fingerprint());
                prop_assert_eq!(frame.phase, session.phase());
                prop_assert_eq!(
                    frame.selection.tap_position().is_some(),
                    frame.selection.meter_type().is_eccentric()
                );
            }
        }
    }
}
