//! One engineer's sweep session: parameter snapshot, phase mode, last result.
//!
//! Every edit replaces the parameter snapshot and marks the session dirty;
//! [`Session::recompute`] turns dirty into one fresh [`SweepResult`]. The
//! session is only ever driven through `&mut self`, so two sweeps can never
//! interleave writes into the same result.

use crate::config::AppConfig;
use crate::error::{AppError, AppResult};
use crate::presentation::{PresentationAdapter, PresentationFrame};
use dp_meters::{MeterSelection, MeterSolver, MeterType, TapPosition, TapType};
use dp_sweep::{
    Channel, DpRange, Field, InputResult, ParameterModel, PhaseMode, SweepResult, SweepSettings,
    parse_tap_position, run_sweep,
};
use tracing::{debug, info};
use uuid::Uuid;

/// A change coming from the parameter surface.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    SetField { field: Field, text: String },
    SetDpRange { min: String, max: String },
    SetMeter(String),
    SetTaps(String),
    SetTapPosition(String),
    SetTitle(String),
    SetPhase(PhaseMode),
    TogglePhase,
    /// Recompute without changing anything
    Refresh,
}

#[derive(Debug, Clone)]
pub struct Session {
    id: Uuid,
    title: String,
    settings: SweepSettings,
    params: ParameterModel,
    /// Tap position last chosen on the surface, kept across concentric meters
    requested_tap_position: Option<TapPosition>,
    dirty: bool,
    result: Option<SweepResult>,
    sweeps_run: usize,
}

impl Session {
    /// New session from config defaults.
    pub fn new(config: &AppConfig) -> AppResult<Self> {
        let params = config.parameters()?;
        let mut session = Self::with_parameters(params, config.settings()?);
        session.title = config.title.clone();
        // An unreadable position only matters once an eccentric meter is picked
        if let Ok(Some(pos)) = parse_tap_position(&config.defaults.tap_position) {
            session.requested_tap_position = Some(pos);
        }
        Ok(session)
    }

    pub fn with_parameters(params: ParameterModel, settings: SweepSettings) -> Self {
        let requested_tap_position = params.selection().tap_position();
        let session = Self {
            id: Uuid::new_v4(),
            title: String::new(),
            settings,
            params,
            requested_tap_position,
            dirty: true,
            result: None,
            sweeps_run: 0,
        };
        debug!(session = %session.id, phase = %session.phase(), "session created");
        session
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn settings(&self) -> &SweepSettings {
        &self.settings
    }

    pub fn parameters(&self) -> &ParameterModel {
        &self.params
    }

    pub fn phase(&self) -> PhaseMode {
        self.params.phase_mode()
    }

    pub fn disabled_field(&self) -> Field {
        self.phase().disabled_field()
    }

    pub fn primary_channel(&self) -> Channel {
        self.phase().primary_channel()
    }

    pub fn selection(&self) -> MeterSelection {
        self.params.selection()
    }

    pub fn requested_tap_position(&self) -> Option<TapPosition> {
        self.requested_tap_position
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Number of solver sweeps this session has run.
    pub fn sweeps_run(&self) -> usize {
        self.sweeps_run
    }

    /// Last completed result, whether or not it is still current.
    pub fn last_result(&self) -> Option<&SweepResult> {
        self.result.as_ref()
    }

    fn replace_params(&mut self, next: ParameterModel) {
        if next != self.params {
            self.params = next;
            self.dirty = true;
        }
    }

    /// Parse one field; on error nothing changes.
    pub fn set_field(&mut self, field: Field, text: &str) -> InputResult<()> {
        let next = self.params.with_field(field, text)?;
        self.replace_params(next);
        Ok(())
    }

    pub fn set_dp_range(&mut self, min_text: &str, max_text: &str) -> InputResult<()> {
        let range = DpRange::parse(min_text, max_text)?;
        self.replace_params(self.params.with_dp_range(range));
        Ok(())
    }

    pub fn set_meter(&mut self, text: &str) -> InputResult<()> {
        let meter: MeterType = text.parse()?;
        self.select(meter, self.selection().tap_type());
        Ok(())
    }

    pub fn set_taps(&mut self, text: &str) -> InputResult<()> {
        let taps: TapType = text.parse()?;
        self.select(self.selection().meter_type(), taps);
        Ok(())
    }

    /// Remembered for any meter; only reaches the solver for eccentric ones.
    pub fn set_tap_position(&mut self, text: &str) -> InputResult<()> {
        self.requested_tap_position = parse_tap_position(text)?;
        let current = self.selection();
        self.select(current.meter_type(), current.tap_type());
        Ok(())
    }

    fn select(&mut self, meter: MeterType, taps: TapType) {
        let previous = self.selection();
        let selection = MeterSelection::new(meter, taps, self.requested_tap_position);
        if previous.tap_position().is_some() && selection.tap_position().is_none() {
            info!(session = %self.id, meter = %meter, "tap position cleared for concentric meter");
        }
        self.replace_params(self.params.with_selection(selection));
    }

    /// Plot title only; never triggers a sweep.
    pub fn set_title(&mut self, text: &str) {
        self.title = text.trim().to_string();
    }

    /// The only way phase mode changes.
    ///
    /// Channels are all precomputed, so the stored result stays valid and the
    /// following recompute is a freshness check rather than a new sweep.
    pub fn set_phase(&mut self, phase: PhaseMode) {
        if phase == self.phase() {
            return;
        }
        self.params = self.params.with_phase(phase);
        info!(
            session = %self.id,
            phase = %phase,
            disabled = %phase.disabled_field(),
            "phase mode changed"
        );
    }

    pub fn toggle_phase(&mut self) {
        self.set_phase(self.phase().toggled());
    }

    /// Whether the stored result was computed from the active snapshot.
    pub fn is_current(&self) -> bool {
        self.result.as_ref().is_some_and(|r| r.matches(&self.params))
    }

    /// Run one sweep if the session is dirty or its result is stale.
    ///
    /// Returns whether the solver was invoked.
    pub fn recompute(&mut self, solver: &dyn MeterSolver) -> bool {
        if !self.dirty && self.is_current() {
            return false;
        }
        let snapshot = self.params.clone();
        let result = run_sweep(&snapshot, &self.settings, solver);
        debug!(
            session = %self.id,
            points = result.points.len(),
            failed = result.num_failed,
            "result replaced"
        );
        self.result = Some(result);
        self.dirty = false;
        self.sweeps_run += 1;
        true
    }

    /// Frame for the current phase, `None` unless the result is current.
    pub fn frame(&self) -> Option<PresentationFrame> {
        let result = self.result.as_ref().filter(|r| r.matches(&self.params))?;
        Some(PresentationFrame::build(
            result,
            self.phase(),
            self.selection(),
            &self.title,
        ))
    }

    pub fn apply(&mut self, event: SessionEvent) -> InputResult<()> {
        let outcome = match &event {
            SessionEvent::SetField { field, text } => self.set_field(*field, text),
            SessionEvent::SetDpRange { min, max } => self.set_dp_range(min, max),
            SessionEvent::SetMeter(text) => self.set_meter(text),
            SessionEvent::SetTaps(text) => self.set_taps(text),
            SessionEvent::SetTapPosition(text) => self.set_tap_position(text),
            SessionEvent::SetTitle(text) => {
                self.set_title(text);
                Ok(())
            }
            SessionEvent::SetPhase(phase) => {
                self.set_phase(*phase);
                Ok(())
            }
            SessionEvent::TogglePhase => {
                self.toggle_phase();
                Ok(())
            }
            SessionEvent::Refresh => Ok(()),
        };
        if let Err(e) = &outcome {
            debug!(session = %self.id, ?event, error = %e, "input rejected");
        }
        outcome
    }

    /// One synchronous cycle: apply, recompute if needed, present.
    ///
    /// The adapter receives the current frame even when the event was
    /// rejected, so the surface falls back to the last valid result.
    pub fn handle(
        &mut self,
        event: SessionEvent,
        solver: &dyn MeterSolver,
        adapter: &mut dyn PresentationAdapter,
    ) -> AppResult<()> {
        let applied = self.apply(event);
        self.recompute(solver);
        if let Some(frame) = self.frame() {
            adapter.present(&frame);
        }
        applied.map_err(AppError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presentation::FrameRecorder;
    use dp_core::units::{MassRate, kgps};
    use dp_meters::{MeterInputs, MeterResult};
    use dp_sweep::InputError;

    fn stub(inputs: &MeterInputs) -> MeterResult<MassRate> {
        Ok(kgps(inputs.differential_pa().sqrt() * 1e-3))
    }

    fn session() -> Session {
        Session::new(&AppConfig::default()).unwrap()
    }

    #[test]
    fn starts_in_gas_and_dirty() {
        let s = session();
        assert_eq!(s.phase(), PhaseMode::Gas);
        assert_eq!(s.disabled_field(), Field::BaseDensity);
        assert!(s.is_dirty());
        assert!(s.frame().is_none());
        assert_eq!(s.requested_tap_position(), Some(TapPosition::Opposite));
        assert_eq!(s.selection().tap_position(), None);
    }

    #[test]
    fn recompute_only_when_needed() {
        let mut s = session();
        assert!(s.recompute(&stub));
        assert!(!s.recompute(&stub));
        s.set_field(Field::Density, "800").unwrap();
        assert!(s.is_dirty());
        assert!(s.recompute(&stub));
        // same value again is not a change
        s.set_field(Field::Density, "800").unwrap();
        assert!(!s.is_dirty());
        assert_eq!(s.sweeps_run(), 2);
    }

    #[test]
    fn stale_result_is_never_presented() {
        let mut s = session();
        s.recompute(&stub);
        assert!(s.frame().is_some());
        s.set_field(Field::Viscosity, "2").unwrap();
        assert!(s.last_result().is_some());
        assert!(s.frame().is_none());
        s.recompute(&stub);
        let frame = s.frame().unwrap();
        assert_eq!(frame.fingerprint, s.parameters().fingerprint());
    }

    #[test]
    fn phase_change_reuses_result() {
        let mut s = session();
        s.recompute(&stub);
        let before = s.last_result().cloned().unwrap();

        s.toggle_phase();
        assert_eq!(s.phase(), PhaseMode::Liquid);
        assert!(!s.recompute(&stub));
        assert_eq!(s.last_result(), Some(&before));

        let frame = s.frame().unwrap();
        assert_eq!(frame.primary.channel, Channel::LiquidBase);
        assert_eq!(frame.disabled_field, Field::MolecularWeight);
    }

    #[test]
    fn disabled_field_is_rejected_without_change() {
        let mut s = session();
        let before = s.parameters().clone();
        assert!(matches!(
            s.set_field(Field::BaseDensity, "900"),
            Err(InputError::FieldDisabled { .. })
        ));
        assert_eq!(s.parameters(), &before);
    }

    #[test]
    fn tap_position_survives_concentric_detour() {
        let mut s = session();
        s.set_meter("eccentric orifice").unwrap();
        assert_eq!(s.selection().tap_position(), Some(TapPosition::Opposite));
        s.set_tap_position("90 degree").unwrap();
        assert_eq!(s.selection().tap_position(), Some(TapPosition::Side));

        s.set_meter("ISO 5167 orifice").unwrap();
        assert_eq!(s.selection().tap_position(), None);
        assert_eq!(s.requested_tap_position(), Some(TapPosition::Side));

        s.set_meter("ISO 15377 eccentric orifice").unwrap();
        assert_eq!(s.selection().tap_position(), Some(TapPosition::Side));
    }

    #[test]
    fn title_does_not_dirty() {
        let mut s = session();
        s.recompute(&stub);
        s.set_title("  FT-101 ");
        assert!(!s.is_dirty());
        assert_eq!(s.frame().unwrap().title, "FT-101");
    }

    #[test]
    fn handle_resends_last_frame_on_error() {
        let mut s = session();
        let mut recorder = FrameRecorder::default();
        s.handle(SessionEvent::Refresh, &stub, &mut recorder).unwrap();
        let err = s
            .handle(
                SessionEvent::SetField {
                    field: Field::Density,
                    text: "-1".into(),
                },
                &stub,
                &mut recorder,
            )
            .unwrap_err();
        assert!(matches!(err, AppError::Input(InputError::NonPositive { .. })));
        assert_eq!(recorder.frames.len(), 2);
        assert_eq!(recorder.frames[0], recorder.frames[1]);
        assert_eq!(s.sweeps_run(), 1);
    }

    #[test]
    fn sessions_are_isolated() {
        let mut a = session();
        let mut b = session();
        assert_ne!(a.id(), b.id());
        a.set_field(Field::Density, "900").unwrap();
        a.recompute(&stub);
        b.recompute(&stub);
        assert_ne!(
            a.last_result().unwrap().fingerprint,
            b.last_result().unwrap().fingerprint
        );
        assert_eq!(b.parameters().value(Field::Density), 775.0);
    }
}
