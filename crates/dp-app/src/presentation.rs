//! Presentation frames: what the plot and table bindings receive after every
//! recompute.
//!
//! A frame is built from one complete [`SweepResult`] and the phase mode. It
//! owns copies of the series, so a renderer never reads a result that is
//! being replaced.

use dp_meters::MeterSelection;
use dp_sweep::{Channel, Field, GasFlowUnit, PhaseMode, SweepResult};

pub const X_AXIS_LABEL: &str = "Differential Pressure [inWC]";
pub const DP_COLUMN: &str = "dP [inWC]";

/// Which table the frame shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableKind {
    Gas,
    Liquid,
}

impl TableKind {
    pub fn for_phase(phase: PhaseMode) -> Self {
        match phase {
            PhaseMode::Gas => Self::Gas,
            PhaseMode::Liquid => Self::Liquid,
        }
    }

    /// Value columns after the dP column.
    pub fn channels(self) -> &'static [Channel] {
        match self {
            Self::Gas => &[Channel::GasStandard],
            Self::Liquid => &[
                Channel::MassFlow,
                Channel::LiquidVolume,
                Channel::LiquidBase,
            ],
        }
    }
}

/// Column header of a channel.
pub fn channel_label(channel: Channel, gas_unit: GasFlowUnit) -> String {
    match channel {
        Channel::MassFlow => "Mass Flow [Kg/s]".to_string(),
        Channel::GasStandard => format!("Flow Rate [{}]", gas_unit.label()),
        Channel::LiquidVolume => "Flow Rate [MBPD]".to_string(),
        Channel::LiquidBase => "Standard Flow Rate [MSBPD]".to_string(),
    }
}

/// Y axis label of the primary series.
pub fn y_axis_label(phase: PhaseMode, gas_unit: GasFlowUnit) -> String {
    let unit = match phase {
        PhaseMode::Gas => gas_unit.label(),
        PhaseMode::Liquid => "MBPD",
    };
    format!("Flow at Base conditions [{unit}]")
}

/// One plotted line. Failed points are left out.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub channel: Channel,
    pub label: String,
    pub points: Vec<[f64; 2]>,
}

impl Series {
    fn from_result(result: &SweepResult, channel: Channel) -> Self {
        Self {
            channel,
            label: channel_label(channel, result.gas_unit()),
            points: result.curve(channel),
        }
    }
}

/// Visible table. Failed points keep their row with `None` values.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub kind: TableKind,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Option<f64>>>,
}

impl Table {
    fn from_result(result: &SweepResult, kind: TableKind) -> Self {
        let channels = kind.channels();
        let mut columns = vec![DP_COLUMN.to_string()];
        columns.extend(channels.iter().map(|c| channel_label(*c, result.gas_unit())));

        let rows = result
            .points
            .iter()
            .map(|p| {
                let mut row = vec![Some(p.dp_in_h2o)];
                row.extend(channels.iter().map(|c| p.value(*c)));
                row
            })
            .collect();

        Self {
            kind,
            columns,
            rows,
        }
    }
}

/// Everything a renderer needs for one recompute cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct PresentationFrame {
    pub title: String,
    pub phase: PhaseMode,
    pub x_label: &'static str,
    pub y_label: String,
    pub primary: Series,
    pub secondary: Series,
    pub table: Table,
    /// Input field greyed out in this phase
    pub disabled_field: Field,
    pub tap_position_enabled: bool,
    pub selection: MeterSelection,
    /// Fingerprint of the parameter snapshot behind this frame
    pub fingerprint: String,
    pub num_failed: usize,
}

impl PresentationFrame {
    pub fn build(
        result: &SweepResult,
        phase: PhaseMode,
        selection: MeterSelection,
        title: &str,
    ) -> Self {
        Self {
            title: title.to_string(),
            phase,
            x_label: X_AXIS_LABEL,
            y_label: y_axis_label(phase, result.gas_unit()),
            primary: Series::from_result(result, phase.primary_channel()),
            secondary: Series::from_result(result, phase.secondary_channel()),
            table: Table::from_result(result, TableKind::for_phase(phase)),
            disabled_field: phase.disabled_field(),
            tap_position_enabled: selection.tap_position_enabled(),
            selection,
            fingerprint: result.fingerprint.clone(),
            num_failed: result.num_failed,
        }
    }

    /// The visible table as CSV; failed samples are empty cells.
    pub fn to_csv(&self) -> String {
        let mut csv = self.table.columns.join(",");
        csv.push('\n');
        for row in &self.table.rows {
            let cells: Vec<String> = row
                .iter()
                .map(|v| v.map(|x| format!("{}", x)).unwrap_or_default())
                .collect();
            csv.push_str(&cells.join(","));
            csv.push('\n');
        }
        csv
    }
}

/// Receives a frame after every recompute.
pub trait PresentationAdapter {
    fn present(&mut self, frame: &PresentationFrame);
}

impl<F> PresentationAdapter for F
where
    F: FnMut(&PresentationFrame),
{
    fn present(&mut self, frame: &PresentationFrame) {
        self(frame)
    }
}

/// Keeps every frame it is handed.
#[derive(Debug, Default)]
pub struct FrameRecorder {
    pub frames: Vec<PresentationFrame>,
}

impl FrameRecorder {
    pub fn last(&self) -> Option<&PresentationFrame> {
        self.frames.last()
    }
}

impl PresentationAdapter for FrameRecorder {
    fn present(&mut self, frame: &PresentationFrame) {
        self.frames.push(frame.clone());
    }
}
