use clap::{Parser, Subcommand};
use dp_app::{
    AppConfig, AppError, AppResult, PresentationFrame, Session, SessionEvent, load_config,
    save_config,
};
use dp_meters::{MeterFamily, MeterType, NominalCoefficientMeter, TapPosition, TapType};
use dp_sweep::{Field, PhaseMode};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "dp-cli")]
#[command(about = "dpflow CLI - differential-pressure meter flow sweeps", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sweep the dP range and print the visible table as CSV
    Sweep(SweepArgs),
    /// List meter types, tap types and tap positions
    Meters,
    /// Write a config file with every default filled in
    Template {
        /// Output path (.yaml, .yml or .json)
        path: PathBuf,
    },
    /// Check that a config file builds a valid session
    Validate {
        /// Path to the config file
        path: PathBuf,
    },
}

#[derive(clap::Args)]
struct SweepArgs {
    /// Config file (.yaml, .yml or .json); defaults are used without one
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Phase mode (gas or liquid)
    #[arg(long)]
    phase: Option<PhaseMode>,
    /// Meter type label, e.g. "ISO 5167 orifice"
    #[arg(long)]
    meter: Option<String>,
    /// Tap type: corner, flange, D or D/2
    #[arg(long)]
    taps: Option<String>,
    /// Tap position for eccentric orifices: "180 degree" or "90 degree"
    #[arg(long)]
    tap_position: Option<String>,
    /// Override a parameter, e.g. --set density=800 or --set pipe_diameter="52.5 mm"
    #[arg(long = "set", value_name = "FIELD=VALUE", value_parser = parse_assignment)]
    assignments: Vec<(Field, String)>,
    /// Lower dP bound [inWC]
    #[arg(long)]
    dp_min: Option<String>,
    /// Upper dP bound [inWC]
    #[arg(long)]
    dp_max: Option<String>,
    /// Plot title / tag name
    #[arg(long)]
    title: Option<String>,
    /// Fixed discharge coefficient for the nominal meter (default: per meter family)
    #[arg(long)]
    cd: Option<f64>,
    /// Output CSV file path (optional, defaults to stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn parse_assignment(text: &str) -> Result<(Field, String), String> {
    let (key, value) = text
        .split_once('=')
        .ok_or_else(|| format!("expected FIELD=VALUE, got '{}'", text))?;
    let field: Field = key.parse().map_err(|e| format!("{}", e))?;
    Ok((field, value.to_string()))
}

fn main() -> AppResult<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Sweep(args) => cmd_sweep(args),
        Commands::Meters => {
            cmd_meters();
            Ok(())
        }
        Commands::Template { path } => cmd_template(&path),
        Commands::Validate { path } => cmd_validate(&path),
    }
}

fn cmd_sweep(args: SweepArgs) -> AppResult<()> {
    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => AppConfig::default(),
    };
    let mut session = Session::new(&config)?;

    // Phase goes first so its fields are enabled for the overrides below
    let mut events = Vec::new();
    if let Some(phase) = args.phase {
        events.push(SessionEvent::SetPhase(phase));
    }
    if let Some(meter) = args.meter {
        events.push(SessionEvent::SetMeter(meter));
    }
    if let Some(taps) = args.taps {
        events.push(SessionEvent::SetTaps(taps));
    }
    if let Some(pos) = args.tap_position {
        events.push(SessionEvent::SetTapPosition(pos));
    }
    for (field, text) in args.assignments {
        events.push(SessionEvent::SetField { field, text });
    }
    if args.dp_min.is_some() || args.dp_max.is_some() {
        let range = session.parameters().dp_range();
        events.push(SessionEvent::SetDpRange {
            min: args.dp_min.unwrap_or_else(|| range.min().to_string()),
            max: args.dp_max.unwrap_or_else(|| range.max().to_string()),
        });
    }
    if let Some(title) = args.title {
        events.push(SessionEvent::SetTitle(title));
    }

    // The CLI has no surface to redraw, so edits are applied before one cycle
    for event in events {
        session.apply(event)?;
    }

    let meter = match args.cd {
        Some(cd) if cd.is_finite() && cd > 0.0 => {
            NominalCoefficientMeter::with_discharge_coefficient(cd)
        }
        Some(cd) => {
            return Err(AppError::Validation(format!(
                "discharge coefficient must be positive (got {})",
                cd
            )));
        }
        None => NominalCoefficientMeter::new(),
    };
    let mut latest: Option<PresentationFrame> = None;
    let mut adapter = |frame: &PresentationFrame| latest = Some(frame.clone());
    session.handle(SessionEvent::Refresh, &meter, &mut adapter)?;

    let Some(frame) = latest else {
        println!("No sweep result");
        return Ok(());
    };

    let csv = frame.to_csv();
    if let Some(path) = &args.output {
        std::fs::write(path, &csv)?;
        print_summary(&session, &frame);
        println!(
            "✓ Exported {} points to {}",
            frame.table.rows.len(),
            path.display()
        );
    } else {
        print!("{}", csv);
    }

    Ok(())
}

fn print_summary(session: &Session, frame: &PresentationFrame) {
    if !frame.title.is_empty() {
        println!("{}", frame.title);
    }
    println!("  Session: {}", session.id());
    println!("  Meter: {}", frame.selection);
    println!("  Phase: {} ({} disabled)", frame.phase, frame.disabled_field);
    println!("  {}", session.settings());
    println!("  Y axis: {}", frame.y_label);
    if frame.num_failed > 0 {
        println!("  ⚠ {} points failed in the meter solver", frame.num_failed);
    }
}

fn cmd_meters() {
    let families = [
        MeterFamily::Orifice,
        MeterFamily::Nozzle,
        MeterFamily::Venturi,
        MeterFamily::Cone,
        MeterFamily::Wedge,
        MeterFamily::Unspecified,
    ];
    for family in families {
        println!("{:?}:", family);
        for meter in MeterType::ALL.iter().filter(|m| m.family() == family) {
            let marker = if meter.is_eccentric() {
                " (eccentric, tap position applies)"
            } else {
                ""
            };
            println!("  {}{}", meter, marker);
        }
    }

    let taps: Vec<&str> = TapType::ALL.iter().map(|t| t.label()).collect();
    println!("Tap types: {}", taps.join(", "));
    let positions: Vec<&str> = TapPosition::ALL.iter().map(|p| p.label()).collect();
    println!("Tap positions: {}", positions.join(", "));
}

fn cmd_template(path: &Path) -> AppResult<()> {
    let config = AppConfig::default();
    save_config(path, &config)?;
    println!("✓ Wrote config template to {}", path.display());
    for field in Field::ALL {
        println!("  {:<22} {}", field.key(), field.label());
    }
    Ok(())
}

fn cmd_validate(path: &Path) -> AppResult<()> {
    println!("Validating config: {}", path.display());
    let config = load_config(path)?;
    let session = Session::new(&config)?;
    println!("✓ Config is valid");
    println!("  Meter: {}", session.selection());
    println!("  Phase: {}", session.phase());
    println!("  {}", session.settings());
    Ok(())
}
