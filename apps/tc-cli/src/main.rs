mod error;
mod ops;
mod render;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tc_project::{Project, compile_cascade};
use tc_sim::{CascadeController, Session};
use tracing::{Level, info, warn};

use error::{CliError, CliResult};
use ops::{OpQueue, ScheduledOp, parse_drain, parse_fill, parse_target};

#[derive(Parser)]
#[command(name = "tc-cli")]
#[command(about = "TankCascade CLI - gravity-fed four-tank cascade simulator", long_about = None)]
struct Cli {
    /// Log debug output (per-tick summaries) to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a cascade configuration file
    Validate {
        /// Path to the YAML or JSON configuration
        project_path: PathBuf,
    },
    /// Print the built-in reference cascade
    Reference {
        #[arg(long, value_enum, default_value_t = DocFormat::Yaml)]
        format: DocFormat,
    },
    /// Run the cascade for a number of ticks
    Run(RunArgs),
}

#[derive(clap::Args)]
struct RunArgs {
    /// Configuration file; the reference cascade when omitted
    project_path: Option<PathBuf>,
    /// Number of ticks to run
    #[arg(long, default_value_t = 500)]
    ticks: u64,
    /// Print a snapshot every N ticks
    #[arg(long, default_value_t = 50)]
    every: u64,
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
    /// Fill a tank to capacity: TANK@TICK
    #[arg(long = "fill", value_parser = parse_fill)]
    fills: Vec<ScheduledOp>,
    /// Empty a tank: TANK@TICK
    #[arg(long = "drain", value_parser = parse_drain)]
    drains: Vec<ScheduledOp>,
    /// Set or clear a setpoint: TANK=PCT@TICK or TANK=none@TICK
    #[arg(long = "target", value_parser = parse_target)]
    targets: Vec<ScheduledOp>,
    /// Pace ticks at the configured tick period instead of running flat out
    #[arg(long)]
    realtime: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum DocFormat {
    Yaml,
    Json,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() -> CliResult<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Validate { project_path } => cmd_validate(&project_path),
        Commands::Reference { format } => cmd_reference(format),
        Commands::Run(args) => cmd_run(args),
    }
}

fn cmd_validate(project_path: &Path) -> CliResult<()> {
    println!("Validating cascade: {}", project_path.display());
    let project = tc_project::load(project_path)?;
    // Catches what the schema checks cannot, such as routes the builder rejects.
    compile_cascade(&project.cascade)?;
    println!(
        "✓ '{}' is valid ({} tanks, {} stages)",
        project.name,
        project.cascade.tanks.len(),
        project.cascade.stages.len()
    );
    Ok(())
}

fn cmd_reference(format: DocFormat) -> CliResult<()> {
    let project = Project::reference();
    let text = match format {
        DocFormat::Yaml => serde_yaml::to_string(&project)?,
        DocFormat::Json => serde_json::to_string_pretty(&project)?,
    };
    println!("{text}");
    Ok(())
}

fn cmd_run(args: RunArgs) -> CliResult<()> {
    if args.every == 0 {
        return Err(CliError::InvalidArg {
            what: "--every must be at least 1".to_string(),
        });
    }

    let project = match &args.project_path {
        Some(path) => tc_project::load(path)?,
        None => Project::reference(),
    };
    let compiled = compile_cascade(&project.cascade)?;

    let scheduled = args
        .fills
        .iter()
        .chain(&args.drains)
        .chain(&args.targets)
        .cloned()
        .collect();
    let mut queue = OpQueue::resolve(scheduled, &compiled)?;
    let mut session = compiled.into_session()?;

    info!(name = %project.name, ticks = args.ticks, realtime = args.realtime, "run started");
    emit(session.controller(), args.format)?;

    let mut last_printed = 0;
    if args.realtime {
        run_paced(&mut session, &mut queue, args.ticks, |controller, before| {
            let after = controller.ticks();
            if after / args.every > before / args.every {
                emit(controller, args.format)?;
                last_printed = after;
            }
            Ok(())
        })?;
    } else {
        while session.controller().ticks() < args.ticks {
            queue.apply_due(session.controller_mut())?;
            let report = session.step();
            if report.tick % args.every == 0 {
                emit(session.controller(), args.format)?;
                last_printed = report.tick;
            }
        }
    }

    let controller = session.controller();
    if controller.ticks() != last_printed {
        emit(controller, args.format)?;
    }
    if !queue.is_empty() {
        warn!("some manual operations were scheduled after the last tick");
    }
    info!(
        ticks = controller.ticks(),
        total_volume = controller.total_volume(),
        "run finished"
    );
    Ok(())
}

/// Tick at the session's period in wall-clock time until `ticks` have run.
///
/// `on_batch` sees the controller after each batch of ticks together with
/// the tick count before the batch. A stalled host catches up, but never
/// past `ticks`.
fn run_paced(
    session: &mut Session,
    queue: &mut OpQueue,
    ticks: u64,
    mut on_batch: impl FnMut(&CascadeController, u64) -> CliResult<()>,
) -> CliResult<()> {
    let origin = Instant::now();
    let elapsed_ms = || origin.elapsed().as_secs_f64() * 1000.0;
    session.start(elapsed_ms());
    while session.controller().ticks() < ticks {
        queue.apply_due(session.controller_mut())?;
        let wait = session.clock().time_until_tick(elapsed_ms());
        if wait > 0.0 {
            std::thread::sleep(Duration::from_secs_f64(wait / 1000.0));
        }
        let before = session.controller().ticks();
        let remaining = usize::try_from(ticks - before).unwrap_or(usize::MAX);
        if !session.advance_at_most(elapsed_ms(), remaining).is_empty() {
            on_batch(session.controller(), before)?;
        }
    }
    session.stop();
    Ok(())
}

fn emit(controller: &CascadeController, format: OutputFormat) -> CliResult<()> {
    let snapshot = controller.snapshot();
    match format {
        OutputFormat::Text => println!("{}", render::render_line(&snapshot)),
        OutputFormat::Json => println!("{}", serde_json::to_string(&snapshot)?),
    }
    Ok(())
}
