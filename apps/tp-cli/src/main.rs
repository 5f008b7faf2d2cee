use clap::{ArgAction, Args, Parser, Subcommand};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tp_app::{
    AppResult, RunOptions, RunProgressEvent, RunRequest, RunStage, ScenarioOverrides,
    SweepParameter, project_service, query, run_service, sweep_service,
};
use tp_sim::SweepDefinition;
use tracing::Level;

#[derive(Parser)]
#[command(name = "tp-cli")]
#[command(about = "thermopot CLI - heating a fluid in a vessel, with ice addition", long_about = None)]
struct Cli {
    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug, Default)]
struct OverrideArgs {
    /// Time step in seconds
    #[arg(long)]
    dt: Option<f64>,
    /// Target temperature in °C
    #[arg(long)]
    target: Option<f64>,
    /// Ambient temperature in °C
    #[arg(long)]
    ambient: Option<f64>,
    /// Disable heat loss to the surroundings
    #[arg(long)]
    no_heat_loss: bool,
}

impl OverrideArgs {
    fn to_overrides(&self) -> ScenarioOverrides {
        ScenarioOverrides {
            time_step_s: self.dt,
            target_temp_c: self.target,
            ambient_temp_c: self.ambient,
            include_heat_loss: self.no_heat_loss.then_some(false),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a scenario file
    Validate {
        /// Path to the scenario file (YAML or JSON)
        scenario_path: PathBuf,
    },
    /// Rewrite a scenario at the latest version, as YAML or JSON by extension
    Convert {
        /// Path to the scenario file (YAML or JSON)
        scenario_path: PathBuf,
        /// Output path; `.json` writes JSON, anything else YAML
        output: PathBuf,
    },
    /// Heat a scenario to its target temperature
    Run {
        /// Path to the scenario file (YAML or JSON)
        scenario_path: PathBuf,
        #[command(flatten)]
        overrides: OverrideArgs,
        /// Skip cache and force re-run
        #[arg(long)]
        no_cache: bool,
    },
    /// List cached runs stored next to a scenario
    Runs {
        /// Path to the scenario file
        scenario_path: PathBuf,
        /// Only runs of the scenario with this name
        #[arg(long)]
        name: Option<String>,
    },
    /// Show details of a cached run
    ShowRun {
        /// Path to the scenario file
        scenario_path: PathBuf,
        /// Run ID to display
        run_id: String,
        /// Also report when the fluid first reached this temperature (°C)
        #[arg(long)]
        time_to: Option<f64>,
    },
    /// Export the temperature series of a run as CSV
    ExportSeries {
        /// Path to the scenario file
        scenario_path: PathBuf,
        /// Run ID
        run_id: String,
        /// Output CSV file path (optional, defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// List the events recorded during a run
    Events {
        /// Path to the scenario file
        scenario_path: PathBuf,
        /// Run ID
        run_id: String,
        /// Only events of this kind (e.g. ice_added, melting_started)
        #[arg(long)]
        kind: Option<String>,
    },
    /// Sweep one scenario parameter and report time to target per point
    Sweep {
        /// Path to the scenario file
        scenario_path: PathBuf,
        /// wall-thickness, ambient, initial-temp, power or ice-mass
        parameter: String,
        /// First sweep value
        #[arg(long)]
        start: f64,
        /// Last sweep value
        #[arg(long)]
        end: f64,
        /// Number of points, at least 2
        #[arg(long, default_value_t = 5)]
        points: usize,
        #[command(flatten)]
        overrides: OverrideArgs,
    },
}

fn main() -> AppResult<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    match cli.command {
        Commands::Validate { scenario_path } => cmd_validate(&scenario_path),
        Commands::Convert {
            scenario_path,
            output,
        } => cmd_convert(&scenario_path, &output),
        Commands::Run {
            scenario_path,
            overrides,
            no_cache,
        } => cmd_run(&scenario_path, overrides.to_overrides(), !no_cache),
        Commands::Runs {
            scenario_path,
            name,
        } => cmd_runs(&scenario_path, name.as_deref()),
        Commands::ShowRun {
            scenario_path,
            run_id,
            time_to,
        } => cmd_show_run(&scenario_path, &run_id, time_to),
        Commands::ExportSeries {
            scenario_path,
            run_id,
            output,
        } => cmd_export_series(&scenario_path, &run_id, output.as_deref()),
        Commands::Events {
            scenario_path,
            run_id,
            kind,
        } => cmd_events(&scenario_path, &run_id, kind.as_deref()),
        Commands::Sweep {
            scenario_path,
            parameter,
            start,
            end,
            points,
            overrides,
        } => cmd_sweep(
            &scenario_path,
            &parameter,
            start,
            end,
            points,
            overrides.to_overrides(),
        ),
    }
}

fn init_tracing(verbose: u8, quiet: bool) {
    let level = if quiet {
        Level::ERROR
    } else {
        match verbose {
            0 => Level::WARN,
            1 => Level::INFO,
            2 => Level::DEBUG,
            _ => Level::TRACE,
        }
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();
}

fn cmd_validate(scenario_path: &Path) -> AppResult<()> {
    println!("Validating scenario: {}", scenario_path.display());
    let scenario = project_service::load_scenario(scenario_path)?;
    project_service::validate_scenario(&scenario)?;
    let summary = project_service::summarize_scenario(&scenario)?;

    println!("✓ Scenario is valid");
    println!("  Name:   {}", summary.name);
    println!(
        "  Fluid:  {} ({:.1} cm³, {:.3} kg)",
        summary.fluid,
        summary.fluid_volume_m3 * 1.0e6,
        summary.fluid_mass_kg
    );
    match summary.wall_diffusivity_m2_s {
        Some(alpha) => println!("  Wall:   {} (diffusivity {:.3e} m²/s)", summary.material, alpha),
        None => println!("  Wall:   none"),
    }
    println!(
        "  Heater: {:.1} W, loss coefficient {:.3} W/K",
        summary.heater_power_w, summary.loss_coefficient_w_per_k
    );
    println!("  Target: {:.1} °C", summary.target_temp_c);
    if let Some(mass) = summary.ice_mass_kg {
        println!("  Ice:    {:.1} g", mass * 1000.0);
    }
    Ok(())
}

fn cmd_convert(scenario_path: &Path, output: &Path) -> AppResult<()> {
    let scenario = project_service::load_scenario(scenario_path)?;
    project_service::save_scenario(output, &scenario)?;
    println!(
        "✓ Wrote {} (version {}) to {}",
        scenario.name,
        scenario.version,
        output.display()
    );
    Ok(())
}

fn cmd_run(scenario_path: &Path, overrides: ScenarioOverrides, use_cache: bool) -> AppResult<()> {
    println!("Running scenario: {}", scenario_path.display());

    let request = RunRequest {
        scenario_path,
        overrides,
        options: RunOptions {
            use_cache,
            ..RunOptions::default()
        },
    };

    let mut last_emit = Instant::now();
    let mut last_fraction = -1.0f64;
    let mut last_stage = None;
    let response = run_service::ensure_run_with_progress(
        &request,
        Some(&mut |event| {
            let fraction = event
                .simulation
                .as_ref()
                .map(|s| s.fraction_complete)
                .unwrap_or(-1.0);
            let emit_now = last_stage.as_ref() != Some(&event.stage)
                || (fraction >= 0.0 && (fraction - last_fraction).abs() >= 0.005)
                || last_emit.elapsed().as_millis() >= 100;
            if emit_now {
                render_cli_progress(&event);
                if fraction >= 0.0 {
                    last_fraction = fraction;
                }
                last_stage = Some(event.stage.clone());
                last_emit = Instant::now();
            }
        }),
    )?;
    clear_progress_line();

    if response.loaded_from_cache {
        println!("✓ Loaded from cache: {}", response.run_id);
    } else {
        println!("✓ Simulation completed: {}", response.run_id);
    }

    let manifest = &response.manifest;
    println!(
        "  Reached {:.2} °C after {:.1} s ({} steps)",
        manifest.final_temperature_c, manifest.elapsed_s, manifest.steps
    );
    if let Some(ice) = &manifest.ice {
        println!(
            "  Ice: {} ({:.1} g of {:.1} g left, {:.1} cm³ water added)",
            ice.phase,
            ice.remaining_kg * 1000.0,
            ice.initial_mass_kg * 1000.0,
            ice.added_volume_m3 * 1.0e6
        );
    }

    print_timing_summary(&response.timing);
    Ok(())
}

fn clear_progress_line() {
    print!("\r{}\r", " ".repeat(120));
    let _ = io::stdout().flush();
}

fn render_cli_progress(event: &RunProgressEvent) {
    match (&event.stage, &event.simulation) {
        (RunStage::Simulating, Some(s)) => {
            let width = 28usize;
            let filled = ((s.fraction_complete * width as f64).round() as usize).min(width);
            let bar = format!(
                "{}{}",
                "#".repeat(filled),
                "-".repeat(width.saturating_sub(filled))
            );
            print!(
                "\r[{}] {:>6.2}%  T={:.2}/{:.2}°C  t={:.0}s  step={}  ice={}  elapsed={:.1}s",
                bar,
                s.fraction_complete * 100.0,
                s.temperature_c,
                s.target_temp_c,
                s.elapsed_s,
                s.step,
                s.ice_phase,
                event.elapsed_wall_s
            );
        }
        _ => {
            let spinner = ['|', '/', '-', '\\'];
            let spin_idx = ((event.elapsed_wall_s * 10.0) as usize) % spinner.len();
            let mut line = format!(
                "\r{} {}  elapsed={:.2}s",
                spinner[spin_idx],
                event.stage.label(),
                event.elapsed_wall_s
            );
            if let Some(msg) = &event.message {
                line.push_str(&format!("  {}", msg));
            }
            print!("{}", line);
        }
    }
    let _ = io::stdout().flush();
}

fn print_timing_summary(timing: &tp_app::RunTimingSummary) {
    let total = timing.total_time_s.max(1.0e-12);

    println!("\nTiming summary:");
    println!(
        "  Load:     {:.3}s ({:.1}%)",
        timing.load_time_s,
        100.0 * timing.load_time_s / total
    );
    if timing.load_cache_time_s > 0.0 {
        println!("  Cache:    {:.3}s", timing.load_cache_time_s);
    } else {
        println!(
            "  Simulate: {:.3}s ({:.1}%)",
            timing.simulate_time_s,
            100.0 * timing.simulate_time_s / total
        );
        println!(
            "  Save:     {:.3}s ({:.1}%)",
            timing.save_time_s,
            100.0 * timing.save_time_s / total
        );
    }
    println!("  Total:    {:.3}s", timing.total_time_s);
    println!("  Steps:    {}", timing.steps);
}

fn cmd_runs(scenario_path: &Path, name: Option<&str>) -> AppResult<()> {
    let runs = run_service::list_runs(scenario_path, name)?;

    if runs.is_empty() {
        println!("No cached runs found");
    } else {
        println!("Cached runs:");
        for manifest in runs {
            println!(
                "  {} {} ({}, {:.2} °C at {:.1} s)",
                manifest.run_id,
                manifest.scenario_name,
                manifest.timestamp,
                manifest.final_temperature_c,
                manifest.elapsed_s
            );
        }
    }
    Ok(())
}

fn cmd_show_run(scenario_path: &Path, run_id: &str, time_to: Option<f64>) -> AppResult<()> {
    println!("Loading run: {}", run_id);

    let (manifest, records) = run_service::load_run(scenario_path, run_id)?;
    let summary = query::get_run_summary(&records)?;

    println!("\nRun Summary:");
    println!("  Scenario:   {}", manifest.scenario_name);
    println!("  Created:    {}", manifest.timestamp);
    println!("  Engine:     {}", manifest.engine_version);
    println!(
        "  Time step:  {:.3} s, target {:.1} °C",
        manifest.time_step_s, manifest.target_temp_c
    );
    println!("  Points:     {}", summary.record_count);
    println!(
        "  Time range: {:.1} - {:.1} s",
        summary.time_range.0, summary.time_range.1
    );
    println!(
        "  Temperature: {:.2} °C -> {:.2} °C (min {:.2}, max {:.2})",
        summary.start_temperature_c,
        summary.final_temperature_c,
        summary.min_temperature_c,
        summary.max_temperature_c
    );
    if let Some(ice) = &manifest.ice {
        match ice.triggered_at_s {
            Some(t) => println!("  Ice:        {} (added at {:.1} s)", ice.phase, t),
            None => println!("  Ice:        {}", ice.phase),
        }
        println!(
            "              {:.1} g left of {:.1} g, {:.1} cm³ water added",
            ice.remaining_kg * 1000.0,
            ice.initial_mass_kg * 1000.0,
            ice.added_volume_m3 * 1.0e6
        );
    }

    if let Some(temperature) = time_to {
        match query::time_to_reach(&records, temperature) {
            Some(t) => println!("\n  Reached {:.2} °C at {:.1} s", temperature, t),
            None => println!("\n  Never reached {:.2} °C", temperature),
        }
    }

    Ok(())
}

fn cmd_export_series(scenario_path: &Path, run_id: &str, output: Option<&Path>) -> AppResult<()> {
    let (_manifest, records) = run_service::load_run(scenario_path, run_id)?;

    if let Some(path) = output {
        query::write_series_csv(path, &records)?;
        println!(
            "✓ Exported {} data points to {}",
            records.len(),
            path.display()
        );
    } else {
        print!("{}", query::series_to_csv(&records));
    }

    Ok(())
}

fn cmd_events(scenario_path: &Path, run_id: &str, kind: Option<&str>) -> AppResult<()> {
    let events = run_service::load_run_events(scenario_path, run_id)?;
    let selected = query::filter_events(&events, kind);

    if selected.is_empty() {
        println!("No events recorded");
    } else {
        for event in selected {
            println!("  {:>10.1} s  {:<16} {}", event.time_s, event.kind, event.message);
        }
    }
    Ok(())
}

fn cmd_sweep(
    scenario_path: &Path,
    parameter: &str,
    start: f64,
    end: f64,
    points: usize,
    overrides: ScenarioOverrides,
) -> AppResult<()> {
    let parameter: SweepParameter = parameter.parse()?;
    let definition = SweepDefinition::linear(start, end, points)?;

    let mut scenario = project_service::load_scenario(scenario_path)?;
    project_service::apply_overrides(&mut scenario, &overrides);

    println!(
        "Sweeping {} from {} to {} {} ({} points)",
        parameter,
        start,
        end,
        parameter.unit(),
        points
    );
    let report = sweep_service::run_parameter_sweep(&scenario, parameter, &definition)?;

    for outcome in &report.outcomes {
        match &outcome.result {
            Ok(run) => println!(
                "  {:>12.4} {}  {:>9.1} s  {:>7.2} °C",
                outcome.value,
                parameter.unit(),
                run.elapsed_s,
                run.final_temperature_c
            ),
            Err(message) => println!(
                "  {:>12.4} {}  failed: {}",
                outcome.value,
                parameter.unit(),
                message
            ),
        }
    }

    let stats = &report.stats;
    println!(
        "\n{} succeeded, {} failed",
        stats.successes, stats.failures
    );
    if let (Some(min), Some(mean), Some(max)) = (stats.min_time_s, stats.mean_time_s, stats.max_time_s)
    {
        println!(
            "Time to target: min {:.1} s, mean {:.1} s, max {:.1} s",
            min, mean, max
        );
    }
    Ok(())
}
