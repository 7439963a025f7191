mod error;
mod gallery;

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use sf_core::Trajectory;
use sf_plot::{PlotConfig, PlotterRegistry, RenderOptions, SaveFormat, render_solution};
use sf_results::{RunManifest, RunStore, compute_run_id, export_csv};
use sf_sim::{Method, Solution, SolveOptions, solve_ode};
use sf_systems::SystemKind;
use sf_verify::{DecaySerializer, LeanClient};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::error::{CliError, CliResult};

#[derive(Parser)]
#[command(name = "synthforge")]
#[command(about = "Solve and plot dynamical systems", long_about = None)]
struct Cli {
    /// More log output (-v debug, -vv trace); RUST_LOG takes precedence
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the built-in systems
    Systems,
    /// Print the symbolic right-hand side of a system
    Equations {
        /// System name (lorenz, pendulum, decay, blowup)
        system: SystemKind,
    },
    /// Integrate a system and print a summary
    Solve {
        #[command(flatten)]
        solve: SolveArgs,
        /// Write the trajectory as CSV
        #[arg(long)]
        csv: Option<PathBuf>,
        /// Write the trajectory as JSON
        #[arg(long)]
        json: Option<PathBuf>,
        /// Store the run under this directory
        #[arg(long)]
        store: Option<PathBuf>,
    },
    /// Integrate a system and save a plot of the trajectory
    Plot {
        #[command(flatten)]
        solve: SolveArgs,
        /// Axis labels, comma separated
        #[arg(long, value_delimiter = ',')]
        labels: Option<Vec<String>>,
        #[arg(long)]
        title: Option<String>,
        /// Plot configuration YAML; omitted fields take their defaults
        #[arg(long)]
        config: Option<PathBuf>,
        /// Output file; the extension picks the format when recognized
        #[arg(long)]
        out: PathBuf,
    },
    /// Regenerate the reference picture set
    Gallery {
        #[arg(long, default_value = "gallery")]
        out_dir: PathBuf,
        /// Plot configuration YAML replacing the gallery defaults
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// List stored runs of a system
    Runs {
        /// Run store directory
        store: PathBuf,
        system: SystemKind,
    },
    /// Check the canonical decay case with the Lean verifier
    VerifyDecay {
        /// Lean project directory
        #[arg(long)]
        lean_dir: PathBuf,
        /// Timeout in seconds
        #[arg(long)]
        timeout: Option<f64>,
        /// Log the verifier's input and output at debug level
        #[arg(long)]
        log_io: bool,
    },
}

#[derive(Args)]
struct SolveArgs {
    /// System name (lorenz, pendulum, decay, blowup)
    system: SystemKind,
    /// Start time (defaults per system)
    #[arg(long, allow_hyphen_values = true)]
    t0: Option<f64>,
    /// End time (defaults per system)
    #[arg(long, allow_hyphen_values = true)]
    tf: Option<f64>,
    /// Initial state, comma separated
    #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
    y0: Option<Vec<f64>>,
    #[arg(long, default_value = "RK45")]
    method: Method,
    /// Do not retry with the stiff method on failure
    #[arg(long)]
    no_fallback: bool,
    #[arg(long)]
    rtol: Option<f64>,
    #[arg(long)]
    atol: Option<f64>,
}

/// A solve request with every default filled in.
struct SolveRequest {
    system: SystemKind,
    t_span: (f64, f64),
    y0: Vec<f64>,
    options: SolveOptions,
}

impl SolveArgs {
    fn resolve(&self) -> SolveRequest {
        let (t0, tf) = self.system.default_t_span();
        let mut options = SolveOptions::default().with_method(self.method);
        if self.no_fallback {
            options = options.without_fallback();
        }
        if let Some(rtol) = self.rtol {
            options.rtol = rtol;
        }
        if let Some(atol) = self.atol {
            options.atol = atol;
        }
        SolveRequest {
            system: self.system,
            t_span: (self.t0.unwrap_or(t0), self.tf.unwrap_or(tf)),
            y0: self
                .y0
                .clone()
                .unwrap_or_else(|| self.system.default_initial_state()),
            options,
        }
    }
}

impl SolveRequest {
    fn run(&self) -> CliResult<Solution> {
        let system = self.system.build();
        Ok(solve_ode(&system, self.t_span, &self.y0, &self.options)?)
    }

    fn run_id(&self, method: Method) -> CliResult<String> {
        let params = serde_json::to_string(&self.system)?;
        Ok(compute_run_id(
            self.system.name(),
            &params,
            &self.y0,
            self.t_span,
            method.name(),
        ))
    }
}

fn main() -> CliResult<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Systems => cmd_systems(),
        Commands::Equations { system } => cmd_equations(system),
        Commands::Solve {
            solve,
            csv,
            json,
            store,
        } => cmd_solve(
            &solve.resolve(),
            csv.as_deref(),
            json.as_deref(),
            store.as_deref(),
        ),
        Commands::Plot {
            solve,
            labels,
            title,
            config,
            out,
        } => cmd_plot(&solve.resolve(), labels, title, config.as_deref(), &out),
        Commands::Gallery { out_dir, config } => {
            let config = match config {
                Some(path) => load_plot_config(&path)?,
                None => gallery::default_config(),
            };
            gallery::generate(&out_dir, &config)
        }
        Commands::Runs { store, system } => cmd_runs(&store, system),
        Commands::VerifyDecay {
            lean_dir,
            timeout,
            log_io,
        } => cmd_verify_decay(lean_dir, timeout, log_io),
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with_target(false)
        .init();
}

fn load_plot_config(path: &Path) -> CliResult<PlotConfig> {
    let text = fs::read_to_string(path)?;
    serde_yaml::from_str(&text).map_err(|source| CliError::Config {
        path: path.to_path_buf(),
        source,
    })
}

fn cmd_systems() -> CliResult<()> {
    println!("Available systems:");
    for kind in SystemKind::ALL {
        let (t0, tf) = kind.default_t_span();
        println!(
            "  {:<9} {}D  {}  (y0 = {:?}, t = {} .. {})",
            kind.name(),
            kind.dimension(),
            kind.description(),
            kind.default_initial_state(),
            t0,
            tf
        );
    }
    Ok(())
}

fn cmd_equations(system: SystemKind) -> CliResult<()> {
    match system.equations() {
        Some(equations) => {
            println!("{}:", system.description());
            for (var, rhs) in equations.iter() {
                println!("  d{var}/dt = {rhs}");
            }
        }
        None => println!("{} has no symbolic form", system.name()),
    }
    Ok(())
}

fn cmd_solve(
    request: &SolveRequest,
    csv: Option<&Path>,
    json: Option<&Path>,
    store: Option<&Path>,
) -> CliResult<()> {
    println!(
        "Solving {} over t = {} .. {} with {}",
        request.system, request.t_span.0, request.t_span.1, request.options.method
    );
    let solution = request.run()?;
    let method = solution.method;

    println!("✓ {} ({})", solution.message, method);
    println!("  Samples: {}", solution.t.len());
    println!("  RHS evaluations: {}", solution.nfev);
    if let Some(y) = solution.final_state() {
        let values: Vec<String> = y.iter().map(|v| format!("{v:.6}")).collect();
        println!("  Final state: [{}]", values.join(", "));
    }

    let success = solution.success;
    let message = solution.message.clone();
    let trajectory = solution.into_trajectory();

    if let Some(path) = csv {
        let labels = state_labels(request.system);
        export_csv(&trajectory, &labels, BufWriter::new(File::create(path)?))?;
        println!("✓ Wrote {}", path.display());
    }

    if let Some(path) = json {
        serde_json::to_writer(BufWriter::new(File::create(path)?), &trajectory)?;
        println!("✓ Wrote {}", path.display());
    }

    if let Some(dir) = store {
        let store = RunStore::new(dir)?;
        let run_id = request.run_id(method)?;
        let manifest = RunManifest::for_trajectory(
            &run_id,
            request.system.name(),
            method.name(),
            &trajectory,
            success,
            message,
        );
        store.save_run(&manifest, &trajectory)?;
        println!("✓ Stored run {run_id}");
    }
    Ok(())
}

/// Column names for exported states.
fn state_labels(system: SystemKind) -> Vec<String> {
    if system.dimension() == 1 {
        // 1-D defaults are (time, value) axis labels.
        system.default_labels().into_iter().skip(1).collect()
    } else {
        system.default_labels()
    }
}

fn cmd_plot(
    request: &SolveRequest,
    labels: Option<Vec<String>>,
    title: Option<String>,
    config: Option<&Path>,
    out: &Path,
) -> CliResult<()> {
    let config = match config {
        Some(path) => load_plot_config(path)?,
        None => PlotConfig::default(),
    };
    let format = out
        .extension()
        .and_then(|ext| ext.to_str())
        .and_then(|ext| ext.parse::<SaveFormat>().ok())
        .unwrap_or(config.save_format);

    let trajectory: Trajectory = request.run()?.into_trajectory();
    let opts = RenderOptions {
        labels: Some(labels.unwrap_or_else(|| request.system.default_labels())),
        title: Some(title.unwrap_or_else(|| request.system.description().to_string())),
        save_path: None,
        config: Some(config),
    };
    let figure = render_solution(&PlotterRegistry::new(), &trajectory, &opts)?;
    figure.save_as(out, format)?;
    info!(plotter = figure.plotter_name(), "plot written");
    println!("✓ Saved {}", out.display());
    Ok(())
}

fn cmd_runs(store: &Path, system: SystemKind) -> CliResult<()> {
    let store = RunStore::new(store)?;
    let runs = store.list_runs(system.name())?;

    if runs.is_empty() {
        println!("No stored runs found for system: {}", system);
    } else {
        println!("Stored runs for system '{}':", system);
        for manifest in runs {
            println!(
                "  {} ({}, {}, {} samples{})",
                manifest.run_id,
                manifest.timestamp,
                manifest.method,
                manifest.samples,
                if manifest.success { "" } else { ", failed" }
            );
        }
    }
    Ok(())
}

fn cmd_verify_decay(lean_dir: PathBuf, timeout: Option<f64>, log_io: bool) -> CliResult<()> {
    let timeout = match timeout {
        Some(secs) if secs.is_finite() && secs >= 0.0 => Some(Duration::from_secs_f64(secs)),
        Some(secs) => return Err(CliError::InvalidArg(format!("timeout {secs} is not a duration"))),
        None => None,
    };

    let decay = SystemKind::Decay;
    let serializer = DecaySerializer::new(&sf_systems::DecaySystem::default())?;
    let payload = serializer.canonical_json()?;
    let client = LeanClient::new(lean_dir).with_log_io(log_io);

    println!("Verifying {} with {}", decay.description(), client.executable().display());
    let result = client.verify_decay(&payload, timeout)?;
    if result.success {
        println!("✓ {}", result.message);
    } else {
        println!("✗ {}", result.message);
        if let Some(code) = &result.error_code {
            println!("  Error code: {code}");
        }
        if let Some(details) = &result.details {
            println!("  Details: {details}");
        }
    }
    Ok(())
}
