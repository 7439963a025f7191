//! Reference pictures covering every plotter variant.

use std::fs;
use std::path::Path;

use sf_core::Trajectory;
use sf_plot::{
    Aspect, Curve, PlotConfig, PlotterRegistry, RenderOptions, parse_color, render_solution,
};
use sf_sim::{OdeSystem, SolveOptions, solve_ode};
use sf_systems::{DampedPendulum, DecaySystem, LorenzSystem};
use tracing::info;

use crate::error::CliResult;

pub fn default_config() -> PlotConfig {
    PlotConfig {
        figsize: (12.0, 10.0),
        dpi: 200,
        show_grid: true,
        ..PlotConfig::default()
    }
}

fn solve<S: OdeSystem>(system: &S, t_span: (f64, f64), y0: &[f64]) -> CliResult<Trajectory> {
    Ok(solve_ode(system, t_span, y0, &SolveOptions::default())?.into_trajectory())
}

fn first_rows(trajectory: &Trajectory, n: usize) -> Trajectory {
    Trajectory {
        times: trajectory.times.clone(),
        states: trajectory.states.rows(0, n).into_owned(),
    }
}

pub fn generate(out_dir: &Path, config: &PlotConfig) -> CliResult<()> {
    fs::create_dir_all(out_dir)?;
    let registry = PlotterRegistry::new();
    let ext = config.save_format.extension();
    let mut written = 0usize;

    let mut save = |trajectory: &Trajectory,
                    labels: &[&str],
                    title: &str,
                    name: &str,
                    config: &PlotConfig| {
        let path = out_dir.join(format!("{name}.{ext}"));
        let opts = RenderOptions::default()
            .with_labels(labels.iter().copied())
            .with_title(title)
            .with_save_path(&path)
            .with_config(config.clone());
        let figure = render_solution(&registry, trajectory, &opts)?;
        println!("  ✓ {}", path.display());
        written += 1;
        Ok::<_, crate::error::CliError>(figure)
    };

    println!("Generating Lorenz system plots...");
    let regimes = [
        ("chaotic", 28.0, (0.0, 40.0)),
        ("stable", 0.5, (0.0, 20.0)),
        ("convective", 5.0, (0.0, 30.0)),
    ];
    for (regime, rho, t_span) in regimes {
        let lorenz = LorenzSystem::new(10.0, rho, 8.0 / 3.0);
        let trajectory = solve(&lorenz, t_span, &[1.0, 1.0, 1.0])?;
        save(
            &trajectory,
            &["x", "y", "z"],
            &format!("Lorenz Attractor ({regime} system)"),
            &format!("lorenz_{regime}_3d"),
            config,
        )?;
        save(
            &first_rows(&trajectory, 2),
            &["x", "y"],
            &format!("Lorenz Attractor ({regime} 2D projection)"),
            &format!("lorenz_{regime}_2d"),
            config,
        )?;
    }

    println!("Generating damped pendulum plot...");
    let pendulum = DampedPendulum::with_damping(0.5);
    let trajectory = solve(&pendulum, (0.0, 20.0), &[std::f64::consts::FRAC_PI_4, 0.0])?;
    let equal = PlotConfig {
        aspect: Aspect::Equal,
        ..config.clone()
    };
    save(
        &trajectory,
        &["theta (rad)", "omega (rad/s)"],
        "Damped Pendulum (b=0.5)",
        "pendulum",
        &equal,
    )?;

    println!("Generating decay plot...");
    let decay = DecaySystem::new(1.0);
    let x0 = 5.0;
    let trajectory = solve(&decay, (0.0, 5.0), &[x0])?;
    let mut figure = save(
        &trajectory,
        &["Time (s)", "x(t)"],
        "Exponential Decay (lambda=1.0)",
        "decay",
        config,
    )?;
    drop(save);

    // Analytic solution on top of the numerical one.
    let red = parse_color("r", figure.theme())?;
    figure.add_curve(Curve {
        points: trajectory
            .times
            .iter()
            .map(|&t| (t, decay.analytic(x0, t)))
            .collect(),
        color: red,
        alpha: 0.7,
        width: (config.points_to_px(2.0).round() as u32).max(1),
        label: Some("Analytic".to_string()),
    })?;
    figure.save(out_dir.join(format!("decay.{ext}")))?;

    info!(count = written, dir = %out_dir.display(), "gallery complete");
    println!("\nGallery complete: {written} plots in {}", out_dir.display());
    Ok(())
}
