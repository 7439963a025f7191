//! Pick a plotter from the trajectory shape and render with it.

use nalgebra::DMatrix;
use sf_core::Trajectory;
use tracing::debug;

use crate::error::PlotResult;
use crate::figure::Figure;
use crate::plotter::RenderOptions;
use crate::registry::PlotterRegistry;

/// Render with the plotter registered for `states.nrows()` dimensions.
pub fn render_trajectory(
    registry: &PlotterRegistry,
    times: &[f64],
    states: &DMatrix<f64>,
    opts: &RenderOptions,
) -> PlotResult<Figure> {
    let dimensions = states.nrows();
    let plotter = registry.resolve(dimensions)?;
    debug!(
        dimensions,
        samples = times.len(),
        plotter = plotter.name(),
        "dispatching trajectory plot"
    );
    plotter.render(times, states, opts)
}

pub fn render_solution(
    registry: &PlotterRegistry,
    trajectory: &Trajectory,
    opts: &RenderOptions,
) -> PlotResult<Figure> {
    render_trajectory(registry, &trajectory.times, &trajectory.states, opts)
}
