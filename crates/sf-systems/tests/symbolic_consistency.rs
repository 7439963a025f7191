//! Symbolic equations agree with the numeric right-hand sides, and the
//! per-instance cache behaves.

use nalgebra::DVector;
use proptest::prelude::*;
use sf_sim::OdeSystem;
use sf_systems::pendulum::PendulumParams;
use sf_systems::{DampedPendulum, DecaySystem, LorenzSystem, SymbolicSystem};

fn assert_agrees<S: OdeSystem + SymbolicSystem>(system: &S, state: &[f64]) {
    let numeric = system
        .rhs(0.0, &DVector::from_column_slice(state))
        .unwrap();
    let symbolic = system.symbolic_equations().evaluate(state).unwrap();
    for (a, b) in numeric.iter().zip(&symbolic) {
        assert!(
            (a - b).abs() <= 1e-12 * (1.0 + a.abs()),
            "numeric {a} vs symbolic {b}"
        );
    }
}

proptest! {
    #[test]
    fn lorenz_symbolic_matches_rhs(
        sigma in 0.1..20.0_f64,
        rho in 0.1..50.0_f64,
        beta in 0.1..5.0_f64,
        x in -30.0..30.0_f64,
        y in -30.0..30.0_f64,
        z in 0.0..60.0_f64,
    ) {
        assert_agrees(&LorenzSystem::new(sigma, rho, beta), &[x, y, z]);
    }

    #[test]
    fn pendulum_symbolic_matches_rhs(
        damping in 0.0..2.0_f64,
        length in 0.1..5.0_f64,
        theta in -6.3..6.3_f64,
        omega in -10.0..10.0_f64,
    ) {
        let sys = DampedPendulum::new(PendulumParams {
            damping,
            length,
            ..PendulumParams::default()
        });
        assert_agrees(&sys, &[theta, omega]);
    }

    #[test]
    fn decay_symbolic_matches_rhs(lambda in -3.0..3.0_f64, x in -100.0..100.0_f64) {
        assert_agrees(&DecaySystem::new(lambda), &[x]);
    }
}

#[test]
fn state_variables_match_equation_order() {
    let sys = LorenzSystem::default();
    let names: Vec<&str> = sys.symbolic_equations().iter().map(|(n, _)| n).collect();
    assert_eq!(names, sys.state_variables());

    let pendulum = DampedPendulum::default();
    assert_eq!(pendulum.state_variables(), &["theta", "omega"]);
}

#[test]
fn cache_is_built_once_per_instance() {
    let sys = DecaySystem::new(2.0);
    let first = sys.symbolic_equations() as *const _;
    let second = sys.symbolic_equations() as *const _;
    assert_eq!(first, second);
}

#[test]
fn instances_have_independent_caches() {
    let a = DecaySystem::new(1.0);
    let b = DecaySystem::new(3.0);
    assert_eq!(a.symbolic_equations().get("x").unwrap().to_string(), "-1*x");
    assert_eq!(b.symbolic_equations().get("x").unwrap().to_string(), "-3*x");
    assert!(!std::ptr::eq(a.symbolic_equations(), b.symbolic_equations()));
}

#[test]
fn concurrent_first_access_sees_one_value() {
    let sys = LorenzSystem::default();
    let ptrs: Vec<usize> = std::thread::scope(|s| {
        let handles: Vec<_> = (0..8)
            .map(|_| s.spawn(|| sys.symbolic_equations() as *const _ as usize))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });
    assert!(ptrs.windows(2).all(|w| w[0] == w[1]));
}
