//! Content-based hashing for run IDs.

use sha2::{Digest, Sha256};

/// Stable id for a solve request: the same inputs always map to the same run.
///
/// `params_json` is the system's parameter set as serialized by the caller.
pub fn compute_run_id(
    system_id: &str,
    params_json: &str,
    y0: &[f64],
    t_span: (f64, f64),
    method: &str,
) -> String {
    let mut hasher = Sha256::new();

    hasher.update(system_id.as_bytes());
    hasher.update([0]);
    hasher.update(params_json.as_bytes());
    hasher.update([0]);
    for v in y0 {
        hasher.update(v.to_le_bytes());
    }
    hasher.update([0]);
    hasher.update(t_span.0.to_le_bytes());
    hasher.update(t_span.1.to_le_bytes());
    hasher.update(method.as_bytes());

    let result = hasher.finalize();
    format!("{:x}", result)
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn initial_state_changes_the_id(
            y0 in prop::collection::vec(-1e6_f64..1e6_f64, 1..4),
            bump in 1e-3_f64..1.0,
        ) {
            let a = compute_run_id("decay", "{}", &y0, (0.0, 1.0), "RK45");
            let mut moved = y0.clone();
            moved[0] += bump;
            let b = compute_run_id("decay", "{}", &moved, (0.0, 1.0), "RK45");
            prop_assert_eq!(a.len(), 64);
            prop_assert_ne!(a, b);
        }
    }
}
