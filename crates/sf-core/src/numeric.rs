use crate::CoreError;

/// Floating point type used throughout system
pub type Real = f64;

/// `v` itself when finite, `NonFinite` naming `what` otherwise.
pub fn ensure_finite(v: Real, what: &'static str) -> Result<Real, CoreError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(CoreError::NonFinite { what, value: v })
    }
}

/// `n` evenly spaced samples over `[start, stop]`, both ends included.
pub fn linspace(start: Real, stop: Real, n: usize) -> Vec<Real> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (n - 1) as Real;
            (0..n)
                .map(|i| if i == n - 1 { stop } else { start + step * i as Real })
                .collect()
        }
    }
}

/// Min and max of a slice, ignoring non-finite entries.
pub fn finite_bounds(values: impl IntoIterator<Item = Real>) -> Option<(Real, Real)> {
    values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}
