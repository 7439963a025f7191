//! Exact rational representation of floating-point inputs.
//!
//! The checker works over rationals, so every number crosses the bridge as a
//! `{num, den}` pair: the closest fraction to the binary value of the float
//! whose denominator does not exceed [`MAX_DENOMINATOR`].

use serde::{Deserialize, Serialize};

use crate::error::{VerifyError, VerifyResult};

pub const MAX_DENOMINATOR: u64 = 1_000_000;

/// A reduced fraction with a positive denominator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rational {
    pub num: i64,
    pub den: u64,
}

impl Rational {
    pub fn to_f64(self) -> f64 {
        self.num as f64 / self.den as f64
    }
}

/// Closest fraction to `value` with denominator at most [`MAX_DENOMINATOR`].
pub fn to_rational(value: f64) -> VerifyResult<Rational> {
    limit_denominator(value, MAX_DENOMINATOR)
}

/// Best rational approximation of `value` with denominator at most `max_den`.
///
/// Walks the continued fraction of the exact binary value and picks between
/// the last convergent and the best semiconvergent, ties going to the
/// convergent.
pub fn limit_denominator(value: f64, max_den: u64) -> VerifyResult<Rational> {
    let non_representable = || VerifyError::NonRepresentable { value };
    if !value.is_finite() || max_den == 0 {
        return Err(non_representable());
    }
    if value == 0.0 {
        return Ok(Rational { num: 0, den: 1 });
    }

    let negative = value < 0.0;
    let (n, d) = match exact_parts(value.abs()) {
        Some(parts) => parts,
        // Below 2^-74 the nearest candidate is always 0/1.
        None => return Ok(Rational { num: 0, den: 1 }),
    };
    let (p, q) = best_fraction(n, d, u128::from(max_den));

    let magnitude = i64::try_from(p).map_err(|_| non_representable())?;
    let den = u64::try_from(q).map_err(|_| non_representable())?;
    Ok(Rational {
        num: if negative { -magnitude } else { magnitude },
        den,
    })
}

/// Positive finite `x` as a reduced `n / d` with `d` a power of two.
///
/// `None` when the denominator would not fit in 128 bits.
fn exact_parts(x: f64) -> Option<(u128, u128)> {
    let bits = x.to_bits();
    let exponent = ((bits >> 52) & 0x7ff) as i32;
    let fraction = bits & ((1u64 << 52) - 1);
    let (mantissa, exponent) = if exponent == 0 {
        (fraction, -1074)
    } else {
        (fraction | (1u64 << 52), exponent - 1075)
    };

    let shift = mantissa.trailing_zeros() as i32;
    let mantissa = u128::from(mantissa >> shift);
    let exponent = exponent + shift;

    if exponent >= 0 {
        // Values past 2^74 are rejected later by the i64 conversion.
        let e = u32::try_from(exponent).ok()?.min(74);
        return Some((mantissa << e, 1));
    }
    let e = u32::try_from(-exponent).ok()?;
    if e > 126 {
        return None;
    }
    Some((mantissa, 1u128 << e))
}

fn best_fraction(n: u128, d: u128, max_den: u128) -> (u128, u128) {
    if d <= max_den {
        return (n, d);
    }

    let (mut p0, mut q0, mut p1, mut q1) = (0u128, 1u128, 1u128, 0u128);
    let (mut num, mut den) = (n, d);
    while den != 0 {
        let a = num / den;
        let q2 = match a.checked_mul(q1).and_then(|aq| aq.checked_add(q0)) {
            Some(q2) if q2 <= max_den => q2,
            _ => break,
        };
        (p0, q0, p1, q1) = (p1, q1, p0 + a * p1, q2);
        (num, den) = (den, num - a * den);
    }

    let k = (max_den - q0) / q1;
    let semi = (p0 + k * p1, q0 + k * q1);
    // The convergent p1/q1 wins when it is at least as close as the semiconvergent.
    if den.saturating_mul(2).saturating_mul(semi.1) <= d {
        (p1, q1)
    } else {
        semi
    }
}
