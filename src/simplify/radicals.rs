//! Exact rational powers of rational numbers.

use crate::expr::{zero, Expr, Rational};
use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{One, Signed, ToPrimitive, Zero};

use super::rules::canon_product;

const TRIAL_DIVISION_LIMIT: u64 = 100_000;

/// Rewrite `base^exp` for a non-integer rational `exp`, pulling perfect powers out of the root
/// and moving the radical into the numerator. Returns `None` when nothing can be simplified.
pub(crate) fn rational_power(base: &Rational, exp: &Rational) -> Option<Expr> {
    if base.is_zero() {
        return exp.is_positive().then(zero);
    }
    if base.is_negative() {
        return None;
    }

    let q = exp.denom().to_u32()?;
    let p = exp.numer().clone();
    let k = p.div_floor(&BigInt::from(q));
    let r = (&p - &k * BigInt::from(q)).to_u32()?;
    let k = k.to_i32()?;

    let (n_out, n_in) = extract_root(base.numer(), q);
    let (d_out, d_in) = extract_root(base.denom(), q);

    if k == 0 && n_out.is_one() && d_out.is_one() && d_in.is_one() {
        return None;
    }

    // base^(r/q) = n_out^r * n_in^(r/q) / (d_out^r * d_in) * d_in^((q-r)/q)
    let whole = integer_power(base, k);
    let outside = Rational::new(n_out.pow(r), d_out.pow(r) * &d_in);
    let mut factors = vec![Expr::Constant(whole * outside)];
    if !n_in.is_one() {
        factors.push(Expr::Pow(
            Expr::Constant(Rational::from_integer(n_in)).boxed(),
            Expr::constant(r, q).boxed(),
        ));
    }
    if !d_in.is_one() {
        factors.push(Expr::Pow(
            Expr::Constant(Rational::from_integer(d_in)).boxed(),
            Expr::constant(q - r, q).boxed(),
        ));
    }
    Some(canon_product(factors))
}

/// `log(value)/log(base)` when both are rational powers of a common root, e.g. `3` for `8`
/// over `2` and `-1/2` for `1/2` over `4`.
pub(crate) fn exact_log(base: &Rational, value: &Rational) -> Option<Rational> {
    if !base.is_positive() || !value.is_positive() || base.is_one() {
        return None;
    }
    if value.is_one() {
        return Some(Rational::zero());
    }
    let (base_root, base_exp) = perfect_power(base)?;
    let (value_root, value_exp) = perfect_power(value)?;
    let ratio = Rational::new(value_exp.into(), base_exp.into());
    if base_root == value_root {
        Some(ratio)
    } else if base_root == value_root.recip() {
        Some(-ratio)
    } else {
        None
    }
}

/// `q = root^m` with the largest such `m`.
fn perfect_power(q: &Rational) -> Option<(Rational, u32)> {
    let numer = q.numer().to_u64()?;
    let denom = q.denom().to_u64()?;
    let found = (2..=64u32).rev().find_map(|m| {
        let n = exact_root(numer, m)?;
        let d = exact_root(denom, m)?;
        Some((Rational::new(n.into(), d.into()), m))
    });
    Some(found.unwrap_or_else(|| (q.clone(), 1)))
}

fn integer_power(base: &Rational, k: i32) -> Rational {
    let power = k.unsigned_abs();
    let numer = base.numer().pow(power);
    let denom = base.denom().pow(power);
    if k >= 0 {
        Rational::new(numer, denom)
    } else {
        Rational::new(denom, numer)
    }
}

/// Split `m` into `(outside, inside)` with `m = outside^q * inside`.
fn extract_root(m: &BigInt, q: u32) -> (BigInt, BigInt) {
    let Some(mut rest) = m.to_u64() else {
        return (BigInt::one(), m.clone());
    };
    let mut outside: u64 = 1;
    let mut inside: u64 = 1;
    let mut p: u64 = 2;
    while p <= TRIAL_DIVISION_LIMIT && p * p <= rest {
        if rest % p == 0 {
            let mut count = 0u32;
            while rest % p == 0 {
                rest /= p;
                count += 1;
            }
            outside *= p.pow(count / q);
            inside *= p.pow(count % q);
        }
        p += 1;
    }
    match exact_root(rest, q) {
        Some(root) => outside *= root,
        None => inside *= rest,
    }
    (BigInt::from(outside), BigInt::from(inside))
}

fn exact_root(n: u64, q: u32) -> Option<u64> {
    if n <= 1 {
        return Some(n);
    }
    let guess = (n as f64).powf(1.0 / q as f64).round() as u64;
    (guess.saturating_sub(1)..=guess + 1)
        .find(|candidate| candidate.checked_pow(q) == Some(n))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_square_factors() {
        assert_eq!(extract_root(&BigInt::from(8), 2), (BigInt::from(2), BigInt::from(2)));
        assert_eq!(extract_root(&BigInt::from(72), 2), (BigInt::from(6), BigInt::from(2)));
        assert_eq!(extract_root(&BigInt::from(7), 2), (BigInt::from(1), BigInt::from(7)));
        assert_eq!(extract_root(&BigInt::from(27), 3), (BigInt::from(3), BigInt::from(1)));
    }

    #[test]
    fn logarithm_of_common_powers_is_exact() {
        let r = |n: i64, d: i64| Rational::new(n.into(), d.into());
        assert_eq!(exact_log(&r(2, 1), &r(8, 1)), Some(r(3, 1)));
        assert_eq!(exact_log(&r(8, 1), &r(4, 1)), Some(r(2, 3)));
        assert_eq!(exact_log(&r(4, 1), &r(1, 2)), Some(r(-1, 2)));
        assert_eq!(exact_log(&r(9, 4), &r(27, 8)), Some(r(3, 2)));
        assert_eq!(exact_log(&r(2, 1), &r(1, 1)), Some(r(0, 1)));
        assert_eq!(exact_log(&r(2, 1), &r(3, 1)), None);
        assert_eq!(exact_log(&r(2, 1), &r(-8, 1)), None);
    }

    #[test]
    fn square_root_of_perfect_square_is_exact() {
        let four = Rational::from_integer(4.into());
        let half = Rational::new(1.into(), 2.into());
        assert_eq!(rational_power(&four, &half), Some(Expr::integer(2)));
        let two = Rational::from_integer(2.into());
        assert_eq!(rational_power(&two, &half), None);
    }
}
