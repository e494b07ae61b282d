//! Exact trigonometric values at rational multiples of pi with denominators 1, 2, 3, 4 and 6.

use crate::expr::{one, zero, Expr, Rational};
use num_traits::{One, Zero};

use super::rules::{canon_product, simplify_div, simplify_neg, simplify_pow, term_from};

/// Reference angles in `[0, 1/2]` (as multiples of pi) with a known sine.
const REFERENCE: [(i64, i64); 5] = [(0, 1), (1, 6), (1, 4), (1, 3), (1, 2)];

fn frac(n: i64, d: i64) -> Rational {
    Rational::new(n.into(), d.into())
}

fn sin_of_reference(r: &Rational) -> Option<Expr> {
    let half_root = |n: i64| canon_product(vec![Expr::constant(1, 2), root(n)]);
    Some(if r.is_zero() {
        zero()
    } else if *r == frac(1, 6) {
        Expr::constant(1, 2)
    } else if *r == frac(1, 4) {
        half_root(2)
    } else if *r == frac(1, 3) {
        half_root(3)
    } else if *r == frac(1, 2) {
        one()
    } else {
        return None;
    })
}

fn root(n: i64) -> Expr {
    simplify_pow(Expr::integer(n), Expr::constant(1, 2))
}

/// `sin(k*pi)` when it has a closed form.
pub(crate) fn sin_of_pi_multiple(k: &Rational) -> Option<Expr> {
    let two = Rational::from_integer(2.into());
    let mut r = k - (k / &two).floor() * &two;
    let mut negative = false;
    if r >= Rational::one() {
        r -= Rational::one();
        negative = true;
    }
    if r > frac(1, 2) {
        r = Rational::one() - r;
    }
    let value = sin_of_reference(&r)?;
    Some(if negative { simplify_neg(value) } else { value })
}

pub(crate) fn cos_of_pi_multiple(k: &Rational) -> Option<Expr> {
    sin_of_pi_multiple(&(k + frac(1, 2)))
}

/// `tan(k*pi)`; `None` at the poles as well as for unknown angles.
pub(crate) fn tan_of_pi_multiple(k: &Rational) -> Option<Expr> {
    let cos = cos_of_pi_multiple(k)?;
    if cos.is_zero() {
        return None;
    }
    Some(simplify_div(sin_of_pi_multiple(k)?, cos))
}

/// `asin(value)` for a value in the table, as a multiple of pi in `[0, 1/2]`.
pub(crate) fn asin_of(value: &Expr) -> Option<Expr> {
    REFERENCE.iter().find_map(|&(n, d)| {
        let angle = frac(n, d);
        (sin_of_reference(&angle).as_ref() == Some(value)).then(|| term_from(angle, Expr::Pi))
    })
}

/// `atan(value)` for a value in the table.
pub(crate) fn atan_of(value: &Expr) -> Option<Expr> {
    REFERENCE[..4].iter().find_map(|&(n, d)| {
        let angle = frac(n, d);
        (tan_of_pi_multiple(&angle).as_ref() == Some(value)).then(|| term_from(angle, Expr::Pi))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sine_table_covers_all_quadrants() {
        assert_eq!(sin_of_pi_multiple(&frac(1, 6)), Some(Expr::constant(1, 2)));
        assert_eq!(sin_of_pi_multiple(&frac(7, 6)), Some(Expr::constant(-1, 2)));
        assert_eq!(sin_of_pi_multiple(&frac(3, 2)), Some(Expr::integer(-1)));
        assert_eq!(cos_of_pi_multiple(&frac(1, 1)), Some(Expr::integer(-1)));
        assert_eq!(sin_of_pi_multiple(&frac(1, 5)), None);
    }

    #[test]
    fn tangent_has_poles() {
        assert_eq!(tan_of_pi_multiple(&frac(1, 2)), None);
        assert_eq!(tan_of_pi_multiple(&frac(1, 4)), Some(Expr::integer(1)));
    }
}
