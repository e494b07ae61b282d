//! Term ordering and numerator/denominator split shared by the printers.

use num_bigint::BigInt;
use num_traits::{One, Signed, ToPrimitive, Zero};

use crate::eval::evaluate;
use crate::expr::{Expr, Rational};
use crate::simplify::{flatten_mul, flatten_sum, split_coeff};

use super::pretty::pretty;

/// Terms of a sum in display order.
///
/// Each term is read as a monomial over generators (symbols, then sums and roots, then
/// functions) and the highest power of the leading generator comes first. Numeric factors act
/// as the coefficient and order terms of equal monomial, so a sum without symbols reads
/// `1 + sqrt(2)`. A positive number plus one negated factor reads number first: `1 - x**2`.
pub(crate) fn ordered_terms(expr: &Expr) -> Vec<Expr> {
    let terms = flatten_sum(expr);
    if let Some(pair) = number_first(&terms) {
        return pair;
    }

    let monomials: Vec<Monomial> = terms.iter().map(Monomial::of).collect();
    let mut gens: Vec<&Expr> = monomials
        .iter()
        .flat_map(|m| m.powers.iter().map(|(gen, _)| gen))
        .collect();
    gens.sort_by_cached_key(|gen| class_key(gen));
    gens.dedup();
    let exponents: Vec<Vec<Rational>> = monomials
        .iter()
        .map(|m| gens.iter().map(|gen| m.exponent(gen)).collect())
        .collect();

    let mut order: Vec<usize> = (0..terms.len()).collect();
    order.sort_by(|&a, &b| {
        exponents[b]
            .cmp(&exponents[a])
            .then(monomials[a].coeff.total_cmp(&monomials[b].coeff))
    });
    order.into_iter().map(|i| terms[i].clone()).collect()
}

fn number_first(terms: &[Expr]) -> Option<Vec<Expr>> {
    let [a, b] = terms else {
        return None;
    };
    let (number, other) = match (is_positive_number(a), is_positive_number(b)) {
        (true, false) => (a, b),
        (false, true) => (b, a),
        _ => return None,
    };
    let (coeff, rest) = split_coeff(other);
    let single = !rest.is_one() && flatten_mul(&rest).len() == 1;
    (coeff.is_negative() && single).then(|| vec![number.clone(), other.clone()])
}

fn is_positive_number(expr: &Expr) -> bool {
    match expr {
        Expr::Constant(c) => c.is_positive(),
        Expr::Pi => true,
        Expr::Exp(arg) => arg.is_one(),
        _ => false,
    }
}

struct Monomial {
    powers: Vec<(Expr, Rational)>,
    coeff: f64,
}

impl Monomial {
    fn of(term: &Expr) -> Self {
        let (c, rest) = split_coeff(term);
        let mut coeff = c.to_f64().unwrap_or(0.0);
        let mut powers = Vec::new();
        for factor in flatten_mul(&rest) {
            if factor.free_symbols().is_empty() {
                coeff *= evaluate(&factor, &[]).unwrap_or(1.0);
            } else {
                powers.push(generator_power(factor));
            }
        }
        Monomial { powers, coeff }
    }

    fn exponent(&self, gen: &Expr) -> Rational {
        self.powers
            .iter()
            .filter(|(g, _)| g == gen)
            .fold(Rational::zero(), |acc, (_, e)| acc + e)
    }
}

/// `x**(3/2)` is the generator `sqrt(x)` cubed; symbolic powers are generators of their own.
fn generator_power(factor: Expr) -> (Expr, Rational) {
    if let Expr::Pow(base, exp) = &factor {
        if let Some(e) = exp.as_constant() {
            if e.is_integer() {
                return ((**base).clone(), e.clone());
            }
            let root = Rational::new(BigInt::one(), e.denom().clone());
            let gen = Expr::Pow(base.clone(), Expr::Constant(root).boxed());
            return (gen, Rational::from_integer(e.numer().clone()));
        }
    }
    (factor, Rational::one())
}

/// Sort class of a factor: numbers, symbols by name, sums, powers, then functions in the
/// order `exp`, `log`, `sin`, `cos`, `tan`, the hyperbolics and the rest.
fn class_key(expr: &Expr) -> (u8, u16, String) {
    match expr {
        Expr::Pi | Expr::Constant(_) => (1, 0, String::new()),
        Expr::Exp(arg) if arg.as_constant().is_some() => (1, 0, String::new()),
        Expr::Variable(name) => (2, 0, name.clone()),
        Expr::Mul(..) | Expr::Div(..) | Expr::Neg(_) => (3, 0, pretty(expr)),
        Expr::Add(..) | Expr::Sub(..) => (3, 1, pretty(expr)),
        Expr::Pow(..) => (3, 2, pretty(expr)),
        other => {
            let rank = match other {
                Expr::Exp(_) => 10,
                Expr::Log(_) => 11,
                Expr::Sin(_) => 20,
                Expr::Cos(_) => 21,
                Expr::Tan(_) => 22,
                Expr::Sinh(_) => 30,
                Expr::Cosh(_) => 31,
                Expr::Tanh(_) => 32,
                _ => 10_000,
            };
            (4, rank, pretty(other))
        }
    }
}

/// A product laid out as `sign * coefficient * numerator / denominator`.
pub(crate) struct Fraction {
    pub negative: bool,
    pub numer_coeff: BigInt,
    pub denom_coeff: BigInt,
    pub numer: Vec<Expr>,
    pub denom: Vec<Expr>,
}

impl Fraction {
    pub(crate) fn of(expr: &Expr) -> Self {
        let mut coeff = Rational::one();
        let mut numer = Vec::new();
        let mut denom = Vec::new();
        collect(expr, false, &mut coeff, &mut numer, &mut denom);
        numer.sort_by_cached_key(factor_key);
        denom.sort_by_cached_key(factor_key);
        Fraction {
            negative: coeff.is_negative(),
            numer_coeff: coeff.numer().abs(),
            denom_coeff: coeff.denom().clone(),
            numer,
            denom,
        }
    }

    pub(crate) fn is_negative_term(expr: &Expr) -> bool {
        match expr {
            Expr::Constant(c) => c.is_negative(),
            Expr::Add(..) | Expr::Sub(..) => false,
            other => Fraction::of(other).negative,
        }
    }
}

fn collect(
    expr: &Expr,
    inverted: bool,
    coeff: &mut Rational,
    numer: &mut Vec<Expr>,
    denom: &mut Vec<Expr>,
) {
    match expr {
        Expr::Constant(c) => {
            if inverted && !c.is_zero() {
                *coeff /= c;
            } else {
                *coeff *= c;
            }
        }
        Expr::Neg(inner) => {
            *coeff = -coeff.clone();
            collect(inner, inverted, coeff, numer, denom);
        }
        Expr::Mul(a, b) => {
            collect(a, inverted, coeff, numer, denom);
            collect(b, inverted, coeff, numer, denom);
        }
        Expr::Div(a, b) => {
            collect(a, inverted, coeff, numer, denom);
            collect(b, !inverted, coeff, numer, denom);
        }
        Expr::Pow(base, exp) if exp.as_constant().is_some_and(|e| e.is_negative()) => {
            let positive = match exp.as_constant() {
                Some(e) if (-e).is_one() => (**base).clone(),
                Some(e) => Expr::Pow(base.clone(), Expr::Constant(-e).boxed()),
                None => (**base).clone(),
            };
            if inverted { numer } else { denom }.push(positive);
        }
        other => {
            if inverted { denom } else { numer }.push(other.clone());
        }
    }
}

/// Factors sort by their base: `2*x**2*y*sin(x)*cos(x)`.
fn factor_key(factor: &Expr) -> (u8, u16, String) {
    match factor {
        Expr::Pow(base, _) => class_key(base),
        other => class_key(other),
    }
}
