//! Dense univariate polynomials over exact rationals or symbolic coefficients.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use crate::expr::{Expr, Rational};
use crate::simplify::{canon_sum, simplify_add, simplify_mul, simplify_neg, simplify_pow, term_from};
use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{One, Signed, ToPrimitive, Zero};

/// Coefficients past this magnitude are not searched for rational roots.
const MAX_ROOT_SEARCH: u64 = 1_000_000_000_000;

pub trait CoeffOps: Clone {
    fn zero() -> Self;
    fn one() -> Self;
    fn is_zero(&self) -> bool;
    fn is_one(&self) -> bool;
    fn add(&self, other: &Self) -> Self;
    fn mul(&self, other: &Self) -> Self;
    fn neg(&self) -> Self;
    fn from_usize(n: usize) -> Self;
}

impl CoeffOps for Rational {
    fn zero() -> Self {
        Zero::zero()
    }

    fn one() -> Self {
        One::one()
    }

    fn is_zero(&self) -> bool {
        Zero::is_zero(self)
    }

    fn is_one(&self) -> bool {
        One::is_one(self)
    }

    fn add(&self, other: &Self) -> Self {
        self + other
    }

    fn mul(&self, other: &Self) -> Self {
        self * other
    }

    fn neg(&self) -> Self {
        -self.clone()
    }

    fn from_usize(n: usize) -> Self {
        Rational::from_integer(BigInt::from(n))
    }
}

/// Symbolic coefficients stay canonical after every operation.
impl CoeffOps for Expr {
    fn zero() -> Self {
        crate::expr::zero()
    }

    fn one() -> Self {
        crate::expr::one()
    }

    fn is_zero(&self) -> bool {
        Expr::is_zero(self)
    }

    fn is_one(&self) -> bool {
        Expr::is_one(self)
    }

    fn add(&self, other: &Self) -> Self {
        simplify_add(self.clone(), other.clone())
    }

    fn mul(&self, other: &Self) -> Self {
        simplify_mul(self.clone(), other.clone())
    }

    fn neg(&self) -> Self {
        simplify_neg(self.clone())
    }

    fn from_usize(n: usize) -> Self {
        Expr::integer(n)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Polynomial<C> {
    pub(crate) coeffs: BTreeMap<usize, C>,
}

pub type Poly = Polynomial<Rational>;

impl<C: CoeffOps> Polynomial<C> {
    pub fn zero() -> Self {
        Polynomial {
            coeffs: BTreeMap::new(),
        }
    }

    pub fn one() -> Self {
        Polynomial::from_constant(C::one())
    }

    pub fn from_constant(c: C) -> Self {
        Polynomial::monomial(c, 0)
    }

    pub fn monomial(c: C, power: usize) -> Self {
        let mut coeffs = BTreeMap::new();
        if !c.is_zero() {
            coeffs.insert(power, c);
        }
        Polynomial { coeffs }
    }

    /// The polynomial `x`.
    pub fn identity() -> Self {
        Polynomial::monomial(C::one(), 1)
    }

    pub fn degree(&self) -> Option<usize> {
        self.coeffs.keys().next_back().copied()
    }

    pub fn leading_coeff(&self) -> C {
        self.coeffs.values().next_back().cloned().unwrap_or_else(C::zero)
    }

    pub fn is_zero(&self) -> bool {
        self.coeffs.is_empty()
    }

    pub fn coeff(&self, power: usize) -> C {
        self.coeffs.get(&power).cloned().unwrap_or_else(C::zero)
    }

    pub fn coeff_entries(&self) -> impl Iterator<Item = (usize, C)> + '_ {
        self.coeffs.iter().map(|(e, c)| (*e, c.clone()))
    }

    pub fn pow(&self, exp: usize) -> Self {
        let mut result = Polynomial::one();
        let mut base = self.clone();
        let mut n = exp;
        while n > 0 {
            if n % 2 == 1 {
                result = result * base.clone();
            }
            base = base.clone() * base;
            n /= 2;
        }
        result
    }

    pub fn scale(&self, k: &C) -> Self {
        let coeffs = self
            .coeffs
            .iter()
            .map(|(exp, coeff)| (*exp, coeff.mul(k)))
            .filter(|(_, c)| !c.is_zero())
            .collect();
        Polynomial { coeffs }
    }

    pub fn derivative(&self) -> Self {
        let coeffs = self
            .coeffs
            .iter()
            .filter(|(exp, _)| **exp > 0)
            .map(|(exp, coeff)| (exp - 1, coeff.mul(&C::from_usize(*exp))))
            .filter(|(_, c)| !c.is_zero())
            .collect();
        Polynomial { coeffs }
    }

    fn accumulate(coeffs: &mut BTreeMap<usize, C>, exp: usize, coeff: C) {
        if coeff.is_zero() {
            return;
        }
        match coeffs.entry(exp) {
            Entry::Vacant(entry) => {
                entry.insert(coeff);
            }
            Entry::Occupied(mut entry) => {
                let updated = entry.get().add(&coeff);
                if updated.is_zero() {
                    entry.remove();
                } else {
                    *entry.get_mut() = updated;
                }
            }
        }
    }
}

impl<C: CoeffOps> std::ops::Add for Polynomial<C> {
    type Output = Polynomial<C>;
    fn add(self, rhs: Polynomial<C>) -> Polynomial<C> {
        let mut coeffs = self.coeffs;
        for (exp, coeff) in rhs.coeffs {
            Polynomial::accumulate(&mut coeffs, exp, coeff);
        }
        Polynomial { coeffs }
    }
}

impl<C: CoeffOps> std::ops::Sub for Polynomial<C> {
    type Output = Polynomial<C>;
    fn sub(self, rhs: Polynomial<C>) -> Polynomial<C> {
        self + (-rhs)
    }
}

impl<C: CoeffOps> std::ops::Mul for Polynomial<C> {
    type Output = Polynomial<C>;
    fn mul(self, rhs: Polynomial<C>) -> Polynomial<C> {
        let mut coeffs = BTreeMap::new();
        for (exp_a, coeff_a) in &self.coeffs {
            for (exp_b, coeff_b) in &rhs.coeffs {
                Polynomial::accumulate(&mut coeffs, exp_a + exp_b, coeff_a.mul(coeff_b));
            }
        }
        Polynomial { coeffs }
    }
}

impl<C: CoeffOps> std::ops::Neg for Polynomial<C> {
    type Output = Polynomial<C>;
    fn neg(self) -> Polynomial<C> {
        let coeffs = self
            .coeffs
            .into_iter()
            .map(|(exp, coeff)| (exp, coeff.neg()))
            .collect();
        Polynomial { coeffs }
    }
}

impl Polynomial<Rational> {
    /// Read a polynomial with rational coefficients in `var`. Any other symbol, transcendental
    /// constant, negative or fractional power of `var` makes this fail.
    pub fn from_expr(expr: &Expr, var: &str) -> Option<Self> {
        match expr {
            Expr::Variable(v) if v == var => Some(Polynomial::identity()),
            Expr::Constant(c) => Some(Polynomial::from_constant(c.clone())),
            Expr::Add(a, b) => Some(Self::from_expr(a, var)? + Self::from_expr(b, var)?),
            Expr::Sub(a, b) => Some(Self::from_expr(a, var)? - Self::from_expr(b, var)?),
            Expr::Mul(a, b) => Some(Self::from_expr(a, var)? * Self::from_expr(b, var)?),
            Expr::Div(a, b) => {
                let denom = b.as_constant().filter(|c| !Zero::is_zero(*c))?;
                Some(Self::from_expr(a, var)?.scale(&denom.recip()))
            }
            Expr::Neg(inner) => Some(-Self::from_expr(inner, var)?),
            Expr::Pow(base, exp) => {
                let power = exp
                    .as_constant()
                    .filter(|c| c.is_integer() && !c.is_negative())?
                    .to_integer()
                    .to_usize()?;
                Some(Self::from_expr(base, var)?.pow(power))
            }
            _ => None,
        }
    }

    pub fn monic(&self) -> Self {
        let lc = self.leading_coeff();
        if Zero::is_zero(&lc) {
            return self.clone();
        }
        self.scale(&lc.recip())
    }

    pub fn evaluate(&self, x: &Rational) -> Rational {
        // Horner from the leading term down.
        let Some(degree) = self.degree() else {
            return Zero::zero();
        };
        (0..=degree)
            .rev()
            .fold(<Rational as Zero>::zero(), |acc, exp| acc * x + self.coeff(exp))
    }

    pub fn div_rem(&self, divisor: &Self) -> (Self, Self) {
        let Some(divisor_degree) = divisor.degree() else {
            return (Polynomial::zero(), self.clone());
        };
        let divisor_lc = divisor.leading_coeff();
        let mut remainder = self.clone();
        let mut quotient = Polynomial::zero();

        while let Some(r_deg) = remainder.degree() {
            if r_deg < divisor_degree {
                break;
            }
            let term = Polynomial::monomial(
                remainder.leading_coeff() / &divisor_lc,
                r_deg - divisor_degree,
            );
            quotient = quotient + term.clone();
            remainder = remainder - term * divisor.clone();
        }

        (quotient, remainder)
    }

    pub fn div_exact(&self, divisor: &Self) -> Option<Self> {
        let (q, r) = self.div_rem(divisor);
        r.is_zero().then_some(q)
    }

    pub fn gcd(a: &Poly, b: &Poly) -> Poly {
        let mut r0 = a.clone();
        let mut r1 = b.clone();
        while !r1.is_zero() {
            let (_, r) = r0.div_rem(&r1);
            r0 = r1;
            r1 = r;
        }
        r0.monic()
    }

    /// Integer content and primitive part, with the primitive part's leading coefficient positive.
    pub fn content_and_primitive_part(&self) -> (Rational, Self) {
        if self.is_zero() {
            return (Zero::zero(), Polynomial::zero());
        }
        let lcm = self
            .coeffs
            .values()
            .fold(BigInt::one(), |acc, c| acc.lcm(c.denom()));
        let scaled: BTreeMap<usize, BigInt> = self
            .coeffs
            .iter()
            .map(|(exp, c)| (*exp, (c * Rational::from_integer(lcm.clone())).to_integer()))
            .collect();
        let gcd = scaled
            .values()
            .fold(BigInt::zero(), |acc, n| acc.gcd(n));

        let mut content = Rational::new(gcd.clone(), lcm);
        let mut primitive = Polynomial {
            coeffs: scaled
                .into_iter()
                .map(|(exp, n)| (exp, Rational::from_integer(n / &gcd)))
                .collect(),
        };
        if primitive.leading_coeff().is_negative() {
            primitive = -primitive;
            content = -content;
        }
        (content, primitive)
    }

    /// All distinct rational roots, in ascending order.
    pub fn rational_roots(&self) -> Vec<Rational> {
        let mut roots = Vec::new();
        if self.is_zero() {
            return roots;
        }
        let (_, mut p) = self.content_and_primitive_part();

        let lowest = p.coeffs.keys().next().copied().unwrap_or(0);
        if lowest > 0 {
            roots.push(<Rational as Zero>::zero());
            p = Polynomial {
                coeffs: p.coeffs.into_iter().map(|(e, c)| (e - lowest, c)).collect(),
            };
        }
        if p.degree().unwrap_or(0) == 0 {
            return roots;
        }

        let (Some(a0), Some(an)) = (
            p.coeff(0).to_integer().abs().to_u64(),
            p.leading_coeff().to_integer().abs().to_u64(),
        ) else {
            return roots;
        };
        if a0 > MAX_ROOT_SEARCH || an > MAX_ROOT_SEARCH {
            return roots;
        }

        for num in divisors(a0) {
            for den in divisors(an) {
                let candidate = Rational::new(BigInt::from(num), BigInt::from(den));
                for value in [candidate.clone(), -candidate] {
                    if Zero::is_zero(&p.evaluate(&value)) && !roots.contains(&value) {
                        roots.push(value);
                    }
                }
            }
        }
        roots.sort();
        roots
    }

    pub fn to_expr(&self, var: &str) -> Expr {
        canon_sum(
            self.coeffs
                .iter()
                .map(|(exp, coeff)| term_from(coeff.clone(), var_power(var, *exp)))
                .collect(),
        )
    }
}

impl Polynomial<Expr> {
    /// Read a polynomial in `var` whose coefficients may be any expression free of `var`.
    pub fn from_expr(expr: &Expr, var: &str) -> Option<Self> {
        if !expr.contains_var(var) {
            return Some(Polynomial::from_constant(expr.clone()));
        }

        match expr {
            Expr::Variable(name) if name == var => Some(Polynomial::identity()),
            Expr::Neg(inner) => Some(-Self::from_expr(inner, var)?),
            Expr::Add(a, b) => Some(Self::from_expr(a, var)? + Self::from_expr(b, var)?),
            Expr::Sub(a, b) => Some(Self::from_expr(a, var)? - Self::from_expr(b, var)?),
            Expr::Mul(a, b) => Some(Self::from_expr(a, var)? * Self::from_expr(b, var)?),
            Expr::Div(a, b) if !b.contains_var(var) => {
                let scale = simplify_pow((**b).clone(), Expr::integer(-1));
                Some(Self::from_expr(a, var)?.scale(&scale))
            }
            Expr::Pow(base, exp) => {
                let power = exp
                    .as_constant()
                    .filter(|c| c.is_integer() && !c.is_negative())?
                    .to_integer()
                    .to_usize()?;
                Some(Self::from_expr(base, var)?.pow(power))
            }
            _ => None,
        }
    }

    /// Rational view when every coefficient is a number.
    pub fn to_rational(&self) -> Option<Poly> {
        let coeffs = self
            .coeffs
            .iter()
            .map(|(exp, c)| c.as_constant().map(|r| (*exp, r.clone())))
            .collect::<Option<BTreeMap<_, _>>>()?;
        Some(Polynomial { coeffs })
    }

    /// Antiderivative with zero constant term.
    pub fn integral(&self) -> Self {
        let coeffs = self
            .coeffs
            .iter()
            .map(|(exp, coeff)| {
                let divisor = Rational::from_integer(BigInt::from(exp + 1));
                (exp + 1, simplify_mul(coeff.clone(), Expr::Constant(divisor.recip())))
            })
            .collect();
        Polynomial { coeffs }
    }

    pub fn to_expr(&self, var: &str) -> Expr {
        canon_sum(
            self.coeffs
                .iter()
                .map(|(exp, coeff)| simplify_mul(coeff.clone(), var_power(var, *exp)))
                .collect(),
        )
    }
}

fn var_power(var: &str, exp: usize) -> Expr {
    match exp {
        0 => crate::expr::one(),
        1 => Expr::var(var),
        _ => Expr::Pow(Expr::var(var).boxed(), Expr::integer(exp).boxed()),
    }
}

fn divisors(n: u64) -> Vec<u64> {
    if n == 0 {
        return vec![1];
    }
    let mut small = Vec::new();
    let mut large = Vec::new();
    let mut d = 1u64;
    while d * d <= n {
        if n % d == 0 {
            small.push(d);
            if d * d != n {
                large.push(n / d);
            }
        }
        d += 1;
    }
    small.extend(large.into_iter().rev());
    small
}
