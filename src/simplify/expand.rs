use crate::expr::{Expr, Rational};
use crate::polynomial::Poly;
use num_traits::{One, Signed, ToPrimitive};

use super::rules::{
    canon_product, canon_sum, flatten_mul, flatten_sum, is_sum, mk_mul_list, simplify, simplify_mul,
    simplify_neg, simplify_pow, split_coeff, term_from,
};

/// Largest integer power of a sum that gets multiplied out.
const MAX_EXPAND_POWER: u32 = 12;
/// Products with more terms than this stay factored.
const MAX_EXPANDED_TERMS: usize = 512;

/// Distribute products and small positive integer powers over sums.
pub fn expand(expr: Expr) -> Expr {
    match expr {
        Expr::Add(..) | Expr::Sub(..) => {
            canon_sum(flatten_sum(&expr).into_iter().map(expand).collect())
        }
        Expr::Neg(inner) => simplify_neg(expand(*inner)),
        Expr::Mul(..) => {
            let factors: Vec<Expr> = flatten_mul(&expr).into_iter().map(expand).collect();
            distribute(factors).unwrap_or(expr)
        }
        Expr::Pow(base, exp) => {
            let base = expand(*base);
            let power = exp
                .as_constant()
                .filter(|e| e.is_integer() && e.is_positive())
                .and_then(|e| e.to_integer().to_u32())
                .filter(|p| *p <= MAX_EXPAND_POWER);
            match power {
                Some(p) if is_sum(&base) => {
                    distribute(vec![base.clone(); p as usize]).unwrap_or_else(|| simplify_pow(base, *exp))
                }
                _ => simplify_pow(base, *exp),
            }
        }
        other => match other.function_arg() {
            Some(arg) => simplify(other.with_function_arg(expand(arg.clone()))),
            None => other,
        },
    }
}

fn distribute(factors: Vec<Expr>) -> Option<Expr> {
    let mut terms = vec![Expr::Constant(Rational::one())];
    for factor in factors {
        let parts = flatten_sum(&factor);
        if terms.len() * parts.len() > MAX_EXPANDED_TERMS {
            return None;
        }
        terms = terms
            .iter()
            .flat_map(|t| parts.iter().map(move |p| simplify_mul(t.clone(), p.clone())))
            .collect();
    }
    Some(canon_sum(terms))
}

/// Write an expression as a single fraction `(numerator, denominator)`, combining the terms of a
/// sum over the product of their distinct denominators. The numerator comes back expanded.
pub(crate) fn numer_denom(expr: &Expr) -> (Expr, Expr) {
    let terms = flatten_sum(expr);
    if terms.len() == 1 {
        return term_numer_denom(&terms[0]);
    }

    let mut groups: Vec<(Expr, Vec<Expr>)> = Vec::new();
    for term in terms {
        let (n, d) = term_numer_denom(&term);
        match groups.iter_mut().find(|(den, _)| *den == d) {
            Some((_, nums)) => nums.push(n),
            None => groups.push((d, vec![n])),
        }
    }

    let dens: Vec<Expr> = groups.iter().map(|(d, _)| d.clone()).collect();
    let mut numer_terms = Vec::new();
    for (i, (_, nums)) in groups.iter().enumerate() {
        let others: Vec<Expr> = dens
            .iter()
            .enumerate()
            .filter(|(j, _)| *j != i)
            .map(|(_, d)| d.clone())
            .collect();
        let scale = canon_product(others);
        for n in nums {
            numer_terms.push(simplify_mul(n.clone(), scale.clone()));
        }
    }
    (expand(canon_sum(numer_terms)), canon_product(dens))
}

fn term_numer_denom(term: &Expr) -> (Expr, Expr) {
    let (coeff, rest) = split_coeff(term);
    let mut numer = Vec::new();
    let mut denom = vec![Expr::Constant(Rational::from_integer(coeff.denom().clone()))];
    for factor in flatten_mul(&rest) {
        match &factor {
            Expr::Pow(base, exp) if exp.as_constant().is_some_and(|e| e.is_negative()) => {
                denom.push(simplify_pow((**base).clone(), simplify_neg((**exp).clone())));
            }
            _ => numer.push(factor),
        }
    }
    let numer = term_from(Rational::from_integer(coeff.numer().clone()), mk_mul_list(numer));
    (numer, canon_product(denom))
}

/// Reduce a univariate rational function by the gcd of its numerator and denominator.
pub fn cancel(expr: &Expr) -> Option<Expr> {
    let symbols = expr.free_symbols();
    let var = match symbols.iter().next() {
        Some(v) if symbols.len() == 1 => v.clone(),
        _ => return None,
    };
    let (numer, denom) = numer_denom(expr);
    if denom.as_constant().is_some() {
        return None;
    }
    let p = Poly::from_expr(&numer, &var)?;
    let q = Poly::from_expr(&expand(denom), &var)?;
    let g = Poly::gcd(&p, &q);
    if g.degree().unwrap_or(0) == 0 {
        return None;
    }
    let p = p.div_exact(&g)?;
    let q = q.div_exact(&g)?;
    Some(canon_product(vec![
        p.to_expr(&var),
        simplify_pow(q.to_expr(&var), Expr::integer(-1)),
    ]))
}

/// Replace `c*r*sin(u)^2 + c*r*cos(u)^2` pairs in a sum by `c*r`.
pub(crate) fn collapse_pythagorean(expr: &Expr) -> Expr {
    let mut terms = flatten_sum(expr);
    let mut changed = false;
    'search: loop {
        for i in 0..terms.len() {
            let Some((ci, ri, ui)) = trig_square(&terms[i], true) else {
                continue;
            };
            for j in 0..terms.len() {
                if i == j {
                    continue;
                }
                if let Some((cj, rj, uj)) = trig_square(&terms[j], false) {
                    if ci == cj && ri == rj && ui == uj {
                        let (hi, lo) = if i > j { (i, j) } else { (j, i) };
                        terms.remove(hi);
                        terms.remove(lo);
                        terms.push(term_from(ci, ri));
                        changed = true;
                        continue 'search;
                    }
                }
            }
        }
        break;
    }
    if changed {
        canon_sum(terms)
    } else {
        expr.clone()
    }
}

fn trig_square(term: &Expr, sine: bool) -> Option<(Rational, Expr, Expr)> {
    let (coeff, rest) = split_coeff(term);
    let mut factors = flatten_mul(&rest);
    let index = factors.iter().position(|f| match f {
        Expr::Pow(base, exp) if exp.as_constant().is_some_and(|e| *e == Rational::from_integer(2.into())) => {
            matches!((sine, &**base), (true, Expr::Sin(_)) | (false, Expr::Cos(_)))
        }
        _ => false,
    })?;
    let arg = match factors.remove(index) {
        Expr::Pow(base, _) => base.function_arg().cloned()?,
        _ => return None,
    };
    Some((coeff, mk_mul_list(factors), arg))
}

/// Simplify and then keep the smallest of the canonical, expanded, cancelled and
/// Pythagorean-collapsed forms.
pub fn simplify_fully(expr: Expr) -> Expr {
    let base = simplify(expr);
    let expanded = expand(base.clone());
    let mut best = base.clone();
    prefer(&mut best, expanded.clone());
    if let Some(cancelled) = cancel(&base) {
        prefer(&mut best, cancelled);
    }
    prefer(&mut best, collapse_pythagorean(&expanded));
    prefer(&mut best, collapse_pythagorean(&base));
    best
}

fn prefer(best: &mut Expr, candidate: Expr) {
    if candidate.size() < best.size() {
        *best = candidate;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_expr;

    fn canon(input: &str) -> Expr {
        simplify(parse_expr(input).expect("parse"))
    }

    #[test]
    fn single_fraction_of_a_sum() {
        let (n, d) = numer_denom(&canon("x - 1/x"));
        assert_eq!(n, canon("x**2 - 1"));
        assert_eq!(d, canon("x"));
    }

    #[test]
    fn pythagorean_pair_collapses() {
        assert_eq!(collapse_pythagorean(&canon("sin(x)**2 + cos(x)**2")), canon("1"));
    }
}
