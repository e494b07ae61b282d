use std::collections::{BTreeMap, HashMap};

use crate::error::{CasError, Result};
use crate::expr::{one, zero, Expr, Rational};
use num_bigint::BigInt;
use num_traits::{One, Signed, ToPrimitive, Zero};

use super::radicals::rational_power;
use super::trig_values::{
    asin_of, atan_of, cos_of_pi_multiple, sin_of_pi_multiple, tan_of_pi_multiple,
};

/// Largest integer exponent evaluated exactly on a rational base.
const MAX_EXACT_POWER: u32 = 4096;

/// Canonicalize an expression: the automatic evaluation every parsed expression goes through.
///
/// Canonical sums are left-nested `Add` chains of sorted terms with the constant last. Canonical
/// products are left-nested `Mul` chains with the numeric coefficient first and the remaining
/// factors sorted; a coefficient of `-1` is written as `Neg`. `Sub` and `Div` never survive.
pub fn simplify(expr: Expr) -> Expr {
    let mut cache = HashMap::new();
    simplify_cached(expr, &mut cache)
}

/// Canonicalize like [`simplify`], rejecting expressions that divide by zero anywhere.
///
/// Every subexpression is checked, so `1/0 - 1/0` fails even though the terms cancel.
pub fn simplify_checked(expr: Expr) -> Result<Expr> {
    let original = expr.to_string();
    let mut cache = HashMap::new();
    let result = simplify_cached(expr, &mut cache);
    if cache.values().any(divides_by_zero) {
        return Err(CasError::Evaluation(format!("division by zero in {original}")));
    }
    Ok(result)
}

/// `0**-k`, the form a division by zero takes after canonicalization.
fn is_zero_division(expr: &Expr) -> bool {
    matches!(expr, Expr::Pow(base, exp)
        if base.is_zero() && exp.as_constant().is_some_and(|e| e.is_negative()))
}

fn divides_by_zero(expr: &Expr) -> bool {
    if is_zero_division(expr) {
        return true;
    }
    match expr {
        Expr::Neg(inner) => divides_by_zero(inner),
        other => match other.binary_parts() {
            Some((a, b)) => divides_by_zero(a) || divides_by_zero(b),
            None => other.function_arg().is_some_and(divides_by_zero),
        },
    }
}

fn simplify_cached(expr: Expr, cache: &mut HashMap<Expr, Expr>) -> Expr {
    if let Some(hit) = cache.get(&expr) {
        return hit.clone();
    }

    let key = expr.clone();
    let result = match expr {
        Expr::Add(a, b) => {
            let a = simplify_cached(*a, cache);
            let b = simplify_cached(*b, cache);
            simplify_add(a, b)
        }
        Expr::Sub(a, b) => {
            let a = simplify_cached(*a, cache);
            let b = simplify_cached(*b, cache);
            simplify_sub(a, b)
        }
        Expr::Mul(a, b) => {
            let a = simplify_cached(*a, cache);
            let b = simplify_cached(*b, cache);
            simplify_mul(a, b)
        }
        Expr::Div(a, b) => {
            let a = simplify_cached(*a, cache);
            let b = simplify_cached(*b, cache);
            simplify_div(a, b)
        }
        Expr::Pow(a, b) => {
            let a = simplify_cached(*a, cache);
            let b = simplify_cached(*b, cache);
            simplify_pow(a, b)
        }
        Expr::Neg(a) => simplify_neg(simplify_cached(*a, cache)),
        other => match other.function_arg() {
            Some(arg) => {
                let arg = simplify_cached(arg.clone(), cache);
                simplify_function(&other, arg)
            }
            None => other,
        },
    };

    cache.insert(key, result.clone());
    result
}

pub fn simplify_add(x: Expr, y: Expr) -> Expr {
    let mut terms = flatten_sum(&x);
    terms.extend(flatten_sum(&y));
    canon_sum(terms)
}

pub fn simplify_sub(x: Expr, y: Expr) -> Expr {
    simplify_add(x, simplify_neg(y))
}

pub fn simplify_neg(expr: Expr) -> Expr {
    if is_sum(&expr) {
        canon_sum(flatten_sum(&expr).iter().map(negate_term).collect())
    } else {
        negate_term(&expr)
    }
}

pub fn simplify_mul(x: Expr, y: Expr) -> Expr {
    canon_product(vec![x, y])
}

pub fn simplify_div(x: Expr, y: Expr) -> Expr {
    canon_product(vec![x, simplify_pow(y, Expr::integer(-1))])
}

pub fn simplify_pow(base: Expr, exp: Expr) -> Expr {
    if exp.is_zero() {
        return one();
    }
    if exp.is_one() {
        return base;
    }
    if base.is_one() {
        return one();
    }

    match (base, exp) {
        (Expr::Constant(b), Expr::Constant(e)) => constant_power(b, e),
        (Expr::Exp(arg), exp) => simplify_exp(simplify_mul(*arg, exp)),
        (Expr::Pow(inner_base, inner_exp), Expr::Constant(e)) if e.is_integer() => {
            simplify_pow(*inner_base, simplify_mul(*inner_exp, Expr::Constant(e)))
        }
        (base, Expr::Constant(e)) if matches!(base, Expr::Mul(..) | Expr::Neg(_)) => {
            let (c, rest) = split_coeff(&base);
            if e.is_integer() {
                let mut items = vec![constant_power(c, e.clone())];
                items.extend(
                    flatten_mul(&rest)
                        .into_iter()
                        .map(|f| simplify_pow(f, Expr::Constant(e.clone()))),
                );
                canon_product(items)
            } else if c.is_positive() && !c.is_one() {
                canon_product(vec![
                    constant_power(c, e.clone()),
                    simplify_pow(rest, Expr::Constant(e)),
                ])
            } else {
                Expr::Pow(base.boxed(), Expr::Constant(e).boxed())
            }
        }
        (base, exp) => Expr::Pow(base.boxed(), exp.boxed()),
    }
}

fn constant_power(b: Rational, e: Rational) -> Expr {
    if e.is_integer() {
        let k: BigInt = e.to_integer();
        if let Some(power) = k.abs().to_u32().filter(|p| *p <= MAX_EXACT_POWER) {
            if !k.is_negative() {
                return Expr::Constant(Rational::new(b.numer().pow(power), b.denom().pow(power)));
            }
            if !b.is_zero() {
                return Expr::Constant(Rational::new(b.denom().pow(power), b.numer().pow(power)));
            }
        }
        return Expr::Pow(Expr::Constant(b).boxed(), Expr::Constant(e).boxed());
    }
    rational_power(&b, &e)
        .unwrap_or_else(|| Expr::Pow(Expr::Constant(b).boxed(), Expr::Constant(e).boxed()))
}

/// Apply exact values and parity rules of the elementary functions. `node` selects the function,
/// its own argument is ignored in favor of `arg`.
pub fn simplify_function(node: &Expr, arg: Expr) -> Expr {
    let angle = pi_multiple(&arg).or_else(|| arg.is_zero().then(Rational::zero));
    match node {
        Expr::Sin(_) => match angle.as_ref().and_then(sin_of_pi_multiple) {
            Some(value) => value,
            None => odd(node, arg),
        },
        Expr::Cos(_) => match angle.as_ref().and_then(cos_of_pi_multiple) {
            Some(value) => value,
            None => even(node, arg),
        },
        Expr::Tan(_) => match angle.as_ref().and_then(tan_of_pi_multiple) {
            Some(value) => value,
            None => odd(node, arg),
        },
        Expr::Asin(_) => match asin_of(&arg) {
            Some(value) => value,
            None => odd(node, arg),
        },
        Expr::Acos(_) => {
            // acos(v) = pi/2 - asin(v)
            let asin = if has_negative_sign(&arg) {
                asin_of(&simplify_neg(arg.clone())).map(simplify_neg)
            } else {
                asin_of(&arg)
            };
            match asin {
                Some(value) => simplify_sub(pi_times(Rational::new(1.into(), 2.into())), value),
                None => Expr::Acos(arg.boxed()),
            }
        }
        Expr::Atan(_) => match atan_of(&arg) {
            Some(value) => value,
            None => odd(node, arg),
        },
        Expr::Sinh(_) | Expr::Tanh(_) => {
            if arg.is_zero() {
                zero()
            } else {
                odd(node, arg)
            }
        }
        Expr::Cosh(_) => {
            if arg.is_zero() {
                one()
            } else {
                even(node, arg)
            }
        }
        Expr::Exp(_) => simplify_exp(arg),
        Expr::Log(_) => simplify_log(arg),
        Expr::Abs(_) => match arg {
            Expr::Constant(c) => Expr::Constant(c.abs()),
            Expr::Pi => Expr::Pi,
            a => even(node, a),
        },
        other => other.with_function_arg(arg),
    }
}

fn odd(node: &Expr, arg: Expr) -> Expr {
    if has_negative_sign(&arg) {
        simplify_neg(simplify_function(node, simplify_neg(arg)))
    } else {
        node.with_function_arg(arg)
    }
}

fn even(node: &Expr, arg: Expr) -> Expr {
    if has_negative_sign(&arg) {
        simplify_function(node, simplify_neg(arg))
    } else {
        node.with_function_arg(arg)
    }
}

pub(crate) fn simplify_exp(arg: Expr) -> Expr {
    if arg.is_zero() {
        return one();
    }
    if let Expr::Log(inner) = arg {
        return *inner;
    }
    let (c, rest) = split_coeff(&arg);
    if let Expr::Log(inner) = rest {
        return simplify_pow(*inner, Expr::Constant(c));
    }
    Expr::Exp(arg.boxed())
}

fn simplify_log(arg: Expr) -> Expr {
    if arg.is_one() {
        return zero();
    }
    match arg {
        Expr::Exp(inner) if matches!(*inner, Expr::Constant(_)) => *inner,
        other => Expr::Log(other.boxed()),
    }
}

/// Coefficient `k` when the expression is `k*pi`.
pub(crate) fn pi_multiple(expr: &Expr) -> Option<Rational> {
    let (c, rest) = split_coeff(expr);
    matches!(rest, Expr::Pi).then_some(c)
}

fn pi_times(k: Rational) -> Expr {
    term_from(k, Expr::Pi)
}

/// True when the expression is a single term with a negative numeric coefficient.
fn has_negative_sign(expr: &Expr) -> bool {
    !is_sum(expr) && split_coeff(expr).0.is_negative()
}

pub(crate) fn is_sum(expr: &Expr) -> bool {
    matches!(expr, Expr::Add(..) | Expr::Sub(..))
}

pub(crate) fn flatten_sum(expr: &Expr) -> Vec<Expr> {
    match expr {
        Expr::Add(a, b) => {
            let mut out = flatten_sum(a);
            out.extend(flatten_sum(b));
            out
        }
        Expr::Sub(a, b) => {
            let mut out = flatten_sum(a);
            out.extend(flatten_sum(b).iter().map(negate_term));
            out
        }
        Expr::Neg(inner) if is_sum(inner) => flatten_sum(inner).iter().map(negate_term).collect(),
        other => vec![other.clone()],
    }
}

pub(crate) fn flatten_mul(expr: &Expr) -> Vec<Expr> {
    match expr {
        Expr::Mul(a, b) => {
            let mut out = flatten_mul(a);
            out.extend(flatten_mul(b));
            out
        }
        other => vec![other.clone()],
    }
}

/// Split a term into its numeric coefficient and the remaining product.
pub(crate) fn split_coeff(expr: &Expr) -> (Rational, Expr) {
    match expr {
        Expr::Constant(c) => (c.clone(), one()),
        Expr::Neg(inner) => {
            let (c, rest) = split_coeff(inner);
            (-c, rest)
        }
        Expr::Mul(_, _) => {
            let mut coeff = Rational::one();
            let mut rest = Vec::new();
            for factor in flatten_mul(expr) {
                match factor {
                    Expr::Constant(c) => coeff *= c,
                    Expr::Neg(inner) => {
                        let (c, r) = split_coeff(&inner);
                        coeff *= -c;
                        if !r.is_one() {
                            rest.extend(flatten_mul(&r));
                        }
                    }
                    other => rest.push(other),
                }
            }
            (coeff, mk_mul_list(rest))
        }
        other => (Rational::one(), other.clone()),
    }
}

fn negate_term(term: &Expr) -> Expr {
    let (c, rest) = split_coeff(term);
    term_from(-c, rest)
}

pub(crate) fn term_from(coef: Rational, base: Expr) -> Expr {
    if coef.is_zero() {
        return zero();
    }
    if base.is_one() {
        return Expr::Constant(coef);
    }
    if coef.is_one() {
        return base;
    }
    if coef == -Rational::one() {
        return Expr::Neg(base.boxed());
    }
    let mut items = vec![Expr::Constant(coef)];
    items.extend(flatten_mul(&base));
    mk_mul_list(items)
}

pub(crate) fn canon_sum(terms: Vec<Expr>) -> Expr {
    let mut constant = Rational::zero();
    let mut order: Vec<Expr> = Vec::new();
    let mut coeffs: HashMap<Expr, Rational> = HashMap::new();

    for term in terms.iter().flat_map(flatten_sum) {
        let (c, rest) = split_coeff(&term);
        if c.is_zero() {
            continue;
        }
        if rest.is_one() {
            constant += c;
            continue;
        }
        match coeffs.get_mut(&rest) {
            Some(acc) => *acc += c,
            None => {
                order.push(rest.clone());
                coeffs.insert(rest, c);
            }
        }
    }

    order.sort();
    let mut out: Vec<Expr> = order
        .into_iter()
        .filter_map(|rest| {
            let c = coeffs.remove(&rest)?;
            (!c.is_zero()).then(|| term_from(c, rest))
        })
        .collect();
    if !constant.is_zero() {
        out.push(Expr::Constant(constant));
    }
    mk_add_list(out)
}

pub(crate) fn canon_product(factors: Vec<Expr>) -> Expr {
    let mut coeff = Rational::one();
    let mut flat = Vec::new();
    for factor in factors {
        collect_factors(factor, &mut coeff, &mut flat);
    }
    if coeff.is_zero() {
        // `0 * (1/0)` stays undefined.
        return flat.into_iter().find(is_zero_division).unwrap_or_else(zero);
    }

    let mut bases: Vec<(Expr, Expr)> = Vec::new();
    let mut exp_args: Vec<Expr> = Vec::new();
    for factor in flat {
        match factor {
            Expr::Exp(arg) => exp_args.push(*arg),
            Expr::Pow(b, e) => merge_base(&mut bases, *b, *e),
            other => merge_base(&mut bases, other, one()),
        }
    }

    let mut changed = false;
    let mut results: Vec<Expr> = Vec::new();

    if !exp_args.is_empty() {
        let single = exp_args.len() == 1;
        let original = exp_args.first().cloned();
        let arg = canon_sum(exp_args);
        let merged = simplify_exp(arg);
        let unchanged = single
            && matches!((&merged, &original), (Expr::Exp(a), Some(o)) if **a == *o);
        changed |= !unchanged;
        results.push(merged);
    }

    // Constant radicals with a shared exponent multiply under one root.
    let mut radicals: BTreeMap<Rational, (Rational, usize)> = BTreeMap::new();
    let mut others = Vec::new();
    for (base, exp) in bases {
        match (&base, &exp) {
            (Expr::Constant(b), Expr::Constant(e)) if !e.is_integer() && b.is_positive() => {
                let slot = radicals
                    .entry(e.clone())
                    .or_insert_with(|| (Rational::one(), 0));
                slot.0 *= b.clone();
                slot.1 += 1;
            }
            _ => others.push((base, exp)),
        }
    }
    for (exp, (product, count)) in radicals {
        if count > 1 {
            changed = true;
        }
        others.push((Expr::Constant(product), Expr::Constant(exp)));
    }

    for (base, exp) in others {
        if exp.is_zero() {
            changed = true;
            continue;
        }
        let power = simplify_pow(base.clone(), exp.clone());
        if let Expr::Constant(c) = &power {
            coeff *= c;
            continue;
        }
        let plain = if exp.is_one() {
            power == base
        } else {
            matches!(&power, Expr::Pow(b, e) if **b == base && **e == exp)
        };
        if !plain {
            changed = true;
        }
        results.push(power);
    }

    if changed {
        let mut items = vec![Expr::Constant(coeff)];
        items.extend(results);
        return canon_product(items);
    }

    results.retain(|e| !e.is_one());
    results.sort();
    if results.is_empty() {
        return Expr::Constant(coeff);
    }
    if results.len() == 1 && is_sum(&results[0]) && !coeff.is_one() {
        let terms = flatten_sum(&results[0])
            .iter()
            .map(|t| {
                let (c, r) = split_coeff(t);
                term_from(c * &coeff, r)
            })
            .collect();
        return canon_sum(terms);
    }
    term_from(coeff, mk_mul_list(results))
}

fn collect_factors(factor: Expr, coeff: &mut Rational, out: &mut Vec<Expr>) {
    match factor {
        Expr::Mul(a, b) => {
            collect_factors(*a, coeff, out);
            collect_factors(*b, coeff, out);
        }
        Expr::Neg(inner) => {
            *coeff = -coeff.clone();
            collect_factors(*inner, coeff, out);
        }
        Expr::Constant(c) => *coeff *= c,
        Expr::Div(a, b) => {
            collect_factors(*a, coeff, out);
            collect_factors(simplify_pow(*b, Expr::integer(-1)), coeff, out);
        }
        other if other.is_one() => {}
        other => out.push(other),
    }
}

fn merge_base(bases: &mut Vec<(Expr, Expr)>, base: Expr, exp: Expr) {
    match bases.iter_mut().find(|(b, _)| *b == base) {
        Some((_, acc)) => {
            let current = std::mem::replace(acc, zero());
            *acc = simplify_add(current, exp);
        }
        None => bases.push((base, exp)),
    }
}

pub(crate) fn mk_add_list(items: Vec<Expr>) -> Expr {
    let mut iter = items.into_iter();
    let Some(first) = iter.next() else {
        return zero();
    };
    iter.fold(first, |acc, item| Expr::Add(acc.boxed(), item.boxed()))
}

pub(crate) fn mk_mul_list(items: Vec<Expr>) -> Expr {
    let mut iter = items.into_iter().filter(|e| !e.is_one());
    let Some(first) = iter.next() else {
        return one();
    };
    iter.fold(first, |acc, item| Expr::Mul(acc.boxed(), item.boxed()))
}
