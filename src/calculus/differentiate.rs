use crate::error::{CasError, Result};
use crate::expr::{one, zero, Expr, Rational};
use crate::simplify::{
    canon_product, canon_sum, flatten_mul, flatten_sum, simplify, simplify_add, simplify_div,
    simplify_mul, simplify_neg, simplify_pow, simplify_sub,
};
use num_traits::One;

/// Derivative of `expr` with respect to `var`, in canonical form.
pub fn differentiate(var: &str, expr: &Expr) -> Expr {
    Differentiator { var }.derive(&simplify(expr.clone()))
}

/// Derivative with respect to the expression's only free symbol. A constant expression has
/// derivative zero; more than one free symbol is an error.
pub fn differentiate_inferred(expr: &Expr) -> Result<Expr> {
    let symbols = expr.free_symbols();
    let mut iter = symbols.iter();
    match (iter.next(), iter.next()) {
        (None, _) => Ok(zero()),
        (Some(var), None) => Ok(differentiate(var, expr)),
        (Some(_), Some(_)) => Err(CasError::Variable(format!(
            "Since there is more than one variable in the expression, the variable(s) of \
             differentiation must be supplied to differentiate {expr}"
        ))),
    }
}

struct Differentiator<'a> {
    var: &'a str,
}

impl Differentiator<'_> {
    fn derive(&self, expr: &Expr) -> Expr {
        if !expr.contains_var(self.var) {
            return zero();
        }
        match expr {
            Expr::Variable(_) => one(),
            Expr::Add(..) | Expr::Sub(..) => canon_sum(
                flatten_sum(expr)
                    .iter()
                    .map(|term| self.derive(term))
                    .collect(),
            ),
            Expr::Mul(..) => self.product_rule(&flatten_mul(expr)),
            Expr::Div(a, b) => self.quotient_rule(a, b),
            Expr::Pow(a, b) => self.power_rule(a, b),
            Expr::Neg(a) => simplify_neg(self.derive(a)),

            Expr::Sin(a) => self.chain_rule(a, Expr::Cos(a.clone())),
            Expr::Cos(a) => self.chain_rule(a, simplify_neg(Expr::Sin(a.clone()))),
            Expr::Tan(a) => self.chain_rule(a, simplify_add(square(Expr::Tan(a.clone())), one())),
            Expr::Asin(a) => self.chain_rule(a, inverse_sqrt(simplify_sub(one(), square((**a).clone())))),
            Expr::Acos(a) => self.chain_rule(
                a,
                simplify_neg(inverse_sqrt(simplify_sub(one(), square((**a).clone())))),
            ),
            Expr::Atan(a) => self.chain_rule(
                a,
                simplify_pow(simplify_add(square((**a).clone()), one()), Expr::integer(-1)),
            ),
            Expr::Sinh(a) => self.chain_rule(a, Expr::Cosh(a.clone())),
            Expr::Cosh(a) => self.chain_rule(a, Expr::Sinh(a.clone())),
            Expr::Tanh(a) => self.chain_rule(a, simplify_sub(one(), square(Expr::Tanh(a.clone())))),
            Expr::Exp(a) => self.chain_rule(a, Expr::Exp(a.clone())),
            Expr::Log(a) => self.chain_rule(a, simplify_pow((**a).clone(), Expr::integer(-1))),
            // Real-valued convention: d|u|/du = u/|u|.
            Expr::Abs(a) => self.chain_rule(a, simplify_div((**a).clone(), Expr::Abs(a.clone()))),

            Expr::Constant(_) | Expr::Pi => zero(),
        }
    }

    fn product_rule(&self, factors: &[Expr]) -> Expr {
        let terms = (0..factors.len())
            .map(|i| {
                let mut parts: Vec<Expr> = factors.to_vec();
                parts[i] = self.derive(&factors[i]);
                canon_product(parts)
            })
            .collect();
        canon_sum(terms)
    }

    fn quotient_rule(&self, a: &Expr, b: &Expr) -> Expr {
        let numerator = simplify_sub(
            simplify_mul(self.derive(a), b.clone()),
            simplify_mul(a.clone(), self.derive(b)),
        );
        simplify_div(numerator, square(b.clone()))
    }

    fn power_rule(&self, base: &Expr, exp: &Expr) -> Expr {
        let f = Expr::Pow(base.clone().boxed(), exp.clone().boxed());
        if !exp.contains_var(self.var) {
            // n * base^(n-1) * base'
            let lowered = simplify_pow(base.clone(), simplify_sub(exp.clone(), one()));
            return canon_product(vec![exp.clone(), lowered, self.derive(base)]);
        }
        if !base.contains_var(self.var) {
            // a^u * log(a) * u'
            let log_base = simplify(Expr::Log(base.clone().boxed()));
            return canon_product(vec![f, log_base, self.derive(exp)]);
        }
        let log_part = simplify_mul(self.derive(exp), simplify(Expr::Log(base.clone().boxed())));
        let ratio_part = simplify_div(simplify_mul(exp.clone(), self.derive(base)), base.clone());
        simplify_mul(f, simplify_add(log_part, ratio_part))
    }

    fn chain_rule(&self, arg: &Expr, outer: Expr) -> Expr {
        simplify_mul(self.derive(arg), outer)
    }
}

fn square(expr: Expr) -> Expr {
    simplify_pow(expr, Expr::integer(2))
}

fn inverse_sqrt(expr: Expr) -> Expr {
    simplify_pow(expr, Expr::Constant(-Rational::new(One::one(), 2.into())))
}
