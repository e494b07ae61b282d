//! Symbolic simplification, expansion, and substitution utilities.

mod expand;
mod radicals;
mod rules;
mod substitute;
mod trig_values;

pub use expand::{cancel, expand, simplify_fully};
pub use rules::{
    simplify, simplify_add, simplify_checked, simplify_div, simplify_function, simplify_mul,
    simplify_neg, simplify_pow, simplify_sub,
};
pub use substitute::{substitute, substitute_simplified};

pub(crate) use expand::numer_denom;
pub(crate) use radicals::exact_log;
pub(crate) use rules::{
    canon_product, canon_sum, flatten_mul, flatten_sum, is_sum, mk_mul_list, split_coeff,
    term_from,
};
