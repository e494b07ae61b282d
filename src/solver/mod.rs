//! Equation solving: single equations in one unknown and exact linear systems.

mod equation;
mod linear;

pub use equation::solve_equation;
pub use linear::{solve_system, LinearResult};

pub(crate) use linear::solve_square;
