//! Calculus routines (differentiation and integration).

pub mod differentiate;
pub mod integrate;

pub use differentiate::{differentiate, differentiate_inferred};
pub use integrate::{
    classify_integrand, integrate, integrate_inferred, AttemptStatus, IntegrandKind,
    IntegrandReport, IntegrationAttempt, IntegrationResult, ReasonCode, Strategy,
};
