//! Wizard Pages - Individual pages of the evaluation wizard
//!
//! Each page is a self-contained widget that owns its model and emits
//! signals for navigation.

mod check_progress;
mod evaluation;

pub use check_progress::CheckProgressPage;
pub use evaluation::EvaluationPage;
