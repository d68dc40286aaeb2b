//! Text normalization: NDC canonicalization and description parsing.

mod description;
mod dosage_form;
mod ndc;

pub use description::*;
pub use dosage_form::*;
pub use ndc::*;
