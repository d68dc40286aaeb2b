//! Domain models for NDC purchase-history matching.

mod dates;
mod description;
mod facility;
mod report;
mod table;

pub use dates::*;
pub use description::*;
pub use facility::*;
pub use report::*;
pub use table::*;
