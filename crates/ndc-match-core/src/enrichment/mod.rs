//! Optional metadata enrichment keyed by NDC.
//!
//! Descriptions that lack a dosage form can be backfilled from an external
//! lookup when the row carries a usable NDC. Lookups are advisory: any failure
//! simply leaves the parsed fields untouched.

mod rxnav;

pub use rxnav::*;

use serde::{Deserialize, Serialize};

use crate::models::StructuredDescription;

/// Product metadata returned by an [`Enricher`].
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct EnrichedProduct {
    pub ndc11: String,
    pub name: Option<String>,
    pub dosage_form: Option<String>,
    pub strength: Option<String>,
}

/// Source of product metadata.
///
/// Implementations must return `None` for every failure, including not-found
/// and network errors. They may block.
pub trait Enricher {
    fn lookup(&self, ndc11: &str) -> Option<EnrichedProduct>;
}

impl<E: Enricher + ?Sized> Enricher for &E {
    fn lookup(&self, ndc11: &str) -> Option<EnrichedProduct> {
        (**self).lookup(ndc11)
    }
}

/// Backfill missing fields from `enricher` when the row is eligible.
///
/// Eligible rows have an NDC and no dosage form. Dosage form is taken from the
/// lookup when it has one; strength only fills an empty strength.
pub fn enrich_if_eligible(
    mut components: StructuredDescription,
    ndc11: Option<&str>,
    enricher: Option<&dyn Enricher>,
) -> StructuredDescription {
    let (Some(enricher), Some(ndc11)) = (enricher, ndc11) else {
        return components;
    };
    if components.has_dosage_form() {
        return components;
    }

    let Some(product) = enricher.lookup(ndc11) else {
        tracing::debug!(ndc11, "no enrichment available");
        return components;
    };

    if let Some(form) = product.dosage_form.filter(|f| !f.trim().is_empty()) {
        components.dosage_form = Some(form);
    }
    if components.strength.is_empty() {
        if let Some(strength) = product.strength.filter(|s| !s.trim().is_empty()) {
            components.strength = strength;
        }
    }
    components.refresh_match_key();
    tracing::debug!(
        ndc11,
        dosage_form = components.dosage_form.as_deref(),
        strength = %components.strength,
        "enriched description"
    );
    components
}
