//! Structured drug description models.

use serde::{Deserialize, Serialize};

/// Structured representation of a free-text drug description.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StructuredDescription {
    /// Text exactly as it appeared in the source cell
    pub raw_text: String,
    /// Title-cased drug name
    pub name: String,
    /// Strength snippets joined with " / " (e.g., "10MG", "5MG/ML / 10ML")
    pub strength: String,
    /// Canonical dosage form (e.g., "TABLET", "INJECTION")
    pub dosage_form: Option<String>,
    /// Uppercased name with punctuation stripped
    pub normalized_name: String,
    /// Normalized name + strength + dosage form, used for fuzzy comparison
    pub match_key: String,
}

impl StructuredDescription {
    /// Build a description and derive its normalized name and match key.
    pub fn new(raw_text: String, name: String, strength: String, dosage_form: Option<String>) -> Self {
        let normalized_name = normalize_name(&name);
        let mut description = Self {
            raw_text,
            name,
            strength,
            dosage_form,
            normalized_name,
            match_key: String::new(),
        };
        description.refresh_match_key();
        description
    }

    /// Recompute `match_key` after strength or dosage form changed.
    pub(crate) fn refresh_match_key(&mut self) {
        let mut segments: Vec<String> = Vec::with_capacity(3);
        if !self.normalized_name.is_empty() {
            segments.push(self.normalized_name.clone());
        }
        if !self.strength.is_empty() {
            segments.push(self.strength.to_uppercase());
        }
        if let Some(form) = self.dosage_form.as_deref().filter(|f| !f.is_empty()) {
            segments.push(form.to_uppercase());
        }
        self.match_key = segments.join(" ");
    }

    /// Check if a dosage form was recognized or backfilled.
    pub fn has_dosage_form(&self) -> bool {
        self.dosage_form.as_deref().is_some_and(|f| !f.is_empty())
    }
}

/// Uppercase, replace everything outside `[A-Z0-9% ]` with a space, collapse whitespace.
pub fn normalize_name(name: &str) -> String {
    let cleaned: String = name
        .to_uppercase()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '%' || c == ' ' {
                c
            } else {
                ' '
            }
        })
        .collect();
    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}
