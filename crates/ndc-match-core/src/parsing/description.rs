//! Free-text drug description parsing.
//!
//! Splits text such as `"Lisinopril 10mg Tablet"` into a drug name, a strength
//! and a canonical dosage form.

use std::sync::LazyLock;

use regex::Regex;

use super::dosage_form::extract_dosage_form;
use crate::models::StructuredDescription;

/// Numeric value (optionally a ratio) immediately followed by a unit.
///
/// Compound units are listed before their prefixes so `10mg/mL` is read whole.
static STRENGTH_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(?P<value>[0-9]+(?:\.[0-9]+)?(?:\s*/\s*[0-9]+(?:\.[0-9]+)?)?)\s*(?P<unit>%|(?:MCG/ACT|MCG/ML|MG/ACT|MG/ML|MEQ/ML|MEQ/L|UNITS/ML|MCG|MGM|MG|MEQ|GRAMS|GRAM|G|UNITS|UNIT|IU|ML|L)\b)",
    )
    .expect("strength pattern is valid")
});

/// Separator between distinct strength snippets.
pub const STRENGTH_SEPARATOR: &str = " / ";

/// Parse a drug description. Never fails; empty text yields an empty description.
pub fn parse_description(text: &str) -> StructuredDescription {
    let working = text.trim();
    let mut tokens = clean_tokens(working);
    let dosage_form = extract_dosage_form(&mut tokens).map(String::from);
    // Strength is read from the raw text so decimals survive
    let strength = extract_strength(working);

    let mut name = tokens.join(" ");
    if !strength.is_empty() {
        let strength_tokens = clean_tokens(&strength.replace(STRENGTH_SEPARATOR, " ")).join(" ");
        name = name.replace(&strength_tokens, " ");
    }
    let mut name = collapse_whitespace(&name);
    if name.is_empty() {
        name = working.to_string();
    }

    StructuredDescription::new(text.to_string(), title_case(&name), strength, dosage_form)
}

/// Extract every strength snippet, uppercased and de-duplicated in first-seen order.
pub fn extract_strength(text: &str) -> String {
    let mut unique: Vec<String> = Vec::new();
    for found in STRENGTH_PATTERN.find_iter(text) {
        let snippet: String = found
            .as_str()
            .to_uppercase()
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();
        if !unique.contains(&snippet) {
            unique.push(snippet);
        }
    }
    unique.join(STRENGTH_SEPARATOR)
}

/// Uppercase, blank out everything except `[A-Z0-9% ]`, and split into tokens.
pub fn clean_tokens(text: &str) -> Vec<String> {
    text.to_uppercase()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '%' {
                c
            } else {
                ' '
            }
        })
        .collect::<String>()
        .split_whitespace()
        .map(String::from)
        .collect()
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Capitalize the first letter of every run of letters and lowercase the rest.
///
/// Digits and punctuation start a new run, so `10MG` becomes `10Mg`.
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_word = false;
    for c in text.chars() {
        if c.is_alphabetic() {
            if in_word {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(c);
            in_word = false;
        }
    }
    out
}
