//! Canonical dosage-form vocabulary.

/// A canonical dosage form and the single-token spellings that map to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DosageForm {
    pub canonical: &'static str,
    pub synonyms: &'static [&'static str],
}

/// Dosage forms in precedence order: when tokens match several groups, the
/// earliest group wins.
///
/// Matching compares whole tokens, so multi-word synonyms such as
/// `NASAL SPRAY` never match on their own.
pub const DOSAGE_FORMS: &[DosageForm] = &[
    DosageForm {
        canonical: "TABLET",
        synonyms: &["TAB", "TABLET", "TABLETS", "TABS"],
    },
    DosageForm {
        canonical: "CAPSULE",
        synonyms: &["CAP", "CAPS", "CAPSULE", "CAPSULES"],
    },
    DosageForm {
        canonical: "INJECTION",
        synonyms: &[
            "INJ",
            "INJECTION",
            "INJECTABLE",
            "IV",
            "INTRAVENOUS",
            "IM",
            "SUBQ",
            "SUBCUT",
            "SQ",
            "SC",
            "VIAL",
            "AMPULE",
            "AMP",
        ],
    },
    DosageForm {
        canonical: "SOLUTION",
        synonyms: &["SOL", "SOLUTION", "SOLN"],
    },
    DosageForm {
        canonical: "SUSPENSION",
        synonyms: &["SUSP", "SUSPENSION"],
    },
    DosageForm {
        canonical: "CREAM",
        synonyms: &["CREAM", "CRM"],
    },
    DosageForm {
        canonical: "OINTMENT",
        synonyms: &["OINT", "OINTMENT"],
    },
    DosageForm {
        canonical: "PATCH",
        synonyms: &["PATCH", "PCH"],
    },
    DosageForm {
        canonical: "POWDER",
        synonyms: &["POW", "POWDER"],
    },
    DosageForm {
        canonical: "SPRAY",
        synonyms: &["SPRAY", "NASAL SPRAY", "NS"],
    },
    DosageForm {
        canonical: "DROPS",
        synonyms: &["DROP", "DROPS", "DRP"],
    },
    DosageForm {
        canonical: "KIT",
        synonyms: &["KIT"],
    },
    DosageForm {
        canonical: "GEL",
        synonyms: &["GEL"],
    },
    DosageForm {
        canonical: "SYRUP",
        synonyms: &["SYR", "SYRUP"],
    },
    DosageForm {
        canonical: "SUPPOSITORY",
        synonyms: &["SUPP", "SUPPOSITORY"],
    },
];

/// Find the first declared dosage form with a synonym among `tokens`.
///
/// Every occurrence of the matched synonym is removed from `tokens`; other
/// synonyms of the same group are left in place.
pub fn extract_dosage_form(tokens: &mut Vec<String>) -> Option<&'static str> {
    for form in DOSAGE_FORMS {
        for synonym in form.synonyms {
            if tokens.iter().any(|t| t == synonym) {
                tokens.retain(|t| t != synonym);
                return Some(form.canonical);
            }
        }
    }
    None
}
