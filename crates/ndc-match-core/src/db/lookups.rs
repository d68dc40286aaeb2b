//! Cached NDC lookup operations.

use rusqlite::{params, OptionalExtension};

use super::{Database, DbResult};
use crate::enrichment::EnrichedProduct;

impl Database {
    /// Insert or replace a cached lookup.
    pub fn put_lookup(&self, product: &EnrichedProduct) -> DbResult<()> {
        self.conn.execute(
            r#"
            INSERT INTO ndc_lookups (ndc11, name, dosage_form, strength, fetched_at)
            VALUES (?1, ?2, ?3, ?4, datetime('now'))
            ON CONFLICT(ndc11) DO UPDATE SET
                name = excluded.name,
                dosage_form = excluded.dosage_form,
                strength = excluded.strength,
                fetched_at = datetime('now')
            "#,
            params![product.ndc11, product.name, product.dosage_form, product.strength],
        )?;
        Ok(())
    }

    /// Get a cached lookup by NDC.
    pub fn get_lookup(&self, ndc11: &str) -> DbResult<Option<EnrichedProduct>> {
        let product = self
            .conn
            .query_row(
                "SELECT ndc11, name, dosage_form, strength FROM ndc_lookups WHERE ndc11 = ?",
                [ndc11],
                |row| {
                    Ok(EnrichedProduct {
                        ndc11: row.get(0)?,
                        name: row.get(1)?,
                        dosage_form: row.get(2)?,
                        strength: row.get(3)?,
                    })
                },
            )
            .optional()?;
        Ok(product)
    }

    /// Number of cached lookups.
    pub fn lookup_count(&self) -> DbResult<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM ndc_lookups", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}
