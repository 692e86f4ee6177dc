// Cofre — Category Index
//
// Derived, non-authoritative view: the distinct set of category labels
// across the records of one ReadAll result. Recomputed on each load and
// never persisted.

use std::collections::BTreeSet;

use super::models::AccessRecord;

/// Distinct category labels over the given records. Pure function; an
/// empty input yields an empty set.
pub fn distinct_categories<'a, I>(records: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = &'a AccessRecord>,
{
    records
        .into_iter()
        .map(|record| record.category.clone())
        .collect()
}

// ─── Tests ───────────────────────────────────────────────────────────────────
