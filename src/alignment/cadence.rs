//! alignment::cadence — re-indexing a light curve on another's cadence numbers.
//!
//! Purpose
//! -------
//! Produce a copy of `source` whose rows follow `reference`'s cadence
//! numbers one for one, so flux vectors of different targets can be stacked
//! column by column.
//!
//! Key behaviors
//! -------------
//! - Output row `j` is the `source` row whose cadence equals the reference's
//!   `j`-th cadence; reference cadences absent from `source` become fill
//!   rows (NaN flux and floats, zero quality/integers, `false`, empty text).
//! - Output time and cadence numbers are the reference's, so
//!   `align_to_lc(s, r).cadenceno() == r.cadenceno()` holds element-wise for
//!   any overlap, including disjoint key sets.
//! - Duplicate cadences in `source` collapse to the first occurrence.
//!
//! Invariants & assumptions
//! ------------------------
//! - Runs in O(|source| + |reference|) time and memory through one hash
//!   index over the source keys.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use crate::alignment::errors::{AlignError, AlignResult};
use crate::lightcurve::data::LightCurve;

const KEY_COLUMN: &str = "cadenceno";

/// Align `source` onto `reference`'s cadence numbers.
///
/// Parameters
/// ----------
/// - `source`: `&LightCurve`
///   Light curve to re-index; must carry `cadenceno`.
/// - `reference`: `&LightCurve`
///   Light curve providing the target index; must carry `cadenceno`.
///
/// Returns
/// -------
/// `AlignResult<LightCurve>`
///   `reference.len()` rows with `source`'s columns, metadata and unit.
///
/// Errors
/// ------
/// - `AlignError::MissingKeyColumn` naming the side without cadence numbers.
pub fn align_to_lc(source: &LightCurve, reference: &LightCurve) -> AlignResult<LightCurve> {
    let source_keys = source
        .cadenceno()
        .ok_or(AlignError::MissingKeyColumn { role: "source", column: KEY_COLUMN })?;
    let reference_keys = reference
        .cadenceno()
        .ok_or(AlignError::MissingKeyColumn { role: "reference", column: KEY_COLUMN })?;

    let mut index: HashMap<i64, usize> = HashMap::with_capacity(source_keys.len());
    let mut duplicates = 0usize;
    for (i, &key) in source_keys.iter().enumerate() {
        match index.entry(key) {
            Entry::Occupied(_) => duplicates += 1,
            Entry::Vacant(slot) => {
                slot.insert(i);
            }
        }
    }
    if duplicates > 0 {
        tracing::debug!(duplicates, "duplicate cadences in source collapsed to first occurrence");
    }

    let rows: Vec<Option<usize>> = reference_keys.iter().map(|k| index.get(k).copied()).collect();
    let matched = rows.iter().flatten().count();
    tracing::debug!(matched, missing = rows.len() - matched, "aligned on cadence");

    Ok(source.take_or_fill(&rows, reference.time().clone(), Some(reference_keys.clone()))?)
}
