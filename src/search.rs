//! Brute-force similarity ranking over a [`VectorTable`].
//!
//! Every query scans the whole table: O(table size) cosine computations, no index.

use crate::error::{Result, VecDbError};
use crate::table::VectorTable;
use crate::vector::{dot_product_f64, magnitude_f64};

/// Returns the `n` entries most similar to `query`, best first.
///
/// Scores are cosine similarities in `[-1, 1]`. Entries with equal scores keep
/// the table's insertion order. `n == 0` yields nothing; `n` larger than the
/// table yields every entry. A stored zero-norm entry scores `0.0`.
///
/// # Errors
///
/// * `DegenerateVector` - The query has zero norm
/// * `DimensionMismatch` - The query length differs from the table dimension
///
/// # Examples
///
/// ```
/// use vecdb::{top_n, VectorTable};
///
/// let table = VectorTable::from_entries(vec![
///     ("a".to_string(), vec![1.0, 0.0]),
///     ("b".to_string(), vec![0.0, 1.0]),
/// ]).unwrap();
///
/// let results = top_n(&[1.0, 0.0], &table, 1).unwrap();
/// assert_eq!(results[0].0, "a");
/// assert!((results[0].1 - 1.0).abs() < 1e-6);
/// ```
pub fn top_n(query: &[f32], table: &VectorTable, n: usize) -> Result<Vec<(String, f32)>> {
    let query_norm = magnitude_f64(query);
    if query_norm == 0.0 {
        return Err(VecDbError::DegenerateVector);
    }

    if n == 0 {
        return Ok(Vec::new());
    }

    if let Some(dim) = table.dimension() {
        if dim != query.len() {
            return Err(VecDbError::DimensionMismatch { expected: dim, found: query.len() });
        }
    }

    // Bounded sorted buffer. Inserting after every score >= sim keeps ties in
    // scan order, which is insertion order.
    let mut best: Vec<(usize, f32)> = Vec::with_capacity(n.min(table.len()) + 1);
    for (i, (_, vector)) in table.iter().enumerate() {
        let sim = score(query, query_norm, vector)?;
        if best.len() == n && best[n - 1].1 >= sim {
            continue;
        }
        let insert_index = best.partition_point(|&(_, s)| s >= sim);
        best.insert(insert_index, (i, sim));
        best.truncate(n);
    }

    let entries = table.entries();
    let result = best
        .into_iter()
        .filter_map(|(i, sim)| entries.get_index(i).map(|(key, _)| (key.clone(), sim)))
        .collect();

    Ok(result)
}

fn score(query: &[f32], query_norm: f64, vector: &[f32]) -> Result<f32> {
    let norm = magnitude_f64(vector);
    if norm == 0.0 {
        return Ok(0.0);
    }
    let dot = dot_product_f64(query, vector)?;
    Ok((dot / (query_norm * norm)).clamp(-1.0, 1.0) as f32)
}
