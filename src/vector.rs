//! This is the vector math module
//! Provide magnitude, dot product and cosine similarity

use crate::error::{Result, VecDbError};

/// L2 Magnitude
/// ||vec|| = sqrt(sum(vec[i]^2))
/// An empty vector has magnitude 0
pub fn magnitude(vector: &[f32]) -> f32 {
    magnitude_f64(vector) as f32
}

/// Dot Product
/// dot_prod = sum(a[i] * b[i]) for i = 0..a.len()
/// Can only process vectors with same dimensions
pub fn dot_product(left: &[f32], right: &[f32]) -> Result<f32> {
    dot_product_f64(left, right).map(|d| d as f32)
}

/// Cosine Similarity
/// cos = dot(a, b) / (||a|| * ||b||)
/// Fails on different dimensions or when either vector has zero norm.
/// The result is clamped to [-1, 1] to absorb rounding.
pub fn cosine_similarity(left: &[f32], right: &[f32]) -> Result<f32> {
    let dot = dot_product_f64(left, right)?;

    let norms = magnitude_f64(left) * magnitude_f64(right);
    if norms == 0.0 {
        return Err(VecDbError::DegenerateVector);
    }

    Ok((dot / norms).clamp(-1.0, 1.0) as f32)
}

// Sums run in f64: squares of any finite f32 neither overflow nor flush to zero there.

pub(crate) fn magnitude_f64(vector: &[f32]) -> f64 {
    vector.iter()
        .map(|&x| f64::from(x) * f64::from(x))
        .sum::<f64>()
        .sqrt()
}

pub(crate) fn dot_product_f64(left: &[f32], right: &[f32]) -> Result<f64> {
    if left.len() != right.len() {
        return Err(VecDbError::DimensionMismatch { expected: left.len(), found: right.len() });
    }

    let dot_prod = left.iter()
        .zip(right.iter())
        .map(|(&x, &y)| f64::from(x) * f64::from(y))
        .sum();

    Ok(dot_prod)
}
