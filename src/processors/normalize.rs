//! L2 normalization of raw feature outputs.

/// Epsilon added to the norm to guard division by zero.
pub const NORM_EPSILON: f32 = 1e-8;

/// Scales the vector so its Euclidean norm is 1 (within epsilon).
///
/// Pure and infallible. An all-zero input is the one degenerate case: it
/// stays a (near-)zero vector rather than failing, so callers can always
/// rely on getting a vector of unchanged length back.
pub fn l2_normalize(features: &mut [f32]) {
    let norm = features.iter().map(|v| v * v).sum::<f32>().sqrt();
    let denom = norm + NORM_EPSILON;
    for value in features.iter_mut() {
        *value /= denom;
    }
}
