//! Numeric helpers for decoding raw network activations.

/// Computes a numerically stable softmax over `logits`.
///
/// The maximum logit is subtracted before exponentiation so large activations
/// do not overflow. An empty slice yields an empty vector.
pub fn softmax(logits: &[f32]) -> Vec<f32> {
    let max_val = logits.iter().copied().fold(f32::NEG_INFINITY, f32::max);

    let mut out: Vec<f32> = logits.iter().map(|&x| (x - max_val).exp()).collect();
    let exp_sum: f32 = out.iter().sum();
    for value in out.iter_mut() {
        *value /= exp_sum;
    }
    out
}

/// Logistic sigmoid that never evaluates `exp` of a large positive argument.
pub fn sigmoid(x: f32) -> f32 {
    if x >= 0.0 {
        1.0 / (1.0 + (-x).exp())
    } else {
        let e = x.exp();
        e / (1.0 + e)
    }
}
