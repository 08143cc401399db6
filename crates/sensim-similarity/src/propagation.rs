//! Closed-form uncertainty propagation for normalised vectors and dot
//! products.
//!
//! For `û = u / N` the Jacobian is
//!
//! ```text
//! ∂û_i/∂u_i = (N² − u_i²) / N³
//! ∂û_i/∂u_j = −u_i u_j / N³        (i ≠ j)
//! ```
//!
//! and, with uncorrelated inputs, `σ²(û_i) = Σ_j (∂û_i/∂u_j)² σ_j²`. Expanding
//! the sum gives an O(n) expression instead of forming the n×n Jacobian:
//!
//! ```text
//! σ²(û_i) = u_i² (S − u_i² σ_i²) / N⁶ + ((N² − u_i²) / N³)² σ_i²,   S = Σ_j u_j² σ_j²
//! ```

use nalgebra::DVector;

/// Standard deviations of the components of `nominals / norm`.
///
/// `norm` is usually the Euclidean norm of `nominals`, but may be the norm
/// of a longer vector that `nominals` is a slice of. Cross terms with
/// components outside the slice are then neglected.
pub fn unit_vector_uncertainties(nominals: &[f64], std_devs: &[f64], norm: f64) -> Vec<f64> {
    let u = DVector::from_column_slice(nominals);
    let sigma = DVector::from_column_slice(std_devs);

    let u2 = u.component_mul(&u);
    let weighted = u2.component_mul(&sigma.component_mul(&sigma));
    let total = weighted.sum();

    let n2 = norm * norm;
    let n3 = n2 * norm;
    let n6 = n3 * n3;

    u2.zip_map(&sigma, |ui2, si| {
        let off_diagonal = (ui2 * (total - ui2 * si * si) / n6).max(0.0);
        let diagonal = (n2 - ui2) / n3 * si;
        (off_diagonal + diagonal * diagonal).sqrt()
    })
    .as_slice()
    .to_vec()
}

/// Standard deviation of `Σ a_i b_i` for independent components.
///
/// Each term contributes `(a_i b_i)² ((σa_i / a_i)² + (σb_i / b_i)²)`. A term
/// with `a_i == 0` or `b_i == 0` contributes nothing.
pub fn dot_product_uncertainty(a: &[f64], a_std: &[f64], b: &[f64], b_std: &[f64]) -> f64 {
    a.iter()
        .zip(a_std)
        .zip(b.iter().zip(b_std))
        .filter(|((ai, _), (bi, _))| **ai != 0.0 && **bi != 0.0)
        .map(|((ai, sa), (bi, sb))| (bi * sa).powi(2) + (ai * sb).powi(2))
        .sum::<f64>()
        .sqrt()
}
