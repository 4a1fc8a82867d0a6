//! Lag (backshift) polynomials
//!
//! A polynomial `c_0 + c_1 B + c_2 B^2 + ...` in the backshift operator `B`
//! is stored as its dense coefficient vector. Seasonal models produce sparse
//! polynomials, so [`LagPolynomial::terms`] hands out only the non-zero lags
//! for the hot recursions.

use crate::{MathError, Result};
use std::ops::Mul;

/// Polynomial in the backshift operator
#[derive(Debug, Clone, PartialEq)]
pub struct LagPolynomial {
    coeffs: Vec<f64>,
}

impl LagPolynomial {
    /// The identity polynomial `1`
    pub fn one() -> Self {
        Self { coeffs: vec![1.0] }
    }

    /// Build from dense coefficients, lowest lag first
    pub fn from_coefficients(coeffs: Vec<f64>) -> Result<Self> {
        if coeffs.is_empty() {
            return Err(MathError::InvalidInput(
                "A lag polynomial needs at least a constant term".to_string(),
            ));
        }
        Ok(Self { coeffs })
    }

    /// Autoregressive polynomial `1 - φ_1 B^step - φ_2 B^(2·step) - ...`
    pub fn autoregressive(phis: &[f64], step: usize) -> Self {
        Self::spaced(phis, step, -1.0)
    }

    /// Moving-average polynomial `1 + θ_1 B^step + θ_2 B^(2·step) + ...`
    pub fn moving_average(thetas: &[f64], step: usize) -> Self {
        Self::spaced(thetas, step, 1.0)
    }

    /// Differencing operator `(1 - B^step)^order`
    pub fn differencing(order: usize, step: usize) -> Self {
        let base = Self::autoregressive(&[1.0], step);
        (0..order).fold(Self::one(), |acc, _| &acc * &base)
    }

    fn spaced(params: &[f64], step: usize, sign: f64) -> Self {
        let step = step.max(1);
        let mut coeffs = vec![0.0; params.len() * step + 1];
        coeffs[0] = 1.0;
        for (i, p) in params.iter().enumerate() {
            coeffs[(i + 1) * step] = sign * p;
        }
        Self { coeffs }
    }

    /// Highest lag with a stored coefficient
    pub fn degree(&self) -> usize {
        self.coeffs.len() - 1
    }

    /// Coefficient at `lag` (zero beyond the degree)
    pub fn coefficient(&self, lag: usize) -> f64 {
        self.coeffs.get(lag).copied().unwrap_or(0.0)
    }

    /// Dense coefficients, lowest lag first
    pub fn coefficients(&self) -> &[f64] {
        &self.coeffs
    }

    /// Non-zero `(lag, coefficient)` pairs for lags `>= 1`
    pub fn terms(&self) -> Vec<(usize, f64)> {
        self.coeffs
            .iter()
            .enumerate()
            .skip(1)
            .filter(|(_, c)| **c != 0.0)
            .map(|(lag, c)| (lag, *c))
            .collect()
    }

    /// Value of the polynomial at `B = 1`
    pub fn at_one(&self) -> f64 {
        self.coeffs.iter().sum()
    }

    /// Apply the filter to a series: `out[k] = Σ c_i · x[k + deg - i]`.
    ///
    /// The output is `degree()` observations shorter than the input.
    pub fn apply(&self, values: &[f64]) -> Result<Vec<f64>> {
        let deg = self.degree();
        if values.len() <= deg {
            return Err(MathError::InsufficientData(format!(
                "Filtering with a degree {} polynomial needs more than {} values, have {}",
                deg,
                deg,
                values.len()
            )));
        }

        let terms = self.terms();
        let c0 = self.coeffs[0];
        Ok((deg..values.len())
            .map(|t| {
                terms
                    .iter()
                    .fold(c0 * values[t], |acc, &(lag, c)| acc + c * values[t - lag])
            })
            .collect())
    }
}

impl Mul for &LagPolynomial {
    type Output = LagPolynomial;

    fn mul(self, rhs: &LagPolynomial) -> LagPolynomial {
        let mut coeffs = vec![0.0; self.coeffs.len() + rhs.coeffs.len() - 1];
        for (i, a) in self.coeffs.iter().enumerate() {
            if *a == 0.0 {
                continue;
            }
            for (j, b) in rhs.coeffs.iter().enumerate() {
                coeffs[i + j] += a * b;
            }
        }
        LagPolynomial { coeffs }
    }
}

/// First `count` ψ-weights of `ma(B) / ar(B)`.
///
/// `ar` must be monic (`c_0 == 1`). With `ar` the full integrated AR
/// polynomial, `σ² Σ_{j<h} ψ_j²` is the h-step forecast error variance.
pub fn psi_weights(ar: &LagPolynomial, ma: &LagPolynomial, count: usize) -> Vec<f64> {
    let ar_terms = ar.terms();
    let mut psi: Vec<f64> = Vec::with_capacity(count);

    for j in 0..count {
        let mut value = ma.coefficient(j);
        for &(lag, c) in &ar_terms {
            if lag > j {
                break;
            }
            value -= c * psi[j - lag];
        }
        psi.push(value);
    }

    psi
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_differencing_coefficients() {
        let d2 = LagPolynomial::differencing(2, 1);
        assert_eq!(d2.coefficients(), &[1.0, -2.0, 1.0]);

        let seasonal = LagPolynomial::differencing(1, 4);
        assert_eq!(seasonal.coefficients(), &[1.0, 0.0, 0.0, 0.0, -1.0]);
    }

    #[test]
    fn test_multiplication_is_convolution() {
        let ar = LagPolynomial::autoregressive(&[0.5], 1);
        let diff = LagPolynomial::differencing(1, 1);
        let full = &ar * &diff;
        // (1 - 0.5B)(1 - B) = 1 - 1.5B + 0.5B^2
        assert_eq!(full.coefficients(), &[1.0, -1.5, 0.5]);
        assert_relative_eq!(full.at_one(), 0.0);
    }

    #[test]
    fn test_sparse_terms() {
        let seasonal_ma = LagPolynomial::moving_average(&[-0.4], 12);
        assert_eq!(seasonal_ma.degree(), 12);
        assert_eq!(seasonal_ma.terms(), vec![(12, -0.4)]);
    }

    #[test]
    fn test_apply_first_difference() {
        let diff = LagPolynomial::differencing(1, 1);
        let out = diff.apply(&[1.0, 4.0, 9.0, 16.0]).unwrap();
        assert_eq!(out, vec![3.0, 5.0, 7.0]);

        assert!(diff.apply(&[1.0]).is_err());
    }

    #[test]
    fn test_psi_weights_random_walk() {
        let ar = LagPolynomial::differencing(1, 1);
        let psi = psi_weights(&ar, &LagPolynomial::one(), 5);
        assert_eq!(psi, vec![1.0; 5]);
    }

    #[test]
    fn test_psi_weights_ar1() {
        let ar = LagPolynomial::autoregressive(&[0.5], 1);
        let psi = psi_weights(&ar, &LagPolynomial::one(), 4);
        assert_relative_eq!(psi[0], 1.0);
        assert_relative_eq!(psi[1], 0.5);
        assert_relative_eq!(psi[2], 0.25);
        assert_relative_eq!(psi[3], 0.125);
    }
}
