//! Helpers for autoregressive model identification
//!
//! - Sample autocorrelation function
//! - Yule–Walker AR coefficients via the Levinson–Durbin recursion
//! - The partial-autocorrelation reparameterization of Monahan (1984), which
//!   maps any real vector onto the stationary region of an AR polynomial
//!
//! These provide starting values for likelihood-based fitting; they are not a
//! full estimator on their own.

use crate::statistics::mean;
use crate::{MathError, Result};

/// Sample autocorrelations `ρ_0 ..= ρ_max_lag` (biased estimator, `1/n` scaling)
pub fn autocorrelation(values: &[f64], max_lag: usize) -> Result<Vec<f64>> {
    if values.len() <= max_lag {
        return Err(MathError::InsufficientData(format!(
            "Autocorrelation up to lag {} needs more than {} values, have {}",
            max_lag,
            max_lag,
            values.len()
        )));
    }

    let m = mean(values)?;
    let n = values.len() as f64;
    let centered: Vec<f64> = values.iter().map(|v| v - m).collect();

    let gamma0 = centered.iter().map(|c| c * c).sum::<f64>() / n;
    if gamma0 <= f64::EPSILON {
        return Err(MathError::CalculationError(
            "Series has no variance; autocorrelation is undefined".to_string(),
        ));
    }

    Ok((0..=max_lag)
        .map(|lag| {
            let gamma = centered
                .iter()
                .zip(centered.iter().skip(lag))
                .map(|(a, b)| a * b)
                .sum::<f64>()
                / n;
            gamma / gamma0
        })
        .collect())
}

/// Solve the Yule–Walker equations for an AR(`order`) model given
/// autocorrelations `rho[0] ..= rho[order]`.
pub fn levinson_durbin(rho: &[f64], order: usize) -> Result<Vec<f64>> {
    if rho.len() <= order {
        return Err(MathError::InvalidInput(format!(
            "Need autocorrelations up to lag {}, have {}",
            order,
            rho.len().saturating_sub(1)
        )));
    }

    let mut phi: Vec<f64> = Vec::with_capacity(order);
    let mut error = rho[0];

    for k in 1..=order {
        let acc = rho[k]
            - phi
                .iter()
                .enumerate()
                .map(|(j, p)| p * rho[k - 1 - j])
                .sum::<f64>();

        if error <= f64::EPSILON {
            return Err(MathError::CalculationError(format!(
                "Prediction error variance vanished at lag {}",
                k
            )));
        }
        let kappa = acc / error;

        let previous = phi.clone();
        for j in 0..previous.len() {
            phi[j] = previous[j] - kappa * previous[previous.len() - 1 - j];
        }
        phi.push(kappa);

        error *= 1.0 - kappa * kappa;
    }

    Ok(phi)
}

/// Yule–Walker AR estimates straight from a series
pub fn yule_walker(values: &[f64], order: usize) -> Result<Vec<f64>> {
    if order == 0 {
        return Ok(Vec::new());
    }
    let rho = autocorrelation(values, order)?;
    levinson_durbin(&rho, order)
}

/// Map unconstrained reals onto AR coefficients whose polynomial
/// `1 - φ_1 B - ... - φ_p B^p` has every root outside the unit circle.
///
/// Each value is squashed into a partial autocorrelation `r = x / √(1 + x²)`
/// and the Durbin–Levinson recursion builds the coefficients from them.
pub fn constrain_stationary(unconstrained: &[f64]) -> Vec<f64> {
    let mut phi: Vec<f64> = Vec::with_capacity(unconstrained.len());
    for &x in unconstrained {
        let r = x / (1.0 + x * x).sqrt();
        let previous = phi.clone();
        for j in 0..previous.len() {
            phi[j] = previous[j] - r * previous[previous.len() - 1 - j];
        }
        phi.push(r);
    }
    phi
}

/// Inverse of [`constrain_stationary`].
///
/// Fails when `constrained` is not stationary, i.e. some partial
/// autocorrelation recovered by the step-down recursion is not inside
/// `(-1, 1)`.
pub fn unconstrain_stationary(constrained: &[f64]) -> Result<Vec<f64>> {
    let mut phi = constrained.to_vec();
    let mut unconstrained = vec![0.0; phi.len()];

    for k in (0..phi.len()).rev() {
        let r = phi[k];
        if !(r.abs() < 1.0) {
            return Err(MathError::InvalidInput(format!(
                "Coefficients are not stationary: partial autocorrelation {} at lag {}",
                r,
                k + 1
            )));
        }
        unconstrained[k] = r / (1.0 - r * r).sqrt();

        let scale = 1.0 - r * r;
        let current = phi[..k].to_vec();
        for j in 0..k {
            phi[j] = (current[j] + r * current[k - 1 - j]) / scale;
        }
        phi.truncate(k);
    }

    Ok(unconstrained)
}
