//! Derivative-free minimization with the Nelder–Mead simplex method
//!
//! Used for likelihood-based model fitting where gradients are not available
//! in closed form. The implementation follows the classic reflection /
//! expansion / contraction / shrink scheme, optionally with the
//! dimension-adaptive coefficients of Gao & Han (2012), which behave much
//! better once the parameter count reaches a few dozen.

use crate::{MathError, Result};
use tracing::debug;

/// Tuning knobs for [`nelder_mead`]
#[derive(Debug, Clone, PartialEq)]
pub struct NelderMeadConfig {
    /// Iteration budget
    pub max_iter: usize,
    /// Convergence threshold on the spread of objective values, relative to
    /// `1 + |f_best|`
    pub f_tolerance: f64,
    /// Convergence threshold on the simplex diameter (max-norm)
    pub x_tolerance: f64,
    /// Use dimension-adaptive reflection/expansion/contraction coefficients
    pub adaptive: bool,
    /// Initial simplex offset for coordinates that start at zero; non-zero
    /// coordinates are perturbed by 5 %
    pub zero_step: f64,
}

impl Default for NelderMeadConfig {
    fn default() -> Self {
        Self {
            max_iter: 10_000,
            f_tolerance: 1e-8,
            x_tolerance: 1e-6,
            adaptive: true,
            zero_step: 0.1,
        }
    }
}

/// Outcome of a minimization run
#[derive(Debug, Clone, PartialEq)]
pub struct NelderMeadResult {
    /// Best point found
    pub optimal_point: Vec<f64>,
    /// Objective at `optimal_point`
    pub optimal_value: f64,
    /// Iterations performed
    pub iterations: usize,
    /// Objective evaluations performed
    pub evaluations: usize,
    /// Whether both tolerances were met within the budget
    pub converged: bool,
}

/// Minimize `objective` starting from `initial`.
///
/// Non-finite objective values are treated as `+∞`, which lets callers reject
/// infeasible regions by returning `NaN` or `∞`. The run is deterministic.
pub fn nelder_mead<F>(
    mut objective: F,
    initial: &[f64],
    config: &NelderMeadConfig,
) -> Result<NelderMeadResult>
where
    F: FnMut(&[f64]) -> f64,
{
    if config.max_iter == 0 {
        return Err(MathError::InvalidInput(
            "Nelder-Mead needs an iteration budget of at least 1".to_string(),
        ));
    }
    if !(config.f_tolerance > 0.0 && config.x_tolerance > 0.0) {
        return Err(MathError::InvalidInput(
            "Nelder-Mead tolerances must be positive".to_string(),
        ));
    }

    let mut evaluations = 0usize;
    let mut eval = |x: &[f64]| {
        evaluations += 1;
        let value = objective(x);
        if value.is_finite() {
            value
        } else {
            f64::INFINITY
        }
    };

    let n = initial.len();
    if n == 0 {
        let value = eval(initial);
        return Ok(NelderMeadResult {
            optimal_point: Vec::new(),
            optimal_value: value,
            iterations: 0,
            evaluations: 1,
            converged: value.is_finite(),
        });
    }

    let dim = n as f64;
    let (rho, chi, psi, sigma) = if config.adaptive {
        (1.0, 1.0 + 2.0 / dim, 0.75 - 1.0 / (2.0 * dim), 1.0 - 1.0 / dim)
    } else {
        (1.0, 2.0, 0.5, 0.5)
    };

    let mut simplex: Vec<Vec<f64>> = Vec::with_capacity(n + 1);
    simplex.push(initial.to_vec());
    for k in 0..n {
        let mut vertex = initial.to_vec();
        vertex[k] = if vertex[k] != 0.0 {
            vertex[k] * 1.05
        } else {
            config.zero_step
        };
        simplex.push(vertex);
    }
    let mut values: Vec<f64> = simplex.iter().map(|v| eval(v.as_slice())).collect();

    let mut iterations = 0usize;
    let mut converged = false;

    loop {
        let mut order: Vec<usize> = (0..=n).collect();
        order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));
        simplex = order.iter().map(|&i| simplex[i].clone()).collect();
        values = order.iter().map(|&i| values[i]).collect();

        let f_spread = values[1..]
            .iter()
            .map(|v| (v - values[0]).abs())
            .fold(0.0, f64::max);
        let x_spread = simplex[1..]
            .iter()
            .flat_map(|v| v.iter().zip(simplex[0].iter()).map(|(a, b)| (a - b).abs()))
            .fold(0.0, f64::max);

        if f_spread <= config.f_tolerance * (1.0 + values[0].abs())
            && x_spread <= config.x_tolerance
        {
            converged = true;
            break;
        }
        if iterations >= config.max_iter {
            break;
        }
        iterations += 1;

        let centroid: Vec<f64> = (0..n)
            .map(|j| simplex[..n].iter().map(|v| v[j]).sum::<f64>() / dim)
            .collect();
        let worst = simplex[n].clone();
        let toward = |scale: f64| -> Vec<f64> {
            centroid
                .iter()
                .zip(worst.iter())
                .map(|(c, w)| (1.0 + scale) * c - scale * w)
                .collect()
        };

        let reflected = toward(rho);
        let f_reflected = eval(reflected.as_slice());

        if f_reflected < values[0] {
            let expanded = toward(rho * chi);
            let f_expanded = eval(expanded.as_slice());
            if f_expanded < f_reflected {
                simplex[n] = expanded;
                values[n] = f_expanded;
            } else {
                simplex[n] = reflected;
                values[n] = f_reflected;
            }
            continue;
        }

        if f_reflected < values[n - 1] {
            simplex[n] = reflected;
            values[n] = f_reflected;
            continue;
        }

        let contracted_ok = if f_reflected < values[n] {
            let outside = toward(psi * rho);
            let f_outside = eval(outside.as_slice());
            if f_outside <= f_reflected {
                simplex[n] = outside;
                values[n] = f_outside;
                true
            } else {
                false
            }
        } else {
            let inside = toward(-psi);
            let f_inside = eval(inside.as_slice());
            if f_inside < values[n] {
                simplex[n] = inside;
                values[n] = f_inside;
                true
            } else {
                false
            }
        };

        if !contracted_ok {
            let best = simplex[0].clone();
            for j in 1..=n {
                simplex[j] = best
                    .iter()
                    .zip(simplex[j].iter())
                    .map(|(b, v)| b + sigma * (v - b))
                    .collect();
                values[j] = eval(simplex[j].as_slice());
            }
        }
    }

    debug!(
        iterations,
        evaluations,
        converged,
        best = values[0],
        "nelder-mead finished"
    );

    Ok(NelderMeadResult {
        optimal_point: simplex.swap_remove(0),
        optimal_value: values[0],
        iterations,
        evaluations,
        converged,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_quadratic_bowl() {
        let result = nelder_mead(
            |x| (x[0] - 3.0).powi(2) + 2.0 * (x[1] + 1.0).powi(2),
            &[0.0, 0.0],
            &NelderMeadConfig::default(),
        )
        .unwrap();

        assert!(result.converged);
        assert_relative_eq!(result.optimal_point[0], 3.0, epsilon = 1e-4);
        assert_relative_eq!(result.optimal_point[1], -1.0, epsilon = 1e-4);
    }

    #[test]
    fn test_rosenbrock_classic_coefficients() {
        let config = NelderMeadConfig {
            adaptive: false,
            ..Default::default()
        };
        let result = nelder_mead(
            |x| (1.0 - x[0]).powi(2) + 100.0 * (x[1] - x[0] * x[0]).powi(2),
            &[-1.2, 1.0],
            &config,
        )
        .unwrap();

        assert!(result.converged);
        assert_relative_eq!(result.optimal_point[0], 1.0, epsilon = 1e-3);
        assert_relative_eq!(result.optimal_point[1], 1.0, epsilon = 1e-3);
    }

    #[test]
    fn test_budget_exhaustion_is_reported() {
        let config = NelderMeadConfig {
            max_iter: 2,
            ..Default::default()
        };
        let result = nelder_mead(|x| x[0].powi(2) + x[1].powi(2), &[5.0, -4.0], &config).unwrap();

        assert!(!result.converged);
        assert_eq!(result.iterations, 2);
    }

    #[test]
    fn test_non_finite_objective_is_avoided() {
        let result = nelder_mead(
            |x| if x[0] < 0.0 { f64::NAN } else { (x[0] - 1.0).powi(2) },
            &[2.0],
            &NelderMeadConfig::default(),
        )
        .unwrap();

        assert!(result.converged);
        assert_relative_eq!(result.optimal_point[0], 1.0, epsilon = 1e-4);
    }

    #[test]
    fn test_deterministic() {
        let f = |x: &[f64]| (x[0] - 0.3).powi(2) + (x[1] * x[0] - 0.1).powi(2);
        let a = nelder_mead(f, &[1.0, 1.0], &NelderMeadConfig::default()).unwrap();
        let b = nelder_mead(f, &[1.0, 1.0], &NelderMeadConfig::default()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_invalid_config() {
        let config = NelderMeadConfig {
            max_iter: 0,
            ..Default::default()
        };
        assert!(nelder_mead(|x| x[0], &[1.0], &config).is_err());
    }
}
