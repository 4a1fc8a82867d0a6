//! Seasonal ARIMA `(p,d,q)×(P,D,Q)_s`
//!
//! The model is written in lag-polynomial form
//!
//! ```text
//! φ(B) Φ(B^s) [(1-B)^d (1-B^s)^D x_t - μ] = θ(B) Θ(B^s) ε_t
//! ```
//!
//! with `μ` present only for [`Trend::Constant`]. Parameters are estimated by
//! conditional sum of squares: the innovations are recovered recursively from
//! the differenced series (pre-sample innovations set to zero) and the
//! concentrated Gaussian negative log-likelihood is minimized with
//! Nelder–Mead. By default the optimizer works on partial autocorrelations,
//! so every candidate has stationary AR and invertible MA polynomials. Forecasts run the same recursion forward on the original
//! scale through the integrated polynomial `φ(B)Φ(B^s)(1-B)^d(1-B^s)^D`, and
//! their error variance comes from its ψ-weights.

use crate::config::{FitOptions, ForecastSpec, Order, SeasonalOrder, Trend};
use crate::error::{ForecastError, Result};
use crate::models::{
    FitDiagnostics, ForecastModel, ForecastPoint, ForecastResult, TrainedForecastModel,
};
use crate::series::TimeSeries;
use crate::utils::future_daily_timestamps;
use chrono::{DateTime, Utc};
use serde::Serialize;
use series_math::{
    constrain_stationary, nelder_mead, psi_weights, unconstrain_stationary, yule_walker,
    LagPolynomial, NelderMeadConfig,
};
use statrs::distribution::{ContinuousCDF, Normal};
use std::collections::BTreeMap;
use std::f64::consts::PI;
use tracing::debug;

/// Simplex diameter at which the optimizer may stop
const PARAMETER_TOLERANCE: f64 = 1e-4;

/// Estimated SARIMA coefficients
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SarimaCoefficients {
    /// Mean of the differenced series, when a constant is fitted
    pub mean: Option<f64>,
    /// Non-seasonal AR coefficients `φ_1..φ_p`
    pub ar: Vec<f64>,
    /// Seasonal AR coefficients `Φ_1..Φ_P`
    pub seasonal_ar: Vec<f64>,
    /// Non-seasonal MA coefficients `θ_1..θ_q`
    pub ma: Vec<f64>,
    /// Seasonal MA coefficients `Θ_1..Θ_Q`
    pub seasonal_ma: Vec<f64>,
}

impl SarimaCoefficients {
    /// Combined AR polynomial `φ(B)Φ(B^s)`
    fn ar_polynomial(&self, period: usize) -> LagPolynomial {
        &LagPolynomial::autoregressive(&self.ar, 1)
            * &LagPolynomial::autoregressive(&self.seasonal_ar, period)
    }

    /// Combined MA polynomial `θ(B)Θ(B^s)`
    fn ma_polynomial(&self, period: usize) -> LagPolynomial {
        &LagPolynomial::moving_average(&self.ma, 1)
            * &LagPolynomial::moving_average(&self.seasonal_ma, period)
    }

    /// Names in the conventional `ar.L1` / `ma.S.L30` style
    fn named(&self, period: usize) -> BTreeMap<String, f64> {
        let mut named = BTreeMap::new();
        if let Some(mean) = self.mean {
            named.insert("const".to_string(), mean);
        }
        let blocks: [(&str, &[f64], usize); 4] = [
            ("ar.L", self.ar.as_slice(), 1),
            ("ar.S.L", self.seasonal_ar.as_slice(), period),
            ("ma.L", self.ma.as_slice(), 1),
            ("ma.S.L", self.seasonal_ma.as_slice(), period),
        ];
        for (prefix, values, step) in blocks {
            for (i, value) in values.iter().enumerate() {
                named.insert(format!("{}{}", prefix, (i + 1) * step), *value);
            }
        }
        named
    }
}

/// Unfitted seasonal ARIMA specification
#[derive(Debug, Clone)]
pub struct SarimaModel {
    name: String,
    order: Order,
    seasonal: SeasonalOrder,
    trend: Trend,
    fit: FitOptions,
}

impl SarimaModel {
    /// Create a model, validating the seasonal period and optimizer limits
    pub fn new(order: Order, seasonal: SeasonalOrder, trend: Trend, fit: FitOptions) -> Result<Self> {
        if seasonal.period == 0 {
            return Err(ForecastError::InvalidSpec(
                "Seasonal period must be positive".to_string(),
            ));
        }
        if seasonal.is_seasonal() && seasonal.period < 2 {
            return Err(ForecastError::InvalidSpec(format!(
                "Seasonal period must exceed 1 when seasonal terms are requested, got {}",
                seasonal.period
            )));
        }
        if fit.max_iterations == Some(0) || !(fit.tolerance > 0.0) {
            return Err(ForecastError::InvalidSpec(
                "Optimizer needs a positive iteration budget and tolerance".to_string(),
            ));
        }

        let name = format!(
            "SARIMA({},{},{})({},{},{})[{}]",
            order.p, order.d, order.q, seasonal.p, seasonal.d, seasonal.q, seasonal.period
        );
        Ok(Self {
            name,
            order,
            seasonal,
            trend,
            fit,
        })
    }

    /// Model described by a forecast specification
    pub fn from_spec(spec: &ForecastSpec) -> Result<Self> {
        Self::new(spec.order, spec.seasonal_order, spec.trend, spec.fit)
    }

    /// Number of estimated coefficients (the innovation variance excluded)
    pub fn parameter_count(&self) -> usize {
        let constant = usize::from(self.trend == Trend::Constant);
        constant + self.order.p + self.seasonal.p + self.order.q + self.seasonal.q
    }

    /// Smallest series length the model will train on
    pub fn minimum_observations(&self) -> usize {
        let s = self.seasonal.period;
        let differencing = self.order.d + self.seasonal.d * s;
        let ar_span = self.order.p + self.seasonal.p * s;
        let ma_span = self.order.q + self.seasonal.q * s;
        differencing + ar_span.max(ma_span) + self.parameter_count() + 1
    }

    fn differencing(&self) -> LagPolynomial {
        &LagPolynomial::differencing(self.order.d, 1)
            * &LagPolynomial::differencing(self.seasonal.d, self.seasonal.period)
    }

    fn unpack(&self, params: &[f64]) -> SarimaCoefficients {
        let (mean, rest) = match self.trend {
            Trend::Constant => (Some(params[0]), &params[1..]),
            Trend::None => (None, params),
        };
        let (ar, rest) = rest.split_at(self.order.p);
        let (seasonal_ar, rest) = rest.split_at(self.seasonal.p);
        let (ma, seasonal_ma) = rest.split_at(self.order.q);

        SarimaCoefficients {
            mean,
            ar: self.autoregressive(ar),
            seasonal_ar: self.autoregressive(seasonal_ar),
            ma: self.moving_average(ma),
            seasonal_ma: self.moving_average(seasonal_ma),
        }
    }

    fn autoregressive(&self, raw: &[f64]) -> Vec<f64> {
        if self.fit.enforce_stationarity {
            constrain_stationary(raw)
        } else {
            raw.to_vec()
        }
    }

    /// `1 + Σ θ_j B^j` is invertible exactly when `1 - Σ (-θ_j) B^j` is
    /// stationary, so the MA block reuses the AR map with a sign flip
    fn moving_average(&self, raw: &[f64]) -> Vec<f64> {
        if self.fit.enforce_invertibility {
            constrain_stationary(raw).into_iter().map(|c| -c).collect()
        } else {
            raw.to_vec()
        }
    }

    /// Starting point: differenced mean, Yule–Walker AR, zeros elsewhere
    fn initial_parameters(&self, differenced: &[f64]) -> Vec<f64> {
        let mut params = Vec::with_capacity(self.parameter_count());
        if self.trend == Trend::Constant {
            params.push(differenced.iter().sum::<f64>() / differenced.len() as f64);
        }

        let start = yule_walker(differenced, self.order.p).and_then(|phi| {
            if self.fit.enforce_stationarity {
                unconstrain_stationary(&phi)
            } else {
                Ok(phi)
            }
        });
        match start {
            Ok(ar) => params.extend(ar),
            Err(err) => {
                debug!(error = %err, "yule-walker start unusable, starting AR at zero");
                params.extend(std::iter::repeat(0.0).take(self.order.p));
            }
        }

        params.extend(std::iter::repeat(0.0).take(self.seasonal.p + self.order.q + self.seasonal.q));
        params
    }

    /// Concentrated negative log-likelihood of `params` and its innovations
    fn evaluate(&self, differenced: &[f64], params: &[f64]) -> (f64, Vec<f64>) {
        let coefficients = self.unpack(params);
        let ar = coefficients.ar_polynomial(self.seasonal.period);
        let ma = coefficients.ma_polynomial(self.seasonal.period);
        let mean = coefficients.mean.unwrap_or(0.0);

        let centered: Vec<f64> = differenced.iter().map(|w| w - mean).collect();
        let residuals = innovations(&centered, &ar, &ma);
        let start = ar.degree();
        let n_eff = (centered.len() - start) as f64;
        let css: f64 = residuals[start..].iter().map(|e| e * e).sum();

        let nll = 0.5 * n_eff * ((2.0 * PI * (css / n_eff).max(f64::MIN_POSITIVE)).ln() + 1.0);
        (nll, residuals)
    }
}

/// One-step innovations of a centered stationary series.
///
/// `e_t = Σ ar_i y_{t-i} - Σ_{j≥1} ma_j e_{t-j}` for `t ≥ deg(ar)`, zero
/// before that.
fn innovations(y: &[f64], ar: &LagPolynomial, ma: &LagPolynomial) -> Vec<f64> {
    let start = ar.degree();
    let ar_terms = ar.terms();
    let ma_terms = ma.terms();
    let mut residuals = vec![0.0; y.len()];

    for t in start..y.len() {
        let mut e = y[t];
        for &(lag, c) in &ar_terms {
            e += c * y[t - lag];
        }
        for &(lag, c) in &ma_terms {
            if lag > t {
                break;
            }
            e -= c * residuals[t - lag];
        }
        residuals[t] = e;
    }

    residuals
}

impl ForecastModel for SarimaModel {
    type Trained = TrainedSarima;

    fn train(&self, series: &TimeSeries) -> Result<TrainedSarima> {
        let last_timestamp = series.last_timestamp().ok_or_else(|| {
            ForecastError::InsufficientData("Cannot fit a model to an empty series".to_string())
        })?;
        let values = series.values();
        let required = self.minimum_observations();
        if values.len() < required {
            return Err(ForecastError::InsufficientData(format!(
                "{} needs at least {} observations, have {}",
                self.name,
                required,
                values.len()
            )));
        }

        let diff = self.differencing();
        let differenced = diff.apply(values)?;
        let initial = self.initial_parameters(&differenced);

        let config = NelderMeadConfig {
            max_iter: self.fit.iteration_budget(self.parameter_count()),
            f_tolerance: self.fit.tolerance,
            x_tolerance: PARAMETER_TOLERANCE,
            ..Default::default()
        };
        let result = nelder_mead(|params| self.evaluate(&differenced, params).0, &initial, &config)?;

        if !result.optimal_value.is_finite() {
            return Err(ForecastError::ConvergenceFailure {
                iterations: result.iterations,
                objective: result.optimal_value,
                reason: "objective is not finite at the optimum".to_string(),
            });
        }
        if !result.converged {
            return Err(ForecastError::ConvergenceFailure {
                iterations: result.iterations,
                objective: result.optimal_value,
                reason: "iteration budget exhausted before reaching tolerance".to_string(),
            });
        }

        let coefficients = self.unpack(&result.optimal_point);
        let (nll, residuals) = self.evaluate(&differenced, &result.optimal_point);
        let ar = coefficients.ar_polynomial(self.seasonal.period);
        let ma = coefficients.ma_polynomial(self.seasonal.period);

        let start = ar.degree();
        let observations = differenced.len() - start;
        let css: f64 = residuals[start..].iter().map(|e| e * e).sum();
        let sigma2 = css / observations as f64;

        let log_likelihood = -nll;
        let k = (self.parameter_count() + 1) as f64;
        let aic = -2.0 * log_likelihood + 2.0 * k;
        let bic = -2.0 * log_likelihood + k * (observations as f64).ln();

        debug!(
            model = %self.name,
            iterations = result.iterations,
            sigma2,
            log_likelihood,
            "fitted seasonal arima"
        );

        let full = &ar * &diff;
        let mut aligned = vec![0.0; diff.degree()];
        aligned.extend(residuals);

        Ok(TrainedSarima {
            name: self.name.clone(),
            period: self.seasonal.period,
            coefficients,
            ma,
            full,
            drift: ar.at_one(),
            history: values.to_vec(),
            last_timestamp,
            residuals: aligned,
            fitted_from: diff.degree() + start,
            sigma2,
            log_likelihood,
            aic,
            bic,
            observations,
            iterations: result.iterations,
            evaluations: result.evaluations,
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Fitted seasonal ARIMA, ready to forecast
#[derive(Debug, Clone)]
pub struct TrainedSarima {
    name: String,
    period: usize,
    coefficients: SarimaCoefficients,
    ma: LagPolynomial,
    /// `φ(B)Φ(B^s)(1-B)^d(1-B^s)^D`
    full: LagPolynomial,
    /// `φ(1)Φ(1)`, scales the mean into the intercept
    drift: f64,
    history: Vec<f64>,
    last_timestamp: DateTime<Utc>,
    /// Innovations aligned with `history`; zero before `fitted_from`
    residuals: Vec<f64>,
    /// First position with a computed one-step prediction
    fitted_from: usize,
    sigma2: f64,
    log_likelihood: f64,
    aic: f64,
    bic: f64,
    observations: usize,
    iterations: usize,
    evaluations: usize,
}

impl TrainedSarima {
    pub fn coefficients(&self) -> &SarimaCoefficients {
        &self.coefficients
    }

    /// Innovation variance
    pub fn sigma2(&self) -> f64 {
        self.sigma2
    }

    pub fn log_likelihood(&self) -> f64 {
        self.log_likelihood
    }

    pub fn aic(&self) -> f64 {
        self.aic
    }

    pub fn bic(&self) -> f64 {
        self.bic
    }

    /// In-sample innovations, starting at the first observation the model
    /// can predict (after differencing and the AR lags)
    pub fn residuals(&self) -> &[f64] {
        &self.residuals[self.fitted_from..]
    }

    /// Point forecasts on the original scale
    pub fn point_forecast(&self, horizon: usize) -> Vec<f64> {
        let n = self.history.len();
        let intercept = self.drift * self.coefficients.mean.unwrap_or(0.0);
        let full_terms = self.full.terms();
        let ma_terms = self.ma.terms();

        let mut x = self.history.clone();
        x.reserve(horizon);
        let mut e = self.residuals.clone();
        e.resize(n + horizon, 0.0);

        for t in n..n + horizon {
            let mut value = intercept;
            for &(lag, c) in &full_terms {
                value -= c * x[t - lag];
            }
            for &(lag, c) in &ma_terms {
                value += c * e[t - lag];
            }
            x.push(value);
        }

        x.split_off(n)
    }

    /// Forecast error variance for steps `1..=horizon`
    pub fn forecast_variances(&self, horizon: usize) -> Vec<f64> {
        psi_weights(&self.full, &self.ma, horizon)
            .iter()
            .scan(0.0, |acc, psi| {
                *acc += psi * psi;
                Some(self.sigma2 * *acc)
            })
            .collect()
    }
}

impl TrainedForecastModel for TrainedSarima {
    fn forecast(&self, horizon: usize, confidence_level: f64) -> Result<ForecastResult> {
        if horizon == 0 {
            return Err(ForecastError::InvalidSpec(
                "Forecast horizon must be positive".to_string(),
            ));
        }
        if !(confidence_level > 0.0 && confidence_level < 1.0) {
            return Err(ForecastError::InvalidSpec(format!(
                "Confidence level must be between 0 and 1 (exclusive), got {}",
                confidence_level
            )));
        }

        let normal =
            Normal::new(0.0, 1.0).map_err(|err| ForecastError::MathError(err.to_string()))?;
        let z = normal.inverse_cdf((1.0 + confidence_level) / 2.0);

        let points = future_daily_timestamps(self.last_timestamp, horizon)
            .into_iter()
            .zip(self.point_forecast(horizon))
            .zip(self.forecast_variances(horizon))
            .map(|((timestamp, point), variance)| {
                let margin = z * variance.sqrt();
                ForecastPoint {
                    timestamp,
                    point,
                    lower: point - margin,
                    upper: point + margin,
                }
            })
            .collect();

        ForecastResult::new(points, confidence_level, self.diagnostics())
    }

    fn fitted_values(&self) -> Vec<Option<f64>> {
        self.history
            .iter()
            .zip(self.residuals.iter())
            .enumerate()
            .map(|(t, (x, e))| (t >= self.fitted_from).then(|| x - e))
            .collect()
    }

    fn diagnostics(&self) -> FitDiagnostics {
        FitDiagnostics {
            model: self.name.clone(),
            coefficients: self.coefficients.named(self.period),
            sigma2: self.sigma2,
            log_likelihood: self.log_likelihood,
            aic: self.aic,
            bic: self.bic,
            observations: self.observations,
            iterations: self.iterations,
            evaluations: self.evaluations,
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}
