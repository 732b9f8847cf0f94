//! Multiclass support-vector classification.
//!
//! The optimization itself is `linfa-svm`'s SMO solver; this module only adds
//! the one-vs-rest reduction. One binary `Svm<f64, bool>` is fitted per class
//! and predictions take the class whose decision function scores highest. The
//! decision values are rebuilt from the solver's public `alpha`/`rho` and the
//! retained support rows (linear: collapse to a weight vector, RBF: keep the
//! nonzero-alpha rows).

use linfa::prelude::*;
use linfa_svm::Svm;
use ndarray::{Array1, ArrayView1};

use crate::error::{Error, Result};
use crate::{Matrix, Vector};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum KernelFamily {
    Linear,
    Rbf,
}

impl KernelFamily {
    pub fn name(self) -> &'static str {
        match self {
            KernelFamily::Linear => "linear",
            KernelFamily::Rbf => "rbf",
        }
    }
}

impl std::fmt::Display for KernelFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// One grid point: C and gamma are exponent-scaled, C = 2^ce, gamma = 2^ge.
/// The gamma exponent is carried (and reported) for linear kernels too even
/// though the kernel ignores it, so sweep logs stay rectangular.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Hyperparams {
    pub kernel: KernelFamily,
    pub c_exponent: i32,
    pub gamma_exponent: i32,
}

impl Hyperparams {
    pub fn c(&self) -> f64 {
        2f64.powi(self.c_exponent)
    }

    pub fn gamma(&self) -> f64 {
        2f64.powi(self.gamma_exponent)
    }
}

impl std::fmt::Display for Hyperparams {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} C=2^{} gamma=2^{}",
            self.kernel, self.c_exponent, self.gamma_exponent
        )
    }
}

#[derive(Debug)]
enum DecisionFn {
    Linear {
        weights: Vector,
        rho: f64,
    },
    Rbf {
        alpha: Vec<f64>,
        support: Matrix,
        gamma: f64,
        rho: f64,
    },
}

impl DecisionFn {
    fn n_features(&self) -> usize {
        match self {
            DecisionFn::Linear { weights, .. } => weights.len(),
            DecisionFn::Rbf { support, .. } => support.ncols(),
        }
    }

    fn evaluate(&self, x: ArrayView1<f64>) -> f64 {
        match self {
            DecisionFn::Linear { weights, rho } => weights.dot(&x) - rho,
            DecisionFn::Rbf {
                alpha,
                support,
                gamma,
                rho,
            } => {
                let mut sum = 0.0;
                for (alpha_i, row) in alpha.iter().zip(support.rows()) {
                    let sq_dist: f64 = x
                        .iter()
                        .zip(row.iter())
                        .map(|(a, b)| (a - b) * (a - b))
                        .sum();
                    sum += alpha_i * (-gamma * sq_dist).exp();
                }
                sum - rho
            }
        }
    }
}

/// One-vs-rest multiclass SVM.
#[derive(Debug)]
pub struct MulticlassSvm {
    params: Hyperparams,
    classifiers: Vec<(usize, DecisionFn)>,
}

impl MulticlassSvm {
    /// Fits one binary classifier per class present in `y`.
    ///
    /// At least two distinct classes must be present; a single-class training
    /// partition has no decision boundary to learn and is reported as a
    /// numerical failure so sweeps can record and move on.
    pub fn fit(params: Hyperparams, x: &Matrix, y: &[usize]) -> Result<Self> {
        if x.nrows() == 0 {
            return Err(Error::InvalidParam("cannot fit on an empty matrix".to_string()));
        }
        if x.nrows() != y.len() {
            return Err(Error::InvalidParam(format!(
                "feature rows ({}) and labels ({}) must match",
                x.nrows(),
                y.len()
            )));
        }

        let mut classes: Vec<usize> = y.to_vec();
        classes.sort_unstable();
        classes.dedup();
        if classes.len() < 2 {
            return Err(Error::Numerical(format!(
                "training partition contains {} distinct class(es), need at least 2",
                classes.len()
            )));
        }

        let mut classifiers = Vec::with_capacity(classes.len());
        for &class in &classes {
            let targets: Vec<bool> = y.iter().map(|&label| label == class).collect();
            let decision = Self::fit_binary(params, x, targets)?;
            classifiers.push((class, decision));
        }
        Ok(Self { params, classifiers })
    }

    fn fit_binary(params: Hyperparams, x: &Matrix, targets: Vec<bool>) -> Result<DecisionFn> {
        let dataset = linfa::Dataset::new(x.clone(), Array1::from_vec(targets));
        let c = params.c();
        let base = Svm::<f64, bool>::params().pos_neg_weights(c, c);
        let fitted = match params.kernel {
            KernelFamily::Linear => base.linear_kernel().fit(&dataset),
            // KernelMethod::Gaussian(eps) is exp(-||a - b||^2 / eps), so
            // gamma maps to eps = 1/gamma; the rebuilt decision function
            // below uses exp(-gamma * ||a - b||^2) to match.
            KernelFamily::Rbf => base.gaussian_kernel(1.0 / params.gamma()).fit(&dataset),
        }
        .map_err(|e| Error::Numerical(e.to_string()))?;

        let rho = fitted.rho;
        match params.kernel {
            KernelFamily::Linear => {
                let mut weights = Vector::zeros(x.ncols());
                for (alpha_i, row) in fitted.alpha.iter().zip(x.rows()) {
                    if *alpha_i != 0.0 {
                        weights.scaled_add(*alpha_i, &row);
                    }
                }
                Ok(DecisionFn::Linear { weights, rho })
            }
            KernelFamily::Rbf => {
                let kept: Vec<usize> = fitted
                    .alpha
                    .iter()
                    .enumerate()
                    .filter(|(_, a)| a.abs() > 1e-12)
                    .map(|(i, _)| i)
                    .collect();
                let mut support = Matrix::zeros((kept.len(), x.ncols()));
                let mut alpha = Vec::with_capacity(kept.len());
                for (row, &idx) in kept.iter().enumerate() {
                    support.row_mut(row).assign(&x.row(idx));
                    alpha.push(fitted.alpha[idx]);
                }
                Ok(DecisionFn::Rbf {
                    alpha,
                    support,
                    gamma: params.gamma(),
                    rho,
                })
            }
        }
    }

    pub fn params(&self) -> Hyperparams {
        self.params
    }

    /// Class ids with a fitted classifier, ascending.
    pub fn classes(&self) -> Vec<usize> {
        self.classifiers.iter().map(|(class, _)| *class).collect()
    }

    /// Predicts the class with the highest one-vs-rest decision value per row.
    pub fn predict(&self, x: &Matrix) -> Result<Vec<usize>> {
        if self.classifiers.is_empty() {
            return Err(Error::InvalidParam("model has no classifiers".to_string()));
        }
        let fitted_width = self.classifiers[0].1.n_features();
        if x.ncols() != fitted_width {
            return Err(Error::SchemaMismatch {
                expected: format!("{} columns", fitted_width),
                got: format!("{} columns", x.ncols()),
            });
        }
        let mut predictions = Vec::with_capacity(x.nrows());
        for row in x.rows() {
            let mut best = (self.classifiers[0].0, f64::NEG_INFINITY);
            for (class, decision) in &self.classifiers {
                let value = decision.evaluate(row);
                if value > best.1 {
                    best = (*class, value);
                }
            }
            predictions.push(best.0);
        }
        Ok(predictions)
    }

    /// Fraction of rows predicted correctly.
    pub fn score(&self, x: &Matrix, y: &[usize]) -> Result<f64> {
        if x.nrows() != y.len() {
            return Err(Error::InvalidParam(format!(
                "feature rows ({}) and labels ({}) must match",
                x.nrows(),
                y.len()
            )));
        }
        let predictions = self.predict(x)?;
        let correct = predictions
            .iter()
            .zip(y.iter())
            .filter(|(pred, actual)| pred == actual)
            .count();
        Ok(correct as f64 / y.len() as f64)
    }
}
