//! Exhaustive hyperparameter grid search.
//!
//! Every `(kernel, C-exponent, gamma-exponent)` triple in the grid gets a
//! fresh classifier fitted on the training partition and scored on the
//! validation partition. No early stopping and no pruning; combinations are
//! independent so they run across a rayon pool. A failed fit is recorded as a
//! `Failure` entry and never aborts the sweep. The returned log is sorted by
//! kernel then exponents regardless of completion order.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use std::time::Duration;

use log::{debug, info, warn};
use rayon::prelude::*;

use crate::dataset::EncodedFrame;
use crate::error::{Error, Result};
use crate::svm::{Hyperparams, KernelFamily, MulticlassSvm};

#[derive(Clone, Debug)]
pub struct SweepGrid {
    pub kernels: Vec<KernelFamily>,
    pub c_exponents: Vec<i32>,
    pub gamma_exponents: Vec<i32>,
}

impl Default for SweepGrid {
    fn default() -> Self {
        Self {
            kernels: vec![KernelFamily::Linear, KernelFamily::Rbf],
            c_exponents: (-3..=4).collect(),
            gamma_exponents: (-7..=0).collect(),
        }
    }
}

impl SweepGrid {
    /// Cartesian product in deterministic kernel -> C -> gamma order.
    pub fn combinations(&self) -> Vec<Hyperparams> {
        let mut combos =
            Vec::with_capacity(self.kernels.len() * self.c_exponents.len() * self.gamma_exponents.len());
        for &kernel in &self.kernels {
            for &c_exponent in &self.c_exponents {
                for &gamma_exponent in &self.gamma_exponents {
                    combos.push(Hyperparams {
                        kernel,
                        c_exponent,
                        gamma_exponent,
                    });
                }
            }
        }
        combos
    }
}

#[derive(Clone, Debug)]
pub enum SweepOutcome {
    Success { params: Hyperparams, score: f64 },
    Failure { params: Hyperparams, cause: String },
}

impl SweepOutcome {
    pub fn params(&self) -> Hyperparams {
        match self {
            SweepOutcome::Success { params, .. } => *params,
            SweepOutcome::Failure { params, .. } => *params,
        }
    }

    pub fn score(&self) -> Option<f64> {
        match self {
            SweepOutcome::Success { score, .. } => Some(*score),
            SweepOutcome::Failure { .. } => None,
        }
    }
}

impl std::fmt::Display for SweepOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SweepOutcome::Success { params, score } => {
                write!(f, "{} accuracy={:.4}", params, score)
            }
            SweepOutcome::Failure { params, cause } => write!(f, "{} failed: {}", params, cause),
        }
    }
}

#[derive(Clone, Debug)]
pub struct SweepConfig {
    /// Fit combinations across the rayon pool instead of sequentially.
    pub parallel: bool,
    /// Wall-clock budget per combination. A fit that exceeds it is recorded
    /// as a failure; the abandoned fit keeps its worker thread until the
    /// solver returns.
    pub fit_timeout: Option<Duration>,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            parallel: true,
            fit_timeout: None,
        }
    }
}

/// Shared flag checked between combinations, so a long sweep can be stopped
/// cleanly from another thread. Already-started fits run to completion.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

fn score_once(params: Hyperparams, train: &EncodedFrame, validation: &EncodedFrame) -> Result<f64> {
    let model = MulticlassSvm::fit(params, &train.features, &train.labels)?;
    model.score(&validation.features, &validation.labels)
}

fn evaluate(
    params: Hyperparams,
    train: &Arc<EncodedFrame>,
    validation: &Arc<EncodedFrame>,
    timeout: Option<Duration>,
) -> SweepOutcome {
    let result = match timeout {
        None => score_once(params, train, validation),
        Some(limit) => {
            let (tx, rx) = mpsc::channel();
            let train = Arc::clone(train);
            let validation = Arc::clone(validation);
            std::thread::spawn(move || {
                let _ = tx.send(score_once(params, &train, &validation));
            });
            match rx.recv_timeout(limit) {
                Ok(result) => result,
                Err(_) => Err(Error::Numerical(format!("timed out after {:?}", limit))),
            }
        }
    };

    match result {
        Ok(score) => {
            debug!("{} accuracy={:.4}", params, score);
            SweepOutcome::Success { params, score }
        }
        Err(e) => {
            warn!("{} failed: {}", params, e);
            SweepOutcome::Failure {
                params,
                cause: e.to_string(),
            }
        }
    }
}

/// Runs the full sweep. Combinations skipped after cancellation simply do not
/// appear in the log.
pub fn run(
    grid: &SweepGrid,
    train: &EncodedFrame,
    validation: &EncodedFrame,
    config: &SweepConfig,
    cancel: &CancelToken,
) -> Vec<SweepOutcome> {
    let combos = grid.combinations();
    info!(
        "sweeping {} combinations ({} train rows, {} validation rows)",
        combos.len(),
        train.n_samples(),
        validation.n_samples()
    );

    let train = Arc::new(train.clone());
    let validation = Arc::new(validation.clone());
    let evaluate_one = |params: Hyperparams| -> Option<SweepOutcome> {
        if cancel.is_cancelled() {
            return None;
        }
        Some(evaluate(params, &train, &validation, config.fit_timeout))
    };

    let mut outcomes: Vec<SweepOutcome> = if config.parallel {
        combos.par_iter().filter_map(|&params| evaluate_one(params)).collect()
    } else {
        combos.iter().filter_map(|&params| evaluate_one(params)).collect()
    };

    outcomes.sort_by_key(SweepOutcome::params);
    outcomes
}

/// Highest-scoring successful combination, if any fit succeeded.
pub fn best(outcomes: &[SweepOutcome]) -> Option<(Hyperparams, f64)> {
    outcomes
        .iter()
        .filter_map(|outcome| match outcome {
            SweepOutcome::Success { params, score } => Some((*params, *score)),
            SweepOutcome::Failure { .. } => None,
        })
        .max_by(|a, b| a.1.total_cmp(&b.1))
}
