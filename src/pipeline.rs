//! The end-to-end preparation and evaluation pipeline.
//!
//! Stage order is fixed: label normalization, one-hot encoding over the
//! combined record set, re-split at the original train/test boundary, seeded
//! train/validation split, min-max scaling fitted on the training rows only.
//! Both the sweep path and the final-evaluation path go through the same
//! encode-and-split step; they differ only in which rows the scaler and the
//! classifier see.

use log::info;

use crate::dataset::{EncodedFrame, KddRecord};
use crate::error::Result;
use crate::labels::encode_labels;
use crate::metrics::{classification_report, ClassificationReport};
use crate::preprocessing::{MinMaxScaler, OneHotEncoder};
use crate::svm::{Hyperparams, MulticlassSvm};

#[derive(Clone, Copy, Debug)]
pub struct PipelineConfig {
    pub validation_fraction: f64,
    pub seed: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            validation_fraction: 0.3,
            seed: 42,
        }
    }
}

/// Scaled, disjoint partitions ready for fitting and scoring.
#[derive(Clone, Debug)]
pub struct Prepared {
    pub train: EncodedFrame,
    pub validation: EncodedFrame,
    pub test: EncodedFrame,
}

/// Encodes train and test jointly and slices the frame back at the original
/// boundary, so both partitions share one column schema by construction.
fn encode_and_split(
    train_records: &[KddRecord],
    test_records: &[KddRecord],
) -> Result<(EncodedFrame, EncodedFrame)> {
    let mut combined = Vec::with_capacity(train_records.len() + test_records.len());
    combined.extend_from_slice(train_records);
    combined.extend_from_slice(test_records);

    // Labels first: an unmapped attack name fails before any encoding work.
    let attacks: Vec<&str> = combined.iter().map(|r| r.attack.as_str()).collect();
    let labels = encode_labels(&attacks)?;

    let mut encoder = OneHotEncoder::new();
    let features = encoder.fit_transform(&combined)?;
    let frame = EncodedFrame::new(features, labels, encoder.feature_names()?)?;
    info!(
        "encoded {} records into {} feature columns",
        frame.n_samples(),
        frame.n_features()
    );
    frame.split_at(train_records.len())
}

/// Prepares the three partitions for a hyperparameter sweep: the original
/// training set is split into train/validation, the scaler is fitted on the
/// train rows and applied to all three partitions.
pub fn prepare(
    train_records: &[KddRecord],
    test_records: &[KddRecord],
    config: &PipelineConfig,
) -> Result<Prepared> {
    let (train_full, mut test) = encode_and_split(train_records, test_records)?;
    let (mut train, mut validation) =
        train_full.train_validation_split(config.validation_fraction, config.seed)?;
    info!(
        "partitions: {} train / {} validation / {} test",
        train.n_samples(),
        validation.n_samples(),
        test.n_samples()
    );

    let mut scaler = MinMaxScaler::new();
    train.features = scaler.fit_transform(&train.features)?;
    validation.features = scaler.transform(&validation.features)?;
    test.features = scaler.transform(&test.features)?;

    Ok(Prepared {
        train,
        validation,
        test,
    })
}

/// Final run: one classifier with the chosen triple, fitted on the full
/// original training set (train and validation recombined), reported on the
/// held-out test set.
pub fn train_and_evaluate(
    train_records: &[KddRecord],
    test_records: &[KddRecord],
    params: Hyperparams,
) -> Result<ClassificationReport> {
    let (mut train_full, mut test) = encode_and_split(train_records, test_records)?;

    let mut scaler = MinMaxScaler::new();
    train_full.features = scaler.fit_transform(&train_full.features)?;
    test.features = scaler.transform(&test.features)?;

    info!("fitting {} on {} training rows", params, train_full.n_samples());
    let model = MulticlassSvm::fit(params, &train_full.features, &train_full.labels)?;
    let predictions = model.predict(&test.features)?;
    classification_report(&test.labels, &predictions)
}
