//! NSL-KDD network-intrusion classification with a multiclass SVM.
//!
//! A batch pipeline over the NSL-KDD benchmark: load labeled connection
//! records, collapse raw attack names into five coarse categories, one-hot
//! encode the nominal columns over the combined train+test set, re-split at
//! the original boundary, min-max scale against the training rows, then either
//! sweep an exhaustive kernel/C/gamma grid against a held-out validation
//! split or fit one chosen configuration and report per-class
//! precision/recall/F1 on the test set.

pub use ndarray::{Array1, Array2, ArrayView1, ArrayView2};

pub mod dataset;
pub mod error;
pub mod labels;
pub mod metrics;
pub mod pipeline;
pub mod preprocessing;
pub mod svm;
pub mod sweep;

pub type Vector = Array1<f64>;
pub type Matrix = Array2<f64>;

pub use dataset::{EncodedFrame, KddRecord};
pub use error::{Error, Result};
pub use labels::Category;
pub use metrics::ClassificationReport;
pub use preprocessing::{MinMaxScaler, OneHotEncoder};
pub use svm::{Hyperparams, KernelFamily, MulticlassSvm};
pub use sweep::{CancelToken, SweepConfig, SweepGrid, SweepOutcome};
