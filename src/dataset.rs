//! NSL-KDD record loading and dataset partitioning.
//!
//! Record files are headerless comma-delimited CSV with 43 columns: 41
//! features (38 continuous, 3 nominal), the raw attack name, and a difficulty
//! score. The feature-name manifest is a separate single-column CSV listing
//! the 41 feature names in order. Both are read from injected `io::Read`
//! sources so callers decide where the bytes come from.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use ndarray::s;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::Deserialize;

use crate::error::{Error, Result};
use crate::Matrix;

/// Canonical feature names, in file column order.
pub const FIELD_NAMES: [&str; 41] = [
    "duration",
    "protocol_type",
    "service",
    "flag",
    "src_bytes",
    "dst_bytes",
    "land",
    "wrong_fragment",
    "urgent",
    "hot",
    "num_failed_logins",
    "logged_in",
    "num_compromised",
    "root_shell",
    "su_attempted",
    "num_root",
    "num_file_creations",
    "num_shells",
    "num_access_files",
    "num_outbound_cmds",
    "is_host_login",
    "is_guest_login",
    "count",
    "srv_count",
    "serror_rate",
    "srv_serror_rate",
    "rerror_rate",
    "srv_rerror_rate",
    "same_srv_rate",
    "diff_srv_rate",
    "srv_diff_host_rate",
    "dst_host_count",
    "dst_host_srv_count",
    "dst_host_same_srv_rate",
    "dst_host_diff_srv_rate",
    "dst_host_same_src_port_rate",
    "dst_host_srv_diff_host_rate",
    "dst_host_serror_rate",
    "dst_host_srv_serror_rate",
    "dst_host_rerror_rate",
    "dst_host_srv_rerror_rate",
];

/// The three nominal columns expanded by one-hot encoding.
pub const NOMINAL_FIELDS: [&str; 3] = ["protocol_type", "service", "flag"];

/// One network connection summary. Field order matches the file columns so
/// headerless positional deserialization works.
#[derive(Debug, Clone, Deserialize)]
pub struct KddRecord {
    pub duration: f64,
    pub protocol_type: String,
    pub service: String,
    pub flag: String,
    pub src_bytes: f64,
    pub dst_bytes: f64,
    pub land: f64,
    pub wrong_fragment: f64,
    pub urgent: f64,
    pub hot: f64,
    pub num_failed_logins: f64,
    pub logged_in: f64,
    pub num_compromised: f64,
    pub root_shell: f64,
    pub su_attempted: f64,
    pub num_root: f64,
    pub num_file_creations: f64,
    pub num_shells: f64,
    pub num_access_files: f64,
    pub num_outbound_cmds: f64,
    pub is_host_login: f64,
    pub is_guest_login: f64,
    pub count: f64,
    pub srv_count: f64,
    pub serror_rate: f64,
    pub srv_serror_rate: f64,
    pub rerror_rate: f64,
    pub srv_rerror_rate: f64,
    pub same_srv_rate: f64,
    pub diff_srv_rate: f64,
    pub srv_diff_host_rate: f64,
    pub dst_host_count: f64,
    pub dst_host_srv_count: f64,
    pub dst_host_same_srv_rate: f64,
    pub dst_host_diff_srv_rate: f64,
    pub dst_host_same_src_port_rate: f64,
    pub dst_host_srv_diff_host_rate: f64,
    pub dst_host_serror_rate: f64,
    pub dst_host_srv_serror_rate: f64,
    pub dst_host_rerror_rate: f64,
    pub dst_host_srv_rerror_rate: f64,
    pub attack: String,
    pub difficulty: f64,
}

impl KddRecord {
    /// The 38 continuous features, in manifest order (nominal columns and the
    /// difficulty score excluded).
    pub fn numeric(&self) -> [f64; 38] {
        [
            self.duration,
            self.src_bytes,
            self.dst_bytes,
            self.land,
            self.wrong_fragment,
            self.urgent,
            self.hot,
            self.num_failed_logins,
            self.logged_in,
            self.num_compromised,
            self.root_shell,
            self.su_attempted,
            self.num_root,
            self.num_file_creations,
            self.num_shells,
            self.num_access_files,
            self.num_outbound_cmds,
            self.is_host_login,
            self.is_guest_login,
            self.count,
            self.srv_count,
            self.serror_rate,
            self.srv_serror_rate,
            self.rerror_rate,
            self.srv_rerror_rate,
            self.same_srv_rate,
            self.diff_srv_rate,
            self.srv_diff_host_rate,
            self.dst_host_count,
            self.dst_host_srv_count,
            self.dst_host_same_srv_rate,
            self.dst_host_diff_srv_rate,
            self.dst_host_same_src_port_rate,
            self.dst_host_srv_diff_host_rate,
            self.dst_host_serror_rate,
            self.dst_host_srv_serror_rate,
            self.dst_host_rerror_rate,
            self.dst_host_srv_rerror_rate,
        ]
    }

    /// Values of the three nominal columns, in `NOMINAL_FIELDS` order.
    pub fn nominal(&self) -> [&str; 3] {
        [&self.protocol_type, &self.service, &self.flag]
    }
}

/// Names of the continuous features, in `numeric()` order.
pub fn numeric_field_names() -> Vec<String> {
    FIELD_NAMES
        .iter()
        .filter(|name| !NOMINAL_FIELDS.contains(name))
        .map(|name| name.to_string())
        .collect()
}

/// Reads headerless records from any byte source.
pub fn read_records<R: Read>(source: R) -> Result<Vec<KddRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .from_reader(source);
    let mut records = Vec::new();
    for row in reader.deserialize() {
        records.push(row?);
    }
    Ok(records)
}

pub fn load_records<P: AsRef<Path>>(path: P) -> Result<Vec<KddRecord>> {
    read_records(File::open(path)?)
}

/// Reads the single-column field-name manifest and checks it against the
/// canonical schema. A count or name difference means the file belongs to a
/// different dataset variant than the record schema handles.
pub fn read_field_names<R: Read>(source: R) -> Result<Vec<String>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(source);
    let mut names = Vec::new();
    for row in reader.records() {
        let row = row?;
        if let Some(name) = row.get(0) {
            names.push(name.trim().to_string());
        }
    }
    if names.len() != FIELD_NAMES.len() {
        return Err(Error::SchemaMismatch {
            expected: format!("{} field names", FIELD_NAMES.len()),
            got: format!("{}", names.len()),
        });
    }
    for (got, expected) in names.iter().zip(FIELD_NAMES.iter()) {
        if got != expected {
            return Err(Error::SchemaMismatch {
                expected: (*expected).to_string(),
                got: got.clone(),
            });
        }
    }
    Ok(names)
}

pub fn load_field_names<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
    read_field_names(File::open(path)?)
}

/// Fully numeric feature matrix with class ids, produced by the encoder and
/// sliced into partitions from there on.
#[derive(Clone, Debug)]
pub struct EncodedFrame {
    pub features: Matrix,
    pub labels: Vec<usize>,
    pub feature_names: Vec<String>,
}

impl EncodedFrame {
    pub fn new(features: Matrix, labels: Vec<usize>, feature_names: Vec<String>) -> Result<Self> {
        if features.nrows() != labels.len() {
            return Err(Error::InvalidParam(format!(
                "feature rows ({}) and labels ({}) must match",
                features.nrows(),
                labels.len()
            )));
        }
        if features.ncols() != feature_names.len() {
            return Err(Error::SchemaMismatch {
                expected: format!("{} feature names", features.ncols()),
                got: format!("{}", feature_names.len()),
            });
        }
        Ok(Self {
            features,
            labels,
            feature_names,
        })
    }

    pub fn n_samples(&self) -> usize {
        self.features.nrows()
    }

    pub fn n_features(&self) -> usize {
        self.features.ncols()
    }

    fn select_rows(&self, indices: &[usize]) -> Result<Self> {
        let mut features = Matrix::zeros((indices.len(), self.n_features()));
        let mut labels = Vec::with_capacity(indices.len());
        for (row, &idx) in indices.iter().enumerate() {
            features.row_mut(row).assign(&self.features.row(idx));
            labels.push(self.labels[idx]);
        }
        EncodedFrame::new(features, labels, self.feature_names.clone())
    }

    /// Slices the combined frame back at the original train/test boundary.
    ///
    /// The two halves share the encoder's column set by construction; the
    /// schema equality is still asserted so a corrupted frame fails here and
    /// not deep inside a fit.
    pub fn split_at(&self, boundary: usize) -> Result<(Self, Self)> {
        if boundary == 0 || boundary >= self.n_samples() {
            return Err(Error::InvalidParam(format!(
                "split boundary {} outside 1..{}",
                boundary,
                self.n_samples()
            )));
        }
        let head = EncodedFrame::new(
            self.features.slice(s![..boundary, ..]).to_owned(),
            self.labels[..boundary].to_vec(),
            self.feature_names.clone(),
        )?;
        let tail = EncodedFrame::new(
            self.features.slice(s![boundary.., ..]).to_owned(),
            self.labels[boundary..].to_vec(),
            self.feature_names.clone(),
        )?;
        if head.feature_names != tail.feature_names {
            return Err(Error::SchemaMismatch {
                expected: format!("{} columns", head.n_features()),
                got: format!("{} columns", tail.n_features()),
            });
        }
        Ok((head, tail))
    }

    /// Seeded random train/validation split. Simple random, not stratified:
    /// with the rarest class carrying only tens of rows a validation draw can
    /// miss it entirely, which callers observe rather than paper over.
    pub fn train_validation_split(
        &self,
        validation_fraction: f64,
        seed: u64,
    ) -> Result<(Self, Self)> {
        if validation_fraction <= 0.0 || validation_fraction >= 1.0 {
            return Err(Error::InvalidParam(format!(
                "validation_fraction must be in (0, 1), got {}",
                validation_fraction
            )));
        }
        let n_samples = self.n_samples();
        let n_validation = (n_samples as f64 * validation_fraction).round() as usize;
        if n_validation == 0 || n_validation == n_samples {
            return Err(Error::InvalidParam(format!(
                "validation_fraction {} leaves an empty partition for {} samples",
                validation_fraction, n_samples
            )));
        }

        let mut indices: Vec<usize> = (0..n_samples).collect();
        let mut rng = StdRng::seed_from_u64(seed);
        indices.shuffle(&mut rng);

        let train = self.select_rows(&indices[n_validation..])?;
        let validation = self.select_rows(&indices[..n_validation])?;
        Ok((train, validation))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;
    use std::collections::HashSet;

    const ROW: &str = "0,tcp,http,SF,181,5450,0,0,0,0,0,1,0,0,0,0,0,0,0,0,0,0,8,8,0.0,0.0,0.0,0.0,1.0,0.0,0.0,9,9,1.0,0.0,0.11,0.0,0.0,0.0,0.0,0.0,normal,21";

    #[test]
    fn test_read_records() {
        let records = read_records(ROW.as_bytes()).unwrap();
        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.protocol_type, "tcp");
        assert_eq!(record.service, "http");
        assert_eq!(record.flag, "SF");
        assert_eq!(record.attack, "normal");
        assert_eq!(record.src_bytes, 181.0);
        assert_eq!(record.numeric().len(), 38);
    }

    #[test]
    fn test_field_name_manifest_roundtrip() {
        let manifest = FIELD_NAMES.join("\n");
        let names = read_field_names(manifest.as_bytes()).unwrap();
        assert_eq!(names.len(), 41);
        assert_eq!(names[0], "duration");
    }

    #[test]
    fn test_field_name_manifest_mismatch() {
        let manifest = "duration\nbogus_column";
        assert!(read_field_names(manifest.as_bytes()).is_err());
    }

    fn toy_frame(n: usize) -> EncodedFrame {
        let features =
            Array2::from_shape_fn((n, 3), |(i, j)| (i * 3 + j) as f64);
        let labels = (0..n).map(|i| i % 2).collect();
        let names = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        EncodedFrame::new(features, labels, names).unwrap()
    }

    #[test]
    fn test_split_at_preserves_row_counts() {
        let frame = toy_frame(10);
        let (head, tail) = frame.split_at(7).unwrap();
        assert_eq!(head.n_samples(), 7);
        assert_eq!(tail.n_samples(), 3);
        assert_eq!(head.feature_names, tail.feature_names);
        assert_eq!(tail.features[[0, 0]], 21.0);
    }

    #[test]
    fn test_split_at_rejects_bad_boundary() {
        let frame = toy_frame(4);
        assert!(frame.split_at(0).is_err());
        assert!(frame.split_at(4).is_err());
    }

    #[test]
    fn test_train_validation_split_disjoint_and_covering() {
        let frame = toy_frame(20);
        let (train, validation) = frame.train_validation_split(0.3, 7).unwrap();
        assert_eq!(train.n_samples(), 14);
        assert_eq!(validation.n_samples(), 6);

        // First column values identify original rows uniquely.
        let ids = |f: &EncodedFrame| -> HashSet<i64> {
            f.features.column(0).iter().map(|v| *v as i64).collect()
        };
        let train_ids = ids(&train);
        let validation_ids = ids(&validation);
        assert!(train_ids.is_disjoint(&validation_ids));
        let all: HashSet<i64> = train_ids.union(&validation_ids).copied().collect();
        assert_eq!(all, ids(&frame));
    }

    #[test]
    fn test_train_validation_split_is_seeded() {
        let frame = toy_frame(30);
        let (train_a, _) = frame.train_validation_split(0.3, 42).unwrap();
        let (train_b, _) = frame.train_validation_split(0.3, 42).unwrap();
        let (train_c, _) = frame.train_validation_split(0.3, 43).unwrap();
        assert_eq!(train_a.features, train_b.features);
        assert_eq!(train_a.labels, train_b.labels);
        assert_ne!(train_a.features, train_c.features);
    }

    #[test]
    fn test_invalid_fraction() {
        let frame = toy_frame(10);
        assert!(frame.train_validation_split(0.0, 1).is_err());
        assert!(frame.train_validation_split(1.0, 1).is_err());
    }
}
