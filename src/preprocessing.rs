//! Feature encoding and scaling.
//!
//! `OneHotEncoder` is fitted on the combined train+test record set so both
//! partitions come out with the identical column schema even when a category
//! value appears in only one of them. `MinMaxScaler` is fitted on the training
//! partition only and the same fitted transform is applied everywhere else.

use std::collections::BTreeSet;

use ndarray::Axis;

use crate::dataset::{numeric_field_names, KddRecord, NOMINAL_FIELDS};
use crate::error::{Error, Result};
use crate::{Matrix, Vector};

pub struct OneHotEncoder {
    /// Sorted distinct values per nominal column, `NOMINAL_FIELDS` order.
    categories: Option<[Vec<String>; 3]>,
}

impl OneHotEncoder {
    pub fn new() -> Self {
        Self { categories: None }
    }

    /// Collects the distinct values of each nominal column. Sorted order keeps
    /// indicator column indices stable across runs.
    pub fn fit(&mut self, records: &[KddRecord]) -> Result<()> {
        if records.is_empty() {
            return Err(Error::InvalidParam(
                "cannot fit encoder on zero records".to_string(),
            ));
        }
        let mut sets: [BTreeSet<String>; 3] = Default::default();
        for record in records {
            for (set, value) in sets.iter_mut().zip(record.nominal()) {
                set.insert(value.to_string());
            }
        }
        self.categories = Some(sets.map(|set| set.into_iter().collect()));
        Ok(())
    }

    /// Expands records into the numeric feature matrix: the 38 continuous
    /// columns in manifest order, then one indicator column per fitted
    /// category value. The original nominal columns are gone.
    pub fn transform(&self, records: &[KddRecord]) -> Result<Matrix> {
        let categories = self
            .categories
            .as_ref()
            .ok_or_else(|| Error::InvalidParam("encoder not fitted. Call fit() first.".to_string()))?;

        let n_indicator: usize = categories.iter().map(Vec::len).sum();
        let n_cols = 38 + n_indicator;
        let mut matrix = Matrix::zeros((records.len(), n_cols));

        for (row, record) in records.iter().enumerate() {
            for (col, value) in record.numeric().into_iter().enumerate() {
                matrix[[row, col]] = value;
            }
            let mut offset = 38;
            for (column, values) in categories.iter().enumerate() {
                let value = record.nominal()[column];
                let position = values.binary_search_by(|v| v.as_str().cmp(value)).map_err(|_| {
                    Error::SchemaMismatch {
                        expected: format!("fitted value of {}", NOMINAL_FIELDS[column]),
                        got: format!("{}={}", NOMINAL_FIELDS[column], value),
                    }
                })?;
                matrix[[row, offset + position]] = 1.0;
                offset += values.len();
            }
        }
        Ok(matrix)
    }

    pub fn fit_transform(&mut self, records: &[KddRecord]) -> Result<Matrix> {
        self.fit(records)?;
        self.transform(records)
    }

    /// Output column names: continuous names then `column=value` indicators.
    pub fn feature_names(&self) -> Result<Vec<String>> {
        let categories = self
            .categories
            .as_ref()
            .ok_or_else(|| Error::InvalidParam("encoder not fitted. Call fit() first.".to_string()))?;
        let mut names = numeric_field_names();
        for (column, values) in categories.iter().enumerate() {
            for value in values {
                names.push(format!("{}={}", NOMINAL_FIELDS[column], value));
            }
        }
        Ok(names)
    }
}

impl Default for OneHotEncoder {
    fn default() -> Self {
        Self::new()
    }
}

pub struct MinMaxScaler {
    min: Option<Vector>,
    range: Option<Vector>,
}

impl MinMaxScaler {
    pub fn new() -> Self {
        Self {
            min: None,
            range: None,
        }
    }

    pub fn fit(&mut self, data: &Matrix) -> Result<()> {
        if data.nrows() == 0 {
            return Err(Error::InvalidParam(
                "cannot fit scaler on an empty matrix".to_string(),
            ));
        }
        let min = data.fold_axis(Axis(0), f64::INFINITY, |acc, &v| acc.min(v));
        let max = data.fold_axis(Axis(0), f64::NEG_INFINITY, |acc, &v| acc.max(v));
        self.range = Some(&max - &min);
        self.min = Some(min);
        Ok(())
    }

    /// Applies the fitted transform. Values outside the fitted range map
    /// outside [0, 1] and stay there: clamping would hide distributional shift
    /// between the partitions. Constant columns map to 0.
    pub fn transform(&self, data: &Matrix) -> Result<Matrix> {
        let min = self
            .min
            .as_ref()
            .ok_or_else(|| Error::InvalidParam("scaler not fitted. Call fit() first.".to_string()))?;
        let range = self
            .range
            .as_ref()
            .ok_or_else(|| Error::InvalidParam("scaler not fitted. Call fit() first.".to_string()))?;
        if data.ncols() != min.len() {
            return Err(Error::SchemaMismatch {
                expected: format!("{} columns", min.len()),
                got: format!("{} columns", data.ncols()),
            });
        }

        let mut result = data.clone();
        for mut row in result.axis_iter_mut(Axis(0)) {
            for (col, value) in row.iter_mut().enumerate() {
                *value = if range[col] == 0.0 {
                    0.0
                } else {
                    (*value - min[col]) / range[col]
                };
            }
        }
        Ok(result)
    }

    pub fn fit_transform(&mut self, data: &Matrix) -> Result<Matrix> {
        self.fit(data)?;
        self.transform(data)
    }
}

impl Default for MinMaxScaler {
    fn default() -> Self {
        Self::new()
    }
}
