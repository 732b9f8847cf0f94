//! Classification metrics: overall accuracy and the per-class
//! precision/recall/F1/support report.

use crate::error::{Error, Result};
use crate::labels::Category;

pub fn accuracy(y_true: &[usize], y_pred: &[usize]) -> Result<f64> {
    if y_true.len() != y_pred.len() {
        return Err(Error::InvalidParam(
            "y_true and y_pred must have the same length".to_string(),
        ));
    }
    if y_true.is_empty() {
        return Err(Error::InvalidParam("cannot score zero samples".to_string()));
    }
    let correct = y_true
        .iter()
        .zip(y_pred.iter())
        .filter(|(t, p)| t == p)
        .count();
    Ok(correct as f64 / y_true.len() as f64)
}

#[derive(Clone, Debug)]
pub struct ClassMetrics {
    pub class_id: usize,
    pub name: String,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub support: usize,
}

/// Per-class rows in class-id order plus the aggregate figures, so reports
/// line up run to run.
#[derive(Clone, Debug)]
pub struct ClassificationReport {
    pub classes: Vec<ClassMetrics>,
    pub accuracy: f64,
    pub macro_precision: f64,
    pub macro_recall: f64,
    pub macro_f1: f64,
    pub total_support: usize,
}

/// Computes the report over every class observed in either vector. Undefined
/// ratios (no predictions or no support for a class) count as 0.
pub fn classification_report(y_true: &[usize], y_pred: &[usize]) -> Result<ClassificationReport> {
    let overall = accuracy(y_true, y_pred)?;

    let mut class_ids: Vec<usize> = y_true.iter().chain(y_pred.iter()).copied().collect();
    class_ids.sort_unstable();
    class_ids.dedup();

    let mut classes = Vec::with_capacity(class_ids.len());
    for class in class_ids {
        let mut tp = 0usize;
        let mut fp = 0usize;
        let mut fn_ = 0usize;
        for (&t, &p) in y_true.iter().zip(y_pred.iter()) {
            match (t == class, p == class) {
                (true, true) => tp += 1,
                (false, true) => fp += 1,
                (true, false) => fn_ += 1,
                (false, false) => {}
            }
        }
        let precision = ratio(tp, tp + fp);
        let recall = ratio(tp, tp + fn_);
        let f1 = if precision + recall == 0.0 {
            0.0
        } else {
            2.0 * precision * recall / (precision + recall)
        };
        let name = match Category::from_id(class) {
            Ok(category) => category.name().to_string(),
            Err(_) => format!("class {}", class),
        };
        classes.push(ClassMetrics {
            class_id: class,
            name,
            precision,
            recall,
            f1,
            support: tp + fn_,
        });
    }

    let n = classes.len() as f64;
    Ok(ClassificationReport {
        accuracy: overall,
        macro_precision: classes.iter().map(|c| c.precision).sum::<f64>() / n,
        macro_recall: classes.iter().map(|c| c.recall).sum::<f64>() / n,
        macro_f1: classes.iter().map(|c| c.f1).sum::<f64>() / n,
        total_support: y_true.len(),
        classes,
    })
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

impl std::fmt::Display for ClassificationReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "{:<12} {:>10} {:>10} {:>10} {:>10}",
            "", "precision", "recall", "f1-score", "support"
        )?;
        for class in &self.classes {
            writeln!(
                f,
                "{:<12} {:>10.4} {:>10.4} {:>10.4} {:>10}",
                class.name, class.precision, class.recall, class.f1, class.support
            )?;
        }
        writeln!(f)?;
        writeln!(
            f,
            "{:<12} {:>10} {:>10} {:>10.4} {:>10}",
            "accuracy", "", "", self.accuracy, self.total_support
        )?;
        writeln!(
            f,
            "{:<12} {:>10.4} {:>10.4} {:>10.4} {:>10}",
            "macro avg", self.macro_precision, self.macro_recall, self.macro_f1, self.total_support
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accuracy() {
        let acc = accuracy(&[0, 1, 2, 1], &[0, 1, 1, 1]).unwrap();
        assert!((acc - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_accuracy_length_mismatch() {
        assert!(accuracy(&[0, 1], &[0]).is_err());
        assert!(accuracy(&[], &[]).is_err());
    }

    #[test]
    fn test_report_perfect_prediction() {
        let y = [0, 1, 1, 2, 2, 2];
        let report = classification_report(&y, &y).unwrap();
        assert_eq!(report.accuracy, 1.0);
        assert_eq!(report.classes.len(), 3);
        for class in &report.classes {
            assert_eq!(class.precision, 1.0);
            assert_eq!(class.recall, 1.0);
            assert_eq!(class.f1, 1.0);
        }
        assert_eq!(report.classes[2].support, 3);
        assert_eq!(report.total_support, 6);
    }

    #[test]
    fn test_report_manual_counts() {
        // class 0: tp=1 fp=1 fn=1; class 1: tp=2 fp=1 fn=1.
        let y_true = [0, 0, 1, 1, 1, 4];
        let y_pred = [0, 1, 1, 1, 0, 4];
        let report = classification_report(&y_true, &y_pred).unwrap();

        let dos = &report.classes[0];
        assert_eq!(dos.name, "dos");
        assert!((dos.precision - 0.5).abs() < 1e-12);
        assert!((dos.recall - 0.5).abs() < 1e-12);
        assert_eq!(dos.support, 2);

        let normal = &report.classes[1];
        assert!((normal.precision - 2.0 / 3.0).abs() < 1e-12);
        assert!((normal.recall - 2.0 / 3.0).abs() < 1e-12);

        let u2r = &report.classes[2];
        assert_eq!(u2r.name, "u2r");
        assert_eq!(u2r.support, 1);

        let total: usize = report.classes.iter().map(|c| c.support).sum();
        assert_eq!(total, y_true.len());
    }

    #[test]
    fn test_report_class_missing_from_predictions() {
        let report = classification_report(&[0, 0, 2], &[0, 0, 0]).unwrap();
        let probe = report.classes.iter().find(|c| c.class_id == 2).unwrap();
        assert_eq!(probe.precision, 0.0);
        assert_eq!(probe.recall, 0.0);
        assert_eq!(probe.f1, 0.0);
        assert_eq!(probe.support, 1);
    }

    #[test]
    fn test_report_display_contains_class_rows() {
        let report = classification_report(&[0, 1], &[0, 1]).unwrap();
        let rendered = format!("{}", report);
        assert!(rendered.contains("dos"));
        assert!(rendered.contains("normal"));
        assert!(rendered.contains("accuracy"));
    }
}
