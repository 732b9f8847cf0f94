//! End-to-end pipeline scenario on a small synthetic dataset: two categories
//! per nominal column, three informative numeric columns, and attack names
//! drawn from three of the five coarse categories.

use ndarray::Array2;
use ndarray_rand::rand_distr::Uniform;
use ndarray_rand::RandomExt;
use rand::rngs::StdRng;
use rand::SeedableRng;

use nslkdd_svm::dataset::{read_records, KddRecord};
use nslkdd_svm::pipeline::{self, PipelineConfig};
use nslkdd_svm::{Hyperparams, KernelFamily, MinMaxScaler, OneHotEncoder};

fn record(
    protocol: &str,
    service: &str,
    flag: &str,
    src_bytes: f64,
    dst_bytes: f64,
    count: f64,
    attack: &str,
) -> KddRecord {
    let row = format!(
        "0,{protocol},{service},{flag},{src_bytes},{dst_bytes},0,0,0,0,0,1,0,0,0,0,0,0,0,0,0,0,{count},1,0,0,0,0,1,0,0,4,4,1,0,0,0,0,0,0,0,{attack},20"
    );
    read_records(row.as_bytes()).unwrap().remove(0)
}

/// 10 training rows over {tcp,udp} x {http,private} x {SF,REJ}, labels from
/// {normal, dos, probe}.
fn train_records() -> Vec<KddRecord> {
    vec![
        record("tcp", "http", "SF", 200.0, 300.0, 2.0, "normal"),
        record("tcp", "http", "SF", 210.0, 280.0, 3.0, "normal"),
        record("udp", "http", "SF", 190.0, 310.0, 2.0, "normal"),
        record("tcp", "http", "SF", 205.0, 290.0, 1.0, "normal"),
        record("tcp", "private", "REJ", 0.0, 0.0, 100.0, "neptune"),
        record("tcp", "private", "REJ", 0.0, 0.0, 110.0, "neptune"),
        record("udp", "private", "REJ", 1.0, 0.0, 95.0, "neptune"),
        record("udp", "private", "SF", 20.0, 10.0, 40.0, "satan"),
        record("tcp", "private", "SF", 25.0, 12.0, 45.0, "satan"),
        record("udp", "private", "SF", 22.0, 8.0, 42.0, "satan"),
    ]
}

fn test_records() -> Vec<KddRecord> {
    vec![
        record("tcp", "http", "SF", 208.0, 295.0, 2.0, "normal"),
        record("udp", "http", "SF", 195.0, 305.0, 3.0, "normal"),
        record("tcp", "private", "REJ", 0.0, 0.0, 105.0, "neptune"),
        record("udp", "private", "SF", 21.0, 9.0, 41.0, "satan"),
    ]
}

#[test]
fn encoding_replaces_nominal_columns_with_indicators() {
    let mut combined = train_records();
    combined.extend(test_records());

    let mut encoder = OneHotEncoder::new();
    let matrix = encoder.fit_transform(&combined).unwrap();
    let names = encoder.feature_names().unwrap();

    // Two observed values per nominal column: 2 + 2 + 2 indicator columns
    // appended after the 38 continuous ones, originals gone.
    assert_eq!(matrix.ncols(), 44);
    assert_eq!(names.len(), 44);
    assert!(names.iter().all(|n| n != "protocol_type" && n != "service" && n != "flag"));
    assert_eq!(names.iter().filter(|n| n.starts_with("protocol_type=")).count(), 2);
    assert_eq!(names.iter().filter(|n| n.starts_with("service=")).count(), 2);
    assert_eq!(names.iter().filter(|n| n.starts_with("flag=")).count(), 2);
}

#[test]
fn label_distribution_matches_manual_counts() {
    let records = train_records();
    let attacks: Vec<&str> = records.iter().map(|r| r.attack.as_str()).collect();
    let labels = nslkdd_svm::labels::encode_labels(&attacks).unwrap();

    let count = |id: usize| labels.iter().filter(|&&l| l == id).count();
    assert_eq!(count(1), 4); // normal
    assert_eq!(count(0), 3); // dos
    assert_eq!(count(2), 3); // probe
    assert_eq!(count(3), 0);
    assert_eq!(count(4), 0);
}

#[test]
fn train_and_evaluate_produces_well_formed_report() {
    let report = pipeline::train_and_evaluate(
        &train_records(),
        &test_records(),
        Hyperparams {
            kernel: KernelFamily::Linear,
            c_exponent: 0,
            gamma_exponent: 0,
        },
    )
    .unwrap();

    // All three observed categories appear with correct supports and the
    // supports sum to the test row count.
    let names: Vec<&str> = report.classes.iter().map(|c| c.name.as_str()).collect();
    assert!(names.contains(&"normal"));
    assert!(names.contains(&"dos"));
    assert!(names.contains(&"probe"));
    let total: usize = report.classes.iter().map(|c| c.support).sum();
    assert_eq!(total, test_records().len());
    assert!((0.0..=1.0).contains(&report.accuracy));
    for class in &report.classes {
        assert!((0.0..=1.0).contains(&class.precision));
        assert!((0.0..=1.0).contains(&class.recall));
        assert!((0.0..=1.0).contains(&class.f1));
    }
}

#[test]
fn prepare_keeps_validation_out_of_test() {
    let prepared = pipeline::prepare(
        &train_records(),
        &test_records(),
        &PipelineConfig {
            validation_fraction: 0.3,
            seed: 11,
        },
    )
    .unwrap();
    assert_eq!(
        prepared.train.n_samples() + prepared.validation.n_samples(),
        train_records().len()
    );
    assert_eq!(prepared.test.n_samples(), test_records().len());
    assert_eq!(prepared.train.feature_names, prepared.test.feature_names);
}

#[test]
fn scaler_bounds_hold_for_random_fit_data() {
    let mut rng = StdRng::seed_from_u64(3);
    let data = Array2::random_using((50, 8), Uniform::new(-100.0, 100.0), &mut rng);
    let mut scaler = MinMaxScaler::new();
    let scaled = scaler.fit_transform(&data).unwrap();
    for &value in scaled.iter() {
        assert!((0.0..=1.0).contains(&value));
    }
}
