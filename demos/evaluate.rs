use std::env;

use nslkdd_svm::dataset::{load_field_names, load_records};
use nslkdd_svm::{pipeline, Hyperparams, KernelFamily};

/// Fits one SVM configuration on the full NSL-KDD training set and prints the
/// per-class report for the held-out test set.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 4 {
        eprintln!("Usage: evaluate <train.csv> <test.csv> <field_names.csv>");
        std::process::exit(2);
    }

    load_field_names(&args[3])?;
    let train_records = load_records(&args[1])?;
    let test_records = load_records(&args[2])?;
    println!(
        "Loaded {} training and {} test records\n",
        train_records.len(),
        test_records.len()
    );

    // Configuration picked from a prior grid sweep (see the grid_sweep demo).
    let params = Hyperparams {
        kernel: KernelFamily::Rbf,
        c_exponent: 4,
        gamma_exponent: -4,
    };
    println!("Training {}\n", params);

    let report = pipeline::train_and_evaluate(&train_records, &test_records, params)?;
    println!("{}", report);
    println!("Overall accuracy: {:.4}", report.accuracy);
    Ok(())
}
