use std::env;

use nslkdd_svm::dataset::{load_field_names, load_records};
use nslkdd_svm::pipeline::{self, PipelineConfig};
use nslkdd_svm::sweep::{self, CancelToken, SweepConfig, SweepGrid};

/// Exhaustive kernel/C/gamma sweep scored on a held-out validation split of
/// the NSL-KDD training set. Expensive: the default grid is 128 fits.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 4 {
        eprintln!("Usage: grid_sweep <train.csv> <test.csv> <field_names.csv>");
        std::process::exit(2);
    }

    load_field_names(&args[3])?;
    let train_records = load_records(&args[1])?;
    let test_records = load_records(&args[2])?;

    let prepared = pipeline::prepare(&train_records, &test_records, &PipelineConfig::default())?;
    println!(
        "Partitions: {} train / {} validation / {} test\n",
        prepared.train.n_samples(),
        prepared.validation.n_samples(),
        prepared.test.n_samples()
    );

    let grid = SweepGrid::default();
    let outcomes = sweep::run(
        &grid,
        &prepared.train,
        &prepared.validation,
        &SweepConfig::default(),
        &CancelToken::new(),
    );

    println!("kernel, C-exponent, gamma-exponent, validation accuracy");
    for outcome in &outcomes {
        println!("{}", outcome);
    }

    match sweep::best(&outcomes) {
        Some((params, score)) => {
            println!("\nBest: {} (validation accuracy {:.4})", params, score)
        }
        None => println!("\nNo combination fitted successfully"),
    }
    Ok(())
}
