//! Mean shift detection with a baseline-only model
//!
//! Run with `RUST_LOG=subspace_changepoint=debug` to see warm-up and drift
//! events.

use subspace_changepoint::test_models::{BaselineModel, TestSignals};
use subspace_changepoint::{
    default_params, ChangeDetectionEngine, DetectorParameters,
};
use subspace_core::to_matrix;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== Subspace Change Detection ===\n");

    // Level 1.0 for 50 samples, then 3.0
    let stream = TestSignals::mean_shift(100, 50, 1.0, 3.0);

    println!("1. Progressive scan (score, then learn)");
    let params = DetectorParameters::new(20).with_threshold(10.7);
    let mut detector = ChangeDetectionEngine::new(BaselineModel::new(1.0), params)?;
    let result = detector.scan(&stream)?;
    println!("{result}");

    println!("2. Manual streaming loop");
    let params = DetectorParameters::new(20);
    let mut detector = ChangeDetectionEngine::new(BaselineModel::new(1.0), params)?;
    for (i, x) in stream.iter().enumerate() {
        detector.learn_one(x)?;
        if detector.drift_detected()? {
            println!("  Drift at sample {i}, score {:.3}", detector.score()?);
            break;
        }
    }

    println!("\n3. Default parameters from a noisy signal");
    let signal = TestSignals::noisy_sine(200, 0.05, 1);
    let x = to_matrix(&signal)?;
    let defaults = default_params(&x, None, 40, 10)?;
    println!(
        "  window {}, rank {}, lag {}",
        defaults.window_size, defaults.rank_x, defaults.lag
    );
    let params: DetectorParameters = defaults.into();
    println!("  detector needs {} samples before scoring", params.validate()?.capacity);

    Ok(())
}
