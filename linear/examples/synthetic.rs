use std::error::Error;

use minilearn::metrics::Regression;
use minilearn::Dataset;
use ndarray::Array;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal, Uniform};
use rand_isaac::Isaac64Rng;

use minilearn_linear::{FitConfig, LinearRegression};

// Fit y = 3x + 2 plus noise and predict a held-out point.
fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let mut rng = Isaac64Rng::seed_from_u64(42);
    let xs = Uniform::new(0.0, 5.0);
    let noise = Normal::new(0.0, 0.5).expect("standard deviation is positive");

    let synthesize = |n: usize, rng: &mut Isaac64Rng| {
        let x: Vec<f64> = (0..n).map(|_| xs.sample(rng)).collect();
        let records = Array::from_shape_fn((n, 1), |(i, _)| x[i]);
        let targets = Array::from_shape_fn(n, |i| 3.0 * x[i] + 2.0 + noise.sample(rng));
        Dataset::new(records, targets)
    };
    let train = synthesize(400, &mut rng)?;
    let valid = synthesize(100, &mut rng)?;

    let mut model = LinearRegression::with_rng(1, &mut rng)?;
    let config = FitConfig {
        lr: 0.01,
        epochs: 500,
        acceptable_error: 1e-6,
        ..FitConfig::default()
    };
    let report = model.fit_using(&train, &valid, &config, &mut rng)?;

    println!(
        "fitted after {} epochs: y = {:.3} * x + {:.3}",
        report.epochs_run(),
        model.weights()[0],
        model.bias()
    );

    let y_hat = model.predict(&valid.records)?;
    println!("validation R^2: {:.4}", y_hat.r2(&valid.targets));

    let held_out = model.predict(&ndarray::array![[10.0]])?;
    println!("prediction for x = 10: {:.2} (true value 32)", held_out[0]);

    Ok(())
}
