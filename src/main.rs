use std::error::Error;
use std::process::ExitCode;

use circular_logo::{CircularCropper, CropConfig, CropError};
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "circular_logo=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = match CropConfig::from_args(std::env::args_os()) {
        Ok(config) => config,
        Err(err @ CropError::Usage { .. }) => {
            eprintln!("{err}");
            return ExitCode::from(2);
        }
        Err(err) => {
            eprintln!("error: {}", report(&err));
            return ExitCode::FAILURE;
        }
    };
    let cropper = CircularCropper::new(config);
    debug!(config = ?cropper.config(), "config loaded");

    match cropper.run() {
        Ok(path) => {
            println!("Created circular logo at {}", path.display());
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("error: {}", report(&err));
            ExitCode::FAILURE
        }
    }
}

/// Render an error with its chain of causes on one line.
fn report(err: &dyn Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
