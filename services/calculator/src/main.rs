#[macro_use]
extern crate lazy_static;

use std::io::{self, BufRead, Write};

use log::{error, info, warn};

use expression::Calculator;
use telemetry::Measure;

use crate::config::Config;
use crate::error::ServiceError;

mod config;
mod error;
mod output;

lazy_static! {
    static ref EVALUATE_MEASURE: Measure = Measure::new("service", "evaluate_math");
}

/// Evaluates every non-blank line of `input`, returning the number of lines that failed
fn run<R: BufRead, W: Write>(
    config: &Config,
    calculator: &Calculator,
    input: R,
    out: &mut W,
) -> Result<usize, ServiceError> {
    let mut failures = 0;

    for (idx, bytes) in input.split(b'\n').enumerate() {
        let mut bytes = bytes?;
        if bytes.last() == Some(&b'\r') {
            bytes.pop();
        }

        let line = match String::from_utf8(bytes) {
            Ok(line) => line,
            Err(e) => {
                warn!("Line {}: invalid UTF-8: {}", idx + 1, e);
                eprintln!("line {}: {}", idx + 1, e);
                failures += 1;
                continue;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        match EVALUATE_MEASURE.stats(|| calculator.evaluate_math(&line, config.a, config.b)) {
            Ok(result) => output::write(out, config, &result)?,
            Err(e) => {
                warn!("Line {}: {:?} failed: {}", idx + 1, line, e);
                eprintln!("line {}: {}", idx + 1, e);
                failures += 1;
            }
        }
    }

    Ok(failures)
}

fn main() {
    env_logger::init();
    let config: Config = config::figment()
        .extract()
        .expect("Failed to load configuration");

    info!(
        "Evaluating with a={} b={}, {} output",
        config.a,
        config.b,
        config.format.as_ref()
    );

    let calculator = Calculator::new(&config.evaluator);

    let stdin = io::stdin();
    let stdout = io::stdout();
    let failures = run(&config, &calculator, stdin.lock(), &mut stdout.lock())
        .expect("Failed to process input");

    if config.metrics {
        match telemetry::encode() {
            Ok(metrics) => eprint!("{}", metrics),
            Err(e) => error!("Failed to encode metrics: {}", e),
        }
    }

    if failures > 0 {
        std::process::exit(1);
    }
}
