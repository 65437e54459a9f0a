pub mod commands;

pub use commands::Cli;

use crate::controller::Outcome;

/// Folds a startup error and its causes into one failure outcome.
pub fn startup_failure(err: &anyhow::Error) -> Outcome {
    Outcome::Failure {
        message: format!("{err:#}"),
    }
}
