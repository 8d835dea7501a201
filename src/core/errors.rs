use budgetbox_config::ConfigError as CliConfigError;
use budgetbox_core::{CoreError as ServiceCoreError, StorageError};
use rustyline::error::ReadlineError;
use thiserror::Error;

/// Unified error type for core/config/storage layers.
#[derive(Error, Debug)]
pub enum BudgetError {
    #[error("Box not found: {0}")]
    BoxNotFound(String),
    #[error("{0}")]
    ExpenseNotFound(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Persistence error: {0}")]
    StorageError(String),
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// User-facing CLI error wrapper.
#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] BudgetError),
    #[error("Invalid input: {0}")]
    Input(String),
    #[error("Command failed: {0}")]
    Command(String),
}

impl From<ServiceCoreError> for BudgetError {
    fn from(err: ServiceCoreError) -> Self {
        match err {
            ServiceCoreError::BoxNotFound(id) => BudgetError::BoxNotFound(id),
            err @ ServiceCoreError::ExpenseNotFound { .. } => {
                BudgetError::ExpenseNotFound(err.to_string())
            }
            ServiceCoreError::Validation(message) => BudgetError::InvalidInput(message),
        }
    }
}

impl From<StorageError> for BudgetError {
    fn from(err: StorageError) -> Self {
        BudgetError::StorageError(err.to_string())
    }
}

impl From<CliConfigError> for BudgetError {
    fn from(err: CliConfigError) -> Self {
        match err {
            CliConfigError::Io(io) => BudgetError::StorageError(io.to_string()),
            other => BudgetError::ConfigError(other.to_string()),
        }
    }
}

impl From<CliConfigError> for CliError {
    fn from(err: CliConfigError) -> Self {
        CliError::from(BudgetError::from(err))
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::Command(err.to_string())
    }
}

impl From<ReadlineError> for CliError {
    fn from(err: ReadlineError) -> Self {
        CliError::Command(err.to_string())
    }
}
