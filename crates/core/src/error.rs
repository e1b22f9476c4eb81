use thiserror::Error;

#[derive(Error, Debug)]
pub enum TripwireError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Missing configuration: {0}")]
    MissingConfig(String),
}
