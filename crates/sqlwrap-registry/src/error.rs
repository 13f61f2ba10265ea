//! Registry error types.

use sqlwrap_core::DriverError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("driver {driver} is not registered")]
    NotRegistered { driver: String },

    /// Opening through the resolved driver failed.
    #[error(transparent)]
    Driver(#[from] DriverError),
}

impl RegistryError {
    pub fn is_not_registered(&self) -> bool {
        matches!(self, Self::NotRegistered { .. })
    }
}
