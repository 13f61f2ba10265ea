//! sqlwrap-registry — a catalog of named drivers.
//!
//! Drivers are registered under a textual name. Wrapping a registered
//! driver with a set of observers mints a fresh, unique name
//! (`"{prefix}-{driver}-{n}"`) and registers the wrapped driver under it, so
//! several independently observed wrappers of the same driver can coexist.

pub mod error;
pub mod registry;

pub use error::RegistryError;
pub use registry::{DriverRegistry, RegistryConfig};
