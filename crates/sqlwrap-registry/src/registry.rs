//! In-memory driver catalog guarded by a single lock.

use std::collections::HashMap;
use std::sync::{Arc, OnceLock, RwLock};

use serde::{Deserialize, Serialize};
use sqlwrap_core::{Conn, Driver, Observer, WrappedDriver};

use crate::error::RegistryError;

/// Configuration for a [`DriverRegistry`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Prefix of minted wrapped-driver names.
    #[serde(default = "default_prefix")]
    pub name_prefix: String,
}

fn default_prefix() -> String {
    "sqlwrap".into()
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            name_prefix: default_prefix(),
        }
    }
}

struct RegistryInner {
    drivers: HashMap<String, Arc<dyn Driver>>,
    /// Next suffix handed out by `wrap`. Never reused.
    minted: u64,
}

/// Thread-safe map from driver name to driver.
pub struct DriverRegistry {
    config: RegistryConfig,
    inner: RwLock<RegistryInner>,
}

impl DriverRegistry {
    pub fn new(config: RegistryConfig) -> Self {
        Self {
            config,
            inner: RwLock::new(RegistryInner {
                drivers: HashMap::new(),
                minted: 0,
            }),
        }
    }

    /// The process-wide registry, created on first use with default config.
    pub fn global() -> &'static DriverRegistry {
        static GLOBAL: OnceLock<DriverRegistry> = OnceLock::new();
        GLOBAL.get_or_init(DriverRegistry::default)
    }

    /// Register `driver` under `name`, replacing any previous entry.
    pub fn register(&self, name: impl Into<String>, driver: Arc<dyn Driver>) {
        let name = name.into();
        let replaced = self
            .inner
            .write()
            .unwrap()
            .drivers
            .insert(name.clone(), driver)
            .is_some();
        tracing::info!(driver = %name, replaced, "driver registered");
    }

    /// Look up a driver by name.
    pub fn resolve(&self, name: &str) -> Result<Arc<dyn Driver>, RegistryError> {
        self.inner
            .read()
            .unwrap()
            .drivers
            .get(name)
            .cloned()
            .ok_or_else(|| RegistryError::NotRegistered {
                driver: name.to_string(),
            })
    }

    /// Wrap the driver registered as `name` with `observers` and register
    /// the result under a freshly minted name, which is returned.
    pub fn wrap(
        &self,
        name: &str,
        observers: Vec<Arc<dyn Observer>>,
    ) -> Result<String, RegistryError> {
        let mut inner = self.inner.write().unwrap();
        let driver = inner
            .drivers
            .get(name)
            .cloned()
            .ok_or_else(|| RegistryError::NotRegistered {
                driver: name.to_string(),
            })?;

        let minted = format!("{}-{}-{}", self.config.name_prefix, name, inner.minted);
        inner.minted += 1;

        let observer_count = observers.len();
        let wrapped: Arc<dyn Driver> = Arc::new(WrappedDriver::new(driver, observers));
        inner.drivers.insert(minted.clone(), wrapped);
        tracing::debug!(driver = %name, wrapped = %minted, observers = observer_count, "wrapped driver registered");
        Ok(minted)
    }

    /// Wrap the driver registered as `name` and open a connection through
    /// the wrapper in one step.
    pub async fn open_wrapped(
        &self,
        name: &str,
        dsn: &str,
        observers: Vec<Arc<dyn Observer>>,
    ) -> Result<Box<dyn Conn>, RegistryError> {
        let minted = self.wrap(name, observers)?;
        let driver = self.resolve(&minted)?;
        Ok(driver.open(dsn).await?)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.inner.read().unwrap().drivers.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.inner.read().unwrap().drivers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for DriverRegistry {
    fn default() -> Self {
        Self::new(RegistryConfig::default())
    }
}

impl std::fmt::Debug for DriverRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DriverRegistry")
            .field("config", &self.config)
            .field("drivers", &self.names())
            .finish()
    }
}
