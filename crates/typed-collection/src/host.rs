//! Host storage framework
//!
//! The builder never constructs collections itself; it asks a
//! [`CollectionHost`]. [`LocalHost`] is the in-process host: it keeps a registry
//! of collection names, exposes client mutation endpoints, and backs local
//! collections with a shared [`MemoryDriver`].

use crate::collection::{Collection, CollectionOptions};
use crate::driver::{self, DriverParams, RemoteDriver};
use crate::storage::{MemoryDriver, StorageDriver};
use crate::validation::ValidatedCollectionName;
use crate::Result;
use parking_lot::RwLock;
use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;
use typed_collection_common::CollectionError;

/// Client mutation operations registered per collection
pub const MUTATION_OPERATIONS: [&str; 3] = ["insert", "update", "remove"];

/// Options for a collection whose storage is routed through a remote driver
#[derive(Debug, Clone)]
pub struct RemoteCollectionOptions {
    pub driver: RemoteDriver,
    pub suppress_duplicate_name_check: bool,
    pub disable_client_mutation_endpoints: bool,
}

impl RemoteCollectionOptions {
    /// Options for a handle that only proxies reads and writes to `driver`:
    /// duplicate-name check suppressed, client mutation endpoints disabled
    pub fn proxy(driver: RemoteDriver) -> Self {
        Self {
            driver,
            suppress_duplicate_name_check: true,
            disable_client_mutation_endpoints: true,
        }
    }
}

/// Collection constructors provided by the host framework
pub trait CollectionHost: Send + Sync {
    /// Create a collection on the host's default local backend
    fn create_local_collection(&self, name: &ValidatedCollectionName) -> Result<Collection>;

    /// Create a collection whose storage goes through `options.driver`
    fn create_remote_aware_collection(
        &self,
        name: &ValidatedCollectionName,
        options: RemoteCollectionOptions,
    ) -> Result<Collection>;

    /// Create a driver for the deployment named in `params`
    fn create_driver(&self, params: DriverParams) -> Result<RemoteDriver> {
        driver::create_driver(params)
    }
}

/// In-process host framework
pub struct LocalHost {
    storage: Arc<MemoryDriver>,
    names: RwLock<HashSet<String>>,
    endpoints: RwLock<BTreeSet<String>>,
}

impl LocalHost {
    pub fn new() -> Self {
        Self::with_storage(Arc::new(MemoryDriver::new()))
    }

    /// Host whose local collections live in `storage`
    pub fn with_storage(storage: Arc<MemoryDriver>) -> Self {
        Self {
            storage,
            names: RwLock::new(HashSet::new()),
            endpoints: RwLock::new(BTreeSet::new()),
        }
    }

    pub fn storage(&self) -> &Arc<MemoryDriver> {
        &self.storage
    }

    pub fn has_collection(&self, name: &str) -> bool {
        self.names.read().contains(name)
    }

    /// Registered client mutation endpoints, sorted
    pub fn mutation_endpoints(&self) -> Vec<String> {
        self.endpoints.read().iter().cloned().collect()
    }

    fn register_name(&self, name: &ValidatedCollectionName, suppress_check: bool) -> Result<()> {
        let mut names = self.names.write();
        if !names.insert(name.to_string()) && !suppress_check {
            return Err(CollectionError::Framework(format!(
                "There is already a collection named \"{}\"",
                name
            )));
        }
        Ok(())
    }

    fn register_endpoints(&self, name: &ValidatedCollectionName) {
        let mut endpoints = self.endpoints.write();
        for operation in MUTATION_OPERATIONS {
            endpoints.insert(format!("/{}/{}", name, operation));
        }
    }

    fn create(
        &self,
        name: &ValidatedCollectionName,
        driver: Arc<dyn StorageDriver>,
        options: CollectionOptions,
    ) -> Result<Collection> {
        self.register_name(name, options.duplicate_name_check_suppressed)?;
        if options.client_mutations_enabled {
            self.register_endpoints(name);
        }

        tracing::debug!(
            collection = %name,
            driver = driver.kind(),
            mutations = options.client_mutations_enabled,
            "Host created collection"
        );
        Ok(Collection::new(name.clone(), driver, options))
    }
}

impl Default for LocalHost {
    fn default() -> Self {
        Self::new()
    }
}

impl CollectionHost for LocalHost {
    fn create_local_collection(&self, name: &ValidatedCollectionName) -> Result<Collection> {
        let storage: Arc<dyn StorageDriver> = self.storage.clone();
        self.create(name, storage, CollectionOptions::default())
    }

    fn create_remote_aware_collection(
        &self,
        name: &ValidatedCollectionName,
        options: RemoteCollectionOptions,
    ) -> Result<Collection> {
        let collection_options = CollectionOptions {
            duplicate_name_check_suppressed: options.suppress_duplicate_name_check,
            client_mutations_enabled: !options.disable_client_mutation_endpoints,
        };
        self.create(name, Arc::new(options.driver), collection_options)
    }
}
