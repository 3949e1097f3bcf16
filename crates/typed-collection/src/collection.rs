//! Base collection handle

use crate::driver::RemoteDriver;
use crate::storage::StorageDriver;
use crate::validation::ValidatedCollectionName;
use crate::Result;
use bson::{Bson, Document};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

static NEXT_COLLECTION_ID: AtomicU64 = AtomicU64::new(1);

/// Flags the host framework applied when it created a collection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollectionOptions {
    /// The host skipped its duplicate-name check for this collection
    pub duplicate_name_check_suppressed: bool,
    /// Client mutation endpoints were registered for this collection
    pub client_mutations_enabled: bool,
}

impl Default for CollectionOptions {
    fn default() -> Self {
        Self {
            duplicate_name_check_suppressed: false,
            client_mutations_enabled: true,
        }
    }
}

/// Handle to a named set of documents in a storage backend
///
/// Clones share the same underlying collection; use [`Collection::ptr_eq`]
/// to compare identity.
#[derive(Clone)]
pub struct Collection {
    inner: Arc<CollectionInner>,
}

struct CollectionInner {
    id: u64,
    name: ValidatedCollectionName,
    driver: Arc<dyn StorageDriver>,
    options: CollectionOptions,
}

impl Collection {
    pub fn new(
        name: ValidatedCollectionName,
        driver: Arc<dyn StorageDriver>,
        options: CollectionOptions,
    ) -> Self {
        Self {
            inner: Arc::new(CollectionInner {
                id: NEXT_COLLECTION_ID.fetch_add(1, Ordering::Relaxed),
                name,
                driver,
                options,
            }),
        }
    }

    pub fn name(&self) -> &str {
        self.inner.name.as_str()
    }

    /// Process-unique id assigned at creation
    pub fn id(&self) -> u64 {
        self.inner.id
    }

    pub fn options(&self) -> CollectionOptions {
        self.inner.options
    }

    pub fn driver(&self) -> &Arc<dyn StorageDriver> {
        &self.inner.driver
    }

    /// Remote driver this handle routes through; `None` for local storage
    pub fn remote_driver(&self) -> Option<&RemoteDriver> {
        self.inner.driver.as_remote()
    }

    pub fn ptr_eq(a: &Collection, b: &Collection) -> bool {
        Arc::ptr_eq(&a.inner, &b.inner)
    }

    /// Insert a document as-is and return its `_id`
    pub async fn insert_one(&self, doc: Document) -> Result<Bson> {
        self.inner.driver.insert_one(self.name(), doc).await
    }

    pub async fn find(&self, filter: Document) -> Result<Vec<Document>> {
        self.inner.driver.find(self.name(), filter).await
    }

    pub async fn find_one(&self, filter: Document) -> Result<Option<Document>> {
        self.inner.driver.find_one(self.name(), filter).await
    }

    pub async fn count(&self, filter: Document) -> Result<u64> {
        self.inner.driver.count(self.name(), filter).await
    }

    /// Apply `update` to every matching document; returns the match count
    pub async fn update_many(&self, filter: Document, update: Document) -> Result<u64> {
        self.inner.driver.update_many(self.name(), filter, update).await
    }

    pub async fn delete_many(&self, filter: Document) -> Result<u64> {
        self.inner.driver.delete_many(self.name(), filter).await
    }
}

impl fmt::Debug for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Collection")
            .field("id", &self.inner.id)
            .field("name", &self.name())
            .field("driver", &self.inner.driver.kind())
            .field("options", &self.inner.options)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryDriver;
    use bson::doc;

    fn collection(name: &str, driver: Arc<dyn StorageDriver>) -> Collection {
        Collection::new(
            ValidatedCollectionName::new(name).unwrap(),
            driver,
            CollectionOptions::default(),
        )
    }

    #[test]
    fn test_identity() {
        let driver: Arc<dyn StorageDriver> = Arc::new(MemoryDriver::new());
        let a = collection("orders", driver.clone());
        let b = collection("orders", driver);
        let a2 = a.clone();

        assert!(Collection::ptr_eq(&a, &a2));
        assert!(!Collection::ptr_eq(&a, &b));
        assert_ne!(a.id(), b.id());
        assert_eq!(a.id(), a2.id());
    }

    #[test]
    fn test_default_options() {
        let options = CollectionOptions::default();
        assert!(!options.duplicate_name_check_suppressed);
        assert!(options.client_mutations_enabled);
    }

    #[tokio::test]
    async fn test_operations_scoped_to_name() {
        let driver: Arc<dyn StorageDriver> = Arc::new(MemoryDriver::new());
        let orders = collection("orders", driver.clone());
        let invoices = collection("invoices", driver);

        orders.insert_one(doc! { "total": 10 }).await.unwrap();
        orders.insert_one(doc! { "total": 20 }).await.unwrap();
        invoices.insert_one(doc! { "total": 10 }).await.unwrap();

        assert_eq!(orders.count(doc! {}).await.unwrap(), 2);
        assert_eq!(invoices.count(doc! {}).await.unwrap(), 1);
        assert_eq!(orders.find(doc! { "total": 20 }).await.unwrap().len(), 1);
        assert!(invoices.find_one(doc! { "total": 20 }).await.unwrap().is_none());

        assert_eq!(
            orders
                .update_many(doc! { "total": 10 }, doc! { "$set": { "total": 15 } })
                .await
                .unwrap(),
            1
        );
        assert_eq!(invoices.count(doc! { "total": 10 }).await.unwrap(), 1);

        assert_eq!(orders.delete_many(doc! {}).await.unwrap(), 2);
        assert_eq!(invoices.count(doc! {}).await.unwrap(), 1);
    }

    #[test]
    fn test_debug_shows_driver_kind() {
        let orders = collection("orders", Arc::new(MemoryDriver::new()));
        let rendered = format!("{:?}", orders);
        assert!(rendered.contains("\"orders\""));
        assert!(rendered.contains("memory"));
        assert!(orders.remote_driver().is_none());
    }
}
