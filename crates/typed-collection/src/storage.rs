//! Storage backends for collection handles
//!
//! Every `Collection` routes its operations through a `StorageDriver`. Local
//! collections share the host's [`MemoryDriver`]; remote collections use a
//! [`RemoteDriver`](crate::driver::RemoteDriver).

use crate::driver::RemoteDriver;
use crate::Result;
use async_trait::async_trait;
use bson::{oid::ObjectId, Bson, Document};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::fmt;
use typed_collection_common::CollectionError;
use typed_collection_schema::ID_FIELD;

/// Backend that executes storage operations for named collections
///
/// Filters are documents of top-level field equalities; an empty filter
/// matches everything.
#[async_trait]
pub trait StorageDriver: Send + Sync + fmt::Debug {
    /// Short backend name used in logs ("memory", "remote")
    fn kind(&self) -> &'static str;

    /// Connection string this driver is bound to, if any
    fn connection_string(&self) -> Option<&str> {
        None
    }

    /// The remote driver behind this backend, if it is one
    fn as_remote(&self) -> Option<&RemoteDriver> {
        None
    }

    /// Insert a document and return its `_id`
    async fn insert_one(&self, collection: &str, doc: Document) -> Result<Bson>;

    async fn find(&self, collection: &str, filter: Document) -> Result<Vec<Document>>;

    async fn find_one(&self, collection: &str, filter: Document) -> Result<Option<Document>> {
        Ok(self.find(collection, filter).await?.into_iter().next())
    }

    async fn count(&self, collection: &str, filter: Document) -> Result<u64>;

    /// Apply an update document (`$set` / `$unset`) to every matching
    /// document and return how many matched
    async fn update_many(
        &self,
        collection: &str,
        filter: Document,
        update: Document,
    ) -> Result<u64>;

    /// Delete every matching document and return how many were removed
    async fn delete_many(&self, collection: &str, filter: Document) -> Result<u64>;
}

/// In-process document store keyed by collection name
#[derive(Default)]
pub struct MemoryDriver {
    collections: RwLock<HashMap<String, Vec<Document>>>,
}

impl MemoryDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Names of collections holding at least one document
    pub fn collection_names(&self) -> Vec<String> {
        let collections = self.collections.read();
        let mut names: Vec<String> = collections
            .iter()
            .filter(|(_, docs)| !docs.is_empty())
            .map(|(name, _)| name.clone())
            .collect();
        names.sort();
        names
    }
}

impl fmt::Debug for MemoryDriver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryDriver")
            .field("collections", &self.collection_names())
            .finish()
    }
}

fn matches_filter(doc: &Document, filter: &Document) -> bool {
    filter
        .iter()
        .all(|(key, expected)| doc.get(key) == Some(expected))
}

/// Operators the in-process store understands
const SET: &str = "$set";
const UNSET: &str = "$unset";

fn check_update(update: &Document) -> Result<()> {
    if update.is_empty() {
        return Err(CollectionError::Validation(
            "Update document cannot be empty".to_string(),
        ));
    }
    for (operator, fields) in update {
        if operator != SET && operator != UNSET {
            return Err(CollectionError::Validation(format!(
                "Unsupported update operator '{}'",
                operator
            )));
        }
        let Bson::Document(fields) = fields else {
            return Err(CollectionError::Validation(format!(
                "Update operator '{}' expects a document",
                operator
            )));
        };
        if fields.contains_key(ID_FIELD) {
            return Err(CollectionError::Validation(
                "The _id field cannot be updated".to_string(),
            ));
        }
    }
    Ok(())
}

fn apply_update(doc: &mut Document, update: &Document) {
    if let Ok(set) = update.get_document(SET) {
        for (key, value) in set {
            doc.insert(key.clone(), value.clone());
        }
    }
    if let Ok(unset) = update.get_document(UNSET) {
        for key in unset.keys() {
            doc.remove(key);
        }
    }
}

#[async_trait]
impl StorageDriver for MemoryDriver {
    fn kind(&self) -> &'static str {
        "memory"
    }

    async fn insert_one(&self, collection: &str, mut doc: Document) -> Result<Bson> {
        let id = match doc.get(ID_FIELD) {
            Some(id) => id.clone(),
            None => {
                let id = Bson::ObjectId(ObjectId::new());
                doc.insert(ID_FIELD, id.clone());
                id
            }
        };

        let mut collections = self.collections.write();
        let docs = collections.entry(collection.to_string()).or_default();
        if docs.iter().any(|existing| existing.get(ID_FIELD) == Some(&id)) {
            return Err(CollectionError::Framework(format!(
                "Duplicate key in collection '{}': _id {}",
                collection, id
            )));
        }
        docs.push(doc);
        Ok(id)
    }

    async fn find(&self, collection: &str, filter: Document) -> Result<Vec<Document>> {
        let collections = self.collections.read();
        Ok(collections
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .filter(|doc| matches_filter(doc, &filter))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn count(&self, collection: &str, filter: Document) -> Result<u64> {
        let collections = self.collections.read();
        Ok(collections
            .get(collection)
            .map(|docs| docs.iter().filter(|doc| matches_filter(doc, &filter)).count() as u64)
            .unwrap_or(0))
    }

    async fn update_many(
        &self,
        collection: &str,
        filter: Document,
        update: Document,
    ) -> Result<u64> {
        check_update(&update)?;
        let mut collections = self.collections.write();
        let Some(docs) = collections.get_mut(collection) else {
            return Ok(0);
        };
        let mut matched = 0;
        for doc in docs.iter_mut().filter(|doc| matches_filter(doc, &filter)) {
            apply_update(doc, &update);
            matched += 1;
        }
        Ok(matched)
    }

    async fn delete_many(&self, collection: &str, filter: Document) -> Result<u64> {
        let mut collections = self.collections.write();
        let Some(docs) = collections.get_mut(collection) else {
            return Ok(0);
        };
        let before = docs.len();
        docs.retain(|doc| !matches_filter(doc, &filter));
        Ok((before - docs.len()) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;

    #[tokio::test]
    async fn test_insert_assigns_object_id() {
        let driver = MemoryDriver::new();
        let id = driver
            .insert_one("orders", doc! { "customer": "acme" })
            .await
            .unwrap();
        assert!(matches!(id, Bson::ObjectId(_)));

        let stored = driver.find_one("orders", doc! {}).await.unwrap().unwrap();
        assert_eq!(stored.get(ID_FIELD), Some(&id));
    }

    #[tokio::test]
    async fn test_insert_keeps_explicit_id() {
        let driver = MemoryDriver::new();
        let id = driver
            .insert_one("orders", doc! { "_id": "ord-1" })
            .await
            .unwrap();
        assert_eq!(id, Bson::String("ord-1".to_string()));
    }

    #[tokio::test]
    async fn test_duplicate_id_rejected() {
        let driver = MemoryDriver::new();
        driver.insert_one("orders", doc! { "_id": 1 }).await.unwrap();
        let err = driver.insert_one("orders", doc! { "_id": 1 }).await.unwrap_err();
        assert!(matches!(err, CollectionError::Framework(_)));

        // Same id in another collection is fine
        assert!(driver.insert_one("invoices", doc! { "_id": 1 }).await.is_ok());
    }

    #[tokio::test]
    async fn test_find_and_count_with_filter() {
        let driver = MemoryDriver::new();
        for (customer, status) in [("acme", "open"), ("acme", "paid"), ("globex", "open")] {
            driver
                .insert_one("orders", doc! { "customer": customer, "status": status })
                .await
                .unwrap();
        }

        assert_eq!(driver.count("orders", doc! {}).await.unwrap(), 3);
        assert_eq!(
            driver.count("orders", doc! { "status": "open" }).await.unwrap(),
            2
        );
        let acme_open = driver
            .find("orders", doc! { "customer": "acme", "status": "open" })
            .await
            .unwrap();
        assert_eq!(acme_open.len(), 1);
        assert!(driver.find("missing", doc! {}).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_many() {
        let driver = MemoryDriver::new();
        for status in ["open", "open", "paid"] {
            driver
                .insert_one("orders", doc! { "status": status })
                .await
                .unwrap();
        }

        let removed = driver
            .delete_many("orders", doc! { "status": "open" })
            .await
            .unwrap();
        assert_eq!(removed, 2);
        assert_eq!(driver.count("orders", doc! {}).await.unwrap(), 1);
        assert_eq!(driver.delete_many("missing", doc! {}).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_update_many_set_and_unset() {
        let driver = MemoryDriver::new();
        for (customer, status) in [("acme", "open"), ("globex", "open"), ("initech", "paid")] {
            driver
                .insert_one(
                    "orders",
                    doc! { "customer": customer, "status": status, "note": "rush" },
                )
                .await
                .unwrap();
        }

        let matched = driver
            .update_many(
                "orders",
                doc! { "status": "open" },
                doc! { "$set": { "status": "shipped" }, "$unset": { "note": "" } },
            )
            .await
            .unwrap();
        assert_eq!(matched, 2);

        let shipped = driver
            .find("orders", doc! { "status": "shipped" })
            .await
            .unwrap();
        assert_eq!(shipped.len(), 2);
        assert!(shipped.iter().all(|doc| !doc.contains_key("note")));
        let paid = driver
            .find_one("orders", doc! { "status": "paid" })
            .await
            .unwrap()
            .unwrap();
        assert_eq!(paid.get_str("note").unwrap(), "rush");
    }

    #[tokio::test]
    async fn test_update_many_rejects_bad_updates() {
        let driver = MemoryDriver::new();
        driver.insert_one("orders", doc! { "status": "open" }).await.unwrap();

        for update in [
            doc! {},
            doc! { "status": "paid" },
            doc! { "$inc": { "total": 1 } },
            doc! { "$set": 1 },
            doc! { "$set": { "_id": 2 } },
        ] {
            let err = driver
                .update_many("orders", doc! {}, update.clone())
                .await
                .unwrap_err();
            assert!(matches!(err, CollectionError::Validation(_)), "{update:?}");
        }
        assert_eq!(
            driver.count("orders", doc! { "status": "open" }).await.unwrap(),
            1
        );
        assert_eq!(
            driver
                .update_many("missing", doc! {}, doc! { "$set": { "a": 1 } })
                .await
                .unwrap(),
            0
        );
    }

    #[tokio::test]
    async fn test_collection_names() {
        let driver = MemoryDriver::new();
        driver.insert_one("b", doc! {}).await.unwrap();
        driver.insert_one("a", doc! {}).await.unwrap();
        assert_eq!(driver.collection_names(), vec!["a", "b"]);
        assert!(driver.connection_string().is_none());
        assert!(driver.as_remote().is_none());
        assert_eq!(driver.kind(), "memory");
    }
}
