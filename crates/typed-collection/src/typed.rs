//! Typed collection handle
//!
//! A [`TypedCollection`] composes the base [`Collection`] with the schema its
//! documents must satisfy, the merged [`MethodSet`], and a static extension
//! value `M`. Callers add typed capabilities by implementing their own trait
//! for `TypedCollection<TheirExtension>`; name-based calls go through
//! [`TypedCollection::invoke`].

use crate::collection::Collection;
use crate::methods::MethodSet;
use crate::Result;
use bson::{Bson, Document};
use std::fmt;
use std::ops::Deref;
use std::sync::Arc;
use typed_collection_common::CollectionError;
use typed_collection_schema::{
    validate_value, FieldPath, Schema, ValidationErrors, Violation, ID_FIELD,
};

pub struct TypedCollection<M = ()> {
    collection: Collection,
    schema: Arc<Schema>,
    methods: MethodSet,
    extension: M,
}

impl<M> TypedCollection<M> {
    pub fn new(collection: Collection, schema: Schema, methods: MethodSet, extension: M) -> Self {
        Self {
            collection,
            schema: Arc::new(schema),
            methods,
            extension,
        }
    }

    pub fn collection(&self) -> &Collection {
        &self.collection
    }

    pub fn into_collection(self) -> Collection {
        self.collection
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn methods(&self) -> &MethodSet {
        &self.methods
    }

    pub fn extension(&self) -> &M {
        &self.extension
    }

    /// True if `name` resolves to a custom or built-in method
    pub fn has_method(&self, name: &str) -> bool {
        self.methods.contains(name) || crate::methods::is_builtin(name)
    }

    /// Fill defaults, validate against the schema, then insert
    pub async fn insert(&self, doc: Document) -> Result<Bson> {
        let doc = self.schema.parse(doc)?;
        self.collection.insert_one(doc).await
    }

    /// Check an update against the schema, then apply it
    ///
    /// `$set` values must match their declared field types and `$unset` may
    /// not remove a required field. Only top-level keys are checked.
    pub async fn update(&self, filter: Document, update: Document) -> Result<u64> {
        self.check_update(&update)?;
        self.collection.update_many(filter, update).await
    }

    fn check_update(&self, update: &Document) -> Result<()> {
        let path = FieldPath::root("update");
        let mut errors = ValidationErrors::new();

        if let Ok(set) = update.get_document("$set") {
            for (key, value) in set {
                match self.schema.get(key) {
                    Some(field) => {
                        validate_value(value, &field.field_type, &path.key(key), &mut errors)
                    }
                    None if self.schema.is_strict() && key != ID_FIELD => {
                        errors.push(&path.key(key), Violation::Unrecognized)
                    }
                    None => {}
                }
            }
        }
        if let Ok(unset) = update.get_document("$unset") {
            for key in unset.keys() {
                if self.schema.get(key).is_some_and(|field| field.required) {
                    errors.push(&path.key(key), Violation::Missing);
                }
            }
        }

        errors.into_result()?;
        Ok(())
    }

    /// Call a method by name
    ///
    /// Custom methods take precedence over the built-ins, so a custom method
    /// named `count` replaces the built-in `count`.
    pub async fn invoke(&self, name: &str, args: Vec<Bson>) -> Result<Bson> {
        if let Some(method) = self.methods.get(name) {
            return method(self.collection.clone(), args).await;
        }

        match name {
            "name" => Ok(Bson::String(self.collection.name().to_string())),
            "count" => {
                let count = self.collection.count(filter_arg(&args, 0)?).await?;
                Ok(Bson::Int64(count as i64))
            }
            "find" => {
                let docs = self.collection.find(filter_arg(&args, 0)?).await?;
                Ok(Bson::Array(docs.into_iter().map(Bson::Document).collect()))
            }
            "find_one" => Ok(self
                .collection
                .find_one(filter_arg(&args, 0)?)
                .await?
                .map(Bson::Document)
                .unwrap_or(Bson::Null)),
            "insert" => match args.into_iter().next() {
                Some(Bson::Document(doc)) => self.insert(doc).await,
                _ => Err(CollectionError::Validation(
                    "insert expects a document argument".to_string(),
                )),
            },
            "update" => match args.get(1) {
                Some(Bson::Document(update)) => {
                    let matched = self.update(filter_arg(&args, 0)?, update.clone()).await?;
                    Ok(Bson::Int64(matched as i64))
                }
                _ => Err(CollectionError::Validation(
                    "update expects a filter and an update document".to_string(),
                )),
            },
            "remove" => {
                let removed = self.collection.delete_many(filter_arg(&args, 0)?).await?;
                Ok(Bson::Int64(removed as i64))
            }
            _ => Err(CollectionError::MethodNotFound(name.to_string())),
        }
    }
}

/// Optional filter document at `index`; absent means match everything
fn filter_arg(args: &[Bson], index: usize) -> Result<Document> {
    match args.get(index) {
        None | Some(Bson::Null) => Ok(Document::new()),
        Some(Bson::Document(filter)) => Ok(filter.clone()),
        Some(other) => Err(CollectionError::Validation(format!(
            "Expected a filter document, got {}",
            typed_collection_schema::bson_type_name(other)
        ))),
    }
}

impl<M> Deref for TypedCollection<M> {
    type Target = Collection;

    fn deref(&self) -> &Collection {
        &self.collection
    }
}

impl<M> fmt::Debug for TypedCollection<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypedCollection")
            .field("collection", &self.collection)
            .field("methods", &self.methods)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collection::CollectionOptions;
    use crate::storage::{MemoryDriver, StorageDriver};
    use crate::validation::ValidatedCollectionName;
    use bson::doc;
    use futures::FutureExt;
    use typed_collection_schema::FieldType;

    fn orders(methods: MethodSet) -> TypedCollection {
        let driver: Arc<dyn StorageDriver> = Arc::new(MemoryDriver::new());
        let collection = Collection::new(
            ValidatedCollectionName::new("orders").unwrap(),
            driver,
            CollectionOptions::default(),
        );
        let schema = Schema::object()
            .field("customer", FieldType::non_empty_string())
            .field("total", FieldType::float())
            .with_default("status", FieldType::string(), "open");
        TypedCollection::new(collection, schema, methods, ())
    }

    #[tokio::test]
    async fn test_insert_applies_schema() {
        let orders = orders(MethodSet::new());
        orders
            .insert(doc! { "customer": "acme", "total": 10.0 })
            .await
            .unwrap();

        let stored = orders.find_one(doc! {}).await.unwrap().unwrap();
        assert_eq!(stored.get_str("status").unwrap(), "open");

        let err = orders
            .insert(doc! { "customer": "", "total": "ten" })
            .await
            .unwrap_err();
        assert!(err.is_schema_error());
        assert_eq!(orders.count(doc! {}).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_builtin_invoke() {
        let orders = orders(MethodSet::new());
        orders
            .invoke("insert", vec![Bson::Document(doc! { "customer": "acme", "total": 5 })])
            .await
            .unwrap();

        assert_eq!(
            orders.invoke("name", vec![]).await.unwrap(),
            Bson::String("orders".to_string())
        );
        assert_eq!(orders.invoke("count", vec![]).await.unwrap(), Bson::Int64(1));
        assert_eq!(
            orders
                .invoke("find_one", vec![Bson::Document(doc! { "customer": "globex" })])
                .await
                .unwrap(),
            Bson::Null
        );
        assert_eq!(
            orders.invoke("remove", vec![Bson::Null]).await.unwrap(),
            Bson::Int64(1)
        );
    }

    #[tokio::test]
    async fn test_update_checks_schema() {
        let orders = orders(MethodSet::new());
        orders
            .insert(doc! { "customer": "acme", "total": 10.0 })
            .await
            .unwrap();

        let err = orders
            .update(doc! {}, doc! { "$set": { "total": "ten" } })
            .await
            .unwrap_err();
        match err {
            CollectionError::SchemaValidation { field, .. } => assert_eq!(field, "total"),
            other => panic!("unexpected error: {other:?}"),
        }

        let err = orders
            .update(doc! {}, doc! { "$unset": { "customer": "" } })
            .await
            .unwrap_err();
        assert!(err.is_schema_error());

        let matched = orders
            .update(
                doc! { "customer": "acme" },
                doc! { "$set": { "status": "paid", "note": "rush" } },
            )
            .await
            .unwrap();
        assert_eq!(matched, 1);
        assert_eq!(orders.count(doc! { "status": "paid" }).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_invoke_update() {
        let orders = orders(MethodSet::new());
        orders
            .insert(doc! { "customer": "acme", "total": 10.0 })
            .await
            .unwrap();

        let matched = orders
            .invoke(
                "update",
                vec![Bson::Null, Bson::Document(doc! { "$set": { "total": 12.5 } })],
            )
            .await
            .unwrap();
        assert_eq!(matched, Bson::Int64(1));

        let err = orders
            .invoke("update", vec![Bson::Null])
            .await
            .unwrap_err();
        assert!(matches!(err, CollectionError::Validation(_)));
    }

    #[tokio::test]
    async fn test_invoke_rejects_bad_arguments() {
        let orders = orders(MethodSet::new());
        let err = orders
            .invoke("count", vec![Bson::Int32(1)])
            .await
            .unwrap_err();
        assert!(matches!(err, CollectionError::Validation(_)));

        let err = orders.invoke("insert", vec![]).await.unwrap_err();
        assert!(matches!(err, CollectionError::Validation(_)));
    }

    #[tokio::test]
    async fn test_unknown_method() {
        let orders = orders(MethodSet::new());
        let err = orders.invoke("archive", vec![]).await.unwrap_err();
        assert!(matches!(err, CollectionError::MethodNotFound(name) if name == "archive"));
        assert!(!orders.has_method("archive"));
        assert!(orders.has_method("count"));
    }

    #[tokio::test]
    async fn test_custom_method_overrides_builtin() {
        let methods = MethodSet::new().with("count", |_: Collection, _: Vec<Bson>| {
            async { Result::<Bson>::Ok(Bson::Int64(-1)) }.boxed()
        });
        let orders = orders(methods);
        orders
            .insert(doc! { "customer": "acme", "total": 1 })
            .await
            .unwrap();

        assert_eq!(orders.invoke("count", vec![]).await.unwrap(), Bson::Int64(-1));
        // The base handle is untouched
        assert_eq!(orders.count(doc! {}).await.unwrap(), 1);
    }

    #[test]
    fn test_deref_to_collection() {
        let orders = orders(MethodSet::new());
        assert_eq!(orders.name(), "orders");
        assert!(Collection::ptr_eq(&orders, orders.collection()));
    }
}
