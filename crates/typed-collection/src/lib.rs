//! Typed collection factory
//!
//! Builds typed collection handles on top of a host storage framework.
//!
//! # Features
//! - One [`CollectionBuilder`] for three construction modes: adopt an existing
//!   handle, create a standalone local collection, or create a collection that
//!   proxies storage to a remote MongoDB deployment
//! - Schema-checked inserts and name-based custom methods via [`TypedCollection`]
//! - Static extensions: implement your own traits for `TypedCollection<YourExt>`
//! - [`create_driver`] and [`build_remote`] for remote-backed collections
//!
//! # Example
//! ```no_run
//! use typed_collection::{CollectionBuilder, CollectionRequest, ExecutionContext, LocalHost};
//!
//! # fn main() -> typed_collection::Result<()> {
//! let host = LocalHost::new();
//! let builder = CollectionBuilder::new(&host, ExecutionContext::Server);
//! let orders = builder.build(CollectionRequest::named("orders"))?;
//! assert_eq!(orders.name(), "orders");
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod collection;
pub mod context;
pub mod driver;
pub mod host;
pub mod methods;
pub mod remote;
pub mod storage;
pub mod typed;
pub mod validation;

pub use builder::{CollectionBuilder, CollectionRequest, ConstructionMode, Origin};
pub use collection::{Collection, CollectionOptions};
pub use context::ExecutionContext;
pub use driver::{create_driver, create_driver_from_document, DriverConfig, DriverParams, RemoteDriver};
pub use host::{CollectionHost, LocalHost, RemoteCollectionOptions};
pub use methods::{CustomMethod, MethodSet};
pub use remote::{build_remote, RemoteCollectionRequest};
pub use storage::{MemoryDriver, StorageDriver};
pub use typed::TypedCollection;
pub use typed_collection_common::{CollectionError, Result};
pub use typed_collection_schema::{Field, FieldType, Schema};
pub use validation::ValidatedCollectionName;
