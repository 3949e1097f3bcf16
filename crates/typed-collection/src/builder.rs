//! Collection builder
//!
//! Turns a [`CollectionRequest`] into a [`TypedCollection`]:
//!
//! 1. resolve the request into exactly one [`ConstructionMode`]
//!    (missing identifier, ambiguous construction and forbidden context are
//!    rejected here, in that order);
//! 2. obtain the base handle: adopt it, or ask the host for a local or
//!    remote-aware collection;
//! 3. compose the handle with the schema, method set and extension.
//!
//! Failures are logged with the intended collection name and returned as-is.

use crate::collection::Collection;
use crate::context::ExecutionContext;
use crate::driver::RemoteDriver;
use crate::host::{CollectionHost, RemoteCollectionOptions};
use crate::methods::MethodSet;
use crate::typed::TypedCollection;
use crate::validation::ValidatedCollectionName;
use crate::Result;
use bson::Bson;
use std::future::Future;
use typed_collection_common::CollectionError;
use typed_collection_schema::Schema;

/// Where the base handle comes from
///
/// Adopting an instance and routing through a driver are separate variants,
/// so a request cannot carry both.
#[derive(Debug, Clone, Default)]
pub enum Origin {
    /// New collection on the host's local backend
    #[default]
    Local,
    /// Existing handle owned by the caller
    Adopt(Collection),
    /// New collection routed through a remote driver
    Remote(RemoteDriver),
}

/// Parameters of [`CollectionBuilder::build`]
///
/// Supplying both an instance and a driver makes the request ambiguous; the
/// builder rejects it instead of dropping either one.
#[derive(Debug)]
pub struct CollectionRequest<M = ()> {
    name: Option<String>,
    origin: Origin,
    conflicting_origin: bool,
    schema: Schema,
    methods: MethodSet,
    extension: M,
}

impl CollectionRequest<()> {
    /// Request with no name and a local origin
    pub fn new() -> Self {
        Self {
            name: None,
            origin: Origin::Local,
            conflicting_origin: false,
            schema: Schema::object(),
            methods: MethodSet::new(),
            extension: (),
        }
    }

    /// Standalone collection called `name`
    pub fn named(name: impl Into<String>) -> Self {
        Self::new().name(name)
    }

    /// Adopt an existing handle
    pub fn adopt(instance: Collection) -> Self {
        Self::new().instance(instance)
    }
}

impl Default for CollectionRequest<()> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M> CollectionRequest<M> {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Adopt `instance`
    pub fn instance(mut self, instance: Collection) -> Self {
        self.conflicting_origin |= matches!(self.origin, Origin::Remote(_));
        self.origin = Origin::Adopt(instance);
        self
    }

    /// Route storage through `driver`
    pub fn driver(mut self, driver: RemoteDriver) -> Self {
        self.conflicting_origin |= matches!(self.origin, Origin::Adopt(_));
        self.origin = Origin::Remote(driver);
        self
    }

    /// Replace the origin outright
    pub fn origin(mut self, origin: Origin) -> Self {
        self.origin = origin;
        self.conflicting_origin = false;
        self
    }

    pub fn schema(mut self, schema: Schema) -> Self {
        self.schema = schema;
        self
    }

    /// Merge `methods` into the request's method set, last write wins
    pub fn methods(mut self, methods: MethodSet) -> Self {
        self.methods.merge(methods);
        self
    }

    /// Add one custom method
    pub fn method<F, Fut>(mut self, name: impl Into<String>, method: F) -> Self
    where
        F: Fn(Collection, Vec<Bson>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Bson>> + Send + 'static,
    {
        self.methods.insert(name, method);
        self
    }

    /// Attach a static extension value, changing the handle's type
    pub fn extension<N>(self, extension: N) -> CollectionRequest<N> {
        CollectionRequest {
            name: self.name,
            origin: self.origin,
            conflicting_origin: self.conflicting_origin,
            schema: self.schema,
            methods: self.methods,
            extension,
        }
    }

    pub fn collection_name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

/// Construction mode resolved from a request
#[derive(Debug, Clone)]
pub enum ConstructionMode {
    /// Reuse a handle the caller already owns
    Adopt(Collection),
    /// New collection on the host's local backend
    Standalone(ValidatedCollectionName),
    /// New collection that proxies storage to a remote driver
    Remote(ValidatedCollectionName, RemoteDriver),
}

impl ConstructionMode {
    /// Validate the identifying parameters and pick a mode
    ///
    /// An empty name counts as no name.
    ///
    /// # Errors
    /// - `MissingIdentifier` if there is neither a name nor an instance
    /// - `AmbiguousConstruction` if there are both
    /// - `ForbiddenContext` outside a server context
    /// - `Validation` if the name is not a valid collection name
    pub fn resolve(
        name: Option<&str>,
        origin: Origin,
        context: ExecutionContext,
    ) -> Result<Self> {
        match (name.filter(|name| !name.is_empty()), origin) {
            (None, Origin::Local | Origin::Remote(_)) => Err(CollectionError::MissingIdentifier),
            (Some(_), Origin::Adopt(_)) => Err(CollectionError::AmbiguousConstruction),
            (None, Origin::Adopt(instance)) => {
                context.ensure_server(instance.name())?;
                Ok(Self::Adopt(instance))
            }
            (Some(name), Origin::Local) => {
                context.ensure_server(name)?;
                Ok(Self::Standalone(ValidatedCollectionName::new(name)?))
            }
            (Some(name), Origin::Remote(driver)) => {
                context.ensure_server(name)?;
                Ok(Self::Remote(ValidatedCollectionName::new(name)?, driver))
            }
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Adopt(_) => "adopt",
            Self::Standalone(_) => "standalone",
            Self::Remote(..) => "remote",
        }
    }
}

/// Builds typed collections against a host in a given execution context
pub struct CollectionBuilder<'h, H: CollectionHost + ?Sized> {
    host: &'h H,
    context: ExecutionContext,
}

impl<'h, H: CollectionHost + ?Sized> CollectionBuilder<'h, H> {
    pub fn new(host: &'h H, context: ExecutionContext) -> Self {
        Self { host, context }
    }

    pub fn context(&self) -> ExecutionContext {
        self.context
    }

    /// Build a typed collection from `request`
    pub fn build<M>(&self, request: CollectionRequest<M>) -> Result<TypedCollection<M>> {
        let CollectionRequest {
            name,
            origin,
            conflicting_origin,
            schema,
            methods,
            extension,
        } = request;

        let collection = if conflicting_origin {
            Err(CollectionError::AmbiguousConstruction)
        } else {
            ConstructionMode::resolve(name.as_deref(), origin, self.context)
        }
        .and_then(|mode| self.dispatch(mode));

        match collection {
            Ok(collection) => Ok(TypedCollection::new(collection, schema, methods, extension)),
            Err(e) => Err(creation_failed(name.as_deref(), e)),
        }
    }

    fn dispatch(&self, mode: ConstructionMode) -> Result<Collection> {
        tracing::debug!(mode = mode.kind(), "Constructing collection");
        match mode {
            ConstructionMode::Adopt(instance) => Ok(instance),
            ConstructionMode::Standalone(name) => self.host.create_local_collection(&name),
            ConstructionMode::Remote(name, driver) => self
                .host
                .create_remote_aware_collection(&name, RemoteCollectionOptions::proxy(driver)),
        }
    }
}

/// Log a failed construction and hand the error back
pub(crate) fn creation_failed(name: Option<&str>, e: CollectionError) -> CollectionError {
    match name.filter(|name| !name.is_empty()) {
        Some(name) => tracing::error!(
            collection = %name,
            error = %e,
            "An error has happened when your collection \"{}\" was being created",
            name
        ),
        None => tracing::error!(
            error = %e,
            "An error has happened when your collection was being created"
        ),
    }
    e
}
