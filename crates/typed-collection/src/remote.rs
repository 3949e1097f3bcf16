//! Remote collection assembly
//!
//! One call that creates a driver for a connection string and builds a typed
//! collection routed through it.

use crate::builder::{creation_failed, CollectionBuilder, CollectionRequest};
use crate::context::ExecutionContext;
use crate::driver::{DriverConfig, DriverParams};
use crate::host::CollectionHost;
use crate::methods::MethodSet;
use crate::typed::TypedCollection;
use crate::Result;
use typed_collection_schema::Schema;

/// Parameters of [`build_remote`]
#[derive(Debug)]
pub struct RemoteCollectionRequest<M = ()> {
    pub connection_string: String,
    pub name: String,
    pub schema: Schema,
    pub methods: MethodSet,
    pub extension: M,
    /// Caller label used in logs and in `ForbiddenContext` errors
    pub origin_label: String,
    pub config: DriverConfig,
}

impl RemoteCollectionRequest<()> {
    pub fn new(
        connection_string: impl Into<String>,
        name: impl Into<String>,
        origin_label: impl Into<String>,
    ) -> Self {
        Self {
            connection_string: connection_string.into(),
            name: name.into(),
            schema: Schema::object(),
            methods: MethodSet::new(),
            extension: (),
            origin_label: origin_label.into(),
            config: DriverConfig::default(),
        }
    }
}

impl<M> RemoteCollectionRequest<M> {
    pub fn schema(mut self, schema: Schema) -> Self {
        self.schema = schema;
        self
    }

    pub fn methods(mut self, methods: MethodSet) -> Self {
        self.methods.merge(methods);
        self
    }

    pub fn config(mut self, config: DriverConfig) -> Self {
        self.config = config;
        self
    }

    pub fn extension<N>(self, extension: N) -> RemoteCollectionRequest<N> {
        RemoteCollectionRequest {
            connection_string: self.connection_string,
            name: self.name,
            schema: self.schema,
            methods: self.methods,
            extension,
            origin_label: self.origin_label,
            config: self.config,
        }
    }
}

/// Build a typed collection whose storage lives on a remote deployment
///
/// Fails with `ForbiddenContext` (labelled with the origin) before any driver
/// is created when called from a client context. Driver and builder errors
/// propagate unchanged and are logged once, like any failed construction.
pub fn build_remote<H, M>(
    host: &H,
    context: ExecutionContext,
    request: RemoteCollectionRequest<M>,
) -> Result<TypedCollection<M>>
where
    H: CollectionHost + ?Sized,
{
    let RemoteCollectionRequest {
        connection_string,
        name,
        schema,
        methods,
        extension,
        origin_label,
        config,
    } = request;

    let driver = context
        .ensure_server(&origin_label)
        .and_then(|()| host.create_driver(DriverParams::new(connection_string).with_config(config)))
        .map_err(|e| creation_failed(Some(&name), e))?;

    tracing::info!(
        origin = %origin_label,
        collection = %name,
        "connection established with {} - {}",
        origin_label,
        name
    );

    let request = CollectionRequest::named(name)
        .driver(driver)
        .schema(schema)
        .methods(methods)
        .extension(extension);
    CollectionBuilder::new(host, context).build(request)
}
