//! Custom methods attached to a typed collection
//!
//! A [`MethodSet`] maps names to async functions of the collection. Sets are
//! merged shallowly: a later entry replaces an earlier one with the same name,
//! and a custom method named like a built-in replaces the built-in for
//! [`TypedCollection::invoke`](crate::TypedCollection::invoke).

use crate::collection::Collection;
use crate::Result;
use bson::Bson;
use futures::future::{BoxFuture, FutureExt};
use std::fmt;
use std::future::Future;
use std::sync::Arc;

/// Methods every typed collection answers to by name
pub const BUILTIN_METHODS: [&str; 7] = [
    "name", "count", "find", "find_one", "insert", "update", "remove",
];

pub fn is_builtin(name: &str) -> bool {
    BUILTIN_METHODS.contains(&name)
}

/// Type-erased custom method
pub type CustomMethod =
    Arc<dyn Fn(Collection, Vec<Bson>) -> BoxFuture<'static, Result<Bson>> + Send + Sync>;

/// Ordered mapping of method name to custom method
#[derive(Clone, Default)]
pub struct MethodSet {
    methods: Vec<(String, CustomMethod)>,
}

impl MethodSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style [`insert`](Self::insert)
    pub fn with<F, Fut>(mut self, name: impl Into<String>, method: F) -> Self
    where
        F: Fn(Collection, Vec<Bson>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Bson>> + Send + 'static,
    {
        self.insert(name, method);
        self
    }

    /// Add a method, replacing any method already registered under `name`
    pub fn insert<F, Fut>(&mut self, name: impl Into<String>, method: F)
    where
        F: Fn(Collection, Vec<Bson>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Bson>> + Send + 'static,
    {
        let erased: CustomMethod = Arc::new(move |collection: Collection, args: Vec<Bson>| {
            method(collection, args).boxed()
        });
        self.insert_erased(name.into(), erased);
    }

    fn insert_erased(&mut self, name: String, method: CustomMethod) {
        match self.methods.iter_mut().find(|(existing, _)| *existing == name) {
            Some(slot) => slot.1 = method,
            None => self.methods.push((name, method)),
        }
    }

    /// Merge `other` into this set, last write wins
    pub fn merge(&mut self, other: MethodSet) {
        for (name, method) in other.methods {
            self.insert_erased(name, method);
        }
    }

    pub fn get(&self, name: &str) -> Option<&CustomMethod> {
        self.methods
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, method)| method)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Method names in registration order
    pub fn names(&self) -> Vec<&str> {
        self.methods.iter().map(|(name, _)| name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.methods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }
}

impl fmt::Debug for MethodSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.names()).finish()
    }
}
