use crate::meta::HandlerRef;
use http::Method;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// One path template and the handlers mounted on it, per method.
#[derive(Debug, Clone)]
pub struct RouteRecord {
    path: String,
    methods: Vec<(Method, HandlerRef)>,
}

impl RouteRecord {
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn methods(&self) -> &[(Method, HandlerRef)] {
        &self.methods
    }

    pub fn handler(&self, method: &Method) -> Option<&HandlerRef> {
        self.methods
            .iter()
            .find(|(m, _)| m == method)
            .map(|(_, handler)| handler)
    }
}

/// The routing table an adapter introspects, in registration order.
///
/// Registering the same (path, method) twice replaces the earlier handler.
#[derive(Debug, Default)]
pub struct RouteTable {
    records: Vec<RouteRecord>,
}

impl RouteTable {
    pub fn insert(&mut self, path: &str, method: Method, handler: HandlerRef) {
        let index = match self.records.iter().position(|r| r.path == path) {
            Some(index) => index,
            None => {
                self.records.push(RouteRecord {
                    path: path.to_string(),
                    methods: Vec::new(),
                });
                self.records.len() - 1
            }
        };

        let record = &mut self.records[index];
        match record.methods.iter().position(|(m, _)| *m == method) {
            Some(existing) => {
                tracing::debug!(path, %method, "replacing previously registered handler");
                record.methods[existing].1 = handler;
            }
            None => record.methods.push((method, handler)),
        }
    }

    pub fn records(&self) -> &[RouteRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// A route table shared between the router that fills it and the adapter
/// that reads it.
#[derive(Debug, Clone, Default)]
pub struct SharedRouteTable {
    inner: Arc<RwLock<RouteTable>>,
}

impl SharedRouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn read(&self) -> RwLockReadGuard<'_, RouteTable> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn write(&self) -> RwLockWriteGuard<'_, RouteTable> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Copy of the current records.
    pub fn snapshot(&self) -> Vec<RouteRecord> {
        self.read().records().to_vec()
    }
}
