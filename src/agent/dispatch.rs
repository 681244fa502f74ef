//! Request dispatcher: routes engine callbacks to named handlers.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use crate::engine::{RequestCallback, RequestMode, ScalarRegistration};
use crate::error::ErrorStatus;
use crate::handler::{RequestChain, RequestContext, ScalarHandler};

/// The callback every scalar registration is bound to.
///
/// Holds the name→handler map. On each engine callback it rejects anything
/// that is not a GET with `genErr`, otherwise looks the handler up by the
/// registration's name and returns exactly the status the handler produces.
/// It never inspects or rewrites the value.
///
/// The map is written while registering (before polling starts) and only
/// read during polling.
#[derive(Default)]
pub(crate) struct Dispatcher {
    handlers: RwLock<HashMap<String, Arc<dyn ScalarHandler>>>,
}

impl Dispatcher {
    /// Create a dispatcher with no handlers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `handler` to `name`, replacing any previous binding.
    pub fn insert(&self, name: impl Into<String>, handler: Arc<dyn ScalarHandler>) {
        self.handlers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name.into(), handler);
    }

    /// The handler bound to `name`.
    pub fn handler(&self, name: &str) -> Option<Arc<dyn ScalarHandler>> {
        self.handlers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
    }

    /// Unbind `name`.
    pub fn remove(&self, name: &str) -> Option<Arc<dyn ScalarHandler>> {
        self.handlers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(name)
    }

    /// Number of bound handlers.
    pub fn len(&self) -> usize {
        self.handlers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("handlers", &self.len())
            .finish()
    }
}

impl RequestCallback for Dispatcher {
    fn on_request(
        &self,
        registration: &ScalarRegistration,
        mode: RequestMode,
        requests: &mut RequestChain,
    ) -> ErrorStatus {
        if mode != RequestMode::Get {
            tracing::debug!(
                handler = %registration.name,
                oid = %registration.root_oid,
                %mode,
                "unsupported request mode"
            );
            return ErrorStatus::GenErr;
        }

        // The read lock is released before the handler runs.
        let Some(handler) = self.handler(&registration.name) else {
            tracing::warn!(
                handler = %registration.name,
                oid = %registration.root_oid,
                "no handler bound to registration"
            );
            return ErrorStatus::NoError;
        };

        tracing::debug!(
            handler = %registration.name,
            oid = %registration.root_oid,
            "received GET request"
        );

        let ctx = RequestContext {
            handler_name: &registration.name,
            root_oid: &registration.root_oid,
        };
        handler.resolve(&ctx, requests)
    }
}
