//! Command/query dispatch.
//!
//! Every business operation is a request object (a command or a query)
//! with exactly one registered handler. The registry is assembled once at
//! startup via [`DispatcherBuilder`] and is immutable afterwards; a second
//! registration for the same request type is a wiring error surfaced at
//! build time, not at dispatch time. Dispatching a request type that was
//! never registered fails closed with [`DomainError::HandlerNotFound`].

use std::any::{Any, TypeId};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::{DomainError, DomainResult};

/// A command (write intent) or query (read intent).
///
/// Requests are immutable once constructed and carry everything the
/// handler needs, including the acting principal where authorization is
/// required.
pub trait Request: Send + Sync + 'static {
    type Response: Send + 'static;

    fn name() -> &'static str {
        std::any::type_name::<Self>()
    }
}

#[async_trait]
pub trait Handler<R: Request>: Send + Sync {
    async fn handle(&self, request: R) -> DomainResult<R::Response>;
}

struct Registration {
    name: &'static str,
    handler: Box<dyn Any + Send + Sync>,
}

#[derive(Default)]
pub struct DispatcherBuilder {
    registrations: HashMap<TypeId, Registration>,
}

impl DispatcherBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the single handler for a request type.
    pub fn register<R, H>(mut self, handler: H) -> DomainResult<Self>
    where
        R: Request,
        H: Handler<R> + 'static,
    {
        match self.registrations.entry(TypeId::of::<R>()) {
            Entry::Occupied(_) => Err(DomainError::conflict(format!(
                "a handler is already registered for {}",
                R::name()
            ))),
            Entry::Vacant(slot) => {
                let erased: Arc<dyn Handler<R>> = Arc::new(handler);
                slot.insert(Registration {
                    name: R::name(),
                    handler: Box::new(erased),
                });
                Ok(self)
            }
        }
    }

    pub fn build(self) -> Dispatcher {
        Dispatcher {
            registrations: self.registrations,
        }
    }
}

pub struct Dispatcher {
    registrations: HashMap<TypeId, Registration>,
}

impl Dispatcher {
    /// Resolves the handler by the runtime type of `request` and invokes
    /// it. The handler's result or typed error is returned unchanged.
    pub async fn dispatch<R: Request>(&self, request: R) -> DomainResult<R::Response> {
        let registration = self
            .registrations
            .get(&TypeId::of::<R>())
            .ok_or(DomainError::HandlerNotFound(R::name()))?;

        let handler = registration
            .handler
            .downcast_ref::<Arc<dyn Handler<R>>>()
            .ok_or_else(|| {
                DomainError::internal(format!(
                    "registration for {} holds a handler of the wrong type",
                    registration.name
                ))
            })?;

        handler.handle(request).await
    }

    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Ping {
        payload: u32,
    }

    impl Request for Ping {
        type Response = u32;
    }

    struct PingHandler;

    #[async_trait]
    impl Handler<Ping> for PingHandler {
        async fn handle(&self, request: Ping) -> DomainResult<u32> {
            Ok(request.payload + 1)
        }
    }

    struct Unregistered;

    impl Request for Unregistered {
        type Response = ();
    }

    #[tokio::test]
    async fn dispatches_to_the_registered_handler() {
        let dispatcher = DispatcherBuilder::new()
            .register::<Ping, _>(PingHandler)
            .unwrap()
            .build();

        let result = dispatcher.dispatch(Ping { payload: 41 }).await.unwrap();
        assert_eq!(result, 42);
    }

    #[tokio::test]
    async fn duplicate_registration_fails_at_build_time() {
        let result = DispatcherBuilder::new()
            .register::<Ping, _>(PingHandler)
            .unwrap()
            .register::<Ping, _>(PingHandler);

        assert!(matches!(result, Err(DomainError::Conflict(_))));
    }

    #[tokio::test]
    async fn unregistered_request_fails_closed() {
        let dispatcher = DispatcherBuilder::new()
            .register::<Ping, _>(PingHandler)
            .unwrap()
            .build();

        let result = dispatcher.dispatch(Unregistered).await;
        assert!(matches!(result, Err(DomainError::HandlerNotFound(_))));
    }
}
