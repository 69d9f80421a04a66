//! Capability keys used for registry lookup.

use crate::message::{Notification, Request};
use std::{
    any::{TypeId, type_name},
    fmt,
    hash::{Hash, Hasher},
};

/// The kind of contract an implementation fulfils.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CapabilityKind {
    /// Handles a request type, producing its response. Single-bind.
    RequestHandler,
    /// Wraps the handler of a request type. Multi-bind.
    PipelineBehavior,
    /// Receives a notification type. Multi-bind.
    NotificationHandler,
}

impl CapabilityKind {
    /// Whether exactly one implementation must exist for this kind.
    pub const fn is_single_bind(self) -> bool {
        matches!(self, CapabilityKind::RequestHandler)
    }
}

/// A declared contract such as "handles `CreateOrder` producing `OrderId`".
///
/// Equality and hashing only consider the kind and the message type; the
/// response type of a request is fixed by the request itself and the names
/// are kept for diagnostics.
#[derive(Debug, Clone, Copy)]
pub struct Capability {
    kind: CapabilityKind,
    message: TypeId,
    message_name: &'static str,
    response_name: Option<&'static str>,
}

impl Capability {
    /// "handles `R` producing `R::Response`".
    pub fn request_handler<R: Request>() -> Self {
        Self::for_request::<R>(CapabilityKind::RequestHandler)
    }

    /// "wraps the handler of `R`".
    pub fn pipeline_behavior<R: Request>() -> Self {
        Self::for_request::<R>(CapabilityKind::PipelineBehavior)
    }

    /// "receives `N`".
    pub fn notification_handler<N: Notification>() -> Self {
        Self {
            kind: CapabilityKind::NotificationHandler,
            message: TypeId::of::<N>(),
            message_name: type_name::<N>(),
            response_name: None,
        }
    }

    fn for_request<R: Request>(kind: CapabilityKind) -> Self {
        Self {
            kind,
            message: TypeId::of::<R>(),
            message_name: type_name::<R>(),
            response_name: Some(type_name::<R::Response>()),
        }
    }

    /// The kind of contract.
    pub fn kind(&self) -> CapabilityKind {
        self.kind
    }

    /// The type name of the request or notification.
    pub fn message_name(&self) -> &'static str {
        self.message_name
    }

    /// The response type name, for request capabilities.
    pub fn response_name(&self) -> Option<&'static str> {
        self.response_name
    }
}

impl PartialEq for Capability {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && self.message == other.message
    }
}

impl Eq for Capability {}

impl Hash for Capability {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.kind.hash(state);
        self.message.hash(state);
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.kind {
            CapabilityKind::RequestHandler => "RequestHandler",
            CapabilityKind::PipelineBehavior => "PipelineBehavior",
            CapabilityKind::NotificationHandler => "NotificationHandler",
        };
        match self.response_name {
            Some(response) => write!(f, "{kind}<{} -> {response}>", self.message_name),
            None => write!(f, "{kind}<{}>", self.message_name),
        }
    }
}
