//! Request context types.
//!
//! The [`RequestContext`] carries per-request state through the
//! pre-dispatch and post-handler hooks. It is owned by one request and never
//! shared.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::record::RecordInstance;

/// A unique identifier for each request, using UUID v7.
///
/// UUID v7 is time-ordered, which makes it ideal for request tracking
/// and log correlation.
///
/// # Example
///
/// ```
/// use miyabi_core::RequestId;
///
/// let id = RequestId::new();
/// println!("Request ID: {}", id);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(Uuid);

impl RequestId {
    /// Creates a new unique request ID using UUID v7.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Creates a `RequestId` from an existing UUID, e.g. one taken from a header.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for RequestId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// Per-request state.
///
/// # Example
///
/// ```
/// use miyabi_core::RequestContext;
///
/// let ctx = RequestContext::for_operation("getUser");
/// assert_eq!(ctx.operation_id(), Some("getUser"));
/// assert!(ctx.request_schema().is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    request_id: RequestId,
    operation_id: Option<String>,
    request_schema: Option<RecordInstance>,
}

impl RequestContext {
    /// Creates a context with a fresh request ID and no operation bound.
    #[must_use]
    pub fn new() -> Self {
        Self::with_request_id(RequestId::new())
    }

    /// Creates a context with the given request ID.
    #[must_use]
    pub const fn with_request_id(request_id: RequestId) -> Self {
        Self {
            request_id,
            operation_id: None,
            request_schema: None,
        }
    }

    /// Creates a context already bound to `operation_id`.
    #[must_use]
    pub fn for_operation(operation_id: impl Into<String>) -> Self {
        let mut ctx = Self::new();
        ctx.set_operation_id(operation_id);
        ctx
    }

    /// Returns the request ID.
    #[must_use]
    pub const fn request_id(&self) -> RequestId {
        self.request_id
    }

    /// Returns the matched operation ID.
    #[must_use]
    pub fn operation_id(&self) -> Option<&str> {
        self.operation_id.as_deref()
    }

    /// Binds the matched operation ID.
    pub fn set_operation_id(&mut self, operation_id: impl Into<String>) {
        self.operation_id = Some(operation_id.into());
    }

    /// Returns the validated canonical request instance, once computed.
    #[must_use]
    pub const fn request_schema(&self) -> Option<&RecordInstance> {
        self.request_schema.as_ref()
    }

    /// Attaches the validated canonical request instance.
    pub fn set_request_schema(&mut self, instance: RecordInstance) {
        self.request_schema = Some(instance);
    }

    /// Removes and returns the validated canonical request instance.
    pub fn take_request_schema(&mut self) -> Option<RecordInstance> {
        self.request_schema.take()
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::new()
    }
}
