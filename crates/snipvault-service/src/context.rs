//! Request context carrying the authenticated owner.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use snipvault_core::types::OwnerId;

/// Context for the current authenticated request.
///
/// Extracted by the API layer and passed into service methods so that
/// every operation knows *whose* namespace it acts on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    /// The authenticated owner.
    pub owner_id: OwnerId,
    /// When the request was received.
    pub request_time: DateTime<Utc>,
}

impl RequestContext {
    /// Creates a new request context stamped with the current time.
    pub fn new(owner_id: OwnerId) -> Self {
        Self {
            owner_id,
            request_time: Utc::now(),
        }
    }
}
