use async_trait::async_trait;

use crate::domain::{AccessContext, Identity};
use crate::error::AccessResult;

/// Resolves an acting identity into its role and scope. Implemented by the
/// persistence layer against the profile and assignment tables; resolved
/// once per request and passed explicitly to guard and filter calls.
#[async_trait]
pub trait ScopeResolver: Send + Sync {
    /// Resolve a signed-in identity. Fails with `NotFound` when no profile
    /// exists for it yet.
    async fn resolve(&self, identity: Identity) -> AccessResult<AccessContext>;

    /// Context for an unauthenticated caller: read-only universal scope.
    fn resolve_anonymous(&self) -> AccessContext {
        AccessContext::anonymous()
    }
}
