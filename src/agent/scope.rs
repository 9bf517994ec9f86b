//! Scoped ownership of a remote session
//!
//! Whatever happens inside the scope, the session is closed exactly once on
//! the way out and a failing close never replaces the scope's own outcome.

use std::future::Future;
use std::sync::Arc;

use crate::core::Result;
use crate::remote::AutomationSession;

/// Owns a session for the duration of one body
pub struct SessionScope {
    session: Arc<dyn AutomationSession>,
}

impl SessionScope {
    pub fn new(session: Arc<dyn AutomationSession>) -> Self {
        Self { session }
    }

    /// Run `body` with the session, then close it
    pub async fn run<F, Fut, T>(self, body: F) -> Result<T>
    where
        F: FnOnce(Arc<dyn AutomationSession>) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let outcome = body(Arc::clone(&self.session)).await;
        self.release().await;
        outcome
    }

    async fn release(self) {
        if let Err(e) = self.session.close().await {
            tracing::debug!(error = %e, "failed to close session");
        }
    }
}
