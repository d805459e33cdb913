use actix_web::{dev::Payload, Error as ActixError, FromRequest, HttpRequest};
use futures::future::{ready, Ready};
use tokio_util::sync::{CancellationToken, DropGuard};

use crate::error::CatalogError;

/// Per-request cancellation scope handed to every service and gateway call.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    token: CancellationToken,
}

impl RequestContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Fails with [`CatalogError::Cancelled`] once the request has been abandoned.
    pub fn ensure_active(&self) -> Result<(), CatalogError> {
        if self.token.is_cancelled() {
            return Err(CatalogError::Cancelled);
        }
        Ok(())
    }

    /// Guard that cancels the context when dropped. Handlers hold it so that
    /// actix dropping the handler future fires the token.
    pub fn cancel_on_drop(&self) -> DropGuard {
        self.token.clone().drop_guard()
    }
}

impl FromRequest for RequestContext {
    type Error = ActixError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(_req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(Ok(RequestContext::new()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_context_is_active() {
        let ctx = RequestContext::new();
        assert!(ctx.ensure_active().is_ok());
    }

    #[test]
    fn dropping_guard_cancels_clones() {
        let ctx = RequestContext::new();
        let worker = ctx.clone();
        {
            let _guard = ctx.cancel_on_drop();
            assert!(!worker.is_cancelled());
        }
        assert!(matches!(worker.ensure_active(), Err(CatalogError::Cancelled)));
    }
}
