use std::sync::Arc;

use axum::{
    http::{Method, Request},
    middleware::Next,
    response::Response,
};

use crate::auth::Authenticator;
use crate::error::Error;

/// Resolves the caller from the `Authorization` header and stores it in the
/// request extensions. Pre-flight requests are never checked.
pub async fn authenticate<B: Send>(mut req: Request<B>, next: Next<B>) -> Result<Response, Error> {
    if req.method() == Method::OPTIONS {
        return Ok(next.run(req).await);
    }

    let authenticator = req
        .extensions()
        .get::<Arc<Authenticator>>()
        .cloned()
        .ok_or_else(|| {
            tracing::error!("authenticator missing from request extensions");
            Error::authentication_failed()
        })?;

    let caller = authenticator.authenticate(req.headers())?;

    tracing::debug!(caller = %caller.id, "request authenticated");

    req.extensions_mut().insert(caller);

    Ok(next.run(req).await)
}
