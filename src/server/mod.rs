mod handlers;

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use axum::{
    extract::Extension,
    handler::Handler,
    http::{
        header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, ORIGIN},
        HeaderName, Method,
    },
    middleware::from_fn,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

use crate::api::{DynAPI, API};
use crate::auth::{authenticate, Authenticator};
use crate::config::Config;
use crate::error::Error;
use crate::images::IMAGE_ROUTE;
use crate::server::handlers::{not_found, places};

pub use handlers::places::{MessageResponse, PlaceResponse, PlacesResponse};

/// Builds the HTTP surface. Reads are public; writes go through `authenticate`.
pub fn router(api: DynAPI, authenticator: Arc<Authenticator>, upload_dir: &Path) -> Router {
    Router::new()
        .route(
            "/api/places",
            post(places::create.layer(from_fn(authenticate))),
        )
        .route("/api/places/user/:uid", get(places::find_by_user))
        .route(
            "/api/places/:pid",
            get(places::find)
                .patch(places::update.layer(from_fn(authenticate)))
                .delete(places::delete.layer(from_fn(authenticate))),
        )
        .nest_service(IMAGE_ROUTE, ServeDir::new(upload_dir))
        .fallback(not_found)
        .layer(Extension(api))
        .layer(Extension(authenticator))
        .layer(cors())
        .layer(TraceLayer::new_for_http())
}

fn cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_headers([
            ORIGIN,
            HeaderName::from_static("x-requested-with"),
            CONTENT_TYPE,
            ACCEPT,
            AUTHORIZATION,
        ])
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
}

pub async fn serve<T: API + Sync + Send + 'static>(config: &Config, api: T) -> Result<(), Error> {
    let api = Arc::new(api) as DynAPI;
    let authenticator = Arc::new(Authenticator::new(&config.jwt_key));

    let app = router(api, authenticator, &config.upload_dir);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));

    tracing::info!("listening on {}", addr);

    axum::Server::try_bind(&addr)
        .map_err(server_error)?
        .serve(app.into_make_service())
        .await
        .map_err(server_error)
}

fn server_error<E: std::fmt::Debug>(err: E) -> Error {
    tracing::error!(?err, "http server failed");
    Error::internal("http server failed")
}
