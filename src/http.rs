mod handler;

pub use handler::{
    ApiError, ApiSuccess, AuthorHttpRequest, AuthorHttpResponse, ErrorResponse, FieldError,
    ParseAuthorHttpRequestError, SearchAuthorsHttpQuery,
};

use crate::repositories::AuthorRepository;
use anyhow::Context;
use axum::Router;
use axum::routing::{get, post};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

pub const AUTHORS_PATH: &str = "/autores";
const AUTHOR_PATH: &str = "/autores/{id}";

#[derive(Debug)]
pub struct AppState<AR: AuthorRepository> {
    author_repo: Arc<AR>,
}

impl<AR: AuthorRepository> AppState<AR> {
    pub fn new(author_repo: AR) -> Self {
        Self {
            author_repo: Arc::new(author_repo),
        }
    }
}

impl<AR: AuthorRepository> Clone for AppState<AR> {
    fn clone(&self) -> Self {
        Self {
            author_repo: Arc::clone(&self.author_repo),
        }
    }
}

#[derive(Debug)]
pub struct HttpServerConfig {
    port: u16,
}

impl HttpServerConfig {
    #[must_use]
    pub const fn new(port: u16) -> Self {
        Self { port }
    }
}

pub struct HttpServer {
    router: Router,
    listener: TcpListener,
}

impl HttpServer {
    pub async fn new<AR: AuthorRepository>(
        state: AppState<AR>,
        config: HttpServerConfig,
    ) -> anyhow::Result<Self> {
        let router = router(state);

        let listener = TcpListener::bind(format!("0.0.0.0:{}", config.port))
            .await
            .with_context(|| format!("Failed to bind to port {}", config.port))?;

        Ok(Self { router, listener })
    }

    pub async fn run(self) -> anyhow::Result<()> {
        tracing::info!(
            "Listening on {}",
            self.listener
                .local_addr()
                .context("Failed to read listener address")?
        );
        axum::serve(self.listener, self.router)
            .await
            .context("Received error from running server")?;
        Ok(())
    }
}

/// Builds the application router with request tracing.
pub fn router<AR: AuthorRepository>(state: AppState<AR>) -> Router {
    Router::new()
        .merge(author_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn author_routes<AR: AuthorRepository>() -> Router<AppState<AR>> {
    Router::new()
        .route(
            AUTHORS_PATH,
            post(handler::create_author::<AR>).get(handler::search_authors::<AR>),
        )
        .route(
            AUTHOR_PATH,
            get(handler::find_author::<AR>)
                .put(handler::update_author::<AR>)
                .delete(handler::delete_author::<AR>),
        )
}
