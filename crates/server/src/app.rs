//! Routing and request handlers.

use crate::page::{self, ContactForm, Notice, Page, Panel, PREVIEW_ROWS};
use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
    Form, Json, Router,
};
use registro_core::{Record, StorageError};
use registro_storage::RecordStore;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub const SAVED_MESSAGE: &str = "¡Registro guardado correctamente!";
pub const NO_RECORDS_MESSAGE: &str = "Aún no hay registros guardados.";

/// What the handlers talk to.
///
/// Built once at startup. When configuration failed the server still runs,
/// but every page shows only the configuration error.
#[derive(Clone)]
pub enum Backend {
    Ready(Arc<dyn RecordStore>),
    Unavailable(Arc<str>),
}

/// Health check response.
#[derive(Serialize, Deserialize)]
pub struct Health {
    /// Server status ("ok" when storage is configured, "degraded" otherwise).
    pub status: String,
    /// Server version from Cargo.toml.
    pub version: String,
}

/// Health check endpoint handler.
pub async fn health(State(backend): State<Backend>) -> Json<Health> {
    let status = match backend {
        Backend::Ready(_) => "ok",
        Backend::Unavailable(_) => "degraded",
    };
    Json(Health {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Status for a failed storage call: 503 when the server itself is
/// misconfigured, 502 when the remote file could not be read or written.
fn storage_status(err: &StorageError) -> StatusCode {
    if err.is_configuration() {
        StatusCode::SERVICE_UNAVAILABLE
    } else {
        StatusCode::BAD_GATEWAY
    }
}

fn unavailable(message: &str) -> Response {
    (
        StatusCode::SERVICE_UNAVAILABLE,
        Html(page::render_unavailable(message)),
    )
        .into_response()
}

/// `GET /`: the empty form.
async fn index(State(backend): State<Backend>) -> Response {
    match backend {
        Backend::Ready(_) => Html(Page::default().render()).into_response(),
        Backend::Unavailable(message) => unavailable(&message),
    }
}

/// `POST /`: validate and store one submission.
async fn submit(State(backend): State<Backend>, Form(form): Form<ContactForm>) -> Response {
    let store = match backend {
        Backend::Ready(store) => store,
        Backend::Unavailable(message) => return unavailable(&message),
    };

    let record = Record::new(
        form.nombre.as_str(),
        form.correo.as_str(),
        form.telefono.as_str(),
        form.comentarios.as_str(),
    )
    .normalized();

    if let Err(e) = record.validate() {
        tracing::debug!(reason = %e, "submission rejected");
        let page = Page {
            form,
            notices: vec![Notice::Warning(e.to_string())],
            ..Page::default()
        };
        return (StatusCode::UNPROCESSABLE_ENTITY, Html(page.render())).into_response();
    }

    match store.append_record(&record).await {
        Ok(table) => {
            let page = Page {
                notices: vec![Notice::Success(SAVED_MESSAGE.to_string())],
                preview: Some(table.tail(PREVIEW_ROWS)),
                ..Page::default()
            };
            Html(page.render()).into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "failed to store record");
            let page = Page {
                form,
                notices: vec![Notice::Error(format!(
                    "Ocurrió un error al guardar la información: {e}"
                ))],
                ..Page::default()
            };
            (storage_status(&e), Html(page.render())).into_response()
        }
    }
}

/// `GET /registros`: re-fetch and show every stored record.
async fn records(State(backend): State<Backend>) -> Response {
    let store = match backend {
        Backend::Ready(store) => store,
        Backend::Unavailable(message) => return unavailable(&message),
    };

    let (status, panel) = match store.get_records().await {
        Ok(table) if table.record_count() == 0 => (
            StatusCode::OK,
            Panel::Open {
                notice: Some(Notice::Info(NO_RECORDS_MESSAGE.to_string())),
                table: None,
            },
        ),
        Ok(table) => (
            StatusCode::OK,
            Panel::Open {
                notice: None,
                table: Some(table),
            },
        ),
        Err(e) => {
            tracing::error!(error = %e, "failed to fetch records");
            (
                storage_status(&e),
                Panel::Open {
                    notice: Some(Notice::Error(format!(
                        "No se pudieron recuperar los registros: {e}"
                    ))),
                    table: None,
                },
            )
        }
    };

    let page = Page {
        panel,
        ..Page::default()
    };
    (status, Html(page.render())).into_response()
}

/// Create the application router.
///
/// This is separated from `main()` to allow testing.
pub fn create_router(backend: Backend) -> Router {
    Router::new()
        .route("/", get(index).post(submit))
        .route("/registros", get(records))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(backend)
}
