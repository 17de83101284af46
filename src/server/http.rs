//! Handlers for the loan routes.
//!
//! Every operation is a plain GET with query parameters and performs a full
//! read-modify-write cycle against the store. Missing parameters arrive as
//! empty strings; neither names nor addresses are validated.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Local;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

use crate::dates;
use crate::server::ServerState;
use crate::store::LoanRecord;

/// Query parameters for add and edit.
#[derive(Debug, Deserialize)]
pub struct LoanParams {
    #[serde(default)]
    pub nombre: String,
    #[serde(default)]
    pub fecha: String,
    #[serde(default)]
    pub correo: String,
}

/// Query parameters for delete.
#[derive(Debug, Deserialize)]
pub struct DeleteParams {
    #[serde(default)]
    pub nombre: String,
}

/// Listing response.
#[derive(Debug, Serialize)]
pub struct ListResponse {
    pub libros: Vec<LoanRecord>,
    pub advertencias: Vec<String>,
}

/// `GET /agregar?nombre=&fecha=&correo=`
pub async fn add_handler(
    State(state): State<ServerState>,
    Query(params): Query<LoanParams>,
) -> Response {
    let loan_date = match dates::parse_input(&params.fecha) {
        Ok(date) => date,
        Err(e) => return e.into_response(),
    };
    let due_date = dates::add_days(loan_date, state.config.policy.loan_days);

    let record = LoanRecord {
        name: params.nombre,
        loan_date,
        due_date,
        email: params.correo,
    };

    info!("Adding loan for \"{}\", due {}", record.name, record.due_date);

    match state.store.update(|records| records.push(record)).await {
        Ok(()) => (StatusCode::OK, "Libro agregado correctamente. 👍").into_response(),
        Err(e) => e.into_response(),
    }
}

/// `GET /libros`
pub async fn list_handler(State(state): State<ServerState>) -> Response {
    match state.store.load().await {
        Ok(records) => {
            let today = Local::now().date_naive();
            let advertencias =
                dates::near_due_warnings(&records, today, state.config.policy.warning_days);
            Json(ListResponse {
                libros: records,
                advertencias,
            })
            .into_response()
        }
        Err(e) => {
            tracing::error!("Listing failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Error al leer el archivo" })),
            )
                .into_response()
        }
    }
}

/// `GET /editar?nombre=&fecha=&correo=`
///
/// Mutates the first record whose name matches. The stored due date is left
/// as it was computed at creation time.
pub async fn edit_handler(
    State(state): State<ServerState>,
    Query(params): Query<LoanParams>,
) -> Response {
    let loan_date = match dates::parse_input(&params.fecha) {
        Ok(date) => date,
        Err(e) => return e.into_response(),
    };

    let found = state
        .store
        .update(|records| match records.iter_mut().find(|r| r.name == params.nombre) {
            Some(record) => {
                record.loan_date = loan_date;
                record.email = params.correo;
                true
            }
            None => false,
        })
        .await;

    match found {
        Ok(true) => (StatusCode::OK, "Libro editado correctamente. 👍").into_response(),
        // 200 on purpose: existing clients read the body, not the status.
        Ok(false) => (StatusCode::OK, "Libro no encontrado").into_response(),
        Err(e) => e.into_response(),
    }
}

/// `GET /eliminar?nombre=`
///
/// Removes every matching record and succeeds even when nothing matched.
pub async fn delete_handler(
    State(state): State<ServerState>,
    Query(params): Query<DeleteParams>,
) -> Response {
    let result = state
        .store
        .update(|records| records.retain(|r| r.name != params.nombre))
        .await;

    match result {
        Ok(()) => (StatusCode::OK, "Libro eliminado correctamente. 👍").into_response(),
        Err(e) => e.into_response(),
    }
}
