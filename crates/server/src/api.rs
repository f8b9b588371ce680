//! Customer JSON API.
//!
//! - `POST /customers`            register a customer
//! - `GET  /customers`            list every customer
//! - `GET  /customers/{taxId}`    look up by tax id
//! - `GET  /customers/id/{id}`    look up by surrogate id
//! - `PUT  /customers/{id}`       update name, birth date and address

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{error, info};
use uuid::Uuid;

use registry_core::domain::customer::{CustomerId, TaxId};
use registry_core::errors::{ApplicationError, InterfaceError};
use registry_core::registry::CustomerRegistry;
use registry_core::store::CustomerStore;

use crate::dto::{CustomerRequest, CustomerResponse};

pub type SharedRegistry = Arc<CustomerRegistry<dyn CustomerStore>>;

#[derive(Clone)]
pub struct ApiState {
    registry: SharedRegistry,
}

/// Error payload returned for every rejected request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub status: u16,
    pub error: String,
    pub message: String,
    pub timestamp: String,
    pub correlation_id: String,
}

#[derive(Debug)]
pub struct ApiError(InterfaceError);

impl ApiError {
    fn from_application(error: ApplicationError, correlation_id: &str) -> Self {
        Self(error.into_interface(correlation_id))
    }

    fn bad_request(message: impl Into<String>, correlation_id: &str) -> Self {
        Self(InterfaceError::BadRequest {
            message: message.into(),
            correlation_id: correlation_id.to_string(),
        })
    }

    fn not_found(message: impl Into<String>, correlation_id: &str) -> Self {
        Self(InterfaceError::NotFound {
            message: message.into(),
            correlation_id: correlation_id.to_string(),
        })
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            InterfaceError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            InterfaceError::NotFound { .. } => StatusCode::NOT_FOUND,
            InterfaceError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let message = match &self.0 {
            InterfaceError::Internal { message, correlation_id } => {
                error!(
                    event_name = "api.request.failed",
                    correlation_id = %correlation_id,
                    error = %message,
                    "request failed with an internal error"
                );
                self.0.user_message().to_string()
            }
            other => other.message().to_string(),
        };

        let body = ErrorBody {
            status: status.as_u16(),
            error: status.canonical_reason().unwrap_or("Error").to_string(),
            message,
            timestamp: Utc::now().to_rfc3339(),
            correlation_id: self.0.correlation_id().to_string(),
        };
        (status, Json(body)).into_response()
    }
}

pub fn router(registry: SharedRegistry) -> Router {
    Router::new()
        .route("/customers", post(register_customer).get(list_customers))
        .route("/customers/{key}", get(find_by_tax_id).put(update_customer))
        .route("/customers/id/{id}", get(find_by_id))
        .with_state(ApiState { registry })
}

fn correlation_id() -> String {
    Uuid::new_v4().to_string()
}

fn parse_customer_id(raw: &str, correlation_id: &str) -> Result<CustomerId, ApiError> {
    raw.trim()
        .parse::<i64>()
        .map(CustomerId)
        .map_err(|_| ApiError::bad_request(format!("`{raw}` is not a valid customer id"), correlation_id))
}

async fn register_customer(
    State(state): State<ApiState>,
    payload: Result<Json<CustomerRequest>, JsonRejection>,
) -> Result<Json<CustomerResponse>, ApiError> {
    let correlation_id = correlation_id();
    let Json(request) =
        payload.map_err(|rejection| ApiError::bad_request(rejection.body_text(), &correlation_id))?;

    let candidate = request
        .into_new_customer()
        .map_err(|error| ApiError::from_application(error.into(), &correlation_id))?;
    let saved = state
        .registry
        .registration
        .register(candidate)
        .await
        .map_err(|error| ApiError::from_application(error, &correlation_id))?;

    info!(
        event_name = "api.customer.registered",
        correlation_id = %correlation_id,
        customer_id = %saved.id,
        "customer created"
    );
    Ok(Json(saved.into()))
}

async fn list_customers(
    State(state): State<ApiState>,
) -> Result<Json<Vec<CustomerResponse>>, ApiError> {
    let correlation_id = correlation_id();
    let customers = state
        .registry
        .queries
        .list_all()
        .await
        .map_err(|error| ApiError::from_application(error, &correlation_id))?;

    Ok(Json(customers.into_iter().map(CustomerResponse::from).collect()))
}

async fn find_by_tax_id(
    Path(raw_tax_id): Path<String>,
    State(state): State<ApiState>,
) -> Result<Json<CustomerResponse>, ApiError> {
    let correlation_id = correlation_id();
    let tax_id = TaxId::new(raw_tax_id)
        .map_err(|error| ApiError::from_application(error.into(), &correlation_id))?;

    let found = state
        .registry
        .queries
        .find_by_tax_id(&tax_id)
        .await
        .map_err(|error| ApiError::from_application(error, &correlation_id))?;

    match found {
        Some(customer) => Ok(Json(customer.into())),
        None => Err(ApiError::not_found(
            format!("no customer with tax id `{tax_id}`"),
            &correlation_id,
        )),
    }
}

async fn find_by_id(
    Path(raw_id): Path<String>,
    State(state): State<ApiState>,
) -> Result<Json<CustomerResponse>, ApiError> {
    let correlation_id = correlation_id();
    let id = parse_customer_id(&raw_id, &correlation_id)?;

    let found = state
        .registry
        .queries
        .find_by_id(id)
        .await
        .map_err(|error| ApiError::from_application(error, &correlation_id))?;

    found
        .map(|customer| Json(customer.into()))
        .ok_or_else(|| ApiError::not_found(format!("no customer with id {id}"), &correlation_id))
}

async fn update_customer(
    Path(raw_id): Path<String>,
    State(state): State<ApiState>,
    payload: Result<Json<CustomerRequest>, JsonRejection>,
) -> Result<Json<CustomerResponse>, ApiError> {
    let correlation_id = correlation_id();
    let id = parse_customer_id(&raw_id, &correlation_id)?;
    let Json(request) =
        payload.map_err(|rejection| ApiError::bad_request(rejection.body_text(), &correlation_id))?;

    let updated = state
        .registry
        .updates
        .update(id, request.into_changes())
        .await
        .map_err(|error| ApiError::from_application(error, &correlation_id))?;

    info!(
        event_name = "api.customer.updated",
        correlation_id = %correlation_id,
        customer_id = %updated.id,
        "customer updated"
    );
    Ok(Json(updated.into()))
}
