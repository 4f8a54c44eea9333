//! Structured delete outcome
//!
//! `DELETE /venues/:id` and `DELETE /artists/:id` answer with a status
//! body instead of an error envelope so clients can branch on it directly.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use gigdir_common::db::DeletedEntity;
use serde::Serialize;
use tracing::error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeleteStatus {
    Deleted,
    NotFound,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeleteOutcome {
    pub status: DeleteStatus,
    pub id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl DeleteOutcome {
    pub fn from_result(id: i64, result: gigdir_common::Result<DeletedEntity>) -> Self {
        match result {
            Ok(deleted) => Self {
                status: DeleteStatus::Deleted,
                id,
                name: Some(deleted.name),
            },
            Err(gigdir_common::Error::NotFound(_)) => Self {
                status: DeleteStatus::NotFound,
                id,
                name: None,
            },
            Err(e) => {
                error!("Delete of {} failed: {}", id, e);
                Self {
                    status: DeleteStatus::Failed,
                    id,
                    name: None,
                }
            }
        }
    }

    fn status_code(&self) -> StatusCode {
        match self.status {
            DeleteStatus::Deleted => StatusCode::OK,
            DeleteStatus::NotFound => StatusCode::NOT_FOUND,
            DeleteStatus::Failed => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for DeleteOutcome {
    fn into_response(self) -> Response {
        (self.status_code(), Json(self)).into_response()
    }
}
