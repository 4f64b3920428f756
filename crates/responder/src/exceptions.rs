//! Common API failures and the error responses they render to

use crate::errors::ResponderResult;
use crate::http::{ApiResponse, ErrorResponseBuilder};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use thiserror::Error;

/// An API failure with a fixed status and error code
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiException {
    #[error("The requested resource does not exist")]
    ResourceNotFound,

    #[error("Not authenticated for this request")]
    Unauthenticated,

    #[error("Not authorized for this request")]
    Unauthorized,

    #[error("The requested relation does not exist")]
    RelationNotFound,

    #[error("The given data failed to pass validation")]
    ValidationFailed {
        messages: BTreeMap<String, Vec<String>>,
    },

    #[error("{code}")]
    Custom {
        status: u16,
        code: String,
        message: Option<String>,
    },
}

impl ApiException {
    pub fn status_code(&self) -> u16 {
        match self {
            ApiException::ResourceNotFound => 404,
            ApiException::Unauthenticated => 401,
            ApiException::Unauthorized => 403,
            ApiException::RelationNotFound => 422,
            ApiException::ValidationFailed { .. } => 422,
            ApiException::Custom { status, .. } => *status,
        }
    }

    pub fn error_code(&self) -> &str {
        match self {
            ApiException::ResourceNotFound => "resource_not_found",
            ApiException::Unauthenticated => "unauthenticated",
            ApiException::Unauthorized => "unauthorized",
            ApiException::RelationNotFound => "relation_not_found",
            ApiException::ValidationFailed { .. } => "validation_failed",
            ApiException::Custom { code, .. } => code,
        }
    }

    /// Message overriding the translated one, if any
    pub fn message(&self) -> Option<String> {
        match self {
            ApiException::Custom { message, .. } => message.clone(),
            _ => None,
        }
    }

    /// Extra fields for the `error` object
    pub fn data(&self) -> Map<String, Value> {
        let mut data = Map::new();
        if let ApiException::ValidationFailed { messages } = self {
            data.insert(
                "messages".to_string(),
                serde_json::to_value(messages).unwrap_or(Value::Null),
            );
        }
        data
    }

    /// Render through a configured error builder
    pub fn render(&self, builder: &ErrorResponseBuilder) -> ResponderResult<ApiResponse> {
        builder
            .clone()
            .set_error(self.error_code(), self.message())
            .add_data(self.data())
            .respond(self.status_code())
    }
}
