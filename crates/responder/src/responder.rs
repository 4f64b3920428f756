use crate::errors::ResponderResult;
use crate::exceptions::ApiException;
use crate::http::{ApiResponse, ErrorResponseBuilder, SuccessResponseBuilder};
use crate::transformer::Transformer;
use serde::Serialize;
use std::sync::Arc;

/// Entry point for building responses inside a handler.
///
/// Holds the configured builders of the current request scope; every call
/// starts from a copy, so one responder can build several responses.
#[derive(Debug, Clone)]
pub struct Responder {
    success: Arc<SuccessResponseBuilder>,
    error: Arc<ErrorResponseBuilder>,
}

impl Responder {
    pub fn new(success: Arc<SuccessResponseBuilder>, error: Arc<ErrorResponseBuilder>) -> Self {
        Self { success, error }
    }

    /// `200 OK` with `data` as-is
    pub fn success<T>(&self, data: &T) -> ResponderResult<ApiResponse>
    where
        T: Serialize + ?Sized,
    {
        self.success_status(data, 200)
    }

    pub fn success_status<T>(&self, data: &T, status: u16) -> ResponderResult<ApiResponse>
    where
        T: Serialize + ?Sized,
    {
        self.success_builder().transform_data(data)?.respond(status)
    }

    /// `200 OK` with `data` shaped by `transformer`
    pub fn success_with<T, X>(&self, data: &T, transformer: X) -> ResponderResult<ApiResponse>
    where
        T: Serialize + ?Sized,
        X: Transformer + 'static,
    {
        self.success_builder()
            .transform_with(data, transformer)?
            .respond(200)
    }

    /// Error response with the translated message for `code`
    pub fn error(&self, code: &str, status: u16) -> ResponderResult<ApiResponse> {
        self.error_builder().set_error(code, None).respond(status)
    }

    pub fn error_message(
        &self,
        code: &str,
        status: u16,
        message: impl Into<String>,
    ) -> ResponderResult<ApiResponse> {
        self.error_builder()
            .set_error(code, Some(message.into()))
            .respond(status)
    }

    /// Error response for an API exception
    pub fn exception(&self, exception: &ApiException) -> ResponderResult<ApiResponse> {
        exception.render(&self.error)
    }

    /// A copy of the configured success builder
    pub fn success_builder(&self) -> SuccessResponseBuilder {
        self.success.as_ref().clone()
    }

    /// A copy of the configured error builder
    pub fn error_builder(&self) -> ErrorResponseBuilder {
        self.error.as_ref().clone()
    }

    #[cfg(test)]
    pub(crate) fn shared_success_builder(&self) -> &Arc<SuccessResponseBuilder> {
        &self.success
    }

    #[cfg(test)]
    pub(crate) fn shared_error_builder(&self) -> &Arc<ErrorResponseBuilder> {
        &self.error
    }
}
