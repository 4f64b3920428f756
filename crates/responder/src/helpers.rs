//! Shorthands for handlers that hold a [`RequestScope`]

use crate::errors::ResponderResult;
use crate::http::ApiResponse;
use crate::provider::RequestScope;
use crate::responder::Responder;
use serde::Serialize;
use std::sync::Arc;

/// The scope's responder
pub fn responder(scope: &RequestScope) -> ResponderResult<Arc<Responder>> {
    scope.responder()
}

/// `200 OK` success response for `data`
pub fn success<T>(scope: &RequestScope, data: &T) -> ResponderResult<ApiResponse>
where
    T: Serialize + ?Sized,
{
    scope.responder()?.success(data)
}

/// Error response with the translated message for `code`
pub fn error(scope: &RequestScope, code: &str, status: u16) -> ResponderResult<ApiResponse> {
    scope.responder()?.error(code, status)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ResponderConfig;
    use crate::http::RequestParams;
    use crate::provider::{DeploymentMode, ResponderServiceProvider};
    use serde_json::json;

    #[test]
    fn test_helpers_use_scope_bindings() {
        let dir = tempfile::tempdir().unwrap();
        let booted = ResponderServiceProvider::new(dir.path())
            .with_config(ResponderConfig::default())
            .boot(DeploymentMode::Server)
            .unwrap();
        let scope = booted.scope(RequestParams::new());

        assert!(Arc::ptr_eq(&responder(&scope).unwrap(), &scope.responder().unwrap()));

        let response = success(&scope, &json!([1, 2])).unwrap();
        assert_eq!(
            response.body(),
            &json!({"status": 200, "success": true, "data": [1, 2]})
        );

        let response = error(&scope, "resource_not_found", 404).unwrap();
        assert_eq!(response.status().as_u16(), 404);
        assert_eq!(response.body()["error"]["code"], json!("resource_not_found"));
    }
}
