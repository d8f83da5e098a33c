use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Structured error body returned by the API with status 400 or 403.
pub struct ApiError {
    pub code: String,
    pub text: String,
}

impl ApiError {
    /// The request body was not valid JSON.
    pub const SYNTAX_INVALID_JSON: &'static str = "syntax_invalid_json";
    /// A query or path parameter had an invalid format.
    pub const SYNTAX_INVALID_PARAMETER_FORMAT: &'static str = "syntax_invalid_parameter_format";
    /// A field value violated a constraint, e.g. an empty recipient list.
    pub const SYNTAX_CONSTRAINT_VIOLATION: &'static str = "syntax_constraint_violation";
    /// The request body contained a field the server does not accept.
    pub const SYNTAX_UNKNOWN_PROPERTY: &'static str = "syntax_unknown_property";
    pub const UNKNOWN_GROUP: &'static str = "unknown_group";
    pub const UNKNOWN_CAMPAIGN: &'static str = "unknown_campaign";
    pub const MISSING_SERVICE: &'static str = "missing_service";
    pub const MISSING_CALLBACK_URL: &'static str = "missing_callback_url";
    pub const CONFLICT_GROUP_NAME: &'static str = "conflict_group_name";
    pub const CONFLICT_SEND_AT: &'static str = "conflict_send_at";
    pub const UNSUPPORTED_DELIVERY_REPORT_TYPE: &'static str = "unsupported_delivery_report_type";
    pub const INSUFFICIENT_FUNDS: &'static str = "insufficient_funds";
    pub const EXCEEDED_MAX_PAGE_SIZE: &'static str = "exceeded_max_page_size";
    pub const CONCURRENT_MODIFICATION: &'static str = "concurrent_modification";

    pub fn new(code: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Alternative 400 body produced by the API gateway rather than the service.
pub struct BadRequestError {
    #[serde(default)]
    pub timestamp: Option<String>,
    pub status: u16,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub path: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_ignores_unknown_fields() {
        let err: ApiError = serde_json::from_str(
            r#"{"code":"conflict_group_name","text":"Name taken","extra":1}"#,
        )
        .unwrap();
        assert_eq!(
            err,
            ApiError::new(ApiError::CONFLICT_GROUP_NAME, "Name taken")
        );
    }

    #[test]
    fn bad_request_error_tolerates_missing_details() {
        let err: BadRequestError = serde_json::from_str(r#"{"status":400}"#).unwrap();
        assert_eq!(err.status, 400);
        assert_eq!(err.path, None);
    }
}
