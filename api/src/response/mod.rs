use serde::Serialize;

/// Standardized wrapper for all outgoing JSON responses.
///
/// ```json
/// {
///   "success": false,
///   "data": null,
///   "message": "Cannot delete course BSCS: ...",
///   "code": "PREREQUISITE_FAILED"
/// }
/// ```
///
/// `code` is only present on error responses.
#[derive(Serialize)]
pub struct ApiResponse<T>
where
    T: Serialize,
{
    pub success: bool,
    pub data: T,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<&'static str>,
}

impl<T> ApiResponse<T>
where
    T: Serialize,
{
    pub fn success(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data,
            message: message.into(),
            code: None,
        }
    }

    /// Constructs an error response with a message and default `data`.
    pub fn error(message: impl Into<String>) -> Self
    where
        T: Default,
    {
        Self {
            success: false,
            data: T::default(),
            message: message.into(),
            code: None,
        }
    }

    /// Error response carrying a machine-readable error code.
    pub fn error_with_code(message: impl Into<String>, code: &'static str) -> Self
    where
        T: Default,
    {
        Self {
            code: Some(code),
            ..Self::error(message)
        }
    }
}
