use http::StatusCode;

/// Trait for domain errors that can be converted to HTTP responses
///
/// Each API surface renders these fields into its own JSON shape, so the
/// domain error stays independent of how a particular caller expects it.
pub trait HttpError: std::error::Error {
    /// HTTP status code for this error
    fn status_code(&self) -> StatusCode;

    /// Machine-readable error type (e.g. `invalid_request_error`)
    fn error_type(&self) -> &'static str;

    /// Message safe to expose to API consumers
    fn client_message(&self) -> String;

    /// Name of the offending request parameter, if one is to blame
    fn param(&self) -> Option<&'static str> {
        None
    }

    /// Machine-readable error code (e.g. `parameter_missing`)
    fn code(&self) -> Option<&'static str> {
        None
    }
}
