use reqwest::StatusCode;
use serde::Deserialize;

use crate::domain::ResponderError;

/// Error envelope shared by the Gemini and Anthropic APIs:
/// `{"error": {"message": "...", ...}}`.
#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
}

/// Pull the provider's own error message out of a response body, falling back
/// to the raw body.
pub(crate) fn provider_message(body: &str) -> String {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) if !envelope.error.message.is_empty() => envelope.error.message,
        _ => body.trim().chars().take(200).collect(),
    }
}

/// Map a non-success HTTP status (plus body) to a [`ResponderError`].
pub(crate) fn classify_status(provider: &str, status: StatusCode, body: &str) -> ResponderError {
    let message = format!("{provider} returned {status}: {}", provider_message(body));

    match status.as_u16() {
        401 | 403 => ResponderError::unauthenticated(message),
        // Gemini reports a rejected key as 400 INVALID_ARGUMENT.
        400 if body.contains("API_KEY_INVALID") || body.contains("API key not valid") => {
            ResponderError::unauthenticated(message)
        }
        400 | 404 | 413 | 422 => ResponderError::invalid_request(message),
        408 | 429 => ResponderError::unavailable(message),
        s if (500..600).contains(&s) => ResponderError::unavailable(message),
        _ => ResponderError::unknown(message),
    }
}

/// Map a transport-level failure (no HTTP response) to a [`ResponderError`].
pub(crate) fn classify_transport(provider: &str, error: &reqwest::Error) -> ResponderError {
    if error.is_timeout() {
        ResponderError::unavailable(format!("{provider} request timed out: {error}"))
    } else if error.is_connect() || error.is_request() {
        ResponderError::unavailable(format!("{provider} not reachable: {error}"))
    } else {
        ResponderError::unknown(format!("{provider} request failed: {error}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ResponderErrorKind;

    fn kind(status: u16, body: &str) -> ResponderErrorKind {
        classify_status("test", StatusCode::from_u16(status).unwrap(), body).kind()
    }

    #[test]
    fn auth_statuses_are_unauthenticated() {
        assert_eq!(kind(401, ""), ResponderErrorKind::Unauthenticated);
        assert_eq!(kind(403, ""), ResponderErrorKind::Unauthenticated);
    }

    #[test]
    fn gemini_invalid_key_400_is_unauthenticated() {
        let body = r#"{"error":{"code":400,"message":"API key not valid. Please pass a valid API key.","status":"INVALID_ARGUMENT","details":[{"reason":"API_KEY_INVALID"}]}}"#;
        assert_eq!(kind(400, body), ResponderErrorKind::Unauthenticated);
    }

    #[test]
    fn plain_400_is_invalid_request() {
        let body = r#"{"error":{"code":400,"message":"model not found"}}"#;
        assert_eq!(kind(400, body), ResponderErrorKind::InvalidRequest);
        assert_eq!(kind(404, ""), ResponderErrorKind::InvalidRequest);
    }

    #[test]
    fn overload_and_server_errors_are_unavailable() {
        assert_eq!(kind(429, ""), ResponderErrorKind::Unavailable);
        assert_eq!(kind(500, ""), ResponderErrorKind::Unavailable);
        assert_eq!(kind(503, ""), ResponderErrorKind::Unavailable);
        assert_eq!(kind(529, ""), ResponderErrorKind::Unavailable);
    }

    #[test]
    fn unexpected_status_is_unknown() {
        assert_eq!(kind(418, ""), ResponderErrorKind::Unknown);
    }

    #[test]
    fn provider_message_prefers_error_message() {
        let body = r#"{"error":{"type":"authentication_error","message":"invalid x-api-key"}}"#;
        assert_eq!(provider_message(body), "invalid x-api-key");
        assert_eq!(provider_message("  Bad Gateway \n"), "Bad Gateway");
    }
}
