// Error type shared by the transport layer and the action functions.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can stop an action before it reports success.
///
/// None of these are retried. `cli::report` prints the message once and
/// maps any variant to exit code 1.
#[derive(Error, Debug)]
pub enum Error {
    /// One or more of the four endpoint variables is absent or empty.
    #[error(
        "Missing required environment variables (EXO_AUTH_KEY, EXO_AUTH_TOKEN, EXO_SUBSCRIBIX_DOMAIN, EXO_ACCOUNT_SID)"
    )]
    MissingEndpointConfig,

    /// A variable the running action needs is absent or empty.
    #[error("{key} is required. {hint}")]
    MissingVar {
        key: &'static str,
        hint: &'static str,
    },

    /// A numeric variable could not be parsed.
    #[error("invalid integer in {key}: {value:?}")]
    InvalidNumber {
        key: &'static str,
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },

    /// The `.env` file exists but could not be read or parsed.
    #[error("failed to load .env file: {0}")]
    Dotenv(#[from] dotenvy::Error),

    /// The HTTP client itself could not be constructed.
    #[error("error creating HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// Base URL plus path did not form a valid URL.
    #[error("error creating request for {path}: {source}")]
    InvalidUrl {
        path: String,
        #[source]
        source: url::ParseError,
    },

    /// The request could not be sent or no response arrived.
    #[error("error making request: {0}")]
    Send(#[source] reqwest::Error),

    /// The response arrived but its body could not be read to the end.
    #[error("error reading response: {0}")]
    ReadBody(#[source] reqwest::Error),

    /// The API answered with a status code of 400 or above.
    #[error("HTTP Error {status}: {body}")]
    Http { status: u16, body: String },

    /// The payload could not be encoded as JSON.
    #[error("error marshaling JSON: {0}")]
    Serialize(#[source] serde_json::Error),

    /// A successful response body was not a JSON object.
    #[error("error parsing JSON response: {0}")]
    Deserialize(#[source] serde_json::Error),
}

impl Error {
    /// Stable label for log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::MissingEndpointConfig
            | Error::MissingVar { .. }
            | Error::InvalidNumber { .. }
            | Error::Dotenv(_) => "config",
            Error::Client(_) | Error::InvalidUrl { .. } => "request",
            Error::Send(_) | Error::ReadBody(_) => "transport",
            Error::Http { .. } => "http",
            Error::Serialize(_) => "serialize",
            Error::Deserialize(_) => "deserialize",
        }
    }

    /// HTTP status code, when the failure came from the remote API.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_error_message_carries_status_and_body() {
        let err = Error::Http {
            status: 404,
            body: r#"{"message":"trunk not found"}"#.into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("404"));
        assert!(msg.contains(r#"{"message":"trunk not found"}"#));
        assert_eq!(err.status(), Some(404));
        assert_eq!(err.kind(), "http");
    }

    #[test]
    fn missing_endpoint_config_names_every_key() {
        let msg = Error::MissingEndpointConfig.to_string();
        for key in [
            "EXO_AUTH_KEY",
            "EXO_AUTH_TOKEN",
            "EXO_SUBSCRIBIX_DOMAIN",
            "EXO_ACCOUNT_SID",
        ] {
            assert!(msg.contains(key), "{key} missing from {msg}");
        }
        assert_eq!(Error::MissingEndpointConfig.kind(), "config");
    }

    #[test]
    fn missing_var_includes_hint() {
        let err = Error::MissingVar {
            key: "TRUNK_SID",
            hint: "Set it in your .env file after creating a trunk.",
        };
        assert_eq!(
            err.to_string(),
            "TRUNK_SID is required. Set it in your .env file after creating a trunk."
        );
        assert_eq!(err.status(), None);
    }

    #[test]
    fn deserialize_is_its_own_kind() {
        let source = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        let err = Error::Deserialize(source);
        assert_eq!(err.kind(), "deserialize");
        assert!(err.to_string().starts_with("error parsing JSON response"));
    }
}
