//! HTTP status for each error code

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    pub fn http_status(&self) -> StatusCode {
        match self {
            Self::Success => StatusCode::OK,
            Self::NotFound | Self::OrderNotFound => StatusCode::NOT_FOUND,
            // Not payable means the order moved on, a retry will not help
            Self::OrderNotPayable => StatusCode::CONFLICT,
            Self::PaymentInitFailed => StatusCode::BAD_GATEWAY,
            // Transient, client may retry
            Self::NetworkError => StatusCode::SERVICE_UNAVAILABLE,
            Self::Unknown | Self::InternalError | Self::ConfigError => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            // Everything else is the caller's request being wrong
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping() {
        let expect = [
            (ErrorCode::Success, StatusCode::OK),
            (ErrorCode::NotFound, StatusCode::NOT_FOUND),
            (ErrorCode::OrderNotFound, StatusCode::NOT_FOUND),
            (ErrorCode::OrderNotPayable, StatusCode::CONFLICT),
            (ErrorCode::PaymentInitFailed, StatusCode::BAD_GATEWAY),
            (ErrorCode::NetworkError, StatusCode::SERVICE_UNAVAILABLE),
            (ErrorCode::Unknown, StatusCode::INTERNAL_SERVER_ERROR),
            (ErrorCode::InternalError, StatusCode::INTERNAL_SERVER_ERROR),
            (ErrorCode::ConfigError, StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (code, status) in expect {
            assert_eq!(code.http_status(), status, "{code:?}");
        }
    }

    #[test]
    fn client_mistakes_are_bad_requests() {
        for code in [
            ErrorCode::ValidationFailed,
            ErrorCode::InvalidRequest,
            ErrorCode::RequiredField,
            ErrorCode::ValueOutOfRange,
        ] {
            assert_eq!(code.http_status(), StatusCode::BAD_REQUEST, "{code:?}");
        }
    }
}
