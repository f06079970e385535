use std::fmt;
use std::str::FromStr;

use http::StatusCode;

/// The canonical error codes shared by the Connect and gRPC protocols.
///
/// The wire representation is the snake_case name returned by
/// [`Code::as_str`], e.g. `"unimplemented"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Code {
    Canceled,
    Unknown,
    InvalidArgument,
    DeadlineExceeded,
    NotFound,
    AlreadyExists,
    PermissionDenied,
    ResourceExhausted,
    FailedPrecondition,
    Aborted,
    OutOfRange,
    Unimplemented,
    Internal,
    Unavailable,
    DataLoss,
    Unauthenticated,
}

impl Code {
    pub fn as_str(&self) -> &'static str {
        match self {
            | Code::Canceled => "canceled",
            | Code::Unknown => "unknown",
            | Code::InvalidArgument => "invalid_argument",
            | Code::DeadlineExceeded => "deadline_exceeded",
            | Code::NotFound => "not_found",
            | Code::AlreadyExists => "already_exists",
            | Code::PermissionDenied => "permission_denied",
            | Code::ResourceExhausted => "resource_exhausted",
            | Code::FailedPrecondition => "failed_precondition",
            | Code::Aborted => "aborted",
            | Code::OutOfRange => "out_of_range",
            | Code::Unimplemented => "unimplemented",
            | Code::Internal => "internal",
            | Code::Unavailable => "unavailable",
            | Code::DataLoss => "data_loss",
            | Code::Unauthenticated => "unauthenticated",
        }
    }

    /// The HTTP status a server uses when replying with this code.
    pub fn http_status(&self) -> StatusCode {
        match self {
            // 499 Client Closed Request has no named constant.
            | Code::Canceled => {
                StatusCode::from_u16(499).unwrap_or(StatusCode::REQUEST_TIMEOUT)
            }
            | Code::Unknown => StatusCode::INTERNAL_SERVER_ERROR,
            | Code::InvalidArgument => StatusCode::BAD_REQUEST,
            | Code::DeadlineExceeded => StatusCode::GATEWAY_TIMEOUT,
            | Code::NotFound => StatusCode::NOT_FOUND,
            | Code::AlreadyExists => StatusCode::CONFLICT,
            | Code::PermissionDenied => StatusCode::FORBIDDEN,
            | Code::ResourceExhausted => StatusCode::TOO_MANY_REQUESTS,
            | Code::FailedPrecondition => StatusCode::BAD_REQUEST,
            | Code::Aborted => StatusCode::CONFLICT,
            | Code::OutOfRange => StatusCode::BAD_REQUEST,
            | Code::Unimplemented => StatusCode::NOT_IMPLEMENTED,
            | Code::Internal => StatusCode::INTERNAL_SERVER_ERROR,
            | Code::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
            | Code::DataLoss => StatusCode::INTERNAL_SERVER_ERROR,
            | Code::Unauthenticated => StatusCode::UNAUTHORIZED,
        }
    }

    /// Infers a code from the HTTP status of an error reply that didn't carry
    /// a Connect error body (e.g. it was produced by a proxy).
    pub fn from_http_status(status: StatusCode) -> Code {
        match status.as_u16() {
            | 400 => Code::Internal,
            | 401 => Code::Unauthenticated,
            | 403 => Code::PermissionDenied,
            | 404 => Code::Unimplemented,
            | 429 | 502 | 503 | 504 => Code::Unavailable,
            | _ => Code::Unknown,
        }
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown error code '{0}'")]
pub struct UnknownCode(pub String);

impl FromStr for Code {
    type Err = UnknownCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = match s {
            | "canceled" => Code::Canceled,
            | "unknown" => Code::Unknown,
            | "invalid_argument" => Code::InvalidArgument,
            | "deadline_exceeded" => Code::DeadlineExceeded,
            | "not_found" => Code::NotFound,
            | "already_exists" => Code::AlreadyExists,
            | "permission_denied" => Code::PermissionDenied,
            | "resource_exhausted" => Code::ResourceExhausted,
            | "failed_precondition" => Code::FailedPrecondition,
            | "aborted" => Code::Aborted,
            | "out_of_range" => Code::OutOfRange,
            | "unimplemented" => Code::Unimplemented,
            | "internal" => Code::Internal,
            | "unavailable" => Code::Unavailable,
            | "data_loss" => Code::DataLoss,
            | "unauthenticated" => Code::Unauthenticated,
            | other => return Err(UnknownCode(other.to_owned())),
        };
        Ok(code)
    }
}

impl From<Code> for tonic::Code {
    fn from(code: Code) -> Self {
        match code {
            | Code::Canceled => tonic::Code::Cancelled,
            | Code::Unknown => tonic::Code::Unknown,
            | Code::InvalidArgument => tonic::Code::InvalidArgument,
            | Code::DeadlineExceeded => tonic::Code::DeadlineExceeded,
            | Code::NotFound => tonic::Code::NotFound,
            | Code::AlreadyExists => tonic::Code::AlreadyExists,
            | Code::PermissionDenied => tonic::Code::PermissionDenied,
            | Code::ResourceExhausted => tonic::Code::ResourceExhausted,
            | Code::FailedPrecondition => tonic::Code::FailedPrecondition,
            | Code::Aborted => tonic::Code::Aborted,
            | Code::OutOfRange => tonic::Code::OutOfRange,
            | Code::Unimplemented => tonic::Code::Unimplemented,
            | Code::Internal => tonic::Code::Internal,
            | Code::Unavailable => tonic::Code::Unavailable,
            | Code::DataLoss => tonic::Code::DataLoss,
            | Code::Unauthenticated => tonic::Code::Unauthenticated,
        }
    }
}

impl From<tonic::Code> for Code {
    fn from(code: tonic::Code) -> Self {
        match code {
            | tonic::Code::Cancelled => Code::Canceled,
            | tonic::Code::InvalidArgument => Code::InvalidArgument,
            | tonic::Code::DeadlineExceeded => Code::DeadlineExceeded,
            | tonic::Code::NotFound => Code::NotFound,
            | tonic::Code::AlreadyExists => Code::AlreadyExists,
            | tonic::Code::PermissionDenied => Code::PermissionDenied,
            | tonic::Code::ResourceExhausted => Code::ResourceExhausted,
            | tonic::Code::FailedPrecondition => Code::FailedPrecondition,
            | tonic::Code::Aborted => Code::Aborted,
            | tonic::Code::OutOfRange => Code::OutOfRange,
            | tonic::Code::Unimplemented => Code::Unimplemented,
            | tonic::Code::Internal => Code::Internal,
            | tonic::Code::Unavailable => Code::Unavailable,
            | tonic::Code::DataLoss => Code::DataLoss,
            | tonic::Code::Unauthenticated => Code::Unauthenticated,
            // An `Ok` status is never an error, treat it as a protocol
            // violation by the peer.
            | tonic::Code::Ok | tonic::Code::Unknown => Code::Unknown,
        }
    }
}
