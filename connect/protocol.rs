//! Wire-level constants and helpers of the unary Connect protocol.

use std::time::Duration;

use http::header::HeaderName;
use http::{HeaderMap, HeaderValue};

use crate::error::ConnectError;

pub const PROTOCOL_VERSION_HEADER: &str = "connect-protocol-version";
pub const PROTOCOL_VERSION: &str = "1";
pub const TIMEOUT_HEADER: &str = "connect-timeout-ms";
pub const TRAILER_PREFIX: &str = "trailer-";

pub const CONTENT_TYPE_PROTO: &str = "application/proto";
pub const CONTENT_TYPE_JSON: &str = "application/json";

// The protocol allows at most 10 digits in the timeout header.
const MAX_TIMEOUT_DIGITS: usize = 10;

/// Builds the URL of a procedure. Trailing slashes on `base_url` are ignored
/// so `http://x/` and `http://x` address the same procedure.
pub fn procedure_url(base_url: &str, procedure: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), procedure)
}

/// Encodes a timeout for the `connect-timeout-ms` header. Sub-millisecond
/// timeouts round up so they never encode as an already expired deadline.
pub fn encode_timeout(timeout: Duration) -> HeaderValue {
    let mut millis = timeout.as_millis();
    if timeout.subsec_nanos() % 1_000_000 != 0 {
        millis += 1;
    }
    let max = 10u128.pow(MAX_TIMEOUT_DIGITS as u32) - 1;
    HeaderValue::from(millis.min(max) as u64)
}

/// Parses the `connect-timeout-ms` header.
pub fn parse_timeout(value: &HeaderValue) -> Result<Duration, ConnectError> {
    let raw = value.to_str().map_err(|_| {
        ConnectError::invalid_argument(format!(
            "protocol error: invalid {TIMEOUT_HEADER} header"
        ))
    })?;
    if raw.is_empty()
        || raw.len() > MAX_TIMEOUT_DIGITS
        || !raw.bytes().all(|b| b.is_ascii_digit())
    {
        return Err(ConnectError::invalid_argument(format!(
            "protocol error: invalid {TIMEOUT_HEADER} header '{raw}'"
        )));
    }
    let millis: u64 = raw.parse().map_err(|_| {
        ConnectError::invalid_argument(format!(
            "protocol error: invalid {TIMEOUT_HEADER} header '{raw}'"
        ))
    })?;
    Ok(Duration::from_millis(millis))
}

/// Checks the optional `connect-protocol-version` header of a request.
pub fn validate_protocol_version(
    headers: &HeaderMap,
) -> Result<(), ConnectError> {
    match headers.get(PROTOCOL_VERSION_HEADER) {
        | None => Ok(()),
        | Some(v) if v == PROTOCOL_VERSION => Ok(()),
        | Some(v) => {
            Err(ConnectError::invalid_argument(format!(
                "{PROTOCOL_VERSION_HEADER} must be \"{PROTOCOL_VERSION}\": got \
                 {:?}",
                v
            )))
        }
    }
}

/// Unary Connect sends trailers as headers prefixed with `trailer-`.
pub fn trailers_to_headers(trailers: &HeaderMap, headers: &mut HeaderMap) {
    for (name, value) in trailers.iter() {
        let prefixed = format!("{TRAILER_PREFIX}{}", name.as_str());
        if let Ok(name) = HeaderName::from_bytes(prefixed.as_bytes()) {
            headers.append(name, value.clone());
        }
    }
}

/// Splits `trailer-` prefixed headers out of `headers`, returning them with
/// the prefix removed.
pub fn headers_to_trailers(headers: &mut HeaderMap) -> HeaderMap {
    let mut trailers = HeaderMap::new();
    let names: Vec<HeaderName> = headers
        .keys()
        .filter(|name| name.as_str().starts_with(TRAILER_PREFIX))
        .cloned()
        .collect();
    for name in names {
        let stripped = &name.as_str()[TRAILER_PREFIX.len()..];
        let Ok(stripped) = HeaderName::from_bytes(stripped.as_bytes()) else {
            continue;
        };
        for value in headers.get_all(&name) {
            trailers.append(stripped.clone(), value.clone());
        }
        headers.remove(&name);
    }
    trailers
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Code;

    #[test]
    fn procedure_url_ignores_trailing_slashes() {
        let procedure = "/gitpod.experimental.v1.StatsService/GetUserStats";
        assert_eq!(
            procedure_url("http://x/", procedure),
            procedure_url("http://x", procedure)
        );
        assert_eq!(
            procedure_url("https://api.gitpod.io/public//", procedure),
            "https://api.gitpod.io/public/gitpod.experimental.v1.StatsService/\
             GetUserStats"
        );
    }

    #[test]
    fn timeout_header_encoding() {
        assert_eq!(encode_timeout(Duration::from_secs(2)), "2000");
        assert_eq!(encode_timeout(Duration::from_micros(1500)), "2");
        assert_eq!(
            encode_timeout(Duration::from_secs(u32::MAX as u64 * 10)),
            "9999999999"
        );
    }

    #[test]
    fn timeout_header_parsing() {
        let ok = parse_timeout(&HeaderValue::from_static("250")).unwrap();
        assert_eq!(ok, Duration::from_millis(250));

        for bad in ["", "-1", "1.5", "12345678901", "10s"] {
            let err =
                parse_timeout(&HeaderValue::from_static(bad)).unwrap_err();
            assert_eq!(err.code(), Code::InvalidArgument, "{bad}");
        }
    }

    #[test]
    fn protocol_version_is_optional_but_checked() {
        let mut headers = HeaderMap::new();
        assert!(validate_protocol_version(&headers).is_ok());

        headers.insert(PROTOCOL_VERSION_HEADER, HeaderValue::from_static("1"));
        assert!(validate_protocol_version(&headers).is_ok());

        headers.insert(PROTOCOL_VERSION_HEADER, HeaderValue::from_static("2"));
        let err = validate_protocol_version(&headers).unwrap_err();
        assert_eq!(err.code(), Code::InvalidArgument);
    }

    #[test]
    fn trailers_travel_as_prefixed_headers() {
        let mut trailers = HeaderMap::new();
        trailers.insert("x-cost", HeaderValue::from_static("7"));

        let mut headers = HeaderMap::new();
        headers.insert("x-other", HeaderValue::from_static("a"));
        trailers_to_headers(&trailers, &mut headers);
        assert_eq!(headers.get("trailer-x-cost").unwrap(), "7");

        let split = headers_to_trailers(&mut headers);
        assert_eq!(split.get("x-cost").unwrap(), "7");
        assert!(headers.get("trailer-x-cost").is_none());
        assert_eq!(headers.get("x-other").unwrap(), "a");
    }
}
