use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::ConnectError;
use crate::protocol::{CONTENT_TYPE_JSON, CONTENT_TYPE_PROTO};

/// Messages that can travel through any of the supported codecs.
pub trait RpcMessage:
    prost::Message
    + Default
    + Serialize
    + DeserializeOwned
    + Send
    + Sync
    + 'static
{
}

impl<T> RpcMessage for T where
    T: prost::Message
        + Default
        + Serialize
        + DeserializeOwned
        + Send
        + Sync
        + 'static
{
}

/// Message serialisation formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Codec {
    /// Binary protobuf, `application/proto`.
    #[default]
    Proto,
    /// Protobuf JSON mapping, `application/json`.
    Json,
}

impl Codec {
    pub fn name(&self) -> &'static str {
        match self {
            | Codec::Proto => "proto",
            | Codec::Json => "json",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            | Codec::Proto => CONTENT_TYPE_PROTO,
            | Codec::Json => CONTENT_TYPE_JSON,
        }
    }

    /// Resolves the codec of a unary `content-type` header. Parameters are
    /// only accepted when they are `charset=utf-8` on the JSON codec.
    pub fn from_content_type(content_type: &str) -> Option<Codec> {
        let mut parts = content_type.split(';').map(str::trim);
        let media_type = parts.next()?.to_ascii_lowercase();
        let params: Vec<&str> = parts.filter(|p| !p.is_empty()).collect();
        match media_type.as_str() {
            | CONTENT_TYPE_PROTO if params.is_empty() => Some(Codec::Proto),
            | CONTENT_TYPE_JSON
                if params.is_empty()
                    || params
                        .iter()
                        .all(|p| p.eq_ignore_ascii_case("charset=utf-8")) =>
            {
                Some(Codec::Json)
            }
            | _ => None,
        }
    }

    pub fn encode<M: RpcMessage>(
        &self,
        message: &M,
    ) -> Result<Bytes, ConnectError> {
        match self {
            | Codec::Proto => Ok(Bytes::from(message.encode_to_vec())),
            | Codec::Json => {
                serde_json::to_vec(message).map(Bytes::from).map_err(|e| {
                    ConnectError::internal(format!(
                        "marshal message to json: {e}"
                    ))
                })
            }
        }
    }

    /// Decoding failures surface as `invalid_argument`; clients remap them
    /// since a bad reply is not the caller's fault.
    pub fn decode<M: RpcMessage>(
        &self,
        data: &[u8],
    ) -> Result<M, ConnectError> {
        match self {
            | Codec::Proto => {
                M::decode(data).map_err(|e| {
                    ConnectError::invalid_argument(format!(
                        "unmarshal into {}: {e}",
                        std::any::type_name::<M>()
                    ))
                })
            }
            | Codec::Json => {
                // An empty body is the JSON mapping of an empty message.
                if data.is_empty() {
                    return Ok(M::default());
                }
                serde_json::from_slice(data).map_err(|e| {
                    ConnectError::invalid_argument(format!(
                        "unmarshal into {}: {e}",
                        std::any::type_name::<M>()
                    ))
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    use super::*;
    use crate::Code;

    #[derive(Clone, PartialEq, prost::Message, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase", default)]
    struct Ping {
        #[prost(string, tag = "1")]
        pub user_id: String,
        #[prost(int32, tag = "2")]
        pub count: i32,
    }

    #[test]
    fn content_type_negotiation() {
        assert_eq!(
            Codec::from_content_type("application/proto"),
            Some(Codec::Proto)
        );
        assert_eq!(
            Codec::from_content_type("application/json"),
            Some(Codec::Json)
        );
        assert_eq!(
            Codec::from_content_type("Application/JSON; charset=utf-8"),
            Some(Codec::Json)
        );
        assert_eq!(
            Codec::from_content_type("application/json; charset=latin1"),
            None
        );
        assert_eq!(Codec::from_content_type("application/grpc"), None);
        assert_eq!(Codec::from_content_type("text/plain"), None);
    }

    #[test]
    fn json_uses_camel_case_and_defaults() {
        let ping = Ping {
            user_id: "u1".to_owned(),
            count: 3,
        };
        let encoded = Codec::Json.encode(&ping).unwrap();
        assert_eq!(&encoded[..], br#"{"userId":"u1","count":3}"#);

        let decoded: Ping = Codec::Json.decode(br#"{"userId":"u2"}"#).unwrap();
        assert_eq!(decoded.user_id, "u2");
        assert_eq!(decoded.count, 0);

        let empty: Ping = Codec::Json.decode(b"").unwrap();
        assert_eq!(empty, Ping::default());
    }

    #[test]
    fn malformed_payloads_are_invalid_arguments() {
        let err = Codec::Json.decode::<Ping>(b"{not json").unwrap_err();
        assert_eq!(err.code(), Code::InvalidArgument);

        // Field 1 declared as a length-delimited string with a length longer
        // than the remaining buffer.
        let err = Codec::Proto.decode::<Ping>(&[0x0a, 0x10, b'a']).unwrap_err();
        assert_eq!(err.code(), Code::InvalidArgument);
    }
}
