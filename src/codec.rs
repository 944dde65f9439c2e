//! JSON encoding of request bodies and decoding of response bodies.

use crate::{Error, Result};
use serde::de::value::{Error as ValueError, UnitDeserializer};
use serde::de::{DeserializeOwned, IntoDeserializer};
use serde::{Deserialize, Serialize};
use std::any::Any;

/// Marker for endpoints that return no body, such as `DELETE`.
///
/// Decoding into `NoContent` never looks at the response body.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct NoContent;

/// Serializes a request payload to UTF-8 JSON.
pub fn encode_body<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>> {
    serde_json::to_vec(value).map_err(|e| Error::Encoding(e.to_string()))
}

/// Deserializes a 2xx response body into `T`.
///
/// `NoContent` is returned without inspecting `body`. An empty body is
/// accepted by any type that can be built from a unit value (`NoContent`,
/// `()`, `Option<_>`) without running the JSON parser; for every other type
/// it is a decoding error like any other malformed body. Unknown JSON keys
/// are ignored by the DTOs themselves.
///
/// # Examples
///
/// ```
/// use poste_client::codec::{decode_body, NoContent};
/// use poste_client::dto::HealthResponse;
///
/// assert_eq!(decode_body::<NoContent>(b"").unwrap(), NoContent);
///
/// let health: HealthResponse = decode_body(br#"{"status":"ok","uptime":3}"#).unwrap();
/// assert_eq!(health.status, "ok");
/// ```
pub fn decode_body<T: DeserializeOwned + 'static>(body: &[u8]) -> Result<T> {
    let marker: Box<dyn Any> = Box::new(NoContent);
    if let Ok(marker) = marker.downcast::<T>() {
        return Ok(*marker);
    }

    if body.iter().all(u8::is_ascii_whitespace) {
        let unit: UnitDeserializer<ValueError> = ().into_deserializer();
        if let Ok(value) = T::deserialize(unit) {
            return Ok(value);
        }
    }

    serde_json::from_slice(body).map_err(|e| Error::Decoding(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dto::{PostCreateDto, PostDto};

    #[test]
    fn no_content_ignores_the_body() {
        assert_eq!(decode_body::<NoContent>(b"").unwrap(), NoContent);
        assert_eq!(decode_body::<NoContent>(b"not json").unwrap(), NoContent);
    }

    #[test]
    fn empty_body_fits_unit_like_types() {
        decode_body::<()>(b"").unwrap();
        assert_eq!(decode_body::<Option<PostDto>>(b"  ").unwrap(), None);
    }

    #[test]
    fn empty_body_for_a_struct_is_a_decoding_error() {
        let err = decode_body::<PostDto>(b"").unwrap_err();
        assert!(matches!(err, Error::Decoding(_)));
    }

    #[test]
    fn missing_required_key_is_a_decoding_error() {
        match decode_body::<PostDto>(br#"{"title":"no id"}"#) {
            Err(Error::Decoding(message)) => assert!(message.contains("id")),
            other => panic!("expected decoding error, got {:?}", other),
        }
    }

    #[test]
    fn created_post_echo_preserves_fields() {
        let create = PostCreateDto::new("f1", "Rust", "https://rust-lang.org")
            .with_notes("book")
            .with_tags(["b", "a"]);
        let encoded = encode_body(&create).unwrap();

        let mut echoed: serde_json::Value = serde_json::from_slice(&encoded).unwrap();
        echoed["id"] = "p1".into();
        echoed["createdAt"] = "2025-01-15".into();
        let post: PostDto = decode_body(&serde_json::to_vec(&echoed).unwrap()).unwrap();

        assert_eq!(post.title, create.title);
        assert_eq!(post.url.as_deref(), Some(create.url.as_str()));
        assert_eq!(post.notes, create.notes);
        assert_eq!(post.tags, create.tags);
    }
}
