//! Inbound body buffering.
//!
//! The body is read into memory exactly once. The request is then given a
//! fresh body over the same bytes, so the forwarded copy and any later reader
//! of the original request each see an unconsumed stream.

use axum::body::{Body, Bytes};
use axum::http::Request;

use crate::forward::error::ForwardError;

/// Read the whole body of `req` and put an identical, unread body back.
///
/// `limit` caps the number of bytes accepted; exceeding it is a read failure.
pub async fn buffer_body(req: &mut Request<Body>, limit: usize) -> Result<Bytes, ForwardError> {
    let body = std::mem::take(req.body_mut());
    let bytes = axum::body::to_bytes(body, limit)
        .await
        .map_err(ForwardError::BodyRead)?;

    *req.body_mut() = Body::from(bytes.clone());
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::stream;

    #[tokio::test]
    async fn test_body_is_readable_again() {
        let mut req = Request::builder()
            .method("POST")
            .body(Body::from("payload bytes"))
            .unwrap();

        let buffered = buffer_body(&mut req, usize::MAX).await.unwrap();
        assert_eq!(&buffered[..], b"payload bytes");

        let again = axum::body::to_bytes(req.into_body(), usize::MAX).await.unwrap();
        assert_eq!(again, buffered);
    }

    #[tokio::test]
    async fn test_empty_body() {
        let mut req = Request::builder().body(Body::empty()).unwrap();

        let buffered = buffer_body(&mut req, usize::MAX).await.unwrap();
        assert!(buffered.is_empty());
    }

    #[tokio::test]
    async fn test_read_failure() {
        let chunks: Vec<Result<Bytes, std::io::Error>> = vec![
            Ok(Bytes::from_static(b"partial")),
            Err(std::io::Error::other("connection reset")),
        ];
        let mut req = Request::builder()
            .body(Body::from_stream(stream::iter(chunks)))
            .unwrap();

        let err = buffer_body(&mut req, usize::MAX).await.unwrap_err();
        assert!(matches!(err, ForwardError::BodyRead(_)));
    }

    #[tokio::test]
    async fn test_limit_exceeded() {
        let mut req = Request::builder().body(Body::from("0123456789")).unwrap();

        let err = buffer_body(&mut req, 4).await.unwrap_err();
        assert!(matches!(err, ForwardError::BodyRead(_)));
    }
}
