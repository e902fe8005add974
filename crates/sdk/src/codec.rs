//! JSON and binary body codecs.

use crate::error::{ResultsError, ResultsResult};
use bytes::{Bytes, BytesMut};
use futures_util::stream::{self, BoxStream, Stream, StreamExt};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;
use std::pin::Pin;
use std::task::{Context, Poll};

/// Longest body excerpt carried by a decode error.
const SNIPPET_LIMIT: usize = 256;

/// Decode a JSON body. An empty body decodes to `None`.
///
/// Absent fields stay unset and unknown fields are ignored. On failure the
/// error carries the path to the offending value and a truncated excerpt of
/// the body.
pub fn decode_json<T: DeserializeOwned>(body: &[u8]) -> ResultsResult<Option<T>> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }

    let mut deserializer = serde_json::Deserializer::from_slice(body);
    let value = serde_path_to_error::deserialize(&mut deserializer).map_err(|err| {
        ResultsError::Decode {
            path: err.path().to_string(),
            message: err.into_inner().to_string(),
            snippet: snippet(body),
            response: None,
        }
    })?;
    deserializer.end().map_err(|err| ResultsError::Decode {
        path: ".".to_string(),
        message: err.to_string(),
        snippet: snippet(body),
        response: None,
    })?;

    Ok(Some(value))
}

/// Encode a request body as JSON. Unset optional fields are skipped by the
/// models' serde attributes.
pub fn encode_json<T: Serialize + ?Sized>(value: &T) -> ResultsResult<Bytes> {
    serde_json::to_vec(value)
        .map(Bytes::from)
        .map_err(|err| ResultsError::Decode {
            path: String::new(),
            message: format!("failed to encode request body: {err}"),
            snippet: String::new(),
            response: None,
        })
}

fn snippet(body: &[u8]) -> String {
    let end = body.len().min(SNIPPET_LIMIT);
    let mut text = String::from_utf8_lossy(&body[..end]).into_owned();
    if body.len() > SNIPPET_LIMIT {
        text.push_str("...");
    }
    text
}

/// Lazily read response body.
///
/// Finite and single pass. Dropping or calling [`ByteStream::close`] releases
/// the underlying connection.
pub struct ByteStream {
    inner: BoxStream<'static, ResultsResult<Bytes>>,
}

impl ByteStream {
    /// Wrap a stream of chunks.
    pub fn new<S>(stream: S) -> Self
    where
        S: Stream<Item = ResultsResult<Bytes>> + Send + 'static,
    {
        Self {
            inner: stream.boxed(),
        }
    }

    /// A stream yielding `bytes` as a single chunk.
    pub fn from_bytes(bytes: impl Into<Bytes>) -> Self {
        let bytes = bytes.into();
        if bytes.is_empty() {
            return Self::empty();
        }
        Self::new(stream::once(async move { Ok(bytes) }))
    }

    /// A stream with no chunks.
    pub fn empty() -> Self {
        Self::new(stream::empty())
    }

    /// Read the next chunk.
    pub async fn next_chunk(&mut self) -> Option<ResultsResult<Bytes>> {
        self.inner.next().await
    }

    /// Read the remaining chunks into one buffer.
    pub async fn collect(self) -> ResultsResult<Bytes> {
        self.collect_limited(usize::MAX).await
    }

    /// Read at most `limit` bytes, discarding the rest.
    pub async fn collect_limited(mut self, limit: usize) -> ResultsResult<Bytes> {
        let mut buffer = BytesMut::new();
        while let Some(chunk) = self.inner.next().await {
            let chunk = chunk?;
            let room = limit - buffer.len();
            if chunk.len() >= room {
                buffer.extend_from_slice(&chunk[..room]);
                break;
            }
            buffer.extend_from_slice(&chunk);
        }
        Ok(buffer.freeze())
    }

    /// Release the stream without reading the rest.
    pub fn close(self) {}
}

impl Stream for ByteStream {
    type Item = ResultsResult<Bytes>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.inner.as_mut().poll_next(cx)
    }
}

impl fmt::Debug for ByteStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ByteStream").finish_non_exhaustive()
    }
}
