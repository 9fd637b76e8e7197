//! Response body shared by every route
//!
//! Small responses are buffered; files are streamed from disk in chunks so a
//! download never holds the whole file in memory.

use futures_util::TryStreamExt;
use http_body_util::combinators::UnsyncBoxBody;
use http_body_util::{BodyExt, Full, StreamBody};
use hyper::body::{Bytes, Frame};
use tokio::fs::File;
use tokio::io::AsyncReadExt;
use tokio_util::io::ReaderStream;

/// Body type of every response
pub type ResponseBody = UnsyncBoxBody<Bytes, std::io::Error>;

const FILE_CHUNK_SIZE: usize = 64 * 1024;

/// Buffered body
pub fn full(chunk: impl Into<Bytes>) -> ResponseBody {
    Full::new(chunk.into())
        .map_err(|never| match never {})
        .boxed_unsync()
}

pub fn empty() -> ResponseBody {
    full(Bytes::new())
}

/// Stream at most `len` bytes of `file`
///
/// The limit keeps the body in line with the `Content-Length` taken from the
/// same metadata even if the file grows while it is sent.
pub fn file_stream(file: File, len: u64) -> ResponseBody {
    let reader = ReaderStream::with_capacity(file.take(len), FILE_CHUNK_SIZE);
    StreamBody::new(reader.map_ok(Frame::data)).boxed_unsync()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_file_stream_yields_whole_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("big.bin");
        let content: Vec<u8> = (0..=255u8).cycle().take(FILE_CHUNK_SIZE * 3 + 17).collect();
        std::fs::write(&path, &content).unwrap();

        let file = File::open(&path).await.unwrap();
        let body = file_stream(file, content.len() as u64);
        let bytes = body.collect().await.unwrap().to_bytes();
        assert_eq!(bytes.as_ref(), content.as_slice());
    }

    #[tokio::test]
    async fn test_file_stream_stops_at_len() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("grown.txt");
        std::fs::write(&path, b"hello, world").unwrap();

        let file = File::open(&path).await.unwrap();
        let bytes = file_stream(file, 5).collect().await.unwrap().to_bytes();
        assert_eq!(bytes.as_ref(), b"hello");
    }
}
