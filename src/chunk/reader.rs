//! Reads a single chunked message from an async byte stream.

use bytes::BytesMut;
use tokio::io::{AsyncRead, AsyncReadExt};

use crate::error::BoltLiteError;

/// Reads Bolt-chunked messages from an `AsyncRead` stream.
///
/// This core restricts every logical message to a single chunk: one
/// `len_be_u16 ‖ payload[len] ‖ 0x00 0x00` frame per message. Multi-chunk
/// reassembly is a known limitation (see spec §4.3).
///
/// The reader owns no buffer beyond the transient message it is currently
/// reading; it carries no state between calls.
pub struct ChunkReader<R> {
    reader: R,
}

impl<R: AsyncRead + Unpin> ChunkReader<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }

    /// Reads the next chunk: a 2-byte length prefix, that many payload
    /// bytes, then the 2-byte terminator (read and discarded separately
    /// from the payload, per spec §9 design note #2).
    pub async fn read_unchunked(&mut self) -> Result<BytesMut, BoltLiteError> {
        let mut header = [0u8; 2];
        self.reader.read_exact(&mut header).await?;
        let length = u16::from_be_bytes(header) as usize;
        if length == 0 {
            return Err(BoltLiteError::EmptyChunk);
        }

        let mut payload = BytesMut::zeroed(length);
        self.reader.read_exact(&mut payload).await?;

        let mut terminator = [0u8; 2];
        self.reader.read_exact(&mut terminator).await?;

        Ok(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[tokio::test]
    async fn reads_a_single_chunk() {
        // 00 04 01 02 03 04 00 00
        let data: Vec<u8> = vec![0x00, 0x04, 0x01, 0x02, 0x03, 0x04, 0x00, 0x00];
        let mut reader = ChunkReader::new(Cursor::new(data));
        let msg = reader.read_unchunked().await.unwrap();
        assert_eq!(&msg[..], &[0x01, 0x02, 0x03, 0x04]);
    }

    #[tokio::test]
    async fn reads_a_nine_byte_chunk() {
        let data: Vec<u8> = vec![0x00, 0x09, 1, 2, 3, 4, 5, 6, 7, 8, 9, 0x00, 0x00];
        let mut reader = ChunkReader::new(Cursor::new(data));
        let msg = reader.read_unchunked().await.unwrap();
        assert_eq!(&msg[..], &[1, 2, 3, 4, 5, 6, 7, 8, 9]);
    }

    #[tokio::test]
    async fn empty_chunk_is_an_error() {
        let data: Vec<u8> = vec![0x00, 0x00];
        let mut reader = ChunkReader::new(Cursor::new(data));
        assert!(matches!(
            reader.read_unchunked().await,
            Err(BoltLiteError::EmptyChunk)
        ));
    }

    #[tokio::test]
    async fn truncated_payload_is_a_transport_error() {
        // Declares 4 bytes of payload but only supplies 2.
        let data: Vec<u8> = vec![0x00, 0x04, 0x01, 0x02];
        let mut reader = ChunkReader::new(Cursor::new(data));
        assert!(matches!(
            reader.read_unchunked().await,
            Err(BoltLiteError::Transport(_))
        ));
    }
}
