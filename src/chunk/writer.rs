//! Writes chunked messages to an async byte stream.

use bytes::{BufMut, BytesMut};
use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::error::BoltLiteError;

/// Maximum payload size a single chunk's 2-byte length prefix can carry.
const MAX_CHUNK_SIZE: usize = u16::MAX as usize;

/// Writes Bolt-chunked messages to an `AsyncWrite` stream.
///
/// Each message this core sends fits in a single chunk. `write_chunked`
/// accepts several payloads and frames all of them into one transport
/// write, so that a caller pipelining RUN and PULL (spec §4.4) gets them
/// on the wire back-to-back without an intervening flush.
pub struct ChunkWriter<W> {
    writer: W,
}

impl<W: AsyncWrite + Unpin> ChunkWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Frames each payload as `len_be_u16 ‖ payload ‖ 0x00 0x00` and writes
    /// them all in a single call to the underlying stream.
    pub async fn write_chunked(&mut self, payloads: &[Vec<u8>]) -> Result<(), BoltLiteError> {
        let mut buf = BytesMut::new();
        for payload in payloads {
            if payload.len() > MAX_CHUNK_SIZE {
                return Err(BoltLiteError::MessageTooLarge(payload.len()));
            }
            buf.put_u16(payload.len() as u16);
            buf.put_slice(payload);
            buf.put_u16(0);
        }
        self.writer.write_all(&buf).await?;
        self.writer.flush().await?;
        Ok(())
    }

    /// Shuts down the underlying stream's write half.
    pub async fn shutdown(&mut self) -> std::io::Result<()> {
        self.writer.shutdown().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn writes_a_single_message() {
        let mut output = Vec::new();
        let mut writer = ChunkWriter::new(&mut output);
        writer.write_chunked(&[vec![1, 2, 3, 4]]).await.unwrap();
        assert_eq!(output, vec![0x00, 0x04, 1, 2, 3, 4, 0x00, 0x00]);
    }

    #[tokio::test]
    async fn batches_multiple_messages_in_one_write() {
        let mut output = Vec::new();
        let mut writer = ChunkWriter::new(&mut output);
        writer
            .write_chunked(&[vec![0xAA], vec![0xBB, 0xCC]])
            .await
            .unwrap();
        assert_eq!(
            output,
            vec![0x00, 0x01, 0xAA, 0x00, 0x00, 0x00, 0x02, 0xBB, 0xCC, 0x00, 0x00]
        );
    }

    #[tokio::test]
    async fn oversized_payload_is_rejected() {
        let mut output = Vec::new();
        let mut writer = ChunkWriter::new(&mut output);
        let huge = vec![0u8; u16::MAX as usize + 1];
        assert!(matches!(
            writer.write_chunked(&[huge]).await,
            Err(BoltLiteError::MessageTooLarge(_))
        ));
    }
}
