//! Wire framing for client connections.
//!
//! A conforming client opens its connection with a fixed 4-byte signature,
//! then sends each request as a tagged, length-prefixed UTF-8 JSON document.
//! Replies carry the length prefix only.
//!
//! ```text
//! connection start:  AC ED 00 05
//!
//! request:   +------+-----------------+---------------------+
//!            | 0x74 | len (u16, BE)   | payload (len bytes) |
//!            +------+-----------------+---------------------+
//!
//! reply:     +-----------------+---------------------+
//!            | len (u16, BE)   | payload (len bytes) |
//!            +-----------------+---------------------+
//! ```
//!
//! A stream that ends exactly between frames is a clean disconnect; a stream
//! that ends inside a frame, opens with the wrong signature, or carries an
//! unknown tag byte is treated as corrupt and the connection is dropped.

use bytes::{BufMut, BytesMut};
use std::io::ErrorKind;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// Connection signature sent by the client before any request
pub const MAGIC: [u8; 4] = [0xAC, 0xED, 0x00, 0x05];

/// Tag byte opening every request frame
pub const STRING_TAG: u8 = 0x74;

/// Largest payload one frame can carry
pub const MAX_PAYLOAD: usize = u16::MAX as usize;

/// Framing errors
#[derive(Debug)]
pub enum FrameError {
    /// Connection signature mismatched or cut short; carries the bytes
    /// actually received
    BadMagic(Vec<u8>),
    /// Request frame opened with an unknown tag byte
    BadTag(u8),
    /// Payload was not valid UTF-8
    Utf8(std::string::FromUtf8Error),
    /// Stream ended in the middle of a frame
    UnexpectedEof,
    /// Payload too large for the length prefix
    Oversize(usize),
    /// Underlying I/O failure
    Io(std::io::Error),
}

impl std::fmt::Display for FrameError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FrameError::BadMagic(header) => {
                write!(f, "Invalid connection signature: {:02X?}", header)
            }
            FrameError::BadTag(tag) => write!(f, "Unknown frame tag: 0x{:02X}", tag),
            FrameError::Utf8(e) => write!(f, "Invalid UTF-8 in payload: {}", e),
            FrameError::UnexpectedEof => write!(f, "Stream ended mid-frame"),
            FrameError::Oversize(len) => {
                write!(f, "Payload of {} bytes exceeds frame limit", len)
            }
            FrameError::Io(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for FrameError {}

impl From<std::io::Error> for FrameError {
    fn from(e: std::io::Error) -> Self {
        FrameError::Io(e)
    }
}

/// Map read failures, folding early EOF into the mid-frame variant
fn read_err(e: std::io::Error) -> FrameError {
    if e.kind() == ErrorKind::UnexpectedEof {
        FrameError::UnexpectedEof
    } else {
        FrameError::Io(e)
    }
}

/// Read and verify the connection signature.
///
/// Every failure, including a stream that ends before all four bytes
/// arrive, returns [`FrameError::BadMagic`] carrying the bytes actually
/// received, so callers can log them.
pub async fn read_magic<R>(stream: &mut R) -> Result<(), FrameError>
where
    R: AsyncRead + Unpin,
{
    let mut header = [0u8; 4];
    let mut filled = 0;
    while filled < header.len() {
        let n = stream.read(&mut header[filled..]).await?;
        if n == 0 {
            return Err(FrameError::BadMagic(header[..filled].to_vec()));
        }
        filled += n;
    }

    if header != MAGIC {
        return Err(FrameError::BadMagic(header.to_vec()));
    }
    Ok(())
}

/// Write the connection signature. Client side of [`read_magic`].
pub async fn write_magic<W>(stream: &mut W) -> Result<(), FrameError>
where
    W: AsyncWrite + Unpin,
{
    stream.write_all(&MAGIC).await?;
    stream.flush().await?;
    Ok(())
}

/// Read one request frame.
///
/// Returns `Ok(None)` when the stream ends cleanly before a new frame
/// begins. EOF after the tag byte is a framing error.
pub async fn read_request<R>(stream: &mut R) -> Result<Option<String>, FrameError>
where
    R: AsyncRead + Unpin,
{
    let tag = match stream.read_u8().await {
        Ok(tag) => tag,
        Err(e) if e.kind() == ErrorKind::UnexpectedEof => return Ok(None),
        Err(e) => return Err(FrameError::Io(e)),
    };

    if tag != STRING_TAG {
        return Err(FrameError::BadTag(tag));
    }

    let len = stream.read_u16().await.map_err(read_err)? as usize;
    let mut payload = vec![0u8; len];
    stream.read_exact(&mut payload).await.map_err(read_err)?;

    let text = String::from_utf8(payload).map_err(FrameError::Utf8)?;
    Ok(Some(text))
}

/// Write one request frame. Client side of [`read_request`].
pub async fn write_request<W>(stream: &mut W, payload: &str) -> Result<(), FrameError>
where
    W: AsyncWrite + Unpin,
{
    let bytes = payload.as_bytes();
    if bytes.len() > MAX_PAYLOAD {
        return Err(FrameError::Oversize(bytes.len()));
    }

    let mut frame = BytesMut::with_capacity(3 + bytes.len());
    frame.put_u8(STRING_TAG);
    frame.put_u16(bytes.len() as u16);
    frame.put_slice(bytes);

    stream.write_all(&frame).await?;
    stream.flush().await?;
    Ok(())
}

/// Read one reply frame.
///
/// Returns `Ok(None)` when the stream ends cleanly before a new frame
/// begins.
pub async fn read_reply<R>(stream: &mut R) -> Result<Option<String>, FrameError>
where
    R: AsyncRead + Unpin,
{
    let len = match stream.read_u16().await {
        Ok(len) => len as usize,
        Err(e) if e.kind() == ErrorKind::UnexpectedEof => return Ok(None),
        Err(e) => return Err(FrameError::Io(e)),
    };

    let mut payload = vec![0u8; len];
    stream.read_exact(&mut payload).await.map_err(read_err)?;

    let text = String::from_utf8(payload).map_err(FrameError::Utf8)?;
    Ok(Some(text))
}

/// Write one reply frame. Server side of [`read_reply`].
pub async fn write_reply<W>(stream: &mut W, payload: &str) -> Result<(), FrameError>
where
    W: AsyncWrite + Unpin,
{
    let bytes = payload.as_bytes();
    if bytes.len() > MAX_PAYLOAD {
        return Err(FrameError::Oversize(bytes.len()));
    }

    let mut frame = BytesMut::with_capacity(2 + bytes.len());
    frame.put_u16(bytes.len() as u16);
    frame.put_slice(bytes);

    stream.write_all(&frame).await?;
    stream.flush().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[tokio::test]
    async fn test_request_round_trip() {
        let mut buf: Vec<u8> = Vec::new();
        write_request(&mut buf, r#"{"type":"echo","data":"hi"}"#)
            .await
            .unwrap();

        assert_eq!(buf[0], STRING_TAG);
        assert_eq!(u16::from_be_bytes([buf[1], buf[2]]) as usize, buf.len() - 3);

        let mut reader = Cursor::new(buf);
        let payload = read_request(&mut reader).await.unwrap().unwrap();
        assert_eq!(payload, r#"{"type":"echo","data":"hi"}"#);
    }

    #[tokio::test]
    async fn test_reply_round_trip() {
        let mut buf: Vec<u8> = Vec::new();
        write_reply(&mut buf, r#"{"ok":true}"#).await.unwrap();

        let mut reader = Cursor::new(buf);
        let payload = read_reply(&mut reader).await.unwrap().unwrap();
        assert_eq!(payload, r#"{"ok":true}"#);
    }

    #[tokio::test]
    async fn test_two_frames_back_to_back() {
        let mut buf: Vec<u8> = Vec::new();
        write_request(&mut buf, "first").await.unwrap();
        write_request(&mut buf, "second").await.unwrap();

        let mut reader = Cursor::new(buf);
        assert_eq!(read_request(&mut reader).await.unwrap().unwrap(), "first");
        assert_eq!(read_request(&mut reader).await.unwrap().unwrap(), "second");
        assert!(read_request(&mut reader).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_clean_eof_between_frames() {
        let mut reader = Cursor::new(Vec::new());
        assert!(read_request(&mut reader).await.unwrap().is_none());

        let mut reader = Cursor::new(Vec::new());
        assert!(read_reply(&mut reader).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_bad_tag_rejected() {
        let mut reader = Cursor::new(vec![0x00u8, 0x00, 0x02, b'h', b'i']);
        match read_request(&mut reader).await {
            Err(FrameError::BadTag(0x00)) => {}
            other => panic!("Expected BadTag, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_truncated_payload_is_mid_frame_eof() {
        // Length prefix promises 10 bytes; only 3 arrive
        let mut reader = Cursor::new(vec![STRING_TAG, 0x00, 0x0A, b'a', b'b', b'c']);
        match read_request(&mut reader).await {
            Err(FrameError::UnexpectedEof) => {}
            other => panic!("Expected UnexpectedEof, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_invalid_utf8_rejected() {
        let mut reader = Cursor::new(vec![STRING_TAG, 0x00, 0x02, 0xFF, 0xFE]);
        match read_request(&mut reader).await {
            Err(FrameError::Utf8(_)) => {}
            other => panic!("Expected Utf8 error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_frame_split_across_reads() {
        let mut buf: Vec<u8> = Vec::new();
        write_request(&mut buf, "split delivery").await.unwrap();

        let (head, tail) = buf.split_at(4);
        let mut mock = tokio_test::io::Builder::new().read(head).read(tail).build();

        let payload = read_request(&mut mock).await.unwrap().unwrap();
        assert_eq!(payload, "split delivery");
    }

    #[tokio::test]
    async fn test_oversize_payload_rejected() {
        let big = "x".repeat(MAX_PAYLOAD + 1);
        let mut buf: Vec<u8> = Vec::new();
        match write_reply(&mut buf, &big).await {
            Err(FrameError::Oversize(len)) => assert_eq!(len, MAX_PAYLOAD + 1),
            other => panic!("Expected Oversize, got {:?}", other),
        }
        assert!(buf.is_empty());
    }

    #[tokio::test]
    async fn test_magic_round_trip() {
        let mut buf: Vec<u8> = Vec::new();
        write_magic(&mut buf).await.unwrap();
        assert_eq!(buf, MAGIC);

        let mut reader = Cursor::new(buf);
        read_magic(&mut reader).await.unwrap();
    }

    #[tokio::test]
    async fn test_magic_mismatch_carries_received_bytes() {
        let mut reader = Cursor::new(vec![0xDEu8, 0xAD, 0xBE, 0xEF]);
        match read_magic(&mut reader).await {
            Err(FrameError::BadMagic(header)) => {
                assert_eq!(header, [0xDE, 0xAD, 0xBE, 0xEF]);
            }
            other => panic!("Expected BadMagic, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_magic_truncated_carries_partial_bytes() {
        let mut reader = Cursor::new(vec![0xACu8, 0xED]);
        match read_magic(&mut reader).await {
            Err(FrameError::BadMagic(header)) => assert_eq!(header, [0xAC, 0xED]),
            other => panic!("Expected BadMagic, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_magic_on_empty_stream() {
        let mut reader = Cursor::new(Vec::new());
        match read_magic(&mut reader).await {
            Err(FrameError::BadMagic(header)) => assert!(header.is_empty()),
            other => panic!("Expected BadMagic, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_magic_split_across_reads() {
        let mut mock = tokio_test::io::Builder::new()
            .read(&MAGIC[..2])
            .read(&MAGIC[2..])
            .build();
        read_magic(&mut mock).await.unwrap();
    }
}
