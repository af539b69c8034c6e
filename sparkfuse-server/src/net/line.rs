use async_trait::async_trait;
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// Longest inbound frame accepted, newline excluded.
pub const MAX_FRAME_LEN: usize = 4096;

pub type ConnResult<T> = Result<T, ConnError>;

#[derive(Debug, Error)]
pub enum ConnError {
    #[error("connection closed")]
    Closed,

    #[error("frame exceeds {MAX_FRAME_LEN} bytes")]
    FrameTooLong,

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// A bidirectional text channel owned by exactly one session.
#[async_trait]
pub trait Connection: Send {
    async fn send(&mut self, text: &str) -> ConnResult<()>;
    async fn recv(&mut self) -> ConnResult<String>;
}

/// Newline-terminated UTF-8 frames over any async byte stream (plain TCP, TLS, in-memory duplex).
pub struct LineConnection<R, W> {
    reader: R,
    writer: W,
    buf: String,
}

impl<R, W> LineConnection<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer, buf: String::with_capacity(256) }
    }
}

#[async_trait]
impl<R, W> Connection for LineConnection<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    async fn send(&mut self, text: &str) -> ConnResult<()> {
        self.writer.write_all(text.as_bytes()).await?;
        self.writer.write_all(b"\n").await?;
        self.writer.flush().await?;
        Ok(())
    }

    async fn recv(&mut self) -> ConnResult<String> {
        self.buf.clear();

        // one extra byte for the newline
        let limit = (MAX_FRAME_LEN + 1) as u64;
        let n = (&mut self.reader).take(limit).read_line(&mut self.buf).await?;
        if n == 0 {
            return Err(ConnError::Closed);
        }
        if !self.buf.ends_with('\n') && n as u64 >= limit {
            return Err(ConnError::FrameTooLong);
        }

        Ok(self.buf.trim_end_matches(['\r', '\n']).to_string())
    }
}
