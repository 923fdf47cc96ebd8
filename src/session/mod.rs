//! The Bolt session: connect, handshake, hello, and a single autocommit RUN.
//!
//! A [`Session`] owns its transport exclusively and drives the state machine
//! in §4.5 of the design: `Disconnected -> Negotiating -> Authenticating ->
//! Ready -> RunSent -> Streaming -> Ready | Failed | Closed`. It is not safe
//! for concurrent use; run several sessions in parallel instead.

mod state;

pub use state::SessionState;

use bytes::BytesMut;
use tokio::io::{split, AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, ReadHalf, WriteHalf};
use tokio::net::TcpStream;
use tracing::{debug, instrument, warn};

use crate::chunk::reader::ChunkReader;
use crate::chunk::writer::ChunkWriter;
use crate::error::BoltLiteError;
use crate::message::decode::decode_server_message;
use crate::message::encode::encode_client_message;
use crate::message::request::ClientMessage;
use crate::message::response::ServerMessage;
use crate::types::{Dict, Value};
use crate::version::{encode_version, proposal_block, BOLT_MAGIC, PROPOSED_VERSION};

/// Default Bolt port, used when a `bolt://` URI carries none.
pub const DEFAULT_PORT: u16 = 7687;

/// The default pull size this core requests: enough to cover a single
/// autocommit query's result in one batch.
const DEFAULT_PULL_SIZE: i64 = 1000;

/// Default transaction timeout, in milliseconds, carried in RUN metadata.
const DEFAULT_TX_TIMEOUT_MS: i64 = 30_000;

/// Hint to the server about whether a query reads or writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessMode {
    Read,
    Write,
}

impl AccessMode {
    fn as_str(self) -> &'static str {
        match self {
            AccessMode::Read => "r",
            AccessMode::Write => "w",
        }
    }
}

/// Metadata returned by a successful HELLO.
#[derive(Debug, Clone, PartialEq)]
pub struct SuccessMeta {
    pub connection_id: String,
}

/// A single result row, one PULL's worth of data in this core's scope.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub fields: Vec<Value>,
}

enum Transport<S> {
    /// Connected, pre-handshake: no chunk framing has started yet.
    Raw(S),
    /// Post-handshake: split into independent chunked read/write halves.
    Framed {
        reader: ChunkReader<ReadHalf<S>>,
        writer: ChunkWriter<WriteHalf<S>>,
    },
    /// The session has been closed or has failed past recovery.
    Gone,
}

/// A Bolt session over a byte stream `S`.
///
/// `Session<TcpStream>` is the common case, constructed via [`Session::connect`].
/// The generic form exists so the state machine can be exercised in tests
/// against an in-memory duplex stream.
pub struct Session<S> {
    transport: Transport<S>,
    state: SessionState,
    version: (u8, u8),
}

impl Session<TcpStream> {
    /// Resolves `uri` (`bolt://host[:port]`), opens a TCP connection, and
    /// returns a session in the `Negotiating` state. Does not perform the
    /// handshake; call [`Session::handshake`] next.
    #[instrument(skip_all, fields(uri))]
    pub async fn connect(uri: &str) -> Result<Self, BoltLiteError> {
        let (host, port) = parse_bolt_uri(uri);
        debug!(host, port, "dialing Bolt server");
        let stream = TcpStream::connect((host.as_str(), port)).await?;
        Ok(Self {
            transport: Transport::Raw(stream),
            state: SessionState::Negotiating,
            version: (0, 0),
        })
    }
}

impl<S: AsyncRead + AsyncWrite + Unpin> Session<S> {
    /// Wraps an already-connected stream, for use with transports other
    /// than TCP (tests use an in-memory duplex).
    pub fn from_stream(stream: S) -> Self {
        Self {
            transport: Transport::Raw(stream),
            state: SessionState::Negotiating,
            version: (0, 0),
        }
    }

    /// Returns the session's current state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Returns the negotiated Bolt version, `(0, 0)` before a successful
    /// handshake.
    pub fn version(&self) -> (u8, u8) {
        self.version
    }

    /// Sends the magic preamble and this core's single version proposal,
    /// then reads back the server's choice. Transitions to `Authenticating`
    /// on an exact match, `Failed` otherwise.
    #[instrument(skip(self))]
    pub async fn handshake(&mut self) -> Result<(), BoltLiteError> {
        let mut stream = match std::mem::replace(&mut self.transport, Transport::Gone) {
            Transport::Raw(s) => s,
            other => {
                self.transport = other;
                return Err(self.unexpected("handshake", "session is not in Negotiating state"));
            }
        };

        let result = perform_handshake(&mut stream).await;
        match result {
            Ok(version) => {
                self.version = version;
                let (reader, writer) = split(stream);
                self.transport = Transport::Framed {
                    reader: ChunkReader::new(reader),
                    writer: ChunkWriter::new(writer),
                };
                self.state = SessionState::Authenticating;
                debug!(major = version.0, minor = version.1, "handshake complete");
                Ok(())
            }
            Err(e) => {
                self.state = SessionState::Failed;
                Err(e)
            }
        }
    }

    /// Sends HELLO with basic auth credentials and expects SUCCESS carrying
    /// a `connection_id`. Transitions to `Ready` on success, `Failed` otherwise.
    #[instrument(skip(self, password))]
    pub async fn hello(&mut self, user: &str, password: &str) -> Result<SuccessMeta, BoltLiteError> {
        if self.state != SessionState::Authenticating {
            return Err(self.unexpected("hello", "session is not in Authenticating state"));
        }

        let extra = Dict::from([
            ("user_agent".to_string(), Value::String("boltlite/0.1".to_string())),
            ("scheme".to_string(), Value::String("basic".to_string())),
            ("principal".to_string(), Value::String(user.to_string())),
            ("credentials".to_string(), Value::String(password.to_string())),
        ]);

        self.send(&ClientMessage::Hello { extra }).await?;
        match self.recv().await? {
            ServerMessage::Success { metadata } => {
                let connection_id = metadata
                    .get("connection_id")
                    .and_then(Value::as_str)
                    .ok_or_else(|| {
                        BoltLiteError::Authentication(
                            "SUCCESS after HELLO carried no connection_id".to_string(),
                        )
                    });
                match connection_id {
                    Ok(id) => {
                        self.state = SessionState::Ready;
                        Ok(SuccessMeta {
                            connection_id: id.to_string(),
                        })
                    }
                    Err(e) => {
                        self.state = SessionState::Failed;
                        Err(e)
                    }
                }
            }
            other => {
                self.state = SessionState::Failed;
                Err(failure_or_unexpected("hello", other))
            }
        }
    }

    /// Runs one autocommit query: writes RUN and PULL back-to-back in a
    /// single transport write, then consumes SUCCESS, one RECORD, and the
    /// closing SUCCESS.
    #[instrument(skip(self, query))]
    pub async fn run(&mut self, query: &str, mode: AccessMode) -> Result<Record, BoltLiteError> {
        if self.state != SessionState::Ready {
            return Err(self.unexpected("run", "session is not in Ready state"));
        }

        let run_extra = Dict::from([
            ("bookmarks".to_string(), Value::List(Vec::new())),
            ("tx_timeout".to_string(), Value::Integer(DEFAULT_TX_TIMEOUT_MS)),
            ("tx_metadata".to_string(), Value::Dict(Dict::new())),
            ("mode".to_string(), Value::String(mode.as_str().to_string())),
        ]);
        let run_msg = ClientMessage::Run {
            query: query.to_string(),
            parameters: Dict::new(),
            extra: run_extra,
        };
        let pull_msg = ClientMessage::Pull {
            extra: Dict::from([("n".to_string(), Value::Integer(DEFAULT_PULL_SIZE))]),
        };

        let mut run_buf = BytesMut::new();
        encode_client_message(&mut run_buf, &run_msg)?;
        let mut pull_buf = BytesMut::new();
        encode_client_message(&mut pull_buf, &pull_msg)?;

        self.state = SessionState::RunSent;
        self.writer()?
            .write_chunked(&[run_buf.to_vec(), pull_buf.to_vec()])
            .await?;

        match self.recv().await? {
            ServerMessage::Success { .. } => {}
            other => {
                self.state = SessionState::Failed;
                return Err(failure_or_unexpected("run", other));
            }
        }

        self.state = SessionState::Streaming;
        let record = match self.recv().await? {
            ServerMessage::Record { data } => Record { fields: data },
            other => {
                self.state = SessionState::Failed;
                return Err(failure_or_unexpected("run", other));
            }
        };

        match self.recv().await? {
            ServerMessage::Success { .. } => {
                self.state = SessionState::Ready;
                Ok(record)
            }
            other => {
                self.state = SessionState::Failed;
                Err(failure_or_unexpected("run", other))
            }
        }
    }

    /// Closes the session. If a prior error put the session in `Failed`,
    /// that error is returned even if the close itself also fails; a close
    /// failure on an otherwise-healthy session is returned as-is.
    #[instrument(skip(self))]
    pub async fn close(mut self) -> Result<(), BoltLiteError> {
        let prior_failure = (self.state == SessionState::Failed)
            .then(|| BoltLiteError::UnexpectedMessage {
                state: "Failed",
                detail: "session was already failed before close".to_string(),
            });

        let close_result = match std::mem::replace(&mut self.transport, Transport::Gone) {
            Transport::Framed { mut writer, .. } => writer.shutdown().await,
            Transport::Raw(mut stream) => {
                AsyncWriteExt::shutdown(&mut stream).await
            }
            Transport::Gone => Ok(()),
        };
        self.state = SessionState::Closed;

        match (prior_failure, close_result) {
            (Some(prior), Ok(())) => Err(prior),
            (Some(prior), Err(close_err)) => {
                warn!(%close_err, "close error shadowed by prior session failure");
                Err(prior)
            }
            (None, Ok(())) => Ok(()),
            (None, Err(close_err)) => Err(close_err.into()),
        }
    }

    async fn send(&mut self, msg: &ClientMessage) -> Result<(), BoltLiteError> {
        let mut buf = BytesMut::new();
        encode_client_message(&mut buf, msg)?;
        self.writer()?.write_chunked(&[buf.to_vec()]).await
    }

    async fn recv(&mut self) -> Result<ServerMessage, BoltLiteError> {
        let data = self.reader()?.read_unchunked().await?;
        let msg = decode_server_message(&data)?;
        if matches!(msg, ServerMessage::Failure { .. } | ServerMessage::Ignored) {
            self.state = SessionState::Failed;
        }
        Ok(msg)
    }

    fn reader(&mut self) -> Result<&mut ChunkReader<ReadHalf<S>>, BoltLiteError> {
        let state = self.state;
        match &mut self.transport {
            Transport::Framed { reader, .. } => Ok(reader),
            _ => Err(unexpected_for(state, "recv", "session transport is not framed yet")),
        }
    }

    fn writer(&mut self) -> Result<&mut ChunkWriter<WriteHalf<S>>, BoltLiteError> {
        let state = self.state;
        match &mut self.transport {
            Transport::Framed { writer, .. } => Ok(writer),
            _ => Err(unexpected_for(state, "send", "session transport is not framed yet")),
        }
    }

    fn unexpected(&self, op: &'static str, detail: &str) -> BoltLiteError {
        unexpected_for(self.state, op, detail)
    }
}

fn unexpected_for(state: SessionState, op: &'static str, detail: &str) -> BoltLiteError {
    BoltLiteError::UnexpectedMessage {
        state: state.name(),
        detail: format!("{op}: {detail}"),
    }
}

/// Maps a FAILURE/IGNORED response to its error, anything else to a
/// protocol-level unexpected-message error.
fn failure_or_unexpected(op: &'static str, msg: ServerMessage) -> BoltLiteError {
    match msg {
        ServerMessage::Failure { metadata } => BoltLiteError::Failure {
            code: metadata
                .get("code")
                .and_then(Value::as_str)
                .unwrap_or("unknown")
                .to_string(),
            message: metadata
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("no message")
                .to_string(),
        },
        ServerMessage::Ignored => BoltLiteError::Ignored,
        other => BoltLiteError::UnexpectedMessage {
            state: op,
            detail: format!("unexpected response: {other:?}"),
        },
    }
}

async fn perform_handshake<S>(stream: &mut S) -> Result<(u8, u8), BoltLiteError>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    stream.write_all(&BOLT_MAGIC).await?;
    let (major, minor) = PROPOSED_VERSION;
    stream.write_all(&proposal_block(major, minor)).await?;
    stream.flush().await?;

    let mut response = [0u8; 4];
    stream.read_exact(&mut response).await?;

    let expected = encode_version(major, minor);
    if response != expected {
        return Err(BoltLiteError::HandshakeMismatch {
            expected,
            got: response,
        });
    }
    // response is [0x00, 0x00, minor, major]
    Ok((response[3], response[2]))
}

/// Parses a `bolt://host[:port]` URI into `(host, port)`. The scheme is
/// recognized but otherwise ignored; an absent port defaults to [`DEFAULT_PORT`].
fn parse_bolt_uri(uri: &str) -> (String, u16) {
    let rest = uri.split_once("://").map(|(_, rest)| rest).unwrap_or(uri);
    match rest.split_once(':') {
        Some((host, port)) => {
            let port = port.parse().unwrap_or(DEFAULT_PORT);
            (host.to_string(), port)
        }
        None => (rest.to_string(), DEFAULT_PORT),
    }
}
