//! Encode Bolt messages to PackStream bytes.

use bytes::BytesMut;

use super::{sig, ClientMessage, ServerMessage};
use crate::error::BoltLiteError;
use crate::packstream::encode as ps;

/// Encodes a client message into PackStream bytes.
pub fn encode_client_message(buf: &mut BytesMut, msg: &ClientMessage) -> Result<(), BoltLiteError> {
    match msg {
        ClientMessage::Hello { extra } => {
            ps::encode_struct_header(buf, sig::HELLO, 1)?;
            ps::encode_dict(buf, extra)?;
        }
        ClientMessage::Run {
            query,
            parameters,
            extra,
        } => {
            ps::encode_struct_header(buf, sig::RUN, 3)?;
            ps::encode_string(buf, query);
            ps::encode_dict(buf, parameters)?;
            ps::encode_dict(buf, extra)?;
        }
        ClientMessage::Pull { extra } => {
            ps::encode_struct_header(buf, sig::PULL, 1)?;
            ps::encode_dict(buf, extra)?;
        }
    }
    Ok(())
}

/// Encodes a server message into PackStream bytes.
///
/// The client side of this core never needs to produce these; the function
/// exists so tests can round-trip server messages without a live server.
pub fn encode_server_message(buf: &mut BytesMut, msg: &ServerMessage) -> Result<(), BoltLiteError> {
    match msg {
        ServerMessage::Success { metadata } => {
            ps::encode_struct_header(buf, sig::SUCCESS, 1)?;
            ps::encode_dict(buf, metadata)?;
        }
        ServerMessage::Record { data } => {
            ps::encode_struct_header(buf, sig::RECORD, 1)?;
            ps::encode_list(buf, data)?;
        }
        ServerMessage::Failure { metadata } => {
            ps::encode_struct_header(buf, sig::FAILURE, 1)?;
            ps::encode_dict(buf, metadata)?;
        }
        ServerMessage::Ignored => {
            ps::encode_struct_header(buf, sig::IGNORED, 0)?;
        }
    }
    Ok(())
}
