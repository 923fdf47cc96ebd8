//! Decode Bolt messages from PackStream bytes.

use super::{sig, ClientMessage, ServerMessage};
use crate::error::BoltLiteError;
use crate::packstream::decode::unpack_value;
use crate::types::{Dict, Structure, Value};

/// Decodes a client message from PackStream bytes.
pub fn decode_client_message(data: &[u8]) -> Result<ClientMessage, BoltLiteError> {
    let s = require_structure(data)?;
    match s.tag {
        sig::HELLO => {
            expect_fields("HELLO", &s, 1)?;
            let extra = require_dict(s.fields[0].clone())?;
            Ok(ClientMessage::Hello { extra })
        }
        sig::RUN => {
            expect_fields("RUN", &s, 3)?;
            let query = require_string(s.fields[0].clone())?;
            let parameters = require_dict(s.fields[1].clone())?;
            let extra = require_dict(s.fields[2].clone())?;
            Ok(ClientMessage::Run {
                query,
                parameters,
                extra,
            })
        }
        sig::PULL => {
            expect_fields("PULL", &s, 1)?;
            let extra = require_dict(s.fields[0].clone())?;
            Ok(ClientMessage::Pull { extra })
        }
        tag => Err(BoltLiteError::UnexpectedMessage {
            state: "decode",
            detail: format!("unrecognized client message tag 0x{tag:02X}"),
        }),
    }
}

/// Decodes a server message from PackStream bytes.
pub fn decode_server_message(data: &[u8]) -> Result<ServerMessage, BoltLiteError> {
    let s = require_structure(data)?;
    match s.tag {
        sig::SUCCESS => {
            expect_fields("SUCCESS", &s, 1)?;
            let metadata = require_dict(s.fields[0].clone())?;
            Ok(ServerMessage::Success { metadata })
        }
        sig::RECORD => {
            expect_fields("RECORD", &s, 1)?;
            let data = require_list(s.fields[0].clone())?;
            Ok(ServerMessage::Record { data })
        }
        sig::FAILURE => {
            expect_fields("FAILURE", &s, 1)?;
            let metadata = require_dict(s.fields[0].clone())?;
            Ok(ServerMessage::Failure { metadata })
        }
        sig::IGNORED => Ok(ServerMessage::Ignored),
        tag => Err(BoltLiteError::UnexpectedMessage {
            state: "decode",
            detail: format!("unrecognized server message tag 0x{tag:02X}"),
        }),
    }
}

fn require_structure(data: &[u8]) -> Result<Structure, BoltLiteError> {
    match unpack_value(data)?.0 {
        Value::Structure(s) => Ok(s),
        other => Err(BoltLiteError::UnexpectedType {
            expected: "structure",
            got: other.to_string(),
        }),
    }
}

fn expect_fields(msg_name: &'static str, s: &Structure, expected: usize) -> Result<(), BoltLiteError> {
    if s.fields.len() < expected {
        Err(BoltLiteError::UnexpectedMessage {
            state: "decode",
            detail: format!(
                "{msg_name} expects at least {expected} fields, got {}",
                s.fields.len()
            ),
        })
    } else {
        Ok(())
    }
}

fn require_string(v: Value) -> Result<String, BoltLiteError> {
    match v {
        Value::String(s) => Ok(s),
        other => Err(BoltLiteError::UnexpectedType {
            expected: "string",
            got: other.to_string(),
        }),
    }
}

fn require_dict(v: Value) -> Result<Dict, BoltLiteError> {
    match v {
        Value::Dict(d) => Ok(d),
        other => Err(BoltLiteError::UnexpectedType {
            expected: "dictionary",
            got: other.to_string(),
        }),
    }
}

fn require_list(v: Value) -> Result<Vec<Value>, BoltLiteError> {
    match v {
        Value::List(l) => Ok(l),
        other => Err(BoltLiteError::UnexpectedType {
            expected: "list",
            got: other.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::encode::{encode_client_message, encode_server_message};
    use bytes::BytesMut;

    fn round_trip_client(msg: &ClientMessage) -> ClientMessage {
        let mut buf = BytesMut::new();
        encode_client_message(&mut buf, msg).expect("encode failed");
        decode_client_message(&buf).expect("decode failed")
    }

    fn round_trip_server(msg: &ServerMessage) -> ServerMessage {
        let mut buf = BytesMut::new();
        encode_server_message(&mut buf, msg).expect("encode failed");
        decode_server_message(&buf).expect("decode failed")
    }

    #[test]
    fn round_trip_hello() {
        let msg = ClientMessage::Hello {
            extra: Dict::from([(
                "user_agent".to_string(),
                Value::String("boltlite/0.1".into()),
            )]),
        };
        assert_eq!(round_trip_client(&msg), msg);
    }

    #[test]
    fn round_trip_run() {
        let msg = ClientMessage::Run {
            query: "RETURN 1".into(),
            parameters: Dict::new(),
            extra: Dict::from([("db".to_string(), Value::String("neo4j".into()))]),
        };
        assert_eq!(round_trip_client(&msg), msg);
    }

    #[test]
    fn round_trip_pull() {
        let msg = ClientMessage::pull_all();
        assert_eq!(round_trip_client(&msg), msg);
    }

    #[test]
    fn round_trip_success() {
        let msg = ServerMessage::Success {
            metadata: Dict::from([(
                "connection_id".to_string(),
                Value::String("bolt-42".into()),
            )]),
        };
        assert_eq!(round_trip_server(&msg), msg);
    }

    #[test]
    fn round_trip_record() {
        let msg = ServerMessage::Record {
            data: vec![Value::Integer(1), Value::String("hello".into())],
        };
        assert_eq!(round_trip_server(&msg), msg);
    }

    #[test]
    fn round_trip_failure() {
        let msg = ServerMessage::Failure {
            metadata: Dict::from([
                (
                    "code".to_string(),
                    Value::String("Neo.ClientError.Statement.SyntaxError".into()),
                ),
                ("message".to_string(), Value::String("bad query".into())),
            ]),
        };
        assert_eq!(round_trip_server(&msg), msg);
    }

    #[test]
    fn round_trip_ignored() {
        assert_eq!(
            round_trip_server(&ServerMessage::Ignored),
            ServerMessage::Ignored
        );
    }

    #[test]
    fn decode_success_from_spec_example() {
        // B1 70 A1 81 4B 81 56 -> SUCCESS({"K": "V"})
        let data = [0xB1, 0x70, 0xA1, 0x81, 0x4B, 0x81, 0x56];
        let msg = decode_server_message(&data).unwrap();
        match msg {
            ServerMessage::Success { metadata } => {
                assert_eq!(metadata.get("K").unwrap().as_str(), Some("V"));
            }
            other => panic!("expected Success, got {other:?}"),
        }
    }
}
