//! JSON wire envelopes for the duplex streaming service.
//!
//! One envelope per frame, discriminated by a `type` field. Binary payloads
//! (PCM and JPEG) travel base64-encoded in `data` fields.

use base64::{engine::general_purpose, Engine as _};
use serde::{Deserialize, Serialize};

use crate::models::config::SetupConfig;
use crate::models::error::ProtocolError;
use crate::models::media::{MediaMimeType, TranscriptOrigin};

/// Outbound envelopes: client → service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Sent immediately after the transport opens; the handshake completes
    /// when the service answers with `setup_complete`.
    Setup { config: SetupConfig },
    MediaChunk {
        #[serde(rename = "mimeType")]
        mime_type: MediaMimeType,
        data: String,
    },
    TextMessage { text: String },
}

impl ClientMessage {
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).expect("wire envelope serialization cannot fail")
    }
}

/// Inbound envelopes: service → client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    SetupComplete,
    Transcript {
        text: String,
        origin: TranscriptOrigin,
    },
    AudioChunk { data: String },
    OutputLevel { level: u8 },
}

/// Parse one inbound frame.
pub fn parse_server_message(raw: &str) -> Result<ServerMessage, ProtocolError> {
    serde_json::from_str(raw).map_err(|e| ProtocolError::MalformedFrame(e.to_string()))
}

/// Base64-encode a binary payload for a `data` field.
pub fn encode_payload(data: &[u8]) -> String {
    general_purpose::STANDARD.encode(data)
}

/// Decode a base64 `data` field.
pub fn decode_payload(data: &str) -> Result<Vec<u8>, ProtocolError> {
    general_purpose::STANDARD
        .decode(data)
        .map_err(|e| ProtocolError::MalformedFrame(format!("invalid base64 payload: {e}")))
}

/// Reinterpret little-endian PCM bytes as i16 samples. A trailing odd byte
/// is dropped.
pub fn decode_pcm16(bytes: &[u8]) -> Vec<i16> {
    bytes
        .chunks_exact(2)
        .map(|pair| i16::from_le_bytes([pair[0], pair[1]]))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn setup_envelope_json() {
        let msg = ClientMessage::Setup {
            config: SetupConfig::default(),
        };
        assert_eq!(
            msg.to_json(),
            r#"{"type":"setup","config":{"inputSampleRate":16000,"inputChannels":1}}"#
        );
    }

    #[test]
    fn media_chunk_envelope_json() {
        let msg = ClientMessage::MediaChunk {
            mime_type: MediaMimeType::AudioPcm,
            data: encode_payload(&[1, 2, 3]),
        };
        assert_eq!(
            msg.to_json(),
            r#"{"type":"media_chunk","mimeType":"audio/pcm","data":"AQID"}"#
        );

        let msg = ClientMessage::MediaChunk {
            mime_type: MediaMimeType::ImageJpeg,
            data: "Zm9v".into(),
        };
        assert!(msg.to_json().contains(r#""mimeType":"image/jpeg""#));
    }

    #[test]
    fn text_message_envelope_json() {
        let msg = ClientMessage::TextMessage {
            text: "hello".into(),
        };
        assert_eq!(msg.to_json(), r#"{"type":"text_message","text":"hello"}"#);
    }

    #[test]
    fn parses_setup_complete() {
        let msg = parse_server_message(r#"{"type":"setup_complete"}"#).unwrap();
        assert_eq!(msg, ServerMessage::SetupComplete);
    }

    #[test]
    fn parses_transcript_with_origin() {
        let msg =
            parse_server_message(r#"{"type":"transcript","text":"hi","origin":"model"}"#).unwrap();
        assert_eq!(
            msg,
            ServerMessage::Transcript {
                text: "hi".into(),
                origin: TranscriptOrigin::Model,
            }
        );

        let msg =
            parse_server_message(r#"{"type":"transcript","text":"yo","origin":"user"}"#).unwrap();
        assert!(matches!(
            msg,
            ServerMessage::Transcript {
                origin: TranscriptOrigin::User,
                ..
            }
        ));
    }

    #[test]
    fn parses_audio_chunk_and_level() {
        let msg = parse_server_message(r#"{"type":"audio_chunk","data":"AAD/fw=="}"#).unwrap();
        let ServerMessage::AudioChunk { data } = msg else {
            panic!("expected audio chunk");
        };
        let samples = decode_pcm16(&decode_payload(&data).unwrap());
        assert_eq!(samples, vec![0, i16::MAX]);

        let msg = parse_server_message(r#"{"type":"output_level","level":42}"#).unwrap();
        assert_eq!(msg, ServerMessage::OutputLevel { level: 42 });
    }

    #[test]
    fn malformed_frames_are_rejected() {
        assert!(parse_server_message("not json").is_err());
        assert!(parse_server_message(r#"{"type":"unknown_event"}"#).is_err());
        assert!(parse_server_message(r#"{"type":"transcript","text":"hi"}"#).is_err());
        assert!(decode_payload("!!not-base64!!").is_err());
    }

    #[test]
    fn pcm_decode_drops_trailing_odd_byte() {
        assert_eq!(decode_pcm16(&[0x34, 0x12, 0xFF]), vec![0x1234]);
    }
}
