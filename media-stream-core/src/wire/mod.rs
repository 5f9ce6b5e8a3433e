pub mod envelope;

pub use envelope::{
    decode_payload, decode_pcm16, encode_payload, parse_server_message, ClientMessage,
    ServerMessage,
};
