// File: ./src/client/mod.rs
pub mod core;
pub mod dispatch;
pub mod wire;

pub use crate::client::core::{ChatTransport, HttpsTransport, InboundResponse, OutboundRequest};
pub use crate::client::dispatch::{
    CallState, DispatchError, Dispatcher, MISSING_KEY_MESSAGE, key_for_model, unsupported_reply,
};
