//! The client side of the chat: holds the transcript for one
//! session, sends it to the gateway and renders the exchange.
mod client;
mod conversation;
mod render;

pub use client::{HttpTransport, RawResponse, Transport};
pub use conversation::{
    CONNECTION_ERROR, Conversation, NOT_JSON_ERROR, UNEXPECTED_RESPONSE_ERROR,
};
pub use render::{Entry, Names, Viewport, entries, render_lines};
