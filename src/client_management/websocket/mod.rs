mod server;
pub mod stream_handler;

pub use server::{ErrorKind, WebSocketServer};
pub use stream_handler::{IncommingMessage, OutgoingMessage, StreamHandler};
