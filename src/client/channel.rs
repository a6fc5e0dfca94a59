use std::{fmt::Display, future::Future};

use futures_util::{
    stream::{SplitSink, SplitStream},
    SinkExt, StreamExt,
};
use log::debug;
use tokio::net::TcpStream;
use tokio_tungstenite::{connect_async, tungstenite::Message, MaybeTlsStream, WebSocketStream};

use crate::{
    websocket::{IncommingMessage, OutgoingMessage},
    ClaimRequest,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelError {
    Connect(String),
    Send(String),
    Receive(String),
    Serialize(String),
    /// the server refused the connection
    Rejected(String),
    Closed,
}

impl Display for ChannelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChannelError::Connect(e) => write!(f, "could not connect: {}", e),
            ChannelError::Send(e) => write!(f, "could not send: {}", e),
            ChannelError::Receive(e) => write!(f, "could not receive: {}", e),
            ChannelError::Serialize(e) => write!(f, "could not serialize: {}", e),
            ChannelError::Rejected(e) => write!(f, "rejected by the server: {}", e),
            ChannelError::Closed => write!(f, "the connection is closed"),
        }
    }
}

/// Where claims go.
pub trait ClaimSink {
    fn send_claim(
        &mut self,
        claim: ClaimRequest,
    ) -> impl Future<Output = Result<(), ChannelError>> + Send;
}

/// Where server pushed events come from. `None` once the server hung up.
pub trait ServerEvents {
    fn next_message(
        &mut self,
    ) -> impl Future<Output = Option<Result<OutgoingMessage, ChannelError>>> + Send;
}

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// A websocket connection to one game.
pub struct WebSocketChannel {
    sender: SplitSink<WsStream, Message>,
    receiver: SplitStream<WsStream>,
}

impl WebSocketChannel {
    /// Connects to `ws://host:port/<game_uuid>`.
    pub async fn connect(url: &str) -> Result<Self, ChannelError> {
        let (ws_stream, _) = connect_async(url)
            .await
            .map_err(|e| ChannelError::Connect(e.to_string()))?;
        debug!("connected to {}", url);
        let (sender, receiver) = ws_stream.split();
        Ok(Self { sender, receiver })
    }

    pub async fn disconnect(mut self) -> Result<(), ChannelError> {
        debug!("disconnecting");
        self.sender
            .close()
            .await
            .map_err(|e| ChannelError::Send(e.to_string()))
    }

    pub async fn send_message(&mut self, message: &IncommingMessage) -> Result<(), ChannelError> {
        let text =
            serde_json::to_string(message).map_err(|e| ChannelError::Serialize(e.to_string()))?;
        self.sender
            .send(Message::Text(text))
            .await
            .map_err(|e| ChannelError::Send(e.to_string()))
    }
}

impl ClaimSink for WebSocketChannel {
    async fn send_claim(&mut self, claim: ClaimRequest) -> Result<(), ChannelError> {
        self.send_message(&IncommingMessage::MarkCase(claim)).await
    }
}

impl ServerEvents for WebSocketChannel {
    async fn next_message(&mut self) -> Option<Result<OutgoingMessage, ChannelError>> {
        loop {
            let text = match self.receiver.next().await? {
                Ok(Message::Text(text)) => text,
                Ok(Message::Close(_)) => return None,
                Ok(_) => continue,
                Err(e) => return Some(Err(ChannelError::Receive(e.to_string()))),
            };
            match serde_json::from_str::<OutgoingMessage>(&text) {
                Ok(message) => return Some(Ok(message)),
                Err(e) => debug!("ignoring message {:?}: {}", text, e),
            }
        }
    }
}
