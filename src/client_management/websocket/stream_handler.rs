use crate::{
    Claim, ClaimError, ClaimOutcome, ClaimRequest, DataProvider, GameState, GridSnapshot,
    InvalidClaim, Judge, SharedJudge,
};
use futures_util::{stream::SplitSink, SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpStream, sync::mpsc};
use tokio_stream::wrappers::WatchStream;
use tokio_tungstenite::{
    accept_hdr_async,
    tungstenite::{
        handshake::server::{Request, Response},
        Message,
    },
    WebSocketStream,
};
use uuid::Uuid;

use log::{debug, warn};
use std::sync::{Arc, Mutex};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OutgoingMessage {
    Error { error_message: Error },
    Welcome { game_uuid: Uuid, grid_size: usize },
    /// the full grid, sent after every change
    UpdateGrid(GridSnapshot),
    GameState { game_state: GameState, turn: u32 },
    ClaimResult { outcome: ClaimOutcome },
    Pong {},
}
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum IncommingMessage {
    MarkCase(ClaimRequest),
    Ping {},
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Error {
    InvalidUuid(String),
    GameNotFound,
    HandShake(String),
    InvalidMessage(String),
    InvalidClaim(InvalidClaim),
    Provider(String),
    CouldNotSerialize(String),
    Subscribing(String),
    CouldNotSend(String),
}

type WsSender = SplitSink<WebSocketStream<TcpStream>, Message>;

pub struct StreamHandler<T: DataProvider> {
    pub stream: WebSocketStream<TcpStream>,
    pub connected_game: Uuid,
    pub data_provider: T,
    pub judge: SharedJudge,
}

impl<T: DataProvider + 'static> StreamHandler<T> {
    pub async fn handle_stream(
        stream: TcpStream,
        data_provider: T,
        judge: SharedJudge,
    ) -> Result<(), Error> {
        let StreamHandler {
            stream,
            connected_game,
            mut data_provider,
            judge,
        } = Self::accept_connection(stream, data_provider, judge).await?;
        debug!("Client accepted");

        let view = data_provider
            .get_game_view(connected_game)
            .map_err(|e| Error::Subscribing(e.to_string()))?;
        let mut updates = WatchStream::new(
            data_provider
                .subscribe_to_game(connected_game)
                .map_err(|e| Error::Subscribing(e.to_string()))?,
        );
        debug!("sucessfully subscribed to game {}", connected_game);

        let (mut ws_sender, mut ws_receiver) = stream.split();
        let (reply_sender, mut replies) = mpsc::unbounded_channel::<OutgoingMessage>();

        let writer = tokio::spawn(async move {
            send(
                &mut ws_sender,
                &OutgoingMessage::Welcome {
                    game_uuid: connected_game,
                    grid_size: view.grid_size,
                },
            )
            .await?;
            loop {
                tokio::select! {
                    update = updates.next() => match update {
                        Some(view) => {
                            debug!("Received data from DataProvider: Sending game update to client");
                            send(&mut ws_sender, &OutgoingMessage::UpdateGrid(view.snapshot)).await?;
                            send(
                                &mut ws_sender,
                                &OutgoingMessage::GameState {
                                    game_state: view.state,
                                    turn: view.turn,
                                },
                            )
                            .await?;
                        }
                        None => {
                            debug!("Received None via rx. Exiting...");
                            break;
                        }
                    },
                    reply = replies.recv() => match reply {
                        Some(reply) => send(&mut ws_sender, &reply).await?,
                        None => break,
                    },
                }
            }
            let _ = ws_sender.close().await;
            Ok::<(), Error>(())
        });

        while let Some(message) = ws_receiver.next().await {
            let text = match message {
                Ok(Message::Text(text)) => text,
                Ok(Message::Close(_)) => break,
                Ok(_) => continue,
                Err(e) => {
                    debug!("error reading from client: {}", e);
                    break;
                }
            };
            let reply = Self::respond(&mut data_provider, judge.as_ref(), connected_game, &text);
            if reply_sender.send(reply).is_err() {
                break;
            }
        }
        drop(reply_sender);

        debug!("stream ended. Returning");
        match writer.await {
            Ok(result) => result,
            Err(e) => Err(Error::CouldNotSend(e.to_string())),
        }
    }

    /// Handles one text frame and returns the reply for this client only.
    /// Grid changes reach every client through the subscription.
    pub fn respond(
        data_provider: &mut T,
        judge: &dyn Judge,
        game_id: Uuid,
        text: &str,
    ) -> OutgoingMessage {
        let message = match serde_json::from_str::<IncommingMessage>(text) {
            Ok(message) => message,
            Err(e) => {
                warn!("could not parse message {:?}: {}", text, e);
                return OutgoingMessage::Error {
                    error_message: Error::InvalidMessage(e.to_string()),
                };
            }
        };

        match message {
            IncommingMessage::Ping {} => OutgoingMessage::Pong {},
            IncommingMessage::MarkCase(request) => {
                debug!("mark_case {:?} in game {}", request, game_id);
                let result = Claim::try_from(request)
                    .map_err(Error::InvalidClaim)
                    .and_then(|claim| {
                        data_provider
                            .submit_claim(game_id, claim, judge)
                            .map_err(|e| match e {
                                ClaimError::Invalid(invalid) => Error::InvalidClaim(invalid),
                                ClaimError::Provider(e) => Error::Provider(e.to_string()),
                            })
                    });
                match result {
                    Ok(outcome) => OutgoingMessage::ClaimResult { outcome },
                    Err(error_message) => OutgoingMessage::Error { error_message },
                }
            }
        }
    }

    async fn accept_connection(
        stream: TcpStream,
        data_provider: T,
        judge: SharedJudge,
    ) -> Result<Self, Error> {
        let request_path = Arc::new(Mutex::new(String::new()));

        let ws_stream = accept_hdr_async(stream, |req: &Request, response: Response| {
            if let Ok(mut path) = request_path.lock() {
                *path = req.uri().path().to_string();
            }
            Ok(response)
        })
        .await
        .map_err(|ws_err| Error::HandShake(ws_err.to_string()))?;

        let path = request_path
            .lock()
            .map(|path| path.clone())
            .unwrap_or_default();
        debug!("request path: {:?}", path);
        StreamHandler::from_path(path, ws_stream, data_provider, judge).await
    }

    async fn from_path(
        path: String,
        mut stream: WebSocketStream<TcpStream>,
        data_provider: T,
        judge: SharedJudge,
    ) -> Result<Self, Error> {
        // path is made of the game_uuid: /<game_uuid>
        let game_id = match parse_game_id(&path) {
            Ok(game_id) => game_id,
            Err(error_message) => return Err(reject(&mut stream, error_message).await),
        };

        // check if uuid exists
        if !data_provider.game_exists(game_id).unwrap_or(false) {
            return Err(reject(&mut stream, Error::GameNotFound).await);
        }

        Ok(Self {
            stream,
            connected_game: game_id,
            data_provider,
            judge,
        })
    }
}

fn parse_game_id(path: &str) -> Result<Uuid, Error> {
    let game_uuid = path
        .split('/')
        .nth(1)
        .filter(|segment| !segment.is_empty())
        .ok_or_else(|| Error::InvalidUuid("No game uuid provided".to_string()))?;

    Uuid::parse_str(game_uuid)
        .map_err(|_| Error::InvalidUuid(format!("Invalid game uuid: {}", game_uuid)))
}

/// Tells the client why it is being turned away and closes the connection.
async fn reject(stream: &mut WebSocketStream<TcpStream>, error_message: Error) -> Error {
    if let Ok(text) = serde_json::to_string(&OutgoingMessage::Error {
        error_message: error_message.clone(),
    }) {
        let _ = stream.send(Message::Text(text)).await;
    }
    let _ = stream.close(None).await;
    error_message
}

async fn send(ws_sender: &mut WsSender, message: &OutgoingMessage) -> Result<(), Error> {
    let text =
        serde_json::to_string(message).map_err(|e| Error::CouldNotSerialize(e.to_string()))?;
    ws_sender
        .send(Message::Text(text))
        .await
        .map_err(|e| Error::CouldNotSend(e.to_string()))
}
