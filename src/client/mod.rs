mod channel;
mod input;
mod prompt;
mod render;
mod session;
mod terminal;
mod view;

pub use channel::{ChannelError, ClaimSink, ServerEvents, WebSocketChannel};
pub use input::{handle_click, ClickOutcome, CLAIM_TEAM};
pub use prompt::{PromptOutcome, Prompter, CELL_TAKEN_ALERT, CHALLENGE_PROMPT};
pub use render::{render_snapshot, RenderReport};
pub use session::{ClientSession, Frontend};
pub use terminal::TerminalFrontend;
pub use view::{CellClass, CellElement, CellKey, GridView, MemoryGrid};

use log::{debug, info, warn};
use uuid::Uuid;

use crate::websocket::OutgoingMessage;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientArgs {
    pub server_url: String,
}

impl ClientArgs {
    pub const DEFAULT_SERVER_URL: &'static str = "ws://127.0.0.1:3000";

    pub fn from_env() -> Self {
        Self {
            server_url: std::env::var("CODE_GRID_SERVER_URL")
                .unwrap_or_else(|_| Self::DEFAULT_SERVER_URL.to_string()),
        }
    }

    pub fn game_url(&self, game_id: Uuid) -> String {
        format!("{}/{}", self.server_url.trim_end_matches('/'), game_id)
    }
}

impl Default for ClientArgs {
    fn default() -> Self {
        Self {
            server_url: Self::DEFAULT_SERVER_URL.to_string(),
        }
    }
}

/// Reads messages until the server says hello, returns the grid size.
async fn wait_for_welcome<E: ServerEvents>(events: &mut E) -> Result<usize, ChannelError> {
    loop {
        match events.next_message().await {
            Some(Ok(OutgoingMessage::Welcome {
                game_uuid,
                grid_size,
            })) => {
                info!("joined game {} ({}x{})", game_uuid, grid_size, grid_size);
                return Ok(grid_size);
            }
            Some(Ok(OutgoingMessage::Error { error_message })) => {
                return Err(ChannelError::Rejected(format!("{:?}", error_message)))
            }
            Some(Ok(message)) => debug!("ignoring {:?} before welcome", message),
            Some(Err(e)) => return Err(e),
            None => return Err(ChannelError::Closed),
        }
    }
}

/// Joins a game and plays it from the terminal until the player leaves.
pub async fn play_in_terminal(args: &ClientArgs, game_id: Uuid) -> Result<(), ChannelError> {
    let mut channel = WebSocketChannel::connect(&args.game_url(game_id)).await?;
    let grid_size = wait_for_welcome(&mut channel).await?;

    let mut session = ClientSession::new(MemoryGrid::new(grid_size, grid_size));
    let mut frontend = TerminalFrontend::new();
    let result = session.run(&mut frontend, &mut channel).await;
    keep_session_result(result, channel.disconnect().await)
}

/// A failed disconnect is only logged, the session decides how playing ended.
fn keep_session_result(
    session: Result<(), ChannelError>,
    disconnect: Result<(), ChannelError>,
) -> Result<(), ChannelError> {
    if let Err(e) = disconnect {
        warn!("could not disconnect cleanly: {}", e);
    }
    session
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        websocket::stream_handler::Error, CacheProvider, DataProvider, GameMode, Server,
        WebSocketServer,
    };
    use std::time::Duration;
    use tokio::time::sleep;

    #[test]
    fn game_urls() {
        let id = Uuid::new_v4();
        assert_eq!(
            ClientArgs::default().game_url(id),
            format!("ws://127.0.0.1:3000/{}", id)
        );
        let args = ClientArgs {
            server_url: "ws://example.org:80/".to_string(),
        };
        assert_eq!(args.game_url(id), format!("ws://example.org:80/{}", id));
    }

    #[test]
    fn session_error_survives_a_failed_disconnect() {
        let lost = ChannelError::Receive("connection reset".to_string());
        let not_sent = ChannelError::Send("already closed".to_string());
        assert_eq!(
            keep_session_result(Err(lost.clone()), Err(not_sent.clone())),
            Err(lost)
        );
        assert_eq!(keep_session_result(Ok(()), Err(not_sent)), Ok(()));
        assert_eq!(keep_session_result(Ok(()), Ok(())), Ok(()));
    }

    async fn start_server(data_provider: CacheProvider) -> ClientArgs {
        let random_port = rand::random::<u16>().max(1024);
        let mut server = WebSocketServer::new("127.0.0.1".to_string(), random_port, data_provider);
        let address = server.get_address();
        tokio::spawn(async move { server.start().await.unwrap() });
        sleep(Duration::from_millis(100)).await;
        ClientArgs {
            server_url: format!("ws://{}", address),
        }
    }

    #[tokio::test]
    async fn welcome_carries_grid_size() {
        let mut data_provider = CacheProvider::default();
        let game_id = data_provider.create_game(GameMode::Teams, None).unwrap();
        let args = start_server(data_provider).await;

        let mut channel = WebSocketChannel::connect(&args.game_url(game_id))
            .await
            .unwrap();
        assert_eq!(wait_for_welcome(&mut channel).await, Ok(5));
        channel.disconnect().await.unwrap();
    }

    #[tokio::test]
    async fn unknown_game_is_rejected() {
        let args = start_server(CacheProvider::default()).await;

        let mut channel = WebSocketChannel::connect(&args.game_url(Uuid::new_v4()))
            .await
            .unwrap();
        assert_eq!(
            wait_for_welcome(&mut channel).await,
            Err(ChannelError::Rejected(format!("{:?}", Error::GameNotFound)))
        );
    }
}
