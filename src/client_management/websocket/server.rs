use crate::{
    client_management::address_from_env, websocket::StreamHandler, DataProvider, Server,
    SharedJudge, TrustingJudge,
};
use log::{debug, error};
use std::sync::Arc;
use tokio::{net::TcpListener, spawn};

#[derive(Debug)]
pub enum ErrorKind {
    InvalidAddress,
    ErrorListening(std::io::Error),
}

#[derive(Clone)]
pub struct WebSocketServer<T: DataProvider> {
    pub port: u16,
    pub host: String,
    pub data_provider: T,
    pub judge: SharedJudge,
}

impl<T: DataProvider + Default + 'static> Server<T> for WebSocketServer<T> {
    type ErrorKind = ErrorKind;
    fn from_env(data_provider: T) -> Self {
        let (host, port) = address_from_env(
            "WEBSOCKET_HOST",
            "WEBSOCKET_PORT",
            Self::DEFAULT_HOST,
            Self::DEFAULT_PORT,
        );
        Self::new(host, port, data_provider)
    }
    fn new(host: String, port: u16, data_provider: T) -> Self {
        Self {
            host,
            port,
            data_provider,
            judge: Arc::new(TrustingJudge),
        }
    }

    fn get_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    fn default() -> Self {
        Self::new(
            Self::DEFAULT_HOST.to_string(),
            Self::DEFAULT_PORT,
            T::default(),
        )
    }

    fn with_data_provider(data_provider: T) -> Self {
        Self::new(
            Self::DEFAULT_HOST.to_string(),
            Self::DEFAULT_PORT,
            data_provider,
        )
    }

    fn with_judge(self, judge: SharedJudge) -> Self {
        Self { judge, ..self }
    }

    async fn start(&mut self) -> Result<(), Self::ErrorKind> {
        if self.host.is_empty() {
            return Err(ErrorKind::InvalidAddress);
        }
        let addr = self.get_address();
        debug!("Listening on {}", addr);

        let server = TcpListener::bind(addr)
            .await
            .map_err(ErrorKind::ErrorListening)?;

        debug!("server started");

        loop {
            match server.accept().await {
                Err(e) => {
                    error!("Error accepting connection: {:?}", e);
                }
                Ok((stream, peer)) => {
                    debug!("new connection from {}", peer);
                    let data_provider = self.data_provider.clone();
                    let judge = self.judge.clone();
                    spawn(async move {
                        if let Err(e) =
                            StreamHandler::handle_stream(stream, data_provider, judge).await
                        {
                            error!("Error handling stream: {:?}", e)
                        }
                    });
                }
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        client::{ClaimSink, ServerEvents, WebSocketChannel},
        websocket::OutgoingMessage,
        CacheProvider, ClaimOutcome, ClaimRequest, GameMode, GameState, GridSnapshot, NextUp,
        Team, Verdict,
    };

    use std::time::Duration;
    use tokio::time::{sleep, timeout};
    use uuid::Uuid;

    #[tokio::test]
    #[ignore = "this is a manual test"]
    async fn test_server_manual() {
        std::env::set_var("RUST_LOG", "debug");
        env_logger::builder()
            .is_test(true)
            .try_init()
            .expect("Failed to init logger");

        let mut data_provider = CacheProvider::default();
        let game_id = data_provider.create_game(GameMode::Duel, None).unwrap();

        let mut server = WebSocketServer::with_data_provider(data_provider);
        debug!("connect to ws://{}/{}", server.get_address(), game_id);
        server.start().await.unwrap();
    }

    async fn start_server(data_provider: CacheProvider, judge: Option<SharedJudge>) -> String {
        let random_port = rand::random::<u16>().max(1024);
        let mut server = WebSocketServer::new(
            WebSocketServer::<CacheProvider>::DEFAULT_HOST.to_string(),
            random_port,
            data_provider,
        );
        if let Some(judge) = judge {
            server = server.with_judge(judge);
        }
        let server_address = server.get_address();
        tokio::spawn(async move {
            server.start().await.unwrap();
        });

        // wait for server to start
        sleep(Duration::from_millis(100)).await;
        format!("ws://{}", server_address)
    }

    async fn next_message(channel: &mut WebSocketChannel) -> OutgoingMessage {
        timeout(Duration::from_millis(1000), channel.next_message())
            .await
            .expect("timed out waiting for a message")
            .expect("connection closed")
            .expect("could not read message")
    }

    /// reads messages until one matches, skipping the others
    async fn wait_for<F>(channel: &mut WebSocketChannel, mut matches: F) -> OutgoingMessage
    where
        F: FnMut(&OutgoingMessage) -> bool,
    {
        loop {
            let message = next_message(channel).await;
            if matches(&message) {
                return message;
            }
        }
    }

    #[tokio::test]
    async fn test_server_with_cache() {
        let mut data_provider = CacheProvider::default();
        let game_id = data_provider.create_game(GameMode::Duel, None).unwrap();
        let url = start_server(data_provider, None).await;

        let mut channel = WebSocketChannel::connect(&format!("{}/{}", url, game_id))
            .await
            .expect("Error connecting to server");
        let mut observer = WebSocketChannel::connect(&format!("{}/{}", url, game_id))
            .await
            .expect("Error connecting to server");

        assert_eq!(
            next_message(&mut channel).await,
            OutgoingMessage::Welcome {
                game_uuid: game_id,
                grid_size: 3
            }
        );
        assert_eq!(
            next_message(&mut channel).await,
            OutgoingMessage::UpdateGrid(GridSnapshot::empty(3))
        );
        assert_eq!(
            next_message(&mut channel).await,
            OutgoingMessage::GameState {
                game_state: GameState::InProgress {
                    next: NextUp::Team { team: Team::Red }
                },
                turn: 0
            }
        );

        channel
            .send_claim(ClaimRequest::new("1", "1", "red", "addition(2,3)".to_string()))
            .await
            .unwrap();

        let result = wait_for(&mut channel, |m| {
            matches!(m, OutgoingMessage::ClaimResult { .. })
        })
        .await;
        assert_eq!(
            result,
            OutgoingMessage::ClaimResult {
                outcome: ClaimOutcome::Captured
            }
        );

        // every client connected to the game gets the new grid
        let update = wait_for(&mut observer, |m| match m {
            OutgoingMessage::UpdateGrid(snapshot) => snapshot.marker(1, 1) == Some("red"),
            _ => false,
        })
        .await;
        assert!(matches!(update, OutgoingMessage::UpdateGrid(_)));

        channel.disconnect().await.unwrap();
        observer.disconnect().await.unwrap();
    }

    #[tokio::test]
    async fn test_server_with_judge() {
        let mut data_provider = CacheProvider::default();
        let game_id = data_provider.create_game(GameMode::Duel, None).unwrap();
        let judge: SharedJudge = Arc::new(|_code: &str| Verdict::Failed {
            reason: "wrong answer".to_string(),
        });
        let url = start_server(data_provider, Some(judge)).await;

        let mut channel = WebSocketChannel::connect(&format!("{}/{}", url, game_id))
            .await
            .expect("Error connecting to server");
        channel
            .send_claim(ClaimRequest::new("0", "2", "red", "nope".to_string()))
            .await
            .unwrap();

        let update = wait_for(&mut channel, |m| match m {
            OutgoingMessage::UpdateGrid(snapshot) => snapshot.marker(0, 2) == Some("yellow"),
            _ => false,
        })
        .await;
        assert!(matches!(update, OutgoingMessage::UpdateGrid(_)));
    }

    #[tokio::test]
    async fn test_unknown_game() {
        let url = start_server(CacheProvider::default(), None).await;

        let mut channel = WebSocketChannel::connect(&format!("{}/{}", url, Uuid::new_v4()))
            .await
            .expect("Error connecting to server");
        assert!(matches!(
            next_message(&mut channel).await,
            OutgoingMessage::Error {
                error_message: crate::websocket::stream_handler::Error::GameNotFound
            }
        ));
        let closed = timeout(Duration::from_millis(1000), channel.next_message())
            .await
            .expect("timed out waiting for the connection to close");
        assert!(closed.is_none());
    }
}
