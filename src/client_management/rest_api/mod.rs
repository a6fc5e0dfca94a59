use crate::{client_management::address_from_env, DataProvider, Server, SharedJudge, TrustingJudge};
use actix_web::{
    web::{get, post, put, Data},
    App, HttpServer,
};
use log::debug;
use std::sync::Arc;

mod v1;
use v1::{create_game, get_challenge, get_game, get_games, submit_claim};

/*
Endpoints:
* GET  /api/v1/games                    -> DataProvider::get_games
* PUT  /api/v1/games                    -> DataProvider::create_game(mode, None)
* GET  /api/v1/games/{game_id}          -> DataProvider::get_game_view(game_id)
* GET  /api/v1/games/{game_id}/challenge -> the challenge players have to solve
* POST /api/v1/games/{game_id}/claims   -> DataProvider::submit_claim(game_id, body)
*/

pub struct ApiServer<T: DataProvider> {
    pub port: u16,
    pub host: String,
    pub data_provider: T,
    pub judge: SharedJudge,
}

impl<T: DataProvider + Default + 'static> Server<T> for ApiServer<T> {
    type ErrorKind = std::io::Error;
    const DEFAULT_PORT: u16 = 3001;

    fn new(host: String, port: u16, data_provider: T) -> Self {
        Self {
            port,
            host,
            data_provider,
            judge: Arc::new(TrustingJudge),
        }
    }

    fn default() -> Self {
        Self::new(
            Self::DEFAULT_HOST.to_string(),
            Self::DEFAULT_PORT,
            T::default(),
        )
    }

    fn get_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
    fn from_env(data_provider: T) -> Self {
        let (host, port) =
            address_from_env("API_HOST", "API_PORT", Self::DEFAULT_HOST, Self::DEFAULT_PORT);
        Self::new(host, port, data_provider)
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
    async fn start(&mut self) -> Result<(), std::io::Error> {
        let data_provider = self.data_provider.clone();
        let judge = self.judge.clone();
        debug!("Starting api server on {}", self.get_address());
        let server = HttpServer::new(move || {
            App::new()
                .app_data(Data::new(data_provider.clone()))
                .app_data(Data::new(judge.clone()))
                .route("/api/v1/games", get().to(get_games::<T>))
                .route("/api/v1/games", put().to(create_game::<T>))
                .route("/api/v1/games/{game_id}", get().to(get_game::<T>))
                .route(
                    "/api/v1/games/{game_id}/challenge",
                    get().to(get_challenge::<T>),
                )
                .route("/api/v1/games/{game_id}/claims", post().to(submit_claim::<T>))
        })
        .bind(self.get_address())?
        .run();
        server.await
    }
}
