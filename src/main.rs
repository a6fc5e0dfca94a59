use code_grid::{
    client::{play_in_terminal, ClientArgs},
    ApiServer, CacheProvider, CacheProviderArgs, DataProvider, GameMode, Server,
    WebSocketServer,
};
use log::{error, info};
use uuid::Uuid;

const USAGE: &str = "usage: code-grid [serve | client <game_uuid>]";

/// Number of players of the game created when the server starts.
fn players_from_env() -> usize {
    std::env::var("CODE_GRID_PLAYERS")
        .ok()
        .and_then(|players| players.parse().ok())
        .unwrap_or(2)
}

async fn serve() {
    let mut data_provider = match CacheProvider::new(CacheProviderArgs {}) {
        Ok(data_provider) => data_provider,
        Err(e) => {
            error!("could not create data provider: {}", e.to_string());
            return;
        }
    };

    match GameMode::from_player_count(players_from_env()) {
        Ok(mode) => match data_provider.create_game(mode, None) {
            Ok(uuid) => info!("Created {:?} game with uuid: {}", mode, uuid),
            Err(e) => error!("could not create game: {}", e.to_string()),
        },
        Err(e) => error!("no game created: {}", e.to_string()),
    }

    let mut websocket_server = WebSocketServer::from_env(data_provider.clone());
    let mut api_server = ApiServer::from_env(data_provider);
    info!(
        "websocket on {}, api on {}",
        websocket_server.get_address(),
        api_server.get_address()
    );

    let (websocket, api) = tokio::join!(websocket_server.start(), api_server.start());
    if let Err(e) = websocket {
        error!("websocket server stopped: {:?}", e);
    }
    if let Err(e) = api {
        error!("api server stopped: {:?}", e);
    }
}

#[tokio::main]
async fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.iter().map(String::as_str).collect::<Vec<_>>().as_slice() {
        [] | ["serve"] => serve().await,
        ["client", game] => match Uuid::parse_str(game) {
            Ok(game_id) => {
                if let Err(e) = play_in_terminal(&ClientArgs::from_env(), game_id).await {
                    error!("client stopped: {}", e);
                }
            }
            Err(e) => error!("invalid game uuid {:?}: {}", game, e),
        },
        _ => eprintln!("{}", USAGE),
    }
}
