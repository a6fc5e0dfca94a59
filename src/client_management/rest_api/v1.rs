use crate::{
    Claim, ClaimError, ClaimRequest, DataProvider, GameMode, SharedJudge, CHALLENGE_TEXT,
};

use actix_web::{
    web::{Data, Json, Path},
    HttpResponse, Responder,
};
use log::{debug, error};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

#[derive(Deserialize)]
pub struct GameSelector {
    game_id: Uuid,
}

#[derive(Deserialize)]
pub struct NewGame {
    num_players: usize,
}

fn provider_error(error: impl ToString) -> HttpResponse {
    let message = error.to_string();
    error!("data provider error: {}", message);
    HttpResponse::InternalServerError().json(json!({ "error": message }))
}

fn not_found(game_id: Uuid) -> HttpResponse {
    HttpResponse::NotFound().json(json!({ "error": format!("game {} does not exist", game_id) }))
}

pub async fn get_games<T: DataProvider>(data_provider: Data<T>) -> impl Responder {
    match data_provider.get_games() {
        Ok(games) => HttpResponse::Ok().json(games),
        Err(err) => provider_error(err),
    }
}

pub async fn create_game<T: DataProvider>(
    data_provider: Data<T>,
    body: Json<NewGame>,
) -> impl Responder {
    let mode = match GameMode::from_player_count(body.num_players) {
        Ok(mode) => mode,
        Err(err) => {
            return HttpResponse::BadRequest().json(json!({ "error": err.to_string() }))
        }
    };
    let mut data_provider = data_provider.get_ref().clone();
    match data_provider.create_game(mode, None) {
        Ok(game_id) => HttpResponse::Ok().json(game_id),
        Err(err) => provider_error(err),
    }
}

pub async fn get_game<T: DataProvider>(
    path: Path<GameSelector>,
    data_provider: Data<T>,
) -> impl Responder {
    match data_provider.game_exists(path.game_id) {
        Ok(true) => {}
        Ok(false) => return not_found(path.game_id),
        Err(err) => return provider_error(err),
    }
    match data_provider.get_game_view(path.game_id) {
        Ok(view) => HttpResponse::Ok().json(view),
        Err(err) => provider_error(err),
    }
}

pub async fn get_challenge<T: DataProvider>(
    path: Path<GameSelector>,
    data_provider: Data<T>,
) -> impl Responder {
    match data_provider.game_exists(path.game_id) {
        Ok(true) => HttpResponse::Ok().json(json!({ "challenge_text": CHALLENGE_TEXT })),
        Ok(false) => not_found(path.game_id),
        Err(err) => provider_error(err),
    }
}

pub async fn submit_claim<T: DataProvider>(
    path: Path<GameSelector>,
    data_provider: Data<T>,
    judge: Data<SharedJudge>,
    body: Json<ClaimRequest>,
) -> impl Responder {
    let game_id = path.game_id;
    match data_provider.game_exists(game_id) {
        Ok(true) => {}
        Ok(false) => return not_found(game_id),
        Err(err) => return provider_error(err),
    }

    let claim = match Claim::try_from(body.into_inner()) {
        Ok(claim) => claim,
        Err(invalid) => return HttpResponse::BadRequest().json(invalid),
    };
    debug!("claim {:?} submitted over http for game {}", claim.coordinates, game_id);

    let mut data_provider = data_provider.get_ref().clone();
    match data_provider.submit_claim(game_id, claim, judge.get_ref().as_ref()) {
        Ok(outcome) => HttpResponse::Ok().json(outcome),
        Err(ClaimError::Invalid(invalid)) => HttpResponse::Conflict().json(invalid),
        Err(ClaimError::Provider(err)) => provider_error(err),
    }
}
