use std::{
    collections::{hash_map::Entry, HashMap},
    sync::{Arc, Mutex, MutexGuard},
};

use log::debug;
use tokio::sync::watch;
use uuid::Uuid;

use crate::{
    Board, Claim, ClaimError, ClaimOutcome, DataProvider, GameMode, GameView, Judge,
};

#[derive(Clone, Default)]
pub struct CacheProviderArgs {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheProviderErrorKind {
    LockError,
    KeyNotFound,
    GameExists,
}
impl ToString for CacheProviderErrorKind {
    fn to_string(&self) -> String {
        match self {
            CacheProviderErrorKind::GameExists => "the game already exists",
            CacheProviderErrorKind::KeyNotFound => "the game does not exist",
            CacheProviderErrorKind::LockError => "could not acquire lock on hashmap",
        }
        .to_string()
    }
}

struct GameEntry {
    board: Board,
    updates: watch::Sender<GameView>,
}

impl GameEntry {
    fn new(board: Board) -> Self {
        let (updates, _) = watch::channel(board.view());
        Self { board, updates }
    }

    fn publish(&self) {
        self.updates.send_replace(self.board.view());
    }
}

/// Keeps every game in memory. Clones share the same games.
#[derive(Clone, Default)]
pub struct CacheProvider {
    games: Arc<Mutex<HashMap<Uuid, GameEntry>>>,
}

impl CacheProvider {
    fn lock(&self) -> Result<MutexGuard<'_, HashMap<Uuid, GameEntry>>, CacheProviderErrorKind> {
        self.games
            .lock()
            .map_err(|_| CacheProviderErrorKind::LockError)
    }
}

impl DataProvider for CacheProvider {
    type Args = CacheProviderArgs;
    type ErrorKind = CacheProviderErrorKind;

    fn new(_args: Self::Args) -> Result<Self, Self::ErrorKind>
    where
        Self: Sized,
    {
        Ok(Self::default())
    }

    fn create_game(
        &mut self,
        mode: GameMode,
        game_id: Option<Uuid>,
    ) -> Result<Uuid, Self::ErrorKind> {
        let game_id = game_id.unwrap_or_else(Uuid::new_v4);
        let mut games = self.lock()?;

        match games.entry(game_id) {
            Entry::Occupied(_) => Err(Self::ErrorKind::GameExists),
            Entry::Vacant(entry) => {
                entry.insert(GameEntry::new(Board::new_with_id(mode, game_id)));
                debug!("Created {:?} game {}", mode, game_id);
                Ok(game_id)
            }
        }
    }

    fn get_games(&self) -> Result<Vec<Uuid>, Self::ErrorKind> {
        Ok(self.lock()?.keys().copied().collect())
    }

    fn game_exists(&self, game_id: Uuid) -> Result<bool, Self::ErrorKind> {
        Ok(self.lock()?.contains_key(&game_id))
    }

    fn get_game_view(&self, game_id: Uuid) -> Result<GameView, Self::ErrorKind> {
        self.lock()?
            .get(&game_id)
            .map(|entry| entry.board.view())
            .ok_or(Self::ErrorKind::KeyNotFound)
    }

    fn submit_claim(
        &mut self,
        game_id: Uuid,
        claim: Claim,
        judge: &dyn Judge,
    ) -> Result<ClaimOutcome, ClaimError<Self::ErrorKind>> {
        let mut games = self.lock().map_err(ClaimError::Provider)?;
        let entry = games
            .get_mut(&game_id)
            .ok_or(ClaimError::Provider(Self::ErrorKind::KeyNotFound))?;

        let outcome = entry
            .board
            .submit(claim, judge)
            .map_err(ClaimError::Invalid)?;
        entry.publish();
        Ok(outcome)
    }

    fn subscribe_to_game(
        &mut self,
        game_id: Uuid,
    ) -> Result<watch::Receiver<GameView>, Self::ErrorKind> {
        self.lock()?
            .get(&game_id)
            .map(|entry| entry.updates.subscribe())
            .ok_or(Self::ErrorKind::KeyNotFound)
    }
}
