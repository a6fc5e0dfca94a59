mod providers;

pub use providers::*;

use crate::{Claim, ClaimOutcome, GameMode, GameView, InvalidClaim, Judge};
use core::fmt::Debug;
use uuid::Uuid;

/// Why a claim could not be applied: either the game rules refused it or the
/// provider itself failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClaimError<E> {
    Invalid(InvalidClaim),
    Provider(E),
}

impl<E: ToString> ToString for ClaimError<E> {
    fn to_string(&self) -> String {
        match self {
            ClaimError::Invalid(invalid) => invalid.to_string(),
            ClaimError::Provider(error) => error.to_string(),
        }
    }
}

/// DataProvider is a trait that defines the interface for a data provider.
/// The operator of this trait doesn't care where the games are kept, it only
/// needs to be able to look them up, apply claims and get notified of changes.
pub trait DataProvider: Send + Sync + Clone {
    type Args: Clone;
    type ErrorKind: Debug + Clone + PartialEq + Eq + ToString + Send;

    fn new(args: Self::Args) -> Result<Self, Self::ErrorKind>
    where
        Self: Sized;

    /// creates a new game and returns the game id.
    fn create_game(
        &mut self,
        mode: GameMode,
        game_id: Option<Uuid>,
    ) -> Result<Uuid, Self::ErrorKind>;

    fn get_games(&self) -> Result<Vec<Uuid>, Self::ErrorKind>;

    /// checks if a game exists for a given game id.
    fn game_exists(&self, game_id: Uuid) -> Result<bool, Self::ErrorKind>;

    /// returns what subscribers of the game currently see.
    fn get_game_view(&self, game_id: Uuid) -> Result<GameView, Self::ErrorKind>;

    /// applies a claim to the game and publishes the new state to every
    /// subscriber.
    fn submit_claim(
        &mut self,
        game_id: Uuid,
        claim: Claim,
        judge: &dyn Judge,
    ) -> Result<ClaimOutcome, ClaimError<Self::ErrorKind>>;

    /// The receiver starts out holding the current view.
    fn subscribe_to_game(
        &mut self,
        game_id: Uuid,
    ) -> Result<tokio::sync::watch::Receiver<GameView>, Self::ErrorKind>;
}
