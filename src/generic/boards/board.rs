use std::collections::BTreeMap;

use log::{debug, warn};
use ndarray::Array2;
use uuid::Uuid;

use crate::{
    generic::boards::{check_matrix, CellState},
    Claim, ClaimOutcome, Coordinates, Field, GameMode, GameState, GameView, GridSnapshot,
    InvalidClaim, Judge, NextUp, Phase, Team,
};

/// The authoritative state of one game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    pub data: Array2<CellState>,
    pub mode: GameMode,
    pub game_id: Uuid,
    /// number of turns played; grows by 2 per full round in team games
    pub turn: u32,
    pub phase: Phase,
    /// moves waiting for the other team in the current phase
    pub pending: BTreeMap<Team, Claim>,
    phase_results: BTreeMap<Team, Result<ClaimOutcome, InvalidClaim>>,
    ended: Option<GameState>,
}

impl Default for Board {
    fn default() -> Self {
        Self::new(GameMode::Duel)
    }
}

impl Board {
    pub fn new(mode: GameMode) -> Self {
        Self::new_with_id(mode, Uuid::new_v4())
    }

    pub fn new_with_id(mode: GameMode, game_id: Uuid) -> Self {
        let size = mode.grid_size();
        Self {
            data: Array2::from_elem((size, size), CellState::new()),
            mode,
            game_id,
            turn: 0,
            phase: Phase::P1,
            pending: BTreeMap::new(),
            phase_results: BTreeMap::new(),
            ended: None,
        }
    }

    pub fn size(&self) -> usize {
        self.mode.grid_size()
    }

    pub fn get_next_up(&self) -> NextUp {
        match self.mode {
            GameMode::Duel => NextUp::Team {
                team: Team::ALL[self.turn as usize % Team::ALL.len()],
            },
            GameMode::Teams => NextUp::Phase { phase: self.phase },
        }
    }

    pub fn get_state(&self) -> GameState {
        self.ended.unwrap_or(GameState::InProgress {
            next: self.get_next_up(),
        })
    }

    pub fn get_fields(&self) -> Array2<Field> {
        self.data.map(|cell| cell.field)
    }

    pub fn snapshot(&self) -> GridSnapshot {
        GridSnapshot::new(
            self.data
                .rows()
                .into_iter()
                .map(|row| row.iter().map(|cell| cell.field.marker().to_string()).collect())
                .collect(),
        )
    }

    pub fn view(&self) -> GameView {
        GameView {
            snapshot: self.snapshot(),
            grid_size: self.size(),
            mode: self.mode,
            state: self.get_state(),
            turn: self.turn,
        }
    }

    /// Submits a claim. Duel claims are judged right away and credited to the
    /// team to play, whatever team they name. Team claims are queued until
    /// both teams have a move for the current phase.
    pub fn submit(
        &mut self,
        claim: Claim,
        judge: &dyn Judge,
    ) -> Result<ClaimOutcome, InvalidClaim> {
        let claim = self.credit(claim);
        self.validate_claim(&claim)?;

        match self.mode {
            GameMode::Duel => {
                let outcome = self.attempt(&claim, judge)?;
                // a failed attempt only blocks the cell, the same team plays again
                if outcome == ClaimOutcome::Captured {
                    self.turn += 1;
                }
                self.update_winner();
                Ok(outcome)
            }
            GameMode::Teams => {
                let team = claim.team;
                debug!("queueing move of {} for phase {:?}", team, self.phase);
                self.pending.insert(team, claim);
                if self.pending.len() < Team::ALL.len() {
                    return Ok(ClaimOutcome::Pending);
                }
                self.resolve_phase(judge);
                self.phase_results
                    .get(&team)
                    .cloned()
                    .unwrap_or(Ok(ClaimOutcome::Pending))
            }
        }
    }

    /// In a duel the claim always belongs to the team whose turn it is.
    fn credit(&self, claim: Claim) -> Claim {
        match self.get_next_up() {
            NextUp::Team { team } if team != claim.team => {
                debug!("claim for {} credited to {}", claim.team, team);
                Claim { team, ..claim }
            }
            _ => claim,
        }
    }

    pub fn validate_claim(&self, claim: &Claim) -> Result<(), InvalidClaim> {
        // GameEnded
        if !self.get_state().is_in_progress() {
            return Err(InvalidClaim::GameEnded);
        }
        // OutOfBounds
        let (row, col) = claim.coordinates;
        if row >= self.size() || col >= self.size() {
            return Err(InvalidClaim::OutOfBounds);
        }
        self.data[claim.coordinates].check_attempt(claim.team)
    }

    /// What each team's queued move gave when the last phase was resolved.
    pub fn phase_results(&self) -> &BTreeMap<Team, Result<ClaimOutcome, InvalidClaim>> {
        &self.phase_results
    }

    fn attempt(&mut self, claim: &Claim, judge: &dyn Judge) -> Result<ClaimOutcome, InvalidClaim> {
        let cell = &mut self.data[claim.coordinates];
        cell.check_attempt(claim.team)?;
        let verdict = judge.judge(&claim.code);
        let outcome = cell.apply(claim.team, &verdict);
        debug!(
            "{} attempted {:?} in game {}: {:?}",
            claim.team, claim.coordinates, self.game_id, outcome
        );
        Ok(outcome)
    }

    /// Resolves the queued moves of both teams in `Team::ALL` order and moves
    /// on to the next phase.
    fn resolve_phase(&mut self, judge: &dyn Judge) {
        let pending = std::mem::take(&mut self.pending);
        let mut results = BTreeMap::new();
        for (team, claim) in pending {
            let result = self.attempt(&claim, judge);
            if let Err(invalid) = &result {
                warn!(
                    "queued move of {} on {:?} in game {} was refused: {}",
                    team, claim.coordinates, self.game_id, invalid
                );
            }
            results.insert(team, result);
        }
        self.phase_results = results;

        self.update_winner();
        if self.phase == Phase::P2 {
            self.turn += 2;
        }
        self.phase = self.phase.other();
        debug!("game {} moved on to phase {:?}", self.game_id, self.phase);
    }

    fn update_winner(&mut self) {
        let state = check_matrix(&self.get_fields(), self.mode.win_count(), self.get_next_up());
        if !state.is_in_progress() {
            debug!("game {} ended: {}", self.game_id, state);
            self.ended = Some(state);
        }
    }

    pub fn cell(&self, coordinates: Coordinates) -> Option<&CellState> {
        self.data.get(coordinates)
    }
}
