use std::future::Future;

use log::{debug, info, warn};

use crate::{
    client::{
        channel::{ChannelError, ClaimSink, ServerEvents},
        input::{handle_click, ClickOutcome},
        prompt::Prompter,
        render::render_snapshot,
        view::{CellKey, GridView},
    },
    websocket::OutgoingMessage,
    GameState,
};

/// Everything the player interacts with besides the grid itself.
pub trait Frontend: Prompter {
    /// waits for the next clicked cell, `None` once the player wants to leave
    fn next_click(&mut self) -> impl Future<Output = Option<CellKey>> + Send;

    fn redraw(&mut self, view: &dyn GridView);

    /// a passing message that doesn't need an answer
    fn notice(&mut self, message: &str);
}

/// Ties a view to a server connection: clicks become claims, server updates
/// repaint the view. The view holds no state of its own besides what the
/// last snapshot painted.
pub struct ClientSession<V: GridView> {
    view: V,
    state: Option<(GameState, u32)>,
}

impl<V: GridView> ClientSession<V> {
    pub fn new(view: V) -> Self {
        Self { view, state: None }
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    /// the last game state and turn the server announced
    pub fn state(&self) -> Option<(GameState, u32)> {
        self.state
    }

    /// Runs until the player quits or the server hangs up.
    ///
    /// Events are handled one at a time: while a click waits for the player's
    /// answer no server update is applied.
    pub async fn run<F, C>(&mut self, frontend: &mut F, channel: &mut C) -> Result<(), ChannelError>
    where
        F: Frontend,
        C: ClaimSink + ServerEvents,
    {
        frontend.redraw(&self.view);
        loop {
            tokio::select! {
                biased;
                message = channel.next_message() => match message {
                    Some(Ok(message)) => self.handle_message(message, frontend),
                    Some(Err(e)) => return Err(e),
                    None => {
                        info!("server closed the connection");
                        return Ok(());
                    }
                },
                click = frontend.next_click() => match click {
                    Some(key) => self.click(&key, frontend, channel).await,
                    None => {
                        info!("leaving the game");
                        return Ok(());
                    }
                },
            }
        }
    }

    async fn click<F, C>(&mut self, key: &CellKey, frontend: &mut F, channel: &mut C)
    where
        F: Frontend,
        C: ClaimSink,
    {
        match handle_click(&self.view, key, frontend, channel).await {
            Ok(ClickOutcome::UnknownCell) => {
                frontend.notice(&format!("there is no cell at ({}, {})", key.row, key.col))
            }
            Ok(outcome) => debug!("click on {:?}: {:?}", key, outcome),
            Err(e) => {
                warn!("could not send claim: {}", e);
                frontend.notice(&format!("claim not sent: {}", e));
            }
        }
    }

    pub fn handle_message<F: Frontend>(&mut self, message: OutgoingMessage, frontend: &mut F) {
        match message {
            OutgoingMessage::UpdateGrid(snapshot) => {
                render_snapshot(&mut self.view, &snapshot);
                frontend.redraw(&self.view);
            }
            OutgoingMessage::GameState { game_state, turn } => {
                if self.state.map(|(state, _)| state) != Some(game_state) {
                    frontend.notice(&format!("turn {}: {}", turn, game_state));
                }
                self.state = Some((game_state, turn));
            }
            OutgoingMessage::ClaimResult { outcome } => {
                frontend.notice(&format!("claim result: {:?}", outcome))
            }
            OutgoingMessage::Error { error_message } => {
                warn!("server error: {:?}", error_message);
                frontend.notice(&format!("server refused: {:?}", error_message));
            }
            OutgoingMessage::Welcome { game_uuid, .. } => debug!("joined game {}", game_uuid),
            OutgoingMessage::Pong {} => debug!("pong"),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        client::{
            input::test::ScriptedPrompter,
            prompt::{PromptOutcome, CELL_TAKEN_ALERT},
            view::{CellClass, MemoryGrid},
        },
        ClaimOutcome, ClaimRequest, GridSnapshot, NextUp, Team,
    };
    use std::collections::VecDeque;
    use tokio::sync::mpsc;

    struct ScriptedFrontend {
        prompter: ScriptedPrompter,
        clicks: VecDeque<CellKey>,
        redraws: usize,
        notices: Vec<String>,
    }

    impl ScriptedFrontend {
        fn new(clicks: Vec<CellKey>, answers: Vec<PromptOutcome>) -> Self {
            Self {
                prompter: ScriptedPrompter::answering(answers),
                clicks: clicks.into(),
                redraws: 0,
                notices: Vec::new(),
            }
        }
    }

    impl Prompter for ScriptedFrontend {
        async fn prompt(&mut self, message: &str) -> PromptOutcome {
            self.prompter.prompt(message).await
        }

        async fn alert(&mut self, message: &str) {
            self.prompter.alert(message).await
        }
    }

    impl Frontend for ScriptedFrontend {
        async fn next_click(&mut self) -> Option<CellKey> {
            self.clicks.pop_front()
        }

        fn redraw(&mut self, _view: &dyn GridView) {
            self.redraws += 1;
        }

        fn notice(&mut self, message: &str) {
            self.notices.push(message.to_string());
        }
    }

    struct MemoryChannel {
        incoming: mpsc::UnboundedReceiver<OutgoingMessage>,
        sent: Vec<ClaimRequest>,
    }

    impl ClaimSink for MemoryChannel {
        async fn send_claim(&mut self, claim: ClaimRequest) -> Result<(), ChannelError> {
            self.sent.push(claim);
            Ok(())
        }
    }

    impl ServerEvents for MemoryChannel {
        async fn next_message(&mut self) -> Option<Result<OutgoingMessage, ChannelError>> {
            self.incoming.recv().await.map(Ok)
        }
    }

    fn memory_channel() -> (mpsc::UnboundedSender<OutgoingMessage>, MemoryChannel) {
        let (tx, incoming) = mpsc::unbounded_channel();
        (
            tx,
            MemoryChannel {
                incoming,
                sent: Vec::new(),
            },
        )
    }

    fn grid(rows: &[&[&str]]) -> GridSnapshot {
        GridSnapshot::new(
            rows.iter()
                .map(|row| row.iter().map(|marker| marker.to_string()).collect())
                .collect(),
        )
    }

    #[tokio::test]
    async fn updates_are_painted_before_clicks() {
        let (server, mut channel) = memory_channel();
        server
            .send(OutgoingMessage::UpdateGrid(grid(&[
                &["red", "", ""],
                &["", "", ""],
                &["", "", ""],
            ])))
            .unwrap();

        let mut frontend = ScriptedFrontend::new(
            vec![CellKey::new(0, 0), CellKey::new(1, 1)],
            vec![PromptOutcome::Submitted("addition(2,3)".to_string())],
        );
        let mut session = ClientSession::new(MemoryGrid::new(3, 3));
        session.run(&mut frontend, &mut channel).await.unwrap();

        assert_eq!(session.view().text(&CellKey::new(0, 0)), Some("red"));
        assert_eq!(
            session
                .view()
                .cell(&CellKey::new(0, 0))
                .and_then(|cell| cell.class),
            Some(CellClass::Red)
        );
        // (0, 0) was refused locally, (1, 1) was claimed
        assert_eq!(frontend.prompter.alerts, vec![CELL_TAKEN_ALERT.to_string()]);
        assert_eq!(
            channel.sent,
            vec![ClaimRequest::new("1", "1", "red", "addition(2,3)".to_string())]
        );
        // once on start, once for the update
        assert_eq!(frontend.redraws, 2);
        drop(server);
    }

    #[tokio::test]
    async fn claimed_cell_shows_up_after_the_server_echoes_it() {
        let (server, mut channel) = memory_channel();
        let mut frontend = ScriptedFrontend::new(
            vec![CellKey::new(2, 1)],
            vec![PromptOutcome::Submitted("code".to_string())],
        );
        let mut session = ClientSession::new(MemoryGrid::new(3, 3));
        session.run(&mut frontend, &mut channel).await.unwrap();

        // nothing is painted locally
        assert_eq!(session.view().text(&CellKey::new(2, 1)), Some(""));
        assert_eq!(channel.sent.len(), 1);

        server
            .send(OutgoingMessage::UpdateGrid(grid(&[
                &["", "", ""],
                &["", "", ""],
                &["", "red", ""],
            ])))
            .unwrap();
        drop(server);
        session.run(&mut frontend, &mut channel).await.unwrap();
        assert_eq!(session.view().text(&CellKey::new(2, 1)), Some("red"));
    }

    #[test]
    fn game_state_and_results_are_announced() {
        let mut frontend = ScriptedFrontend::new(vec![], vec![]);
        let mut session = ClientSession::new(MemoryGrid::new(3, 3));
        let in_progress = GameState::InProgress {
            next: NextUp::Team { team: Team::Blue },
        };

        session.handle_message(
            OutgoingMessage::GameState {
                game_state: in_progress,
                turn: 1,
            },
            &mut frontend,
        );
        // the same state again is not announced twice
        session.handle_message(
            OutgoingMessage::GameState {
                game_state: in_progress,
                turn: 1,
            },
            &mut frontend,
        );
        session.handle_message(
            OutgoingMessage::ClaimResult {
                outcome: ClaimOutcome::Captured,
            },
            &mut frontend,
        );

        assert_eq!(session.state(), Some((in_progress, 1)));
        assert_eq!(frontend.notices.len(), 2);
        assert!(frontend.notices[0].contains("blue to play"));
    }

    #[tokio::test]
    async fn unknown_cells_are_reported() {
        let (_server, mut channel) = memory_channel();
        let mut frontend = ScriptedFrontend::new(vec![CellKey::new(7, 7)], vec![]);
        let mut session = ClientSession::new(MemoryGrid::new(3, 3));
        session.run(&mut frontend, &mut channel).await.unwrap();

        assert!(channel.sent.is_empty());
        assert_eq!(frontend.notices.len(), 1);
    }
}
