use std::future::Future;

pub const CHALLENGE_PROMPT: &str = "Challenge: write a function 'addition' that takes two \
numbers and returns their sum. Example: addition(2,3) must return 5.\n\nWrite your function here:";

pub const CELL_TAKEN_ALERT: &str = "This cell is already taken!";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptOutcome {
    /// the text the player confirmed, possibly empty
    Submitted(String),
    /// the player closed the prompt without answering
    Dismissed,
}

/// Asks the player things. Both calls suspend the click that triggered them
/// until the player has answered.
pub trait Prompter {
    fn prompt(&mut self, message: &str) -> impl Future<Output = PromptOutcome> + Send;

    fn alert(&mut self, message: &str) -> impl Future<Output = ()> + Send;
}
