use std::sync::Arc;

use serde::{Deserialize, Serialize};

pub const CHALLENGE_TEXT: &str = "Write a function 'addition' that takes two integers and returns \
their sum. Example: addition(2, 3) must return 5.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Solved,
    Failed { reason: String },
}

/// Decides whether a submitted answer solves the challenge.
///
/// Running the submitted code is left to the implementor, the game only
/// cares about the verdict.
pub trait Judge: Send + Sync {
    fn judge(&self, code: &str) -> Verdict;
}

pub type SharedJudge = Arc<dyn Judge>;

impl<F> Judge for F
where
    F: Fn(&str) -> Verdict + Send + Sync,
{
    fn judge(&self, code: &str) -> Verdict {
        self(code)
    }
}

/// Accepts every non-blank submission.
#[derive(Debug, Clone, Copy, Default)]
pub struct TrustingJudge;

impl Judge for TrustingJudge {
    fn judge(&self, code: &str) -> Verdict {
        if code.trim().is_empty() {
            Verdict::Failed {
                reason: "empty submission".to_string(),
            }
        } else {
            Verdict::Solved
        }
    }
}
