use log::debug;

use crate::{
    client::{
        channel::{ChannelError, ClaimSink},
        prompt::{PromptOutcome, Prompter, CELL_TAKEN_ALERT, CHALLENGE_PROMPT},
        view::{CellKey, GridView},
    },
    ClaimRequest,
};

/// Every claim sent from this client is made for this team.
pub const CLAIM_TEAM: &str = "red";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickOutcome {
    /// the view has no such cell
    UnknownCell,
    AlreadyTaken,
    Dismissed,
    EmptySubmission,
    Sent(ClaimRequest),
}

/// Handles a click on a cell: refuses cells that already show something,
/// asks for an answer and sends it as a claim.
///
/// The check against the displayed text is only a courtesy, the server has
/// the final say on who owns a cell.
pub async fn handle_click<V, P, C>(
    view: &V,
    key: &CellKey,
    prompter: &mut P,
    sink: &mut C,
) -> Result<ClickOutcome, ChannelError>
where
    V: GridView + ?Sized,
    P: Prompter,
    C: ClaimSink,
{
    let taken = match view.text(key) {
        None => {
            debug!("click on unknown cell {:?}", key);
            return Ok(ClickOutcome::UnknownCell);
        }
        Some(text) => !text.is_empty(),
    };
    if taken {
        prompter.alert(CELL_TAKEN_ALERT).await;
        return Ok(ClickOutcome::AlreadyTaken);
    }

    let code = match prompter.prompt(CHALLENGE_PROMPT).await {
        PromptOutcome::Dismissed => return Ok(ClickOutcome::Dismissed),
        PromptOutcome::Submitted(code) if code.is_empty() => {
            return Ok(ClickOutcome::EmptySubmission)
        }
        PromptOutcome::Submitted(code) => code,
    };

    let claim = ClaimRequest::new(key.row.clone(), key.col.clone(), CLAIM_TEAM, code);
    sink.send_claim(claim.clone()).await?;
    debug!("sent claim for cell ({}, {})", claim.row, claim.col);
    Ok(ClickOutcome::Sent(claim))
}
