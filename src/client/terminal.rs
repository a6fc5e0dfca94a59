use std::io::Write;

use log::error;
use tokio::io::{stdin, AsyncBufReadExt, BufReader, Lines, Stdin};

use crate::client::{
    prompt::{PromptOutcome, Prompter},
    session::Frontend,
    view::{CellClass, CellKey, GridView, MemoryGrid},
};

/// typed instead of an answer to close the prompt
pub const CANCEL: &str = ":cancel";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Quit,
    Click(CellKey),
    Invalid,
}

/// `row col` (or `row,col`) clicks a cell, `q` leaves.
fn parse_command(line: &str) -> Command {
    let line = line.trim();
    if matches!(line, "q" | "quit" | "exit") {
        return Command::Quit;
    }
    let parts: Vec<&str> = line
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|part| !part.is_empty())
        .collect();
    match parts.as_slice() {
        [row, col] => Command::Click(CellKey::new(row, col)),
        _ => Command::Invalid,
    }
}

/// Plays in a terminal: cells are clicked by typing their position, the grid
/// is printed after every update.
pub struct TerminalFrontend {
    lines: Lines<BufReader<Stdin>>,
}

impl TerminalFrontend {
    pub fn new() -> Self {
        Self {
            lines: BufReader::new(stdin()).lines(),
        }
    }

    /// `None` on end of input
    async fn read_line(&mut self) -> Option<String> {
        match self.lines.next_line().await {
            Ok(line) => line,
            Err(e) => {
                error!("could not read from stdin: {}", e);
                None
            }
        }
    }

    fn show_input_hint() {
        print!("cell (row col, q to leave)> ");
        let _ = std::io::stdout().flush();
    }
}

impl Default for TerminalFrontend {
    fn default() -> Self {
        Self::new()
    }
}

impl Prompter for TerminalFrontend {
    async fn prompt(&mut self, message: &str) -> PromptOutcome {
        println!("{}", message);
        println!("(one line, {} to give up)", CANCEL);
        print!("> ");
        let _ = std::io::stdout().flush();
        match self.read_line().await {
            Some(line) if line.trim() == CANCEL => PromptOutcome::Dismissed,
            Some(line) => PromptOutcome::Submitted(line),
            None => PromptOutcome::Dismissed,
        }
    }

    async fn alert(&mut self, message: &str) {
        println!("!! {}", message);
    }
}

impl Frontend for TerminalFrontend {
    async fn next_click(&mut self) -> Option<CellKey> {
        loop {
            let line = self.read_line().await?;
            match parse_command(&line) {
                Command::Quit => return None,
                Command::Click(key) => return Some(key),
                Command::Invalid => {
                    println!("expected a cell as `row col`");
                    Self::show_input_hint();
                }
            }
        }
    }

    fn redraw(&mut self, view: &dyn GridView) {
        let keys = view.cell_keys();
        let mut grid = MemoryGrid::with_cells(keys.iter().cloned());
        for key in keys.iter() {
            if let Some(text) = view.text(key) {
                grid.paint(key, text, CellClass::from_marker(text));
            }
        }
        println!();
        print!("{}", grid);
        Self::show_input_hint();
    }

    fn notice(&mut self, message: &str) {
        println!("-- {}", message);
    }
}
