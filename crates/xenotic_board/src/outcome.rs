//! Finished-game results.

use crate::types::Symbol;
use serde::{Deserialize, Serialize};

/// Winner as the server reports it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display)]
pub enum Winner {
    /// Three in a row for this symbol.
    #[display("{_0}")]
    Symbol(Symbol),
    /// Board full with no line.
    #[display("draw")]
    Draw,
}

impl Winner {
    /// Interprets the nullable wire value that accompanies `game_over: true`.
    ///
    /// `None` and `"draw"` both mean a draw.
    pub fn from_wire(value: Option<&str>) -> Option<Self> {
        match value.map(str::trim) {
            None | Some("") => Some(Winner::Draw),
            Some(v) if v.eq_ignore_ascii_case("draw") => Some(Winner::Draw),
            Some(v) => v.parse::<Symbol>().ok().map(Winner::Symbol),
        }
    }
}

/// Result of a finished game from the human's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display)]
pub enum Outcome {
    /// The human completed a line.
    #[display("You win!")]
    HumanWin,
    /// The AI completed a line.
    #[display("AI wins!")]
    AiWin,
    /// Nobody did.
    #[display("It's a draw!")]
    Draw,
}

impl Outcome {
    /// Classifies a winner relative to the human's symbol.
    pub fn for_human(winner: Winner, human: Symbol) -> Self {
        match winner {
            Winner::Draw => Outcome::Draw,
            Winner::Symbol(symbol) if symbol == human => Outcome::HumanWin,
            Winner::Symbol(_) => Outcome::AiWin,
        }
    }
}
