//! Line-oriented play loop.

use anyhow::{Result, anyhow, bail};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::task::JoinHandle;
use tracing::{debug, instrument};
use xenotic_client::{
    Difficulty, GameSessionClient, GameTransport, Phase, ServerStats, SessionEvent, SharedScoreboard, Symbol,
};

const HELP: &str = "\
Commands:
  move <row> <col>        place your symbol (rows and columns are 0-2)
  hint                    ask the server for a suggestion
  new [difficulty] [X|O]  start a new game
  reset                   clear the board, same settings
  difficulty <level>      easy, medium, hard, impossible (starts a new board)
  refresh                 re-read the game from the server
  stats                   server statistics
  score                   your results this run
  quit";

/// One parsed input line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplCommand {
    /// Place a stone.
    Move(u8, u8),
    /// Request a hint.
    Hint,
    /// Start a new game, optionally overriding settings.
    New(Option<Difficulty>, Option<Symbol>),
    /// Reset the board.
    Reset,
    /// Change difficulty.
    Difficulty(Difficulty),
    /// Resync with the server.
    Refresh,
    /// Server statistics.
    Stats,
    /// Local results.
    Score,
    /// Show commands.
    Help,
    /// Leave.
    Quit,
}

impl ReplCommand {
    /// Parses a line such as `move 1 2` or `new hard O`.
    pub fn parse(line: &str) -> Result<Self> {
        let mut words = line.split_whitespace();
        let verb = words.next().ok_or_else(|| anyhow!("Empty command"))?.to_lowercase();
        let args: Vec<&str> = words.collect();

        let command = match (verb.as_str(), args.as_slice()) {
            ("move" | "m", [row, col]) => ReplCommand::Move(row.parse()?, col.parse()?),
            ("move" | "m", _) => bail!("Usage: move <row> <col>"),
            ("hint" | "h", []) => ReplCommand::Hint,
            ("new" | "n", rest) if rest.len() <= 2 => {
                let mut difficulty = None;
                let mut symbol = None;
                for word in rest {
                    if let Ok(d) = word.parse::<Difficulty>() {
                        difficulty = Some(d);
                    } else if let Ok(s) = word.parse::<Symbol>() {
                        symbol = Some(s);
                    } else {
                        bail!("Unknown option {word:?}");
                    }
                }
                ReplCommand::New(difficulty, symbol)
            }
            ("reset" | "r", []) => ReplCommand::Reset,
            ("difficulty" | "d", [level]) => ReplCommand::Difficulty(level.parse()?),
            ("refresh", []) => ReplCommand::Refresh,
            ("stats", []) => ReplCommand::Stats,
            ("score", []) => ReplCommand::Score,
            ("help" | "?", []) => ReplCommand::Help,
            ("quit" | "q" | "exit", []) => ReplCommand::Quit,
            _ => bail!("Unknown command {line:?}; type help"),
        };
        Ok(command)
    }
}

/// Formats server statistics for the terminal.
pub fn format_stats(stats: &ServerStats) -> String {
    format!(
        "Games: {}  You: {} ({:.1}%)  AI: {} ({:.1}%)  Draws: {} ({:.1}%)  Avg moves: {:.1}  Active: {}",
        stats.total_games(),
        stats.human_wins(),
        stats.human_win_rate(),
        stats.ai_wins(),
        stats.ai_win_rate(),
        stats.draws(),
        stats.draw_rate(),
        stats.average_moves_per_game(),
        stats.active_games(),
    )
}

/// Prints board changes and results as they happen.
fn spawn_renderer(mut events: broadcast::Receiver<SessionEvent>) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(SessionEvent::BoardUpdated(board)) => println!("\n{}\n", board.display()),
                Ok(SessionEvent::TurnChanged { player, phase }) => match phase {
                    Phase::AwaitingHumanMove => println!("Your move ({player})."),
                    Phase::AwaitingFirstAiMove | Phase::AwaitingAiReply => println!("AI ({player}) to move..."),
                    Phase::Idle | Phase::GameOver => {}
                },
                Ok(SessionEvent::GameEnded { outcome, .. }) => println!("{outcome}"),
                Ok(SessionEvent::HintReady(cell)) => println!("Hint: try {cell}"),
                Ok(_) => {}
                Err(RecvError::Lagged(_)) => continue,
                Err(RecvError::Closed) => break,
            }
        }
    })
}

/// Runs the interactive loop until `quit` or end of input.
#[instrument(skip(client))]
pub async fn run<T: GameTransport>(client: GameSessionClient<T>, difficulty: Difficulty, symbol: Symbol) -> Result<()> {
    let scoreboard = SharedScoreboard::default();
    let _score_task = scoreboard.track(client.subscribe());
    let _render_task = spawn_renderer(client.subscribe());

    let mut difficulty = difficulty;
    let mut symbol = symbol;
    if let Err(err) = client.start_new_game(difficulty, symbol).await {
        println!("Could not start a game: {}", err.kind);
    }
    println!("{HELP}");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let command = match ReplCommand::parse(&line) {
            Ok(command) => command,
            Err(err) => {
                println!("{err}");
                continue;
            }
        };
        debug!(?command, "Parsed command");

        let outcome = match command {
            ReplCommand::Move(row, col) => client.submit_move(row, col).await.map(|_| ()),
            ReplCommand::Hint => client.request_hint().await.map(|_| ()),
            ReplCommand::New(d, s) => {
                difficulty = d.unwrap_or(difficulty);
                symbol = s.unwrap_or(symbol);
                client.start_new_game(difficulty, symbol).await.map(|_| ())
            }
            ReplCommand::Reset => client.reset().await.map(|_| ()),
            ReplCommand::Difficulty(d) => {
                difficulty = d;
                client.change_difficulty(d).await.map(|_| ())
            }
            ReplCommand::Refresh => client.refresh().await.map(|_| ()),
            ReplCommand::Stats => client
                .server_stats()
                .await
                .map(|stats| println!("{}", format_stats(&stats))),
            ReplCommand::Score => {
                println!("{}", scoreboard.snapshot());
                Ok(())
            }
            ReplCommand::Help => {
                println!("{HELP}");
                Ok(())
            }
            ReplCommand::Quit => break,
        };

        if let Err(err) = outcome {
            println!("{}", err.kind);
            if client.phase() == Phase::AwaitingFirstAiMove {
                println!("The AI still owes its opening move; retrying.");
                if let Err(err) = client.request_ai_first_move().await {
                    println!("{}", err.kind);
                }
            }
        }
    }

    println!("Results this run: {}", scoreboard.snapshot());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_move() {
        assert_eq!(ReplCommand::parse("move 1 2").unwrap(), ReplCommand::Move(1, 2));
        assert_eq!(ReplCommand::parse("  m 0 0 ").unwrap(), ReplCommand::Move(0, 0));
        assert!(ReplCommand::parse("move 1").is_err());
        assert!(ReplCommand::parse("move a b").is_err());
    }

    #[test]
    fn test_parse_new_with_options_in_any_order() {
        assert_eq!(
            ReplCommand::parse("new O hard").unwrap(),
            ReplCommand::New(Some(Difficulty::Hard), Some(Symbol::O))
        );
        assert_eq!(ReplCommand::parse("new").unwrap(), ReplCommand::New(None, None));
        assert!(ReplCommand::parse("new purple").is_err());
    }

    #[test]
    fn test_parse_other_commands() {
        assert_eq!(
            ReplCommand::parse("difficulty easy").unwrap(),
            ReplCommand::Difficulty(Difficulty::Easy)
        );
        assert_eq!(ReplCommand::parse("QUIT").unwrap(), ReplCommand::Quit);
        assert!(ReplCommand::parse("").is_err());
        assert!(ReplCommand::parse("fly").is_err());
    }
}
