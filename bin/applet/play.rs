use crate::io::{Io, Pipe};
use anyhow::{bail, Error as Anyhow};
use clap::Parser;
use lib::chess::{Bitboard, Color, Fen, Move, Square};
use lib::game::Game;
use lib::session::{Grimoire, Intent, Match};
use lib::spell::{Spell, Target};
use std::{io::ErrorKind, str::FromStr};
use tokio::io::{stdin, stdout};
use tracing::{instrument, warn};

/// Plays a match, both sides taking turns at the same terminal.
#[derive(Debug, Default, Parser)]
#[clap(disable_help_flag = true, disable_version_flag = true)]
pub struct Play {
    /// The initial position in FEN, the standard one if omitted.
    #[clap(short, long, value_name = "fen")]
    fen: Option<Fen>,

    /// The spell charges of each side in RON, e.g. `grimoire(cat: 5)`.
    #[clap(short, long, value_name = "grimoire", default_value = "grimoire()")]
    grimoire: Grimoire,
}

impl Play {
    #[instrument(level = "trace", skip(self), err)]
    pub async fn execute(self) -> Result<(), Anyhow> {
        let game = self.fen.map(Game::from).unwrap_or_default();
        let io = Pipe::new(stdout(), stdin());
        Server::new(Match::new(game, self.grimoire), io).run().await
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
enum Command {
    Board,
    Fen,
    Moves(Square, Option<Spell>),
    Move(Move),
    Cast(Spell, Target, Option<Square>),
    Undo,
    Reset,
    Stuns,
    Charges,
}

impl FromStr for Command {
    type Err = Anyhow;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tokens: Vec<_> = s.split_whitespace().collect();

        let cmd = match tokens.as_slice() {
            ["board"] => Command::Board,
            ["fen"] => Command::Fen,
            ["moves", sq] => Command::Moves(sq.parse()?, None),
            ["moves", sq, spell] => Command::Moves(sq.parse()?, Some(spell.parse()?)),
            ["move", m] => Command::Move(m.parse()?),
            ["cast", spell, target] => Command::Cast(spell.parse()?, target.parse()?, None),
            ["cast", spell, target, source] => {
                Command::Cast(spell.parse()?, target.parse()?, Some(source.parse()?))
            }
            ["undo"] => Command::Undo,
            ["reset"] => Command::Reset,
            ["stuns"] => Command::Stuns,
            ["charges"] => Command::Charges,
            _ => bail!("unrecognized command `{}`", s),
        };

        Ok(cmd)
    }
}

fn squares(bb: Bitboard) -> String {
    if bb.is_empty() {
        "none".into()
    } else {
        bb.to_string()
    }
}

struct Server<T: Io> {
    session: Match,
    io: T,
}

impl<T: Io> Server<T> {
    fn new(session: Match, io: T) -> Self {
        Server { session, io }
    }

    async fn run(&mut self) -> Result<(), Anyhow> {
        loop {
            let line = match self.io.recv().await {
                Ok(line) => line,
                Err(e) if e.kind() == ErrorKind::UnexpectedEof => return Ok(()),
                Err(e) => return Err(e.into()),
            };

            let reply = match line.trim() {
                "" => continue,
                "quit" => return Ok(()),
                cmd => match cmd.parse() {
                    Ok(cmd) => self.handle(cmd),
                    Err(e) => {
                        warn!("ignored {:?}", e);
                        format!("error: {}", e)
                    }
                },
            };

            self.io.send(&reply).await?;
            self.io.flush().await?;
        }
    }

    fn handle(&mut self, cmd: Command) -> String {
        match cmd {
            Command::Board => self.session.game().board().to_string(),
            Command::Fen => Fen::from(self.session.game()).to_string(),
            Command::Moves(sq, spell) => {
                let ability = spell.map(|s| (s, sq));
                squares(self.session.game().destinations(sq, ability))
            }

            Command::Move(m) => self.apply(Intent::Move {
                whence: m.whence(),
                whither: m.whither(),
            }),

            Command::Cast(spell, target, source) => self.apply(Intent::Spell {
                spell,
                target,
                source,
            }),

            Command::Undo => match self.session.undo() {
                Some(m) => format!("undone {}", m),
                None => "nothing to undo".into(),
            },

            Command::Reset => self.apply(Intent::Restart),
            Command::Stuns => squares(self.session.game().stunned()),
            Command::Charges => Color::ALL
                .iter()
                .map(|&c| format!("{}: {}", c, self.session.charges(c)))
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }

    fn apply(&mut self, intent: Intent) -> String {
        match self.session.apply(intent) {
            Err(e) => {
                warn!(?intent, "rejected: {}", e);
                format!("rejected: {}", e)
            }

            Ok(event) => match self.session.game().outcome() {
                None => event.to_string(),
                Some(o) => format!("{}\n{}", event, o),
            },
        }
    }
}
