use crate::io::{Io, Pipe};
use anyhow::{Context, Error as Anyhow};
use clap::Parser;
use lib::chess::Fen;
use lib::game::Game;
use lib::session::{Grimoire, Intent, Match};
use std::path::PathBuf;
use tokio::{fs, io::empty, io::stdout};
use tracing::{info, instrument, warn};

/// Replays a recorded list of intents and prints the final position.
#[derive(Debug, Parser)]
#[clap(disable_help_flag = true, disable_version_flag = true)]
pub struct Replay {
    /// Path to a RON list of intents, e.g. `[move(whence: "e2", whither: "e4")]`.
    #[clap(value_name = "path")]
    file: PathBuf,

    /// The initial position in FEN, the standard one if omitted.
    #[clap(short, long, value_name = "fen")]
    fen: Option<Fen>,

    /// The spell charges of each side in RON.
    #[clap(short, long, value_name = "grimoire", default_value = "grimoire()")]
    grimoire: Grimoire,
}

impl Replay {
    #[instrument(level = "trace", skip(self), err)]
    pub async fn execute(self) -> Result<(), Anyhow> {
        let ron = fs::read_to_string(&self.file)
            .await
            .with_context(|| format!("failed to read `{}`", self.file.display()))?;

        let intents: Vec<Intent> = ron::de::from_str(&ron).context("failed to parse intents")?;

        let game = self.fen.map(Game::from).unwrap_or_default();
        let mut session = Match::new(game, self.grimoire);
        let mut io = Pipe::new(stdout(), empty());
        replay(&mut session, intents, &mut io).await
    }
}

/// Applies every intent in order, reporting each event or rejection and then the final position.
async fn replay<T: Io>(session: &mut Match, intents: Vec<Intent>, io: &mut T) -> Result<(), Anyhow> {
    for intent in intents {
        match session.apply(intent) {
            Ok(event) => {
                info!(%event);
                io.send(&event.to_string()).await?;
            }

            Err(e) => {
                warn!(?intent, "rejected: {}", e);
                io.send(&format!("rejected: {}", e)).await?;
            }
        }
    }

    let game = session.game();
    io.send(&game.board().to_string()).await?;
    io.send(&Fen::from(game).to_string()).await?;

    if let Some(o) = game.outcome() {
        io.send(&o.to_string()).await?;
    }

    io.flush().await?;
    Ok(())
}
