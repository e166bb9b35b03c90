use anyhow::Error as Anyhow;
use clap::Subcommand;
use derive_more::From;

mod play;
mod replay;

#[derive(From, Subcommand)]
pub enum Applet {
    /// Plays a match interactively over stdin and stdout.
    Play(play::Play),
    /// Replays a recorded list of intents.
    Replay(replay::Replay),
}

impl Default for Applet {
    fn default() -> Self {
        play::Play::default().into()
    }
}

impl Applet {
    pub async fn execute(self) -> Result<(), Anyhow> {
        match self {
            Applet::Play(a) => Ok(a.execute().await?),
            Applet::Replay(a) => Ok(a.execute().await?),
        }
    }
}
