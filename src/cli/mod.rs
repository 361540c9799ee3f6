use std::path::PathBuf;

#[derive(clap::Parser, Debug)]
#[command(version, about = "A chat bot with games, quotes and canned replies")]
pub struct Cli {
    /// Config file to use instead of `$SPAMBOT_TOML` or `./spambot.toml`
    #[arg(long)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(clap::Subcommand, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Print the parsed config and exit
    Config,

    /// Read `user: message` lines from stdin and chat on stdout
    #[default]
    Start,
}

impl Cli {
    pub fn command(&self) -> Command {
        self.command.unwrap_or_default()
    }
}

impl Command {
    pub fn is_start(&self) -> bool {
        matches!(self, Self::Start)
    }
}
