#![warn(clippy::perf)]
#![warn(clippy::unwrap_used)]

use anyhow::Context as _;
use clap::Parser;
use regex::Regex;
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    sync::mpsc::UnboundedSender,
};
use tracing::{debug, error, info, warn};
use tracing_unwrap::ResultExt;

use spambot::{
    chat::{self, ChannelSink, Outbound},
    cli::{Cli, Command},
    commands,
    framework::{self, data::BotData, Config},
    Dispatcher, Error, Event,
};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    framework::logging::init_tracing();

    let cli = Cli::parse();
    run(cli).await.expect_or_log("bot should start");
}

async fn run(cli: Cli) -> Result<(), Error> {
    let path = cli.config.clone().unwrap_or_else(Config::path_from_env);

    let config = Config::load(&path)?;
    info!(path = %path.display(), "config loaded");

    if let Some(flavor_text) = config.logs.flavor_text() {
        info!("{flavor_text}")
    }

    match cli.command() {
        Command::Config => println!("{config:#?}"),
        Command::Start => start(config).await?,
    }

    Ok(())
}

async fn start(config: Config) -> Result<(), Error> {
    if let Some(channel) = config.bot.channel() {
        info!(channel, "joining channel");
    }

    let data = BotData::load(config)?;

    let (sink, outbound) = ChannelSink::channel();
    let (dispatcher, events) = Dispatcher::new(data.services(sink), commands::list(&data));

    let printer = tokio::spawn(chat::forward(outbound, print_outbound));

    let sender = dispatcher.sender();
    tokio::spawn(async move {
        if let Err(err) = read_stdin(&sender).await {
            error!("{err:#}");
        }

        if sender.send(Event::Shutdown).is_err() {
            debug!("dispatcher already gone");
        }
    });

    dispatcher.run(events).await;

    // the dispatcher held the last sink, so the printer drains and stops
    if let Err(err) = printer.await {
        error!("outbound printer failed: {err}");
    }

    Ok(())
}

fn print_outbound(action: Outbound) {
    match action {
        Outbound::Say(text) => println!("{text}"),
        Outbound::Timeout { user, seconds } => println!("/timeout {user} {seconds}"),
    }
}

/// Forwards `user: message` lines until stdin closes.
async fn read_stdin(events: &UnboundedSender<Event>) -> anyhow::Result<()> {
    let line_pattern =
        Regex::new(r"^\s*([^\s:]+)\s*:\s?(.*)$").expect("hard-coded regex should be valid");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await.context("couldn't read stdin")? {
        let Some(captures) = line_pattern.captures(&line) else {
            warn!(line, "expected `user: message`");
            continue;
        };

        let event = Event::message(&captures[1], &captures[2]);
        events.send(event).context("dispatcher stopped")?;
    }

    info!("stdin closed, shutting down");
    Ok(())
}
