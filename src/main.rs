use std::sync::Arc;

use dotenvy::dotenv;
use teloxide::dispatching::UpdateHandler;
use teloxide::prelude::*;
use tracing::level_filters;
use tracing_subscriber::fmt::format::FmtSpan;

use quizsharebot::commands::{self, Command};
use quizsharebot::publish::TelegramPublisher;
use quizsharebot::registry::Registry;
use quizsharebot::{directory, intake, keyboard};

#[tokio::main]
async fn main() {
    dotenv().ok();
    let rust_log = std::env::var("LOG_LEVEL").unwrap_or("info".into());
    tracing_subscriber::fmt()
        .with_max_level(level_filters::LevelFilter::from_level(
            rust_log.parse().expect("LOG_LEVEL can't be parsed."),
        ))
        .json()
        .with_span_events(FmtSpan::ENTER)
        .log_internal_errors(true)
        .with_ansi(true)
        .with_line_number(true)
        .with_target(false)
        .init();

    let teloxide_token = std::env::var("TELOXIDE_TOKEN").expect("TELOXIDE_TOKEN should be set.");
    let bot = Bot::new(teloxide_token);
    log::info!("Starting quiz share bot...");

    let registry = Arc::new(Registry::new());
    let publisher = Arc::new(TelegramPublisher::new(bot.clone()));

    Dispatcher::builder(bot, schema())
        .dependencies(dptree::deps![registry, publisher])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await
}

fn schema() -> UpdateHandler<Box<dyn std::error::Error + Send + Sync + 'static>> {
    use dptree::case;

    let command_handler = teloxide::filter_command::<Command, _>()
        .branch(case![Command::Help].endpoint(commands::help))
        .branch(case![Command::Start(payload)].endpoint(commands::start::<TelegramPublisher>))
        .branch(case![Command::Cancel].endpoint(commands::cancel))
        .branch(case![Command::Links].endpoint(commands::list_links));

    let message_handler = Update::filter_message()
        .branch(command_handler)
        .branch(dptree::filter(|msg: Message| msg.poll().is_some()).endpoint(intake::receive_quiz))
        .branch(
            dptree::filter(|msg: Message| msg.text() == Some(keyboard::CANCEL_LABEL))
                .endpoint(commands::cancel),
        );

    dptree::entry()
        .branch(message_handler)
        .branch(Update::filter_inline_query().endpoint(directory::list_quizzes))
}
