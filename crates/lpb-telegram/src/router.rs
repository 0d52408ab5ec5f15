use std::sync::Arc;

use teloxide::{
    dispatching::Dispatcher, dptree, error_handlers::LoggingErrorHandler, prelude::*,
    update_listeners::Polling,
};
use tokio::sync::Semaphore;
use tracing::info;

use lpb_core::{
    assets::AssetStore,
    config::Config,
    messaging::port::MessagingPort,
    ports::{Publisher, TextGenerator},
    prompt::GithubReadme,
    router::CommandRouter,
    workflow::DraftController,
};

use crate::handlers;
use crate::TelegramMessenger;

#[derive(Clone)]
pub struct AppState {
    pub router: Arc<CommandRouter>,
    /// Caps the number of updates handled at once.
    pub permits: Arc<Semaphore>,
}

pub async fn run_polling(
    cfg: Arc<Config>,
    ai: Arc<dyn TextGenerator>,
    publisher: Arc<dyn Publisher>,
) -> anyhow::Result<()> {
    let bot = Bot::new(cfg.bot_token.clone());
    let me = bot.get_me().await?;
    let bot_name = me.username().to_string();

    let messenger = Arc::new(TelegramMessenger::new(bot.clone()));
    let controller = Arc::new(DraftController::new(
        cfg.owner_id,
        AssetStore::new(&cfg.downloads_dir),
        ai,
        publisher,
        Arc::new(GithubReadme::default()),
        messenger.clone(),
    ));
    let router = Arc::new(CommandRouter::new(
        controller,
        messenger as Arc<dyn MessagingPort>,
        bot_name.clone(),
    ));

    let state = Arc::new(AppState {
        router,
        permits: Arc::new(Semaphore::new(cfg.max_concurrent_updates)),
    });

    let handler = dptree::entry()
        .branch(Update::filter_callback_query().endpoint(handlers::handle_callback))
        .branch(Update::filter_message().endpoint(handlers::handle_message));

    let listener = Polling::builder(bot.clone())
        .timeout(cfg.polling_timeout)
        .drop_pending_updates()
        .build();

    info!(
        bot = %bot_name,
        max_concurrent_updates = cfg.max_concurrent_updates,
        "bot has been started"
    );

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![state])
        // One owner means one chat; do not serialize updates per chat.
        .distribution_function(|_| None::<std::convert::Infallible>)
        .error_handler(LoggingErrorHandler::with_custom_text(
            "an error occurred while handling update",
        ))
        .enable_ctrlc_handler()
        .build()
        .dispatch_with_listener(
            listener,
            LoggingErrorHandler::with_custom_text("an error from the update listener"),
        )
        .await;

    Ok(())
}
