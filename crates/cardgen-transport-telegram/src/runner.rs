use crate::bot;
use crate::bot::handlers::{get_user_id_safe, Command};
use crate::config::BotSettings;
use cardgen_core::service::CardService;
use cardgen_core::session::{InMemorySessionStore, SessionStore};
use std::sync::Arc;
use teloxide::dispatching::UpdateHandler;
use teloxide::prelude::*;
use teloxide::types::CallbackQuery;
use tracing::{debug, error, info};

/// Run the Telegram transport runtime.
pub async fn run_bot(settings: Arc<BotSettings>) {
    let service = init_service(&settings);

    let bot = Bot::new(settings.telegram.telegram_token.clone());
    let handler = setup_handler();

    info!("Bot is running...");

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![service, settings])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;
}

fn init_service(settings: &BotSettings) -> Arc<CardService> {
    let capacity = settings.core.session_cache_capacity;
    match capacity {
        Some(max) => info!("Session cache initialized (max_capacity: {max})."),
        None => info!("Session cache initialized (unbounded)."),
    }
    let store: Arc<dyn SessionStore> = Arc::new(InMemorySessionStore::new(capacity));
    Arc::new(CardService::new(store))
}

fn setup_handler() -> UpdateHandler<teloxide::RequestError> {
    dptree::entry()
        .branch(
            Update::filter_callback_query()
                .filter(|q: CallbackQuery, settings: Arc<BotSettings>| {
                    settings.telegram.is_allowed(q.from.id.0.cast_signed())
                })
                .endpoint(handle_callback),
        )
        .branch(Update::filter_callback_query().endpoint(handle_unauthorized_callback))
        .branch(
            Update::filter_message().branch(
                // Main branch for authorized users
                dptree::filter(|msg: Message, settings: Arc<BotSettings>| {
                    settings.telegram.is_allowed(get_user_id_safe(&msg))
                })
                .branch(
                    dptree::entry()
                        .filter_command::<Command>()
                        .endpoint(handle_command),
                )
                .branch(
                    dptree::filter(|msg: Message| msg.text().is_some()).endpoint(handle_message),
                ),
            ),
        )
        .branch(
            // All who are not in the filter above
            Update::filter_message().endpoint(handle_unauthorized),
        )
}

async fn handle_unauthorized(msg: Message) -> Result<(), teloxide::RequestError> {
    debug!(
        "Ignoring message from unauthorized user {} in chat {}",
        get_user_id_safe(&msg),
        msg.chat.id
    );
    respond(())
}

async fn handle_unauthorized_callback(q: CallbackQuery) -> Result<(), teloxide::RequestError> {
    debug!("Ignoring callback from unauthorized user {}", q.from.id);
    respond(())
}

async fn handle_command(bot: Bot, msg: Message, cmd: Command) -> Result<(), teloxide::RequestError> {
    let res = match cmd {
        Command::Start | Command::Help => bot::handlers::start(bot, msg).await,
    };
    if let Err(e) = res {
        error!("Command error: {}", e);
    }
    respond(())
}

async fn handle_message(
    bot: Bot,
    msg: Message,
    service: Arc<CardService>,
    settings: Arc<BotSettings>,
) -> Result<(), teloxide::RequestError> {
    if let Err(e) = bot::handlers::handle_text(bot, msg, service, settings).await {
        error!("Text handler error: {}", e);
    }
    respond(())
}

async fn handle_callback(
    bot: Bot,
    q: CallbackQuery,
    service: Arc<CardService>,
) -> Result<(), teloxide::RequestError> {
    if let Err(e) = bot::handlers::handle_export_callback(bot, q, service).await {
        error!("Callback handler error: {}", e);
    }
    respond(())
}
