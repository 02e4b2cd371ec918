use crate::bot::resilient::{send_export_resilient, send_message_resilient};
use crate::bot::views::{
    export_keyboard, generation_message, usage_message, welcome_message, EXPORT_FAILED_TEXT,
    NO_DATA_TEXT, UNSUPPORTED_FORMAT_TEXT,
};
use crate::config::BotSettings;
use anyhow::{anyhow, Result};
use cardgen_core::command::parse_generate;
use cardgen_core::export::ExportFormat;
use cardgen_core::service::CardService;
use cardgen_core::session::ConversationId;
use cardgen_core::CardGenError;
use std::sync::Arc;
use teloxide::{prelude::*, types::ParseMode, utils::command::BotCommands};
use tracing::{debug, error, info, warn};

// Helper function to get user name from Message
fn get_user_name(msg: &Message) -> String {
    if let Some(ref user) = msg.from {
        if let Some(ref username) = user.username {
            return username.clone();
        }
        if !user.first_name.is_empty() {
            return user.first_name.clone();
        }
    }
    "Unknown".to_string()
}

/// Safe extraction of user ID from a message.
/// Returns 0 if the user information is missing.
pub fn get_user_id_safe(msg: &Message) -> i64 {
    msg.from.as_ref().map_or(0, |u| u.id.0.cast_signed())
}

/// Cache key for a chat.
#[must_use]
pub const fn conversation_of(chat_id: ChatId) -> ConversationId {
    ConversationId(chat_id.0)
}

/// Supported commands for the bot
#[derive(BotCommands, Clone)]
#[command(rename_rule = "lowercase", description = "Supported commands:")]
pub enum Command {
    /// Start the bot and show welcome message
    #[command(description = "Start the bot.")]
    Start,
    /// Show usage
    #[command(description = "Show usage.")]
    Help,
}

/// Start and help handler
///
/// # Errors
///
/// Returns an error if the welcome message cannot be sent.
pub async fn start(bot: Bot, msg: Message) -> Result<()> {
    let user_id = get_user_id_safe(&msg);
    let user_name = get_user_name(&msg);
    info!("User {user_id} ({user_name}) requested usage.");

    send_message_resilient(
        &bot,
        msg.chat.id,
        welcome_message(),
        Some(ParseMode::Html),
        None,
    )
    .await?;
    Ok(())
}

/// Text message handler for `.gen` commands
///
/// Messages that are not `.gen` commands are ignored.
///
/// # Errors
///
/// Returns an error if the reply cannot be sent.
pub async fn handle_text(
    bot: Bot,
    msg: Message,
    service: Arc<CardService>,
    settings: Arc<BotSettings>,
) -> Result<()> {
    let text = msg.text().unwrap_or("");
    let user_id = get_user_id_safe(&msg);

    let request = match parse_generate(text) {
        Ok(Some(request)) => request,
        Ok(None) => return Ok(()),
        Err(e) => {
            debug!("Rejected .gen from user {user_id}: {e}");
            let reason = match e {
                CardGenError::InvalidInput(reason) => reason,
                other => other.to_string(),
            };
            send_message_resilient(
                &bot,
                msg.chat.id,
                usage_message(&reason),
                Some(ParseMode::Html),
                None,
            )
            .await?;
            return Ok(());
        }
    };

    info!(
        "User {user_id} ({}) requested {} cards for BIN {}",
        get_user_name(&msg),
        request.count.get(),
        request.bin
    );

    let outcome = service
        .generate(conversation_of(msg.chat.id), &request)
        .await;

    let reply = generation_message(outcome.brand, &outcome.batch, settings.core.preview_limit);
    send_message_resilient(
        &bot,
        msg.chat.id,
        reply,
        Some(ParseMode::Html),
        Some(export_keyboard()),
    )
    .await?;
    Ok(())
}

/// Handle export inline keyboard callbacks.
///
/// # Errors
///
/// Returns an error if Telegram API calls fail.
pub async fn handle_export_callback(
    bot: Bot,
    q: CallbackQuery,
    service: Arc<CardService>,
) -> Result<()> {
    let Some(data) = q.data.as_deref() else {
        return Ok(());
    };

    let chat_id = q
        .message
        .as_ref()
        .map(|msg| msg.chat().id)
        .ok_or_else(|| anyhow!("Callback message missing chat id"))?;

    let format = match ExportFormat::from_callback_data(data) {
        Ok(format) => format,
        Err(e) => {
            warn!("Ignoring callback from chat {chat_id}: {e}");
            bot.answer_callback_query(q.id.clone())
                .text(UNSUPPORTED_FORMAT_TEXT)
                .await?;
            return Ok(());
        }
    };

    let file = match service.export(conversation_of(chat_id), format).await {
        Ok(file) => file,
        Err(CardGenError::NoData) => {
            info!("Export ({format}) requested in chat {chat_id} with nothing cached");
            bot.answer_callback_query(q.id.clone())
                .text(NO_DATA_TEXT)
                .await?;
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    let _ = bot.answer_callback_query(q.id.clone()).await;

    info!("Sending {} to chat {chat_id}", file.filename);
    if let Err(e) = send_export_resilient(&bot, chat_id, file).await {
        error!("Failed to deliver export to chat {chat_id}: {e}");
        send_message_resilient(&bot, chat_id, EXPORT_FAILED_TEXT, None, None).await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_parsing() {
        assert!(matches!(
            Command::parse("/start", "cardgen_bot"),
            Ok(Command::Start)
        ));
        assert!(matches!(
            Command::parse("/help", "cardgen_bot"),
            Ok(Command::Help)
        ));
        assert!(Command::parse(".gen 4111", "cardgen_bot").is_err());
    }

    #[test]
    fn test_conversation_is_chat_id() {
        assert_eq!(conversation_of(ChatId(-1001)), ConversationId(-1001));
    }
}
