//! Card generation UI components
//!
//! Contains keyboards, text messages, and formatters for the `.gen` flow.

use cardgen_core::brand::Brand;
use cardgen_core::card::Batch;
use cardgen_core::command::USAGE;
use cardgen_core::export::ExportFormat;
use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};

// ─────────────────────────────────────────────────────────────────────────────
// Static texts
// ─────────────────────────────────────────────────────────────────────────────

/// Callback answer when an export is requested before any generation
pub const NO_DATA_TEXT: &str = "No recent generation found.";
/// Callback answer for unknown button data
pub const UNSUPPORTED_FORMAT_TEXT: &str = "Unsupported export format.";
/// Callback answer when the export could not be delivered
pub const EXPORT_FAILED_TEXT: &str = "Export failed, please try again.";

/// Welcome text for `/start` and `/help`
#[must_use]
pub fn welcome_message() -> String {
    format!(
        "💳 <b>Test card generator</b>\n\n\
         Send a BIN and I will generate Luhn-valid test numbers with expiry and CVV.\n\n\
         {}\n\n\
         • <code>x&lt;amount&gt;</code> - up to {} cards (default 1)\n\
         • <code>exp=MM|YYYY</code> - fixed expiry (random otherwise)\n\n\
         <i>Numbers are synthetic and do not belong to real accounts.</i>",
        usage_line(),
        cardgen_core::config::MAX_BATCH_SIZE
    )
}

/// Usage line in Telegram HTML
#[must_use]
pub fn usage_line() -> String {
    format!("Usage: <code>{}</code>", html_escape::encode_text(USAGE))
}

/// Reply for a malformed `.gen` command
#[must_use]
pub fn usage_message(reason: &str) -> String {
    format!(
        "⚠️ {}\n\n{}",
        html_escape::encode_text(reason),
        usage_line()
    )
}

/// Button label for an export format
#[must_use]
pub fn export_button_label(format: ExportFormat) -> String {
    format!("⬇️ Export .{}", format.extension())
}

/// Inline keyboard offering every export format
#[must_use]
pub fn export_keyboard() -> InlineKeyboardMarkup {
    let row = ExportFormat::ALL
        .into_iter()
        .map(|format| {
            InlineKeyboardButton::callback(export_button_label(format), format.callback_data())
        })
        .collect::<Vec<_>>();
    InlineKeyboardMarkup::new(vec![row])
}

/// Generation result: header plus the first `preview_limit` records.
///
/// Records past the limit are summarized as `...and N more`; the full batch
/// is available through the export buttons.
#[must_use]
pub fn generation_message(brand: Brand, batch: &Batch, preview_limit: usize) -> String {
    let mut text = format!("💳 <b>{brand} Cards Generated:</b>\n\n");

    let preview = batch
        .records()
        .iter()
        .take(preview_limit)
        .enumerate()
        .map(|(i, record)| format!("{}. <code>{record}</code>", i + 1))
        .collect::<Vec<_>>()
        .join("\n");
    text.push_str(&preview);

    let hidden = batch.len().saturating_sub(preview_limit);
    if hidden > 0 {
        text.push_str(&format!("\n...and {hidden} more"));
    }
    text
}
