//! Ticket notification payloads — decoding and body formatting.
//!
//! A record's payload is UTF-8 JSON of the shape
//! `{"email": "...", "ticketData": {...}}`. Decoding is all-or-nothing:
//! a record either yields a complete [`TicketNotification`] or is rejected
//! with a typed [`DecodeError`] for the poller to log and skip.

use serde::Deserialize;

use crate::error::DecodeError;

/// One fully validated ticket-price notification.
///
/// Built from a single stream record, consumed by the formatter, then
/// discarded. Never mutated after construction.
#[derive(Debug, Clone)]
pub struct TicketNotification {
    /// Destination mail address, guaranteed non-empty.
    pub recipient: String,
    pub ticket: TicketData,
}

/// Route details carried under the payload's `ticketData` key.
#[derive(Debug, Clone, Deserialize)]
pub struct TicketData {
    pub origin: String,
    pub destination: String,
    /// Opaque departure timestamp — rendered verbatim, never parsed.
    pub departure_at: String,
    /// Numeric or string price — rendered verbatim.
    pub price: serde_json::Value,
    /// 0 = direct route, anything else = connecting route.
    pub transfers: i64,
    pub link: String,
}

/// Decode a raw record payload into a [`TicketNotification`].
///
/// Pure function of its input; every failure mode is a distinct
/// [`DecodeError`] variant.
pub fn decode(raw: &[u8]) -> Result<TicketNotification, DecodeError> {
    let text = std::str::from_utf8(raw)?;
    let value: serde_json::Value = serde_json::from_str(text)?;

    let recipient = value
        .get("email")
        .and_then(|v| v.as_str())
        .filter(|s| !s.is_empty())
        .ok_or(DecodeError::MissingRecipient)?
        .to_string();

    let ticket_data = value
        .get("ticketData")
        .cloned()
        .ok_or_else(|| DecodeError::MissingTicketData("missing ticketData key".into()))?;
    let ticket: TicketData = serde_json::from_value(ticket_data)
        .map_err(|e| DecodeError::MissingTicketData(e.to_string()))?;

    Ok(TicketNotification { recipient, ticket })
}

/// Render the fixed notification template for one ticket.
///
/// Deterministic and total: the same notification always yields a
/// byte-identical body.
pub fn format_body(n: &TicketNotification) -> String {
    let t = &n.ticket;
    format!(
        "Текущая информация по маршруту {} -> {} \n\
         Дата/время отправления: {}\n\n\
         Цена: {} руб;\n\
         {}; \n\
         Билет: {}",
        t.origin,
        t.destination,
        t.departure_at,
        verbatim(&t.price),
        transfers_clause(t.transfers),
        t.link,
    )
}

/// Transfer-status clause: direct vs. connecting route.
fn transfers_clause(transfers: i64) -> &'static str {
    if transfers == 0 {
        "Без пересадок"
    } else {
        "С пересадками"
    }
}

/// Render a JSON value verbatim — strings lose their quotes, everything
/// else keeps its JSON spelling.
fn verbatim(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

// ── Tests ───────────────────────────────────────────────────────────
