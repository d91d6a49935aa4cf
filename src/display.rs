use std::fmt;

use num_format::{Locale, ToFormattedString};
use serde_json::Value;

use crate::event::InboundEvent;

const SEPARATOR_WIDTH: usize = 80;
const MISSING: &str = "N/A";

/// Render an event as the multi-line block printed for every frame.
pub fn render(event: &InboundEvent) -> String {
    EventBlock(event).to_string()
}

/// The printed form of an event: header, optional token and pump sections,
/// closing separator and a trailing blank line.
pub struct EventBlock<'a>(pub &'a InboundEvent);

impl fmt::Display for EventBlock<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let event = self.0;
        let separator = "=".repeat(SEPARATOR_WIDTH);

        writeln!(f, "{separator}")?;
        writeln!(f, "Event Type: {}", text(event.event_type.as_ref()))?;
        writeln!(f, "Timestamp: {}", text(event.timestamp.as_ref()))?;
        writeln!(
            f,
            "Transaction: {}",
            text(event.transaction_signature.as_ref())
        )?;

        if let Some(token) = &event.token {
            writeln!(f, "\nToken Details:")?;
            writeln!(f, "  Mint Address: {}", text(token.mint_address.as_ref()))?;
            writeln!(f, "  Name: {}", text(token.name.as_ref()))?;
            writeln!(f, "  Symbol: {}", text(token.symbol.as_ref()))?;
            writeln!(f, "  Creator: {}", text(token.creator.as_ref()))?;
            writeln!(f, "  Supply: {}", amount(token.supply.as_ref()))?;
            writeln!(f, "  Decimals: {}", text(token.decimals.as_ref()))?;
        }

        if let Some(pump) = &event.pump_data {
            writeln!(f, "\nPump Data:")?;
            writeln!(f, "  Bonding Curve: {}", text(pump.bonding_curve.as_ref()))?;
            writeln!(
                f,
                "  Virtual SOL Reserves: {}",
                amount(pump.virtual_sol_reserves.as_ref())
            )?;
            writeln!(
                f,
                "  Virtual Token Reserves: {}",
                amount(pump.virtual_token_reserves.as_ref())
            )?;
        }

        writeln!(f, "{separator}")?;
        writeln!(f)
    }
}

fn text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => MISSING.to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Like [`text`], but integral numbers get thousands separators.
fn amount(value: Option<&Value>) -> String {
    let Some(Value::Number(n)) = value else {
        return text(value);
    };

    if let Some(v) = n.as_u64() {
        v.to_formatted_string(&Locale::en)
    } else if let Some(v) = n.as_i64() {
        v.to_formatted_string(&Locale::en)
    } else {
        // Integers past u64 arrive as f64; group them while i128 can hold them.
        match n.as_f64() {
            Some(f) if f.fract() == 0.0 && f.abs() < i128::MAX as f64 => {
                (f as i128).to_formatted_string(&Locale::en)
            }
            _ => n.to_string(),
        }
    }
}
