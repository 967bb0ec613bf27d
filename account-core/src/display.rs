//! Presentation helpers
//!
//! Pure formatting used by the demo binary. Nothing in the account core calls
//! these; values keep full precision until they reach this module.

use crate::types::{AccountId, TransactionRecord};
use chrono::{DateTime, TimeZone};
use rust_decimal::Decimal;
use std::fmt::Display;

/// Timestamp layout for history lines
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Two-decimal money string, rounding half to even (`1250.5` -> `1250.50`)
pub fn format_money(amount: Decimal) -> String {
    let mut rounded = amount.round_dp(2);
    rounded.rescale(2);
    rounded.to_string()
}

/// `yyyy-MM-dd HH:mm:ss` in the timestamp's own zone
pub fn format_timestamp<Tz>(timestamp: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    timestamp.format(TIMESTAMP_FORMAT).to_string()
}

/// One statement line for a record, timestamp rendered in `tz`
pub fn format_record_in<Tz>(record: &TransactionRecord, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    format!(
        "[{}] {:<10}: ${:<10} | New Balance: ${}",
        format_timestamp(&record.timestamp.with_timezone(tz)),
        record.kind.as_str(),
        format_money(record.amount),
        format_money(record.resulting_balance),
    )
}

/// One statement line for a record, timestamp in UTC
pub fn format_record(record: &TransactionRecord) -> String {
    format_record_in(record, &chrono::Utc)
}

/// Full statement block for an account
pub fn format_history<Tz>(id: &AccountId, records: &[TransactionRecord], tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let mut out = format!("--- TRANSACTION HISTORY for Account {} ---\n", id);

    if records.is_empty() {
        out.push_str("No transactions recorded yet.\n");
        return out;
    }

    for record in records {
        out.push_str(&format_record_in(record, tz));
        out.push('\n');
    }
    out.push_str("--- END OF HISTORY ---\n");
    out
}

/// Pretty-printed JSON array of records, amounts as exact decimal strings
pub fn history_json(records: &[TransactionRecord]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TransactionKind;
    use chrono::Utc;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn record() -> TransactionRecord {
        TransactionRecord {
            transaction_id: Uuid::now_v7(),
            sequence: 2,
            kind: TransactionKind::Deposit,
            amount: dec!(250.5),
            resulting_balance: dec!(1250.5),
            timestamp: Utc.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap(),
            label: "Standard Deposit".to_string(),
        }
    }

    #[test]
    fn test_format_money() {
        assert_eq!(format_money(dec!(1000)), "1000.00");
        assert_eq!(format_money(dec!(1250.5)), "1250.50");
        assert_eq!(format_money(dec!(0.125)), "0.12");
        assert_eq!(format_money(dec!(0.135)), "0.14");
        assert_eq!(format_money(Decimal::ZERO), "0.00");
    }

    #[test]
    fn test_format_timestamp() {
        let ts = Utc.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap();
        assert_eq!(format_timestamp(&ts), "2024-03-09 14:05:07");
    }

    #[test]
    fn test_format_record() {
        assert_eq!(
            format_record(&record()),
            "[2024-03-09 14:05:07] DEPOSIT   : $250.50     | New Balance: $1250.50"
        );
    }

    #[test]
    fn test_format_history() {
        let id = AccountId::new("S-1");

        let empty = format_history(&id, &[], &Utc);
        assert_eq!(
            empty,
            "--- TRANSACTION HISTORY for Account S-1 ---\nNo transactions recorded yet.\n"
        );

        let full = format_history(&id, &[record()], &Utc);
        let lines: Vec<_> = full.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].starts_with("[2024-03-09 14:05:07] DEPOSIT"));
        assert_eq!(lines[2], "--- END OF HISTORY ---");
    }

    #[test]
    fn test_history_json() {
        assert_eq!(history_json(&[]).unwrap(), "[]");

        let json = history_json(&[record()]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[0]["sequence"], 2);
        assert_eq!(value[0]["kind"], "DEPOSIT");
        assert_eq!(value[0]["amount"], "250.5");
        assert_eq!(value[0]["resulting_balance"], "1250.5");
        assert_eq!(value[0]["label"], "Standard Deposit");
        assert!(json.contains('\n'));
    }
}
