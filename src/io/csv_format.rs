//! CSV format handling for call scripts and ledger reports
//!
//! This module centralizes all CSV format concerns, providing:
//! - CsvCall structure for deserialization of call-script rows
//! - Conversion from CSV rows to `CallRequest`s
//! - Native-currency value parsing (`wei`, `gwei`, `ether` units)
//! - Report serialization (balances, events, summary)
//!
//! All functions are pure (no file I/O) for easy testing.

use crate::cli::ReportKind;
use crate::core::LedgerView;
use crate::types::{AccountId, Amount, Call, CallRequest, LedgerError, LedgerEvent};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::io::Write;
use std::str::FromStr;

/// Base units per `gwei`
const WEI_PER_GWEI: u64 = 1_000_000_000;
/// Base units per `ether`
const WEI_PER_ETHER: u64 = 1_000_000_000_000_000_000;

/// CSV record structure for deserialization
///
/// Matches the call-script format with columns: caller, op, to, amount,
/// value, data. Every column after `op` is optional because each operation
/// only uses some of them.
#[derive(Debug, Deserialize, Clone, PartialEq, Default)]
pub struct CsvCall {
    pub caller: String,
    pub op: String,
    pub to: Option<String>,
    pub amount: Option<String>,
    pub value: Option<String>,
    pub data: Option<String>,
}

/// Convert a CsvCall to a CallRequest
///
/// This function:
/// - Parses the caller and recipient identities
/// - Maps the operation name (case insensitive) to a `Call`
/// - Parses the token amount and the attached native-currency value
/// - Decodes the hex payload for `send`
///
/// # Arguments
///
/// * `csv_call` - The deserialized CSV record
///
/// # Returns
///
/// Result containing either:
/// - Ok(CallRequest) - Successfully converted call
/// - Err(String) - Error message describing the conversion failure
pub fn convert_csv_call(csv_call: CsvCall) -> Result<CallRequest, String> {
    let caller = parse_account(&csv_call.caller, "caller")?;
    let value = match non_empty(&csv_call.value) {
        Some(raw) => parse_value(raw)?,
        None => 0,
    };

    let call = match csv_call.op.to_lowercase().as_str() {
        "issue" | "addtokens" => Call::Issue {
            to: required_account(&csv_call.to, &csv_call.op)?,
            amount: required_amount(&csv_call.amount, &csv_call.op)?,
        },
        "transfer" | "transfertoken" => Call::Transfer {
            to: required_account(&csv_call.to, &csv_call.op)?,
            amount: required_amount(&csv_call.amount, &csv_call.op)?,
        },
        "deposit" => Call::Deposit,
        "send" => Call::Send {
            payload: match non_empty(&csv_call.data) {
                Some(raw) => parse_payload(raw)?,
                None => Vec::new(),
            },
        },
        _ => return Err(format!("Invalid operation: '{}'", csv_call.op)),
    };

    Ok(CallRequest::new(caller, value, call))
}

/// Parse a native-currency value into base units
///
/// Accepts a plain integer (`1500`) or a decimal with a unit suffix
/// (`0.01ether`, `2gwei`, `10wei`). The result must be a whole number of
/// base units.
pub fn parse_value(raw: &str) -> Result<Amount, String> {
    let trimmed = raw.trim();
    let lower = trimmed.to_ascii_lowercase();

    let (number, multiplier) = if let Some(number) = lower.strip_suffix("gwei") {
        (number, WEI_PER_GWEI)
    } else if let Some(number) = lower.strip_suffix("ether") {
        (number, WEI_PER_ETHER)
    } else if let Some(number) = lower.strip_suffix("wei") {
        (number, 1)
    } else {
        return Amount::from_str(trimmed).map_err(|_| format!("Invalid value '{}'", raw));
    };

    let number = number.trim();
    if number.starts_with('-') {
        return Err(format!("Negative value '{}'", raw));
    }
    let (whole, fraction) = number.split_once('.').unwrap_or((number, ""));
    let invalid = || format!("Invalid value '{}'", raw);
    let too_large = || format!("Value '{}' is too large", raw);

    // Decimal holds only 28 digits; scale the whole part in u128
    let whole_units = if whole.is_empty() {
        0
    } else {
        Amount::from_str(whole)
            .map_err(|_| invalid())?
            .checked_mul(Amount::from(multiplier))
            .ok_or_else(too_large)?
    };

    let fraction_units = if fraction.is_empty() {
        if whole.is_empty() {
            return Err(invalid());
        }
        0
    } else {
        if !fraction.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let scaled = Decimal::from_str(&format!("0.{}", fraction))
            .map_err(|_| invalid())?
            .checked_mul(Decimal::from(multiplier))
            .ok_or_else(too_large)?;
        if !scaled.fract().is_zero() {
            return Err(format!("Value '{}' is not a whole number of wei", raw));
        }
        scaled.to_u128().ok_or_else(too_large)?
    };

    whole_units.checked_add(fraction_units).ok_or_else(too_large)
}

/// Decode a hex payload, with or without a `0x` prefix
pub fn parse_payload(raw: &str) -> Result<Vec<u8>, String> {
    let trimmed = raw.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    hex::decode(digits).map_err(|e| format!("Invalid data '{}': {}", raw, e))
}

fn parse_account(raw: &str, field: &str) -> Result<AccountId, String> {
    AccountId::from_str(raw).map_err(|e| format!("Invalid {} '{}': {}", field, raw, e))
}

fn required_account(raw: &Option<String>, op: &str) -> Result<AccountId, String> {
    match non_empty(raw) {
        Some(raw) => parse_account(raw, "recipient"),
        None => Err(format!("Operation '{}' requires a recipient", op)),
    }
}

fn required_amount(raw: &Option<String>, op: &str) -> Result<Amount, String> {
    match non_empty(raw) {
        Some(raw) => Amount::from_str(raw).map_err(|_| format!("Invalid amount '{}'", raw)),
        None => Err(format!("Operation '{}' requires an amount", op)),
    }
}

fn non_empty(field: &Option<String>) -> Option<&str> {
    field
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

/// Write the selected report for a ledger
pub fn write_report(
    kind: ReportKind,
    view: &impl LedgerView,
    output: &mut dyn Write,
) -> Result<(), LedgerError> {
    match kind {
        ReportKind::Balances => write_balances_csv(view, output),
        ReportKind::Events => write_events_csv(view, output),
        ReportKind::Summary => write_summary_csv(view, output),
    }
}

/// Write account balances to CSV format
///
/// Writes balances with columns: account, balance. Accounts are sorted by
/// identity for deterministic output.
///
/// # Arguments
///
/// * `view` - Ledger (or snapshot) to report on
/// * `output` - Mutable reference to a writer for outputting CSV
///
/// # Returns
///
/// * `Ok(())` if writing succeeded
/// * `Err(LedgerError)` if a write error occurred
pub fn write_balances_csv(
    view: &impl LedgerView,
    output: &mut dyn Write,
) -> Result<(), LedgerError> {
    let mut writer = csv::Writer::from_writer(output);

    writer.write_record(["account", "balance"])?;
    for (account, balance) in view.accounts() {
        writer.write_record(&[account.to_string(), balance.to_string()])?;
    }

    writer.flush()?;
    Ok(())
}

/// Write the event log to CSV format
///
/// Columns: seq, kind, from, to, value, path. Transfer rows leave `path`
/// empty; deposit rows leave `to` empty.
pub fn write_events_csv(view: &impl LedgerView, output: &mut dyn Write) -> Result<(), LedgerError> {
    let mut writer = csv::Writer::from_writer(output);

    writer.write_record(["seq", "kind", "from", "to", "value", "path"])?;
    for event in view.event_log() {
        let row = match event {
            LedgerEvent::Transfer(record) => [
                record.seq.to_string(),
                "transfer".to_string(),
                record.from.to_string(),
                record.to.to_string(),
                record.value.to_string(),
                String::new(),
            ],
            LedgerEvent::Deposit(record) => [
                record.seq.to_string(),
                "deposit".to_string(),
                record.from.to_string(),
                String::new(),
                record.value.to_string(),
                record.path.to_string(),
            ],
        };
        writer.write_record(&row)?;
    }

    writer.flush()?;
    Ok(())
}

/// Write headline ledger figures as key/value rows
pub fn write_summary_csv(view: &impl LedgerView, output: &mut dyn Write) -> Result<(), LedgerError> {
    let mut writer = csv::Writer::from_writer(output);

    writer.write_record(["key", "value"])?;
    let rows = [
        ("administrator", view.administrator().to_string()),
        ("total_supply", view.total_supply().to_string()),
        ("escrow_balance", view.escrow_balance().to_string()),
        ("fees_routed", view.fees_routed().to_string()),
        ("fees_burned", view.fees_burned().to_string()),
        ("latest_seq", view.latest_seq().to_string()),
        ("accounts", view.accounts().len().to_string()),
        ("events", view.event_log().len().to_string()),
    ];
    for (key, value) in rows {
        writer.write_record(&[key.to_string(), value])?;
    }

    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Ledger, LedgerConfig};
    use rstest::rstest;

    const ADMIN: &str = "0x00000000000000000000000000000000000000ad";
    const ALICE: &str = "0x000000000000000000000000000000000000000a";

    fn csv_call(op: &str, to: Option<&str>, amount: Option<&str>) -> CsvCall {
        CsvCall {
            caller: ADMIN.to_string(),
            op: op.to_string(),
            to: to.map(str::to_string),
            amount: amount.map(str::to_string),
            ..CsvCall::default()
        }
    }

    #[rstest]
    #[case::issue("issue")]
    #[case::add_tokens_alias("addTokens")]
    #[case::upper_case("ISSUE")]
    fn test_convert_issue(#[case] op: &str) {
        let request = convert_csv_call(csv_call(op, Some(ALICE), Some("10000"))).unwrap();

        assert_eq!(request.caller, AccountId::from_low_u64(0xad));
        assert_eq!(request.value, 0);
        assert_eq!(
            request.call,
            Call::Issue {
                to: AccountId::from_low_u64(0xa),
                amount: 10_000
            }
        );
    }

    #[rstest]
    #[case::transfer("transfer")]
    #[case::transfer_token_alias("transferToken")]
    fn test_convert_transfer(#[case] op: &str) {
        let request = convert_csv_call(csv_call(op, Some(ALICE), Some(" 1000 "))).unwrap();
        assert_eq!(
            request.call,
            Call::Transfer {
                to: AccountId::from_low_u64(0xa),
                amount: 1_000
            }
        );
    }

    #[test]
    fn test_convert_send_with_payload() {
        let record = CsvCall {
            caller: ALICE.to_string(),
            op: "send".to_string(),
            value: Some("0.01ether".to_string()),
            data: Some("0x12345678".to_string()),
            ..CsvCall::default()
        };

        let request = convert_csv_call(record).unwrap();

        assert_eq!(request.value, 10_000_000_000_000_000);
        assert_eq!(
            request.call,
            Call::Send {
                payload: vec![0x12, 0x34, 0x56, 0x78]
            }
        );
    }

    #[test]
    fn test_convert_send_without_payload() {
        let record = CsvCall {
            caller: ALICE.to_string(),
            op: "send".to_string(),
            value: Some("5".to_string()),
            data: Some("".to_string()),
            ..CsvCall::default()
        };

        let request = convert_csv_call(record).unwrap();
        assert_eq!(request.call, Call::Send { payload: vec![] });
    }

    #[rstest]
    #[case::invalid_op(csv_call("mint", Some(ALICE), Some("1")), "Invalid operation")]
    #[case::missing_recipient(csv_call("issue", None, Some("1")), "requires a recipient")]
    #[case::missing_amount(csv_call("transfer", Some(ALICE), None), "requires an amount")]
    #[case::blank_amount(csv_call("transfer", Some(ALICE), Some("  ")), "requires an amount")]
    #[case::invalid_amount(csv_call("issue", Some(ALICE), Some("-5")), "Invalid amount")]
    #[case::invalid_recipient(csv_call("issue", Some("0x1234"), Some("5")), "Invalid recipient")]
    #[case::invalid_caller(
        CsvCall { caller: "alice".to_string(), op: "deposit".to_string(), ..CsvCall::default() },
        "Invalid caller"
    )]
    #[case::invalid_payload(
        CsvCall {
            caller: ALICE.to_string(),
            op: "send".to_string(),
            data: Some("0xzz".to_string()),
            ..CsvCall::default()
        },
        "Invalid data"
    )]
    fn test_convert_errors(#[case] record: CsvCall, #[case] expected_error: &str) {
        let result = convert_csv_call(record);
        assert!(result.unwrap_err().contains(expected_error));
    }

    #[rstest]
    #[case::plain_integer("1500", 1_500)]
    #[case::wei("10wei", 10)]
    #[case::gwei("2gwei", 2_000_000_000)]
    #[case::fractional_gwei("1.5gwei", 1_500_000_000)]
    #[case::one_ether("1ether", 1_000_000_000_000_000_000)]
    #[case::hundredth_ether("0.01ether", 10_000_000_000_000_000)]
    #[case::upper_case_unit(" 0.5ETHER ", 500_000_000_000_000_000)]
    #[case::leading_point(".25ether", 250_000_000_000_000_000)]
    #[case::beyond_decimal_range("100000000000ether", 100_000_000_000 * 1_000_000_000_000_000_000)]
    #[case::large_with_fraction(
        "100000000000.5ether",
        100_000_000_000 * 1_000_000_000_000_000_000 + 500_000_000_000_000_000
    )]
    fn test_parse_value(#[case] raw: &str, #[case] expected: Amount) {
        assert_eq!(parse_value(raw), Ok(expected));
    }

    #[rstest]
    #[case::fraction_of_wei("0.5wei", "not a whole number")]
    #[case::negative("-1ether", "Negative value")]
    #[case::garbage("lots", "Invalid value")]
    #[case::bad_number("x.yether", "Invalid value")]
    #[case::bad_fraction("1.x5gwei", "Invalid value")]
    #[case::no_digits("ether", "Invalid value")]
    #[case::too_large("1000000000000000000000ether", "too large")]
    fn test_parse_value_errors(#[case] raw: &str, #[case] expected_error: &str) {
        assert!(parse_value(raw).unwrap_err().contains(expected_error));
    }

    fn sample_ledger() -> Ledger {
        let admin = AccountId::from_low_u64(0xad);
        let alice = AccountId::from_low_u64(0xa);
        let bob = AccountId::from_low_u64(0xb);

        let mut ledger = Ledger::new(LedgerConfig::new(admin)).unwrap();
        ledger.issue(admin, alice, 10_000).unwrap();
        ledger.transfer_token(alice, bob, 1_000).unwrap();
        ledger.receive(bob, 42, vec![0x12]).unwrap();
        ledger
    }

    #[test]
    fn test_write_balances_csv() {
        let mut output = Vec::new();
        write_balances_csv(&sample_ledger(), &mut output).unwrap();

        let expected = "account,balance\n\
            0x000000000000000000000000000000000000000a,9000\n\
            0x000000000000000000000000000000000000000b,990\n\
            0x00000000000000000000000000000000000000ad,10\n";
        assert_eq!(String::from_utf8(output).unwrap(), expected);
    }

    #[test]
    fn test_write_events_csv() {
        let mut output = Vec::new();
        write_events_csv(&sample_ledger(), &mut output).unwrap();

        let expected = "seq,kind,from,to,value,path\n\
            1,transfer,0x0000000000000000000000000000000000000000,0x000000000000000000000000000000000000000a,10000,\n\
            2,transfer,0x000000000000000000000000000000000000000a,0x000000000000000000000000000000000000000b,990,\n\
            3,deposit,0x000000000000000000000000000000000000000b,,42,fallback\n";
        assert_eq!(String::from_utf8(output).unwrap(), expected);
    }

    #[test]
    fn test_write_summary_csv() {
        let mut output = Vec::new();
        write_summary_csv(&sample_ledger(), &mut output).unwrap();

        let expected = "key,value\n\
            administrator,0x00000000000000000000000000000000000000ad\n\
            total_supply,10000\n\
            escrow_balance,42\n\
            fees_routed,10\n\
            fees_burned,0\n\
            latest_seq,3\n\
            accounts,3\n\
            events,3\n";
        assert_eq!(String::from_utf8(output).unwrap(), expected);
    }

    #[test]
    fn test_write_balances_csv_empty_ledger() {
        let ledger = Ledger::new(LedgerConfig::new(AccountId::from_low_u64(1))).unwrap();
        let mut output = Vec::new();
        write_report(ReportKind::Balances, &ledger, &mut output).unwrap();
        assert_eq!(String::from_utf8(output).unwrap(), "account,balance\n");
    }
}
