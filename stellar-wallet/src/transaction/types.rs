//! Horizon response types and the summaries built from them

use chrono::DateTime;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Stroops per lumen
pub const STROOPS_PER_XLM: i64 = 10_000_000;

/// Base reserve in XLM, charged per base entry and per subentry
pub const BASE_RESERVE_XLM: f64 = 0.5;

/// Fee used when Horizon fee stats are unavailable
pub const DEFAULT_BASE_FEE: u64 = 100;

/// Horizon sends some integers as strings depending on the endpoint/version
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum StringOrNumber {
    Number(u64),
    String(String),
}

impl StringOrNumber {
    /// Numeric value, if it parses
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            StringOrNumber::Number(value) => Some(*value),
            StringOrNumber::String(value) => value.trim().parse().ok(),
        }
    }
}

/// One balance line of a Horizon account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HorizonBalance {
    pub balance: String,
    pub asset_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset_issuer: Option<String>,
}

/// `GET /accounts/{id}`
#[derive(Debug, Clone, Deserialize)]
pub struct HorizonAccount {
    pub account_id: String,
    pub sequence: String,
    #[serde(default)]
    pub subentry_count: u32,
    #[serde(default)]
    pub num_sponsoring: u32,
    #[serde(default)]
    pub num_sponsored: u32,
    #[serde(default)]
    pub last_modified_ledger: u64,
    #[serde(default)]
    pub balances: Vec<HorizonBalance>,
}

/// Account summary returned by the ledger client
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccountBalance {
    pub address: String,
    /// Native balance in XLM
    pub balance_xlm: f64,
    pub sequence: String,
    pub subentry_count: u32,
    pub num_sponsoring: u32,
    pub num_sponsored: u32,
    /// Minimum balance: (2 + subentries) * base reserve
    pub min_balance_xlm: f64,
    pub last_modified_ledger: u64,
    /// Every balance line, native included
    pub balances: Vec<HorizonBalance>,
}

impl From<HorizonAccount> for AccountBalance {
    fn from(account: HorizonAccount) -> Self {
        let balance_xlm = account
            .balances
            .iter()
            .find(|b| b.asset_type == "native")
            .and_then(|b| b.balance.parse::<f64>().ok())
            .unwrap_or(0.0);

        Self {
            address: account.account_id,
            balance_xlm,
            sequence: account.sequence,
            subentry_count: account.subentry_count,
            num_sponsoring: account.num_sponsoring,
            num_sponsored: account.num_sponsored,
            min_balance_xlm: (2.0 + account.subentry_count as f64) * BASE_RESERVE_XLM,
            last_modified_ledger: account.last_modified_ledger,
            balances: account.balances,
        }
    }
}

/// `_embedded.records` wrapper of Horizon collection responses
#[derive(Debug, Clone, Deserialize)]
pub struct HorizonPage<T> {
    #[serde(rename = "_embedded")]
    pub embedded: HorizonRecords<T>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HorizonRecords<T> {
    #[serde(default = "Vec::new")]
    pub records: Vec<T>,
}

/// One record of `/accounts/{id}/transactions` or `/transactions/{hash}`
#[derive(Debug, Clone, Deserialize)]
pub struct HorizonTransaction {
    pub id: String,
    #[serde(default)]
    pub paging_token: String,
    pub hash: String,
    pub ledger: u64,
    pub created_at: String,
    pub source_account: String,
    #[serde(default)]
    pub fee_charged: Option<StringOrNumber>,
    #[serde(default)]
    pub max_fee: Option<StringOrNumber>,
    #[serde(default)]
    pub operation_count: u32,
    #[serde(default)]
    pub successful: bool,
    #[serde(default)]
    pub memo: Option<String>,
    #[serde(default)]
    pub memo_type: Option<String>,
}

/// One record of `/transactions/{hash}/operations`
///
/// Only the fields of `payment` and `create_account` are modelled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HorizonOperation {
    #[serde(rename = "type")]
    pub op_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub funder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub starting_balance: Option<String>,
}

/// Kind of the operation a transaction was summarized from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    Payment,
    CreateAccount,
    Other,
}

/// Direction of a transaction relative to the queried account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionDirection {
    Sent,
    Received,
    Other,
}

/// A transaction summarized for display
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransactionRecord {
    pub id: String,
    pub hash: String,
    pub paging_token: String,
    pub ledger: u64,
    pub created_at: String,
    /// Unix seconds, 0 when `created_at` does not parse
    pub timestamp: i64,
    pub source_account: String,
    pub fee_stroops: u64,
    pub fee_xlm: f64,
    pub operation_count: u32,
    pub successful: bool,
    pub kind: OperationKind,
    pub direction: TransactionDirection,
    pub sender: String,
    pub receiver: Option<String>,
    pub amount_xlm: f64,
    pub memo: Option<String>,
    pub memo_type: Option<String>,
    /// Operations, only filled for single-transaction lookups
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub operations: Vec<HorizonOperation>,
}

/// Summarize a transaction from its first payment-like operation
///
/// `perspective` is the account the history is viewed from; without one the
/// direction is always `Other`.
pub fn summarize_transaction(
    tx: &HorizonTransaction,
    operations: &[HorizonOperation],
    perspective: Option<&str>,
) -> TransactionRecord {
    let fee_stroops = tx
        .fee_charged
        .as_ref()
        .and_then(StringOrNumber::as_u64)
        .or_else(|| tx.max_fee.as_ref().and_then(StringOrNumber::as_u64))
        .unwrap_or(0);

    let timestamp = DateTime::parse_from_rfc3339(&tx.created_at)
        .map(|dt| dt.timestamp())
        .unwrap_or(0);

    let payment = operations
        .iter()
        .find(|op| op.op_type == "payment" || op.op_type == "create_account");

    let mut kind = OperationKind::Other;
    let mut sender = tx.source_account.clone();
    let mut receiver = None;
    let mut amount_xlm = 0.0;

    if let Some(op) = payment {
        if op.op_type == "payment" {
            kind = OperationKind::Payment;
            sender = op.from.clone().unwrap_or_else(|| tx.source_account.clone());
            receiver = op.to.clone();
            amount_xlm = parse_amount(op.amount.as_deref());
        } else {
            kind = OperationKind::CreateAccount;
            sender = op.funder.clone().unwrap_or_else(|| tx.source_account.clone());
            receiver = op.account.clone();
            amount_xlm = parse_amount(op.starting_balance.as_deref());
        }
    }

    let direction = match (kind, perspective) {
        (OperationKind::Other, _) | (_, None) => TransactionDirection::Other,
        (_, Some(address)) if sender == address => TransactionDirection::Sent,
        (_, Some(_)) => TransactionDirection::Received,
    };

    TransactionRecord {
        id: tx.id.clone(),
        hash: tx.hash.clone(),
        paging_token: tx.paging_token.clone(),
        ledger: tx.ledger,
        created_at: tx.created_at.clone(),
        timestamp,
        source_account: tx.source_account.clone(),
        fee_stroops,
        fee_xlm: fee_stroops as f64 / STROOPS_PER_XLM as f64,
        operation_count: tx.operation_count,
        successful: tx.successful,
        kind,
        direction,
        sender,
        receiver,
        amount_xlm,
        memo: tx.memo.clone(),
        memo_type: tx.memo_type.clone(),
        operations: Vec::new(),
    }
}

fn parse_amount(amount: Option<&str>) -> f64 {
    amount.and_then(|a| a.parse::<f64>().ok()).unwrap_or(0.0)
}

/// Query parameters for an account's transaction history
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionQuery {
    pub limit: u32,
    pub cursor: Option<String>,
    /// Newest first when true
    pub descending: bool,
}

impl Default for TransactionQuery {
    fn default() -> Self {
        Self {
            limit: 10,
            cursor: None,
            descending: true,
        }
    }
}

/// One page of an account's transaction history
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransactionPage {
    pub transactions: Vec<TransactionRecord>,
    /// Paging token of the last record, pass it back as the next cursor
    pub next_cursor: Option<String>,
    /// A full page was returned, so there may be more
    pub has_more: bool,
}

impl TransactionPage {
    /// Assemble a page from summarized records
    pub fn new(transactions: Vec<TransactionRecord>, limit: u32) -> Self {
        let next_cursor = transactions.last().map(|tx| tx.paging_token.clone());
        let has_more = transactions.len() == limit as usize;
        Self {
            transactions,
            next_cursor,
            has_more,
        }
    }
}

/// `GET /fee_stats` (only the field we read)
#[derive(Debug, Clone, Deserialize)]
pub struct HorizonFeeStats {
    #[serde(default)]
    pub last_ledger_base_fee: Option<StringOrNumber>,
}

/// Parameters needed by a caller building a transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeeParams {
    /// Base fee in stroops
    pub base_fee: u64,
    pub network_passphrase: String,
}

/// Successful `POST /transactions`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitResult {
    pub hash: String,
    pub ledger: u64,
    #[serde(default = "default_true")]
    pub successful: bool,
}

fn default_true() -> bool {
    true
}

/// Horizon problem document
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HorizonError {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub status: Option<u16>,
    #[serde(default)]
    pub extras: Option<HorizonErrorExtras>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct HorizonErrorExtras {
    #[serde(default)]
    pub result_codes: Option<HorizonResultCodes>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct HorizonResultCodes {
    #[serde(default)]
    pub transaction: Option<String>,
    #[serde(default)]
    pub operations: Option<Vec<String>>,
}

impl HorizonError {
    /// Human readable message, with the result codes when Horizon sent them
    pub fn describe(&self) -> String {
        let mut message = self.title.clone().unwrap_or_else(|| "Transaction failed".to_string());

        if let Some(codes) = self.extras.as_ref().and_then(|e| e.result_codes.as_ref()) {
            let detail = codes
                .transaction
                .clone()
                .or_else(|| codes.operations.as_ref().map(|ops| ops.join(", ")))
                .unwrap_or_else(|| "Unknown error".to_string());
            message.push_str(": ");
            message.push_str(&detail);
        }

        message
    }
}

/// Render an XLM amount with the 7 decimals Stellar uses
pub fn format_xlm(amount: f64) -> String {
    format!("{:.7}", amount)
}

/// Parse a decimal XLM amount into stroops, truncating past 7 decimals
pub fn parse_xlm(amount: &str) -> Result<i64> {
    let amount = amount.trim();
    let invalid = || Error::Format(format!("Invalid XLM amount: {:?}", amount));

    let (negative, digits) = match amount.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, amount),
    };
    let (whole, fraction) = digits.split_once('.').unwrap_or((digits, ""));

    if whole.is_empty() && fraction.is_empty() {
        return Err(invalid());
    }
    if !whole.chars().all(|c| c.is_ascii_digit()) || !fraction.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid());
    }

    let whole: i64 = if whole.is_empty() { 0 } else { whole.parse().map_err(|_| invalid())? };
    let mut fraction: String = fraction.chars().take(7).collect();
    while fraction.len() < 7 {
        fraction.push('0');
    }
    let fraction: i64 = fraction.parse().map_err(|_| invalid())?;

    let stroops = whole
        .checked_mul(STROOPS_PER_XLM)
        .and_then(|w| w.checked_add(fraction))
        .ok_or_else(invalid)?;

    Ok(if negative { -stroops } else { stroops })
}

#[cfg(test)]
mod tests {
    use super::*;

    const ME: &str = "GDRXE2BQUC3AZNPVFSCEZ76NJ3WWL25FYFK6RGZGIEKWE4SOOHSUJUJ6";
    const OTHER: &str = "GBGLLK7WVV47X5NLXTFPZQTJ3BONEZI62S4ILNMGT4SBV3PQUW5CTECA";

    fn account_json() -> serde_json::Value {
        serde_json::json!({
            "id": ME,
            "account_id": ME,
            "sequence": "123456789012",
            "subentry_count": 3,
            "num_sponsoring": 0,
            "num_sponsored": 1,
            "last_modified_ledger": 4242,
            "balances": [
                {"balance": "12.5000000", "asset_type": "credit_alphanum4", "asset_code": "USD", "asset_issuer": OTHER},
                {"balance": "100.2500000", "asset_type": "native"}
            ],
            "signers": [],
            "flags": {}
        })
    }

    fn transaction(fee_charged: serde_json::Value) -> HorizonTransaction {
        serde_json::from_value(serde_json::json!({
            "id": "abc",
            "paging_token": "1234",
            "hash": "abc",
            "ledger": 77,
            "created_at": "2024-03-01T12:00:00Z",
            "source_account": ME,
            "fee_charged": fee_charged,
            "max_fee": "200",
            "operation_count": 1,
            "successful": true,
            "memo_type": "text",
            "memo": "rent"
        }))
        .unwrap()
    }

    #[test]
    fn test_account_balance_summary() {
        let account: HorizonAccount = serde_json::from_value(account_json()).unwrap();
        let summary = AccountBalance::from(account);

        assert_eq!(summary.address, ME);
        assert_eq!(summary.balance_xlm, 100.25);
        assert_eq!(summary.min_balance_xlm, 2.5);
        assert_eq!(summary.balances.len(), 2);
        assert_eq!(summary.num_sponsored, 1);
    }

    #[test]
    fn test_account_without_native_balance() {
        let mut json = account_json();
        json["balances"] = serde_json::json!([]);
        let account: HorizonAccount = serde_json::from_value(json).unwrap();
        assert_eq!(AccountBalance::from(account).balance_xlm, 0.0);
    }

    #[test]
    fn test_sent_payment() {
        let ops = vec![HorizonOperation {
            op_type: "payment".to_string(),
            from: Some(ME.to_string()),
            to: Some(OTHER.to_string()),
            amount: Some("10.0000000".to_string()),
            asset_type: Some("native".to_string()),
            funder: None,
            account: None,
            starting_balance: None,
        }];
        let record = summarize_transaction(&transaction(serde_json::json!("100")), &ops, Some(ME));

        assert_eq!(record.kind, OperationKind::Payment);
        assert_eq!(record.direction, TransactionDirection::Sent);
        assert_eq!(record.receiver.as_deref(), Some(OTHER));
        assert_eq!(record.amount_xlm, 10.0);
        assert_eq!(record.fee_stroops, 100);
        assert_eq!(record.fee_xlm, 0.00001);
        assert_eq!(record.timestamp, 1_709_294_400);
        assert_eq!(record.memo.as_deref(), Some("rent"));
    }

    #[test]
    fn test_received_create_account() {
        let ops = vec![HorizonOperation {
            op_type: "create_account".to_string(),
            from: None,
            to: None,
            amount: None,
            asset_type: None,
            funder: Some(OTHER.to_string()),
            account: Some(ME.to_string()),
            starting_balance: Some("2.0000000".to_string()),
        }];
        let record = summarize_transaction(&transaction(serde_json::json!(150)), &ops, Some(ME));

        assert_eq!(record.kind, OperationKind::CreateAccount);
        assert_eq!(record.direction, TransactionDirection::Received);
        assert_eq!(record.sender, OTHER);
        assert_eq!(record.amount_xlm, 2.0);
        assert_eq!(record.fee_stroops, 150);
    }

    #[test]
    fn test_other_operation_falls_back_to_source_and_max_fee() {
        let record = summarize_transaction(&transaction(serde_json::Value::Null), &[], Some(ME));
        assert_eq!(record.kind, OperationKind::Other);
        assert_eq!(record.direction, TransactionDirection::Other);
        assert_eq!(record.sender, ME);
        assert_eq!(record.fee_stroops, 200);
    }

    #[test]
    fn test_page_cursor_and_has_more() {
        let records: Vec<_> = (0..2)
            .map(|_| summarize_transaction(&transaction(serde_json::json!("100")), &[], None))
            .collect();

        let page = TransactionPage::new(records.clone(), 2);
        assert!(page.has_more);
        assert_eq!(page.next_cursor.as_deref(), Some("1234"));

        let partial = TransactionPage::new(records, 10);
        assert!(!partial.has_more);

        let empty = TransactionPage::new(Vec::new(), 10);
        assert_eq!(empty.next_cursor, None);
    }

    #[test]
    fn test_collection_envelope() {
        let page: HorizonPage<HorizonOperation> = serde_json::from_value(serde_json::json!({
            "_links": {},
            "_embedded": {"records": [{"type": "manage_data", "name": "x"}]}
        }))
        .unwrap();
        assert_eq!(page.embedded.records.len(), 1);
        assert_eq!(page.embedded.records[0].op_type, "manage_data");
    }

    #[test]
    fn test_horizon_error_description() {
        let error: HorizonError = serde_json::from_value(serde_json::json!({
            "title": "Transaction Failed",
            "status": 400,
            "extras": {"result_codes": {"operations": ["op_underfunded", "op_no_trust"]}}
        }))
        .unwrap();
        assert_eq!(error.describe(), "Transaction Failed: op_underfunded, op_no_trust");

        let error: HorizonError = serde_json::from_value(serde_json::json!({
            "title": "Transaction Failed",
            "extras": {"result_codes": {"transaction": "tx_bad_seq", "operations": []}}
        }))
        .unwrap();
        assert_eq!(error.describe(), "Transaction Failed: tx_bad_seq");

        assert_eq!(HorizonError::default().describe(), "Transaction failed");
    }

    #[test]
    fn test_format_and_parse_xlm() {
        assert_eq!(format_xlm(1.5), "1.5000000");
        assert_eq!(parse_xlm("1").unwrap(), 10_000_000);
        assert_eq!(parse_xlm("0.0000001").unwrap(), 1);
        assert_eq!(parse_xlm("12.34567899").unwrap(), 123_456_789);
        assert_eq!(parse_xlm(".5").unwrap(), 5_000_000);
        assert!(parse_xlm("abc").is_err());
        assert!(parse_xlm("").is_err());
        assert!(parse_xlm("1.2.3").is_err());
    }
}
