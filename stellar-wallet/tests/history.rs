//! Tests for search history persistence

use stellar_wallet::account::{SearchHistory, SourceInfo};
use stellar_wallet::recover_multi_chain;
use tempfile::tempdir;

#[test]
fn test_history_survives_reload() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("history.json");

    let keys = recover_multi_chain("").unwrap();
    let source = SourceInfo {
        btc_address: Some(keys.btc.address.clone()),
        flo_address: Some(keys.flo.address.clone()),
    };

    let mut history = SearchHistory::load(&path).unwrap();
    let id = history.record(keys.xlm.address(), 3.25, 1_700_000_000_000, Some(source));
    history.record("GPLAINLOOKUP", 1.0, 1_700_000_000_500, None);
    history.save(&path).unwrap();

    let reloaded = SearchHistory::load(&path).unwrap();
    let recent = reloaded.recent();
    assert_eq!(recent.len(), 2);
    assert_eq!(recent[0].xlm_address, "GPLAINLOOKUP");
    assert!(!recent[0].is_from_private_key);

    let derived = reloaded.get(id).unwrap();
    assert!(derived.is_from_private_key);
    assert_eq!(derived.formatted_balance, "3.2500000 XLM");
    assert_eq!(derived.btc_address.as_deref(), Some(keys.btc.address.as_str()));
}
