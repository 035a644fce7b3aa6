//! Horizon REST client

use std::time::Duration;

use futures::future::join_all;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use super::network::{PUBLIC_NETWORK_PASSPHRASE, TESTNET_NETWORK_PASSPHRASE};
use super::types::{
    summarize_transaction, AccountBalance, FeeParams, HorizonAccount, HorizonError,
    HorizonFeeStats, HorizonOperation, HorizonPage, HorizonTransaction, StringOrNumber,
    SubmitResult, TransactionPage, TransactionQuery, TransactionRecord, DEFAULT_BASE_FEE,
};

/// Public network Horizon
pub const PUBLIC_HORIZON_URL: &str = "https://horizon.stellar.org";

/// SDF testnet Horizon
pub const TESTNET_HORIZON_URL: &str = "https://horizon-testnet.stellar.org";

const ACCOUNT_NOT_FOUND: &str = "Account not found. The account may not be funded yet.";

/// Horizon client configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HorizonConfig {
    /// Horizon base URL, without trailing slash
    pub url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Passphrase of the network this Horizon serves
    pub network_passphrase: String,
}

impl Default for HorizonConfig {
    fn default() -> Self {
        Self {
            url: PUBLIC_HORIZON_URL.to_string(),
            timeout_secs: 30,
            network_passphrase: PUBLIC_NETWORK_PASSPHRASE.to_string(),
        }
    }
}

impl HorizonConfig {
    /// SDF testnet
    pub fn testnet() -> Self {
        Self {
            url: TESTNET_HORIZON_URL.to_string(),
            network_passphrase: TESTNET_NETWORK_PASSPHRASE.to_string(),
            ..Self::default()
        }
    }
}

/// Client for one Horizon instance
pub struct HorizonClient {
    config: HorizonConfig,
    client: reqwest::Client,
}

impl HorizonClient {
    /// Create a new client
    pub fn new(config: HorizonConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::Provider(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    pub fn config(&self) -> &HorizonConfig {
        &self.config
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.config.url.trim_end_matches('/'), path)
    }

    /// GET a Horizon resource; 404 becomes `NotFound(not_found)`
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
        not_found: &str,
    ) -> Result<T> {
        let url = self.endpoint(path);
        debug!(%url, "horizon request");

        let response = self
            .client
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|e| Error::Provider(format!("Failed to send request: {}", e)))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(Error::NotFound(not_found.to_string()));
        }
        if !status.is_success() {
            let body: HorizonError = response.json().await.unwrap_or_default();
            return Err(Error::Provider(format!("Horizon returned {}: {}", status, body.describe())));
        }

        response
            .json()
            .await
            .map_err(|e| Error::Serialization(format!("Failed to parse response: {}", e)))
    }

    /// Native balance and account summary
    pub async fn get_balance(&self, address: &str) -> Result<AccountBalance> {
        info!(%address, "fetching account");
        let account: HorizonAccount = self
            .get_json(&format!("accounts/{}", address), &[], ACCOUNT_NOT_FOUND)
            .await?;
        Ok(account.into())
    }

    /// One page of an account's transactions, summarized from its perspective
    pub async fn get_transactions(
        &self,
        address: &str,
        query: &TransactionQuery,
    ) -> Result<TransactionPage> {
        info!(%address, limit = query.limit, "fetching transactions");

        let mut params = vec![
            ("limit", query.limit.to_string()),
            ("order", if query.descending { "desc" } else { "asc" }.to_string()),
        ];
        if let Some(cursor) = &query.cursor {
            params.push(("cursor", cursor.clone()));
        }

        let page: HorizonPage<HorizonTransaction> = self
            .get_json(&format!("accounts/{}/transactions", address), &params, ACCOUNT_NOT_FOUND)
            .await?;

        let operations = join_all(
            page.embedded
                .records
                .iter()
                .map(|tx| self.get_operations(&tx.hash)),
        )
        .await;

        let records = page
            .embedded
            .records
            .iter()
            .zip(operations)
            .map(|(tx, ops)| {
                let ops = ops.unwrap_or_else(|e| {
                    warn!(hash = %tx.hash, error = %e, "operations unavailable");
                    Vec::new()
                });
                summarize_transaction(tx, &ops, Some(address))
            })
            .collect();

        Ok(TransactionPage::new(records, query.limit))
    }

    /// A single transaction with its operations
    pub async fn get_transaction(&self, hash: &str) -> Result<TransactionRecord> {
        info!(%hash, "fetching transaction");
        let tx: HorizonTransaction = self
            .get_json(&format!("transactions/{}", hash), &[], "Transaction not found")
            .await?;
        let operations = self.get_operations(hash).await?;

        let mut record = summarize_transaction(&tx, &operations, None);
        record.operations = operations;
        Ok(record)
    }

    async fn get_operations(&self, hash: &str) -> Result<Vec<HorizonOperation>> {
        let page: HorizonPage<HorizonOperation> = self
            .get_json(&format!("transactions/{}/operations", hash), &[], "Transaction not found")
            .await?;
        Ok(page.embedded.records)
    }

    /// Base fee and network passphrase for building a transaction
    pub async fn get_fee_params(&self) -> Result<FeeParams> {
        let base_fee = match self
            .get_json::<HorizonFeeStats>("fee_stats", &[], "Fee stats not found")
            .await
        {
            Ok(stats) => stats
                .last_ledger_base_fee
                .as_ref()
                .and_then(StringOrNumber::as_u64)
                .unwrap_or(DEFAULT_BASE_FEE),
            Err(e) => {
                warn!(error = %e, "fee stats unavailable, using default base fee");
                DEFAULT_BASE_FEE
            }
        };

        Ok(FeeParams {
            base_fee,
            network_passphrase: self.config.network_passphrase.clone(),
        })
    }

    /// Submit a base64 transaction envelope
    pub async fn submit_transaction(&self, envelope_xdr: &str) -> Result<SubmitResult> {
        let url = self.endpoint("transactions");
        info!("submitting transaction");

        let response = self
            .client
            .post(&url)
            .form(&[("tx", envelope_xdr.trim())])
            .send()
            .await
            .map_err(|e| Error::Provider(format!("Failed to send request: {}", e)))?;

        if !response.status().is_success() {
            let body: HorizonError = response.json().await.unwrap_or_default();
            return Err(Error::Provider(body.describe()));
        }

        let result: SubmitResult = response
            .json()
            .await
            .map_err(|e| Error::Serialization(format!("Failed to parse response: {}", e)))?;
        info!(hash = %result.hash, ledger = result.ledger, "transaction submitted");
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_public_network() {
        let config = HorizonConfig::default();
        assert_eq!(config.url, "https://horizon.stellar.org");
        assert_eq!(config.timeout_secs, 30);
        assert_eq!(config.network_passphrase, PUBLIC_NETWORK_PASSPHRASE);
    }

    #[test]
    fn test_testnet_config() {
        let config = HorizonConfig::testnet();
        assert_eq!(config.url, TESTNET_HORIZON_URL);
        assert_eq!(config.network_passphrase, TESTNET_NETWORK_PASSPHRASE);
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn test_endpoint_joins_without_double_slash() {
        let client = HorizonClient::new(HorizonConfig {
            url: "http://localhost:8000/".to_string(),
            ..HorizonConfig::default()
        })
        .unwrap();
        assert_eq!(client.endpoint("fee_stats"), "http://localhost:8000/fee_stats");
    }
}
