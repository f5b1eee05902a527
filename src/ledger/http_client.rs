use std::time::Duration;

use chrono::SecondsFormat;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::ledger::{BatchOutcome, LedgerError, LedgerService};
use crate::models::{NewAccount, TargetAccount, Transaction};
use crate::types::{AccountId, Direction};

const AUTH_HEADER: &str = "x-internal-key";

/// JSON-over-HTTP ledger client scoped to a single user.
pub struct HttpLedgerClient {
    http: Client,
    base_url: String,
    user_id: String,
    api_key: String
}

#[derive(Debug, Deserialize)]
struct AccountsResponse {
    #[serde(default)]
    accounts: Vec<TargetAccount>
}

#[derive(Debug, Deserialize)]
struct AccountResponse {
    account: TargetAccount
}

#[derive(Debug, Deserialize)]
struct CreatedResponse {
    #[serde(default)]
    created_count: u64
}

#[derive(Debug, Serialize)]
struct TransactionBatch<'a> {
    transactions: Vec<TransactionInput<'a>>
}

#[derive(Debug, Serialize)]
struct TransactionInput<'a> {
    account_id: AccountId,
    tx_date: String,
    amount: String,
    currency: &'a str,
    direction: Direction,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>
}

impl<'a> TransactionInput<'a> {
    fn from_transaction(transaction: &'a Transaction) -> Result<Self, LedgerError> {
        let account_id = transaction.resolved_account_id().ok_or_else(|| LedgerError::Unresolved {
            description: transaction.description.clone(),
            date: transaction.date.to_string()
        })?;

        Ok(Self {
            account_id,
            //NOTE: Source dates carry no timezone, the ledger stores them as UTC
            tx_date: transaction.date.and_utc().to_rfc3339_opts(SecondsFormat::Secs, true),
            amount: transaction.amount.to_string(),
            currency: &transaction.currency,
            direction: transaction.direction,
            description: Some(transaction.description.as_str()).filter(|description| !description.is_empty())
        })
    }
}

impl HttpLedgerClient {
    pub fn new(base_url: &str, user_id: &str, api_key: &str) -> Result<Self, LedgerError> {
        let http = Client::builder()
            .user_agent(format!("statement-reconciler/{}", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(60))
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            user_id: user_id.to_string(),
            api_key: api_key.to_string()
        })
    }

    /// Fails when the configured user does not exist on the ledger.
    pub async fn verify_user(&self) -> Result<(), LedgerError> {
        send(self.authorized(self.http.get(self.user_url("")))).await?;
        info!("Verified ledger user [{}]", self.user_id);

        Ok(())
    }

    fn user_url(&self, path: &str) -> String {
        format!("{}/v1/users/{}{}", self.base_url, self.user_id, path)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request.header(AUTH_HEADER, &self.api_key)
    }

    async fn submit(&self, transactions: &[Transaction]) -> Result<u64, LedgerError> {
        let inputs = transactions.iter()
            .map(TransactionInput::from_transaction)
            .collect::<Result<Vec<_>, _>>()?;

        let request = self.http.post(self.user_url("/transactions"))
            .json(&TransactionBatch { transactions: inputs });

        let response = self.authorized(request).send().await?;

        if response.status() == StatusCode::CONFLICT {
            info!("Skipping batch of {} duplicate transactions", transactions.len());
            return Ok(0);
        }

        let created: CreatedResponse = check(response).await?.json().await?;

        Ok(created.created_count)
    }
}

impl LedgerService for HttpLedgerClient {
    async fn list_accounts(&self) -> Result<Vec<TargetAccount>, LedgerError> {
        let response: AccountsResponse = send(self.authorized(self.http.get(self.user_url("/accounts")))).await?
            .json().await?;

        info!("Fetched {} ledger accounts", response.accounts.len());

        Ok(response.accounts)
    }

    async fn create_account(&self, account: &NewAccount) -> Result<TargetAccount, LedgerError> {
        let request = self.http.post(self.user_url("/accounts")).json(account);
        let response: AccountResponse = send(self.authorized(request)).await?.json().await?;

        info!(
            "Created ledger account [{}] of type [{}] with id [{}]",
            response.account.name, response.account.account_type, response.account.id
        );

        Ok(response.account)
    }

    async fn create_transactions(&self, transactions: &[Transaction]) -> BatchOutcome {
        if transactions.is_empty() {
            return BatchOutcome::default();
        }

        match self.submit(transactions).await {
            Ok(created) => {
                debug!("Ledger created {created} of {} transactions", transactions.len());
                BatchOutcome { created, errors: Vec::new() }
            }
            Err(error) => BatchOutcome { created: 0, errors: vec![error] }
        }
    }
}

async fn send(request: RequestBuilder) -> Result<Response, LedgerError> {
    check(request.send().await?).await
}

async fn check(response: Response) -> Result<Response, LedgerError> {
    let status = response.status();

    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();

    Err(LedgerError::Http { status: status.as_u16(), body })
}
