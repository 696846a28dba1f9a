use std::time::Duration;

use log::{debug, info, warn};
use tokio_util::sync::CancellationToken;

use crate::error::{ErrorCode, FabricError};
use crate::http::FabricHttpClient;
use crate::models::{ChaincodeOperation, Transaction, TransactionHandle};

use super::policy::SettlePolicy;

/// Runs chaincode operations against a peer and awaits their transactions.
///
/// The lookup is strictly ordered after a successful submission and after the
/// settle wait. A failed submission is returned as-is and no lookup is made.
/// A failed lookup is returned without retrying or rolling back the
/// submission: the peer decides whether it eventually commits.
///
/// Cancelling (through the token, or by dropping the future) stops local
/// waiting only. A submission that already reached the peer stays submitted.
pub struct ChaincodeWorkflow<'a> {
    client: &'a FabricHttpClient,
}

impl<'a> ChaincodeWorkflow<'a> {
    pub fn new(client: &'a FabricHttpClient) -> Self {
        Self { client }
    }

    /// Submits a deploy or invoke and returns the transaction it produced.
    pub async fn run_and_await_transaction(
        &self,
        operation: &ChaincodeOperation,
        policy: SettlePolicy,
    ) -> Result<Transaction, FabricError> {
        self.run_and_await_transaction_with_cancel(operation, policy, &CancellationToken::new())
            .await
    }

    /// Like [`run_and_await_transaction`](Self::run_and_await_transaction), but
    /// returns [`ErrorCode::Cancelled`] as soon as `cancel` fires. No request
    /// is issued after cancellation.
    pub async fn run_and_await_transaction_with_cancel(
        &self,
        operation: &ChaincodeOperation,
        policy: SettlePolicy,
        cancel: &CancellationToken,
    ) -> Result<Transaction, FabricError> {
        if !operation.method().produces_transaction() {
            return Err(FabricError::validation(format!(
                "{} operations resolve directly and produce no transaction",
                operation.method()
            )));
        }
        policy.validate()?;

        let outcome = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(FabricError::cancelled()),
            result = self.client.submit_chaincode_operation(operation) => result?,
        };

        let handle = outcome.handle().cloned().ok_or_else(|| {
            FabricError::new(ErrorCode::Decode, "submission did not return a transaction handle")
        })?;
        info!(
            method = operation.method().as_str(),
            handle = handle.as_str(),
            max_wait_ms = policy.max_wait().as_millis() as u64;
            "Chaincode operation submitted, awaiting transaction"
        );

        match policy {
            SettlePolicy::Fixed(delay) => {
                settle(delay, cancel).await?;
                self.lookup(&handle, cancel).await
            },
            SettlePolicy::Poll { interval, max_attempts } => self.poll(&handle, interval, max_attempts, cancel).await,
        }
    }

    /// Submits a query and returns its value. Queries never produce a
    /// transaction, so there is nothing to wait for.
    pub async fn query(&self, operation: &ChaincodeOperation) -> Result<String, FabricError> {
        if operation.method().produces_transaction() {
            return Err(FabricError::validation(format!(
                "{} is not a query; use run_and_await_transaction",
                operation.method()
            )));
        }

        let outcome = self.client.submit_chaincode_operation(operation).await?;
        outcome
            .value()
            .map(str::to_string)
            .ok_or_else(|| FabricError::new(ErrorCode::Decode, "query did not return a value"))
    }

    async fn lookup(&self, handle: &TransactionHandle, cancel: &CancellationToken) -> Result<Transaction, FabricError> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(FabricError::cancelled()),
            result = self.client.get_transaction(handle) => result,
        }
    }

    async fn poll(
        &self,
        handle: &TransactionHandle,
        interval: Duration,
        max_attempts: u32,
        cancel: &CancellationToken,
    ) -> Result<Transaction, FabricError> {
        let mut last = None;

        for attempt in 1..=max_attempts {
            settle(interval, cancel).await?;

            match self.lookup(handle, cancel).await {
                Ok(transaction) if transaction.status.is_terminal() => return Ok(transaction),
                Ok(transaction) => {
                    debug!(
                        handle = handle.as_str(),
                        attempt = attempt;
                        "Transaction not settled yet"
                    );
                    last = Some(Ok(transaction));
                },
                // Not visible on the peer yet.
                Err(e) if e.is_not_found() => {
                    debug!(
                        handle = handle.as_str(),
                        attempt = attempt;
                        "Transaction not found yet"
                    );
                    last = Some(Err(e));
                },
                Err(e) => return Err(e),
            }
        }

        warn!(
            handle = handle.as_str(),
            attempts = max_attempts;
            "Transaction did not settle within the poll budget"
        );
        last.unwrap_or_else(|| Err(FabricError::validation("poll policy needs at least one attempt")))
    }
}

async fn settle(delay: Duration, cancel: &CancellationToken) -> Result<(), FabricError> {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(FabricError::cancelled()),
        _ = tokio::time::sleep(delay) => Ok(()),
    }
}
