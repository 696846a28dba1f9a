//! High-level HTTP client for the peer REST API.
//!
//! [`FabricHttpClient`] exposes one async method per peer capability:
//! registrar management, chaincode operations, transaction and block lookup,
//! chain info and network discovery. Each method returns either the typed
//! response or a single [`FabricError`].
//!
//! # Example
//!
//! ```rust,no_run
//! use url::Url;
//! use fabric_client::http::FabricHttpClient;
//!
//! # async fn example() -> Result<(), anyhow::Error> {
//! let client = FabricHttpClient::new(Url::parse("http://localhost:7050")?)?;
//!
//! let info = client.get_blockchain_info().await?;
//! println!("Chain height: {}", info.height);
//! # Ok(())
//! # }
//! ```

use std::time::Duration;

use log::{debug, info, warn};
use reqwest::Method;
use serde::de::DeserializeOwned;
use url::Url;

use crate::config::ClientConfig;
use crate::error::{ErrorCode, FabricError};
use crate::log::mask_string;
use crate::models::{
    Block, BlockchainInfo, ChaincodeOperation, ChaincodeOutcome, Credential, PeerEndpoint, Transaction,
    TransactionHandle,
};

use super::http_client::{HttpClient, TransportOptions};
use super::resolver::{resolve, resolve_rpc_error};
use super::types::{JsonRpcRequest, JsonRpcResponse, OkResponse, PeersMessage, RpcResult};

/// HTTP client for a single peer.
///
/// The base URL and transport settings are fixed at construction; the client
/// keeps no session state, so it can be shared across tasks and used for
/// concurrent requests.
///
/// Only GET requests are retried on transient failures. Registrar creation
/// and deletion and chaincode submissions are sent exactly once; retrying them
/// is the caller's decision.
pub struct FabricHttpClient {
    http_client: HttpClient,
}

impl FabricHttpClient {
    /// Creates a client with default transport settings (30 second timeout,
    /// 3 retries for GET requests, no wire logging).
    pub fn new(base_url: Url) -> Result<Self, FabricError> {
        Self::with_options(base_url, TransportOptions::default())
    }

    pub fn with_options(base_url: Url, options: TransportOptions) -> Result<Self, FabricError> {
        let http_client = HttpClient::new(normalize_base_url(base_url), options).map_err(resolve)?;
        Ok(Self { http_client })
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self, FabricError> {
        let base_url = Url::parse(&config.peer_url)
            .map_err(|e| FabricError::validation(format!("invalid peer url '{}': {}", config.peer_url, e)))?;
        Self::with_options(base_url, config.transport_options())
    }

    /// Returns the peer address as a string.
    pub fn get_address(&self) -> String {
        self.http_client.base_url().to_string()
    }

    /// Returns the latency of the most recent HTTP request, if any was made.
    pub async fn get_last_request_latency(&self) -> Option<Duration> {
        self.http_client.get_latency().await
    }

    /// Checks whether the peer answers `GET /chain`.
    pub async fn is_online(&self) -> bool {
        match self.get_blockchain_info().await {
            Ok(_) => {
                debug!("Peer is online");
                true
            },
            Err(e) => {
                warn!(
                    error:% = e;
                    "Peer is offline"
                );
                false
            },
        }
    }

    /// Registers a registrar with the peer using its enrollment credentials.
    ///
    /// Returns the peer's confirmation message. Not retried.
    pub async fn create_registrar(&self, credential: &Credential) -> Result<String, FabricError> {
        credential.validate()?;
        info!(
            target: "audit",
            enroll_id = credential.enroll_id(),
            enroll_secret = &*mask_string(credential.enroll_secret());
            "HTTP: Creating registrar"
        );

        let body = serde_json::to_value(credential)
            .map_err(|e| FabricError::validation(format!("credential could not be encoded: {}", e)))?;
        let response: OkResponse<String> = self.send(Method::POST, "registrar", Some(body)).await?;

        info!(target: "audit", enroll_id = credential.enroll_id(); "HTTP: Registrar created");
        Ok(response.ok)
    }

    /// Confirms that a registrar is enrolled with the peer.
    pub async fn get_registrar(&self, enroll_id: &str) -> Result<String, FabricError> {
        let id = path_segment("enroll id", enroll_id)?;
        debug!(enroll_id = id; "HTTP: Requesting registrar");

        let response: OkResponse<String> = self.send(Method::GET, &format!("registrar/{}", id), None).await?;
        Ok(response.ok)
    }

    /// Retrieves the enrollment certificate of a registrar.
    pub async fn get_registrar_ecert(&self, enroll_id: &str) -> Result<String, FabricError> {
        let id = path_segment("enroll id", enroll_id)?;
        debug!(enroll_id = id; "HTTP: Requesting registrar enrollment certificate");

        let response: OkResponse<String> = self.send(Method::GET, &format!("registrar/{}/ecert", id), None).await?;
        Ok(response.ok)
    }

    /// Retrieves the transaction certificates issued to a registrar.
    pub async fn get_registrar_tcerts(&self, enroll_id: &str) -> Result<Vec<String>, FabricError> {
        let id = path_segment("enroll id", enroll_id)?;
        debug!(enroll_id = id; "HTTP: Requesting registrar transaction certificates");

        let response: OkResponse<Vec<String>> =
            self.send(Method::GET, &format!("registrar/{}/tcert", id), None).await?;
        debug!(count = response.ok.len(); "HTTP: Transaction certificates retrieved");
        Ok(response.ok)
    }

    /// Removes a registrar's enrollment from the peer. Not retried.
    pub async fn delete_registrar(&self, enroll_id: &str) -> Result<String, FabricError> {
        let id = path_segment("enroll id", enroll_id)?;
        info!(target: "audit", enroll_id = id; "HTTP: Deleting registrar");

        let response: OkResponse<String> = self.send(Method::DELETE, &format!("registrar/{}", id), None).await?;

        info!(target: "audit", enroll_id = id; "HTTP: Registrar deleted");
        Ok(response.ok)
    }

    /// Submits a deploy, invoke or query operation as a JSON-RPC request.
    ///
    /// This is a single request/response exchange. For a query the outcome
    /// holds the final value; for deploy and invoke it holds the handle of a
    /// transaction the peer commits later (see
    /// [`ChaincodeWorkflow`](crate::chaincode::ChaincodeWorkflow) for awaiting
    /// it). A JSON-RPC `error` member in the response resolves to an
    /// [`ErrorCode::Peer`] error. Deploy and invoke are never retried.
    pub async fn submit_chaincode_operation(
        &self,
        operation: &ChaincodeOperation,
    ) -> Result<ChaincodeOutcome, FabricError> {
        let method = operation.method();
        if method.produces_transaction() {
            info!(
                target: "audit",
                method = method.as_str(),
                chaincode = operation.spec().display_id(),
                function = &*operation.spec().ctor_msg().function;
                "HTTP: Submitting chaincode operation"
            );
        } else {
            debug!(
                chaincode = operation.spec().display_id(),
                function = &*operation.spec().ctor_msg().function;
                "HTTP: Querying chaincode"
            );
        }

        let request = JsonRpcRequest {
            jsonrpc: operation.version(),
            method: method.as_str(),
            params: operation.spec(),
            id: operation.id(),
        };
        let body = serde_json::to_value(&request)
            .map_err(|e| FabricError::validation(format!("chaincode operation could not be encoded: {}", e)))?;

        let response: JsonRpcResponse<RpcResult> = self.send(Method::POST, "chaincode", Some(body)).await?;

        if let Some(error) = response.error {
            warn!(
                method = method.as_str(),
                code = error.code,
                reason = &*error.message;
                "HTTP: Chaincode operation rejected"
            );
            return Err(resolve_rpc_error(error));
        }

        let Some(result) = response.result else {
            return Err(FabricError::new(
                ErrorCode::Decode,
                "chaincode response carried neither a result nor an error",
            ));
        };

        if method.produces_transaction() && result.message.is_empty() {
            return Err(FabricError::new(
                ErrorCode::Decode,
                format!("{} response did not include a transaction handle", method),
            ));
        }

        let outcome = ChaincodeOutcome::from_message(method, result.status, result.message);
        debug!(method = method.as_str(), status = outcome.status(); "HTTP: Chaincode operation accepted");
        Ok(outcome)
    }

    /// Looks up a transaction by the handle a deploy or invoke returned.
    pub async fn get_transaction(&self, handle: &TransactionHandle) -> Result<Transaction, FabricError> {
        let id = path_segment("transaction handle", handle.as_str())?;
        debug!(handle = id; "HTTP: Requesting transaction");

        let transaction: Transaction = self.send(Method::GET, &format!("transactions/{}", id), None).await?;
        debug!(handle = id; "HTTP: Transaction retrieved");
        Ok(transaction)
    }

    pub async fn get_block(&self, index: u64) -> Result<Block, FabricError> {
        debug!(index = index; "HTTP: Requesting block");
        self.send(Method::GET, &format!("chain/blocks/{}", index), None).await
    }

    pub async fn get_blockchain_info(&self) -> Result<BlockchainInfo, FabricError> {
        debug!("HTTP: Requesting blockchain info");
        self.send(Method::GET, "chain", None).await
    }

    /// Lists the peers this peer is connected to.
    pub async fn get_network_peers(&self) -> Result<Vec<PeerEndpoint>, FabricError> {
        debug!("HTTP: Requesting network peers");
        let response: PeersMessage = self.send(Method::GET, "network/peers", None).await?;
        debug!(count = response.peers.len(); "HTTP: Network peers retrieved");
        Ok(response.peers)
    }

    async fn send<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> Result<T, FabricError> {
        self.http_client
            .send_request(method, path, body)
            .await
            .map_err(resolve)
    }
}

/// Request paths are relative, so the base URL must end with a slash for
/// `Url::join` to keep any path prefix.
fn normalize_base_url(mut base_url: Url) -> Url {
    if !base_url.path().ends_with('/') {
        let path = format!("{}/", base_url.path());
        base_url.set_path(&path);
    }
    base_url
}

fn path_segment<'a>(what: &str, value: &'a str) -> Result<&'a str, FabricError> {
    if value.is_empty() {
        return Err(FabricError::validation(format!("{} is required", what)));
    }
    if value
        .chars()
        .any(|c| c.is_whitespace() || c.is_control() || matches!(c, '/' | '?' | '#' | '%' | '\\'))
    {
        return Err(FabricError::validation(format!(
            "{} '{}' contains characters not allowed in a path",
            what, value
        )));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ErrorKind, TransportFailure};
    use crate::models::{ChaincodeSpec, TransactionStatus};
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> FabricHttpClient {
        let options = TransportOptions {
            max_retries: 0,
            timeout: Duration::from_secs(5),
            verbose: false,
        };
        FabricHttpClient::with_options(Url::parse(&server.uri()).unwrap(), options).unwrap()
    }

    fn invoke_operation() -> ChaincodeOperation {
        let spec = ChaincodeSpec::builder()
            .name("mycc")
            .function("invoke")
            .args(["a", "b", "10"])
            .secure_context("user_type1_0")
            .build()
            .unwrap();
        ChaincodeOperation::invoke(spec)
    }

    #[tokio::test]
    async fn test_create_registrar_posts_credential() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/registrar"))
            .and(body_json(json!({"enrollId": "admin", "enrollSecret": "ee9dc5466a"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"OK": "Login successful for user 'admin'."})))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);
        let ok = client
            .create_registrar(&Credential::new("admin", "ee9dc5466a"))
            .await
            .unwrap();

        assert_eq!(ok, "Login successful for user 'admin'.");
    }

    #[tokio::test]
    async fn test_create_registrar_with_bad_secret_is_peer_error() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/registrar"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({"error": "invalid secret"})))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);
        let err = client
            .create_registrar(&Credential::new("admin", "bad"))
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::Peer);
        assert_eq!(err.message, "invalid secret");
        assert_eq!(err.http_status(), Some(401));
    }

    #[tokio::test]
    async fn test_invalid_credential_never_reaches_the_peer() {
        let mock_server = MockServer::start().await;
        let client = client_for(&mock_server);

        let err = client.create_registrar(&Credential::new("", "secret")).await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!(mock_server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_registrar_lookups() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/registrar/user_type1_0"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"OK": "User user_type1_0 is already logged in."})),
            )
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/registrar/user_type1_0/ecert"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"OK": "-----BEGIN CERTIFICATE-----"})))
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/registrar/user_type1_0/tcert"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"OK": ["tcert-1", "tcert-2"]})))
            .mount(&mock_server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/registrar/user_type1_0"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"OK": "Deleted login token and directory for user."})),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);

        assert!(client.get_registrar("user_type1_0").await.unwrap().contains("logged in"));
        assert!(client.get_registrar_ecert("user_type1_0").await.unwrap().starts_with("-----BEGIN"));
        assert_eq!(client.get_registrar_tcerts("user_type1_0").await.unwrap(), vec!["tcert-1", "tcert-2"]);
        assert!(client.delete_registrar("user_type1_0").await.unwrap().starts_with("Deleted"));
    }

    #[tokio::test]
    async fn test_registrar_id_with_path_characters_is_rejected() {
        let mock_server = MockServer::start().await;
        let client = client_for(&mock_server);

        let err = client.get_registrar("../chain").await.unwrap_err();

        assert_eq!(err.code, ErrorCode::Validation);
        assert!(mock_server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_submit_invoke_returns_transaction_handle() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chaincode"))
            .and(body_json(json!({
                "jsonrpc": "2.0",
                "method": "invoke",
                "params": {
                    "type": "GOLANG",
                    "chaincodeID": {"name": "mycc"},
                    "ctorMsg": {"function": "invoke", "args": ["a", "b", "10"]},
                    "secureContext": "user_type1_0"
                },
                "id": 1
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "jsonrpc": "2.0",
                "result": {"status": "OK", "message": "txid-123"},
                "id": 1
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);
        let outcome = client.submit_chaincode_operation(&invoke_operation()).await.unwrap();

        assert_eq!(outcome.handle(), Some(&TransactionHandle::new("txid-123")));
        assert_eq!(outcome.status(), "OK");
    }

    #[tokio::test]
    async fn test_submit_query_returns_value() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chaincode"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "jsonrpc": "2.0",
                "result": {"status": "OK", "message": "200"},
                "id": 5
            })))
            .mount(&mock_server)
            .await;

        let spec = ChaincodeSpec::builder().name("mycc").function("query").arg("b").build().unwrap();
        let client = client_for(&mock_server);
        let outcome = client
            .submit_chaincode_operation(&ChaincodeOperation::query(spec).with_id(5))
            .await
            .unwrap();

        assert_eq!(outcome, ChaincodeOutcome::Queried {
            status: "OK".to_string(),
            value: "200".to_string()
        });
    }

    #[tokio::test]
    async fn test_rpc_error_member_is_peer_error() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chaincode"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "jsonrpc": "2.0",
                "error": {"code": -32003, "message": "Query failure", "data": "Error when querying chaincode"},
                "id": 1
            })))
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);
        let err = client.submit_chaincode_operation(&invoke_operation()).await.unwrap_err();

        assert_eq!(err.code, ErrorCode::Peer);
        assert!(err.message.starts_with("Query failure"));
    }

    #[tokio::test]
    async fn test_invoke_without_handle_is_decode_error() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chaincode"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "jsonrpc": "2.0",
                "result": {"status": "OK"},
                "id": 1
            })))
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);
        let err = client.submit_chaincode_operation(&invoke_operation()).await.unwrap_err();

        assert_eq!(err.code, ErrorCode::Decode);
    }

    #[tokio::test]
    async fn test_chain_queries() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/transactions/txid-123"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"uuid": "txid-123"})))
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/chain/blocks/1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "transactions": [{"uuid": "txid-123", "type": 2}],
                "previousBlockHash": "abc"
            })))
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/chain"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "height": 2,
                "currentBlockHash": "def",
                "previousBlockHash": "abc"
            })))
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/network/peers"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "peers": [{"ID": {"name": "vp0"}, "address": "172.17.0.2:30303", "type": "VALIDATOR"}]
            })))
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);

        let tx = client.get_transaction(&TransactionHandle::new("txid-123")).await.unwrap();
        assert_eq!(tx.status, TransactionStatus::Committed);

        let block = client.get_block(1).await.unwrap();
        assert_eq!(block.transactions.len(), 1);

        let info = client.get_blockchain_info().await.unwrap();
        assert_eq!(info.height, 2);
        assert!(client.is_online().await);

        let peers = client.get_network_peers().await.unwrap();
        assert_eq!(peers[0].address, "172.17.0.2:30303");
        assert!(client.get_last_request_latency().await.is_some());
    }

    #[tokio::test]
    async fn test_missing_block_is_peer_error() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/chain/blocks/99"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({"Error": "Not found"})))
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);
        let err = client.get_block(99).await.unwrap_err();

        assert_eq!(err.code, ErrorCode::Peer);
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_get_block_against_unreachable_peer_is_transport_error() {
        let client = FabricHttpClient::new(Url::parse("http://127.0.0.1:9").unwrap()).unwrap();

        let err = client.get_block(0).await.unwrap_err();

        assert_eq!(err.code, ErrorCode::Transport(TransportFailure::Unreachable));
        assert!(!client.is_online().await);
    }

    #[tokio::test]
    async fn test_slow_get_is_timeout_after_retries() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/chain"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
            .mount(&mock_server)
            .await;

        let options = TransportOptions {
            timeout: Duration::from_millis(200),
            ..Default::default()
        };
        let client = FabricHttpClient::with_options(Url::parse(&mock_server.uri()).unwrap(), options).unwrap();

        let err = client.get_blockchain_info().await.unwrap_err();

        assert_eq!(err.code, ErrorCode::Transport(TransportFailure::Timeout));
        assert_eq!(err.kind(), ErrorKind::Transport);
    }

    #[test]
    fn test_base_url_keeps_path_prefix() {
        let url = normalize_base_url(Url::parse("https://peer.example.com:5003/api").unwrap());

        assert_eq!(url.join("chain").unwrap().as_str(), "https://peer.example.com:5003/api/chain");
    }
}
