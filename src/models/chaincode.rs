use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::FabricError;

/// JSON-RPC protocol version tag sent with every chaincode operation.
pub const JSONRPC_VERSION: &str = "2.0";

/// Chaincode runtimes a peer can execute.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChaincodeRuntime {
    #[default]
    Golang,
    Node,
    Car,
    Java,
}

impl fmt::Display for ChaincodeRuntime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChaincodeRuntime::Golang => write!(f, "GOLANG"),
            ChaincodeRuntime::Node => write!(f, "NODE"),
            ChaincodeRuntime::Car => write!(f, "CAR"),
            ChaincodeRuntime::Java => write!(f, "JAVA"),
        }
    }
}

impl FromStr for ChaincodeRuntime {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "GOLANG" | "GO" => Ok(ChaincodeRuntime::Golang),
            "NODE" => Ok(ChaincodeRuntime::Node),
            "CAR" => Ok(ChaincodeRuntime::Car),
            "JAVA" => Ok(ChaincodeRuntime::Java),
            _ => Err(format!("Invalid chaincode runtime: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChaincodeMethod {
    Deploy,
    Invoke,
    Query,
}

impl ChaincodeMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChaincodeMethod::Deploy => "deploy",
            ChaincodeMethod::Invoke => "invoke",
            ChaincodeMethod::Query => "query",
        }
    }

    /// Deploy and invoke produce a transaction the peer commits later.
    pub fn produces_transaction(&self) -> bool {
        !matches!(self, ChaincodeMethod::Query)
    }
}

impl fmt::Display for ChaincodeMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChaincodeMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "deploy" => Ok(ChaincodeMethod::Deploy),
            "invoke" => Ok(ChaincodeMethod::Invoke),
            "query" => Ok(ChaincodeMethod::Query),
            _ => Err(format!("Invalid chaincode method: {}", s)),
        }
    }
}

/// Chaincode identity: a deployed name, a source path, or both.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChaincodeId {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// The constructor call: a function name and its ordered arguments.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChaincodeInput {
    pub function: String,
    pub args: Vec<String>,
}

/// What to run on the peer. Built through [`ChaincodeSpec::builder`] and
/// immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChaincodeSpec {
    #[serde(rename = "type")]
    runtime: ChaincodeRuntime,
    #[serde(rename = "chaincodeID")]
    chaincode_id: ChaincodeId,
    #[serde(rename = "ctorMsg")]
    ctor_msg: ChaincodeInput,
    #[serde(rename = "secureContext", skip_serializing_if = "Option::is_none")]
    secure_context: Option<String>,
}

impl ChaincodeSpec {
    pub fn builder() -> ChaincodeSpecBuilder {
        ChaincodeSpecBuilder::default()
    }

    pub fn runtime(&self) -> ChaincodeRuntime {
        self.runtime
    }

    pub fn chaincode_id(&self) -> &ChaincodeId {
        &self.chaincode_id
    }

    pub fn ctor_msg(&self) -> &ChaincodeInput {
        &self.ctor_msg
    }

    pub fn secure_context(&self) -> Option<&str> {
        self.secure_context.as_deref()
    }

    /// Name if deployed, else path. Used for logging.
    pub fn display_id(&self) -> &str {
        self.chaincode_id
            .name
            .as_deref()
            .or(self.chaincode_id.path.as_deref())
            .unwrap_or_default()
    }
}

#[derive(Debug, Default)]
pub struct ChaincodeSpecBuilder {
    runtime: ChaincodeRuntime,
    name: Option<String>,
    path: Option<String>,
    function: Option<String>,
    args: Vec<String>,
    secure_context: Option<String>,
}

impl ChaincodeSpecBuilder {
    pub fn runtime(mut self, runtime: ChaincodeRuntime) -> Self {
        self.runtime = runtime;
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn function(mut self, function: impl Into<String>) -> Self {
        self.function = Some(function.into());
        self
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn secure_context(mut self, secure_context: impl Into<String>) -> Self {
        self.secure_context = Some(secure_context.into());
        self
    }

    pub fn build(self) -> Result<ChaincodeSpec, FabricError> {
        let name = self.name.filter(|n| !n.trim().is_empty());
        let path = self.path.filter(|p| !p.trim().is_empty());
        if name.is_none() && path.is_none() {
            return Err(FabricError::validation("chaincode name or path is required"));
        }

        let function = match self.function {
            Some(f) if !f.trim().is_empty() => f,
            _ => return Err(FabricError::validation("chaincode function is required")),
        };

        Ok(ChaincodeSpec {
            runtime: self.runtime,
            chaincode_id: ChaincodeId { path, name },
            ctor_msg: ChaincodeInput {
                function,
                args: self.args,
            },
            secure_context: self.secure_context.filter(|s| !s.is_empty()),
        })
    }
}

/// A single deploy, invoke or query request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChaincodeOperation {
    id: u64,
    method: ChaincodeMethod,
    spec: ChaincodeSpec,
}

impl ChaincodeOperation {
    pub fn new(method: ChaincodeMethod, spec: ChaincodeSpec) -> Self {
        Self { id: 1, method, spec }
    }

    pub fn deploy(spec: ChaincodeSpec) -> Self {
        Self::new(ChaincodeMethod::Deploy, spec)
    }

    pub fn invoke(spec: ChaincodeSpec) -> Self {
        Self::new(ChaincodeMethod::Invoke, spec)
    }

    pub fn query(spec: ChaincodeSpec) -> Self {
        Self::new(ChaincodeMethod::Query, spec)
    }

    /// Sets the JSON-RPC correlation id.
    pub fn with_id(mut self, id: u64) -> Self {
        self.id = id;
        self
    }

    pub fn version(&self) -> &'static str {
        JSONRPC_VERSION
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn method(&self) -> ChaincodeMethod {
        self.method
    }

    pub fn spec(&self) -> &ChaincodeSpec {
        &self.spec
    }
}

/// Opaque handle returned by deploy and invoke, used to look up the
/// resulting transaction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionHandle(String);

impl TransactionHandle {
    pub fn new(handle: impl Into<String>) -> Self {
        Self(handle.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TransactionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The peer's answer to a chaincode operation.
///
/// Deploy and invoke carry a handle to the transaction the peer will commit;
/// only query carries a final value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "method", rename_all = "lowercase")]
pub enum ChaincodeOutcome {
    Deployed { status: String, handle: TransactionHandle },
    Invoked { status: String, handle: TransactionHandle },
    Queried { status: String, value: String },
}

impl ChaincodeOutcome {
    /// Interprets the peer's `message` field according to the submitted method.
    pub fn from_message(method: ChaincodeMethod, status: String, message: String) -> Self {
        match method {
            ChaincodeMethod::Deploy => ChaincodeOutcome::Deployed {
                status,
                handle: TransactionHandle::new(message),
            },
            ChaincodeMethod::Invoke => ChaincodeOutcome::Invoked {
                status,
                handle: TransactionHandle::new(message),
            },
            ChaincodeMethod::Query => ChaincodeOutcome::Queried { status, value: message },
        }
    }

    pub fn method(&self) -> ChaincodeMethod {
        match self {
            ChaincodeOutcome::Deployed { .. } => ChaincodeMethod::Deploy,
            ChaincodeOutcome::Invoked { .. } => ChaincodeMethod::Invoke,
            ChaincodeOutcome::Queried { .. } => ChaincodeMethod::Query,
        }
    }

    pub fn status(&self) -> &str {
        match self {
            ChaincodeOutcome::Deployed { status, .. }
            | ChaincodeOutcome::Invoked { status, .. }
            | ChaincodeOutcome::Queried { status, .. } => status,
        }
    }

    pub fn handle(&self) -> Option<&TransactionHandle> {
        match self {
            ChaincodeOutcome::Deployed { handle, .. } | ChaincodeOutcome::Invoked { handle, .. } => Some(handle),
            ChaincodeOutcome::Queried { .. } => None,
        }
    }

    pub fn value(&self) -> Option<&str> {
        match self {
            ChaincodeOutcome::Queried { value, .. } => Some(value),
            _ => None,
        }
    }
}
