use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::error::FabricError;
use crate::models::{ChaincodeRuntime, ChaincodeSpec};

#[derive(Parser)]
#[command(name = "fabric-client")]
#[command(about = "Peer REST API client", long_about = None)]
pub struct Cli {
    #[arg(
        short,
        long,
        global = true,
        help = "Path to the configuration file",
        default_value = "data/config.toml"
    )]
    pub config: PathBuf,
    #[command(flatten)]
    pub peer: PeerArgs,
    #[command(subcommand)]
    pub command: Commands,
}

/// Overrides for the `[client]` section of the configuration file.
#[derive(Args, Debug, Clone, Default)]
pub struct PeerArgs {
    #[arg(short = 'u', long, global = true, help = "Base URL of the peer REST API")]
    pub peer_url: Option<String>,
    #[arg(short, long, global = true, help = "Log request and response bodies")]
    pub verbose: bool,
}

pub trait ApplyArgs {
    fn apply_peer(&mut self, args: &PeerArgs);
}

#[derive(Subcommand)]
pub enum Commands {
    /// Registrar enrollment management
    Registrar {
        #[command(subcommand)]
        registrar_subcommand: RegistrarCommand,
    },
    /// Deploy a chaincode and wait for the deploy transaction
    Deploy {
        #[command(flatten)]
        chaincode: ChaincodeArgs,
        #[arg(long, help = "Print the submission result without waiting for the transaction")]
        no_wait: bool,
    },
    /// Invoke a chaincode function and wait for the transaction
    Invoke {
        #[command(flatten)]
        chaincode: ChaincodeArgs,
        #[arg(long, help = "Print the submission result without waiting for the transaction")]
        no_wait: bool,
    },
    /// Query a chaincode function
    Query {
        #[command(flatten)]
        chaincode: ChaincodeArgs,
    },
    /// Show a transaction by its id
    Transaction {
        #[arg(help = "Transaction id returned by deploy or invoke")]
        uuid: String,
    },
    /// Show a block by its index
    Block {
        #[arg(help = "Block index")]
        index: u64,
    },
    /// Show blockchain height and hashes
    Chain,
    /// List the peers in the network
    Peers,
}

#[derive(Subcommand)]
pub enum RegistrarCommand {
    /// Enroll a registrar with the peer
    Create {
        #[arg(short = 'i', long, help = "Enrollment id")]
        enroll_id: String,
        #[arg(short = 's', long, help = "Enrollment secret")]
        enroll_secret: String,
    },
    /// Check that a registrar is enrolled
    Get {
        #[arg(help = "Enrollment id")]
        enroll_id: String,
    },
    /// Show a registrar's enrollment certificate
    Ecert {
        #[arg(help = "Enrollment id")]
        enroll_id: String,
    },
    /// List a registrar's transaction certificates
    Tcert {
        #[arg(help = "Enrollment id")]
        enroll_id: String,
    },
    /// Remove a registrar's enrollment
    Delete {
        #[arg(help = "Enrollment id")]
        enroll_id: String,
    },
}

#[derive(Args, Debug, Clone)]
pub struct ChaincodeArgs {
    #[arg(short, long, help = "Chaincode name", required_unless_present = "path")]
    pub name: Option<String>,
    #[arg(short, long, help = "Chaincode source path (deploy)")]
    pub path: Option<String>,
    #[arg(short, long, help = "Function to call")]
    pub function: String,
    #[arg(short, long = "arg", help = "Function argument. Can be specified multiple times.")]
    pub args: Vec<String>,
    #[arg(short, long, help = "Enrollment id executing the chaincode")]
    pub secure_context: Option<String>,
    #[arg(short, long, help = "Chaincode runtime", default_value_t = ChaincodeRuntime::Golang)]
    pub runtime: ChaincodeRuntime,
    #[arg(long, help = "JSON-RPC correlation id", default_value_t = 1)]
    pub id: u64,
}

impl ChaincodeArgs {
    pub fn to_spec(&self) -> Result<ChaincodeSpec, FabricError> {
        let mut builder = ChaincodeSpec::builder()
            .runtime(self.runtime)
            .function(&self.function)
            .args(self.args.iter().cloned());
        if let Some(name) = &self.name {
            builder = builder.name(name);
        }
        if let Some(path) = &self.path {
            builder = builder.path(path);
        }
        if let Some(secure_context) = &self.secure_context {
            builder = builder.secure_context(secure_context);
        }
        builder.build()
    }
}
