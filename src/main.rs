use clap::Parser;
use log::{info, warn};
use serde::Serialize;
use tokio_util::sync::CancellationToken;

use fabric_client::chaincode::{ChaincodeWorkflow, SettlePolicy};
use fabric_client::cli::{ChaincodeArgs, Cli, Commands, RegistrarCommand};
use fabric_client::config::load_client_config;
use fabric_client::http::FabricHttpClient;
use fabric_client::log::init_logging;
use fabric_client::models::{ChaincodeMethod, ChaincodeOperation, Credential, TransactionHandle};

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    init_logging()?;

    let cli = Cli::parse();
    let config = load_client_config(&cli.config, &cli.peer)?;
    let client = FabricHttpClient::from_config(&config)?;
    info!(peer = &*client.get_address(); "Using peer");

    match cli.command {
        Commands::Registrar { registrar_subcommand } => run_registrar(&client, registrar_subcommand).await,
        Commands::Deploy { chaincode, no_wait } => {
            run_chaincode(&client, ChaincodeMethod::Deploy, &chaincode, no_wait, config.settle_policy()).await
        },
        Commands::Invoke { chaincode, no_wait } => {
            run_chaincode(&client, ChaincodeMethod::Invoke, &chaincode, no_wait, config.settle_policy()).await
        },
        Commands::Query { chaincode } => {
            let operation = ChaincodeOperation::query(chaincode.to_spec()?).with_id(chaincode.id);
            let value = ChaincodeWorkflow::new(&client).query(&operation).await?;
            println!("{}", value);
            Ok(())
        },
        Commands::Transaction { uuid } => print_json(&client.get_transaction(&TransactionHandle::new(uuid)).await?),
        Commands::Block { index } => print_json(&client.get_block(index).await?),
        Commands::Chain => print_json(&client.get_blockchain_info().await?),
        Commands::Peers => print_json(&client.get_network_peers().await?),
    }
}

async fn run_registrar(client: &FabricHttpClient, command: RegistrarCommand) -> Result<(), anyhow::Error> {
    match command {
        RegistrarCommand::Create {
            enroll_id,
            enroll_secret,
        } => {
            let ok = client
                .create_registrar(&Credential::new(enroll_id, enroll_secret))
                .await?;
            println!("{}", ok);
        },
        RegistrarCommand::Get { enroll_id } => println!("{}", client.get_registrar(&enroll_id).await?),
        RegistrarCommand::Ecert { enroll_id } => println!("{}", client.get_registrar_ecert(&enroll_id).await?),
        RegistrarCommand::Tcert { enroll_id } => {
            for tcert in client.get_registrar_tcerts(&enroll_id).await? {
                println!("{}", tcert);
            }
        },
        RegistrarCommand::Delete { enroll_id } => println!("{}", client.delete_registrar(&enroll_id).await?),
    }
    Ok(())
}

async fn run_chaincode(
    client: &FabricHttpClient,
    method: ChaincodeMethod,
    args: &ChaincodeArgs,
    no_wait: bool,
    policy: SettlePolicy,
) -> Result<(), anyhow::Error> {
    let operation = ChaincodeOperation::new(method, args.to_spec()?).with_id(args.id);

    if no_wait {
        return print_json(&client.submit_chaincode_operation(&operation).await?);
    }

    let cancel = CancellationToken::new();
    let ctrl_c = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("Interrupted; the submission may still commit on the peer");
                cancel.cancel();
            }
        })
    };

    let result = ChaincodeWorkflow::new(client)
        .run_and_await_transaction_with_cancel(&operation, policy, &cancel)
        .await;
    ctrl_c.abort();

    print_json(&result?)
}

fn print_json<T: Serialize>(value: &T) -> Result<(), anyhow::Error> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
