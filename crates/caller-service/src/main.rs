use anyhow::{Context, Result};
use caller_account::account_from_uri;
use caller_chains::{parse_address, SubstrateChain};
use caller_config::{CallerConfig, ConfigLoader};
use caller_contract::{ContractMetadata, ContractProxy};
use caller_service::cli::{Args, Command};
use caller_service::Flipper;
use clap::Parser;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> ExitCode {
	let args = Args::parse();

	match run(args).await {
		Ok(()) => {
			println!();
			println!("Done.");
			ExitCode::SUCCESS
		}
		Err(e) => {
			println!();
			eprintln!("Error. {:#}", e);
			ExitCode::FAILURE
		}
	}
}

async fn run(args: Args) -> Result<()> {
	let config = ConfigLoader::new()
		.with_optional_file(args.config.as_ref())
		.load()
		.await
		.context("Failed to load configuration")?;

	let log_level = args
		.log_level
		.clone()
		.unwrap_or_else(|| config.logging.level.clone());
	setup_tracing(&log_level, args.json_logs || config.logging.json)?;

	match args.command.unwrap_or(Command::Run) {
		Command::Validate => validate(&config),
		command => {
			let flipper = connect(&config).await?;
			match command {
				Command::Get => flipper.get_value().await.map(|_| ())?,
				Command::Flip => flipper.flip_value().await?,
				_ => flipper.run().await?,
			}
			Ok(())
		}
	}
}

async fn connect(config: &CallerConfig) -> Result<Flipper> {
	let metadata = ContractMetadata::from_file(&config.contract.metadata)
		.with_context(|| format!("Failed to load {:?}", config.contract.metadata))?;
	let address =
		parse_address(&config.contract.address).context("Invalid contract address")?;
	let signer = account_from_uri(&config.account.seed).context("Invalid account seed")?;

	let chain = SubstrateChain::connect(&config.node.url, config.node.allow_insecure)
		.await
		.context("Failed to connect to node")?;
	let chain = Arc::new(chain);

	info!(
		contract = %config.contract.address,
		name = metadata.name(),
		"Using contract"
	);
	let contract = ContractProxy::new(chain.clone(), address, Arc::new(metadata));

	Ok(Flipper::new(chain, signer, contract))
}

fn validate(config: &CallerConfig) -> Result<()> {
	info!("Validating configuration");

	parse_address(&config.contract.address).context("Invalid contract address")?;
	account_from_uri(&config.account.seed).context("Invalid account seed")?;
	let metadata = ContractMetadata::from_file(&config.contract.metadata)
		.with_context(|| format!("Failed to load {:?}", config.contract.metadata))?;

	info!("Configuration is valid");
	info!("Node: {}", config.node.url);
	info!("Contract: {} (metadata v{})", metadata.name(), metadata.version());
	for message in metadata.messages() {
		info!(
			"  {} 0x{}{}",
			message.label,
			message
				.selector
				.iter()
				.map(|b| format!("{:02x}", b))
				.collect::<String>(),
			if message.mutates { " (mutates)" } else { "" }
		);
	}

	Ok(())
}

fn setup_tracing(log_level: &str, json: bool) -> Result<()> {
	let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
		.or_else(|_| tracing_subscriber::EnvFilter::try_new(log_level))
		.with_context(|| format!("Invalid log level: {}", log_level))?;

	let registry = tracing_subscriber::registry().with(env_filter);
	if json {
		registry.with(tracing_subscriber::fmt::layer().json()).init();
	} else {
		registry.with(tracing_subscriber::fmt::layer()).init();
	}

	Ok(())
}
