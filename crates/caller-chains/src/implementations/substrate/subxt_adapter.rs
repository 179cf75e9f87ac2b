//! `subxt` based connection to a contracts chain.
//!
//! Transactions are submitted as dynamic `Contracts.call` extrinsics and
//! watched until they leave the pool. Every status reported by the node is
//! turned into a `TxUpdate`; once the transaction is in a block the update
//! also carries the extrinsic's events, its dispatch info and error, and the
//! events emitted by the called contract.

use super::{MetadataErrorRegistry, SignerAdapter};
use async_trait::async_trait;
use caller_types::{
	AccountId, ChainError, ChainEvent, ChainInterface, ContractCall, ContractCallRequest,
	ContractEvent, ContractEventDecoder, ErrorRegistry, InclusionRef, RawDispatchError,
	SigningAccount, Subscription, TransportError, TxStatus, TxUpdate, Unsubscribe, H256,
};
use codec::{Decode, Encode};
use futures::StreamExt;
use std::sync::Arc;
use subxt::{
	config::PolkadotConfig,
	dynamic::Value,
	events::EventDetails,
	tx::{TxInBlock, TxStatus as SubxtStatus},
	OnlineClient,
};
use tracing::{debug, info, warn};

type Client = OnlineClient<PolkadotConfig>;

/// Connection to a node exposing `pallet-contracts`.
pub struct SubstrateChain {
	client: Client,
}

impl SubstrateChain {
	/// Connects to `url`. Plain `ws://` endpoints on non-local hosts are
	/// refused unless `allow_insecure` is set.
	pub async fn connect(url: &str, allow_insecure: bool) -> Result<Self, ChainError> {
		info!("Connecting to {}", url);

		let client = if allow_insecure {
			Client::from_insecure_url(url).await
		} else {
			Client::from_url(url).await
		}
		.map_err(|e| ChainError::Connection(format!("{}: {}", url, e)))?;

		let version = client.runtime_version();
		info!(
			spec_version = version.spec_version,
			transaction_version = version.transaction_version,
			"Connected to {}",
			url
		);

		Ok(Self { client })
	}

	fn call_payload(call: &ContractCall) -> subxt::tx::DynamicPayload {
		let storage_deposit_limit = match call.storage_deposit_limit {
			Some(limit) => Value::unnamed_variant("Some", [Value::u128(limit)]),
			None => Value::unnamed_variant("None", []),
		};

		subxt::dynamic::tx(
			"Contracts",
			"call",
			vec![
				Value::unnamed_variant("Id", [Value::from_bytes(call.dest.0)]),
				Value::u128(call.value),
				Value::named_composite([
					("ref_time", Value::u128(call.gas_limit.ref_time as u128)),
					("proof_size", Value::u128(call.gas_limit.proof_size as u128)),
				]),
				storage_deposit_limit,
				Value::from_bytes(&call.data),
			],
		)
	}
}

#[async_trait]
impl ChainInterface for SubstrateChain {
	async fn submit_and_watch(
		&self,
		call: ContractCall,
		signer: &dyn SigningAccount,
	) -> Result<Subscription, ChainError> {
		let payload = Self::call_payload(&call);
		debug!(?call, "Submitting Contracts.call");

		let mut progress = self
			.client
			.tx()
			.sign_and_submit_then_watch_default(&payload, &SignerAdapter::new(signer))
			.await
			.map_err(|e| ChainError::Submission(e.to_string()))?;

		let dest = call.dest;
		let decoder = call.event_decoder;

		let updates = async_stream::stream! {
			while let Some(status) = progress.next().await {
				let update = match status {
					Ok(SubxtStatus::InBestBlock(tx)) => {
						let status = TxStatus::InBlock(inclusion_ref(&tx));
						Ok(inclusion_update(status, &tx, &dest, decoder.as_deref()).await)
					}
					Ok(SubxtStatus::InFinalizedBlock(tx)) => {
						let status = TxStatus::Finalized(inclusion_ref(&tx));
						Ok(inclusion_update(status, &tx, &dest, decoder.as_deref()).await)
					}
					Ok(status) => match pool_status(&status) {
						Some(status) => Ok(TxUpdate::pending(status)),
						None => continue,
					},
					Err(e) => Err(TransportError::Subscription(e.to_string())),
				};

				let terminal = match &update {
					Ok(update) => {
						matches!(update.status, TxStatus::Finalized(_)) || update.status.is_error()
					}
					Err(_) => true,
				};
				yield update;
				if terminal {
					break;
				}
			}
		};

		let (updates, handle) = futures::stream::abortable(updates);
		Ok(Subscription {
			updates: updates.boxed(),
			unsubscribe: Unsubscribe::new(move || handle.abort()),
		})
	}

	async fn call_contract(&self, request: ContractCallRequest) -> Result<Vec<u8>, ChainError> {
		let params = request.encode();
		let RawBytes(bytes) = self
			.client
			.runtime_api()
			.at_latest()
			.await
			.map_err(|e| ChainError::RuntimeApi(e.to_string()))?
			.call_raw::<RawBytes>("ContractsApi_call", Some(&params))
			.await
			.map_err(|e| ChainError::RuntimeApi(e.to_string()))?;

		debug!(len = bytes.len(), "ContractsApi_call returned");
		Ok(bytes)
	}

	fn error_registry(&self) -> Arc<dyn ErrorRegistry> {
		Arc::new(MetadataErrorRegistry::new(self.client.metadata()))
	}
}

/// Maps a status that carries no block to its pool status. Rejections are
/// passed on as statuses so they get logged before the outcome settles.
fn pool_status<C>(status: &SubxtStatus<PolkadotConfig, C>) -> Option<TxStatus> {
	match status {
		SubxtStatus::Validated => Some(TxStatus::Validated),
		SubxtStatus::Broadcasted { .. } => Some(TxStatus::Broadcasted),
		SubxtStatus::NoLongerInBestBlock => Some(TxStatus::NoLongerInBestBlock),
		SubxtStatus::Invalid { message } => Some(TxStatus::Invalid(message.clone())),
		SubxtStatus::Dropped { message } => Some(TxStatus::Dropped(message.clone())),
		SubxtStatus::Error { message } => Some(TxStatus::Error(message.clone())),
		SubxtStatus::InBestBlock(_) | SubxtStatus::InFinalizedBlock(_) => None,
	}
}

fn inclusion_ref(tx: &TxInBlock<PolkadotConfig, Client>) -> InclusionRef {
	InclusionRef {
		block_hash: H256(tx.block_hash().0),
		extrinsic_hash: H256(tx.extrinsic_hash().0),
	}
}

/// The parts of an extrinsic event needed to classify and log it.
struct BlockEvent {
	pallet: String,
	variant: String,
	topics: Vec<[u8; 32]>,
	field_bytes: Vec<u8>,
	fields: Option<String>,
	last_field: Option<String>,
}

impl BlockEvent {
	fn from_details(event: &EventDetails<PolkadotConfig>) -> Self {
		let values = event.field_values().ok();
		let fields = values
			.as_ref()
			.and_then(|fields| fields.values().next().is_some().then(|| fields.to_string()));
		let last_field = values
			.as_ref()
			.and_then(|fields| fields.values().last().map(|value| value.to_string()));

		Self {
			pallet: event.pallet_name().to_string(),
			variant: event.variant_name().to_string(),
			topics: event.topics().iter().map(|topic| topic.0).collect(),
			field_bytes: event.field_bytes().to_vec(),
			fields,
			last_field,
		}
	}
}

/// Fetches and classifies the events of an included extrinsic.
///
/// Events that cannot be fetched or decoded are logged and left out; the
/// transaction is included either way.
async fn inclusion_update(
	status: TxStatus,
	tx: &TxInBlock<PolkadotConfig, Client>,
	dest: &AccountId,
	decoder: Option<&dyn ContractEventDecoder>,
) -> TxUpdate {
	let events = match tx.fetch_events().await {
		Ok(events) => events
			.iter()
			.filter_map(skip_undecodable)
			.map(|event| BlockEvent::from_details(&event))
			.collect(),
		Err(e) => {
			warn!("Failed to fetch events of {}: {}", status, e);
			Vec::new()
		}
	};

	classify_events(status, events, dest, decoder)
}

fn skip_undecodable<T, E: std::fmt::Display>(event: Result<T, E>) -> Option<T> {
	match event {
		Ok(event) => Some(event),
		Err(e) => {
			warn!("Skipping undecodable event: {}", e);
			None
		}
	}
}

fn classify_events(
	status: TxStatus,
	events: Vec<BlockEvent>,
	dest: &AccountId,
	decoder: Option<&dyn ContractEventDecoder>,
) -> TxUpdate {
	let mut update = TxUpdate::pending(status);
	for event in events {
		match (event.pallet.as_str(), event.variant.as_str()) {
			("System", "ExtrinsicSuccess") => {
				update.dispatch_info = event.last_field.clone();
			}
			("System", "ExtrinsicFailed") => {
				update.dispatch_info = event.last_field.clone();
				match RawDispatchError::decode(&mut event.field_bytes.as_slice()) {
					Ok(error) => update.dispatch_error = Some(error),
					Err(e) => warn!("Failed to decode dispatch error: {}", e),
				}
			}
			("Contracts", "ContractEmitted") => {
				if let Some(event) = contract_event(&event, dest, decoder) {
					update.contract_events.push(event);
				}
			}
			_ => {}
		}

		update.events.push(ChainEvent {
			pallet: event.pallet,
			variant: event.variant,
			fields: event.fields,
		});
	}

	update
}

fn contract_event(
	event: &BlockEvent,
	dest: &AccountId,
	decoder: Option<&dyn ContractEventDecoder>,
) -> Option<ContractEvent> {
	let (contract, data) = match <(AccountId, Vec<u8>)>::decode(&mut event.field_bytes.as_slice()) {
		Ok(decoded) => decoded,
		Err(e) => {
			warn!("Failed to decode ContractEmitted: {}", e);
			return None;
		}
	};

	if &contract != dest {
		return None;
	}

	let decoder = decoder?;
	match decoder.decode_event(&event.topics, &data) {
		Ok(event) => Some(event),
		Err(e) => {
			warn!(contract = %contract, "{}", e);
			None
		}
	}
}

/// Undecoded runtime API response.
struct RawBytes(Vec<u8>);

impl Decode for RawBytes {
	fn decode<I: codec::Input>(input: &mut I) -> Result<Self, codec::Error> {
		let len = input.remaining_len()?.unwrap_or(0);
		let mut bytes = vec![0u8; len];
		input.read(&mut bytes)?;
		Ok(RawBytes(bytes))
	}
}
