//! Settlement state machine for one submitted transaction.
//!
//! A `Resolver` is fed the updates of a status subscription in order. It
//! settles on the first update that is either a stream error or reports the
//! transaction in a block, and ignores everything after that. Settling sends
//! the outcome through the oneshot channel and cancels the subscription in
//! the same step.

use crate::ResolveError;
use caller_types::{
	DispatchFailure, ErrorRegistry, TransportError, TxStatus, TxUpdate, Unsubscribe,
};
use std::sync::Arc;
use tokio::sync::oneshot;
use tracing::{debug, error, info};

pub type Outcome<T> = Result<T, ResolveError>;

/// What feeding one update did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
	/// Logged; still waiting for a terminal update.
	Pending,
	/// This update settled the outcome.
	Settled,
	/// Already settled; the update was dropped without logging.
	Ignored,
}

enum State<T, F> {
	Waiting {
		sender: oneshot::Sender<Outcome<T>>,
		unsubscribe: Unsubscribe,
		projection: F,
	},
	Settled,
}

pub struct Resolver<T, F> {
	label: String,
	registry: Arc<dyn ErrorRegistry>,
	state: State<T, F>,
}

impl<T, F> Resolver<T, F>
where
	F: FnOnce(&TxUpdate) -> T,
{
	pub fn new(
		label: impl Into<String>,
		registry: Arc<dyn ErrorRegistry>,
		sender: oneshot::Sender<Outcome<T>>,
		unsubscribe: Unsubscribe,
		projection: F,
	) -> Self {
		Self {
			label: label.into(),
			registry,
			state: State::Waiting {
				sender,
				unsubscribe,
				projection,
			},
		}
	}

	pub fn is_settled(&self) -> bool {
		matches!(self.state, State::Settled)
	}

	pub fn on_update(&mut self, update: Result<TxUpdate, TransportError>) -> Step {
		if self.is_settled() {
			return Step::Ignored;
		}

		let update = match update {
			Ok(update) => update,
			Err(e) => return self.reject_transport(e),
		};

		info!("{} (status) {}", self.label, update.status);

		if update.status.is_error() {
			let error = match &update.status {
				TxStatus::Dropped(message) => TransportError::Dropped(message.clone()),
				TxStatus::Error(message) => TransportError::Subscription(message.clone()),
				other => TransportError::Invalid(other.to_string()),
			};
			return self.reject_transport(error);
		}

		if !update.status.is_in_block() {
			return Step::Pending;
		}

		self.log_inclusion(&update);

		match update.dispatch_error {
			Some(raw) => {
				let failure = DispatchFailure::from_raw(&raw, self.registry.as_ref());
				error!("{} (error) {}", self.label, failure);
				self.settle(|_| Err(ResolveError::Dispatch(failure)))
			}
			None => self.settle(|projection| Ok(projection(&update))),
		}
	}

	/// The subscription ended. Settles with `SubscriptionClosed` if no
	/// terminal update was seen.
	pub fn on_closed(&mut self) -> Step {
		if self.is_settled() {
			return Step::Ignored;
		}
		error!("{} (error) subscription closed before inclusion", self.label);
		self.settle(|_| Err(ResolveError::SubscriptionClosed))
	}

	fn reject_transport(&mut self, error: TransportError) -> Step {
		error!("{} (error) {}", self.label, error);
		self.settle(|_| Err(ResolveError::Transport(error)))
	}

	fn log_inclusion(&self, update: &TxUpdate) {
		let events = update
			.events
			.iter()
			.map(ToString::to_string)
			.collect::<Vec<_>>();
		info!("{} (events/system) [{}]", self.label, events.join(", "));

		if !update.contract_events.is_empty() {
			let events = update
				.contract_events
				.iter()
				.map(ToString::to_string)
				.collect::<Vec<_>>();
			info!("{} (events/contract) [{}]", self.label, events.join(", "));
		}

		if let Some(dispatch_info) = &update.dispatch_info {
			info!("{} (dispatch) {}", self.label, dispatch_info);
		}
	}

	fn settle(&mut self, outcome: impl FnOnce(F) -> Outcome<T>) -> Step {
		match std::mem::replace(&mut self.state, State::Settled) {
			State::Waiting {
				sender,
				mut unsubscribe,
				projection,
			} => {
				let result = outcome(projection);
				unsubscribe.cancel();
				if sender.send(result).is_err() {
					debug!("{} outcome dropped, caller went away", self.label);
				}
				Step::Settled
			}
			State::Settled => Step::Ignored,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use caller_types::{
		ChainEvent, ContractEvent, InclusionRef, ModuleErrorIndex, ModuleErrorMetadata,
		RawDispatchError, H256,
	};
	use std::sync::atomic::{AtomicUsize, Ordering};

	struct Registry;

	impl ErrorRegistry for Registry {
		fn find_module_error(&self, index: &ModuleErrorIndex) -> Option<ModuleErrorMetadata> {
			(index.pallet_index == 8 && index.variant_index() == 6).then(|| ModuleErrorMetadata {
				pallet: "Contracts".to_string(),
				name: "OutOfGas".to_string(),
				docs: vec![
					"The executed contract exhausted its gas limit.".to_string(),
					"Try a higher limit.".to_string(),
				],
			})
		}
	}

	struct Harness {
		resolver: Resolver<u32, Box<dyn FnOnce(&TxUpdate) -> u32 + Send>>,
		receiver: oneshot::Receiver<Outcome<u32>>,
		cancels: Arc<AtomicUsize>,
		projections: Arc<AtomicUsize>,
	}

	fn harness() -> Harness {
		let (sender, receiver) = oneshot::channel();
		let cancels = Arc::new(AtomicUsize::new(0));
		let projections = Arc::new(AtomicUsize::new(0));

		let counter = cancels.clone();
		let unsubscribe = Unsubscribe::new(move || {
			counter.fetch_add(1, Ordering::SeqCst);
		});
		let counter = projections.clone();
		let projection: Box<dyn FnOnce(&TxUpdate) -> u32 + Send> = Box::new(move |update| {
			counter.fetch_add(1, Ordering::SeqCst);
			update.events.len() as u32
		});

		Harness {
			resolver: Resolver::new("test", Arc::new(Registry), sender, unsubscribe, projection),
			receiver,
			cancels,
			projections,
		}
	}

	fn inclusion() -> InclusionRef {
		InclusionRef {
			block_hash: H256([1; 32]),
			extrinsic_hash: H256([2; 32]),
		}
	}

	fn in_block() -> TxUpdate {
		TxUpdate {
			status: TxStatus::InBlock(inclusion()),
			events: vec![
				ChainEvent {
					pallet: "Contracts".to_string(),
					variant: "Called".to_string(),
					fields: None,
				},
				ChainEvent {
					pallet: "System".to_string(),
					variant: "ExtrinsicSuccess".to_string(),
					fields: None,
				},
			],
			dispatch_info: Some("{ class: Normal }".to_string()),
			dispatch_error: None,
			contract_events: vec![ContractEvent {
				identifier: "Flipped".to_string(),
				args: vec!["true".to_string()],
			}],
		}
	}

	fn failed(error: RawDispatchError) -> TxUpdate {
		TxUpdate {
			dispatch_error: Some(error),
			..in_block()
		}
	}

	#[test]
	fn test_pending_statuses_keep_waiting() {
		let mut h = harness();
		assert_eq!(
			h.resolver.on_update(Ok(TxUpdate::pending(TxStatus::Validated))),
			Step::Pending
		);
		assert_eq!(
			h.resolver.on_update(Ok(TxUpdate::pending(TxStatus::Broadcasted))),
			Step::Pending
		);
		assert!(!h.resolver.is_settled());
		assert_eq!(h.cancels.load(Ordering::SeqCst), 0);
		assert!(h.receiver.try_recv().is_err());
	}

	#[test]
	fn test_inclusion_fulfils_with_projection() {
		let mut h = harness();
		h.resolver.on_update(Ok(TxUpdate::pending(TxStatus::Broadcasted)));
		assert_eq!(h.resolver.on_update(Ok(in_block())), Step::Settled);

		assert_eq!(h.receiver.try_recv().unwrap().unwrap(), 2);
		assert_eq!(h.cancels.load(Ordering::SeqCst), 1);
		assert_eq!(h.projections.load(Ordering::SeqCst), 1);
	}

	#[test]
	fn test_transport_error_rejects_before_inclusion() {
		let mut h = harness();
		let error = TransportError::Invalid("bad proof".to_string());
		assert_eq!(h.resolver.on_update(Err(error.clone())), Step::Settled);

		match h.receiver.try_recv().unwrap() {
			Err(ResolveError::Transport(received)) => assert_eq!(received, error),
			other => panic!("unexpected outcome: {:?}", other),
		}
		assert_eq!(h.cancels.load(Ordering::SeqCst), 1);
		assert_eq!(h.projections.load(Ordering::SeqCst), 0);
	}

	#[test]
	fn test_error_status_is_a_transport_error() {
		let mut h = harness();
		let step = h
			.resolver
			.on_update(Ok(TxUpdate::pending(TxStatus::Dropped("usurped".to_string()))));
		assert_eq!(step, Step::Settled);
		assert!(matches!(
			h.receiver.try_recv().unwrap(),
			Err(ResolveError::Transport(TransportError::Dropped(_)))
		));
	}

	#[test]
	fn test_watch_error_status_rejects() {
		let mut h = harness();
		h.resolver.on_update(Ok(TxUpdate::pending(TxStatus::Broadcasted)));
		let step = h.resolver.on_update(Ok(TxUpdate::pending(TxStatus::Error(
			"subscription dropped".to_string(),
		))));
		assert_eq!(step, Step::Settled);

		match h.receiver.try_recv().unwrap() {
			Err(ResolveError::Transport(TransportError::Subscription(message))) => {
				assert_eq!(message, "subscription dropped");
			}
			other => panic!("unexpected outcome: {:?}", other),
		}
		assert_eq!(h.cancels.load(Ordering::SeqCst), 1);
		assert_eq!(h.projections.load(Ordering::SeqCst), 0);
	}

	#[test]
	fn test_module_error_is_decoded() {
		let mut h = harness();
		let raw = RawDispatchError::Module(ModuleErrorIndex {
			pallet_index: 8,
			error: [6, 0, 0, 0],
		});
		assert_eq!(h.resolver.on_update(Ok(failed(raw))), Step::Settled);

		match h.receiver.try_recv().unwrap() {
			Err(ResolveError::Dispatch(failure)) => {
				assert_eq!(
					failure.to_string(),
					"Contracts.OutOfGas: The executed contract exhausted its gas limit. Try a higher limit."
				);
			}
			other => panic!("unexpected outcome: {:?}", other),
		}
		assert_eq!(h.cancels.load(Ordering::SeqCst), 1);
		assert_eq!(h.projections.load(Ordering::SeqCst), 0);
	}

	#[test]
	fn test_other_error_passes_raw_descriptor() {
		let mut h = harness();
		h.resolver.on_update(Ok(failed(RawDispatchError::BadOrigin)));

		assert!(matches!(
			h.receiver.try_recv().unwrap(),
			Err(ResolveError::Dispatch(DispatchFailure::Other(raw))) if raw == "BadOrigin"
		));
	}

	#[test]
	fn test_unknown_module_error_falls_back_to_raw() {
		let mut h = harness();
		let raw = RawDispatchError::Module(ModuleErrorIndex {
			pallet_index: 40,
			error: [1, 0, 0, 0],
		});
		h.resolver.on_update(Ok(failed(raw)));

		assert!(matches!(
			h.receiver.try_recv().unwrap(),
			Err(ResolveError::Dispatch(DispatchFailure::Other(raw)))
				if raw == "Module { index: 40, error: 0x01000000 }"
		));
	}

	#[test]
	fn test_updates_after_settlement_are_ignored() {
		let mut h = harness();
		h.resolver.on_update(Ok(in_block()));

		let finalized = TxUpdate {
			status: TxStatus::Finalized(inclusion()),
			..in_block()
		};
		assert_eq!(h.resolver.on_update(Ok(finalized)), Step::Ignored);
		assert_eq!(
			h.resolver
				.on_update(Err(TransportError::Subscription("closed".to_string()))),
			Step::Ignored
		);
		assert_eq!(h.resolver.on_closed(), Step::Ignored);

		assert_eq!(h.cancels.load(Ordering::SeqCst), 1);
		assert_eq!(h.projections.load(Ordering::SeqCst), 1);
		assert_eq!(h.receiver.try_recv().unwrap().unwrap(), 2);
	}

	#[test]
	fn test_finalized_counts_as_inclusion() {
		let mut h = harness();
		let finalized = TxUpdate {
			status: TxStatus::Finalized(inclusion()),
			..in_block()
		};
		assert_eq!(h.resolver.on_update(Ok(finalized)), Step::Settled);
		assert!(h.receiver.try_recv().unwrap().is_ok());
	}

	#[test]
	fn test_closed_stream_rejects() {
		let mut h = harness();
		h.resolver.on_update(Ok(TxUpdate::pending(TxStatus::Validated)));
		assert_eq!(h.resolver.on_closed(), Step::Settled);

		assert!(matches!(
			h.receiver.try_recv().unwrap(),
			Err(ResolveError::SubscriptionClosed)
		));
		assert_eq!(h.cancels.load(Ordering::SeqCst), 1);
	}

	#[test]
	fn test_dropped_receiver_still_cancels() {
		let mut h = harness();
		drop(h.receiver);
		assert_eq!(h.resolver.on_update(Ok(in_block())), Step::Settled);
		assert_eq!(h.cancels.load(Ordering::SeqCst), 1);
	}
}
