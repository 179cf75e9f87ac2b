//! Transaction submission and result resolution.
//!
//! `sign_and_resolve` turns the multi-update status subscription of a
//! submitted transaction into one outcome: the projection of the first
//! update reporting block inclusion, or the first error.

use caller_types::{
	ChainError, ChainInterface, ContractCall, DispatchFailure, SigningAccount, TransportError,
	TxUpdate,
};
use futures::StreamExt;
use thiserror::Error;
use tokio::sync::oneshot;
use tracing::debug;

pub mod resolver;

pub use resolver::{Outcome, Resolver, Step};

#[derive(Debug, Error)]
pub enum ResolveError {
	/// The transaction was never submitted.
	#[error("Submission failed: {0}")]
	Submission(#[from] ChainError),

	/// The status stream failed before the transaction was included.
	#[error(transparent)]
	Transport(#[from] TransportError),

	/// The transaction was included but its dispatch failed.
	#[error("Dispatch failed: {0}")]
	Dispatch(#[from] DispatchFailure),

	#[error("Status subscription closed before inclusion")]
	SubscriptionClosed,
}

/// Signs and submits `call`, then waits for its outcome.
///
/// Every status update is logged under `label`. The subscription is cancelled
/// as soon as the outcome is known. There is no timeout.
pub async fn sign_and_resolve<T, F>(
	chain: &dyn ChainInterface,
	label: &str,
	call: ContractCall,
	signer: &dyn SigningAccount,
	projection: F,
) -> Result<T, ResolveError>
where
	T: Send + 'static,
	F: FnOnce(&TxUpdate) -> T + Send + 'static,
{
	let subscription = chain.submit_and_watch(call, signer).await?;
	let (sender, receiver) = oneshot::channel();

	let mut resolver = Resolver::new(
		label,
		chain.error_registry(),
		sender,
		subscription.unsubscribe,
		projection,
	);
	let mut updates = subscription.updates;

	tokio::spawn(async move {
		while let Some(update) = updates.next().await {
			if resolver.on_update(update) == Step::Settled {
				return;
			}
		}
		resolver.on_closed();
	});

	receiver.await.map_err(|_| {
		debug!("Resolver task ended without an outcome");
		ResolveError::SubscriptionClosed
	})?
}
