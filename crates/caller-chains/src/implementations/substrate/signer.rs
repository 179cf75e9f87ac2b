//! Bridges `SigningAccount` to the signer interface `subxt` expects.

use caller_types::SigningAccount;
use subxt::{
	config::PolkadotConfig,
	tx::Signer,
	utils::{AccountId32, MultiAddress, MultiSignature},
};

pub struct SignerAdapter<'a> {
	account: &'a dyn SigningAccount,
}

impl<'a> SignerAdapter<'a> {
	pub fn new(account: &'a dyn SigningAccount) -> Self {
		Self { account }
	}
}

impl Signer<PolkadotConfig> for SignerAdapter<'_> {
	fn account_id(&self) -> AccountId32 {
		AccountId32(self.account.account_id().0)
	}

	fn address(&self) -> MultiAddress<AccountId32, ()> {
		MultiAddress::Id(self.account_id())
	}

	fn sign(&self, signer_payload: &[u8]) -> MultiSignature {
		MultiSignature::Sr25519(self.account.sign(signer_payload).0)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use caller_types::{AccountId, Signature};

	struct FixedAccount;

	impl SigningAccount for FixedAccount {
		fn account_id(&self) -> AccountId {
			AccountId([3; 32])
		}

		fn sign(&self, payload: &[u8]) -> Signature {
			Signature([payload.len() as u8; 64])
		}
	}

	#[test]
	fn test_adapter_forwards_identity_and_signature() {
		let account = FixedAccount;
		let signer = SignerAdapter::new(&account);

		assert_eq!(signer.account_id(), AccountId32([3; 32]));
		assert_eq!(signer.address(), MultiAddress::Id(AccountId32([3; 32])));
		match signer.sign(b"abc") {
			MultiSignature::Sr25519(bytes) => assert_eq!(bytes, [3; 64]),
			other => panic!("unexpected signature: {:?}", other),
		}
	}
}
