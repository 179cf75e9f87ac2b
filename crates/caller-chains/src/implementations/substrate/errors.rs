//! Module error lookup against the node's runtime metadata.

use caller_types::{ErrorRegistry, ModuleErrorIndex, ModuleErrorMetadata};
use subxt::Metadata;

/// Resolves `Module` dispatch errors using the metadata the client fetched
/// on connection.
#[derive(Clone)]
pub struct MetadataErrorRegistry {
	metadata: Metadata,
}

impl MetadataErrorRegistry {
	pub fn new(metadata: Metadata) -> Self {
		Self { metadata }
	}
}

impl ErrorRegistry for MetadataErrorRegistry {
	fn find_module_error(&self, index: &ModuleErrorIndex) -> Option<ModuleErrorMetadata> {
		let pallet = self.metadata.pallet_by_index(index.pallet_index)?;
		let variant = pallet.error_variant_by_index(index.variant_index())?;

		Some(ModuleErrorMetadata {
			pallet: pallet.name().to_string(),
			name: variant.name.clone(),
			docs: variant.docs.clone(),
		})
	}
}
