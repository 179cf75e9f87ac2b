//! ink! metadata loading, call encoding and output/event decoding.

use crate::ContractError;
use caller_types::{ContractEvent, ContractEventDecoder, EventDecodeError};
use scale_info::{PortableRegistry, PortableType};
use scale_value::{Value, ValueDef};
use serde::{Deserialize, Deserializer};
use std::path::Path;
use tracing::debug;

/// Reference to a type in the metadata's type registry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeSpec {
	#[serde(rename = "type")]
	pub ty: u32,
	#[serde(default)]
	pub display_name: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MessageArg {
	pub label: String,
	#[serde(rename = "type")]
	pub ty: TypeSpec,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EventArg {
	pub label: String,
	#[serde(default)]
	pub indexed: bool,
	#[serde(rename = "type")]
	pub ty: TypeSpec,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EventSpec {
	pub label: String,
	/// First topic of every emission (ink! 5). `None` for anonymous events
	/// and for ink! 4, which identifies events by index.
	#[serde(default, alias = "signatureTopic", deserialize_with = "signature_topic")]
	pub signature_topic: Option<[u8; 32]>,
	#[serde(default)]
	pub args: Vec<EventArg>,
	#[serde(default)]
	pub docs: Vec<String>,
}

fn signature_topic<'de, D>(deserializer: D) -> Result<Option<[u8; 32]>, D::Error>
where
	D: Deserializer<'de>,
{
	let Some(topic) = Option::<String>::deserialize(deserializer)? else {
		return Ok(None);
	};
	let bytes = hex::decode(topic.trim_start_matches("0x")).map_err(serde::de::Error::custom)?;
	<[u8; 32]>::try_from(bytes.as_slice())
		.map(Some)
		.map_err(|_| serde::de::Error::custom(format!("bad signature topic length: {}", topic)))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawMessage {
	label: String,
	selector: String,
	#[serde(default)]
	args: Vec<MessageArg>,
	#[serde(default)]
	mutates: bool,
	#[serde(default)]
	payable: bool,
	#[serde(default)]
	return_type: Option<TypeSpec>,
	#[serde(default)]
	docs: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct RawContractInfo {
	name: String,
}

#[derive(Debug, Deserialize)]
struct RawSpec {
	messages: Vec<RawMessage>,
	#[serde(default)]
	events: Vec<EventSpec>,
}

#[derive(Debug, Deserialize)]
struct RawMetadata {
	#[serde(default)]
	contract: Option<RawContractInfo>,
	spec: RawSpec,
	types: Vec<PortableType>,
}

/// A callable contract message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
	pub label: String,
	pub selector: [u8; 4],
	pub mutates: bool,
	pub payable: bool,
	pub args: Vec<MessageArg>,
	pub return_type: Option<TypeSpec>,
	pub docs: Vec<String>,
}

impl Message {
	/// Selector followed by the already SCALE encoded arguments.
	pub fn call_data(&self, encoded_args: &[u8]) -> Vec<u8> {
		let mut data = Vec::with_capacity(4 + encoded_args.len());
		data.extend_from_slice(&self.selector);
		data.extend_from_slice(encoded_args);
		data
	}

	/// ink! 4+ wraps every message output in `Result<T, LangError>`.
	fn returns_message_result(&self) -> bool {
		self.return_type
			.as_ref()
			.and_then(|ty| ty.display_name.last())
			.is_some_and(|name| name == "MessageResult")
	}
}

/// Parsed ink! contract metadata (versions 4 and 5).
#[derive(Debug)]
pub struct ContractMetadata {
	name: String,
	version: u32,
	messages: Vec<Message>,
	events: Vec<EventSpec>,
	registry: PortableRegistry,
}

impl ContractMetadata {
	pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ContractError> {
		let path = path.as_ref();
		debug!("Loading contract metadata from {:?}", path);
		let contents = std::fs::read_to_string(path)?;
		Self::from_json(&contents)
	}

	pub fn from_json(contents: &str) -> Result<Self, ContractError> {
		let json: serde_json::Value = serde_json::from_str(contents)
			.map_err(|e| ContractError::InvalidMetadata(e.to_string()))?;

		let version = metadata_version(&json)?;
		let raw: RawMetadata = serde_json::from_value(json)
			.map_err(|e| ContractError::InvalidMetadata(e.to_string()))?;

		let messages = raw
			.spec
			.messages
			.into_iter()
			.map(|message| {
				Ok(Message {
					selector: parse_selector(&message.selector)?,
					label: message.label,
					mutates: message.mutates,
					payable: message.payable,
					args: message.args,
					return_type: message.return_type,
					docs: message.docs,
				})
			})
			.collect::<Result<Vec<_>, ContractError>>()?;

		Ok(Self {
			name: raw
				.contract
				.map(|info| info.name)
				.unwrap_or_else(|| "unknown".to_string()),
			version,
			messages,
			events: raw.spec.events,
			registry: PortableRegistry { types: raw.types },
		})
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn version(&self) -> u32 {
		self.version
	}

	pub fn messages(&self) -> &[Message] {
		&self.messages
	}

	pub fn events(&self) -> &[EventSpec] {
		&self.events
	}

	pub fn message(&self, label: &str) -> Result<&Message, ContractError> {
		self.messages
			.iter()
			.find(|message| message.label == label)
			.ok_or_else(|| ContractError::MessageNotFound(label.to_string()))
	}

	/// Decodes the output of `message`.
	///
	/// Returns `None` for messages without a return type. `MessageResult`
	/// wrappers are unwrapped; a `LangError` becomes `ContractError::LangError`.
	pub fn decode_output(
		&self,
		message: &Message,
		data: &[u8],
	) -> Result<Option<Value<u32>>, ContractError> {
		let Some(return_type) = &message.return_type else {
			return Ok(None);
		};

		let value = self.decode_type(return_type.ty, &mut &data[..])?;
		if !message.returns_message_result() {
			return Ok(Some(value));
		}

		match &value.value {
			ValueDef::Variant(variant) if variant.name == "Ok" => {
				Ok(variant.values.values().next().cloned())
			}
			ValueDef::Variant(variant) if variant.name == "Err" => {
				Err(ContractError::LangError(value.to_string()))
			}
			_ => Ok(Some(value)),
		}
	}

	/// Decodes a `Contracts.ContractEmitted` event from its record topics and
	/// payload.
	pub fn decode_contract_event(
		&self,
		topics: &[[u8; 32]],
		data: &[u8],
	) -> Result<ContractEvent, ContractError> {
		if self.version == 4 {
			let (index, mut rest) = data
				.split_first()
				.ok_or_else(|| ContractError::Decode("empty event payload".to_string()))?;
			let spec = self.events.get(*index as usize).ok_or_else(|| {
				ContractError::Decode(format!("unknown event index {}", index))
			})?;
			return self.decode_event_args(spec, &mut rest);
		}

		let signed = topics.first().and_then(|topic| {
			self.events
				.iter()
				.find(|spec| spec.signature_topic.as_ref() == Some(topic))
		});
		if let Some(spec) = signed {
			let mut input = data;
			return self.decode_event_args(spec, &mut input);
		}

		// Anonymous events carry no signature topic; take the first one whose
		// arguments consume the payload exactly.
		self.events
			.iter()
			.filter(|spec| spec.signature_topic.is_none())
			.find_map(|spec| {
				let mut input = data;
				match self.decode_event_args(spec, &mut input) {
					Ok(event) if input.is_empty() => Some(event),
					_ => None,
				}
			})
			.ok_or_else(|| ContractError::Decode("no event matches payload".to_string()))
	}

	fn decode_event_args(
		&self,
		spec: &EventSpec,
		input: &mut &[u8],
	) -> Result<ContractEvent, ContractError> {
		let args = spec
			.args
			.iter()
			.map(|arg| self.decode_type(arg.ty.ty, input).map(|value| value.to_string()))
			.collect::<Result<Vec<_>, _>>()?;

		Ok(ContractEvent {
			identifier: spec.label.clone(),
			args,
		})
	}

	fn decode_type(&self, type_id: u32, input: &mut &[u8]) -> Result<Value<u32>, ContractError> {
		scale_value::scale::decode_as_type(input, type_id, &self.registry)
			.map_err(|e| ContractError::Decode(e.to_string()))
	}
}

impl ContractEventDecoder for ContractMetadata {
	fn decode_event(
		&self,
		topics: &[[u8; 32]],
		data: &[u8],
	) -> Result<ContractEvent, EventDecodeError> {
		self.decode_contract_event(topics, data)
			.map_err(|e| EventDecodeError(e.to_string()))
	}
}

fn metadata_version(json: &serde_json::Value) -> Result<u32, ContractError> {
	if json.get("V3").is_some() || json.get("V1").is_some() || json.get("V0").is_some() {
		return Err(ContractError::UnsupportedVersion("3 or older".to_string()));
	}

	let version = match json.get("version") {
		Some(serde_json::Value::String(s)) => s.parse::<u32>().ok(),
		Some(serde_json::Value::Number(n)) => n.as_u64().and_then(|v| u32::try_from(v).ok()),
		_ => None,
	}
	.ok_or_else(|| ContractError::InvalidMetadata("missing metadata version".to_string()))?;

	match version {
		4 | 5 => Ok(version),
		other => Err(ContractError::UnsupportedVersion(other.to_string())),
	}
}

fn parse_selector(selector: &str) -> Result<[u8; 4], ContractError> {
	let bytes = hex::decode(selector.trim_start_matches("0x"))
		.map_err(|e| ContractError::InvalidMetadata(format!("bad selector {}: {}", selector, e)))?;
	bytes
		.as_slice()
		.try_into()
		.map_err(|_| ContractError::InvalidMetadata(format!("bad selector length: {}", selector)))
}

#[cfg(test)]
mod tests {
	use super::*;

	const FLIPPER: &str = include_str!("../../../flipper.contract");

	fn flipper() -> ContractMetadata {
		ContractMetadata::from_json(FLIPPER).unwrap()
	}

	#[test]
	fn test_load_flipper_metadata() {
		let metadata = flipper();
		assert_eq!(metadata.name(), "flipper");
		assert_eq!(metadata.version(), 4);
		assert_eq!(metadata.messages().len(), 2);
		assert_eq!(metadata.events()[0].label, "Flipped");

		let flip = metadata.message("flip").unwrap();
		assert_eq!(flip.selector, [0x63, 0x3a, 0xa5, 0x51]);
		assert!(flip.mutates);

		let get = metadata.message("get").unwrap();
		assert_eq!(get.selector, [0x2f, 0x86, 0x5b, 0xd9]);
		assert!(!get.mutates);
	}

	#[test]
	fn test_unknown_message() {
		let metadata = flipper();
		assert!(matches!(
			metadata.message("set"),
			Err(ContractError::MessageNotFound(label)) if label == "set"
		));
	}

	#[test]
	fn test_call_data_prefixes_selector() {
		let metadata = flipper();
		let get = metadata.message("get").unwrap();
		assert_eq!(get.call_data(&[]), vec![0x2f, 0x86, 0x5b, 0xd9]);
		assert_eq!(
			get.call_data(&[0x01]),
			vec![0x2f, 0x86, 0x5b, 0xd9, 0x01]
		);
	}

	#[test]
	fn test_decode_get_output() {
		let metadata = flipper();
		let get = metadata.message("get").unwrap();

		let value = metadata.decode_output(get, &[0x00, 0x01]).unwrap().unwrap();
		assert_eq!(value.as_bool(), Some(true));

		let value = metadata.decode_output(get, &[0x00, 0x00]).unwrap().unwrap();
		assert_eq!(value.as_bool(), Some(false));
	}

	#[test]
	fn test_decode_lang_error() {
		let metadata = flipper();
		let get = metadata.message("get").unwrap();
		let result = metadata.decode_output(get, &[0x01, 0x01]);
		assert!(matches!(result, Err(ContractError::LangError(_))));
	}

	#[test]
	fn test_decode_flip_output_is_unit() {
		let metadata = flipper();
		let flip = metadata.message("flip").unwrap();
		assert!(metadata.decode_output(flip, &[0x00]).unwrap().is_some());
	}

	#[test]
	fn test_decode_contract_event() {
		let metadata = flipper();
		let event = metadata.decode_contract_event(&[], &[0x00, 0x01]).unwrap();
		assert_eq!(event.identifier, "Flipped");
		assert_eq!(event.args, vec!["true".to_string()]);
		assert_eq!(event.to_string(), "Flipped(true)");

		assert!(metadata.decode_contract_event(&[], &[0x05, 0x01]).is_err());
		assert!(metadata.decode_contract_event(&[], &[]).is_err());
	}

	fn v5_metadata(events: serde_json::Value) -> ContractMetadata {
		let mut json: serde_json::Value = serde_json::from_str(FLIPPER).unwrap();
		json["version"] = serde_json::json!(5);
		json["spec"]["events"] = events;
		ContractMetadata::from_json(&json.to_string()).unwrap()
	}

	fn bool_event(label: &str, signature_topic: Option<String>) -> serde_json::Value {
		serde_json::json!({
			"label": label,
			"module_path": "flipper::flipper",
			"signature_topic": signature_topic,
			"args": [{
				"label": "new_value",
				"indexed": false,
				"type": { "type": 0, "displayName": ["bool"] }
			}],
			"docs": []
		})
	}

	#[test]
	fn test_v5_events_match_by_signature_topic() {
		let flipped = [0x1c; 32];
		let reset = [0x2d; 32];
		let metadata = v5_metadata(serde_json::json!([
			bool_event("Flipped", Some(format!("0x{}", hex::encode(flipped)))),
			bool_event("Reset", Some(format!("0x{}", hex::encode(reset)))),
		]));
		assert_eq!(metadata.version(), 5);
		assert_eq!(metadata.events()[1].signature_topic, Some(reset));

		let event = metadata.decode_contract_event(&[reset], &[0x01]).unwrap();
		assert_eq!(event.identifier, "Reset");
		assert_eq!(event.args, vec!["true".to_string()]);

		let event = metadata.decode_contract_event(&[flipped], &[0x00]).unwrap();
		assert_eq!(event.identifier, "Flipped");

		// a signed event never matches by payload shape alone
		assert!(metadata.decode_contract_event(&[], &[0x01]).is_err());
		assert!(metadata
			.decode_contract_event(&[[0xff; 32]], &[0x01])
			.is_err());
	}

	#[test]
	fn test_v5_anonymous_events_match_by_payload() {
		let metadata = v5_metadata(serde_json::json!([
			bool_event("Flipped", Some(format!("0x{}", hex::encode([0x1c; 32])))),
			bool_event("Anonymous", None),
		]));

		let event = metadata
			.decode_contract_event(&[[0x99; 32]], &[0x00])
			.unwrap();
		assert_eq!(event.identifier, "Anonymous");
		assert_eq!(event.args, vec!["false".to_string()]);

		assert!(metadata.decode_contract_event(&[], &[0x00, 0x01]).is_err());
	}

	#[test]
	fn test_bad_signature_topic_is_rejected() {
		let mut json: serde_json::Value = serde_json::from_str(FLIPPER).unwrap();
		json["version"] = serde_json::json!(5);
		json["spec"]["events"] =
			serde_json::json!([bool_event("Flipped", Some("0x1234".to_string()))]);
		assert!(matches!(
			ContractMetadata::from_json(&json.to_string()),
			Err(ContractError::InvalidMetadata(_))
		));
	}

	#[test]
	fn test_old_metadata_is_rejected() {
		let v3 = r#"{ "source": {}, "contract": { "name": "flipper" }, "V3": { "spec": {} } }"#;
		assert!(matches!(
			ContractMetadata::from_json(v3),
			Err(ContractError::UnsupportedVersion(_))
		));
	}
}
