use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Root of the persisted `config.json` document. Field names on disk keep
/// the launcher's historical camelCase schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigDocument {
	pub settings: Settings,
	pub client_token: String,
	pub selected_server: Option<String>,
	pub selected_account: Option<String>,
	pub authentication_database: BTreeMap<String, AuthAccount>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
	pub java: JavaSettings,
	pub game: GameSettings,
	/// Reserved for future launcher-specific keys.
	#[serde(default)]
	pub launcher: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JavaSettings {
	/// Memory-size token including units, e.g. "2G" or "1024M".
	#[serde(rename = "minRAM")]
	pub min_ram: String,
	#[serde(rename = "maxRAM")]
	pub max_ram: String,
	/// Resolved externally, null until assigned.
	pub executable: Option<PathBuf>,
	pub jvm_options: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSettings {
	pub directory: PathBuf,
	pub res_width: u32,
	pub res_height: u32,
	pub fullscreen: bool,
	pub auto_connect: bool,
	pub launch_detached: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthAccount {
	pub access_token: String,
	/// Usually the account email.
	pub username: String,
	pub uuid: String,
	pub display_name: String,
}
