use crate::config::defaults;
use crate::config::document::{AuthAccount, ConfigDocument};
use crate::config::error::{ConfigError, ConfigResult};
use crate::config::merge;
use crate::core::paths;
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const CONFIG_FILE: &str = "config.json";
const TEMP_NATIVE_FOLDER: &str = "TaigaNatives";

/// Owns the in-memory configuration document together with a defaults
/// snapshot taken at construction. Getters take a `use_default` flag
/// where a field has a canonical default; setters mutate memory only,
/// `save` persists.
pub struct ConfigManager {
	launcher_dir: PathBuf,
	file_path: PathBuf,
	first_launch: bool,
	defaults: ConfigDocument,
	document: ConfigDocument,
}

impl ConfigManager {
	pub fn new() -> ConfigResult<Self> {
		let launcher_dir = paths::launcher_dir().ok_or(ConfigError::NoDataDir)?;
		Ok(Self::with_launcher_dir(launcher_dir))
	}

	/// Build a store rooted at an explicit directory. The first-launch
	/// flag is fixed here, before anything is created on disk.
	pub fn with_launcher_dir(launcher_dir: PathBuf) -> Self {
		let first_launch = !launcher_dir.exists();
		let file_path = launcher_dir.join(CONFIG_FILE);
		let defaults = defaults::default_document(&launcher_dir);
		let document = defaults.clone();

		Self {
			launcher_dir,
			file_path,
			first_launch,
			defaults,
			document,
		}
	}

	/// Load the configuration into memory. A missing file is replaced by
	/// the defaults document; an existing file is reconciled against the
	/// defaults so that old files pick up newly added keys. Either way
	/// the normalized result is written back. A file that is present but
	/// unparsable surfaces `ConfigError::Corrupt` and leaves the
	/// in-memory document untouched.
	pub fn load(&mut self) -> ConfigResult<()> {
		if !self.file_path.exists() {
			fs::create_dir_all(&self.launcher_dir)?;
			self.document = self.defaults.clone();
			self.save()?;
			info!("Created default configuration at {}", self.file_path.display());
		} else {
			let raw = fs::read_to_string(&self.file_path)?;
			let loaded: Value = serde_json::from_str(&raw)?;
			let defaults_value = serde_json::to_value(&self.defaults)?;
			let reconciled = merge::reconcile(&defaults_value, loaded);
			self.document = serde_json::from_value(reconciled)?;
			self.save()?;
			debug!("Loaded configuration from {}", self.file_path.display());
		}
		Ok(())
	}

	/// Serialize the current document to disk with stable 4-space
	/// indentation.
	pub fn save(&self) -> ConfigResult<()> {
		let mut buf = Vec::new();
		let formatter = PrettyFormatter::with_indent(b"    ");
		let mut serializer = Serializer::with_formatter(&mut buf, formatter);
		self.document.serialize(&mut serializer)?;
		fs::write(&self.file_path, buf)?;
		Ok(())
	}

	pub fn document(&self) -> &ConfigDocument {
		&self.document
	}

	pub fn launcher_directory(&self) -> &Path {
		&self.launcher_dir
	}

	/// True when the launcher directory did not exist at store
	/// construction. Stays true for the whole process lifetime, `load`
	/// included.
	pub fn is_first_launch(&self) -> bool {
		self.first_launch
	}

	/// Name of the folder in the OS temp directory reserved for
	/// extracting native libraries at game launch.
	pub fn temp_native_folder(&self) -> &'static str {
		TEMP_NATIVE_FOLDER
	}

	fn doc(&self, use_default: bool) -> &ConfigDocument {
		if use_default { &self.defaults } else { &self.document }
	}

	// System settings, not configurable through the UI.

	pub fn client_token(&self) -> &str {
		&self.document.client_token
	}

	pub fn set_client_token(&mut self, client_token: impl Into<String>) {
		self.document.client_token = client_token.into();
	}

	pub fn selected_server(&self, use_default: bool) -> Option<&str> {
		self.doc(use_default).selected_server.as_deref()
	}

	pub fn set_selected_server(&mut self, server_id: Option<String>) {
		self.document.selected_server = server_id;
	}

	// Authenticated accounts.

	pub fn auth_accounts(&self) -> &BTreeMap<String, AuthAccount> {
		&self.document.authentication_database
	}

	pub fn auth_account(&self, uuid: &str) -> Option<&AuthAccount> {
		self.document.authentication_database.get(uuid)
	}

	/// Insert or overwrite an account and make it the selected one.
	pub fn add_auth_account(
		&mut self,
		uuid: impl Into<String>,
		access_token: impl Into<String>,
		username: impl Into<String>,
		display_name: impl Into<String>,
	) -> &AuthAccount {
		let uuid = uuid.into();
		let account = AuthAccount {
			access_token: access_token.into(),
			username: username.into(),
			uuid: uuid.clone(),
			display_name: display_name.into(),
		};
		self.document.selected_account = Some(uuid.clone());
		self.document
			.authentication_database
			.entry(uuid)
			.and_modify(|existing| *existing = account.clone())
			.or_insert(account)
	}

	/// Replace the stored access token of an existing account.
	pub fn update_auth_account(
		&mut self,
		uuid: &str,
		access_token: impl Into<String>,
	) -> ConfigResult<&AuthAccount> {
		let account = self
			.document
			.authentication_database
			.get_mut(uuid)
			.ok_or_else(|| ConfigError::AccountNotFound(uuid.to_string()))?;
		account.access_token = access_token.into();
		Ok(account)
	}

	/// Remove an account, returning whether it existed. Removing the
	/// selected account reassigns the selection to the first remaining
	/// account in key order, or clears it.
	pub fn remove_auth_account(&mut self, uuid: &str) -> bool {
		if self.document.authentication_database.remove(uuid).is_none() {
			return false;
		}
		if self.document.selected_account.as_deref() == Some(uuid) {
			self.document.selected_account =
				self.document.authentication_database.keys().next().cloned();
		}
		true
	}

	/// The record behind `selectedAccount`, if the selection is set and
	/// still present in the database.
	pub fn selected_account(&self) -> Option<&AuthAccount> {
		let uuid = self.document.selected_account.as_deref()?;
		self.document.authentication_database.get(uuid)
	}

	/// Change the selection only if the account exists; returns the new
	/// selection's record, or `None` when the id is unknown.
	pub fn set_selected_account(&mut self, uuid: &str) -> Option<&AuthAccount> {
		if !self.document.authentication_database.contains_key(uuid) {
			return None;
		}
		self.document.selected_account = Some(uuid.to_string());
		self.document.authentication_database.get(uuid)
	}

	// Java settings.

	pub fn min_ram(&self, use_default: bool) -> &str {
		&self.doc(use_default).settings.java.min_ram
	}

	pub fn set_min_ram(&mut self, min_ram: impl Into<String>) {
		self.document.settings.java.min_ram = min_ram.into();
	}

	pub fn max_ram(&self, use_default: bool) -> &str {
		&self.doc(use_default).settings.java.max_ram
	}

	pub fn set_max_ram(&mut self, max_ram: impl Into<String>) {
		self.document.settings.java.max_ram = max_ram.into();
	}

	/// Resolved externally, null until assigned.
	pub fn java_executable(&self) -> Option<&Path> {
		self.document.settings.java.executable.as_deref()
	}

	pub fn set_java_executable(&mut self, executable: Option<PathBuf>) {
		self.document.settings.java.executable = executable;
	}

	/// Additional JVM arguments. Required arguments such as memory
	/// allocation are resolved at launch and are not part of this value.
	pub fn jvm_options(&self, use_default: bool) -> &[String] {
		&self.doc(use_default).settings.java.jvm_options
	}

	pub fn set_jvm_options(&mut self, jvm_options: Vec<String>) {
		self.document.settings.java.jvm_options = jvm_options;
	}

	// Game settings.

	pub fn game_directory(&self, use_default: bool) -> &Path {
		&self.doc(use_default).settings.game.directory
	}

	pub fn set_game_directory(&mut self, directory: PathBuf) {
		self.document.settings.game.directory = directory;
	}

	pub fn game_width(&self, use_default: bool) -> u32 {
		self.doc(use_default).settings.game.res_width
	}

	pub fn set_game_width(&mut self, res_width: u32) {
		self.document.settings.game.res_width = res_width;
	}

	pub fn game_height(&self, use_default: bool) -> u32 {
		self.doc(use_default).settings.game.res_height
	}

	pub fn set_game_height(&mut self, res_height: u32) {
		self.document.settings.game.res_height = res_height;
	}

	pub fn fullscreen(&self, use_default: bool) -> bool {
		self.doc(use_default).settings.game.fullscreen
	}

	pub fn set_fullscreen(&mut self, fullscreen: bool) {
		self.document.settings.game.fullscreen = fullscreen;
	}

	pub fn auto_connect(&self, use_default: bool) -> bool {
		self.doc(use_default).settings.game.auto_connect
	}

	pub fn set_auto_connect(&mut self, auto_connect: bool) {
		self.document.settings.game.auto_connect = auto_connect;
	}

	pub fn launch_detached(&self, use_default: bool) -> bool {
		self.doc(use_default).settings.game.launch_detached
	}

	pub fn set_launch_detached(&mut self, launch_detached: bool) {
		self.document.settings.game.launch_detached = launch_detached;
	}
}
