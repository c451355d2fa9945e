use crate::config::document::{ConfigDocument, GameSettings, JavaSettings, Settings};
use crate::core::paths;
use std::collections::BTreeMap;
use std::path::Path;
use sysinfo::System;
use uuid::Uuid;

pub const DEFAULT_MIN_RAM: &str = "2G";

const DEFAULT_JVM_OPTIONS: [&str; 4] = [
	"-XX:+UseConcMarkSweepGC",
	"-XX:+CMSIncrementalMode",
	"-XX:-UseAdaptiveSizePolicy",
	"-Xmn128M",
];

/// Pick the default maximum JVM allocation from total physical memory.
/// Bands are inclusive at 6 GB and 8 GB.
pub fn resolve_max_ram(total_memory: u64) -> &'static str {
	if total_memory >= 8_000_000_000 {
		"4G"
	} else if total_memory >= 6_000_000_000 {
		"3G"
	} else {
		"2G"
	}
}

fn total_memory() -> u64 {
	let mut system = System::new();
	system.refresh_memory();
	system.total_memory()
}

/// A fresh client token: a v4 UUID with the hyphens stripped.
pub fn generate_client_token() -> String {
	Uuid::new_v4().simple().to_string()
}

/// Build the canonical default document. The only non-determinism is the
/// client token and the memory probe.
pub fn default_document(launcher_dir: &Path) -> ConfigDocument {
	ConfigDocument {
		settings: Settings {
			java: JavaSettings {
				min_ram: DEFAULT_MIN_RAM.to_string(),
				max_ram: resolve_max_ram(total_memory()).to_string(),
				executable: None,
				jvm_options: DEFAULT_JVM_OPTIONS.iter().map(|s| s.to_string()).collect(),
			},
			game: GameSettings {
				directory: paths::default_game_dir(launcher_dir),
				res_width: 1280,
				res_height: 720,
				fullscreen: false,
				auto_connect: true,
				launch_detached: true,
			},
			launcher: serde_json::Map::new(),
		},
		client_token: generate_client_token(),
		selected_server: None,
		selected_account: None,
		authentication_database: BTreeMap::new(),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn max_ram_bands() {
		assert_eq!(resolve_max_ram(4_000_000_000), "2G");
		assert_eq!(resolve_max_ram(5_999_999_999), "2G");
		assert_eq!(resolve_max_ram(6_000_000_000), "3G");
		assert_eq!(resolve_max_ram(7_999_999_999), "3G");
		assert_eq!(resolve_max_ram(8_000_000_000), "4G");
		assert_eq!(resolve_max_ram(9_000_000_000), "4G");
	}

	#[test]
	fn client_token_is_hyphenless_uuid() {
		let token = generate_client_token();
		assert_eq!(token.len(), 32);
		assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
	}

	#[test]
	fn defaults_are_well_formed() {
		let doc = default_document(Path::new("/tmp/taiga"));
		assert_eq!(doc.settings.java.min_ram, "2G");
		assert_eq!(doc.settings.java.jvm_options.len(), 4);
		assert!(doc.settings.java.executable.is_none());
		assert_eq!(doc.settings.game.res_width, 1280);
		assert_eq!(doc.settings.game.res_height, 720);
		assert!(!doc.settings.game.fullscreen);
		assert!(doc.settings.game.auto_connect);
		assert!(doc.settings.game.launch_detached);
		assert!(doc.settings.launcher.is_empty());
		assert!(doc.selected_server.is_none());
		assert!(doc.selected_account.is_none());
		assert!(doc.authentication_database.is_empty());
	}
}
