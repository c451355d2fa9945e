use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceStatus {
	pub service: String,
	pub status: String,
	pub name: String,
}

/// The services tracked by the launcher, in display order. "grey" is a
/// launcher-local status meaning unknown; the remote only ever reports
/// green, yellow or red.
pub(crate) fn initial_statuses() -> Vec<ServiceStatus> {
	[
		("minecraft.net", "Minecraft.net"),
		("api.mojang.com", "Public API"),
		("textures.minecraft.net", "Minecraft Skins"),
		("authserver.mojang.com", "Authentication Service"),
		("sessionserver.mojang.com", "Multiplayer Session Service"),
		("account.mojang.com", "Mojang accounts website"),
	]
	.into_iter()
	.map(|(service, name)| ServiceStatus {
		service: service.to_string(),
		status: "grey".to_string(),
		name: name.to_string(),
	})
	.collect()
}

/// Indicator color for a service status.
pub fn status_to_hex(status: &str) -> &'static str {
	match status.to_ascii_lowercase().as_str() {
		"green" => "#a5c325",
		"yellow" => "#eac918",
		"red" => "#c32625",
		_ => "#848484",
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn six_services_start_grey() {
		let statuses = initial_statuses();
		assert_eq!(statuses.len(), 6);
		assert!(statuses.iter().all(|s| s.status == "grey"));
		assert_eq!(statuses[0].service, "minecraft.net");
		assert_eq!(statuses[0].name, "Minecraft.net");
	}

	#[test]
	fn hex_mapping() {
		assert_eq!(status_to_hex("green"), "#a5c325");
		assert_eq!(status_to_hex("YELLOW"), "#eac918");
		assert_eq!(status_to_hex("red"), "#c32625");
		assert_eq!(status_to_hex("grey"), "#848484");
		assert_eq!(status_to_hex("something-else"), "#848484");
	}
}
