use std::path::{Path, PathBuf};

/// Root directory for all launcher data. `config.json` lives directly
/// under it, the default game directory inside it.
pub fn launcher_dir() -> Option<PathBuf> {
	dirs::data_dir().map(|p| p.join("taiga"))
}

pub fn default_game_dir(launcher_dir: &Path) -> PathBuf {
	launcher_dir.join("game")
}
