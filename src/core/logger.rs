use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber. The host application calls this
/// once before touching any launcher-core API.
pub fn init() {
	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("taiga=info"));

	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_target(true)
		.init();
}
