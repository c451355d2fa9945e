use serde_json::Value;

/// Keys whose shape is user- or runtime-determined and must never be
/// filled or recursed into from the defaults document.
const VALIDATION_BLACKLIST: &[&str] = &["authenticationDatabase"];

/// Ensure `loaded` carries at least every key present in `defaults`,
/// recursively for nested objects. Existing values are never overwritten;
/// arrays and blacklisted keys are taken verbatim from `loaded`. This is
/// what lets an old saved file pick up fields added in a newer schema.
pub fn reconcile(defaults: &Value, loaded: Value) -> Value {
	let Some(src) = defaults.as_object() else {
		return loaded;
	};
	let mut dest = match loaded {
		Value::Object(map) => map,
		// A non-object document cannot be filled; the typed decode
		// downstream rejects it.
		other => return other,
	};

	for (key, default_value) in src {
		match dest.get_mut(key) {
			None => {
				dest.insert(key.clone(), default_value.clone());
			}
			Some(existing) => {
				if default_value.is_object() && !VALIDATION_BLACKLIST.contains(&key.as_str()) {
					let current = existing.take();
					*existing = reconcile(default_value, current);
				}
			}
		}
	}

	Value::Object(dest)
}
