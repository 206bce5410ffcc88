use pretty_assertions::assert_eq;

use super::*;

#[test]
fn empty_document_uses_defaults() {
	let config = HarnessConfig::from_toml("").unwrap();
	assert_eq!(config, HarnessConfig::default());
	assert_eq!(config.types.len(), 8);
	assert_eq!(config.retry_policy(), RetryPolicy::default());
}

#[test]
fn parses_selections() {
	let config = HarnessConfig::from_toml(
		r#"
iterations = 2
weak_cas_attempts = 25
yield_between_attempts = true
types = ["int", "double"]
byte_orders = ["big_endian"]
invokers = ["handle"]
"#,
	)
	.unwrap();
	assert_eq!(config.iterations, 2);
	assert_eq!(config.types, vec![PrimType::Int, PrimType::Double]);
	assert_eq!(config.byte_orders, vec![ByteOrder::BigEndian]);
	assert_eq!(config.invokers, vec![InvokerKind::Handle]);
	assert_eq!(config.retry_policy(), RetryPolicy { attempts: 25, yield_between: true });
	assert_eq!(config.buffer_length, 16);
}

#[test]
fn rejects_invalid_values() {
	let cases = [
		("weak_cas_attempts = 0", "`weak_cas_attempts` must be greater than zero"),
		("array_length = 0", "`array_length` must be greater than zero"),
		("buffer_length = 4", "buffer_length 4 is shorter than the widest view (8 bytes)"),
		("invokers = []", "`invokers` selects nothing"),
	];
	for (source, message) in cases {
		let error = HarnessConfig::from_toml(source).unwrap_err();
		assert_eq!(error.to_string(), message);
	}
}

#[test]
fn rejects_unknown_keys_and_types() {
	assert!(matches!(HarnessConfig::from_toml("iteration = 3"), Err(ConfigError::Parse(_))));
	assert!(matches!(HarnessConfig::from_toml(r#"types = ["word"]"#), Err(ConfigError::Parse(_))));
}

#[test]
fn missing_file_reports_path() {
	let path = Path::new("/nonexistent/atomvar.toml");
	let error = HarnessConfig::load(path).unwrap_err();
	assert!(matches!(&error, ConfigError::Io { path: p, .. } if p == path));
}
