use crate::error::ConfigError;
use log::debug;
use serde_json::Value;
use std::fs;
use std::path::Path;

/// Extension assumed when a config file has none (or an unknown one).
pub const DEFAULT_FORMAT: &str = "json";

/// Reads and parses the configuration tree at `path`.
///
/// The format is chosen from the file extension: `json`, `yaml`/`yml`,
/// `toml` or `json5`. Anything else is parsed as JSON. The document root must
/// be a mapping.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Value, ConfigError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let extension = path
        .extension()
        .and_then(|s| s.to_str())
        .map(str::to_lowercase)
        .filter(|ext| is_supported(ext))
        .unwrap_or_else(|| DEFAULT_FORMAT.to_string());

    debug!("Loading config {:?} as {}", path, extension);
    parse_config(&content, &extension)
}

pub fn is_supported(extension: &str) -> bool {
    matches!(extension, "json" | "yaml" | "yml" | "toml" | "json5")
}

/// Parses `content` as the format named by `extension`.
pub fn parse_config(content: &str, extension: &str) -> Result<Value, ConfigError> {
    let value: Value = match extension {
        "json" => serde_json::from_str(content).map_err(|e| ConfigError::parse("json", e))?,
        "yaml" | "yml" => serde_yaml_ng::from_str(content).map_err(|e| ConfigError::parse("yaml", e))?,
        "toml" => {
            let toml_val: toml::Value = toml::from_str(content).map_err(|e| ConfigError::parse("toml", e))?;
            serde_json::to_value(toml_val).map_err(|e| ConfigError::parse("toml", e))?
        }
        "json5" => json5::from_str(content).map_err(|e| ConfigError::parse("json5", e))?,
        _ => return Err(ConfigError::UnsupportedFormat(extension.to_string())),
    };

    if value.is_object() {
        Ok(value)
    } else {
        Err(ConfigError::NotAMapping(kind_name(&value)))
    }
}

fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "a mapping",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_formats_agree() {
        let expected = serde_json::json!({"server": {"host": "localhost", "tls": true}});
        let docs = [
            ("json", r#"{"server": {"host": "localhost", "tls": true}}"#),
            ("yaml", "server:\n  host: localhost\n  tls: true\n"),
            ("yml", "server: {host: localhost, tls: true}\n"),
            ("toml", "[server]\nhost = \"localhost\"\ntls = true\n"),
            ("json5", "{server: {host: 'localhost', tls: true,},}"),
        ];
        for (ext, doc) in docs {
            assert_eq!(parse_config(doc, ext).unwrap(), expected, "format {}", ext);
        }
    }

    #[test]
    fn test_root_must_be_mapping() {
        assert!(matches!(parse_config("[1, 2]", "json"), Err(ConfigError::NotAMapping("a list"))));
        assert!(matches!(parse_config("\"x\"", "json"), Err(ConfigError::NotAMapping("a string"))));
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(parse_config("{not json", "json"), Err(ConfigError::Parse { format: "json", .. })));
        assert!(matches!(parse_config("a = ", "toml"), Err(ConfigError::Parse { format: "toml", .. })));
        assert!(matches!(parse_config("{}", "ini"), Err(ConfigError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_load_config_defaults_to_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app.conf");
        fs::write(&path, r#"{"a": "b"}"#).unwrap();
        assert_eq!(load_config(&path).unwrap()["a"], "b");
    }

    #[test]
    fn test_load_config_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_config(dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
        assert!(err.to_string().contains("absent.json"));
    }
}
