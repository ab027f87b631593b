//! YAML emission with forced quoting for base64 credentials
//!
//! A `serviceAccountKeyBase64` value is several kilobytes of base64. It is
//! always written as one double-quoted scalar so YAML→JSON conversion
//! downstream returns it byte for byte.

use crate::error::Result;
use serde_yaml::Value;

pub const QUOTED_KEYS: &[&str] = &["serviceAccountKeyBase64"];

/// Serialize `value`, emitting every [`QUOTED_KEYS`] string double-quoted
///
/// Quoted values are swapped for placeholders before serialization. The
/// placeholder prefix is chosen so it occurs nowhere in the plain document,
/// and only `key: <placeholder>` value positions are substituted back.
pub fn to_yaml_string(value: &Value) -> Result<String> {
    let plain = serde_yaml::to_string(value)?;
    let prefix = unused_prefix(&plain);

    let mut value = value.clone();
    let mut quoted = Vec::new();
    replace_quoted(&mut value, &prefix, &mut quoted);
    if quoted.is_empty() {
        return Ok(plain);
    }

    let mut out = serde_yaml::to_string(&value)?;
    for (index, original) in quoted.iter().enumerate() {
        let literal = serde_json::to_string(original)?;
        out = out.replace(
            &format!(": {}\n", placeholder(&prefix, index)),
            &format!(": {}\n", literal),
        );
    }
    Ok(out)
}

/// `__planton_quoted_<n>_` for the first `n` absent from `text`
fn unused_prefix(text: &str) -> String {
    (0u64..)
        .map(|n| format!("__planton_quoted_{}_", n))
        .find(|prefix| !text.contains(prefix.as_str()))
        .unwrap_or_default()
}

fn placeholder(prefix: &str, index: usize) -> String {
    format!("{}{}__", prefix, index)
}

fn replace_quoted(value: &mut Value, prefix: &str, quoted: &mut Vec<String>) {
    match value {
        Value::Mapping(map) => {
            for (key, child) in map.iter_mut() {
                let is_quoted_key = key
                    .as_str()
                    .is_some_and(|k| QUOTED_KEYS.contains(&k));
                match child {
                    Value::String(s) if is_quoted_key => {
                        let original = std::mem::replace(s, placeholder(prefix, quoted.len()));
                        quoted.push(original);
                    }
                    _ => replace_quoted(child, prefix, quoted),
                }
            }
        }
        Value::Sequence(items) => {
            for item in items {
                replace_quoted(item, prefix, quoted);
            }
        }
        Value::Tagged(tagged) => replace_quoted(&mut tagged.value, prefix, quoted),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quotes_nested_keys() {
        let value: Value = serde_yaml::from_str(
            "target:\n  kind: X\nkubernetesProviderConfig:\n  gcpGke:\n    serviceAccountKeyBase64: abc\ngcpProviderConfig:\n  serviceAccountKeyBase64: def\n",
        )
        .unwrap();

        let yaml = to_yaml_string(&value).unwrap();
        assert!(yaml.contains("serviceAccountKeyBase64: \"abc\""));
        assert!(yaml.contains("serviceAccountKeyBase64: \"def\""));
        assert!(!yaml.contains("__planton_quoted_"));

        let back: Value = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(back, value);
    }

    #[test]
    fn test_other_keys_untouched() {
        let value: Value = serde_yaml::from_str("accessKeyId: AKIA\n").unwrap();
        assert_eq!(to_yaml_string(&value).unwrap(), "accessKeyId: AKIA\n");
    }

    #[test]
    fn test_scalars_resembling_placeholders_survive() {
        let value: Value = serde_yaml::from_str(
            "target:\n  spec:\n    note: __planton_quoted_0_0__\n    other: __planton_quoted_1_0__\ngcpProviderConfig:\n  serviceAccountKeyBase64: SECRETKEY\n",
        )
        .unwrap();

        let yaml = to_yaml_string(&value).unwrap();
        assert!(yaml.contains("serviceAccountKeyBase64: \"SECRETKEY\""));
        assert_eq!(yaml.matches("SECRETKEY").count(), 1);

        let back: Value = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(back, value);
    }

    #[test]
    fn test_unused_prefix_skips_taken_prefixes() {
        assert_eq!(unused_prefix("plain"), "__planton_quoted_0_");
        assert_eq!(
            unused_prefix("a: __planton_quoted_0_x\nb: __planton_quoted_1_y"),
            "__planton_quoted_2_"
        );
    }
}
