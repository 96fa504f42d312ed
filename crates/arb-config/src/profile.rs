//! Layered YAML profile loader for dry-run / test harnesses.
//!
//! Grounded on the teacher's config crate: merge YAML files in order, then
//! canonicalize (sorted keys) and fingerprint with SHA-256 so a given
//! harness run can be correlated back to the exact config that produced it.

use serde_json::Value;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config_json: Value,
    pub config_hash: String,
}

#[derive(Debug)]
pub enum ProfileError {
    Read(std::path::PathBuf, std::io::Error),
    Parse(std::path::PathBuf, serde_yaml::Error),
}

impl std::fmt::Display for ProfileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProfileError::Read(p, e) => write!(f, "read config {}: {e}", p.display()),
            ProfileError::Parse(p, e) => write!(f, "parse yaml {}: {e}", p.display()),
        }
    }
}

impl std::error::Error for ProfileError {}

/// Load + merge YAML files in order (later files override earlier ones),
/// then canonicalize to JSON and hash. Used by `arb-cli dry-run` to load a
/// scenario profile and by `arb-testkit` fixtures.
pub fn load_layered_yaml(paths: &[&Path]) -> Result<LoadedConfig, ProfileError> {
    let mut merged = Value::Object(Default::default());

    for p in paths {
        let s = fs::read_to_string(p).map_err(|e| ProfileError::Read(p.to_path_buf(), e))?;
        let yaml_val: serde_yaml::Value =
            serde_yaml::from_str(&s).map_err(|e| ProfileError::Parse(p.to_path_buf(), e))?;
        let json_val = serde_json::to_value(yaml_val).expect("yaml->json conversion is infallible for valid yaml");
        deep_merge(&mut merged, json_val);
    }

    let canonical = canonicalize_json(&merged);
    let mut hasher = Sha256::new();
    hasher.update(canonical.as_bytes());
    let hash = hex::encode(hasher.finalize());

    Ok(LoadedConfig {
        config_json: merged,
        config_hash: hash,
    })
}

fn deep_merge(dst: &mut Value, src: Value) {
    match (dst, src) {
        (Value::Object(dst_map), Value::Object(src_map)) => {
            for (k, v) in src_map {
                match dst_map.get_mut(&k) {
                    Some(existing) => deep_merge(existing, v),
                    None => {
                        dst_map.insert(k, v);
                    }
                }
            }
        }
        (dst_slot, src_val) => {
            *dst_slot = src_val;
        }
    }
}

fn canonicalize_json(v: &Value) -> String {
    let sorted = sort_keys(v);
    serde_json::to_string(&sorted).expect("json serialization must not fail")
}

fn sort_keys(v: &Value) -> Value {
    match v {
        Value::Object(map) => {
            let mut keys: Vec<_> = map.keys().cloned().collect();
            keys.sort();
            let mut new = serde_json::Map::new();
            for k in keys {
                new.insert(k.clone(), sort_keys(&map[&k]));
            }
            Value::Object(new)
        }
        Value::Array(arr) => Value::Array(arr.iter().map(sort_keys).collect()),
        _ => v.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn layered_profiles_override_and_hash_stably() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("base.yaml");
        let overlay = dir.path().join("overlay.yaml");
        fs::File::create(&base).unwrap().write_all(b"tenant: WL\nprovider: P1\n").unwrap();
        fs::File::create(&overlay).unwrap().write_all(b"provider: P2\n").unwrap();

        let loaded = load_layered_yaml(&[&base, &overlay]).unwrap();
        assert_eq!(loaded.config_json["provider"], "P2");
        assert_eq!(loaded.config_json["tenant"], "WL");

        let reloaded = load_layered_yaml(&[&base, &overlay]).unwrap();
        assert_eq!(loaded.config_hash, reloaded.config_hash, "hash must be stable for identical input");
    }
}
