use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::debug;

use crate::Config;

/// Render-default layers, lowest priority first: system, user, then the
/// working directory.
fn config_search_paths() -> Vec<PathBuf> {
    let system = PathBuf::from("/etc/aiexport/config.toml");
    let home = dirs::home_dir().map(|h| h.join(".config/aiexport/config.toml"));
    let xdg = dirs::config_dir().map(|c| c.join("aiexport/config.toml"));
    let local = [".aiexport/config.toml", "aiexport.toml"].map(PathBuf::from);

    std::iter::once(system)
        .chain(home)
        .chain(xdg)
        .chain(local)
        .collect()
}

fn read_layer(path: &Path) -> anyhow::Result<toml::Value> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    toml::from_str(&text).with_context(|| format!("parsing {}", path.display()))
}

/// Merge every discovered layer, then `extra` (the `--config` file, which
/// must exist), and decode the result.
///
/// Decoding is strict.  A layer that fails to parse is an error naming the
/// file, and a known key with the wrong type (`show_timestamp = "yes"`) fails
/// the final decode instead of falling back to defaults.  Unknown keys are
/// ignored.
pub fn load(extra: Option<&Path>) -> anyhow::Result<Config> {
    let mut merged = toml::Value::Table(toml::map::Map::new());

    for path in config_search_paths() {
        if path.is_file() {
            debug!(path = %path.display(), "loading config layer");
            merge_toml(&mut merged, read_layer(&path)?);
        }
    }

    if let Some(p) = extra {
        debug!(path = %p.display(), "loading explicit config");
        merge_toml(&mut merged, read_layer(p)?);
    }

    merged.try_into().context("decoding merged configuration")
}

/// Deep-merge `src` into `dst`; src wins on scalar conflicts.
fn merge_toml(dst: &mut toml::Value, src: toml::Value) {
    match (dst, src) {
        (toml::Value::Table(d), toml::Value::Table(s)) => {
            for (k, v) in s {
                let entry = d.entry(k).or_insert(toml::Value::Table(toml::map::Map::new()));
                merge_toml(entry, v);
            }
        }
        (dst, src) => *dst = src,
    }
}

// ─── Unit tests ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn val(s: &str) -> toml::Value {
        toml::from_str(s).unwrap()
    }

    #[test]
    fn merge_scalar_src_wins() {
        let mut dst = val(r#"x = 1"#);
        merge_toml(&mut dst, val(r#"x = 2"#));
        assert_eq!(dst["x"].as_integer(), Some(2));
    }

    #[test]
    fn merge_nested_tables_keep_untouched_keys() {
        let mut dst = val(r#"[render]
show_timestamp = true
hidden_message_depth = 3"#);
        merge_toml(&mut dst, val(r#"[render]
hidden_message_depth = 1"#));
        assert_eq!(dst["render"]["show_timestamp"].as_bool(), Some(true));
        assert_eq!(dst["render"]["hidden_message_depth"].as_integer(), Some(1));
    }

    #[test]
    fn missing_explicit_path_is_an_error() {
        let result = load(Some(Path::new("/tmp/aiexport_nonexistent_config_xyz.toml")));
        assert!(result.is_err());
    }

    #[test]
    fn empty_table_decodes_to_defaults() {
        let cfg: Config = toml::Value::Table(toml::map::Map::new()).try_into().unwrap();
        assert_eq!(cfg, Config::default());
        assert_eq!(cfg.render.hidden_message_depth, 1);
        assert!(!cfg.render.show_hidden_messages);
    }

    #[test]
    fn explicit_file_overrides_defaults() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        writeln!(f, r#"[render]
show_hidden_messages = true
hidden_message_depth = 2"#).unwrap();
        let cfg = load(Some(f.path())).unwrap();
        assert!(cfg.render.show_hidden_messages);
        assert_eq!(cfg.render.hidden_message_depth, 2);
        assert!(!cfg.render.show_model_name);
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        writeln!(f, r#"[render]
show_model_name = true
colour = "blue"

[vendor]
name = "x""#).unwrap();
        let cfg = load(Some(f.path())).unwrap();
        assert!(cfg.render.show_model_name);
    }

    #[test]
    fn wrong_type_is_reported() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        writeln!(f, r#"[render]
show_timestamp = "yes""#).unwrap();
        assert!(load(Some(f.path())).is_err());
    }
}
