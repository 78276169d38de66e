//! Optional user settings from `<config_home>/bfi.toml`.
//!
//! Only a `[machine]` section is recognized:
//!
//! ```toml
//! [machine]
//! tape_len = 65536
//! ```
//!
//! A missing or malformed file falls back to defaults silently.

use std::fs;
use std::path::PathBuf;
use std::sync::OnceLock;

use cross_xdg::BaseDirs;

use crate::machine::DEFAULT_TAPE_LEN;

#[derive(Debug, Clone)]
pub struct Settings {
    pub tape_len: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tape_len: DEFAULT_TAPE_LEN,
        }
    }
}

static SETTINGS: OnceLock<Settings> = OnceLock::new();

pub fn settings() -> &'static Settings {
    SETTINGS.get_or_init(|| load_from_toml().unwrap_or_default())
}

fn load_from_toml() -> Option<Settings> {
    let base_dirs = BaseDirs::new().unwrap();

    // On Linux: resolves to /home/<user>/.config
    // On Windows: resolves to C:\Users\<user>\.config
    // On macOS: resolves to /Users/<user>/.config
    let config_home = base_dirs.config_home();

    let mut path = PathBuf::from(config_home);
    path.push("bfi.toml");

    let content = fs::read_to_string(path).ok()?;
    Some(parse_settings(&content))
}

// Small hand-rolled scanner: find the [machine] section and read key = value
// pairs from it. Unknown keys and unparsable values are ignored.
fn parse_settings(content: &str) -> Settings {
    let mut cfg = Settings::default();
    let mut in_machine = false;

    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if line.starts_with('[') && line.ends_with(']') {
            in_machine = &line[1..line.len() - 1] == "machine";
            continue;
        }
        if !in_machine {
            continue;
        }
        if let Some(eq) = line.find('=') {
            let key = line[..eq].trim();
            let value = line[eq + 1..].trim();
            if key == "tape_len" {
                // A zero-length tape has no cell to point at.
                if let Ok(n) = value.parse::<usize>() {
                    if n > 0 {
                        cfg.tape_len = n;
                    }
                }
            }
        }
    }

    cfg
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_tape_len_from_machine_section() {
        let cfg = parse_settings("[machine]\ntape_len = 1024\n");
        assert_eq!(cfg.tape_len, 1024);
    }

    #[test]
    fn ignores_keys_outside_the_machine_section() {
        let cfg = parse_settings("[colors]\ntape_len = 1024\n");
        assert_eq!(cfg.tape_len, DEFAULT_TAPE_LEN);
    }

    #[test]
    fn ignores_comments_unknown_keys_and_garbage_values() {
        let cfg = parse_settings(
            "# a comment\n[machine]\nother = 5\ntape_len = lots\ntape_len = 0\n",
        );
        assert_eq!(cfg.tape_len, DEFAULT_TAPE_LEN);
    }

    #[test]
    fn empty_content_yields_defaults() {
        assert_eq!(parse_settings("").tape_len, DEFAULT_TAPE_LEN);
    }
}
