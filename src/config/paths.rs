//! Where kubetree looks for its config file

use directories::BaseDirs;
use std::path::PathBuf;

/// Overrides the directory holding `config.yaml`
pub const CONFIG_DIR_ENV: &str = "KUBETREE_CONFIG_DIR";

const APP_DIR: &str = "kubetree";
const CONFIG_FILE: &str = "config.yaml";

/// Default config file, or `None` when no home directory can be found
///
/// `$KUBETREE_CONFIG_DIR/config.yaml` wins. Unix platforms (macOS included)
/// then use `$XDG_CONFIG_HOME/kubetree` or `~/.config/kubetree`; Windows uses
/// the roaming AppData folder.
pub fn root_config_path() -> Option<PathBuf> {
    config_dir(|key| std::env::var(key).ok()).map(|dir| dir.join(CONFIG_FILE))
}

fn config_dir(lookup: impl Fn(&str) -> Option<String>) -> Option<PathBuf> {
    let var = |key: &str| lookup(key).filter(|v| !v.is_empty()).map(PathBuf::from);

    if let Some(dir) = var(CONFIG_DIR_ENV) {
        return Some(dir);
    }
    let base = if cfg!(unix) {
        var("XDG_CONFIG_HOME").or_else(|| BaseDirs::new().map(|d| d.home_dir().join(".config")))
    } else {
        BaseDirs::new().map(|d| d.config_dir().to_path_buf())
    };
    base.map(|dir| dir.join(APP_DIR))
}
