use std::path::{Path, PathBuf};
use std::{env, fs};

/// Name of the config file looked up in the working and home directories
pub const CONFIG_FILE: &str = ".pr-review.toml";

/// Load config file content from CWD first, then home directory
///
/// Searches for `.pr-review.toml` in:
/// 1. Current working directory
/// 2. Home directory
///
/// Returns the file content if found, None otherwise.
pub fn load_config_file() -> Option<String> {
    let mut dirs = vec![PathBuf::from(".")];
    if let Some(home) = env::var_os("HOME") {
        dirs.push(PathBuf::from(home));
    }
    load_config_file_from(&dirs)
}

/// Content of the first `.pr-review.toml` found in `dirs`, in order
pub fn load_config_file_from(dirs: &[PathBuf]) -> Option<String> {
    dirs.iter().find_map(|dir| read_config(dir))
}

fn read_config(dir: &Path) -> Option<String> {
    let path = dir.join(CONFIG_FILE);
    match fs::read_to_string(&path) {
        Ok(content) => {
            log::debug!("Loaded config from {}", path.display());
            Some(content)
        }
        Err(_) => None,
    }
}
