//! Path utilities: expand ~ in user supplied paths.

use std::path::PathBuf;

/// `~` and `~/…` resolve against the home directory; other paths are kept.
pub fn expand_tilde(path: &str) -> PathBuf {
    let rest = match path {
        "~" => "",
        p if p.starts_with("~/") || p.starts_with("~\\") => &p[2..],
        _ => return PathBuf::from(path),
    };

    match dirs::home_dir() {
        Some(home) if rest.is_empty() => home,
        Some(home) => home.join(rest),
        None => PathBuf::from(path),
    }
}
