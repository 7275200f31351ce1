//! Log file location, ANSI stripping, and timestamps.
use std::path::{Path, PathBuf};

/// Remove ANSI CSI sequences (`ESC [ … final-byte`) from `s`.
pub(super) fn strip_ansi(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some((before, after)) = rest.split_once('\x1b') {
        out.push_str(before);
        rest = after.strip_prefix('[').map_or(after, |csi| {
            csi.split_once(|c: char| ('@'..='~').contains(&c))
                .map_or("", |(_, tail)| tail)
        });
    }
    out.push_str(rest);
    out
}

/// `<cache>/dotfiles/<command>.log`, where `<cache>` is `$XDG_CACHE_HOME`
/// or `~/.cache`.  The directory is created on demand; `None` when that
/// fails.
pub(super) fn log_file_path(command: &str) -> Option<PathBuf> {
    let cache = std::env::var_os("XDG_CACHE_HOME")
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .or_else(|| std::env::var_os("HOME").map(|h| Path::new(&h).join(".cache")))?;
    let dir = cache.join("dotfiles");
    std::fs::create_dir_all(&dir).ok()?;
    Some(dir.join(format!("{command}.log")))
}

/// Local time rendered with a `chrono` format string.
pub(super) fn local_time(format: &str) -> String {
    chrono::Local::now().format(format).to_string()
}
