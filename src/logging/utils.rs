//! Log file location, colour stripping and timestamps.
use std::ffi::OsString;
use std::path::PathBuf;

/// Timestamp shapes used in the log file.
#[derive(Debug, Clone, Copy)]
pub(super) enum Stamp {
    /// `YYYY-MM-DD HH:MM:SS`, for the run header.
    DateTime,
    /// `HH:MM:SS`, for each line.
    Time,
}

/// Current UTC time in the given shape.
pub(super) fn utc_now(stamp: Stamp) -> String {
    let format = match stamp {
        Stamp::DateTime => "%Y-%m-%d %H:%M:%S",
        Stamp::Time => "%H:%M:%S",
    };
    chrono::Utc::now().format(format).to_string()
}

/// Remove ANSI CSI sequences (`ESC [` ... final byte in `@`..=`~`), which
/// covers colours as well as cursor and erase codes.
pub(super) fn strip_ansi(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\x1b' {
            out.push(c);
            continue;
        }
        if chars.next_if_eq(&'[').is_some() {
            let _ = chars.by_ref().find(|ch| ('@'..='~').contains(ch));
        }
    }
    out
}

/// `$XDG_CACHE_HOME`, else `$HOME/.cache`, else `./.cache`. Empty values
/// count as unset.
fn cache_root(xdg_cache: Option<OsString>, home: Option<OsString>) -> PathBuf {
    let set = |v: Option<OsString>| v.filter(|v| !v.is_empty()).map(PathBuf::from);
    set(xdg_cache).unwrap_or_else(|| set(home).unwrap_or_else(|| PathBuf::from(".")).join(".cache"))
}

/// `<cache>/bootstrap/<command>.log`, creating the directory. `None` when
/// it cannot be created.
pub(super) fn log_file_path(command: &str) -> Option<PathBuf> {
    let dir = cache_root(std::env::var_os("XDG_CACHE_HOME"), std::env::var_os("HOME"))
        .join("bootstrap");
    std::fs::create_dir_all(&dir).ok()?;
    Some(dir.join(format!("{command}.log")))
}
