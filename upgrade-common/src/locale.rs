//! Active UI locale detection
//!
//! Produces locale names in the `language_TERRITORY` form used by
//! localized desktop entry keys (`Name[zh_CN]=`).

/// Locale used when the environment does not name one
pub const DEFAULT_LOCALE: &str = "C";

/// Environment variables consulted in priority order
const LOCALE_VARS: &[&str] = &["LC_ALL", "LC_MESSAGES", "LANG"];

/// Detect the active locale from the process environment
pub fn current_locale() -> String {
    LOCALE_VARS
        .iter()
        .filter_map(|var| std::env::var(var).ok())
        .map(|value| normalize(&value))
        .find(|value| !value.is_empty())
        .unwrap_or_else(|| DEFAULT_LOCALE.to_string())
}

/// Strip the encoding and modifier parts of a POSIX locale name.
///
/// `zh_CN.UTF-8` becomes `zh_CN`, `de_DE@euro` becomes `de_DE`.
pub fn normalize(raw: &str) -> String {
    let raw = raw.trim();
    let end = raw.find(['.', '@']).unwrap_or(raw.len());
    raw[..end].to_string()
}
