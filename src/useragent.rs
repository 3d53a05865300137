//! Best-effort user-agent normalization.

use woothee::parser::Parser;

/// Normalize a raw user-agent string to `"Name MajorVersion"`.
///
/// Returns `None` when the string cannot be classified; callers keep the raw
/// value in that case.
pub fn normalize(raw: &str) -> Option<String> {
    let ua = Parser::new().parse(raw)?;
    if ua.name.is_empty() || ua.name == "UNKNOWN" {
        return None;
    }

    let major = ua
        .version
        .split('.')
        .next()
        .filter(|v| !v.is_empty() && *v != "UNKNOWN");

    Some(match major {
        Some(major) => format!("{} {}", ua.name, major),
        None => ua.name.to_owned(),
    })
}
