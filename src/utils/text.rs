//! Post-processing for model replies and file-name sanitizing.

use once_cell::sync::Lazy;
use regex::Regex;

static NON_ALNUM: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z0-9]+").expect("static regex"));
static THINK_BLOCK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<think>.*?</think>").expect("static regex"));

/// Lowercase, collapse every run of non-alphanumeric characters into `_`, and
/// trim leading/trailing underscores. Idempotent.
///
/// ```rust
/// use bdd_forge::utils::sanitize_name;
///
/// assert_eq!(sanitize_name("Login Test #1"), "login_test_1");
/// assert_eq!(sanitize_name(&sanitize_name("Login Test #1")), "login_test_1");
/// ```
pub fn sanitize_name(name: &str) -> String {
    let lower = name.to_lowercase();
    NON_ALNUM
        .replace_all(&lower, "_")
        .trim_matches('_')
        .to_string()
}

/// Drop `<think>…</think>` reasoning blocks, then any stray tags.
pub fn strip_think_blocks(text: &str) -> String {
    THINK_BLOCK
        .replace_all(text, "")
        .replace("<think>", "")
        .replace("</think>", "")
}

/// Remove ```` ```<lang> ```` and bare ```` ``` ```` markers, then trim.
pub fn strip_fences(text: &str, lang: &str) -> String {
    let opener = format!("```{}", lang);
    let without_opener = if lang.is_empty() {
        text.to_string()
    } else {
        text.replace(&opener, "")
    };
    without_opener.replace("```", "").trim().to_string()
}

/// Body of the first ```` ```<lang> ```` block, if the reply has one.
pub fn extract_fenced_block(text: &str, lang: &str) -> Option<String> {
    let pattern = format!(r"(?s)```{}[ \t]*\r?\n(.+?)```", regex::escape(lang));
    let re = Regex::new(&pattern).ok()?;
    re.captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

/// Think blocks out, fences out, whitespace trimmed.
pub fn clean_reply(text: &str, lang: &str) -> String {
    strip_fences(&strip_think_blocks(text), lang)
}
