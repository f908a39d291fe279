use once_cell::sync::Lazy;
use regex::Regex;

static SCRIPT_BLOCK_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<(script|style)\b[^>]*>.*?</(script|style)\s*>")
        .expect("SCRIPT_BLOCK_REGEX is a valid regex pattern")
});

static TAG_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"</?[a-zA-Z][^<>]*>").expect("TAG_REGEX is a valid regex pattern")
});

/// Strips markup and control characters from user-authored text and trims it.
pub fn sanitize_text(input: &str) -> String {
    let without_scripts = SCRIPT_BLOCK_REGEX.replace_all(input, "");
    let without_tags = TAG_REGEX.replace_all(&without_scripts, "");

    without_tags
        .chars()
        .filter(|c| !c.is_control() || *c == '\n' || *c == '\t')
        .collect::<String>()
        .trim()
        .to_string()
}

pub fn sanitize_optional(input: Option<String>) -> Option<String> {
    input.map(|value| sanitize_text(&value))
}
