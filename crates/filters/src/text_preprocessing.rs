//! Text canonicalization for comment datasets
//!
//! Produces the normalized comparison form of a raw comment: emoji become
//! `:name:` tokens, version strings collapse to a single marker, URLs and
//! punctuation are stripped and whitespace is collapsed.

use regex::Regex;
use std::sync::OnceLock;

/// Marker that replaces version strings such as `v2.3.1`
pub const VERSION_TOKEN: &str = "[version]";

/// Marker that replaces product mentions in masked text
pub const PRODUCT_TOKEN: &str = "[product]";

// Lazy-initialized regexes, compiled once per process
static VERSION_REGEX: OnceLock<Regex> = OnceLock::new();
static URL_REGEX: OnceLock<Regex> = OnceLock::new();
static PUNCTUATION_REGEX: OnceLock<Regex> = OnceLock::new();
static WHITESPACE_REGEX: OnceLock<Regex> = OnceLock::new();
static MAX_EMOJI_CHARS: OnceLock<usize> = OnceLock::new();

fn get_version_regex() -> &'static Regex {
    VERSION_REGEX.get_or_init(|| {
        Regex::new(r"v\d+(?:\.\d+)*").expect("Failed to compile version regex")
    })
}

fn get_url_regex() -> &'static Regex {
    URL_REGEX.get_or_init(|| Regex::new(r"http\S+").expect("Failed to compile URL regex"))
}

fn get_punctuation_regex() -> &'static Regex {
    PUNCTUATION_REGEX.get_or_init(|| {
        Regex::new(r"[^\w\s\[\]:]").expect("Failed to compile punctuation regex")
    })
}

fn get_whitespace_regex() -> &'static Regex {
    WHITESPACE_REGEX.get_or_init(|| {
        Regex::new(r"\s+").expect("Failed to compile whitespace regex")
    })
}

/// Longest emoji sequence in the emoji table, counted in chars
fn max_emoji_chars() -> usize {
    *MAX_EMOJI_CHARS.get_or_init(|| {
        emojis::iter()
            .flat_map(|emoji| {
                std::iter::once(emoji).chain(emoji.skin_tones().into_iter().flatten())
            })
            .map(|emoji| emoji.as_str().chars().count())
            .max()
            .unwrap_or(1)
    })
}

/// Replace every emoji with a `:name:` token
///
/// Multi-codepoint sequences (ZWJ families, flags, keycaps, skin tones) are
/// matched longest-first. Characters that are not emoji pass through in
/// their original order.
pub fn normalize_emoji(text: &str) -> String {
    if text.is_ascii() {
        return text.to_string();
    }

    let max_chars = max_emoji_chars();
    let mut result = String::with_capacity(text.len());
    let mut rest = text;

    'outer: while let Some(first) = rest.chars().next() {
        // Plain ASCII never starts an emoji, except keycap sequences
        if first.is_ascii() && !matches!(first, '#' | '*' | '0'..='9') {
            result.push(first);
            rest = &rest[1..];
            continue;
        }

        let candidate_ends: Vec<usize> = rest
            .char_indices()
            .skip(1)
            .map(|(i, _)| i)
            .chain(std::iter::once(rest.len()))
            .take(max_chars)
            .collect();

        for &end in candidate_ends.iter().rev() {
            if let Some(emoji) = emojis::get(&rest[..end]) {
                push_emoji_token(&mut result, emoji.name());
                rest = &rest[end..];
                continue 'outer;
            }
        }

        result.push(first);
        rest = &rest[first.len_utf8()..];
    }

    result
}

/// Append `:name:` with the name lowercased and non-alphanumeric runs as `_`
fn push_emoji_token(out: &mut String, name: &str) {
    out.push(':');
    let mut separator = false;
    for c in name.chars() {
        if c.is_alphanumeric() {
            if separator && !out.ends_with(':') {
                out.push('_');
            }
            separator = false;
            out.extend(c.to_lowercase());
        } else {
            separator = true;
        }
    }
    out.push(':');
}

/// Canonicalize raw comment text
///
/// Missing text canonicalizes to the empty string. See [`canonicalize_into`]
/// for the transform order.
pub fn canonicalize(text: Option<&str>) -> String {
    let mut buffer = String::new();
    if let Some(text) = text {
        canonicalize_into(text, &mut buffer);
    }
    buffer
}

/// Canonicalize text into an existing buffer
///
/// Applies transformations in the following order:
/// 1. Lowercase conversion
/// 2. Emoji to `:name:` tokens
/// 3. Version strings (`v` + digits, optional `.digits` groups) to `[version]`
/// 4. URL removal
/// 5. Removal of everything except word characters, whitespace, `[`, `]`, `:`
/// 6. Whitespace collapsing and trimming
///
/// Steps 2-6 repeat until the text is stable, so the result is idempotent
/// even when step 5 joins characters into a new match (`v-2` becomes `v2`,
/// and a digit can meet a keycap mark to form a new emoji).
pub fn canonicalize_into(text: &str, buffer: &mut String) {
    buffer.clear();

    let mut current = text.to_lowercase();

    loop {
        let next = strip_markup(&normalize_emoji(&current));
        if next == current {
            break;
        }
        current = next;
    }

    buffer.push_str(&current);
}

/// Steps 3-6 of canonicalization
fn strip_markup(text: &str) -> String {
    let text = get_version_regex().replace_all(text, VERSION_TOKEN);
    let text = get_url_regex().replace_all(&text, "");
    let text = get_punctuation_regex().replace_all(&text, "");
    get_whitespace_regex()
        .replace_all(&text, " ")
        .trim()
        .to_string()
}
