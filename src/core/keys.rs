use regex::Regex;
use serde_json::Value;
use std::collections::BTreeSet;
use std::sync::LazyLock;

/// Keys whose suffix carries free text (a chat partner, a quoted comment) and must be cut.
static KEY_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)^Chat History with .+",
        r"(?i)^comments?:.*",
        r"(?i)^replies?:.*",
        r"(?i)^posts?:.*",
        r"(?i)^story:.*",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("static key pattern"))
    .collect()
});

/// Normalize an export key.
///
/// Pattern keys collapse to their title-cased prefix before the first `:`
/// (`"comments: nice pic"` becomes `"Comments"`); every other key only loses
/// trailing colons.
pub fn sanitize_key(key: &str) -> String {
    if KEY_PATTERNS.iter().any(|re| re.is_match(key)) {
        let head = key.split_once(':').map_or(key, |(head, _)| head);
        return title_case(head);
    }
    key.trim_end_matches(':').to_string()
}

/// Uppercase the first letter of every alphabetic run, lowercase the rest.
fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_alpha = false;
    for c in s.chars() {
        if c.is_alphabetic() {
            if prev_alpha {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(c);
            prev_alpha = false;
        }
    }
    out
}

/// Every sanitized object key found anywhere in `value`, sorted.
///
/// Purely numeric keys are index-like and never offered for redaction.
pub fn extract_keys(value: &Value) -> BTreeSet<String> {
    let mut keys = BTreeSet::new();
    collect_keys(value, &mut keys);
    keys
}

fn collect_keys(value: &Value, keys: &mut BTreeSet<String>) {
    match value {
        Value::Object(map) => {
            for (k, v) in map {
                let sk = sanitize_key(k);
                if !is_all_digits(&sk) {
                    keys.insert(sk);
                }
                collect_keys(v, keys);
            }
        }
        Value::Array(items) => {
            for item in items {
                collect_keys(item, keys);
            }
        }
        _ => {}
    }
}

fn is_all_digits(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_digit())
}
