use regex::Regex;
use std::collections::HashMap;
use std::hash::Hash;
use std::sync::LazyLock;

static WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b\w+\b").expect("static word pattern"));

pub const STOPWORDS: &[&str] = &[
    "the", "and", "for", "that", "with", "this", "from", "they", "have", "your", "will", "just",
    "like", "about", "when", "what", "there", "their", "were", "which", "been", "more", "than",
    "some", "could", "them", "only", "also",
];

/// Lowercased words longer than three characters that are not stopwords.
pub fn content_words(text: &str) -> impl Iterator<Item = String> + '_ {
    WORD.find_iter(text)
        .map(|m| m.as_str().to_lowercase())
        .filter(|w| w.chars().count() > 3 && !STOPWORDS.contains(&w.as_str()))
}

/// Occurrence counts, most frequent first; ties keep first-seen order.
pub fn value_counts<T, I>(items: I) -> Vec<(T, usize)>
where
    T: Eq + Hash + Clone,
    I: IntoIterator<Item = T>,
{
    let mut index: HashMap<T, usize> = HashMap::new();
    let mut counts: Vec<(T, usize)> = Vec::new();
    for item in items {
        match index.get(&item) {
            Some(&i) => counts[i].1 += 1,
            None => {
                index.insert(item.clone(), counts.len());
                counts.push((item, 1));
            }
        }
    }
    // sort_by is stable, so equal counts stay in first-seen order
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}

pub fn top_words<'a, I>(texts: I, n: usize) -> Vec<(String, usize)>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut counts = value_counts(texts.into_iter().flat_map(content_words));
    counts.truncate(n);
    counts
}

/// Whole-word, case-insensitive containment.
pub fn contains_word(text: &str, word: &str) -> bool {
    match Regex::new(&format!(r"(?i)\b{}\b", regex::escape(word))) {
        Ok(re) => re.is_match(text),
        Err(_) => false,
    }
}
