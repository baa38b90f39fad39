//! Keyword selection for follow-up questions

use std::collections::HashMap;

const MIN_KEYWORD_LEN: usize = 4;

const STOP_WORDS: &[&str] = &[
    "about", "after", "again", "also", "been", "before", "being", "both", "could", "does",
    "doing", "each", "even", "from", "have", "having", "here", "into", "just", "like", "more",
    "most", "much", "only", "other", "over", "really", "replying", "said", "same", "should",
    "some", "such", "talk", "than", "that", "their", "them", "then", "there", "these", "they",
    "thing", "things", "think", "this", "those", "through", "very", "want", "were", "what",
    "when", "where", "which", "while", "will", "with", "would", "your",
];

/// Pick the most salient word of `text`.
///
/// Candidates are lowercased alphabetic words of at least four letters that
/// are not stop words. The most frequent candidate wins; ties go to the one
/// that appears first. Returns `None` when nothing qualifies.
pub fn pick_keyword(text: &str) -> Option<String> {
    let mut counts: HashMap<String, (usize, usize)> = HashMap::new();

    let words = text
        .split(|c: char| !c.is_alphabetic())
        .filter(|w| w.chars().count() >= MIN_KEYWORD_LEN)
        .map(str::to_lowercase)
        .filter(|w| !STOP_WORDS.contains(&w.as_str()));

    for (position, word) in words.enumerate() {
        counts.entry(word).or_insert((0, position)).0 += 1;
    }

    counts
        .into_iter()
        .max_by(|(_, (count_a, pos_a)), (_, (count_b, pos_b))| {
            count_a.cmp(count_b).then(pos_b.cmp(pos_a))
        })
        .map(|(word, _)| word)
}
