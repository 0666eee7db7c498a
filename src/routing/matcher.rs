// Matcher - word-overlap scoring of subcategories against a request

use super::catalog::subcategories;
use super::types::CategoryId;

/// Best subcategory of `category` for the request, if any word overlaps.
///
/// Each subcategory word found in the request scores 1, and each request word
/// found inside a subcategory word scores 0.5. The strictly highest score wins,
/// so ties keep the earlier subcategory.
pub fn best_subcategory(category: CategoryId, prompt: &str) -> Option<&'static str> {
    let prompt_lower = prompt.to_lowercase();

    let mut best: Option<&'static str> = None;
    let mut best_score = 0.0;
    for &candidate in subcategories(category) {
        let candidate_score = score(candidate, &prompt_lower);
        if candidate_score > best_score {
            best_score = candidate_score;
            best = Some(candidate);
        }
    }
    best
}

/// Overlap score of one subcategory against an already lowercased request
pub fn score(subcategory: &str, prompt_lower: &str) -> f32 {
    let subcategory_lower = subcategory.to_lowercase();
    let sub_words: Vec<&str> = subcategory_lower.split_whitespace().collect();

    let exact = sub_words
        .iter()
        .filter(|word| prompt_lower.contains(*word))
        .count();
    let partial = prompt_lower
        .split_whitespace()
        .filter(|word| sub_words.iter().any(|sub| sub.contains(word)))
        .count();

    exact as f32 + partial as f32 * 0.5
}
