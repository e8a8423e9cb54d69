// ABOUTME: TF-IDF bag-of-words intent classifier with cosine similarity scoring
// ABOUTME: Tokenizes messages and scores them against every catalog intent
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use super::catalog::IntentCatalog;
use std::collections::HashMap;

/// Words too common to carry intent signal
const STOPWORDS: &[&str] = &[
    "a", "an", "the", "is", "are", "was", "were", "be", "to", "of", "and", "or", "i", "me", "my",
    "you", "your", "it", "in", "on", "for", "do", "does", "can", "how", "what", "please",
];

/// Classification outcome for one message
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    /// Winning intent tag
    pub tag: String,
    /// Cosine similarity against the winning intent, in [0, 1]
    pub confidence: f64,
}

/// Per-intent TF-IDF vector over the shared vocabulary
struct IntentVector {
    tag: String,
    weights: HashMap<usize, f64>,
    norm: f64,
}

/// Bag-of-words classifier built from the catalog's patterns
pub struct IntentClassifier {
    vocabulary: HashMap<String, usize>,
    idf: Vec<f64>,
    intents: Vec<IntentVector>,
}

/// Lowercase a message and split it into alphanumeric word tokens,
/// dropping stopwords
fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty() && !STOPWORDS.contains(w))
        .map(ToOwned::to_owned)
        .collect()
}

fn term_counts(tokens: &[String], vocabulary: &HashMap<String, usize>) -> HashMap<usize, f64> {
    let mut counts: HashMap<usize, f64> = HashMap::new();
    for token in tokens {
        if let Some(&index) = vocabulary.get(token) {
            *counts.entry(index).or_insert(0.0) += 1.0;
        }
    }
    counts
}

fn vector_norm(weights: &HashMap<usize, f64>) -> f64 {
    weights.values().map(|w| w * w).sum::<f64>().sqrt()
}

impl IntentClassifier {
    /// Build the classifier from a catalog's patterns
    #[must_use]
    pub fn from_catalog(catalog: &IntentCatalog) -> Self {
        // Vocabulary over every pattern token, in first-seen order
        let mut vocabulary: HashMap<String, usize> = HashMap::new();
        let mut intent_tokens: Vec<(String, Vec<String>)> = Vec::with_capacity(catalog.len());

        for intent in catalog.intents() {
            let mut tokens = Vec::new();
            for pattern in &intent.patterns {
                for token in tokenize(pattern) {
                    let next_index = vocabulary.len();
                    vocabulary.entry(token.clone()).or_insert(next_index);
                    tokens.push(token);
                }
            }
            intent_tokens.push((intent.tag.clone(), tokens));
        }

        // Smoothed inverse document frequency, one document per intent
        let doc_count = intent_tokens.len() as f64;
        let mut document_frequency = vec![0.0_f64; vocabulary.len()];
        for (_, tokens) in &intent_tokens {
            let mut seen = vec![false; vocabulary.len()];
            for token in tokens {
                if let Some(&index) = vocabulary.get(token) {
                    if !seen[index] {
                        seen[index] = true;
                        document_frequency[index] += 1.0;
                    }
                }
            }
        }
        let idf: Vec<f64> = document_frequency
            .iter()
            .map(|df| ((1.0 + doc_count) / (1.0 + df)).ln() + 1.0)
            .collect();

        let intents = intent_tokens
            .into_iter()
            .map(|(tag, tokens)| {
                let mut weights = term_counts(&tokens, &vocabulary);
                for (index, weight) in &mut weights {
                    *weight *= idf[*index];
                }
                let norm = vector_norm(&weights);
                IntentVector { tag, weights, norm }
            })
            .collect();

        Self {
            vocabulary,
            idf,
            intents,
        }
    }

    /// Classify a message against every intent
    ///
    /// Messages with no in-vocabulary token score 0 against the first
    /// intent, which the responder then treats as a fallback.
    #[must_use]
    pub fn classify(&self, message: &str) -> Prediction {
        let tokens = tokenize(message);
        let mut query = term_counts(&tokens, &self.vocabulary);
        for (index, weight) in &mut query {
            *weight *= self.idf[*index];
        }
        let query_norm = vector_norm(&query);

        let mut best_tag = self
            .intents
            .first()
            .map_or_else(String::new, |v| v.tag.clone());
        let mut best_score = 0.0_f64;

        if query_norm > 0.0 {
            for intent in &self.intents {
                if intent.norm == 0.0 {
                    continue;
                }
                let dot: f64 = query
                    .iter()
                    .filter_map(|(index, weight)| {
                        intent.weights.get(index).map(|w| w * weight)
                    })
                    .sum();
                let score = dot / (query_norm * intent.norm);
                if score > best_score {
                    best_score = score;
                    best_tag = intent.tag.clone();
                }
            }
        }

        Prediction {
            tag: best_tag,
            confidence: best_score.clamp(0.0, 1.0),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::super::catalog::{IntentCatalog, IntentDefinition};
    use super::*;

    fn catalog() -> IntentCatalog {
        IntentCatalog::from_intents(vec![
            IntentDefinition {
                tag: "greeting".into(),
                patterns: vec!["hello".into(), "hi there".into(), "good morning".into()],
                responses: vec!["Hello!".into()],
            },
            IntentDefinition {
                tag: "payslip".into(),
                patterns: vec![
                    "show my payslip".into(),
                    "download payslip".into(),
                    "where is my salary statement".into(),
                ],
                responses: vec!["Here is your payslip.".into()],
            },
            IntentDefinition {
                tag: "leave_balance".into(),
                patterns: vec![
                    "how many leave days do i have".into(),
                    "check my vacation balance".into(),
                ],
                responses: vec!["Checking your leave balance.".into()],
            },
        ])
        .unwrap()
    }

    #[test]
    fn test_exact_pattern_match() {
        let classifier = IntentClassifier::from_catalog(&catalog());
        let prediction = classifier.classify("show my payslip");
        assert_eq!(prediction.tag, "payslip");
        assert!(prediction.confidence > 0.5);
    }

    #[test]
    fn test_partial_match_prefers_right_intent() {
        let classifier = IntentClassifier::from_catalog(&catalog());
        let prediction = classifier.classify("Good morning!");
        assert_eq!(prediction.tag, "greeting");

        let prediction = classifier.classify("what is my vacation balance?");
        assert_eq!(prediction.tag, "leave_balance");
    }

    #[test]
    fn test_out_of_vocabulary_scores_zero() {
        let classifier = IntentClassifier::from_catalog(&catalog());
        let prediction = classifier.classify("zzz qqq xyzzy");
        assert!((prediction.confidence - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_confidence_bounds() {
        let classifier = IntentClassifier::from_catalog(&catalog());
        for message in ["hello", "payslip salary", "leave days vacation", "random"] {
            let prediction = classifier.classify(message);
            assert!((0.0..=1.0).contains(&prediction.confidence));
        }
    }

    #[test]
    fn test_tokenize_drops_stopwords_and_punctuation() {
        let tokens = tokenize("How do I download MY payslip?!");
        assert_eq!(tokens, vec!["download", "payslip"]);
    }
}
