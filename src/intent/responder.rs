// ABOUTME: Reply selection for classified messages with fallback handling
// ABOUTME: Picks a random canned response for the winning intent or a fallback
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use super::catalog::IntentCatalog;
use super::classifier::{IntentClassifier, Prediction};
use rand::seq::SliceRandom;
use rand::Rng;

/// Tag reported when no catalog intent wins with enough confidence
pub const FALLBACK_TAG: &str = "unknown";

/// Replies used when the classifier is not confident enough
pub const FALLBACK_RESPONSES: &[&str] = &[
    "I didn't understand that. Can you please rephrase?",
    "I'm still learning. Could you ask differently?",
    "Sorry, I don't have information on that topic.",
];

/// A selected bot reply with its classification outcome
#[derive(Debug, Clone)]
pub struct BotReply {
    /// Reply text sent back to the user
    pub text: String,
    /// Intent tag the reply belongs to, or the fallback tag
    pub tag: String,
    /// Classification confidence in [0, 1]
    pub confidence: f64,
}

/// Turns user messages into bot replies using the catalog and classifier
pub struct IntentResponder {
    catalog: IntentCatalog,
    classifier: IntentClassifier,
    confidence_threshold: f64,
    max_message_chars: usize,
}

impl IntentResponder {
    /// Build a responder over a loaded catalog
    #[must_use]
    pub fn new(catalog: IntentCatalog, confidence_threshold: f64, max_message_chars: usize) -> Self {
        let classifier = IntentClassifier::from_catalog(&catalog);
        Self {
            catalog,
            classifier,
            confidence_threshold,
            max_message_chars,
        }
    }

    /// Truncate a message to the configured maximum, on a char boundary
    fn truncate<'a>(&self, message: &'a str) -> &'a str {
        match message.char_indices().nth(self.max_message_chars) {
            Some((byte_index, _)) => &message[..byte_index],
            None => message,
        }
    }

    /// Classify a message without selecting a reply
    #[must_use]
    pub fn classify(&self, message: &str) -> Prediction {
        self.classifier.classify(self.truncate(message))
    }

    /// Classify a message and pick a reply for it
    ///
    /// Response choice is random within the winning intent's replies;
    /// the caller supplies the RNG so tests can seed it.
    pub fn respond<R: Rng>(&self, message: &str, rng: &mut R) -> BotReply {
        let prediction = self.classify(message);

        let winning_intent = if prediction.confidence >= self.confidence_threshold {
            self.catalog
                .get(&prediction.tag)
                .filter(|intent| !intent.responses.is_empty())
        } else {
            None
        };

        match winning_intent {
            Some(intent) => {
                let text = intent
                    .responses
                    .choose(rng)
                    .cloned()
                    .unwrap_or_default();
                BotReply {
                    text,
                    tag: prediction.tag,
                    confidence: prediction.confidence,
                }
            }
            None => {
                tracing::debug!(
                    "Falling back for message (tag: {}, confidence: {:.3})",
                    prediction.tag,
                    prediction.confidence
                );
                let text = FALLBACK_RESPONSES
                    .choose(rng)
                    .map_or_else(String::new, |s| (*s).to_owned());
                BotReply {
                    text,
                    tag: FALLBACK_TAG.to_owned(),
                    confidence: prediction.confidence,
                }
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::super::catalog::{IntentCatalog, IntentDefinition};
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn responder(threshold: f64) -> IntentResponder {
        let catalog = IntentCatalog::from_intents(vec![
            IntentDefinition {
                tag: "greeting".into(),
                patterns: vec!["hello".into(), "hi there".into()],
                responses: vec!["Hello!".into(), "Hi, how can I help?".into()],
            },
            IntentDefinition {
                tag: "payslip".into(),
                patterns: vec!["show my payslip".into(), "download payslip".into()],
                responses: vec!["Here is your payslip.".into()],
            },
        ])
        .unwrap();
        IntentResponder::new(catalog, threshold, 512)
    }

    #[test]
    fn test_confident_message_gets_intent_reply() {
        let responder = responder(0.35);
        let mut rng = StdRng::seed_from_u64(7);

        let reply = responder.respond("show my payslip", &mut rng);
        assert_eq!(reply.tag, "payslip");
        assert_eq!(reply.text, "Here is your payslip.");
        assert!(reply.confidence >= 0.35);
    }

    #[test]
    fn test_reply_comes_from_winning_intent() {
        let responder = responder(0.35);
        let mut rng = StdRng::seed_from_u64(7);

        let reply = responder.respond("hello", &mut rng);
        assert_eq!(reply.tag, "greeting");
        assert!(["Hello!", "Hi, how can I help?"].contains(&reply.text.as_str()));
    }

    #[test]
    fn test_gibberish_gets_fallback() {
        let responder = responder(0.35);
        let mut rng = StdRng::seed_from_u64(7);

        let reply = responder.respond("xyzzy qwerty", &mut rng);
        assert_eq!(reply.tag, FALLBACK_TAG);
        assert!(FALLBACK_RESPONSES.contains(&reply.text.as_str()));
        assert!((reply.confidence - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_high_threshold_forces_fallback() {
        let responder = responder(1.01);
        let mut rng = StdRng::seed_from_u64(7);

        let reply = responder.respond("hello", &mut rng);
        assert_eq!(reply.tag, FALLBACK_TAG);
    }

    #[test]
    fn test_long_message_is_truncated() {
        let responder = responder(0.35);
        let long = format!("show my payslip {}", "x".repeat(2000));
        let prediction = responder.classify(&long);
        assert_eq!(prediction.tag, "payslip");
    }
}
