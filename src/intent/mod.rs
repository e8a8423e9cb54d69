// ABOUTME: Intent classification engine built from the intents.json catalog
// ABOUTME: Maps user text to an intent tag with confidence and a canned reply
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Intent Engine
//!
//! Loads a fixed intent catalog (`intents.json`), classifies incoming
//! messages against it, and selects a canned reply for the predicted
//! intent. Low-confidence or out-of-vocabulary messages get a fallback
//! reply.

mod catalog;
mod classifier;
mod responder;

pub use catalog::{IntentCatalog, IntentDefinition};
pub use classifier::{IntentClassifier, Prediction};
pub use responder::{BotReply, IntentResponder, FALLBACK_RESPONSES, FALLBACK_TAG};
