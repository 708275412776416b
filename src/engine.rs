//! Matching, validation and generation engine.
//!
//! ## How the parts work together
//!
//! ```text
//! tokens ── TriggerInfo::scan (trigger.rs)
//!             - modifier flags ("not"/"now" next to "a")
//!             - idiom keywords present in the bag
//!                       │
//!                       v
//!           Generator::run (generator.rs)
//!             - strip modifiers, check every word is known
//!             - enumerate distinct arrangements
//!             - ArrangementFilter, then Validator
//!                       │
//!                       v
//!           Validator::is_valid (validator.rs)
//!             - first/last token rules
//!             - left-to-right scan with idiom windows
//!                       │
//!                       v
//!           Matcher (matcher.rs) ── equals (connector.rs)
//!             - pair search over normalized formulas
//!             - ordinal-aware three/four word checks
//! ```
//!
//! ## Responsibilities by module
//!
//! - `connector.rs`: atomic connector comparison (polarity, wildcard,
//!   truncation).
//! - `matcher.rs`: word-to-word checks over a [`Grammar`](crate::Grammar).
//! - `validator.rs`: accepts or rejects one ordering.
//! - `generator.rs`: enumeration, modifier splicing, rendering.
//! - `trigger.rs`: cheap bag pre-scan.
//! - `metrics.rs`: per-run counters and timing.
//!
//! ## Debugging
//!
//! The engine emits `tracing` events: `trace` for rejected orderings and
//! individual links, `debug` for accepted sentences and run summaries.

#[path = "engine/connector.rs"]
mod connector;
#[path = "engine/generator.rs"]
mod generator;
#[path = "engine/matcher.rs"]
mod matcher;
#[path = "engine/metrics.rs"]
mod metrics;
#[path = "engine/trigger.rs"]
mod trigger;
#[path = "engine/validator.rs"]
mod validator;


pub use connector::equals;
pub use generator::{AcceptAll, ArrangementFilter, Generation, Generator};
pub use matcher::{Matcher, Side};
pub use metrics::GenerationMetrics;
pub use trigger::{IdiomMask, ModifierFlags, TriggerInfo};
pub use validator::{PLACEHOLDER, Validator};
