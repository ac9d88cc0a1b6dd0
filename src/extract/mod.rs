//! # Reply extraction
//!
//! Turns the free-form text an agent returns into a [`ParsedContent`]:
//! a content plan plus per-platform outputs. Everything here is pure and
//! synchronous; regexes are compiled once into shared statics.
//!
//! ## Building blocks
//!
//! | Item | Purpose |
//! |------|---------|
//! | [`patterns`] | Heading/label matchers and placeholder values |
//! | [`plan_section`] / [`outputs_section`] | Locate the `A) Plan` and `B) Outputs` sections |
//! | [`extract_plan`] | The five plan fields, defaulted independently |
//! | [`extract_outputs`] | Body, hashtags and CTA per platform |
//! | [`fallback`] | The record used when every strategy fails |
//! | [`strip_think_tags`] | Remove `<think>` blocks from text |
//!
//! ## Strategies
//!
//! [`JsonStrategy`], [`FencedJsonStrategy`] and [`HeuristicStrategy`]
//! implement [`ExtractionStrategy`]; [`ResponseParser`](crate::ResponseParser)
//! tries them in that order.
//!
//! [`ParsedContent`]: crate::ParsedContent

pub mod error;
pub mod fallback;
pub mod markup;
pub mod outputs;
pub mod patterns;
pub mod plan;
pub mod section;
pub mod strategy;

pub use error::ExtractError;
pub use fallback::fallback;
pub use markup::strip_think_tags;
pub use outputs::{extract_outputs, extract_platform, OutputsExtraction};
pub use plan::{extract_plan, PlanExtraction};
pub use section::{outputs_section, plan_section};
pub use strategy::{ExtractionStrategy, FencedJsonStrategy, HeuristicStrategy, JsonStrategy};
