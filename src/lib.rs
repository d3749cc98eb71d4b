//! Number Bot - counting and arithmetic brain for a children's voice assistant
//!
//! The classifier decides what the child wants. Every number the bot says
//! is recomputed here and overwrites whatever the classifier produced.

pub mod brain;
pub mod core;
pub mod llm;
pub mod math;
pub mod reconcile;
