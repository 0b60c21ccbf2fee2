//! The event-condition-action engine.
//!
//! - `condition`: predicate evaluation per trigger category
//! - `selector`: single-winner workflow selection
//! - `dispatcher`: action side effects
//! - `priority`: alert priority text to `Priority`
//! - `plan_gate`: one active workflow per company on restricted plans
//! - `engine`: entry points for internal domain events

pub mod condition;
pub mod dispatcher;
pub mod engine;
pub mod plan_gate;
pub mod priority;
pub mod selector;
