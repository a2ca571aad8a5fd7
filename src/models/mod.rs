//! Domain models for EcoTourist.
//!
//! # Core Concepts
//!
//! ## Static Entities
//!
//! Loaded once from the catalog at startup and never mutated:
//!
//! - [`Destination`]: A tourist city shown in the destination grid.
//! - [`EcoTask`]: An eco rule that awards points when completed. The same rules
//!   apply to every destination.
//!
//! ## Session Entities
//!
//! These exist only for the lifetime of a session and are dropped on reset:
//!
//! - [`CompletionEntry`]: Append-only record of one task completion.
//! - [`SessionView`]: Read-only projection of the session handed to the
//!   presentation layer.

mod destination;
mod eco_task;
mod history;
mod view;

pub use destination::*;
pub use eco_task::*;
pub use history::*;
pub use view::*;
