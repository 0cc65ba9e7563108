//! Webhook handlers and the state fetch-and-store pipeline.
//!
//! This crate sequences calls between the business rules in the [`domain`]
//! crate and the port traits implemented by infrastructure crates
//! (parameter store, Terraform Cloud API, object store). It contains no
//! transport code of its own.
//!
//! ## Architectural Layer
//!
//! **Orchestration layer.** Every collaborator arrives as an `Arc<dyn _>`
//! constructed by the composition root; there are no global clients.
//!
//! ## Flow
//!
//! ```text
//! InboundEvent ─► WebhookDispatcher ─► signature::verify
//!                        │
//!                        ├─► handle_notification ─┐
//!                        └─► handle_run_task ─────┴─► StateSaver::save
//! ```

pub mod backup;
pub mod dispatcher;
pub mod notification;
pub mod run_task;

#[cfg(test)]
mod test_support;

pub use backup::{SaveOutcome, StateBackup, StateSaver};
pub use dispatcher::{WebhookDispatcher, DEFAULT_PIPELINE_TIMEOUT};
pub use notification::handle_notification;
pub use run_task::handle_run_task;
