//! Webhook receiver.
//!
//! Binds an HTTP server and hands every request on `/` or `/webhook` to a
//! [`handlers::WebhookDispatcher`]. The dispatcher does all authentication
//! and routing; this crate only translates between HTTP and the domain.
//!
//! | Dispatch result | Status | Body |
//! |-----------------|--------|------|
//! | `Ok` | 200 | `200 OK` |
//! | authentication failure | 400 | `Invalid HMAC signature` |
//! | any other error | 500 | generic message |
//! | invocation deadline exceeded | 504 | generic message |
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** axum and tokio networking types stop here. The
//! [`handlers`] crate sees only [`domain::InboundEvent`].

pub mod router;
pub mod server;

pub use router::{webhook_router, DEFAULT_INVOCATION_TIMEOUT};
pub use server::{serve, ListenerError};
