//! AWS infrastructure adapter.
//!
//! Implements [`domain::StateStore`] over Amazon S3 and
//! [`domain::SecretResolver`] over SSM Parameter Store.
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** SDK client construction, request building, and error
//! classification live here. Clients are constructed explicitly by the
//! composition root and passed in; nothing in this crate holds a global
//! client.

pub mod config;
pub mod s3;
pub mod ssm;

pub use config::{load_sdk_config, AwsSettings};
pub use s3::S3StateStore;
pub use ssm::SsmSecretResolver;
