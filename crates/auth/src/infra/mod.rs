//! Infrastructure Layer
//!
//! Database, token provider, and mail transport implementations.

pub mod mailer;
pub mod memory;
pub mod postgres;
pub mod secrets;

pub use mailer::{HttpMailer, MailerConfig, MockMailer};
pub use memory::InMemoryCredentialStore;
pub use postgres::PgCredentialStore;
pub use secrets::HmacTokenProvider;
