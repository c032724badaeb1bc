//! One authenticated session: credential restore, QR login and the guarded
//! request path that re-authenticates once on a "not logged in" reply.

pub mod credentials;
pub mod login;
pub mod manager;
pub mod store;

pub use credentials::CredentialBundle;
pub use login::QrStatus;
pub use manager::{Session, SessionSettings};
pub use store::CredentialStore;
