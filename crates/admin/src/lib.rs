//! Rivaaj back-office services.
//!
//! Everything the shop staff does that customers never see: moving
//! orders through their statuses, adding and retiring catalog entries,
//! and managing product imagery in the backend's object storage. The
//! admin UI drives an [`console::AdminConsole`]; the console talks to the
//! backend through an [`backend::AdminGateway`].
//!
//! Writes here use the same hosted backend as the storefront but must be
//! configured with a key authorized for admin operations.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod backend;
pub mod config;
pub mod console;

pub use backend::AdminClient;
pub use config::AdminConfig;
pub use console::AdminConsole;
