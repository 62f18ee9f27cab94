//! Client library for the FinAut certification API.
//!
//! [`FinAutClient`] wraps the authenticated request pipeline: OAuth2
//! client-credentials token handling with caching and a single retry on 401,
//! plus resource method groups for users, companies, departments, statuses
//! and results.

pub mod authenticator;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod http_client;
pub mod parameters;
pub mod persnr;
pub mod request;
pub mod resources;
pub mod token;
pub mod token_manager;

pub use client::FinAutClient;
pub use config::ClientConfig;
pub use error::{ErrorDetails, FinAutError};
pub use request::CallDescriptor;
pub use token::Token;
