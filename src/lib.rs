//! Member Rust Client
//!
//! A typed client for the member REST API: bearer-token injection,
//! classified errors, per-domain endpoints and cursor pagination, plus the
//! route guard and login redirect a front end needs around them.

pub mod auth_client;
pub mod client;
pub mod config;
pub mod endpoints;
pub mod error;
pub mod events;
pub mod guard;
pub mod models;
pub mod pagination;
pub mod storage;
pub mod token_store;
pub mod types;

pub use auth_client::AuthClient;
pub use client::ApiClient;
pub use config::ClientConfig;
pub use endpoints::{Creatable, Domain, DomainClient, Updatable};
pub use error::{ClientError, ErrorBody, ErrorCategory, HttpError, Result};
pub use events::{AuthEvent, AuthEvents, Navigator, RedirectHandler};
pub use guard::{Guard, GuardDecision};
pub use pagination::{Page, PageQuery, Paginator, SortOrder};
pub use storage::{FileStorage, MemoryStorage, Storage};
pub use token_store::{NoopTokenProvider, TokenProvider, TokenStore};
pub use types::{AccessToken, ConfigResponse, DevLoginRequest, DevLoginResponse};
