//! Target-agnostic core of the Rate me! front-end.
//!
//! Everything here compiles natively and on `wasm32`: configuration,
//! the session context, input validation, the model catalog, viewer links,
//! and the contract of the external prediction API.

pub mod api;
pub mod auth;
pub mod catalog;
pub mod config;
pub mod link;
pub mod viewer;

pub use api::{
    ApiError, HistoryEntry, LinkPrediction, LoginOutcome, PredictionApi, RemoteId, UserModel,
};
pub use auth::{
    CredentialsError, LoginRequest, MemorySessionStore, RegisterRequest, SessionContext,
    SessionState, SessionStore,
};
pub use catalog::{ModelKey, ModelOption, ModelOrigin};
pub use config::{AppConfig, ConfigError};
pub use link::{LinkError, SupportedSource, ValidatedLink, validate_link};
pub use viewer::ViewerLinks;
