//! Auth services

pub mod authorizer;

pub use authorizer::{
    ApplicationTokenAuthorizer, AuthenticatedApp, AuthorizeError, InMemoryTokenLookup,
    RemoteAddress, TokenLookup,
};
