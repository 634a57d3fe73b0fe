// dogma-maintainer-client: Admin HTTP client for the Dogma token service

pub mod client;
pub mod config;
pub mod constants;
pub mod error;
pub mod http;
pub mod model;

pub use client::MaintainerClient;
pub use config::MaintainerClientConfig;
pub use error::MaintainerError;
pub use http::{DogmaHttpClient, HttpClientConfig};
