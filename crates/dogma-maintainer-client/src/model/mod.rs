// Request and response models for the token API

pub mod token;
pub mod user;

pub use token::{AccessRule, CreateTokenForm, TokenDetail};
pub use user::UserInfo;
