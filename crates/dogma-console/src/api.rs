// Token creation backend

use async_trait::async_trait;

use dogma_maintainer_client::{
    MaintainerClient, MaintainerError,
    model::{CreateTokenForm, TokenDetail},
};

/// Backend that issues application tokens
#[async_trait]
pub trait TokenCreator: Send + Sync {
    async fn create_token(&self, form: &CreateTokenForm) -> Result<TokenDetail, MaintainerError>;
}

#[async_trait]
impl TokenCreator for MaintainerClient {
    async fn create_token(&self, form: &CreateTokenForm) -> Result<TokenDetail, MaintainerError> {
        MaintainerClient::create_token(self, form).await
    }
}
