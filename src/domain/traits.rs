use crate::domain::error::ProviderError;
use crate::domain::model::{ProviderKind, ProviderPayload, QueryWordInfo};
use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

/// Trait for translation providers.
///
/// Each implementation owns request construction, transport and response
/// parsing for one upstream service. Implementations are independent of
/// one another and may be invoked concurrently.
#[async_trait]
pub trait TranslateProvider: Send + Sync {
    fn kind(&self) -> ProviderKind;

    /// Translate the query. At most one primary HTTP call per invocation;
    /// some providers issue a preliminary call for an endpoint or token.
    /// Must observe `cancel` at every I/O suspension point and settle
    /// with a `Cancelled` error without side effects.
    async fn translate(
        &self,
        query: &QueryWordInfo,
        cancel: &CancellationToken,
    ) -> Result<ProviderPayload, ProviderError>;
}
