pub mod baidu;
pub mod bing;
pub mod caiyun;
pub mod deepl;
pub mod google;
pub mod linguee;
pub mod tencent;
pub mod youdao;

use crate::domain::error::ProviderError;
use crate::domain::model::ProviderKind;
use std::future::Future;
use tokio_util::sync::CancellationToken;

/// Race an HTTP future against the caller's cancellation token. On
/// cancellation the request future is dropped, so no partial state is
/// written anywhere.
pub(crate) async fn race_cancel<F, T>(
    provider: ProviderKind,
    cancel: &CancellationToken,
    fut: F,
) -> Result<T, ProviderError>
where
    F: Future<Output = Result<T, reqwest::Error>>,
{
    tokio::select! {
        _ = cancel.cancelled() => Err(ProviderError::cancelled(provider)),
        res = fut => res.map_err(|e| ProviderError::from_transport(provider, e)),
    }
}
