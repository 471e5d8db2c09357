use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use tracing::error;
use tracing::warn;

use super::ClusterLifecycle;
use crate::Result;

/// Runs `scenario` against a started cluster and always tears it down.
///
/// The cluster is started once, shared with the scenario through an `Arc`,
/// and shut down on every exit path: success, error, or panic. A panic is
/// resumed once teardown has finished. When the scenario itself failed, its
/// error wins over a teardown error.
pub async fn with_cluster<C, F, Fut, T>(
    cluster: C,
    scenario: F,
) -> Result<T>
where
    C: ClusterLifecycle,
    F: FnOnce(Arc<C>) -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let cluster = Arc::new(cluster);

    if let Err(e) = cluster.start().await {
        error!("cluster failed to start: {}", e);
        if let Err(down) = cluster.shutdown().await {
            warn!("teardown after failed start also failed: {}", down);
        }
        return Err(e);
    }

    let shared = cluster.clone();
    let result = AssertUnwindSafe(async move { scenario(shared).await })
        .catch_unwind()
        .await;

    let teardown = cluster.shutdown().await;

    match result {
        Ok(Ok(value)) => {
            teardown?;
            Ok(value)
        }
        Ok(Err(e)) => {
            if let Err(down) = teardown {
                warn!("teardown after failed scenario also failed: {}", down);
            }
            Err(e)
        }
        Err(panic) => {
            if let Err(down) = teardown {
                warn!("teardown after panicked scenario failed: {}", down);
            }
            std::panic::resume_unwind(panic)
        }
    }
}
