//! Rate-control pauses between inference calls.

use async_trait::async_trait;
use std::time::Duration;

/// Something that can pause the pipeline for a number of seconds
#[async_trait]
pub trait Delay: Send + Sync {
    async fn wait(&self, secs: u64);
}

/// Sleeps on the tokio timer
pub struct TokioDelay;

#[async_trait]
impl Delay for TokioDelay {
    async fn wait(&self, secs: u64) {
        if secs == 0 {
            return;
        }
        log::debug!("Waiting {}s before next inference call", secs);
        tokio::time::sleep(Duration::from_secs(secs)).await;
    }
}
