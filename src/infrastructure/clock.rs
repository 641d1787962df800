use std::time::Duration;

use crate::domain::ProbeError;
use crate::ports::Clock;

#[derive(Clone)]
pub struct TokioClock;

impl TokioClock {
    pub fn new() -> Self {
        Self
    }
}

impl Clock for TokioClock {
    async fn timeout<F, T>(&self, duration: Duration, future: F) -> Result<T, ProbeError>
    where
        F: std::future::Future<Output = T> + Send,
        T: Send,
    {
        tokio::time::timeout(duration, future)
            .await
            .map_err(|_| ProbeError::timeout(format!("operation timed out after {:?}", duration)))
    }
}
