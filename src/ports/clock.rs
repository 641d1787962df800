use std::time::Duration;

use crate::domain::ProbeError;

pub trait Clock: Send + Sync {
    /// Bounds a network operation; elapsing yields a Timeout-class error.
    fn timeout<F, T>(
        &self,
        duration: Duration,
        future: F,
    ) -> impl std::future::Future<Output = Result<T, ProbeError>> + Send
    where
        F: std::future::Future<Output = T> + Send,
        T: Send;
}
