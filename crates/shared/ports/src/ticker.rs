use async_trait::async_trait;

/// Port for the periodic poll signal
///
/// Replaces a UI animation timer. Production code waits on a tokio interval,
/// tests fire ticks by hand.
#[async_trait]
pub trait Ticker: Send {
    /// Wait for the next tick
    ///
    /// Implementations that can no longer produce ticks must stay pending
    /// instead of returning.
    async fn tick(&mut self);
}
