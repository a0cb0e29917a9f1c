//! Platform timers.

use std::time::Duration;

use futures::future::LocalBoxFuture;

pub(crate) fn sleep(duration: Duration) -> LocalBoxFuture<'static, ()> {
    #[cfg(target_arch = "wasm32")]
    {
        Box::pin(gloo_timers::future::sleep(duration))
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        Box::pin(tokio::time::sleep(duration))
    }
}

pub(crate) fn never() -> LocalBoxFuture<'static, ()> {
    Box::pin(futures::future::pending::<()>())
}
