use std::sync::Arc;

use futures::future::BoxFuture;

/// Error produced by a failed operation.
///
/// Carried opaquely onto the error output stream; the scheduler never
/// inspects it, retries it, or aborts because of it.
pub type TaskError = Box<dyn std::error::Error + Send + Sync>;

/// A type-erased fallible operation, as stored in a
/// [`LocalWorker`](crate::worker::LocalWorker) registration map.
///
/// Anything satisfying `Fn() -> Fut` with
/// `Fut: Future<Output = Result<(), TaskError>>` can be erased into this.
pub type Operation = Arc<dyn Fn() -> BoxFuture<'static, Result<(), TaskError>> + Send + Sync>;
