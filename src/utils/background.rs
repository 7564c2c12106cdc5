use std::future::Future;
use tracing::error;

/// Runs `task` to completion on a dedicated thread with its own tokio
/// runtime, leaving the UI thread free to keep rendering.
///
/// If the runtime cannot be built the future is dropped unpolled; callers
/// observe that as their result channel disconnecting.
pub fn spawn<F>(name: &str, task: F)
where
    F: Future<Output = ()> + Send + 'static,
{
    let name = name.to_string();
    let spawned = std::thread::Builder::new()
        .name(name.clone())
        .spawn(move || match tokio::runtime::Runtime::new() {
            Ok(rt) => rt.block_on(task),
            Err(e) => error!(task = %name, "Failed to start async runtime: {}", e),
        });

    if let Err(e) = spawned {
        error!("Failed to spawn background thread: {}", e);
    }
}
