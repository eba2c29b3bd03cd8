use crate::usecase::ports::repo::RepoError;

/// Runs a blocking storage call on tokio's blocking pool so the UI task only
/// awaits it. A worker that panics or is cancelled counts as unavailable
/// storage.
pub async fn run_blocking<F, T>(f: F) -> Result<T, RepoError>
where
    F: FnOnce() -> Result<T, RepoError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|err| RepoError::StorageUnavailable(format!("storage worker failed: {err}")))?
}
