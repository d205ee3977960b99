//! Optimistic mutations over watched state.

use std::future::Future;
use tokio::sync::watch;

/// Apply a local change, run the request, and undo the change if it fails.
///
/// `change` returns the data needed to undo it, or `None` if there was nothing
/// to change locally (the request still runs). `revert` receives that data
/// and is only called on failure. Both see the state as it is at that moment,
/// so unrelated updates made while the request was in flight survive.
pub async fn apply<S, U, T, E, Fut>(
    state: &watch::Sender<S>,
    change: impl FnOnce(&mut S) -> Option<U>,
    request: Fut,
    revert: impl FnOnce(&mut S, U),
) -> Result<T, E>
where
    Fut: Future<Output = Result<T, E>>,
{
    let mut undo = None;
    state.send_if_modified(|current| {
        undo = change(current);
        undo.is_some()
    });

    match request.await {
        Ok(value) => Ok(value),
        Err(e) => {
            if let Some(undo) = undo {
                state.send_modify(|current| revert(current, undo));
            }
            Err(e)
        }
    }
}
