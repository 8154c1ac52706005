//! Data-parallel evaluation with one [`Workspace`] per worker.
//!
//! Temporaries are never shared: each rayon worker lazily builds one
//! workspace, tagged with its worker index, and reuses it for every item it
//! evaluates during the call.

use std::sync::{Arc, Mutex};

use rayon::prelude::*;

use crate::desc::Descriptor;
use crate::pool::Workspace;

/// A rayon pool sized to the descriptor's `threads`.
pub fn thread_pool(desc: &Descriptor) -> Result<rayon::ThreadPool, rayon::ThreadPoolBuildError> {
    rayon::ThreadPoolBuilder::new()
        .num_threads(desc.threads())
        .build()
}

/// Map `f` over `items` in parallel. `f` receives the workspace of the
/// worker evaluating it.
///
/// Runs on the current rayon pool; wrap the call in
/// [`ThreadPool::install`](rayon::ThreadPool::install) on a
/// [`thread_pool`] to honour the descriptor's worker count. A worker that
/// picks up another item while `f` waits on nested rayon work gets a fresh
/// workspace for that item, since its own is still in use.
pub fn par_map<T, R, F>(desc: &Arc<Descriptor>, items: &[T], f: F) -> Vec<R>
where
    T: Sync,
    R: Send,
    F: Fn(&Workspace, &T) -> R + Sync + Send,
{
    let slots: Vec<Mutex<Option<Workspace>>> = (0..rayon::current_num_threads())
        .map(|_| Mutex::new(None))
        .collect();

    items
        .par_iter()
        .map(|x| {
            let tid = rayon::current_thread_index().unwrap_or(0);
            match slots.get(tid).and_then(|m| m.try_lock().ok()) {
                Some(mut guard) => {
                    let ws = guard.get_or_insert_with(|| desc.workspace(tid));
                    f(ws, x)
                }
                None => f(&desc.workspace(tid), x),
            }
        })
        .collect()
}
