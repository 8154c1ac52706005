//! Per-worker stacks of preallocated scratch series.
//!
//! Composite kernels (division, powers, function composition, mixed
//! real/complex dispatch) need intermediate series. Instead of allocating,
//! they borrow them from the [`Workspace`] of the calling worker. Each pool
//! is a stack: [`TempPool::acquire`] hands out the next free slot as a
//! [`Temp`] guard, and dropping the guard pops it. Guards must be released in
//! reverse order of acquisition, which scoped `let` bindings give for free.
//!
//! A workspace is owned by exactly one thread (`Send`, not `Sync`), so the
//! stacks need neither locks nor atomics.

use std::cell::{Cell, RefCell, RefMut};
use std::fmt;
use std::ops::{Deref, DerefMut};
use std::sync::Arc;

use num_complex::Complex64;

use crate::coef::Coef;
use crate::desc::{self, Descriptor};
use crate::series::Series;

/// Errors raised by temporary-pool misuse.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PoolError {
    /// Every slot of the stack is in use.
    Exhausted {
        /// Worker id.
        tid: usize,
        /// Stack depth bound.
        limit: usize,
    },
    /// A temporary was released while a more recent one was still live.
    OutOfOrder {
        /// Worker id.
        tid: usize,
        /// Slot that was released.
        released: usize,
        /// Slot on top of the stack, if any.
        expected: Option<usize>,
    },
}

impl fmt::Display for PoolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PoolError::Exhausted { tid, limit } => write!(
                f,
                "temporary pool exhausted (thread {}, limit {})",
                tid, limit
            ),
            PoolError::OutOfOrder {
                tid,
                released,
                expected,
            } => {
                write!(
                    f,
                    "temporaries must be released in LIFO order (thread {}, released slot {}, ",
                    tid, released
                )?;
                match expected {
                    Some(e) => write!(f, "expected slot {})", e),
                    None => write!(f, "stack is empty)"),
                }
            }
        }
    }
}

impl std::error::Error for PoolError {}

/// Bounded stack of scratch series of one coefficient type.
pub struct TempPool<C: Coef> {
    tid: usize,
    slots: Vec<RefCell<Series<C>>>,
    depth: Cell<usize>,
}

impl<C: Coef> TempPool<C> {
    fn new(desc: &Arc<Descriptor>, tid: usize) -> Self {
        TempPool {
            tid,
            slots: (0..desc.max_tmp())
                .map(|_| RefCell::new(Series::new(desc)))
                .collect(),
            depth: Cell::new(0),
        }
    }

    /// Number of temporaries currently acquired.
    #[inline]
    pub fn depth(&self) -> usize {
        self.depth.get()
    }

    /// Stack depth bound.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Borrow the next free slot as a zero series with `proto`'s capacity.
    pub fn try_acquire<D: Coef>(&self, proto: &Series<D>) -> Result<Temp<'_, C>, PoolError> {
        let slot = self.depth.get();
        if slot >= self.slots.len() {
            return Err(PoolError::Exhausted {
                tid: self.tid,
                limit: self.slots.len(),
            });
        }
        let mut series = self.slots[slot].borrow_mut();
        desc::ensure_same(&series.desc, &proto.desc);
        series.set_capacity(proto.mo);
        series.reset();
        self.depth.set(slot + 1);
        tracing::trace!(tid = self.tid, slot, mo = proto.mo, "acquire temporary");
        Ok(Temp {
            pool: self,
            slot,
            series,
        })
    }

    /// Like [`try_acquire`](Self::try_acquire), panicking when the stack is
    /// full.
    #[track_caller]
    pub fn acquire<D: Coef>(&self, proto: &Series<D>) -> Temp<'_, C> {
        match self.try_acquire(proto) {
            Ok(t) => t,
            Err(e) => panic!("{}", e),
        }
    }

    fn release(&self, slot: usize) {
        let depth = self.depth.get();
        if depth == 0 || slot != depth - 1 {
            if std::thread::panicking() {
                return;
            }
            panic!(
                "{}",
                PoolError::OutOfOrder {
                    tid: self.tid,
                    released: slot,
                    expected: depth.checked_sub(1),
                }
            );
        }
        self.depth.set(depth - 1);
        tracing::trace!(tid = self.tid, slot, "release temporary");
    }
}

/// A borrowed scratch series. Released when dropped.
pub struct Temp<'p, C: Coef> {
    pool: &'p TempPool<C>,
    slot: usize,
    series: RefMut<'p, Series<C>>,
}

impl<'p, C: Coef> Temp<'p, C> {
    /// Stack position of this temporary.
    #[inline]
    pub fn slot(&self) -> usize {
        self.slot
    }

    /// Release explicitly. Equivalent to dropping the guard.
    #[inline]
    pub fn release(self) {
        drop(self);
    }
}

impl<C: Coef> Deref for Temp<'_, C> {
    type Target = Series<C>;
    #[inline]
    fn deref(&self) -> &Series<C> {
        &self.series
    }
}

impl<C: Coef> DerefMut for Temp<'_, C> {
    #[inline]
    fn deref_mut(&mut self) -> &mut Series<C> {
        &mut self.series
    }
}

impl<C: Coef> Drop for Temp<'_, C> {
    fn drop(&mut self) {
        self.pool.release(self.slot);
    }
}

/// Scratch resources of one worker: a real and a complex temporary stack
/// built on one descriptor.
///
/// Temporaries released out of order while the thread is already panicking
/// are not returned: the depth stays where it was, so those slots are lost
/// for the rest of this workspace's life. The loss is bounded by
/// `max_tmp`; once exhausted, acquiring reports [`PoolError::Exhausted`].
/// Build a fresh workspace after catching such a panic.
pub struct Workspace {
    desc: Arc<Descriptor>,
    tid: usize,
    real: TempPool<f64>,
    complex: TempPool<Complex64>,
}

impl Workspace {
    pub(crate) fn new(desc: &Arc<Descriptor>, tid: usize) -> Self {
        tracing::debug!(tid, max_tmp = desc.max_tmp(), "workspace created");
        Workspace {
            desc: Arc::clone(desc),
            tid,
            real: TempPool::new(desc, tid),
            complex: TempPool::new(desc, tid),
        }
    }

    /// Worker id.
    #[inline]
    pub fn tid(&self) -> usize {
        self.tid
    }

    #[inline]
    pub fn desc(&self) -> &Arc<Descriptor> {
        &self.desc
    }

    #[inline]
    pub fn real_pool(&self) -> &TempPool<f64> {
        &self.real
    }

    #[inline]
    pub fn complex_pool(&self) -> &TempPool<Complex64> {
        &self.complex
    }

    /// The pool of coefficient type `C`.
    #[inline]
    pub fn pool<C: Coef>(&self) -> &TempPool<C> {
        C::pool(self)
    }

    /// Acquire a temporary of type `C` shaped like `proto`.
    #[inline]
    #[track_caller]
    pub fn tmp<C: Coef, D: Coef>(&self, proto: &Series<D>) -> Temp<'_, C> {
        self.pool::<C>().acquire(proto)
    }
}

impl fmt::Debug for Workspace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Workspace")
            .field("tid", &self.tid)
            .field("real_depth", &self.real.depth())
            .field("complex_depth", &self.complex.depth())
            .finish()
    }
}
