//! Descriptor: variable count, truncation orders and the monomial
//! enumeration shared by every series built on it.
//!
//! Monomials are graded by total order; within one order they are sorted
//! descending-lexicographically by exponent vector, so for two variables the
//! enumeration starts `1, x, y, x², xy, y², x³, …`. `ord2idx[o]..ord2idx[o+1]`
//! is the slot range of order `o`.

use std::fmt;
use std::ops::Range;
use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::order_mask::MAX_ORDER;
use crate::pool::Workspace;

/// Default depth of each per-thread temporary stack.
pub const DESC_MAX_TMP: usize = 8;

/// Upper bound on the coefficient count of one series.
pub const MAX_SIZE: usize = u32::MAX as usize;

/// Parameters of a [`Descriptor`].
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DescriptorConfig {
    /// Number of variables.
    pub nv: usize,
    /// Maximum representable order.
    pub mo: u8,
    /// Global truncation order, `mo` when `None`.
    pub to: Option<u8>,
    /// Depth bound of each temporary stack.
    pub max_tmp: usize,
    /// Number of workers [`Descriptor::workspaces`] prepares.
    pub threads: usize,
}

impl Default for DescriptorConfig {
    fn default() -> Self {
        DescriptorConfig {
            nv: 1,
            mo: 1,
            to: None,
            max_tmp: DESC_MAX_TMP,
            threads: 1,
        }
    }
}

impl DescriptorConfig {
    pub fn new(nv: usize, mo: u8) -> Self {
        DescriptorConfig {
            nv,
            mo,
            ..Default::default()
        }
    }

    pub fn truncation(mut self, to: u8) -> Self {
        self.to = Some(to);
        self
    }

    pub fn max_tmp(mut self, max_tmp: usize) -> Self {
        self.max_tmp = max_tmp;
        self
    }

    pub fn threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    /// Validate and build the descriptor.
    pub fn build(&self) -> Result<Arc<Descriptor>, DescError> {
        Descriptor::new(self).map(Arc::new)
    }
}

/// Errors that can occur while building a [`Descriptor`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DescError {
    /// `nv == 0`.
    NoVariables,
    /// `mo` exceeds what an order mask can index.
    OrderTooHigh { mo: u8, max: u8 },
    /// `to > mo`.
    TruncationAboveMax { to: u8, mo: u8 },
    /// The enumeration would exceed [`MAX_SIZE`] coefficients.
    TooLarge { nv: usize, mo: u8 },
    /// `max_tmp == 0`.
    NoTemporaries,
    /// `threads == 0`.
    NoThreads,
}

impl fmt::Display for DescError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DescError::NoVariables => write!(f, "descriptor needs at least one variable"),
            DescError::OrderTooHigh { mo, max } => {
                write!(f, "maximum order {} exceeds the supported {}", mo, max)
            }
            DescError::TruncationAboveMax { to, mo } => {
                write!(f, "truncation order {} exceeds maximum order {}", to, mo)
            }
            DescError::TooLarge { nv, mo } => write!(
                f,
                "{} variables at order {} exceed {} coefficients",
                nv, mo, MAX_SIZE
            ),
            DescError::NoTemporaries => write!(f, "temporary stack depth must be positive"),
            DescError::NoThreads => write!(f, "thread count must be positive"),
        }
    }
}

impl std::error::Error for DescError {}

/// Shared, immutable series metadata.
pub struct Descriptor {
    nv: usize,
    mo: u8,
    to: u8,
    max_tmp: usize,
    threads: usize,
    /// `ord2idx[o]` = first slot of order `o`; length `mo + 2`.
    ord2idx: Vec<usize>,
    /// Flat exponent table, `nv` entries per monomial.
    monos: Vec<u8>,
    /// Total order of each slot.
    ords: Vec<u8>,
    /// `counts[m * (mo + 1) + s] = C(s + m, m)`: monomials of order `s` in
    /// `m + 1` variables.
    counts: Vec<usize>,
}

impl fmt::Debug for Descriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Descriptor")
            .field("nv", &self.nv)
            .field("mo", &self.mo)
            .field("to", &self.to)
            .field("size", &self.size())
            .field("max_tmp", &self.max_tmp)
            .field("threads", &self.threads)
            .finish()
    }
}

impl Descriptor {
    /// Build a descriptor from `config`. See also [`DescriptorConfig::build`].
    pub fn new(config: &DescriptorConfig) -> Result<Self, DescError> {
        let nv = config.nv;
        let mo = config.mo;
        let to = config.to.unwrap_or(mo);
        if nv == 0 {
            return Err(DescError::NoVariables);
        }
        if mo > MAX_ORDER {
            return Err(DescError::OrderTooHigh { mo, max: MAX_ORDER });
        }
        if to > mo {
            return Err(DescError::TruncationAboveMax { to, mo });
        }
        if config.max_tmp == 0 {
            return Err(DescError::NoTemporaries);
        }
        if config.threads == 0 {
            return Err(DescError::NoThreads);
        }

        let width = mo as usize + 1;
        let mut counts = vec![1usize; (nv + 1) * width];
        for m in 1..=nv {
            for s in 1..width {
                let v = counts[(m - 1) * width + s]
                    .checked_add(counts[m * width + s - 1])
                    .filter(|&v| v <= MAX_SIZE)
                    .ok_or(DescError::TooLarge { nv, mo })?;
                counts[m * width + s] = v;
            }
        }

        let mut ord2idx = Vec::with_capacity(width + 1);
        ord2idx.push(0);
        for o in 0..width {
            let next = ord2idx[o] + counts[(nv - 1) * width + o];
            ord2idx.push(next);
        }
        let size = ord2idx[width];

        let mut monos = Vec::with_capacity(size * nv);
        let mut ords = Vec::with_capacity(size);
        let mut scratch = vec![0u8; nv];
        for o in 0..=mo {
            enumerate(o, 0, &mut scratch, &mut monos);
            ords.resize(ords.len() + counts[(nv - 1) * width + o as usize], o);
        }
        debug_assert_eq!(monos.len(), size * nv);

        tracing::debug!(nv, mo, to, size, max_tmp = config.max_tmp, "descriptor built");

        Ok(Descriptor {
            nv,
            mo,
            to,
            max_tmp: config.max_tmp,
            threads: config.threads,
            ord2idx,
            monos,
            ords,
            counts,
        })
    }

    /// Number of variables.
    #[inline]
    pub fn nv(&self) -> usize {
        self.nv
    }

    /// Maximum representable order.
    #[inline]
    pub fn mo(&self) -> u8 {
        self.mo
    }

    /// Global truncation order.
    #[inline]
    pub fn to(&self) -> u8 {
        self.to
    }

    /// Depth bound of each temporary stack.
    #[inline]
    pub fn max_tmp(&self) -> usize {
        self.max_tmp
    }

    #[inline]
    pub fn threads(&self) -> usize {
        self.threads
    }

    /// Number of coefficients up to `mo`.
    #[inline]
    pub fn size(&self) -> usize {
        self.ord2idx[self.mo as usize + 1]
    }

    /// Number of coefficients of a series of capacity `mo`.
    #[inline]
    pub fn size_for(&self, mo: u8) -> usize {
        self.ord2idx[mo.min(self.mo) as usize + 1]
    }

    /// The order → first-slot table (length `mo + 2`).
    #[inline]
    pub fn ord2idx(&self) -> &[usize] {
        &self.ord2idx
    }

    /// Slot range of the homogeneous block of order `o`.
    #[inline]
    pub fn order_range(&self, o: u8) -> Range<usize> {
        self.ord2idx[o as usize]..self.ord2idx[o as usize + 1]
    }

    /// Exponents of the monomial in slot `i`.
    #[inline]
    pub fn mono(&self, i: usize) -> &[u8] {
        &self.monos[i * self.nv..(i + 1) * self.nv]
    }

    /// Total order of slot `i`.
    #[inline]
    pub fn order_of(&self, i: usize) -> u8 {
        self.ords[i]
    }

    /// Slot of monomial `m`, `None` if its length is wrong or its order
    /// exceeds `mo`.
    pub fn index_of(&self, m: &[u8]) -> Option<usize> {
        if m.len() != self.nv {
            return None;
        }
        let total = crate::mono::order(m);
        if total > self.mo as u32 {
            return None;
        }
        Some(self.index_by(total, |k| m[k] as u32))
    }

    /// Slot of the product of the monomials in slots `i` and `j`.
    /// Their orders must sum to at most `mo`.
    #[inline]
    pub fn product_index(&self, i: usize, j: usize) -> usize {
        let total = self.ords[i] as u32 + self.ords[j] as u32;
        debug_assert!(total <= self.mo as u32);
        let a = self.mono(i);
        let b = self.mono(j);
        self.index_by(total, |k| a[k] as u32 + b[k] as u32)
    }

    /// Slot of `∂/∂x_iv` applied to the monomial in slot `i`, `None` when
    /// the monomial does not depend on `x_iv`.
    #[inline]
    pub fn deriv_index(&self, i: usize, iv: usize) -> Option<usize> {
        let m = self.mono(i);
        if m[iv] == 0 {
            return None;
        }
        let total = self.ords[i] as u32 - 1;
        Some(self.index_by(total, |k| m[k] as u32 - (k == iv) as u32))
    }

    /// Rank a monomial of order `total` given its exponents by variable.
    ///
    /// Counts the monomials of the same order that precede it in the
    /// descending-lexicographic enumeration.
    fn index_by(&self, total: u32, exp: impl Fn(usize) -> u32) -> usize {
        let width = self.mo as usize + 1;
        let mut rank = 0;
        let mut rem = total;
        for k in 0..self.nv - 1 {
            let e = exp(k);
            if rem > e {
                let m = self.nv - k - 1;
                rank += self.counts[m * width + (rem - e - 1) as usize];
            }
            rem -= e;
        }
        self.ord2idx[total as usize] + rank
    }

    /// A fresh workspace for worker `tid`, with `max_tmp` real and complex
    /// temporaries preallocated.
    pub fn workspace(self: &Arc<Self>, tid: usize) -> Workspace {
        Workspace::new(self, tid)
    }

    /// One workspace per configured worker, ids `0..threads`.
    pub fn workspaces(self: &Arc<Self>) -> Vec<Workspace> {
        (0..self.threads).map(|tid| self.workspace(tid)).collect()
    }
}

/// Push every monomial of order `rem` over variables `k..` in
/// descending-lexicographic order.
fn enumerate(rem: u8, k: usize, scratch: &mut [u8], out: &mut Vec<u8>) {
    let nv = scratch.len();
    if k == nv - 1 {
        scratch[k] = rem;
        out.extend_from_slice(scratch);
        return;
    }
    for e in (0..=rem).rev() {
        scratch[k] = e;
        enumerate(rem - e, k + 1, scratch, out);
    }
    scratch[k] = 0;
}

/// `true` when both series use the same descriptor.
#[inline]
pub(crate) fn same(a: &Arc<Descriptor>, b: &Arc<Descriptor>) -> bool {
    Arc::ptr_eq(a, b)
}

/// Panic unless `a` and `b` share one descriptor.
#[inline]
#[track_caller]
pub(crate) fn ensure_same(a: &Arc<Descriptor>, b: &Arc<Descriptor>) {
    assert!(same(a, b), "incompatible series (descriptors differ)");
}
