//! Sparse truncated power series: `Series<C>`.
//!
//! Coefficients are stored densely in the descriptor's enumeration, but
//! only the homogeneous blocks flagged in `nz` hold meaningful data. Every
//! other block is logically zero whatever its storage contains, so clearing
//! a series never touches more than its constant term.
//!
//! Three fields must stay consistent under every mutation:
//! - `nz`: bit `o` set iff some coefficient of order `o ≥ 1` is nonzero;
//! - `lo`, `hi`: when `nz` is nonempty, `1 ≤ lo ≤ hi ≤ min(mo, to)` and every
//!   set bit lies in `lo..=hi`; the empty state is `lo = 1, hi = 0`;
//! - `coef[0]`: the constant term, tracked outside `nz`.

use std::fmt;
use std::sync::Arc;

use crate::coef::Coef;
use crate::desc::{self, Descriptor};
use crate::mono;
use crate::order_mask::{OrderMask, Orders};

/// Truncated multivariate power series with sparse order tracking.
#[derive(Clone)]
pub struct Series<C: Coef> {
    pub(crate) desc: Arc<Descriptor>,
    pub(crate) mo: u8,
    pub(crate) lo: u8,
    pub(crate) hi: u8,
    pub(crate) nz: OrderMask,
    name: String,
    pub(crate) coef: Vec<C>,
}

impl<C: Coef> Series<C> {
    /// Zero series of capacity `desc.mo()`.
    pub fn new(desc: &Arc<Descriptor>) -> Self {
        Self::with_order(desc, desc.mo())
    }

    /// Zero series of capacity `mo` (clipped to `desc.mo()`).
    pub fn with_order(desc: &Arc<Descriptor>, mo: u8) -> Self {
        let mo = mo.min(desc.mo());
        Series {
            desc: Arc::clone(desc),
            mo,
            lo: 1,
            hi: 0,
            nz: OrderMask::EMPTY,
            name: String::new(),
            coef: vec![C::zero(); desc.size_for(mo)],
        }
    }

    /// Zero series sharing `self`'s descriptor and capacity.
    pub fn same(&self) -> Self {
        Self::with_order(&self.desc, self.mo)
    }

    /// Constant series `v`.
    pub fn constant(desc: &Arc<Descriptor>, v: C) -> Self {
        let mut s = Self::new(desc);
        s.coef[0] = v;
        s
    }

    /// The variable `x_iv` expanded about `v0`: `v0 + x_iv`.
    pub fn variable(desc: &Arc<Descriptor>, iv: usize, v0: C) -> Self {
        assert!(
            iv < desc.nv(),
            "variable index {} out of range (nv = {})",
            iv,
            desc.nv()
        );
        let mut s = Self::constant(desc, v0);
        if s.top() >= 1 {
            s.set(1 + iv, C::one());
        }
        s
    }

    /// Builder-style name assignment.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    // ── Accessors ──

    #[inline]
    pub fn desc(&self) -> &Arc<Descriptor> {
        &self.desc
    }

    /// Capacity order.
    #[inline]
    pub fn mo(&self) -> u8 {
        self.mo
    }

    /// Lowest active order (`1` when no order ≥ 1 is present).
    #[inline]
    pub fn lo(&self) -> u8 {
        self.lo
    }

    /// Highest active order (`0` when no order ≥ 1 is present).
    #[inline]
    pub fn hi(&self) -> u8 {
        self.hi
    }

    /// Orders ≥ 1 holding a nonzero coefficient.
    #[inline]
    pub fn nz(&self) -> OrderMask {
        self.nz
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Constant term.
    #[inline]
    pub fn value(&self) -> C {
        self.coef[0]
    }

    /// Highest order this series can hold after truncation.
    #[inline]
    pub(crate) fn top(&self) -> u8 {
        self.mo.min(self.desc.to())
    }

    /// Number of slots a series of this capacity spans.
    #[inline]
    pub fn size(&self) -> usize {
        self.desc.size_for(self.mo)
    }

    /// Logical value of slot `i` (zero for unflagged orders).
    pub fn get(&self, i: usize) -> C {
        assert!(i < self.size(), "slot {} out of range ({})", i, self.size());
        let o = self.desc.order_of(i);
        if o == 0 || self.nz.get(o) {
            self.coef[i]
        } else {
            C::zero()
        }
    }

    /// Logical value of monomial `m`; zero when `m` lies beyond `mo`.
    pub fn get_mono(&self, m: &[u8]) -> C {
        match self.desc.index_of(m) {
            Some(i) if i < self.size() => self.get(i),
            _ => C::zero(),
        }
    }

    /// Coefficients of order `o` when that order is flagged.
    #[inline]
    pub fn block(&self, o: u8) -> Option<&[C]> {
        if o == 0 {
            return Some(&self.coef[..1]);
        }
        if self.nz.get(o) {
            Some(&self.coef[self.desc.order_range(o)])
        } else {
            None
        }
    }

    /// Dense copy of the logical coefficients, `size()` entries.
    pub fn to_dense(&self) -> Vec<C> {
        let mut out = vec![C::zero(); self.size()];
        out[0] = self.coef[0];
        for o in self.scan() {
            let r = self.desc.order_range(o);
            out[r.clone()].copy_from_slice(&self.coef[r]);
        }
        out
    }

    /// Flagged orders within `lo..=min(hi, to)`, increasing.
    #[inline]
    pub fn scan(&self) -> Orders {
        self.nz
            .high_cut(self.hi.min(self.desc.to()))
            .low_cut(self.lo)
            .iter()
    }

    // ── Bookkeeping lifecycle ──

    /// `true` for the canonical zero series.
    #[inline]
    pub fn is_nul(&self) -> bool {
        self.nz.is_empty() && self.coef[0] == C::zero()
    }

    /// Become the canonical zero series. Storage beyond slot 0 is left as is.
    #[inline]
    pub fn reset(&mut self) {
        self.lo = 1;
        self.hi = 0;
        self.nz = OrderMask::EMPTY;
        self.coef[0] = C::zero();
    }

    /// Same as [`reset`](Self::reset).
    #[inline]
    pub fn clear(&mut self) {
        self.reset();
    }

    /// Drop every order above the global truncation order.
    #[inline]
    pub fn truncate(&mut self) {
        self.hi = self.hi.min(self.desc.to());
        self.nz = self.nz.high_cut(self.hi);
    }

    /// Take `src`'s order bookkeeping, clipped to this series' capacity and
    /// the truncation order. Coefficients are not copied.
    pub fn copy_bookkeeping<D: Coef>(&mut self, src: &Series<D>) {
        self.lo = src.lo.min(self.mo).max(1);
        self.hi = src.hi.min(self.top());
        self.nz = src.nz.high_cut(self.hi);
    }

    /// Recompute `lo`/`hi` from `nz` after bulk writes.
    ///
    /// `nz` must already describe the coefficients. The constant term is
    /// kept, so an empty mask yields `lo = 1, hi = 0` without losing it.
    #[inline]
    pub fn adjust(&mut self) {
        match (self.nz.lowest(), self.nz.highest()) {
            (Some(lo), Some(hi)) => {
                self.lo = lo;
                self.hi = hi;
            }
            _ => {
                self.lo = 1;
                self.hi = 0;
            }
        }
    }

    /// Zero order `o` and clear its bit. `lo`/`hi` are not recomputed so
    /// several clears can share one [`adjust`](Self::adjust).
    pub fn clear_order(&mut self, o: u8) {
        assert!(o <= self.mo, "order {} above capacity {}", o, self.mo);
        let r = self.desc.order_range(o);
        self.coef[r].fill(C::zero());
        if o > 0 {
            self.nz.clear(o);
        }
    }

    /// Rescan order `o` and clear its bit when every slot is zero.
    /// `lo`/`hi` are not touched. Unflagged orders are logically zero
    /// whatever their storage holds, so they stay unflagged; order 0 and
    /// orders above `min(mo, to)` are ignored.
    pub fn update_order(&mut self, o: u8) {
        assert!(o <= self.mo, "order {} above capacity {}", o, self.mo);
        if o == 0 || o > self.top() || !self.nz.get(o) {
            return;
        }
        self.rescan_order(o);
    }

    /// Set or clear bit `o` from the slots of order `o`. Only for storage
    /// this series has just written in full.
    fn rescan_order(&mut self, o: u8) {
        let r = self.desc.order_range(o);
        if self.coef[r].iter().any(|&c| c != C::zero()) {
            self.nz.set(o);
        } else {
            self.nz.clear(o);
        }
    }

    /// Zero every coefficient of order `o` whose components are all below
    /// `eps`; clear the bit if nothing survives.
    pub fn stabilize_order(&mut self, o: u8, eps: f64) {
        assert!(o <= self.mo, "order {} above capacity {}", o, self.mo);
        let r = self.desc.order_range(o);
        let mut alive = false;
        for c in &mut self.coef[r] {
            if *c == C::zero() || c.below(eps) {
                *c = C::zero();
            } else {
                alive = true;
            }
        }
        if o > 0 && !alive {
            self.nz.clear(o);
        }
    }

    /// Rescan every flagged order and narrow `lo`/`hi`.
    pub fn update(&mut self) {
        for o in self.scan() {
            self.update_order(o);
        }
        self.nz = self.nz.high_cut(self.top());
        self.adjust();
    }

    /// [`stabilize_order`](Self::stabilize_order) over the constant and
    /// every flagged order, then narrow `lo`/`hi`.
    pub fn stabilize(&mut self, eps: f64) {
        self.stabilize_order(0, eps);
        for o in self.scan() {
            self.stabilize_order(o, eps);
        }
        self.adjust();
    }

    // ── Coefficient writes ──

    /// Set the constant term.
    #[inline]
    pub fn set_constant(&mut self, v: C) {
        self.coef[0] = v;
    }

    /// Multiply every coefficient by `v` in place.
    pub fn scale(&mut self, v: C) {
        if v == C::zero() {
            self.reset();
            return;
        }
        self.coef[0] *= v;
        for o in self.scan() {
            for i in self.desc.order_range(o) {
                self.coef[i] *= v;
            }
            self.update_order(o);
        }
        self.adjust();
    }

    /// Write slot `i`, keeping the bookkeeping consistent. Writes to orders
    /// above the truncation order are dropped.
    pub fn set(&mut self, i: usize, v: C) {
        assert!(i < self.size(), "slot {} out of range ({})", i, self.size());
        let o = self.desc.order_of(i);
        if o == 0 {
            self.coef[0] = v;
            return;
        }
        if o > self.desc.to() {
            return;
        }
        if self.nz.get(o) {
            self.coef[i] = v;
            if v == C::zero() {
                self.update_order(o);
            }
        } else if v != C::zero() {
            let r = self.desc.order_range(o);
            self.coef[r].fill(C::zero());
            self.coef[i] = v;
            self.nz.set(o);
        }
        self.adjust();
    }

    /// Write monomial `m`. Panics when `m` is not representable.
    pub fn set_mono(&mut self, m: &[u8], v: C) {
        let i = self
            .desc
            .index_of(m)
            .unwrap_or_else(|| panic!("monomial {} not representable", mono::format(m)));
        self.set(i, v);
    }

    /// Overwrite all coefficients from a dense slice (`size()` or fewer
    /// entries, missing ones taken as zero), then rebuild the mask.
    pub fn set_dense(&mut self, values: &[C]) {
        assert!(values.len() <= self.size(), "too many coefficients");
        let n = values.len();
        self.coef[..n].copy_from_slice(values);
        self.coef[n..].fill(C::zero());
        self.nz = OrderMask::EMPTY;
        for o in 1..=self.top() {
            self.rescan_order(o);
        }
        self.adjust();
    }

    /// Copy `src` (bookkeeping and coefficients), clipped to this capacity.
    pub fn copy_from(&mut self, src: &Series<C>) {
        desc::ensure_same(&self.desc, &src.desc);
        self.copy_bookkeeping(src);
        self.coef[0] = src.coef[0];
        for o in self.scan() {
            let r = self.desc.order_range(o);
            self.coef[r.clone()].copy_from_slice(&src.coef[r]);
        }
        self.adjust();
    }

    /// Prepare order `o` for accumulation: zero its block unless already
    /// flagged, then flag it.
    #[inline]
    pub(crate) fn open_order(&mut self, o: u8) {
        if !self.nz.get(o) {
            let r = self.desc.order_range(o);
            self.coef[r].fill(C::zero());
            self.nz.set(o);
        }
    }

    /// Set the capacity of a preallocated series (pool use only).
    pub(crate) fn set_capacity(&mut self, mo: u8) {
        debug_assert!(self.desc.size_for(mo) <= self.coef.len());
        self.mo = mo.min(self.desc.mo());
    }
}

impl<C: Coef> fmt::Debug for Series<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Series")
            .field("name", &self.name)
            .field("mo", &self.mo)
            .field("lo", &self.lo)
            .field("hi", &self.hi)
            .field("nz", &self.nz)
            .field("coef", &self.to_dense())
            .finish()
    }
}

impl<C: Coef> fmt::Display for Series<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = if self.name.is_empty() { "-" } else { &self.name };
        writeln!(
            f,
            "{}: nv = {}, mo = {}, lo = {}, hi = {}",
            name,
            self.desc.nv(),
            self.mo,
            self.lo,
            self.hi
        )?;
        if self.is_nul() {
            return writeln!(f, "  all coefficients are zero");
        }
        let mut rows = Vec::new();
        if self.coef[0] != C::zero() {
            rows.push(0);
        }
        for o in self.scan() {
            rows.extend(self.desc.order_range(o).filter(|&i| self.coef[i] != C::zero()));
        }
        for i in rows {
            writeln!(
                f,
                "  {:>6}  {}  {:>2}  {}",
                i,
                self.coef[i],
                self.desc.order_of(i),
                mono::format(self.desc.mono(i))
            )?;
        }
        Ok(())
    }
}
