use std::fmt::{Debug, Display};
use std::ops::{Add, AddAssign, Div, Mul, MulAssign, Neg, Sub, SubAssign};

use num_complex::Complex64;
use num_traits::{One, Zero};

use crate::pool::{TempPool, Workspace};

/// Coefficient type of a series: `f64` or `Complex64`.
///
/// Bundles the field arithmetic the kernels need, the handful of
/// transcendental functions evaluated at an expansion point, and the
/// selection of the matching temporary pool in a [`Workspace`].
/// Only `f64` and `Complex64` implement this.
pub trait Coef:
    Copy
    + Send
    + Sync
    + Default
    + Debug
    + Display
    + PartialEq
    + Zero
    + One
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + Neg<Output = Self>
    + AddAssign
    + SubAssign
    + MulAssign
    + 'static
{
    /// Embed a real number.
    fn from_real(x: f64) -> Self;
    /// Real component.
    fn re(self) -> f64;
    /// Imaginary component (`0` for reals).
    fn im(self) -> f64;
    /// Magnitude used by tolerance checks.
    fn norm(self) -> f64;
    /// `true` when every component has magnitude below `eps`.
    ///
    /// NaN components are never below `eps`.
    fn below(self, eps: f64) -> bool;

    fn exp(self) -> Self;
    fn ln(self) -> Self;
    fn sqrt(self) -> Self;
    fn sin_cos(self) -> (Self, Self);
    fn atan(self) -> Self;

    /// The temporary pool of this coefficient type in `ws`.
    fn pool(ws: &Workspace) -> &TempPool<Self>;

    #[inline]
    fn scale(self, s: f64) -> Self {
        self * Self::from_real(s)
    }
}

impl Coef for f64 {
    #[inline]
    fn from_real(x: f64) -> Self {
        x
    }
    #[inline]
    fn re(self) -> f64 {
        self
    }
    #[inline]
    fn im(self) -> f64 {
        0.0
    }
    #[inline]
    fn norm(self) -> f64 {
        self.abs()
    }
    #[inline]
    fn below(self, eps: f64) -> bool {
        self.abs() < eps
    }
    #[inline]
    fn exp(self) -> Self {
        f64::exp(self)
    }
    #[inline]
    fn ln(self) -> Self {
        f64::ln(self)
    }
    #[inline]
    fn sqrt(self) -> Self {
        f64::sqrt(self)
    }
    #[inline]
    fn sin_cos(self) -> (Self, Self) {
        f64::sin_cos(self)
    }
    #[inline]
    fn atan(self) -> Self {
        f64::atan(self)
    }
    #[inline]
    fn pool(ws: &Workspace) -> &TempPool<Self> {
        ws.real_pool()
    }
}

impl Coef for Complex64 {
    #[inline]
    fn from_real(x: f64) -> Self {
        Complex64::new(x, 0.0)
    }
    #[inline]
    fn re(self) -> f64 {
        self.re
    }
    #[inline]
    fn im(self) -> f64 {
        self.im
    }
    #[inline]
    fn norm(self) -> f64 {
        Complex64::norm(self)
    }
    #[inline]
    fn below(self, eps: f64) -> bool {
        self.re.abs() < eps && self.im.abs() < eps
    }
    #[inline]
    fn exp(self) -> Self {
        Complex64::exp(self)
    }
    #[inline]
    fn ln(self) -> Self {
        Complex64::ln(self)
    }
    #[inline]
    fn sqrt(self) -> Self {
        Complex64::sqrt(self)
    }
    #[inline]
    fn sin_cos(self) -> (Self, Self) {
        (Complex64::sin(self), Complex64::cos(self))
    }
    #[inline]
    fn atan(self) -> Self {
        Complex64::atan(self)
    }
    #[inline]
    fn pool(ws: &Workspace) -> &TempPool<Self> {
        ws.complex_pool()
    }
}
