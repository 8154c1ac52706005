//! Whole-series arithmetic.
//!
//! All kernels write into a caller-provided target whose capacity bounds the
//! result: orders above `min(c.mo, to)` are dropped. They visit only the
//! orders flagged in their operands, so the cost follows the size of the
//! result rather than the capacity. Kernels that need intermediate series
//! (division, powers, elementary functions, Poisson brackets) take the
//! calling worker's [`Workspace`](crate::Workspace).
//!
//! Targets must be distinct from the operands; the borrow checker enforces
//! it.

mod arith;
mod deriv;
mod fun;

pub use arith::{acc, add, axpbypc, dif, equ, mul, scale, sub};
pub use deriv::{deriv, poisbra};
pub use fun::{atan, atan2, compose, div, exp, hypot, inv, ln, pow, powi, sincos, sqrt};
