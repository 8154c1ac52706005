pub mod bit;
pub mod coef;
pub mod conv;
pub mod desc;
pub mod kernels;
pub mod mono;
pub mod order_mask;
#[cfg(feature = "parallel")]
pub mod parallel;
pub mod pool;
pub mod series;
pub mod taylor_ops;

pub use coef::Coef;
pub use desc::{DescError, Descriptor, DescriptorConfig, DESC_MAX_TMP};
pub use num_complex::Complex64;
pub use order_mask::{OrderMask, MAX_ORDER};
pub use pool::{PoolError, Temp, TempPool, Workspace};
pub use series::Series;

/// Type alias for real series.
pub type Tpsa = Series<f64>;
/// Type alias for complex series.
pub type Ctpsa = Series<Complex64>;
