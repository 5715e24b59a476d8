//! Logging facade for the layout and animation paths.
//!
//! With the `tracing` feature these are `tracing`'s own macros, so events
//! carry structured fields such as `gauge = %id` or `radius`. Without it
//! every call compiles away, arguments included.

#[cfg(feature = "tracing")]
pub use tracing::{debug, error, info, warn};

#[doc(hidden)]
#[macro_export]
macro_rules! __svgauge_log_noop {
    ($($arg:tt)*) => {};
}

#[cfg(not(feature = "tracing"))]
pub use crate::{
    __svgauge_log_noop as debug, __svgauge_log_noop as error, __svgauge_log_noop as info,
    __svgauge_log_noop as warn,
};
