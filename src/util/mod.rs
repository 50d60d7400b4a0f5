pub mod clock;
pub mod telemetry;

pub use clock::{Clock, SystemClock};
pub use telemetry::init_tracing;
