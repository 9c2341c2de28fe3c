mod forward;
mod gather;
mod parameters;
mod stepper;

pub use forward::*;
pub use gather::*;
pub use parameters::*;
pub use stepper::*;
