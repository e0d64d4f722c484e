pub use crate::error::{Error, StResult};
pub use crate::types::{Scope, Timestamp};

pub use tracing::{debug, error, info, warn};

// vim: ts=4
