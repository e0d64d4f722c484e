pub use scopeset_types::prelude::*;

pub use crate::value::SettingValue;

// vim: ts=4
