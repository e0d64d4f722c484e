//! Common types used throughout scopeset.

use serde::{Deserialize, Serialize};

// Timestamp //
//***********//
/// Unix timestamp in seconds
#[derive(
	Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Timestamp(pub i64);

impl std::fmt::Display for Timestamp {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.0)
	}
}

// Scope //
//*******//
/// Storage identity of a group of settings.
///
/// `Global` is stored with both `settingable_id` and `settingable_type` set to NULL.
/// An owner scope always stores both.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Scope {
	Global,
	Owner { id: i64, typ: Box<str> },
}

impl Scope {
	pub fn owner(id: i64, typ: impl Into<Box<str>>) -> Self {
		Scope::Owner { id, typ: typ.into() }
	}

	pub fn is_global(&self) -> bool {
		matches!(self, Scope::Global)
	}

	pub fn settingable_id(&self) -> Option<i64> {
		match self {
			Scope::Global => None,
			Scope::Owner { id, .. } => Some(*id),
		}
	}

	pub fn settingable_type(&self) -> Option<&str> {
		match self {
			Scope::Global => None,
			Scope::Owner { typ, .. } => Some(typ),
		}
	}
}

impl std::fmt::Display for Scope {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Scope::Global => write!(f, "global"),
			Scope::Owner { id, typ } => write!(f, "{}#{}", typ, id),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_scope_columns() {
		let scope = Scope::owner(3, "team");
		assert_eq!(scope.settingable_id(), Some(3));
		assert_eq!(scope.settingable_type(), Some("team"));
		assert_eq!(scope.to_string(), "team#3");
		assert!(Scope::Global.settingable_type().is_none());
	}
}

// vim: ts=4
