use std::fmt;

use serde::Serialize;

use crate::value::Kind;

/// Where in a signature two call sites disagreed.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum ConflictSlot {
    Parameter(String),
    Return,
}

/// One disagreement between call sites of the same function. The slot has
/// been widened to `Kind::Unknown`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TypeConflict {
    pub function: String,
    pub slot: ConflictSlot,
    /// Kind held before this call site; `None` if the parameter was new.
    pub previous: Option<Kind>,
    /// Kind seen at this call site; `None` if the parameter was absent.
    pub observed: Option<Kind>,
}

impl fmt::Display for ConflictSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConflictSlot::Parameter(name) => write!(f, "parameter `{name}`"),
            ConflictSlot::Return => f.write_str("return value"),
        }
    }
}

impl fmt::Display for TypeConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn show(k: Option<Kind>) -> String {
            k.map_or_else(|| "absent".to_string(), |k| k.to_string())
        }
        write!(
            f,
            "`{}`: {} seen as {} and {}, widened to Unknown",
            self.function,
            self.slot,
            show(self.previous),
            show(self.observed),
        )
    }
}
