// Strongly-typed model handed to renderers. No serde_json::Value here.
use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use serde::Serialize;

use crate::inference::TypeConflict;
use crate::naming;
use crate::value::{Kind, TypedValue};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FunctionSignature {
    pub name: String,
    pub parameters: IndexMap<String, Kind>,   // first-seen order
    pub return_kind: Kind,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypedTestCase {
    /// The leaf's description, unnormalized.
    pub name: String,
    pub signature: Arc<FunctionSignature>,
    pub arguments: IndexMap<String, TypedValue>,
    pub expected: TypedValue,
    pub comments: Option<Vec<String>>,
    pub optional: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExerciseModel {
    pub slug: String,
    pub signatures: Vec<Arc<FunctionSignature>>,
    pub test_cases: Vec<TypedTestCase>,
}

/// Non-fatal findings that accompany a successful model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Warning {
    TypeConflict(TypeConflict),
    /// Several bound cases share one name. All of them are kept.
    DuplicateTestName { name: String, occurrences: usize },
}

impl TypedTestCase {
    /// Identifier-safe form of `name`, as renderers usually want it.
    pub fn identifier(&self) -> String {
        naming::test_identifier(&self.name)
    }
}

impl ExerciseModel {
    pub fn signature(&self, name: &str) -> Option<&Arc<FunctionSignature>> {
        self.signatures.iter().find(|s| s.name == name)
    }

    /// `reverse-string` → `ReverseString`
    pub fn class_name(&self) -> String {
        naming::class_name(&self.slug)
    }

    pub fn test_class_name(&self) -> String {
        format!("{}Test", self.class_name())
    }
}

impl fmt::Display for FunctionSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.name)?;
        for (i, (name, kind)) in self.parameters.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{name}: {kind}")?;
        }
        write!(f, ") -> {}", self.return_kind)
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::TypeConflict(c) => write!(f, "type conflict in {c}"),
            Warning::DuplicateTestName { name, occurrences } => {
                write!(f, "test name {name:?} used by {occurrences} cases")
            }
        }
    }
}
