//! Turn canonical exercise data (a loosely-shaped JSON tree of test cases)
//! into a strongly-typed model: inferred function signatures plus a flat
//! list of type-tagged test cases bound to them.
//!
//! Pipeline:
//!
//! ```text
//! raw JSON ─parse─▶ SpecificationDocument ─flatten─▶ leaves
//!     leaves ─infer─▶ signatures
//!     leaves + signatures ─bind─▶ ExerciseModel
//! ```
pub mod value;
pub mod path;
pub mod error;
pub mod document;
pub mod flatten;
pub mod inference;
pub mod ir;
pub mod lower;
pub mod naming;
pub mod pipeline;

pub use document::{parse, Group, SpecificationDocument, Test, TestItem};
pub use error::SpecError;
pub use flatten::flatten;
pub use inference::{infer, ConflictSlot, Inferred, SignatureInference, TypeConflict};
pub use ir::{ExerciseModel, FunctionSignature, TypedTestCase, Warning};
pub use lower::bind;
pub use pipeline::{build_model, process_batch, BatchReport, DocumentOutcome, ModelOutcome};
pub use value::{classify, Kind, Role, TypedValue, ValueError};
