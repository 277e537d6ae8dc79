//! Bind flattened leaves to their inferred signatures.
use std::sync::Arc;

use indexmap::IndexMap;

use crate::document::Test;
use crate::ir::{FunctionSignature, TypedTestCase, Warning};

/// One typed case per leaf whose expected value is not the error sentinel,
/// in leaf order. Error-expected leaves are skipped here but have already
/// shaped the signatures.
///
/// Panics if a retained leaf has no signature: every leaf must have been
/// passed through inference first.
pub fn bind(leaves: Vec<Test>, signatures: &[Arc<FunctionSignature>]) -> Vec<TypedTestCase> {
    let by_name: IndexMap<&str, &Arc<FunctionSignature>> =
        signatures.iter().map(|s| (s.name.as_str(), s)).collect();

    leaves
        .into_iter()
        .filter(|leaf| !leaf.expected.is_error())
        .map(|leaf| {
            let signature = by_name
                .get(leaf.property.as_str())
                .map(|s| Arc::clone(s))
                .unwrap_or_else(|| panic!("no signature inferred for `{}`", leaf.property));
            TypedTestCase {
                name: leaf.description,
                signature,
                arguments: leaf.input,
                expected: leaf.expected,
                comments: leaf.comments,
                optional: leaf.optional,
            }
        })
        .collect()
}

/// Names used by more than one case, in first-seen order.
pub fn duplicate_names(cases: &[TypedTestCase]) -> Vec<Warning> {
    let mut counts: IndexMap<&str, usize> = IndexMap::new();
    for case in cases {
        *counts.entry(case.name.as_str()).or_default() += 1;
    }
    counts
        .into_iter()
        .filter(|(_, n)| *n > 1)
        .map(|(name, occurrences)| Warning::DuplicateTestName { name: name.to_string(), occurrences })
        .collect()
}
