//! End-to-end: raw document → `ExerciseModel` (+ warnings).
//!
//! Every stage is a pure function of its input, so independent documents
//! are processed in parallel without shared state.
use std::sync::Arc;

use rayon::prelude::*;
use serde_json::Value;

use crate::document::parse;
use crate::error::SpecError;
use crate::flatten::flatten;
use crate::inference::{conflicted_functions, infer};
use crate::ir::{ExerciseModel, Warning};
use crate::lower::{bind, duplicate_names};

#[derive(Debug, Clone, PartialEq)]
pub struct ModelOutcome {
    pub model: ExerciseModel,
    pub warnings: Vec<Warning>,
}

impl ModelOutcome {
    /// Distinct function names whose signature had to be widened.
    pub fn conflicted_functions(&self) -> Vec<&str> {
        conflicted_functions(self.warnings.iter().filter_map(|w| match w {
            Warning::TypeConflict(c) => Some(c),
            _ => None,
        }))
    }
}

pub fn build_model(raw: &Value) -> Result<ModelOutcome, SpecError> {
    let document = parse(raw)?;
    let slug = document.exercise;

    let leaves = flatten(document.cases);
    let inferred = infer(&leaves);
    log::debug!(
        "`{slug}`: {} leaves, {} signatures, {} conflicts",
        leaves.len(),
        inferred.signatures.len(),
        inferred.conflicts.len(),
    );

    let signatures: Vec<_> = inferred.signatures.into_iter().map(Arc::new).collect();
    let test_cases = bind(leaves, &signatures);

    let mut warnings: Vec<Warning> = inferred.conflicts.into_iter().map(Warning::TypeConflict).collect();
    warnings.extend(duplicate_names(&test_cases));

    Ok(ModelOutcome {
        model: ExerciseModel { slug, signatures, test_cases },
        warnings,
    })
}

// ------------------------------- Batch ------------------------------------ //

#[derive(Debug)]
pub struct DocumentOutcome {
    /// Caller-chosen label, usually the file path.
    pub source: String,
    pub result: Result<ModelOutcome, SpecError>,
}

/// Per-document results of a batch, in input order.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub outcomes: Vec<DocumentOutcome>,
}

impl BatchReport {
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_ok()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }

    pub fn warning_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().ok())
            .map(|m| m.warnings.len())
            .sum()
    }

    pub fn errors(&self) -> impl Iterator<Item = (&str, &SpecError)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().err().map(|e| (o.source.as_str(), e)))
    }
}

pub fn process_batch(documents: Vec<(String, Value)>) -> BatchReport {
    let outcomes = documents
        .into_par_iter()
        .map(|(source, raw)| {
            let result = build_model(&raw);
            DocumentOutcome { source, result }
        })
        .collect();
    BatchReport { outcomes }
}

// ------------------------------- Tests ------------------------------------ //
