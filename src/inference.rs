//! Signature inference over flattened leaves.
//!
//! Leaves are observed one at a time; the first leaf for a function name
//! seeds its parameter order and kinds, later leaves are checked against
//! it. Disagreement never fails: the slot is widened to `Kind::Unknown` and
//! a [`TypeConflict`] is recorded, so inference is total.
//!
//! Only the top-level kind of each value enters a signature; element types
//! of arrays and maps are ignored.
pub mod conflict;

use indexmap::IndexMap;
use indexmap::map::Entry;

use crate::document::Test;
use crate::ir::FunctionSignature;
use crate::value::Kind;

pub use conflict::{ConflictSlot, TypeConflict};

// ------------------------------ State ------------------------------------ //

#[derive(Clone, Debug, Default)]
struct Slot {
    parameters: IndexMap<String, Kind>,
    /// `None` until a leaf with a non-error expected value is seen.
    returns: Option<Kind>,
}

/// Result of one inference run.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Inferred {
    /// One per distinct `property`, in first-seen order.
    pub signatures: Vec<FunctionSignature>,
    pub conflicts: Vec<TypeConflict>,
}

impl Inferred {
    /// Distinct function names that hit at least one conflict, first-seen order.
    pub fn conflicted_functions(&self) -> Vec<&str> {
        conflicted_functions(&self.conflicts)
    }
}

/// Distinct `function` names among `conflicts`, first-seen order.
pub fn conflicted_functions<'a, I>(conflicts: I) -> Vec<&'a str>
where
    I: IntoIterator<Item = &'a TypeConflict>,
{
    let mut out: Vec<&str> = Vec::new();
    for c in conflicts {
        if !out.contains(&c.function.as_str()) {
            out.push(&c.function);
        }
    }
    out
}

// ------------------------------ Observe ---------------------------------- //

#[derive(Debug, Default)]
pub struct SignatureInference {
    slots: IndexMap<String, Slot>,
    conflicts: Vec<TypeConflict>,
}

impl SignatureInference {
    pub fn new() -> Self { Self::default() }

    pub fn observe(&mut self, leaf: &Test) {
        let observed_return = (!leaf.expected.is_error()).then(|| leaf.expected.kind());

        let slot = match self.slots.entry(leaf.property.clone()) {
            Entry::Vacant(v) => {
                v.insert(Slot {
                    parameters: leaf.input.iter().map(|(k, v)| (k.clone(), v.kind())).collect(),
                    returns: observed_return,
                });
                return;
            }
            Entry::Occupied(o) => o.into_mut(),
        };

        let conflicts = &mut self.conflicts;
        let mut conflict = |at: ConflictSlot, previous: Option<Kind>, observed: Option<Kind>| {
            log::warn!("type conflict in `{}`: {at} {previous:?} vs {observed:?}", leaf.property);
            conflicts.push(TypeConflict {
                function: leaf.property.clone(),
                slot: at,
                previous,
                observed,
            });
        };

        // shared and extra parameters
        for (name, value) in &leaf.input {
            let kind = value.kind();
            match slot.parameters.get_mut(name) {
                Some(held) if *held == kind || *held == Kind::Unknown => {}
                Some(held) => {
                    conflict(ConflictSlot::Parameter(name.clone()), Some(*held), Some(kind));
                    *held = Kind::Unknown;
                }
                None => {
                    conflict(ConflictSlot::Parameter(name.clone()), None, Some(kind));
                    slot.parameters.insert(name.clone(), Kind::Unknown);
                }
            }
        }

        // parameters this leaf does not pass
        for (name, held) in slot.parameters.iter_mut() {
            if *held != Kind::Unknown && !leaf.input.contains_key(name) {
                conflict(ConflictSlot::Parameter(name.clone()), Some(*held), None);
                *held = Kind::Unknown;
            }
        }

        // return kind; an error-expected leaf carries no information
        if let Some(kind) = observed_return {
            match slot.returns {
                // Departs from first-seed-wins: a slot seeded by an error leaf
                // would stay Unknown there, here it takes the first concrete kind.
                None => slot.returns = Some(kind),
                Some(held) if held == kind || held == Kind::Unknown => {}
                Some(held) => {
                    conflict(ConflictSlot::Return, Some(held), Some(kind));
                    slot.returns = Some(Kind::Unknown);
                }
            }
        }
    }

    pub fn solve(self) -> Inferred {
        let signatures = self
            .slots
            .into_iter()
            .map(|(name, slot)| FunctionSignature {
                name,
                parameters: slot.parameters,
                return_kind: slot.returns.unwrap_or(Kind::Unknown),
            })
            .collect();
        Inferred { signatures, conflicts: self.conflicts }
    }
}

// ------------------------------- Front API -------------------------------- //

pub fn infer<'a, I>(leaves: I) -> Inferred
where
    I: IntoIterator<Item = &'a Test>,
{
    let mut inf = SignatureInference::new();
    for leaf in leaves {
        inf.observe(leaf);
    }
    inf.solve()
}

// ------------------------------- Tests ------------------------------------ //
