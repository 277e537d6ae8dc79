//! Depth-first, left-to-right flattening of the test tree into leaves.
//!
//! Group metadata (description, comments, optional) is dropped; only the
//! leaves' own metadata survives.
use crate::document::{Test, TestItem};

pub fn flatten(cases: Vec<TestItem>) -> Vec<Test> {
    let mut out = Vec::new();
    flatten_into(cases, &mut out);
    out
}

fn flatten_into(cases: Vec<TestItem>, out: &mut Vec<Test>) {
    for item in cases {
        match item {
            TestItem::Test(test) => out.push(test),
            TestItem::Group(group) => flatten_into(group.cases, out),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Group;
    use crate::value::TypedValue;
    use indexmap::IndexMap;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn leaf(description: &str) -> TestItem {
        TestItem::Test(Test {
            description: description.to_string(),
            property: "p".to_string(),
            input: IndexMap::new(),
            expected: TypedValue::Null,
            comments: None,
            optional: None,
        })
    }

    fn group(description: &str, cases: Vec<TestItem>) -> TestItem {
        TestItem::Group(Group {
            description: description.to_string(),
            cases,
            comments: Some(vec!["dropped".to_string()]),
            optional: Some("dropped".to_string()),
        })
    }

    fn names(leaves: &[Test]) -> Vec<&str> {
        leaves.iter().map(|t| t.description.as_str()).collect()
    }

    #[test]
    fn splices_groups_in_place() {
        let tree = vec![
            leaf("a"),
            group("g1", vec![leaf("b"), group("g2", vec![leaf("c"), leaf("d")]), leaf("e")]),
            group("empty", vec![]),
            leaf("f"),
        ];
        let leaves = flatten(tree);
        assert_eq!(names(&leaves), ["a", "b", "c", "d", "e", "f"]);
    }

    #[test]
    fn already_flat_input_is_unchanged() {
        let flat = flatten(vec![group("g", vec![leaf("a"), leaf("b")]), leaf("c")]);
        let again = flatten(flat.iter().cloned().map(TestItem::Test).collect());
        assert_eq!(again, flat);
    }

    // Pre-order trace assigning "0", "1", ... to leaves as they are generated.
    fn arb_tree() -> impl Strategy<Value = Vec<TestItem>> {
        let leaf_strategy = Just(()).prop_map(|_| leaf(""));
        let item = leaf_strategy.prop_recursive(4, 64, 6, |inner| {
            prop::collection::vec(inner, 0..6).prop_map(|cases| group("g", cases))
        });
        prop::collection::vec(item, 0..8).prop_map(|mut items| {
            let mut next = 0usize;
            number_leaves(&mut items, &mut next);
            items
        })
    }

    fn number_leaves(items: &mut [TestItem], next: &mut usize) {
        for item in items {
            match item {
                TestItem::Test(t) => {
                    t.description = next.to_string();
                    *next += 1;
                }
                TestItem::Group(g) => number_leaves(&mut g.cases, next),
            }
        }
    }

    proptest! {
        /// Property: leaf count and pre-order are preserved.
        #[test]
        fn preserves_count_and_order(tree in arb_tree()) {
            let expected_count: usize = tree.iter().map(TestItem::leaf_count).sum();
            let leaves = flatten(tree);
            prop_assert_eq!(leaves.len(), expected_count);
            for (i, t) in leaves.iter().enumerate() {
                prop_assert_eq!(&t.description, &i.to_string());
            }
        }

        /// Property: pure function - same input always produces same output.
        #[test]
        fn deterministic(tree in arb_tree()) {
            prop_assert_eq!(flatten(tree.clone()), flatten(tree));
        }
    }
}
