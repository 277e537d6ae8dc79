//! Specification tree: the raw canonical-data document parsed into
//! `Group`/`Test` items with every leaf value classified.
use indexmap::IndexMap;
use serde_json::{Map, Value};

use crate::error::{SpecError, UNNAMED_DOCUMENT};
use crate::path::JsonPath;
use crate::value::{classify, shape_of, Role, TypedValue};

// ------------------------------- Types ----------------------------------- //

#[derive(Debug, Clone, PartialEq)]
pub struct SpecificationDocument {
    pub version: String,
    pub exercise: String,
    pub cases: Vec<TestItem>,
    pub comments: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TestItem {
    Test(Test),
    Group(Group),
}

/// One concrete example call.
#[derive(Debug, Clone, PartialEq)]
pub struct Test {
    pub description: String,
    pub property: String,
    pub input: IndexMap<String, TypedValue>,
    pub expected: TypedValue,
    pub comments: Option<Vec<String>>,
    /// Opaque marker, interpreted by renderers only.
    pub optional: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    pub description: String,
    pub cases: Vec<TestItem>,
    pub comments: Option<Vec<String>>,
    pub optional: Option<String>,
}

impl TestItem {
    /// Number of `Test` leaves at or below this item.
    pub fn leaf_count(&self) -> usize {
        match self {
            TestItem::Test(_) => 1,
            TestItem::Group(g) => g.cases.iter().map(TestItem::leaf_count).sum(),
        }
    }
}

impl SpecificationDocument {
    pub fn leaf_count(&self) -> usize {
        self.cases.iter().map(TestItem::leaf_count).sum()
    }
}

// ------------------------------- Parse ----------------------------------- //

/// Parse one already-deserialized document. Pure; no I/O.
pub fn parse(raw: &Value) -> Result<SpecificationDocument, SpecError> {
    let root = JsonPath::root();
    let Value::Object(top) = raw else {
        return Err(SpecError::malformed(
            UNNAMED_DOCUMENT,
            &root,
            format!("expected an object at the top level, found {}", shape_of(raw)),
        ));
    };

    // Name the document as early as possible so later errors can cite it.
    let name = top.get("exercise").and_then(Value::as_str).unwrap_or(UNNAMED_DOCUMENT);
    let parser = Parser { document: name };

    let version = parser.required_str(top, "version", &root)?;
    let exercise = parser.required_str(top, "exercise", &root)?;
    let cases = parser.required_array(top, "cases", &root)?;
    let comments = parser.comments(top, &root)?;

    log::debug!("parsing `{exercise}` (version {version}, {} top-level items)", cases.len());

    let cases = parser.items(cases, &root.key("cases"))?;
    Ok(SpecificationDocument { version, exercise, cases, comments })
}

struct Parser<'a> {
    document: &'a str,
}

impl Parser<'_> {
    fn items(&self, raw: &[Value], path: &JsonPath) -> Result<Vec<TestItem>, SpecError> {
        raw.iter()
            .enumerate()
            .map(|(i, item)| self.item(item, &path.index(i)))
            .collect()
    }

    fn item(&self, raw: &Value, path: &JsonPath) -> Result<TestItem, SpecError> {
        let Value::Object(obj) = raw else {
            return Err(self.malformed(path, format!("expected a test item object, found {}", shape_of(raw))));
        };
        // A present, non-null `cases` key makes this a group.
        let is_group = obj.get("cases").is_some_and(|c| !c.is_null());
        if is_group {
            self.group(obj, path).map(TestItem::Group)
        } else {
            self.test(obj, path).map(TestItem::Test)
        }
    }

    fn group(&self, obj: &Map<String, Value>, path: &JsonPath) -> Result<Group, SpecError> {
        let cases = self.required_array(obj, "cases", path)?;
        Ok(Group {
            description: self.required_str(obj, "description", path)?,
            cases: self.items(cases, &path.key("cases"))?,
            comments: self.comments(obj, path)?,
            optional: self.optional_str(obj, "optional", path)?,
        })
    }

    fn test(&self, obj: &Map<String, Value>, path: &JsonPath) -> Result<Test, SpecError> {
        let description = self.required_str(obj, "description", path)?;
        let property = self.required_str(obj, "property", path)?;

        let input_path = path.key("input");
        let raw_input = match obj.get("input") {
            Some(Value::Object(m)) => m,
            Some(other) => {
                return Err(self.malformed(&input_path, format!("expected an object, found {}", shape_of(other))));
            }
            None => return Err(self.malformed(path, "missing required key `input`")),
        };
        let mut input = IndexMap::with_capacity(raw_input.len());
        for (name, value) in raw_input {
            let typed = classify(value, Role::Input, &input_path.key(name.as_str()))
                .map_err(|e| SpecError::from_value_error(self.document, e))?;
            input.insert(name.clone(), typed);
        }

        let raw_expected = obj
            .get("expected")
            .ok_or_else(|| self.malformed(path, "missing required key `expected`"))?;
        let expected = classify(raw_expected, Role::Expected, &path.key("expected"))
            .map_err(|e| SpecError::from_value_error(self.document, e))?;

        Ok(Test {
            description,
            property,
            input,
            expected,
            comments: self.comments(obj, path)?,
            optional: self.optional_str(obj, "optional", path)?,
        })
    }

    // ----------------------------- helpers ------------------------------- //

    fn malformed(&self, path: &JsonPath, reason: impl Into<String>) -> SpecError {
        SpecError::malformed(self.document, path, reason)
    }

    fn required_str(&self, obj: &Map<String, Value>, key: &str, path: &JsonPath) -> Result<String, SpecError> {
        match obj.get(key) {
            Some(Value::String(s)) => Ok(s.clone()),
            Some(other) => Err(self.malformed(
                &path.key(key),
                format!("expected a string, found {}", shape_of(other)),
            )),
            None => Err(self.malformed(path, format!("missing required key `{key}`"))),
        }
    }

    fn optional_str(&self, obj: &Map<String, Value>, key: &str, path: &JsonPath) -> Result<Option<String>, SpecError> {
        match obj.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.clone())),
            Some(other) => Err(self.malformed(
                &path.key(key),
                format!("expected a string, found {}", shape_of(other)),
            )),
        }
    }

    fn required_array<'v>(&self, obj: &'v Map<String, Value>, key: &str, path: &JsonPath) -> Result<&'v [Value], SpecError> {
        match obj.get(key) {
            Some(Value::Array(xs)) => Ok(xs),
            Some(other) => Err(self.malformed(
                &path.key(key),
                format!("expected an array, found {}", shape_of(other)),
            )),
            None => Err(self.malformed(path, format!("missing required key `{key}`"))),
        }
    }

    fn comments(&self, obj: &Map<String, Value>, path: &JsonPath) -> Result<Option<Vec<String>>, SpecError> {
        let path = path.key("comments");
        let xs = match obj.get("comments") {
            None | Some(Value::Null) => return Ok(None),
            Some(Value::Array(xs)) => xs,
            Some(other) => {
                return Err(self.malformed(&path, format!("expected a list of strings, found {}", shape_of(other))));
            }
        };
        xs.iter()
            .enumerate()
            .map(|(i, x)| match x {
                Value::String(s) => Ok(s.clone()),
                other => Err(self.malformed(&path.index(i), format!("expected a string, found {}", shape_of(other)))),
            })
            .collect::<Result<Vec<_>, SpecError>>()
            .map(Some)
    }
}

// ------------------------------- Tests ------------------------------------ //
