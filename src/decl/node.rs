use crate::foundation::error::{SceneError, SceneResult};
use anyhow::Context as _;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Scalar attribute value as it appears in a declaration document.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum AttrValue {
    /// `true` / `false`.
    Bool(bool),
    /// Any JSON number.
    Number(f64),
    /// Free text. Numeric and boolean text is accepted by the typed accessors.
    Text(String),
}

/// One element of the attribute tree: a tag, its attributes and ordered children.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DeclNode {
    /// Element name.
    pub tag: String,
    /// Attributes by name.
    #[serde(default)]
    pub attrs: BTreeMap<String, AttrValue>,
    /// Child elements in document order.
    #[serde(default)]
    pub children: Vec<DeclNode>,
}

impl DeclNode {
    /// Create an element with no attributes and no children.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attrs: BTreeMap::new(),
            children: Vec::new(),
        }
    }

    /// Builder-style attribute setter.
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        self.attrs.insert(name.into(), value.into());
        self
    }

    /// Builder-style child appender.
    pub fn child(mut self, node: DeclNode) -> Self {
        self.children.push(node);
        self
    }

    /// Whether the attribute is present at all, parseable or not.
    pub fn has(&self, name: &str) -> bool {
        self.attrs.contains_key(name)
    }

    /// Text attribute. Numbers are not coerced.
    pub fn string(&self, name: &str) -> Option<&str> {
        match self.attrs.get(name)? {
            AttrValue::Text(s) => Some(s.as_str()),
            AttrValue::Bool(_) | AttrValue::Number(_) => None,
        }
    }

    /// Floating point attribute. Numeric text is parsed; non-finite values are rejected.
    pub fn float(&self, name: &str) -> Option<f64> {
        let v = match self.attrs.get(name)? {
            AttrValue::Number(n) => *n,
            AttrValue::Text(s) => s.trim().parse::<f64>().ok()?,
            AttrValue::Bool(_) => return None,
        };
        v.is_finite().then_some(v)
    }

    /// Boolean attribute. Accepts `true/false` literals and text, plus `1`/`0`.
    pub fn boolean(&self, name: &str) -> Option<bool> {
        match self.attrs.get(name)? {
            AttrValue::Bool(b) => Some(*b),
            AttrValue::Number(n) if *n == 1.0 => Some(true),
            AttrValue::Number(n) if *n == 0.0 => Some(false),
            AttrValue::Number(_) => None,
            AttrValue::Text(s) => match s.trim() {
                "true" | "1" => Some(true),
                "false" | "0" => Some(false),
                _ => None,
            },
        }
    }

    /// Non-negative integer attribute.
    pub fn usize(&self, name: &str) -> Option<usize> {
        match self.attrs.get(name)? {
            AttrValue::Number(n) => {
                if *n >= 0.0 && n.fract() == 0.0 && *n <= u32::MAX as f64 {
                    Some(*n as usize)
                } else {
                    None
                }
            }
            AttrValue::Text(s) => s.trim().parse::<usize>().ok(),
            AttrValue::Bool(_) => None,
        }
    }

    /// First child with the given tag.
    pub fn find(&self, tag: &str) -> Option<&DeclNode> {
        self.children.iter().find(|c| c.tag == tag)
    }

    /// Index of the first child with the given tag.
    pub fn position(&self, tag: &str) -> Option<usize> {
        self.children.iter().position(|c| c.tag == tag)
    }

    /// All children with the given tag, in document order.
    pub fn children_named<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a DeclNode> + 'a {
        self.children.iter().filter(move |c| c.tag == tag)
    }
}

impl From<&str> for AttrValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_owned())
    }
}

impl From<String> for AttrValue {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<f64> for AttrValue {
    fn from(v: f64) -> Self {
        Self::Number(v)
    }
}

impl From<i32> for AttrValue {
    fn from(v: i32) -> Self {
        Self::Number(f64::from(v))
    }
}

impl From<bool> for AttrValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

/// A parsed declaration document.
///
/// This is the JSON-facing boundary object. Building it only checks the document shape; the
/// scene rules are enforced by [`crate::SceneGraph::build`].
#[derive(Debug, Clone, PartialEq)]
pub struct Declaration {
    root: DeclNode,
}

impl Declaration {
    /// Wrap an already constructed attribute tree.
    pub fn new(root: DeclNode) -> Self {
        Self { root }
    }

    /// Parse a declaration from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> SceneResult<Self> {
        let root: DeclNode = serde_json::from_reader(r)
            .map_err(|e| SceneError::serde(format!("parse declaration JSON: {e}")))?;
        Ok(Self { root })
    }

    /// Parse a declaration from a JSON string.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> SceneResult<Self> {
        let root: DeclNode = serde_json::from_str(s)
            .map_err(|e| SceneError::serde(format!("parse declaration JSON: {e}")))?;
        Ok(Self { root })
    }

    /// Parse a declaration from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> SceneResult<Self> {
        let path = path.as_ref();
        let f = File::open(path)
            .with_context(|| format!("open declaration JSON '{}'", path.display()))?;
        Self::from_reader(BufReader::new(f))
    }

    /// Root element (expected to be `yas`).
    pub fn root(&self) -> &DeclNode {
        &self.root
    }
}

#[cfg(test)]
#[path = "../../tests/unit/decl/node.rs"]
mod tests;
