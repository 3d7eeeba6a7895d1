//! Token tree nodes

use std::fmt;

use indexmap::IndexMap;

use crate::value::TypedValue;

/// Ordered children of a group, in document order
pub type TokenGroup = IndexMap<String, Token>;

/// One node of a design token tree
#[derive(Clone, Debug, PartialEq)]
pub enum Token {
    /// A typed leaf value
    Value(TypedValue),
    /// Named children; insertion order is significant
    Group(TokenGroup),
    /// Reference to another node, e.g. `{colors.brand.primary}`
    Alias(TokenPath),
    Array(Vec<Token>),
    /// Anything the decoder could not classify
    Unknown,
}

impl Token {
    pub fn as_group(&self) -> Option<&TokenGroup> {
        match self {
            Token::Group(group) => Some(group),
            _ => None,
        }
    }

    pub fn as_value(&self) -> Option<&TypedValue> {
        match self {
            Token::Value(value) => Some(value),
            _ => None,
        }
    }

    /// Short tag used in diagnostics
    pub fn kind(&self) -> &'static str {
        match self {
            Token::Value(value) => value.token_type().as_str(),
            Token::Group(_) => "group",
            Token::Alias(_) => "alias",
            Token::Array(_) => "array",
            Token::Unknown => "unknown",
        }
    }

    /// Follow `path` through nested groups starting at this node.
    pub fn lookup(&self, path: &TokenPath) -> Option<&Token> {
        path.segments().iter().try_fold(self, |node, segment| match node {
            Token::Group(group) => group.get(segment),
            _ => None,
        })
    }
}

impl From<TypedValue> for Token {
    fn from(value: TypedValue) -> Self {
        Token::Value(value)
    }
}

/// Dot-separated location of a token inside the tree
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TokenPath(Vec<String>);

impl TokenPath {
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(segments.into_iter().map(Into::into).collect())
    }

    /// Parse a DTCG reference of the form `{a.b.c}`.
    ///
    /// Returns `None` when the string is not exactly one brace-wrapped reference.
    pub fn parse_reference(input: &str) -> Option<Self> {
        let inner = input.trim().strip_prefix('{')?.strip_suffix('}')?;
        if inner.is_empty() || inner.contains(['{', '}']) {
            return None;
        }
        let segments: Vec<String> = inner.split('.').map(|s| s.trim().to_string()).collect();
        if segments.iter().any(String::is_empty) {
            return None;
        }
        Some(Self(segments))
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// A new path with `segment` appended
    pub fn child(&self, segment: impl Into<String>) -> Self {
        let mut segments = self.0.clone();
        segments.push(segment.into());
        Self(segments)
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for TokenPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}}}", self.0.join("."))
    }
}

/// A sub-value of a composite token: either inline or a reference to be resolved
#[derive(Clone, Debug, PartialEq)]
pub enum CompositeValue<T> {
    Value(T),
    Alias(TokenPath),
}

impl<T> CompositeValue<T> {
    /// The inline value, if already resolved
    pub fn value(&self) -> Option<&T> {
        match self {
            CompositeValue::Value(value) => Some(value),
            CompositeValue::Alias(_) => None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, CompositeValue::Value(_))
    }
}

impl<T> From<T> for CompositeValue<T> {
    fn from(value: T) -> Self {
        CompositeValue::Value(value)
    }
}
