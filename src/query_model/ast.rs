use serde::{Deserialize, Serialize};
use std::fmt;

use super::errors::QueryModelError;

/// Prefix marking a variable in the textual node form (`?title`).
pub const VARIABLE_PREFIX: char = '?';

/// A slot of a triple pattern or filter.
///
/// Constants carry the stored lexical form of an RDF term, already serialized
/// the way the triple tables hold it (`<http://x/y>`, `"Title"@en`, ...).
/// The compiler never interprets them beyond quoting.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Node {
    Variable(String),
    Constant(String),
}

impl Node {
    pub fn variable(name: impl Into<String>) -> Self {
        Node::Variable(name.into())
    }

    pub fn constant(value: impl Into<String>) -> Self {
        Node::Constant(value.into())
    }

    /// Parse the textual node form: `?name` is a variable, anything else a constant.
    pub fn parse(text: &str) -> Result<Self, QueryModelError> {
        let trimmed = text.trim();
        if let Some(name) = trimmed.strip_prefix(VARIABLE_PREFIX) {
            if name.is_empty() {
                return Err(QueryModelError::invalid_node(text, "variable name is empty"));
            }
            if name.chars().any(char::is_whitespace) {
                return Err(QueryModelError::invalid_node(
                    text,
                    "variable names cannot contain whitespace",
                ));
            }
            Ok(Node::Variable(name.to_string()))
        } else if trimmed.is_empty() {
            Err(QueryModelError::invalid_node(text, "constant is empty"))
        } else {
            Ok(Node::Constant(trimmed.to_string()))
        }
    }

    /// Variable name, if this node is a variable
    pub fn var_name(&self) -> Option<&str> {
        match self {
            Node::Variable(name) => Some(name),
            Node::Constant(_) => None,
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Variable(name) => write!(f, "{}{}", VARIABLE_PREFIX, name),
            Node::Constant(value) => write!(f, "{}", value),
        }
    }
}

impl TryFrom<String> for Node {
    type Error = QueryModelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Node::parse(&value)
    }
}

impl From<Node> for String {
    fn from(node: Node) -> Self {
        node.to_string()
    }
}

/// Subject / predicate / object template. Serialized as a 3-element array.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "(Node, Node, Node)", into = "(Node, Node, Node)")]
pub struct TriplePattern {
    pub subject: Node,
    pub predicate: Node,
    pub object: Node,
}

impl TriplePattern {
    pub fn new(subject: Node, predicate: Node, object: Node) -> Self {
        Self {
            subject,
            predicate,
            object,
        }
    }

    /// Variables in subject and object position (predicates are never joined on)
    pub fn join_variables(&self) -> impl Iterator<Item = &str> {
        [&self.subject, &self.object]
            .into_iter()
            .filter_map(|node| node.var_name())
    }
}

impl From<(Node, Node, Node)> for TriplePattern {
    fn from((subject, predicate, object): (Node, Node, Node)) -> Self {
        TriplePattern::new(subject, predicate, object)
    }
}

impl From<TriplePattern> for (Node, Node, Node) {
    fn from(t: TriplePattern) -> Self {
        (t.subject, t.predicate, t.object)
    }
}

impl fmt::Display for TriplePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.subject, self.predicate, self.object)
    }
}

/// A binary comparison `node <operator> constraint`.
///
/// Either side may be a variable; at least one has to be.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "(Node, String, Node)", into = "(Node, String, Node)")]
pub struct NodeFilter {
    pub node: Node,
    pub operator: String,
    pub constraint: Node,
}

impl NodeFilter {
    pub fn new(node: Node, operator: impl Into<String>, constraint: Node) -> Self {
        Self {
            node,
            operator: operator.into(),
            constraint,
        }
    }

    /// Distinct variable names referenced by either side
    pub fn variables(&self) -> Vec<&str> {
        let mut vars: Vec<&str> = [&self.node, &self.constraint]
            .into_iter()
            .filter_map(|n| n.var_name())
            .collect();
        vars.dedup();
        vars
    }
}

impl From<(Node, String, Node)> for NodeFilter {
    fn from((node, operator, constraint): (Node, String, Node)) -> Self {
        NodeFilter::new(node, operator, constraint)
    }
}

impl From<NodeFilter> for (Node, String, Node) {
    fn from(f: NodeFilter) -> Self {
        (f.node, f.operator, f.constraint)
    }
}

impl fmt::Display for NodeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.node, self.operator, self.constraint)
    }
}

/// Connected triple patterns plus the filters scoped to them
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GraphPattern {
    pub triples: Vec<TriplePattern>,
    #[serde(default)]
    pub filters: Vec<NodeFilter>,
}

impl GraphPattern {
    pub fn new(triples: Vec<TriplePattern>) -> Self {
        Self {
            triples,
            filters: Vec::new(),
        }
    }

    pub fn with_filter(mut self, filter: NodeFilter) -> Self {
        self.filters.push(filter);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryElement {
    GraphPattern(GraphPattern),
    /// Nested query. Modelled so it can be rejected with a clear error.
    GraphQuery(Box<GraphQuery>),
}

impl QueryElement {
    pub fn kind(&self) -> &'static str {
        match self {
            QueryElement::GraphPattern(_) => "graph pattern",
            QueryElement::GraphQuery(_) => "nested graph query",
        }
    }
}

impl From<GraphPattern> for QueryElement {
    fn from(pattern: GraphPattern) -> Self {
        QueryElement::GraphPattern(pattern)
    }
}

/// Which list an element belongs to; decides inner vs left outer join
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementRole {
    Required,
    Optional,
}

impl fmt::Display for ElementRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElementRole::Required => write!(f, "required"),
            ElementRole::Optional => write!(f, "optional"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GraphQuery {
    #[serde(default)]
    pub required: Vec<QueryElement>,
    #[serde(default)]
    pub optional: Vec<QueryElement>,
}

impl GraphQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn require(mut self, element: impl Into<QueryElement>) -> Self {
        self.required.push(element.into());
        self
    }

    pub fn optionally(mut self, element: impl Into<QueryElement>) -> Self {
        self.optional.push(element.into());
        self
    }
}
