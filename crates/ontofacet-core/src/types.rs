//! Core types for ontofacet-core.
//!
//! This module defines the data shared by every layer: the four
//! [`FacetCategory`] values with their closure rules, the Boolean
//! [`Operation`], per-group queries, the [`SearchRequest`] surface, and the
//! read-only [`Term`] / [`Record`] graph entities.

use crate::error::RequestError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ---------------------------------------------------------------------------
// Graph relations and closure rules
// ---------------------------------------------------------------------------

/// Edge type between graph nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Relation {
    /// Hierarchy edge followed by closure rules.
    Child,
    /// Reverse of `Child`. Derived when a graph is built.
    Parent,
    /// Term to a record that references it.
    Links,
}

impl Relation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Relation::Child => "child",
            Relation::Parent => "parent",
            Relation::Links => "links",
        }
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How many times a [`Hop`] may follow its relation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Repeat {
    /// Exactly one edge.
    Once,
    /// Zero or more edges (reflexive transitive closure).
    Closure,
}

/// One outgoing step of a closure rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Hop {
    pub relation: Relation,
    pub repeat: Repeat,
}

impl Hop {
    pub const fn once(relation: Relation) -> Self {
        Self { relation, repeat: Repeat::Once }
    }

    pub const fn closure(relation: Relation) -> Self {
        Self { relation, repeat: Repeat::Closure }
    }
}

impl fmt::Display for Hop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.repeat {
            Repeat::Once => write!(f, "{}>", self.relation),
            Repeat::Closure => write!(f, "{}>*", self.relation),
        }
    }
}

/// Ordered relation filter a traversal follows from its seed terms.
///
/// Rendered as `child>*|links>`: hops separated by `|`, `*` marking a
/// transitive hop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClosureRule {
    hops: &'static [Hop],
}

impl ClosureRule {
    /// Descend the term hierarchy, then cross to linked records.
    pub const HIERARCHY: ClosureRule = ClosureRule {
        hops: &[Hop::closure(Relation::Child), Hop::once(Relation::Links)],
    };

    /// Cross to linked records directly, ignoring the hierarchy.
    pub const DIRECT: ClosureRule = ClosureRule {
        hops: &[Hop::once(Relation::Links)],
    };

    pub const fn new(hops: &'static [Hop]) -> Self {
        Self { hops }
    }

    pub fn hops(&self) -> &'static [Hop] {
        self.hops
    }

    /// True if any hop follows `relation`.
    pub fn follows(&self, relation: Relation) -> bool {
        self.hops.iter().any(|h| h.relation == relation)
    }
}

impl fmt::Display for ClosureRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, hop) in self.hops.iter().enumerate() {
            if i > 0 {
                f.write_str("|")?;
            }
            write!(f, "{hop}")?;
        }
        Ok(())
    }
}

/// Node label a traversal is allowed to return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetLabel {
    Record,
}

impl fmt::Display for TargetLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetLabel::Record => write!(f, "Experiment"),
        }
    }
}

// ---------------------------------------------------------------------------
// Facet categories
// ---------------------------------------------------------------------------

/// A controlled-vocabulary filter dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FacetCategory {
    #[serde(alias = "celltype")]
    CellTypes,
    #[serde(alias = "disease")]
    Diseases,
    #[serde(alias = "tissue")]
    Tissues,
    #[serde(alias = "organisms")]
    Organism,
}

struct CategoryInfo {
    name: &'static str,
    record_relation: &'static str,
    rule: ClosureRule,
    vocabularies: &'static [&'static str],
}

static CATEGORY_TABLE: [CategoryInfo; 4] = [
    CategoryInfo {
        name: "celltypes",
        record_relation: "celltype",
        rule: ClosureRule::HIERARCHY,
        vocabularies: &["Cell Ontology"],
    },
    CategoryInfo {
        name: "diseases",
        record_relation: "disease",
        rule: ClosureRule::HIERARCHY,
        vocabularies: &["Human Disease Ontology", "Mondo Disease Ontology"],
    },
    CategoryInfo {
        name: "tissues",
        record_relation: "tissue",
        rule: ClosureRule::HIERARCHY,
        vocabularies: &["UBERON"],
    },
    // The organism vocabulary has no useful sub-hierarchy for matching.
    CategoryInfo {
        name: "organism",
        record_relation: "organism",
        rule: ClosureRule::DIRECT,
        vocabularies: &["Experimental Factor Ontology"],
    },
];

static CATEGORY_NAMES: phf::Map<&'static str, FacetCategory> = phf::phf_map! {
    "celltypes" => FacetCategory::CellTypes,
    "celltype" => FacetCategory::CellTypes,
    "cell_types" => FacetCategory::CellTypes,
    "diseases" => FacetCategory::Diseases,
    "disease" => FacetCategory::Diseases,
    "tissues" => FacetCategory::Tissues,
    "tissue" => FacetCategory::Tissues,
    "organism" => FacetCategory::Organism,
    "organisms" => FacetCategory::Organism,
};

impl FacetCategory {
    /// Fixed order in which category results are intersected.
    pub const ALL: [FacetCategory; 4] = [
        FacetCategory::CellTypes,
        FacetCategory::Diseases,
        FacetCategory::Tissues,
        FacetCategory::Organism,
    ];

    fn info(&self) -> &'static CategoryInfo {
        &CATEGORY_TABLE[*self as usize]
    }

    /// Request-level name (`celltypes`, `diseases`, `tissues`, `organism`).
    pub fn as_str(&self) -> &'static str {
        self.info().name
    }

    /// Relation type a record uses to reference terms of this category.
    pub fn record_relation(&self) -> &'static str {
        self.info().record_relation
    }

    pub fn closure_rule(&self) -> ClosureRule {
        self.info().rule
    }

    /// Source vocabularies whose terms are offered for this category.
    pub fn default_vocabularies(&self) -> &'static [&'static str] {
        self.info().vocabularies
    }
}

impl fmt::Display for FacetCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FacetCategory {
    type Err = RequestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CATEGORY_NAMES
            .get(s.trim().to_ascii_lowercase().as_str())
            .copied()
            .ok_or_else(|| RequestError::UnknownCategory(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Operations
// ---------------------------------------------------------------------------

/// How the per-input results inside one group are merged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Operation {
    And,
    #[default]
    Or,
}

impl Operation {
    /// Parse an operation token for `group`, naming the group on failure.
    pub fn parse(group: &str, token: &str) -> Result<Self, RequestError> {
        match token.trim().to_ascii_uppercase().as_str() {
            "AND" => Ok(Operation::And),
            "OR" => Ok(Operation::Or),
            _ => Err(RequestError::InvalidOperation {
                group: group.to_string(),
                token: token.to_string(),
            }),
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::And => write!(f, "AND"),
            Operation::Or => write!(f, "OR"),
        }
    }
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Raw inputs and operation for one facet category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FacetQuery {
    pub category: FacetCategory,
    /// Term ids or name fragments, in request order.
    pub inputs: Vec<String>,
    pub operation: Operation,
}

impl FacetQuery {
    pub fn new<I, S>(category: FacetCategory, inputs: I, operation: Operation) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            category,
            inputs: inputs.into_iter().map(Into::into).collect(),
            operation,
        }
    }

    /// A category the caller did not filter on.
    pub fn unrequested(category: FacetCategory) -> Self {
        Self { category, inputs: Vec::new(), operation: Operation::Or }
    }

    pub fn is_requested(&self) -> bool {
        !self.inputs.is_empty()
    }
}

/// Free-text terms and their operation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TextQuery {
    pub terms: Vec<String>,
    pub operation: Operation,
}

impl TextQuery {
    pub fn new<I, S>(terms: I, operation: Operation) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            terms: terms.into_iter().map(Into::into).collect(),
            operation,
        }
    }

    pub fn is_requested(&self) -> bool {
        !self.terms.is_empty()
    }
}

/// A complete filter request: one query per facet category plus free text.
///
/// Deserializes from the flat request shape
/// `{"celltypes": [...], "celltype_operation": "AND", "query": [...], ...}`;
/// a bad operation token is rejected with the offending group named.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawSearchRequest")]
pub struct SearchRequest {
    facets: [FacetQuery; 4],
    pub text: TextQuery,
}

impl Default for SearchRequest {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchRequest {
    /// A request with every group unrequested.
    pub fn new() -> Self {
        Self {
            facets: FacetCategory::ALL.map(FacetQuery::unrequested),
            text: TextQuery::default(),
        }
    }

    /// Replace the query for `category`.
    pub fn facet<I, S>(mut self, category: FacetCategory, inputs: I, operation: Operation) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.facets[category as usize] = FacetQuery::new(category, inputs, operation);
        self
    }

    /// Replace the free-text query.
    pub fn text<I, S>(mut self, terms: I, operation: Operation) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.text = TextQuery::new(terms, operation);
        self
    }

    pub fn facet_query(&self, category: FacetCategory) -> &FacetQuery {
        &self.facets[category as usize]
    }

    /// Facet queries in combination order.
    pub fn facets(&self) -> impl Iterator<Item = &FacetQuery> {
        self.facets.iter()
    }

    /// True if no facet and no text term was supplied.
    pub fn is_unconstrained(&self) -> bool {
        !self.text.is_requested() && self.facets.iter().all(|f| !f.is_requested())
    }
}

/// Wire shape of [`SearchRequest`], with operations still as raw tokens.
///
/// Operation keys are accepted in snake case and in the camel case used by
/// GraphQL clients. Any other key is rejected so a misspelt operation
/// cannot silently fall back to the default.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RawSearchRequest {
    celltypes: Option<Vec<String>>,
    #[serde(alias = "cellTypeOperation")]
    celltype_operation: Option<String>,
    diseases: Option<Vec<String>>,
    #[serde(alias = "diseaseOperation")]
    disease_operation: Option<String>,
    tissues: Option<Vec<String>>,
    #[serde(alias = "tissueOperation")]
    tissue_operation: Option<String>,
    organisms: Option<Vec<String>>,
    #[serde(alias = "organismOperation")]
    organism_operation: Option<String>,
    query: Option<Vec<String>>,
    #[serde(alias = "queryOperation")]
    query_operation: Option<String>,
}

impl RawSearchRequest {
    /// Build the request, using `default` for every group that names no
    /// operation.
    fn into_request(self, default: Operation) -> Result<SearchRequest, RequestError> {
        let parse_op = |group: &str, token: Option<String>| {
            token.map_or(Ok(default), |t| Operation::parse(group, &t))
        };
        let pairs = [
            (FacetCategory::CellTypes, self.celltypes, self.celltype_operation),
            (FacetCategory::Diseases, self.diseases, self.disease_operation),
            (FacetCategory::Tissues, self.tissues, self.tissue_operation),
            (FacetCategory::Organism, self.organisms, self.organism_operation),
        ];

        let mut request = SearchRequest::new();
        for (category, inputs, op) in pairs {
            let op = parse_op(category.as_str(), op)?;
            request = request.facet(category, inputs.unwrap_or_default(), op);
        }
        let op = parse_op("query", self.query_operation)?;
        Ok(request.text(self.query.unwrap_or_default(), op))
    }
}

impl TryFrom<RawSearchRequest> for SearchRequest {
    type Error = RequestError;

    fn try_from(raw: RawSearchRequest) -> Result<Self, Self::Error> {
        raw.into_request(Operation::default())
    }
}

impl SearchRequest {
    /// Decode a flat JSON request, filling in `default` wherever a group
    /// names no operation. Plain `Deserialize` uses OR.
    pub fn from_json(json: &[u8], default: Operation) -> Result<Self, serde_json::Error> {
        let raw: RawSearchRequest = serde_json::from_slice(json)?;
        raw.into_request(default).map_err(serde::de::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// Free-text patterns
// ---------------------------------------------------------------------------

/// How a [`TextPattern`] needle is compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PatternKind {
    /// Quoted input: literal, space-padded, not lower-cased.
    Phrase,
    /// Unquoted input: lower-cased substring.
    Substring,
}

/// A normalised free-text term ready to match against record fields.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TextPattern {
    pub needle: String,
    pub kind: PatternKind,
}

impl TextPattern {
    /// Normalise a raw term.
    ///
    /// A term wrapped in a matching pair of `"` or `'` becomes a phrase
    /// (`"liver"` → `" liver "`); anything else is lower-cased.
    pub fn parse(raw: &str) -> Self {
        let quoted = raw.len() >= 2
            && (raw.starts_with('"') && raw.ends_with('"')
                || raw.starts_with('\'') && raw.ends_with('\''));

        if quoted {
            Self {
                needle: format!(" {} ", &raw[1..raw.len() - 1]),
                kind: PatternKind::Phrase,
            }
        } else {
            Self {
                needle: raw.to_lowercase(),
                kind: PatternKind::Substring,
            }
        }
    }

    /// Match against one field. Fields are lower-cased before comparison;
    /// the needle is compared as-is.
    pub fn matches(&self, field: &str) -> bool {
        field.to_lowercase().contains(&self.needle)
    }
}

// ---------------------------------------------------------------------------
// Graph entities
// ---------------------------------------------------------------------------

/// A controlled-vocabulary term.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Term {
    pub id: String,
    #[serde(default)]
    pub name: String,
    /// Source vocabulary, e.g. `Cell Ontology`.
    #[serde(default)]
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub definition: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub synonyms: Vec<String>,
    /// Targets of outgoing `child` edges.
    #[serde(default)]
    pub child: Vec<String>,
    /// Targets of outgoing `parent` edges. Filled in as the reverse of
    /// `child` when a graph is built.
    #[serde(default)]
    pub parent: Vec<String>,
    /// Records this term links to directly.
    #[serde(default)]
    pub links: Vec<String>,
}

impl Term {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            source: String::new(),
            definition: None,
            synonyms: Vec::new(),
            child: Vec::new(),
            parent: Vec::new(),
            links: Vec::new(),
        }
    }
}

/// An experiment record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub keywords: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number_of_cells: Option<u64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub technology: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dataset: Option<String>,
    #[serde(default)]
    pub celltypes: Vec<String>,
    #[serde(default)]
    pub diseases: Vec<String>,
    #[serde(default)]
    pub tissues: Vec<String>,
    #[serde(default)]
    pub organism: Vec<String>,
}

impl Record {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            name: String::new(),
            description: String::new(),
            keywords: String::new(),
            number_of_cells: None,
            technology: Vec::new(),
            dataset: None,
            celltypes: Vec::new(),
            diseases: Vec::new(),
            tissues: Vec::new(),
            organism: Vec::new(),
        }
    }

    /// Term ids this record references through `category`'s relation.
    pub fn links(&self, category: FacetCategory) -> &[String] {
        match category {
            FacetCategory::CellTypes => &self.celltypes,
            FacetCategory::Diseases => &self.diseases,
            FacetCategory::Tissues => &self.tissues,
            FacetCategory::Organism => &self.organism,
        }
    }

    /// Fields searched by free text.
    pub fn text_fields(&self) -> [&str; 5] {
        [&self.title, &self.name, &self.description, &self.id, &self.keywords]
    }

    pub fn matches_text(&self, pattern: &TextPattern) -> bool {
        self.text_fields().iter().any(|f| pattern.matches(f))
    }

    /// Restrict to the fields `projection` asks for.
    pub fn project(mut self, projection: RecordProjection) -> Self {
        if projection == RecordProjection::Summary {
            self.keywords.clear();
            self.technology.clear();
            self.celltypes.clear();
            self.diseases.clear();
            self.tissues.clear();
            self.organism.clear();
        }
        self
    }
}

/// Which record fields the hydrator fills in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RecordProjection {
    #[default]
    Full,
    /// Identity and descriptive text only, no term links.
    Summary,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
