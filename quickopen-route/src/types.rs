//! Core types shared by the classifier, ranker and orchestrator.
//!
//! Request/response types mirror the search provider's JSON contract
//! (camelCase keys, optional fields omitted when unset).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Default number of results requested from the provider.
pub const DEFAULT_NUM_RESULTS: usize = 10;

/// Score assigned to a candidate with no usable URL.
pub const NO_URL_SCORE: f64 = -999.0;

/// The classified purpose of a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Intent {
    /// The query is itself a navigable address or a well-known site name.
    Direct,
    /// Looking for a source repository or package.
    Repo,
    /// Looking for documentation or an API reference page.
    Docs,
    /// Troubleshooting an error or asking how to do something.
    Problem,
    /// A short brand, product or company name.
    Company,
    /// Nothing more specific matched.
    Default,
}

impl Intent {
    /// Returns the lowercase wire name of this intent.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Direct => "direct",
            Self::Repo => "repo",
            Self::Docs => "docs",
            Self::Problem => "problem",
            Self::Company => "company",
            Self::Default => "default",
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why the classifier produced a particular plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PlanReason {
    /// The query parsed as an absolute or bare-host URL.
    DirectUrl,
    /// The query matched the well-known site table.
    WellKnownSite,
    /// Repository keywords; searched in the GitHub category.
    RepoCategoryGithub,
    /// Troubleshooting keywords.
    ProblemAuto,
    /// Documentation keywords.
    DocsAuto,
    /// Short entity-like query; searched in the company category.
    CompanyCategory,
    /// Fallthrough.
    DefaultAuto,
}

impl PlanReason {
    /// Returns the kebab-case tag used in debug output.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DirectUrl => "direct-url",
            Self::WellKnownSite => "well-known-site",
            Self::RepoCategoryGithub => "repo-category-github",
            Self::ProblemAuto => "problem-auto",
            Self::DocsAuto => "docs-auto",
            Self::CompanyCategory => "company-category",
            Self::DefaultAuto => "default-auto",
        }
    }
}

impl fmt::Display for PlanReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Provider match mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchType {
    /// Embedding-based retrieval.
    Neural,
    /// Classic keyword retrieval.
    Keyword,
    /// Let the provider choose.
    Auto,
}

/// Provider-side category filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "company")]
    Company,
    #[serde(rename = "research paper")]
    ResearchPaper,
    #[serde(rename = "news")]
    News,
    #[serde(rename = "pdf")]
    Pdf,
    #[serde(rename = "github")]
    Github,
    #[serde(rename = "tweet")]
    Tweet,
    #[serde(rename = "personal site")]
    PersonalSite,
    #[serde(rename = "financial report")]
    FinancialReport,
    #[serde(rename = "people")]
    People,
}

/// One remote search call, exactly as sent to the provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    /// Query text, possibly augmented by the classifier.
    pub query: String,
    /// Match mode.
    #[serde(rename = "type")]
    pub search_type: SearchType,
    /// Optional category filter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    /// Number of results to request.
    pub num_results: usize,
    /// Restrict results to these domains.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_domains: Option<Vec<String>>,
    /// Drop results from these domains.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclude_domains: Option<Vec<String>>,
    /// Let the provider expand the query.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_autoprompt: Option<bool>,
}

impl SearchRequest {
    /// A request for `query` with the default result count and no filters.
    pub fn new(query: impl Into<String>, search_type: SearchType) -> Self {
        Self {
            query: query.into(),
            search_type,
            category: None,
            num_results: DEFAULT_NUM_RESULTS,
            include_domains: None,
            exclude_domains: None,
            use_autoprompt: None,
        }
    }

    /// Set the category filter.
    pub fn with_category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    /// Enable provider-side query expansion.
    pub fn with_autoprompt(mut self) -> Self {
        self.use_autoprompt = Some(true);
        self
    }

    /// Set the number of requested results.
    pub fn with_num_results(mut self, num_results: usize) -> Self {
        self.num_results = num_results;
        self
    }
}

/// A single candidate returned by the provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    /// Raw candidate URL (not yet screened).
    pub url: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub published_date: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    /// Provider relevance, usually in `0.0..=1.0`.
    #[serde(default)]
    pub score: Option<f64>,
}

impl SearchResult {
    /// A bare result with only a URL.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: None,
            id: None,
            published_date: None,
            author: None,
            score: None,
        }
    }

    /// Set the title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the provider relevance score.
    pub fn with_score(mut self, score: f64) -> Self {
        self.score = Some(score);
        self
    }
}

/// The provider's response envelope.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    #[serde(default)]
    pub request_id: Option<String>,
    /// The expanded query the provider actually ran, when autoprompt was on.
    #[serde(default)]
    pub autoprompt_string: Option<String>,
    #[serde(default)]
    pub results: Vec<SearchResult>,
}

/// A ranked candidate: a screened URL (or none) and its score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredCandidate {
    /// The screened HTTPS URL, or `None` if the candidate was unsafe.
    pub url: Option<String>,
    /// Higher is better; [`NO_URL_SCORE`] when there is no usable URL.
    pub score: f64,
}

impl ScoredCandidate {
    /// The "nothing usable" candidate.
    pub fn none() -> Self {
        Self {
            url: None,
            score: NO_URL_SCORE,
        }
    }

    /// Returns `true` if this candidate carries a screened URL.
    pub fn has_url(&self) -> bool {
        self.url.is_some()
    }
}

/// A classifier plan for a non-direct query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchPlan {
    /// The normalised original query; used for ranking and the fallback URL.
    pub query: String,
    /// Never [`Intent::Direct`].
    pub intent: Intent,
    pub reason: PlanReason,
    /// Always issued first.
    pub primary: SearchRequest,
    /// Issued only if the primary phase is inconclusive.
    pub retry: Option<SearchRequest>,
}

/// The classifier's output.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RoutedPlan {
    /// Terminal: navigate straight to `url`.
    Direct {
        query: String,
        reason: PlanReason,
        url: String,
    },
    /// Search the provider, then rank.
    Search(SearchPlan),
}

impl RoutedPlan {
    /// The intent this plan was built for.
    pub fn intent(&self) -> Intent {
        match self {
            Self::Direct { .. } => Intent::Direct,
            Self::Search(plan) => plan.intent,
        }
    }

    /// The normalised original query.
    pub fn query(&self) -> &str {
        match self {
            Self::Direct { query, .. } => query,
            Self::Search(plan) => &plan.query,
        }
    }

    /// The classifier's reason tag.
    pub fn reason(&self) -> PlanReason {
        match self {
            Self::Direct { reason, .. } => *reason,
            Self::Search(plan) => plan.reason,
        }
    }
}
