//! Intent classification: free text in, [`RoutedPlan`] out.
//!
//! Predicates run in a fixed priority order and the first match wins, so
//! earlier checks shadow later ones:
//!
//! 1. direct address (absolute URL, bare host, `localhost:port`)
//! 2. well-known site alias
//! 3. repository keywords
//! 4. troubleshooting keywords
//! 5. documentation keywords
//! 6. short entity-like query (1–3 plain tokens)
//! 7. default
//!
//! Keyword predicates are plain substring tests on the lowercased query.
//! The entity heuristic is best-effort: "rust async" is classified as a
//! company query and some real brand names with a blacklisted token are not.
//!
//! Classification never fails.

use crate::safety::screen_url;
use crate::sites;
use crate::types::{Category, Intent, PlanReason, RoutedPlan, SearchPlan, SearchRequest, SearchType};

const REPO_KEYWORDS: &[&str] = &[
    "repo",
    "repository",
    "github",
    "gitlab",
    "source",
    "source code",
    "implementation",
    "library",
    "package",
    "sdk",
    "cli",
    "boilerplate",
    "template",
    "starter",
    "open source",
    "npm",
    "pypi",
    "pip",
    "crate",
    "cargo",
    "gem",
    "composer",
    "仓库",
    "源码",
    "开源",
    "项目",
    "库",
];

const PROBLEM_KEYWORDS: &[&str] = &[
    "how to",
    "how do i",
    "fix",
    "error",
    "issue",
    "bug",
    "exception",
    "stack trace",
    "not working",
    "doesn't work",
    "fails",
    "crash",
    "解决",
    "报错",
    "异常",
    "怎么",
    "如何",
    "修复",
    "失败",
];

const DOCS_KEYWORDS: &[&str] = &[
    "docs",
    "documentation",
    "api",
    "reference",
    "props",
    "parameters",
    "options",
    "config",
    "routing",
    "router",
    "middleware",
    "margin",
    "padding",
    "border",
    "hook",
    "文档",
    "接口",
    "参考",
    "参数",
    "配置",
];

/// Tokens that disqualify a short query from being treated as an entity name.
const ENTITY_BLACKLIST: &[&str] = &[
    "docs",
    "documentation",
    "api",
    "how",
    "fix",
    "error",
    "issue",
    "repo",
    "github",
    "文档",
    "报错",
    "仓库",
];

const STRUCTURAL_SYMBOLS: &[char] = &['/', '#', ':', '@', '(', ')', '{', '}', '[', ']'];

/// A whitespace-normalised query with its derived forms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    /// Trimmed, internal whitespace collapsed to single spaces.
    pub text: String,
    /// `text` lowercased.
    pub lower: String,
    /// `lower` split on spaces.
    pub tokens: Vec<String>,
    /// Whether the query contains CJK ideographs.
    pub cjk: bool,
}

impl Query {
    /// Normalise a raw query string.
    pub fn new(raw: &str) -> Self {
        let text = normalize(raw);
        let lower = text.to_lowercase();
        let tokens = lower.split(' ').filter(|t| !t.is_empty()).map(str::to_owned).collect();
        let cjk = has_cjk(&text);
        Self {
            text,
            lower,
            tokens,
            cjk,
        }
    }

    /// Pick the English or CJK variant of an appended fragment.
    fn localized(&self, en: &str, zh: &str) -> String {
        let suffix = if self.cjk { zh } else { en };
        format!("{} {suffix}", self.text)
    }
}

/// Trim and collapse internal whitespace.
pub fn normalize(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Lowercased, normalised tokens of `raw`.
pub fn tokenize(raw: &str) -> Vec<String> {
    Query::new(raw).tokens
}

/// Classify `raw` into a routed plan.
///
/// # Examples
///
/// ```
/// use quickopen_route::classifier::classify;
/// use quickopen_route::types::{Intent, RoutedPlan};
///
/// match classify("hacker news") {
///     RoutedPlan::Direct { url, .. } => assert_eq!(url, "https://news.ycombinator.com/"),
///     other => panic!("unexpected plan: {other:?}"),
/// }
/// assert_eq!(classify("nextjs routing").intent(), Intent::Docs);
/// ```
pub fn classify(raw: &str) -> RoutedPlan {
    let query = Query::new(raw);

    direct_address(&query)
        .or_else(|| well_known_site(&query))
        .or_else(|| repo_plan(&query))
        .or_else(|| problem_plan(&query))
        .or_else(|| docs_plan(&query))
        .or_else(|| company_plan(&query))
        .unwrap_or_else(|| default_plan(&query))
}

fn direct_address(query: &Query) -> Option<RoutedPlan> {
    if !looks_like_address(&query.text) {
        return None;
    }
    let url = screen_url(&to_https(&query.text))?;
    Some(RoutedPlan::Direct {
        query: query.text.clone(),
        reason: PlanReason::DirectUrl,
        url,
    })
}

fn well_known_site(query: &Query) -> Option<RoutedPlan> {
    sites::lookup(&query.lower).map(|url| RoutedPlan::Direct {
        query: query.text.clone(),
        reason: PlanReason::WellKnownSite,
        url: url.to_string(),
    })
}

fn repo_plan(query: &Query) -> Option<RoutedPlan> {
    if !contains_any(&query.lower, REPO_KEYWORDS) {
        return None;
    }
    let primary =
        SearchRequest::new(query.text.as_str(), SearchType::Auto).with_category(Category::Github);
    let retry = SearchRequest::new(
        query.localized("github repository source code", "GitHub 仓库 源码"),
        SearchType::Auto,
    )
    .with_category(Category::Github)
    .with_autoprompt();
    Some(search(query, Intent::Repo, PlanReason::RepoCategoryGithub, primary, retry))
}

fn problem_plan(query: &Query) -> Option<RoutedPlan> {
    if !contains_any(&query.lower, PROBLEM_KEYWORDS) {
        return None;
    }
    let primary = SearchRequest::new(query.localized("solution", "解决方案"), SearchType::Auto)
        .with_autoprompt();
    let retry = SearchRequest::new(query.localized("fix stackoverflow", "解决 修复"), SearchType::Auto)
        .with_autoprompt();
    Some(search(query, Intent::Problem, PlanReason::ProblemAuto, primary, retry))
}

fn docs_plan(query: &Query) -> Option<RoutedPlan> {
    if !contains_any(&query.lower, DOCS_KEYWORDS) {
        return None;
    }
    let primary = SearchRequest::new(
        query.localized("official documentation", "官方文档"),
        SearchType::Auto,
    )
    .with_autoprompt();
    let retry = SearchRequest::new(query.localized("api reference docs", "API 参考"), SearchType::Auto)
        .with_autoprompt();
    Some(search(query, Intent::Docs, PlanReason::DocsAuto, primary, retry))
}

fn company_plan(query: &Query) -> Option<RoutedPlan> {
    if !is_short_entity(&query.tokens) {
        return None;
    }
    let primary = SearchRequest::new(query.text.as_str(), SearchType::Neural)
        .with_category(Category::Company);
    let retry = SearchRequest::new(query.localized("official website", "官网"), SearchType::Auto)
        .with_autoprompt();
    Some(search(query, Intent::Company, PlanReason::CompanyCategory, primary, retry))
}

fn default_plan(query: &Query) -> RoutedPlan {
    let primary = SearchRequest::new(query.text.as_str(), SearchType::Auto).with_autoprompt();
    let retry =
        SearchRequest::new(query.localized("official", "官方"), SearchType::Auto).with_autoprompt();
    search(query, Intent::Default, PlanReason::DefaultAuto, primary, retry)
}

fn search(
    query: &Query,
    intent: Intent,
    reason: PlanReason,
    primary: SearchRequest,
    retry: SearchRequest,
) -> RoutedPlan {
    RoutedPlan::Search(SearchPlan {
        query: query.text.clone(),
        intent,
        reason,
        primary,
        retry: Some(retry),
    })
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| haystack.contains(n))
}

fn is_short_entity(tokens: &[String]) -> bool {
    if tokens.is_empty() || tokens.len() > 3 {
        return false;
    }
    if tokens.iter().any(|t| t.contains(STRUCTURAL_SYMBOLS)) {
        return false;
    }
    !tokens.iter().any(|t| ENTITY_BLACKLIST.contains(&t.as_str()))
}

/// Returns `true` for absolute http(s) URLs, `localhost:<port>`, and bare
/// hosts of the form `label(.label)+.tld` optionally followed by a path.
pub fn looks_like_address(input: &str) -> bool {
    let s = input.trim();
    if s.is_empty() {
        return false;
    }
    if has_http_scheme(s) {
        return true;
    }

    let host = s.split_once('/').map_or(s, |(host, _)| host);
    let host = host.to_ascii_lowercase();

    if let Some(port) = host.strip_prefix("localhost:") {
        return !port.is_empty() && port.bytes().all(|b| b.is_ascii_digit());
    }

    let labels: Vec<&str> = host.split('.').collect();
    let Some((tld, rest)) = labels.split_last() else {
        return false;
    };
    if rest.is_empty() || tld.len() < 2 || !tld.bytes().all(|b| b.is_ascii_lowercase()) {
        return false;
    }
    rest.iter().all(|label| {
        !label.is_empty()
            && label
                .bytes()
                .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-')
    })
}

fn has_http_scheme(s: &str) -> bool {
    let lower = s.get(..8).unwrap_or(s).to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

fn to_https(input: &str) -> String {
    if has_http_scheme(input) {
        input.to_string()
    } else {
        format!("https://{input}")
    }
}

/// Returns `true` if `text` contains a CJK unified ideograph.
pub fn has_cjk(text: &str) -> bool {
    text.chars().any(|c| ('\u{4e00}'..='\u{9fff}').contains(&c))
}
