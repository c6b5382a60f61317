//! Landing-page ranking from URL structure.
//!
//! Each candidate is screened, then scored as:
//!
//! ```text
//! score = provider_score * provider_weight        (only if provider_score > 0)
//!       + structural adjustments                  (every intent)
//!       + intent adjustments                      (repo/docs/company/problem/default)
//! ```
//!
//! The aim is to recognise the *kind* of page (repository root, docs page,
//! Q&A thread, company home) rather than to trust a list of domains.
//! Unsafe candidates get [`NO_URL_SCORE`](crate::types::NO_URL_SCORE) and
//! are never selected while a safe one exists. Sorting is stable, so ties keep provider order.

use url::Url;

use crate::classifier::{normalize, tokenize};
use crate::safety::screen_url;
use crate::types::{Intent, ScoredCandidate, SearchResult};

const LOGIN_PENALTY: f64 = -12.0;
const TOKEN_IN_HOST: f64 = 4.0;
const TOKEN_IN_TITLE: f64 = 2.0;
const TOKEN_IN_PATH: f64 = 3.0;
const MEDIUM_PENALTY: f64 = -5.0;
const DEV_TO_PENALTY: f64 = -4.0;
const BLOG_HOST_PENALTY: f64 = -3.0;
const MAJOR_VENDOR_BONUS: f64 = 5.0;
const CLOUD_VENDOR_BONUS: f64 = 4.0;
const PRICING_BONUS: f64 = 6.0;

/// Query tokens shorter than this (in characters) are ignored for matching.
const MIN_TOKEN_CHARS: usize = 3;

const MAJOR_VENDOR_DOMAINS: &[&str] = &["microsoft.com", "google.com", "apple.com"];
const CLOUD_VENDOR_DOMAINS: &[&str] = &["azure.com", "aws.amazon.com"];

/// GitHub owners whose repositories are usually the canonical answer.
const PROMINENT_GITHUB_ORGS: &[&str] = &[
    "facebookresearch",
    "google",
    "microsoft",
    "openai",
    "meta",
    "facebook",
    "apple",
    "amazon",
    "nvidia",
    "anthropic",
    "huggingface",
];

/// Rank `results` for `intent`, best first.
///
/// Every input produces exactly one [`ScoredCandidate`]. The sort is stable.
pub fn rank(
    intent: Intent,
    query: &str,
    results: &[SearchResult],
    provider_weight: f64,
) -> Vec<ScoredCandidate> {
    let terms = QueryTerms::new(query);
    let mut scored: Vec<ScoredCandidate> = results
        .iter()
        .map(|r| score_result(intent, &terms, r, provider_weight))
        .collect();
    scored.sort_by(|a, b| b.score.total_cmp(&a.score));
    scored
}

/// Select the best safe candidate.
///
/// Returns `{url: None, score: -999}` when `results` is empty or no
/// candidate survives screening.
///
/// # Examples
///
/// ```
/// use quickopen_route::ranking::pick_best;
/// use quickopen_route::types::{Intent, SearchResult};
///
/// let results = vec![
///     SearchResult::new("https://github.com/facebookresearch/segment-anything/issues/42"),
///     SearchResult::new("https://github.com/facebookresearch/segment-anything"),
/// ];
/// let best = pick_best(Intent::Repo, "github segmentanything", &results, 3.0);
/// assert_eq!(
///     best.url.as_deref(),
///     Some("https://github.com/facebookresearch/segment-anything")
/// );
/// ```
pub fn pick_best(
    intent: Intent,
    query: &str,
    results: &[SearchResult],
    provider_weight: f64,
) -> ScoredCandidate {
    rank(intent, query, results, provider_weight)
        .into_iter()
        .find(ScoredCandidate::has_url)
        .unwrap_or_else(ScoredCandidate::none)
}

/// Pre-processed query used for matching.
struct QueryTerms {
    lower: String,
    tokens: Vec<String>,
}

impl QueryTerms {
    fn new(query: &str) -> Self {
        Self {
            lower: normalize(query).to_lowercase(),
            tokens: tokenize(query)
                .into_iter()
                .filter(|t| t.chars().count() >= MIN_TOKEN_CHARS)
                .collect(),
        }
    }
}

/// The parts of a screened URL the rules look at.
struct Page<'a> {
    /// Lowercased, `www.` stripped.
    host: String,
    /// Lowercased; `/` for the root.
    path: String,
    title: &'a str,
}

impl Page<'_> {
    fn segments(&self) -> Vec<&str> {
        self.path.split('/').filter(|s| !s.is_empty()).collect()
    }
}

fn score_result(
    intent: Intent,
    terms: &QueryTerms,
    result: &SearchResult,
    provider_weight: f64,
) -> ScoredCandidate {
    let Some(url) = screen_url(&result.url) else {
        return ScoredCandidate::none();
    };
    let Ok(parsed) = Url::parse(&url) else {
        return ScoredCandidate::none();
    };

    let host = parsed.host_str().unwrap_or_default().to_ascii_lowercase();
    let title = result.title.as_deref().unwrap_or_default().to_lowercase();
    let page = Page {
        host: host.strip_prefix("www.").unwrap_or(&host).to_string(),
        path: parsed.path().to_lowercase(),
        title: &title,
    };

    let mut score = 0.0;
    if let Some(provider) = result.score.filter(|s| *s > 0.0) {
        score += provider * provider_weight;
    }
    score += structural_score(terms, &page);
    score += match intent {
        Intent::Repo => repo_score(&page),
        Intent::Docs => docs_score(terms, &page),
        Intent::Company => company_score(&page),
        Intent::Problem => problem_score(&page),
        Intent::Default => default_score(terms, &page),
        Intent::Direct => 0.0,
    };

    ScoredCandidate {
        url: Some(url),
        score,
    }
}

fn structural_score(terms: &QueryTerms, page: &Page<'_>) -> f64 {
    let mut score = 0.0;

    if has_path_word(&page.path, &["login", "signin", "sign-in", "auth"]) {
        score += LOGIN_PENALTY;
    }

    for token in &terms.tokens {
        if page.host.contains(token.as_str()) {
            score += TOKEN_IN_HOST;
        }
        if page.title.contains(token.as_str()) {
            score += TOKEN_IN_TITLE;
        }
        if page.path.contains(token.as_str()) {
            score += TOKEN_IN_PATH;
        }
    }

    if page.host.contains("medium.com") {
        score += MEDIUM_PENALTY;
    }
    if page.host.contains("dev.to") {
        score += DEV_TO_PENALTY;
    }
    if page.host.contains("blog.") {
        score += BLOG_HOST_PENALTY;
    }

    if MAJOR_VENDOR_DOMAINS.iter().any(|d| is_subdomain_of(&page.host, d)) {
        score += MAJOR_VENDOR_BONUS;
    }
    if CLOUD_VENDOR_DOMAINS.iter().any(|d| is_subdomain_of(&page.host, d)) {
        score += CLOUD_VENDOR_BONUS;
    }

    if page.path.contains("/pricing") {
        score += PRICING_BONUS;
    }

    score
}

fn repo_score(page: &Page<'_>) -> f64 {
    let segments = page.segments();
    let mut score = 0.0;

    match page.host.as_str() {
        "github.com" => {
            if segments.len() == 2 {
                score += 12.0;
            }
            if segments.len() > 2 {
                score -= (segments.len() - 2) as f64 * 1.5;
            }
            if has_path_word(
                &page.path,
                &[
                    "issues", "pull", "pulls", "actions", "wiki", "releases", "blob", "tree",
                    "compare",
                ],
            ) {
                score -= 6.0;
            }
            if segments
                .first()
                .is_some_and(|owner| PROMINENT_GITHUB_ORGS.contains(owner))
            {
                score += 10.0;
            }
        }
        "gitlab.com" => {
            if segments.len() == 2 {
                score += 10.0;
            }
        }
        _ => {}
    }

    score
}

fn docs_score(terms: &QueryTerms, page: &Page<'_>) -> f64 {
    let mut score = 0.0;

    if has_path_word(
        &page.path,
        &[
            "docs",
            "documentation",
            "api",
            "reference",
            "references",
            "learn",
            "guide",
            "guides",
            "handbook",
        ],
    ) {
        score += 14.0;
    }
    if ["docs", "reference", "api"].iter().any(|w| contains_word(page.title, w)) {
        score += 4.0;
    }
    if page.path.contains("/blog") {
        score -= 3.0;
    }

    // Specific pages that echo the query beat section indexes.
    for token in &terms.tokens {
        if page.path.contains(token.as_str()) {
            score += 4.0;
        }
        if page.title.contains(token.as_str()) {
            score += 2.0;
        }
    }

    if page.path.ends_with("/routing") || page.path.ends_with("/routing/") {
        score += 5.0;
    }

    score
}

fn company_score(page: &Page<'_>) -> f64 {
    let mut score = 0.0;
    if page.host.contains("wikipedia.org") {
        score -= 10.0;
    }
    if page.host.contains("crunchbase.com") {
        score -= 7.0;
    }
    if page.path == "/" {
        score += 10.0;
    }
    if has_path_word(&page.path, &["pricing", "product", "about"]) {
        score += 2.0;
    }
    score
}

fn problem_score(page: &Page<'_>) -> f64 {
    let mut score = 0.0;
    if page.host.contains("stackoverflow.com") && page.path.contains("/questions/") {
        score += 12.0;
    }
    if page.host == "github.com" && has_numbered_issue(&page.path) {
        score += 10.0;
    }
    if has_path_word(&page.path, &["troubleshoot", "troubleshooting", "faq", "errors"]) {
        score += 6.0;
    }
    if has_path_word(&page.path, &["pricing", "home", "landing"]) {
        score -= 3.0;
    }
    score
}

fn default_score(terms: &QueryTerms, page: &Page<'_>) -> f64 {
    let hacker_news = terms.lower == "hacker news" || terms.lower == "hn";
    if hacker_news && page.host == "news.ycombinator.com" {
        25.0
    } else {
        0.0
    }
}

/// `host` is a strict subdomain of `domain`; the bare domain does not count.
fn is_subdomain_of(host: &str, domain: &str) -> bool {
    host.strip_suffix(domain)
        .is_some_and(|prefix| prefix.len() > 1 && prefix.ends_with('.'))
}

fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

/// `path` contains `/<word>` followed by a non-word character or the end.
fn has_path_word(path: &str, words: &[&str]) -> bool {
    words.iter().any(|word| {
        let needle = format!("/{word}");
        path.match_indices(&needle).any(|(at, _)| {
            let end = at + needle.len();
            path.as_bytes().get(end).is_none_or(|b| !is_word_byte(*b))
        })
    })
}

/// `text` contains `word` delimited by non-word characters on both sides.
fn contains_word(text: &str, word: &str) -> bool {
    let bytes = text.as_bytes();
    text.match_indices(word).any(|(at, _)| {
        let before_ok = at == 0 || !is_word_byte(bytes[at - 1]);
        let after_ok = bytes.get(at + word.len()).is_none_or(|b| !is_word_byte(*b));
        before_ok && after_ok
    })
}

/// `path` contains `/issues/<digits>`.
fn has_numbered_issue(path: &str) -> bool {
    path.match_indices("/issues/").any(|(at, m)| {
        path.as_bytes()
            .get(at + m.len())
            .is_some_and(u8::is_ascii_digit)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::NO_URL_SCORE;

    const W: f64 = 3.0;

    fn result(url: &str) -> SearchResult {
        SearchResult::new(url)
    }

    fn score_of(intent: Intent, query: &str, r: SearchResult) -> f64 {
        rank(intent, query, &[r], W)[0].score
    }

    #[test]
    fn empty_list_yields_sentinel() {
        let best = pick_best(Intent::Docs, "anything", &[], W);
        assert_eq!(best, ScoredCandidate::none());
        assert!((best.score - NO_URL_SCORE).abs() < f64::EPSILON);
    }

    #[test]
    fn unsafe_candidate_never_selected() {
        let results = vec![
            result("https://user:pw@evil.example.com/").with_score(100.0),
            result("http://10.0.0.1/").with_score(50.0),
            result("https://plain.example.org/").with_score(0.1),
        ];
        let best = pick_best(Intent::Default, "plain", &results, W);
        assert_eq!(best.url.as_deref(), Some("https://plain.example.org/"));
    }

    #[test]
    fn only_unsafe_candidates_yield_none() {
        let results = vec![result("javascript:alert(1)").with_score(1.0)];
        let best = pick_best(Intent::Default, "x", &results, W);
        assert!(best.url.is_none());
        assert!((best.score - NO_URL_SCORE).abs() < f64::EPSILON);
    }

    #[test]
    fn selected_url_is_https_normalised() {
        let best = pick_best(Intent::Company, "stripe", &[result("http://Stripe.com")], W);
        assert_eq!(best.url.as_deref(), Some("https://stripe.com/"));
    }

    #[test]
    fn provider_score_weighted() {
        let s = score_of(Intent::Default, "zz", result("https://a.example/x").with_score(0.5));
        assert!((s - 1.5).abs() < 1e-9);
        let s = score_of(Intent::Default, "zz", result("https://a.example/x").with_score(-2.0));
        assert!(s.abs() < 1e-9);
    }

    #[test]
    fn provider_weight_is_configurable() {
        let r = result("https://a.example/x").with_score(0.5);
        let ranked = rank(Intent::Default, "zz", &[r], 10.0);
        assert!((ranked[0].score - 5.0).abs() < 1e-9);
    }

    #[test]
    fn login_pages_penalised() {
        let s = score_of(Intent::Default, "zz", result("https://a.example/login"));
        assert!((s - LOGIN_PENALTY).abs() < 1e-9);
        let s = score_of(Intent::Default, "zz", result("https://a.example/auth/callback"));
        assert!((s - LOGIN_PENALTY).abs() < 1e-9);
        // "/authors" is not an auth page.
        let s = score_of(Intent::Default, "zz", result("https://a.example/authors"));
        assert!(s.abs() < 1e-9);
    }

    #[test]
    fn token_matches_in_host_title_path() {
        let r = result("https://tokio.rs/tokio/tutorial").with_title("Tokio tutorial");
        // host +4, title +2, path +3 for "tokio"; "tutorial" adds title +2, path +3.
        let s = score_of(Intent::Default, "tokio tutorial", r);
        assert!((s - 14.0).abs() < 1e-9, "got {s}");
    }

    #[test]
    fn short_tokens_ignored() {
        let s = score_of(Intent::Default, "go is", result("https://go.dev/is"));
        assert!(s.abs() < 1e-9);
    }

    #[test]
    fn second_hand_content_penalised() {
        assert!((score_of(Intent::Default, "zz", result("https://medium.com/@a/b")) + 5.0).abs() < 1e-9);
        assert!((score_of(Intent::Default, "zz", result("https://dev.to/a/b")) + 4.0).abs() < 1e-9);
        assert!((score_of(Intent::Default, "zz", result("https://blog.example.com/p")) + 3.0).abs() < 1e-9);
    }

    #[test]
    fn vendor_domains_boosted() {
        assert!((score_of(Intent::Default, "zz", result("https://learn.microsoft.com/x")) - 5.0).abs() < 1e-9);
        assert!((score_of(Intent::Default, "zz", result("https://support.apple.com/x")) - 5.0).abs() < 1e-9);
        assert!((score_of(Intent::Default, "zz", result("https://docs.aws.amazon.com/x")) - 4.0).abs() < 1e-9);
        assert!((score_of(Intent::Default, "zz", result("https://portal.azure.com/x")) - 4.0).abs() < 1e-9);
        assert!(score_of(Intent::Default, "zz", result("https://notgoogle.com/x")).abs() < 1e-9);
    }

    #[test]
    fn vendor_home_domains_get_no_bonus() {
        for url in [
            "https://www.apple.com/x",
            "https://microsoft.com/x",
            "https://azure.com/x",
            "https://aws.amazon.com/x",
        ] {
            assert!(score_of(Intent::Default, "zz", result(url)).abs() < 1e-9, "{url}");
        }
    }

    #[test]
    fn pricing_boosted() {
        let s = score_of(Intent::Default, "zz", result("https://a.example/pricing"));
        assert!((s - PRICING_BONUS).abs() < 1e-9);
    }

    #[test]
    fn repo_root_outranks_issue_page() {
        let results = vec![
            result("https://github.com/facebookresearch/segment-anything/issues/42"),
            result("https://github.com/facebookresearch/segment-anything"),
        ];
        let ranked = rank(Intent::Repo, "github segmentanything", &results, W);
        assert_eq!(
            ranked[0].url.as_deref(),
            Some("https://github.com/facebookresearch/segment-anything")
        );
        // root: host +4, two segments +12, prominent org +10
        assert!((ranked[0].score - 26.0).abs() < 1e-9, "got {}", ranked[0].score);
        // issue: host +4, 4 segments -3, /issues -6, prominent org +10
        assert!((ranked[1].score - 5.0).abs() < 1e-9, "got {}", ranked[1].score);
    }

    #[test]
    fn repo_gitlab_root_boosted() {
        let s = score_of(Intent::Repo, "zz", result("https://gitlab.com/inkscape/inkscape"));
        assert!((s - 10.0).abs() < 1e-9);
    }

    #[test]
    fn repo_rules_ignore_other_hosts() {
        let s = score_of(Intent::Repo, "zz", result("https://codeberg.org/a/b"));
        assert!(s.abs() < 1e-9);
    }

    #[test]
    fn docs_page_outranks_blog_post() {
        let results = vec![
            result("https://nextjs.org/blog/routing-tips"),
            result("https://nextjs.org/docs/routing"),
        ];
        let ranked = rank(Intent::Docs, "nextjs routing", &results, W);
        assert_eq!(ranked[0].url.as_deref(), Some("https://nextjs.org/docs/routing"));
        assert!(ranked[0].score > ranked[1].score);
    }

    #[test]
    fn docs_title_word_match() {
        let plain = score_of(Intent::Docs, "zz", result("https://a.example/x").with_title("Rapid prototyping"));
        let docs = score_of(Intent::Docs, "zz", result("https://a.example/x").with_title("API reference"));
        assert!(plain.abs() < 1e-9);
        assert!((docs - 4.0).abs() < 1e-9);
    }

    #[test]
    fn company_home_preferred_over_wikipedia() {
        let results = vec![
            result("https://en.wikipedia.org/wiki/Stripe,_Inc."),
            result("https://crunchbase.com/organization/stripe"),
            result("https://stripe.com/"),
        ];
        let ranked = rank(Intent::Company, "stripe", &results, W);
        assert_eq!(ranked[0].url.as_deref(), Some("https://stripe.com/"));
        assert!(ranked[2].url.as_deref().is_some_and(|u| u.contains("wikipedia")));
    }

    #[test]
    fn company_about_pages_small_bonus() {
        let s = score_of(Intent::Company, "zz", result("https://a.example/about"));
        assert!((s - 2.0).abs() < 1e-9);
    }

    #[test]
    fn problem_prefers_qa_and_issues() {
        let so = score_of(Intent::Problem, "zz", result("https://stackoverflow.com/questions/1/x"));
        let gh = score_of(Intent::Problem, "zz", result("https://github.com/a/b/issues/12"));
        let gh_list = score_of(Intent::Problem, "zz", result("https://github.com/a/b/issues"));
        let faq = score_of(Intent::Problem, "zz", result("https://a.example/faq"));
        let landing = score_of(Intent::Problem, "zz", result("https://a.example/landing"));
        assert!((so - 12.0).abs() < 1e-9);
        assert!((gh - 10.0).abs() < 1e-9);
        assert!(gh_list.abs() < 1e-9);
        assert!((faq - 6.0).abs() < 1e-9);
        assert!((landing + 3.0).abs() < 1e-9);
    }

    #[test]
    fn default_hacker_news_shortcut() {
        let s = score_of(Intent::Default, "Hacker  News", result("https://news.ycombinator.com/"));
        // +25 shortcut, +4 for "news" in the host.
        assert!((s - 29.0).abs() < 1e-9, "got {s}");
        let s = score_of(Intent::Default, "lobsters", result("https://news.ycombinator.com/"));
        assert!(s.abs() < 1e-9);
    }

    #[test]
    fn ties_keep_provider_order() {
        let results = vec![
            result("https://first.example/a"),
            result("https://second.example/a"),
            result("https://third.example/a"),
        ];
        let ranked = rank(Intent::Default, "zz", &results, W);
        let urls: Vec<_> = ranked.iter().filter_map(|c| c.url.as_deref()).collect();
        assert_eq!(
            urls,
            vec![
                "https://first.example/a",
                "https://second.example/a",
                "https://third.example/a"
            ]
        );
    }

    #[test]
    fn ranking_is_deterministic() {
        let results = vec![
            result("https://nextjs.org/docs/app/building-your-application/routing").with_score(0.2),
            result("https://nextjs.org/blog/routing-tips").with_score(0.3),
            result("https://github.com/vercel/next.js").with_score(0.25),
        ];
        let a = rank(Intent::Docs, "nextjs routing", &results, W);
        let b = rank(Intent::Docs, "nextjs routing", &results, W);
        assert_eq!(a, b);
    }

    #[test]
    fn word_helpers() {
        assert!(has_path_word("/docs", &["docs"]));
        assert!(has_path_word("/en/docs/intro", &["docs"]));
        assert!(!has_path_word("/docsify", &["docs"]));
        assert!(contains_word("the api docs", "api"));
        assert!(!contains_word("rapid", "api"));
        assert!(has_numbered_issue("/a/b/issues/7"));
        assert!(!has_numbered_issue("/a/b/issues/new"));
        assert!(!is_subdomain_of("google.com", "google.com"));
        assert!(!is_subdomain_of(".google.com", "google.com"));
        assert!(is_subdomain_of("cloud.google.com", "google.com"));
        assert!(!is_subdomain_of("notgoogle.com", "google.com"));
    }
}
