//! The two-phase resolver.
//!
//! Phases run strictly in sequence. Each is a single provider call wrapped in
//! [`tokio::time::timeout`]; dropping the in-flight future on expiry cancels
//! the request. Whatever happens, [`Orchestrator::resolve`] returns a URL.

use tokio::time::{timeout, Duration, Instant};

use super::report::{
    CandidatePreview, Phase, PhaseReport, Resolution, ResolutionSource, PREVIEW_LIMIT,
};
use crate::classifier::classify;
use crate::config::RouterConfig;
use crate::error::RouteError;
use crate::fallback::lucky_url;
use crate::provider::SearchProvider;
use crate::ranking::pick_best;
use crate::safety::screen_url;
use crate::types::{Intent, PlanReason, RoutedPlan, SearchPlan, SearchRequest, SearchResponse};

/// Resolves routed plans against a [`SearchProvider`].
///
/// Holds no per-request state; one instance can serve concurrent requests.
#[derive(Debug)]
pub struct Orchestrator<P> {
    provider: P,
    config: RouterConfig,
}

impl<P: SearchProvider> Orchestrator<P> {
    /// Create an orchestrator after validating `config`.
    ///
    /// # Errors
    ///
    /// Returns [`RouteError::Config`] if `config` fails validation.
    pub fn new(provider: P, config: RouterConfig) -> Result<Self, RouteError> {
        config.validate()?;
        Ok(Self { provider, config })
    }

    /// The validated routing configuration.
    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    /// The provider searches are sent to.
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Classify `raw` and resolve the resulting plan.
    pub async fn resolve_query(&self, raw: &str) -> Resolution {
        let plan = classify(raw);
        self.resolve(&plan).await
    }

    /// Turn `plan` into a destination URL.
    ///
    /// Never fails: provider errors, timeouts and unsafe candidates all
    /// degrade to the next step and finally to [`lucky_url`].
    pub async fn resolve(&self, plan: &RoutedPlan) -> Resolution {
        match plan {
            RoutedPlan::Direct { query, reason, url } => resolve_direct(query, *reason, url),
            RoutedPlan::Search(search) => self.resolve_search(search).await,
        }
    }

    async fn resolve_search(&self, plan: &SearchPlan) -> Resolution {
        let fallback_url = lucky_url(&plan.query);
        let mut phases = Vec::with_capacity(2);

        let primary = self
            .run_phase(
                Phase::Primary,
                plan,
                &plan.primary,
                self.config.primary_timeout(),
            )
            .await;
        let primary_url = primary.best.url.clone();
        let acceptable = primary.has_url() && primary.best.score >= self.config.acceptable_score;
        phases.push(primary);

        let finish = |url: String, source: ResolutionSource, phases: Vec<PhaseReport>| {
            tracing::debug!(
                intent = %plan.intent,
                reason = %plan.reason,
                source = ?source,
                phases = phases.len(),
                "query resolved"
            );
            Resolution {
                url,
                intent: plan.intent,
                reason: plan.reason,
                source,
                phases,
                fallback_url: fallback_url.clone(),
            }
        };

        if acceptable {
            if let Some(url) = &primary_url {
                return finish(url.clone(), ResolutionSource::Primary, phases);
            }
        }

        let Some(retry_request) = &plan.retry else {
            return match primary_url {
                Some(url) => finish(url, ResolutionSource::Primary, phases),
                None => finish(fallback_url.clone(), ResolutionSource::Fallback, phases),
            };
        };

        let retry = self
            .run_phase(Phase::Retry, plan, retry_request, self.config.retry_timeout())
            .await;
        let retry_url = retry.best.url.clone();
        phases.push(retry);

        match (retry_url, primary_url) {
            (Some(url), _) => finish(url, ResolutionSource::Retry, phases),
            (None, Some(url)) => finish(url, ResolutionSource::Primary, phases),
            (None, None) => finish(fallback_url.clone(), ResolutionSource::Fallback, phases),
        }
    }

    /// One bounded provider call plus ranking. Errors end up in the report.
    async fn run_phase(
        &self,
        phase: Phase,
        plan: &SearchPlan,
        request: &SearchRequest,
        deadline: Duration,
    ) -> PhaseReport {
        let request = request.clone().with_num_results(self.config.num_results);
        tracing::trace!(%phase, query = %request.query, "dispatching provider search");

        let started = Instant::now();
        let outcome = match timeout(deadline, self.provider.search(&request)).await {
            Ok(result) => result,
            Err(_) => Err(RouteError::Timeout(format!(
                "{phase} phase exceeded {}ms",
                deadline.as_millis()
            ))),
        };
        let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

        let (response, error) = match outcome {
            Ok(response) => (response, None),
            Err(err) => {
                tracing::warn!(
                    provider = self.provider.name(),
                    %phase,
                    error = %err,
                    "provider search failed"
                );
                (SearchResponse::default(), Some(err.to_string()))
            }
        };

        let best = pick_best(
            plan.intent,
            &plan.query,
            &response.results,
            self.config.provider_score_weight,
        );
        tracing::debug!(
            %phase,
            candidates = response.results.len(),
            score = best.score,
            elapsed_ms,
            "phase ranked"
        );

        PhaseReport {
            phase,
            query: request.query,
            best,
            candidates: response
                .results
                .iter()
                .take(PREVIEW_LIMIT)
                .map(CandidatePreview::from)
                .collect(),
            autoprompt: response.autoprompt_string,
            elapsed_ms,
            error,
        }
    }
}

fn resolve_direct(query: &str, reason: PlanReason, url: &str) -> Resolution {
    let fallback_url = lucky_url(query);
    let (url, source) = match screen_url(url) {
        Some(safe) => (safe, ResolutionSource::Direct),
        None => {
            tracing::warn!(reason = %reason, "direct URL failed safety screening");
            (fallback_url.clone(), ResolutionSource::Fallback)
        }
    };
    Resolution {
        url,
        intent: Intent::Direct,
        reason,
        source,
        phases: Vec::new(),
        fallback_url,
    }
}
