use crate::{
    error::{AppError, AppResult},
    models::{
        AvailabilityRecord, AvailabilitySource, MediaType, Offer, OfferKind, ProviderDescriptor,
        Title, TitleLookup, AVAILABILITY_ATTRIBUTION,
    },
    services::{
        content::ContentResolver,
        matching::{FirstMatch, MatchStrategy},
        providers::AvailabilityProvider,
    },
};
use chrono::Utc;
use serde::Deserialize;
use std::{fmt::Display, future::Future, sync::Arc};
use tokio_util::sync::CancellationToken;

/// Stages of an availability lookup, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveStep {
    FetchDetails,
    SearchProvider,
    SelectMatch,
    FetchSources,
    Classify,
}

impl Display for ResolveStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ResolveStep::FetchDetails => "fetch_details",
            ResolveStep::SearchProvider => "search_provider",
            ResolveStep::SelectMatch => "select_match",
            ResolveStep::FetchSources => "fetch_sources",
            ResolveStep::Classify => "classify",
        };
        write!(f, "{}", name)
    }
}

/// Media type requested when fetching detail at the start of a lookup
///
/// `AlwaysMovie` reproduces the legacy client, which asked for movie detail
/// no matter what the title was. TV ids then resolve to an unrelated movie or
/// to a 404.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetailLookup {
    #[default]
    AsRequested,
    AlwaysMovie,
}

impl DetailLookup {
    pub fn media_type_for(&self, requested: MediaType) -> MediaType {
        match self {
            DetailLookup::AsRequested => requested,
            DetailLookup::AlwaysMovie => MediaType::Movie,
        }
    }
}

/// Offers sorted into buckets, plus how many sources were thrown away
#[derive(Debug, Default)]
pub struct Classified {
    pub stream: Vec<Offer>,
    pub rent: Vec<Offer>,
    pub buy: Vec<Offer>,
    pub dropped: usize,
}

/// Sorts raw sources into stream/rent/buy offers
///
/// Sources with an unknown type, no provider name or no usable link are
/// dropped with a warning; they never fail the lookup on their own.
pub fn classify_sources(sources: Vec<AvailabilitySource>) -> Classified {
    let mut classified = Classified::default();

    for source in sources {
        let link = source.outbound_url().map(str::to_string);

        let (name, link) = match (source.name.trim(), link) {
            (name, Some(link)) if !name.is_empty() => (name.to_string(), link),
            _ => {
                tracing::warn!(
                    source_id = ?source.source_id,
                    name = %source.name,
                    "Invalid source encountered, dropping"
                );
                classified.dropped += 1;
                continue;
            }
        };

        let Some(kind) = OfferKind::from_source_type(&source.source_type) else {
            tracing::warn!(
                source_type = %source.source_type,
                name = %name,
                "Unknown source type encountered, dropping"
            );
            classified.dropped += 1;
            continue;
        };

        let offer = Offer {
            provider: ProviderDescriptor::from_display_name(&name),
            price: source.price,
            outbound_url: Some(link),
            quality: source
                .format
                .as_deref()
                .map(str::trim)
                .filter(|format| !format.is_empty())
                .map(str::to_string),
        };

        match kind {
            OfferKind::Stream => classified.stream.push(offer),
            OfferKind::Rent => classified.rent.push(offer),
            OfferKind::Buy => classified.buy.push(offer),
        }
    }

    classified
}

/// Finds where a title can be streamed, rented or bought
///
/// The lookup is a strict sequence, each step feeding the next:
/// detail → provider name search → match selection → sources → classification.
/// A cancellation token is checked around every network step so an abandoned
/// lookup stops at the next boundary instead of running to completion.
#[derive(Clone)]
pub struct AvailabilityResolver {
    content: ContentResolver,
    provider: Arc<dyn AvailabilityProvider>,
    strategy: Arc<dyn MatchStrategy>,
    region: String,
    detail_lookup: DetailLookup,
}

impl AvailabilityResolver {
    pub fn new(
        content: ContentResolver,
        provider: Arc<dyn AvailabilityProvider>,
        region: impl Into<String>,
    ) -> Self {
        Self {
            content,
            provider,
            strategy: Arc::new(FirstMatch),
            region: region.into(),
            detail_lookup: DetailLookup::default(),
        }
    }

    /// Replaces the candidate selection policy
    pub fn with_strategy(mut self, strategy: Arc<dyn MatchStrategy>) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_detail_lookup(mut self, detail_lookup: DetailLookup) -> Self {
        self.detail_lookup = detail_lookup;
        self
    }

    pub async fn resolve(&self, title_id: &str, media_type: MediaType) -> AppResult<AvailabilityRecord> {
        self.resolve_with_cancel(title_id, media_type, &CancellationToken::new())
            .await
    }

    #[tracing::instrument(skip(self, cancel), fields(region = %self.region))]
    pub async fn resolve_with_cancel(
        &self,
        title_id: &str,
        media_type: MediaType,
        cancel: &CancellationToken,
    ) -> AppResult<AvailabilityRecord> {
        let title = self.fetch_details(title_id, media_type, cancel).await?;
        self.resolve_title(&title, cancel).await
    }

    /// Runs the lookup for a title whose detail is already known
    pub async fn resolve_title(
        &self,
        title: &Title,
        cancel: &CancellationToken,
    ) -> AppResult<AvailabilityRecord> {
        let lookup = TitleLookup::from_title(title, &self.region);

        let candidates = run_step(
            ResolveStep::SearchProvider,
            cancel,
            self.provider.search_by_name(&lookup),
        )
        .await?;

        check_cancelled(ResolveStep::SelectMatch, cancel)?;
        let provider_title_id = self
            .strategy
            .pick_best_match(&candidates, &lookup.title, lookup.year)
            .map(|candidate| candidate.id)
            .ok_or_else(|| {
                tracing::info!(
                    title = %lookup.title,
                    year = ?lookup.year,
                    candidates = candidates.len(),
                    strategy = self.strategy.name(),
                    "No availability provider match"
                );
                AppError::NoAvailabilityData(format!(
                    "no {} match for '{}'",
                    self.provider.name(),
                    lookup.title
                ))
            })?;

        let sources = run_step(
            ResolveStep::FetchSources,
            cancel,
            self.provider.fetch_sources(provider_title_id, &self.region),
        )
        .await?;

        check_cancelled(ResolveStep::Classify, cancel)?;
        let classified = classify_sources(sources);

        let dropped = classified.dropped;
        let record = AvailabilityRecord {
            title_id: title.id.clone(),
            provider_title_id,
            region: self.region.clone(),
            last_updated: Utc::now(),
            stream_offers: classified.stream,
            rent_offers: classified.rent,
            buy_offers: classified.buy,
            attribution: AVAILABILITY_ATTRIBUTION.to_string(),
        };

        if record.is_empty() {
            return Err(AppError::NoAvailabilityData(format!(
                "no usable sources for {} id {} ({} dropped)",
                self.provider.name(),
                provider_title_id,
                dropped
            )));
        }

        tracing::info!(
            title_id = %record.title_id,
            watchmode_id = provider_title_id,
            stream = record.stream_offers.len(),
            rent = record.rent_offers.len(),
            buy = record.buy_offers.len(),
            total = record.offer_count(),
            dropped,
            "Availability resolved"
        );

        Ok(record)
    }

    async fn fetch_details(
        &self,
        title_id: &str,
        media_type: MediaType,
        cancel: &CancellationToken,
    ) -> AppResult<Title> {
        let lookup_type = self.detail_lookup.media_type_for(media_type);
        if lookup_type != media_type {
            tracing::warn!(
                title_id = %title_id,
                requested = %media_type,
                used = %lookup_type,
                "Legacy detail lookup overriding requested media type"
            );
        }

        run_step(
            ResolveStep::FetchDetails,
            cancel,
            self.content.get_details(title_id, lookup_type),
        )
        .await
    }
}

fn check_cancelled(step: ResolveStep, cancel: &CancellationToken) -> AppResult<()> {
    if cancel.is_cancelled() {
        return Err(AppError::Cancelled(step));
    }
    Ok(())
}

/// Runs one pipeline step, abandoning it as soon as `cancel` fires
async fn run_step<T, F>(step: ResolveStep, cancel: &CancellationToken, fut: F) -> AppResult<T>
where
    F: Future<Output = AppResult<T>>,
{
    check_cancelled(step, cancel)?;

    tokio::select! {
        biased;
        _ = cancel.cancelled() => {
            tracing::debug!(step = %step, "Availability lookup cancelled");
            Err(AppError::Cancelled(step))
        }
        result = fut => result,
    }
}
