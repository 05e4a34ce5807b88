use crate::models::ProviderMatch;

/// Picks which availability-provider candidate stands for a title
///
/// Kept separate from the resolver so the selection policy can change without
/// touching the lookup pipeline.
pub trait MatchStrategy: Send + Sync {
    fn pick_best_match<'a>(
        &self,
        candidates: &'a [ProviderMatch],
        title: &str,
        year: Option<i32>,
    ) -> Option<&'a ProviderMatch>;

    /// Strategy name for logging
    fn name(&self) -> &'static str;
}

/// Takes the provider's first result as-is
///
/// No ranking and no year tie-break: whatever the provider lists first wins.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstMatch;

impl MatchStrategy for FirstMatch {
    fn pick_best_match<'a>(
        &self,
        candidates: &'a [ProviderMatch],
        _title: &str,
        _year: Option<i32>,
    ) -> Option<&'a ProviderMatch> {
        candidates.first()
    }

    fn name(&self) -> &'static str {
        "first_match"
    }
}
