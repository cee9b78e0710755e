//! Per-user quote selection via an ordered fallback chain.

use tracing::warn;

use crate::store::{Quote, QuoteStore, StoreError};

/// Sentinel id of the built-in fallback quote.
pub const DEFAULT_QUOTE_ID: &str = "default";

/// Maximum favorites featured per newsletter.
pub const FAVORITES_LIMIT: i64 = 5;

/// Maximum popular public quotes featured when the user has no favorites.
pub const POPULAR_LIMIT: i64 = 3;

/// Which fallback tier produced the selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionTier {
    /// The recipient's own favorite quotes
    Favorites,
    /// Globally popular public quotes
    PopularPublic,
    /// The single built-in quote
    Default,
}

/// A non-empty, ordered set of quotes chosen for one recipient.
#[derive(Debug, Clone)]
pub struct QuoteSelection {
    /// The tier that yielded the quotes
    pub tier: SelectionTier,
    /// At most [`FAVORITES_LIMIT`] quotes, never empty
    pub quotes: Vec<Quote>,
}

/// The built-in quote used when a recipient has nothing else to feature.
#[must_use]
pub fn default_quote() -> Quote {
    Quote {
        id: DEFAULT_QUOTE_ID.to_string(),
        text: "The only way to do great work is to love what you do.".to_string(),
        author: "Steve Jobs".to_string(),
        book: None,
        chapter: None,
        page_number: None,
        source_url: None,
        tags: Vec::new(),
        is_favorite: false,
        is_public: true,
        view_count: 0,
        share_count: 0,
        // Synthetic quote, owned by nobody.
        user_id: String::new(),
    }
}

/// Select quotes for one recipient.
///
/// Tiers are tried in a fixed order and each tier is queried only when the
/// prior one yielded nothing: favorites (up to 5), then public quotes by
/// descending view count (up to 3), then the built-in default. A tier whose
/// query fails is treated as empty, except for connectivity errors, which
/// abort this recipient (and only this recipient).
///
/// # Errors
///
/// Returns `StoreError` only when the store was unreachable.
pub async fn select_quotes(
    store: &dyn QuoteStore,
    user_id: &str,
) -> Result<QuoteSelection, StoreError> {
    let favorites = degrade(
        store.favorites(user_id, FAVORITES_LIMIT).await,
        user_id,
        SelectionTier::Favorites,
    )?;
    if !favorites.is_empty() {
        return Ok(QuoteSelection {
            tier: SelectionTier::Favorites,
            quotes: favorites,
        });
    }

    let popular = degrade(
        store.popular_public(POPULAR_LIMIT).await,
        user_id,
        SelectionTier::PopularPublic,
    )?;
    if !popular.is_empty() {
        return Ok(QuoteSelection {
            tier: SelectionTier::PopularPublic,
            quotes: popular,
        });
    }

    // The default tier always yields exactly one quote.
    Ok(QuoteSelection {
        tier: SelectionTier::Default,
        quotes: vec![default_quote()],
    })
}

/// Map a tier query failure to an empty tier, unless the store itself was
/// unreachable.
fn degrade(
    result: Result<Vec<Quote>, StoreError>,
    user_id: &str,
    tier: SelectionTier,
) -> Result<Vec<Quote>, StoreError> {
    match result {
        Ok(quotes) => Ok(quotes),
        Err(error) if error.is_connectivity() => Err(error),
        Err(error) => {
            warn!(user_id, ?tier, %error, "quote tier query failed, treating tier as empty");
            Ok(Vec::new())
        }
    }
}
