//! Marketplace REST client implementing the fetch capability.
//!
//! The marketplace exposes a JSON endpoint listing the articles (listings)
//! for a product. The payload shape has drifted between API revisions, so
//! parsing is deliberately defensive: unrecognized articles are skipped
//! rather than failing the whole snapshot, while transport errors, bad
//! statuses and non-JSON bodies surface as [`FetchError`] so the caller
//! can tell them apart from a genuinely empty market.

use std::time::Duration;

use chrono::Utc;
use reqwest::Client;
use rust_decimal::Decimal;
use serde_json::Value;
use tracing::debug;

use crate::config::MarketplaceConfig;
use crate::domain::{
    FilterCriteria, ListingId, ObservationBatch, PriceEntry, ProductId, WatchItem,
    DEFAULT_CURRENCY,
};
use crate::error::{FetchError, Result};
use crate::port::SnapshotFetcher;

/// HTTP client for the marketplace articles endpoint.
pub struct MarketplaceClient {
    http: Client,
    api_url: String,
    app_token: Option<String>,
}

impl MarketplaceClient {
    /// Build a client from configuration.
    ///
    /// The request timeout set here is the only bound on a hung fetch;
    /// a timeout surfaces as an ordinary [`FetchError`].
    ///
    /// # Errors
    /// Returns an error when the underlying HTTP client cannot be built.
    pub fn from_config(config: &MarketplaceConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .build()
            .map_err(FetchError::Transport)?;

        Ok(Self {
            http,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            app_token: config.app_token.clone(),
        })
    }

    fn endpoint(&self, product: &ProductId) -> String {
        format!("{}/products/{}/articles", self.api_url, product)
    }
}

impl SnapshotFetcher for MarketplaceClient {
    async fn fetch(&self, item: &WatchItem) -> std::result::Result<ObservationBatch, FetchError> {
        let endpoint = self.endpoint(item.product_id());

        let mut query: Vec<(&str, String)> = vec![(
            "minQuantity",
            item.filter().min_quantity().to_string(),
        )];
        if let Some(language) = item.filter().language() {
            query.push(("language", language.to_string()));
        }
        if let Some(condition) = item.filter().condition() {
            query.push(("condition", condition.to_string()));
        }

        let mut request = self.http.get(&endpoint).query(&query);
        if let Some(token) = &self.app_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                endpoint,
            });
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|e| FetchError::Payload(e.to_string()))?;

        let observed_at = Utc::now();
        let mut entries: ObservationBatch = extract_articles(&payload)
            .into_iter()
            .filter(|article| matches_filter(article, item.filter()))
            .filter_map(|article| {
                let price = article_price(article)?;
                let quantity = article_quantity(article);
                if quantity == 0 {
                    return None;
                }
                PriceEntry::try_new(
                    item.product_id().clone(),
                    observed_at,
                    article_language(article).unwrap_or_default(),
                    article_condition(article).unwrap_or_default(),
                    price,
                    DEFAULT_CURRENCY,
                    quantity,
                    article_listing_id(article).map(ListingId::from),
                )
                .ok()
            })
            .collect();

        entries.sort_by(|a, b| a.price().cmp(&b.price()));

        debug!(
            product_id = %item.product_id(),
            listings = entries.len(),
            "Fetched snapshot"
        );

        Ok(entries)
    }
}

/// Normalise the variable article containers used by the API.
///
/// Historically either `{"article": [...]}` or
/// `{"articles": {"article": [...]}}` depending on the endpoint, with the
/// degenerate single-object case allowed in both positions.
fn extract_articles(payload: &Value) -> Vec<&Value> {
    fn collect<'a>(articles: &mut Vec<&'a Value>, candidate: &'a Value) {
        match candidate {
            Value::Object(_) => articles.push(candidate),
            Value::Array(items) => articles.extend(items.iter().filter(|i| i.is_object())),
            _ => {}
        }
    }

    let Some(map) = payload.as_object() else {
        return Vec::new();
    };

    let mut articles = Vec::new();
    if let Some(direct) = map.get("article") {
        collect(&mut articles, direct);
    }
    match map.get("articles") {
        Some(Value::Object(container)) => {
            if let Some(nested) = container.get("article") {
                collect(&mut articles, nested);
            }
        }
        Some(Value::Array(items)) => {
            for item in items {
                collect(&mut articles, item);
            }
        }
        _ => {}
    }

    articles
}

fn matches_filter(article: &Value, filter: &FilterCriteria) -> bool {
    if let Some(language) = filter.language() {
        if !article_language(article)
            .map(|l| l.eq_ignore_ascii_case(language))
            .unwrap_or(false)
        {
            return false;
        }
    }
    if let Some(condition) = filter.condition() {
        if !article_condition(article)
            .map(|c| c.eq_ignore_ascii_case(condition))
            .unwrap_or(false)
        {
            return false;
        }
    }
    article_quantity(article) >= filter.min_quantity()
}

fn article_language(article: &Value) -> Option<String> {
    match article.get("language") {
        Some(Value::Object(info)) => info
            .get("abbreviation")
            .or_else(|| info.get("languageName"))
            .and_then(Value::as_str)
            .map(str::to_string),
        Some(Value::String(s)) => Some(s.clone()),
        _ => None,
    }
}

fn article_condition(article: &Value) -> Option<String> {
    match article.get("condition") {
        Some(Value::String(s)) => Some(s.clone()),
        Some(other) if !other.is_null() => Some(other.to_string()),
        _ => None,
    }
}

fn article_price(article: &Value) -> Option<Decimal> {
    let value = match article.get("price") {
        Some(Value::Object(price)) => price.get("value").or_else(|| price.get("eur"))?,
        Some(other) => other,
        None => return None,
    };

    match value {
        Value::String(s) => s.parse().ok(),
        Value::Number(n) => n.to_string().parse().ok(),
        _ => None,
    }
}

fn article_quantity(article: &Value) -> u32 {
    for key in ["count", "quantity", "available", "stock"] {
        if let Some(value) = article.get(key) {
            let parsed = match value {
                Value::Number(n) => n.as_u64(),
                Value::String(s) => s.parse().ok(),
                _ => None,
            };
            if let Some(quantity) = parsed {
                return u32::try_from(quantity).unwrap_or(u32::MAX);
            }
        }
    }
    0
}

fn article_listing_id(article: &Value) -> Option<String> {
    match article.get("seller") {
        Some(Value::Object(seller)) => ["username", "name", "user"]
            .iter()
            .find_map(|key| seller.get(*key))
            .and_then(Value::as_str)
            .map(str::to_string),
        Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn extracts_articles_from_both_container_shapes() {
        let flat = json!({"article": [{"price": 1.0}, {"price": 2.0}]});
        assert_eq!(extract_articles(&flat).len(), 2);

        let nested = json!({"articles": {"article": {"price": 1.0}}});
        assert_eq!(extract_articles(&nested).len(), 1);

        let list = json!({"articles": [{"price": 1.0}, "junk", {"price": 2.0}]});
        assert_eq!(extract_articles(&list).len(), 2);
    }

    #[test]
    fn non_object_payload_yields_no_articles() {
        assert!(extract_articles(&json!([1, 2, 3])).is_empty());
        assert!(extract_articles(&json!("nope")).is_empty());
    }

    #[test]
    fn price_accepts_object_and_bare_forms() {
        assert_eq!(
            article_price(&json!({"price": {"value": "8.00"}})),
            Some(dec!(8.00))
        );
        assert_eq!(
            article_price(&json!({"price": {"eur": 7.5}})),
            Some(dec!(7.5))
        );
        assert_eq!(article_price(&json!({"price": 3.25})), Some(dec!(3.25)));
        assert_eq!(article_price(&json!({"price": null})), None);
        assert_eq!(article_price(&json!({})), None);
    }

    #[test]
    fn quantity_takes_first_recognized_key() {
        assert_eq!(article_quantity(&json!({"count": 3})), 3);
        assert_eq!(article_quantity(&json!({"quantity": "5"})), 5);
        assert_eq!(article_quantity(&json!({"stock": 2, "count": 7})), 7);
        assert_eq!(article_quantity(&json!({})), 0);
    }

    #[test]
    fn listing_id_prefers_seller_username() {
        assert_eq!(
            article_listing_id(&json!({"seller": {"username": "shop-a", "name": "x"}})),
            Some("shop-a".to_string())
        );
        assert_eq!(
            article_listing_id(&json!({"seller": "shop-b"})),
            Some("shop-b".to_string())
        );
        assert_eq!(article_listing_id(&json!({})), None);
    }

    #[test]
    fn language_filter_matches_abbreviation_case_insensitively() {
        let article = json!({
            "language": {"abbreviation": "en", "languageName": "English"},
            "condition": "NM",
            "count": 2,
        });
        let filter = FilterCriteria::new(Some("EN".into()), Some("nm".into()), 1);
        assert!(matches_filter(&article, &filter));

        let stricter = FilterCriteria::new(Some("DE".into()), None, 1);
        assert!(!matches_filter(&article, &stricter));
    }

    #[test]
    fn quantity_floor_applies_in_filter() {
        let article = json!({"condition": "NM", "count": 1});
        let filter = FilterCriteria::new(None, None, 2);
        assert!(!matches_filter(&article, &filter));
    }
}
