use futures::future::{FutureExt, LocalBoxFuture};
use gloo_net::http::Request;

use super::dto::RestErrorBody;
use crate::config::FeedConfig;
use crate::domain::{
    errors::{AppError, FeedResult},
    logging::{LogComponent, get_logger},
    market_data::{PriceFeed, PriceSample},
};

/// PostgREST reader for the price table
#[derive(Debug, Clone)]
pub struct SupabaseRestClient {
    base_url: String,
    api_key: String,
    table: String,
    order_column: String,
}

impl SupabaseRestClient {
    pub fn new(config: &FeedConfig) -> Self {
        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            table: config.table.clone(),
            order_column: config.order_column.clone(),
        }
    }

    /// `select=*` ordered ascending by the creation column.
    pub fn select_url(&self) -> String {
        format!("{}/rest/v1/{}?select=*&order={}.asc", self.base_url, self.table, self.order_column)
    }

    pub async fn fetch_samples(&self) -> FeedResult<Vec<PriceSample>> {
        let url = self.select_url();
        get_logger().debug(LogComponent::Infrastructure("SupabaseRest"), &format!("📡 GET {url}"));

        let response = Request::get(&url)
            .header("apikey", &self.api_key)
            .header("Authorization", &format!("Bearer {}", self.api_key))
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| AppError::NetworkError(format!("Failed to send request: {e}")))?;

        if !response.ok() {
            let status = response.status();
            let message = match response.json::<RestErrorBody>().await {
                Ok(body) => body.describe(),
                Err(_) => format!("HTTP error: {} - {}", status, response.status_text()),
            };
            get_logger().error(
                LogComponent::Infrastructure("SupabaseRest"),
                &format!("❌ Read of {} failed: {message}", self.table),
            );
            return Err(AppError::FeedError(message));
        }

        let samples: Vec<PriceSample> = response
            .json()
            .await
            .map_err(|e| AppError::FeedError(format!("Failed to parse JSON: {e}")))?;

        get_logger().info(
            LogComponent::Infrastructure("SupabaseRest"),
            &format!("✅ Loaded {} rows from {}", samples.len(), self.table),
        );
        Ok(samples)
    }
}

impl PriceFeed for SupabaseRestClient {
    fn fetch_all(&self) -> LocalBoxFuture<'static, FeedResult<Vec<PriceSample>>> {
        let client = self.clone();
        async move { client.fetch_samples().await }.boxed_local()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn select_url_orders_by_creation_time() {
        let config = FeedConfig { base_url: "https://abc.supabase.co/".into(), ..FeedConfig::default() };
        let client = SupabaseRestClient::new(&config);
        assert_eq!(
            client.select_url(),
            "https://abc.supabase.co/rest/v1/brent_crude?select=*&order=created_at.asc"
        );
    }
}
