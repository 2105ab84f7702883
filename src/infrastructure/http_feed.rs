// HTTP/JSON adapter for the remote telemetry feed
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::application::telemetry_feed::{FeedError, FeedRecord, FeedSample, TelemetryFeed};
use crate::domain::telemetry::TelemetryChannel;

/// Feed client over the service's REST endpoints. One method call is one
/// request attempt; the telemetry service layers the retry burst on top.
#[derive(Debug, Clone)]
pub struct HttpTelemetryFeed {
    base_url: String,
    api_key: Option<String>,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct LatestReadingDto {
    created_at: String,
    ac_power: f32,
    ac_voltage: f32,
    ac_frequency: f32,
    temperature: f32,
    efficiency: f32,
    cumulative_yield: f32,
}

#[derive(Debug, Deserialize)]
struct HistorySampleDto {
    created_at: String,
    value: f64,
}

impl HttpTelemetryFeed {
    pub fn new(base_url: String, api_key: Option<String>) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            client: reqwest::Client::new(),
        }
    }

    fn latest_url(&self) -> String {
        self.build_url(format!("{}/feeds/latest.json", self.base_url), &[])
    }

    fn history_url(&self, channel: TelemetryChannel, median_minutes: u32, range_minutes: u32) -> String {
        let path = format!(
            "{}/feeds/{}/history.json",
            self.base_url,
            urlencoding::encode(channel.feed_name())
        );
        self.build_url(
            path,
            &[
                ("median", median_minutes.to_string()),
                ("minutes", range_minutes.to_string()),
            ],
        )
    }

    fn build_url(&self, path: String, params: &[(&str, String)]) -> String {
        let mut pairs: Vec<String> = params
            .iter()
            .map(|(key, value)| format!("{}={}", key, urlencoding::encode(value)))
            .collect();
        if let Some(key) = &self.api_key {
            pairs.push(format!("api_key={}", urlencoding::encode(key)));
        }
        if pairs.is_empty() {
            path
        } else {
            format!("{}?{}", path, pairs.join("&"))
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, FeedError> {
        let response = self
            .client
            .get(url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| FeedError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            return Err(FeedError::Status(response.status().as_u16()));
        }

        response.json::<T>().await.map_err(|e| FeedError::Parse(e.to_string()))
    }
}

#[async_trait]
impl TelemetryFeed for HttpTelemetryFeed {
    async fn latest_record(&self) -> Result<FeedRecord, FeedError> {
        tracing::debug!("Querying latest reading");
        let dto = self.get_json::<LatestReadingDto>(&self.latest_url()).await?;
        Ok(FeedRecord {
            created_at: parse_created_at(&dto.created_at)?,
            ac_power: dto.ac_power,
            ac_voltage: dto.ac_voltage,
            ac_frequency: dto.ac_frequency,
            temperature: dto.temperature,
            efficiency: dto.efficiency,
            cumulative_yield: dto.cumulative_yield,
        })
    }

    async fn channel_history(
        &self,
        channel: TelemetryChannel,
        median_minutes: u32,
        range_minutes: u32,
    ) -> Result<Vec<FeedSample>, FeedError> {
        tracing::debug!(
            "Querying {} history ({} min windows over {} min)",
            channel.feed_name(),
            median_minutes,
            range_minutes
        );
        let url = self.history_url(channel, median_minutes, range_minutes);
        let rows = self.get_json::<Vec<HistorySampleDto>>(&url).await?;
        let mut samples = Vec::with_capacity(rows.len());
        for row in rows {
            samples.push(FeedSample {
                created_at: parse_created_at(&row.created_at)?,
                value: row.value,
            });
        }
        Ok(samples)
    }
}

fn parse_created_at(raw: &str) -> Result<DateTime<Utc>, FeedError> {
    chrono::DateTime::parse_from_rfc3339(raw)
        .map(|timestamp| timestamp.with_timezone(&Utc))
        .map_err(|e| FeedError::Parse(format!("timestamp {:?}: {}", raw, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_history_url_carries_zoom_parameters() {
        let feed = HttpTelemetryFeed::new("http://feed.local/".to_string(), Some("k3y".to_string()));
        assert_eq!(
            feed.history_url(TelemetryChannel::AcPower, 5, 240),
            "http://feed.local/feeds/ac_power/history.json?median=5&minutes=240&api_key=k3y"
        );
    }

    #[test]
    fn test_latest_url_without_key_has_no_query() {
        let feed = HttpTelemetryFeed::new("http://feed.local".to_string(), None);
        assert_eq!(feed.latest_url(), "http://feed.local/feeds/latest.json");
    }

    #[test]
    fn test_latest_reading_parses() {
        let dto: LatestReadingDto = serde_json::from_str(
            r#"{
                "created_at": "2024-06-01T12:00:00Z",
                "ac_power": 1234.5,
                "ac_voltage": 231.2,
                "ac_frequency": 49.98,
                "temperature": 43.1,
                "efficiency": 96.7,
                "cumulative_yield": 8542.3
            }"#,
        )
        .unwrap();
        assert_eq!(dto.ac_power, 1234.5);
        assert_eq!(dto.cumulative_yield, 8542.3);
    }

    #[test]
    fn test_history_rows_parse_in_order() {
        let rows: Vec<HistorySampleDto> = serde_json::from_str(
            r#"[
                {"created_at": "2024-06-01T11:00:00Z", "value": 10.0},
                {"created_at": "2024-06-01T12:00:00Z", "value": 20.0}
            ]"#,
        )
        .unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].value, 10.0);
    }

    #[test]
    fn test_timestamps_convert_to_utc() {
        let parsed = parse_created_at("2024-06-01T12:00:00+02:00").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2024, 6, 1, 10, 0, 0).unwrap());
        assert!(parse_created_at("yesterday-ish").is_err());
    }
}
