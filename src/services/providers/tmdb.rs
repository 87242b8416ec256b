/// TMDB (The Movie Database) metadata provider
///
/// API Flow:
/// 1. Details: /movie/{id}?api_key=…&language=… → title, poster path, rating,
///    release date and genres
/// 2. Posters are served from the image CDN as {image_url}/{size}/{poster_path}
use crate::{
    error::{AppError, AppResult},
    models::{DetailTier, DisplayRecord, MovieId, TmdbMovieDetails},
    services::providers::MetadataProvider,
};
use reqwest::Client as HttpClient;
use std::time::Duration;

#[derive(Clone)]
pub struct TmdbProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    image_url: String,
    language: String,
}

impl TmdbProvider {
    /// Creates a new TMDB provider whose requests give up after `timeout`
    pub fn new(
        api_key: String,
        api_url: String,
        image_url: String,
        language: String,
        timeout: Duration,
    ) -> AppResult<Self> {
        let http_client = HttpClient::builder().timeout(timeout).build()?;

        Ok(Self {
            http_client,
            api_key,
            api_url,
            image_url,
            language,
        })
    }

    fn movie_url(&self, id: MovieId) -> String {
        format!("{}/movie/{}", self.api_url.trim_end_matches('/'), id)
    }
}

#[async_trait::async_trait]
impl MetadataProvider for TmdbProvider {
    async fn fetch_details(&self, id: MovieId, tier: DetailTier) -> AppResult<DisplayRecord> {
        let response = self
            .http_client
            .get(self.movie_url(id))
            .query(&[
                ("api_key", self.api_key.as_str()),
                ("language", self.language.as_str()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(AppError::ExternalApi(format!(
                "TMDB API returned status {} for movie {}",
                status, id
            )));
        }

        let response_text = response.text().await?;

        let details: TmdbMovieDetails = serde_json::from_str(&response_text).map_err(|e| {
            tracing::debug!(
                error = %e,
                movie_id = id,
                response = %response_text,
                "Failed to deserialize TMDB response"
            );
            AppError::ExternalApi(format!("Failed to parse TMDB response: {}", e))
        })?;

        let record = details.into_display_record(&self.image_url, tier);

        tracing::debug!(
            movie_id = id,
            tier = %tier,
            title = %record.title,
            provider = "tmdb",
            "Movie details fetched"
        );

        Ok(record)
    }

    fn name(&self) -> &'static str {
        "tmdb"
    }
}
