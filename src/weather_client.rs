use async_trait::async_trait;
use serde::{de::DeserializeOwned, Deserialize};

use crate::errors::AppError;

const OPENWEATHER_API_BASE: &str = "https://api.openweathermap.org/data/2.5";

/// Unit system for upstream queries and report rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Units {
    Metric,
    Imperial,
    Kelvin,
}

impl Units {
    pub fn upstream_param(&self) -> &'static str {
        match self {
            Self::Metric => "metric",
            Self::Imperial => "imperial",
            Self::Kelvin => "standard",
        }
    }

    pub fn temperature_symbol(&self) -> &'static str {
        match self {
            Self::Metric => "°C",
            Self::Imperial => "°F",
            Self::Kelvin => "K",
        }
    }

    pub fn wind_speed_symbol(&self) -> &'static str {
        match self {
            Self::Imperial => "mph",
            Self::Metric | Self::Kelvin => "m/s",
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CurrentConditions {
    pub name: String,
    pub main: ConditionMetrics,
    #[serde(default)]
    pub weather: Vec<ConditionSummary>,
    pub wind: WindMetrics,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConditionMetrics {
    pub temp: f64,
    pub feels_like: f64,
    pub humidity: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConditionSummary {
    pub description: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WindMetrics {
    pub speed: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ForecastResponse {
    pub list: Vec<ForecastSample>,
    pub city: ForecastCity,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ForecastSample {
    pub dt: i64,
    pub main: ConditionMetrics,
    #[serde(default)]
    pub weather: Vec<ConditionSummary>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ForecastCity {
    pub name: String,
}

#[async_trait]
pub trait WeatherProvider: Send + Sync {
    async fn current_conditions(
        &self,
        location: &str,
        units: Units,
    ) -> Result<CurrentConditions, AppError>;

    async fn five_day_forecast(
        &self,
        location: &str,
        units: Units,
    ) -> Result<ForecastResponse, AppError>;
}

pub struct OpenWeatherClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl OpenWeatherClient {
    pub fn new(api_key: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: OPENWEATHER_API_BASE.to_string(),
            api_key,
        }
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        resource: &str,
        location: &str,
        units: Units,
    ) -> Result<T, AppError> {
        let url = format!("{}/{resource}", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[
                ("q", location),
                ("appid", self.api_key.as_str()),
                ("units", units.upstream_param()),
            ])
            .send()
            .await
            // without_url: the request URL carries the API key.
            .map_err(|err| AppError::upstream_unreachable(err.without_url()))?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(AppError::location_not_found(location));
        }
        if !status.is_success() {
            return Err(AppError::upstream_status(
                status.as_u16(),
                status.canonical_reason().unwrap_or(""),
            ));
        }

        response
            .json::<T>()
            .await
            .map_err(|err| AppError::upstream_malformed(err.without_url()))
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherClient {
    async fn current_conditions(
        &self,
        location: &str,
        units: Units,
    ) -> Result<CurrentConditions, AppError> {
        self.fetch("weather", location, units).await
    }

    async fn five_day_forecast(
        &self,
        location: &str,
        units: Units,
    ) -> Result<ForecastResponse, AppError> {
        self.fetch("forecast", location, units).await
    }
}
