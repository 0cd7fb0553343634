//! Weather query validation, report rendering, and forecast day grouping

use chrono::{Local, TimeZone};
use serde::Deserialize;

use crate::{
    errors::AppError,
    weather_client::{CurrentConditions, ForecastSample, Units},
};

pub const MAX_FORECAST_DAYS: usize = 5;

/// Raw tool-call arguments before validation.
#[derive(Debug, Default, Deserialize)]
pub struct WeatherArguments {
    pub location: Option<String>,
    pub units: Option<String>,
}

/// Validated query handed to the weather provider.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherQuery {
    pub location: String,
    pub units: Units,
}

pub fn build_weather_query(arguments: WeatherArguments) -> Result<WeatherQuery, AppError> {
    let location = arguments
        .location
        .as_deref()
        .map(str::trim)
        .filter(|location| !location.is_empty())
        .ok_or_else(AppError::location_required)?
        .to_string();

    let units = normalize_units(arguments.units)?;
    Ok(WeatherQuery { location, units })
}

pub fn normalize_units(units: Option<String>) -> Result<Units, AppError> {
    let Some(value) = units else {
        return Ok(Units::Metric);
    };

    match value.trim().to_ascii_lowercase().as_str() {
        "metric" => Ok(Units::Metric),
        "imperial" => Ok(Units::Imperial),
        "kelvin" => Ok(Units::Kelvin),
        _ => Err(AppError::validation(
            "invalid_units",
            "Units must be one of: metric, imperial, kelvin",
        )),
    }
}

#[derive(Debug, Clone)]
pub struct WeatherReport {
    pub location_name: String,
    pub temperature: f64,
    pub feels_like: f64,
    pub condition: String,
    pub humidity_percent: u32,
    pub wind_speed: f64,
    pub units: Units,
}

impl WeatherReport {
    pub fn from_conditions(conditions: CurrentConditions, units: Units) -> Self {
        let condition = conditions
            .weather
            .first()
            .map(|summary| summary.description.clone())
            .unwrap_or_else(|| "unknown".to_string());

        Self {
            location_name: conditions.name,
            temperature: conditions.main.temp,
            feels_like: conditions.main.feels_like,
            condition,
            humidity_percent: conditions.main.humidity,
            wind_speed: conditions.wind.speed,
            units,
        }
    }

    pub fn render(&self) -> String {
        let symbol = self.units.temperature_symbol();
        format!(
            "Current weather in {}:\nTemperature: {}{symbol} (feels like {}{symbol})\nConditions: {}\nHumidity: {}%\nWind speed: {} {}",
            self.location_name,
            // round before casting so -0.4 prints as 0, not -0
            self.temperature.round() as i64,
            self.feels_like.round() as i64,
            self.condition,
            self.humidity_percent,
            self.wind_speed,
            self.units.wind_speed_symbol(),
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForecastDay {
    pub date_label: String,
    pub min_temperature: i64,
    pub max_temperature: i64,
    pub description: String,
    pub humidity_percent: u32,
}

struct DayBucket {
    label: String,
    min: f64,
    max: f64,
    description: String,
    humidity: u32,
}

/// Groups 3-hour forecast samples into per-date entries.
///
/// Dates are keyed by the host-local calendar date of each sample and kept
/// in first-seen order. The first sample of a date fixes its description
/// and humidity; temperatures accumulate into min/max. At most
/// [`MAX_FORECAST_DAYS`] entries are returned.
pub fn group_forecast_days(samples: &[ForecastSample]) -> Vec<ForecastDay> {
    let mut buckets: Vec<DayBucket> = Vec::new();

    for sample in samples {
        let label = local_date_label(sample.dt);
        match buckets.iter_mut().find(|bucket| bucket.label == label) {
            Some(bucket) => {
                bucket.min = bucket.min.min(sample.main.temp);
                bucket.max = bucket.max.max(sample.main.temp);
            }
            None => buckets.push(DayBucket {
                label,
                min: sample.main.temp,
                max: sample.main.temp,
                description: sample
                    .weather
                    .first()
                    .map(|summary| summary.description.clone())
                    .unwrap_or_else(|| "unknown".to_string()),
                humidity: sample.main.humidity,
            }),
        }
    }

    buckets
        .into_iter()
        .take(MAX_FORECAST_DAYS)
        .map(|bucket| ForecastDay {
            date_label: bucket.label,
            min_temperature: bucket.min.round() as i64,
            max_temperature: bucket.max.round() as i64,
            description: bucket.description,
            humidity_percent: bucket.humidity,
        })
        .collect()
}

pub fn local_date_label(timestamp: i64) -> String {
    Local
        .timestamp_opt(timestamp, 0)
        .single()
        .map(|moment| moment.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

pub fn render_forecast(city_name: &str, days: &[ForecastDay], units: Units) -> String {
    let symbol = units.temperature_symbol();
    let mut report = format!("5-day forecast for {city_name}:");
    for day in days {
        report.push_str(&format!(
            "\n\n{}:\n  Min: {}{symbol}, Max: {}{symbol}\n  Conditions: {}\n  Humidity: {}%",
            day.date_label,
            day.min_temperature,
            day.max_temperature,
            day.description,
            day.humidity_percent,
        ));
    }
    report
}
