use time::{macros::format_description, PrimitiveDateTime};

use crate::error::{AppError, AppResult};

/// House count the baseline load is calibrated for.
pub const DEFAULT_HOUSES: u32 = 5567;
const BASE_LOAD_KWH: f64 = 1500.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PredictionInput {
    pub timestamp: PrimitiveDateTime,
    pub houses: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub formatted_timestamp: String,
    pub houses: u32,
    pub kwh: f64,
}

impl PredictionInput {
    /// Parse raw form fields: `YYYY-M-D`, `H:M` (24-hour, leading zeros optional),
    /// and an optional house count.
    pub fn parse(date: &str, time: &str, houses: &str) -> AppResult<Self> {
        let (date, time, houses) = (date.trim(), time.trim(), houses.trim());
        if date.is_empty() || time.is_empty() {
            return Err(AppError::invalid("Date and time are required."));
        }

        let malformed = || AppError::invalid("Invalid date or time format.");

        // `[year]` alone would take a sign or extra digits.
        let year = date.split('-').next().unwrap_or_default();
        if year.len() != 4 || !year.bytes().all(|b| b.is_ascii_digit()) {
            return Err(malformed());
        }

        let timestamp = PrimitiveDateTime::parse(
            &format!("{date} {time}"),
            format_description!(
                "[year]-[month padding:none]-[day padding:none] [hour padding:none]:[minute padding:none]"
            ),
        )
        .map_err(|_| malformed())?;

        let houses = if houses.is_empty() {
            DEFAULT_HOUSES
        } else {
            match houses.parse::<u32>() {
                Ok(n) if n > 0 => n,
                _ => {
                    return Err(AppError::invalid(
                        "Number of houses must be a positive integer.",
                    ))
                }
            }
        };

        Ok(Self { timestamp, houses })
    }
}

/// Placeholder load estimate; scales a fixed baseline by time of day and season.
pub fn estimate_kwh(timestamp: PrimitiveDateTime, houses: u32) -> f64 {
    let hour = f64::from(timestamp.hour());
    let winter = matches!(u8::from(timestamp.month()), 12 | 1 | 2);

    let hour_factor = 1.0 + 0.3 * (hour - 12.0).abs() / 12.0;
    let season_factor = 1.0 + 0.2 * if winter { 1.0 } else { -0.1 };
    let kwh = BASE_LOAD_KWH
        * hour_factor
        * season_factor
        * (f64::from(houses) / f64::from(DEFAULT_HOUSES));
    (kwh * 100.0).round() / 100.0
}

pub fn predict(input: PredictionInput) -> Prediction {
    let formatted_timestamp = input
        .timestamp
        .format(format_description!(
            "[weekday], [month repr:long] [day], [year] at [hour]:[minute]"
        ))
        .unwrap_or_else(|_| input.timestamp.to_string());
    Prediction {
        formatted_timestamp,
        houses: input.houses,
        kwh: estimate_kwh(input.timestamp, input.houses),
    }
}
