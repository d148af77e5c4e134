//! Date and time labels for the assembled forecast.
//!
//! All labels are rendered in the timezone of the `now` value passed in.
//! Production callers pass the system local clock, so forecast days are
//! interpreted in the server's timezone rather than the forecast location's.

use chrono::{DateTime, TimeZone, Timelike};
use std::fmt::Display;

use crate::{
    ForecastError,
    model::{
        Coordinates, DailyConditions, DayForecast, FORECAST_DAYS, ForecastResult, TodayForecast,
        WeatherFields,
    },
};

/// 12-hour clock label such as `"3:07 PM"`.
///
/// Hour 0 is rendered as `0`, not `12`.
pub fn clock_label(hour: u32, minute: u32) -> String {
    let (hour, meridiem) = match hour {
        12 => (12, "PM"),
        h if h > 12 => (h - 12, "PM"),
        h => (h, "AM"),
    };

    format!("{hour}:{minute:02} {meridiem}")
}

/// Upper-cased long date, e.g. `"MON JAN 01 2024"`.
pub fn date_label<Tz>(now: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    now.format("%a %b %d %Y").to_string().to_uppercase()
}

/// Day-of-week (`"Tue"`) and month-day (`"Jan 02"`) labels for a unix timestamp.
pub fn day_labels<Tz>(epoch: i64, tz: &Tz) -> Option<(String, String)>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let date = tz.timestamp_opt(epoch, 0).single()?;
    Some((date.format("%a").to_string(), date.format("%b %d").to_string()))
}

/// Combine resolved coordinates and weather fields into the final result.
pub fn annotate<Tz>(
    coords: Coordinates,
    weather: WeatherFields,
    now: &DateTime<Tz>,
) -> Result<ForecastResult, ForecastError>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let tz = now.timezone();

    let days: Vec<DayForecast> = weather
        .days
        .into_iter()
        .map(|day| annotate_day(day, &tz))
        .collect::<Result<_, _>>()?;

    let days: [DayForecast; FORECAST_DAYS] = days
        .try_into()
        .map_err(|_| ForecastError::pipeline("forecast horizon changed during annotation"))?;

    Ok(ForecastResult {
        place_name: coords.display_name,
        latitude: coords.latitude,
        longitude: coords.longitude,
        temp_unit: weather.temp_unit.label(),
        week_summary: weather.week_summary,
        today: TodayForecast {
            conditions: weather.today,
            current_time: clock_label(now.hour(), now.minute()),
            current_date: date_label(now),
        },
        days,
    })
}

fn annotate_day<Tz>(day: DailyConditions, tz: &Tz) -> Result<DayForecast, ForecastError>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let (day_of_week, date) = day_labels(day.time, tz).ok_or_else(|| {
        ForecastError::pipeline(format!("forecast timestamp {} is out of range", day.time))
    })?;

    Ok(DayForecast {
        apparent_high: day.apparent_high,
        high: day.high,
        low: day.low,
        precip_probability: day.precip_probability,
        humidity: day.humidity,
        summary: day.summary,
        icon: day.icon,
        time: day.time,
        day_of_week,
        date,
    })
}
