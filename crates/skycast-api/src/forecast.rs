//! Grouping of forecast points by calendar date for display.
//!
//! A pure projection over the point sequence, recomputed every time it is
//! needed; nothing here is cached or stored.

use chrono::NaiveDate;

use crate::types::ForecastPoint;

/// Forecast points for one calendar date, in input order.
#[derive(Debug, Clone)]
pub struct DayForecast {
    pub date: NaiveDate,
    pub points: Vec<ForecastPoint>,
}

/// Group forecast points by the calendar date of their timestamp,
/// ordered by date.
pub fn group_by_date(points: &[ForecastPoint]) -> Vec<DayForecast> {
    let mut days: Vec<DayForecast> = Vec::new();

    for point in points {
        let date = point.forecast_time.date();
        match days.iter_mut().find(|day| day.date == date) {
            Some(day) => day.points.push(point.clone()),
            None => days.push(DayForecast {
                date,
                points: vec![point.clone()],
            }),
        }
    }

    days.sort_by_key(|day| day.date);
    days
}
