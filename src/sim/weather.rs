use chrono::{DateTime, Duration, FixedOffset};
use rand::Rng;

use super::signal;
use crate::models::{WeatherCondition, WeatherDay};

const FORECAST_DAYS: i64 = 5;

struct Category {
    condition: WeatherCondition,
    probability: f64,
    temp_c: (f64, f64),
}

const CATEGORIES: [Category; 5] = [
    Category {
        condition: WeatherCondition::Sunny,
        probability: 0.30,
        temp_c: (28.0, 35.0),
    },
    Category {
        condition: WeatherCondition::Cloudy,
        probability: 0.30,
        temp_c: (24.0, 30.0),
    },
    Category {
        condition: WeatherCondition::PartlyCloudy,
        probability: 0.20,
        temp_c: (26.0, 32.0),
    },
    Category {
        condition: WeatherCondition::Rain,
        probability: 0.15,
        temp_c: (20.0, 28.0),
    },
    Category {
        condition: WeatherCondition::HeavyRain,
        probability: 0.05,
        temp_c: (18.0, 25.0),
    },
];

/// Cumulative-probability scan: first category whose running sum reaches
/// `draw`.
///
/// A draw the scan leaves unmatched (the float sum of the table can land just
/// short of the draw) falls back to the first category, sunny.
pub fn pick_condition(draw: f64) -> WeatherCondition {
    // ---
    let mut cumulative = 0.0;
    for category in &CATEGORIES {
        cumulative += category.probability;
        if draw <= cumulative {
            return category.condition;
        }
    }
    CATEGORIES[0].condition
}

fn temp_range(condition: WeatherCondition) -> (f64, f64) {
    CATEGORIES
        .iter()
        .find(|c| c.condition == condition)
        .map(|c| c.temp_c)
        .unwrap_or(CATEGORIES[0].temp_c)
}

/// Five-day forecast starting at the day of `at`.
pub fn simulate_weather<R>(rng: &mut R, at: DateTime<FixedOffset>) -> Vec<WeatherDay>
where
    R: Rng + ?Sized,
{
    // ---
    (0..FORECAST_DAYS)
        .map(|i| {
            let date = at + Duration::days(i);
            let condition = pick_condition(rng.gen::<f64>());
            let (min, max) = temp_range(condition);
            WeatherDay {
                day: date.format("%a").to_string(),
                condition,
                temperature_c: signal::random_in_range(&mut *rng, min, max).round() as i64,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;
    use crate::sim::testing::{at, rng};

    #[test]
    fn probabilities_sum_to_one() {
        // ---
        let total: f64 = CATEGORIES.iter().map(|c| c.probability).sum();
        assert!((total - 1.0).abs() < 1e-9);
    }

    #[test]
    fn cumulative_scan_boundaries() {
        // ---
        assert_eq!(pick_condition(0.0), WeatherCondition::Sunny);
        assert_eq!(pick_condition(0.30), WeatherCondition::Sunny);
        assert_eq!(pick_condition(0.31), WeatherCondition::Cloudy);
        assert_eq!(pick_condition(0.75), WeatherCondition::PartlyCloudy);
        assert_eq!(pick_condition(0.90), WeatherCondition::Rain);
        assert_eq!(pick_condition(0.99), WeatherCondition::HeavyRain);
    }

    #[test]
    fn unmatched_draw_falls_back_to_sunny() {
        // ---
        assert_eq!(pick_condition(1.01), WeatherCondition::Sunny);
        assert_eq!(pick_condition(1.5), WeatherCondition::Sunny);
    }

    #[test]
    fn five_days_labelled_from_start_day() {
        // ---
        // 2025-03-14 is a Friday
        let days = simulate_weather(&mut rng(41), at(3, 14, 23, 59));
        let labels: Vec<_> = days.iter().map(|d| d.day.as_str()).collect();
        assert_eq!(labels, ["Fri", "Sat", "Sun", "Mon", "Tue"]);
    }

    #[test]
    fn temperatures_stay_in_category_range() {
        // ---
        let mut rng = rng(42);
        for _ in 0..200 {
            for day in simulate_weather(&mut rng, at(3, 14, 8, 0)) {
                let (min, max) = temp_range(day.condition);
                let t = day.temperature_c as f64;
                assert!(t >= min && t <= max, "{:?} at {t}", day.condition);
            }
        }
    }
}
