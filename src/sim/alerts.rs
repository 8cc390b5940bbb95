use chrono::{DateTime, FixedOffset, Timelike};
use rand::Rng;
use uuid::Builder;

use crate::models::{Alert, AlertKind};

const DYNAMIC_ALERT_CHANCE: f64 = 0.4;

fn alert(
    id: String,
    kind: AlertKind,
    title: &str,
    location: &str,
    time: String,
    icon: &str,
    actions: (&str, &str),
) -> Alert {
    Alert {
        id,
        kind,
        title: title.to_string(),
        location: location.to_string(),
        time,
        icon: icon.to_string(),
        primary_action: actions.0.to_string(),
        secondary_action: actions.1.to_string(),
    }
}

fn seed_alerts() -> Vec<Alert> {
    vec![
        alert(
            "1".into(),
            AlertKind::Warning,
            "Potential Water Leak Detected",
            "Northern Sector - Pipeline Junction B7",
            "10 min ago".into(),
            "fas fa-exclamation-triangle",
            ("Dispatch", "Ignore"),
        ),
        alert(
            "2".into(),
            AlertKind::Danger,
            "Power Outage Warning",
            "East Grid - Sector 4",
            "25 min ago".into(),
            "fas fa-bolt",
            ("Fix Now", "Ignore"),
        ),
        alert(
            "3".into(),
            AlertKind::Info,
            "Scheduled Maintenance Alert",
            "Solar Panel Array - Module 12",
            "2 hours ago".into(),
            "fas fa-info-circle",
            ("Schedule", "Postpone"),
        ),
    ]
}

/// Random v4 UUID drawn from the caller's generator.
fn alert_id<R>(rng: &mut R) -> String
where
    R: Rng + ?Sized,
{
    Builder::from_random_bytes(rng.gen()).into_uuid().to_string()
}

/// Three standing alerts plus time-of-day alerts that fire 40% of the time.
pub fn simulate_alerts<R>(rng: &mut R, at: DateTime<FixedOffset>) -> Vec<Alert>
where
    R: Rng + ?Sized,
{
    // ---
    let mut alerts = seed_alerts();
    let hour = at.hour();
    let clock = format!("{}:{:02}", hour, at.minute());

    if (7..=9).contains(&hour) && rng.gen_bool(DYNAMIC_ALERT_CHANCE) {
        alerts.push(alert(
            alert_id(rng),
            AlertKind::Warning,
            "Morning Peak Energy Usage",
            "All Sectors - Residential Areas",
            clock.clone(),
            "fas fa-lightbulb",
            ("Optimize", "Ignore"),
        ));
    }

    if (17..=19).contains(&hour) && rng.gen_bool(DYNAMIC_ALERT_CHANCE) {
        alerts.push(alert(
            alert_id(rng),
            AlertKind::Info,
            "Smart Irrigation Activated",
            "South Fields - Zones 3, 4, 7",
            clock,
            "fas fa-tint",
            ("View", "Postpone"),
        ));
    }

    alerts
}
