//! Keyword-driven assistant replies.
//!
//! Rules are scanned in order and the first rule with any keyword contained
//! in the lower-cased message answers. Each rule re-runs the relevant
//! generators so replies quote live values.

use chrono::{DateTime, FixedOffset};
use rand::RngCore;

use crate::models::{ChatReply, StatusLevel};
use crate::sim;

pub const FALLBACK_REPLY: &str =
    "I'm analyzing the data now. Is there anything specific you'd like to know about?";

type Responder = fn(&mut dyn RngCore, DateTime<FixedOffset>, &str) -> String;

/// One entry of the ordered rule table.
pub struct ChatRule {
    pub topic: &'static str,
    pub keywords: &'static [&'static str],
    respond: Responder,
}

pub static RULES: [ChatRule; 5] = [
    ChatRule {
        topic: "water",
        keywords: &["water", "leak", "flow"],
        respond: water_reply,
    },
    ChatRule {
        topic: "energy",
        keywords: &["energy", "power", "solar", "battery"],
        respond: energy_reply,
    },
    ChatRule {
        topic: "agriculture",
        keywords: &["agriculture", "irrigation", "farm", "soil"],
        respond: agriculture_reply,
    },
    ChatRule {
        topic: "weather",
        keywords: &["weather", "forecast", "temperature"],
        respond: weather_reply,
    },
    ChatRule {
        topic: "system",
        keywords: &["system", "overall", "status"],
        respond: system_reply,
    },
];

/// First rule whose keywords appear in `message`, ignoring case.
pub fn matching_rule(message: &str) -> Option<&'static ChatRule> {
    let lower = message.to_lowercase();
    RULES
        .iter()
        .find(|rule| rule.keywords.iter().any(|k| lower.contains(k)))
}

/// Answer `message` from the local simulation.
pub fn respond(rng: &mut dyn RngCore, message: &str, at: DateTime<FixedOffset>) -> ChatReply {
    // ---
    let lower = message.to_lowercase();
    let response = match matching_rule(&lower) {
        Some(rule) => {
            tracing::debug!(topic = rule.topic, "chat rule matched");
            (rule.respond)(rng, at, &lower)
        }
        None => FALLBACK_REPLY.to_string(),
    };

    ChatReply {
        response,
        timestamp: at.timestamp_millis(),
    }
}

// ---

fn water_reply(rng: &mut dyn RngCore, at: DateTime<FixedOffset>, lower: &str) -> String {
    let water = sim::simulate_water(rng, at);
    let mut reply = format!(
        "The water supply system is currently running at {}% capacity with a flow rate of {}L/m. Water quality is at {}%.",
        water.reservoir, water.flow, water.quality
    );
    if lower.contains("leak") {
        reply.push_str(
            " There's a potential leak detected in the northern sector that needs investigation. \
             Would you like me to dispatch a maintenance alert?",
        );
    }
    reply
}

fn energy_reply(rng: &mut dyn RngCore, at: DateTime<FixedOffset>, _lower: &str) -> String {
    let energy = sim::simulate_energy(rng, at);
    let grid_usage = if energy.grid < 3.0 { "minimal" } else { "moderate" };
    format!(
        "Energy consumption is currently {}. Solar panels are generating {:.1} kW and battery storage is at {}%. Grid usage is {} at this time.",
        energy.status, energy.solar, energy.battery, grid_usage
    )
}

fn agriculture_reply(rng: &mut dyn RngCore, at: DateTime<FixedOffset>, _lower: &str) -> String {
    let agriculture = sim::simulate_agriculture(rng, at);
    let irrigation = sim::simulate_irrigation(rng, at);

    let active: Vec<&str> = irrigation
        .zones
        .iter()
        .filter(|z| z.active)
        .filter_map(|z| z.name.split(' ').next())
        .collect();
    let system = if active.is_empty() {
        "currently inactive".to_string()
    } else {
        format!("active in {} zones", active.join(" and "))
    };
    let soil = if agriculture.soil > 40 {
        "within optimal range"
    } else {
        "below optimal range"
    };

    format!(
        "The smart irrigation system is {}. Soil moisture levels are at {}%, which is {}. {}",
        system, agriculture.soil, soil, irrigation.recommendation
    )
}

fn weather_reply(rng: &mut dyn RngCore, at: DateTime<FixedOffset>, _lower: &str) -> String {
    let forecast = sim::simulate_weather(rng, at);
    let [today, _, third, ..] = forecast.as_slice() else {
        return FALLBACK_REPLY.to_string();
    };

    let conditions = if today.condition.is_sunny() {
        "sunny"
    } else if today.condition.is_rainy() {
        "rainy"
    } else {
        "cloudy"
    };
    let outlook = if third.condition.is_rainy() {
        format!(
            "There's a chance of rain on {} which should help with water conservation. \
             I've already adjusted irrigation schedules accordingly.",
            third.day
        )
    } else {
        let trend = if forecast.iter().all(|d| d.condition.is_sunny()) {
            "consistently sunny"
        } else {
            "mixed"
        };
        format!("The next few days look {trend}. I'll optimize irrigation based on this forecast.")
    };

    format!(
        "The weather forecast shows {} conditions today with a high of {}°C. {}",
        conditions, today.temperature_c, outlook
    )
}

fn system_reply(rng: &mut dyn RngCore, at: DateTime<FixedOffset>, _lower: &str) -> String {
    let dashboard = sim::simulate_dashboard(rng, at);
    let statuses = [
        (dashboard.energy.status, "Energy systems need attention. "),
        (dashboard.water.status, "Water systems need monitoring. "),
        (
            dashboard.agriculture.status,
            "Agricultural systems require adjustment. ",
        ),
    ];

    let overall = if statuses.iter().all(|(s, _)| *s == StatusLevel::Optimal) {
        "optimal"
    } else {
        "requiring attention"
    };
    let notes: String = statuses
        .iter()
        .filter(|(s, _)| *s != StatusLevel::Optimal)
        .map(|(_, note)| *note)
        .collect();

    format!(
        "Overall system status is {overall}. {notes}Would you like detailed information about a specific subsystem?"
    )
}
