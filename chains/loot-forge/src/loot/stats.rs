//! Stat string parsing.
//!
//! Turns loot service text such as `"Damage: 10-20"` or `"Crit Chance 5%"`
//! into [`Attribute`] records. Anything that does not fit the
//! `<name> <int>[-<int>][%]` shape is dropped without an error.

use super::Attribute;
use once_cell::sync::Lazy;
use regex::Regex;

pub const SUB_STAT_PREFIX: &str = "sub_stats_";

static STAT_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(.*?)\s*([+-]?[0-9]+)(-)?([0-9]+)?(%?)$").expect("stat pattern is valid")
});

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));

/// Parses one stat string. `is_main` controls the `sub_stats_` prefix.
pub fn parse_stat(input: Option<&str>, is_main: bool) -> Vec<Attribute> {
    let Some(text) = input else {
        return Vec::new();
    };
    let Some(caps) = STAT_PATTERN.captures(text) else {
        return Vec::new();
    };

    let stat_name = caps[1].replace(':', "");
    let base = display_base(&stat_name);
    let prefix = if is_main { "" } else { SUB_STAT_PREFIX };
    let percent = &caps[5] == "%";

    let Some(first) = format_value(&caps[2], percent) else {
        return Vec::new();
    };

    match (caps.get(3), caps.get(4)) {
        (Some(_), Some(second)) => {
            let Some(second) = format_value(second.as_str(), percent) else {
                return Vec::new();
            };
            vec![
                Attribute::new(
                    format!("{}{}_min", prefix, base),
                    format!("{} Minimum", stat_name),
                    first,
                ),
                Attribute::new(
                    format!("{}{}_max", prefix, base),
                    format!("{} Maximum", stat_name),
                    second,
                ),
            ]
        }
        (None, None) => vec![Attribute::new(
            format!("{}{}", prefix, base),
            stat_name,
            first,
        )],
        // dangling "-" or a second number without one
        _ => Vec::new(),
    }
}

/// Lower-cases the name and collapses every whitespace run into `_`.
fn display_base(stat_name: &str) -> String {
    WHITESPACE
        .replace_all(&stat_name.to_lowercase(), "_")
        .into_owned()
}

fn format_value(digits: &str, percent: bool) -> Option<String> {
    let value: i64 = digits.parse().ok()?;
    Some(if percent {
        format!("{}%", value)
    } else {
        value.to_string()
    })
}
