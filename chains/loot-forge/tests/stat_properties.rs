use loot_forge::loot::parse_stat;
use loot_forge::loot::stats::SUB_STAT_PREFIX;
use proptest::prelude::*;

fn stat_name() -> impl Strategy<Value = String> {
    "[A-Z][a-z]{1,8}( [A-Z][a-z]{1,8}){0,2}"
}

fn single_word() -> impl Strategy<Value = String> {
    "[A-Z][a-z]{2,10}"
}

proptest! {
    #[test]
    fn percent_stat_yields_one_attribute(name in stat_name(), value in 0u32..100_000, is_main in any::<bool>()) {
        let attributes = parse_stat(Some(&format!("{} {}%", name, value)), is_main);

        prop_assert_eq!(attributes.len(), 1);
        prop_assert_eq!(&attributes[0].trait_type, &name);
        prop_assert!(attributes[0].value.ends_with('%'));
        prop_assert_eq!(attributes[0].value.trim_end_matches('%').parse::<u32>().unwrap(), value);
    }

    #[test]
    fn range_stat_yields_min_then_max(name in stat_name(), low in 0u32..10_000, high in 0u32..10_000) {
        let attributes = parse_stat(Some(&format!("{}: {}-{}", name, low, high)), true);

        prop_assert_eq!(attributes.len(), 2);
        prop_assert!(attributes[0].display_type.ends_with("_min"));
        prop_assert!(attributes[1].display_type.ends_with("_max"));
        prop_assert_eq!(attributes[0].value.clone(), low.to_string());
        prop_assert_eq!(attributes[1].value.clone(), high.to_string());
    }

    #[test]
    fn sub_prefix_tracks_main_flag(name in single_word(), value in 0u32..1_000, ranged in any::<bool>(), is_main in any::<bool>()) {
        let text = if ranged {
            format!("{} {}-{}", name, value, value + 1)
        } else {
            format!("{} {}", name, value)
        };

        let attributes = parse_stat(Some(&text), is_main);

        prop_assert!(!attributes.is_empty());
        for attribute in &attributes {
            prop_assert_eq!(attribute.display_type.starts_with(SUB_STAT_PREFIX), !is_main);
        }
    }

    #[test]
    fn text_without_digits_yields_nothing(text in "[A-Za-z :%-]{0,24}", is_main in any::<bool>()) {
        prop_assert!(parse_stat(Some(&text), is_main).is_empty());
    }
}

#[test]
fn missing_stat_yields_nothing() {
    assert!(parse_stat(None, true).is_empty());
    assert!(parse_stat(None, false).is_empty());
    assert!(parse_stat(Some("not a stat"), true).is_empty());
}
