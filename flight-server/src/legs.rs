//! Decoding of itinerary leg strings.
//!
//! Upstream summarizes each itinerary direction as a free-text line like
//! `"SFO 2025-01-10T07:00 → MMH 2025-01-10T08:05 (UA5512)"`, with
//! multi-segment itineraries joined segment-by-segment. There is no
//! formal schema; these functions extract display fields by pattern and
//! degrade to "nothing" on any mismatch. They never fail.

use std::sync::LazyLock;

use regex::Regex;

/// First clock-time token, `H:MM` or `HH:MM`.
static TIME_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(\d{1,2}):(\d{2})").unwrap());

/// First duration token, `<digits>h <digits>m` with variable spacing.
static DURATION_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(\d+)h\s*(\d+)m").unwrap());

/// The route separator glyph used between segments.
const ARROW: char = '→';

/// Extract the first departure time of day as a 12-hour clock string,
/// e.g. `"3:45 PM"`. Returns `None` when the string carries no valid
/// 24-hour time token.
///
/// Hour 0 renders as 12 AM, 12 as 12 PM; minutes pass through verbatim.
pub fn decode_time_of_day(legs: &str) -> Option<String> {
    for caps in TIME_RE.captures_iter(legs) {
        let hour: u32 = caps[1].parse().ok()?;
        let minutes = &caps[2];

        // Tokens outside the 24-hour clock are formatting noise, not times.
        if hour > 23 || minutes.parse::<u32>().ok()? > 59 {
            continue;
        }

        let suffix = if hour >= 12 { "PM" } else { "AM" };
        let hour12 = match hour % 12 {
            0 => 12,
            h => h,
        };
        return Some(format!("{hour12}:{minutes} {suffix}"));
    }
    None
}

/// Extract the first duration token, normalized to a single space:
/// `"1h 30m"`. Returns `None` when no duration is present.
pub fn decode_duration(legs: &str) -> Option<String> {
    DURATION_RE
        .captures(legs)
        .map(|caps| format!("{}h {}m", &caps[1], &caps[2]))
}

/// Count route arrows in the leg string.
///
/// Upstream writes exactly one arrow per flown hop, so one arrow means
/// a direct flight — see [`stops_label`].
pub fn count_stops(legs: &str) -> usize {
    legs.matches(ARROW).count()
}

/// Render a stop count for display.
///
/// Exactly one arrow is a direct flight; above one, the arrow count is
/// shown as "N stops". The upstream convention pluralizes only above
/// one, so a count of zero renders as "0 stop".
pub fn stops_label(count: usize) -> String {
    if count == 1 {
        "Direct".to_string()
    } else {
        format!("{}{}", count, if count > 1 { " stops" } else { " stop" })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_midnight_hour_is_twelve_am() {
        assert_eq!(decode_time_of_day("SFO→MMH 0:05").as_deref(), Some("12:05 AM"));
    }

    #[test]
    fn time_afternoon_converts_to_pm() {
        assert_eq!(decode_time_of_day("14:30 → arrive").as_deref(), Some("2:30 PM"));
    }

    #[test]
    fn time_noon_is_twelve_pm() {
        assert_eq!(decode_time_of_day("depart 12:00").as_deref(), Some("12:00 PM"));
    }

    #[test]
    fn time_morning_passes_through() {
        assert_eq!(decode_time_of_day("9:05 departure").as_deref(), Some("9:05 AM"));
        assert_eq!(decode_time_of_day("11:59 sharp").as_deref(), Some("11:59 AM"));
    }

    #[test]
    fn time_absent_is_none() {
        assert_eq!(decode_time_of_day("no time here"), None);
        assert_eq!(decode_time_of_day(""), None);
    }

    #[test]
    fn time_found_inside_iso_timestamp() {
        let legs = "SFO 2025-01-10T07:00 → MMH 2025-01-10T08:05 (UA5512)";
        assert_eq!(decode_time_of_day(legs).as_deref(), Some("7:00 AM"));
    }

    #[test]
    fn time_invalid_tokens_are_skipped() {
        // 45:99 is not a clock time; the later valid token wins
        assert_eq!(decode_time_of_day("id 45:99, then 7:30").as_deref(), Some("7:30 AM"));
        assert_eq!(decode_time_of_day("id 45:99 only"), None);
        assert_eq!(decode_time_of_day("9:75 is not a time"), None);
    }

    #[test]
    fn time_minutes_kept_verbatim() {
        assert_eq!(decode_time_of_day("at 13:05").as_deref(), Some("1:05 PM"));
        assert_eq!(decode_time_of_day("at 23:40").as_deref(), Some("11:40 PM"));
    }

    #[test]
    fn duration_extracted_and_normalized() {
        assert_eq!(
            decode_duration("depart 9:00, 1h 30m total").as_deref(),
            Some("1h 30m")
        );
        // Variable spacing collapses to a single space
        assert_eq!(decode_duration("1h30m").as_deref(), Some("1h 30m"));
        assert_eq!(decode_duration("2h  5m").as_deref(), Some("2h 5m"));
    }

    #[test]
    fn duration_absent_is_none() {
        assert_eq!(decode_duration("no duration"), None);
        assert_eq!(decode_duration("3h only"), None);
    }

    #[test]
    fn stops_counted_by_arrow() {
        assert_eq!(count_stops("SFO→MMH"), 1);
        assert_eq!(count_stops("SFO→DEN→MMH"), 2);
        assert_eq!(count_stops("SFO MMH"), 0);
        assert_eq!(count_stops(""), 0);
    }

    #[test]
    fn stops_counted_across_segments() {
        let legs = "SFO 07:00 → DEN 09:10 (UA123) | DEN 10:05 → MMH 11:00 (UA456)";
        assert_eq!(count_stops(legs), 2);
    }

    // Documented quirk of the upstream summary format: every flown hop
    // carries exactly one arrow, so ONE arrow renders as "Direct" and a
    // zero-arrow string (no route at all) renders as "0 stop". Preserved
    // as observed, not "fixed" to the usual separators-minus-one rule.
    #[test]
    fn one_arrow_renders_direct() {
        assert_eq!(stops_label(count_stops("SFO→MMH")), "Direct");
    }

    #[test]
    fn stop_labels_pluralize_above_one() {
        assert_eq!(stops_label(2), "2 stops");
        assert_eq!(stops_label(3), "3 stops");
        assert_eq!(stops_label(0), "0 stop");
    }
}
