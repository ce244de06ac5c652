//! The weather describer: observation fields to canned English sentences
//!
//! Every classification is an ordered table of (upper bound, label) pairs
//! evaluated top to bottom, so each bucket boundary can be tested on its
//! own. All buckets are half-open: a value lands in the first row it is
//! strictly below, and the fallback covers the open-ended last bucket.
//!
//! Sentence text is load-bearing. MUCK-side softcode matches on these
//! exact strings, spelling included, so none of them may be reworded.

use serde::Serialize;

use crate::observation::{Observation, SkyCover};

/// Separator the MUCK-side consumer expects between sentences
pub const SENTENCE_SEPARATOR: &str = "  ";

/// Ordered weather sentences for one observation
///
/// Order is meaningful (temperature, humidity, wind, sky, precipitation)
/// and is preserved when the sentences are joined into the final message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    sentences: Vec<String>,
}

impl Report {
    pub fn sentences(&self) -> &[String] {
        &self.sentences
    }

    pub fn len(&self) -> usize {
        self.sentences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sentences.is_empty()
    }

    /// Join the sentences into the single message string sent to the MUCK
    pub fn to_message(&self) -> String {
        self.sentences.join(SENTENCE_SEPARATOR)
    }
}

const TEMPERATURE_BUCKETS: &[(f64, &str)] = &[
    (0.0, "It is below-0 freezing."),
    (10.0, "It is freezing out."),
    (20.0, "It is chilly out."),
    (30.0, "The tempurature is nice."),
    (40.0, "It is really hot out."),
];
const TEMPERATURE_FALLBACK: &str = "It is sweltering out.";

const DEW_POINT_BUCKETS: &[(f64, &str)] = &[
    (21.0, "Right now, it is somewhat humid."),
    (26.0, "Right now, it is really humid."),
];
const DEW_POINT_FALLBACK: &str = "Right now, the humidity is pretty brutal.";

const WIND_DIRECTION_BUCKETS: &[(u16, &str)] = &[
    (20, "from the north"),
    (70, "from the north east"),
    (110, "from the east"),
    (160, "from the south east"),
    (200, "from the south"),
    (250, "from the south west"),
    (290, "from the west"),
    (340, "from the north west"),
];
// [340, 360) wraps back around to northerly
const WIND_DIRECTION_FALLBACK: &str = "from the north";

const WIND_SPEED_BUCKETS: &[(u32, &str)] = &[
    (2, "calm"),
    (5, "breezy"),
    (10, "kind of windy"),
    (15, "strong"),
];
const WIND_SPEED_FALLBACK: &str = "very strong";

/// First table row whose bound the value is strictly below wins
fn bucket<T: PartialOrd + Copy>(
    value: T,
    table: &[(T, &'static str)],
    fallback: &'static str,
) -> &'static str {
    table
        .iter()
        .find(|(bound, _)| value < *bound)
        .map_or(fallback, |(_, label)| *label)
}

/// Describe one observation as an ordered sequence of sentences
///
/// Pure and total: the same observation always produces the same report,
/// and a typed observation cannot fail to be described.
pub fn describe(obs: &Observation) -> Report {
    let mut sentences = Vec::with_capacity(5);

    sentences.push(temperature_sentence(obs.temperature_c).to_string());

    if let Some(s) = humidity_sentence(obs.temperature_c, obs.dew_point_c) {
        sentences.push(s.to_string());
    }

    if let Some(s) = wind_sentence(obs.wind_direction_deg, obs.wind_speed_kt, obs.wind_gust_kt) {
        sentences.push(s);
    }

    if let Some(s) = sky_sentence(obs.sky_cover) {
        sentences.push(s.to_string());
    }

    if let Some(s) = precipitation_sentence(obs) {
        sentences.push(s.to_string());
    }

    Report { sentences }
}

/// Always exactly one sentence
fn temperature_sentence(temperature_c: f64) -> &'static str {
    bucket(temperature_c, TEMPERATURE_BUCKETS, TEMPERATURE_FALLBACK)
}

/// At most one sentence. A dew point above the air temperature reads as
/// fog and short-circuits the humidity buckets. A dew point of exactly
/// 15.0 falls through the `> 15` guard and emits nothing; that gap is
/// contractual.
fn humidity_sentence(temperature_c: f64, dew_point_c: f64) -> Option<&'static str> {
    if dew_point_c > temperature_c {
        return Some("Right now, it is very foggy.");
    }
    if dew_point_c > 15.0 {
        return Some(bucket(dew_point_c, DEW_POINT_BUCKETS, DEW_POINT_FALLBACK));
    }
    None
}

/// Direction 0 with speed 0 is dead calm and says nothing; direction 0
/// with any speed reads as variable winds.
fn wind_sentence(direction_deg: u16, speed_kt: u32, gust_kt: u32) -> Option<String> {
    if direction_deg == 0 && speed_kt == 0 {
        return None;
    }

    let direction = if direction_deg == 0 {
        "variable"
    } else {
        bucket(direction_deg, WIND_DIRECTION_BUCKETS, WIND_DIRECTION_FALLBACK)
    };
    let speed = bucket(speed_kt, WIND_SPEED_BUCKETS, WIND_SPEED_FALLBACK);
    let gust = if gust_kt > 20 { " and gusty" } else { "" };

    Some(format!("Winds are {} and {}{}.", direction, speed, gust))
}

fn sky_sentence(cover: SkyCover) -> Option<&'static str> {
    match cover {
        SkyCover::Clear => Some("There isn't a cloud in the sky."),
        SkyCover::Few => Some("There are a few clouds but it is mostly clear."),
        SkyCover::Scattered => Some("It is a little cloudy."),
        SkyCover::Broken => Some("There is a lot of cloud cover."),
        SkyCover::Overcast => Some("It is overcast."),
        SkyCover::Unknown => None,
    }
}

/// Rain and ground fog are inferred from the temperature/dew point spread.
/// Reported precipitation totals are unreliable at many stations, so the
/// actual precip_in field is deliberately never consulted.
fn precipitation_sentence(obs: &Observation) -> Option<&'static str> {
    let spread = obs.temperature_c - obs.dew_point_c;
    if spread < 2.0 {
        Some("And it is raining.")
    } else if spread < 5.0 && obs.visibility_mi < 2.0 {
        Some("And it is pretty foggy right now.")
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Baseline observation that triggers only the mandatory temperature
    /// sentence; tests override the fields they exercise.
    fn quiet_obs() -> Observation {
        Observation {
            temperature_c: 25.0,
            dew_point_c: 5.0,
            wind_direction_deg: 0,
            wind_speed_kt: 0,
            wind_gust_kt: 0,
            visibility_mi: 10.0,
            sky_cover: SkyCover::Unknown,
        }
    }

    #[test]
    fn temperature_buckets_are_half_open() {
        assert_eq!(temperature_sentence(-5.0), "It is below-0 freezing.");
        assert_eq!(temperature_sentence(-0.1), "It is below-0 freezing.");
        assert_eq!(temperature_sentence(0.0), "It is freezing out.");
        assert_eq!(temperature_sentence(9.9), "It is freezing out.");
        assert_eq!(temperature_sentence(10.0), "It is chilly out.");
        assert_eq!(temperature_sentence(19.9), "It is chilly out.");
        assert_eq!(temperature_sentence(20.0), "The tempurature is nice.");
        assert_eq!(temperature_sentence(29.9), "The tempurature is nice.");
        assert_eq!(temperature_sentence(30.0), "It is really hot out.");
        assert_eq!(temperature_sentence(40.0), "It is sweltering out.");
        assert_eq!(temperature_sentence(55.0), "It is sweltering out.");
    }

    #[test]
    fn exactly_one_temperature_sentence() {
        for temp in [-40.0, -0.5, 0.0, 5.0, 15.0, 25.0, 35.0, 45.0] {
            let obs = Observation {
                temperature_c: temp,
                ..quiet_obs()
            };
            let report = describe(&obs);
            let count = report
                .sentences()
                .iter()
                .filter(|s| TEMPERATURE_BUCKETS.iter().any(|(_, t)| s.as_str() == *t)
                    || s.as_str() == TEMPERATURE_FALLBACK)
                .count();
            assert_eq!(count, 1, "temperature {} produced {} sentences", temp, count);
        }
    }

    #[test]
    fn dew_point_above_temperature_reads_as_fog() {
        assert_eq!(
            humidity_sentence(10.0, 11.0),
            Some("Right now, it is very foggy.")
        );
        // Fog wins even in brutal-humidity territory
        assert_eq!(
            humidity_sentence(26.0, 27.0),
            Some("Right now, it is very foggy.")
        );
    }

    #[test]
    fn humidity_buckets() {
        assert_eq!(humidity_sentence(25.0, 16.0), Some("Right now, it is somewhat humid."));
        assert_eq!(humidity_sentence(25.0, 20.9), Some("Right now, it is somewhat humid."));
        assert_eq!(humidity_sentence(25.0, 21.0), Some("Right now, it is really humid."));
        assert_eq!(humidity_sentence(30.0, 25.9), Some("Right now, it is really humid."));
        assert_eq!(
            humidity_sentence(30.0, 26.0),
            Some("Right now, the humidity is pretty brutal.")
        );
        assert_eq!(humidity_sentence(25.0, 10.0), None);
    }

    #[test]
    fn dew_point_of_exactly_fifteen_says_nothing() {
        // The > 15 guard leaves 15.0 itself silent. Keep it that way.
        assert_eq!(humidity_sentence(25.0, 15.0), None);
        assert_eq!(humidity_sentence(25.0, 15.1), Some("Right now, it is somewhat humid."));
    }

    #[test]
    fn calm_air_has_no_wind_sentence() {
        assert_eq!(wind_sentence(0, 0, 0), None);

        let report = describe(&quiet_obs());
        assert!(!report.sentences().iter().any(|s| s.starts_with("Winds are")));
    }

    #[test]
    fn zero_direction_with_speed_is_variable() {
        assert_eq!(
            wind_sentence(0, 5, 0).as_deref(),
            Some("Winds are variable and breezy.")
        );
    }

    #[test]
    fn direction_buckets() {
        let dir = |deg| wind_sentence(deg, 3, 0).unwrap();
        assert_eq!(dir(10), "Winds are from the north and breezy.");
        assert_eq!(dir(19), "Winds are from the north and breezy.");
        assert_eq!(dir(20), "Winds are from the north east and breezy.");
        assert_eq!(dir(69), "Winds are from the north east and breezy.");
        assert_eq!(dir(70), "Winds are from the east and breezy.");
        assert_eq!(dir(110), "Winds are from the south east and breezy.");
        assert_eq!(dir(160), "Winds are from the south and breezy.");
        assert_eq!(dir(200), "Winds are from the south west and breezy.");
        assert_eq!(dir(250), "Winds are from the west and breezy.");
        assert_eq!(dir(290), "Winds are from the north west and breezy.");
        assert_eq!(dir(339), "Winds are from the north west and breezy.");
        // [340, 360) wraps back to north
        assert_eq!(dir(340), "Winds are from the north and breezy.");
        assert_eq!(dir(359), "Winds are from the north and breezy.");
    }

    #[test]
    fn speed_buckets() {
        let speed = |kt| wind_sentence(90, kt, 0).unwrap();
        assert_eq!(speed(0), "Winds are from the east and calm.");
        assert_eq!(speed(1), "Winds are from the east and calm.");
        assert_eq!(speed(2), "Winds are from the east and breezy.");
        assert_eq!(speed(5), "Winds are from the east and kind of windy.");
        assert_eq!(speed(10), "Winds are from the east and strong.");
        assert_eq!(speed(15), "Winds are from the east and very strong.");
        assert_eq!(speed(60), "Winds are from the east and very strong.");
    }

    #[test]
    fn gust_qualifier_needs_more_than_twenty_knots() {
        assert_eq!(
            wind_sentence(180, 12, 20).as_deref(),
            Some("Winds are from the south and strong.")
        );
        assert_eq!(
            wind_sentence(180, 12, 21).as_deref(),
            Some("Winds are from the south and strong and gusty.")
        );
    }

    #[test]
    fn sky_sentences() {
        assert_eq!(sky_sentence(SkyCover::Clear), Some("There isn't a cloud in the sky."));
        assert_eq!(
            sky_sentence(SkyCover::Few),
            Some("There are a few clouds but it is mostly clear.")
        );
        assert_eq!(sky_sentence(SkyCover::Scattered), Some("It is a little cloudy."));
        assert_eq!(sky_sentence(SkyCover::Broken), Some("There is a lot of cloud cover."));
        assert_eq!(sky_sentence(SkyCover::Overcast), Some("It is overcast."));
        assert_eq!(sky_sentence(SkyCover::Unknown), None);
    }

    #[test]
    fn unknown_sky_cover_is_silence_not_an_error() {
        let report = describe(&quiet_obs());
        assert_eq!(report.len(), 1); // temperature only
    }

    #[test]
    fn small_spread_means_rain() {
        let obs = Observation {
            temperature_c: 20.0,
            dew_point_c: 19.0,
            ..quiet_obs()
        };
        let report = describe(&obs);
        assert!(report.sentences().contains(&"And it is raining.".to_string()));
    }

    #[test]
    fn moderate_spread_with_low_visibility_means_fog() {
        let obs = Observation {
            temperature_c: 20.0,
            dew_point_c: 17.0,
            visibility_mi: 1.5,
            ..quiet_obs()
        };
        let report = describe(&obs);
        assert!(report
            .sentences()
            .contains(&"And it is pretty foggy right now.".to_string()));
    }

    #[test]
    fn precipitation_branches_are_mutually_exclusive() {
        // Spread of exactly 2.0 misses the rain branch but, with poor
        // visibility, lands in the fog branch.
        let obs = Observation {
            temperature_c: 20.0,
            dew_point_c: 18.0,
            visibility_mi: 1.0,
            ..quiet_obs()
        };
        assert_eq!(
            precipitation_sentence(&obs),
            Some("And it is pretty foggy right now.")
        );

        // Good visibility suppresses the fog branch entirely
        let obs = Observation {
            visibility_mi: 2.0,
            ..obs
        };
        assert_eq!(precipitation_sentence(&obs), None);

        // Wide spread says nothing no matter the visibility
        let obs = Observation {
            temperature_c: 20.0,
            dew_point_c: 10.0,
            visibility_mi: 0.5,
            ..quiet_obs()
        };
        assert_eq!(precipitation_sentence(&obs), None);
    }

    #[test]
    fn fog_and_rain_can_both_appear() {
        // Dew point above temperature triggers the humidity fog sentence
        // AND the rain proxy; the original reported both, so we do too.
        let obs = Observation {
            temperature_c: 10.0,
            dew_point_c: 11.0,
            ..quiet_obs()
        };
        let report = describe(&obs);
        let sentences = report.sentences();
        assert!(sentences.contains(&"Right now, it is very foggy.".to_string()));
        assert!(sentences.contains(&"And it is raining.".to_string()));
    }

    #[test]
    fn sentence_order_is_stable() {
        let obs = Observation {
            temperature_c: 24.0,
            dew_point_c: 23.0,
            wind_direction_deg: 0,
            wind_speed_kt: 12,
            wind_gust_kt: 25,
            visibility_mi: 1.5,
            sky_cover: SkyCover::Overcast,
        };
        insta::assert_snapshot!(describe(&obs).to_message(), @"The tempurature is nice.  Right now, it is really humid.  Winds are variable and strong and gusty.  It is overcast.  And it is raining.");
    }

    #[test]
    fn typical_fair_day_message() {
        let obs = Observation {
            temperature_c: 12.3,
            dew_point_c: 4.2,
            wind_direction_deg: 320,
            wind_speed_kt: 4,
            wind_gust_kt: 0,
            visibility_mi: 10.0,
            sky_cover: SkyCover::Few,
        };
        insta::assert_snapshot!(describe(&obs).to_message(), @"It is chilly out.  Winds are from the north west and breezy.  There are a few clouds but it is mostly clear.");
    }

    #[test]
    fn describe_is_idempotent() {
        let obs = Observation {
            temperature_c: 3.0,
            dew_point_c: 1.5,
            wind_direction_deg: 45,
            wind_speed_kt: 8,
            wind_gust_kt: 22,
            visibility_mi: 0.75,
            sky_cover: SkyCover::Broken,
        };
        let first = describe(&obs);
        let second = describe(&obs);
        assert_eq!(first, second);
        assert_eq!(first.to_message(), second.to_message());
    }

    #[test]
    fn message_joins_with_two_spaces() {
        let obs = Observation {
            temperature_c: 15.0,
            sky_cover: SkyCover::Clear,
            ..quiet_obs()
        };
        let message = describe(&obs).to_message();
        assert_eq!(
            message,
            "It is chilly out.  There isn't a cloud in the sky."
        );
    }
}
