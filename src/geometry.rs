//! Positional facts derived from raw longitudes: houses, aspects, conjunctions.
//!
//! Everything here works on sign indices obtained by floor division, never on raw
//! longitude comparisons.

use std::collections::BTreeMap;

use super::*;

/// A directed influence cast from `source`'s sign onto `target_sign`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Aspect {
    pub source: CelestialBody,
    pub house_distance: u8,
    pub target_sign: ZodiacSign,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AspectOnSign {
    pub body: CelestialBody,
    pub house_distance_label: String,
}

/// House distances a body casts its sight on, counting its own sign as the first.
pub fn aspect_distances(body: CelestialBody) -> &'static [u8] {
    match body {
        CelestialBody::Mars => &[4, 7, 8],
        CelestialBody::Jupiter | CelestialBody::Rahu | CelestialBody::Ketu => &[5, 7, 9],
        CelestialBody::Saturn => &[3, 7, 10],
        CelestialBody::Ascendant => &[],
        _ => &[7],
    }
}

/// Whole-sign house of `longitude` counted from the sign holding `reference`.
pub fn house_of(longitude: f64, reference: f64) -> House {
    let planet = ZodiacSign::from_longitude(longitude).index();
    let reference = ZodiacSign::from_longitude(reference).index();
    House::from_offset((planet + 12 - reference) % 12)
}

/// The sign occupying `house` when counted from the sign holding `reference`.
pub fn house_sign(house: House, reference: f64) -> ZodiacSign {
    ZodiacSign::from_longitude(reference).offset(house.number() as usize - 1)
}

pub fn aspects_of(chart: &Chart) -> BTreeMap<CelestialBody, Vec<Aspect>> {
    chart
        .planets()
        .map(|(body, longitude)| {
            let sign = ZodiacSign::from_longitude(longitude);
            let aspects = aspect_distances(body)
                .iter()
                .map(|&distance| Aspect {
                    source: body,
                    house_distance: distance,
                    target_sign: sign.offset(distance as usize - 1),
                })
                .collect();
            (body, aspects)
        })
        .collect()
}

/// Signs holding two or more planets.
pub fn conjunctions_of(chart: &Chart) -> BTreeMap<ZodiacSign, Vec<CelestialBody>> {
    let mut by_sign: BTreeMap<ZodiacSign, Vec<CelestialBody>> = BTreeMap::new();
    for (body, longitude) in chart.planets() {
        by_sign
            .entry(ZodiacSign::from_longitude(longitude))
            .or_default()
            .push(body);
    }
    by_sign.retain(|_, bodies| bodies.len() >= 2);
    by_sign
}

pub fn aspects_on_sign(
    sign: ZodiacSign,
    aspects: &BTreeMap<CelestialBody, Vec<Aspect>>,
) -> Vec<AspectOnSign> {
    aspects
        .values()
        .flatten()
        .filter(|aspect| aspect.target_sign == sign)
        .map(|aspect| AspectOnSign {
            body: aspect.source,
            house_distance_label: ordinal(aspect.house_distance),
        })
        .collect()
}

/// Planets (never the Ascendant) placed in `sign`.
pub fn occupants_of(chart: &Chart, sign: ZodiacSign) -> Vec<CelestialBody> {
    chart
        .planets()
        .filter(|(_, longitude)| ZodiacSign::from_longitude(*longitude) == sign)
        .map(|(body, _)| body)
        .collect()
}

fn ordinal(n: u8) -> String {
    let suffix = match (n % 10, n % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{}{}", n, suffix)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_chart() -> Chart {
        Chart::new()
            .with(CelestialBody::Ascendant, 0.0)
            .with(CelestialBody::Sun, 95.0)
            .with(CelestialBody::Moon, 40.0)
            .with(CelestialBody::Mars, 10.0)
            .with(CelestialBody::Mercury, 100.0)
            .with(CelestialBody::Jupiter, 250.0)
            .with(CelestialBody::Venus, 130.0)
            .with(CelestialBody::Saturn, 300.0)
            .with(CelestialBody::Rahu, 200.0)
            .with(CelestialBody::Ketu, 20.0)
    }

    #[test]
    fn test_house_of_reference_is_first() {
        let mut longitude = 0.0;
        while longitude < 360.0 {
            assert_eq!(house_of(longitude, longitude), House::First);
            longitude += 7.3;
        }
    }

    #[test]
    fn test_house_of_from_aries_ascendant() {
        // 95 degrees is Cancer by floor division; Leo only starts at 120
        assert_eq!(house_of(95.0, 0.0), House::Fourth);
        assert_eq!(house_of(125.0, 0.0), House::Fifth);
        assert_eq!(house_of(125.0, 0.0).number(), 5);
    }

    #[test]
    fn test_house_of_wraps() {
        // Aries seen from Pisces
        assert_eq!(house_of(5.0, 345.0), House::Second);
        // Pisces seen from Aries
        assert_eq!(house_of(345.0, 5.0), House::Twelfth);
        assert_eq!(house_sign(House::Seventh, 0.0), ZodiacSign::Libra);
        assert_eq!(house_sign(House::Twelfth, 40.0), ZodiacSign::Aries);
    }

    #[test]
    fn test_aspect_targets() {
        let aspects = aspects_of(&sample_chart());

        let mars: Vec<_> = aspects[&CelestialBody::Mars]
            .iter()
            .map(|a| (a.house_distance, a.target_sign))
            .collect();
        assert_eq!(
            mars,
            vec![
                (4, ZodiacSign::Cancer),
                (7, ZodiacSign::Libra),
                (8, ZodiacSign::Scorpio)
            ]
        );

        let saturn: Vec<_> = aspects[&CelestialBody::Saturn]
            .iter()
            .map(|a| a.target_sign)
            .collect();
        assert_eq!(
            saturn,
            vec![ZodiacSign::Aries, ZodiacSign::Leo, ZodiacSign::Scorpio]
        );

        assert_eq!(aspects[&CelestialBody::Sun].len(), 1);
        assert!(!aspects.contains_key(&CelestialBody::Ascendant));
    }

    #[test]
    fn test_every_aspect_found_once_on_its_target() {
        let aspects = aspects_of(&sample_chart());
        for aspect in aspects.values().flatten() {
            let on_target = aspects_on_sign(aspect.target_sign, &aspects);
            let matches = on_target
                .iter()
                .filter(|a| {
                    a.body == aspect.source
                        && a.house_distance_label == ordinal(aspect.house_distance)
                })
                .count();
            assert_eq!(matches, 1, "{:?}", aspect);
        }
    }

    #[test]
    fn test_aspects_on_sign_labels() {
        let aspects = aspects_of(&sample_chart());
        let on_cancer = aspects_on_sign(ZodiacSign::Cancer, &aspects);
        assert_eq!(
            on_cancer,
            vec![AspectOnSign {
                body: CelestialBody::Mars,
                house_distance_label: "4th".to_string(),
            }]
        );

        let on_leo = aspects_on_sign(ZodiacSign::Leo, &aspects);
        let expected = [
            (CelestialBody::Saturn, "7th"),
            (CelestialBody::Jupiter, "9th"),
            (CelestialBody::Ketu, "5th"),
        ];
        assert_eq!(on_leo.len(), expected.len());
        for (body, label) in expected {
            assert!(on_leo.contains(&AspectOnSign {
                body,
                house_distance_label: label.to_string(),
            }));
        }
    }

    #[test]
    fn test_conjunctions() {
        let conjunctions = conjunctions_of(&sample_chart());
        assert_eq!(
            conjunctions[&ZodiacSign::Cancer],
            vec![CelestialBody::Sun, CelestialBody::Mercury]
        );
        assert_eq!(
            conjunctions[&ZodiacSign::Aries],
            vec![CelestialBody::Mars, CelestialBody::Ketu]
        );
        // Ascendant shares Aries but is not a planet
        assert_eq!(conjunctions[&ZodiacSign::Aries].len(), 2);
        assert!(!conjunctions.contains_key(&ZodiacSign::Taurus));
    }

    #[test]
    fn test_occupants() {
        let chart = sample_chart();
        assert_eq!(
            occupants_of(&chart, ZodiacSign::Aries),
            vec![CelestialBody::Mars, CelestialBody::Ketu]
        );
        assert!(occupants_of(&chart, ZodiacSign::Gemini).is_empty());
    }

    #[test]
    fn test_ordinals() {
        assert_eq!(ordinal(1), "1st");
        assert_eq!(ordinal(2), "2nd");
        assert_eq!(ordinal(3), "3rd");
        assert_eq!(ordinal(7), "7th");
        assert_eq!(ordinal(11), "11th");
    }
}
