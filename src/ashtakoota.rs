//! Eight-factor (36 point) match score computed from the two Moons.
//!
//! Every koota is a table lookup on the Moon's sign or nakshatra index. Bhakoot
//! counts from the bride's Moon sign to the groom's and is therefore directional:
//! swapping the charts can change its points.

use tracing::debug;

use super::*;
use crate::dignity::are_friends;

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Varna {
    Shudra,
    Vaishya,
    Kshatriya,
    Brahmin,
}

impl Varna {
    pub fn from_sign(sign: ZodiacSign) -> Varna {
        match sign.element() {
            Element::Water => Varna::Brahmin,
            Element::Fire => Varna::Kshatriya,
            Element::Earth => Varna::Vaishya,
            Element::Air => Varna::Shudra,
        }
    }

    /// Position in the order Shudra < Vaishya < Kshatriya < Brahmin.
    pub fn rank(&self) -> u8 {
        *self as u8
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Vashya {
    Chatushpada,
    Manava,
    Jalachara,
    Vanachara,
    Keeta,
}

impl Vashya {
    pub fn from_sign(sign: ZodiacSign) -> Vashya {
        use ZodiacSign::*;
        match sign {
            Aries | Taurus | Sagittarius => Vashya::Chatushpada,
            Gemini | Virgo | Libra | Aquarius => Vashya::Manava,
            Cancer | Capricorn | Pisces => Vashya::Jalachara,
            Leo => Vashya::Vanachara,
            Scorpio => Vashya::Keeta,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Yoni {
    Horse,
    Elephant,
    Sheep,
    Serpent,
    Dog,
    Cat,
    Rat,
    Cow,
    Buffalo,
    Tiger,
    Deer,
    Monkey,
    Mongoose,
    Lion,
}

const YONI_BY_NAKSHATRA: [Yoni; 27] = [
    Yoni::Horse,
    Yoni::Elephant,
    Yoni::Sheep,
    Yoni::Serpent,
    Yoni::Serpent,
    Yoni::Dog,
    Yoni::Cat,
    Yoni::Sheep,
    Yoni::Cat,
    Yoni::Rat,
    Yoni::Rat,
    Yoni::Cow,
    Yoni::Buffalo,
    Yoni::Tiger,
    Yoni::Buffalo,
    Yoni::Tiger,
    Yoni::Deer,
    Yoni::Deer,
    Yoni::Dog,
    Yoni::Monkey,
    Yoni::Mongoose,
    Yoni::Monkey,
    Yoni::Lion,
    Yoni::Horse,
    Yoni::Lion,
    Yoni::Cow,
    Yoni::Elephant,
];

impl Yoni {
    pub fn from_nakshatra(nakshatra: Nakshatra) -> Yoni {
        YONI_BY_NAKSHATRA[nakshatra.index()]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Yoni::Horse => "Horse",
            Yoni::Elephant => "Elephant",
            Yoni::Sheep => "Sheep",
            Yoni::Serpent => "Serpent",
            Yoni::Dog => "Dog",
            Yoni::Cat => "Cat",
            Yoni::Rat => "Rat",
            Yoni::Cow => "Cow",
            Yoni::Buffalo => "Buffalo",
            Yoni::Tiger => "Tiger",
            Yoni::Deer => "Deer",
            Yoni::Monkey => "Monkey",
            Yoni::Mongoose => "Mongoose",
            Yoni::Lion => "Lion",
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gana {
    Deva,
    Manushya,
    Rakshasa,
}

impl Gana {
    pub fn from_nakshatra(nakshatra: Nakshatra) -> Gana {
        use Nakshatra::*;
        match nakshatra {
            Ashwini | Mrigashira | Punarvasu | Pushya | Hasta | Swati | Anuradha | Shravana
            | Revati => Gana::Deva,
            Bharani | Rohini | Ardra | PurvaPhalguni | UttaraPhalguni | PurvaAshadha
            | UttaraAshadha | PurvaBhadrapada | UttaraBhadrapada => Gana::Manushya,
            Krittika | Ashlesha | Magha | Chitra | Vishakha | Jyeshtha | Moola | Dhanishta
            | Shatabhisha => Gana::Rakshasa,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Nadi {
    Adi,
    Madhya,
    Antya,
}

impl Nadi {
    pub fn from_nakshatra(nakshatra: Nakshatra) -> Nadi {
        const CYCLE: [Nadi; 6] = [
            Nadi::Adi,
            Nadi::Madhya,
            Nadi::Antya,
            Nadi::Antya,
            Nadi::Madhya,
            Nadi::Adi,
        ];
        CYCLE[nakshatra.index() % 6]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Koota {
    pub name: String,
    pub points: f64,
    pub max_points: u8,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AshtakootaResult {
    pub total: f64,
    pub kootas: Vec<Koota>,
}

pub fn varna_points(bride: ZodiacSign, groom: ZodiacSign) -> f64 {
    if Varna::from_sign(bride).rank() <= Varna::from_sign(groom).rank() {
        1.0
    } else {
        0.0
    }
}

pub fn vashya_points(bride: ZodiacSign, groom: ZodiacSign) -> f64 {
    if Vashya::from_sign(bride) == Vashya::from_sign(groom) {
        2.0
    } else {
        1.0
    }
}

pub fn tara_points(bride: Nakshatra, groom: Nakshatra) -> f64 {
    let distance = (groom.index() + 27 - bride.index()) % 27 % 9;
    match distance {
        1 | 2 | 4 | 6 | 8 => 3.0,
        0 | 3 | 5 | 7 => 1.5,
        _ => 0.0,
    }
}

pub fn yoni_points(bride: Nakshatra, groom: Nakshatra) -> f64 {
    let (bride, groom) = (Yoni::from_nakshatra(bride), Yoni::from_nakshatra(groom));
    if bride == groom {
        4.0
    } else if bride.name().chars().next() == groom.name().chars().next() {
        3.0
    } else {
        2.0
    }
}

pub fn graha_maitri_points(bride: ZodiacSign, groom: ZodiacSign) -> f64 {
    let (bride, groom) = (bride.lord(), groom.lord());
    if bride == groom {
        5.0
    } else if are_friends(bride, groom) {
        4.0
    } else {
        2.5
    }
}

pub fn gana_points(bride: Nakshatra, groom: Nakshatra) -> f64 {
    use Gana::*;
    match (Gana::from_nakshatra(bride), Gana::from_nakshatra(groom)) {
        (a, b) if a == b => 6.0,
        (Deva, Manushya) | (Manushya, Deva) => 5.0,
        (Manushya, Rakshasa) | (Rakshasa, Manushya) => 3.0,
        _ => 1.5,
    }
}

/// Directed: counts from the bride's Moon sign to the groom's.
pub fn bhakoot_points(bride: ZodiacSign, groom: ZodiacSign) -> f64 {
    match (groom.index() + 12 - bride.index()) % 12 {
        0 => 7.0,
        6 | 8 => 0.0,
        _ => 5.0,
    }
}

pub fn nadi_points(bride: Nakshatra, groom: Nakshatra) -> f64 {
    if Nadi::from_nakshatra(bride) == Nadi::from_nakshatra(groom) {
        0.0
    } else {
        8.0
    }
}

pub fn ashtakoota(bride: &Chart, groom: &Chart) -> AshtakootaResult {
    let (bride_moon, groom_moon) = match (bride.moon(), groom.moon()) {
        (Some(bride_moon), Some(groom_moon)) => (bride_moon, groom_moon),
        _ => {
            debug!("ashtakoota needs both Moons, returning empty result");
            return AshtakootaResult::default();
        }
    };

    let (bride_sign, groom_sign) = (
        ZodiacSign::from_longitude(bride_moon),
        ZodiacSign::from_longitude(groom_moon),
    );
    let (bride_info, groom_info) = (
        NakshatraInfo::from_longitude(bride_moon),
        NakshatraInfo::from_longitude(groom_moon),
    );
    let (bride_star, groom_star) = (bride_info.nakshatra, groom_info.nakshatra);

    let kootas: Vec<Koota> = [
        ("Varna", varna_points(bride_sign, groom_sign), 1u8),
        ("Vashya", vashya_points(bride_sign, groom_sign), 2),
        ("Tara", tara_points(bride_star, groom_star), 3),
        ("Yoni", yoni_points(bride_star, groom_star), 4),
        ("Graha Maitri", graha_maitri_points(bride_sign, groom_sign), 5),
        ("Gana", gana_points(bride_star, groom_star), 6),
        ("Bhakoot", bhakoot_points(bride_sign, groom_sign), 7),
        ("Nadi", nadi_points(bride_star, groom_star), 8),
    ]
    .into_iter()
    .map(|(name, points, max_points)| Koota {
        name: name.to_string(),
        points,
        max_points,
    })
    .collect();

    let total = round_to(kootas.iter().map(|koota| koota.points).sum(), 2);
    debug!(
        ?bride_sign,
        ?groom_sign,
        ?bride_star,
        bride_pada = bride_info.pada,
        ?groom_star,
        groom_pada = groom_info.pada,
        total,
        "ashtakoota"
    );
    AshtakootaResult { total, kootas }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn moon_at(longitude: f64) -> Chart {
        Chart::new().with(CelestialBody::Moon, longitude)
    }

    fn points(result: &AshtakootaResult, name: &str) -> f64 {
        result
            .kootas
            .iter()
            .find(|koota| koota.name == name)
            .map(|koota| koota.points)
            .unwrap()
    }

    #[test]
    fn test_self_match() {
        let chart = moon_at(40.0);
        let result = ashtakoota(&chart, &chart);
        assert_eq!(result.kootas.len(), 8);
        assert_relative_eq!(points(&result, "Varna"), 1.0);
        assert_relative_eq!(points(&result, "Vashya"), 2.0);
        assert_relative_eq!(points(&result, "Tara"), 1.5);
        assert_relative_eq!(points(&result, "Yoni"), 4.0);
        assert_relative_eq!(points(&result, "Graha Maitri"), 5.0);
        assert_relative_eq!(points(&result, "Gana"), 6.0);
        assert_relative_eq!(points(&result, "Bhakoot"), 7.0);
        assert_relative_eq!(points(&result, "Nadi"), 0.0);
        assert_relative_eq!(result.total, 26.5);
    }

    #[test]
    fn test_self_match_holds_for_every_nakshatra() {
        for index in 0..27 {
            let chart = moon_at(index as f64 * NAKSHATRA_SPAN + 1.0);
            let result = ashtakoota(&chart, &chart);
            assert_relative_eq!(points(&result, "Gana"), 6.0);
            assert_relative_eq!(points(&result, "Bhakoot"), 7.0);
            assert_relative_eq!(points(&result, "Nadi"), 0.0);
        }
    }

    #[test]
    fn test_max_points_sum_to_36() {
        let chart = moon_at(200.0);
        let result = ashtakoota(&chart, &chart);
        let max: u32 = result.kootas.iter().map(|k| k.max_points as u32).sum();
        assert_eq!(max, 36);
        let maxima: Vec<u8> = result.kootas.iter().map(|k| k.max_points).collect();
        assert_eq!(maxima, vec![1, 2, 3, 4, 5, 6, 7, 8]);
    }

    #[test]
    fn test_bhakoot_is_directional() {
        // Groom's Moon sits 9 signs from the bride's, the bride's 5 from the groom's
        let aries = moon_at(10.0);
        let sagittarius = moon_at(250.0);
        let forward = ashtakoota(&aries, &sagittarius);
        let backward = ashtakoota(&sagittarius, &aries);
        assert_relative_eq!(points(&forward, "Bhakoot"), 0.0);
        assert_relative_eq!(points(&backward, "Bhakoot"), 5.0);
        assert_relative_eq!(bhakoot_points(ZodiacSign::Aries, ZodiacSign::Libra), 0.0);
    }

    #[test]
    fn test_varna_order() {
        assert_relative_eq!(varna_points(ZodiacSign::Cancer, ZodiacSign::Gemini), 0.0);
        assert_relative_eq!(varna_points(ZodiacSign::Gemini, ZodiacSign::Cancer), 1.0);
        assert_relative_eq!(varna_points(ZodiacSign::Taurus, ZodiacSign::Leo), 1.0);
        assert!(Varna::Brahmin > Varna::Shudra);
    }

    #[test]
    fn test_yoni_first_letter() {
        // Pushya is a Sheep, Ashlesha a Cat, Uttara Phalguni a Cow, Ardra a Dog, Anuradha a Deer
        assert_relative_eq!(yoni_points(Nakshatra::Ashlesha, Nakshatra::UttaraPhalguni), 3.0);
        assert_relative_eq!(yoni_points(Nakshatra::Ardra, Nakshatra::Anuradha), 3.0);
        assert_relative_eq!(yoni_points(Nakshatra::Pushya, Nakshatra::Ashlesha), 2.0);
        assert_relative_eq!(yoni_points(Nakshatra::Ashwini, Nakshatra::Shatabhisha), 4.0);
    }

    #[test]
    fn test_gana_pairs() {
        assert_relative_eq!(gana_points(Nakshatra::Ashwini, Nakshatra::Bharani), 5.0);
        assert_relative_eq!(gana_points(Nakshatra::Krittika, Nakshatra::Rohini), 3.0);
        assert_relative_eq!(gana_points(Nakshatra::Ashwini, Nakshatra::Krittika), 1.5);
    }

    #[test]
    fn test_graha_maitri() {
        // Cancer (Moon) and Leo (Sun) are friends, Leo and Aquarius (Saturn) are not
        assert_relative_eq!(graha_maitri_points(ZodiacSign::Cancer, ZodiacSign::Leo), 4.0);
        assert_relative_eq!(graha_maitri_points(ZodiacSign::Leo, ZodiacSign::Aquarius), 2.5);
        assert_relative_eq!(graha_maitri_points(ZodiacSign::Aries, ZodiacSign::Scorpio), 5.0);
    }

    #[test]
    fn test_tara_cycle() {
        assert_relative_eq!(tara_points(Nakshatra::Ashwini, Nakshatra::Bharani), 3.0);
        assert_relative_eq!(tara_points(Nakshatra::Ashwini, Nakshatra::Rohini), 1.5);
        // Distance 9 folds back to 0
        assert_relative_eq!(tara_points(Nakshatra::Ashwini, Nakshatra::Magha), 1.5);
        assert_relative_eq!(tara_points(Nakshatra::Bharani, Nakshatra::Ashwini), 3.0);
    }

    #[test]
    fn test_points_within_bounds() {
        for bride in 0..27 {
            for groom in 0..27 {
                let result = ashtakoota(
                    &moon_at(bride as f64 * NAKSHATRA_SPAN + 0.5),
                    &moon_at(groom as f64 * NAKSHATRA_SPAN + 0.5),
                );
                for koota in &result.kootas {
                    assert!(koota.points >= 0.0, "{:?}", koota);
                    assert!(koota.points <= koota.max_points as f64, "{:?}", koota);
                }
                assert!((0.0..=36.0).contains(&result.total));
            }
        }
    }

    #[test]
    fn test_missing_moon() {
        let empty = ashtakoota(&Chart::new(), &moon_at(40.0));
        assert_relative_eq!(empty.total, 0.0);
        assert!(empty.kootas.is_empty());
        assert_eq!(ashtakoota(&moon_at(40.0), &Chart::new()), AshtakootaResult::default());
    }
}
