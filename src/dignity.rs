//! Planetary dignity: strength and nature of a body at a given longitude.
//!
//! The trait engine only talks to [`DignityProvider`]. [`ClassicalDignity`] is the
//! stock implementation built on the exaltation, own-sign and friendship tables;
//! [`NeutralDignity`] returns the same neutral answer for everything.

use super::*;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DignityStatus {
    Exalted,
    Moolatrikona,
    OwnSign,
    FriendlySign,
    Neutral,
    EnemySign,
    Debilitated,
}

impl DignityStatus {
    /// Strength on a 0..=100 scale.
    pub fn score(&self) -> f64 {
        match self {
            DignityStatus::Exalted => 90.0,
            DignityStatus::Moolatrikona => 80.0,
            DignityStatus::OwnSign => 75.0,
            DignityStatus::FriendlySign => 60.0,
            DignityStatus::Neutral => 50.0,
            DignityStatus::EnemySign => 35.0,
            DignityStatus::Debilitated => 20.0,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DignityStatus::Exalted => "exalted",
            DignityStatus::Moolatrikona => "in moolatrikona",
            DignityStatus::OwnSign => "in own sign",
            DignityStatus::FriendlySign => "in a friendly sign",
            DignityStatus::Neutral => "neutral",
            DignityStatus::EnemySign => "in an enemy sign",
            DignityStatus::Debilitated => "debilitated",
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Nature {
    Benefic,
    Neutral,
    Malefic,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DignityInfo {
    pub status: DignityStatus,
    pub score: f64,
    pub is_benefic: bool,
    pub functional_nature: Nature,
    pub natural_nature: Nature,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AvasthaState {
    Bala,
    Kumara,
    Yuva,
    Vriddha,
    Mrita,
}

impl AvasthaState {
    pub fn meaning(&self) -> &'static str {
        match self {
            AvasthaState::Bala => "infant, gives a quarter of its results",
            AvasthaState::Kumara => "adolescent, gives half of its results",
            AvasthaState::Yuva => "youthful, gives full results",
            AvasthaState::Vriddha => "old, gives meagre results",
            AvasthaState::Mrita => "dead, gives negligible results",
        }
    }
}

impl fmt::Display for AvasthaState {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Avastha {
    pub state: AvasthaState,
    pub meaning: String,
}

impl From<AvasthaState> for Avastha {
    fn from(state: AvasthaState) -> Self {
        Avastha {
            state,
            meaning: state.meaning().to_string(),
        }
    }
}

/// Strength classification consumed by the trait engine.
///
/// Implementations must be deterministic and total over `[0, 360)`.
pub trait DignityProvider {
    fn dignity(&self, body: CelestialBody, longitude: f64, ascendant: f64) -> DignityInfo;

    fn avastha(&self, longitude: f64) -> Avastha;
}

impl<D: DignityProvider + ?Sized> DignityProvider for &D {
    fn dignity(&self, body: CelestialBody, longitude: f64, ascendant: f64) -> DignityInfo {
        (**self).dignity(body, longitude, ascendant)
    }

    fn avastha(&self, longitude: f64) -> Avastha {
        (**self).avastha(longitude)
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ClassicalDignity;

impl ClassicalDignity {
    pub fn status(&self, body: CelestialBody, sign: ZodiacSign) -> DignityStatus {
        if matches!(
            body,
            CelestialBody::Rahu | CelestialBody::Ketu | CelestialBody::Ascendant
        ) {
            return DignityStatus::Neutral;
        }
        if exaltation_sign(body) == Some(sign) {
            return DignityStatus::Exalted;
        }
        if debilitation_sign(body) == Some(sign) {
            return DignityStatus::Debilitated;
        }
        if moolatrikona_sign(body) == Some(sign) {
            return DignityStatus::Moolatrikona;
        }
        let lord = sign.lord();
        if lord == body {
            DignityStatus::OwnSign
        } else if natural_friends(body).contains(&lord) {
            DignityStatus::FriendlySign
        } else if natural_neutrals(body).contains(&lord) {
            DignityStatus::Neutral
        } else {
            DignityStatus::EnemySign
        }
    }

    /// Nature by lordship counted from the ascendant sign.
    pub fn functional_nature(&self, body: CelestialBody, ascendant: f64) -> Nature {
        // Nodes and the lagna rule no sign
        if matches!(
            body,
            CelestialBody::Rahu | CelestialBody::Ketu | CelestialBody::Ascendant
        ) {
            return natural_nature(body);
        }
        let ruled: Vec<House> = House::all()
            .filter(|house| geometry::house_sign(*house, ascendant).lord() == body)
            .collect();
        if ruled
            .iter()
            .any(|h| matches!(h, House::First | House::Fifth | House::Ninth))
        {
            Nature::Benefic
        } else if ruled.iter().any(|h| h.is_difficult()) {
            Nature::Malefic
        } else {
            Nature::Neutral
        }
    }
}

impl DignityProvider for ClassicalDignity {
    fn dignity(&self, body: CelestialBody, longitude: f64, ascendant: f64) -> DignityInfo {
        let status = self.status(body, ZodiacSign::from_longitude(longitude));
        let natural = natural_nature(body);
        let functional = self.functional_nature(body, ascendant);
        DignityInfo {
            status,
            score: status.score(),
            is_benefic: functional == Nature::Benefic
                || (functional == Nature::Neutral && natural == Nature::Benefic),
            functional_nature: functional,
            natural_nature: natural,
        }
    }

    fn avastha(&self, longitude: f64) -> Avastha {
        const ODD: [AvasthaState; 5] = [
            AvasthaState::Bala,
            AvasthaState::Kumara,
            AvasthaState::Yuva,
            AvasthaState::Vriddha,
            AvasthaState::Mrita,
        ];
        let longitude = longitude.rem_euclid(360.0);
        let band = ((longitude % 30.0) / 6.0).floor() as usize;
        let band = band.min(4);
        // Aries, Gemini, Leo... are odd signs
        let sign = ZodiacSign::from_longitude(longitude);
        let state = if sign.index() % 2 == 0 {
            ODD[band]
        } else {
            ODD[4 - band]
        };
        state.into()
    }
}

/// Fixed neutral answers: status Neutral, score 50, benefic, Yuva.
#[derive(Debug, Default, Clone, Copy)]
pub struct NeutralDignity;

impl DignityProvider for NeutralDignity {
    fn dignity(&self, _body: CelestialBody, _longitude: f64, _ascendant: f64) -> DignityInfo {
        DignityInfo {
            status: DignityStatus::Neutral,
            score: DignityStatus::Neutral.score(),
            is_benefic: true,
            functional_nature: Nature::Neutral,
            natural_nature: Nature::Neutral,
        }
    }

    fn avastha(&self, _longitude: f64) -> Avastha {
        AvasthaState::Yuva.into()
    }
}

// ---------------------------
// ## Classical tables
// ---------------------------

pub fn natural_nature(body: CelestialBody) -> Nature {
    match body {
        CelestialBody::Jupiter
        | CelestialBody::Venus
        | CelestialBody::Mercury
        | CelestialBody::Moon => Nature::Benefic,
        CelestialBody::Sun
        | CelestialBody::Mars
        | CelestialBody::Saturn
        | CelestialBody::Rahu
        | CelestialBody::Ketu => Nature::Malefic,
        CelestialBody::Ascendant => Nature::Neutral,
    }
}

fn exaltation_sign(body: CelestialBody) -> Option<ZodiacSign> {
    match body {
        CelestialBody::Sun => Some(ZodiacSign::Aries),
        CelestialBody::Moon => Some(ZodiacSign::Taurus),
        CelestialBody::Mars => Some(ZodiacSign::Capricorn),
        CelestialBody::Mercury => Some(ZodiacSign::Virgo),
        CelestialBody::Jupiter => Some(ZodiacSign::Cancer),
        CelestialBody::Venus => Some(ZodiacSign::Pisces),
        CelestialBody::Saturn => Some(ZodiacSign::Libra),
        _ => None,
    }
}

fn debilitation_sign(body: CelestialBody) -> Option<ZodiacSign> {
    exaltation_sign(body).map(|sign| sign.offset(6))
}

fn moolatrikona_sign(body: CelestialBody) -> Option<ZodiacSign> {
    match body {
        CelestialBody::Sun => Some(ZodiacSign::Leo),
        CelestialBody::Moon => Some(ZodiacSign::Taurus),
        CelestialBody::Mars => Some(ZodiacSign::Aries),
        CelestialBody::Mercury => Some(ZodiacSign::Virgo),
        CelestialBody::Jupiter => Some(ZodiacSign::Sagittarius),
        CelestialBody::Venus => Some(ZodiacSign::Libra),
        CelestialBody::Saturn => Some(ZodiacSign::Aquarius),
        _ => None,
    }
}

fn natural_friends(body: CelestialBody) -> &'static [CelestialBody] {
    use CelestialBody::*;
    match body {
        Sun => &[Moon, Mars, Jupiter],
        Moon => &[Sun, Mercury],
        Mars => &[Sun, Moon, Jupiter],
        Mercury => &[Sun, Venus],
        Jupiter => &[Sun, Moon, Mars],
        Venus => &[Mercury, Saturn],
        Saturn => &[Mercury, Venus],
        _ => &[],
    }
}

fn natural_neutrals(body: CelestialBody) -> &'static [CelestialBody] {
    use CelestialBody::*;
    match body {
        Sun => &[Mercury],
        Moon => &[Mars, Jupiter, Venus, Saturn],
        Mars => &[Venus, Saturn],
        Mercury => &[Mars, Jupiter, Saturn],
        Jupiter => &[Saturn],
        Venus => &[Mars, Jupiter],
        Saturn => &[Jupiter],
        _ => &[],
    }
}

/// True when either planet counts the other among its natural friends.
pub fn are_friends(planet1: CelestialBody, planet2: CelestialBody) -> bool {
    natural_friends(planet1).contains(&planet2) || natural_friends(planet2).contains(&planet1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_exaltation_and_debilitation() {
        let classical = ClassicalDignity;
        assert_eq!(
            classical.status(CelestialBody::Sun, ZodiacSign::Aries),
            DignityStatus::Exalted
        );
        assert_eq!(
            classical.status(CelestialBody::Sun, ZodiacSign::Libra),
            DignityStatus::Debilitated
        );
        assert_eq!(
            classical.status(CelestialBody::Saturn, ZodiacSign::Aries),
            DignityStatus::Debilitated
        );
        // Exaltation wins over moolatrikona for the Moon in Taurus
        assert_eq!(
            classical.status(CelestialBody::Moon, ZodiacSign::Taurus),
            DignityStatus::Exalted
        );
    }

    #[test]
    fn test_own_friendly_enemy_signs() {
        let classical = ClassicalDignity;
        assert_eq!(
            classical.status(CelestialBody::Venus, ZodiacSign::Taurus),
            DignityStatus::OwnSign
        );
        assert_eq!(
            classical.status(CelestialBody::Venus, ZodiacSign::Libra),
            DignityStatus::Moolatrikona
        );
        assert_eq!(
            classical.status(CelestialBody::Jupiter, ZodiacSign::Leo),
            DignityStatus::FriendlySign
        );
        assert_eq!(
            classical.status(CelestialBody::Jupiter, ZodiacSign::Capricorn),
            DignityStatus::Debilitated
        );
        assert_eq!(
            classical.status(CelestialBody::Jupiter, ZodiacSign::Gemini),
            DignityStatus::EnemySign
        );
        assert_eq!(
            classical.status(CelestialBody::Rahu, ZodiacSign::Gemini),
            DignityStatus::Neutral
        );
    }

    #[test]
    fn test_functional_nature_for_aries_ascendant() {
        let classical = ClassicalDignity;
        // Sun rules Leo, the 5th
        assert_eq!(
            classical.functional_nature(CelestialBody::Sun, 0.0),
            Nature::Benefic
        );
        // Mercury rules Gemini (3rd) and Virgo (6th)
        assert_eq!(
            classical.functional_nature(CelestialBody::Mercury, 0.0),
            Nature::Malefic
        );
        // Venus rules Taurus (2nd) and Libra (7th)
        assert_eq!(
            classical.functional_nature(CelestialBody::Venus, 0.0),
            Nature::Neutral
        );
        assert_eq!(
            classical.functional_nature(CelestialBody::Rahu, 0.0),
            Nature::Malefic
        );
    }

    #[test]
    fn test_benefic_flag_combines_functional_and_natural() {
        let classical = ClassicalDignity;
        let venus = classical.dignity(CelestialBody::Venus, 40.0, 0.0);
        assert_eq!(venus.status, DignityStatus::OwnSign);
        assert_relative_eq!(venus.score, 75.0);
        assert!(venus.is_benefic);

        let mercury = classical.dignity(CelestialBody::Mercury, 160.0, 0.0);
        assert_eq!(mercury.status, DignityStatus::Exalted);
        assert!(!mercury.is_benefic);
    }

    #[test]
    fn test_scores_stay_in_range() {
        let classical = ClassicalDignity;
        for body in CelestialBody::planets() {
            for sign in ZodiacSign::ALL {
                let info = classical.dignity(body, sign.index() as f64 * 30.0 + 15.0, 0.0);
                assert!((0.0..=100.0).contains(&info.score));
            }
        }
    }

    #[test]
    fn test_avastha_bands() {
        let classical = ClassicalDignity;
        // Aries is odd: infant at the start
        assert_eq!(classical.avastha(2.0).state, AvasthaState::Bala);
        assert_eq!(classical.avastha(15.0).state, AvasthaState::Yuva);
        assert_eq!(classical.avastha(29.9).state, AvasthaState::Mrita);
        // Taurus is even: reversed
        assert_eq!(classical.avastha(32.0).state, AvasthaState::Mrita);
        assert_eq!(classical.avastha(59.0).state, AvasthaState::Bala);
        assert!(!classical.avastha(59.0).meaning.is_empty());
    }

    #[test]
    fn test_friendship_is_symmetric() {
        assert!(are_friends(CelestialBody::Moon, CelestialBody::Mars));
        assert!(are_friends(CelestialBody::Mars, CelestialBody::Moon));
        assert!(!are_friends(CelestialBody::Sun, CelestialBody::Saturn));
        assert!(!are_friends(CelestialBody::Sun, CelestialBody::Sun));
    }
}
