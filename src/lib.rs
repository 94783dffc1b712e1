// src/lib.rs

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

pub mod ashtakoota;
pub mod config;
pub mod dignity;
pub mod geometry;
pub mod profiles;
pub mod ranking;
pub mod synastry;
pub mod traits;

pub use ashtakoota::{ashtakoota, AshtakootaResult, Koota};
pub use config::{EngineConfig, RankingWeights, SynastryWeights};
pub use dignity::{
    Avastha, AvasthaState, ClassicalDignity, DignityInfo, DignityProvider, DignityStatus, Nature,
    NeutralDignity,
};
pub use geometry::{aspects_of, aspects_on_sign, conjunctions_of, house_of, Aspect, AspectOnSign};
pub use profiles::{compose_profiles, ComposedProfile, ComposedSection, ProfileKey};
pub use ranking::{
    suggest_role, Candidate, PerspectiveDetails, RankedResult, Ranker, Role, TraditionalScore,
};
pub use synastry::{compatibility, element_compatibility, Perspective, SynastryResult};
pub use traits::{EvaluatedTrait, Factor, TraitEngine, TraitId};

// ---------------------------
// ## Enumerations
// ---------------------------

#[derive(
    Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum CelestialBody {
    Sun,
    Moon,
    Mars,
    Mercury,
    Jupiter,
    Venus,
    Saturn,
    Rahu,
    Ketu,
    Ascendant,
}

impl CelestialBody {
    /// The nine grahas. The Ascendant is a reference point and never part of this set.
    pub const PLANETS: [CelestialBody; 9] = [
        CelestialBody::Sun,
        CelestialBody::Moon,
        CelestialBody::Mars,
        CelestialBody::Mercury,
        CelestialBody::Jupiter,
        CelestialBody::Venus,
        CelestialBody::Saturn,
        CelestialBody::Rahu,
        CelestialBody::Ketu,
    ];

    pub fn planets() -> impl Iterator<Item = CelestialBody> {
        Self::PLANETS.iter().copied()
    }

    pub fn is_planet(&self) -> bool {
        *self != CelestialBody::Ascendant
    }

    pub fn name(&self) -> &'static str {
        match self {
            CelestialBody::Sun => "Sun",
            CelestialBody::Moon => "Moon",
            CelestialBody::Mars => "Mars",
            CelestialBody::Mercury => "Mercury",
            CelestialBody::Jupiter => "Jupiter",
            CelestialBody::Venus => "Venus",
            CelestialBody::Saturn => "Saturn",
            CelestialBody::Rahu => "Rahu",
            CelestialBody::Ketu => "Ketu",
            CelestialBody::Ascendant => "Ascendant",
        }
    }
}

impl fmt::Display for CelestialBody {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for CelestialBody {
    type Err = AstrologyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        Self::PLANETS
            .iter()
            .chain(std::iter::once(&CelestialBody::Ascendant))
            .find(|body| body.name().eq_ignore_ascii_case(name))
            .copied()
            .ok_or_else(|| AstrologyError::UnknownBody(s.to_string()))
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum House {
    First = 1,
    Second,
    Third,
    Fourth,
    Fifth,
    Sixth,
    Seventh,
    Eighth,
    Ninth,
    Tenth,
    Eleventh,
    Twelfth,
}

impl House {
    pub const ALL: [House; 12] = [
        House::First,
        House::Second,
        House::Third,
        House::Fourth,
        House::Fifth,
        House::Sixth,
        House::Seventh,
        House::Eighth,
        House::Ninth,
        House::Tenth,
        House::Eleventh,
        House::Twelfth,
    ];

    pub fn from_index(index: usize) -> Option<House> {
        match index {
            1..=12 => Some(Self::ALL[index - 1]),
            _ => None,
        }
    }

    /// House at a zero-based sign offset from the reference sign, wrapping past the twelfth.
    pub fn from_offset(offset: usize) -> House {
        Self::ALL[offset % 12]
    }

    pub fn all() -> impl Iterator<Item = House> {
        Self::ALL.iter().copied()
    }

    pub fn number(&self) -> u8 {
        *self as u8
    }

    /// Kendra and trikona houses: 1, 4, 5, 7, 9, 10.
    pub fn is_good(&self) -> bool {
        matches!(
            self,
            House::First
                | House::Fourth
                | House::Fifth
                | House::Seventh
                | House::Ninth
                | House::Tenth
        )
    }

    /// Dusthana houses: 6, 8, 12.
    pub fn is_difficult(&self) -> bool {
        matches!(self, House::Sixth | House::Eighth | House::Twelfth)
    }
}

impl fmt::Display for House {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.number())
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ZodiacSign {
    Aries = 0,
    Taurus,
    Gemini,
    Cancer,
    Leo,
    Virgo,
    Libra,
    Scorpio,
    Sagittarius,
    Capricorn,
    Aquarius,
    Pisces,
}

impl ZodiacSign {
    pub const ALL: [ZodiacSign; 12] = [
        ZodiacSign::Aries,
        ZodiacSign::Taurus,
        ZodiacSign::Gemini,
        ZodiacSign::Cancer,
        ZodiacSign::Leo,
        ZodiacSign::Virgo,
        ZodiacSign::Libra,
        ZodiacSign::Scorpio,
        ZodiacSign::Sagittarius,
        ZodiacSign::Capricorn,
        ZodiacSign::Aquarius,
        ZodiacSign::Pisces,
    ];

    pub fn from_longitude(longitude: f64) -> Self {
        let normalized_longitude = normalize_longitude(longitude);
        let sign_index = (normalized_longitude / 30.0).floor() as usize;
        Self::from_index(sign_index)
    }

    pub fn from_index(index: usize) -> Self {
        Self::ALL[index % 12]
    }

    pub fn index(&self) -> usize {
        *self as usize
    }

    /// The sign `steps` places forward, counting this sign as zero.
    pub fn offset(&self, steps: usize) -> Self {
        Self::from_index(self.index() + steps % 12)
    }

    pub fn element(&self) -> Element {
        Element::ALL[self.index() % 4]
    }

    /// Mutable signs: Gemini, Virgo, Sagittarius, Pisces.
    pub fn is_dual(&self) -> bool {
        self.index() % 3 == 2
    }

    pub fn lord(&self) -> CelestialBody {
        match self {
            ZodiacSign::Aries | ZodiacSign::Scorpio => CelestialBody::Mars,
            ZodiacSign::Taurus | ZodiacSign::Libra => CelestialBody::Venus,
            ZodiacSign::Gemini | ZodiacSign::Virgo => CelestialBody::Mercury,
            ZodiacSign::Cancer => CelestialBody::Moon,
            ZodiacSign::Leo => CelestialBody::Sun,
            ZodiacSign::Sagittarius | ZodiacSign::Pisces => CelestialBody::Jupiter,
            ZodiacSign::Capricorn | ZodiacSign::Aquarius => CelestialBody::Saturn,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ZodiacSign::Aries => "Aries",
            ZodiacSign::Taurus => "Taurus",
            ZodiacSign::Gemini => "Gemini",
            ZodiacSign::Cancer => "Cancer",
            ZodiacSign::Leo => "Leo",
            ZodiacSign::Virgo => "Virgo",
            ZodiacSign::Libra => "Libra",
            ZodiacSign::Scorpio => "Scorpio",
            ZodiacSign::Sagittarius => "Sagittarius",
            ZodiacSign::Capricorn => "Capricorn",
            ZodiacSign::Aquarius => "Aquarius",
            ZodiacSign::Pisces => "Pisces",
        }
    }
}

impl fmt::Display for ZodiacSign {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Element {
    Fire,
    Earth,
    Air,
    Water,
}

impl Element {
    /// Rotation starting at Aries.
    pub const ALL: [Element; 4] = [Element::Fire, Element::Earth, Element::Air, Element::Water];
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            Element::Fire => "Fire",
            Element::Earth => "Earth",
            Element::Air => "Air",
            Element::Water => "Water",
        };
        write!(f, "{}", name)
    }
}

/// Width of one lunar mansion in degrees.
pub const NAKSHATRA_SPAN: f64 = 360.0 / 27.0;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Nakshatra {
    Ashwini,
    Bharani,
    Krittika,
    Rohini,
    Mrigashira,
    Ardra,
    Punarvasu,
    Pushya,
    Ashlesha,
    Magha,
    PurvaPhalguni,
    UttaraPhalguni,
    Hasta,
    Chitra,
    Swati,
    Vishakha,
    Anuradha,
    Jyeshtha,
    Moola,
    PurvaAshadha,
    UttaraAshadha,
    Shravana,
    Dhanishta,
    Shatabhisha,
    PurvaBhadrapada,
    UttaraBhadrapada,
    Revati,
}

impl Nakshatra {
    pub const ALL: [Nakshatra; 27] = [
        Nakshatra::Ashwini,
        Nakshatra::Bharani,
        Nakshatra::Krittika,
        Nakshatra::Rohini,
        Nakshatra::Mrigashira,
        Nakshatra::Ardra,
        Nakshatra::Punarvasu,
        Nakshatra::Pushya,
        Nakshatra::Ashlesha,
        Nakshatra::Magha,
        Nakshatra::PurvaPhalguni,
        Nakshatra::UttaraPhalguni,
        Nakshatra::Hasta,
        Nakshatra::Chitra,
        Nakshatra::Swati,
        Nakshatra::Vishakha,
        Nakshatra::Anuradha,
        Nakshatra::Jyeshtha,
        Nakshatra::Moola,
        Nakshatra::PurvaAshadha,
        Nakshatra::UttaraAshadha,
        Nakshatra::Shravana,
        Nakshatra::Dhanishta,
        Nakshatra::Shatabhisha,
        Nakshatra::PurvaBhadrapada,
        Nakshatra::UttaraBhadrapada,
        Nakshatra::Revati,
    ];

    pub fn from_longitude(longitude: f64) -> Nakshatra {
        let normalized_longitude = normalize_longitude(longitude);
        let nakshatra_index = (normalized_longitude / NAKSHATRA_SPAN).floor() as usize;
        Self::from_index(nakshatra_index)
    }

    pub fn from_index(index: usize) -> Nakshatra {
        Self::ALL[index % 27]
    }

    pub fn index(&self) -> usize {
        *self as usize
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NakshatraInfo {
    pub nakshatra: Nakshatra,
    pub pada: u8,
    pub lord: CelestialBody,
    pub degree: f64,
}

impl NakshatraInfo {
    pub fn from_longitude(longitude: f64) -> NakshatraInfo {
        let normalized_longitude = normalize_longitude(longitude);
        let nakshatra = Nakshatra::from_longitude(normalized_longitude);
        let pada_length = NAKSHATRA_SPAN / 4.0;
        // Measured from the start of the nakshatra already found so both agree at boundaries
        let within = (normalized_longitude - nakshatra.index() as f64 * NAKSHATRA_SPAN).max(0.0);
        let pada = ((within / pada_length).floor() as u8).min(3) + 1;
        NakshatraInfo {
            nakshatra,
            pada,
            lord: NakshatraInfo::get_nakshatra_lord(nakshatra),
            degree: normalized_longitude,
        }
    }

    /// Vimshottari lord: Ketu, Venus, Sun, Moon, Mars, Rahu, Jupiter, Saturn, Mercury, repeating.
    pub fn get_nakshatra_lord(nakshatra: Nakshatra) -> CelestialBody {
        const LORDS: [CelestialBody; 9] = [
            CelestialBody::Ketu,
            CelestialBody::Venus,
            CelestialBody::Sun,
            CelestialBody::Moon,
            CelestialBody::Mars,
            CelestialBody::Rahu,
            CelestialBody::Jupiter,
            CelestialBody::Saturn,
            CelestialBody::Mercury,
        ];
        LORDS[nakshatra.index() % 9]
    }
}

// ---------------------------
// ## Structures
// ---------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub longitude: f64,
}

/// Planetary longitudes for one native, as delivered by the ephemeris service.
///
/// A chart is never mutated once built. Longitudes are normalized into `[0, 360)`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(
    try_from = "BTreeMap<String, Position>",
    into = "BTreeMap<String, Position>"
)]
pub struct Chart {
    positions: BTreeMap<CelestialBody, Position>,
}

impl Chart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, body: CelestialBody, longitude: f64) -> Self {
        self.positions.insert(
            body,
            Position {
                longitude: normalize_longitude(longitude),
            },
        );
        self
    }

    /// Builds a chart from untyped `(name, longitude)` pairs.
    pub fn try_from_longitudes<I, S>(entries: I) -> AstrologyResult<Self>
    where
        I: IntoIterator<Item = (S, f64)>,
        S: AsRef<str>,
    {
        let mut chart = Chart::new();
        for (name, longitude) in entries {
            let body: CelestialBody = name.as_ref().parse()?;
            if !longitude.is_finite() {
                return Err(AstrologyError::InvalidLongitude { body, longitude });
            }
            chart = chart.with(body, longitude);
        }
        Ok(chart)
    }

    pub fn position(&self, body: CelestialBody) -> Option<Position> {
        self.positions.get(&body).copied()
    }

    pub fn longitude(&self, body: CelestialBody) -> Option<f64> {
        self.position(body).map(|p| p.longitude)
    }

    pub fn sign(&self, body: CelestialBody) -> Option<ZodiacSign> {
        self.longitude(body).map(ZodiacSign::from_longitude)
    }

    pub fn ascendant(&self) -> Option<f64> {
        self.longitude(CelestialBody::Ascendant)
    }

    pub fn moon(&self) -> Option<f64> {
        self.longitude(CelestialBody::Moon)
    }

    /// Every body present except the Ascendant, in `CelestialBody` order.
    pub fn planets(&self) -> impl Iterator<Item = (CelestialBody, f64)> + '_ {
        self.positions
            .iter()
            .filter(|(body, _)| body.is_planet())
            .map(|(body, position)| (*body, position.longitude))
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

impl TryFrom<BTreeMap<String, Position>> for Chart {
    type Error = AstrologyError;

    fn try_from(map: BTreeMap<String, Position>) -> Result<Self, Self::Error> {
        Chart::try_from_longitudes(map.into_iter().map(|(name, p)| (name, p.longitude)))
    }
}

impl From<Chart> for BTreeMap<String, Position> {
    fn from(chart: Chart) -> Self {
        chart
            .positions
            .into_iter()
            .map(|(body, position)| (body.name().to_string(), position))
            .collect()
    }
}

// ---------------------------
// ## Helpers
// ---------------------------

/// Folds any longitude into `[0, 360)`. `rem_euclid` alone can round up to 360 itself.
pub fn normalize_longitude(longitude: f64) -> f64 {
    let normalized = longitude.rem_euclid(360.0);
    if normalized >= 360.0 {
        0.0
    } else {
        normalized
    }
}

pub(crate) fn clamp_score(value: f64, min: f64, max: f64) -> f64 {
    value.max(min).min(max)
}

pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

// ---------------------------
// ## Error Handling
// ---------------------------

#[derive(Debug, thiserror::Error)]
pub enum AstrologyError {
    #[error("Unknown celestial body: {0}")]
    UnknownBody(String),

    #[error("Unknown perspective: {0}")]
    UnknownPerspective(String),

    #[error("Unknown trait: {0}")]
    UnknownTrait(String),

    #[error("Unknown profile: {0}")]
    UnknownProfile(String),

    #[error("Invalid longitude for {body}: {longitude}")]
    InvalidLongitude { body: CelestialBody, longitude: f64 },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Config parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type AstrologyResult<T> = Result<T, AstrologyError>;
