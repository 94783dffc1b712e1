//! Personality traits scored from weighted chart factors.
//!
//! Every trait in [`CATALOG`] is a weighted list of [`Factor`]s. Each factor yields a
//! sub-score around a neutral 5; the trait score is the weighted sum clamped to 1..=10.
//! Reasons and indicators record how each number came about.

use std::collections::BTreeMap;

use tracing::trace;

use super::*;
use crate::dignity::{DignityInfo, DignityProvider, DignityStatus};
use crate::geometry::{aspects_of, house_of, house_sign, occupants_of, Aspect};

const NEUTRAL: f64 = 5.0;
const GOOD_HOUSE_BONUS: f64 = 1.0;
const DIFFICULT_HOUSE_PENALTY: f64 = 1.5;
const ASPECT_ADJUSTMENT: f64 = 0.5;
const OCCUPANT_ADJUSTMENT: f64 = 1.0;
const EARTH_BASE: f64 = 4.0;
const DUAL_BASE: f64 = 5.0;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraitId {
    Loyalty,
    EmotionalMaturity,
    Responsibility,
    FinancialStability,
    Protectiveness,
    FamilyOrientation,
    Romance,
    TemperControl,
    Nurturing,
    Homemaking,
    Communication,
    Adaptability,
    Teamwork,
    Leadership,
    Vision,
    TechnicalSkills,
    WorkEthic,
    Reliability,
    FinancialResponsibility,
    Fairness,
    Generosity,
    BusinessAcumen,
    Integrity,
    Stability,
    Innovation,
    RiskTolerance,
}

impl TraitId {
    pub const ALL: [TraitId; 26] = [
        TraitId::Loyalty,
        TraitId::EmotionalMaturity,
        TraitId::Responsibility,
        TraitId::FinancialStability,
        TraitId::Protectiveness,
        TraitId::FamilyOrientation,
        TraitId::Romance,
        TraitId::TemperControl,
        TraitId::Nurturing,
        TraitId::Homemaking,
        TraitId::Communication,
        TraitId::Adaptability,
        TraitId::Teamwork,
        TraitId::Leadership,
        TraitId::Vision,
        TraitId::TechnicalSkills,
        TraitId::WorkEthic,
        TraitId::Reliability,
        TraitId::FinancialResponsibility,
        TraitId::Fairness,
        TraitId::Generosity,
        TraitId::BusinessAcumen,
        TraitId::Integrity,
        TraitId::Stability,
        TraitId::Innovation,
        TraitId::RiskTolerance,
    ];

    pub fn definition(&self) -> &'static TraitDefinition {
        &CATALOG[*self as usize]
    }

    pub fn as_str(&self) -> &'static str {
        self.definition().key
    }
}

impl fmt::Display for TraitId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TraitId {
    type Err = AstrologyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().replace('-', "_");
        TraitId::ALL
            .iter()
            .find(|id| id.as_str().eq_ignore_ascii_case(&key))
            .copied()
            .ok_or_else(|| AstrologyError::UnknownTrait(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Factor {
    Planet { body: CelestialBody, weight: f64 },
    House { house: House, weight: f64 },
    EarthInfluence { weight: f64 },
    DualSignInfluence { weight: f64 },
}

impl Factor {
    pub fn weight(&self) -> f64 {
        match self {
            Factor::Planet { weight, .. }
            | Factor::House { weight, .. }
            | Factor::EarthInfluence { weight }
            | Factor::DualSignInfluence { weight } => *weight,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TraitDefinition {
    pub id: TraitId,
    pub key: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub factors: &'static [Factor],
}

macro_rules! factor {
    (planet $body:ident $weight:expr) => {
        Factor::Planet { body: CelestialBody::$body, weight: $weight }
    };
    (house $house:ident $weight:expr) => {
        Factor::House { house: House::$house, weight: $weight }
    };
    (earth $weight:expr) => {
        Factor::EarthInfluence { weight: $weight }
    };
    (dual $weight:expr) => {
        Factor::DualSignInfluence { weight: $weight }
    };
}

macro_rules! trait_def {
    ($id:ident, $key:expr, $name:expr, $description:expr, [$(($($factor:tt)+)),+ $(,)?]) => {
        TraitDefinition {
            id: TraitId::$id,
            key: $key,
            name: $name,
            description: $description,
            factors: &[$(factor!($($factor)+)),+],
        }
    };
}

/// Trait catalog, in `TraitId` order.
pub static CATALOG: [TraitDefinition; 26] = [
    trait_def!(Loyalty, "loyalty", "Loyalty",
        "Faithfulness and steadiness in committed relationships",
        [(planet Venus 0.3), (house Seventh 0.4), (planet Saturn 0.3)]),
    trait_def!(EmotionalMaturity, "emotional_maturity", "Emotional Maturity",
        "Capacity to handle feelings calmly and considerately",
        [(planet Moon 0.5), (house Fourth 0.3), (planet Saturn 0.2)]),
    trait_def!(Responsibility, "responsibility", "Responsibility",
        "Dependability in duties toward family and work",
        [(planet Saturn 0.4), (house Tenth 0.3), (earth 0.3)]),
    trait_def!(FinancialStability, "financial_stability", "Financial Stability",
        "Ability to build and keep material resources",
        [(planet Jupiter 0.3), (house Second 0.4), (house Eleventh 0.3)]),
    trait_def!(Protectiveness, "protectiveness", "Protectiveness",
        "Instinct to shield and stand up for loved ones",
        [(planet Mars 0.4), (planet Sun 0.3), (house Fourth 0.3)]),
    trait_def!(FamilyOrientation, "family_orientation", "Family Orientation",
        "Attachment to home life and family bonds",
        [(house Fourth 0.4), (planet Moon 0.3), (planet Jupiter 0.3)]),
    trait_def!(Romance, "romance", "Romance",
        "Affection, charm and romantic expression",
        [(planet Venus 0.5), (house Fifth 0.3), (planet Moon 0.2)]),
    trait_def!(TemperControl, "temper_control", "Temper Control",
        "Restraint of anger and impulsive reactions",
        [(planet Mars 0.4), (planet Moon 0.3), (house First 0.3)]),
    trait_def!(Nurturing, "nurturing", "Nurturing",
        "Care and emotional support given to others",
        [(planet Moon 0.5), (house Fourth 0.3), (planet Venus 0.2)]),
    trait_def!(Homemaking, "homemaking", "Homemaking",
        "Skill in creating a settled, comfortable home",
        [(house Fourth 0.4), (planet Moon 0.3), (earth 0.3)]),
    trait_def!(Communication, "communication", "Communication",
        "Clarity in speech, writing and negotiation",
        [(planet Mercury 0.6), (house Third 0.4)]),
    trait_def!(Adaptability, "adaptability", "Adaptability",
        "Flexibility in changing circumstances",
        [(dual 0.5), (planet Mercury 0.3), (planet Moon 0.2)]),
    trait_def!(Teamwork, "teamwork", "Teamwork",
        "Cooperation within groups and networks",
        [(house Eleventh 0.4), (planet Venus 0.3), (planet Jupiter 0.3)]),
    trait_def!(Leadership, "leadership", "Leadership",
        "Authority, initiative and the ability to direct others",
        [(planet Sun 0.5), (house Tenth 0.3), (planet Mars 0.2)]),
    trait_def!(Vision, "vision", "Vision",
        "Long-range thinking and sense of purpose",
        [(planet Jupiter 0.4), (house Ninth 0.3), (planet Sun 0.3)]),
    trait_def!(TechnicalSkills, "technical_skills", "Technical Skills",
        "Analytical and hands-on problem solving",
        [(planet Mercury 0.4), (planet Mars 0.3), (house Sixth 0.3)]),
    trait_def!(WorkEthic, "work_ethic", "Work Ethic",
        "Persistence and diligence in daily work",
        [(planet Saturn 0.5), (house Sixth 0.3), (earth 0.2)]),
    trait_def!(Reliability, "reliability", "Reliability",
        "Consistency in keeping commitments",
        [(planet Saturn 0.4), (earth 0.3), (house Tenth 0.3)]),
    trait_def!(FinancialResponsibility, "financial_responsibility", "Financial Responsibility",
        "Prudence in budgeting and handling money",
        [(planet Jupiter 0.3), (house Second 0.3), (earth 0.4)]),
    trait_def!(Fairness, "fairness", "Fairness",
        "Even-handed judgment in dealing with people",
        [(planet Jupiter 0.4), (planet Venus 0.3), (house Ninth 0.3)]),
    trait_def!(Generosity, "generosity", "Generosity",
        "Willingness to share rewards and support others",
        [(planet Jupiter 0.5), (house Ninth 0.3), (planet Venus 0.2)]),
    trait_def!(BusinessAcumen, "business_acumen", "Business Acumen",
        "Commercial judgment and an eye for opportunity",
        [(planet Mercury 0.4), (house Eleventh 0.3), (house Second 0.3)]),
    trait_def!(Integrity, "integrity", "Integrity",
        "Honesty and adherence to principle",
        [(planet Jupiter 0.4), (planet Sun 0.3), (house Ninth 0.3)]),
    trait_def!(Stability, "stability", "Stability",
        "Groundedness and resistance to upheaval",
        [(planet Saturn 0.3), (earth 0.4), (house Fourth 0.3)]),
    trait_def!(Innovation, "innovation", "Innovation",
        "Appetite for new ideas and unconventional methods",
        [(planet Rahu 0.4), (planet Mercury 0.3), (dual 0.3)]),
    trait_def!(RiskTolerance, "risk_tolerance", "Risk Tolerance",
        "Comfort with uncertainty and bold ventures",
        [(planet Mars 0.4), (planet Rahu 0.3), (house Eighth 0.3)]),
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluatedTrait {
    pub id: TraitId,
    pub name: String,
    pub score: f64,
    pub reasons: Vec<String>,
    pub indicators: Vec<String>,
}

/// Positional facts shared by every trait evaluated against one chart.
struct ChartContext<'a> {
    chart: &'a Chart,
    ascendant: f64,
    aspects: BTreeMap<CelestialBody, Vec<Aspect>>,
    dignities: BTreeMap<CelestialBody, DignityInfo>,
}

impl<'a> ChartContext<'a> {
    fn new<D: DignityProvider>(chart: &'a Chart, provider: &D) -> Option<Self> {
        let ascendant = chart.ascendant()?;
        let dignities = chart
            .planets()
            .map(|(body, longitude)| (body, provider.dignity(body, longitude, ascendant)))
            .collect();
        Some(Self {
            chart,
            ascendant,
            aspects: aspects_of(chart),
            dignities,
        })
    }

    fn incoming(&self, sign: ZodiacSign) -> impl Iterator<Item = &Aspect> + '_ {
        self.aspects
            .values()
            .flatten()
            .filter(move |aspect| aspect.target_sign == sign)
    }

    fn is_benefic(&self, body: CelestialBody) -> bool {
        self.dignities
            .get(&body)
            .map(|info| info.is_benefic)
            .unwrap_or(false)
    }
}

#[derive(Debug, Default)]
struct Notes {
    reasons: Vec<String>,
    indicators: Vec<String>,
}

impl Notes {
    fn reason(&mut self, reason: String) {
        self.reasons.push(reason);
    }

    fn indicate(&mut self, indicator: String) {
        if !self.indicators.contains(&indicator) {
            self.indicators.push(indicator);
        }
    }
}

#[derive(Debug, Default, Clone)]
pub struct TraitEngine<D> {
    dignity: D,
}

impl<D: DignityProvider> TraitEngine<D> {
    pub fn new(dignity: D) -> Self {
        Self { dignity }
    }

    pub fn dignity(&self) -> &D {
        &self.dignity
    }

    /// Scores one trait. `None` when the chart has no Ascendant to count houses from.
    pub fn evaluate(&self, id: TraitId, chart: &Chart) -> Option<EvaluatedTrait> {
        let context = ChartContext::new(chart, &self.dignity)?;
        Some(self.evaluate_in(id.definition(), &context))
    }

    /// Scores the whole catalog in catalog order.
    pub fn evaluate_all(&self, chart: &Chart) -> Vec<EvaluatedTrait> {
        match ChartContext::new(chart, &self.dignity) {
            Some(context) => CATALOG
                .iter()
                .map(|definition| self.evaluate_in(definition, &context))
                .collect(),
            None => Vec::new(),
        }
    }

    pub fn scores(&self, chart: &Chart) -> BTreeMap<TraitId, f64> {
        self.evaluate_all(chart)
            .into_iter()
            .map(|evaluated| (evaluated.id, evaluated.score))
            .collect()
    }

    fn evaluate_in(&self, definition: &TraitDefinition, context: &ChartContext) -> EvaluatedTrait {
        let mut notes = Notes::default();
        let mut total = 0.0;
        for factor in definition.factors {
            let sub_score = match *factor {
                Factor::Planet { body, .. } => self.planet_score(context, body, &mut notes),
                Factor::House { house, .. } => self.house_score(context, house, &mut notes),
                Factor::EarthInfluence { .. } => earth_score(context, &mut notes),
                Factor::DualSignInfluence { .. } => dual_sign_score(context, &mut notes),
            };
            total += sub_score * factor.weight();
        }
        let score = round_to(clamp_score(total, 1.0, 10.0), 1);
        trace!(trait_id = definition.key, score, "evaluated trait");

        EvaluatedTrait {
            id: definition.id,
            name: definition.name.to_string(),
            score,
            reasons: notes.reasons,
            indicators: notes.indicators,
        }
    }

    fn planet_score(&self, context: &ChartContext, body: CelestialBody, notes: &mut Notes) -> f64 {
        let Some(longitude) = context.chart.longitude(body) else {
            notes.reason(format!("{} position unavailable: {:.1}", body, NEUTRAL));
            return NEUTRAL;
        };
        let sign = ZodiacSign::from_longitude(longitude);
        let house = house_of(longitude, context.ascendant);
        let dignity = self.dignity.dignity(body, longitude, context.ascendant);

        let mut score = dignity.score / 10.0;
        note_status(body, dignity.status, notes);
        score += placement_adjustment(body, house, notes);

        for aspect in context.incoming(sign).filter(|a| a.source != body) {
            if context.is_benefic(aspect.source) {
                score += ASPECT_ADJUSTMENT;
                notes.indicate(format!("Benefic aspect from {} on {}", aspect.source, body));
            } else {
                score -= ASPECT_ADJUSTMENT;
                notes.indicate(format!("Malefic aspect from {} on {}", aspect.source, body));
            }
        }

        let score = clamp_score(score, 1.0, 10.0);
        let avastha = self.dignity.avastha(longitude);
        notes.reason(format!(
            "{} in {} (house {}), {}, {} avastha: {:.1}",
            body,
            sign,
            house,
            dignity.status.label(),
            avastha.state,
            score
        ));
        trace!(%body, score, "planet factor");
        score
    }

    fn house_score(&self, context: &ChartContext, house: House, notes: &mut Notes) -> f64 {
        let sign = house_sign(house, context.ascendant);
        let lord = sign.lord();

        let mut score = match context.chart.longitude(lord) {
            Some(lord_longitude) => {
                let dignity = self.dignity.dignity(lord, lord_longitude, context.ascendant);
                note_status(lord, dignity.status, notes);
                let lord_house = house_of(lord_longitude, context.ascendant);
                dignity.score / 10.0 + placement_adjustment(lord, lord_house, notes)
            }
            None => NEUTRAL,
        };

        for occupant in occupants_of(context.chart, sign) {
            if context.is_benefic(occupant) {
                score += OCCUPANT_ADJUSTMENT;
                notes.indicate(format!("Benefic {} occupies house {}", occupant, house));
            } else {
                score -= OCCUPANT_ADJUSTMENT;
                notes.indicate(format!("Malefic {} occupies house {}", occupant, house));
            }
        }

        let score = clamp_score(score, 1.0, 10.0);
        notes.reason(format!(
            "House {} ({}), ruled by {}: {:.1}",
            house, sign, lord, score
        ));
        trace!(house = house.number(), score, "house factor");
        score
    }
}

fn note_status(body: CelestialBody, status: DignityStatus, notes: &mut Notes) {
    if status != DignityStatus::Neutral {
        notes.indicate(format!("{} {}", body, status.label()));
    }
}

fn placement_adjustment(body: CelestialBody, house: House, notes: &mut Notes) -> f64 {
    if house.is_good() {
        notes.indicate(format!("{} well placed in house {}", body, house));
        GOOD_HOUSE_BONUS
    } else if house.is_difficult() {
        notes.indicate(format!("{} in difficult house {}", body, house));
        -DIFFICULT_HOUSE_PENALTY
    } else {
        0.0
    }
}

fn earth_score(context: &ChartContext, notes: &mut Notes) -> f64 {
    let count = context
        .chart
        .planets()
        .filter(|(_, longitude)| ZodiacSign::from_longitude(*longitude).element() == Element::Earth)
        .count();
    let score = (EARTH_BASE + count as f64).min(10.0);
    notes.reason(format!("{} planets in earth signs: {:.1}", count, score));
    if count >= 3 {
        notes.indicate("Strong earth sign emphasis".to_string());
    }
    score
}

fn dual_sign_score(context: &ChartContext, notes: &mut Notes) -> f64 {
    let count = context
        .chart
        .planets()
        .filter(|(_, longitude)| ZodiacSign::from_longitude(*longitude).is_dual())
        .count();
    let score = (DUAL_BASE + count as f64).min(10.0);
    notes.reason(format!("{} planets in dual signs: {:.1}", count, score));
    if count >= 3 {
        notes.indicate("Strong dual sign emphasis".to_string());
    }
    score
}
