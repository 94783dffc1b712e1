//! Pairwise chart compatibility from sign elements.

use tracing::{trace, warn};

use super::*;
use crate::config::SynastryWeights;
use crate::profiles::ProfileKey;

/// The role context a ranking is requested in.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Perspective {
    GirlSeekingBoy,
    BoySeekingGirl,
    EmployerSeekingEmployee,
    EmployeeSeekingEmployer,
    BusinessPartner,
}

impl Perspective {
    pub const ALL: [Perspective; 5] = [
        Perspective::GirlSeekingBoy,
        Perspective::BoySeekingGirl,
        Perspective::EmployerSeekingEmployee,
        Perspective::EmployeeSeekingEmployer,
        Perspective::BusinessPartner,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Perspective::GirlSeekingBoy => "girl_seeking_boy",
            Perspective::BoySeekingGirl => "boy_seeking_girl",
            Perspective::EmployerSeekingEmployee => "employer_seeking_employee",
            Perspective::EmployeeSeekingEmployer => "employee_seeking_employer",
            Perspective::BusinessPartner => "business_partner",
        }
    }

    /// Profile a candidate is judged against from this perspective.
    pub fn profile(&self) -> ProfileKey {
        match self {
            Perspective::GirlSeekingBoy => ProfileKey::HusbandPotential,
            Perspective::BoySeekingGirl => ProfileKey::WifePotential,
            Perspective::EmployerSeekingEmployee => ProfileKey::ProfessionalProfile,
            Perspective::EmployeeSeekingEmployer => ProfileKey::EmployerPotential,
            Perspective::BusinessPartner => ProfileKey::PartnershipPotential,
        }
    }

    pub fn is_romantic(&self) -> bool {
        matches!(self, Perspective::GirlSeekingBoy | Perspective::BoySeekingGirl)
    }

    /// Third synastry component: Venus for romance, Mercury for work.
    pub fn affinity_body(&self) -> CelestialBody {
        if self.is_romantic() {
            CelestialBody::Venus
        } else {
            CelestialBody::Mercury
        }
    }
}

impl fmt::Display for Perspective {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Perspective {
    type Err = AstrologyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().replace('-', "_");
        Perspective::ALL
            .iter()
            .find(|perspective| perspective.as_str().eq_ignore_ascii_case(&key))
            .copied()
            .ok_or_else(|| AstrologyError::UnknownPerspective(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SynastryResult {
    pub score: f64,
    pub details: Vec<String>,
}

pub fn element_compatibility(a: Element, b: Element) -> f64 {
    use Element::*;
    match (a, b) {
        _ if a == b => 10.0,
        (Fire, Air) | (Air, Fire) | (Earth, Water) | (Water, Earth) => 8.0,
        (Fire, Earth) | (Earth, Fire) | (Air, Water) | (Water, Air) => 5.0,
        _ => 3.0,
    }
}

/// Scores `candidate` against `base` with the default component weights.
pub fn compatibility(base: &Chart, candidate: &Chart, perspective: Perspective) -> SynastryResult {
    compatibility_with(base, candidate, perspective, &SynastryWeights::default())
}

pub fn compatibility_with(
    base: &Chart,
    candidate: &Chart,
    perspective: Perspective,
    weights: &SynastryWeights,
) -> SynastryResult {
    let components = [
        (CelestialBody::Moon, weights.moon),
        (CelestialBody::Ascendant, weights.ascendant),
        (perspective.affinity_body(), weights.affinity),
    ];

    let mut score = 0.0;
    let mut details = Vec::with_capacity(components.len());
    for (body, weight) in components {
        match (base.sign(body), candidate.sign(body)) {
            (Some(base_sign), Some(candidate_sign)) => {
                let value = element_compatibility(base_sign.element(), candidate_sign.element());
                let contribution = value * weight;
                trace!(%body, %base_sign, %candidate_sign, value, contribution, "synastry component");
                score += contribution;
                details.push(format!(
                    "{} sign compatibility ({} / {}): {:.1} x {:.2} = {:.2}",
                    body, base_sign, candidate_sign, value, weight, contribution
                ));
            }
            (base_sign, _) => {
                let side = if base_sign.is_none() { "base" } else { "candidate" };
                warn!(%body, side, "skipping synastry component, body missing");
                details.push(format!(
                    "{} sign compatibility skipped: missing from {} chart",
                    body, side
                ));
            }
        }
    }

    SynastryResult { score, details }
}
