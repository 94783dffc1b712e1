//! Role-specific groupings of evaluated traits.

use std::collections::BTreeMap;

use super::*;
use crate::dignity::DignityProvider;
use crate::traits::{EvaluatedTrait, TraitEngine, TraitId};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileKey {
    HusbandPotential,
    WifePotential,
    ProfessionalProfile,
    EmployerPotential,
    PartnershipPotential,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SectionDefinition {
    pub title: &'static str,
    pub traits: &'static [TraitId],
}

impl ProfileKey {
    pub const ALL: [ProfileKey; 5] = [
        ProfileKey::HusbandPotential,
        ProfileKey::WifePotential,
        ProfileKey::ProfessionalProfile,
        ProfileKey::EmployerPotential,
        ProfileKey::PartnershipPotential,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProfileKey::HusbandPotential => "husband_potential",
            ProfileKey::WifePotential => "wife_potential",
            ProfileKey::ProfessionalProfile => "professional_profile",
            ProfileKey::EmployerPotential => "employer_potential",
            ProfileKey::PartnershipPotential => "partnership_potential",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            ProfileKey::HusbandPotential => "Husband Potential",
            ProfileKey::WifePotential => "Wife Potential",
            ProfileKey::ProfessionalProfile => "Professional Profile",
            ProfileKey::EmployerPotential => "Employer Potential",
            ProfileKey::PartnershipPotential => "Partnership Potential",
        }
    }

    pub fn sections(&self) -> &'static [SectionDefinition] {
        use TraitId::*;
        match self {
            ProfileKey::HusbandPotential => &[
                SectionDefinition {
                    title: "Commitment & Character",
                    traits: &[Loyalty, Responsibility, Integrity],
                },
                SectionDefinition {
                    title: "Provider & Protector",
                    traits: &[FinancialStability, Protectiveness, WorkEthic],
                },
                SectionDefinition {
                    title: "Emotional Bond",
                    traits: &[EmotionalMaturity, Romance, TemperControl, FamilyOrientation],
                },
            ],
            ProfileKey::WifePotential => &[
                SectionDefinition {
                    title: "Commitment & Character",
                    traits: &[Loyalty, Integrity, EmotionalMaturity],
                },
                SectionDefinition {
                    title: "Home & Family",
                    traits: &[Nurturing, Homemaking, FamilyOrientation],
                },
                SectionDefinition {
                    title: "Partnership",
                    traits: &[Romance, Communication, Adaptability],
                },
            ],
            ProfileKey::ProfessionalProfile => &[
                SectionDefinition {
                    title: "Core Skills",
                    traits: &[TechnicalSkills, Communication, Adaptability],
                },
                SectionDefinition {
                    title: "Work Style",
                    traits: &[WorkEthic, Reliability, Teamwork],
                },
                SectionDefinition {
                    title: "Growth",
                    traits: &[Leadership, Innovation],
                },
            ],
            ProfileKey::EmployerPotential => &[
                SectionDefinition {
                    title: "Leadership",
                    traits: &[Leadership, Vision, Fairness],
                },
                SectionDefinition {
                    title: "Stability",
                    traits: &[FinancialStability, Stability, Integrity],
                },
                SectionDefinition {
                    title: "People",
                    traits: &[Generosity, Communication],
                },
            ],
            ProfileKey::PartnershipPotential => &[
                SectionDefinition {
                    title: "Strategic",
                    traits: &[Leadership, Vision, BusinessAcumen, RiskTolerance],
                },
                SectionDefinition {
                    title: "Operational",
                    traits: &[FinancialResponsibility, TechnicalSkills, Communication, Teamwork],
                },
                SectionDefinition {
                    title: "Trust",
                    traits: &[Integrity, Reliability, Fairness],
                },
            ],
        }
    }

    /// All trait ids of the profile, section by section.
    pub fn trait_ids(&self) -> impl Iterator<Item = TraitId> {
        self.sections()
            .iter()
            .flat_map(|section| section.traits.iter().copied())
    }
}

impl fmt::Display for ProfileKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ProfileKey {
    type Err = AstrologyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().replace('-', "_");
        ProfileKey::ALL
            .iter()
            .find(|profile| profile.as_str().eq_ignore_ascii_case(&key))
            .copied()
            .ok_or_else(|| AstrologyError::UnknownProfile(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComposedSection {
    pub title: String,
    pub traits: Vec<EvaluatedTrait>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComposedProfile {
    pub title: String,
    pub sections: Vec<ComposedSection>,
}

/// Every profile with its traits evaluated against `chart`.
///
/// Traits that cannot be evaluated (no Ascendant) are left out of their section.
pub fn compose_profiles<D: DignityProvider>(
    engine: &TraitEngine<D>,
    chart: &Chart,
) -> BTreeMap<ProfileKey, ComposedProfile> {
    let evaluated = evaluated_by_id(engine, chart);
    ProfileKey::ALL
        .iter()
        .map(|key| (*key, compose(*key, &evaluated)))
        .collect()
}

pub fn compose_profile<D: DignityProvider>(
    engine: &TraitEngine<D>,
    chart: &Chart,
    key: ProfileKey,
) -> ComposedProfile {
    compose(key, &evaluated_by_id(engine, chart))
}

fn evaluated_by_id<D: DignityProvider>(
    engine: &TraitEngine<D>,
    chart: &Chart,
) -> BTreeMap<TraitId, EvaluatedTrait> {
    engine
        .evaluate_all(chart)
        .into_iter()
        .map(|evaluated| (evaluated.id, evaluated))
        .collect()
}

fn compose(key: ProfileKey, evaluated: &BTreeMap<TraitId, EvaluatedTrait>) -> ComposedProfile {
    ComposedProfile {
        title: key.title().to_string(),
        sections: key
            .sections()
            .iter()
            .map(|section| ComposedSection {
                title: section.title.to_string(),
                traits: section
                    .traits
                    .iter()
                    .filter_map(|id| evaluated.get(id).cloned())
                    .collect(),
            })
            .collect(),
    }
}
