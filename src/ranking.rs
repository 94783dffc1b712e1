//! Candidate ranking: individual merit blended with pairwise fit.

use std::collections::BTreeMap;

use tracing::{debug, warn};

use super::*;
use crate::ashtakoota::{ashtakoota, AshtakootaResult, Koota};
use crate::config::EngineConfig;
use crate::dignity::{ClassicalDignity, DignityProvider};
use crate::profiles::ProfileKey;
use crate::synastry::{compatibility_with, Perspective, SynastryResult};
use crate::traits::{TraitEngine, TraitId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: String,
    pub name: String,
    pub chart: Chart,
}

impl Candidate {
    pub fn new(id: impl Into<String>, name: impl Into<String>, chart: Chart) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            chart,
        }
    }
}

/// Organizational seat suggested to a business partner.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "CEO")]
    Ceo,
    #[serde(rename = "CFO")]
    Cfo,
    #[serde(rename = "CTO")]
    Cto,
    #[serde(rename = "COO")]
    Coo,
    #[serde(rename = "Chief Architect")]
    ChiefArchitect,
    #[serde(rename = "Team Member")]
    TeamMember,
}

impl Role {
    pub fn label(&self) -> &'static str {
        match self {
            Role::Ceo => "CEO",
            Role::Cfo => "CFO",
            Role::Cto => "CTO",
            Role::Coo => "COO",
            Role::ChiefArchitect => "Chief Architect",
            Role::TeamMember => "Team Member",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionScore {
    pub title: String,
    /// Mean of the section's evaluable traits, `None` when none could be scored.
    pub score: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerspectiveDetails {
    pub perspective: Perspective,
    pub profile: ProfileKey,
    pub title: String,
    pub sections: Vec<SectionScore>,
    pub suggested_role: Option<Role>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraditionalScore {
    pub total: f64,
    pub parts: Vec<Koota>,
}

impl From<AshtakootaResult> for TraditionalScore {
    fn from(result: AshtakootaResult) -> Self {
        Self {
            total: result.total,
            parts: result.kootas,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedResult {
    pub candidate_id: String,
    pub name: String,
    pub score: f64,
    pub individual_score: f64,
    pub compatibility_score: Option<f64>,
    pub compatibility_details: Vec<String>,
    pub perspective_details: PerspectiveDetails,
    pub traditional: Option<TraditionalScore>,
}

/// First matching rule wins. Traits absent from `scores` count as 0.
pub fn suggest_role(scores: &BTreeMap<TraitId, f64>) -> Role {
    let get = |id: TraitId| scores.get(&id).copied().unwrap_or(0.0);
    let leadership = get(TraitId::Leadership);
    let vision = get(TraitId::Vision);
    let finance = get(TraitId::FinancialResponsibility);
    let tech = get(TraitId::TechnicalSkills);
    let comms = get(TraitId::Communication);
    let teamwork = get(TraitId::Teamwork);

    if leadership >= 8.0 && vision >= 8.0 {
        Role::Ceo
    } else if finance >= 8.0 && leadership >= 6.0 {
        Role::Cfo
    } else if tech >= 8.0 && vision >= 7.0 {
        Role::Cto
    } else if comms >= 8.0 && teamwork >= 8.0 {
        Role::Coo
    } else if vision >= 8.0 && tech >= 7.0 {
        Role::ChiefArchitect
    } else {
        Role::TeamMember
    }
}

fn mean<I: IntoIterator<Item = f64>>(values: I) -> Option<f64> {
    let (sum, count) = values
        .into_iter()
        .fold((0.0, 0usize), |(sum, count), value| (sum + value, count + 1));
    (count > 0).then(|| sum / count as f64)
}

#[derive(Debug, Clone)]
pub struct Ranker<D> {
    engine: TraitEngine<D>,
    config: EngineConfig,
}

impl Default for Ranker<ClassicalDignity> {
    fn default() -> Self {
        Self::new(ClassicalDignity, EngineConfig::default())
    }
}

impl<D: DignityProvider> Ranker<D> {
    pub fn new(dignity: D, config: EngineConfig) -> Self {
        Self {
            engine: TraitEngine::new(dignity),
            config,
        }
    }

    pub fn engine(&self) -> &TraitEngine<D> {
        &self.engine
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Ranks `candidates` for a perspective given by name.
    ///
    /// An unrecognised perspective yields an empty list.
    pub fn rank(
        &self,
        candidates: &[Candidate],
        perspective: &str,
        base: Option<&Chart>,
        use_traditional: bool,
    ) -> Vec<RankedResult> {
        match perspective.parse::<Perspective>() {
            Ok(perspective) => self.rank_for(candidates, perspective, base, use_traditional),
            Err(err) => {
                warn!(%err, "cannot rank candidates");
                Vec::new()
            }
        }
    }

    /// Sorted by descending score. Candidates with equal scores keep their input order.
    pub fn rank_for(
        &self,
        candidates: &[Candidate],
        perspective: Perspective,
        base: Option<&Chart>,
        use_traditional: bool,
    ) -> Vec<RankedResult> {
        let mut results: Vec<RankedResult> = candidates
            .iter()
            .map(|candidate| self.score_candidate(candidate, perspective, base, use_traditional))
            .collect();
        results.sort_by(|a, b| b.score.total_cmp(&a.score));
        results
    }

    fn score_candidate(
        &self,
        candidate: &Candidate,
        perspective: Perspective,
        base: Option<&Chart>,
        use_traditional: bool,
    ) -> RankedResult {
        let profile = perspective.profile();
        let scores = self.engine.scores(&candidate.chart);
        let individual_score =
            mean(profile.trait_ids().filter_map(|id| scores.get(&id).copied())).unwrap_or(0.0);

        let sections = profile
            .sections()
            .iter()
            .map(|section| SectionScore {
                title: section.title.to_string(),
                score: mean(section.traits.iter().filter_map(|id| scores.get(id).copied())),
            })
            .collect();

        let synastry: Option<SynastryResult> = base.map(|base| {
            compatibility_with(base, &candidate.chart, perspective, &self.config.synastry)
        });

        let traditional = match base {
            Some(base) if use_traditional && perspective.is_romantic() => {
                let result = match perspective {
                    Perspective::GirlSeekingBoy => ashtakoota(base, &candidate.chart),
                    _ => ashtakoota(&candidate.chart, base),
                };
                Some(TraditionalScore::from(result))
            }
            _ => None,
        };

        let weights = &self.config.ranking;
        let score = match (&traditional, &synastry) {
            (Some(traditional), _) => traditional.total,
            (None, Some(synastry)) => {
                weights.individual * individual_score + weights.compatibility * synastry.score
            }
            (None, None) => individual_score,
        };

        let suggested_role =
            (perspective == Perspective::BusinessPartner).then(|| suggest_role(&scores));

        debug!(
            candidate = %candidate.id,
            %perspective,
            individual_score,
            compatibility = ?synastry.as_ref().map(|s| s.score),
            score,
            "scored candidate"
        );

        let (compatibility_score, compatibility_details) = match synastry {
            Some(synastry) => (Some(synastry.score), synastry.details),
            None => (None, Vec::new()),
        };

        RankedResult {
            candidate_id: candidate.id.clone(),
            name: candidate.name.clone(),
            score,
            individual_score,
            compatibility_score,
            compatibility_details,
            perspective_details: PerspectiveDetails {
                perspective,
                profile,
                title: profile.title().to_string(),
                sections,
                suggested_role,
            },
            traditional,
        }
    }
}
