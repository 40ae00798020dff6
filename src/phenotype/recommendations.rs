//! Phenotype-to-treatment mapping.
//!
//! Recommendations are appended in detector order and de-duplicated by key
//! through a [`RecommendationPlan`] that lives for exactly one evaluation.

use std::collections::HashSet;

use crate::models::{MetricBundle, PhenotypeTag};

use super::detection::BMI_OBESE;
use super::helpers::{at_least, default_dedup_key};
use super::types::{PhenotypeFinding, Recommendation};

pub const KEY_CPAP: &str = "CPAP";
pub const KEY_WEIGHT: &str = "WEIGHT";
pub const KEY_SURGALT: &str = "SURGALT";
pub const KEY_CPAP_OPT: &str = "CPAP-OPT";
pub const KEY_CBTI: &str = "CBTI";
pub const KEY_CPAP_FIXED: &str = "CPAP-FIXED";
pub const KEY_HLG_ADV: &str = "HLG-ADV";
pub const KEY_HNS: &str = "HNS";
pub const KEY_POS: &str = "POS";
pub const KEY_REM_CHECK: &str = "REM-CHECK";
pub const KEY_REM_MAD: &str = "REM-MAD";
pub const KEY_HB_URG: &str = "HB-URG";
pub const KEY_NASAL_SURG: &str = "NASAL-SURG";
pub const KEY_MAD: &str = "MAD";
pub const KEY_SURG: &str = "SURG";

impl Recommendation {
    pub fn new(dedup_key: &str, text: &str) -> Self {
        Self {
            dedup_key: dedup_key.to_string(),
            text: text.to_string(),
        }
    }

    /// Recommendation without an explicit key; the key is derived from the text.
    pub fn untagged(text: &str) -> Self {
        Self {
            dedup_key: default_dedup_key(text),
            text: text.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// RecommendationPlan: call-scoped dedup context
// ---------------------------------------------------------------------------

/// Ordered, de-duplicated recommendation list under construction.
#[derive(Debug, Default)]
pub struct RecommendationPlan {
    seen: HashSet<String>,
    items: Vec<Recommendation>,
}

impl RecommendationPlan {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append unless the key is already claimed. Returns whether it was added.
    pub fn push(&mut self, recommendation: Recommendation) -> bool {
        if !self.seen.insert(recommendation.dedup_key.clone()) {
            return false;
        }
        self.items.push(recommendation);
        true
    }

    pub fn extend(&mut self, recommendations: impl IntoIterator<Item = Recommendation>) {
        for recommendation in recommendations {
            self.push(recommendation);
        }
    }

    fn len(&self) -> usize {
        self.items.len()
    }

    pub fn into_vec(self) -> Vec<Recommendation> {
        self.items
    }
}

// ---------------------------------------------------------------------------
// Mapping
// ---------------------------------------------------------------------------

/// The fixed recommendation list for one phenotype.
pub fn recommendations_for(tag: PhenotypeTag, m: &MetricBundle) -> Vec<Recommendation> {
    match tag {
        PhenotypeTag::HighAnatomicalContribution => {
            let mut recs = vec![Recommendation::new(
                KEY_CPAP,
                "Start CPAP/APAP (most effective for anatomical causes).",
            )];
            if at_least(m.body_mass_index, BMI_OBESE) {
                recs.push(Recommendation::new(
                    KEY_WEIGHT,
                    "Enroll in a structured weight-loss program.",
                ));
            }
            recs.push(Recommendation::new(
                KEY_SURGALT,
                "If CPAP fails: consider a mandibular-advancement device or \
                 site-directed surgery / hypoglossal-nerve stimulation.",
            ));
            recs
        }
        PhenotypeTag::LowArousalThreshold => vec![
            Recommendation::new(
                KEY_CPAP_OPT,
                "Optimize CPAP comfort (humidification, auto-ramp, mask fit).",
            ),
            Recommendation::new(
                KEY_CBTI,
                "Add CBT-I; low-dose sedative (e.g., trazodone) only under sleep-specialist care.",
            ),
        ],
        PhenotypeTag::HighLoopGain => vec![
            Recommendation::new(
                KEY_CPAP_FIXED,
                "Use fixed-pressure CPAP and monitor for treatment-emergent central apneas.",
            ),
            Recommendation::new(
                KEY_HLG_ADV,
                "If centrals persist: consider nocturnal O₂, acetazolamide, or ASV \
                 (contraindicated if LVEF ≤ 45%).",
            ),
        ],
        PhenotypeTag::PoorMuscleResponsiveness => vec![Recommendation::new(
            KEY_HNS,
            "Ensure adequate CPAP titration; evaluate for hypoglossal-nerve stimulation \
             if CPAP fails.",
        )],
        PhenotypeTag::PositionalOsa => vec![Recommendation::new(
            KEY_POS,
            "Begin positional therapy (vibratory trainer / backpack pillow).",
        )],
        PhenotypeTag::RemPredominantOsa => vec![
            Recommendation::new(
                KEY_REM_CHECK,
                "Verify therapy is effective during REM; CPAP pressure may need to be \
                 higher in REM.",
            ),
            Recommendation::new(
                KEY_REM_MAD,
                "Consider a mandibular-advancement device if REM-related events persist \
                 or CPAP is not tolerated.",
            ),
        ],
        PhenotypeTag::HighHypoxicBurden => vec![Recommendation::new(
            KEY_HB_URG,
            "Initiate effective therapy promptly to lower cardiovascular risk.",
        )],
        PhenotypeTag::NasalResistanceContributor => vec![Recommendation::new(
            KEY_NASAL_SURG,
            "Treat nasal obstruction (intranasal steroid; ENT review for septoplasty or \
             turbinate reduction) to improve CPAP tolerance.",
        )],
    }
}

/// Baseline options offered to every patient, appended last.
pub fn baseline_recommendations() -> Vec<Recommendation> {
    vec![
        Recommendation::new(
            KEY_CPAP,
            "Initiate CPAP/APAP (first-line therapy for most patients).",
        ),
        Recommendation::new(
            KEY_MAD,
            "Mandibular-advancement device as an alternative for mild-to-moderate OSA \
             or CPAP intolerance.",
        ),
        Recommendation::new(
            KEY_SURG,
            "Surgical evaluation (DISE with VOTE classification) if CPAP and MAD are \
             not tolerated.",
        ),
    ]
}

/// Build the ranked plan for one evaluation.
pub fn build_plan(findings: &[PhenotypeFinding], m: &MetricBundle) -> Vec<Recommendation> {
    let mut plan = RecommendationPlan::new();
    let mut offered = 0;
    for finding in findings {
        let recommendations = recommendations_for(finding.tag, m);
        offered += recommendations.len();
        plan.extend(recommendations);
    }
    let baseline = baseline_recommendations();
    offered += baseline.len();
    plan.extend(baseline);

    tracing::debug!(
        recommendations = plan.len(),
        duplicates = offered - plan.len(),
        "Recommendation plan built"
    );
    plan.into_vec()
}
