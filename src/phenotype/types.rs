//! Report types, the boundary error and the engine trait.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{
    ConfidenceLevel, GuardrailKind, MetricBundle, PhenotypeTag, Readiness, ReferralAudience,
    SymptomSubtype,
};

use super::normalize::RawInput;

// ---------------------------------------------------------------------------
// PhenotypeFinding
// ---------------------------------------------------------------------------

/// A triggered phenotype with the observations that triggered it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhenotypeFinding {
    pub tag: PhenotypeTag,
    /// Never empty; every entry is a non-empty string.
    pub evidence: Vec<String>,
    pub confidence: ConfidenceLevel,
}

// ---------------------------------------------------------------------------
// Recommendation
// ---------------------------------------------------------------------------

/// One line of the ranked treatment plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    /// Stable key used for de-duplication (`CPAP`, `POS`, ...).
    pub dedup_key: String,
    pub text: String,
}

// ---------------------------------------------------------------------------
// Subtype, readiness, guardrails
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubtypeAssessment {
    pub subtype: SymptomSubtype,
    /// Minimally symptomatic with Epworth in [12, 15).
    pub borderline: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadinessAssessment {
    pub readiness: Readiness,
    pub detail: String,
}

/// Advisory safety note. Never alters the recommendation list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Guardrail {
    pub kind: GuardrailKind,
    pub message: String,
}

// ---------------------------------------------------------------------------
// Referral notes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferralNote {
    pub audience: ReferralAudience,
    pub title: String,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferralNotes {
    pub dental: ReferralNote,
    pub ent: ReferralNote,
    pub cardiology: ReferralNote,
}

impl ReferralNotes {
    pub fn iter(&self) -> impl Iterator<Item = &ReferralNote> {
        [&self.dental, &self.ent, &self.cardiology].into_iter()
    }
}

// ---------------------------------------------------------------------------
// Summaries
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientFactor {
    pub label: String,
    pub explanation: String,
}

/// Plain-language summary for the patient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientSummary {
    pub group: String,
    pub group_description: String,
    pub contributing_factors: Vec<PatientFactor>,
    pub next_steps: Vec<String>,
}

/// Decision-support summary for the clinician.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClinicianSummary {
    pub subtype_line: String,
    pub triggers: Vec<String>,
    pub ranked_plan: Vec<String>,
    pub readiness_line: String,
    pub guardrails: Vec<String>,
    pub caveats: Vec<String>,
}

// ---------------------------------------------------------------------------
// PhenotypeReport
// ---------------------------------------------------------------------------

/// Everything one evaluation produces. Built fresh per call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhenotypeReport {
    pub metrics: MetricBundle,
    pub non_supine_provided: bool,
    pub findings: Vec<PhenotypeFinding>,
    pub recommendations: Vec<Recommendation>,
    pub subtype: SubtypeAssessment,
    pub readiness: ReadinessAssessment,
    pub guardrails: Vec<Guardrail>,
    pub caveats: Vec<String>,
    pub referrals: ReferralNotes,
    pub patient_summary: PatientSummary,
    pub clinician_summary: ClinicianSummary,
}

impl PhenotypeReport {
    pub fn has(&self, tag: PhenotypeTag) -> bool {
        self.findings.iter().any(|f| f.tag == tag)
    }

    pub fn finding(&self, tag: PhenotypeTag) -> Option<&PhenotypeFinding> {
        self.findings.iter().find(|f| f.tag == tag)
    }

    pub fn tags(&self) -> Vec<PhenotypeTag> {
        self.findings.iter().map(|f| f.tag).collect()
    }

    pub fn to_json_pretty(&self) -> Result<String, PhenotypeError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| PhenotypeError::Serialization(e.to_string()))
    }
}

// ---------------------------------------------------------------------------
// PhenotypeError
// ---------------------------------------------------------------------------

/// Failures at the I/O boundary. Evaluation itself cannot fail.
#[derive(Error, Debug)]
pub enum PhenotypeError {
    #[error("Input load failed ({0}): {1}")]
    InputLoad(String, String),

    #[error("Input parse failed ({0}): {1}")]
    InputParse(String, String),

    #[error("Config load failed ({0}): {1}")]
    ConfigLoad(String, String),

    #[error("Config parse failed ({0}): {1}")]
    ConfigParse(String, String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

// ---------------------------------------------------------------------------
// PhenotypeEngine trait
// ---------------------------------------------------------------------------

/// The phenotyping engine.
pub trait PhenotypeEngine {
    /// Normalize raw form fields and evaluate them.
    fn evaluate(&self, input: &RawInput) -> PhenotypeReport;

    /// Evaluate an already-normalized bundle.
    fn evaluate_metrics(&self, metrics: &MetricBundle) -> PhenotypeReport;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn finding(tag: PhenotypeTag) -> PhenotypeFinding {
        PhenotypeFinding {
            tag,
            evidence: vec!["x".into()],
            confidence: ConfidenceLevel::Low,
        }
    }

    #[test]
    fn referral_notes_iterate_in_fixed_order() {
        let note = |audience| ReferralNote {
            audience,
            title: String::new(),
            body: String::new(),
        };
        let notes = ReferralNotes {
            dental: note(ReferralAudience::Dental),
            ent: note(ReferralAudience::Ent),
            cardiology: note(ReferralAudience::Cardiology),
        };
        let order: Vec<_> = notes.iter().map(|n| n.audience).collect();
        assert_eq!(
            order,
            vec![
                ReferralAudience::Dental,
                ReferralAudience::Ent,
                ReferralAudience::Cardiology
            ]
        );
    }

    #[test]
    fn finding_serializes_tag_and_confidence_as_identifiers() {
        let json = serde_json::to_value(finding(PhenotypeTag::HighLoopGain)).unwrap();
        assert_eq!(json["tag"], "high_loop_gain");
        assert_eq!(json["confidence"], "low");
    }

    #[test]
    fn error_messages_name_the_source() {
        let err = PhenotypeError::InputParse("in.json".into(), "expected object".into());
        assert_eq!(
            err.to_string(),
            "Input parse failed (in.json): expected object"
        );
    }
}
