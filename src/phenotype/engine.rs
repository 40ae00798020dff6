//! Evaluation pipeline: normalize, detect, grade, then build the report.

use crate::config::ReportConfig;
use crate::models::MetricBundle;

use super::confidence::score_confidence;
use super::detection::detect_all;
use super::guardrails::GuardrailProtocol;
use super::messages::MessageTemplates;
use super::normalize::{normalize, RawInput};
use super::recommendations::build_plan;
use super::referral::compose_referrals;
use super::subtype::classify_subtype;
use super::summary::{clinician_summary, patient_summary};
use super::types::{PhenotypeEngine, PhenotypeFinding, PhenotypeReport};

/// Default implementation of the phenotype engine.
/// Runs detection, then grading, mapping, subtyping, guardrails and referral
/// composition over the same findings. Holds no per-evaluation state.
#[derive(Debug, Clone, Default)]
pub struct DefaultPhenotypeEngine {
    config: ReportConfig,
}

impl DefaultPhenotypeEngine {
    pub fn new(config: ReportConfig) -> Self {
        Self { config }
    }

    /// Run all detection rules and grade each finding.
    fn run_detections(m: &MetricBundle) -> Vec<PhenotypeFinding> {
        detect_all(m)
            .into_iter()
            .map(|d| PhenotypeFinding {
                confidence: score_confidence(d.tag, m),
                tag: d.tag,
                evidence: d.evidence,
            })
            .collect()
    }

    fn caveats(m: &MetricBundle) -> Vec<String> {
        let mut caveats = Vec::new();
        if m.non_supine_assumed() {
            caveats.push(MessageTemplates::non_supine_assumed(m.non_supine_ahi));
        }
        caveats
    }
}

impl PhenotypeEngine for DefaultPhenotypeEngine {
    fn evaluate(&self, input: &RawInput) -> PhenotypeReport {
        let metrics = normalize(input);
        tracing::debug!(fields = input.len(), "Raw input normalized");
        self.evaluate_metrics(&metrics)
    }

    fn evaluate_metrics(&self, metrics: &MetricBundle) -> PhenotypeReport {
        let findings = Self::run_detections(metrics);
        let recommendations = build_plan(&findings, metrics);
        let subtype = classify_subtype(metrics);
        let readiness = GuardrailProtocol::assess_readiness(&findings);
        let guardrails = GuardrailProtocol::guardrails(&findings);
        let caveats = Self::caveats(metrics);
        let referrals = compose_referrals(metrics, &findings, &subtype);

        let patient_summary = patient_summary(
            &subtype,
            &findings,
            &recommendations,
            self.config.patient_step_limit,
        );
        let clinician_summary = clinician_summary(
            metrics,
            &subtype,
            &findings,
            &recommendations,
            &readiness,
            &guardrails,
            &caveats,
        );

        tracing::info!(
            findings = findings.len(),
            recommendations = recommendations.len(),
            guardrails = guardrails.len(),
            subtype = subtype.subtype.as_str(),
            readiness = readiness.readiness.as_str(),
            "Phenotype evaluation complete"
        );

        PhenotypeReport {
            metrics: metrics.clone(),
            non_supine_provided: metrics.non_supine_provided,
            findings,
            recommendations,
            subtype,
            readiness,
            guardrails,
            caveats,
            referrals,
            patient_summary,
            clinician_summary,
        }
    }
}
