//! Patient-facing and clinician-facing summaries.
//!
//! Both are plain structured text; turning them into HTML is left to the caller.

use crate::models::MetricBundle;

use super::helpers::format_optional;
use super::messages::MessageTemplates;
use super::types::{
    ClinicianSummary, Guardrail, PatientFactor, PatientSummary, PhenotypeFinding,
    ReadinessAssessment, Recommendation, SubtypeAssessment,
};

/// Plain-language summary: symptom group, contributing factors, first steps.
pub fn patient_summary(
    subtype: &SubtypeAssessment,
    findings: &[PhenotypeFinding],
    recommendations: &[Recommendation],
    step_limit: usize,
) -> PatientSummary {
    PatientSummary {
        group: subtype.subtype.label().to_string(),
        group_description: MessageTemplates::subtype_description(subtype.subtype).to_string(),
        contributing_factors: findings
            .iter()
            .map(|f| PatientFactor {
                label: f.tag.label().to_string(),
                explanation: MessageTemplates::phenotype_explanation(f.tag).to_string(),
            })
            .collect(),
        next_steps: recommendations
            .iter()
            .take(step_limit)
            .map(|r| r.text.clone())
            .collect(),
    }
}

/// Decision-support summary: triggers with confidence, full ranked plan, safety notes.
pub fn clinician_summary(
    m: &MetricBundle,
    subtype: &SubtypeAssessment,
    findings: &[PhenotypeFinding],
    recommendations: &[Recommendation],
    readiness: &ReadinessAssessment,
    guardrails: &[Guardrail],
    caveats: &[String],
) -> ClinicianSummary {
    let mut subtype_line = format!(
        "Subtype: {} (ESS {}, ISI {})",
        subtype.subtype.label(),
        format_optional(m.epworth_score),
        format_optional(m.insomnia_severity_index),
    );
    if subtype.borderline {
        if let Some(ess) = m.epworth_score {
            subtype_line.push(' ');
            subtype_line.push_str(&MessageTemplates::borderline_note(ess));
        }
    }

    ClinicianSummary {
        subtype_line,
        triggers: findings
            .iter()
            .map(|f| {
                format!(
                    "{} [{}]: {}",
                    f.tag.label(),
                    f.confidence.label(),
                    f.evidence.join(", ")
                )
            })
            .collect(),
        ranked_plan: recommendations
            .iter()
            .enumerate()
            .map(|(i, r)| format!("{}. {}", i + 1, r.text))
            .collect(),
        readiness_line: format!(
            "CPAP readiness: {}. {}",
            readiness.readiness.label(),
            readiness.detail
        ),
        guardrails: guardrails.iter().map(|g| g.message.clone()).collect(),
        caveats: caveats.to_vec(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ConfidenceLevel, PhenotypeTag, Readiness, SymptomSubtype};

    fn recs(n: usize) -> Vec<Recommendation> {
        (0..n)
            .map(|i| Recommendation::new(&format!("K{i}"), &format!("Step {i}")))
            .collect()
    }

    fn ready() -> ReadinessAssessment {
        ReadinessAssessment {
            readiness: Readiness::ReadyNow,
            detail: "No barriers.".into(),
        }
    }

    #[test]
    fn patient_steps_are_capped() {
        let subtype = SubtypeAssessment {
            subtype: SymptomSubtype::Sleepy,
            borderline: false,
        };
        let summary = patient_summary(&subtype, &[], &recs(8), 5);
        assert_eq!(summary.next_steps.len(), 5);
        assert_eq!(summary.next_steps[0], "Step 0");
        assert_eq!(summary.group, "Sleepy");
        assert!(summary.contributing_factors.is_empty());
    }

    #[test]
    fn patient_factors_follow_findings() {
        let subtype = SubtypeAssessment {
            subtype: SymptomSubtype::DisturbedSleep,
            borderline: false,
        };
        let findings = [PhenotypeFinding {
            tag: PhenotypeTag::PositionalOsa,
            evidence: vec!["Supine/non-supine 4.0".into()],
            confidence: ConfidenceLevel::High,
        }];
        let summary = patient_summary(&subtype, &findings, &recs(2), 5);
        assert_eq!(summary.contributing_factors[0].label, "Positional OSA");
        assert!(summary.contributing_factors[0].explanation.contains("on your back"));
    }

    #[test]
    fn clinician_lines_include_confidence_and_numbering() {
        let m = MetricBundle {
            epworth_score: Some(13.0),
            ..MetricBundle::empty()
        };
        let subtype = SubtypeAssessment {
            subtype: SymptomSubtype::MinimallySymptomatic,
            borderline: true,
        };
        let findings = [PhenotypeFinding {
            tag: PhenotypeTag::HighHypoxicBurden,
            evidence: vec!["Nadir SpO₂ 80%".into()],
            confidence: ConfidenceLevel::Moderate,
        }];
        let summary = clinician_summary(
            &m,
            &subtype,
            &findings,
            &recs(2),
            &ready(),
            &[],
            &["caveat".to_string()],
        );
        assert!(summary
            .subtype_line
            .starts_with("Subtype: Minimally symptomatic (ESS 13, ISI —)"));
        assert!(summary.subtype_line.contains("Borderline sleepiness"));
        assert_eq!(
            summary.triggers,
            vec!["High Hypoxic Burden [Moderate]: Nadir SpO₂ 80%"]
        );
        assert_eq!(summary.ranked_plan, vec!["1. Step 0", "2. Step 1"]);
        assert!(summary.readiness_line.starts_with("CPAP readiness: Ready now."));
        assert_eq!(summary.caveats, vec!["caveat"]);
    }
}
