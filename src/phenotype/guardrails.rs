//! CPAP readiness and advisory safety guardrails.

use crate::models::{GuardrailKind, PhenotypeTag, Readiness};

use super::messages::MessageTemplates;
use super::types::{Guardrail, PhenotypeFinding, ReadinessAssessment};

/// Safety checks derived from the phenotype set.
///
/// Guardrails are advisory: they are reported next to the plan and never
/// remove or reorder recommendations.
pub struct GuardrailProtocol;

impl GuardrailProtocol {
    /// CPAP readiness. Comfort barriers (low arousal threshold, nasal
    /// resistance) should be addressed before or alongside the start.
    pub fn assess_readiness(findings: &[PhenotypeFinding]) -> ReadinessAssessment {
        let drivers: Vec<&str> = findings
            .iter()
            .filter_map(|f| match f.tag {
                PhenotypeTag::LowArousalThreshold => Some("low arousal threshold"),
                PhenotypeTag::NasalResistanceContributor => Some("nasal resistance"),
                _ => None,
            })
            .collect();

        if drivers.is_empty() {
            ReadinessAssessment {
                readiness: Readiness::ReadyNow,
                detail: MessageTemplates::readiness_clear(),
            }
        } else {
            ReadinessAssessment {
                readiness: Readiness::OptimizeComfortFirst,
                detail: MessageTemplates::readiness_blocked(&drivers),
            }
        }
    }

    /// Guardrail warnings, in phenotype order.
    pub fn guardrails(findings: &[PhenotypeFinding]) -> Vec<Guardrail> {
        findings
            .iter()
            .filter_map(|f| match f.tag {
                PhenotypeTag::HighLoopGain => Some(Guardrail {
                    kind: GuardrailKind::AsvLvefCaution,
                    message: MessageTemplates::asv_lvef_caution(),
                }),
                PhenotypeTag::HighHypoxicBurden => Some(Guardrail {
                    kind: GuardrailKind::CardiovascularUrgency,
                    message: MessageTemplates::cardiovascular_urgency(),
                }),
                _ => None,
            })
            .collect()
    }
}
