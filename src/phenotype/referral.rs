//! Referral notes for dental (MAD), ENT and cardiology colleagues.
//!
//! Pure formatting over an evaluation that has already been computed.

use crate::models::{MetricBundle, PhenotypeTag, ReferralAudience};

use super::helpers::{format_optional, format_ratio, format_value, ratio};
use super::types::{PhenotypeFinding, ReferralNote, ReferralNotes, SubtypeAssessment};

/// Compose all three referral notes.
pub fn compose_referrals(
    m: &MetricBundle,
    findings: &[PhenotypeFinding],
    subtype: &SubtypeAssessment,
) -> ReferralNotes {
    let header = NoteHeader::new(m, findings, subtype);
    ReferralNotes {
        dental: dental_note(&header, findings),
        ent: ent_note(&header, findings),
        cardiology: cardiology_note(&header, findings),
    }
}

/// Lines shared by every note.
struct NoteHeader {
    core_numbers: String,
    phenotypes: String,
    subtype: String,
}

impl NoteHeader {
    fn new(m: &MetricBundle, findings: &[PhenotypeFinding], subtype: &SubtypeAssessment) -> Self {
        let position_ratio = match ratio(m.supine_ahi, Some(m.non_supine_ahi)) {
            Some(r) if m.non_supine_provided => format_ratio(r),
            Some(r) => format!("{} (non-supine assumed)", format_ratio(r)),
            None => "—".to_string(),
        };
        let core_numbers = format!(
            "Core numbers: AHI {} | REM AHI {} | NREM AHI {} | Supine/non-supine {} | Nadir SpO₂ {}%",
            format_optional(m.apnea_hypopnea_index),
            format_optional(m.rem_ahi),
            format_optional(m.nrem_ahi),
            position_ratio,
            format_value(m.nadir_spo2),
        );

        let labels: Vec<&str> = findings.iter().map(|f| f.tag.label()).collect();
        let phenotypes = if labels.is_empty() {
            "Phenotypes: none identified".to_string()
        } else {
            format!("Phenotypes: {}", labels.join(", "))
        };

        Self {
            core_numbers,
            phenotypes,
            subtype: format!("Symptom subtype: {}", subtype.subtype.label()),
        }
    }

    fn lines(&self) -> Vec<String> {
        vec![
            self.core_numbers.clone(),
            self.phenotypes.clone(),
            self.subtype.clone(),
        ]
    }
}

fn evidence_of(findings: &[PhenotypeFinding], tag: PhenotypeTag) -> Option<String> {
    findings
        .iter()
        .find(|f| f.tag == tag)
        .map(|f| f.evidence.join(", "))
}

fn note(audience: ReferralAudience, title: &str, lines: Vec<String>) -> ReferralNote {
    ReferralNote {
        audience,
        title: title.to_string(),
        body: lines.join("\n"),
    }
}

fn dental_note(header: &NoteHeader, findings: &[PhenotypeFinding]) -> ReferralNote {
    let mut lines = vec!["Dear colleague,".to_string()];
    lines.push(
        "Please evaluate this patient for a custom, titratable mandibular-advancement device (MAD)."
            .to_string(),
    );
    lines.extend(header.lines());

    if evidence_of(findings, PhenotypeTag::PositionalOsa).is_some() {
        lines.push(
            "Positional component present: MAD can be combined with positional therapy."
                .to_string(),
        );
    }
    if evidence_of(findings, PhenotypeTag::RemPredominantOsa).is_some() {
        lines.push(
            "REM-predominant events: please confirm efficacy during REM sleep at follow-up."
                .to_string(),
        );
    }
    if let Some(evidence) = evidence_of(findings, PhenotypeTag::HighAnatomicalContribution) {
        lines.push(format!(
            "Anatomical crowding ({}): MAD response may be partial; combined therapy may be needed.",
            evidence
        ));
    }
    lines.push(
        "Follow-up: repeat HSAT/PSG with the device in place after titration.".to_string(),
    );

    note(
        ReferralAudience::Dental,
        "Dental referral: mandibular-advancement device",
        lines,
    )
}

fn ent_note(header: &NoteHeader, findings: &[PhenotypeFinding]) -> ReferralNote {
    let mut lines = vec!["Dear colleague,".to_string()];
    lines.push(
        "Please assess the upper airway; DISE with VOTE classification if surgery is considered."
            .to_string(),
    );
    lines.extend(header.lines());

    if let Some(evidence) = evidence_of(findings, PhenotypeTag::NasalResistanceContributor) {
        lines.push(format!(
            "Nasal findings ({}): evaluate for septoplasty / turbinate reduction to improve CPAP tolerance.",
            evidence
        ));
    }
    if let Some(evidence) = evidence_of(findings, PhenotypeTag::HighAnatomicalContribution) {
        lines.push(format!(
            "Anatomical contribution ({}): assess tonsils, palate and tongue base.",
            evidence
        ));
    }
    if evidence_of(findings, PhenotypeTag::PoorMuscleResponsiveness).is_some() {
        lines.push(
            "Poor muscle responsiveness: assess candidacy for hypoglossal-nerve stimulation."
                .to_string(),
        );
    }

    note(ReferralAudience::Ent, "ENT referral: upper-airway evaluation", lines)
}

fn cardiology_note(header: &NoteHeader, findings: &[PhenotypeFinding]) -> ReferralNote {
    let mut lines = vec!["Dear colleague,".to_string()];
    lines.push("Please review cardiovascular risk in the setting of OSA.".to_string());
    lines.extend(header.lines());

    if let Some(evidence) = evidence_of(findings, PhenotypeTag::HighHypoxicBurden) {
        lines.push(format!(
            "High hypoxic burden ({}): therapy is being started promptly; please assess cardiovascular risk.",
            evidence
        ));
    }
    if let Some(evidence) = evidence_of(findings, PhenotypeTag::HighLoopGain) {
        lines.push(format!(
            "High loop gain ({}): please report LVEF; ASV is contraindicated when LVEF ≤ 45%.",
            evidence
        ));
    }

    note(
        ReferralAudience::Cardiology,
        "Cardiology referral: cardiovascular review",
        lines,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ConfidenceLevel, SymptomSubtype};

    fn finding(tag: PhenotypeTag, evidence: &[&str]) -> PhenotypeFinding {
        PhenotypeFinding {
            tag,
            evidence: evidence.iter().map(|e| e.to_string()).collect(),
            confidence: ConfidenceLevel::Moderate,
        }
    }

    fn minimal() -> SubtypeAssessment {
        SubtypeAssessment {
            subtype: SymptomSubtype::MinimallySymptomatic,
            borderline: false,
        }
    }

    #[test]
    fn core_numbers_show_dash_for_absent_metrics() {
        let notes = compose_referrals(&MetricBundle::empty(), &[], &minimal());
        assert!(notes.dental.body.contains(
            "Core numbers: AHI — | REM AHI — | NREM AHI — | Supine/non-supine — | Nadir SpO₂ 99%"
        ));
        assert!(notes.ent.body.contains("Phenotypes: none identified"));
    }

    #[test]
    fn assumed_non_supine_is_marked() {
        let m = MetricBundle {
            supine_ahi: Some(20.0),
            ..MetricBundle::empty()
        };
        let notes = compose_referrals(&m, &[], &minimal());
        assert!(notes
            .cardiology
            .body
            .contains("Supine/non-supine 20.0 (non-supine assumed)"));
    }

    #[test]
    fn nasal_note_only_when_nasal_phenotype_present() {
        let m = MetricBundle::empty();
        let without = compose_referrals(&m, &[], &minimal());
        assert!(!without.ent.body.contains("Nasal findings"));

        let nasal = [finding(
            PhenotypeTag::NasalResistanceContributor,
            &["Deviated septum"],
        )];
        let with = compose_referrals(&m, &nasal, &minimal());
        assert!(with.ent.body.contains("Nasal findings (Deviated septum)"));
        assert!(with
            .ent
            .body
            .contains("Phenotypes: Nasal Resistance Contributor"));
    }

    #[test]
    fn cardiology_note_carries_loop_gain_and_hypoxic_notes() {
        let findings = [
            finding(PhenotypeTag::HighLoopGain, &["CVD present"]),
            finding(PhenotypeTag::HighHypoxicBurden, &["Nadir SpO₂ 80%"]),
        ];
        let notes = compose_referrals(&MetricBundle::empty(), &findings, &minimal());
        assert!(notes.cardiology.body.contains("High loop gain (CVD present)"));
        assert!(notes.cardiology.body.contains("High hypoxic burden (Nadir SpO₂ 80%)"));
        assert!(!notes.dental.body.contains("High loop gain"));
    }

    #[test]
    fn dental_note_mentions_positional_and_rem() {
        let findings = [
            finding(PhenotypeTag::PositionalOsa, &["Supine/non-supine 4.0"]),
            finding(PhenotypeTag::RemPredominantOsa, &["REM/NREM 3.0"]),
        ];
        let notes = compose_referrals(&MetricBundle::empty(), &findings, &minimal());
        assert!(notes.dental.body.contains("positional therapy"));
        assert!(notes.dental.body.contains("REM-predominant"));
        assert_eq!(notes.dental.audience, ReferralAudience::Dental);
    }
}
