//! Fixed wording for summaries, readiness, guardrails and caveats.

use crate::models::{PhenotypeTag, SymptomSubtype};

/// Message template builder for the patient summary, guardrails and caveats.
/// Patient wording is plain US English; clinician wording stays terse.
pub struct MessageTemplates;

impl MessageTemplates {
    /// Lay description of a symptom group.
    pub fn subtype_description(subtype: SymptomSubtype) -> &'static str {
        match subtype {
            SymptomSubtype::Sleepy => {
                "People in this group feel very tired during the day. \
                 Effective treatment usually improves alertness and driving safety."
            }
            SymptomSubtype::DisturbedSleep => {
                "Your sleep is broken or restless even if you are not very sleepy in the daytime."
            }
            SymptomSubtype::MinimallySymptomatic => {
                "You do not notice many symptoms, but untreated breathing pauses \
                 can still affect long-term health."
            }
        }
    }

    /// Lay explanation of one contributing factor.
    pub fn phenotype_explanation(tag: PhenotypeTag) -> &'static str {
        match tag {
            PhenotypeTag::HighAnatomicalContribution => {
                "Your airway is relatively narrow or crowded."
            }
            PhenotypeTag::LowArousalThreshold => {
                "You wake up very easily; even small breathing disturbances can fragment sleep."
            }
            PhenotypeTag::HighLoopGain => {
                "Your breathing control system is extra sensitive and can \
                 \"over-correct,\" causing pauses."
            }
            PhenotypeTag::PoorMuscleResponsiveness => {
                "Muscles that normally hold the airway open during sleep do not respond strongly."
            }
            PhenotypeTag::PositionalOsa => "Problems arise mainly when you sleep on your back.",
            PhenotypeTag::RemPredominantOsa => {
                "Problems arise mainly during dream (REM) sleep."
            }
            PhenotypeTag::HighHypoxicBurden => {
                "Your oxygen level spends a lot of time low during sleep, \
                 which can strain the heart."
            }
            PhenotypeTag::NasalResistanceContributor => {
                "Your nose is partly blocked, which makes breathing through it \
                 at night harder and can make CPAP less comfortable."
            }
        }
    }

    /// Borderline sleepiness note for the clinician summary.
    pub fn borderline_note(epworth: f64) -> String {
        format!(
            "Borderline sleepiness (ESS {}): reassess after treatment starts.",
            epworth
        )
    }

    /// Readiness detail when nothing stands in the way of starting CPAP.
    pub fn readiness_clear() -> String {
        "No comfort barriers identified; CPAP can start now.".to_string()
    }

    /// Readiness detail listing what should be addressed first.
    pub fn readiness_blocked(drivers: &[&str]) -> String {
        format!(
            "Address first: {}. Optimize comfort before or alongside CPAP start.",
            drivers.join("; ")
        )
    }

    /// Guardrail raised with high loop gain.
    pub fn asv_lvef_caution() -> String {
        "High loop gain: confirm LVEF>45% before ASV; ASV is contraindicated \
         when LVEF is 45% or lower."
            .to_string()
    }

    /// Guardrail raised with high hypoxic burden.
    pub fn cardiovascular_urgency() -> String {
        "High hypoxic burden: start effective therapy promptly and review \
         cardiovascular risk; do not defer treatment."
            .to_string()
    }

    /// Caveat when the positional ratio used an assumed non-supine AHI.
    pub fn non_supine_assumed(assumed: f64) -> String {
        format!(
            "Non-supine AHI not provided; assumed {} for the supine/non-supine ratio. \
             Confirm positional findings with a measured value.",
            assumed
        )
    }
}
