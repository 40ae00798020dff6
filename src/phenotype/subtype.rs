//! Symptom subtype from Epworth and ISI scores.

use crate::models::{MetricBundle, SymptomSubtype};

use super::detection::ISI_CLINICAL;
use super::helpers::at_least;
use super::types::SubtypeAssessment;

const EPWORTH_SLEEPY: f64 = 15.0;
const EPWORTH_BORDERLINE: f64 = 12.0;

/// Symptom cluster from Epworth and ISI. Sleepiness takes precedence.
pub fn classify_subtype(m: &MetricBundle) -> SubtypeAssessment {
    let subtype = if at_least(m.epworth_score, EPWORTH_SLEEPY) {
        SymptomSubtype::Sleepy
    } else if at_least(m.insomnia_severity_index, ISI_CLINICAL) {
        SymptomSubtype::DisturbedSleep
    } else {
        SymptomSubtype::MinimallySymptomatic
    };

    let borderline = subtype == SymptomSubtype::MinimallySymptomatic
        && m
            .epworth_score
            .is_some_and(|ess| (EPWORTH_BORDERLINE..EPWORTH_SLEEPY).contains(&ess));

    SubtypeAssessment {
        subtype,
        borderline,
    }
}
