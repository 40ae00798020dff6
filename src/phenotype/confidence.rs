//! Confidence grading for triggered phenotypes.
//!
//! Each tag has its own strength criteria. Grading never triggers a tag on its
//! own: it is only applied to detections that already fired.

use crate::models::{ConfidenceLevel, MetricBundle, PhenotypeTag, RhinitisSeverity};

use super::detection::{
    AHI_SEVERE, CENTRAL_EVENTS, ISI_CLINICAL, LOW_RESIDUAL_AHI, NADIR_LOW, ODI_HIGH,
    STAGE_RATIO, TONSILS_ENLARGED,
};
use super::helpers::{above, at_least, count_true, ratio};

const BMI_SEVERE_OBESITY: f64 = 35.0;
const NECK_VERY_LARGE_IN: f64 = 17.5;

const ISI_SEVERE: f64 = 22.0;
const AROUSAL_RATIO_STRONG: f64 = 1.8;
const AROUSAL_RATIO_MODERATE: f64 = 1.3;

const CENTRAL_EVENTS_STRONG: f64 = 20.0;

const MUSCLE_RATIO_STRONG: f64 = 2.5;

const STAGE_RATIO_STRONG: f64 = 3.0;
const LOW_RESIDUAL_AHI_STRONG: f64 = 10.0;

const HB_PER_HOUR_STRONG: f64 = 5.0;
const HB_TOTAL_STRONG: f64 = 30.0;
const AREA_UNDER_90_STRONG: f64 = 1.0;
const NADIR_VERY_LOW: f64 = 80.0;
const ODI_VERY_HIGH: f64 = 60.0;

/// Grade one triggered phenotype.
pub fn score_confidence(tag: PhenotypeTag, m: &MetricBundle) -> ConfidenceLevel {
    match tag {
        PhenotypeTag::HighAnatomicalContribution => anatomical(m),
        PhenotypeTag::LowArousalThreshold => low_arousal(m),
        PhenotypeTag::HighLoopGain => loop_gain(m),
        PhenotypeTag::PoorMuscleResponsiveness => poor_muscle(m),
        PhenotypeTag::PositionalOsa => positional(m),
        PhenotypeTag::RemPredominantOsa => rem_predominant(m),
        PhenotypeTag::HighHypoxicBurden => hypoxic_burden(m),
        PhenotypeTag::NasalResistanceContributor => nasal(m),
    }
}

fn grade(high: bool, moderate: bool) -> ConfidenceLevel {
    if high {
        ConfidenceLevel::High
    } else if moderate {
        ConfidenceLevel::Moderate
    } else {
        ConfidenceLevel::Low
    }
}

fn anatomical(m: &MetricBundle) -> ConfidenceLevel {
    let strong = count_true(&[
        at_least(m.body_mass_index, BMI_SEVERE_OBESITY),
        at_least(m.neck_circumference, NECK_VERY_LARGE_IN),
        at_least(m.tonsil_size, TONSILS_ENLARGED),
        m.mallampati_class.is_some_and(|c| c.is_crowded()),
        at_least(m.apnea_hypopnea_index, AHI_SEVERE),
    ]);
    grade(strong >= 4, strong >= 2)
}

fn low_arousal(m: &MetricBundle) -> ConfidenceLevel {
    let arousal_ratio = ratio(m.arousal_index, m.apnea_hypopnea_index);
    grade(
        at_least(m.insomnia_severity_index, ISI_SEVERE)
            || at_least(arousal_ratio, AROUSAL_RATIO_STRONG),
        at_least(m.insomnia_severity_index, ISI_CLINICAL)
            || at_least(arousal_ratio, AROUSAL_RATIO_MODERATE),
    )
}

fn loop_gain(m: &MetricBundle) -> ConfidenceLevel {
    let central = |threshold| {
        at_least(m.cheyne_stokes_percent, threshold)
            || at_least(m.central_pahi3, threshold)
            || at_least(m.central_pahi4, threshold)
    };
    grade(
        central(CENTRAL_EVENTS_STRONG),
        central(CENTRAL_EVENTS) || m.cardiovascular_disease_present,
    )
}

fn poor_muscle(m: &MetricBundle) -> ConfidenceLevel {
    let stage_ratio = ratio(m.rem_ahi, m.nrem_ahi);
    grade(
        at_least(m.apnea_hypopnea_index, AHI_SEVERE) && above(stage_ratio, MUSCLE_RATIO_STRONG),
        above(stage_ratio, STAGE_RATIO),
    )
}

fn positional(m: &MetricBundle) -> ConfidenceLevel {
    let position_ratio = ratio(m.supine_ahi, Some(m.non_supine_ahi));
    let residual = m.non_supine_ahi;
    grade(
        at_least(position_ratio, STAGE_RATIO_STRONG) && residual < LOW_RESIDUAL_AHI_STRONG,
        at_least(position_ratio, STAGE_RATIO) && residual < LOW_RESIDUAL_AHI,
    )
}

fn rem_predominant(m: &MetricBundle) -> ConfidenceLevel {
    let stage_ratio = ratio(m.rem_ahi, m.nrem_ahi);
    let residual_below = |limit: f64| m.nrem_ahi.is_some_and(|v| v < limit);
    grade(
        at_least(stage_ratio, STAGE_RATIO_STRONG) && residual_below(LOW_RESIDUAL_AHI_STRONG),
        at_least(stage_ratio, STAGE_RATIO) && residual_below(LOW_RESIDUAL_AHI),
    )
}

fn hypoxic_burden(m: &MetricBundle) -> ConfidenceLevel {
    grade(
        at_least(m.hypoxic_burden_per_hour, HB_PER_HOUR_STRONG)
            || at_least(m.hypoxic_burden_total, HB_TOTAL_STRONG)
            || at_least(m.area_under_90, AREA_UNDER_90_STRONG)
            || m.nadir_spo2 < NADIR_VERY_LOW
            || at_least(m.oxygen_desaturation_index4, ODI_VERY_HIGH),
        m.nadir_spo2 < NADIR_LOW || at_least(m.oxygen_desaturation_index4, ODI_HIGH),
    )
}

fn nasal(m: &MetricBundle) -> ConfidenceLevel {
    let count = count_true(&[
        m.septum_deviated,
        m.turbinate_hypertrophy,
        m.rhinitis_severity == Some(RhinitisSeverity::Severe),
    ]);
    grade(count >= 2, count == 1)
}
