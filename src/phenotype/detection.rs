//! The eight phenotype rules, evaluated in a fixed order.
//!
//! Evidence lists only the sub-conditions that hold; a rule with no evidence
//! does not fire.

use crate::models::{MetricBundle, PhenotypeTag};

use super::helpers::{above, at_least, below, count_true, format_ratio, format_value, ratio};

// Anatomical
pub const BMI_OBESE: f64 = 30.0;
pub const NECK_LARGE_IN: f64 = 17.0;
pub const TONSILS_ENLARGED: f64 = 3.0;
pub const AHI_SEVERE: f64 = 30.0;
const ANATOMICAL_MIN_HITS: usize = 3;

// Arousal
pub const ISI_CLINICAL: f64 = 15.0;
pub const AROUSAL_RATIO: f64 = 1.3;

// Loop gain
pub const CENTRAL_EVENTS: f64 = 10.0;

// Positional / REM / muscle
pub const STAGE_RATIO: f64 = 2.0;
pub const LOW_RESIDUAL_AHI: f64 = 15.0;

// Hypoxic burden
pub const HB_PER_HOUR: f64 = 5.0;
pub const HB_TOTAL: f64 = 30.0;
pub const NADIR_LOW: f64 = 85.0;
pub const ODI_HIGH: f64 = 40.0;

/// A triggered rule and the observations that triggered it.
#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    pub tag: PhenotypeTag,
    pub evidence: Vec<String>,
}

/// Evaluate every phenotype rule in fixed order.
pub fn detect_all(metrics: &MetricBundle) -> Vec<Detection> {
    PhenotypeTag::ALL
        .iter()
        .filter_map(|tag| detect(*tag, metrics))
        .collect()
}

/// Evaluate one phenotype rule.
pub fn detect(tag: PhenotypeTag, m: &MetricBundle) -> Option<Detection> {
    let evidence = match tag {
        PhenotypeTag::HighAnatomicalContribution => detect_anatomical(m),
        PhenotypeTag::LowArousalThreshold => detect_low_arousal(m),
        PhenotypeTag::HighLoopGain => detect_loop_gain(m),
        PhenotypeTag::PoorMuscleResponsiveness => detect_poor_muscle(m),
        PhenotypeTag::PositionalOsa => detect_positional(m),
        PhenotypeTag::RemPredominantOsa => detect_rem_predominant(m),
        PhenotypeTag::HighHypoxicBurden => detect_hypoxic_burden(m),
        PhenotypeTag::NasalResistanceContributor => detect_nasal(m),
    }?;

    let evidence: Vec<String> = evidence.into_iter().filter(|e| !e.is_empty()).collect();
    if evidence.is_empty() {
        return None;
    }
    Some(Detection { tag, evidence })
}

/// Collect the evidence strings whose condition holds.
fn collect(items: Vec<(bool, String)>) -> Vec<String> {
    items
        .into_iter()
        .filter_map(|(hit, text)| hit.then_some(text))
        .collect()
}

fn detect_anatomical(m: &MetricBundle) -> Option<Vec<String>> {
    let hits = [
        at_least(m.body_mass_index, BMI_OBESE),
        at_least(m.neck_circumference, NECK_LARGE_IN),
        at_least(m.tonsil_size, TONSILS_ENLARGED),
        m.mallampati_class.is_some_and(|c| c.is_crowded()),
        at_least(m.apnea_hypopnea_index, AHI_SEVERE),
    ];
    if count_true(&hits) < ANATOMICAL_MIN_HITS {
        return None;
    }

    Some(collect(vec![
        (hits[0], format!("BMI {}", opt(m.body_mass_index))),
        (hits[1], format!("Neck {} in", opt(m.neck_circumference))),
        (hits[2], format!("Tonsils {}", opt(m.tonsil_size))),
        (
            hits[3],
            format!(
                "Mallampati {}",
                m.mallampati_class.map(|c| c.as_str()).unwrap_or_default()
            ),
        ),
        (hits[4], format!("AHI {}", opt(m.apnea_hypopnea_index))),
    ]))
}

fn detect_low_arousal(m: &MetricBundle) -> Option<Vec<String>> {
    let isi_hit = at_least(m.insomnia_severity_index, ISI_CLINICAL);
    let arousal_ratio = ratio(m.arousal_index, m.apnea_hypopnea_index);
    let ratio_hit = above(arousal_ratio, AROUSAL_RATIO);
    if !(isi_hit || ratio_hit) {
        return None;
    }

    Some(collect(vec![
        (isi_hit, format!("ISI {}", opt(m.insomnia_severity_index))),
        (
            ratio_hit,
            format!("Arousal/AHI {}", arousal_ratio.map(format_ratio).unwrap_or_default()),
        ),
    ]))
}

fn detect_loop_gain(m: &MetricBundle) -> Option<Vec<String>> {
    let csr_hit = at_least(m.cheyne_stokes_percent, CENTRAL_EVENTS);
    let pahic3_hit = at_least(m.central_pahi3, CENTRAL_EVENTS);
    let pahic4_hit = at_least(m.central_pahi4, CENTRAL_EVENTS);
    let cvd_hit = m.cardiovascular_disease_present;
    if !(csr_hit || pahic3_hit || pahic4_hit || cvd_hit) {
        return None;
    }

    Some(collect(vec![
        (csr_hit, format!("CSR {}%", opt(m.cheyne_stokes_percent))),
        (pahic3_hit, format!("pAHIc3 {}", opt(m.central_pahi3))),
        (pahic4_hit, format!("pAHIc4 {}", opt(m.central_pahi4))),
        (cvd_hit, "CVD present".to_string()),
    ]))
}

fn detect_poor_muscle(m: &MetricBundle) -> Option<Vec<String>> {
    let stage_ratio = ratio(m.rem_ahi, m.nrem_ahi)?;
    if !(at_least(m.apnea_hypopnea_index, AHI_SEVERE) && stage_ratio > STAGE_RATIO) {
        return None;
    }

    Some(vec![
        format!("AHI {}", opt(m.apnea_hypopnea_index)),
        format!("REM/NREM ratio {}", format_ratio(stage_ratio)),
    ])
}

fn detect_positional(m: &MetricBundle) -> Option<Vec<String>> {
    let position_ratio = ratio(m.supine_ahi, Some(m.non_supine_ahi))?;
    if !(position_ratio > STAGE_RATIO && m.non_supine_ahi < LOW_RESIDUAL_AHI) {
        return None;
    }

    let mut evidence = vec![format!("Supine/non-supine {}", format_ratio(position_ratio))];
    if !m.non_supine_provided {
        evidence.push(format!(
            "Non-supine AHI assumed {} (not provided)",
            format_value(m.non_supine_ahi)
        ));
    }
    Some(evidence)
}

fn detect_rem_predominant(m: &MetricBundle) -> Option<Vec<String>> {
    let stage_ratio = ratio(m.rem_ahi, m.nrem_ahi)?;
    if !(stage_ratio > STAGE_RATIO && below(m.nrem_ahi, LOW_RESIDUAL_AHI)) {
        return None;
    }

    Some(vec![
        format!("REM/NREM {}", format_ratio(stage_ratio)),
        format!("NREM AHI {}", opt(m.nrem_ahi)),
    ])
}

fn detect_hypoxic_burden(m: &MetricBundle) -> Option<Vec<String>> {
    let per_hour_hit = at_least(m.hypoxic_burden_per_hour, HB_PER_HOUR);
    let total_hit = at_least(m.hypoxic_burden_total, HB_TOTAL);
    let area_hit = above(m.area_under_90, 0.0);
    let nadir_hit = m.nadir_spo2 < NADIR_LOW;
    let odi_hit = at_least(m.oxygen_desaturation_index4, ODI_HIGH);
    if !(per_hour_hit || total_hit || area_hit || nadir_hit || odi_hit) {
        return None;
    }

    Some(collect(vec![
        (
            per_hour_hit,
            format!("Hypoxic burden {} %min/h", opt(m.hypoxic_burden_per_hour)),
        ),
        (
            total_hit,
            format!("Hypoxic burden total {} %min", opt(m.hypoxic_burden_total)),
        ),
        (area_hit, format!("Area under 90% {}", opt(m.area_under_90))),
        (nadir_hit, format!("Nadir SpO₂ {}%", format_value(m.nadir_spo2))),
        (odi_hit, format!("ODI4 {}", opt(m.oxygen_desaturation_index4))),
    ]))
}

fn detect_nasal(m: &MetricBundle) -> Option<Vec<String>> {
    let rhinitis_hit = m.rhinitis_severity.is_some_and(|r| r.is_significant());
    if !(m.septum_deviated || m.turbinate_hypertrophy || rhinitis_hit) {
        return None;
    }

    Some(collect(vec![
        (m.septum_deviated, "Deviated septum".to_string()),
        (m.turbinate_hypertrophy, "Turbinate hypertrophy".to_string()),
        (
            rhinitis_hit,
            format!(
                "Rhinitis {}",
                m.rhinitis_severity.map(|r| r.as_str()).unwrap_or_default()
            ),
        ),
    ]))
}

/// Only called for metrics whose condition already held, so never blank in practice.
fn opt(value: Option<f64>) -> String {
    value.map(format_value).unwrap_or_default()
}
