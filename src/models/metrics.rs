use serde::{Deserialize, Serialize};

use super::enums::{MallampatiClass, RhinitisSeverity};

/// Value substituted for a missing non-supine AHI.
pub const DEFAULT_NON_SUPINE_AHI: f64 = 1.0;

/// Value substituted for each missing nadir SpO2 source before taking the minimum.
pub const DEFAULT_NADIR_SPO2: f64 = 99.0;

/// Normalized clinical metrics for one evaluation.
///
/// `None` means the field was absent or did not parse; it never stands in for
/// zero. The only defaulted values are `non_supine_ahi` (see
/// `non_supine_provided`) and `nadir_spo2`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricBundle {
    // Anatomical
    pub body_mass_index: Option<f64>,
    /// Inches.
    pub neck_circumference: Option<f64>,
    pub tonsil_size: Option<f64>,
    pub mallampati_class: Option<MallampatiClass>,
    pub apnea_hypopnea_index: Option<f64>,

    // Arousal
    pub arousal_index: Option<f64>,
    pub insomnia_severity_index: Option<f64>,

    // Loop gain
    pub cheyne_stokes_percent: Option<f64>,
    pub central_pahi3: Option<f64>,
    pub central_pahi4: Option<f64>,
    pub cardiovascular_disease_present: bool,

    // Muscle / positional / REM
    pub rem_ahi: Option<f64>,
    pub nrem_ahi: Option<f64>,
    pub supine_ahi: Option<f64>,
    pub non_supine_ahi: f64,
    pub non_supine_provided: bool,

    // Hypoxic
    pub oxygen_desaturation_index4: Option<f64>,
    pub nadir_spo2: f64,
    pub hypoxic_burden_per_hour: Option<f64>,
    pub hypoxic_burden_total: Option<f64>,
    pub area_under_90: Option<f64>,

    // Nasal
    pub septum_deviated: bool,
    pub turbinate_hypertrophy: bool,
    pub rhinitis_severity: Option<RhinitisSeverity>,

    // Symptoms
    pub epworth_score: Option<f64>,
}

impl Default for MetricBundle {
    fn default() -> Self {
        Self::empty()
    }
}

impl MetricBundle {
    /// A bundle with nothing recorded, defaults applied.
    pub fn empty() -> Self {
        Self {
            body_mass_index: None,
            neck_circumference: None,
            tonsil_size: None,
            mallampati_class: None,
            apnea_hypopnea_index: None,
            arousal_index: None,
            insomnia_severity_index: None,
            cheyne_stokes_percent: None,
            central_pahi3: None,
            central_pahi4: None,
            cardiovascular_disease_present: false,
            rem_ahi: None,
            nrem_ahi: None,
            supine_ahi: None,
            non_supine_ahi: DEFAULT_NON_SUPINE_AHI,
            non_supine_provided: false,
            oxygen_desaturation_index4: None,
            nadir_spo2: DEFAULT_NADIR_SPO2,
            hypoxic_burden_per_hour: None,
            hypoxic_burden_total: None,
            area_under_90: None,
            septum_deviated: false,
            turbinate_hypertrophy: false,
            rhinitis_severity: None,
            epworth_score: None,
        }
    }

    /// Whether the positional ratio is computed against the substituted
    /// non-supine value rather than a measured one.
    pub fn non_supine_assumed(&self) -> bool {
        !self.non_supine_provided && self.supine_ahi.is_some()
    }
}
