//! Raw form fields to a typed [`MetricBundle`].
//!
//! Several fields reach us under historical names (`ahi` or `pahi`, `pahic` or
//! `pahic3`, ...). Each logical metric lists its aliases in priority order and
//! takes the first one that yields a usable value. Nothing here fails: a value
//! that does not parse is treated as absent.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::models::{
    MallampatiClass, MetricBundle, RhinitisSeverity, DEFAULT_NADIR_SPO2, DEFAULT_NON_SUPINE_AHI,
};

use super::helpers::format_value;
use super::types::PhenotypeError;

// ---------------------------------------------------------------------------
// Alias groups (first usable value wins)
// ---------------------------------------------------------------------------

const BMI: &[&str] = &["bmi"];
const NECK: &[&str] = &["neck"];
const TONSILS: &[&str] = &["tonsils"];
const MALLAMPATI: &[&str] = &["mallampati", "ftp"];
const AHI: &[&str] = &["ahi", "pahi"];
const AROUSAL_INDEX: &[&str] = &["arInd", "arousalIndex"];
const ISI: &[&str] = &["isi"];
const CSR: &[&str] = &["csr"];
const PAHIC3: &[&str] = &["pahic3", "pahic"];
const PAHIC4: &[&str] = &["pahic4"];
const CVD: &[&str] = &["cvd"];
const REM_AHI: &[&str] = &["ahiREM", "remPahi"];
const NREM_AHI: &[&str] = &["ahiNREM", "nremPahi"];
const SUPINE_AHI: &[&str] = &["ahiSup", "supPahi"];
const NON_SUPINE_AHI: &[&str] = &["ahiNonSup", "nonSupPahi"];
const ODI: &[&str] = &["odi", "odi4"];
const NADIR_HSAT: &[&str] = &["nadir"];
const NADIR_PSG: &[&str] = &["nadirPsg"];
const HB_TOTAL: &[&str] = &["hbTotal", "hypoxicBurdenTotal"];
const HB_PER_HOUR: &[&str] = &["hbPerHour", "hbPerHr", "hbph"];
const AREA_UNDER_90: &[&str] = &["au90", "areaUnder90", "areaBelow90"];
const SEPTUM: &[&str] = &["ctSeptum", "septum"];
const TURBINATES: &[&str] = &["ctTurbs", "turbinates"];
const RHINITIS: &[&str] = &["rhinitis"];
const EPWORTH: &[&str] = &["ess", "epworth"];

/// Checkbox values that count as ticked.
const CHECKED_VALUES: &[&str] = &["on", "Yes"];

// ---------------------------------------------------------------------------
// RawValue / RawInput
// ---------------------------------------------------------------------------

/// One raw form value as submitted.
///
/// Any JSON value deserializes; shapes that carry no usable data (null,
/// objects) are kept and read as absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Null,
    Flag(bool),
    Number(f64),
    Text(String),
    /// Repeated values from checkbox-style fields.
    Many(Vec<RawValue>),
    Other(serde_json::Value),
}

impl RawValue {
    fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => n.is_finite().then_some(*n),
            Self::Text(s) => parse_number(s),
            Self::Many(values) => values.iter().find_map(RawValue::as_number),
            Self::Null | Self::Flag(_) | Self::Other(_) => None,
        }
    }

    fn as_text(&self) -> Option<Cow<'_, str>> {
        match self {
            Self::Text(s) if !s.trim().is_empty() => Some(Cow::Borrowed(s.as_str())),
            Self::Number(n) if n.is_finite() => Some(Cow::Owned(format_value(*n))),
            Self::Many(values) => values.iter().find_map(RawValue::as_text),
            _ => None,
        }
    }

    fn is_checked(&self) -> bool {
        match self {
            Self::Flag(b) => *b,
            Self::Text(s) => CHECKED_VALUES.contains(&s.as_str()),
            Self::Many(values) => values.iter().any(RawValue::is_checked),
            Self::Null | Self::Number(_) | Self::Other(_) => false,
        }
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<f64> for RawValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<bool> for RawValue {
    fn from(value: bool) -> Self {
        Self::Flag(value)
    }
}

/// Field name to raw value, exactly as collected from the input form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawInput {
    fields: BTreeMap<String, RawValue>,
}

impl RawInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, field: &str, value: impl Into<RawValue>) -> Self {
        self.insert(field, value);
        self
    }

    pub fn insert(&mut self, field: &str, value: impl Into<RawValue>) {
        self.fields.insert(field.to_string(), value.into());
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Parse a JSON object of field values.
    pub fn from_json_str(source: &str, json: &str) -> Result<Self, PhenotypeError> {
        serde_json::from_str(json)
            .map_err(|e| PhenotypeError::InputParse(source.to_string(), e.to_string()))
    }

    /// Load a JSON object of field values from disk.
    pub fn load(path: &Path) -> Result<Self, PhenotypeError> {
        let json = std::fs::read_to_string(path).map_err(|e| {
            PhenotypeError::InputLoad(path.display().to_string(), e.to_string())
        })?;
        Self::from_json_str(&path.display().to_string(), &json)
    }

    fn number(&self, aliases: &[&str]) -> Option<f64> {
        for alias in aliases {
            let Some(raw) = self.fields.get(*alias) else {
                continue;
            };
            match raw.as_number() {
                Some(value) => return Some(value),
                None => tracing::debug!(field = *alias, "ignoring non-numeric value"),
            }
        }
        None
    }

    fn text(&self, aliases: &[&str]) -> Option<Cow<'_, str>> {
        aliases
            .iter()
            .find_map(|alias| self.fields.get(*alias).and_then(RawValue::as_text))
    }

    fn checked(&self, aliases: &[&str]) -> bool {
        aliases
            .iter()
            .filter_map(|alias| self.fields.get(*alias))
            .any(RawValue::is_checked)
    }
}

/// Parse a numeric form value. Blank, non-numeric and non-finite values are absent.
pub fn parse_number(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

// ---------------------------------------------------------------------------
// Normalization
// ---------------------------------------------------------------------------

/// Build the metric bundle for one evaluation.
pub fn normalize(input: &RawInput) -> MetricBundle {
    let mallampati_class = input.text(MALLAMPATI).and_then(|raw| {
        MallampatiClass::parse_loose(&raw)
            .map_err(|e| tracing::debug!(error = %e, "unrecognized Mallampati class"))
            .ok()
    });
    let rhinitis_severity = input.text(RHINITIS).and_then(|raw| {
        RhinitisSeverity::parse_loose(&raw)
            .map_err(|e| tracing::debug!(error = %e, "unrecognized rhinitis severity"))
            .ok()
    });

    let measured_non_supine = input.number(NON_SUPINE_AHI);

    let nadir_spo2 = input
        .number(NADIR_HSAT)
        .unwrap_or(DEFAULT_NADIR_SPO2)
        .min(input.number(NADIR_PSG).unwrap_or(DEFAULT_NADIR_SPO2));

    MetricBundle {
        body_mass_index: input.number(BMI),
        neck_circumference: input.number(NECK),
        tonsil_size: input.number(TONSILS),
        mallampati_class,
        apnea_hypopnea_index: input.number(AHI),
        arousal_index: input.number(AROUSAL_INDEX),
        insomnia_severity_index: input.number(ISI),
        cheyne_stokes_percent: input.number(CSR),
        central_pahi3: input.number(PAHIC3),
        central_pahi4: input.number(PAHIC4),
        cardiovascular_disease_present: input.checked(CVD),
        rem_ahi: input.number(REM_AHI),
        nrem_ahi: input.number(NREM_AHI),
        supine_ahi: input.number(SUPINE_AHI),
        non_supine_ahi: measured_non_supine.unwrap_or(DEFAULT_NON_SUPINE_AHI),
        non_supine_provided: measured_non_supine.is_some(),
        oxygen_desaturation_index4: input.number(ODI),
        nadir_spo2,
        hypoxic_burden_per_hour: input.number(HB_PER_HOUR),
        hypoxic_burden_total: input.number(HB_TOTAL),
        area_under_90: input.number(AREA_UNDER_90),
        septum_deviated: input.checked(SEPTUM),
        turbinate_hypertrophy: input.checked(TURBINATES),
        rhinitis_severity,
        epworth_score: input.number(EPWORTH),
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn parse_number_treats_blank_and_garbage_as_absent() {
        assert_eq!(parse_number(""), None);
        assert_eq!(parse_number("   "), None);
        assert_eq!(parse_number("abc"), None);
        assert_eq!(parse_number("NaN"), None);
        assert_eq!(parse_number("inf"), None);
        assert_eq!(parse_number(" 32.5 "), Some(32.5));
        assert_eq!(parse_number("0"), Some(0.0));
    }

    #[test]
    fn empty_input_yields_empty_bundle() {
        assert_eq!(normalize(&RawInput::new()), MetricBundle::empty());
    }

    #[test]
    fn primary_alias_wins_over_legacy_name() {
        let input = RawInput::new().with("ahi", "40").with("pahi", "12");
        assert_eq!(normalize(&input).apnea_hypopnea_index, Some(40.0));
    }

    #[test]
    fn legacy_alias_used_when_primary_missing() {
        let input = RawInput::new()
            .with("pahi", "12")
            .with("pahic", "11")
            .with("remPahi", "30")
            .with("nremPahi", "8")
            .with("supPahi", "25")
            .with("nonSupPahi", "4")
            .with("hbph", "6")
            .with("areaBelow90", "2")
            .with("hypoxicBurdenTotal", "31");
        let m = normalize(&input);
        assert_eq!(m.apnea_hypopnea_index, Some(12.0));
        assert_eq!(m.central_pahi3, Some(11.0));
        assert_eq!(m.rem_ahi, Some(30.0));
        assert_eq!(m.nrem_ahi, Some(8.0));
        assert_eq!(m.supine_ahi, Some(25.0));
        assert_eq!(m.non_supine_ahi, 4.0);
        assert!(m.non_supine_provided);
        assert_eq!(m.hypoxic_burden_per_hour, Some(6.0));
        assert_eq!(m.area_under_90, Some(2.0));
        assert_eq!(m.hypoxic_burden_total, Some(31.0));
    }

    #[test]
    fn unparseable_primary_falls_through_to_next_alias() {
        let input = RawInput::new().with("ahi", "n/a").with("pahi", "18");
        assert_eq!(normalize(&input).apnea_hypopnea_index, Some(18.0));
    }

    #[test]
    fn zero_is_a_value_not_absence() {
        let input = RawInput::new().with("ahi", "0").with("pahi", "18");
        assert_eq!(normalize(&input).apnea_hypopnea_index, Some(0.0));
    }

    #[test]
    fn missing_non_supine_defaults_to_one_and_is_flagged() {
        let m = normalize(&RawInput::new().with("ahiSup", "20"));
        assert_eq!(m.non_supine_ahi, 1.0);
        assert!(!m.non_supine_provided);
    }

    #[test]
    fn nadir_takes_minimum_with_99_default() {
        assert_eq!(normalize(&RawInput::new()).nadir_spo2, 99.0);
        assert_eq!(normalize(&RawInput::new().with("nadir", "88")).nadir_spo2, 88.0);
        assert_eq!(
            normalize(&RawInput::new().with("nadirPsg", "82")).nadir_spo2,
            82.0
        );
        let both = RawInput::new().with("nadir", "84").with("nadirPsg", "90");
        assert_eq!(normalize(&both).nadir_spo2, 84.0);
    }

    #[test]
    fn checkboxes_accept_on_and_yes_only() {
        let input = RawInput::new()
            .with("cvd", "on")
            .with("ctSeptum", "Yes")
            .with("ctTurbs", "no");
        let m = normalize(&input);
        assert!(m.cardiovascular_disease_present);
        assert!(m.septum_deviated);
        assert!(!m.turbinate_hypertrophy);

        let lower = normalize(&RawInput::new().with("cvd", "yes"));
        assert!(!lower.cardiovascular_disease_present);
    }

    #[test]
    fn repeated_checkbox_values_are_checked_if_any_is() {
        let mut input = RawInput::new();
        input.insert(
            "ctTurbs",
            RawValue::Many(vec!["".into(), "on".into()]),
        );
        assert!(normalize(&input).turbinate_hypertrophy);
    }

    #[test]
    fn json_booleans_and_numbers_are_accepted() {
        let input = RawInput::from_json_str(
            "inline",
            r#"{"cvd": true, "ahi": 31, "ftp": "IV", "rhinitis": "Moderate"}"#,
        )
        .unwrap();
        let m = normalize(&input);
        assert!(m.cardiovascular_disease_present);
        assert_eq!(m.apnea_hypopnea_index, Some(31.0));
        assert_eq!(m.mallampati_class, Some(MallampatiClass::IV));
        assert_eq!(m.rhinitis_severity, Some(RhinitisSeverity::Moderate));
    }

    #[test]
    fn numeric_mallampati_from_json() {
        let input = RawInput::from_json_str("inline", r#"{"ftp": 3}"#).unwrap();
        assert_eq!(normalize(&input).mallampati_class, Some(MallampatiClass::III));

        let out_of_range = RawInput::from_json_str("inline", r#"{"ftp": 5}"#).unwrap();
        assert_eq!(normalize(&out_of_range).mallampati_class, None);
    }

    #[test]
    fn null_field_is_absent_not_an_error() {
        let input =
            RawInput::from_json_str("inline", r#"{"ahi": "35", "nadir": null}"#).unwrap();
        let m = normalize(&input);
        assert_eq!(m.apnea_hypopnea_index, Some(35.0));
        assert_eq!(m.nadir_spo2, 99.0);
    }

    #[test]
    fn arrays_and_objects_of_any_shape_are_accepted() {
        let input = RawInput::from_json_str(
            "inline",
            r#"{"bmi": [32], "neck": [null, "18"], "cvd": ["on"], "ahi": {"value": 30}}"#,
        )
        .unwrap();
        let m = normalize(&input);
        assert_eq!(m.body_mass_index, Some(32.0));
        assert_eq!(m.neck_circumference, Some(18.0));
        assert!(m.cardiovascular_disease_present);
        assert_eq!(m.apnea_hypopnea_index, None);
    }

    #[test]
    fn unknown_enum_values_are_absent() {
        let input = RawInput::new().with("ftp", "V").with("rhinitis", "awful");
        let m = normalize(&input);
        assert_eq!(m.mallampati_class, None);
        assert_eq!(m.rhinitis_severity, None);
    }

    #[test]
    fn non_object_json_is_a_parse_error() {
        let err = RawInput::from_json_str("inline", "[1, 2]").unwrap_err();
        assert!(matches!(err, PhenotypeError::InputParse(..)));
    }

    #[test]
    fn load_reads_json_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"ahi": "33", "ess": "16"}}"#).unwrap();
        let input = RawInput::load(file.path()).unwrap();
        assert_eq!(input.len(), 2);
        assert_eq!(normalize(&input).epworth_score, Some(16.0));
    }

    #[test]
    fn load_missing_file_is_load_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = RawInput::load(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, PhenotypeError::InputLoad(..)));
    }
}
