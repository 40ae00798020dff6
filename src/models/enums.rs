use serde::{Deserialize, Serialize};

use super::ModelError;

/// Macro to generate enum with as_str + std::str::FromStr pattern
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $s)] $variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = ModelError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(ModelError::InvalidEnum {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }
    };
}

str_enum!(MallampatiClass {
    I => "I",
    II => "II",
    III => "III",
    IV => "IV",
});

impl MallampatiClass {
    /// Accepts roman (`III`) or arabic (`3`) class, any case.
    pub fn parse_loose(raw: &str) -> Result<Self, ModelError> {
        let upper = raw.trim().to_uppercase();
        match upper.as_str() {
            "1" => Ok(Self::I),
            "2" => Ok(Self::II),
            "3" => Ok(Self::III),
            "4" => Ok(Self::IV),
            other => other.parse(),
        }
    }

    /// Class III or IV: soft palate largely hidden.
    pub fn is_crowded(&self) -> bool {
        matches!(self, Self::III | Self::IV)
    }
}

str_enum!(RhinitisSeverity {
    None => "none",
    Mild => "mild",
    Moderate => "moderate",
    Severe => "severe",
});

impl RhinitisSeverity {
    pub fn parse_loose(raw: &str) -> Result<Self, ModelError> {
        raw.trim().to_lowercase().parse()
    }

    /// Moderate or severe rhinitis counts toward nasal resistance.
    pub fn is_significant(&self) -> bool {
        matches!(self, Self::Moderate | Self::Severe)
    }
}

// Declaration order is the detector's evaluation order.
str_enum!(PhenotypeTag {
    HighAnatomicalContribution => "high_anatomical_contribution",
    LowArousalThreshold => "low_arousal_threshold",
    HighLoopGain => "high_loop_gain",
    PoorMuscleResponsiveness => "poor_muscle_responsiveness",
    PositionalOsa => "positional_osa",
    RemPredominantOsa => "rem_predominant_osa",
    HighHypoxicBurden => "high_hypoxic_burden",
    NasalResistanceContributor => "nasal_resistance_contributor",
});

impl PhenotypeTag {
    pub const ALL: [PhenotypeTag; 8] = [
        Self::HighAnatomicalContribution,
        Self::LowArousalThreshold,
        Self::HighLoopGain,
        Self::PoorMuscleResponsiveness,
        Self::PositionalOsa,
        Self::RemPredominantOsa,
        Self::HighHypoxicBurden,
        Self::NasalResistanceContributor,
    ];

    /// Human-readable name used in both reports.
    pub fn label(&self) -> &'static str {
        match self {
            Self::HighAnatomicalContribution => "High Anatomical Contribution",
            Self::LowArousalThreshold => "Low Arousal Threshold",
            Self::HighLoopGain => "High Loop Gain",
            Self::PoorMuscleResponsiveness => "Poor Muscle Responsiveness",
            Self::PositionalOsa => "Positional OSA",
            Self::RemPredominantOsa => "REM-Predominant OSA",
            Self::HighHypoxicBurden => "High Hypoxic Burden",
            Self::NasalResistanceContributor => "Nasal Resistance Contributor",
        }
    }
}

str_enum!(ConfidenceLevel {
    Low => "low",
    Moderate => "moderate",
    High => "high",
});

impl ConfidenceLevel {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Moderate => "Moderate",
            Self::High => "High",
        }
    }
}

str_enum!(SymptomSubtype {
    Sleepy => "sleepy",
    DisturbedSleep => "disturbed_sleep",
    MinimallySymptomatic => "minimally_symptomatic",
});

impl SymptomSubtype {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Sleepy => "Sleepy",
            Self::DisturbedSleep => "Disturbed sleep",
            Self::MinimallySymptomatic => "Minimally symptomatic",
        }
    }
}

str_enum!(Readiness {
    ReadyNow => "ready_now",
    OptimizeComfortFirst => "optimize_comfort_first",
});

impl Readiness {
    pub fn label(&self) -> &'static str {
        match self {
            Self::ReadyNow => "Ready now",
            Self::OptimizeComfortFirst => "Optimize comfort first",
        }
    }
}

str_enum!(GuardrailKind {
    AsvLvefCaution => "asv_lvef_caution",
    CardiovascularUrgency => "cardiovascular_urgency",
});

str_enum!(ReferralAudience {
    Dental => "dental",
    Ent => "ent",
    Cardiology => "cardiology",
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phenotype_tag_round_trips_through_str() {
        for tag in PhenotypeTag::ALL {
            assert_eq!(tag.as_str().parse::<PhenotypeTag>().unwrap(), tag);
        }
    }

    #[test]
    fn phenotype_tag_all_follows_declaration_order() {
        let mut sorted = PhenotypeTag::ALL;
        sorted.sort();
        assert_eq!(sorted, PhenotypeTag::ALL);
    }

    #[test]
    fn unknown_tag_is_invalid_enum() {
        let err = "obesity".parse::<PhenotypeTag>().unwrap_err();
        assert!(matches!(err, ModelError::InvalidEnum { .. }));
    }

    #[test]
    fn mallampati_accepts_roman_and_arabic() {
        assert_eq!(MallampatiClass::parse_loose("iii").unwrap(), MallampatiClass::III);
        assert_eq!(MallampatiClass::parse_loose(" 4 ").unwrap(), MallampatiClass::IV);
        assert!(MallampatiClass::parse_loose("V").is_err());
        assert!(MallampatiClass::III.is_crowded());
        assert!(!MallampatiClass::II.is_crowded());
    }

    #[test]
    fn rhinitis_is_case_insensitive() {
        assert_eq!(
            RhinitisSeverity::parse_loose("Severe").unwrap(),
            RhinitisSeverity::Severe
        );
        assert!(RhinitisSeverity::parse_loose("extreme").is_err());
        assert!(RhinitisSeverity::Moderate.is_significant());
        assert!(!RhinitisSeverity::Mild.is_significant());
    }

    #[test]
    fn confidence_levels_are_ordered() {
        assert!(ConfidenceLevel::Low < ConfidenceLevel::Moderate);
        assert!(ConfidenceLevel::Moderate < ConfidenceLevel::High);
    }

    #[test]
    fn enums_serialize_as_identifiers() {
        let json = serde_json::to_string(&PhenotypeTag::PositionalOsa).unwrap();
        assert_eq!(json, "\"positional_osa\"");
        let json = serde_json::to_string(&MallampatiClass::IV).unwrap();
        assert_eq!(json, "\"IV\"");
    }
}
