//! Patient record types for diabetes risk prediction.
//!
//! Eight measurements from the Pima Indians Diabetes schema, in the exact
//! order the scoring model was trained on.

use serde::Serialize;
use serde_json::{Map, Value};

/// Canonical feature names, in model order.
pub const FEATURE_NAMES: [&str; 8] = [
    "Pregnancies",
    "Glucose",
    "BloodPressure",
    "SkinThickness",
    "Insulin",
    "BMI",
    "DiabetesPedigreeFunction",
    "Age",
];

/// Number of features in a [`PatientRecord`].
pub const FEATURE_COUNT: usize = FEATURE_NAMES.len();

/// Numeric kind of a record field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Integer,
    Float,
}

impl std::fmt::Display for FieldKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Integer => write!(f, "integer"),
            Self::Float => write!(f, "number"),
        }
    }
}

/// Error type for malformed patient input.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SchemaError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Field {field} must be of kind {expected}, got {found}")]
    WrongKind {
        field: &'static str,
        expected: FieldKind,
        found: String,
    },

    #[error("Unknown field: {0}")]
    UnknownField(String),

    #[error("Feature schema mismatch: expected {expected:?}, got {found:?}")]
    FeatureMismatch {
        expected: Vec<String>,
        found: Vec<String>,
    },
}

/// Declared domain of one input field.
///
/// The bounds are enforced by the input-collection layer; the builder only
/// checks presence and kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub hint: &'static str,
    pub kind: FieldKind,
    pub min: f64,
    pub max: f64,
    pub default: f64,
}

impl FieldSpec {
    /// Whether `value` lies within the declared domain (inclusive).
    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        (self.min..=self.max).contains(&value)
    }
}

/// Field specs in model order.
pub static FIELD_SPECS: [FieldSpec; FEATURE_COUNT] = [
    FieldSpec {
        name: "Pregnancies",
        label: "Pregnancies",
        hint: "count (0-20)",
        kind: FieldKind::Integer,
        min: 0.0,
        max: 20.0,
        default: 1.0,
    },
    FieldSpec {
        name: "Glucose",
        label: "Glucose",
        hint: "mg/dL (0-300)",
        kind: FieldKind::Integer,
        min: 0.0,
        max: 300.0,
        default: 120.0,
    },
    FieldSpec {
        name: "BloodPressure",
        label: "Blood Pressure",
        hint: "mmHg diastolic (0-200)",
        kind: FieldKind::Integer,
        min: 0.0,
        max: 200.0,
        default: 70.0,
    },
    FieldSpec {
        name: "SkinThickness",
        label: "Skin Thickness",
        hint: "mm triceps (0-100)",
        kind: FieldKind::Integer,
        min: 0.0,
        max: 100.0,
        default: 20.0,
    },
    FieldSpec {
        name: "Insulin",
        label: "Insulin",
        hint: "mu U/ml (0-900)",
        kind: FieldKind::Integer,
        min: 0.0,
        max: 900.0,
        default: 80.0,
    },
    FieldSpec {
        name: "BMI",
        label: "BMI",
        hint: "kg/m2 (0.0-70.0)",
        kind: FieldKind::Float,
        min: 0.0,
        max: 70.0,
        default: 25.0,
    },
    FieldSpec {
        name: "DiabetesPedigreeFunction",
        label: "Diabetes Pedigree Function",
        hint: "score (0.0-3.0)",
        kind: FieldKind::Float,
        min: 0.0,
        max: 3.0,
        default: 0.5,
    },
    FieldSpec {
        name: "Age",
        label: "Age",
        hint: "years (1-120)",
        kind: FieldKind::Integer,
        min: 1.0,
        max: 120.0,
        default: 30.0,
    },
];

/// Look up a field spec by canonical name.
#[must_use]
pub fn field_spec(name: &str) -> Option<&'static FieldSpec> {
    FIELD_SPECS.iter().find(|s| s.name == name)
}

/// One patient's measurements, immutable once built.
///
/// Serializes with canonical names in model order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PatientRecord {
    #[serde(rename = "Pregnancies")]
    pregnancies: i64,
    #[serde(rename = "Glucose")]
    glucose: i64,
    #[serde(rename = "BloodPressure")]
    blood_pressure: i64,
    #[serde(rename = "SkinThickness")]
    skin_thickness: i64,
    #[serde(rename = "Insulin")]
    insulin: i64,
    #[serde(rename = "BMI")]
    bmi: f64,
    #[serde(rename = "DiabetesPedigreeFunction")]
    diabetes_pedigree: f64,
    #[serde(rename = "Age")]
    age: i64,
}

impl PatientRecord {
    /// Start building a record.
    #[must_use]
    pub fn builder() -> PatientRecordBuilder {
        PatientRecordBuilder::default()
    }

    /// Build a record from loosely typed named values (e.g. a parsed JSON object).
    ///
    /// # Errors
    /// Returns `SchemaError` if a field is missing, unknown, or of the wrong kind.
    pub fn from_fields(fields: &Map<String, Value>) -> Result<Self, SchemaError> {
        let mut builder = Self::builder();
        for (name, value) in fields {
            builder.set(name, value)?;
        }
        builder.build()
    }

    #[must_use]
    pub fn pregnancies(&self) -> i64 {
        self.pregnancies
    }

    #[must_use]
    pub fn glucose(&self) -> i64 {
        self.glucose
    }

    #[must_use]
    pub fn blood_pressure(&self) -> i64 {
        self.blood_pressure
    }

    #[must_use]
    pub fn skin_thickness(&self) -> i64 {
        self.skin_thickness
    }

    #[must_use]
    pub fn insulin(&self) -> i64 {
        self.insulin
    }

    #[must_use]
    pub fn bmi(&self) -> f64 {
        self.bmi
    }

    #[must_use]
    pub fn diabetes_pedigree(&self) -> f64 {
        self.diabetes_pedigree
    }

    #[must_use]
    pub fn age(&self) -> i64 {
        self.age
    }

    /// Convert to a feature vector for model inference.
    /// Order matches [`FEATURE_NAMES`].
    #[must_use]
    pub fn to_vec(&self) -> [f64; FEATURE_COUNT] {
        [
            self.pregnancies as f64,
            self.glucose as f64,
            self.blood_pressure as f64,
            self.skin_thickness as f64,
            self.insulin as f64,
            self.bmi,
            self.diabetes_pedigree,
            self.age as f64,
        ]
    }

    /// Iterate `(name, value)` pairs in model order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, f64)> {
        FEATURE_NAMES.into_iter().zip(self.to_vec())
    }

    /// Get a feature value by canonical name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<f64> {
        self.iter().find(|(n, _)| *n == name).map(|(_, v)| v)
    }
}

/// Builder for [`PatientRecord`].
#[derive(Debug, Clone, Default)]
pub struct PatientRecordBuilder {
    pregnancies: Option<i64>,
    glucose: Option<i64>,
    blood_pressure: Option<i64>,
    skin_thickness: Option<i64>,
    insulin: Option<i64>,
    bmi: Option<f64>,
    diabetes_pedigree: Option<f64>,
    age: Option<i64>,
}

impl PatientRecordBuilder {
    #[must_use]
    pub fn pregnancies(mut self, value: i64) -> Self {
        self.pregnancies = Some(value);
        self
    }

    #[must_use]
    pub fn glucose(mut self, value: i64) -> Self {
        self.glucose = Some(value);
        self
    }

    #[must_use]
    pub fn blood_pressure(mut self, value: i64) -> Self {
        self.blood_pressure = Some(value);
        self
    }

    #[must_use]
    pub fn skin_thickness(mut self, value: i64) -> Self {
        self.skin_thickness = Some(value);
        self
    }

    #[must_use]
    pub fn insulin(mut self, value: i64) -> Self {
        self.insulin = Some(value);
        self
    }

    #[must_use]
    pub fn bmi(mut self, value: f64) -> Self {
        self.bmi = Some(value);
        self
    }

    #[must_use]
    pub fn diabetes_pedigree(mut self, value: f64) -> Self {
        self.diabetes_pedigree = Some(value);
        self
    }

    #[must_use]
    pub fn age(mut self, value: i64) -> Self {
        self.age = Some(value);
        self
    }

    /// Set a field by canonical name from a loosely typed value.
    ///
    /// `null` leaves the field unset. Integer fields accept integral numbers only.
    ///
    /// # Errors
    /// Returns `SchemaError::UnknownField` or `SchemaError::WrongKind`.
    pub fn set(&mut self, name: &str, value: &Value) -> Result<(), SchemaError> {
        let spec = field_spec(name).ok_or_else(|| SchemaError::UnknownField(name.to_string()))?;
        if value.is_null() {
            return Ok(());
        }

        match spec.kind {
            FieldKind::Integer => {
                let v = integer_value(spec.name, value)?;
                match spec.name {
                    "Pregnancies" => self.pregnancies = Some(v),
                    "Glucose" => self.glucose = Some(v),
                    "BloodPressure" => self.blood_pressure = Some(v),
                    "SkinThickness" => self.skin_thickness = Some(v),
                    "Insulin" => self.insulin = Some(v),
                    _ => self.age = Some(v),
                }
            }
            FieldKind::Float => {
                let v = float_value(spec.name, value)?;
                match spec.name {
                    "BMI" => self.bmi = Some(v),
                    _ => self.diabetes_pedigree = Some(v),
                }
            }
        }
        Ok(())
    }

    /// Finish the record.
    ///
    /// # Errors
    /// Returns `SchemaError::MissingField` naming the first absent field in model order.
    pub fn build(self) -> Result<PatientRecord, SchemaError> {
        Ok(PatientRecord {
            pregnancies: self.pregnancies.ok_or(SchemaError::MissingField("Pregnancies"))?,
            glucose: self.glucose.ok_or(SchemaError::MissingField("Glucose"))?,
            blood_pressure: self
                .blood_pressure
                .ok_or(SchemaError::MissingField("BloodPressure"))?,
            skin_thickness: self
                .skin_thickness
                .ok_or(SchemaError::MissingField("SkinThickness"))?,
            insulin: self.insulin.ok_or(SchemaError::MissingField("Insulin"))?,
            bmi: self.bmi.ok_or(SchemaError::MissingField("BMI"))?,
            diabetes_pedigree: self
                .diabetes_pedigree
                .ok_or(SchemaError::MissingField("DiabetesPedigreeFunction"))?,
            age: self.age.ok_or(SchemaError::MissingField("Age"))?,
        })
    }
}

fn describe_value(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => format!("boolean {b}"),
        Value::Number(n) => format!("number {n}"),
        Value::String(s) => format!("string {s:?}"),
        Value::Array(_) => "array".to_string(),
        Value::Object(_) => "object".to_string(),
    }
}

fn integer_value(field: &'static str, value: &Value) -> Result<i64, SchemaError> {
    let wrong_kind = || SchemaError::WrongKind {
        field,
        expected: FieldKind::Integer,
        found: describe_value(value),
    };

    if let Some(v) = value.as_i64() {
        return Ok(v);
    }
    // Number widgets may hand back 120.0 for an integer input.
    match value.as_f64() {
        Some(v) if v.fract() == 0.0 && v.abs() <= i64::MAX as f64 => Ok(v as i64),
        _ => Err(wrong_kind()),
    }
}

fn float_value(field: &'static str, value: &Value) -> Result<f64, SchemaError> {
    value.as_f64().ok_or_else(|| SchemaError::WrongKind {
        field,
        expected: FieldKind::Float,
        found: describe_value(value),
    })
}

/// Check that a model's feature list matches [`FEATURE_NAMES`] exactly.
///
/// # Errors
/// Returns `SchemaError::FeatureMismatch` on any difference in names or order.
pub fn check_feature_names<S: AsRef<str>>(names: &[S]) -> Result<(), SchemaError> {
    let matches = names.len() == FEATURE_COUNT
        && names
            .iter()
            .zip(FEATURE_NAMES)
            .all(|(found, expected)| found.as_ref() == expected);

    if matches {
        Ok(())
    } else {
        Err(SchemaError::FeatureMismatch {
            expected: FEATURE_NAMES.iter().map(|s| (*s).to_string()).collect(),
            found: names.iter().map(|s| s.as_ref().to_string()).collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_fields() -> Map<String, Value> {
        let value = json!({
            "Pregnancies": 2,
            "Glucose": 148,
            "BloodPressure": 72,
            "SkinThickness": 35,
            "Insulin": 0,
            "BMI": 33.6,
            "DiabetesPedigreeFunction": 0.627,
            "Age": 50
        });
        match value {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_builder_produces_record() {
        let record = PatientRecord::builder()
            .pregnancies(2)
            .glucose(148)
            .blood_pressure(72)
            .skin_thickness(35)
            .insulin(0)
            .bmi(33.6)
            .diabetes_pedigree(0.627)
            .age(50)
            .build()
            .expect("Should build");

        assert_eq!(record.glucose(), 148);
        assert!((record.bmi() - 33.6).abs() < f64::EPSILON);
        assert_eq!(record.age(), 50);
    }

    #[test]
    fn test_from_fields_matches_builder() {
        let from_map = PatientRecord::from_fields(&sample_fields()).expect("Should parse");
        let built = PatientRecord::builder()
            .pregnancies(2)
            .glucose(148)
            .blood_pressure(72)
            .skin_thickness(35)
            .insulin(0)
            .bmi(33.6)
            .diabetes_pedigree(0.627)
            .age(50)
            .build()
            .expect("Should build");

        assert_eq!(from_map, built);
    }

    #[test]
    fn test_missing_bmi_rejected() {
        let mut fields = sample_fields();
        fields.remove("BMI");

        let err = PatientRecord::from_fields(&fields).expect_err("BMI is required");
        assert_eq!(err, SchemaError::MissingField("BMI"));
    }

    #[test]
    fn test_null_counts_as_missing() {
        let mut fields = sample_fields();
        fields.insert("Age".into(), Value::Null);

        let err = PatientRecord::from_fields(&fields).expect_err("Age is required");
        assert_eq!(err, SchemaError::MissingField("Age"));
    }

    #[test]
    fn test_string_where_number_expected() {
        let mut fields = sample_fields();
        fields.insert("Glucose".into(), json!("high"));

        let err = PatientRecord::from_fields(&fields).expect_err("must reject string");
        assert!(matches!(
            err,
            SchemaError::WrongKind {
                field: "Glucose",
                expected: FieldKind::Integer,
                ..
            }
        ));
    }

    #[test]
    fn test_fractional_integer_field_rejected() {
        let mut fields = sample_fields();
        fields.insert("Pregnancies".into(), json!(1.5));
        assert!(matches!(
            PatientRecord::from_fields(&fields),
            Err(SchemaError::WrongKind { field: "Pregnancies", .. })
        ));

        fields.insert("Pregnancies".into(), json!(3.0));
        let record = PatientRecord::from_fields(&fields).expect("integral float is accepted");
        assert_eq!(record.pregnancies(), 3);
    }

    #[test]
    fn test_float_field_accepts_integer_json() {
        let mut fields = sample_fields();
        fields.insert("BMI".into(), json!(30));
        let record = PatientRecord::from_fields(&fields).expect("Should parse");
        assert!((record.bmi() - 30.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let mut fields = sample_fields();
        fields.insert("Cholesterol".into(), json!(200));

        let err = PatientRecord::from_fields(&fields).expect_err("must reject");
        assert_eq!(err, SchemaError::UnknownField("Cholesterol".into()));
    }

    #[test]
    fn test_builder_does_not_check_ranges() {
        let mut fields = sample_fields();
        fields.insert("Glucose".into(), json!(999));
        assert!(PatientRecord::from_fields(&fields).is_ok());
    }

    #[test]
    fn test_field_order_is_canonical() {
        let record = PatientRecord::from_fields(&sample_fields()).expect("Should parse");
        let names: Vec<&str> = record.iter().map(|(n, _)| n).collect();
        assert_eq!(names, FEATURE_NAMES);

        let vec = record.to_vec();
        assert!((vec[1] - 148.0).abs() < f64::EPSILON);
        assert!((vec[6] - 0.627).abs() < f64::EPSILON);
        assert_eq!(record.get("BMI"), Some(33.6));
        assert_eq!(record.get("Cholesterol"), None);
    }

    #[test]
    fn test_serialized_key_order() {
        let record = PatientRecord::from_fields(&sample_fields()).expect("Should parse");
        let json = serde_json::to_string(&record).expect("serialize");

        let positions: Vec<usize> = FEATURE_NAMES
            .iter()
            .map(|name| json.find(&format!("\"{name}\"")).expect("key present"))
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_field_specs_follow_feature_order() {
        for (spec, name) in FIELD_SPECS.iter().zip(FEATURE_NAMES) {
            assert_eq!(spec.name, name);
            assert!(spec.contains(spec.default));
            assert!(spec.min < spec.max);
        }
        assert!(!field_spec("Age").expect("Age spec").contains(0.0));
    }

    #[test]
    fn test_check_feature_names() {
        assert!(check_feature_names(&FEATURE_NAMES[..]).is_ok());

        let mut swapped = FEATURE_NAMES;
        swapped.swap(0, 1);
        assert!(matches!(
            check_feature_names(&swapped[..]),
            Err(SchemaError::FeatureMismatch { .. })
        ));

        assert!(check_feature_names(&FEATURE_NAMES[..7]).is_err());
    }
}
