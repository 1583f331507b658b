use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Column order the model was trained on.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "age",
    "sex",
    "bp",
    "chol",
    "fbs",
    "restecg",
    "exng",
    "temperature",
    "o2",
    "hr",
];

pub const FEATURE_COUNT: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FieldKind {
    Integer,
    Float,
}

const FIELD_KINDS: [FieldKind; FEATURE_COUNT] = [
    FieldKind::Integer,
    FieldKind::Integer,
    FieldKind::Float,
    FieldKind::Float,
    FieldKind::Float,
    FieldKind::Integer,
    FieldKind::Integer,
    FieldKind::Float,
    FieldKind::Float,
    FieldKind::Float,
];

/// One patient's validated measurements.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureRecord {
    pub age: i64,
    pub sex: i64,
    pub bp: f64,
    pub chol: f64,
    pub fbs: f64,
    pub restecg: i64,
    pub exng: i64,
    pub temperature: f64,
    pub o2: f64,
    pub hr: f64,
}

impl FeatureRecord {
    /// Validates a decoded JSON document.
    ///
    /// Every field is checked; the error names all of the offending fields in
    /// column order rather than stopping at the first one.
    pub fn from_value(value: &Value) -> Result<Self> {
        let Some(object) = value.as_object() else {
            return Err(Error::validation(FEATURE_NAMES));
        };

        let mut row = [0.0_f64; FEATURE_COUNT];
        let mut bad_fields = Vec::new();

        for (idx, (name, kind)) in FEATURE_NAMES.iter().zip(FIELD_KINDS).enumerate() {
            match coerce(object, name, kind) {
                Some(v) => row[idx] = v,
                None => bad_fields.push(*name),
            }
        }

        if !bad_fields.is_empty() {
            return Err(Error::validation(bad_fields));
        }

        Ok(Self {
            age: row[0] as i64,
            sex: row[1] as i64,
            bp: row[2],
            chol: row[3],
            fbs: row[4],
            restecg: row[5] as i64,
            exng: row[6] as i64,
            temperature: row[7],
            o2: row[8],
            hr: row[9],
        })
    }

    /// Parses raw JSON text, keeping malformed JSON distinct from bad fields.
    pub fn from_json(text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text).map_err(|e| Error::parse(e.to_string()))?;
        Self::from_value(&value)
    }

    /// Values in `FEATURE_NAMES` order.
    pub fn to_row(&self) -> [f64; FEATURE_COUNT] {
        [
            self.age as f64,
            self.sex as f64,
            self.bp,
            self.chol,
            self.fbs,
            self.restecg as f64,
            self.exng as f64,
            self.temperature,
            self.o2,
            self.hr,
        ]
    }
}

fn coerce(object: &Map<String, Value>, name: &str, kind: FieldKind) -> Option<f64> {
    let value = object.get(name)?;
    let number = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };

    if !number.is_finite() {
        return None;
    }
    if kind == FieldKind::Integer && (number.fract() != 0.0 || number.abs() > i64::MAX as f64) {
        return None;
    }
    Some(number)
}
