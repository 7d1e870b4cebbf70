//! Parameter maps and the declarative attribute schemas that describe them.

use std::collections::HashMap;

use json::{JsonValue, object};

use crate::error::{DitherError, Result};

/// One tunable of an algorithm.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Attribute {
    pub name: &'static str,
    pub kind: AttributeKind,
}

/// Domain and default of an attribute.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AttributeKind {
    Range {
        min: f64,
        max: f64,
        step: f64,
        default: f64,
    },
    Boolean {
        default: bool,
    },
    Choice {
        options: &'static [&'static str],
        default: &'static str,
    },
}

impl Attribute {
    pub const fn range(name: &'static str, min: f64, max: f64, step: f64, default: f64) -> Self {
        Self {
            name,
            kind: AttributeKind::Range {
                min,
                max,
                step,
                default,
            },
        }
    }

    pub const fn boolean(name: &'static str, default: bool) -> Self {
        Self {
            name,
            kind: AttributeKind::Boolean { default },
        }
    }

    pub const fn choice(
        name: &'static str,
        options: &'static [&'static str],
        default: &'static str,
    ) -> Self {
        Self {
            name,
            kind: AttributeKind::Choice { options, default },
        }
    }

    pub fn default_value(&self) -> ParamValue {
        match self.kind {
            AttributeKind::Range { default, .. } => ParamValue::Number(default),
            AttributeKind::Boolean { default } => ParamValue::Bool(default),
            AttributeKind::Choice { default, .. } => ParamValue::Choice(default.to_string()),
        }
    }

    /// Check that `value` has this attribute's kind and lies in its domain.
    pub fn check(&self, value: &ParamValue) -> Result {
        match (&self.kind, value) {
            (AttributeKind::Range { min, max, .. }, ParamValue::Number(v)) => {
                if !v.is_finite() || *v < *min || *v > *max {
                    return Err(DitherError::invalid_parameter(
                        self.name,
                        format!("{v} is outside [{min}, {max}]"),
                    ));
                }
                Ok(())
            }
            (AttributeKind::Boolean { .. }, ParamValue::Bool(_)) => Ok(()),
            (AttributeKind::Choice { options, .. }, ParamValue::Choice(v)) => {
                if !options.contains(&v.as_str()) {
                    return Err(DitherError::invalid_parameter(
                        self.name,
                        format!("`{v}` is not one of {options:?}"),
                    ));
                }
                Ok(())
            }
            (kind, value) => Err(DitherError::invalid_parameter(
                self.name,
                format!("expected {}, got {}", kind.label(), value.label()),
            )),
        }
    }

    pub fn to_json(&self) -> JsonValue {
        let mut json = object! { name: self.name };
        match self.kind {
            AttributeKind::Range {
                min,
                max,
                step,
                default,
            } => {
                json["type"] = "range".into();
                json["min"] = min.into();
                json["max"] = max.into();
                json["step"] = step.into();
                json["default"] = default.into();
            }
            AttributeKind::Boolean { default } => {
                json["type"] = "boolean".into();
                json["default"] = default.into();
            }
            AttributeKind::Choice { options, default } => {
                json["type"] = "choice".into();
                json["options"] = options.to_vec().into();
                json["default"] = default.into();
            }
        }
        json
    }
}

impl AttributeKind {
    fn label(&self) -> &'static str {
        match self {
            AttributeKind::Range { .. } => "a number",
            AttributeKind::Boolean { .. } => "a boolean",
            AttributeKind::Choice { .. } => "a choice",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Number(f64),
    Bool(bool),
    Choice(String),
}

impl ParamValue {
    fn label(&self) -> &'static str {
        match self {
            ParamValue::Number(_) => "a number",
            ParamValue::Bool(_) => "a boolean",
            ParamValue::Choice(_) => "a choice",
        }
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        ParamValue::Number(value)
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        ParamValue::Bool(value)
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Choice(value.to_string())
    }
}

impl From<&ParamValue> for JsonValue {
    fn from(value: &ParamValue) -> Self {
        match value {
            ParamValue::Number(v) => (*v).into(),
            ParamValue::Bool(v) => (*v).into(),
            ParamValue::Choice(v) => v.as_str().into(),
        }
    }
}

/// Attribute name to value map handed to an algorithm.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Params {
    values: HashMap<String, ParamValue>,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Map initialized with every default of `schema`.
    pub fn defaults(schema: &[Attribute]) -> Self {
        Self {
            values: schema
                .iter()
                .map(|attr| (attr.name.to_string(), attr.default_value()))
                .collect(),
        }
    }

    /// Builder style insert.
    pub fn with(mut self, name: &str, value: impl Into<ParamValue>) -> Self {
        self.set(name, value);
        self
    }

    pub fn set(&mut self, name: &str, value: impl Into<ParamValue>) {
        self.values.insert(name.to_string(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.values.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Every attribute of `schema` must be present, of the right kind and
    /// inside its domain. Keys the schema doesn't mention are ignored.
    pub fn validate(&self, schema: &[Attribute]) -> Result {
        for attr in schema {
            let value = self
                .get(attr.name)
                .ok_or_else(|| DitherError::invalid_parameter(attr.name, "missing"))?;
            attr.check(value)?;
        }
        Ok(())
    }

    pub fn number(&self, name: &str) -> Result<f64> {
        match self.get(name) {
            Some(ParamValue::Number(v)) => Ok(*v),
            Some(other) => Err(DitherError::invalid_parameter(
                name,
                format!("expected a number, got {}", other.label()),
            )),
            None => Err(DitherError::invalid_parameter(name, "missing")),
        }
    }

    /// Numeric attribute narrowed to `f32`, the working precision of the planes.
    pub fn float(&self, name: &str) -> Result<f32> {
        self.number(name).map(|v| v as f32)
    }

    /// Numeric attribute rounded to an integer count.
    pub fn count(&self, name: &str) -> Result<usize> {
        self.number(name).map(crate::utils::num::to_count)
    }

    pub fn boolean(&self, name: &str) -> Result<bool> {
        match self.get(name) {
            Some(ParamValue::Bool(v)) => Ok(*v),
            Some(other) => Err(DitherError::invalid_parameter(
                name,
                format!("expected a boolean, got {}", other.label()),
            )),
            None => Err(DitherError::invalid_parameter(name, "missing")),
        }
    }

    pub fn choice(&self, name: &str) -> Result<&str> {
        match self.get(name) {
            Some(ParamValue::Choice(v)) => Ok(v.as_str()),
            Some(other) => Err(DitherError::invalid_parameter(
                name,
                format!("expected a choice, got {}", other.label()),
            )),
            None => Err(DitherError::invalid_parameter(name, "missing")),
        }
    }
}

impl FromIterator<(String, ParamValue)> for Params {
    fn from_iter<I: IntoIterator<Item = (String, ParamValue)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCHEMA: &[Attribute] = &[
        Attribute::range("threshold", 0.0, 255.0, 1.0, 128.0),
        Attribute::boolean("invert", false),
        Attribute::choice("shape", &["round", "square"], "round"),
    ];

    #[test]
    fn test_defaults_validate() {
        let params = Params::defaults(SCHEMA);
        assert_eq!(params.len(), 3);
        params.validate(SCHEMA).unwrap();
        assert_eq!(params.number("threshold").unwrap(), 128.0);
        assert!(!params.boolean("invert").unwrap());
        assert_eq!(params.choice("shape").unwrap(), "round");
    }

    #[test]
    fn test_missing_attribute() {
        let params = Params::new().with("threshold", 10.0).with("invert", true);
        let err = params.validate(SCHEMA).unwrap_err();
        assert!(matches!(err, DitherError::InvalidParameter { ref name, .. } if name == "shape"));
    }

    #[test]
    fn test_out_of_range() {
        let params = Params::defaults(SCHEMA).with("threshold", 256.0);
        assert!(params.validate(SCHEMA).is_err());
        let params = Params::defaults(SCHEMA).with("threshold", f64::NAN);
        assert!(params.validate(SCHEMA).is_err());
    }

    #[test]
    fn test_wrong_kind() {
        let params = Params::defaults(SCHEMA).with("invert", 1.0);
        let err = params.validate(SCHEMA).unwrap_err();
        assert!(matches!(err, DitherError::InvalidParameter { ref name, .. } if name == "invert"));
    }

    #[test]
    fn test_unknown_choice() {
        let params = Params::defaults(SCHEMA).with("shape", "hexagon");
        assert!(params.validate(SCHEMA).is_err());
    }

    #[test]
    fn test_extra_keys_are_ignored() {
        let params = Params::defaults(SCHEMA).with("unrelated", 3.0);
        params.validate(SCHEMA).unwrap();
    }

    #[test]
    fn test_attribute_json() {
        let json = SCHEMA[0].to_json();
        assert_eq!(json["name"], "threshold");
        assert_eq!(json["type"], "range");
        assert_eq!(json["max"], 255.0);
        assert_eq!(SCHEMA[2].to_json()["options"][1], "square");
    }
}
