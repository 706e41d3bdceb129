//! Declarative form field descriptors.
//!
//! Each user-facing form is described by a list of typed field descriptors,
//! interpreted generically by the form view handlers. Validation rules are
//! pure functions over the submitted value, independent of presentation.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Text,
    Password,
    Textarea,
    Number,
    File,
}

#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct Constraints {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<i64>,
    /// Accepted media types for file fields
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accept: Option<&'static str>,
}

impl Constraints {
    pub const NONE: Constraints = Constraints {
        min: None,
        max: None,
        accept: None,
    };
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    pub constraints: Constraints,
}

pub const LOGIN_FIELDS: &[FieldSpec] = &[
    FieldSpec {
        name: "username",
        label: "Username",
        kind: FieldKind::Text,
        required: true,
        constraints: Constraints::NONE,
    },
    FieldSpec {
        name: "password",
        label: "Password",
        kind: FieldKind::Password,
        required: true,
        constraints: Constraints::NONE,
    },
];

pub const REGISTER_FIELDS: &[FieldSpec] = LOGIN_FIELDS;

pub const BOOK_FIELDS: &[FieldSpec] = &[
    FieldSpec {
        name: "title",
        label: "Title",
        kind: FieldKind::Text,
        required: true,
        constraints: Constraints::NONE,
    },
    FieldSpec {
        name: "author",
        label: "Author",
        kind: FieldKind::Text,
        required: true,
        constraints: Constraints::NONE,
    },
    FieldSpec {
        name: "description",
        label: "Description",
        kind: FieldKind::Textarea,
        required: false,
        constraints: Constraints::NONE,
    },
    FieldSpec {
        name: "ISBN",
        label: "ISBN",
        kind: FieldKind::Text,
        required: true,
        constraints: Constraints::NONE,
    },
    // The upper publication-year bound moves with the calendar; it lives in
    // the payload validation, not in the static descriptor.
    FieldSpec {
        name: "publicationYear",
        label: "Publication Year",
        kind: FieldKind::Number,
        required: true,
        constraints: Constraints {
            min: Some(1000),
            max: None,
            accept: None,
        },
    },
    FieldSpec {
        name: "totalQuantity",
        label: "Total Quantity",
        kind: FieldKind::Number,
        required: true,
        constraints: Constraints {
            min: Some(1),
            max: None,
            accept: None,
        },
    },
    FieldSpec {
        name: "cover",
        label: "Cover Image",
        kind: FieldKind::File,
        required: false,
        constraints: Constraints {
            min: None,
            max: None,
            accept: Some("image/*"),
        },
    },
];

/// Validate one submitted value against its descriptor.
/// Returns a display message on violation.
pub fn validate_value(spec: &FieldSpec, value: &str) -> Option<String> {
    let value = value.trim();
    if value.is_empty() {
        return spec
            .required
            .then(|| format!("{} is required", spec.label));
    }
    if spec.kind == FieldKind::Number {
        let Ok(number) = value.parse::<i64>() else {
            return Some(format!("{} must be a number", spec.label));
        };
        if let Some(min) = spec.constraints.min {
            if number < min {
                return Some(format!("{} must be at least {}", spec.label, min));
            }
        }
        if let Some(max) = spec.constraints.max {
            if number > max {
                return Some(format!("{} must be at most {}", spec.label, max));
            }
        }
    }
    None
}

/// Validate a full submission against a descriptor list.
/// File fields are validated separately from their decoded bytes.
pub fn validate_values(specs: &[FieldSpec], values: &[(&str, &str)]) -> Vec<String> {
    specs
        .iter()
        .filter(|spec| spec.kind != FieldKind::File)
        .filter_map(|spec| {
            let value = values
                .iter()
                .find(|(name, _)| *name == spec.name)
                .map(|(_, value)| *value)
                .unwrap_or("");
            validate_value(spec, value)
        })
        .collect()
}
