//! Command request model and request-side validation.
//!
//! DESIGN
//! ======
//! The request body is parsed in stages (envelope → prompt → canvas size →
//! each shape) so the first violation can be reported with a field path such
//! as `canvasState.shapes[2].x`. The snapshot is read-only input for prompt
//! building; nothing here mutates it after validation.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ErrorCode;

pub const MAX_PROMPT_CHARS: usize = 500;
pub const MAX_SHAPES: usize = 2000;
pub const DEFAULT_CANVAS_EXTENT: f64 = 5000.0;

// =============================================================================
// ERROR
// =============================================================================

/// First schema violation found in a request body.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self { field: field.into(), message: message.into() }
    }
}

impl ErrorCode for ValidationError {
    fn error_code(&self) -> &'static str {
        "E_VALIDATION"
    }
}

// =============================================================================
// TYPES
// =============================================================================

/// Shape discriminator on canvas snapshot records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    #[default]
    Rectangle,
    Circle,
    Line,
    Text,
}

impl ShapeKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Rectangle => "rectangle",
            Self::Circle => "circle",
            Self::Line => "line",
            Self::Text => "text",
        }
    }
}

/// One shape from the client's canvas snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanvasShape {
    pub id: String,
    #[serde(rename = "type", default)]
    pub kind: ShapeKind,
    pub x: f64,
    pub y: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radius: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x2: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y2: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke_width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f64>,
}

impl CanvasShape {
    /// Display color: fill for closed shapes, stroke for lines, then `color`.
    #[must_use]
    pub fn display_color(&self) -> Option<&str> {
        let preferred = match self.kind {
            ShapeKind::Line => self.stroke.as_deref().or(self.fill.as_deref()),
            _ => self.fill.as_deref().or(self.stroke.as_deref()),
        };
        preferred.or(self.color.as_deref())
    }

    fn numeric_fields(&self) -> [(&'static str, Option<f64>); 10] {
        [
            ("x", Some(self.x)),
            ("y", Some(self.y)),
            ("width", self.width),
            ("height", self.height),
            ("radius", self.radius),
            ("x2", self.x2),
            ("y2", self.y2),
            ("fontSize", self.font_size),
            ("strokeWidth", self.stroke_width),
            ("rotation", self.rotation),
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanvasSize {
    pub width: f64,
    pub height: f64,
}

impl Default for CanvasSize {
    fn default() -> Self {
        Self { width: DEFAULT_CANVAS_EXTENT, height: DEFAULT_CANVAS_EXTENT }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanvasState {
    pub shapes: Vec<CanvasShape>,
    pub canvas_size: CanvasSize,
}

impl CanvasState {
    /// Count shapes per kind, in `ShapeKind` declaration order, skipping zeros.
    #[must_use]
    pub fn kind_counts(&self) -> Vec<(ShapeKind, usize)> {
        [ShapeKind::Rectangle, ShapeKind::Circle, ShapeKind::Line, ShapeKind::Text]
            .into_iter()
            .map(|kind| (kind, self.shapes.iter().filter(|s| s.kind == kind).count()))
            .filter(|(_, count)| *count > 0)
            .collect()
    }
}

/// A validated command request.
#[derive(Debug, Clone, PartialEq)]
pub struct CommandRequest {
    pub prompt: String,
    pub canvas_state: CanvasState,
}

// =============================================================================
// PARSING
// =============================================================================

/// Parse and validate a raw request body.
///
/// # Errors
///
/// Returns the first [`ValidationError`] encountered, with a dotted field path.
pub fn parse_command_request(body: &[u8]) -> Result<CommandRequest, ValidationError> {
    let root: Value =
        serde_json::from_slice(body).map_err(|e| ValidationError::new("body", format!("invalid JSON: {e}")))?;
    let Some(obj) = root.as_object() else {
        return Err(ValidationError::new("body", "must be a JSON object"));
    };

    let prompt = validate_prompt(obj.get("prompt"))?;

    let Some(state) = obj.get("canvasState") else {
        return Err(ValidationError::new("canvasState", "is required"));
    };
    let canvas_state = parse_canvas_state(state)?;

    Ok(CommandRequest { prompt, canvas_state })
}

fn validate_prompt(raw: Option<&Value>) -> Result<String, ValidationError> {
    let Some(raw) = raw else {
        return Err(ValidationError::new("prompt", "is required"));
    };
    let Some(text) = raw.as_str() else {
        return Err(ValidationError::new("prompt", "must be a string"));
    };
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::new("prompt", "must not be empty"));
    }
    let len = trimmed.chars().count();
    if len > MAX_PROMPT_CHARS {
        return Err(ValidationError::new(
            "prompt",
            format!("must be at most {MAX_PROMPT_CHARS} characters (got {len})"),
        ));
    }
    Ok(trimmed.to_string())
}

fn parse_canvas_state(raw: &Value) -> Result<CanvasState, ValidationError> {
    let Some(obj) = raw.as_object() else {
        return Err(ValidationError::new("canvasState", "must be an object"));
    };

    let canvas_size = match obj.get("canvasSize") {
        None | Some(Value::Null) => CanvasSize::default(),
        Some(size) => parse_canvas_size(size)?,
    };

    let shapes = match obj.get("shapes") {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => {
            if items.len() > MAX_SHAPES {
                return Err(ValidationError::new(
                    "canvasState.shapes",
                    format!("must contain at most {MAX_SHAPES} shapes"),
                ));
            }
            items
                .iter()
                .enumerate()
                .map(|(idx, item)| parse_shape(idx, item))
                .collect::<Result<Vec<_>, _>>()?
        }
        Some(_) => return Err(ValidationError::new("canvasState.shapes", "must be an array")),
    };

    Ok(CanvasState { shapes, canvas_size })
}

fn parse_canvas_size(raw: &Value) -> Result<CanvasSize, ValidationError> {
    let size = CanvasSize::deserialize(raw).map_err(|e| ValidationError::new("canvasState.canvasSize", e.to_string()))?;
    for (name, value) in [("width", size.width), ("height", size.height)] {
        if !value.is_finite() || value <= 0.0 {
            return Err(ValidationError::new(
                format!("canvasState.canvasSize.{name}"),
                "must be a positive finite number",
            ));
        }
    }
    Ok(size)
}

fn parse_shape(idx: usize, raw: &Value) -> Result<CanvasShape, ValidationError> {
    let path = format!("canvasState.shapes[{idx}]");
    let shape = CanvasShape::deserialize(raw).map_err(|e| ValidationError::new(path.clone(), e.to_string()))?;

    if shape.id.trim().is_empty() {
        return Err(ValidationError::new(format!("{path}.id"), "must not be empty"));
    }
    for (name, value) in shape.numeric_fields() {
        if let Some(v) = value {
            if !v.is_finite() {
                return Err(ValidationError::new(format!("{path}.{name}"), "must be a finite number"));
            }
        }
    }
    for (name, value) in [("width", shape.width), ("height", shape.height), ("radius", shape.radius)] {
        if value.is_some_and(|v| v < 0.0) {
            return Err(ValidationError::new(format!("{path}.{name}"), "must not be negative"));
        }
    }
    Ok(shape)
}

#[cfg(test)]
#[path = "canvas_test.rs"]
mod tests;
