//! Action normalizer — re-validates untrusted model output.
//!
//! DESIGN
//! ======
//! The model's declared schema is a request, not a guarantee. Every field is
//! re-derived here from the raw JSON: numbers are checked for presence,
//! finiteness and range, then rounded; colors go through the palette; enum
//! fields are matched against closed sets. The first failure aborts the whole
//! action list, so callers never see a partially applied command.
//!
//! Numeric fields accept JSON numbers or numeric strings (`"100"`), since
//! models occasionally quote numbers.

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use super::*;
use crate::canvas::ShapeKind;
use crate::error::ErrorCode;
use crate::palette;

const MAX_TEXT_CHARS: usize = 1000;
const MIN_FONT_SIZE: f64 = 8.0;
const MAX_FONT_SIZE: f64 = 200.0;
const MIN_STROKE_WIDTH: f64 = 1.0;
const MAX_STROKE_WIDTH: f64 = 50.0;

const SHAPE_TYPES: &[&str] = &["rectangle", "circle", "line", "text"];
const SELECT_METHODS: &[&str] = &["all", "byType", "byColor", "byIds", "byRegion", "clear"];
const BULK_OPS: &[&str] = &["move", "delete", "changeColor", "resize", "rotate", "duplicate"];
const TARGETS: &[&str] = &["selected", "all"];
const PATTERNS: &[&str] = &["random", "grid", "row", "column", "circle", "spiral"];
const ALIGNMENTS: &[&str] = &["left", "center", "right", "top", "middle", "bottom"];
const DIRECTIONS: &[&str] = &["horizontal", "vertical"];
const Z_ORDERS: &[&str] = &["bringToFront", "bringForward", "sendBackward", "sendToBack"];

// =============================================================================
// MODEL OUTPUT
// =============================================================================

/// Structured reply the model is asked to produce.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelReply {
    pub is_valid_command: bool,
    #[serde(default)]
    pub explanation: String,
    #[serde(default)]
    pub actions: Vec<RawAction>,
}

/// One untyped action as emitted by the model.
///
/// Parameters normally live under `parameters`; when the model flattens them
/// into the action object itself, the remaining keys are used instead.
#[derive(Debug, Clone, Deserialize)]
pub struct RawAction {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub parameters: Value,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RawAction {
    fn parameter_map(&self) -> Option<&Map<String, Value>> {
        match &self.parameters {
            Value::Object(map) => Some(map),
            Value::Null => Some(&self.extra),
            _ => None,
        }
    }
}

// =============================================================================
// ERROR
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NormalizeError {
    #[error("action {index} has unknown type '{kind}'")]
    UnknownType { index: usize, kind: String },

    #[error("invalid {action} parameters: {message}")]
    InvalidParameters { index: usize, action: &'static str, message: String },
}

impl ErrorCode for NormalizeError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownType { .. } => "E_UNKNOWN_ACTION",
            Self::InvalidParameters { .. } => "E_INVALID_ACTION",
        }
    }
}

// =============================================================================
// ENTRY POINTS
// =============================================================================

/// Normalize every action, failing on the first invalid one.
///
/// # Errors
///
/// Returns the first [`NormalizeError`]; no partial list is produced.
pub fn normalize_actions(raw: &[RawAction]) -> Result<Vec<Action>, NormalizeError> {
    raw.iter()
        .enumerate()
        .map(|(index, action)| normalize_action(index, action))
        .collect()
}

/// Normalize a single raw action.
///
/// # Errors
///
/// Returns [`NormalizeError`] for unknown types or invalid parameters.
pub fn normalize_action(index: usize, raw: &RawAction) -> Result<Action, NormalizeError> {
    let Some(action) = ACTION_TYPES
        .iter()
        .copied()
        .find(|name| *name == raw.kind.trim())
    else {
        return Err(NormalizeError::UnknownType { index, kind: raw.kind.clone() });
    };

    let Some(map) = raw.parameter_map() else {
        return Err(NormalizeError::InvalidParameters {
            index,
            action,
            message: "parameters must be an object".into(),
        });
    };
    let p = Params { index, action, scope: "", map };

    match action {
        "createRectangle" => rectangle(&p),
        "createCircle" => circle(&p),
        "createLine" => line(&p),
        "createText" => text(&p),
        "selectObjects" => select(&p),
        "bulkOperation" => bulk_operation(&p),
        "bulkCreate" => bulk_create(&p),
        "resizeShape" => resize(&p),
        "rotateShape" => rotate(&p),
        "alignObjects" => align(&p),
        "distributeObjects" => distribute(&p),
        _ => z_index(&p),
    }
}

// =============================================================================
// CREATE ACTIONS
// =============================================================================

fn rectangle(p: &Params<'_>) -> Result<Action, NormalizeError> {
    let x = p.coordinate("x")?;
    let y = p.coordinate("y")?;
    let width = p.dimension("width", CANVAS_MAX)?;
    let height = p.dimension("height", CANVAS_MAX)?;
    Ok(Action::CreateRectangle(RectangleParams {
        x: round(x),
        y: round(y),
        width: round_positive(width),
        height: round_positive(height),
        color: p.shape_color(),
    }))
}

fn circle(p: &Params<'_>) -> Result<Action, NormalizeError> {
    let x = p.required_number("x")?;
    let y = p.required_number("y")?;
    let radius = p.dimension("radius", MAX_CIRCLE_RADIUS)?;
    Ok(Action::CreateCircle(CircleParams {
        x: round(x),
        y: round(y),
        radius: round_positive(radius),
        color: p.shape_color(),
    }))
}

fn line(p: &Params<'_>) -> Result<Action, NormalizeError> {
    let x1 = p.number_with_alias("x1", "x")?;
    let y1 = p.number_with_alias("y1", "y")?;
    let x2 = p.required_number("x2")?;
    let y2 = p.required_number("y2")?;
    let stroke_width = p
        .number("strokeWidth")?
        .map_or(DEFAULT_STROKE_WIDTH, |w| round(w.clamp(MIN_STROKE_WIDTH, MAX_STROKE_WIDTH)));
    Ok(Action::CreateLine(LineParams {
        x1: round(x1),
        y1: round(y1),
        x2: round(x2),
        y2: round(y2),
        stroke_width,
        color: p.shape_color(),
    }))
}

fn text(p: &Params<'_>) -> Result<Action, NormalizeError> {
    let content = p.string("text")?.map(str::trim).unwrap_or_default();
    if content.is_empty() {
        return Err(p.invalid("text must be a non-empty string"));
    }
    if content.chars().count() > MAX_TEXT_CHARS {
        return Err(p.invalid(format!("text must be at most {MAX_TEXT_CHARS} characters")));
    }
    let x = p.required_number("x")?;
    let y = p.required_number("y")?;
    let font_size = p
        .number("fontSize")?
        .map_or(DEFAULT_FONT_SIZE, |s| round(s.clamp(MIN_FONT_SIZE, MAX_FONT_SIZE)));
    Ok(Action::CreateText(TextParams {
        x: round(x),
        y: round(y),
        text: content.to_string(),
        font_size,
        color: p.shape_color(),
    }))
}

// =============================================================================
// SELECTION / BULK ACTIONS
// =============================================================================

fn select(p: &Params<'_>) -> Result<Action, NormalizeError> {
    let method: SelectMethod = p.required_enum("method", SELECT_METHODS)?;
    let shape_type: Option<ShapeKind> = p.enum_value("shapeType", SHAPE_TYPES)?;
    let color = p.color("color");
    let ids = p.string_list("ids")?;
    let region = match p.object("region")? {
        Some(map) => Some(region(&p.nested("region.", map))?),
        None => None,
    };

    match method {
        SelectMethod::ByType if shape_type.is_none() => {
            return Err(p.invalid("shapeType is required when method is byType"));
        }
        SelectMethod::ByColor if color.is_none() => {
            return Err(p.invalid("color is required when method is byColor"));
        }
        SelectMethod::ByIds if ids.as_ref().is_none_or(Vec::is_empty) => {
            return Err(p.invalid("ids must be a non-empty list when method is byIds"));
        }
        SelectMethod::ByRegion if region.is_none() => {
            return Err(p.invalid("region is required when method is byRegion"));
        }
        _ => {}
    }

    Ok(Action::SelectObjects(SelectParams { method, shape_type, color, ids, region }))
}

fn region(p: &Params<'_>) -> Result<Region, NormalizeError> {
    let x = p.required_number("x")?;
    let y = p.required_number("y")?;
    let width = p.dimension("width", CANVAS_MAX)?;
    let height = p.dimension("height", CANVAS_MAX)?;
    Ok(Region { x: round(x), y: round(y), width: round_positive(width), height: round_positive(height) })
}

fn bulk_operation(p: &Params<'_>) -> Result<Action, NormalizeError> {
    let operation: BulkOp = p.required_enum("operation", BULK_OPS)?;
    let target: Target = p.enum_value("target", TARGETS)?.unwrap_or_default();
    let shape_type: Option<ShapeKind> = p.enum_value("shapeType", SHAPE_TYPES)?;
    let dx = p.number("dx")?;
    let dy = p.number("dy")?;
    let color = p.color("color");
    let scale = p.positive("scale")?;
    let degrees = p.number("degrees")?;

    match operation {
        BulkOp::Move if dx.is_none() && dy.is_none() => {
            return Err(p.invalid("move requires dx or dy"));
        }
        BulkOp::ChangeColor if color.is_none() => {
            return Err(p.invalid("changeColor requires color"));
        }
        BulkOp::Resize if scale.is_none() => {
            return Err(p.invalid("resize requires scale"));
        }
        BulkOp::Rotate if degrees.is_none() => {
            return Err(p.invalid("rotate requires degrees"));
        }
        _ => {}
    }

    Ok(Action::BulkOperation(BulkOperationParams {
        operation,
        target,
        shape_type,
        dx: dx.map(round),
        dy: dy.map(round),
        color,
        scale,
        degrees: degrees.map(normalize_degrees),
    }))
}

fn bulk_create(p: &Params<'_>) -> Result<Action, NormalizeError> {
    let Some(shape_type) = p.enum_value::<ShapeKind>("shapeType", SHAPE_TYPES)? else {
        return Err(p.invalid("shapeType is required"));
    };
    let raw_count = p.required_number("count")?;
    let in_range = (f64::from(BULK_CREATE_MIN)..=f64::from(BULK_CREATE_MAX)).contains(&raw_count);
    if !in_range || raw_count.fract().abs() > 0.0 {
        return Err(p.invalid(format!(
            "count must be between {BULK_CREATE_MIN} and {BULK_CREATE_MAX} (got {raw_count})"
        )));
    }
    let count = round(raw_count);
    let pattern: LayoutPattern = match p.enum_value("pattern", PATTERNS)? {
        Some(pattern) => pattern,
        None => p.enum_value("layout", PATTERNS)?.unwrap_or_default(),
    };

    let width = p.bounded_positive("width", CANVAS_MAX)?;
    let height = p.bounded_positive("height", CANVAS_MAX)?;
    let radius = p.bounded_positive("radius", MAX_CIRCLE_RADIUS)?;
    let font_size = p.number("fontSize")?;
    let spacing = p.number("spacing")?;
    if spacing.is_some_and(|s| s < 0.0) {
        return Err(p.invalid("spacing must not be negative"));
    }
    let text = p
        .string("text")?
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string);

    Ok(Action::BulkCreate(BulkCreateParams {
        shape_type,
        count: u32::try_from(count).unwrap_or(BULK_CREATE_MAX),
        pattern,
        color: p.shape_color(),
        width: width.map(round_positive),
        height: height.map(round_positive),
        radius: radius.map(round_positive),
        text,
        font_size: font_size.map(|s| round(s.clamp(MIN_FONT_SIZE, MAX_FONT_SIZE))),
        start_x: p.number("startX")?.map(round),
        start_y: p.number("startY")?.map(round),
        spacing: spacing.map(round),
    }))
}

// =============================================================================
// TRANSFORM ACTIONS
// =============================================================================

fn resize(p: &Params<'_>) -> Result<Action, NormalizeError> {
    let target: Target = p.enum_value("target", TARGETS)?.unwrap_or_default();
    let shape_id = p.non_empty_string("shapeId")?;
    let width = p.bounded_positive("width", CANVAS_MAX)?;
    let height = p.bounded_positive("height", CANVAS_MAX)?;
    let radius = p.bounded_positive("radius", MAX_CIRCLE_RADIUS)?;
    let scale = p.positive("scale")?;

    if width.is_none() && height.is_none() && radius.is_none() && scale.is_none() {
        return Err(p.invalid("one of width, height, radius or scale is required"));
    }

    Ok(Action::ResizeShape(ResizeParams {
        target,
        shape_id,
        width: width.map(round_positive),
        height: height.map(round_positive),
        radius: radius.map(round_positive),
        scale,
    }))
}

fn rotate(p: &Params<'_>) -> Result<Action, NormalizeError> {
    let target: Target = p.enum_value("target", TARGETS)?.unwrap_or_default();
    let shape_id = p.non_empty_string("shapeId")?;
    let degrees = p.required_number("degrees")?;
    Ok(Action::RotateShape(RotateParams { target, shape_id, degrees: normalize_degrees(degrees) }))
}

fn align(p: &Params<'_>) -> Result<Action, NormalizeError> {
    let alignment: Alignment = p.required_enum("alignment", ALIGNMENTS)?;
    Ok(Action::AlignObjects(AlignParams { alignment }))
}

fn distribute(p: &Params<'_>) -> Result<Action, NormalizeError> {
    let direction: Direction = p.required_enum("direction", DIRECTIONS)?;
    let spacing = p.number("spacing")?;
    if spacing.is_some_and(|s| s < 0.0) {
        return Err(p.invalid("spacing must not be negative"));
    }
    Ok(Action::DistributeObjects(DistributeParams { direction, spacing: spacing.map(round) }))
}

fn z_index(p: &Params<'_>) -> Result<Action, NormalizeError> {
    let operation: ZOrder = p.required_enum("operation", Z_ORDERS)?;
    Ok(Action::ZIndex(ZIndexParams { operation }))
}

// =============================================================================
// NUMERIC HELPERS
// =============================================================================

#[allow(clippy::cast_possible_truncation)]
fn round(value: f64) -> i64 {
    value.round() as i64
}

/// Round a strictly positive value without collapsing it to zero.
fn round_positive(value: f64) -> i64 {
    round(value).max(1)
}

/// Fold degrees into `(-360, 360]`, keeping two decimal places; full turns give `+0.0`.
fn normalize_degrees(degrees: f64) -> f64 {
    let folded = ((degrees % 360.0) * 100.0).round() / 100.0;
    if folded <= -360.0 { 0.0 } else { folded + 0.0 }
}

// =============================================================================
// PARAMETER ACCESS
// =============================================================================

struct Params<'a> {
    index: usize,
    action: &'static str,
    scope: &'a str,
    map: &'a Map<String, Value>,
}

impl<'a> Params<'a> {
    fn nested(&self, scope: &'a str, map: &'a Map<String, Value>) -> Params<'a> {
        Params { index: self.index, action: self.action, scope, map }
    }

    fn invalid(&self, message: impl Into<String>) -> NormalizeError {
        NormalizeError::InvalidParameters { index: self.index, action: self.action, message: message.into() }
    }

    fn field(&self, key: &str) -> Option<&'a Value> {
        self.map.get(key).filter(|v| !v.is_null())
    }

    fn number(&self, key: &str) -> Result<Option<f64>, NormalizeError> {
        let Some(value) = self.field(key) else {
            return Ok(None);
        };
        let parsed = match value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        };
        match parsed {
            Some(n) if n.is_finite() => Ok(Some(n)),
            _ => Err(self.invalid(format!("{}{key} must be a number", self.scope))),
        }
    }

    fn required_number(&self, key: &str) -> Result<f64, NormalizeError> {
        self.number(key)?
            .ok_or_else(|| self.invalid(format!("{}{key} is required", self.scope)))
    }

    fn number_with_alias(&self, key: &str, alias: &str) -> Result<f64, NormalizeError> {
        match self.number(key)? {
            Some(n) => Ok(n),
            None => self.required_number(alias).map_err(|_| self.invalid(format!("{}{key} is required", self.scope))),
        }
    }

    /// Required coordinate within `[0, CANVAS_MAX]`.
    fn coordinate(&self, key: &str) -> Result<f64, NormalizeError> {
        let value = self.required_number(key)?;
        if !(0.0..=CANVAS_MAX).contains(&value) {
            return Err(self.invalid(format!("{}{key} must be between 0 and {CANVAS_MAX} (got {value})", self.scope)));
        }
        Ok(value)
    }

    /// Required dimension within `(0, max]`.
    fn dimension(&self, key: &str, max: f64) -> Result<f64, NormalizeError> {
        let value = self.required_number(key)?;
        self.check_positive(key, value, Some(max))
    }

    fn positive(&self, key: &str) -> Result<Option<f64>, NormalizeError> {
        self.number(key)?
            .map(|v| self.check_positive(key, v, None))
            .transpose()
    }

    fn bounded_positive(&self, key: &str, max: f64) -> Result<Option<f64>, NormalizeError> {
        self.number(key)?
            .map(|v| self.check_positive(key, v, Some(max)))
            .transpose()
    }

    fn check_positive(&self, key: &str, value: f64, max: Option<f64>) -> Result<f64, NormalizeError> {
        if value <= 0.0 {
            return Err(self.invalid(format!("{}{key} must be positive (got {value})", self.scope)));
        }
        if let Some(max) = max {
            if value > max {
                return Err(self.invalid(format!("{}{key} must be at most {max} (got {value})", self.scope)));
            }
        }
        Ok(value)
    }

    fn string(&self, key: &str) -> Result<Option<&'a str>, NormalizeError> {
        match self.field(key) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.as_str())),
            Some(_) => Err(self.invalid(format!("{}{key} must be a string", self.scope))),
        }
    }

    fn non_empty_string(&self, key: &str) -> Result<Option<String>, NormalizeError> {
        Ok(self
            .string(key)?
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string))
    }

    fn string_list(&self, key: &str) -> Result<Option<Vec<String>>, NormalizeError> {
        let Some(value) = self.field(key) else {
            return Ok(None);
        };
        let Some(items) = value.as_array() else {
            return Err(self.invalid(format!("{}{key} must be a list of strings", self.scope)));
        };
        items
            .iter()
            .map(|item| match item {
                Value::String(s) if !s.trim().is_empty() => Ok(s.trim().to_string()),
                Value::Number(n) => Ok(n.to_string()),
                _ => Err(self.invalid(format!("{}{key} must be a list of strings", self.scope))),
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Some)
    }

    fn object(&self, key: &str) -> Result<Option<&'a Map<String, Value>>, NormalizeError> {
        match self.field(key) {
            None => Ok(None),
            Some(Value::Object(map)) => Ok(Some(map)),
            Some(_) => Err(self.invalid(format!("{}{key} must be an object", self.scope))),
        }
    }

    /// Palette-resolved color; non-string values resolve to the default.
    fn color(&self, key: &str) -> Option<String> {
        self.field(key)
            .map(|value| palette::resolve_optional(value.as_str()).to_string())
    }

    /// Fill color for created shapes: `color`, then `fill`, then the default.
    fn shape_color(&self) -> String {
        self.color("color")
            .or_else(|| self.color("fill"))
            .unwrap_or_else(|| palette::DEFAULT_COLOR.hex.to_string())
    }

    fn enum_value<T: DeserializeOwned>(&self, key: &str, allowed: &[&str]) -> Result<Option<T>, NormalizeError> {
        let Some(value) = self.field(key) else {
            return Ok(None);
        };
        let candidate = value
            .as_str()
            .map(str::trim)
            .and_then(|raw| allowed.iter().find(|name| name.eq_ignore_ascii_case(raw)));
        let Some(name) = candidate else {
            return Err(self.invalid(format!(
                "{}{key} must be one of: {}",
                self.scope,
                allowed.join(", ")
            )));
        };
        serde_json::from_value(Value::String((*name).to_string()))
            .map(Some)
            .map_err(|e| self.invalid(format!("{}{key}: {e}", self.scope)))
    }

    fn required_enum<T: DeserializeOwned>(&self, key: &str, allowed: &[&str]) -> Result<T, NormalizeError> {
        self.enum_value(key, allowed)?
            .ok_or_else(|| self.invalid(format!("{}{key} is required", self.scope)))
    }
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
