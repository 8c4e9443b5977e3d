//! Canvas actions — the typed output of a command.
//!
//! DESIGN
//! ======
//! The model returns untyped `{type, parameters}` records. `normalize`
//! re-derives every field into the typed [`Action`] enum below, independently
//! of the JSON schema declared to the model in `schema`. Only typed actions
//! are ever serialized back to the caller.

pub mod normalize;
pub mod schema;

use serde::{Deserialize, Serialize};

use crate::canvas::ShapeKind;

/// Every action type the service understands, in prompt/schema order.
pub const ACTION_TYPES: [&str; 12] = [
    "createRectangle",
    "createCircle",
    "createLine",
    "createText",
    "selectObjects",
    "bulkOperation",
    "bulkCreate",
    "resizeShape",
    "rotateShape",
    "alignObjects",
    "distributeObjects",
    "zIndex",
];

/// Upper bound for canvas coordinates and rectangle dimensions.
pub const CANVAS_MAX: f64 = 5000.0;
pub const MAX_CIRCLE_RADIUS: f64 = 500.0;
pub const BULK_CREATE_MIN: u32 = 1;
pub const BULK_CREATE_MAX: u32 = 1000;
pub const DEFAULT_FONT_SIZE: i64 = 16;
pub const DEFAULT_STROKE_WIDTH: i64 = 2;

// =============================================================================
// ACTION
// =============================================================================

/// A validated canvas mutation instruction.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "parameters", rename_all = "camelCase")]
pub enum Action {
    CreateRectangle(RectangleParams),
    CreateCircle(CircleParams),
    CreateLine(LineParams),
    CreateText(TextParams),
    SelectObjects(SelectParams),
    BulkOperation(BulkOperationParams),
    BulkCreate(BulkCreateParams),
    ResizeShape(ResizeParams),
    RotateShape(RotateParams),
    AlignObjects(AlignParams),
    DistributeObjects(DistributeParams),
    ZIndex(ZIndexParams),
}

impl Action {
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::CreateRectangle(_) => "createRectangle",
            Self::CreateCircle(_) => "createCircle",
            Self::CreateLine(_) => "createLine",
            Self::CreateText(_) => "createText",
            Self::SelectObjects(_) => "selectObjects",
            Self::BulkOperation(_) => "bulkOperation",
            Self::BulkCreate(_) => "bulkCreate",
            Self::ResizeShape(_) => "resizeShape",
            Self::RotateShape(_) => "rotateShape",
            Self::AlignObjects(_) => "alignObjects",
            Self::DistributeObjects(_) => "distributeObjects",
            Self::ZIndex(_) => "zIndex",
        }
    }
}

// =============================================================================
// CREATE PARAMETERS
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RectangleParams {
    pub x: i64,
    pub y: i64,
    pub width: i64,
    pub height: i64,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CircleParams {
    pub x: i64,
    pub y: i64,
    pub radius: i64,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineParams {
    pub x1: i64,
    pub y1: i64,
    pub x2: i64,
    pub y2: i64,
    pub stroke_width: i64,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextParams {
    pub x: i64,
    pub y: i64,
    pub text: String,
    pub font_size: i64,
    pub color: String,
}

// =============================================================================
// SELECTION / BULK PARAMETERS
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SelectMethod {
    All,
    ByType,
    ByColor,
    ByIds,
    ByRegion,
    Clear,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Region {
    pub x: i64,
    pub y: i64,
    pub width: i64,
    pub height: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectParams {
    pub method: SelectMethod,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shape_type: Option<ShapeKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ids: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<Region>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BulkOp {
    Move,
    Delete,
    ChangeColor,
    Resize,
    Rotate,
    Duplicate,
}

/// Which shapes a bulk or per-shape edit applies to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Target {
    #[default]
    Selected,
    All,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkOperationParams {
    pub operation: BulkOp,
    pub target: Target,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shape_type: Option<ShapeKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dx: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dy: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub degrees: Option<f64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LayoutPattern {
    #[default]
    Random,
    Grid,
    Row,
    Column,
    Circle,
    Spiral,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkCreateParams {
    pub shape_type: ShapeKind,
    pub count: u32,
    pub pattern: LayoutPattern,
    pub color: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub radius: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_x: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_y: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spacing: Option<i64>,
}

// =============================================================================
// TRANSFORM PARAMETERS
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResizeParams {
    pub target: Target,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shape_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub radius: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RotateParams {
    pub target: Target,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shape_id: Option<String>,
    pub degrees: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Alignment {
    Left,
    Center,
    Right,
    Top,
    Middle,
    Bottom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AlignParams {
    pub alignment: Alignment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Direction {
    Horizontal,
    Vertical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DistributeParams {
    pub direction: Direction,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spacing: Option<i64>,
}

/// Layer-order change. Mirrors the four layer buttons in the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ZOrder {
    BringToFront,
    BringForward,
    SendBackward,
    SendToBack,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ZIndexParams {
    pub operation: ZOrder,
}
