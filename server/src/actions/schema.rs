//! Output schema declared to the model.
//!
//! This is the contract the generation service is asked to honor.
//! `normalize` re-checks everything independently, so changing the action
//! taxonomy means editing both.

use serde_json::{Value, json};

use crate::llm::types::Tool;
use crate::palette::PALETTE;

/// Name of the single tool the model is forced to call.
pub const COMMAND_TOOL_NAME: &str = "submitCanvasCommand";

/// Tool wrapping the command output schema.
#[must_use]
pub fn command_tool() -> Tool {
    Tool {
        name: COMMAND_TOOL_NAME.into(),
        description: "Submit the canvas actions that carry out the user's command, or explain why the \
                      request is not a canvas command."
            .into(),
        input_schema: command_output_schema(),
    }
}

/// `{isValidCommand, explanation, actions[]}`.
#[must_use]
pub fn command_output_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "isValidCommand": {
                "type": "boolean",
                "description": "false when the request is not an actionable canvas command"
            },
            "explanation": {
                "type": "string",
                "description": "Short user-facing summary of what will happen, or why nothing will"
            },
            "actions": {
                "type": "array",
                "items": { "anyOf": action_schemas() }
            }
        },
        "required": ["isValidCommand", "explanation", "actions"]
    })
}

fn action_schemas() -> Vec<Value> {
    vec![
        action(
            "createRectangle",
            json!({
                "x": coord(), "y": coord(),
                "width": dimension(5000), "height": dimension(5000),
                "color": color()
            }),
            &["x", "y", "width", "height"],
        ),
        action(
            "createCircle",
            json!({ "x": coord(), "y": coord(), "radius": dimension(500), "color": color() }),
            &["x", "y", "radius"],
        ),
        action(
            "createLine",
            json!({
                "x1": coord(), "y1": coord(), "x2": coord(), "y2": coord(),
                "strokeWidth": { "type": "number", "minimum": 1, "maximum": 50 },
                "color": color()
            }),
            &["x1", "y1", "x2", "y2"],
        ),
        action(
            "createText",
            json!({
                "x": coord(), "y": coord(),
                "text": { "type": "string", "minLength": 1 },
                "fontSize": { "type": "number", "minimum": 8, "maximum": 200 },
                "color": color()
            }),
            &["x", "y", "text"],
        ),
        action(
            "selectObjects",
            json!({
                "method": string_enum(&["all", "byType", "byColor", "byIds", "byRegion", "clear"]),
                "shapeType": shape_type(),
                "color": color(),
                "ids": { "type": "array", "items": { "type": "string" } },
                "region": {
                    "type": "object",
                    "properties": { "x": coord(), "y": coord(), "width": dimension(5000), "height": dimension(5000) },
                    "required": ["x", "y", "width", "height"]
                }
            }),
            &["method"],
        ),
        action(
            "bulkOperation",
            json!({
                "operation": string_enum(&["move", "delete", "changeColor", "resize", "rotate", "duplicate"]),
                "target": target(),
                "shapeType": shape_type(),
                "dx": { "type": "number" },
                "dy": { "type": "number" },
                "color": color(),
                "scale": { "type": "number", "exclusiveMinimum": 0 },
                "degrees": { "type": "number" }
            }),
            &["operation"],
        ),
        action(
            "bulkCreate",
            json!({
                "shapeType": shape_type(),
                "count": { "type": "integer", "minimum": 1, "maximum": 1000 },
                "pattern": string_enum(&["random", "grid", "row", "column", "circle", "spiral"]),
                "color": color(),
                "width": dimension(5000),
                "height": dimension(5000),
                "radius": dimension(500),
                "text": { "type": "string" },
                "fontSize": { "type": "number" },
                "startX": coord(),
                "startY": coord(),
                "spacing": { "type": "number", "minimum": 0 }
            }),
            &["shapeType", "count"],
        ),
        action(
            "resizeShape",
            json!({
                "target": target(),
                "shapeId": { "type": "string" },
                "width": dimension(5000),
                "height": dimension(5000),
                "radius": dimension(500),
                "scale": { "type": "number", "exclusiveMinimum": 0 }
            }),
            &[],
        ),
        action(
            "rotateShape",
            json!({ "target": target(), "shapeId": { "type": "string" }, "degrees": { "type": "number" } }),
            &["degrees"],
        ),
        action(
            "alignObjects",
            json!({ "alignment": string_enum(&["left", "center", "right", "top", "middle", "bottom"]) }),
            &["alignment"],
        ),
        action(
            "distributeObjects",
            json!({
                "direction": string_enum(&["horizontal", "vertical"]),
                "spacing": { "type": "number", "minimum": 0 }
            }),
            &["direction"],
        ),
        action(
            "zIndex",
            json!({ "operation": string_enum(&["bringToFront", "bringForward", "sendBackward", "sendToBack"]) }),
            &["operation"],
        ),
    ]
}

fn action(kind: &str, properties: Value, required: &[&str]) -> Value {
    json!({
        "type": "object",
        "properties": {
            "type": { "type": "string", "const": kind },
            "parameters": {
                "type": "object",
                "properties": properties,
                "required": required
            }
        },
        "required": ["type", "parameters"]
    })
}

fn coord() -> Value {
    json!({ "type": "number", "minimum": 0, "maximum": 5000 })
}

fn dimension(max: u32) -> Value {
    json!({ "type": "number", "exclusiveMinimum": 0, "maximum": max })
}

fn string_enum(values: &[&str]) -> Value {
    json!({ "type": "string", "enum": values })
}

fn shape_type() -> Value {
    string_enum(&["rectangle", "circle", "line", "text"])
}

fn target() -> Value {
    string_enum(&["selected", "all"])
}

fn color() -> Value {
    let names: Vec<&str> = PALETTE.iter().map(|c| c.name).collect();
    json!({
        "type": "string",
        "description": format!("One of: {}", names.join(", "))
    })
}

#[cfg(test)]
#[path = "schema_test.rs"]
mod tests;
