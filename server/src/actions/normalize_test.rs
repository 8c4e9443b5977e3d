use super::*;
use serde_json::json;

fn raw(value: serde_json::Value) -> RawAction {
    serde_json::from_value(value).unwrap()
}

fn normalize(value: serde_json::Value) -> Result<Action, NormalizeError> {
    normalize_action(0, &raw(value))
}

fn error_message(value: serde_json::Value) -> String {
    normalize(value).unwrap_err().to_string()
}

// =========================================================================
// createRectangle
// =========================================================================

#[test]
fn rectangle_rounds_and_resolves_color() {
    let action = normalize(json!({
        "type": "createRectangle",
        "parameters": { "x": 100.4, "y": 99.6, "width": 200.2, "height": 150, "color": "red" }
    }))
    .unwrap();
    assert_eq!(
        action,
        Action::CreateRectangle(RectangleParams { x: 100, y: 100, width: 200, height: 150, color: "#ef4444".into() })
    );
}

#[test]
fn rectangle_rejects_non_positive_dimensions() {
    let msg = error_message(json!({
        "type": "createRectangle",
        "parameters": { "x": 10, "y": 10, "width": 0, "height": 50 }
    }));
    assert!(msg.contains("width must be positive"), "{msg}");

    let msg = error_message(json!({
        "type": "createRectangle",
        "parameters": { "x": 10, "y": 10, "width": 50, "height": -3 }
    }));
    assert!(msg.contains("height must be positive"), "{msg}");
}

#[test]
fn rectangle_rejects_out_of_bounds_coordinates() {
    let msg = error_message(json!({
        "type": "createRectangle",
        "parameters": { "x": -1, "y": 10, "width": 50, "height": 50 }
    }));
    assert!(msg.contains("x must be between 0 and 5000"), "{msg}");

    let msg = error_message(json!({
        "type": "createRectangle",
        "parameters": { "x": 10, "y": 5001, "width": 50, "height": 50 }
    }));
    assert!(msg.contains("y must be between 0 and 5000"), "{msg}");
}

#[test]
fn rectangle_accepts_canvas_edges() {
    assert!(
        normalize(json!({
            "type": "createRectangle",
            "parameters": { "x": 0, "y": 5000, "width": 5000, "height": 1 }
        }))
        .is_ok()
    );
}

#[test]
fn rectangle_requires_numeric_fields() {
    let msg = error_message(json!({
        "type": "createRectangle",
        "parameters": { "x": "left", "y": 10, "width": 50, "height": 50 }
    }));
    assert!(msg.contains("x must be a number"), "{msg}");

    let msg = error_message(json!({
        "type": "createRectangle",
        "parameters": { "x": 10, "y": 10, "height": 50 }
    }));
    assert!(msg.contains("width is required"), "{msg}");
}

#[test]
fn rectangle_accepts_numeric_strings() {
    let action = normalize(json!({
        "type": "createRectangle",
        "parameters": { "x": "10", "y": " 20 ", "width": "30.6", "height": 40 }
    }))
    .unwrap();
    assert!(matches!(action, Action::CreateRectangle(RectangleParams { x: 10, y: 20, width: 31, height: 40, .. })));
}

#[test]
fn rectangle_unknown_color_defaults_to_blue() {
    let action = normalize(json!({
        "type": "createRectangle",
        "parameters": { "x": 1, "y": 1, "width": 1, "height": 1, "color": "teal" }
    }))
    .unwrap();
    assert!(matches!(action, Action::CreateRectangle(p) if p.color == "#3b82f6"));
}

#[test]
fn flattened_parameters_are_accepted() {
    let action = normalize(json!({
        "type": "createRectangle", "x": 5, "y": 5, "width": 10, "height": 10, "color": "#ff0000"
    }))
    .unwrap();
    assert!(matches!(action, Action::CreateRectangle(p) if p.color == "#ef4444" && p.x == 5));
}

// =========================================================================
// createCircle / createLine / createText
// =========================================================================

#[test]
fn circle_radius_bounds() {
    let ok = normalize(json!({
        "type": "createCircle",
        "parameters": { "x": 10.5, "y": 20, "radius": 500, "color": "green" }
    }))
    .unwrap();
    assert_eq!(ok, Action::CreateCircle(CircleParams { x: 11, y: 20, radius: 500, color: "#22c55e".into() }));

    let msg = error_message(json!({
        "type": "createCircle",
        "parameters": { "x": 10, "y": 20, "radius": 500.5 }
    }));
    assert!(msg.contains("radius must be at most 500"), "{msg}");

    let msg = error_message(json!({
        "type": "createCircle",
        "parameters": { "x": 10, "y": 20, "radius": 0 }
    }));
    assert!(msg.contains("radius must be positive"), "{msg}");
}

#[test]
fn line_defaults_stroke_width_and_accepts_xy_alias() {
    let action = normalize(json!({
        "type": "createLine",
        "parameters": { "x": 0, "y": 0, "x2": 100.2, "y2": 50.7, "color": "black" }
    }))
    .unwrap();
    assert_eq!(
        action,
        Action::CreateLine(LineParams { x1: 0, y1: 0, x2: 100, y2: 51, stroke_width: 2, color: "#000000".into() })
    );
}

#[test]
fn line_requires_end_point() {
    let msg = error_message(json!({ "type": "createLine", "parameters": { "x1": 0, "y1": 0, "y2": 4 } }));
    assert!(msg.contains("x2 is required"), "{msg}");
}

#[test]
fn text_defaults_font_size() {
    let action = normalize(json!({
        "type": "createText",
        "parameters": { "x": 10, "y": 10, "text": "  Hello  " }
    }))
    .unwrap();
    assert_eq!(
        action,
        Action::CreateText(TextParams { x: 10, y: 10, text: "Hello".into(), font_size: 16, color: "#3b82f6".into() })
    );
}

#[test]
fn text_clamps_font_size() {
    let action = normalize(json!({
        "type": "createText",
        "parameters": { "x": 10, "y": 10, "text": "big", "fontSize": 900 }
    }))
    .unwrap();
    assert!(matches!(action, Action::CreateText(p) if p.font_size == 200));
}

#[test]
fn text_rejects_empty_text() {
    let msg = error_message(json!({ "type": "createText", "parameters": { "x": 1, "y": 1, "text": "   " } }));
    assert!(msg.contains("text must be a non-empty string"), "{msg}");
}

// =========================================================================
// selectObjects / bulkOperation
// =========================================================================

#[test]
fn select_requires_method() {
    let msg = error_message(json!({ "type": "selectObjects", "parameters": { "shapeType": "circle" } }));
    assert!(msg.contains("method is required"), "{msg}");
}

#[test]
fn select_by_color_resolves_palette() {
    let action = normalize(json!({
        "type": "selectObjects",
        "parameters": { "method": "byColor", "color": "#FF0000" }
    }))
    .unwrap();
    assert!(matches!(
        action,
        Action::SelectObjects(SelectParams { method: SelectMethod::ByColor, color: Some(ref c), .. }) if c == "#ef4444"
    ));
}

#[test]
fn select_by_type_needs_shape_type() {
    let msg = error_message(json!({ "type": "selectObjects", "parameters": { "method": "byType" } }));
    assert!(msg.contains("shapeType is required"), "{msg}");
}

#[test]
fn select_by_region_validates_nested_fields() {
    let msg = error_message(json!({
        "type": "selectObjects",
        "parameters": { "method": "byRegion", "region": { "x": 0, "y": 0, "width": -1, "height": 10 } }
    }));
    assert!(msg.contains("region.width must be positive"), "{msg}");
}

#[test]
fn select_rejects_unknown_method() {
    let msg = error_message(json!({ "type": "selectObjects", "parameters": { "method": "byMood" } }));
    assert!(msg.contains("method must be one of"), "{msg}");
}

#[test]
fn bulk_operation_requires_operation() {
    let msg = error_message(json!({ "type": "bulkOperation", "parameters": { "dx": 10 } }));
    assert!(msg.contains("operation is required"), "{msg}");
}

#[test]
fn bulk_change_color_resolves_and_defaults_target() {
    let action = normalize(json!({
        "type": "bulkOperation",
        "parameters": { "operation": "changeColor", "color": "purple" }
    }))
    .unwrap();
    let Action::BulkOperation(params) = action else {
        panic!("expected bulk operation");
    };
    assert_eq!(params.target, Target::Selected);
    assert_eq!(params.color.as_deref(), Some("#a855f7"));
}

#[test]
fn bulk_move_requires_offset() {
    let msg = error_message(json!({ "type": "bulkOperation", "parameters": { "operation": "move" } }));
    assert!(msg.contains("move requires dx or dy"), "{msg}");
}

// =========================================================================
// bulkCreate
// =========================================================================

#[test]
fn bulk_create_count_boundaries_accepted() {
    for count in [1, 1000] {
        let action = normalize(json!({
            "type": "bulkCreate",
            "parameters": { "shapeType": "circle", "count": count }
        }))
        .unwrap();
        assert!(matches!(action, Action::BulkCreate(ref p) if i64::from(p.count) == count));
    }
}

#[test]
fn bulk_create_count_outside_range_rejected() {
    for count in [json!(0), json!(1001), json!(1500), json!(-3), json!(0.5), json!(1000.4), json!(1000.5)] {
        let msg = error_message(json!({
            "type": "bulkCreate",
            "parameters": { "shapeType": "circle", "count": count }
        }));
        assert!(msg.contains("count must be between 1 and 1000"), "{msg}");
    }
}

#[test]
fn bulk_create_rejects_fractional_count() {
    let msg = error_message(json!({
        "type": "bulkCreate",
        "parameters": { "shapeType": "circle", "count": 1.5 }
    }));
    assert!(msg.contains("count must be between 1 and 1000 (got 1.5)"), "{msg}");
}

#[test]
fn bulk_create_accepts_whole_float_count() {
    let action = normalize(json!({
        "type": "bulkCreate",
        "parameters": { "shapeType": "circle", "count": 12.0 }
    }))
    .unwrap();
    assert!(matches!(action, Action::BulkCreate(ref p) if p.count == 12));
}

#[test]
fn bulk_create_defaults_pattern_to_random() {
    let action = normalize(json!({
        "type": "bulkCreate",
        "parameters": { "shapeType": "rectangle", "count": 20, "color": "orange" }
    }))
    .unwrap();
    let Action::BulkCreate(params) = action else {
        panic!("expected bulk create");
    };
    assert_eq!(params.pattern, LayoutPattern::Random);
    assert_eq!(params.color, "#f97316");
    assert_eq!(params.shape_type, ShapeKind::Rectangle);
}

#[test]
fn bulk_create_accepts_layout_alias() {
    let action = normalize(json!({
        "type": "bulkCreate",
        "parameters": { "shapeType": "rectangle", "count": 9, "layout": "grid" }
    }))
    .unwrap();
    assert!(matches!(action, Action::BulkCreate(ref p) if p.pattern == LayoutPattern::Grid));
}

#[test]
fn bulk_create_requires_shape_type() {
    let msg = error_message(json!({ "type": "bulkCreate", "parameters": { "count": 5 } }));
    assert!(msg.contains("shapeType is required"), "{msg}");
}

// =========================================================================
// resize / rotate / align / distribute / zIndex
// =========================================================================

#[test]
fn resize_requires_a_dimension() {
    let msg = error_message(json!({ "type": "resizeShape", "parameters": { "shapeId": "abc" } }));
    assert!(msg.contains("one of width, height, radius or scale is required"), "{msg}");
}

#[test]
fn resize_keeps_shape_id() {
    let action = normalize(json!({
        "type": "resizeShape",
        "parameters": { "shapeId": "r1", "scale": 2 }
    }))
    .unwrap();
    assert!(matches!(action, Action::ResizeShape(ref p) if p.shape_id.as_deref() == Some("r1") && p.scale == Some(2.0)));
}

#[test]
fn rotate_folds_multiples_of_full_turn_to_positive_zero() {
    for degrees in [-720.0, -360.0, 720.0, -359.999] {
        let action = normalize(json!({ "type": "rotateShape", "parameters": { "degrees": degrees } })).unwrap();
        let Action::RotateShape(params) = action else { panic!("expected rotateShape") };
        assert_eq!(params.degrees, 0.0, "{degrees}");
        assert!(params.degrees.is_sign_positive(), "{degrees}");
    }
}

#[test]
fn rotate_keeps_values_inside_half_open_range() {
    for (input, expected) in [(-270.0, -270.0), (359.5, 359.5), (365.25, 5.25)] {
        let action = normalize(json!({ "type": "rotateShape", "parameters": { "degrees": input } })).unwrap();
        assert!(matches!(action, Action::RotateShape(ref p) if (p.degrees - expected).abs() < 1e-9), "{input}");
    }
}

#[test]
fn rotate_requires_degrees_and_folds_range() {
    let msg = error_message(json!({ "type": "rotateShape", "parameters": {} }));
    assert!(msg.contains("degrees is required"), "{msg}");

    let action = normalize(json!({ "type": "rotateShape", "parameters": { "degrees": 450 } })).unwrap();
    assert!(matches!(action, Action::RotateShape(ref p) if (p.degrees - 90.0).abs() < f64::EPSILON));
}

#[test]
fn align_and_distribute_require_discriminators() {
    let msg = error_message(json!({ "type": "alignObjects", "parameters": {} }));
    assert!(msg.contains("alignment is required"), "{msg}");

    let msg = error_message(json!({ "type": "distributeObjects", "parameters": { "spacing": 10 } }));
    assert!(msg.contains("direction is required"), "{msg}");

    let action = normalize(json!({ "type": "alignObjects", "parameters": { "alignment": "Left" } })).unwrap();
    assert_eq!(action, Action::AlignObjects(AlignParams { alignment: Alignment::Left }));
}

#[test]
fn z_index_requires_operation() {
    let msg = error_message(json!({ "type": "zIndex", "parameters": {} }));
    assert!(msg.contains("operation is required"), "{msg}");

    let action = normalize(json!({ "type": "zIndex", "parameters": { "operation": "bringToFront" } })).unwrap();
    assert_eq!(action, Action::ZIndex(ZIndexParams { operation: ZOrder::BringToFront }));
}

// =========================================================================
// list behavior and serialization
// =========================================================================

#[test]
fn unknown_type_is_rejected() {
    let err = normalize(json!({ "type": "explode", "parameters": {} })).unwrap_err();
    assert!(matches!(err, NormalizeError::UnknownType { ref kind, .. } if kind == "explode"));
    assert_eq!(err.error_code(), "E_UNKNOWN_ACTION");
}

#[test]
fn non_object_parameters_rejected() {
    let msg = error_message(json!({ "type": "zIndex", "parameters": [1, 2] }));
    assert!(msg.contains("parameters must be an object"), "{msg}");
}

#[test]
fn first_invalid_action_aborts_list() {
    let actions = vec![
        raw(json!({ "type": "createCircle", "parameters": { "x": 1, "y": 1, "radius": 5 } })),
        raw(json!({ "type": "createCircle", "parameters": { "x": 1, "y": 1, "radius": 900 } })),
        raw(json!({ "type": "explode" })),
    ];
    let err = normalize_actions(&actions).unwrap_err();
    assert!(matches!(err, NormalizeError::InvalidParameters { index: 1, action: "createCircle", .. }));
}

#[test]
fn typed_action_serializes_with_type_and_parameters() {
    let action = normalize(json!({
        "type": "createRectangle",
        "parameters": { "x": 100, "y": 100, "width": 50, "height": 50, "color": "red" }
    }))
    .unwrap();
    let value = serde_json::to_value(&action).unwrap();
    assert_eq!(value["type"], "createRectangle");
    assert_eq!(value["parameters"]["color"], "#ef4444");
    assert_eq!(value["parameters"]["x"], 100);
}

#[test]
fn model_reply_requires_is_valid_command() {
    assert!(serde_json::from_value::<ModelReply>(json!({ "explanation": "x" })).is_err());
    let reply: ModelReply = serde_json::from_value(json!({ "isValidCommand": false, "explanation": "not a canvas task" }))
        .unwrap();
    assert!(!reply.is_valid_command);
    assert!(reply.actions.is_empty());
}
