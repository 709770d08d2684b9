use super::*;

fn doc(json: serde_json::Value) -> ParamDoc {
    serde_json::from_value(json).unwrap()
}

#[test]
fn float_param_round_trips_default() {
    let def = ParamDef::from_doc(doc(serde_json::json!({
        "name": "amount",
        "display_name": "Amount",
        "min": 0.0,
        "max": 1.0,
        "default": 0.25
    })))
    .unwrap();
    assert_eq!(def.kind, ParamKind::Float);
    assert_eq!(def.default, ParamValue::Float(0.25));
    assert_eq!(def.slot_count(), 1);
}

#[test]
fn integer_default_is_accepted_for_float_param() {
    let def = ParamDef::from_doc(doc(serde_json::json!({
        "name": "gain",
        "display_name": "Gain",
        "min": 0,
        "max": 4,
        "default": 2
    })))
    .unwrap();
    assert_eq!(def.default, ParamValue::Float(2.0));
}

#[test]
fn default_outside_range_is_rejected() {
    let err = ParamDef::from_doc(doc(serde_json::json!({
        "name": "amount",
        "display_name": "Amount",
        "min": 0.0,
        "max": 1.0,
        "default": 1.5
    })))
    .unwrap_err();
    assert!(err.to_string().contains("amount"));
}

#[test]
fn logarithmic_requires_positive_range() {
    let err = ParamDef::from_doc(doc(serde_json::json!({
        "name": "radius",
        "display_name": "Radius",
        "min": 0.0,
        "max": 1.0,
        "default": 0.5,
        "logarithmic": true
    })))
    .unwrap_err();
    assert!(matches!(err, PlasmaError::Validation(_)));
}

#[test]
fn scalar_params_require_bounds() {
    let err = ParamDef::from_doc(doc(serde_json::json!({
        "name": "speed",
        "display_name": "Speed",
        "default": 1.0
    })))
    .unwrap_err();
    assert!(err.to_string().contains("missing 'min'"));
}

#[test]
fn color_defaults_accept_hex_and_byte_arrays() {
    let hex = ParamDef::from_doc(doc(serde_json::json!({
        "name": "tint",
        "display_name": "Tint",
        "param_type": "color",
        "default": "#ff000080"
    })))
    .unwrap();
    let ParamValue::Color(c) = hex.default else {
        panic!("expected color default");
    };
    assert_eq!(c[0], 1.0);
    assert!((c[3] - 128.0 / 255.0).abs() < 1e-12);
    assert_eq!(hex.slot_count(), 4);

    let bytes = ParamDef::from_doc(doc(serde_json::json!({
        "name": "tint",
        "display_name": "Tint",
        "param_type": "color",
        "default": [255, 0, 51]
    })))
    .unwrap();
    assert_eq!(bytes.default, ParamValue::Color([1.0, 0.0, 0.2, 1.0]));
}

#[test]
fn coerce_rejects_kind_mismatch_and_out_of_range() {
    let def = ParamDef::from_doc(doc(serde_json::json!({
        "name": "octaves",
        "display_name": "Octaves",
        "param_type": "int",
        "min": 1,
        "max": 12,
        "default": 4
    })))
    .unwrap();
    assert_eq!(def.coerce(ParamValue::Float(3.0)).unwrap(), ParamValue::Int(3));
    assert!(def.coerce(ParamValue::Float(3.5)).is_err());
    assert!(def.coerce(ParamValue::Int(13)).is_err());
    assert!(def.coerce(ParamValue::Color([0.0; 4])).is_err());
}

#[test]
fn param_values_deserialize_from_plain_json() {
    let v: ParamValue = serde_json::from_str("0.5").unwrap();
    assert_eq!(v, ParamValue::Float(0.5));
    let v: ParamValue = serde_json::from_str("7").unwrap();
    assert_eq!(v, ParamValue::Int(7));
    let v: ParamValue = serde_json::from_str("[0.0, 0.5, 1.0]").unwrap();
    assert_eq!(v, ParamValue::Color([0.0, 0.5, 1.0, 1.0]));
    assert!(serde_json::from_str::<ParamValue>("true").is_err());
    assert!(serde_json::from_str::<ParamValue>("[1.0, 2.0]").is_err());
}

#[test]
fn write_slots_flattens_colors() {
    let mut out = Vec::new();
    ParamValue::Float(0.5).write_slots(&mut out);
    ParamValue::Color([0.1, 0.2, 0.3, 1.0]).write_slots(&mut out);
    ParamValue::Int(3).write_slots(&mut out);
    assert_eq!(out, vec![0.5, 0.1, 0.2, 0.3, 1.0, 3.0]);
}
