use super::*;

const A: Rgba = Rgba::new(0.1, 0.7, 0.3, 1.0);
const B: Rgba = Rgba::new(0.9, 0.2, 0.55, 0.5);

#[test]
fn linear_hits_both_endpoints_exactly() {
    assert_eq!(blend_linear(A, B, 0.0), A);
    assert_eq!(blend_linear(A, B, 1.0), B);
    assert_eq!(BlendKind::Linear.apply(A, B, &[0.0]), A);
    assert_eq!(BlendKind::Linear.apply(A, B, &[1.0]), B);
}

#[test]
fn additive_with_zero_amount_keeps_previous() {
    assert_eq!(blend_additive(A, B, 0.0), A);
    assert_eq!(BlendKind::Additive.apply(A, B, &[0.0]), A);
    let saturated = blend_additive(Rgba::gray(0.8), Rgba::gray(0.8), 1.0);
    assert_eq!(saturated, Rgba::new(1.0, 1.0, 1.0, 1.0));
}

#[test]
fn replace_returns_current() {
    assert_eq!(BlendKind::Replace.apply(A, B, &[]), B);
    assert!(BlendKind::Replace.param_names().is_empty());
}

#[test]
fn multiply_and_screen_interpolate_from_previous() {
    assert_eq!(BlendKind::Multiply.apply(A, B, &[0.0]), A);
    assert_eq!(BlendKind::Screen.apply(A, B, &[0.0]), A);
    let m = BlendKind::Multiply.apply(A, B, &[1.0]);
    assert!((m.r - 0.09).abs() < 1e-12);
    let s = BlendKind::Screen.apply(A, B, &[1.0]);
    assert!((s.r - (1.0 - 0.9 * 0.1)).abs() < 1e-12);
}

#[test]
fn hue_shift_without_shift_is_linear() {
    let shifted = BlendKind::HueShiftLinear.apply(A, B, &[0.0, 1.0, 0.25]);
    let linear = blend_linear(A, B, 0.25);
    for (x, y) in shifted.to_array().into_iter().zip(linear.to_array()) {
        assert!((x - y).abs() < 1e-12);
    }
}

#[test]
fn hue_shift_rotates_primaries() {
    let red = Rgba::new(1.0, 0.0, 0.0, 1.0);
    let out = BlendKind::HueShiftLinear.apply(red, Rgba::BLACK, &[1.0 / 3.0, 1.0, 0.0]);
    assert!(out.r.abs() < 1e-9 && (out.g - 1.0).abs() < 1e-9 && out.b.abs() < 1e-9);
}
