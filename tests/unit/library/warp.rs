use super::*;

fn derivative_grid() -> impl Iterator<Item = Vec2> {
    (0..=20).flat_map(|i| (0..=20).map(move |j| Vec2::new(i as f64 / 10.0 - 1.0, j as f64 / 10.0 - 1.0)))
}

#[test]
fn offset_scales_derivative() {
    let out = WarpKind::Offset.apply(Vec2::new(0.3, 0.1), [0.2, 0.5, -1.0, 0.0], 0.0, &[4.0]);
    assert!((out.x - 0.02).abs() < 1e-15);
    assert!((out.y + 0.04).abs() < 1e-15);
}

#[test]
fn displace_uses_paired_channels() {
    let out = WarpKind::Displace.apply(Vec2::ZERO, [0.5, -0.25, 9.0, 9.0], 0.0, &[2.0]);
    assert_eq!(out, Vec2::new(0.01, -0.005));
    assert_eq!(WarpKind::Displace.fractal_variant(), FractalVariant::Paired);
}

#[test]
fn swirl_with_tiny_radius_scale_stays_finite() {
    let pos = Vec2::new(0.4, -0.7);
    for kind in [
        WarpKind::Swirl,
        WarpKind::SwirlSigmoid,
        WarpKind::SwirlSigmoidDistorted,
    ] {
        let mut params = vec![1e-6, 1.0, 2.0, 10.0, 0.5, 4.0, 0.5, 0.2, 1.0];
        params.truncate(kind.param_names().len());
        for d in derivative_grid() {
            let out = kind.apply(pos, [0.1, d.x, d.y, 0.0], 1.5, &params);
            assert!(out.x.is_finite() && out.y.is_finite(), "{} at {d:?}", kind.name());
        }
    }
}

#[test]
fn swirl_without_strength_does_not_move() {
    let pos = Vec2::new(0.25, 0.5);
    let out = WarpKind::Swirl.apply(pos, [0.0, 0.3, -0.6, 0.0], 0.0, &[0.5, 1.0, 0.0]);
    assert!(out.hypot() < 1e-12);
}

#[test]
fn swirl_rotation_preserves_distance_to_center() {
    let pos = Vec2::new(-0.2, 0.9);
    let deriv = Vec2::new(0.4, 0.1);
    let radius_scale = 0.5;
    let out = WarpKind::Swirl.apply(pos, [0.0, deriv.x, deriv.y, 0.0], 0.0, &[radius_scale, 0.2, 3.0]);
    let center = pos + deriv * radius_scale;
    let before = (pos - center).hypot();
    let after = (pos + out - center).hypot();
    assert!((before - after).abs() < 1e-12);
}

#[test]
fn infinite_mirror_is_finite_for_flat_noise() {
    let params = [0.3, 0.0, 0.1, 0.5, 2.0];
    for d in derivative_grid() {
        let out = WarpKind::InfiniteMirror.apply(Vec2::new(0.1, 0.2), [0.0, d.x, d.y, 0.0], 3.0, &params);
        assert!(out.x.is_finite() && out.y.is_finite());
    }
    let flat = WarpKind::InfiniteMirror.apply(Vec2::new(0.1, 0.2), [0.0; 4], 3.0, &params);
    assert!(flat.x.is_finite() && flat.y.is_finite());
}

#[test]
fn infinite_mirror_with_zero_value_is_identity() {
    let out = WarpKind::InfiniteMirror.apply(
        Vec2::new(0.3, -0.4),
        [0.0, 0.7, -0.2, 0.0],
        2.0,
        &[0.5, 1.0, 0.3, 0.5, 2.0],
    );
    assert_eq!(out, Vec2::ZERO);
}

#[test]
fn missing_params_read_as_zero() {
    let out = WarpKind::Offset.apply(Vec2::ZERO, [0.0, 1.0, 1.0, 0.0], 0.0, &[]);
    assert_eq!(out, Vec2::ZERO);
}
