use super::*;

fn positions() -> impl Iterator<Item = Vec2> {
    (0..16).flat_map(|i| (0..16).map(move |j| Vec2::new(i as f64 * 0.41 - 3.0, j as f64 * 0.53 - 4.0)))
}

#[test]
fn octave_one_is_a_single_raw_sample() {
    let params = FractalParams {
        octaves: 1,
        gain: 0.5,
        position_scale_factor: 1.0,
        rotation_angle_increment: 0.0,
        time_scale_factor: 1.0,
        time_offset_increment: 0.0,
        time_offset_initial: 0.0,
    };
    for g in NoiseGenerator::ALL {
        for p in positions() {
            let raw = g.sample(Vec3::from_xy(p, 2.5));
            assert_eq!(fractal_scalar(g, p, 2.5, &params), raw);
            let with_grad = fractal_gradient(g, p, 2.5, &params);
            assert_eq!(with_grad, g.sample_with_gradient(Vec3::from_xy(p, 2.5)));
        }
    }
}

#[test]
fn scalar_output_stays_in_native_range() {
    for gain in [0.05, 0.3, 0.5, 0.9, 1.0] {
        for (rot, scale) in [(0.0, 2.0), (0.7, 1.9), (-2.3, 0.5), (3.1, 3.7)] {
            let params = FractalParams {
                octaves: 6,
                gain,
                position_scale_factor: scale,
                rotation_angle_increment: rot,
                time_scale_factor: 1.3,
                time_offset_increment: 12.0,
                time_offset_initial: 5.0,
            };
            for g in NoiseGenerator::ALL {
                let (lo, hi) = g.native_range();
                for p in positions() {
                    let v = fractal_scalar(g, p, 0.75, &params);
                    assert!(v >= lo - 1e-12 && v <= hi + 1e-12, "{} = {v}", g.name());
                }
            }
        }
    }
}

#[test]
fn paired_channels_are_decorrelated() {
    let params = FractalParams {
        octaves: 3,
        ..FractalParams::default()
    };
    assert_eq!(PAIRED_TIME_OFFSET, 123.0);
    for g in NoiseGenerator::ALL {
        let differing = positions()
            .filter(|&p| {
                let v = fractal_paired(g, p, 0.4, &params);
                (v.x - v.y).abs() > 1e-6
            })
            .count();
        assert!(differing > 200, "{}: only {differing} differing samples", g.name());
    }
}

#[test]
fn paired_first_channel_matches_scalar() {
    let params = FractalParams {
        octaves: 4,
        ..FractalParams::default()
    };
    for p in positions().take(40) {
        let pair = fractal_paired(NoiseGenerator::Value3d, p, 1.0, &params);
        let scalar = fractal_scalar(NoiseGenerator::Value3d, p, 1.0, &params);
        assert!((pair.x - scalar).abs() < 1e-12);
    }
}

#[test]
fn gradient_matches_finite_differences_of_scalar() {
    let params = FractalParams {
        octaves: 4,
        gain: 0.5,
        position_scale_factor: 2.0,
        rotation_angle_increment: 0.6,
        time_scale_factor: 1.3,
        time_offset_increment: 12.0,
        time_offset_initial: 0.0,
    };
    let h = 1e-6;
    for g in NoiseGenerator::ALL {
        for p in positions().step_by(11) {
            let s = fractal_gradient(g, p, 0.3, &params);
            // Perlin octaves clamp at +-1, where the derivative no longer matches.
            if g == NoiseGenerator::Perlin3d && s.value.abs() > 0.9 {
                continue;
            }
            let fx = |q: Vec2| fractal_scalar(g, q, 0.3, &params);
            let dx = (fx(p + Vec2::new(h, 0.0)) - fx(p - Vec2::new(h, 0.0))) / (2.0 * h);
            let dy = (fx(p + Vec2::new(0.0, h)) - fx(p - Vec2::new(0.0, h))) / (2.0 * h);
            assert!((s.gradient.x - dx).abs() < 1e-4, "{}: {} vs {dx}", g.name(), s.gradient.x);
            assert!((s.gradient.y - dy).abs() < 1e-4, "{}: {} vs {dy}", g.name(), s.gradient.y);
        }
    }
}

#[test]
fn zero_octaves_yield_a_zero_field_and_fail_validation() {
    let params = FractalParams {
        octaves: 0,
        ..FractalParams::default()
    };
    let p = Vec2::new(0.2, 0.3);
    assert_eq!(fractal_scalar(NoiseGenerator::Perlin3d, p, 0.0, &params), 0.0);
    assert_eq!(fractal_paired(NoiseGenerator::Perlin3d, p, 0.0, &params), Vec2::ZERO);
    assert_eq!(
        fractal_gradient(NoiseGenerator::Perlin3d, p, 0.0, &params),
        NoiseSample::default()
    );
    let err = params.validate("noise.fractal").unwrap_err();
    assert!(err.to_string().contains("noise.fractal.octaves"));
}

#[test]
fn validation_rejects_bad_gain_and_non_finite_values() {
    let bad_gain = FractalParams {
        gain: 0.0,
        ..FractalParams::default()
    };
    assert!(bad_gain.validate("f").is_err());
    let nan = FractalParams {
        time_scale_factor: f64::NAN,
        ..FractalParams::default()
    };
    assert!(nan.validate("f").is_err());
    assert!(FractalParams::default().validate("f").is_ok());
    assert!(FractalParams::warp_default().validate("f").is_ok());
}
