use super::*;

fn grid() -> impl Iterator<Item = Vec3> {
    (0..24).flat_map(|i| {
        (0..24).map(move |j| Vec3::new(i as f64 * 0.37 - 4.1, j as f64 * 0.29 - 3.3, 0.77 * i as f64))
    })
}

#[test]
fn names_round_trip() {
    for g in NoiseGenerator::ALL {
        assert_eq!(NoiseGenerator::from_name(g.name()), Some(g));
    }
    assert_eq!(NoiseGenerator::from_name("simplex"), None);
}

#[test]
fn samples_stay_in_native_range() {
    for g in NoiseGenerator::ALL {
        let (lo, hi) = g.native_range();
        for p in grid() {
            let v = g.sample(p);
            assert!(v >= lo - 1e-12 && v <= hi + 1e-12, "{} = {v} at {p:?}", g.name());
        }
    }
}

#[test]
fn gradient_variant_matches_scalar_value() {
    for g in NoiseGenerator::ALL {
        for p in grid().take(50) {
            assert_eq!(g.sample(p), g.sample_with_gradient(p).value);
        }
    }
}

#[test]
fn analytic_derivatives_match_finite_differences() {
    let h = 1e-5;
    for g in NoiseGenerator::ALL {
        for p in grid().step_by(7) {
            let s = g.sample_with_gradient(p);
            if s.value.abs() > 0.95 {
                continue;
            }
            let dx = (g.sample(Vec3::new(p.x + h, p.y, p.z)) - g.sample(Vec3::new(p.x - h, p.y, p.z)))
                / (2.0 * h);
            let dy = (g.sample(Vec3::new(p.x, p.y + h, p.z)) - g.sample(Vec3::new(p.x, p.y - h, p.z)))
                / (2.0 * h);
            assert!((dx - s.gradient.x).abs() < 1e-4, "{} dx {dx} vs {}", g.name(), s.gradient.x);
            assert!((dy - s.gradient.y).abs() < 1e-4, "{} dy {dy} vs {}", g.name(), s.gradient.y);
        }
    }
}

#[test]
fn lattice_noise_is_zero_or_hash_valued_at_integer_points() {
    let p = Vec3::new(3.0, -2.0, 5.0);
    assert_eq!(NoiseGenerator::Perlin3d.sample(p), 0.0);
    let expected = hash13([3.0, -2.0, 5.0]) * 2.0 - 1.0;
    assert!((NoiseGenerator::Value3d.sample(p) - expected).abs() < 1e-12);
}

#[test]
fn hash_is_deterministic_and_in_unit_interval() {
    for p in grid() {
        let h = hash13([p.x.floor(), p.y.floor(), p.z.floor()]);
        assert!((0.0..1.0).contains(&h));
        assert_eq!(h, hash13([p.x.floor(), p.y.floor(), p.z.floor()]));
    }
}
