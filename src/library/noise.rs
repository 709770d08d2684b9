use crate::foundation::core::{Vec2, Vec3};
use crate::foundation::math::fract;

/// Noise value with its partial derivatives along x and y.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct NoiseSample {
    pub value: f64,
    pub gradient: Vec2,
}

/// CPU counterparts of the noise catalog members.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NoiseGenerator {
    Perlin3d,
    Value3d,
    SineField,
}

impl NoiseGenerator {
    pub const ALL: [Self; 3] = [Self::Perlin3d, Self::Value3d, Self::SineField];

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|g| g.name() == name)
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Perlin3d => "perlin_3d",
            Self::Value3d => "value_3d",
            Self::SineField => "sine_field",
        }
    }

    /// Bounds every sample stays within.
    pub fn native_range(self) -> (f64, f64) {
        (-1.0, 1.0)
    }

    pub fn sample(self, p: Vec3) -> f64 {
        match self {
            Self::Perlin3d => perlin(p).0,
            Self::Value3d => value(p).0,
            Self::SineField => sine_field(p).0,
        }
    }

    pub fn sample_with_gradient(self, p: Vec3) -> NoiseSample {
        let (value, d) = match self {
            Self::Perlin3d => perlin(p),
            Self::Value3d => value(p),
            Self::SineField => sine_field(p),
        };
        NoiseSample {
            value,
            gradient: Vec2::new(d[0], d[1]),
        }
    }
}

const GRADIENTS: [[f64; 3]; 12] = [
    [1.0, 1.0, 0.0],
    [-1.0, 1.0, 0.0],
    [1.0, -1.0, 0.0],
    [-1.0, -1.0, 0.0],
    [1.0, 0.0, 1.0],
    [-1.0, 0.0, 1.0],
    [1.0, 0.0, -1.0],
    [-1.0, 0.0, -1.0],
    [0.0, 1.0, 1.0],
    [0.0, -1.0, 1.0],
    [0.0, 1.0, -1.0],
    [0.0, -1.0, -1.0],
];

const CORNERS: [[f64; 3]; 8] = [
    [0.0, 0.0, 0.0],
    [1.0, 0.0, 0.0],
    [0.0, 1.0, 0.0],
    [1.0, 1.0, 0.0],
    [0.0, 0.0, 1.0],
    [1.0, 0.0, 1.0],
    [0.0, 1.0, 1.0],
    [1.0, 1.0, 1.0],
];

/// Lattice hash in `[0, 1)`. Same arithmetic as `hash13` in `common.glsl`.
pub(crate) fn hash13(p: [f64; 3]) -> f64 {
    let mut q = p.map(|c| fract(c * 0.1031));
    let d = q[0] * (q[2] + 31.32) + q[1] * (q[1] + 31.32) + q[2] * (q[0] + 31.32);
    q = q.map(|c| c + d);
    fract((q[0] + q[1]) * q[2])
}

fn quintic(f: f64) -> (f64, f64) {
    let u = f * f * f * (f * (f * 6.0 - 15.0) + 10.0);
    let du = 30.0 * f * f * (f * (f - 2.0) + 1.0);
    (u, du)
}

/// Trilinear blend of eight corner values and corner gradients with quintic weights.
/// Returns the value and its derivative.
fn lattice(f: [f64; 3], values: [f64; 8], grads: [[f64; 3]; 8]) -> (f64, [f64; 3]) {
    let [va, vb, vc, vd, ve, vf, vg, vh] = values;
    let (ux, dux) = quintic(f[0]);
    let (uy, duy) = quintic(f[1]);
    let (uz, duz) = quintic(f[2]);

    let k1 = vb - va;
    let k2 = vc - va;
    let k3 = ve - va;
    let k4 = va - vb - vc + vd;
    let k5 = va - vc - ve + vg;
    let k6 = va - vb - ve + vf;
    let k7 = -va + vb + vc - vd + ve - vf - vg + vh;

    let value =
        va + k1 * ux + k2 * uy + k3 * uz + k4 * ux * uy + k5 * uy * uz + k6 * uz * ux
            + k7 * ux * uy * uz;

    let mut d = [0.0; 3];
    for (axis, out) in d.iter_mut().enumerate() {
        let [ga, gb, gc, gd, ge, gf, gg, gh] = grads.map(|g| g[axis]);
        *out = ga
            + ux * (gb - ga)
            + uy * (gc - ga)
            + uz * (ge - ga)
            + ux * uy * (ga - gb - gc + gd)
            + uy * uz * (ga - gc - ge + gg)
            + uz * ux * (ga - gb - ge + gf)
            + ux * uy * uz * (-ga + gb + gc - gd + ge - gf - gg + gh);
    }
    d[0] += dux * (k1 + k4 * uy + k6 * uz + k7 * uy * uz);
    d[1] += duy * (k2 + k5 * uz + k4 * ux + k7 * uz * ux);
    d[2] += duz * (k3 + k6 * ux + k5 * uy + k7 * ux * uy);
    (value, d)
}

fn cell(p: Vec3) -> ([f64; 3], [f64; 3]) {
    let i = [p.x.floor(), p.y.floor(), p.z.floor()];
    let f = [p.x - i[0], p.y - i[1], p.z - i[2]];
    (i, f)
}

fn corner(i: [f64; 3], o: [f64; 3]) -> [f64; 3] {
    [i[0] + o[0], i[1] + o[1], i[2] + o[2]]
}

fn perlin(p: Vec3) -> (f64, [f64; 3]) {
    let (i, f) = cell(p);
    let mut values = [0.0; 8];
    let mut grads = [[0.0; 3]; 8];
    for (k, o) in CORNERS.iter().enumerate() {
        let h = hash13(corner(i, *o));
        let g = GRADIENTS[((h * 12.0) as usize).min(11)];
        let rel = [f[0] - o[0], f[1] - o[1], f[2] - o[2]];
        values[k] = g[0] * rel[0] + g[1] * rel[1] + g[2] * rel[2];
        grads[k] = g;
    }
    let (v, d) = lattice(f, values, grads);
    // Edge gradients bound the raw value by 2; in practice it stays near [-1, 1].
    (v.clamp(-1.0, 1.0), d)
}

fn value(p: Vec3) -> (f64, [f64; 3]) {
    let (i, f) = cell(p);
    let values = CORNERS.map(|o| hash13(corner(i, o)) * 2.0 - 1.0);
    lattice(f, values, [[0.0; 3]; 8])
}

fn sine_field(p: Vec3) -> (f64, [f64; 3]) {
    let a = p.x + p.z;
    let b = 0.87 * p.y + 0.5 * p.x - 0.6 * p.z;
    let v = 0.5 * (a.sin() + b.sin());
    let (ca, cb) = (a.cos(), b.cos());
    (
        v,
        [
            0.5 * (ca + 0.5 * cb),
            0.5 * 0.87 * cb,
            0.5 * (ca - 0.6 * cb),
        ],
    )
}

#[cfg(test)]
#[path = "../../tests/unit/library/noise.rs"]
mod tests;
