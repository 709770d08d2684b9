use super::*;
use crate::catalog::param::ParamValue;
use crate::catalog::registry::Library;
use crate::effect::selection::{EffectSelection, FunctionChoice};
use crate::foundation::core::Canvas;

fn effect(sel: &EffectSelection) -> CpuEffect {
    let lib = Library::builtin().unwrap();
    CpuEffect::from_resolved(&sel.resolve(&lib).unwrap()).unwrap()
}

fn render(sel: &EffectSelection, frames: usize) -> FloatImage {
    let fx = effect(sel);
    let mut buffers = FrameBuffers::new(Canvas::new(24, 16).unwrap(), Rgba::BLACK);
    for i in 0..frames {
        fx.render_frame(&mut buffers, i as f64 / 30.0);
    }
    buffers.front().clone()
}

#[test]
fn disabled_feedback_writes_the_colorized_value() {
    let sel = EffectSelection {
        color: FunctionChoice::new("hue_cycle"),
        ..EffectSelection::default()
    };
    let fx = effect(&sel);
    assert!(!fx.feedback_enabled());
    let canvas = Canvas::new(8, 6).unwrap();
    let mut buffers = FrameBuffers::new(canvas, Rgba::BLACK);
    let img = fx.render_frame(&mut buffers, 0.7).clone();
    for y in 0..6 {
        for x in 0..8 {
            let uv = Vec2::new((f64::from(x) + 0.5) / 8.0, 1.0 - (f64::from(y) + 0.5) / 6.0);
            assert_eq!(img.get(x, y), Some(fx.base_color(uv, canvas.view_scale(), 0.7)));
        }
    }
}

#[test]
fn disabled_feedback_matches_replace_blend() {
    let disabled = EffectSelection::default();
    let mut replace = EffectSelection::default();
    replace.feedback.enabled = true;
    replace.feedback.blend = FunctionChoice::new("replace");
    replace.feedback.warp = FunctionChoice::new("swirl");
    assert_eq!(render(&disabled, 3), render(&replace, 3));
}

#[test]
fn zero_amount_blend_keeps_previous_frame() {
    let mut sel = EffectSelection::default();
    sel.feedback.enabled = true;
    sel.feedback.warp = FunctionChoice::new("offset").with_param("amplitude", ParamValue::Float(0.0));
    sel.feedback.blend = FunctionChoice::new("linear").with_param("amount", ParamValue::Float(0.0));
    let fx = effect(&sel);
    let mut buffers = FrameBuffers::new(Canvas::new(5, 4).unwrap(), Rgba::gray(0.25));
    let img = fx.render_frame(&mut buffers, 1.0);
    for c in img.pixels() {
        assert!((c.r - 0.25).abs() < 1e-12 && (c.a - 1.0).abs() < 1e-12, "{c:?}");
    }
}

#[test]
fn unwarped_feedback_reads_the_same_pixel() {
    let mut sel = EffectSelection::default();
    sel.feedback.enabled = true;
    sel.feedback.warp = FunctionChoice::new("offset").with_param("amplitude", ParamValue::Float(0.0));
    sel.feedback.blend = FunctionChoice::new("linear").with_param("amount", ParamValue::Float(0.0));
    let fx = effect(&sel);
    let canvas = Canvas::new(3, 4).unwrap();
    let mut buffers = FrameBuffers::new(canvas, Rgba::BLACK);
    for (i, px) in buffers.split().1.pixels_mut().iter_mut().enumerate() {
        *px = Rgba::gray(i as f64 / 12.0);
    }
    buffers.swap();
    let history = buffers.front().clone();
    let img = fx.render_frame(&mut buffers, 0.5);
    for (got, want) in img.pixels().iter().zip(history.pixels()) {
        assert!((got.r - want.r).abs() < 1e-9, "{got:?} vs {want:?}");
    }
}

#[test]
fn feedback_changes_the_output_over_frames() {
    let mut sel = EffectSelection::default();
    sel.feedback.enabled = true;
    sel.feedback.warp = FunctionChoice::new("swirl_sigmoid_distorted");
    sel.feedback.blend = FunctionChoice::new("linear").with_param("amount", ParamValue::Float(0.5));
    let img = render(&sel, 4);
    assert!(img.pixels().iter().all(|c| c.is_finite()));

    let mut plain = sel.clone();
    plain.feedback.enabled = false;
    assert_ne!(img, render(&plain, 4));
}

#[test]
fn paired_warp_uses_two_channel_field() {
    let mut sel = EffectSelection::default();
    sel.feedback.enabled = true;
    sel.feedback.warp = FunctionChoice::new("displace");
    sel.feedback.warp_noise = "value_3d".to_owned();
    let img = render(&sel, 2);
    assert!(img.pixels().iter().all(|c| c.is_finite()));
}

#[test]
fn tone_map_normalizes_then_applies_contrast_and_brightness() {
    let mut sel = EffectSelection::default();
    sel.noise.brightness = 0.5;
    let fx = effect(&sel);
    assert!((fx.tone_map(0.0) - 0.25).abs() < 1e-12);
    assert!(fx.tone_map(1.0) > 0.49 && fx.tone_map(1.0) <= 0.5);
    assert!(fx.tone_map(-1.0) < 0.01);
}

#[test]
fn function_without_cpu_counterpart_is_rejected() {
    let mut lib = Library::builtin().unwrap();
    lib.load_json_str(
        r#"{ "family": "blend", "functions": [ { "id": "dissolve", "display_name": "Dissolve" } ] }"#,
    )
    .unwrap();
    let mut sel = EffectSelection::default();
    sel.feedback.enabled = true;
    sel.feedback.blend = FunctionChoice::new("dissolve");
    let err = CpuEffect::from_resolved(&sel.resolve(&lib).unwrap()).unwrap_err();
    assert!(err.to_string().contains("no CPU implementation for blend function 'dissolve'"));
}
