use super::*;

#[test]
fn fps_frame_duration() {
    let fps = Fps::new(30, 1).unwrap();
    assert!((fps.frames_to_secs(15) - 0.5).abs() < 1e-12);
    assert!(Fps::new(0, 1).is_err());
    assert!(Fps::new(30, 0).is_err());
}

#[test]
fn view_scale_keeps_short_axis_at_one() {
    let wide = Canvas::new(200, 100).unwrap();
    assert_eq!(wide.view_scale(), Vec2::new(2.0, 1.0));
    let tall = Canvas::new(100, 200).unwrap();
    assert_eq!(tall.view_scale(), Vec2::new(1.0, 2.0));
    assert!(Canvas::new(0, 10).is_err());
}

#[test]
fn mix_is_exact_at_endpoints() {
    let a = Rgba::new(0.1, 0.7, 0.3, 1.0);
    let b = Rgba::new(0.9, 0.2, 0.55, 0.5);
    assert_eq!(Rgba::mix(a, b, 0.0), a);
    assert_eq!(Rgba::mix(a, b, 1.0), b);
}

#[test]
fn rgba8_quantization_clamps() {
    assert_eq!(Rgba::new(-1.0, 0.5, 2.0, 1.0).to_rgba8(), [0, 128, 255, 255]);
}
