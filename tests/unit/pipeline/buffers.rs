use super::*;

fn canvas(w: u32, h: u32) -> Canvas {
    Canvas::new(w, h).unwrap()
}

#[test]
fn roles_alternate_strictly() {
    let mut fb = FrameBuffers::new(canvas(2, 2), Rgba::BLACK);
    assert_eq!(fb.write_index(), 0);

    let (prev, target) = fb.split();
    assert_eq!(prev.pixels()[0], Rgba::BLACK);
    target.fill(Rgba::gray(0.5));
    fb.swap();
    assert_eq!(fb.write_index(), 1);
    assert_eq!(fb.front().pixels()[0], Rgba::gray(0.5));

    let (prev, target) = fb.split();
    assert_eq!(prev.pixels()[0], Rgba::gray(0.5));
    assert_eq!(target.pixels()[0], Rgba::BLACK);
    target.fill(Rgba::gray(1.0));
    fb.swap();
    assert_eq!(fb.write_index(), 0);
    assert_eq!(fb.front().pixels()[0], Rgba::gray(1.0));
}

#[test]
fn resize_clears_both_slots() {
    let mut fb = FrameBuffers::new(canvas(2, 2), Rgba::BLACK);
    fb.split().1.fill(Rgba::gray(0.3));
    fb.swap();
    fb.resize(canvas(4, 3), Rgba::TRANSPARENT);
    assert_eq!(fb.canvas(), canvas(4, 3));
    assert_eq!(fb.write_index(), 0);
    let (prev, target) = fb.split();
    assert!(prev.pixels().iter().all(|&c| c == Rgba::TRANSPARENT));
    assert_eq!(target.pixels().len(), 12);
}

#[test]
fn resize_to_same_size_still_clears_history() {
    let mut fb = FrameBuffers::new(canvas(2, 2), Rgba::BLACK);
    fb.split().1.fill(Rgba::gray(0.3));
    fb.swap();
    fb.resize(canvas(2, 2), Rgba::TRANSPARENT);
    assert_eq!(fb.write_index(), 0);
    assert!(fb.front().pixels().iter().all(|&c| c == Rgba::TRANSPARENT));
    assert!(fb.split().1.pixels().iter().all(|&c| c == Rgba::TRANSPARENT));
}

#[test]
fn clear_fills_both_slots() {
    let mut fb = FrameBuffers::new(canvas(1, 1), Rgba::BLACK);
    fb.clear(Rgba::gray(0.2));
    assert_eq!(fb.front().pixels()[0], Rgba::gray(0.2));
    assert_eq!(fb.split().1.pixels()[0], Rgba::gray(0.2));
}
