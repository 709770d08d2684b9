use crate::foundation::core::{Canvas, Rgba};
use crate::pipeline::image::FloatImage;

/// Two equally sized images with alternating roles. Each frame reads the previous image
/// and writes the other; [`FrameBuffers::swap`] flips the roles at the frame boundary.
#[derive(Clone, Debug)]
pub struct FrameBuffers {
    slots: [FloatImage; 2],
    write: usize,
}

impl FrameBuffers {
    pub fn new(canvas: Canvas, clear: Rgba) -> Self {
        Self {
            slots: [
                FloatImage::filled(canvas, clear),
                FloatImage::filled(canvas, clear),
            ],
            write: 0,
        }
    }

    pub fn canvas(&self) -> Canvas {
        self.slots[0].canvas()
    }

    /// Index of the slot the next frame writes into.
    pub fn write_index(&self) -> usize {
        self.write
    }

    /// The most recently completed frame.
    pub fn front(&self) -> &FloatImage {
        &self.slots[1 - self.write]
    }

    /// Borrow `(previous, target)` for one frame. The two never alias.
    pub fn split(&mut self) -> (&FloatImage, &mut FloatImage) {
        let [a, b] = &mut self.slots;
        if self.write == 0 { (&*b, a) } else { (&*a, b) }
    }

    pub fn swap(&mut self) {
        self.write = 1 - self.write;
    }

    pub fn clear(&mut self, color: Rgba) {
        for slot in &mut self.slots {
            slot.fill(color);
        }
    }

    /// Resize both slots and clear them. The allocation is kept when the size is unchanged.
    pub fn resize(&mut self, canvas: Canvas, clear: Rgba) {
        if canvas == self.canvas() {
            self.clear(clear);
            self.write = 0;
            return;
        }
        tracing::debug!(width = canvas.width, height = canvas.height, "resizing frame buffers");
        *self = Self::new(canvas, clear);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/buffers.rs"]
mod tests;
