use ratatui::style::Color;

/// A 2D raster surface addressed in logical pixel coordinates.
///
/// Games paint through this trait only, so the same render code drives the
/// terminal rasterizer and the draw-call recorder used in tests.
pub trait Canvas {
    /// Logical size of the surface in pixels.
    fn size(&self) -> (f32, f32);
    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color);
    fn fill_circle(&mut self, cx: f32, cy: f32, r: f32, color: Color);
    fn text(&mut self, x: f32, y: f32, text: &str, color: Color);

    fn clear(&mut self, color: Color) {
        let (w, h) = self.size();
        self.fill_rect(0.0, 0.0, w, h, color);
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum DrawCall {
    Rect { x: f32, y: f32, w: f32, h: f32, color: Color },
    Circle { cx: f32, cy: f32, r: f32, color: Color },
    Text { x: f32, y: f32, text: String, color: Color },
}

/// Canvas that records every primitive instead of painting it.
pub struct Recorder {
    width: f32,
    height: f32,
    pub calls: Vec<DrawCall>,
}

impl Recorder {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height, calls: Vec::new() }
    }

    pub fn circles(&self) -> impl Iterator<Item = &DrawCall> {
        self.calls.iter().filter(|c| matches!(c, DrawCall::Circle { .. }))
    }

    pub fn texts(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                DrawCall::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl Canvas for Recorder {
    fn size(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color) {
        self.calls.push(DrawCall::Rect { x, y, w, h, color });
    }

    fn fill_circle(&mut self, cx: f32, cy: f32, r: f32, color: Color) {
        self.calls.push(DrawCall::Circle { cx, cy, r, color });
    }

    fn text(&mut self, x: f32, y: f32, text: &str, color: Color) {
        self.calls.push(DrawCall::Text { x, y, text: text.to_string(), color });
    }
}
