//! Vector path rasterizer for whole-page diagram renderings.
//!
//! Replays path construction and painting operators from a decoded content
//! stream onto a white `tiny-skia` canvas. Text, shadings and images are not
//! drawn; parts diagrams are line-art, which is what this covers.

use lopdf::content::Operation;
use lopdf::Object;
use tiny_skia::{Color, FillRule, Paint, PathBuilder, Pixmap, Rect, Stroke, Transform};

use crate::error::{Error, Result};

/// Operators that paint the current path.
pub const PAINT_OPERATORS: [&str; 10] = ["S", "s", "f", "F", "f*", "B", "B*", "b", "b*", "n"];

/// Largest canvas side, in pixels.
const MAX_CANVAS_SIDE: f32 = 16_384.0;

/// Whether `operator` paints (or discards) the current path.
///
/// `n` ends a path without painting; it is accepted here but not counted
/// as a drawing.
pub fn is_painting_operator(operator: &str) -> bool {
    PAINT_OPERATORS.contains(&operator)
}

/// Whether `operator` produces a visible drawing.
pub fn is_drawing_operator(operator: &str) -> bool {
    operator != "n" && is_painting_operator(operator)
}

#[derive(Debug, Clone, Copy)]
struct GraphicsState {
    ctm: Transform,
    stroke: Color,
    fill: Color,
    line_width: f32,
}

impl Default for GraphicsState {
    fn default() -> Self {
        Self {
            ctm: Transform::identity(),
            stroke: Color::BLACK,
            fill: Color::BLACK,
            line_width: 1.0,
        }
    }
}

fn number(obj: &Object) -> Option<f32> {
    obj.as_float().ok()
}

fn numbers<const N: usize>(operands: &[Object]) -> Option<[f32; N]> {
    if operands.len() < N {
        return None;
    }
    let mut out = [0.0; N];
    for (slot, obj) in out.iter_mut().zip(&operands[operands.len() - N..]) {
        *slot = number(obj)?;
    }
    Some(out)
}

fn channel(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

fn gray(g: f32) -> Color {
    let c = channel(g);
    Color::from_rgba8(c, c, c, 255)
}

fn rgb(r: f32, g: f32, b: f32) -> Color {
    Color::from_rgba8(channel(r), channel(g), channel(b), 255)
}

fn cmyk(c: f32, m: f32, y: f32, k: f32) -> Color {
    rgb((1.0 - c) * (1.0 - k), (1.0 - m) * (1.0 - k), (1.0 - y) * (1.0 - k))
}

/// Rasterizes path operators onto a pixmap.
struct Rasterizer {
    pixmap: Pixmap,
    base: Transform,
    state: GraphicsState,
    saved: Vec<GraphicsState>,
    path: PathBuilder,
    current: (f32, f32),
}

impl Rasterizer {
    fn new(media_box: [f32; 4], scale: f32) -> Result<Self> {
        let [x0, y0, x1, y1] = media_box;
        let width = ((x1 - x0).abs() * scale).ceil();
        let height = ((y1 - y0).abs() * scale).ceil();
        if !(1.0..=MAX_CANVAS_SIDE).contains(&width) || !(1.0..=MAX_CANVAS_SIDE).contains(&height) {
            return Err(Error::Render(format!(
                "canvas {}x{} out of bounds",
                width, height
            )));
        }

        let mut pixmap = Pixmap::new(width as u32, height as u32)
            .ok_or_else(|| Error::Render("failed to allocate pixmap".to_string()))?;
        pixmap.fill(Color::WHITE);

        let left = x0.min(x1);
        let top = y0.max(y1);
        Ok(Self {
            pixmap,
            base: Transform::from_row(scale, 0.0, 0.0, -scale, -left * scale, top * scale),
            state: GraphicsState::default(),
            saved: Vec::new(),
            path: PathBuilder::new(),
            current: (0.0, 0.0),
        })
    }

    fn device_transform(&self) -> Transform {
        self.base.pre_concat(self.state.ctm)
    }

    fn apply(&mut self, op: &Operation) {
        let operands = op.operands.as_slice();
        match op.operator.as_str() {
            "q" => self.saved.push(self.state),
            "Q" => {
                if let Some(state) = self.saved.pop() {
                    self.state = state;
                }
            }
            "cm" => {
                if let Some([a, b, c, d, e, f]) = numbers::<6>(operands) {
                    let m = Transform::from_row(a, b, c, d, e, f);
                    self.state.ctm = self.state.ctm.pre_concat(m);
                }
            }
            "w" => {
                if let Some([w]) = numbers::<1>(operands) {
                    self.state.line_width = w.max(0.0);
                }
            }
            "G" => {
                if let Some([g]) = numbers::<1>(operands) {
                    self.state.stroke = gray(g);
                }
            }
            "g" => {
                if let Some([g]) = numbers::<1>(operands) {
                    self.state.fill = gray(g);
                }
            }
            "RG" => {
                if let Some([r, g, b]) = numbers::<3>(operands) {
                    self.state.stroke = rgb(r, g, b);
                }
            }
            "rg" => {
                if let Some([r, g, b]) = numbers::<3>(operands) {
                    self.state.fill = rgb(r, g, b);
                }
            }
            "K" => {
                if let Some([c, m, y, k]) = numbers::<4>(operands) {
                    self.state.stroke = cmyk(c, m, y, k);
                }
            }
            "k" => {
                if let Some([c, m, y, k]) = numbers::<4>(operands) {
                    self.state.fill = cmyk(c, m, y, k);
                }
            }
            "m" => {
                if let Some([x, y]) = numbers::<2>(operands) {
                    self.path.move_to(x, y);
                    self.current = (x, y);
                }
            }
            "l" => {
                if let Some([x, y]) = numbers::<2>(operands) {
                    self.path.line_to(x, y);
                    self.current = (x, y);
                }
            }
            "c" => {
                if let Some([x1, y1, x2, y2, x3, y3]) = numbers::<6>(operands) {
                    self.path.cubic_to(x1, y1, x2, y2, x3, y3);
                    self.current = (x3, y3);
                }
            }
            "v" => {
                if let Some([x2, y2, x3, y3]) = numbers::<4>(operands) {
                    let (cx, cy) = self.current;
                    self.path.cubic_to(cx, cy, x2, y2, x3, y3);
                    self.current = (x3, y3);
                }
            }
            "y" => {
                if let Some([x1, y1, x3, y3]) = numbers::<4>(operands) {
                    self.path.cubic_to(x1, y1, x3, y3, x3, y3);
                    self.current = (x3, y3);
                }
            }
            "re" => {
                if let Some([x, y, w, h]) = numbers::<4>(operands) {
                    let (left, right) = if w < 0.0 { (x + w, x) } else { (x, x + w) };
                    let (bottom, top) = if h < 0.0 { (y + h, y) } else { (y, y + h) };
                    if let Some(rect) = Rect::from_ltrb(left, bottom, right, top) {
                        self.path.push_rect(rect);
                    }
                    self.current = (x, y);
                }
            }
            "h" => self.path.close(),
            "S" => self.paint(false, None),
            "s" => {
                self.path.close();
                self.paint(false, None);
            }
            "f" | "F" => self.paint(false, Some(FillRule::Winding)),
            "f*" => self.paint(false, Some(FillRule::EvenOdd)),
            "B" => self.paint(true, Some(FillRule::Winding)),
            "B*" => self.paint(true, Some(FillRule::EvenOdd)),
            "b" => {
                self.path.close();
                self.paint(true, Some(FillRule::Winding));
            }
            "b*" => {
                self.path.close();
                self.paint(true, Some(FillRule::EvenOdd));
            }
            "n" => self.path = PathBuilder::new(),
            _ => {}
        }
    }

    /// Paint and reset the current path. `fill` selects the fill rule; the
    /// path is stroked when `stroke` is set or no fill is requested.
    fn paint(&mut self, stroke: bool, fill: Option<FillRule>) {
        let builder = std::mem::replace(&mut self.path, PathBuilder::new());
        let Some(path) = builder.finish() else {
            return;
        };
        let transform = self.device_transform();

        if let Some(rule) = fill {
            let mut paint = Paint::default();
            paint.set_color(self.state.fill);
            paint.anti_alias = true;
            self.pixmap.fill_path(&path, &paint, rule, transform, None);
        }
        if stroke || fill.is_none() {
            let mut paint = Paint::default();
            paint.set_color(self.state.stroke);
            paint.anti_alias = true;
            let stroke = Stroke {
                width: self.state.line_width,
                ..Stroke::default()
            };
            self.pixmap.stroke_path(&path, &paint, &stroke, transform, None);
        }
    }
}

/// Rasterize `operations` for a page with the given media box, as PNG.
pub fn render_operations(operations: &[Operation], media_box: [f32; 4], scale: f32) -> Result<Vec<u8>> {
    let mut rasterizer = Rasterizer::new(media_box, scale)?;
    for op in operations {
        rasterizer.apply(op);
    }
    rasterizer
        .pixmap
        .encode_png()
        .map_err(|e| Error::Render(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn op(operator: &str, operands: &[f32]) -> Operation {
        Operation::new(operator, operands.iter().map(|&v| Object::Real(v)).collect())
    }

    fn decode(png: &[u8]) -> image::RgbaImage {
        image::load_from_memory(png).unwrap().to_rgba8()
    }

    #[test]
    fn test_blank_page_is_white() {
        let png = render_operations(&[], [0.0, 0.0, 100.0, 50.0], 2.0).unwrap();
        let img = decode(&png);
        assert_eq!(img.dimensions(), (200, 100));
        assert_eq!(img.get_pixel(10, 10).0, [255, 255, 255, 255]);
    }

    #[test]
    fn test_filled_rect_is_flipped_to_device_space() {
        // Fill the bottom-left 10x10 corner of a 100x100 page.
        let ops = vec![
            op("rg", &[1.0, 0.0, 0.0]),
            op("re", &[0.0, 0.0, 10.0, 10.0]),
            Operation::new("f", vec![]),
        ];
        let img = decode(&render_operations(&ops, [0.0, 0.0, 100.0, 100.0], 2.0).unwrap());

        assert_eq!(img.get_pixel(5, 195).0, [255, 0, 0, 255]);
        assert_eq!(img.get_pixel(5, 5).0, [255, 255, 255, 255]);
    }

    #[test]
    fn test_cm_and_state_stack() {
        let ops = vec![
            Operation::new("q", vec![]),
            op("cm", &[1.0, 0.0, 0.0, 1.0, 50.0, 50.0]),
            op("re", &[0.0, 0.0, 10.0, 10.0]),
            Operation::new("f", vec![]),
            Operation::new("Q", vec![]),
            op("re", &[0.0, 0.0, 10.0, 10.0]),
            Operation::new("f", vec![]),
        ];
        let img = decode(&render_operations(&ops, [0.0, 0.0, 100.0, 100.0], 1.0).unwrap());

        assert_eq!(img.get_pixel(55, 45).0, [0, 0, 0, 255]);
        assert_eq!(img.get_pixel(5, 95).0, [0, 0, 0, 255]);
        assert_eq!(img.get_pixel(30, 30).0, [255, 255, 255, 255]);
    }

    #[test]
    fn test_invalid_canvas() {
        assert!(matches!(
            render_operations(&[], [0.0, 0.0, 0.0, 0.0], 3.0),
            Err(Error::Render(_))
        ));
    }

    #[test]
    fn test_drawing_operators() {
        assert!(is_drawing_operator("f*"));
        assert!(is_drawing_operator("S"));
        assert!(!is_drawing_operator("n"));
        assert!(!is_drawing_operator("re"));
        assert!(!is_drawing_operator("Tj"));
    }
}
