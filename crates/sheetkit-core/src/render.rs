use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use anyhow::{Context, anyhow};
use printpdf::path::PaintMode;
use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference,
    PdfLayerReference, Pt,
};

/// 72 points to the inch.
pub const POINTS_PER_INCH: f64 = 72.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::hex(0x000000);
    pub const WHITE: Rgb = Rgb::hex(0xFFFFFF);

    pub const fn hex(value: u32) -> Self {
        Self {
            r: ((value >> 16) & 0xFF) as u8,
            g: ((value >> 8) & 0xFF) as u8,
            b: (value & 0xFF) as u8,
        }
    }

    fn to_pdf(self) -> Color {
        Color::Rgb(printpdf::Rgb::new(
            f32::from(self.r) / 255.0,
            f32::from(self.g) / 255.0,
            f32::from(self.b) / 255.0,
            None,
        ))
    }
}

/// Axis-aligned box in points, anchored at its bottom-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn top(&self) -> f64 {
        self.y + self.height
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Font {
    Helvetica,
    HelveticaBold,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub text: String,
    pub font: Font,
    pub size: f64,
    pub color: Rgb,
    /// Left edge of the run.
    pub x: f64,
    /// Baseline.
    pub y: f64,
}

/// Drawing sink the sheet renderers paint onto. Coordinates are PDF points
/// with the origin at the bottom-left of the page.
pub trait Canvas {
    fn size(&self) -> (f64, f64);

    fn fill_rect(&mut self, rect: Rect, color: Rgb);

    fn stroke_rect(&mut self, rect: Rect, color: Rgb, line_width: f64);

    fn draw_text(&mut self, run: TextRun);
}

/// Single-page PDF backed by printpdf's builtin Helvetica faces.
pub struct PdfCanvas {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    width: f64,
    height: f64,
}

impl PdfCanvas {
    #[tracing::instrument]
    pub fn new(title: &str, width: f64, height: f64) -> anyhow::Result<Self> {
        let (doc, page, layer) = PdfDocument::new(
            title,
            mm(width),
            mm(height),
            "sheet",
        );
        let regular = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| anyhow!("failed to load Helvetica: {e:?}"))?;
        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| anyhow!("failed to load Helvetica-Bold: {e:?}"))?;
        let layer = doc.get_page(page).get_layer(layer);

        Ok(Self {
            doc,
            layer,
            regular,
            bold,
            width,
            height,
        })
    }

    #[tracing::instrument(skip(self))]
    pub fn save(self, path: &Path) -> anyhow::Result<()> {
        let file =
            File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
        let mut writer = BufWriter::new(file);
        self.doc
            .save(&mut writer)
            .map_err(|e| anyhow!("failed to write {}: {e:?}", path.display()))?;
        tracing::info!(path = %path.display(), "wrote pdf");
        Ok(())
    }

    fn pdf_rect(rect: Rect, mode: PaintMode) -> printpdf::Rect {
        printpdf::Rect::new(
            mm(rect.x),
            mm(rect.y),
            mm(rect.right()),
            mm(rect.top()),
        )
        .with_mode(mode)
    }
}

impl Canvas for PdfCanvas {
    fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    fn fill_rect(&mut self, rect: Rect, color: Rgb) {
        self.layer.set_fill_color(color.to_pdf());
        self.layer.add_rect(Self::pdf_rect(rect, PaintMode::Fill));
    }

    fn stroke_rect(&mut self, rect: Rect, color: Rgb, line_width: f64) {
        self.layer.set_outline_color(color.to_pdf());
        self.layer.set_outline_thickness(line_width as f32);
        self.layer.add_rect(Self::pdf_rect(rect, PaintMode::Stroke));
    }

    fn draw_text(&mut self, run: TextRun) {
        let font = match run.font {
            Font::Helvetica => &self.regular,
            Font::HelveticaBold => &self.bold,
        };
        self.layer.set_fill_color(run.color.to_pdf());
        self.layer
            .use_text(run.text, run.size as f32, mm(run.x), mm(run.y), font);
    }
}

fn mm(points: f64) -> Mm {
    Mm::from(Pt(points as f32))
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Fill { rect: Rect, color: Rgb },
    Stroke { rect: Rect, color: Rgb, line_width: f64 },
    Text(TextRun),
}

/// Keeps every primitive in paint order instead of producing a file.
#[derive(Debug, Clone)]
pub struct RecordingCanvas {
    width: f64,
    height: f64,
    pub ops: Vec<DrawOp>,
}

impl RecordingCanvas {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            ops: Vec::new(),
        }
    }

    pub fn texts(&self) -> impl Iterator<Item = &TextRun> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text(run) => Some(run),
            _ => None,
        })
    }

    pub fn strokes(&self) -> impl Iterator<Item = &Rect> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Stroke { rect, .. } => Some(rect),
            _ => None,
        })
    }

    pub fn fills(&self) -> impl Iterator<Item = (&Rect, Rgb)> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Fill { rect, color } => Some((rect, *color)),
            _ => None,
        })
    }
}

impl Canvas for RecordingCanvas {
    fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    fn fill_rect(&mut self, rect: Rect, color: Rgb) {
        self.ops.push(DrawOp::Fill { rect, color });
    }

    fn stroke_rect(&mut self, rect: Rect, color: Rgb, line_width: f64) {
        self.ops.push(DrawOp::Stroke {
            rect,
            color,
            line_width,
        });
    }

    fn draw_text(&mut self, run: TextRun) {
        self.ops.push(DrawOp::Text(run));
    }
}

/// Baseline that visually centres a line of `size` inside a box of
/// `height`, lifted by `lift` of the font size to sit above descenders.
pub fn centered_baseline(bottom: f64, height: f64, size: f64, lift: f64) -> f64 {
    bottom + (height - size) / 2.0 + size * lift
}

#[cfg(test)]
mod tests {
    use super::{Canvas, DrawOp, Rect, RecordingCanvas, Rgb, centered_baseline};

    #[test]
    fn hex_colors_split_into_channels() {
        let color = Rgb::hex(0x2C3E50);
        assert_eq!((color.r, color.g, color.b), (0x2C, 0x3E, 0x50));
        assert_eq!(Rgb::BLACK, Rgb { r: 0, g: 0, b: 0 });
    }

    #[test]
    fn recording_canvas_keeps_paint_order() {
        let mut canvas = RecordingCanvas::new(100.0, 50.0);
        let rect = Rect::new(1.0, 2.0, 3.0, 4.0);
        canvas.fill_rect(rect, Rgb::WHITE);
        canvas.stroke_rect(rect, Rgb::BLACK, 0.5);

        assert_eq!(canvas.size(), (100.0, 50.0));
        assert!(matches!(canvas.ops[0], DrawOp::Fill { .. }));
        assert!(matches!(canvas.ops[1], DrawOp::Stroke { .. }));
        assert_eq!(canvas.strokes().count(), 1);
        assert_eq!(rect.top(), 6.0);
        assert_eq!(rect.right(), 4.0);
    }

    #[test]
    fn baseline_centres_then_lifts() {
        assert_eq!(centered_baseline(0.0, 20.0, 10.0, 0.0), 5.0);
        assert_eq!(centered_baseline(10.0, 20.0, 10.0, 0.1), 16.0);
    }
}
