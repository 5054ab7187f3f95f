//! SVG drawing surface.
//!
//! Builds a self-contained SVG document in memory. Nothing is written
//! anywhere until [`SvgSurface::into_svg`] hands the finished string over,
//! so a failed layout run leaves no partial output behind.

use std::fmt::Write;

use crate::layout::Surface;

/// A [`Surface`] that serializes drawing commands to SVG markup.
#[derive(Debug, Default)]
pub struct SvgSurface {
    out: String,
}

impl SvgSurface {
    pub fn new() -> Self {
        SvgSurface::default()
    }

    /// The finished SVG document.
    pub fn into_svg(self) -> String {
        self.out
    }
}

fn escape_text(s: &str) -> String {
    s.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

// String formatting never fails; the Write results are discarded the same
// way pushing to a String would be.
impl Surface for SvgSurface {
    fn begin(&mut self, width: i32, height: i32) {
        self.out.push_str("<?xml version=\"1.0\"?>\n");
        let _ = writeln!(
            self.out,
            "<svg width=\"{}\" height=\"{}\" xmlns=\"http://www.w3.org/2000/svg\">",
            width, height
        );
    }

    fn end(&mut self) {
        self.out.push_str("</svg>\n");
    }

    fn rect(&mut self, x: i32, y: i32, width: i32, height: i32, style: &str) {
        let _ = writeln!(
            self.out,
            "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" style=\"{}\"/>",
            x, y, width, height, style
        );
    }

    fn line(&mut self, x1: i32, y1: i32, x2: i32, y2: i32, style: &str) {
        let _ = writeln!(
            self.out,
            "<line x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\" style=\"{}\"/>",
            x1, y1, x2, y2, style
        );
    }

    fn circle(&mut self, cx: i32, cy: i32, radius: i32, style: &str) {
        let _ = writeln!(
            self.out,
            "<circle cx=\"{}\" cy=\"{}\" r=\"{}\" style=\"{}\"/>",
            cx, cy, radius, style
        );
    }

    fn polyline(&mut self, xs: &[i32], ys: &[i32], style: &str) {
        let points: Vec<String> = xs
            .iter()
            .zip(ys)
            .map(|(x, y)| format!("{},{}", x, y))
            .collect();
        let _ = writeln!(
            self.out,
            "<polyline points=\"{}\" style=\"{}\"/>",
            points.join(" "),
            style
        );
    }

    fn text(&mut self, x: i32, y: i32, content: &str, style: &str) {
        let _ = writeln!(
            self.out,
            "<text x=\"{}\" y=\"{}\" style=\"{}\">{}</text>",
            x,
            y,
            style,
            escape_text(content)
        );
    }

    fn begin_group(&mut self, dx: i32, dy: i32) {
        let _ = writeln!(self.out, "<g transform=\"translate({},{})\">", dx, dy);
    }

    fn end_group(&mut self) {
        self.out.push_str("</g>\n");
    }
}
