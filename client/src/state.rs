use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, ImageData};

use songsketch_shared::GalleryEntry;

use crate::geometry::Point;
use crate::history::History;

pub const DEFAULT_PALETTE: [&str; 6] = [
    "#1f1f1f", "#e46b49", "#2f6fde", "#2f9e60", "#e3b341", "#8a4fd3",
];
pub const DEFAULT_BACKGROUND: &str = "#ffffff";
pub const DEFAULT_BRUSH_WIDTH: f64 = 5.0;
pub const RESIZE_DEBOUNCE_MS: i32 = 400;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Tool {
    Brush,
    Eraser,
    Line,
    Rectangle,
    Circle,
}

impl Tool {
    pub fn from_id(id: &str) -> Option<Tool> {
        match id {
            "brush" => Some(Tool::Brush),
            "eraser" => Some(Tool::Eraser),
            "line" => Some(Tool::Line),
            "rectangle" => Some(Tool::Rectangle),
            "circle" => Some(Tool::Circle),
            _ => None,
        }
    }

    pub fn id(self) -> &'static str {
        match self {
            Tool::Brush => "brush",
            Tool::Eraser => "eraser",
            Tool::Line => "line",
            Tool::Rectangle => "rectangle",
            Tool::Circle => "circle",
        }
    }

    pub fn is_freehand(self) -> bool {
        matches!(self, Tool::Brush | Tool::Eraser)
    }
}

#[derive(Clone, Copy)]
pub enum StrokePhase {
    Idle,
    Stroking { start: Point },
}

/// The eraser paints with the background color; everything else paints with
/// the selected color.
pub fn paint_color<'a>(tool: Tool, selected: &'a str, background: &'a str) -> &'a str {
    if tool == Tool::Eraser {
        background
    } else {
        selected
    }
}

pub fn sanitize_brush_width(width: f64) -> f64 {
    let width = if width.is_finite() {
        width
    } else {
        DEFAULT_BRUSH_WIDTH
    };
    width.max(1.0).min(100.0)
}

pub struct State {
    pub canvas: HtmlCanvasElement,
    pub ctx: CanvasRenderingContext2d,
    pub tool: Tool,
    pub fill_shape: bool,
    pub brush_width: f64,
    pub selected_color: String,
    pub background_color: String,
    pub palette: Vec<String>,
    pub palette_selected: Option<usize>,
    pub phase: StrokePhase,
    pub stroke_snapshot: Option<ImageData>,
    pub history: History<ImageData>,
    pub entries: Vec<GalleryEntry>,
    pub selected_entry: Option<usize>,
    pub busy: bool,
}

impl State {
    pub fn is_stroking(&self) -> bool {
        matches!(self.phase, StrokePhase::Stroking { .. })
    }

    pub fn selected_entry_id(&self) -> Option<String> {
        let index = self.selected_entry?;
        self.entries.get(index).map(|entry| entry.id.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tool_ids_round_trip() {
        for tool in [
            Tool::Brush,
            Tool::Eraser,
            Tool::Line,
            Tool::Rectangle,
            Tool::Circle,
        ] {
            assert_eq!(Tool::from_id(tool.id()), Some(tool));
        }
    }

    #[test]
    fn unknown_tool_ids_are_ignored() {
        assert_eq!(Tool::from_id("spray"), None);
        assert_eq!(Tool::from_id(""), None);
    }

    #[test]
    fn eraser_paints_with_the_background_color() {
        assert_eq!(paint_color(Tool::Eraser, "#ff0000", "#ffffff"), "#ffffff");
        assert_eq!(paint_color(Tool::Brush, "#ff0000", "#ffffff"), "#ff0000");
        assert_eq!(paint_color(Tool::Circle, "#ff0000", "#ffffff"), "#ff0000");
    }

    #[test]
    fn brush_width_is_at_least_one() {
        assert_eq!(sanitize_brush_width(0.0), 1.0);
        assert_eq!(sanitize_brush_width(-3.0), 1.0);
        assert_eq!(sanitize_brush_width(12.5), 12.5);
        assert_eq!(sanitize_brush_width(f64::NAN), DEFAULT_BRUSH_WIDTH);
        assert_eq!(sanitize_brush_width(f64::INFINITY), 100.0);
    }

    #[test]
    fn freehand_tools_are_brush_and_eraser() {
        assert!(Tool::Brush.is_freehand());
        assert!(Tool::Eraser.is_freehand());
        assert!(!Tool::Line.is_freehand());
        assert!(!Tool::Rectangle.is_freehand());
        assert!(!Tool::Circle.is_freehand());
    }
}
