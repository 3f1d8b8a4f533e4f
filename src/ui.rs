//! Immediate-mode parameter panel
//!
//! Layout and pointer handling only; drawing lives in the renderer. The panel
//! is a vertical list of rows at the top-left, one per `TuningParam`.

use glam::Vec2;

use crate::tuning::{ParamKind, Tuning, TuningParam};

pub const PANEL_ORIGIN: Vec2 = Vec2::new(10.0, 10.0);
pub const PANEL_WIDTH: f32 = 240.0;
pub const ROW_HEIGHT: f32 = 22.0;
pub const ROW_GAP: f32 = 2.0;

/// Axis-aligned rectangle in screen pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub min: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(min: Vec2, size: Vec2) -> Self {
        Self { min, size }
    }

    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }

    /// Half-open: the right and bottom edges are outside
    pub fn contains(&self, p: Vec2) -> bool {
        let max = self.max();
        p.x >= self.min.x && p.x < max.x && p.y >= self.min.y && p.y < max.y
    }
}

#[derive(Debug, Clone)]
pub struct Panel {
    pub visible: bool,
    /// Slider being dragged
    active: Option<TuningParam>,
}

impl Panel {
    pub fn new(visible: bool) -> Self {
        Self {
            visible,
            active: None,
        }
    }

    pub fn toggle_visible(&mut self) {
        self.visible = !self.visible;
        self.active = None;
    }

    pub fn rows(&self) -> &'static [TuningParam] {
        &TuningParam::ALL
    }

    pub fn active(&self) -> Option<TuningParam> {
        self.active
    }

    pub fn row_rect(&self, index: usize) -> Rect {
        let y = PANEL_ORIGIN.y + index as f32 * (ROW_HEIGHT + ROW_GAP);
        Rect::new(
            Vec2::new(PANEL_ORIGIN.x, y),
            Vec2::new(PANEL_WIDTH, ROW_HEIGHT),
        )
    }

    /// Whole panel area
    pub fn bounds(&self) -> Rect {
        let rows = self.rows().len() as f32;
        Rect::new(
            PANEL_ORIGIN,
            Vec2::new(PANEL_WIDTH, rows * (ROW_HEIGHT + ROW_GAP) - ROW_GAP),
        )
    }

    /// Row under the pointer, if the panel is showing
    pub fn hit(&self, point: Vec2) -> Option<TuningParam> {
        if !self.visible {
            return None;
        }
        self.rows()
            .iter()
            .enumerate()
            .find(|(i, _)| self.row_rect(*i).contains(point))
            .map(|(_, &param)| param)
    }

    /// True if the pointer is over the visible panel
    pub fn captures(&self, point: Vec2) -> bool {
        self.visible && self.bounds().contains(point)
    }

    /// Pointer pressed. Returns true if the panel consumed the event.
    pub fn press(&mut self, point: Vec2, tuning: &mut Tuning) -> bool {
        if !self.captures(point) {
            return false;
        }
        if let Some(param) = self.hit(point) {
            if param.is_toggle() {
                tuning.toggle(param);
            } else {
                self.active = Some(param);
                self.apply_slider(param, point, tuning);
            }
        }
        true
    }

    /// Pointer moved with the button held. Consumes the event while a slider is active.
    pub fn drag(&mut self, point: Vec2, tuning: &mut Tuning) -> bool {
        match self.active {
            Some(param) => {
                self.apply_slider(param, point, tuning);
                true
            }
            None => false,
        }
    }

    /// Pointer released. Returns true if a slider drag ended.
    pub fn release(&mut self) -> bool {
        self.active.take().is_some()
    }

    /// Fill fraction of a slider row in [0, 1]; 0 or 1 for toggles
    pub fn fraction(param: TuningParam, tuning: &Tuning) -> f32 {
        let v = tuning.get(param);
        match param.kind() {
            ParamKind::Slider { min, max } => {
                if max > min {
                    ((v - min) / (max - min)).clamp(0.0, 1.0)
                } else {
                    0.0
                }
            }
            ParamKind::Toggle => v,
        }
    }

    fn apply_slider(&self, param: TuningParam, point: Vec2, tuning: &mut Tuning) {
        let Some(index) = self.rows().iter().position(|&p| p == param) else {
            return;
        };
        if let ParamKind::Slider { min, max } = param.kind() {
            let rect = self.row_rect(index);
            let t = ((point.x - rect.min.x) / rect.size.x).clamp(0.0, 1.0);
            tuning.set(param, min + t * (max - min));
        }
    }
}

/// Text shown on a row: label and current value
pub fn row_text(param: TuningParam, tuning: &Tuning) -> String {
    match param.kind() {
        ParamKind::Toggle => {
            let state = if tuning.get(param) > 0.5 { "on" } else { "off" };
            format!("{}: {}", param.label(), state)
        }
        ParamKind::Slider { .. } => format!("{}: {:.2}", param.label(), tuning.get(param)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row_point(panel: &Panel, param: TuningParam, t: f32) -> Vec2 {
        let index = panel
            .rows()
            .iter()
            .position(|&p| p == param)
            .expect("row");
        let rect = panel.row_rect(index);
        rect.min + Vec2::new(rect.size.x * t, rect.size.y / 2.0)
    }

    #[test]
    fn test_rows_stack_downwards() {
        let panel = Panel::new(true);
        let a = panel.row_rect(0);
        let b = panel.row_rect(1);
        assert_eq!(a.min, PANEL_ORIGIN);
        assert_eq!(b.min.y, a.min.y + ROW_HEIGHT + ROW_GAP);
    }

    #[test]
    fn test_hit_finds_row() {
        let panel = Panel::new(true);
        let p = row_point(&panel, TuningParam::Gravity, 0.5);
        assert_eq!(panel.hit(p), Some(TuningParam::Gravity));
        assert_eq!(panel.hit(Vec2::new(900.0, 700.0)), None);
    }

    #[test]
    fn test_hidden_panel_ignores_pointer() {
        let mut panel = Panel::new(false);
        let mut tuning = Tuning::default();
        let p = row_point(&panel, TuningParam::DrawPath, 0.5);
        assert!(!panel.press(p, &mut tuning));
        assert!(!tuning.draw_path);
    }

    #[test]
    fn test_press_toggle_flips() {
        let mut panel = Panel::new(true);
        let mut tuning = Tuning::default();
        let p = row_point(&panel, TuningParam::DrawHeading, 0.1);
        assert!(panel.press(p, &mut tuning));
        assert!(tuning.draw_heading);
        assert!(!panel.release());
    }

    #[test]
    fn test_slider_press_and_drag() {
        let mut panel = Panel::new(true);
        let mut tuning = Tuning::default();

        let p = row_point(&panel, TuningParam::Gravity, 0.0);
        assert!(panel.press(p, &mut tuning));
        assert_eq!(tuning.gravity, 1.0);

        // Dragging past the right edge pins to max, even off the panel
        let far = Vec2::new(PANEL_ORIGIN.x + PANEL_WIDTH * 3.0, 600.0);
        assert!(panel.drag(far, &mut tuning));
        assert_eq!(tuning.gravity, 20.0);

        assert!(panel.release());
        assert!(!panel.drag(p, &mut tuning));
    }

    #[test]
    fn test_fraction() {
        let tuning = Tuning::default();
        assert_eq!(Panel::fraction(TuningParam::TurretRate, &tuning), 1.0);
        assert!((Panel::fraction(TuningParam::VelocityY, &tuning) - 0.25).abs() < 1e-6);
        assert_eq!(Panel::fraction(TuningParam::DrawPath, &tuning), 0.0);
    }

    #[test]
    fn test_row_text() {
        let tuning = Tuning::default();
        assert_eq!(row_text(TuningParam::Gravity, &tuning), "Gravity: 10.00");
        assert_eq!(row_text(TuningParam::DrawPath, &tuning), "Draw path: off");
    }
}
