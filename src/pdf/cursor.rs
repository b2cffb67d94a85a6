//! Per-render layout state.
//!
//! One cursor is allocated for each render call and owns the running
//! vertical position, measured from the top of the page in points. Sibling
//! columns are laid out by forking the cursor twice from the same starting
//! position and merging afterwards with the maximum ending offset, so
//! content after the block never overlaps the taller column.

#[derive(Debug, Clone, Copy)]
pub struct PageGeometry {
    pub width: f64,
    pub height: f64,
    pub margin_left: f64,
    pub margin_right: f64,
    pub margin_top: f64,
    pub margin_bottom: f64,
}

impl PageGeometry {
    /// A4 portrait with uniform margins.
    pub fn a4(margin: f64) -> Self {
        Self {
            width: 595.28,
            height: 841.89,
            margin_left: margin,
            margin_right: margin,
            margin_top: margin,
            margin_bottom: margin,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LayoutCursor {
    page: PageGeometry,
    y: f64,
}

impl LayoutCursor {
    pub fn new(page: PageGeometry) -> Self {
        Self { page, y: page.margin_top }
    }

    pub fn page(&self) -> &PageGeometry {
        &self.page
    }

    /// Current vertical position, measured from the top of the page.
    pub fn y(&self) -> f64 {
        self.y
    }

    pub fn set_y(&mut self, y: f64) {
        self.y = y;
    }

    pub fn advance(&mut self, dy: f64) {
        self.y += dy;
    }

    pub fn usable_width(&self) -> f64 {
        self.page.width - self.page.margin_left - self.page.margin_right
    }

    /// Left edge x that centers content of the given width between the
    /// margins. Content wider than the usable area pins to the left margin.
    pub fn centered_x(&self, content_width: f64) -> f64 {
        let slack = (self.usable_width() - content_width).max(0.0);
        self.page.margin_left + slack / 2.0
    }

    /// Starts a sibling column at the current position.
    pub fn fork(&self) -> LayoutCursor {
        self.clone()
    }

    /// Resumes single-column flow below two independently advanced forks.
    pub fn merge(&mut self, left: &LayoutCursor, right: &LayoutCursor) {
        self.y = left.y.max(right.y);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cursor() -> LayoutCursor {
        LayoutCursor::new(PageGeometry::a4(50.0))
    }

    #[test]
    fn starts_at_top_margin() {
        assert_eq!(cursor().y(), 50.0);
    }

    #[test]
    fn advance_accumulates() {
        let mut c = cursor();
        c.advance(10.0);
        c.advance(2.5);
        assert!((c.y() - 62.5).abs() < 1e-9);
    }

    #[test]
    fn centering_splits_slack_evenly() {
        let c = cursor();
        // usable width is 495.28; a 95.28pt line leaves 400pt of slack
        let x = c.centered_x(95.28);
        assert!((x - 250.0).abs() < 1e-9);
    }

    #[test]
    fn oversized_content_pins_to_left_margin() {
        let c = cursor();
        assert_eq!(c.centered_x(10_000.0), 50.0);
    }

    #[test]
    fn forks_share_the_starting_position() {
        let mut c = cursor();
        c.advance(300.0);
        let left = c.fork();
        let right = c.fork();
        assert_eq!(left.y(), c.y());
        assert_eq!(right.y(), c.y());
    }

    #[test]
    fn merge_takes_the_taller_fork() {
        let mut c = cursor();
        c.advance(300.0);
        let mut left = c.fork();
        let mut right = c.fork();
        left.advance(28.0);
        right.advance(45.0);
        c.merge(&left, &right);
        assert!((c.y() - 395.0).abs() < 1e-9);
    }
}
