use super::geometry::GridGeometry;

/// A pointer location in surface coordinates (pixels, or terminal cells).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerPosition {
    pub x: f32,
    pub y: f32,
}

impl PointerPosition {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: PointerPosition) -> f32 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

/// The logical slot a pointer resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DropZone {
    pub day: usize,
    pub minutes: u16,
}

/// Where the week grid sits on the drawing surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportGeometry {
    /// Top-left corner of the first day column's first hour row.
    pub origin_x: f32,
    pub origin_y: f32,
    pub day_width: f32,
    pub days: usize,
    pub grid: GridGeometry,
    pub snap_minutes: u16,
}

impl ViewportGeometry {
    pub fn day_at(&self, x: f32) -> Option<usize> {
        if self.day_width <= 0.0 {
            return None;
        }
        let dx = x - self.origin_x;
        if dx < 0.0 {
            return None;
        }
        let day = (dx / self.day_width) as usize;
        (day < self.days).then_some(day)
    }

    pub fn contains_y(&self, y: f32) -> bool {
        let dy = y - self.origin_y;
        dy >= 0.0 && dy <= self.grid.total_height()
    }

    /// Offset of `y` from the top of the grid.
    pub fn grid_y(&self, y: f32) -> f32 {
        y - self.origin_y
    }

    pub fn day_left(&self, day: usize) -> f32 {
        self.origin_x + day as f32 * self.day_width
    }
}

/// Map a pointer position to a `(day, minutes)` slot, or `None` when the
/// pointer is off the grid.
pub fn resolve_drop_zone(
    pointer: PointerPosition,
    viewport: &ViewportGeometry,
) -> Option<DropZone> {
    let day = viewport.day_at(pointer.x)?;
    if !viewport.contains_y(pointer.y) {
        return None;
    }
    let minutes = viewport
        .grid
        .minutes_at(viewport.grid_y(pointer.y), viewport.snap_minutes);
    Some(DropZone { day, minutes })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport() -> ViewportGeometry {
        ViewportGeometry {
            origin_x: 100.0,
            origin_y: 50.0,
            day_width: 150.0,
            days: 7,
            grid: GridGeometry::default(),
            snap_minutes: 15,
        }
    }

    #[test]
    fn resolves_inside_grid() {
        let zone = resolve_drop_zone(PointerPosition::new(420.0, 210.0), &viewport());
        // third column, 160px below the top = 08:00
        assert_eq!(zone, Some(DropZone { day: 2, minutes: 480 }));
    }

    #[test]
    fn snaps_to_quarter_hours() {
        let zone = resolve_drop_zone(PointerPosition::new(101.0, 50.0 + 172.0), &viewport());
        assert_eq!(zone, Some(DropZone { day: 0, minutes: 495 }));
    }

    #[test]
    fn none_off_grid() {
        let vp = viewport();
        assert_eq!(resolve_drop_zone(PointerPosition::new(90.0, 200.0), &vp), None);
        assert_eq!(resolve_drop_zone(PointerPosition::new(100.0 + 7.0 * 150.0, 200.0), &vp), None);
        assert_eq!(resolve_drop_zone(PointerPosition::new(200.0, 40.0), &vp), None);
        assert_eq!(
            resolve_drop_zone(PointerPosition::new(200.0, 50.0 + 18.0 * 80.0 + 1.0), &vp),
            None
        );
    }
}
