use super::time::snap_minutes;

/// First hour shown on the grid (06:00).
pub const GRID_START_MINUTES: u16 = 6 * 60;
/// Hourly rows on the grid, 6 AM to midnight.
pub const GRID_HOURS: u16 = 18;

/// Vertical placement of an item inside a day column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub top: f32,
    pub height: f32,
    pub start_minutes: u16,
}

/// Maps times of day onto a vertical axis measured in pixels or rows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridGeometry {
    pub start_minutes: u16,
    pub hours: u16,
    pub hour_height: f32,
}

impl Default for GridGeometry {
    fn default() -> Self {
        Self {
            start_minutes: GRID_START_MINUTES,
            hours: GRID_HOURS,
            hour_height: 80.0,
        }
    }
}

impl GridGeometry {
    pub fn with_hour_height(hour_height: f32) -> Self {
        Self {
            hour_height,
            ..Self::default()
        }
    }

    pub fn end_minutes(&self) -> u16 {
        self.start_minutes + self.hours * 60
    }

    pub fn total_height(&self) -> f32 {
        self.hours as f32 * self.hour_height
    }

    pub fn offset_of(&self, minutes: u16) -> f32 {
        (minutes as f32 - self.start_minutes as f32) / 60.0 * self.hour_height
    }

    pub fn position(&self, start_minutes: u16, end_minutes: u16) -> Position {
        Position {
            top: self.offset_of(start_minutes),
            height: (end_minutes as f32 - start_minutes as f32) / 60.0 * self.hour_height,
            start_minutes,
        }
    }

    /// Inverse of [`offset_of`](Self::offset_of): minutes at a vertical offset,
    /// snapped to `step` and clamped to the grid.
    pub fn minutes_at(&self, y: f32, step: u16) -> u16 {
        let raw = self.start_minutes as f32 + y / self.hour_height * 60.0;
        let snapped = snap_minutes(raw.round() as i32, step);
        snapped.clamp(self.start_minutes as i32, self.end_minutes() as i32) as u16
    }

    /// Minutes represented by a vertical distance, without snapping.
    pub fn minutes_for_height(&self, dy: f32) -> f32 {
        dy / self.hour_height * 60.0
    }
}
