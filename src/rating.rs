//! Radial urge-rating input
//!
//! The dial maps a pointer position around its centre to an integer 1-10.
//! Angles are measured clockwise from the top, in degrees.

/// Rating shown when a craving session starts
pub const DEFAULT_RATING: u8 = 5;
pub const MIN_RATING: u8 = 1;
pub const MAX_RATING: u8 = 10;

/// Angle in `[0, 360)` of a point relative to the dial centre
///
/// `dy` grows downwards, as in screen coordinates.
pub fn pointer_to_angle(dx: f64, dy: f64) -> f64 {
    let mut angle = dy.atan2(dx).to_degrees() + 90.0;
    if angle < 0.0 {
        angle += 360.0;
    }
    angle
}

/// Rating for an angle in degrees
///
/// Values that round past either end wrap to the other, so the seam just
/// before 360° reads as 1.
pub fn angle_to_rating(angle: f64) -> u8 {
    let value = (angle / 360.0 * 10.0).round() as i64 + 1;
    if value > MAX_RATING as i64 {
        MIN_RATING
    } else if value < MIN_RATING as i64 {
        MAX_RATING
    } else {
        value as u8
    }
}

/// Angle at which a rating is drawn
pub fn rating_to_angle(rating: u8) -> f64 {
    f64::from(rating.clamp(MIN_RATING, MAX_RATING) - 1) * 36.0
}

/// Dial state with pointer capture
///
/// While captured, every move updates the value even when the pointer is
/// outside the control. The value is always defined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RatingDial {
    value: u8,
    captured: bool,
}

impl Default for RatingDial {
    fn default() -> Self {
        Self {
            value: DEFAULT_RATING,
            captured: false,
        }
    }
}

impl RatingDial {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(&self) -> u8 {
        self.value
    }

    pub fn is_captured(&self) -> bool {
        self.captured
    }

    /// Begin capture and take the value under the pointer
    pub fn pointer_down(&mut self, dx: f64, dy: f64) {
        self.captured = true;
        self.update_from(dx, dy);
    }

    pub fn pointer_move(&mut self, dx: f64, dy: f64) {
        if self.captured {
            self.update_from(dx, dy);
        }
    }

    pub fn pointer_up(&mut self) {
        self.captured = false;
    }

    pub fn pointer_leave(&mut self) {
        self.captured = false;
    }

    /// Set the value directly, clamped to 1-10
    pub fn set(&mut self, value: u8) {
        self.value = value.clamp(MIN_RATING, MAX_RATING);
    }

    /// Nudge the value by `delta`, clamped to 1-10
    pub fn step(&mut self, delta: i8) {
        let next = (self.value as i16 + delta as i16).clamp(MIN_RATING as i16, MAX_RATING as i16);
        self.value = next as u8;
    }

    fn update_from(&mut self, dx: f64, dy: f64) {
        self.value = angle_to_rating(pointer_to_angle(dx, dy));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_angle_from_cardinal_points() {
        assert_eq!(pointer_to_angle(0.0, -1.0), 0.0);
        assert_eq!(pointer_to_angle(1.0, 0.0), 90.0);
        assert_eq!(pointer_to_angle(0.0, 1.0), 180.0);
        assert_eq!(pointer_to_angle(-1.0, 0.0), 270.0);
    }

    #[test]
    fn test_angle_to_rating_known_values() {
        assert_eq!(angle_to_rating(0.0), 1);
        assert_eq!(angle_to_rating(36.0), 2);
        assert_eq!(angle_to_rating(180.0), 6);
        assert_eq!(angle_to_rating(324.0), 10);
        assert_eq!(angle_to_rating(359.0), 1);
    }

    #[test]
    fn test_angle_to_rating_range_and_single_seam() {
        let mut previous = angle_to_rating(0.0);
        let mut seams = 0;
        let mut angle = 0.0;
        while angle < 360.0 {
            let rating = angle_to_rating(angle);
            assert!((MIN_RATING..=MAX_RATING).contains(&rating));
            if rating < previous {
                seams += 1;
            }
            previous = rating;
            angle += 0.25;
        }
        assert_eq!(seams, 1);
    }

    #[test]
    fn test_rating_to_angle_round_trips() {
        for rating in MIN_RATING..=MAX_RATING {
            assert_eq!(angle_to_rating(rating_to_angle(rating)), rating);
        }
    }

    #[test]
    fn test_dial_defaults_to_five() {
        let dial = RatingDial::new();
        assert_eq!(dial.value(), 5);
        assert!(!dial.is_captured());
    }

    #[test]
    fn test_move_without_capture_is_ignored() {
        let mut dial = RatingDial::new();
        dial.pointer_move(0.0, -10.0);
        assert_eq!(dial.value(), 5);
    }

    #[test]
    fn test_capture_follows_pointer_outside_control() {
        let mut dial = RatingDial::new();
        dial.pointer_down(0.0, -1.0);
        assert_eq!(dial.value(), 1);

        // Far outside the dial, straight down
        dial.pointer_move(0.0, 500.0);
        assert_eq!(dial.value(), 6);

        dial.pointer_up();
        dial.pointer_move(-1.0, 0.0);
        assert_eq!(dial.value(), 6);
    }

    #[test]
    fn test_leave_ends_capture() {
        let mut dial = RatingDial::new();
        dial.pointer_down(1.0, 0.0);
        dial.pointer_leave();
        assert!(!dial.is_captured());
    }

    #[test]
    fn test_step_clamps() {
        let mut dial = RatingDial::new();
        dial.step(20);
        assert_eq!(dial.value(), 10);
        dial.step(-100);
        assert_eq!(dial.value(), 1);
        dial.set(0);
        assert_eq!(dial.value(), 1);
    }
}
