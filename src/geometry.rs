use serde::{Deserialize, Serialize};

/// Container size measured in layout pixels.
///
/// Missing or nonsensical measurements (negative, NaN, infinite) collapse to
/// zero, which the layout selector treats as "not measured yet".
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width: sanitize(width),
            height: sanitize(height),
        }
    }

    pub const fn zero() -> Self {
        Self {
            width: 0.0,
            height: 0.0,
        }
    }

    /// True once both dimensions are known and positive.
    pub fn is_measured(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }

    /// Width over height, or `None` for an unmeasured container.
    pub fn aspect_ratio(&self) -> Option<f32> {
        self.is_measured().then(|| self.width / self.height)
    }
}

fn sanitize(value: f32) -> f32 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_measurements_become_zero() {
        let size = Size::new(f32::NAN, -20.0);
        assert_eq!(size, Size::zero());
        assert!(!size.is_measured());
        assert_eq!(size.aspect_ratio(), None);
    }

    #[test]
    fn aspect_ratio_of_measured_container() {
        let size = Size::new(1600.0, 900.0);
        assert!(size.is_measured());
        let ratio = size.aspect_ratio().unwrap();
        assert!((ratio - 16.0 / 9.0).abs() < 1e-6);
    }

    #[test]
    fn single_zero_dimension_is_unmeasured() {
        assert!(!Size::new(800.0, 0.0).is_measured());
    }
}
