//! Cable-length kinematics for the two-pulley carriage.
//!
//! The carriage hangs from two pulleys `cable_separation` meters apart, with the
//! bottom row of the mural `dist_from_pulley` meters below them. The image is
//! centred between the pulleys and shifted left by `offset`.

/// Largest nozzle count a stripe row can describe with single-character symbols.
pub const MAX_NOZZLES: u32 = 9;

/// Immutable per-run geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeometryConfig {
    /// Edge length of one image pixel on the wall, in meters.
    pub pixel_size: f64,
    /// Horizontal distance between the two pulleys, in meters.
    pub cable_separation: f64,
    /// Vertical distance from the pulleys down to the bottom of the mural, in meters.
    pub dist_from_pulley: f64,
    /// Shift of the image from the centre towards the left, in meters.
    pub offset: f64,
    /// Image width in pixels.
    pub width: u32,
    /// Number of paint channels sampled per stripe row.
    pub num_nozzles: u32,
}

/// Two cable lengths describing one carriage position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CableLengths {
    pub a: f64,
    pub b: f64,
}

/// Errors for geometrically meaningless run configurations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GeometryError {
    #[error("{name} must be a positive length in meters, got {value}")]
    NonPositiveLength { name: &'static str, value: f64 },

    #[error("offset must be a finite number of meters, got {0}")]
    NonFiniteOffset(f64),

    #[error("image width must be at least one pixel")]
    ZeroWidth,

    #[error("nozzle count must be between 1 and 9, got {0}")]
    NozzleCount(u32),

    #[error(
        "drawable span {left:.4}..{right:.4} m does not fit between the pulleys (0..{cable_separation} m)"
    )]
    OutsidePulleySpan {
        left: f64,
        right: f64,
        cable_separation: f64,
    },
}

impl GeometryConfig {
    /// Check every invariant the kinematics relies on.
    pub fn validate(&self) -> Result<(), GeometryError> {
        for (name, value) in [
            ("pixel_size", self.pixel_size),
            ("cable_separation", self.cable_separation),
            ("dist_from_pulley", self.dist_from_pulley),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(GeometryError::NonPositiveLength { name, value });
            }
        }
        if !self.offset.is_finite() {
            return Err(GeometryError::NonFiniteOffset(self.offset));
        }
        if self.width == 0 {
            return Err(GeometryError::ZeroWidth);
        }
        if self.num_nozzles == 0 || self.num_nozzles > MAX_NOZZLES {
            return Err(GeometryError::NozzleCount(self.num_nozzles));
        }

        let left = self.horizontal(0.0);
        let right = self.horizontal(self.width as f64);
        if left < 0.0 || right > self.cable_separation {
            return Err(GeometryError::OutsidePulleySpan {
                left,
                right,
                cable_separation: self.cable_separation,
            });
        }
        Ok(())
    }

    /// Horizontal distance of pixel column `x` from the left pulley.
    pub fn horizontal(&self, x: f64) -> f64 {
        self.cable_separation / 2.0 - (self.width as f64 * self.pixel_size) / 2.0
            + x * self.pixel_size
            - self.offset
    }

    /// Vertical drop from the pulleys to pixel row `y` (counted from the bottom).
    pub fn vertical(&self, y: f64) -> f64 {
        self.dist_from_pulley - y * self.pixel_size
    }

    /// Number of full stripes in the image. Remainder columns are dropped.
    pub fn column_count(&self) -> u32 {
        self.width / self.num_nozzles
    }

    /// Leftmost pixel column of stripe `column_index`.
    pub fn column_start(&self, column_index: u32) -> u32 {
        column_index * self.num_nozzles
    }

    /// Pixel x at which the carriage starts painting stripe `column_index`.
    ///
    /// May be negative for the first stripe.
    pub fn stripe_anchor_x(&self, column_index: u32) -> i64 {
        i64::from(column_index) * i64::from(self.num_nozzles) - i64::from(self.num_nozzles / 2)
    }

    /// Vertical travel of one full stripe over an image `height` pixels tall.
    pub fn drop(&self, height: u32) -> f64 {
        self.pixel_size * height as f64
    }
}

/// Length of the cable running to the left pulley.
pub fn length_a(x: i64, y: i64, cfg: &GeometryConfig) -> f64 {
    let h = cfg.horizontal(x as f64);
    let v = cfg.vertical(y as f64);
    (v * v + h * h).sqrt()
}

/// Length of the cable running to the right pulley.
pub fn length_b(x: i64, y: i64, cfg: &GeometryConfig) -> f64 {
    let h = cfg.cable_separation - cfg.horizontal(x as f64);
    let v = cfg.vertical(y as f64);
    (v * v + h * h).sqrt()
}

/// Both cable lengths for pixel `(x, y)`.
pub fn cable_lengths(x: i64, y: i64, cfg: &GeometryConfig) -> CableLengths {
    CableLengths {
        a: length_a(x, y, cfg),
        b: length_b(x, y, cfg),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rig() -> GeometryConfig {
        GeometryConfig {
            pixel_size: 0.002,
            cable_separation: 1.265,
            dist_from_pulley: 1.0,
            offset: 0.0,
            width: 300,
            num_nozzles: 4,
        }
    }

    fn round6(v: f64) -> f64 {
        (v * 1e6).round() / 1e6
    }

    #[test]
    fn test_centre_of_span_lengths_match() {
        let cfg = rig();
        let a = length_a(150, 0, &cfg);
        let b = length_b(150, 0, &cfg);
        assert_eq!(round6(a), round6(b));
        assert_eq!(round6(a), 1.18324);
    }

    #[test]
    fn test_lengths_mirror_about_centre() {
        let cfg = rig();
        for x in [0_i64, 17, 75, 149, 220, 300] {
            for y in [0_i64, 40, 250] {
                let a = length_a(x, y, &cfg);
                let b = length_b(300 - x, y, &cfg);
                assert!((a - b).abs() < 1e-12, "x={} y={}: {} vs {}", x, y, a, b);
            }
        }
    }

    #[test]
    fn test_left_cable_shorter_on_left_side() {
        let cfg = rig();
        let lengths = cable_lengths(10, 100, &cfg);
        assert!(lengths.a < lengths.b);
    }

    #[test]
    fn test_lengths_never_negative() {
        let cfg = rig();
        for x in [-2_i64, 0, 300, 310] {
            let l = cable_lengths(x, 600, &cfg);
            assert!(l.a >= 0.0 && l.b >= 0.0);
        }
    }

    #[test]
    fn test_validate_accepts_default_rig() {
        assert_eq!(rig().validate(), Ok(()));
    }

    #[test]
    fn test_validate_rejects_non_positive_lengths() {
        let mut cfg = rig();
        cfg.pixel_size = 0.0;
        assert!(matches!(
            cfg.validate(),
            Err(GeometryError::NonPositiveLength { name: "pixel_size", .. })
        ));

        let mut cfg = rig();
        cfg.dist_from_pulley = -1.0;
        assert!(matches!(
            cfg.validate(),
            Err(GeometryError::NonPositiveLength { name: "dist_from_pulley", .. })
        ));
    }

    #[test]
    fn test_validate_rejects_nozzle_count() {
        let mut cfg = rig();
        cfg.num_nozzles = 0;
        assert_eq!(cfg.validate(), Err(GeometryError::NozzleCount(0)));
        cfg.num_nozzles = 10;
        assert_eq!(cfg.validate(), Err(GeometryError::NozzleCount(10)));
    }

    #[test]
    fn test_validate_rejects_offset_past_pulley() {
        let mut cfg = rig();
        cfg.offset = 0.5;
        assert!(matches!(
            cfg.validate(),
            Err(GeometryError::OutsidePulleySpan { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_image_wider_than_span() {
        let mut cfg = rig();
        cfg.width = 700;
        assert!(matches!(
            cfg.validate(),
            Err(GeometryError::OutsidePulleySpan { .. })
        ));
    }

    #[test]
    fn test_column_count_drops_remainder() {
        let mut cfg = rig();
        cfg.width = 10;
        assert_eq!(cfg.column_count(), 2);
        cfg.num_nozzles = 3;
        assert_eq!(cfg.column_count(), 3);
    }

    #[test]
    fn test_stripe_anchor_x() {
        let cfg = rig();
        assert_eq!(cfg.stripe_anchor_x(0), -2);
        assert_eq!(cfg.stripe_anchor_x(1), 2);
        assert_eq!(cfg.stripe_anchor_x(5), 18);
    }

    #[test]
    fn test_drop_scales_with_height() {
        let cfg = rig();
        assert!((cfg.drop(500) - 1.0).abs() < 1e-12);
    }
}
