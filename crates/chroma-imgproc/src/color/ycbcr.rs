/// Valid range of the luma component.
pub const LUMA_RANGE: (i32, i32) = (0, 255);

/// Valid range of the chroma components.
pub const CHROMA_RANGE: (i32, i32) = (-128, 127);

/// A pixel in the luma/chroma domain.
///
/// * Y: luma in the range [0, 255].
/// * Cb: blue-difference chroma in the range [-128, 127].
/// * Cr: red-difference chroma in the range [-128, 127].
///
/// Values are only guaranteed to be in range after [`LumaChroma::saturate`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LumaChroma {
    /// Luma.
    pub y: i32,
    /// Blue-difference chroma.
    pub cb: i32,
    /// Red-difference chroma.
    pub cr: i32,
}

impl LumaChroma {
    /// All three components set to zero.
    pub const ZERO: Self = Self::new(0, 0, 0);

    /// Create a triple from its components, without saturation.
    pub const fn new(y: i32, cb: i32, cr: i32) -> Self {
        Self { y, cb, cr }
    }

    /// Clamp Y to [`LUMA_RANGE`] and Cb/Cr to [`CHROMA_RANGE`].
    pub fn saturate(self) -> Self {
        Self {
            y: self.y.clamp(LUMA_RANGE.0, LUMA_RANGE.1),
            cb: self.cb.clamp(CHROMA_RANGE.0, CHROMA_RANGE.1),
            cr: self.cr.clamp(CHROMA_RANGE.0, CHROMA_RANGE.1),
        }
    }

    /// The components as `[y, cb, cr]`.
    pub fn to_array(self) -> [i32; 3] {
        [self.y, self.cb, self.cr]
    }
}

impl From<[u8; 3]> for LumaChroma {
    fn from(rgb: [u8; 3]) -> Self {
        luma_chroma_from_rgb(rgb)
    }
}

impl From<LumaChroma> for [u8; 3] {
    fn from(lc: LumaChroma) -> Self {
        rgb_from_luma_chroma(lc)
    }
}

/// Convert an RGB pixel to a saturated luma/chroma triple.
///
/// Each component is rounded to the nearest integer, halves away from zero.
///
/// # Example
///
/// ```
/// use chroma_imgproc::color::{luma_chroma_from_rgb, LumaChroma};
///
/// assert_eq!(luma_chroma_from_rgb([255, 255, 255]), LumaChroma::new(255, 0, 0));
/// assert_eq!(luma_chroma_from_rgb([255, 255, 0]), LumaChroma::new(226, -128, 21));
/// ```
pub fn luma_chroma_from_rgb(rgb: [u8; 3]) -> LumaChroma {
    let r = rgb[0] as f64;
    let g = rgb[1] as f64;
    let b = rgb[2] as f64;

    let y = 0.299 * r + 0.587 * g + 0.114 * b;
    let cb = -0.169 * r - 0.331 * g + 0.5 * b;
    let cr = 0.5 * r - 0.419 * g - 0.08 * b;

    LumaChroma::new(y.round() as i32, cb.round() as i32, cr.round() as i32).saturate()
}

/// Convert a luma/chroma triple back to RGB.
///
/// Fixed-point reconstruction with integer division truncating toward zero; every channel
/// is saturated to [0, 255]. The input is used as given, so callers saturate it first.
///
/// # Example
///
/// ```
/// use chroma_imgproc::color::{rgb_from_luma_chroma, LumaChroma};
///
/// assert_eq!(rgb_from_luma_chroma(LumaChroma::new(255, -128, 127)), [255, 208, 29]);
/// ```
pub fn rgb_from_luma_chroma(lc: LumaChroma) -> [u8; 3] {
    let LumaChroma { y, cb, cr } = lc;

    let r = y + 45 * cr / 32;
    let g = y - (11 * cb + 23 * cr) / 32;
    let b = y + 113 * cb / 64;

    [r, g, b].map(|c| c.clamp(0, 255) as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_luma_chroma_from_rgb() {
        assert_eq!(luma_chroma_from_rgb([0, 0, 0]), LumaChroma::ZERO);
        assert_eq!(luma_chroma_from_rgb([30, 30, 30]), LumaChroma::new(30, 0, 0));
        assert_eq!(
            luma_chroma_from_rgb([100, 150, 200]),
            LumaChroma::new(141, 33, -29)
        );
        assert_eq!(
            luma_chroma_from_rgb([200, 100, 50]),
            LumaChroma::new(124, -42, 54)
        );
    }

    #[test]
    fn test_luma_chroma_saturates_chroma() {
        // Cr of pure red is 127.5 before saturation
        assert_eq!(
            luma_chroma_from_rgb([255, 0, 0]),
            LumaChroma::new(76, -43, 127)
        );
        // Cb of yellow rounds to -128 and stays inside the range
        assert_eq!(
            luma_chroma_from_rgb([255, 255, 0]),
            LumaChroma::new(226, -128, 21)
        );
    }

    #[test]
    fn test_rgb_from_luma_chroma() {
        assert_eq!(rgb_from_luma_chroma(LumaChroma::new(141, 33, -29)), [101, 150, 199]);
        assert_eq!(rgb_from_luma_chroma(LumaChroma::new(76, -43, 127)), [254, 0, 1]);
        assert_eq!(rgb_from_luma_chroma(LumaChroma::new(255, 0, 0)), [255, 255, 255]);
    }

    #[test]
    fn test_rgb_from_luma_chroma_saturates() {
        assert_eq!(rgb_from_luma_chroma(LumaChroma::new(255, -128, 127)), [255, 208, 29]);
        assert_eq!(rgb_from_luma_chroma(LumaChroma::new(0, 127, 127)), [178, 0, 224]);
        assert_eq!(rgb_from_luma_chroma(LumaChroma::new(-1, 0, 0)), [0, 0, 0]);
    }

    #[test]
    fn test_round_trip_is_lossy_within_one() {
        for rgb in [[10, 20, 30], [100, 150, 200], [200, 100, 50], [64, 128, 192], [12, 200, 90]] {
            let back: [u8; 3] = LumaChroma::from(rgb).into();
            for (a, b) in rgb.iter().zip(back.iter()) {
                assert!((*a as i32 - *b as i32).abs() <= 1, "{rgb:?} -> {back:?}");
            }
        }
    }

    #[test]
    fn test_saturate() {
        assert_eq!(
            LumaChroma::new(300, -500, 500).saturate(),
            LumaChroma::new(255, -128, 127)
        );
        assert_eq!(LumaChroma::new(-3, 0, 0).saturate().to_array(), [0, 0, 0]);
    }
}
