use std::ops::Range;

use chroma_image::Rgb8;

use crate::color::{luma_chroma_from_rgb, LumaChroma};
use crate::error::FilterError;

/// How a filter treats kernel taps that fall outside the image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BorderTreatment {
    /// Only evaluate output pixels whose taps all lie inside the image.
    ///
    /// Every other pixel is copied from the input.
    #[default]
    CentralRegionOnly,

    /// Out of range taps contribute zero in every luma/chroma channel.
    ///
    /// Example: ...d c b a | 0 0 0 0...
    ZeroPadding,

    /// Out of range taps contribute the fixed triple `Y = 0, Cb = Cr = -128`.
    ConstantBorder,

    /// Out of range taps are reflected back into the image, excluding the edge pixel.
    ///
    /// Example: ...d c b a | b c d e...
    MirroredBorder,
}

impl BorderTreatment {
    /// Luma/chroma value substituted by [`BorderTreatment::ConstantBorder`].
    pub const CONSTANT_FILL: LumaChroma = LumaChroma::new(0, -128, -128);

    #[inline]
    fn reflect(i: isize, len: usize) -> usize {
        if len == 1 {
            return 0;
        }
        let len = len as isize;
        let mut i = i;
        while i < 0 || i >= len {
            if i < 0 {
                i = -i;
            } else {
                i = 2 * (len - 1) - i;
            }
        }
        i as usize
    }

    /// Maps index `i` to a valid index within `[0, len)`.
    ///
    /// In-range indices map to themselves. Out of range indices are reflected under
    /// [`BorderTreatment::MirroredBorder`] and have no source pixel otherwise.
    #[inline]
    pub fn map_index(&self, i: isize, len: usize) -> Option<usize> {
        if i >= 0 && (i as usize) < len {
            return Some(i as usize);
        }
        match self {
            BorderTreatment::MirroredBorder if len > 0 => Some(Self::reflect(i, len)),
            _ => None,
        }
    }

    /// The value an out of range tap contributes when there is no source pixel.
    pub fn fill_value(&self) -> LumaChroma {
        match self {
            BorderTreatment::ConstantBorder => Self::CONSTANT_FILL,
            _ => LumaChroma::ZERO,
        }
    }

    /// Sample `src` at column `x` and row `y` in the luma/chroma domain.
    ///
    /// The pixel is converted on every call; nothing is cached between taps.
    #[inline]
    pub fn sample(&self, src: &Rgb8, x: isize, y: isize) -> LumaChroma {
        match (
            self.map_index(x, src.width()),
            self.map_index(y, src.height()),
        ) {
            (Some(x), Some(y)) => luma_chroma_from_rgb(src.pixel(x, y)),
            _ => self.fill_value(),
        }
    }

    /// The output indices evaluated along an axis of length `len` for a window that
    /// reaches `before` pixels back and `after` pixels forward.
    ///
    /// The range is empty when the window does not fit.
    pub fn output_range(&self, len: usize, before: usize, after: usize) -> Range<usize> {
        match self {
            BorderTreatment::CentralRegionOnly => {
                let end = len.saturating_sub(after);
                before.min(end)..end
            }
            _ => 0..len,
        }
    }
}

impl TryFrom<u8> for BorderTreatment {
    type Error = FilterError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(BorderTreatment::CentralRegionOnly),
            1 => Ok(BorderTreatment::ZeroPadding),
            2 => Ok(BorderTreatment::ConstantBorder),
            3 => Ok(BorderTreatment::MirroredBorder),
            _ => Err(FilterError::InvalidBorderTreatment(code)),
        }
    }
}

impl std::fmt::Display for BorderTreatment {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let name = match self {
            BorderTreatment::CentralRegionOnly => "central region",
            BorderTreatment::ZeroPadding => "zero padding",
            BorderTreatment::ConstantBorder => "constant border",
            BorderTreatment::MirroredBorder => "mirrored border",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chroma_image::{Image, ImageError};

    fn make_src_3x2() -> Result<Rgb8, ImageError> {
        #[rustfmt::skip]
        let data = vec![
            10, 10, 10,  20, 20, 20,  30, 30, 30,
            40, 40, 40,  50, 50, 50,  60, 60, 60,
        ];
        Image::new([3, 2].into(), data)
    }

    #[test]
    fn test_map_index_in_range() {
        for border in [
            BorderTreatment::CentralRegionOnly,
            BorderTreatment::ZeroPadding,
            BorderTreatment::ConstantBorder,
            BorderTreatment::MirroredBorder,
        ] {
            assert_eq!(border.map_index(0, 4), Some(0));
            assert_eq!(border.map_index(3, 4), Some(3));
        }
    }

    #[test]
    fn test_map_index_mirrored() {
        let border = BorderTreatment::MirroredBorder;
        assert_eq!(border.map_index(-1, 4), Some(1));
        assert_eq!(border.map_index(-3, 4), Some(3));
        assert_eq!(border.map_index(4, 4), Some(2));
        assert_eq!(border.map_index(6, 4), Some(0));
        // reflects more than once for windows wider than the image
        assert_eq!(border.map_index(-5, 3), Some(1));
        assert_eq!(border.map_index(7, 3), Some(1));
        assert_eq!(border.map_index(-2, 1), Some(0));
        assert_eq!(border.map_index(-1, 0), None);
    }

    #[test]
    fn test_map_index_no_source() {
        assert_eq!(BorderTreatment::ZeroPadding.map_index(-1, 4), None);
        assert_eq!(BorderTreatment::ConstantBorder.map_index(4, 4), None);
        assert_eq!(BorderTreatment::CentralRegionOnly.map_index(-1, 4), None);
    }

    #[test]
    fn test_sample() -> Result<(), ImageError> {
        let src = make_src_3x2()?;

        assert_eq!(
            BorderTreatment::ZeroPadding.sample(&src, 1, 1),
            LumaChroma::new(50, 0, 0)
        );
        assert_eq!(
            BorderTreatment::ZeroPadding.sample(&src, -1, 0),
            LumaChroma::ZERO
        );
        assert_eq!(
            BorderTreatment::ConstantBorder.sample(&src, 3, 0),
            LumaChroma::new(0, -128, -128)
        );
        assert_eq!(
            BorderTreatment::MirroredBorder.sample(&src, -1, 2),
            LumaChroma::new(20, 0, 0)
        );
        assert_eq!(
            BorderTreatment::MirroredBorder.sample(&src, 3, -1),
            LumaChroma::new(50, 0, 0)
        );

        Ok(())
    }

    #[test]
    fn test_output_range() {
        let central = BorderTreatment::CentralRegionOnly;
        assert_eq!(central.output_range(10, 1, 1), 1..9);
        assert_eq!(central.output_range(10, 1, 0), 1..10);
        assert_eq!(central.output_range(2, 1, 1), 1..1);
        assert!(central.output_range(1, 7, 7).is_empty());
        assert_eq!(BorderTreatment::MirroredBorder.output_range(10, 1, 1), 0..10);
    }

    #[test]
    fn test_border_from_code() {
        assert_eq!(
            BorderTreatment::try_from(0),
            Ok(BorderTreatment::CentralRegionOnly)
        );
        assert_eq!(BorderTreatment::try_from(3), Ok(BorderTreatment::MirroredBorder));
        assert_eq!(
            BorderTreatment::try_from(4),
            Err(FilterError::InvalidBorderTreatment(4))
        );
    }
}
