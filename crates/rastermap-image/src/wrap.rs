/// Policy for reading pixels outside a source's data window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WrapMode {
    /// Out-of-window reads return zero.
    #[default]
    Black,
    /// Out-of-window reads return the nearest edge pixel.
    Clamp,
    /// The image tiles periodically.
    Periodic,
    /// The image tiles with mirror reflection.
    Mirror,
}

impl WrapMode {
    /// Parse a wrap mode by name; unknown names fall back to `Black`.
    pub fn from_name(name: &str) -> WrapMode {
        match name {
            "clamp" => WrapMode::Clamp,
            "periodic" => WrapMode::Periodic,
            "mirror" => WrapMode::Mirror,
            _ => WrapMode::Black,
        }
    }

    /// Resolve a coordinate into `[begin, end)` under this policy.
    ///
    /// Returns `None` for `Black` when the coordinate is outside the range
    /// (the read is zero), otherwise the in-range coordinate to read.
    #[inline]
    pub fn resolve(&self, x: i32, begin: i32, end: i32) -> Option<i32> {
        debug_assert!(end > begin);
        if x >= begin && x < end {
            return Some(x);
        }
        let span = end - begin;
        match self {
            WrapMode::Black => None,
            WrapMode::Clamp => Some(x.clamp(begin, end - 1)),
            WrapMode::Periodic => Some(begin + (x - begin).rem_euclid(span)),
            WrapMode::Mirror => {
                let mut p = (x - begin).rem_euclid(2 * span);
                if p >= span {
                    p = 2 * span - 1 - p;
                }
                Some(begin + p)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inside_is_identity() {
        for mode in [
            WrapMode::Black,
            WrapMode::Clamp,
            WrapMode::Periodic,
            WrapMode::Mirror,
        ] {
            assert_eq!(mode.resolve(3, 0, 8), Some(3));
        }
    }

    #[test]
    fn black_outside() {
        assert_eq!(WrapMode::Black.resolve(-1, 0, 8), None);
        assert_eq!(WrapMode::Black.resolve(8, 0, 8), None);
    }

    #[test]
    fn clamp_outside() {
        assert_eq!(WrapMode::Clamp.resolve(-5, 0, 8), Some(0));
        assert_eq!(WrapMode::Clamp.resolve(11, 0, 8), Some(7));
    }

    #[test]
    fn periodic_tiles() {
        assert_eq!(WrapMode::Periodic.resolve(8, 0, 8), Some(0));
        assert_eq!(WrapMode::Periodic.resolve(-1, 0, 8), Some(7));
        assert_eq!(WrapMode::Periodic.resolve(17, 0, 8), Some(1));
    }

    #[test]
    fn mirror_reflects() {
        assert_eq!(WrapMode::Mirror.resolve(-1, 0, 8), Some(0));
        assert_eq!(WrapMode::Mirror.resolve(8, 0, 8), Some(7));
        assert_eq!(WrapMode::Mirror.resolve(9, 0, 8), Some(6));
        // offset windows reflect relative to their own origin
        assert_eq!(WrapMode::Mirror.resolve(1, 2, 6), Some(2));
    }

    #[test]
    fn from_name_falls_back_to_black() {
        assert_eq!(WrapMode::from_name("mirror"), WrapMode::Mirror);
        assert_eq!(WrapMode::from_name("nonsense"), WrapMode::Black);
    }
}
