//! Tests for depth sampling and the depth-to-shift rule

#[cfg(test)]
mod tests {
    use stereogram::StereogramError;
    use stereogram::engine::buffer::PixelBuffer;
    use stereogram::engine::depth::{DepthMap, max_shift, normalize, shift_for};

    // Tests only the red channel becomes the depth sample
    // Verified by reading the green channel
    #[test]
    fn test_from_buffer_uses_red_channel() {
        let buffer = PixelBuffer::from_fn(3, 2, |x, y| [(x * 10 + y) as u8, 200, 100, 0]).unwrap();
        let depth = DepthMap::from_buffer(&buffer);

        assert_eq!(depth.dimensions(), (3, 2));
        assert_eq!(depth.sample(2, 1), Some(21));
        assert_eq!(depth.sample(0, 0), Some(0));
        assert_eq!(depth.sample(3, 0), None);
    }

    // Tests normalisation maps the byte range onto the unit interval
    // Verified by dividing by 256
    #[test]
    fn test_normalize_unit_interval() {
        let depth = DepthMap::uniform(2, 2, 255).unwrap();
        assert_eq!(depth.sample(1, 1).map(normalize), Some(1.0));
        assert!((normalize(0) - 0.0).abs() < f64::EPSILON);
        assert!((normalize(51) - 0.2).abs() < 1e-12);
    }

    // Tests zero-sized depth maps are rejected
    // Verified by removing the dimension check
    #[test]
    fn test_uniform_rejects_empty() {
        assert!(matches!(
            DepthMap::uniform(0, 3, 1),
            Err(StereogramError::InvalidDimension { .. })
        ));
    }

    // Tests the shift formula including its floor
    // Verified by rounding instead of flooring
    #[test]
    fn test_shift_formula() {
        // 1.0 * 170 * 0.25 = 42.5
        assert_eq!(shift_for(255, 170, 25), 42);
        assert_eq!(shift_for(0, 170, 25), 0);
        assert_eq!(shift_for(255, 100, 100), 100);
        assert_eq!(shift_for(128, 100, 50), 25);
        assert_eq!(shift_for(255, 170, 0), 0);
    }

    // Tests every sample's shift stays inside the bound
    // Verified by adding one to the shift
    #[test]
    fn test_shift_is_bounded() {
        for separation in [1, 7, 64, 170, 333] {
            for strength in [0, 1, 25, 50, 100] {
                let bound = separation * strength / 100;
                assert_eq!(max_shift(separation, strength), bound);
                for raw in 0..=u8::MAX {
                    assert!(shift_for(raw, separation, strength) <= bound);
                }
            }
        }
    }

    // Tests shift never decreases as depth increases
    // Verified by inverting the depth value
    #[test]
    fn test_shift_monotonic_in_depth() {
        let mut previous = 0;
        for raw in 0..=u8::MAX {
            let shift = shift_for(raw, 170, 25);
            assert!(shift >= previous);
            previous = shift;
        }
    }

    // Tests relief detection and row views
    // Verified by always reporting relief
    #[test]
    fn test_relief_and_rows() {
        let flat = DepthMap::uniform(4, 2, 0).unwrap();
        assert!(!flat.has_relief());

        let ramp = DepthMap::from_fn(4, 2, |x, _| x as u8).unwrap();
        assert!(ramp.has_relief());
        let row = ramp.row(1).unwrap();
        assert_eq!(row.to_vec(), vec![0, 1, 2, 3]);
        assert!(ramp.row(2).is_none());
    }
}
