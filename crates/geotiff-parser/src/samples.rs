//! Conversion of decoded TIFF samples to 8-bit bands.

/// A numeric TIFF sample.
pub(crate) trait Sample: Copy {
    /// Samples already in 0..=255 and used unchanged.
    const IS_BYTE: bool = false;

    fn to_f64(self) -> f64;
}

impl Sample for u8 {
    const IS_BYTE: bool = true;

    fn to_f64(self) -> f64 {
        self as f64
    }
}

macro_rules! impl_sample {
    ($($t:ty),*) => {
        $(impl Sample for $t {
            fn to_f64(self) -> f64 {
                self as f64
            }
        })*
    };
}

impl_sample!(u16, u32, u64, i8, i16, i32, i64, f32, f64);

/// Split interleaved samples into one 8-bit plane per selected channel.
///
/// Non-byte data is stretched linearly from the global min..max across the
/// selected channels to 0..=255. NaN maps to 0, as does a constant raster.
pub(crate) fn extract_planes<T: Sample>(
    data: &[T],
    samples_per_pixel: usize,
    channels: &[usize],
) -> Vec<Vec<u8>> {
    let pixels = data.len() / samples_per_pixel;

    if T::IS_BYTE {
        return channels
            .iter()
            .map(|&c| {
                (0..pixels)
                    .map(|p| data[p * samples_per_pixel + c].to_f64() as u8)
                    .collect()
            })
            .collect();
    }

    let (min, max) = channels
        .iter()
        .flat_map(|&c| (0..pixels).map(move |p| data[p * samples_per_pixel + c].to_f64()))
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
    let scale = if max > min { 255.0 / (max - min) } else { 0.0 };

    channels
        .iter()
        .map(|&c| {
            (0..pixels)
                .map(|p| {
                    let v = data[p * samples_per_pixel + c].to_f64();
                    if v.is_finite() {
                        ((v - min) * scale).round().clamp(0.0, 255.0) as u8
                    } else {
                        0
                    }
                })
                .collect()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bytes_deinterleave() {
        let data: Vec<u8> = vec![1, 2, 3, 4, 5, 6];
        let planes = extract_planes(&data, 3, &[0, 1, 2]);
        assert_eq!(planes, vec![vec![1, 4], vec![2, 5], vec![3, 6]]);
    }

    #[test]
    fn test_alpha_channel_ignored() {
        let data: Vec<u8> = vec![10, 20, 30, 255, 40, 50, 60, 0];
        let planes = extract_planes(&data, 4, &[0, 1, 2]);
        assert_eq!(planes[2], vec![30, 60]);
    }

    #[test]
    fn test_u16_stretch() {
        let data: Vec<u16> = vec![1000, 1500, 2000];
        let planes = extract_planes(&data, 1, &[0]);
        assert_eq!(planes, vec![vec![0, 128, 255]]);
    }

    #[test]
    fn test_float_nan_maps_to_zero() {
        let data: Vec<f32> = vec![f32::NAN, -10.0, 10.0];
        let planes = extract_planes(&data, 1, &[0]);
        assert_eq!(planes, vec![vec![0, 0, 255]]);
    }

    #[test]
    fn test_constant_raster() {
        let data: Vec<i16> = vec![7, 7, 7];
        let planes = extract_planes(&data, 1, &[0]);
        assert_eq!(planes, vec![vec![0, 0, 0]]);
    }
}
