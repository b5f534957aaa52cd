use crate::types::{HandInfo, Point, SignGesture};

/// Maps (hand geometry, smoothed finger count, fingertips) to a sign
/// reading. Pure: identical inputs always yield the identical gesture.
pub fn classify(hand: &HandInfo, finger_count: u8, fingertips: &[Point]) -> SignGesture {
    let aspect = hand.width / hand.height;
    let size = (hand.width * hand.width + hand.height * hand.height).sqrt();

    // Normalized x-spread between the outermost fingertips.
    let spread = match (fingertips.first(), fingertips.last()) {
        (Some(first), Some(last)) if fingertips.len() >= 2 => (last.x - first.x) / hand.width,
        _ => 0.0,
    };

    match finger_count {
        0 => {
            if size < 110.0 {
                SignGesture::FistA
            } else {
                SignGesture::ClosedS
            }
        }
        1 => {
            // A single tip well off-center is usually the thumb.
            let offset = hand.width * 0.15;
            match fingertips.first() {
                Some(tip) if tip.x < hand.center_x - offset || tip.x > hand.center_x + offset => {
                    SignGesture::OneFingerThumb
                }
                _ => SignGesture::OneFinger,
            }
        }
        2 => {
            if spread > 0.45 && hand.height > hand.width * 0.9 {
                SignGesture::PeaceV
            } else {
                SignGesture::TwoU
            }
        }
        3 => SignGesture::ThreeW,
        4 => SignGesture::Four,
        n if n >= 5 => {
            if spread > 0.7 && aspect > 1.1 {
                SignGesture::FlatB
            } else {
                SignGesture::OpenFive
            }
        }
        _ => SignGesture::Unknown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hand(width: f32, height: f32) -> HandInfo {
        HandInfo {
            min_x: 0.0,
            min_y: 0.0,
            max_x: width,
            max_y: height,
            center_x: width / 2.0,
            center_y: height / 2.0,
            width,
            height,
            pixel_count: 1000,
        }
    }

    fn tips(coords: &[(f32, f32)]) -> Vec<Point> {
        coords.iter().map(|&(x, y)| Point::new(x, y)).collect()
    }

    #[test]
    fn zero_fingers_split_on_size() {
        // 60x60 -> diagonal ~84.9
        assert_eq!(classify(&hand(60.0, 60.0), 0, &[]), SignGesture::FistA);
        // 100x100 -> diagonal ~141.4
        assert_eq!(classify(&hand(100.0, 100.0), 0, &[]), SignGesture::ClosedS);
    }

    #[test]
    fn one_finger_off_center_reads_as_thumb() {
        let h = hand(100.0, 120.0);
        let centered = tips(&[(50.0, 10.0)]);
        let offset = tips(&[(70.0, 10.0)]);
        assert_eq!(classify(&h, 1, &centered), SignGesture::OneFinger);
        assert_eq!(classify(&h, 1, &offset), SignGesture::OneFingerThumb);
        assert_eq!(classify(&h, 1, &centered).letter(), "D");
        assert_eq!(classify(&h, 1, &offset).letter(), "D");
    }

    #[test]
    fn two_fingers_split_on_spread_and_aspect() {
        let tall = hand(100.0, 120.0);
        let spread_tips = tips(&[(20.0, 10.0), (70.0, 12.0)]);
        let narrow_tips = tips(&[(40.0, 10.0), (60.0, 12.0)]);
        assert_eq!(classify(&tall, 2, &spread_tips), SignGesture::PeaceV);
        assert_eq!(classify(&tall, 2, &narrow_tips), SignGesture::TwoU);

        // Wide hands never read as V regardless of spread.
        let wide = hand(150.0, 100.0);
        assert_eq!(classify(&wide, 2, &spread_tips), SignGesture::TwoU);
    }

    #[test]
    fn middle_counts_map_directly() {
        let h = hand(100.0, 120.0);
        assert_eq!(classify(&h, 3, &[]), SignGesture::ThreeW);
        assert_eq!(classify(&h, 4, &[]), SignGesture::Four);
    }

    #[test]
    fn five_fingers_split_on_spread_and_aspect() {
        let wide = hand(150.0, 70.0);
        let spread_tips = tips(&[(10.0, 10.0), (40.0, 8.0), (140.0, 10.0)]);
        assert_eq!(classify(&wide, 5, &spread_tips), SignGesture::FlatB);

        let tall = hand(100.0, 120.0);
        assert_eq!(classify(&tall, 5, &spread_tips), SignGesture::OpenFive);
        assert_eq!(classify(&wide, 5, &[]), SignGesture::OpenFive);
    }

    #[test]
    fn classification_is_pure() {
        let h = hand(120.0, 110.0);
        let t = tips(&[(20.0, 15.0), (60.0, 10.0), (100.0, 14.0)]);
        assert_eq!(classify(&h, 3, &t), classify(&h, 3, &t));
    }
}
