//! Box format conversion

/// `[[x0, y0], [x1, y1]]` in pixels, the corner format SAM prompts take
pub type CornerBox = [[i32; 2]; 2];

/// `[cx, cy, w, h]` to `[x0, y0, x1, y1]`
pub fn cxcywh_to_xyxy([cx, cy, w, h]: [f32; 4]) -> [f32; 4] {
    [cx - 0.5 * w, cy - 0.5 * h, cx + 0.5 * w, cy + 0.5 * h]
}

/// Scale normalized center-size boxes to a `width` x `height` image and
/// convert them to integer corners, truncating toward zero.
pub fn transfer_boxes_format<'a, I>(boxes: I, width: u32, height: u32) -> Vec<CornerBox>
where
    I: IntoIterator<Item = &'a [f32; 4]>,
{
    let (w, h) = (width as f32, height as f32);
    boxes
        .into_iter()
        .map(|&[cx, cy, bw, bh]| {
            let [x0, y0, x1, y1] = cxcywh_to_xyxy([cx * w, cy * h, bw * w, bh * h]);
            [[x0 as i32, y0 as i32], [x1 as i32, y1 as i32]]
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cxcywh_to_xyxy() {
        assert_eq!(cxcywh_to_xyxy([5.0, 5.0, 4.0, 2.0]), [3.0, 4.0, 7.0, 6.0]);
    }

    #[test]
    fn test_transfer_boxes_format() {
        let boxes = [[0.5, 0.5, 0.5, 0.5], [0.1, 0.2, 0.1, 0.1]];
        let out = transfer_boxes_format(&boxes, 200, 100);
        assert_eq!(out, vec![[[50, 25], [150, 75]], [[10, 15], [30, 25]]]);
    }

    #[test]
    fn test_truncates_toward_zero() {
        // x0 = -3.3 -> -3, x1 = 13.3 -> 13
        let out = transfer_boxes_format(&[[0.05, 0.5, 0.166, 1.0]], 100, 10);
        assert_eq!(out[0][0][0], -3);
        assert_eq!(out[0][1][0], 13);
        assert_eq!(out[0][0][1], 0);
        assert_eq!(out[0][1][1], 10);
    }
}
