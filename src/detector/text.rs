//! Caption handling for text-prompted detection

use ndarray::{s, Array2, Array3, ArrayView1};

/// `[CLS]`, `[SEP]`, `.` and `?` in the BERT uncased vocabulary
pub const SPECIAL_TOKENS: [u32; 4] = [101, 102, 1012, 1029];

/// Longest token sequence the text encoder accepts
pub const MAX_TEXT_LEN: usize = 256;

/// Lowercase, trim and terminate the caption with `.`
pub fn preprocess_caption(caption: &str) -> String {
    let caption = caption.trim().to_lowercase();
    if caption.ends_with('.') {
        caption
    } else {
        caption + "."
    }
}

/// Per-phrase text attention masks and position ids.
///
/// Tokens attend only within their own phrase, phrases being delimited
/// by special tokens; position ids restart at each phrase. Special tokens
/// at either end attend to themselves only.
pub fn phrase_masks(input_ids: &[u32]) -> (Array3<bool>, Array2<i64>) {
    let n = input_ids.len();
    let mut mask = Array3::from_elem((1, n, n), false);
    let mut position_ids = Array2::<i64>::zeros((1, n));
    for i in 0..n {
        mask[[0, i, i]] = true;
    }

    let mut previous = 0usize;
    for (col, id) in input_ids.iter().enumerate() {
        if !SPECIAL_TOKENS.contains(id) {
            continue;
        }
        if col == 0 || col == n - 1 {
            mask[[0, col, col]] = true;
            position_ids[[0, col]] = 0;
        } else {
            mask.slice_mut(s![0, previous + 1..=col, previous + 1..=col])
                .fill(true);
            for (offset, pos) in (previous + 1..=col).enumerate() {
                position_ids[[0, pos]] = offset as i64;
            }
        }
        previous = col;
    }

    (mask, position_ids)
}

/// Token ids whose score in `scores` exceeds `threshold`, skipping the
/// leading `[CLS]` position.
pub fn phrase_token_ids(scores: ArrayView1<f32>, threshold: f32, input_ids: &[u32]) -> Vec<u32> {
    scores
        .iter()
        .enumerate()
        .skip(1)
        .take(MAX_TEXT_LEN - 2)
        .filter(|(_, &score)| score > threshold)
        .filter_map(|(i, _)| input_ids.get(i).copied())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::arr1;

    #[test]
    fn test_preprocess_caption() {
        assert_eq!(preprocess_caption("  Swan . Water "), "swan . water.");
        assert_eq!(preprocess_caption("swan.water."), "swan.water.");
    }

    #[test]
    fn test_phrase_masks() {
        // [CLS] swan . water . [SEP]
        let ids = [101, 10000, 1012, 2300, 1012, 102];
        let (mask, pos) = phrase_masks(&ids);

        assert!(mask[[0, 1, 2]] && mask[[0, 2, 1]]);
        assert!(mask[[0, 3, 4]]);
        assert!(!mask[[0, 1, 3]]);
        assert!(!mask[[0, 0, 1]]);
        assert!(mask[[0, 5, 5]]);
        assert_eq!(pos.row(0).to_vec(), vec![0, 0, 1, 0, 1, 0]);
    }

    #[test]
    fn test_phrase_token_ids() {
        let ids = [101, 10000, 1012, 2300, 1012, 102];
        let scores = arr1(&[0.9, 0.6, 0.1, 0.3, 0.2, 0.0, 0.99]);
        assert_eq!(phrase_token_ids(scores.view(), 0.25, &ids), vec![10000, 2300]);
    }
}
