#![allow(clippy::unwrap_used, clippy::expect_used)]

use paramtree_core::{EnumParam, NumParam, NumericParam, StringParam};
use proptest::prelude::*;

proptest! {
    #[test]
    fn num_set_get_is_identity(value in any::<i64>()) {
        let mut num = NumParam::u64(0);
        num.set64(value).unwrap();
        prop_assert_eq!(num.get64(), value);
    }

    #[test]
    fn enum_accepts_exactly_its_range(value in -4i64..8) {
        let mut e = EnumParam::with_min(["a", "b", "c"], 1, 1);
        let result = e.set(value);
        prop_assert_eq!(result.is_ok(), (1..=3).contains(&value));
        if result.is_err() {
            prop_assert_eq!(e.get(), 1);
        }
    }

    #[test]
    fn text_never_exceeds_max_len(text in "\\PC{0,64}", max_len in 0usize..32) {
        let mut s = StringParam::text(max_len, "");
        s.set_text(&text);
        let stored = s.text_value().unwrap();
        prop_assert!(stored.len() <= max_len);
        prop_assert!(text.starts_with(stored));
    }
}
