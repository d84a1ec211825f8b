#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::machine;
use paramtree_core::NumericParam;
use paramtree_store::{restore_from_reader, save_param};
use proptest::prelude::*;
use std::path::Path;

proptest! {
    #[test]
    fn prop_cpu_numbers_survive_text_round_trip(
        eax in any::<u32>(),
        rip in any::<u64>(),
        tsc in any::<u64>(),
        delta in -1000i64..=1000,
    ) {
        let mut m = machine();
        let sr = Some(m.sr);
        let values = [
            ("cpu.eax", i64::from(eax)),
            ("cpu.rip", rip as i64),
            ("cpu.tsc", tsc as i64),
            ("cpu.delta", delta),
        ];
        for (path, value) in values {
            m.tree.get_param_num_mut(path, sr).unwrap().set64(value).unwrap();
        }
        let cpu = m.tree.get_param("cpu", sr).unwrap();
        let mut text = Vec::new();
        save_param(&mut text, &m.tree, cpu, None, 0).unwrap();

        let mut fresh = machine();
        let report =
            restore_from_reader(&mut fresh.tree, fresh.sr, Path::new("."), text.as_slice()).unwrap();

        prop_assert!(report.is_clean());
        for (path, value) in values {
            prop_assert_eq!(
                fresh.tree.get_param_num(path, Some(fresh.sr)).unwrap().get64(),
                value
            );
        }
    }
}
