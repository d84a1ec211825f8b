#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::{machine, save};
use paramtree_core::{ExErrorKind, FileDataHooks, FileDataParam, NumericParam};
use paramtree_store::{restore_param, Checkpoint, CheckpointOptions, NoopConfigFile};
use std::cell::Cell;
use std::fs::{self, File};
use std::io;
use std::rc::Rc;

#[test]
fn test_ata_scenario_restore() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("ata"),
        "ata = {\n  present = true\n  type = cdrom\n}\n",
    )
    .unwrap();
    let mut m = machine();

    let report = restore_param(&mut m.tree, m.sr, dir.path(), "ata").unwrap();

    assert!(report.is_clean());
    assert_eq!(report.applied, 2);
    assert!(m.tree.get_param_bool("ata.present", Some(m.sr)).unwrap().get());
    assert_eq!(
        m.tree
            .get_param_enum("ata.type", Some(m.sr))
            .unwrap()
            .selected(),
        Some("cdrom")
    );
}

#[test]
fn test_unknown_name_is_reported_and_parsing_continues() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("ata"),
        "ata = {\n  bogus = 1\n  present = true\n}\n",
    )
    .unwrap();
    let mut m = machine();

    let report = restore_param(&mut m.tree, m.sr, dir.path(), "ata").unwrap();

    assert_eq!(report.applied, 1);
    assert_eq!(report.problems.len(), 1);
    assert_eq!(report.problems[0].line, 2);
    assert_eq!(report.problems[0].name, "bogus");
    assert_eq!(report.problems[0].error.kind(), ExErrorKind::NotFound);
    assert!(m.tree.get_param_bool("ata.present", Some(m.sr)).unwrap().get());
}

#[test]
fn test_unknown_list_suppresses_its_children() {
    // Given a list missing from the tree whose child shares a name with a sibling
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("ata"),
        "ata = {\n  slave = {\n    present = true\n  }\n  type = cdrom\n}\n",
    )
    .unwrap();
    let mut m = machine();

    let report = restore_param(&mut m.tree, m.sr, dir.path(), "ata").unwrap();

    // Then nothing inside it is applied to the enclosing list
    assert_eq!(report.problems.len(), 1);
    assert_eq!(report.applied, 1);
    assert!(!m.tree.get_param_bool("ata.present", Some(m.sr)).unwrap().get());
    assert_eq!(
        m.tree
            .get_param_enum("ata.type", Some(m.sr))
            .unwrap()
            .selected(),
        Some("cdrom")
    );
}

#[test]
fn test_missing_file_and_missing_target() {
    let dir = tempfile::tempdir().unwrap();
    let mut m = machine();

    let err = restore_param(&mut m.tree, m.sr, dir.path(), "cpu").unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::Io);
    assert!(err.file().unwrap().ends_with("cpu"));

    let err = restore_param(&mut m.tree, m.sr, dir.path(), "gpu").unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::NotFound);
}

#[test]
fn test_bad_values_keep_prior_state() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("cpu"),
        "cpu = {\n  mac = 00:ff\n  eax = 12zz\n  label = ok\n}\n",
    )
    .unwrap();
    let mut m = machine();
    let sr = Some(m.sr);
    m.tree
        .get_param_string_mut("cpu.mac", sr)
        .unwrap()
        .set_raw_bytes(&[1, 2, 3])
        .unwrap();
    m.tree.get_param_num_mut("cpu.eax", sr).unwrap().set64(7).unwrap();

    let report = restore_param(&mut m.tree, m.sr, dir.path(), "cpu").unwrap();

    assert_eq!(report.problems.len(), 2);
    assert_eq!(report.applied, 1);
    assert_eq!(
        m.tree.get_param_string("cpu.mac", sr).unwrap().raw_bytes(),
        Some(&[1, 2, 3][..])
    );
    assert_eq!(m.tree.get_param_num("cpu.eax", sr).unwrap().get64(), 7);
    assert_eq!(
        m.tree.get_param_string("cpu.label", sr).unwrap().text_value(),
        Some("ok")
    );
}

#[test]
fn test_unknown_choice_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("ata"), "ata = {\n  type = floppy\n}\n").unwrap();
    let mut m = machine();

    let report = restore_param(&mut m.tree, m.sr, dir.path(), "ata").unwrap();

    assert_eq!(report.problems.len(), 1);
    assert_eq!(report.problems[0].error.kind(), ExErrorKind::UnknownChoice);
    assert_eq!(
        m.tree
            .get_param_enum("ata.type", Some(m.sr))
            .unwrap()
            .selected(),
        Some("disk")
    );
}

#[test]
fn test_unbalanced_and_unterminated_lists() {
    let dir = tempfile::tempdir().unwrap();
    let mut m = machine();

    fs::write(dir.path().join("ata"), "ata = {\n  present = true\n}\n}\n").unwrap();
    let report = restore_param(&mut m.tree, m.sr, dir.path(), "ata").unwrap();
    assert_eq!(report.problems.len(), 1);
    assert_eq!(report.problems[0].line, 4);

    fs::write(dir.path().join("ata"), "ata = {\n  present = false\n").unwrap();
    let report = restore_param(&mut m.tree, m.sr, dir.path(), "ata").unwrap();
    assert_eq!(report.applied, 1);
    assert_eq!(report.problems.len(), 1);
    assert_eq!(report.problems[0].error.kind(), ExErrorKind::Format);
}

#[test]
fn test_strict_mode_fails_on_problems() {
    let dir = tempfile::tempdir().unwrap();
    let m = machine();
    save(&m, dir.path());
    fs::write(dir.path().join("ata"), "ata = {\n  bogus = 1\n}\n").unwrap();

    let mut fresh = machine();
    let mut config = NoopConfigFile;
    let options = CheckpointOptions {
        strict: true,
        ..Default::default()
    };
    let err = Checkpoint::new(&mut config, options)
        .restore_hardware(&mut fresh.tree, fresh.sr, dir.path())
        .unwrap_err();

    assert_eq!(err.kind(), ExErrorKind::Format);
    assert_eq!(
        err.source_error().map(|e| e.kind()),
        Some(ExErrorKind::NotFound)
    );

    // Lenient mode applies the rest and reports the problem
    let report = Checkpoint::new(&mut config, CheckpointOptions::default())
        .restore_hardware(&mut fresh.tree, fresh.sr, dir.path())
        .unwrap();
    assert_eq!(report.problems.len(), 1);
}

#[test]
fn test_text_values_keep_interior_and_trailing_spaces() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("cpu"), "cpu = {\n  label = a  b \n}\n").unwrap();
    let mut m = machine();

    restore_param(&mut m.tree, m.sr, dir.path(), "cpu").unwrap();
    assert_eq!(
        m.tree
            .get_param_string("cpu.label", Some(m.sr))
            .unwrap()
            .text_value(),
        Some("a  b ")
    );

    fs::write(dir.path().join("cpu"), "cpu = {\n  label =\n}\n").unwrap();
    let report = restore_param(&mut m.tree, m.sr, dir.path(), "cpu").unwrap();
    assert!(report.is_clean());
    assert_eq!(
        m.tree
            .get_param_string("cpu.label", Some(m.sr))
            .unwrap()
            .text_value(),
        Some("")
    );
}

#[test]
fn test_missing_data_sidecar_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("memory"),
        "memory = {\n  ram = memory.ram\n}\n",
    )
    .unwrap();
    let mut m = machine();

    let report = restore_param(&mut m.tree, m.sr, dir.path(), "memory").unwrap();

    assert_eq!(report.problems.len(), 1);
    assert_eq!(report.problems[0].error.kind(), ExErrorKind::Io);
}

struct CountingHooks {
    saves: Rc<Cell<usize>>,
    restores: Rc<Cell<usize>>,
}

impl FileDataHooks for CountingHooks {
    fn save(&self, _sidecar: &mut File) -> io::Result<()> {
        self.saves.set(self.saves.get() + 1);
        Ok(())
    }

    fn restore(&mut self, _sidecar: &mut File) -> io::Result<()> {
        self.restores.set(self.restores.get() + 1);
        Ok(())
    }
}

#[test]
fn test_file_data_hooks_run_once_per_direction() {
    let dir = tempfile::tempdir().unwrap();
    let saves = Rc::new(Cell::new(0));
    let restores = Rc::new(Cell::new(0));

    let mut m = machine();
    let memory = m.tree.get_param("memory", Some(m.sr)).unwrap();
    let old_log = m.tree.child_by_name(memory, "log").unwrap();
    m.tree.remove(old_log).unwrap();
    m.tree
        .add_file_data(
            memory,
            "log",
            FileDataParam::new().with_hooks(Box::new(CountingHooks {
                saves: Rc::clone(&saves),
                restores: Rc::clone(&restores),
            })),
        )
        .unwrap();

    save(&m, dir.path());
    assert_eq!((saves.get(), restores.get()), (1, 0));

    restore_param(&mut m.tree, m.sr, dir.path(), "memory").unwrap();
    assert_eq!((saves.get(), restores.get()), (1, 1));
}
