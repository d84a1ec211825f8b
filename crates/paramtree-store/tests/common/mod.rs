use paramtree_core::{
    FileDataParam, LogModule, LogModules, NodeId, NumBase, NumParam, ParamTree, ROOT_NAME,
};
use paramtree_store::{Checkpoint, CheckpointOptions, NoopConfigFile};
use std::path::Path;

/// A small machine: ata, cpu and memory devices under the save/restore root
#[allow(dead_code)]
pub struct Machine {
    pub tree: ParamTree,
    pub sr: NodeId,
    pub logs: LogModules,
}

#[allow(dead_code)]
pub fn machine() -> Machine {
    let mut tree = ParamTree::new();
    tree.create_root(ROOT_NAME, None, 8).unwrap();
    let sr = tree.init_save_restore().unwrap();

    let ata = tree.add_list(sr, "ata", 4).unwrap();
    tree.add_bool(ata, "present", false).unwrap();
    tree.add_enum(ata, "type", ["disk", "cdrom"], 0).unwrap();

    let cpu = tree.add_list(sr, "cpu", 8).unwrap();
    tree.add_num(cpu, "eax", NumParam::u32(0).with_base(NumBase::Hex))
        .unwrap();
    tree.add_num(cpu, "rip", NumParam::u64(0).with_base(NumBase::Hex))
        .unwrap();
    tree.add_num(cpu, "tsc", NumParam::u64(0)).unwrap();
    tree.add_num(cpu, "delta", NumParam::new(-1000, 1000, 0))
        .unwrap();
    tree.add_raw_string(cpu, "mac", 3, Some(':')).unwrap();
    tree.add_string(cpu, "label", 32, "").unwrap();

    let memory = tree.add_list(sr, "memory", 2).unwrap();
    tree.add_data(memory, "ram", 16).unwrap();
    tree.add_file_data(memory, "log", FileDataParam::new())
        .unwrap();

    let mut logs = LogModules::new();
    logs.add(LogModule::new("CPU0"));
    logs.add(LogModule::new("ATA"));

    Machine { tree, sr, logs }
}

/// Save with default options through the no-op config collaborator
#[allow(dead_code)]
pub fn save(machine: &Machine, dir: &Path) {
    let mut config = NoopConfigFile;
    Checkpoint::new(&mut config, CheckpointOptions::default())
        .save_state(&machine.tree, machine.sr, &machine.logs, dir)
        .unwrap();
}
