use paramtree_core::{NodeId, NumBase, NumParam, ParamTree, ROOT_NAME};

/// Root list plus an initialized save/restore subtree
///
/// Returns the tree and the id of the save/restore list.
#[allow(dead_code)]
pub fn tree_with_checkpoint_root() -> (ParamTree, NodeId) {
    let mut tree = ParamTree::new();
    tree.create_root(ROOT_NAME, Some("root"), 16).unwrap();
    let sr = tree.init_save_restore().unwrap();
    (tree, sr)
}

/// Build `ata.0.master.{present,type,cylinders,model}` under `parent`
#[allow(dead_code)]
pub fn add_ata_channel(tree: &mut ParamTree, parent: NodeId) -> NodeId {
    let ata = tree.add_list(parent, "ata", 4).unwrap();
    let channel = tree.add_list(ata, "0", 2).unwrap();
    let master = tree.add_list(channel, "master", 8).unwrap();
    tree.add_bool(master, "present", false).unwrap();
    tree.add_enum(master, "type", ["disk", "cdrom"], 0).unwrap();
    tree.add_num(master, "cylinders", NumParam::new(0, 262_143, 0))
        .unwrap();
    tree.add_num(
        master,
        "io_base",
        NumParam::u32(0x1f0).with_base(NumBase::Hex),
    )
    .unwrap();
    tree.add_string(master, "model", 40, "Generic 1234").unwrap();
    ata
}
