//! Tests for the volume registry, with two hosts sharing one root.

use super::*;
use crate::test_support::{NODE_A, NODE_B, SharedRoot};
use std::fs;

fn shared() -> CreateOptions {
    CreateOptions::default()
}

fn exclusive() -> CreateOptions {
    CreateOptions {
        exclusive: true,
        ..CreateOptions::default()
    }
}

#[test]
fn test_create_is_visible_to_other_host() {
    let root = SharedRoot::new();
    let a = root.host(NODE_A);
    let b = root.host(NODE_B);

    a.create("v1", shared()).unwrap();

    let listed = b.list().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].name, "v1");
    assert_eq!(b.path("v1").unwrap(), root.dir.path().join("v1").join("_data"));
}

#[test]
fn test_create_twice_returns_existing_volume() {
    let root = SharedRoot::new();
    let a = root.host(NODE_A);
    let b = root.host(NODE_B);

    let first = a.create("v1", exclusive()).unwrap();
    let second = b
        .create(
            "v1",
            CreateOptions {
                protected: true,
                exclusive: false,
            },
        )
        .unwrap();

    assert!(second.exclusive);
    assert!(!second.protected);
    assert_eq!(second.created_at, first.created_at);
}

#[test]
fn test_create_rejects_path_like_names() {
    let root = SharedRoot::new();
    let a = root.host(NODE_A);

    for name in ["", ".", "..", "a/b"] {
        let err = a.create(name, shared()).unwrap_err();
        assert!(matches!(err, VolumeError::UserError(_)), "name {name:?}");
    }
}

#[cfg(target_os = "linux")]
#[test]
fn test_create_with_filesystem_guard_mismatch_fails() {
    let root = SharedRoot::new();
    let mut ctx = HostContext::new(root.dir.path(), NODE_A);
    ctx.required_filesystem_magic = Some(0);
    let a = VolumeRegistry::new(ctx);

    let err = a.create("v1", shared()).unwrap_err();

    assert!(matches!(err, VolumeError::NotOnExpectedFilesystem(_)));
    assert!(!root.dir.path().join("v1").exists());
}

#[test]
fn test_create_existing_entry_reflects_flags_changed_on_disk() {
    let root = SharedRoot::new();
    let a = root.host(NODE_A);
    let volume = a.create("v1", shared()).unwrap();
    assert!(!volume.protected);

    // Another host edits the descriptor directly.
    volume.with_protected(true).save().unwrap();

    let again = a.create("v1", shared()).unwrap();
    assert!(again.protected);
    assert_eq!(a.remove("v1").unwrap(), DeleteOutcome::Protected);
}

#[test]
fn test_get_unknown_volume_fails() {
    let root = SharedRoot::new();
    let a = root.host(NODE_A);

    let err = a.get("ghost").unwrap_err();
    assert!(matches!(err, VolumeError::UnknownVolume(ref name) if name == "ghost"));
}

#[test]
fn test_get_reports_locks_and_mounts() {
    let root = SharedRoot::new();
    let a = root.host(NODE_A);
    let b = root.host(NODE_B);
    a.create("v1", shared()).unwrap();

    a.mount("v1", "c1").unwrap();
    a.lock("v1").unwrap();
    b.lock("v1").unwrap();

    let status = b.get("v1").unwrap();
    assert_eq!(status.volume.name, "v1");
    assert!(status.locks.contains(NODE_A));
    assert!(status.locks.contains(NODE_B));
    assert_eq!(status.mounts.get("c1").map(String::as_str), Some(NODE_A));
}

#[test]
fn test_get_reflects_flags_changed_on_disk() {
    let root = SharedRoot::new();
    let a = root.host(NODE_A);
    let volume = a.create("v1", shared()).unwrap();
    assert!(!a.get("v1").unwrap().volume.protected);

    volume.with_protected(true).save().unwrap();

    assert!(a.get("v1").unwrap().volume.protected);
}

#[test]
fn test_status_serializes_with_descriptor_keys() {
    let root = SharedRoot::new();
    let a = root.host(NODE_A);
    a.create("v1", shared()).unwrap();
    a.mount("v1", "c1").unwrap();
    a.lock("v1").unwrap();

    let json = serde_json::to_value(a.get("v1").unwrap()).unwrap();

    assert_eq!(json["Name"], "v1");
    assert_eq!(json["Locks"][0], NODE_A);
    assert_eq!(json["Mounts"]["c1"], NODE_A);
}

#[test]
fn test_restarted_process_recovers_volumes() {
    let root = SharedRoot::new();
    {
        let a = root.host(NODE_A);
        a.create("a", exclusive()).unwrap();
        a.create("b", shared()).unwrap();
    }

    let restarted = root.host(NODE_A);
    let names: Vec<String> = restarted
        .list()
        .unwrap()
        .into_iter()
        .map(|v| v.name)
        .collect();

    assert_eq!(names, vec!["a".to_string(), "b".to_string()]);
    assert!(restarted.get("a").unwrap().volume.exclusive);
}

#[test]
fn test_list_prunes_volumes_removed_by_other_host() {
    let root = SharedRoot::new();
    let a = root.host(NODE_A);
    let b = root.host(NODE_B);
    a.create("v1", shared()).unwrap();
    a.create("v2", shared()).unwrap();
    assert_eq!(b.list().unwrap().len(), 2);

    assert_eq!(a.remove("v1").unwrap(), DeleteOutcome::Removed);

    let names: Vec<String> = b.list().unwrap().into_iter().map(|v| v.name).collect();
    assert_eq!(names, vec!["v2".to_string()]);
    assert!(matches!(b.get("v1"), Err(VolumeError::UnknownVolume(_))));
}

#[test]
fn test_remove_unknown_volume_is_already_gone() {
    let root = SharedRoot::new();
    let a = root.host(NODE_A);

    assert_eq!(a.remove("ghost").unwrap(), DeleteOutcome::AlreadyGone);
}

#[test]
fn test_remove_protected_volume_is_suppressed() {
    let root = SharedRoot::new();
    let a = root.host(NODE_A);
    a.create(
        "v1",
        CreateOptions {
            protected: true,
            exclusive: false,
        },
    )
    .unwrap();

    assert_eq!(a.remove("v1").unwrap(), DeleteOutcome::Protected);
    assert!(root.dir.path().join("v1").is_dir());
    assert_eq!(a.list().unwrap().len(), 1);
}

#[test]
fn test_lock_from_one_host_blocks_remove_from_other() {
    let root = SharedRoot::new();
    let a = root.host(NODE_A);
    let b = root.host(NODE_B);
    a.create("v1", shared()).unwrap();

    a.lock("v1").unwrap();
    assert_eq!(b.remove("v1").unwrap(), DeleteOutcome::Locked);
    assert!(root.dir.path().join("v1").is_dir());

    a.unlock("v1").unwrap();
    assert_eq!(b.remove("v1").unwrap(), DeleteOutcome::Removed);
    assert!(!root.dir.path().join("v1").exists());
}

#[test]
fn test_lock_reports_whether_it_was_already_held() {
    let root = SharedRoot::new();
    let a = root.host(NODE_A);
    let b = root.host(NODE_B);
    a.create("v1", shared()).unwrap();

    assert!(a.lock("v1").unwrap());
    assert!(!a.lock("v1").unwrap());
    assert!(b.lock("v1").unwrap());
}

#[test]
fn test_unlock_from_other_host_leaves_lock() {
    let root = SharedRoot::new();
    let a = root.host(NODE_A);
    let b = root.host(NODE_B);
    a.create("v1", shared()).unwrap();
    a.lock("v1").unwrap();

    b.unlock("v1").unwrap();

    let locks = b.locks("v1").unwrap();
    assert_eq!(locks.into_iter().collect::<Vec<_>>(), vec![NODE_A.to_string()]);
}

#[test]
fn test_shared_mounts_from_two_hosts_block_remove() {
    let root = SharedRoot::new();
    let a = root.host(NODE_A);
    let b = root.host(NODE_B);
    a.create("v1", shared()).unwrap();

    let data_dir = a.mount("v1", "c1").unwrap();
    b.mount("v1", "c2").unwrap();

    assert_eq!(data_dir, root.dir.path().join("v1").join("_data"));
    let marker = root.dir.path().join("v1").join("_locks").join("c1.mount");
    assert_eq!(fs::read_to_string(marker).unwrap(), NODE_A);

    assert_eq!(a.remove("v1").unwrap(), DeleteOutcome::Mounted);
    assert!(root.dir.path().join("v1").is_dir());
    // Mounting takes no lock marker.
    assert!(a.locks("v1").unwrap().is_empty());

    a.unmount("v1", "c1").unwrap();
    assert_eq!(a.remove("v1").unwrap(), DeleteOutcome::Mounted);

    b.unmount("v1", "c2").unwrap();
    assert_eq!(a.remove("v1").unwrap(), DeleteOutcome::Removed);
}

#[test]
fn test_exclusive_mount_conflicts_across_hosts() {
    let root = SharedRoot::new();
    let a = root.host(NODE_A);
    let b = root.host(NODE_B);
    a.create("v1", exclusive()).unwrap();

    a.mount("v1", "x").unwrap();

    let err = b.mount("v1", "y").unwrap_err();
    assert!(matches!(err, VolumeError::AlreadyMounted(ref name) if name == "v1"));
    assert_eq!(b.get("v1").unwrap().mounts.len(), 1);

    a.unmount("v1", "x").unwrap();
    b.mount("v1", "y").unwrap();
}

#[test]
fn test_exclusive_flag_set_on_disk_applies_to_next_mount() {
    let root = SharedRoot::new();
    let a = root.host(NODE_A);
    let b = root.host(NODE_B);
    let volume = a.create("v1", shared()).unwrap();
    b.list().unwrap();

    volume.with_exclusive(true).save().unwrap();

    a.mount("v1", "x").unwrap();
    assert!(matches!(
        b.mount("v1", "y"),
        Err(VolumeError::AlreadyMounted(_))
    ));
}

#[test]
fn test_unmount_by_other_host_is_rejected() {
    let root = SharedRoot::new();
    let a = root.host(NODE_A);
    let b = root.host(NODE_B);
    a.create("v1", exclusive()).unwrap();
    a.mount("v1", "x").unwrap();

    let err = b.unmount("v1", "x").unwrap_err();

    assert!(matches!(
        err,
        VolumeError::MountOwnershipMismatch { ref owner, .. } if owner == NODE_A
    ));
    assert_eq!(b.get("v1").unwrap().mounts.len(), 1);
}

#[test]
fn test_explicit_lock_survives_mount_and_unmount() {
    let root = SharedRoot::new();
    let a = root.host(NODE_A);
    let b = root.host(NODE_B);
    a.create("v1", shared()).unwrap();
    a.lock("v1").unwrap();

    a.mount("v1", "c1").unwrap();
    a.unmount("v1", "c1").unwrap();

    assert!(a.locks("v1").unwrap().contains(NODE_A));
    assert_eq!(b.remove("v1").unwrap(), DeleteOutcome::Locked);
    assert!(root.dir.path().join("v1").is_dir());
}

#[test]
fn test_unmount_absent_id_leaves_locks_alone() {
    let root = SharedRoot::new();
    let a = root.host(NODE_A);
    let b = root.host(NODE_B);
    a.create("v1", shared()).unwrap();
    a.lock("v1").unwrap();

    a.unmount("v1", "never").unwrap();

    assert!(a.locks("v1").unwrap().contains(NODE_A));
    assert_eq!(b.remove("v1").unwrap(), DeleteOutcome::Locked);
    assert!(root.dir.path().join("v1").is_dir());
}

#[test]
fn test_mount_unknown_volume_fails() {
    let root = SharedRoot::new();
    let a = root.host(NODE_A);

    assert!(matches!(
        a.mount("ghost", "c1"),
        Err(VolumeError::UnknownVolume(_))
    ));
}

#[test]
fn test_mount_rejects_path_like_ids() {
    let root = SharedRoot::new();
    let a = root.host(NODE_A);
    a.create("v1", shared()).unwrap();

    assert!(matches!(
        a.mount("v1", "../escape"),
        Err(VolumeError::UserError(_))
    ));
}
