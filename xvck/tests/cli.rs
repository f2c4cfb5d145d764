use std::io::Write;
use std::process::{Command, Output};

use tempfile::NamedTempFile;
use xvfs::xv6::*;

fn xvck(args: &[&str]) -> Output {
    xvck_logging(args, "")
}

fn xvck_logging(args: &[&str], level: &str) -> Output {
    Command::new(env!("CARGO_BIN_EXE_xvck"))
        .args(args)
        .env("XVCK_LOG", level)
        .output()
        .unwrap()
}

fn write_image(bytes: &[u8]) -> NamedTempFile {
    let mut f = NamedTempFile::new().unwrap();
    f.write_all(bytes).unwrap();
    f.flush().unwrap();
    f
}

fn sample() -> (Xv6ImageBuilder, u32) {
    let mut b = Xv6ImageBuilder::new(32, 128).unwrap();
    let d = b.add_dir(XV6_ROOT_INODE, "bin").unwrap();
    let f = b.add_file(d, "init", 3).unwrap();
    (b, f)
}

fn stderr(out: &Output) -> String {
    String::from_utf8_lossy(&out.stderr).into_owned()
}

#[test]
fn test_consistent_image_exits_zero() {
    let (b, _) = sample();
    let img = write_image(b.as_bytes());
    let out = xvck(&[img.path().to_str().unwrap()]);
    assert_eq!(out.status.code(), Some(0));
    assert!(out.stdout.is_empty());
    assert!(out.stderr.is_empty());
}

#[test]
fn test_inconsistent_image_reports_one_line() {
    let (mut b, f) = sample();
    let block = b.read_inode(f).unwrap().addrs[0];
    b.set_bitmap(block, false).unwrap();
    let img = write_image(b.as_bytes());

    let out = xvck(&[img.path().to_str().unwrap()]);
    assert_eq!(out.status.code(), Some(1));
    assert_eq!(
        stderr(&out),
        format!(
            "ERROR: address used by inode but marked free in bitmap (inode {f}, block {block})\n"
        )
    );
}

#[test]
fn test_missing_image() {
    let out = xvck(&["/nonexistent/xv6.img"]);
    assert_eq!(out.status.code(), Some(1));
    assert!(stderr(&out).starts_with("ERROR: image not found"));
}

#[test]
fn test_truncated_image() {
    let (b, _) = sample();
    let img = write_image(&b.as_bytes()[..4 * XV6_BLOCK_SIZE]);
    let out = xvck(&[img.path().to_str().unwrap()]);
    assert_eq!(out.status.code(), Some(1));
    assert!(stderr(&out).contains("geometry"));
}

#[test]
fn test_usage_errors_exit_one() {
    assert_eq!(xvck(&[]).status.code(), Some(1));
    assert_eq!(xvck(&["a.img", "b.img"]).status.code(), Some(1));
    assert_eq!(xvck(&["--help"]).status.code(), Some(0));
    assert_eq!(xvck(&["-v", "a.img"]).status.code(), Some(1));
}

#[test]
fn test_log_level_from_environment() {
    let (b, _) = sample();
    let img = write_image(b.as_bytes());

    let out = xvck_logging(&[img.path().to_str().unwrap()], "info");
    assert_eq!(out.status.code(), Some(0));
    let err = stderr(&out);
    assert!(err.contains("[xvck] 32 inodes"));
    assert!(err.contains("Image is consistent"));
    assert!(!err.contains("WALK"));

    let out = xvck_logging(&[img.path().to_str().unwrap()], "verbose");
    assert!(stderr(&out).contains("WALK.BLOCKS"));
}
