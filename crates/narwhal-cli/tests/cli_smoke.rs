use assert_cmd::prelude::*;
use std::fs;
use std::process::Command;

const DOT: &str = "digraph widgets {\n a -> x;\n b -> y;\n b -> x;\n}\n";
const ORD: &str = "# Ordering for graph widgets\n# natural\n\n0 { a b }\n1 { x y }\n";

#[test]
fn cli_reads_dot_ord_and_writes_requested_outputs() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let dot_path = tmp.path().join("widgets.dot");
    let ord_path = tmp.path().join("widgets.ord");
    fs::write(&dot_path, DOT).expect("write dot");
    fs::write(&ord_path, ORD).expect("write ord");

    let out_ord = tmp.path().join("out.ord");
    let out_dot = tmp.path().join("out.dot");

    let exe = assert_cmd::cargo_bin!("narwhal");
    Command::new(exe)
        .args([
            "-h",
            "mcn",
            "--out-ord",
            out_ord.to_string_lossy().as_ref(),
            "--out-dot",
            out_dot.to_string_lossy().as_ref(),
            dot_path.to_string_lossy().as_ref(),
            ord_path.to_string_lossy().as_ref(),
        ])
        .assert()
        .success();

    let ord_contents = fs::read_to_string(&out_ord).expect("read out.ord");
    assert!(ord_contents.contains("0 {"));
    assert!(ord_contents.contains("1 {"));

    let dot_contents = fs::read_to_string(&out_dot).expect("read out.dot");
    assert!(dot_contents.contains("digraph"));
}

#[test]
fn cli_writes_snapshot_files_when_base_name_given() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let dot_path = tmp.path().join("widgets.dot");
    let ord_path = tmp.path().join("widgets.ord");
    fs::write(&dot_path, DOT).expect("write dot");
    fs::write(&ord_path, ORD).expect("write ord");

    let base = tmp.path().join("snap");

    let exe = assert_cmd::cargo_bin!("narwhal");
    Command::new(exe)
        .args([
            "-h",
            "bary",
            "-o",
            base.to_string_lossy().as_ref(),
            dot_path.to_string_lossy().as_ref(),
            ord_path.to_string_lossy().as_ref(),
        ])
        .assert()
        .success();

    let snapshot_dir = tmp.path();
    let wrote_any = fs::read_dir(snapshot_dir)
        .expect("read tempdir")
        .filter_map(|e| e.ok())
        .any(|e| {
            let name = e.file_name().to_string_lossy().into_owned();
            name.starts_with("snap-") && name.contains("+bary") && name.ends_with(".ord")
        });
    assert!(wrote_any, "expected at least one snap-+bary*.ord snapshot file");
}

#[test]
fn cli_rejects_unknown_heuristic_with_usage_exit_code() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let dot_path = tmp.path().join("widgets.dot");
    let ord_path = tmp.path().join("widgets.ord");
    fs::write(&dot_path, DOT).expect("write dot");
    fs::write(&ord_path, ORD).expect("write ord");

    let exe = assert_cmd::cargo_bin!("narwhal");
    Command::new(exe)
        .args([
            "-h",
            "not_a_heuristic",
            dot_path.to_string_lossy().as_ref(),
            ord_path.to_string_lossy().as_ref(),
        ])
        .assert()
        .code(64);
}

#[test]
fn cli_reads_sgf_single_file_input() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let sgf_path = tmp.path().join("widgets.sgf");
    let sgf = "c a tiny graph\nt widgets 4 3 2\nn a 0 0\nn b 0 1\nn x 1 0\nn y 1 1\ne a x\ne b y\ne b x\n";
    fs::write(&sgf_path, sgf).expect("write sgf");

    let exe = assert_cmd::cargo_bin!("narwhal");
    let output = Command::new(exe)
        .args(["-h", "mcn", sgf_path.to_string_lossy().as_ref()])
        .output()
        .expect("run narwhal");
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
}
