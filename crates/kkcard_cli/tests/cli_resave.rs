mod common;

use common::{chara_bytes, run_cli, scene_bytes, temp_path, write_temp};

#[test]
fn check_passes_for_canonical_files() {
    let inputs = [
        ("kkcard_check_chara", chara_bytes()),
        ("kkcard_check_scene", scene_bytes()),
    ];
    for (prefix, bytes) in inputs {
        let path = write_temp(prefix, &bytes);
        let output = run_cli(&["--check", &path]);
        assert!(
            output.status.success(),
            "{}",
            String::from_utf8_lossy(&output.stderr)
        );
        assert!(String::from_utf8_lossy(&output.stdout).ends_with("round-trip ok\n"));
    }
}

#[test]
fn output_writes_an_identical_copy() {
    let bytes = chara_bytes();
    let input = write_temp("kkcard_resave_in", &bytes);
    let out_path = temp_path("kkcard_resave_out", "png");
    let out = out_path.to_string_lossy().to_string();

    let output = run_cli(&["--output", &out, &input]);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).starts_with("Wrote character to "));

    let written = std::fs::read(&out_path).expect("output should exist");
    assert_eq!(written, bytes);
    let _ = std::fs::remove_file(out_path);
}

#[test]
fn check_and_output_conflict() {
    let input = write_temp("kkcard_conflict", &chara_bytes());
    let out_path = temp_path("kkcard_conflict_out", "png");
    let out = out_path.to_string_lossy().to_string();
    let output = run_cli(&["--check", "--output", &out, &input]);
    assert_eq!(output.status.code(), Some(2));
    assert!(!out_path.exists());
}
