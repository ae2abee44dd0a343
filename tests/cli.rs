//! Runs the `sharpen-batch` binary against temp directories.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

fn run(cwd: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_sharpen-batch"))
        .current_dir(cwd)
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run sharpen-batch")
}

fn stdout(out: &Output) -> String {
    String::from_utf8_lossy(&out.stdout).into_owned()
}

fn stderr(out: &Output) -> String {
    String::from_utf8_lossy(&out.stderr).into_owned()
}

#[test]
fn gen_config_prints_defaults() {
    let tmp = TempDir::new().unwrap();
    let out = run(tmp.path(), &["gen-config"]);
    assert!(out.status.success());
    let text = stdout(&out);
    assert!(text.contains("input_dir = \"imagenes\""));
    assert!(text.contains("output_dir = \"imagenes/enhanced\""));
    assert!(text.contains("amount = 0.45"));
    assert!(text.contains("min_bytes = 150000"));
}

#[test]
fn default_directories_copy_small_files() {
    let tmp = TempDir::new().unwrap();
    let input = tmp.path().join("imagenes");
    fs::create_dir(&input).unwrap();
    fs::write(input.join("2.png"), b"two").unwrap();
    fs::write(input.join("10.png"), b"ten").unwrap();
    fs::write(input.join("cover.png"), b"skip").unwrap();

    let out = run(tmp.path(), &[]);
    assert!(out.status.success(), "{}", stderr(&out));

    let text = stdout(&out);
    assert!(text.contains("Enhancing 2 images from imagenes"), "{text}");
    let two = text.find("2.png").unwrap();
    let ten = text.find("10.png").unwrap();
    assert!(two < ten, "{text}");
    assert!(text.contains("Done: 0 sharpened, 2 copied (2 total)"), "{text}");

    let enhanced = input.join("enhanced");
    assert_eq!(fs::read(enhanced.join("2.png")).unwrap(), b"two");
    assert_eq!(fs::read(enhanced.join("10.png")).unwrap(), b"ten");
    assert!(!enhanced.join("cover.png").exists());
}

#[test]
fn missing_input_directory_exits_nonzero() {
    let tmp = TempDir::new().unwrap();
    let out = run(tmp.path(), &[]);
    assert!(!out.status.success());
    assert!(stderr(&out).contains("Input directory not found"));
    assert!(!tmp.path().join("imagenes/enhanced").exists());
}

#[test]
fn empty_input_directory_exits_nonzero() {
    let tmp = TempDir::new().unwrap();
    fs::create_dir(tmp.path().join("imagenes")).unwrap();
    let out = run(tmp.path(), &[]);
    assert!(!out.status.success());
    assert!(stderr(&out).contains("No files matching"));
}

#[test]
fn flags_override_config_file() {
    let tmp = TempDir::new().unwrap();
    fs::create_dir(tmp.path().join("in")).unwrap();
    fs::write(tmp.path().join("in/1.jpg"), b"jpeg-ish").unwrap();
    fs::write(
        tmp.path().join("enhance.toml"),
        "input_dir = \"in\"\noutput_dir = \"out\"\nextension = \"png\"\n",
    )
    .unwrap();

    let out = run(
        tmp.path(),
        &["--config", "enhance.toml", "--extension", "jpg"],
    );
    assert!(out.status.success(), "{}", stderr(&out));
    assert!(tmp.path().join("out/1.jpg").exists());
}

#[test]
fn output_resolving_to_input_leaves_inputs_untouched() {
    let tmp = TempDir::new().unwrap();
    let input = tmp.path().join("imagenes");
    fs::create_dir(&input).unwrap();
    fs::create_dir(tmp.path().join("x")).unwrap();
    fs::write(input.join("1.png"), b"original bytes").unwrap();

    let out = run(tmp.path(), &["--output", "x/../imagenes"]);
    assert!(!out.status.success());
    assert!(stderr(&out).contains("is the input directory"), "{}", stderr(&out));
    assert_eq!(fs::read(input.join("1.png")).unwrap(), b"original bytes");
}

#[test]
fn invalid_amount_is_rejected() {
    let tmp = TempDir::new().unwrap();
    let out = run(tmp.path(), &["--amount", "NaN"]);
    assert!(!out.status.success());
    assert!(stderr(&out).contains("error:"));
}

#[test]
fn keep_going_writes_report_and_fails() {
    let tmp = TempDir::new().unwrap();
    let input = tmp.path().join("imagenes");
    fs::create_dir(&input).unwrap();
    fs::write(input.join("1.png"), b"small").unwrap();
    fs::write(input.join("2.png"), vec![7u8; 1000]).unwrap();

    let out = run(
        tmp.path(),
        &[
            "--min-bytes",
            "100",
            "--keep-going",
            "--report",
            "report.json",
        ],
    );
    assert!(!out.status.success());
    assert!(stdout(&out).contains("002 2.png FAILED"), "{}", stdout(&out));
    assert!(stderr(&out).contains("1 of 2 files failed"));

    let report: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(tmp.path().join("report.json")).unwrap())
            .unwrap();
    let files = report["files"].as_array().unwrap();
    assert_eq!(files.len(), 2);
    assert_eq!(files[0]["outcome"]["action"], "copied");
    assert!(files[1]["error"].is_string());
}
