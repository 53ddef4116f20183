use std::{path::Path, process::Command};

fn run_script(name: &str) -> (bool, String) {
    let script = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("sessions")
        .join(name);
    let output = Command::new(env!("CARGO_BIN_EXE_palxel"))
        .args(["--seed", "7", "--script"])
        .arg(&script)
        .env("RUST_LOG", "off")
        .output()
        .expect("failed to launch palxel binary");
    let stdout = String::from_utf8(output.stdout).expect("utf-8 stdout");
    (output.status.success(), stdout)
}

#[test]
fn scripted_session_edits_then_resets_a_pixel() {
    let (success, stdout) = run_script("edit_pixel.txt");
    assert!(success, "session failed:\n{stdout}");

    assert!(stdout.contains("cells 0/72"), "{stdout}");
    assert!(stdout.contains("* Spawning grid..."), "{stdout}");
    assert!(
        stdout.contains("* px[41,1] -> #0C2238 RGB(12,34,56) = 795192"),
        "{stdout}"
    );
    assert!(stdout.contains("== Confirm reset =="), "{stdout}");
    assert!(stdout.contains("* Grid reset. Spawning grid..."), "{stdout}");
    assert!(stdout.contains("px[41,1] #000000 RGB(0,0,0) = 0"), "{stdout}");
    assert!(stdout.contains("cells 72/72 | animation off | spawning no"), "{stdout}");
    assert!(!stdout.contains("palxel> pixel 0 0"), "commands after quit ran:\n{stdout}");
}

#[test]
fn missing_script_fails() {
    let (success, _) = run_script("does_not_exist.txt");
    assert!(!success);
}
