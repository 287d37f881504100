use image::{GrayImage, Luma};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

const BIN: &str = env!("CARGO_BIN_EXE_ocr-extract");

/// Scratch directory with a synthetic page image
struct Fixture {
    dir: TempDir,
    image: PathBuf,
    output: PathBuf,
}

impl Fixture {
    fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let image = dir.path().join("page.png");
        sample_page().save(&image).expect("Failed to write fixture image");
        let output = dir.path().join("resultado_ocr.txt");
        Self { dir, image, output }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    /// Run the binary against the fixture image with extra arguments
    fn run(&self, input: &Path, extra: &[&str]) -> Output {
        Command::new(BIN)
            .arg(input)
            .arg("--output")
            .arg(&self.output)
            .args(extra)
            .env_remove("TESSDATA_PREFIX")
            .env_remove("TESSERACT_CMD")
            .env_remove("OCR_ENGINE")
            .env_remove("OCR_LANGUAGE")
            .env_remove("OCR_REPORT")
            .env("RUST_LOG", "info")
            .output()
            .expect("Failed to run binary")
    }

    /// Run the binary with a stand-in tesseract and default options
    #[cfg(unix)]
    fn run_with_script(&self, script: &Path) -> Output {
        let script = script.to_str().expect("Non-UTF-8 script path");
        self.run(&self.image, &["--tesseract-cmd", script])
    }

    /// Write an executable shell script standing in for tesseract
    #[cfg(unix)]
    fn fake_tesseract(&self, body: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let path = self.path("fake-tesseract.sh");
        fs::write(&path, format!("#!/bin/sh\n{}\n", body)).expect("Failed to write script");
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755))
            .expect("Failed to chmod script");
        path
    }
}

/// Dark bars on a light, slightly uneven background
fn sample_page() -> GrayImage {
    GrayImage::from_fn(160, 90, |x, y| {
        if (y % 30) >= 10 && (y % 30) < 16 && (12..148).contains(&x) {
            Luma([35])
        } else {
            Luma([200 + (x % 40) as u8])
        }
    })
}

fn combined_output(out: &Output) -> String {
    format!(
        "{}{}",
        String::from_utf8_lossy(&out.stdout),
        String::from_utf8_lossy(&out.stderr)
    )
}

#[test]
fn test_missing_input_fails_without_output() {
    let fixture = Fixture::new();

    let out = fixture.run(&fixture.path("missing.jpg"), &[]);

    assert!(!out.status.success());
    assert!(combined_output(&out).contains("does not exist"));
    assert!(!fixture.output.exists());
}

#[test]
fn test_unavailable_engine_fails_without_output() {
    let fixture = Fixture::new();
    let report = fixture.path("report.json");

    let out = fixture.run(
        &fixture.image,
        &[
            "--tesseract-cmd",
            "/nonexistent/tesseract",
            "--report",
            report.to_str().unwrap(),
        ],
    );

    assert!(!out.status.success());
    assert!(!fixture.output.exists());

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&report).unwrap()).unwrap();
    assert_eq!(json["outcome"], "failed");
    assert_eq!(json["error_code"], "ENGINE_UNAVAILABLE");
    assert_eq!(json["width"], 160);
    assert_eq!(json["height"], 90);
}

#[cfg(unix)]
#[test]
fn test_recognized_text_is_saved_trimmed() {
    let fixture = Fixture::new();
    let args_file = fixture.path("args.txt");
    let script = fixture.fake_tesseract(&format!(
        "printf '%s\\n' \"$@\" > '{}'\nprintf '\\n  Hola mundo desde Tesseract  \\n\\n'",
        args_file.display()
    ));

    let out = fixture.run_with_script(&script);

    assert!(out.status.success(), "{}", combined_output(&out));
    assert_eq!(
        fs::read_to_string(&fixture.output).unwrap(),
        "Hola mundo desde Tesseract"
    );

    let args = fs::read_to_string(&args_file).unwrap();
    let args: Vec<&str> = args.lines().collect();
    assert!(args[0].ends_with(".png"));
    assert_eq!(args[1..].join(" "), "stdout -l spa --oem 3 --psm 6");
}

#[cfg(unix)]
#[test]
fn test_language_flag_reaches_engine() {
    let fixture = Fixture::new();
    let args_file = fixture.path("args.txt");
    let script = fixture.fake_tesseract(&format!(
        "printf '%s\\n' \"$@\" > '{}'\necho 'Hello world'",
        args_file.display()
    ));

    let out = fixture.run(
        &fixture.image,
        &[
            "--tesseract-cmd",
            script.to_str().unwrap(),
            "--language",
            "eng",
        ],
    );

    assert!(out.status.success(), "{}", combined_output(&out));
    let args = fs::read_to_string(&args_file).unwrap();
    assert!(args.lines().any(|l| l == "eng"));
}

#[cfg(unix)]
#[test]
fn test_short_text_is_not_saved() {
    let fixture = Fixture::new();
    let script = fixture.fake_tesseract("echo '  ok  '");

    let out = fixture.run_with_script(&script);

    assert!(out.status.success(), "{}", combined_output(&out));
    assert!(combined_output(&out).contains("too short"));
    assert!(!fixture.output.exists());
}

#[cfg(unix)]
#[test]
fn test_missing_language_pack_is_reported() {
    let fixture = Fixture::new();
    let report = fixture.path("report.json");
    let script = fixture.fake_tesseract(
        "echo \"Error opening data file /usr/share/tessdata/xyz.traineddata\" >&2\n\
         echo \"Failed loading language 'xyz'\" >&2\nexit 1",
    );

    let out = fixture.run(
        &fixture.image,
        &[
            "--tesseract-cmd",
            script.to_str().unwrap(),
            "--language",
            "xyz",
            "--report",
            report.to_str().unwrap(),
        ],
    );

    assert!(!out.status.success());
    assert!(!fixture.output.exists());
    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&report).unwrap()).unwrap();
    assert_eq!(json["error_code"], "LANGUAGE_UNAVAILABLE");
    assert_eq!(json["language"], "xyz");
}

#[cfg(unix)]
#[test]
fn test_engine_sees_binary_image_of_same_size() {
    let fixture = Fixture::new();
    let copy = fixture.path("seen.png");
    let script = fixture.fake_tesseract(&format!(
        "cp \"$1\" '{}'\necho 'copied the image'",
        copy.display()
    ));

    let out = fixture.run_with_script(&script);

    assert!(out.status.success(), "{}", combined_output(&out));
    let seen = image::open(&copy).unwrap().into_luma8();
    assert_eq!(seen.dimensions(), (160, 90));
    assert!(seen.pixels().all(|p| p.0[0] == 0 || p.0[0] == 255));
}

#[cfg(unix)]
#[test]
fn test_repeated_runs_are_deterministic() {
    let fixture = Fixture::new();
    // Checksum of the image the engine receives stands in for recognized text
    let script = fixture.fake_tesseract("cksum < \"$1\"");

    let first = fixture.run_with_script(&script);
    assert!(first.status.success(), "{}", combined_output(&first));
    let first_text = fs::read_to_string(&fixture.output).unwrap();

    let second = fixture.run_with_script(&script);
    assert!(second.status.success(), "{}", combined_output(&second));
    let second_text = fs::read_to_string(&fixture.output).unwrap();

    assert_eq!(first_text, second_text);
}
