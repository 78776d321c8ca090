//! End-to-end tests running the `odp-notes` binary on generated packages.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

const ODP_MIME: &str = "application/vnd.oasis.opendocument.presentation";

const HELLO_WORLD_CONTENT: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8"?>"#,
    r#"<office:document-content"#,
    r#" xmlns:office="urn:oasis:names:tc:opendocument:xmlns:office:1.0""#,
    r#" xmlns:draw="urn:oasis:names:tc:opendocument:xmlns:drawing:1.0""#,
    r#" xmlns:text="urn:oasis:names:tc:opendocument:xmlns:text:1.0""#,
    r#" xmlns:presentation="urn:oasis:names:tc:opendocument:xmlns:presentation:1.0">"#,
    r#"<office:body><office:presentation>"#,
    r#"<draw:page draw:name="page1">"#,
    r#"<draw:frame presentation:class="title"><draw:text-box><text:p>Greeting</text:p></draw:text-box></draw:frame>"#,
    r#"<presentation:notes><draw:frame presentation:class="notes"><draw:text-box>"#,
    r#"<text:p>Hello</text:p><text:p/><text:p>World</text:p>"#,
    r#"</draw:text-box></draw:frame></presentation:notes>"#,
    r#"</draw:page>"#,
    r#"<draw:page draw:name="page2"></draw:page>"#,
    r#"</office:presentation></office:body>"#,
    r#"</office:document-content>"#
);

/// Write an ODF-style package with the given members.
fn write_package(dir: &Path, name: &str, mimetype: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    let file = std::fs::File::create(&path).unwrap();
    let mut zip = ZipWriter::new(file);

    let stored = FileOptions::default().compression_method(CompressionMethod::Stored);
    zip.start_file("mimetype", stored).unwrap();
    zip.write_all(mimetype.as_bytes()).unwrap();

    zip.start_file("content.xml", FileOptions::default()).unwrap();
    zip.write_all(content.as_bytes()).unwrap();

    zip.finish().unwrap();
    path
}

fn run(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_odp-notes"))
        .args(args)
        .output()
        .expect("failed to run odp-notes")
}

fn stdout(output: &Output) -> String {
    String::from_utf8(output.stdout.clone()).unwrap()
}

#[test]
fn test_bracketed_output() {
    let dir = TempDir::new().unwrap();
    let path = write_package(dir.path(), "talk.odp", ODP_MIME, HELLO_WORLD_CONTENT);

    let output = run(&[path.to_str().unwrap()]);

    assert!(output.status.success());
    assert_eq!(
        stdout(&output),
        concat!(
            "<!-- page 1 start -->\n",
            "Hello\n",
            "World\n",
            "<!-- page 1 end -->\n",
            "<!-- page 2 start -->\n",
            "<!-- page 2 end -->\n",
        )
    );
}

#[test]
fn test_speech_output() {
    let dir = TempDir::new().unwrap();
    let path = write_package(dir.path(), "talk.odp", ODP_MIME, HELLO_WORLD_CONTENT);

    let output = run(&["--speech", path.to_str().unwrap()]);

    assert!(output.status.success());
    assert_eq!(
        stdout(&output),
        concat!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n",
            "<speak version=\"1.1\" xmlns=\"http://www.w3.org/2001/10/synthesis\">\n",
            "Hello\n",
            "World\n",
            "</speak>\n",
        )
    );
}

#[test]
fn test_output_is_stable_across_runs() {
    let dir = TempDir::new().unwrap();
    let path = write_package(dir.path(), "talk.odp", ODP_MIME, HELLO_WORLD_CONTENT);

    let first = run(&[path.to_str().unwrap()]);
    let second = run(&[path.to_str().unwrap()]);

    assert_eq!(first.stdout, second.stdout);
}

#[test]
fn test_unsupported_mimetype_exits_with_2() {
    let dir = TempDir::new().unwrap();
    let path = write_package(
        dir.path(),
        "letter.odt",
        "application/vnd.oasis.opendocument.text",
        HELLO_WORLD_CONTENT,
    );

    let output = run(&[path.to_str().unwrap()]);

    assert_eq!(output.status.code(), Some(2));
    assert!(output.stdout.is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Unsupported file format"));
}

#[test]
fn test_template_is_accepted() {
    let dir = TempDir::new().unwrap();
    let path = write_package(
        dir.path(),
        "talk.otp",
        "application/vnd.oasis.opendocument.presentation-template",
        HELLO_WORLD_CONTENT,
    );

    let output = run(&[path.to_str().unwrap()]);

    assert!(output.status.success());
    assert!(stdout(&output).contains("Hello\nWorld\n"));
}

#[test]
fn test_malformed_content_fails() {
    let dir = TempDir::new().unwrap();
    let path = write_package(dir.path(), "broken.odp", ODP_MIME, "<office:document-content><draw:page>");

    let output = run(&[path.to_str().unwrap()]);

    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
}

#[test]
fn test_missing_file_fails() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("nope.odp");

    let output = run(&[missing.to_str().unwrap()]);

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("nope.odp"));
}

#[test]
fn test_not_a_zip_fails() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("plain.odp");
    std::fs::write(&path, "just text").unwrap();

    let output = run(&[path.to_str().unwrap()]);

    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
}

#[test]
fn test_output_to_file() {
    let dir = TempDir::new().unwrap();
    let path = write_package(dir.path(), "talk.odp", ODP_MIME, HELLO_WORLD_CONTENT);
    let out_path = dir.path().join("notes.txt");

    let output = run(&["-o", out_path.to_str().unwrap(), path.to_str().unwrap()]);

    assert!(output.status.success());
    assert!(output.stdout.is_empty());
    let written = std::fs::read_to_string(&out_path).unwrap();
    assert!(written.starts_with("<!-- page 1 start -->\nHello\n"));
}

#[test]
fn test_json_output() {
    let dir = TempDir::new().unwrap();
    let path = write_package(dir.path(), "talk.odp", ODP_MIME, HELLO_WORLD_CONTENT);

    let output = run(&["--json", path.to_str().unwrap()]);

    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("\"paragraphs\""));
    assert!(text.contains("\"Hello\""));
    assert!(text.contains("\"number\": 2"));
}

#[test]
fn test_verbose_reports_on_stderr_only() {
    let dir = TempDir::new().unwrap();
    let path = write_package(dir.path(), "talk.odp", ODP_MIME, HELLO_WORLD_CONTENT);

    let quiet = run(&[path.to_str().unwrap()]);
    let verbose = run(&["-v", path.to_str().unwrap()]);

    assert!(verbose.status.success());
    assert_eq!(quiet.stdout, verbose.stdout);
    assert!(quiet.stderr.is_empty());
    let stderr = String::from_utf8_lossy(&verbose.stderr);
    assert!(stderr.contains("Processing:"));
    assert!(stderr.contains("Extracted 2 notes paragraphs from 2 pages"));
}
