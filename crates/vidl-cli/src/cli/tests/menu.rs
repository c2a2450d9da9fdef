//! Interactive menu driven from in-memory input.

use crate::cli::commands::run_menu;
use crate::cli::is_interrupted;
use std::fs;
use std::io::{self, BufRead, Cursor, Read};
use std::net::TcpListener;
use std::path::Path;
use vidl_core::config::VidlConfig;
use vidl_core::interrupt::CancelToken;
use vidl_core::pipeline::Pipeline;

fn closed_port_url(path: &str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{port}{path}")
}

fn pipeline(root: &Path) -> Pipeline {
    let config = VidlConfig {
        search_url: closed_port_url("/api/ajax/search"),
        convert_url: closed_port_url("/api/ajax/convert"),
        bulk_file: root.join("file.txt"),
        ..VidlConfig::default()
    };
    Pipeline::new(config, root)
}

fn run(root: &Path, input: &str) -> String {
    let mut out = Vec::new();
    run_menu(&pipeline(root), &mut Cursor::new(input.as_bytes()), &mut out).unwrap();
    String::from_utf8(out).unwrap()
}

#[test]
fn exit_option_leaves_menu() {
    let dir = tempfile::tempdir().unwrap();
    let out = run(dir.path(), "4\n");
    assert!(out.contains("1. Download single video"));
    assert!(out.contains("Exiting..."));
}

#[test]
fn end_of_input_leaves_menu() {
    let dir = tempfile::tempdir().unwrap();
    let out = run(dir.path(), "");
    assert!(out.contains("Enter your choice (1-4)"));
    assert!(!out.contains("Exiting..."));
}

#[test]
fn invalid_choice_reprompts() {
    let dir = tempfile::tempdir().unwrap();
    let out = run(dir.path(), "9\n\nabc\n4\n");
    assert_eq!(out.matches("Invalid choice! Please try again.").count(), 3);
    assert!(out.contains("Exiting..."));
}

#[test]
fn empty_url_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let out = run(dir.path(), "1\n   \n3\n\n4\n");
    assert_eq!(out.matches("Error: URL cannot be empty!").count(), 2);
    assert!(out.contains("Exiting..."));
}

#[test]
fn missing_bulk_file_returns_to_menu() {
    let dir = tempfile::tempdir().unwrap();
    let out = run(dir.path(), "2\n4\n");
    assert!(out.contains("Error in bulk download: cannot read URL list"));
    assert!(out.contains("Exiting..."));
}

#[test]
fn blank_bulk_file_reports_no_urls() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("file.txt"), "\n  \n\n").unwrap();
    let out = run(dir.path(), "2\n4\n");
    assert!(out.contains("No URLs found in"));
    assert!(out.contains("Exiting..."));
}

#[test]
fn debug_view_network_error_returns_to_menu() {
    let dir = tempfile::tempdir().unwrap();
    let out = run(dir.path(), "3\nhttps://youtu.be/abc\n4\n");
    assert!(out.contains("Error in debug mode:"));
    assert!(out.contains("Exiting..."));
}

#[test]
fn failed_single_download_returns_to_menu() {
    let dir = tempfile::tempdir().unwrap();
    let out = run(dir.path(), "1\nhttps://youtu.be/abc\n4\n");
    assert!(out.contains("Processing: https://youtu.be/abc"));
    assert!(out.contains("Error in download: fetching video info failed"));
    assert!(out.contains("Exiting..."));
    assert!(fs::read_dir(dir.path()).unwrap().next().is_none());
}

#[test]
fn bulk_lists_each_url_in_output() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("file.txt"),
        "https://youtu.be/one\n\nhttps://youtu.be/two\n",
    )
    .unwrap();
    let out = run(dir.path(), "2\n4\n");
    assert!(out.contains("Found 2 URLs in"));
    assert!(out.contains("Processing URL 1/2: https://youtu.be/one"));
    assert!(out.contains("Processing URL 2/2: https://youtu.be/two"));
    assert!(out.contains("Bulk download finished: 0 succeeded, 2 failed."));
    assert!(out.contains("Exiting..."));
}

#[test]
fn cancelled_token_ends_menu_as_interrupted() {
    let dir = tempfile::tempdir().unwrap();
    let cancel = CancelToken::new();
    cancel.cancel();
    let pipeline = pipeline(dir.path()).with_cancel(cancel);
    let mut out = Vec::new();

    let err = run_menu(&pipeline, &mut Cursor::new(&b"4\n"[..]), &mut out).unwrap_err();

    assert!(is_interrupted(&err));
    let out = String::from_utf8(out).unwrap();
    assert!(out.contains("Enter your choice (1-4)"));
    assert!(!out.contains("Exiting..."));
}

/// Stdin stand-in whose read is interrupted by Ctrl+C while blocked.
struct CtrlCAtPrompt {
    cancel: CancelToken,
}

impl Read for CtrlCAtPrompt {
    fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
        self.cancel.cancel();
        Err(io::Error::from(io::ErrorKind::Interrupted))
    }
}

impl BufRead for CtrlCAtPrompt {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        self.cancel.cancel();
        Err(io::Error::from(io::ErrorKind::Interrupted))
    }

    fn consume(&mut self, _amt: usize) {}
}

#[test]
fn ctrl_c_at_prompt_ends_menu_as_interrupted() {
    let dir = tempfile::tempdir().unwrap();
    let cancel = CancelToken::new();
    let pipeline = pipeline(dir.path()).with_cancel(cancel.clone());
    let mut input = CtrlCAtPrompt { cancel };
    let mut out = Vec::new();

    let err = run_menu(&pipeline, &mut input, &mut out).unwrap_err();

    assert!(is_interrupted(&err));
}

#[test]
fn interrupted_read_without_cancel_is_retried() {
    struct FlakyOnce {
        interrupted: bool,
        rest: Cursor<&'static [u8]>,
    }
    impl Read for FlakyOnce {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            self.rest.read(buf)
        }
    }
    impl BufRead for FlakyOnce {
        fn fill_buf(&mut self) -> io::Result<&[u8]> {
            if !self.interrupted {
                self.interrupted = true;
                return Err(io::Error::from(io::ErrorKind::Interrupted));
            }
            self.rest.fill_buf()
        }
        fn consume(&mut self, amt: usize) {
            self.rest.consume(amt);
        }
    }

    let dir = tempfile::tempdir().unwrap();
    let mut input = FlakyOnce {
        interrupted: false,
        rest: Cursor::new(&b"4\n"[..]),
    };
    let mut out = Vec::new();
    run_menu(&pipeline(dir.path()), &mut input, &mut out).unwrap();
    assert!(String::from_utf8(out).unwrap().contains("Exiting..."));
}

#[test]
fn last_line_without_newline_is_read() {
    let dir = tempfile::tempdir().unwrap();
    let out = run(dir.path(), "9\n4");
    assert!(out.contains("Invalid choice!"));
    assert!(out.contains("Exiting..."));
}
