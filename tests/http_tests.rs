//! Tests for the network steps against a local HTTP server
//!
//! These tests verify:
//! - The release index body is returned on 200 and the stage URL is found in it
//! - A non-success index response is a discovery error
//! - The connectivity check accepts any HTTP answer, even 503

use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;
use std::thread;
use std::time::Duration;

use gentoo_installer::error::InstallError;
use gentoo_installer::preflight::check_network;
use gentoo_installer::release::{fetch_index, fetch_latest_url};

const TIMEOUT: Duration = Duration::from_secs(5);

const LISTING: &str = r#"<html><body>
<a href="../">../</a>
<a href="stage3-amd64-openrc-20240101T170000Z.tar.xz.asc">signature</a>
<a href="stage3-amd64-openrc-20240101T170000Z.tar.xz">stage3</a>
</body></html>
"#;

/// Answer a single request with `status` and `body`; returns the server URL
fn serve_once(status: &'static str, body: &'static str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind localhost");
    let addr = listener.local_addr().expect("local addr");

    thread::spawn(move || {
        let Ok((stream, _)) = listener.accept() else {
            return;
        };
        let mut reader = BufReader::new(stream);
        let mut line = String::new();
        // Drain the request head
        while reader.read_line(&mut line).map(|n| n > 0).unwrap_or(false) {
            if line == "\r\n" {
                break;
            }
            line.clear();
        }
        let response = format!(
            "HTTP/1.1 {}\r\nContent-Type: text/html\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        );
        let mut stream = reader.into_inner();
        let _ = stream.write_all(response.as_bytes());
        let _ = stream.flush();
    });

    format!("http://{}/releases/amd64/autobuilds/current-stage3-amd64-openrc/", addr)
}

#[test]
fn test_fetch_index_returns_listing_body() {
    let url = serve_once("200 OK", LISTING);
    let body = fetch_index(&url, TIMEOUT).expect("index served");
    assert_eq!(body, LISTING);
}

#[test]
fn test_fetch_latest_url_joins_first_match() {
    let url = serve_once("200 OK", LISTING);
    let found = fetch_latest_url(&url, &url, "stage3-amd64-openrc", TIMEOUT)
        .expect("stage link present");
    // The signature link comes first in the listing and also matches
    assert_eq!(
        found,
        format!("{}stage3-amd64-openrc-20240101T170000Z.tar.xz.asc", url)
    );
}

#[test]
fn test_fetch_latest_url_without_match_is_discovery_error() {
    let url = serve_once("200 OK", LISTING);
    let err = fetch_latest_url(&url, &url, "stage3-arm64", TIMEOUT).unwrap_err();
    assert!(matches!(err, InstallError::Discovery(_)));
}

#[test]
fn test_fetch_index_not_found_is_discovery_error() {
    let url = serve_once("404 Not Found", "gone");
    let err = fetch_index(&url, TIMEOUT).unwrap_err();
    assert!(matches!(err, InstallError::Discovery(_)));
}

#[test]
fn test_check_network_accepts_server_error() {
    let url = serve_once("503 Service Unavailable", "busy");
    assert!(check_network(&url, TIMEOUT).is_ok());
}

#[test]
fn test_check_network_accepts_ok() {
    let url = serve_once("200 OK", "hello");
    assert!(check_network(&url, TIMEOUT).is_ok());
}
