#![cfg(feature = "export-server")]

use std::io::{BufRead, BufReader, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::mpsc::{self, Receiver};
use std::thread;
use std::time::Duration;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use highcharts_rs::export::{ExportFormat, ExportRequest, ExportServer, ExportServerConfig};
use highcharts_rs::options::Options;
use highcharts_rs::{CallbackFunction, Chart, ChartConstructor, ChartError};

const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\nfake-image";

struct CapturedRequest {
    request_line: String,
    headers: Vec<(String, String)>,
    body: Vec<u8>,
}

impl CapturedRequest {
    fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).expect("json body")
    }
}

/// Answers one connection per scripted response, then stops.
fn serve(responses: Vec<(u16, Vec<u8>)>) -> (u16, Receiver<CapturedRequest>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind stub server");
    let port = listener.local_addr().expect("local addr").port();
    let (sender, receiver) = mpsc::channel();

    thread::spawn(move || {
        for (status, body) in responses {
            let Ok((mut stream, _)) = listener.accept() else {
                return;
            };
            let captured = read_request(&stream);
            let head = format!(
                "HTTP/1.1 {status} Stub\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                body.len()
            );
            let _ = stream.write_all(head.as_bytes());
            let _ = stream.write_all(&body);
            let _ = stream.flush();
            let _ = sender.send(captured);
        }
    });

    (port, receiver)
}

fn read_request(stream: &TcpStream) -> CapturedRequest {
    let mut reader = BufReader::new(stream);
    let mut request_line = String::new();
    reader.read_line(&mut request_line).expect("request line");

    let mut headers = Vec::new();
    loop {
        let mut line = String::new();
        reader.read_line(&mut line).expect("header line");
        let line = line.trim_end();
        if line.is_empty() {
            break;
        }
        if let Some((name, value)) = line.split_once(':') {
            headers.push((name.trim().to_owned(), value.trim().to_owned()));
        }
    }

    let length = headers
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.parse::<usize>().ok())
        .unwrap_or(0);
    let mut body = vec![0; length];
    reader.read_exact(&mut body).expect("request body");

    CapturedRequest {
        request_line: request_line.trim_end().to_owned(),
        headers,
        body,
    }
}

fn next_request(receiver: &Receiver<CapturedRequest>) -> CapturedRequest {
    receiver
        .recv_timeout(Duration::from_secs(5))
        .expect("captured request")
}

fn server(port: u16) -> ExportServer {
    ExportServer::new(ExportServerConfig::local(port)).expect("export server")
}

#[test]
fn export_posts_payload_and_returns_bytes() {
    let (port, requests) = serve(vec![(200, PNG_BYTES.to_vec())]);

    let chart = server(port)
        .request_chart(&ExportRequest::new(Options::new().with_title("Export")))
        .expect("export chart");
    assert_eq!(chart.bytes, PNG_BYTES);
    assert_eq!(chart.format, ExportFormat::Png);
    assert_eq!(chart.mime(), "image/png");

    let request = next_request(&requests);
    assert!(request.request_line.starts_with("POST / "));
    assert!(request
        .header("content-type")
        .is_some_and(|value| value.starts_with("application/json")));
    let payload = request.json();
    assert_eq!(payload["infile"]["title"]["text"], "Export");
    assert_eq!(payload["type"], "png");
    assert_eq!(payload["constr"], "chart");
    assert!(payload.get("async").is_none());
}

#[test]
fn base64_responses_are_decoded() {
    let encoded = format!("{}\n", STANDARD.encode(PNG_BYTES));
    let (port, requests) = serve(vec![(200, encoded.into_bytes())]);

    let chart = server(port)
        .request_chart(&ExportRequest::new(Options::new()).with_base64(true))
        .expect("export chart");
    assert_eq!(chart.bytes, PNG_BYTES);
    assert_eq!(chart.to_base64(), STANDARD.encode(PNG_BYTES));
    assert_eq!(next_request(&requests).json()["b64"], true);
}

#[test]
fn async_rendering_fetches_the_returned_location() {
    let (port, requests) = serve(vec![
        (200, b"files/chart.svg".to_vec()),
        (200, b"<svg/>".to_vec()),
    ]);

    let chart = server(port)
        .request_chart(
            &ExportRequest::new(Options::new())
                .with_format(ExportFormat::Svg)
                .with_async_rendering(true),
        )
        .expect("export chart");
    assert_eq!(chart.bytes, b"<svg/>");

    let post = next_request(&requests);
    assert_eq!(post.json()["async"], true);
    assert_eq!(post.json()["type"], "svg");
    let get = next_request(&requests);
    assert!(get.request_line.starts_with("GET /files/chart.svg "));
}

#[test]
fn async_locations_resolve_below_the_configured_path() {
    let (port, requests) = serve(vec![
        (200, b"files/chart.svg".to_vec()),
        (200, b"<svg/>".to_vec()),
    ]);
    let server = ExportServer::new(ExportServerConfig::local(port).with_path("/export"))
        .expect("export server");

    let chart = server
        .request_chart(
            &ExportRequest::new(Options::new())
                .with_format(ExportFormat::Svg)
                .with_async_rendering(true),
        )
        .expect("export chart");
    assert_eq!(chart.bytes, b"<svg/>");

    let post = next_request(&requests);
    assert!(post.request_line.starts_with("POST /export "));
    let get = next_request(&requests);
    assert!(get.request_line.starts_with("GET /export/files/chart.svg "));
}

#[test]
fn server_errors_carry_status_and_message() {
    let (port, _requests) = serve(vec![(500, b"render failed".to_vec())]);

    let error = server(port)
        .request_chart(&ExportRequest::new(Options::new()))
        .expect_err("server error");
    match error {
        ChartError::ExportServer { status, message } => {
            assert_eq!(status, 500);
            assert_eq!(message, "render failed");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn credentials_and_referer_are_sent() {
    let (port, requests) = serve(vec![(200, PNG_BYTES.to_vec())]);
    let config = ExportServerConfig::local(port)
        .with_basic_auth("user", "secret")
        .with_referer("https://charts.example.com");

    ExportServer::new(config)
        .expect("export server")
        .request_chart(&ExportRequest::new(Options::new()))
        .expect("export chart");

    let request = next_request(&requests);
    assert_eq!(
        request.header("authorization"),
        Some(format!("Basic {}", STANDARD.encode("user:secret")).as_str())
    );
    assert_eq!(request.header("referer"), Some("https://charts.example.com"));
    assert_eq!(request.header("origin"), Some("https://charts.example.com"));
}

#[test]
fn exported_chart_is_saved_to_the_requested_file() {
    let (port, _requests) = serve(vec![(200, PNG_BYTES.to_vec())]);
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("chart.png");

    server(port)
        .request_chart(&ExportRequest::new(Options::new()).with_filename(&path))
        .expect("export chart");
    assert_eq!(std::fs::read(&path).expect("saved chart"), PNG_BYTES);
}

#[test]
fn chart_download_uses_its_constructor_and_callback() {
    let (port, requests) = serve(vec![(200, PNG_BYTES.to_vec())]);
    let chart = Chart::from_options(Options::new().with_title("Stock"))
        .with_constructor(ChartConstructor::StockChart)
        .with_callback(CallbackFunction::new(["chart"], "chart.redraw();").expect("callback"));

    chart
        .download_chart(
            ExportRequest::default().with_format(ExportFormat::Jpeg).with_scale(2.0),
            Some(&server(port)),
        )
        .expect("download chart");

    let payload = next_request(&requests).json();
    assert_eq!(payload["constr"], "stockChart");
    assert_eq!(payload["type"], "jpeg");
    assert_eq!(payload["scale"], 2.0);
    assert_eq!(payload["infile"]["title"]["text"], "Stock");
    assert_eq!(
        payload["callback"],
        "function(chart) {\n  chart.redraw();\n}"
    );
}

#[test]
fn unreachable_server_is_an_http_error() {
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        listener.local_addr().expect("local addr").port()
    };

    let error = server(port)
        .request_chart(&ExportRequest::new(Options::new()))
        .expect_err("connection refused");
    assert!(matches!(error, ChartError::Http(_)));
}

#[test]
fn invalid_requests_never_reach_the_server() {
    let error = server(9)
        .request_chart(&ExportRequest::new(Options::new()).with_scale(10.0))
        .expect_err("scale too large");
    assert!(matches!(error, ChartError::InvalidValue { .. }));
}
