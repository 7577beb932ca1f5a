//! A throwaway HTTP/1.1 server that answers with canned responses, one per connection.

#![allow(dead_code)]

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;

use access_map::settings::Settings;

#[derive(Clone, Debug)]
pub struct Canned {
    pub status: u16,
    pub content_type: &'static str,
    pub body: String,
    /// Content-Length to announce, when it should not match the body.
    pub declared_len: Option<usize>,
}

impl Canned {
    pub fn csv(body: &str) -> Self {
        Canned {
            status: 200,
            content_type: "text/csv",
            body: body.to_string(),
            declared_len: None,
        }
    }

    pub fn json(body: &str) -> Self {
        Canned {
            status: 200,
            content_type: "application/json",
            body: body.to_string(),
            declared_len: None,
        }
    }

    pub fn html(status: u16, body: &str) -> Self {
        Canned {
            status,
            content_type: "text/html",
            body: body.to_string(),
            declared_len: None,
        }
    }

    /// Announces more bytes than it sends, then closes the connection.
    pub fn truncated(status: u16, body: &str) -> Self {
        Canned {
            declared_len: Some(body.len() + 512),
            ..Canned::html(status, body)
        }
    }
}

#[derive(Clone, Debug)]
pub struct Recorded {
    pub method: String,
    pub target: String,
    pub body: String,
}

pub struct MockServer {
    port: u16,
    requests: Arc<Mutex<Vec<Recorded>>>,
}

impl MockServer {
    /// Serves `responses` in order. Once they are used up the listener closes.
    pub fn start(responses: Vec<Canned>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        let requests = Arc::new(Mutex::new(Vec::new()));
        let recorded = requests.clone();

        thread::spawn(move || {
            for canned in responses {
                let Ok((mut stream, _)) = listener.accept() else {
                    return;
                };
                if let Some(request) = read_request(&mut stream) {
                    recorded.lock().unwrap().push(request);
                }
                write_response(&mut stream, &canned);
            }
        });

        MockServer { port, requests }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://127.0.0.1:{}{}", self.port, path)
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }
}

fn read_request(stream: &mut TcpStream) -> Option<Recorded> {
    let mut data = Vec::new();
    let mut buf = [0u8; 4096];

    let header_end = loop {
        let n = stream.read(&mut buf).ok()?;
        if n == 0 {
            return None;
        }
        data.extend_from_slice(&buf[..n]);
        if let Some(pos) = data.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&data[..header_end]).to_string();
    let mut lines = head.lines();
    let mut request_line = lines.next()?.split_whitespace();
    let method = request_line.next()?.to_string();
    let target = request_line.next()?.to_string();

    let content_length = lines
        .filter_map(|line| line.split_once(':'))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.trim().parse::<usize>().ok())
        .unwrap_or(0);

    while data.len() < header_end + content_length {
        let n = stream.read(&mut buf).ok()?;
        if n == 0 {
            break;
        }
        data.extend_from_slice(&buf[..n]);
    }
    let body = String::from_utf8_lossy(&data[header_end..]).to_string();

    Some(Recorded {
        method,
        target,
        body,
    })
}

fn write_response(stream: &mut TcpStream, canned: &Canned) {
    let response = format!(
        "HTTP/1.1 {} Mock\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        canned.status,
        canned.content_type,
        canned.declared_len.unwrap_or(canned.body.len()),
        canned.body
    );
    let _ = stream.write_all(response.as_bytes());
    let _ = stream.flush();
}

/// Settings pointing at local mock servers, with fast retries.
pub fn settings_for(overpass_url: &str, nominatim_url: &str) -> Settings {
    Settings {
        overpass_url: overpass_url.to_string(),
        nominatim_url: nominatim_url.to_string(),
        http_timeout_secs: 10,
        max_retries: 2,
        retry_delay_secs: 0,
        ..Default::default()
    }
}

/// A port nothing listens on.
pub fn closed_port_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{port}/api/interpreter")
}
