//! In-process stand-in for the InfluxDB `/write` endpoint.

#![allow(dead_code)]

use std::io::{BufRead, BufReader, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;

/// A request as seen by the fake write endpoint.
#[derive(Debug, Clone)]
pub struct Received {
    pub request_line: String,
    pub content_type: Option<String>,
    pub body: String,
}

/// Minimal HTTP/1.1 server standing in for the InfluxDB write endpoint.
///
/// `respond` maps the 0-based request index to a status line and body.
pub struct FakeEndpoint {
    port: u16,
    received: Arc<Mutex<Vec<Received>>>,
}

impl FakeEndpoint {
    pub fn start<F>(respond: F) -> Self
    where
        F: Fn(usize) -> (u16, &'static str, String) + Send + 'static,
    {
        Self::start_raw(move |index| {
            let (status, reason, body) = respond(index);
            response(status, reason, &body)
        })
    }

    /// Like [`FakeEndpoint::start`], but `respond` returns the raw bytes
    /// written back on the socket.
    pub fn start_raw<F>(respond: F) -> Self
    where
        F: Fn(usize) -> String + Send + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        let received = Arc::new(Mutex::new(vec![]));

        let log = received.clone();
        thread::spawn(move || {
            for (index, stream) in listener.incoming().enumerate() {
                let Ok(stream) = stream else { break };
                let request = read_request(&stream);
                log.lock().unwrap().push(request);
                let mut stream = stream;
                stream.write_all(respond(index).as_bytes()).unwrap();
                stream.flush().unwrap();
            }
        });

        Self { port, received }
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn url(&self) -> String {
        format!("http://127.0.0.1:{}/write?db=testdb", self.port)
    }

    pub fn received(&self) -> Vec<Received> {
        self.received.lock().unwrap().clone()
    }
}

fn read_request(stream: &TcpStream) -> Received {
    let mut reader = BufReader::new(stream);

    let mut request_line = String::new();
    reader.read_line(&mut request_line).unwrap();

    let mut content_length = None;
    let mut content_type = None;
    let mut chunked = false;
    loop {
        let mut line = String::new();
        reader.read_line(&mut line).unwrap();
        let line = line.trim_end();
        if line.is_empty() {
            break;
        }
        let (name, value) = line.split_once(':').unwrap();
        let value = value.trim();
        match name.to_ascii_lowercase().as_str() {
            "content-length" => content_length = Some(value.parse::<usize>().unwrap()),
            "content-type" => content_type = Some(value.to_owned()),
            "transfer-encoding" => chunked = value.eq_ignore_ascii_case("chunked"),
            _ => {}
        }
    }

    let mut body = vec![];
    if chunked {
        loop {
            let mut size = String::new();
            reader.read_line(&mut size).unwrap();
            let size = usize::from_str_radix(size.trim(), 16).unwrap();
            let mut chunk = vec![0; size + 2];
            reader.read_exact(&mut chunk).unwrap();
            if size == 0 {
                break;
            }
            body.extend_from_slice(&chunk[..size]);
        }
    } else if let Some(length) = content_length {
        body.resize(length, 0);
        reader.read_exact(&mut body).unwrap();
    }

    Received {
        request_line: request_line.trim_end().to_owned(),
        content_type,
        body: String::from_utf8(body).unwrap(),
    }
}

pub fn response(status: u16, reason: &str, body: &str) -> String {
    if status == 204 {
        format!("HTTP/1.1 {} {}\r\nConnection: close\r\n\r\n", status, reason)
    } else {
        format!(
            "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            reason,
            body.len(),
            body
        )
    }
}

pub fn no_content(_: usize) -> (u16, &'static str, String) {
    (204, "No Content", String::new())
}

