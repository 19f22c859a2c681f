#![allow(dead_code)]

use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;
use std::thread::{self, JoinHandle};

/// Serves exactly one HTTP/1.1 response on a loopback port.
pub struct OneShotServer {
    pub url: String,
    handle: JoinHandle<String>,
}

impl OneShotServer {
    pub fn start(status: u16, reason: &str, body: Vec<u8>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind loopback");
        let addr = listener.local_addr().expect("local addr");
        let reason = reason.to_string();

        let handle = thread::spawn(move || {
            let (stream, _) = listener.accept().expect("accept");
            let mut reader = BufReader::new(stream.try_clone().expect("clone stream"));

            let mut request_line = String::new();
            reader.read_line(&mut request_line).expect("request line");
            loop {
                let mut line = String::new();
                if reader.read_line(&mut line).expect("header line") == 0 || line == "\r\n" {
                    break;
                }
            }

            let mut stream = stream;
            write!(
                stream,
                "HTTP/1.1 {} {}\r\nContent-Type: application/octet-stream\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                status,
                reason,
                body.len()
            )
            .expect("write head");
            stream.write_all(&body).expect("write body");
            stream.flush().expect("flush");

            request_line
        });

        Self {
            url: format!("http://{}", addr),
            handle,
        }
    }

    pub fn ok(body: Vec<u8>) -> Self {
        Self::start(200, "OK", body)
    }

    pub fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.url, path)
    }

    /// Waits for the request and returns its request line.
    pub fn finish(self) -> String {
        self.handle.join().expect("server thread")
    }
}

pub fn payload(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i * 31 % 256) as u8).collect()
}
