//! Minimal HTTP/1.1 server that stands in for the traffic API in integration tests.
//!
//! Each route maps a request path to a canned status and body. Unknown paths
//! get 404. A stalled route reads the request and never answers. Raw request
//! heads are recorded so tests can assert on headers.

use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Route {
    pub status: u16,
    pub body: String,
    pub stall: bool,
}

impl Route {
    pub fn ok(body: &str) -> Self {
        Self {
            status: 200,
            body: body.to_string(),
            stall: false,
        }
    }

    pub fn status(status: u16, body: &str) -> Self {
        Self {
            status,
            body: body.to_string(),
            stall: false,
        }
    }

    /// Accepts the request and holds the connection open without replying.
    pub fn stall() -> Self {
        Self {
            status: 200,
            body: String::new(),
            stall: true,
        }
    }
}

pub struct TrafficServer {
    pub base_url: String,
    requests: Arc<Mutex<Vec<String>>>,
}

impl TrafficServer {
    /// Raw request heads received so far.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

/// Starts a server in a background thread. Returns once it is listening;
/// the server runs until the process exits.
pub fn start(routes: HashMap<String, Route>) -> TrafficServer {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let routes = Arc::new(routes);
    let requests = Arc::new(Mutex::new(Vec::new()));
    let log = Arc::clone(&requests);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let routes = Arc::clone(&routes);
            let log = Arc::clone(&log);
            thread::spawn(move || handle(stream, &routes, &log));
        }
    });
    TrafficServer {
        base_url: format!("http://127.0.0.1:{}", port),
        requests,
    }
}

fn handle(mut stream: std::net::TcpStream, routes: &HashMap<String, Route>, log: &Mutex<Vec<String>>) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(2)));
    let mut buf = [0u8; 8192];
    let n = match stream.read(&mut buf) {
        Ok(0) => return,
        Ok(n) => n,
        Err(_) => return,
    };
    let request = match std::str::from_utf8(&buf[..n]) {
        Ok(s) => s.to_string(),
        Err(_) => return,
    };
    let path = request
        .lines()
        .next()
        .and_then(|l| l.split_whitespace().nth(1))
        .unwrap_or("/")
        .to_string();
    log.lock().unwrap().push(request);

    let route = routes
        .get(&path)
        .cloned()
        .unwrap_or_else(|| Route::status(404, r#"{"message":"Not Found"}"#));
    if route.stall {
        thread::sleep(Duration::from_secs(10));
        return;
    }
    let response = format!(
        "HTTP/1.1 {} X\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        route.status,
        route.body.len(),
        route.body
    );
    let _ = stream.write_all(response.as_bytes());
}
