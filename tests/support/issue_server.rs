use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex, mpsc};
use std::thread;

use url::Url;

/// One request as seen by the fake issues endpoint.
#[derive(Clone, Debug)]
pub struct RecordedRequest {
    pub request_line: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).expect("request body is JSON")
    }
}

/// Local stand-in for the GitHub issues endpoint.
pub struct IssueServer {
    endpoint: Url,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl IssueServer {
    /// Answer every request immediately with `status_line`.
    pub fn start(status_line: &'static str) -> Self {
        Self::spawn(status_line, None)
    }

    /// Record requests but hold each response until the sender is signalled.
    pub fn start_held(status_line: &'static str) -> (Self, mpsc::Sender<()>) {
        let (tx, rx) = mpsc::channel();
        (Self::spawn(status_line, Some(rx)), tx)
    }

    pub fn endpoint(&self) -> Url {
        self.endpoint.clone()
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    fn spawn(status_line: &'static str, release: Option<mpsc::Receiver<()>>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let requests = Arc::new(Mutex::new(Vec::new()));
        let recorded = Arc::clone(&requests);
        thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(mut stream) = stream else { continue };
                let request = read_request(&mut stream);
                recorded.lock().unwrap().push(request);
                if let Some(release) = &release {
                    let _ = release.recv();
                }
                let body = "{}";
                let response = format!(
                    "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                    body.len()
                );
                let _ = stream.write_all(response.as_bytes());
            }
        });
        let endpoint = Url::parse(&format!("http://{addr}/repos/owner/app/issues")).unwrap();
        Self { endpoint, requests }
    }
}

fn read_request(stream: &mut TcpStream) -> RecordedRequest {
    let mut data = Vec::new();
    let mut buf = [0u8; 4096];
    let header_end = loop {
        let read = stream.read(&mut buf).unwrap_or(0);
        if read == 0 {
            break data.len();
        }
        data.extend_from_slice(&buf[..read]);
        if let Some(pos) = data.windows(4).position(|window| window == b"\r\n\r\n") {
            break pos;
        }
    };
    let head = String::from_utf8_lossy(&data[..header_end]).into_owned();
    let mut lines = head.split("\r\n");
    let request_line = lines.next().unwrap_or_default().to_string();
    let headers: Vec<(String, String)> = lines
        .filter_map(|line| line.split_once(':'))
        .map(|(name, value)| (name.trim().to_string(), value.trim().to_string()))
        .collect();
    let length = headers
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.parse::<usize>().ok())
        .unwrap_or(0);

    let body_start = (header_end + 4).min(data.len());
    let mut body = data[body_start..].to_vec();
    while body.len() < length {
        let read = stream.read(&mut buf).unwrap_or(0);
        if read == 0 {
            break;
        }
        body.extend_from_slice(&buf[..read]);
    }
    RecordedRequest {
        request_line,
        headers,
        body: String::from_utf8_lossy(&body).into_owned(),
    }
}
