use chardetng::EncodingDetector;
use http::{StatusCode, Uri};
use openssl::ssl::{SslConnector, SslMethod};
use std::{
    borrow::Cow,
    collections::HashMap,
    io::{BufRead, BufReader, Read, Write},
    net::TcpStream,
    str,
};
use tracing::debug;

use super::state::ReadyState;
use crate::error::FetchError;

const DETECT_STEP: usize = 100;
const USER_AGENT: &str = concat!("recommendlet-client/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Default)]
pub struct Response {
    pub status: StatusCode,
    pub headers: HashMap<String, String>,
    pub body: Vec<u8>,
}

impl Response {
    pub fn body_to_string(&self) -> Result<Cow<str>, FetchError> {
        match str::from_utf8(&self.body) {
            Ok(body) => Ok(Cow::Borrowed(body)),
            Err(_) => {
                let mut guess_detector = EncodingDetector::new();
                let mut body_iter = self.body.chunks(DETECT_STEP).peekable();
                while let Some(part) = body_iter.next() {
                    let finished = body_iter.peek().is_none();
                    let meet_non_ascii = guess_detector.feed(part, finished);
                    if !meet_non_ascii {
                        continue;
                    }
                    let guess_charset = guess_detector.guess(None, false);
                    let (body_str, _, has_error) = guess_charset.decode(&self.body);
                    if !has_error {
                        debug!(charset = guess_charset.name(), "decoded non utf-8 body");
                        return Ok(body_str);
                    }
                }
                Err(FetchError::UndetectableCharset)
            }
        }
    }

    /// Keeps only 2xx responses; anything else becomes a `Status` error
    /// carrying whatever text the server sent along.
    pub fn error_for_status(self) -> Result<Response, FetchError> {
        if self.status.is_success() {
            return Ok(self);
        }
        let body = self
            .body_to_string()
            .map(Cow::into_owned)
            .unwrap_or_default();
        Err(FetchError::Status {
            status: self.status,
            body,
        })
    }
}

struct Progress<F> {
    state: ReadyState,
    observe: F,
}

impl<F: FnMut(ReadyState)> Progress<F> {
    fn new(mut observe: F) -> Self {
        observe(ReadyState::Unsent);
        Self {
            state: ReadyState::Unsent,
            observe,
        }
    }

    fn advance(&mut self, next: ReadyState) {
        debug!(from = %self.state, to = %next, "ready state change");
        self.state = next;
        (self.observe)(next);
    }
}

pub fn get(url: &str) -> Result<Response, FetchError> {
    get_observed(url, |_| {})
}

/// Runs a GET, reporting each ready state to `observe` as it is reached.
pub fn get_observed<F: FnMut(ReadyState)>(url: &str, observe: F) -> Result<Response, FetchError> {
    let mut progress = Progress::new(observe);

    let uri: Uri = url.parse().map_err(|e: http::uri::InvalidUri| FetchError::InvalidUrl {
        url: url.to_string(),
        reason: e.to_string(),
    })?;
    let schema = uri.scheme_str().unwrap_or("https");
    let port = match schema {
        "http" => 80,
        "https" => 443,
        other => return Err(FetchError::UnsupportedScheme(other.to_string())),
    };
    let host = uri.host().ok_or_else(|| FetchError::InvalidUrl {
        url: url.to_string(),
        reason: "missing host".to_string(),
    })?;
    // `Uri::host` keeps the brackets of an IPv6 literal.
    let host = host.trim_start_matches('[').trim_end_matches(']');
    let port = uri.port_u16().unwrap_or(port);
    let authority = uri
        .authority()
        .map(|authority| authority.as_str())
        .unwrap_or(host);
    let path = uri
        .path_and_query()
        .map(|path| path.as_str())
        .unwrap_or("/");

    let s = TcpStream::connect((host, port))?;
    match schema {
        "http" => {
            progress.advance(ReadyState::Opened);
            online_access(s, authority, path, &mut progress)
        }
        _ => {
            let s = SslConnector::builder(SslMethod::tls())?
                .build()
                .connect(host, s)?;
            progress.advance(ReadyState::Opened);
            online_access(s, authority, path, &mut progress)
        }
    }
}

fn online_access<S: Read + Write, F: FnMut(ReadyState)>(
    mut s: S,
    authority: &str,
    path: &str,
    progress: &mut Progress<F>,
) -> Result<Response, FetchError> {
    s.write_all(
        format!(
            "GET {} HTTP/1.0\r\nHost: {}\r\nConnection: close\r\nUser-Agent: {}\r\n\r\n",
            path, authority, USER_AGENT
        )
        .as_bytes(),
    )?;
    s.flush()?;
    progress.advance(ReadyState::Sent);

    let mut reader = BufReader::new(s);
    let mut buf = String::new();
    reader.read_line(&mut buf)?;
    let status = parse_status_line(&buf)?;
    progress.advance(ReadyState::Receiving);

    let mut headers: HashMap<String, String> = HashMap::new();
    for line in reader.by_ref().lines() {
        let line = line?;
        if line.is_empty() {
            break;
        }
        let (header, value) = parse_header(&line)?;
        headers.insert(header, value);
    }
    let mut body: Vec<u8> = Vec::new();
    reader.read_to_end(&mut body)?;
    progress.advance(ReadyState::Done);

    Ok(Response {
        status,
        headers,
        body,
    })
}

fn parse_status_line(line: &str) -> Result<StatusCode, FetchError> {
    let malformed = || FetchError::MalformedStatusLine(line.trim_end().to_string());
    let (version, rest) = line.trim_end().split_once(' ').ok_or_else(malformed)?;
    if !version.starts_with("HTTP/") {
        return Err(malformed());
    }
    let status = rest.split(' ').next().unwrap_or_default();
    StatusCode::from_bytes(status.as_bytes()).map_err(|_| malformed())
}

fn parse_header(line: &str) -> Result<(String, String), FetchError> {
    let (header, value) = line
        .split_once(':')
        .ok_or_else(|| FetchError::MalformedHeader(line.to_string()))?;
    Ok((header.trim().to_lowercase(), value.trim().to_string()))
}
