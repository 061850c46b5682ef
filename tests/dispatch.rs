use recommendlet_client::{
    dispatch, dispatch_into, http::get_observed, load, Endpoint, FetchError, ReadyState,
    RecommendletParams, RenderMode, TextContainer,
};
use std::{
    io::{BufRead, BufReader, Write},
    net::TcpListener,
    sync::{mpsc, Arc, Mutex},
    thread,
};

/// Serves `response` to a single connection and reports the request line.
fn one_shot_server(response: &'static str) -> (u16, mpsc::Receiver<String>) {
    serve_once(TcpListener::bind("127.0.0.1:0").unwrap(), response)
}

fn serve_once(listener: TcpListener, response: &'static str) -> (u16, mpsc::Receiver<String>) {
    let port = listener.local_addr().unwrap().port();
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let (stream, _) = listener.accept().unwrap();
        let mut reader = BufReader::new(stream);
        let mut request_line = String::new();
        reader.read_line(&mut request_line).unwrap();
        loop {
            let mut line = String::new();
            if reader.read_line(&mut line).unwrap() == 0 || line == "\r\n" {
                break;
            }
        }
        let mut stream = reader.into_inner();
        stream.write_all(response.as_bytes()).unwrap();
        tx.send(request_line.trim_end().to_string()).unwrap();
    });
    (port, rx)
}

fn params(port: u16) -> RecommendletParams {
    RecommendletParams::new("127.0.0.1", port, "reg1", "u1").with_max_recommend(5)
}

const SNIPPET: &str = "HTTP/1.0 200 OK\r\nContent-Type: text/html\r\n\r\n<div><b>Item 7</b></div>";

#[test]
fn handler_receives_body() {
    let (port, requests) = one_shot_server(SNIPPET);
    let (tx, rx) = mpsc::channel();
    let request = dispatch(
        &params(port).with_external_item_id("item7").with_rating(4.0),
        Endpoint::Plain,
        move |result| tx.send(result).unwrap(),
    )
    .unwrap();
    request.wait().unwrap();

    let recommendation = rx.recv().unwrap().unwrap();
    assert_eq!(recommendation.body, "<div><b>Item 7</b></div>");
    assert!(rx.try_recv().is_err());

    let request_line = requests.recv().unwrap();
    assert_eq!(
        request_line,
        "GET /recommendlet?host=127.0.0.1&port=".to_string()
            + &port.to_string()
            + "&reg_name=reg1&external_userid=u1&max_recommend=5&external_itemid=item7&rating=4 HTTP/1.0"
    );
}

#[test]
fn json_endpoint_path() {
    let (port, requests) = one_shot_server("HTTP/1.0 200 OK\r\n\r\n{\"items\":[]}");
    let (tx, rx) = mpsc::channel();
    let request = dispatch(&params(port), Endpoint::Json, move |result| {
        tx.send(result).unwrap()
    })
    .unwrap();
    assert!(request.url().contains("/json/recommendlet?"));
    request.wait().unwrap();

    assert_eq!(rx.recv().unwrap().unwrap().body, "{\"items\":[]}");
    assert!(requests.recv().unwrap().starts_with("GET /json/recommendlet?host=127.0.0.1&"));
}

#[test]
fn error_status_is_a_failure() {
    let (port, _requests) = one_shot_server("HTTP/1.0 404 Not Found\r\n\r\nno such recommendlet");
    let (tx, rx) = mpsc::channel();
    dispatch(&params(port), Endpoint::Plain, move |result| {
        tx.send(result).unwrap()
    })
    .unwrap()
    .wait()
    .unwrap();

    match rx.recv().unwrap() {
        Err(FetchError::Status { status, body }) => {
            assert_eq!(status.as_u16(), 404);
            assert_eq!(body, "no such recommendlet");
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn refused_connection_reaches_handler() {
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let (tx, rx) = mpsc::channel();
    dispatch(&params(port), Endpoint::Plain, move |result| {
        tx.send(result).unwrap()
    })
    .unwrap()
    .wait()
    .unwrap();

    assert!(matches!(rx.recv().unwrap(), Err(FetchError::Io(_))));
}

#[test]
fn invalid_params_skip_the_handler() {
    let called = Arc::new(Mutex::new(false));
    let flag = Arc::clone(&called);
    let err = dispatch(
        &RecommendletParams::new("127.0.0.1", 8080, "reg1", ""),
        Endpoint::Plain,
        move |_| *flag.lock().unwrap() = true,
    )
    .unwrap_err();

    assert!(matches!(err, FetchError::InvalidParams(_)));
    assert!(!*called.lock().unwrap());
}

#[test]
fn container_gets_loading_then_body() {
    let (port, _requests) = one_shot_server(SNIPPET);
    let container = Arc::new(Mutex::new(TextContainer::default()));
    let request = dispatch_into(&params(port), Endpoint::Plain, Arc::clone(&container)).unwrap();
    request.wait().unwrap();

    let container = container.lock().unwrap();
    assert_eq!(container.content, "<div><b>Item 7</b></div>");
    assert_eq!(container.writes, 2);
}

#[test]
fn container_shows_failure() {
    let (port, _requests) = one_shot_server("HTTP/1.0 500 Internal Server Error\r\n\r\nboom");
    let container = Arc::new(Mutex::new(TextContainer::default()));
    dispatch_into(&params(port), Endpoint::Plain, Arc::clone(&container))
        .unwrap()
        .wait()
        .unwrap();

    let container = container.lock().unwrap();
    assert!(container.content.contains("500"));
    assert!(container.content.contains("boom"));
}

#[test]
fn container_does_not_keep_placeholder_when_dispatch_fails() {
    let container = Arc::new(Mutex::new(TextContainer::default()));
    let err = dispatch_into(
        &RecommendletParams::new("my host", 8080, "reg1", "u1"),
        Endpoint::Plain,
        Arc::clone(&container),
    )
    .unwrap_err();

    assert!(matches!(err, FetchError::InvalidParams(_)));
    let container = container.lock().unwrap();
    assert_eq!(container.content, err.to_string());
    assert_eq!(container.writes, 2);
}

#[test]
fn ready_states_in_order() {
    let (port, _requests) = one_shot_server(SNIPPET);
    let mut seen = Vec::new();
    let resp = get_observed(&format!("http://127.0.0.1:{port}/recommendlet"), |state| {
        seen.push(state)
    })
    .unwrap();

    assert_eq!(resp.headers.get("content-type").map(String::as_str), Some("text/html"));
    assert_eq!(
        seen,
        vec![
            ReadyState::Unsent,
            ReadyState::Opened,
            ReadyState::Sent,
            ReadyState::Receiving,
            ReadyState::Done,
        ]
    );
}

#[test]
fn ipv6_host_round_trip() {
    let listener = match TcpListener::bind("[::1]:0") {
        Ok(listener) => listener,
        // no IPv6 loopback on this host
        Err(_) => return,
    };
    let (port, requests) = serve_once(listener, SNIPPET);
    let params = RecommendletParams::new("::1", port, "reg1", "u1");
    let (tx, rx) = mpsc::channel();
    let request = dispatch(&params, Endpoint::Plain, move |result| {
        tx.send(result).unwrap()
    })
    .unwrap();
    assert!(request.url().starts_with(&format!("http://[::1]:{port}/recommendlet?")));
    request.wait().unwrap();

    assert_eq!(rx.recv().unwrap().unwrap().body, "<div><b>Item 7</b></div>");
    assert!(requests.recv().unwrap().starts_with("GET /recommendlet?host=%3A%3A1&"));
}

#[test]
fn load_strips_tags() {
    let (port, _requests) = one_shot_server(SNIPPET);
    let text = load(&params(port), Endpoint::Plain, RenderMode::PlainText).unwrap();
    assert_eq!(text, "Item 7");
}
