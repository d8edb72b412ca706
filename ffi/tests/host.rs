//! Drive the C surface the way a mobile host would.
//!
//! # Design
//! Starts the mock server on a random port, builds every request through
//! `task_build_request`, executes it with ureq (standing in for the host's
//! networking stack), and classifies the answer through
//! `task_classify_response`. The test keeps the token itself, as a host
//! with its own secure storage would.

use std::ffi::{CStr, CString};
use std::os::raw::c_char;

use task_ffi::types::{FfiErrorKind, FfiHttpMethod, FfiHttpRequest, FfiHttpResponse, FfiTaskClient};
use task_ffi::*;

fn read(ptr: *const c_char) -> String {
    unsafe { CStr::from_ptr(ptr) }.to_str().unwrap().to_string()
}

fn start_server() -> String {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener).await
        })
        .unwrap();
    });

    format!("http://{addr}")
}

fn with_headers<B>(mut builder: ureq::RequestBuilder<B>, req: &FfiHttpRequest) -> ureq::RequestBuilder<B> {
    if req.headers.is_null() {
        return builder;
    }
    for h in unsafe { std::slice::from_raw_parts(req.headers, req.headers_len as usize) } {
        builder = builder.header(read(h.key).as_str(), read(h.value).as_str());
    }
    builder
}

/// Execute an `FfiHttpRequest` with ureq. Statuses are returned as data.
fn execute(req: &FfiHttpRequest) -> (u16, String) {
    let agent: ureq::Agent = ureq::Agent::config_builder()
        .http_status_as_error(false)
        .build()
        .new_agent();
    let url = read(req.url);
    let body = read(req.body);

    let mut response = match req.method {
        FfiHttpMethod::Get => with_headers(agent.get(&url), req).call(),
        FfiHttpMethod::Delete => with_headers(agent.delete(&url), req).call(),
        FfiHttpMethod::Post => with_headers(agent.post(&url), req).send(body.as_bytes()),
        FfiHttpMethod::Put => with_headers(agent.put(&url), req).send(body.as_bytes()),
    }
    .expect("HTTP transport error");

    let status = response.status().as_u16();
    let body = response.body_mut().read_to_string().unwrap_or_default();
    (status, body)
}

struct Answer {
    kind: FfiErrorKind,
    value: serde_json::Value,
    clear_credential: bool,
    navigate_to: Option<String>,
}

/// Build, execute and classify one call, freeing everything afterwards.
fn round_trip(client: *const FfiTaskClient, method: i32, path: &str, body: Option<&str>, token: Option<&str>) -> Answer {
    let path = CString::new(path).unwrap();
    let body = body.map(|b| CString::new(b).unwrap());
    let token = token.map(|t| CString::new(t).unwrap());
    let req = task_build_request(
        client,
        method,
        path.as_ptr(),
        body.as_ref().map_or(std::ptr::null(), |b| b.as_ptr()),
        token.as_ref().map_or(std::ptr::null(), |t| t.as_ptr()),
    );
    assert!(!req.is_null());

    let (status, text) = execute(unsafe { &*req });
    task_free_request(req);

    let text = CString::new(text).unwrap();
    let resp = FfiHttpResponse {
        status,
        body: text.as_ptr(),
    };
    let result = task_classify_response(client, &resp);
    let r = unsafe { &*result };
    let answer = Answer {
        kind: r.error_kind,
        value: if r.value_json.is_null() {
            serde_json::Value::Null
        } else {
            serde_json::from_str(&read(r.value_json)).unwrap()
        },
        clear_credential: r.clear_credential,
        navigate_to: (!r.navigate_to.is_null()).then(|| read(r.navigate_to)),
    };
    task_free_result(result);
    answer
}

#[test]
fn host_session_lifecycle() {
    let base_url = CString::new(start_server()).unwrap();
    let client = task_client_new(base_url.as_ptr());
    assert!(!client.is_null());
    let creds = r#"{"username":"carol","password":"pw"}"#;

    // register + login
    let answer = round_trip(client, 1, "/auth/register", Some(creds), None);
    assert_eq!(answer.kind, FfiErrorKind::Ok);
    let answer = round_trip(client, 1, "/auth/login", Some(creds), None);
    assert_eq!(answer.kind, FfiErrorKind::Ok);
    let token = answer.value["data"]["token"].as_str().unwrap().to_string();

    // authenticated calls
    let answer = round_trip(client, 1, "/task/add", Some(r#"{"title":"Ship it"}"#), Some(&token));
    assert_eq!(answer.kind, FfiErrorKind::Ok);
    assert_eq!(answer.value["data"]["title"], "Ship it");

    let answer = round_trip(client, 0, "/task/count", None, Some(&token));
    assert_eq!(answer.kind, FfiErrorKind::Ok);
    assert_eq!(answer.value["total"], 1);

    // business failure leaves the session alone
    let answer = round_trip(client, 1, "/task/add", Some(r#"{"title":""}"#), Some(&token));
    assert_eq!(answer.kind, FfiErrorKind::BusinessFailure);
    assert!(!answer.clear_credential);

    // unknown endpoint
    let answer = round_trip(client, 0, "/task/archive", None, Some(&token));
    assert_eq!(answer.kind, FfiErrorKind::NotFound);

    // a forged token is rejected and the host is told to clean up
    let answer = round_trip(client, 0, "/task/all", None, Some("forged"));
    assert_eq!(answer.kind, FfiErrorKind::AuthExpired);
    assert!(answer.clear_credential);
    assert_eq!(answer.navigate_to.as_deref(), Some("/pages/login/login"));

    task_client_free(client);
}
