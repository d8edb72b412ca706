//! C-ABI wrapper around `task-core`.
//!
//! # Overview
//! Exposes the pure half of the request pipeline through `extern "C"`
//! functions: a mobile host builds requests here, executes them with its
//! own networking stack, and hands the answer back for classification. The
//! host owns credential storage, so the token is passed in per call and the
//! side effects (notify, clear credential, navigate) come back as data.
//!
//! # Design
//! - Every `extern "C"` function wraps its body in `catch_unwind` so panics
//!   never cross the FFI boundary.
//! - A single `FfiTaskResult` carries the resolved value or the classified
//!   error together with the effects the host must perform.
//! - The C caller owns all returned pointers and must call the matching
//!   `task_free_*` function to release them.

pub mod types;

use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::panic::catch_unwind;

use task_core::classify::{classify_response, classify_transport_failure};
use task_core::{build_http_request, ClientConfig, HttpResponse, RequestIntent, TransportFailure};

use types::*;

/// Borrow a C string as `&str`. Null and invalid UTF-8 both yield `None`.
fn str_arg<'a>(ptr: *const c_char) -> Option<&'a str> {
    if ptr.is_null() {
        return None;
    }
    unsafe { CStr::from_ptr(ptr) }.to_str().ok()
}

// ---------------------------------------------------------------------------
// Client lifecycle
// ---------------------------------------------------------------------------

/// Create a client bound to `base_url`.
///
/// Returns null if `base_url` is null or if an internal panic occurs.
/// The caller must free the returned pointer with `task_client_free`.
#[unsafe(no_mangle)]
pub extern "C" fn task_client_new(base_url: *const c_char) -> *mut FfiTaskClient {
    catch_unwind(|| {
        let Some(url) = str_arg(base_url) else {
            return std::ptr::null_mut();
        };
        Box::into_raw(Box::new(FfiTaskClient {
            config: ClientConfig::new(url),
        }))
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Free a client created by `task_client_new`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn task_client_free(client: *mut FfiTaskClient) {
    if !client.is_null() {
        let _ = catch_unwind(|| {
            drop(unsafe { Box::from_raw(client) });
        });
    }
}

/// True when `path` is reachable without a session. False for null.
#[unsafe(no_mangle)]
pub extern "C" fn task_is_whitelisted(path: *const c_char) -> bool {
    catch_unwind(|| str_arg(path).is_some_and(task_core::is_whitelisted)).unwrap_or(false)
}

// ---------------------------------------------------------------------------
// Request building
// ---------------------------------------------------------------------------

/// Build the transport parameters for one call.
///
/// `method`: 0 GET, 1 POST, 2 PUT, 3 DELETE, negative for the default (GET).
/// `body_json` may be null (empty object). `token` may be null when there is
/// no session; it is ignored for whitelisted paths.
///
/// Returns null if `client` or `path` is null, `method` is out of range, or
/// `body_json` is not valid JSON. Free with `task_free_request`.
#[unsafe(no_mangle)]
pub extern "C" fn task_build_request(
    client: *const FfiTaskClient,
    method: i32,
    path: *const c_char,
    body_json: *const c_char,
    token: *const c_char,
) -> *mut FfiHttpRequest {
    catch_unwind(|| {
        if client.is_null() {
            return std::ptr::null_mut();
        }
        let client = unsafe { &*client };
        let (Some(path), Some(method)) = (str_arg(path), method_from_raw(method)) else {
            return std::ptr::null_mut();
        };

        let mut intent = RequestIntent::new(path).method(method);
        if !body_json.is_null() {
            let parsed = str_arg(body_json).and_then(|raw| serde_json::from_str(raw).ok());
            match parsed {
                Some(body) => intent = intent.body(body),
                None => return std::ptr::null_mut(),
            }
        }

        let req = build_http_request(&client.config, &intent, str_arg(token));
        FfiHttpRequest::from_core(req)
    })
    .unwrap_or(std::ptr::null_mut())
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

/// Classify a server answer. A null body is treated as empty.
#[unsafe(no_mangle)]
pub extern "C" fn task_classify_response(
    client: *const FfiTaskClient,
    response: *const FfiHttpResponse,
) -> *mut FfiTaskResult {
    catch_unwind(|| {
        if client.is_null() {
            return FfiTaskResult::null_arg("client");
        }
        if response.is_null() {
            return FfiTaskResult::null_arg("response");
        }
        let client = unsafe { &*client };
        let resp = unsafe { &*response };
        let body = if resp.body.is_null() {
            String::new()
        } else {
            unsafe { CStr::from_ptr(resp.body) }.to_string_lossy().into_owned()
        };
        let outcome = classify_response(&HttpResponse::new(resp.status, body), &client.config.login_route);
        FfiTaskResult::from_outcome(outcome)
    })
    .unwrap_or_else(|_| FfiTaskResult::panic("panic in task_classify_response"))
}

/// Classify a request that never completed. `err_msg` is the host
/// transport's failure description; null is treated as empty.
#[unsafe(no_mangle)]
pub extern "C" fn task_classify_transport_failure(err_msg: *const c_char) -> *mut FfiTaskResult {
    catch_unwind(|| {
        let failure = TransportFailure::new(str_arg(err_msg).unwrap_or_default());
        FfiTaskResult::from_outcome(classify_transport_failure(&failure))
    })
    .unwrap_or_else(|_| FfiTaskResult::panic("panic in task_classify_transport_failure"))
}

// ---------------------------------------------------------------------------
// Free functions
// ---------------------------------------------------------------------------

fn free_c_string(s: *mut c_char) {
    if !s.is_null() {
        drop(unsafe { CString::from_raw(s) });
    }
}

/// Free an `FfiHttpRequest` returned by `task_build_request`.
/// Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn task_free_request(req: *mut FfiHttpRequest) {
    if req.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let req = unsafe { Box::from_raw(req) };
        free_c_string(req.url);
        free_c_string(req.body);
        if !req.headers.is_null() && req.headers_len > 0 {
            let headers = unsafe {
                Box::from_raw(std::ptr::slice_from_raw_parts_mut(
                    req.headers,
                    req.headers_len as usize,
                ))
            };
            for h in headers.iter() {
                free_c_string(h.key);
                free_c_string(h.value);
            }
        }
    });
}

/// Free an `FfiTaskResult` returned by any `task_classify_*` function.
/// Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn task_free_result(result: *mut FfiTaskResult) {
    if result.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let result = unsafe { Box::from_raw(result) };
        free_c_string(result.message);
        free_c_string(result.value_json);
        free_c_string(result.notify);
        free_c_string(result.navigate_to);
    });
}

/// Free a C string allocated by this library. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn task_free_string(s: *mut c_char) {
    if !s.is_null() {
        let _ = catch_unwind(|| free_c_string(s));
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
