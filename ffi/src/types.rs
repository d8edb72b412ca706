//! `#[repr(C)]` types for the FFI boundary.
//!
//! # Design
//! Each type mirrors a core type with C-compatible representations:
//! `*mut c_char` instead of `String`, raw pointers instead of `Vec`, and
//! enums with explicit discriminants. JSON values cross as serialized
//! strings. Conversion functions live here to keep `lib.rs` focused on the
//! `extern "C"` surface.

use std::ffi::CString;
use std::os::raw::c_char;

use task_core::{ClientConfig, Effect, ErrorKind, HttpMethod, HttpRequest, Outcome};

/// Opaque handle to a client configuration. C callers receive a pointer
/// to this and pass it back into every FFI function.
pub struct FfiTaskClient {
    pub(crate) config: ClientConfig,
}

/// Copy `s` into a heap C string. Interior NULs are dropped.
pub(crate) fn c_string(s: &str) -> *mut c_char {
    CString::new(s.replace('\0', "")).unwrap_or_default().into_raw()
}

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// HTTP method as a C enum.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiHttpMethod {
    Get = 0,
    Post = 1,
    Put = 2,
    Delete = 3,
}

impl From<HttpMethod> for FfiHttpMethod {
    fn from(m: HttpMethod) -> Self {
        match m {
            HttpMethod::Get => FfiHttpMethod::Get,
            HttpMethod::Post => FfiHttpMethod::Post,
            HttpMethod::Put => FfiHttpMethod::Put,
            HttpMethod::Delete => FfiHttpMethod::Delete,
        }
    }
}

/// Method from its C discriminant. Negative selects the default (GET).
pub(crate) fn method_from_raw(raw: i32) -> Option<HttpMethod> {
    match raw {
        r if r < 0 => Some(HttpMethod::default()),
        0 => Some(HttpMethod::Get),
        1 => Some(HttpMethod::Post),
        2 => Some(HttpMethod::Put),
        3 => Some(HttpMethod::Delete),
        _ => None,
    }
}

/// A single HTTP header as a key-value pair of C strings.
#[repr(C)]
pub struct FfiHeader {
    pub key: *mut c_char,
    pub value: *mut c_char,
}

/// Transport parameters for the host to execute.
///
/// `body` is JSON text. For GET the host should send its fields as query
/// parameters instead of a body.
#[repr(C)]
pub struct FfiHttpRequest {
    pub method: FfiHttpMethod,
    pub url: *mut c_char,
    pub headers: *mut FfiHeader,
    pub headers_len: u32,
    pub body: *mut c_char,
    pub timeout_ms: u64,
}

impl FfiHttpRequest {
    /// Convert a core `HttpRequest` into a heap-allocated `FfiHttpRequest`.
    pub(crate) fn from_core(req: HttpRequest) -> *mut Self {
        let url = c_string(&req.url);
        let body = c_string(&req.body.to_string());

        let headers_len = req.headers.len() as u32;
        let headers = if req.headers.is_empty() {
            std::ptr::null_mut()
        } else {
            let ffi_headers: Vec<FfiHeader> = req
                .headers
                .iter()
                .map(|(k, v)| FfiHeader {
                    key: c_string(k),
                    value: c_string(v),
                })
                .collect();
            // into_boxed_slice makes capacity == len so free can rebuild it.
            Box::into_raw(ffi_headers.into_boxed_slice()) as *mut FfiHeader
        };

        Box::into_raw(Box::new(FfiHttpRequest {
            method: req.method.into(),
            url,
            headers,
            headers_len,
            body,
            timeout_ms: req.timeout_ms,
        }))
    }
}

// ---------------------------------------------------------------------------
// Response input (caller-provided, not heap-allocated by us)
// ---------------------------------------------------------------------------

/// A server answer described as C-compatible plain data.
///
/// The C caller constructs this on the stack after executing a request and
/// passes a pointer to `task_classify_response`. The FFI layer reads but
/// does not free these fields.
#[repr(C)]
pub struct FfiHttpResponse {
    pub status: u16,
    pub body: *const c_char,
}

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// Outcome category. `Ok` means the call resolved.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiErrorKind {
    Ok = 0,
    AuthExpired = 1,
    NotFound = 2,
    BusinessFailure = 3,
    TransportFailure = 4,
    HttpFailure = 5,
    Panic = 6,
    NullArg = 7,
}

impl From<ErrorKind> for FfiErrorKind {
    fn from(kind: ErrorKind) -> Self {
        match kind {
            ErrorKind::AuthExpired => FfiErrorKind::AuthExpired,
            ErrorKind::NotFound => FfiErrorKind::NotFound,
            ErrorKind::BusinessFailure => FfiErrorKind::BusinessFailure,
            ErrorKind::TransportFailure => FfiErrorKind::TransportFailure,
            ErrorKind::HttpFailure => FfiErrorKind::HttpFailure,
        }
    }
}

/// Classified outcome plus the side effects the host must perform.
///
/// On success `error_kind` is `Ok`, `message` is null and `value_json` holds
/// the resolved value. On failure `message` is set and `value_json` holds
/// the error payload, if any. Effect fields are independent of the result:
/// `notify` (null when nothing to show), `clear_credential`, and
/// `navigate_to` (null when no navigation).
#[repr(C)]
pub struct FfiTaskResult {
    pub error_kind: FfiErrorKind,
    pub message: *mut c_char,
    pub http_status: u16,
    pub is_envelope: bool,
    pub value_json: *mut c_char,
    pub notify: *mut c_char,
    pub clear_credential: bool,
    pub navigate_to: *mut c_char,
}

impl FfiTaskResult {
    fn empty(error_kind: FfiErrorKind) -> Self {
        FfiTaskResult {
            error_kind,
            message: std::ptr::null_mut(),
            http_status: 0,
            is_envelope: false,
            value_json: std::ptr::null_mut(),
            notify: std::ptr::null_mut(),
            clear_credential: false,
            navigate_to: std::ptr::null_mut(),
        }
    }

    /// Build a result from a classified outcome.
    pub(crate) fn from_outcome(outcome: Outcome) -> *mut Self {
        let mut result = match outcome.result {
            Ok(response) => {
                let mut result = Self::empty(FfiErrorKind::Ok);
                result.is_envelope = response.is_envelope();
                result.value_json = c_string(&response.into_value().to_string());
                result
            }
            Err(err) => {
                let mut result = Self::empty(err.kind.into());
                result.message = c_string(&err.message);
                result.http_status = err.status_code.unwrap_or(0);
                if let Some(payload) = err.payload {
                    result.value_json = c_string(&payload.to_string());
                }
                result
            }
        };

        for effect in outcome.effects {
            match effect {
                Effect::Notify(message) if result.notify.is_null() => result.notify = c_string(&message),
                Effect::ClearCredential => result.clear_credential = true,
                Effect::Navigate(route) if result.navigate_to.is_null() => result.navigate_to = c_string(&route),
                _ => {}
            }
        }
        Box::into_raw(Box::new(result))
    }

    /// Build an error result for a null argument.
    pub(crate) fn null_arg(name: &str) -> *mut Self {
        let mut result = Self::empty(FfiErrorKind::NullArg);
        result.message = c_string(&format!("null argument: {name}"));
        Box::into_raw(Box::new(result))
    }

    /// Build an error result for a caught panic.
    pub(crate) fn panic(msg: &str) -> *mut Self {
        let mut result = Self::empty(FfiErrorKind::Panic);
        result.message = c_string(msg);
        Box::into_raw(Box::new(result))
    }
}
