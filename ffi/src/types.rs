//! `#[repr(C)]` types for the FFI boundary.
//!
//! # Design
//! Each type mirrors a core type with C-compatible representations:
//! `*mut c_char` instead of `String`, raw pointers instead of `Vec`, and
//! enums with explicit discriminants. JSON payloads cross as C strings so the
//! host can use whatever JSON library it already has. Conversion functions
//! live here to keep `lib.rs` focused on the `extern "C"` surface.

use std::ffi::CString;
use std::os::raw::c_char;

use klout_core::error::ApiError;
use klout_core::http::HttpMethod;
use serde_json::Value;

/// Opaque handle to a `KloutClient`. C callers receive a pointer to this
/// and pass it back into every FFI function.
pub struct FfiKloutClient {
    pub(crate) inner: klout_core::KloutClient,
}

/// Convert a Rust string into an owned C string. Interior NULs are stripped.
pub(crate) fn to_c_string(s: String) -> *mut c_char {
    let s = if s.contains('\0') { s.replace('\0', "") } else { s };
    CString::new(s).unwrap_or_default().into_raw()
}

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// HTTP method as a C enum.
#[repr(C)]
#[derive(Clone, Copy)]
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

impl From<FfiHttpMethod> for HttpMethod {
    fn from(m: FfiHttpMethod) -> Self {
        match m {
            FfiHttpMethod::Get => HttpMethod::Get,
            FfiHttpMethod::Post => HttpMethod::Post,
            FfiHttpMethod::Put => HttpMethod::Put,
            FfiHttpMethod::Delete => HttpMethod::Delete,
        }
    }
}

/// A key-value pair of C strings: a header, or a query parameter on input.
#[repr(C)]
pub struct FfiKeyValue {
    pub key: *mut c_char,
    pub value: *mut c_char,
}

/// An HTTP request described as C-compatible plain data.
///
/// Built by `klout_build_request`. The C caller executes the request and
/// passes the response back through `klout_parse_response`.
#[repr(C)]
pub struct FfiHttpRequest {
    pub method: FfiHttpMethod,
    pub url: *mut c_char,
    pub headers: *mut FfiKeyValue,
    pub headers_len: u32,
}

impl FfiHttpRequest {
    /// Convert a core `HttpRequest` into a heap-allocated `FfiHttpRequest`.
    pub(crate) fn from_core(req: klout_core::HttpRequest) -> *mut Self {
        let headers_len = req.headers.len() as u32;
        let headers = if req.headers.is_empty() {
            std::ptr::null_mut()
        } else {
            let ffi_headers: Box<[FfiKeyValue]> = req
                .headers
                .into_iter()
                .map(|(k, v)| FfiKeyValue {
                    key: to_c_string(k),
                    value: to_c_string(v),
                })
                .collect();
            Box::into_raw(ffi_headers) as *mut FfiKeyValue
        };

        Box::into_raw(Box::new(FfiHttpRequest {
            method: req.method.into(),
            url: to_c_string(req.url),
            headers,
            headers_len,
        }))
    }
}

// ---------------------------------------------------------------------------
// Response input (caller-provided, not heap-allocated by us)
// ---------------------------------------------------------------------------

/// An HTTP response described as C-compatible plain data.
///
/// The C caller constructs this on the stack after executing a request, then
/// passes a pointer to `klout_parse_response`. The FFI layer reads but does
/// not free these fields.
#[repr(C)]
pub struct FfiHttpResponse {
    pub status: u16,
    pub body: *const c_char,
}

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// Error codes returned in `FfiKloutResult`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiErrorCode {
    Ok = 0,
    BadRequest = 1,
    Unauthorized = 2,
    NotFound = 3,
    ClientError = 4,
    ServerError = 5,
    InvalidUrl = 6,
    Decode = 7,
    Transport = 8,
    Panic = 9,
    NullArg = 10,
}

/// Result envelope for parse and request operations.
///
/// On success `error_code` is `Ok`, `error_message` is null and `data` holds
/// the response body as JSON text. On failure `error_code` names the kind,
/// `error_message` is human-readable, and `data` holds the server's error
/// body as JSON for `BadRequest` and `ClientError` (null otherwise).
#[repr(C)]
pub struct FfiKloutResult {
    pub error_code: FfiErrorCode,
    pub error_message: *mut c_char,
    pub http_status: u16,
    pub data: *mut c_char,
}

impl FfiKloutResult {
    fn boxed(error_code: FfiErrorCode, message: Option<String>, http_status: u16, data: Option<&Value>) -> *mut Self {
        Box::into_raw(Box::new(FfiKloutResult {
            error_code,
            error_message: message.map_or(std::ptr::null_mut(), to_c_string),
            http_status,
            data: data.map_or(std::ptr::null_mut(), |v| to_c_string(v.to_string())),
        }))
    }

    /// Build a success result carrying the JSON body.
    pub(crate) fn ok(value: &Value) -> *mut Self {
        Self::boxed(FfiErrorCode::Ok, None, 0, Some(value))
    }

    /// Build an error result from an `ApiError`.
    pub(crate) fn from_error(err: ApiError) -> *mut Self {
        let code = match &err {
            ApiError::BadRequest { .. } => FfiErrorCode::BadRequest,
            ApiError::Unauthorized => FfiErrorCode::Unauthorized,
            ApiError::NotFound => FfiErrorCode::NotFound,
            ApiError::ClientError { .. } => FfiErrorCode::ClientError,
            ApiError::ServerError { .. } => FfiErrorCode::ServerError,
            ApiError::InvalidUrl { .. } => FfiErrorCode::InvalidUrl,
            ApiError::Decode(_) => FfiErrorCode::Decode,
            ApiError::Transport(_) => FfiErrorCode::Transport,
        };
        Self::boxed(code, Some(err.to_string()), err.status().unwrap_or(0), err.data())
    }

    /// Build an error result for a null argument.
    pub(crate) fn null_arg(name: &str) -> *mut Self {
        Self::boxed(FfiErrorCode::NullArg, Some(format!("null argument: {name}")), 0, None)
    }

    /// Build an error result for a caught panic.
    pub(crate) fn panic(msg: &str) -> *mut Self {
        Self::boxed(FfiErrorCode::Panic, Some(msg.to_string()), 0, None)
    }
}
