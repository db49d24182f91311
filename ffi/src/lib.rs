//! C-ABI wrapper around `klout-core`.
//!
//! # Overview
//! Exposes the Klout client through `extern "C"` functions. A host can either
//! let the library perform the HTTP round-trip (`klout_request`) or run it
//! itself between `klout_build_request` and `klout_parse_response`.
//!
//! # Design
//! - Every `extern "C"` function wraps its body in `catch_unwind` so panics
//!   never cross the FFI boundary.
//! - A single `FfiKloutResult` envelope conveys success bodies and errors
//!   uniformly; JSON travels as C strings.
//! - The C caller owns all returned pointers and must call the matching
//!   `klout_free_*` function to release them.

pub mod types;

use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::panic::{catch_unwind, AssertUnwindSafe};

use klout_core::http::HttpResponse;
use klout_core::{ClientConfig, KloutClient, DEFAULT_BASE_URL};

use types::*;

/// Borrow a C string argument. Null and invalid UTF-8 read as `None`.
///
/// # Safety
/// `s` must be null or point to a NUL-terminated string that outlives `'a`.
unsafe fn str_arg<'a>(s: *const c_char) -> Option<&'a str> {
    if s.is_null() {
        return None;
    }
    unsafe { CStr::from_ptr(s) }.to_str().ok()
}

/// Copy `len` query pairs out of a caller-owned array. Returns `None` if the
/// array is null while `len > 0`, or if any key or value is null.
fn query_arg(query: *const FfiKeyValue, len: u32) -> Option<Vec<(String, String)>> {
    if len == 0 {
        return Some(Vec::new());
    }
    if query.is_null() {
        return None;
    }
    let pairs = unsafe { std::slice::from_raw_parts(query, len as usize) };
    pairs
        .iter()
        .map(|kv| {
            let key = unsafe { str_arg(kv.key) }?;
            let value = unsafe { str_arg(kv.value) }?;
            Some((key.to_string(), value.to_string()))
        })
        .collect()
}

fn borrow_pairs(pairs: &[(String, String)]) -> Vec<(&str, &str)> {
    pairs.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect()
}

// ---------------------------------------------------------------------------
// Client lifecycle
// ---------------------------------------------------------------------------

/// Create a new client. A null `base_url` selects the default Klout URL; a
/// null `api_key` means an empty key.
///
/// Returns null if `base_url` is not a valid URL or if an internal panic
/// occurs. The caller must free the returned pointer with `klout_client_free`.
#[unsafe(no_mangle)]
pub extern "C" fn klout_client_new(
    base_url: *const c_char,
    api_key: *const c_char,
) -> *mut FfiKloutClient {
    catch_unwind(|| {
        let url = unsafe { str_arg(base_url) }.unwrap_or(DEFAULT_BASE_URL);
        let key = unsafe { str_arg(api_key) }.unwrap_or("");
        match ClientConfig::new(key).with_base_url(url) {
            Ok(config) => Box::into_raw(Box::new(FfiKloutClient {
                inner: KloutClient::new(config),
            })),
            Err(_) => std::ptr::null_mut(),
        }
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Free a client created by `klout_client_new`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn klout_client_free(client: *mut FfiKloutClient) {
    if !client.is_null() {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            drop(unsafe { Box::from_raw(client) });
        }));
    }
}

/// Replace the API key. A null `api_key` keeps the current one.
///
/// Returns false if `client` is null.
#[unsafe(no_mangle)]
pub extern "C" fn klout_client_set_api_key(
    client: *mut FfiKloutClient,
    api_key: *const c_char,
) -> bool {
    catch_unwind(AssertUnwindSafe(|| {
        if client.is_null() {
            return false;
        }
        let client = unsafe { &mut *client };
        client.inner.set_api_key(unsafe { str_arg(api_key) });
        true
    }))
    .unwrap_or(false)
}

/// Replace the base URL.
///
/// Returns false if an argument is null or the URL does not parse; the
/// previous base URL stays in effect.
#[unsafe(no_mangle)]
pub extern "C" fn klout_client_set_base_url(
    client: *mut FfiKloutClient,
    base_url: *const c_char,
) -> bool {
    catch_unwind(AssertUnwindSafe(|| {
        if client.is_null() {
            return false;
        }
        let Some(url) = (unsafe { str_arg(base_url) }) else {
            return false;
        };
        let client = unsafe { &mut *client };
        client.inner.set_base_url(url).is_ok()
    }))
    .unwrap_or(false)
}

/// Turn on disable mode: every `klout_request` answers `{"Disabled":true}`.
#[unsafe(no_mangle)]
pub extern "C" fn klout_client_disable(client: *mut FfiKloutClient) {
    if !client.is_null() {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            unsafe { &mut *client }.inner.disable();
        }));
    }
}

// ---------------------------------------------------------------------------
// Build / parse (host performs the I/O)
// ---------------------------------------------------------------------------

/// Build an HTTP request for `path` with `query_len` query pairs.
///
/// Returns null if `client` or `path` is null, if a query pair is null, or
/// if `path` cannot be resolved. The caller must free the returned pointer
/// with `klout_free_request`.
#[unsafe(no_mangle)]
pub extern "C" fn klout_build_request(
    client: *const FfiKloutClient,
    method: FfiHttpMethod,
    path: *const c_char,
    query: *const FfiKeyValue,
    query_len: u32,
) -> *mut FfiHttpRequest {
    catch_unwind(AssertUnwindSafe(|| {
        if client.is_null() {
            return std::ptr::null_mut();
        }
        let client = unsafe { &*client };
        let (Some(path), Some(pairs)) = (unsafe { str_arg(path) }, query_arg(query, query_len))
        else {
            return std::ptr::null_mut();
        };
        match client
            .inner
            .build_request(method.into(), path, &borrow_pairs(&pairs))
        {
            Ok(req) => FfiHttpRequest::from_core(req),
            Err(_) => std::ptr::null_mut(),
        }
    }))
    .unwrap_or(std::ptr::null_mut())
}

/// Map a host-executed response to a result. A null body reads as empty.
#[unsafe(no_mangle)]
pub extern "C" fn klout_parse_response(
    client: *const FfiKloutClient,
    response: *const FfiHttpResponse,
) -> *mut FfiKloutResult {
    catch_unwind(AssertUnwindSafe(|| {
        if client.is_null() {
            return FfiKloutResult::null_arg("client");
        }
        if response.is_null() {
            return FfiKloutResult::null_arg("response");
        }
        let client = unsafe { &*client };
        let resp = unsafe { &*response };
        let body = if resp.body.is_null() {
            String::new()
        } else {
            unsafe { CStr::from_ptr(resp.body) }.to_string_lossy().into_owned()
        };
        let core_resp = HttpResponse {
            status: resp.status,
            headers: Vec::new(),
            body,
        };
        match client.inner.parse_response(core_resp) {
            Ok(value) => FfiKloutResult::ok(&value),
            Err(e) => FfiKloutResult::from_error(e),
        }
    }))
    .unwrap_or_else(|_| FfiKloutResult::panic("panic in klout_parse_response"))
}

// ---------------------------------------------------------------------------
// Full round-trip
// ---------------------------------------------------------------------------

/// Perform the request over the network and map the response.
#[unsafe(no_mangle)]
pub extern "C" fn klout_request(
    client: *const FfiKloutClient,
    method: FfiHttpMethod,
    path: *const c_char,
    query: *const FfiKeyValue,
    query_len: u32,
) -> *mut FfiKloutResult {
    catch_unwind(AssertUnwindSafe(|| {
        if client.is_null() {
            return FfiKloutResult::null_arg("client");
        }
        let Some(path) = (unsafe { str_arg(path) }) else {
            return FfiKloutResult::null_arg("path");
        };
        let Some(pairs) = query_arg(query, query_len) else {
            return FfiKloutResult::null_arg("query");
        };
        let client = unsafe { &*client };
        match client
            .inner
            .request(method.into(), path, &borrow_pairs(&pairs))
        {
            Ok(value) => FfiKloutResult::ok(&value),
            Err(e) => FfiKloutResult::from_error(e),
        }
    }))
    .unwrap_or_else(|_| FfiKloutResult::panic("panic in klout_request"))
}

// ---------------------------------------------------------------------------
// Free functions
// ---------------------------------------------------------------------------

/// Free an `FfiHttpRequest` returned by `klout_build_request`.
/// Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn klout_free_request(req: *mut FfiHttpRequest) {
    if req.is_null() {
        return;
    }
    let _ = catch_unwind(AssertUnwindSafe(|| {
        let req = unsafe { Box::from_raw(req) };
        klout_free_string(req.url);
        if !req.headers.is_null() && req.headers_len > 0 {
            let headers = unsafe {
                Box::from_raw(std::ptr::slice_from_raw_parts_mut(
                    req.headers,
                    req.headers_len as usize,
                ))
            };
            for h in headers.iter() {
                klout_free_string(h.key);
                klout_free_string(h.value);
            }
        }
    }));
}

/// Free an `FfiKloutResult` returned by `klout_parse_response` or
/// `klout_request`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn klout_free_result(result: *mut FfiKloutResult) {
    if result.is_null() {
        return;
    }
    let _ = catch_unwind(AssertUnwindSafe(|| {
        let result = unsafe { Box::from_raw(result) };
        klout_free_string(result.error_message);
        klout_free_string(result.data);
    }));
}

/// Free a C string allocated by this library. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn klout_free_string(s: *mut c_char) {
    if !s.is_null() {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            drop(unsafe { CString::from_raw(s) });
        }));
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
