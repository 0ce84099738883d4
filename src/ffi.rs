//! C-ABI FFI bindings for cross-language integration.
//!
//! This module provides a C-compatible API for using qpfmt from other languages
//! such as C#, Python, and Node.js.

use std::ffi::{c_char, CStr, CString};
use std::path::Path;
use std::ptr;

use crate::{format_file, inspect_file, Settings};

/// Result structure returned by FFI functions.
#[repr(C)]
pub struct QpfmtResult {
    /// Whether the operation succeeded.
    pub success: bool,
    /// The result data (null if failed). Must be freed with `qpfmt_free_result`.
    pub data: *mut c_char,
    /// Error message (null if succeeded). Must be freed with `qpfmt_free_result`.
    pub error: *mut c_char,
}

impl QpfmtResult {
    fn success(data: String) -> Self {
        Self {
            success: true,
            data: CString::new(data).unwrap_or_default().into_raw(),
            error: ptr::null_mut(),
        }
    }

    fn error(message: String) -> Self {
        Self {
            success: false,
            data: ptr::null_mut(),
            error: CString::new(message).unwrap_or_default().into_raw(),
        }
    }
}

/// Read a required UTF-8 string argument.
unsafe fn required_str<'a>(ptr: *const c_char, what: &str) -> Result<&'a str, String> {
    if ptr.is_null() {
        return Err(format!("{} cannot be null", what));
    }
    CStr::from_ptr(ptr)
        .to_str()
        .map_err(|_| format!("Invalid UTF-8 {}", what.to_lowercase()))
}

/// Reformat a DOCX file.
///
/// `settings_json` may be null for defaults, or a JSON object with any of
/// the settings keys. On success `data` holds the statistics as JSON.
///
/// # Safety
///
/// `input` and `output` must be valid null-terminated UTF-8 strings.
/// `settings_json` must be null or a valid null-terminated UTF-8 string.
/// The returned result must be freed with `qpfmt_free_result`.
#[no_mangle]
pub unsafe extern "C" fn qpfmt_format_file(
    input: *const c_char,
    output: *const c_char,
    settings_json: *const c_char,
) -> QpfmtResult {
    let input = match required_str(input, "Input path") {
        Ok(s) => s,
        Err(e) => return QpfmtResult::error(e),
    };
    let output = match required_str(output, "Output path") {
        Ok(s) => s,
        Err(e) => return QpfmtResult::error(e),
    };
    let settings_json = if settings_json.is_null() {
        None
    } else {
        match CStr::from_ptr(settings_json).to_str() {
            Ok(s) => Some(s),
            Err(_) => return QpfmtResult::error("Invalid UTF-8 settings".to_string()),
        }
    };

    match format_file_internal(Path::new(input), Path::new(output), settings_json) {
        Ok(json) => QpfmtResult::success(json),
        Err(e) => QpfmtResult::error(e.to_string()),
    }
}

fn format_file_internal(
    input: &Path,
    output: &Path,
    settings_json: Option<&str>,
) -> crate::Result<String> {
    let settings = match settings_json {
        Some(json) => Settings::from_json(json)?,
        None => Settings::default(),
    };
    let stats = format_file(input, output, &settings)?;
    Ok(serde_json::to_string(&stats)?)
}

/// Get a document summary as JSON.
///
/// # Safety
///
/// The `path` must be a valid null-terminated UTF-8 string.
/// The returned result must be freed with `qpfmt_free_result`.
#[no_mangle]
pub unsafe extern "C" fn qpfmt_inspect(path: *const c_char) -> QpfmtResult {
    let path = match required_str(path, "Path") {
        Ok(s) => s,
        Err(e) => return QpfmtResult::error(e),
    };

    match inspect_file(path).and_then(|info| info.to_json()) {
        Ok(json) => QpfmtResult::success(json),
        Err(e) => QpfmtResult::error(e.to_string()),
    }
}

/// Check if a file is a DOCX package.
///
/// # Safety
///
/// The `path` must be a valid null-terminated UTF-8 string.
#[no_mangle]
pub unsafe extern "C" fn qpfmt_is_docx(path: *const c_char) -> bool {
    match required_str(path, "Path") {
        Ok(s) => crate::detect::is_docx(Path::new(s)),
        Err(_) => false,
    }
}

/// Free a result returned by any qpfmt function.
///
/// # Safety
///
/// The `result` must have been returned by a qpfmt function.
/// This function should only be called once per result.
#[no_mangle]
pub unsafe extern "C" fn qpfmt_free_result(result: QpfmtResult) {
    if !result.data.is_null() {
        drop(CString::from_raw(result.data));
    }
    if !result.error.is_null() {
        drop(CString::from_raw(result.error));
    }
}

/// Get the version of the qpfmt library.
///
/// # Safety
///
/// The returned string is statically allocated and should not be freed.
#[no_mangle]
pub extern "C" fn qpfmt_version() -> *const c_char {
    static VERSION: &[u8] = concat!(env!("CARGO_PKG_VERSION"), "\0").as_bytes();
    VERSION.as_ptr() as *const c_char
}
