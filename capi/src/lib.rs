//! # C-API for the satbridge Session Bridge
//!
//! Opaque-handle surface for host runtimes binding C symbols (JNA-style).
//! Symbol names are kept as the host bindings expect them, hence the
//! camelCase exports. Every create function is paired with exactly one
//! destroy function that the caller must invoke exactly once; handles are
//! single-owner and must not be used after destruction.
//!
//! Strings returned by getter calls point into buffers owned by the handle
//! they were read from; a pointer stays valid until the next call on the same
//! handle or its destruction. Literals in the assignment string are
//! IPASIR-style signed integers joined by `;`.
//!
//! Apart from `interrupt` against an in-flight `solve`, calls on the same
//! handle must be serialized by the caller; none of the entry points detect
//! null, foreign, or destroyed handles.
#![warn(clippy::pedantic)]
#![allow(non_snake_case)]

use std::ffi::{c_char, c_int, CStr, CString};

use satbridge::{Config, Problem, ResultCollector, Session};

/// Builds an owned C string buffer from a bridge message
fn to_cstring(msg: &str) -> CString {
    CString::new(msg.replace('\0', " ")).expect("NUL bytes were just replaced")
}

/// Opaque handle to a [`Config`], owning the buffers its string getters
/// return pointers into
#[derive(Default)]
pub struct ConfigHandle {
    inner: Config,
    err_buf: CString,
    engine_err_buf: CString,
}

/// Opaque handle to a [`Problem`]
pub struct ProblemHandle {
    inner: Problem,
}

/// Opaque handle to a [`ResultCollector`], owning the buffers its string
/// getters return pointers into
#[derive(Default)]
pub struct ResultHandle {
    inner: ResultCollector,
    warning_buf: CString,
    assignment_buf: CString,
}

/// Opaque handle to a [`Session`]
#[derive(Default)]
pub struct FacadeHandle {
    inner: Session,
}

/// Creates a configuration from a flattened argument string of `params_strlen`
/// bytes, tokenized into at most `max_args` argv slots (one of which the
/// program-name placeholder occupies). Never returns null; the outcome must
/// be read via [`getConfigStatus`].
///
/// # Safety
///
/// `params` must point to at least `params_strlen` readable bytes.
#[no_mangle]
pub unsafe extern "C" fn createConfig(
    params: *const c_char,
    params_strlen: c_int,
    max_args: c_int,
) -> *mut ConfigHandle {
    let len = usize::try_from(params_strlen).unwrap_or(0);
    let bytes = unsafe { std::slice::from_raw_parts(params.cast::<u8>(), len) };
    let args = String::from_utf8_lossy(bytes);
    let mut handle = ConfigHandle::default();
    handle
        .inner
        .configure(&args, usize::try_from(max_args).unwrap_or(0));
    Box::into_raw(Box::new(handle))
}

/// Frees the memory associated with a configuration
///
/// # Safety
///
/// `config` must be a return value of [`createConfig`] and cannot be used
/// afterwards again.
#[no_mangle]
pub unsafe extern "C" fn destroyConfig(config: *mut ConfigHandle) {
    drop(unsafe { Box::from_raw(config) });
}

/// Gets the configuration status: 0 = not configured, 1 = valid, 2 = error
///
/// # Safety
///
/// `config` must be a return value of [`createConfig`] that [`destroyConfig`]
/// has not yet been called on.
#[no_mangle]
pub unsafe extern "C" fn getConfigStatus(config: *mut ConfigHandle) -> c_int {
    unsafe { (*config).inner.status() as c_int }
}

/// Gets the bridge-level error message; empty if there is none
///
/// # Safety
///
/// `config` must be a return value of [`createConfig`] that [`destroyConfig`]
/// has not yet been called on. The returned pointer is valid until the next
/// call on this handle.
#[no_mangle]
pub unsafe extern "C" fn getConfigErrorMessage(config: *mut ConfigHandle) -> *const c_char {
    let config = unsafe { &mut *config };
    config.err_buf = to_cstring(config.inner.error_message());
    config.err_buf.as_ptr()
}

/// Gets the diagnostic text the engine produced while parsing the arguments;
/// empty if there is none. Present independently of the status.
///
/// # Safety
///
/// `config` must be a return value of [`createConfig`] that [`destroyConfig`]
/// has not yet been called on. The returned pointer is valid until the next
/// call on this handle.
#[no_mangle]
pub unsafe extern "C" fn getConfigClaspErrorMessage(config: *mut ConfigHandle) -> *const c_char {
    let config = unsafe { &mut *config };
    config.engine_err_buf = to_cstring(config.inner.engine_error_message());
    config.engine_err_buf.as_ptr()
}

/// Creates a problem from NUL-terminated DIMACS CNF text. The text is copied;
/// the caller keeps ownership of `problem`.
///
/// # Safety
///
/// `problem` must point to a NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn createProblem(problem: *const c_char) -> *mut ProblemHandle {
    let dimacs = unsafe { CStr::from_ptr(problem) }.to_string_lossy();
    Box::into_raw(Box::new(ProblemHandle {
        inner: Problem::new(dimacs),
    }))
}

/// Frees the memory associated with a problem
///
/// # Safety
///
/// `problem` must be a return value of [`createProblem`] and cannot be used
/// afterwards again.
#[no_mangle]
pub unsafe extern "C" fn destroyProblem(problem: *mut ProblemHandle) {
    drop(unsafe { Box::from_raw(problem) });
}

/// Gets whether the last read of the problem into a solving context
/// succeeded; 0 before the first [`solve`] on this problem
///
/// # Safety
///
/// `problem` must be a return value of [`createProblem`] that
/// [`destroyProblem`] has not yet been called on.
#[no_mangle]
pub unsafe extern "C" fn getProblemStatus(problem: *mut ProblemHandle) -> c_int {
    c_int::from(unsafe { (*problem).inner.status() })
}

/// Creates an empty result collector in the unknown state
#[no_mangle]
pub extern "C" fn createResult() -> *mut ResultHandle {
    Box::into_raw(Box::default())
}

/// Frees the memory associated with a result collector
///
/// # Safety
///
/// `result` must be a return value of [`createResult`] and cannot be used
/// afterwards again.
#[no_mangle]
pub unsafe extern "C" fn destroyResult(result: *mut ResultHandle) {
    drop(unsafe { Box::from_raw(result) });
}

/// Gets the result state: 0 = unsatisfiable, 1 = satisfiable, 3 = unknown
///
/// # Safety
///
/// `result` must be a return value of [`createResult`] that [`destroyResult`]
/// has not yet been called on.
#[no_mangle]
pub unsafe extern "C" fn getResultState(result: *mut ResultHandle) -> c_int {
    unsafe { (*result).inner.state() as c_int }
}

/// Gets the last warning the engine raised; empty if there is none
///
/// # Safety
///
/// `result` must be a return value of [`createResult`] that [`destroyResult`]
/// has not yet been called on. The returned pointer is valid until the next
/// call on this handle.
#[no_mangle]
pub unsafe extern "C" fn getResultWarning(result: *mut ResultHandle) -> *const c_char {
    let result = unsafe { &mut *result };
    result.warning_buf = to_cstring(result.inner.warning());
    result.warning_buf.as_ptr()
}

/// Gets the model as `;`-joined signed literals, one per variable, variable
/// indices starting from 1, `-` prefixed iff the variable is false. Empty
/// unless the state is satisfiable; a formula over zero variables is
/// satisfiable with an empty assignment.
///
/// # Safety
///
/// `result` must be a return value of [`createResult`] that [`destroyResult`]
/// has not yet been called on. The returned pointer is valid until the next
/// call on this handle.
#[no_mangle]
pub unsafe extern "C" fn getResultAssignment(result: *mut ResultHandle) -> *const c_char {
    let result = unsafe { &mut *result };
    result.assignment_buf = to_cstring(&result.inner.assignment_string());
    result.assignment_buf.as_ptr()
}

/// Creates a solving facade with a cleared interrupt flag
#[no_mangle]
pub extern "C" fn createFacade() -> *mut FacadeHandle {
    Box::into_raw(Box::default())
}

/// Frees the memory associated with a facade
///
/// # Safety
///
/// `facade` must be a return value of [`createFacade`] and cannot be used
/// afterwards again. No [`solve`] on this facade may be in flight; callers
/// must join the solving thread first.
#[no_mangle]
pub unsafe extern "C" fn destroyFacade(facade: *mut FacadeHandle) {
    drop(unsafe { Box::from_raw(facade) });
}

/// Requests termination of any in-flight [`solve`] on this facade and marks
/// the facade interrupted for all subsequent solves. Returns whether a solve
/// was in flight when the request landed.
///
/// This is the only entry point that may be called concurrently with a
/// [`solve`] using the same facade.
///
/// # Safety
///
/// `facade` must be a return value of [`createFacade`] that [`destroyFacade`]
/// has not yet been called on.
#[no_mangle]
pub unsafe extern "C" fn interrupt(facade: *mut FacadeHandle) -> c_int {
    c_int::from(unsafe { (*facade).inner.interrupt() })
}

/// Runs one solve: reads the problem into a solving context configured from
/// `config`, runs the search, and writes the outcome into `result`. Always
/// leaves `result` in a definite state; an unresolved outcome is reported as
/// unsatisfiable.
///
/// # Safety
///
/// All four handles must be live return values of their respective create
/// functions, and no other call may run on any of them for the duration,
/// except [`interrupt`] on `facade`.
#[no_mangle]
pub unsafe extern "C" fn solve(
    facade: *mut FacadeHandle,
    problem: *mut ProblemHandle,
    config: *mut ConfigHandle,
    result: *mut ResultHandle,
) {
    let facade = unsafe { &mut *facade };
    let problem = unsafe { &mut *problem };
    let config = unsafe { &*config };
    let result = unsafe { &mut *result };
    facade
        .inner
        .solve(&mut problem.inner, &config.inner, &mut result.inner);
}
