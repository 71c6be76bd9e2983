//! Custom rate (C1, Custom variant): loads a caller-supplied shared library exporting
//! `double symbol(double t, void* ctx)` and evaluates it for the lifetime of the
//! simulation. Symbol resolution failure is a startup `ResourceError`; the library
//! handle is released when the `CustomRate` (and with it the owning `System`) drops.

use crate::error::SimResult;
use crate::rate::{wrap_resource_error, CustomRateFn};
use libloading::Library;
use std::ffi::c_void;

pub struct CustomRate {
    lib: Library,
    pub(crate) path: String,
    symbol_name: String,
}

impl CustomRate {
    pub fn load(library_path: &str, symbol_name: &str) -> SimResult<Self> {
        // SAFETY: loading an arbitrary shared object is inherently unsafe; the
        // caller is responsible for supplying a library that exports the documented
        // `double symbol(double t, void* ctx)` ABI.
        let lib = unsafe { Library::new(library_path) }
            .map_err(|e| wrap_resource_error(format!("cannot load '{library_path}': {e}")))?;

        // Resolve once up front so a bad symbol name fails fast at startup rather
        // than on the first hot-loop evaluation.
        unsafe {
            let _: libloading::Symbol<CustomRateFn> = lib.get(symbol_name.as_bytes()).map_err(|e| {
                wrap_resource_error(format!(
                    "symbol '{symbol_name}' not found in '{library_path}': {e}"
                ))
            })?;
        }

        Ok(CustomRate {
            lib,
            path: library_path.to_string(),
            symbol_name: symbol_name.to_string(),
        })
    }

    pub fn eval(&self, t: f64) -> f64 {
        // SAFETY: the symbol's signature was validated at `load` time against the
        // documented ABI; `ctx` is unused by this engine and always passed null.
        unsafe {
            let sym: libloading::Symbol<CustomRateFn> = self
                .lib
                .get(self.symbol_name.as_bytes())
                .expect("symbol resolved successfully at load time");
            sym(t, std::ptr::null_mut::<c_void>())
        }
    }
}
