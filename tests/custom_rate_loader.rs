//! Startup failure modes for the custom-rate shared-library loader (§7
//! `ResourceError` policy: "fail fast, release partially acquired resources").
//! Exercising the success path would require compiling a real shared object
//! fixture at test time, which this suite does not do; these cover the error
//! paths a caller is most likely to hit.

use branch_sim::rate::Rate;

#[test]
fn missing_library_file_is_a_resource_error() {
    let result = Rate::custom("/nonexistent/path/libdoesnotexist.so", "rate_fn");
    assert!(result.is_err());
}

#[test]
fn missing_symbol_in_an_existing_library_is_a_resource_error() {
    // libc.so.6 exists on essentially every Linux host and certainly does not
    // export a symbol with this name.
    let result = Rate::custom("libc.so.6", "definitely_not_a_rate_symbol_12345");
    assert!(result.is_err());
}
