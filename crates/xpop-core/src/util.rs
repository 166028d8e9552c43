// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! Utilities

/// Log a warning regarding an error message
///
/// The error's chain of sources is logged too, one line each.
pub fn warn_about_error(msg: &str, mut error: &dyn std::error::Error) {
    log::warn!("{msg}: {error}");
    while let Some(source) = error.source() {
        log::warn!("Source: {source}");
        error = source;
    }
}

/// Log a warning regarding an error message, with a log target
pub fn warn_about_error_with_target(target: &str, msg: &str, mut error: &dyn std::error::Error) {
    log::warn!(target: target, "{msg}: {error}");
    while let Some(source) = error.source() {
        log::warn!(target: target, "Source: {source}");
        error = source;
    }
}
