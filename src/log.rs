//! Debug output routed to `esp-println`.
//!
//! Call sites stay a single line; with the `esp32-log` feature disabled the
//! arguments are still type-checked but nothing is emitted.

#[cfg(feature = "esp32-log")]
macro_rules! log {
    ($($arg:tt)*) => {
        esp_println::println!($($arg)*)
    };
}

#[cfg(not(feature = "esp32-log"))]
macro_rules! log {
    ($($arg:tt)*) => {
        if false {
            let _ = core::format_args!($($arg)*);
        }
    };
}
