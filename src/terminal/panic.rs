//! Panic hook that gives the terminal back before the message is printed.

use super::setup::emergency_restore;
use std::panic;

/// Install once, early in `main`, before the dashboard takes the terminal.
pub fn setup_panic_hook() {
    let previous = panic::take_hook();
    panic::set_hook(Box::new(move |info| {
        emergency_restore();
        previous(info);
    }));
}
