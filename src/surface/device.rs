// src/surface/device.rs
//! The current-surface stack.
//!
//! Records which target receives drawing commands. The on-screen display is
//! the implicit bottom entry, so `current()` always has an answer and popping
//! never uncovers nothing. The stack belongs to the GUI thread; each thread
//! sees its own.

pub use crate::display::driver::DrawTarget;
use log::{debug, warn};
use std::cell::RefCell;

thread_local! {
    static STACK: RefCell<Vec<DrawTarget>> = const { RefCell::new(Vec::new()) };
}

/// Makes `target` the destination of subsequent drawing commands.
pub fn push_current(target: DrawTarget) {
    debug!("push_current: {:?}", target);
    STACK.with(|stack| stack.borrow_mut().push(target));
}

/// Restores the target that was current before the last `push_current`.
///
/// Popping when only the display remains is logged and ignored.
pub fn pop_current() {
    let popped = STACK.with(|stack| stack.borrow_mut().pop());
    match popped {
        Some(target) => debug!("pop_current: {:?}, now {:?}", target, current()),
        None => warn!("pop_current: stack is empty, display stays current"),
    }
}

/// The target drawing commands currently go to.
pub fn current() -> DrawTarget {
    STACK.with(|stack| stack.borrow().last().cloned().unwrap_or(DrawTarget::Display))
}

/// Whether `target` is the top of the stack.
///
/// False once the thread's stack has been torn down, so surfaces dropped by
/// other thread-local destructors do not touch it.
pub fn is_current(target: &DrawTarget) -> bool {
    STACK
        .try_with(|stack| {
            stack
                .borrow()
                .last()
                .unwrap_or(&DrawTarget::Display)
                .same_as(target)
        })
        .unwrap_or(false)
}

/// Whether `target` was pushed and not yet popped, at any depth.
pub fn contains(target: &DrawTarget) -> bool {
    STACK
        .try_with(|stack| stack.borrow().iter().any(|entry| entry.same_as(target)))
        .unwrap_or(false)
}

/// Number of pushed targets above the display.
pub fn depth() -> usize {
    STACK.with(|stack| stack.borrow().len())
}
