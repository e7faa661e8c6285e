//! Millisecond tick source using ESP-IDF's esp_timer API.
//!
//! A single periodic timer pushes [`Event::MillisTick`] into the lock-free
//! SPSC queue.  On simulation targets nothing is started; the caller feeds
//! elapsed time directly.
//!
//! Timer callbacks execute in the ESP timer task context (not ISR), so
//! they can safely call push_event() which uses atomics only.

#[cfg(target_os = "espidf")]
use core::sync::atomic::{AtomicPtr, Ordering};

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

#[cfg(target_os = "espidf")]
use log::info;

#[cfg(target_os = "espidf")]
use crate::events::{Event, push_event};

/// Tick period in microseconds.
pub const TICK_PERIOD_US: u64 = 1_000;

#[cfg(target_os = "espidf")]
static TICK_TIMER: AtomicPtr<esp_timer> = AtomicPtr::new(core::ptr::null_mut());

#[cfg(target_os = "espidf")]
unsafe extern "C" fn tick_cb(_arg: *mut core::ffi::c_void) {
    push_event(Event::MillisTick);
}

/// Start the 1 ms tick timer.  Failure is logged; the event loop then
/// simply never advances.
#[cfg(target_os = "espidf")]
pub fn start_tick_timer() {
    if !TICK_TIMER.load(Ordering::Acquire).is_null() {
        return;
    }

    let args = esp_timer_create_args_t {
        callback: Some(tick_cb),
        arg: core::ptr::null_mut(),
        dispatch_method: esp_timer_dispatch_t_ESP_TIMER_TASK,
        name: c"io_tick".as_ptr(),
        skip_unhandled_events: false,
    };
    let mut handle: esp_timer_handle_t = core::ptr::null_mut();

    // SAFETY: args outlives the call; handle is a valid out-pointer.
    let ret = unsafe { esp_timer_create(&args, &mut handle) };
    if ret != ESP_OK {
        log::error!("hw_timer: tick timer create failed (rc={})", ret);
        return;
    }
    // SAFETY: handle was just created.
    let ret = unsafe { esp_timer_start_periodic(handle, TICK_PERIOD_US) };
    if ret != ESP_OK {
        log::error!("hw_timer: tick timer start failed (rc={})", ret);
        return;
    }
    TICK_TIMER.store(handle, Ordering::Release);
    info!("hw_timer: 1 ms tick started");
}

#[cfg(not(target_os = "espidf"))]
pub fn start_tick_timer() {
    log::info!("hw_timer(sim): tick timer not started (time fed by caller)");
}
