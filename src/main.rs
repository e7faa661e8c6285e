//! ESPTerm I/O firmware: main entry point.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                  Adapters (outer ring)                   │
//! │                                                          │
//! │  GpioAdapter    DeviceSettings   NvsAdapter   ParserLink │
//! │  (PinPort)      (Wifi+Settings)  (ConfigPort) (Parser)   │
//! │  LogEventSink                                            │
//! │  (EventSink)                                             │
//! │                                                          │
//! │  ──────────────── Port Trait Boundary ───────────────    │
//! │                                                          │
//! │  ┌────────────────────────────────────────────────────┐  │
//! │  │             IoService (pure logic)                 │  │
//! │  │  HoldDetector · BlinkIndicator · IdleWatchdog      │  │
//! │  └────────────────────────────────────────────────────┘  │
//! │                                                          │
//! │  1 ms hw timer ──▶ event queue ──▶ TickScheduler          │
//! └──────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use anyhow::Result;
use log::{info, warn};

use espterm_io::adapters::hardware::{DeviceAdapter, GpioAdapter};
use espterm_io::adapters::log_sink::LogEventSink;
use espterm_io::adapters::nvs::NvsAdapter;
use espterm_io::adapters::parser_link::ParserLink;
use espterm_io::adapters::settings::DeviceSettings;
use espterm_io::app::service::IoService;
use espterm_io::drivers::{hw_init, hw_timer};
use espterm_io::events::{self, Event};

/// Main loop sleep between queue drains.
const LOOP_SLEEP_MS: u64 = 10;

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  ESPTerm I/O v{}                  ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Settings from NVS (or defaults) ────────────────────
    let nvs = NvsAdapter::new().map_err(|e| anyhow::anyhow!("NVS init failed: {}", e))?;
    let settings = DeviceSettings::load(nvs);
    info!("Settings: {:?}", settings.settings());

    // ── 3. Pins ───────────────────────────────────────────────
    if let Err(e) = hw_init::init_button_pin() {
        warn!("Button init failed: {} - hold detection may misread", e);
    }

    let mut device = DeviceAdapter::new(GpioAdapter::new(), settings, ParserLink::global());
    let mut sink = LogEventSink::new();
    let mut service = IoService::new();

    service.apply_pin_modes(&mut device, &mut sink);
    service.start(&mut device, &mut sink);

    // ── 4. Tick source ────────────────────────────────────────
    hw_timer::start_tick_timer();
    info!("System ready. Entering event loop.");

    // ── 5. Event loop ─────────────────────────────────────────
    loop {
        std::thread::sleep(std::time::Duration::from_millis(LOOP_SLEEP_MS));

        let mut elapsed_ms: u32 = 0;
        events::drain_events(|event| match event {
            Event::MillisTick => elapsed_ms += 1,
        });
        service.advance(elapsed_ms, &mut device, &mut sink);

        let dropped = events::take_dropped();
        if dropped > 0 {
            warn!("Event queue overflow: {} ticks lost", dropped);
        }
    }
}
