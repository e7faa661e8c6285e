//! I/O service: the hexagonal core.
//!
//! [`IoService`] owns the hold detector, blink indicator, parser idle
//! watchdog and the timer table that drives them.  Every side effect goes
//! through the [`DevicePorts`] passed in at call sites, so the whole
//! service runs unchanged against mock adapters on the host.
//!
//! ```text
//!  PinPort ◀──┐   ┌──────────────────────────────┐
//! WifiPort ◀──┼───│          IoService           │──▶ EventSink
//! Settings ◀──┤   │ HoldDetector · BlinkIndicator │
//!   Parser ◀──┘   │ IdleWatchdog · TickScheduler  │
//!                 └──────────────────────────────┘
//! ```

use log::{debug, info, warn};

use crate::config::{GpioConf, SystemConfig, WifiMode};
use crate::drivers::blink::{BlinkIndicator, BlinkRate, IndicatorOwner};
use crate::drivers::button::{HOLD_POLL_MS, HoldDetector, HoldEvent, HoldStage, ReleaseAction};
use crate::drivers::pin_modes::{self, UserPin};
use crate::drivers::watchdog::{IdleWatchdog, PARSER_IDLE_POLL_MS};
use crate::pins::{BUTTON_GPIO, mask};
use crate::scheduler::{TickScheduler, TimerId};

use super::commands::IoCommand;
use super::events::AppEvent;
use super::ports::{ConfigError, DevicePorts, EventSink, PinFunction, PinPort};

pub struct IoService {
    timers: TickScheduler,
    hold: HoldDetector,
    blink: BlinkIndicator,
    idle: IdleWatchdog,
}

impl Default for IoService {
    fn default() -> Self {
        Self::new()
    }
}

impl IoService {
    /// Construct an idle service.  Nothing is armed until [`start`](Self::start).
    pub fn new() -> Self {
        Self {
            timers: TickScheduler::new(),
            hold: HoldDetector::new(),
            blink: BlinkIndicator::new(),
            idle: IdleWatchdog::new(),
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Configure the button pin, arm the periodic timers and sample the
    /// button once to decide whether hold detection is usable.
    pub fn start(&mut self, dev: &mut impl DevicePorts, sink: &mut impl EventSink) {
        dev.select_function(BUTTON_GPIO, PinFunction::Gpio);
        dev.output_set(0, 0, 0, mask(BUTTON_GPIO));

        self.timers.arm(TimerId::HoldPoll, HOLD_POLL_MS);
        self.timers.arm(TimerId::ParserIdle, PARSER_IDLE_POLL_MS);

        let pressed_at_boot = button_pressed(dev);
        self.hold = HoldDetector::from_boot_level(pressed_at_boot);
        if pressed_at_boot {
            warn!("GPIO0 stuck low - AP reset button disabled");
            sink.emit(&AppEvent::HoldDetectionDisabled);
        } else {
            debug!("Note: hold GPIO0 low for reset to AP mode");
        }

        sink.emit(&AppEvent::Started {
            hold_detection: self.hold.is_enabled(),
        });
        info!("IoService started");
    }

    /// Apply the live pin configuration to GPIO2, GPIO4 and GPIO5.
    pub fn apply_pin_modes(&self, dev: &mut impl DevicePorts, sink: &mut impl EventSink) {
        let cfg = dev.system();
        pin_modes::apply_pin_modes(&cfg, dev);
        sink.emit(&AppEvent::PinModesApplied {
            gpio2: cfg.gpio2_conf,
            gpio4: cfg.gpio4_conf,
            gpio5: cfg.gpio5_conf,
        });
    }

    /// Replace the live system configuration and re-apply pin modes.
    pub fn reconfigure(
        &mut self,
        config: SystemConfig,
        dev: &mut impl DevicePorts,
        sink: &mut impl EventSink,
    ) -> Result<(), ConfigError> {
        dev.update_system(config)?;
        self.apply_pin_modes(dev, sink);
        Ok(())
    }

    /// Process an external configuration command.
    pub fn handle_command(
        &mut self,
        cmd: IoCommand,
        dev: &mut impl DevicePorts,
        sink: &mut impl EventSink,
    ) -> Result<(), ConfigError> {
        match cmd {
            IoCommand::SetGpioConf { pin, raw } => {
                let conf = GpioConf::try_from(raw)?;
                let mut cfg = dev.system();
                pin.set_conf(&mut cfg, conf);
                self.reconfigure(cfg, dev, sink)
            }
            IoCommand::SetParserTimeout(ms) => {
                let mut cfg = dev.system();
                cfg.parser_tout_ms = ms;
                dev.update_system(cfg)?;
                info!("Parser idle timeout set to {} ms", ms);
                Ok(())
            }
            IoCommand::ReapplyPinModes => {
                self.apply_pin_modes(dev, sink);
                Ok(())
            }
        }
    }

    // ── Tick path ─────────────────────────────────────────────

    /// Advance the timer table by `elapsed_ms` and run every due handler,
    /// one millisecond at a time, in fixed order.
    pub fn advance(&mut self, elapsed_ms: u32, dev: &mut impl DevicePorts, sink: &mut impl EventSink) {
        for _ in 0..elapsed_ms {
            for id in self.timers.tick() {
                match id {
                    TimerId::HoldPoll => self.on_hold_poll(dev, sink),
                    TimerId::Blink => {
                        let released = !button_pressed(dev);
                        self.blink.tick(released, dev);
                    }
                    TimerId::ParserIdle => self.on_parser_idle(dev, sink),
                }
            }
        }
    }

    fn on_hold_poll(&mut self, dev: &mut impl DevicePorts, sink: &mut impl EventSink) {
        let pressed = button_pressed(dev);
        let Some(event) = self.hold.tick(pressed) else {
            return;
        };

        match event {
            HoldEvent::RescueArmed => self.show_indicator(BlinkRate::Slow, dev, sink),
            HoldEvent::FactoryResetArmed => self.show_indicator(BlinkRate::Fast, dev, sink),
            HoldEvent::Released { presses, action } => {
                self.release_indicator(dev);
                sink.emit(&AppEvent::HoldReleased { presses, action });
                self.run_release_action(action, dev, sink);
            }
        }
    }

    fn show_indicator(&mut self, rate: BlinkRate, dev: &mut impl DevicePorts, sink: &mut impl EventSink) {
        self.timers.disarm(TimerId::Blink);
        let period = self.blink.take_over(rate, dev);
        self.timers.arm(TimerId::Blink, period);
        sink.emit(&AppEvent::IndicatorBlinking(rate));
    }

    fn release_indicator(&mut self, dev: &mut impl DevicePorts) {
        let gpio2_conf = dev.system().gpio2_conf;
        if self.blink.hand_back(dev, gpio2_conf) {
            self.timers.disarm(TimerId::Blink);
            // The blink left GPIO2 at an arbitrary level; restore the user's.
            if gpio2_conf != GpioConf::Off {
                pin_modes::apply_pin(UserPin::Gpio2, gpio2_conf, dev);
            }
        }
    }

    fn run_release_action(
        &mut self,
        action: ReleaseAction,
        dev: &mut impl DevicePorts,
        sink: &mut impl EventSink,
    ) {
        match action {
            ReleaseAction::None => {}
            ReleaseAction::RescueMode => {
                info!("BOOT button triggered reset to AP mode");
                dev.set_opmode(WifiMode::StationAp);
                dev.apply_settings();
                match dev.store() {
                    Ok(()) => sink.emit(&AppEvent::RescueModeEntered),
                    Err(e) => {
                        warn!("Rescue mode: storing settings failed: {}", e);
                        sink.emit(&AppEvent::PersistFailed(e));
                    }
                }
            }
            ReleaseAction::FactoryReset => {
                info!("Restoring default settings via BOOT button");
                match dev.restore_defaults() {
                    Ok(()) => {
                        sink.emit(&AppEvent::FactoryReset);
                        self.apply_pin_modes(dev, sink);
                    }
                    Err(e) => {
                        warn!("Factory reset failed: {}", e);
                        sink.emit(&AppEvent::PersistFailed(e));
                    }
                }
            }
        }
    }

    fn on_parser_idle(&mut self, dev: &mut impl DevicePorts, sink: &mut impl EventSink) {
        let timeout = dev.system().parser_tout_ms;
        if let Some(idle_ms) = self.idle.tick(dev.char_count(), timeout) {
            dev.reset();
            sink.emit(&AppEvent::ParserReset { idle_ms });
        }
    }

    // ── Queries ───────────────────────────────────────────────

    /// Whether the boot button is being watched this session.
    pub fn hold_enabled(&self) -> bool {
        self.hold.is_enabled()
    }

    pub fn press_count(&self) -> u32 {
        self.hold.presses()
    }

    pub fn hold_stage(&self) -> HoldStage {
        self.hold.stage()
    }

    pub fn indicator_owner(&self) -> IndicatorOwner {
        self.blink.owner()
    }

    pub fn timers(&self) -> &TickScheduler {
        &self.timers
    }
}

/// GPIO0 is active low.
fn button_pressed(pins: &impl PinPort) -> bool {
    !pins.read_level(BUTTON_GPIO)
}
