//! Integration tests for the IoService → timers → ports pipeline.
//!
//! Time is fed through `advance`, exactly as the main loop does after
//! draining the tick queue.  The hold poll first fires 500 ms after start.

use super::mock_hw::{LEDS_DARK, LEDS_LIT, MockDevice, RecordingSink};

use espterm_io::app::commands::IoCommand;
use espterm_io::app::events::AppEvent;
use espterm_io::app::ports::{ConfigError, PinFunction};
use espterm_io::app::service::IoService;
use espterm_io::config::{GpioConf, SystemConfig, WifiMode};
use espterm_io::drivers::blink::{BlinkRate, IndicatorOwner};
use espterm_io::drivers::button::{HoldStage, ReleaseAction};
use espterm_io::drivers::pin_modes::UserPin;
use espterm_io::pins::{LED_A_GPIO, LED_B_GPIO, USER_GPIO2, USER_GPIO4};
use espterm_io::scheduler::TimerId;

const POLL_MS: u32 = 500;

fn started(dev: &mut MockDevice) -> (IoService, RecordingSink) {
    let mut svc = IoService::new();
    let mut sink = RecordingSink::new();
    svc.start(dev, &mut sink);
    (svc, sink)
}

/// Hold the button for `polls` hold-poll periods, then release it and let
/// one more poll observe the release.
fn hold_and_release(svc: &mut IoService, dev: &mut MockDevice, sink: &mut RecordingSink, polls: u32) {
    dev.button_pressed = true;
    svc.advance(polls * POLL_MS, dev, sink);
    dev.button_pressed = false;
    svc.advance(POLL_MS, dev, sink);
}

// ── Start-up ──────────────────────────────────────────────────

#[test]
fn start_configures_button_and_arms_timers() {
    let mut dev = MockDevice::new();
    let (svc, sink) = started(&mut dev);

    assert_eq!(dev.function_of(0), Some(PinFunction::Gpio));
    assert!(svc.hold_enabled());
    assert_eq!(svc.timers().period(TimerId::HoldPoll), Some(500));
    assert_eq!(svc.timers().period(TimerId::ParserIdle), Some(1));
    assert!(!svc.timers().is_armed(TimerId::Blink));
    assert!(sink.contains(&AppEvent::Started {
        hold_detection: true
    }));
}

#[test]
fn stuck_low_button_disables_hold_detection() {
    let mut dev = MockDevice::new();
    dev.button_pressed = true;
    let (mut svc, mut sink) = started(&mut dev);

    assert!(!svc.hold_enabled());
    assert!(sink.contains(&AppEvent::HoldDetectionDisabled));
    assert!(sink.contains(&AppEvent::Started {
        hold_detection: false
    }));

    let calls_before = dev.pin_calls.len();
    svc.advance(20 * POLL_MS, &mut dev, &mut sink);

    assert_eq!(svc.press_count(), 0);
    assert_eq!(dev.pin_calls.len(), calls_before, "LEDs must not be touched");
    assert_eq!(dev.store_count, 0);
    assert_eq!(dev.restore_count, 0);
}

// ── Hold sequences ────────────────────────────────────────────

#[test]
fn eleven_poll_hold_enters_rescue_mode() {
    let mut dev = MockDevice::new();
    let (mut svc, mut sink) = started(&mut dev);

    dev.button_pressed = true;
    svc.advance(2 * POLL_MS, &mut dev, &mut sink);

    // Second poll: LEDs switched to GPIO and forced on, slow blink armed.
    assert_eq!(dev.function_of(LED_A_GPIO), Some(PinFunction::Gpio));
    assert_eq!(dev.function_of(LED_B_GPIO), Some(PinFunction::Gpio));
    assert_eq!(dev.led_writes().first(), Some(&LEDS_LIT));
    assert_eq!(svc.timers().period(TimerId::Blink), Some(500));
    assert_eq!(svc.indicator_owner(), IndicatorOwner::Blink(BlinkRate::Slow));
    assert_eq!(svc.hold_stage(), HoldStage::HeldMedium);

    svc.advance(8 * POLL_MS, &mut dev, &mut sink);

    // Tenth poll: fast blink.
    assert_eq!(svc.press_count(), 10);
    assert_eq!(svc.timers().period(TimerId::Blink), Some(100));
    assert_eq!(svc.indicator_owner(), IndicatorOwner::Blink(BlinkRate::Fast));
    assert_eq!(svc.hold_stage(), HoldStage::HeldLong);

    svc.advance(POLL_MS, &mut dev, &mut sink);
    assert_eq!(svc.press_count(), 11);

    dev.button_pressed = false;
    svc.advance(POLL_MS, &mut dev, &mut sink);

    assert_eq!(dev.opmode, WifiMode::StationAp);
    assert_eq!(dev.apply_count, 1);
    assert_eq!(dev.store_count, 1);
    assert_eq!(dev.restore_count, 0);
    assert_eq!(svc.press_count(), 0);
    assert_eq!(svc.hold_stage(), HoldStage::Idle);
    assert!(sink.contains(&AppEvent::HoldReleased {
        presses: 11,
        action: ReleaseAction::RescueMode
    }));
    assert!(sink.contains(&AppEvent::RescueModeEntered));

    // Pads back to the UARTs, blink timer gone.
    assert_eq!(svc.indicator_owner(), IndicatorOwner::Uart);
    assert!(!svc.timers().is_armed(TimerId::Blink));
    assert_eq!(dev.function_of(LED_A_GPIO), Some(PinFunction::Uart0Tx));
    assert_eq!(dev.function_of(LED_B_GPIO), Some(PinFunction::Uart1Tx));

    // Nothing further happens while idle.
    svc.advance(10 * POLL_MS, &mut dev, &mut sink);
    assert_eq!(dev.store_count, 1);
    assert_eq!(dev.apply_count, 1);
}

#[test]
fn twelve_poll_hold_restores_factory_defaults() {
    let mut dev = MockDevice::with_system(SystemConfig {
        gpio4_conf: GpioConf::Out1,
        ..SystemConfig::default()
    });
    let (mut svc, mut sink) = started(&mut dev);

    hold_and_release(&mut svc, &mut dev, &mut sink, 12);

    assert_eq!(dev.restore_count, 1);
    assert_eq!(dev.store_count, 0);
    assert_eq!(dev.apply_count, 0);
    assert_eq!(dev.system, SystemConfig::default());
    assert!(sink.contains(&AppEvent::FactoryReset));
    // Restored config is pushed to the pins.
    assert!(sink.contains(&AppEvent::PinModesApplied {
        gpio2: GpioConf::Off,
        gpio4: GpioConf::Off,
        gpio5: GpioConf::Off,
    }));
}

#[test]
fn single_poll_tap_does_nothing() {
    let mut dev = MockDevice::new();
    let (mut svc, mut sink) = started(&mut dev);
    let calls_before = dev.pin_calls.len();

    hold_and_release(&mut svc, &mut dev, &mut sink, 1);

    assert!(sink.contains(&AppEvent::HoldReleased {
        presses: 1,
        action: ReleaseAction::None
    }));
    assert_eq!(dev.pin_calls.len(), calls_before);
    assert_eq!(dev.store_count + dev.restore_count + dev.apply_count, 0);
    assert_eq!(svc.press_count(), 0);
}

#[test]
fn press_between_polls_is_not_counted() {
    let mut dev = MockDevice::new();
    let (mut svc, mut sink) = started(&mut dev);

    svc.advance(100, &mut dev, &mut sink);
    dev.button_pressed = true;
    svc.advance(300, &mut dev, &mut sink);
    dev.button_pressed = false;
    svc.advance(1000, &mut dev, &mut sink);

    assert_eq!(svc.press_count(), 0);
    assert_eq!(
        sink.count(|e| matches!(e, AppEvent::HoldReleased { .. })),
        0
    );
}

#[test]
fn released_button_parks_leds_dark_until_next_poll() {
    let mut dev = MockDevice::new();
    let (mut svc, mut sink) = started(&mut dev);

    dev.button_pressed = true;
    svc.advance(10 * POLL_MS, &mut dev, &mut sink);
    dev.button_pressed = false;

    let writes_before = dev.led_writes().len();
    // Two fast blink ticks before the next hold poll.
    svc.advance(250, &mut dev, &mut sink);
    let writes = dev.led_writes();
    assert_eq!(&writes[writes_before..], &[LEDS_DARK, LEDS_DARK]);
    assert!(svc.timers().is_armed(TimerId::Blink));

    svc.advance(250, &mut dev, &mut sink);
    assert_eq!(svc.indicator_owner(), IndicatorOwner::Uart);
    assert!(!svc.timers().is_armed(TimerId::Blink));
}

#[test]
fn slow_blink_toggles_each_period() {
    let mut dev = MockDevice::new();
    let (mut svc, mut sink) = started(&mut dev);

    dev.button_pressed = true;
    svc.advance(2 * POLL_MS, &mut dev, &mut sink);
    svc.advance(3 * POLL_MS, &mut dev, &mut sink);

    // take-over (lit) then three blink ticks: dark, lit, dark.
    assert_eq!(
        dev.led_writes(),
        vec![LEDS_LIT, LEDS_DARK, LEDS_LIT, LEDS_DARK]
    );
}

#[test]
fn gpio2_in_use_is_not_returned_to_uart() {
    let mut dev = MockDevice::with_system(SystemConfig {
        gpio2_conf: GpioConf::Out1,
        ..SystemConfig::default()
    });
    let (mut svc, mut sink) = started(&mut dev);

    hold_and_release(&mut svc, &mut dev, &mut sink, 3);

    assert_eq!(dev.function_of(LED_A_GPIO), Some(PinFunction::Uart0Tx));
    assert_eq!(dev.function_of(USER_GPIO2), Some(PinFunction::Gpio));
    // User level restored after the blink.
    let last = *dev.outputs_for(USER_GPIO2).last().unwrap();
    assert_eq!(
        last,
        super::mock_hw::PinCall::Output {
            set: 1 << 2,
            clear: 0,
            enable: 1 << 2,
            disable: 0
        }
    );
}

#[test]
fn persist_failure_is_reported() {
    let mut dev = MockDevice::new();
    dev.persist_result = Err(ConfigError::StorageFull);
    let (mut svc, mut sink) = started(&mut dev);

    hold_and_release(&mut svc, &mut dev, &mut sink, 4);

    assert_eq!(dev.store_count, 1);
    assert!(sink.contains(&AppEvent::PersistFailed(ConfigError::StorageFull)));
    assert!(!sink.contains(&AppEvent::RescueModeEntered));
    assert_eq!(svc.press_count(), 0);
}

#[test]
fn holds_can_repeat() {
    let mut dev = MockDevice::new();
    let (mut svc, mut sink) = started(&mut dev);

    hold_and_release(&mut svc, &mut dev, &mut sink, 2);
    hold_and_release(&mut svc, &mut dev, &mut sink, 2);

    assert_eq!(dev.store_count, 2);
    assert_eq!(
        sink.count(|e| matches!(e, AppEvent::IndicatorBlinking(BlinkRate::Slow))),
        2
    );
}

// ── Parser idle watchdog ──────────────────────────────────────

#[test]
fn parser_reset_after_timeout() {
    let mut dev = MockDevice::new();
    let (mut svc, mut sink) = started(&mut dev);

    svc.advance(100, &mut dev, &mut sink);
    assert_eq!(dev.parser_resets, 0, "no reset before the first character");

    dev.char_count = 5;
    svc.advance(1, &mut dev, &mut sink);
    svc.advance(10, &mut dev, &mut sink);
    assert_eq!(dev.parser_resets, 0);

    svc.advance(1, &mut dev, &mut sink);
    assert_eq!(dev.parser_resets, 1);
    assert!(sink.contains(&AppEvent::ParserReset { idle_ms: 11 }));

    svc.advance(1000, &mut dev, &mut sink);
    assert_eq!(dev.parser_resets, 1, "one reset per idle period");

    dev.char_count = 6;
    svc.advance(12, &mut dev, &mut sink);
    assert_eq!(dev.parser_resets, 2);
}

#[test]
fn steady_input_never_resets_parser() {
    let mut dev = MockDevice::new();
    let (mut svc, mut sink) = started(&mut dev);

    for _ in 0..200 {
        dev.char_count += 1;
        svc.advance(5, &mut dev, &mut sink);
    }
    assert_eq!(dev.parser_resets, 0);
}

#[test]
fn zero_timeout_disables_watchdog() {
    let mut dev = MockDevice::new();
    let (mut svc, mut sink) = started(&mut dev);

    svc.handle_command(IoCommand::SetParserTimeout(0), &mut dev, &mut sink)
        .unwrap();
    dev.char_count = 1;
    svc.advance(5000, &mut dev, &mut sink);
    assert_eq!(dev.parser_resets, 0);
}

// ── Commands ──────────────────────────────────────────────────

#[test]
fn set_gpio_conf_applies_pin() {
    let mut dev = MockDevice::new();
    let (mut svc, mut sink) = started(&mut dev);

    svc.handle_command(
        IoCommand::SetGpioConf {
            pin: UserPin::Gpio4,
            raw: 2,
        },
        &mut dev,
        &mut sink,
    )
    .unwrap();

    assert_eq!(dev.system.gpio4_conf, GpioConf::Out1);
    assert_eq!(dev.function_of(USER_GPIO4), Some(PinFunction::Gpio));
    assert!(sink.contains(&AppEvent::PinModesApplied {
        gpio2: GpioConf::Off,
        gpio4: GpioConf::Out1,
        gpio5: GpioConf::Off,
    }));
}

#[test]
fn out_of_range_gpio_conf_is_rejected() {
    let mut dev = MockDevice::new();
    let (mut svc, mut sink) = started(&mut dev);
    let calls_before = dev.pin_calls.len();

    let res = svc.handle_command(
        IoCommand::SetGpioConf {
            pin: UserPin::Gpio5,
            raw: 7,
        },
        &mut dev,
        &mut sink,
    );

    assert!(matches!(res, Err(ConfigError::ValidationFailed(_))));
    assert_eq!(dev.system, SystemConfig::default());
    assert_eq!(dev.pin_calls.len(), calls_before);
}

#[test]
fn oversized_parser_timeout_is_rejected() {
    let mut dev = MockDevice::new();
    let (mut svc, mut sink) = started(&mut dev);

    let res = svc.handle_command(IoCommand::SetParserTimeout(50_000), &mut dev, &mut sink);
    assert!(res.is_err());
    assert_eq!(dev.system.parser_tout_ms, 10);
}

#[test]
fn reconfigure_reapplies_all_pins() {
    let mut dev = MockDevice::new();
    let (mut svc, mut sink) = started(&mut dev);

    let cfg = SystemConfig {
        gpio2_conf: GpioConf::InPullup,
        gpio4_conf: GpioConf::Out0,
        gpio5_conf: GpioConf::InNoPull,
        parser_tout_ms: 100,
    };
    svc.reconfigure(cfg, &mut dev, &mut sink).unwrap();

    assert_eq!(dev.system, cfg);
    assert_eq!(dev.function_of(USER_GPIO2), Some(PinFunction::Gpio));
    assert!(sink.contains(&AppEvent::PinModesApplied {
        gpio2: GpioConf::InPullup,
        gpio4: GpioConf::Out0,
        gpio5: GpioConf::InNoPull,
    }));
}
