//! The LED blink consumer driven through the public API.
//!
//! ```text
//! top
//! ├── not_blinking
//! └── blinking        (Init -> led_on)
//!     ├── led_on
//!     └── led_off
//! ```

use hsm_engine::builder::{MachineBuilder, StateTreeBuilder};
use hsm_engine::core::{Event, Outcome, StateId, Trigger};
use hsm_engine::{signals, Machine};

signals! {
    enum LedSignal {
        ToggleBlink,
        Timer,
        User,
    }
}

#[derive(Clone, Copy, PartialEq, Debug)]
enum Mode {
    Blinking,
    NotBlinking,
}

#[derive(Debug)]
struct Led {
    mode: Mode,
    lit: bool,
    /// Every value written to the simulated output pin.
    writes: Vec<bool>,
    /// Pseudo-events as "state:signal".
    trace: Vec<String>,
}

impl Led {
    fn new() -> Self {
        Self {
            mode: Mode::NotBlinking,
            lit: false,
            writes: Vec::new(),
            trace: Vec::new(),
        }
    }

    fn drive(&mut self, lit: bool) {
        self.lit = lit;
        self.writes.push(lit);
    }

    fn take_trace(&mut self) -> Vec<String> {
        std::mem::take(&mut self.trace)
    }
}

struct States {
    not_blinking: StateId,
    blinking: StateId,
    led_on: StateId,
    led_off: StateId,
}

fn trace(led: &mut Led, state: &str, event: &Event<'_>) {
    match event.trigger::<LedSignal>() {
        Trigger::Entry => led.trace.push(format!("{}:entry", state)),
        Trigger::Exit => led.trace.push(format!("{}:exit", state)),
        _ => {}
    }
}

fn led_machine() -> (Machine<Led>, States) {
    let mut builder = StateTreeBuilder::new();
    let blinking = builder.state("blinking", StateId::ROOT).unwrap();
    let not_blinking = builder.state("not_blinking", StateId::ROOT).unwrap();
    let led_on = builder.state("led_on", blinking).unwrap();
    let led_off = builder.state("led_off", blinking).unwrap();

    builder
        .handler(blinking, move |led: &mut Led, event: &Event<'_>| {
            trace(led, "blinking", event);
            match event.trigger::<LedSignal>() {
                Trigger::Entry => {
                    led.mode = Mode::Blinking;
                    Outcome::Handled
                }
                Trigger::Init => Outcome::Transition(led_on),
                Trigger::Exit => Outcome::Handled,
                Trigger::User(LedSignal::ToggleBlink) => Outcome::Transition(not_blinking),
                _ => Outcome::Unhandled,
            }
        })
        .handler(not_blinking, move |led: &mut Led, event: &Event<'_>| {
            trace(led, "not_blinking", event);
            match event.trigger::<LedSignal>() {
                Trigger::Entry => {
                    led.mode = Mode::NotBlinking;
                    led.drive(false);
                    Outcome::Handled
                }
                Trigger::User(LedSignal::ToggleBlink) => Outcome::Transition(blinking),
                Trigger::User(LedSignal::User) => {
                    let lit = !led.lit;
                    led.drive(lit);
                    Outcome::Handled
                }
                _ => Outcome::Unhandled,
            }
        })
        .handler(led_on, move |led: &mut Led, event: &Event<'_>| {
            trace(led, "led_on", event);
            match event.trigger::<LedSignal>() {
                Trigger::Entry => {
                    led.drive(true);
                    Outcome::Handled
                }
                Trigger::User(LedSignal::Timer) => Outcome::Transition(led_off),
                _ => Outcome::Unhandled,
            }
        })
        .handler(led_off, move |led: &mut Led, event: &Event<'_>| {
            trace(led, "led_off", event);
            match event.trigger::<LedSignal>() {
                Trigger::Entry => {
                    led.drive(false);
                    Outcome::Handled
                }
                Trigger::User(LedSignal::Timer) => Outcome::Transition(led_on),
                _ => Outcome::Unhandled,
            }
        });

    let machine = MachineBuilder::new(builder.build().unwrap())
        .context(Led::new())
        .initial(not_blinking)
        .record_history()
        .build()
        .unwrap();

    (
        machine,
        States {
            not_blinking,
            blinking,
            led_on,
            led_off,
        },
    )
}

#[test]
fn starts_not_blinking_with_led_off() {
    let (mut machine, states) = led_machine();

    assert_eq!(machine.current(), states.not_blinking);
    assert_eq!(machine.context().mode, Mode::NotBlinking);
    assert!(!machine.context().lit);
    assert_eq!(machine.context_mut().take_trace(), vec!["not_blinking:entry"]);
}

#[test]
fn user_signal_toggles_led_in_place() {
    let (mut machine, states) = led_machine();

    machine.dispatch_signal(LedSignal::User).unwrap();
    assert!(machine.context().lit);
    assert_eq!(machine.current(), states.not_blinking);

    machine.dispatch_signal(LedSignal::User).unwrap();
    assert!(!machine.context().lit);
    assert_eq!(machine.current(), states.not_blinking);
}

#[test]
fn full_blink_scenario() {
    let (mut machine, states) = led_machine();
    machine.context_mut().take_trace();

    machine.dispatch_signal(LedSignal::User).unwrap();
    machine.dispatch_signal(LedSignal::User).unwrap();
    assert!(machine.context_mut().take_trace().is_empty());

    // Into the composite state and its default child
    machine.dispatch_signal(LedSignal::ToggleBlink).unwrap();
    assert_eq!(machine.current(), states.led_on);
    assert!(machine.is_in(states.blinking));
    assert_eq!(machine.context().mode, Mode::Blinking);
    assert!(machine.context().lit);
    assert_eq!(
        machine.context_mut().take_trace(),
        vec!["not_blinking:exit", "blinking:entry", "led_on:entry"]
    );

    // Sibling transition under the common parent
    machine.dispatch_signal(LedSignal::Timer).unwrap();
    assert_eq!(machine.current(), states.led_off);
    assert!(!machine.context().lit);
    assert_eq!(
        machine.context_mut().take_trace(),
        vec!["led_on:exit", "led_off:entry"]
    );

    machine.dispatch_signal(LedSignal::Timer).unwrap();
    assert_eq!(machine.current(), states.led_on);
    machine.dispatch_signal(LedSignal::Timer).unwrap();
    assert_eq!(machine.current(), states.led_off);
    machine.context_mut().take_trace();

    // Bubbled toggle leaves both levels
    machine.dispatch_signal(LedSignal::ToggleBlink).unwrap();
    assert_eq!(machine.current(), states.not_blinking);
    assert_eq!(machine.context().mode, Mode::NotBlinking);
    assert!(!machine.context().lit);
    assert_eq!(
        machine.context_mut().take_trace(),
        vec!["led_off:exit", "blinking:exit", "not_blinking:entry"]
    );

    assert_eq!(
        machine.context().writes,
        vec![false, true, false, true, false, true, false, false]
    );
}

#[test]
fn leaving_blink_mode_forces_led_off_from_either_child() {
    let (mut machine, states) = led_machine();

    machine.dispatch_signal(LedSignal::ToggleBlink).unwrap();
    assert_eq!(machine.current(), states.led_on);
    assert!(machine.context().lit);

    machine.dispatch_signal(LedSignal::ToggleBlink).unwrap();
    assert_eq!(machine.current(), states.not_blinking);
    assert!(!machine.context().lit);
}

#[test]
fn timer_is_ignored_when_not_blinking() {
    let (mut machine, states) = led_machine();
    machine.context_mut().take_trace();

    machine.dispatch_signal(LedSignal::Timer).unwrap();

    assert_eq!(machine.current(), states.not_blinking);
    assert!(machine.context_mut().take_trace().is_empty());
}

#[test]
fn history_records_each_pass() {
    let (mut machine, states) = led_machine();

    machine.dispatch_signal(LedSignal::ToggleBlink).unwrap();
    machine.dispatch_signal(LedSignal::Timer).unwrap();

    let history = machine.history().unwrap();
    assert_eq!(
        history.get_path(),
        vec![
            states.not_blinking,
            states.blinking,
            states.led_on,
            states.led_off
        ]
    );
    let names: Vec<&str> = history
        .transitions()
        .iter()
        .map(|t| t.target_name.as_str())
        .collect();
    assert_eq!(names, vec!["blinking", "led_on", "led_off"]);
}

/// Drive the machine from a simulated 100 ms clock: the timer fires every
/// 500 ms but only while blinking, and a button toggles the mode every
/// second. Returns the times at which the timer was dispatched.
fn run_clock(machine: &mut Machine<Led>, mut now: u64, end: u64) -> Vec<u64> {
    let (mut last_timer, mut last_press) = (0u64, 0u64);
    let mut ticks = Vec::new();
    while now < end {
        if machine.context().mode == Mode::Blinking && now - last_timer >= 500 {
            machine.dispatch_signal(LedSignal::Timer).unwrap();
            ticks.push(now);
            last_timer = now;
        }
        if now - last_press >= 1_000 {
            machine.dispatch_signal(LedSignal::ToggleBlink).unwrap();
            last_press = now;
        }
        now += 100;
    }
    ticks
}

#[test]
fn simulated_clock_gates_timer_on_mode() {
    let (mut machine, states) = led_machine();
    machine.dispatch_signal(LedSignal::User).unwrap();
    machine.dispatch_signal(LedSignal::User).unwrap();
    machine.dispatch_signal(LedSignal::ToggleBlink).unwrap();

    let ticks = run_clock(&mut machine, 500, 5_000);

    // Idle during 1000..2000 and 3000..4000
    assert_eq!(ticks, vec![500, 1_000, 2_100, 2_600, 4_100, 4_600]);
    assert_eq!(machine.current(), states.led_on);
    assert_eq!(machine.context().mode, Mode::Blinking);
    assert!(machine.context().lit);
}
