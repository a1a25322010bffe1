//! LED blink controller
//!
//! A two-mode LED: a button press toggles the LED while the controller is
//! idle, and a second button switches blinking on and off. While blinking,
//! a periodic timer alternates the LED between its on and off states; the
//! timer is not dispatched at all while the controller is idle.
//!
//! Time is simulated. Output goes through `tracing` at `info`; run with
//! `RUST_LOG=debug` to also watch the engine plan each transition.

use hsm_engine::builder::{MachineBuilder, StateTreeBuilder};
use hsm_engine::core::{Event, Outcome, StateId, Trigger};
use hsm_engine::{signals, HsmError, Machine};
use tracing_subscriber::EnvFilter;

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

/// Application context shared by every handler.
struct LedController {
    mode: Mode,
    lit: bool,
    blink_period_ms: u64,
    on: fn(),
    off: fn(),
}

impl LedController {
    fn switch(&mut self, lit: bool) {
        self.lit = lit;
        if lit {
            (self.on)()
        } else {
            (self.off)()
        }
    }
}

const TICK_MS: u64 = 100;
const BUTTON_PERIOD_MS: u64 = 1_000;
const SIMULATION_END_MS: u64 = 5_000;

fn led_on() {
    tracing::info!("led on");
}

fn led_off() {
    tracing::info!("led off");
}

fn build_machine() -> Result<Machine<LedController>, HsmError> {
    let mut builder = StateTreeBuilder::new();
    let not_blinking = builder.state("not_blinking", StateId::ROOT)?;
    let blinking = builder.state("blinking", StateId::ROOT)?;
    let on = builder.state("led_on", blinking)?;
    let off = builder.state("led_off", blinking)?;

    builder
        .handler(not_blinking, move |led: &mut LedController, event: &Event<'_>| {
            match event.trigger::<LedSignal>() {
                Trigger::Entry => {
                    led.mode = Mode::NotBlinking;
                    led.switch(false);
                    Outcome::Handled
                }
                Trigger::User(LedSignal::ToggleBlink) => Outcome::Transition(blinking),
                Trigger::User(LedSignal::User) => {
                    let lit = !led.lit;
                    led.switch(lit);
                    Outcome::Handled
                }
                _ => Outcome::Unhandled,
            }
        })
        .handler(blinking, move |led: &mut LedController, event: &Event<'_>| {
            match event.trigger::<LedSignal>() {
                Trigger::Entry => {
                    led.mode = Mode::Blinking;
                    Outcome::Handled
                }
                Trigger::Init => Outcome::Transition(on),
                Trigger::User(LedSignal::ToggleBlink) => Outcome::Transition(not_blinking),
                _ => Outcome::Unhandled,
            }
        })
        .handler(on, move |led: &mut LedController, event: &Event<'_>| {
            match event.trigger::<LedSignal>() {
                Trigger::Entry => {
                    led.switch(true);
                    Outcome::Handled
                }
                Trigger::User(LedSignal::Timer) => Outcome::Transition(off),
                _ => Outcome::Unhandled,
            }
        })
        .handler(off, move |led: &mut LedController, event: &Event<'_>| {
            match event.trigger::<LedSignal>() {
                Trigger::Entry => {
                    led.switch(false);
                    Outcome::Handled
                }
                Trigger::User(LedSignal::Timer) => Outcome::Transition(on),
                _ => Outcome::Unhandled,
            }
        });

    let tree = builder.build()?;

    MachineBuilder::new(tree)
        .context(LedController {
            mode: Mode::NotBlinking,
            lit: false,
            blink_period_ms: 500,
            on: led_on,
            off: led_off,
        })
        .initial(not_blinking)
        .on_transition(|from, to| tracing::info!(from = from.name(), to = to.name(), "transition"))
        .record_history()
        .build()
}

fn main() -> Result<(), HsmError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    println!("=== LED Blink Controller ===\n");

    let mut machine = build_machine()?;
    println!("Start: {}", machine.current_state().name());

    let mut now = 0u64;

    println!("\nButton press x2 while idle:");
    for _ in 0..2 {
        tracing::info!(t_ms = now, "user button");
        machine.dispatch_signal(LedSignal::User)?;
        now += 200;
    }

    println!("\nStart blinking:");
    machine.dispatch_signal(LedSignal::ToggleBlink)?;
    now += 100;

    // Simulated clock ticking every 100 ms. The timer only runs while
    // blinking; a button press every second toggles the mode.
    println!("\nRunning for {} ms:", SIMULATION_END_MS);
    let period = machine.context().blink_period_ms;
    let (mut last_timer, mut last_press) = (0u64, 0u64);
    while now < SIMULATION_END_MS {
        if machine.context().mode == Mode::Blinking && now - last_timer >= period {
            tracing::info!(t_ms = now, "timer");
            machine.dispatch_signal(LedSignal::Timer)?;
            last_timer = now;
        }
        if now - last_press >= BUTTON_PERIOD_MS {
            tracing::info!(t_ms = now, "mode button");
            machine.dispatch_signal(LedSignal::ToggleBlink)?;
            last_press = now;
        }
        now += TICK_MS;
    }

    let led = machine.context();
    println!(
        "\nFinal: state={} mode={:?} lit={}",
        machine.current_state().name(),
        led.mode,
        led.lit
    );

    if let Some(history) = machine.history() {
        println!("\nTransitions recorded: {}", history.len());
        if let Some(duration) = history.duration() {
            println!("Elapsed wall time: {:?}", duration);
        }
    }

    Ok(())
}
