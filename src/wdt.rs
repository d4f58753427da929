//! Watchdog timer (WDT). Covers the classic reset-on-expiry role, and
//! interrupt-only mode used to wake from power-down sleep after a bounded
//! interval. See the `Watchdog Timer` section of the datasheet (ATmega328P
//! datasheet, section 10.8) for the timed configuration sequences.

use cfg_if::cfg_if;

use crate::{
    low_power,
    pac,
    timeout::Timeout,
};

// ATtiny parts name the control register WDTCR rather than WDTCSR. The bit
// layout is identical.
cfg_if! {
    if #[cfg(wdtcr)] {
        macro_rules! control {
            ($regs:expr) => {
                $regs.wdtcr
            };
        }
    } else {
        macro_rules! control {
            ($regs:expr) => {
                $regs.wdtcsr
            };
        }
    }
}

/// WDE position in the control register, for the raw configuration writes.
const WDE: u8 = 3;

/// Watchdog driver. Owns the WDT peripheral, along with the one piece of
/// driver state: the period most recently armed for reset-mode protection.
/// Construct once per device.
pub struct Watchdog {
    regs: pac::WDT,
    /// Reset-mode period armed via `enable`; `None` when protection is off.
    /// [`Watchdog::sleep`] reads this to restore protection after waking,
    /// and must never overwrite it with its transient wake period.
    armed: Option<Timeout>,
}

impl Watchdog {
    /// Take ownership of the peripheral. Doesn't touch the hardware.
    ///
    /// Note that after a watchdog-induced reset, WDRF in MCUSR forces the
    /// watchdog to stay running at the shortest period. Firmware that can
    /// reset this way should call [`Watchdog::disable`] (which clears WDRF)
    /// early in startup, before the 15ms window lapses.
    pub fn new(regs: pac::WDT) -> Self {
        Self { regs, armed: None }
    }

    /// Arm reset-mode protection for at most `max_period_ms` milliseconds
    /// (`0` = the 8000ms maximum), and return the actual guaranteed period.
    ///
    /// Once this returns, the device hard-resets unless [`Watchdog::feed`]
    /// is called within every returned window.
    pub fn enable(&mut self, max_period_ms: u32) -> u32 {
        let timeout = Timeout::from_max_period(max_period_ms);
        self.enable_timeout(timeout);
        timeout.ms()
    }

    /// Arm reset-mode protection at an exact rung of the ladder.
    pub fn enable_timeout(&mut self, timeout: Timeout) {
        self.armed = Some(timeout);

        avr_device::interrupt::free(|_| {
            // 1. Reset the count so the new period starts from zero.
            avr_device::asm::wdr();
            // 2. Set WDCE and WDE to open the change window.
            control!(self.regs).modify(|_, w| w.wdce().set_bit().wde().set_bit());
            // 3. Within 4 cycles: write WDE plus the prescaler in one go,
            //    which also closes the window.
            control!(self.regs)
                .write(|w| unsafe { w.bits((1 << WDE) | timeout.prescaler_bits()) });
        });
    }

    /// Reset the countdown. Call at an interval shorter than the armed
    /// period to prevent a device reset.
    pub fn feed(&mut self) {
        avr_device::asm::wdr();
    }

    /// Disarm the watchdog entirely and clear the recorded period. A no-op
    /// (beyond the register traffic) when already disabled.
    pub fn disable(&mut self) {
        self.armed = None;

        avr_device::interrupt::free(|_| {
            avr_device::asm::wdr();
            // WDRF overrides a cleared WDE, so it has to go first.
            let cpu = unsafe { &(*pac::CPU::ptr()) };
            cpu.mcusr.modify(|_, w| w.wdrf().clear_bit());
            // Timed sequence, as in `enable_timeout`: open the change window,
            // then clear every bit including WDE.
            control!(self.regs).modify(|_, w| w.wdce().set_bit().wde().set_bit());
            control!(self.regs).write(|w| unsafe { w.bits(0) });
        });
    }

    /// Sleep in power-down mode for at most `max_period_ms` milliseconds
    /// (`0` = the 8000ms maximum), woken by watchdog expiry. Returns the
    /// actual period slept, which is what [`select_timeout`] reports for the
    /// same request.
    ///
    /// The watchdog is borrowed as the wake timer for the duration: it is
    /// reprogrammed to interrupt-only mode so expiry wakes the MCU instead
    /// of resetting it, and any protection armed via [`Watchdog::enable`]
    /// beforehand is re-armed at its original period on wake. An unrelated
    /// interrupt source, if one is left enabled, ends the sleep early; the
    /// watchdog then keeps interrupting at this period until the next
    /// `enable`/`disable`/`sleep` call reprograms it.
    ///
    /// Global interrupts are unmasked on return (sleeping requires them).
    ///
    /// [`select_timeout`]: crate::select_timeout
    pub fn sleep(&mut self, max_period_ms: u32) -> u32 {
        let timeout = Timeout::from_max_period(max_period_ms);

        // The next section is timing critical, so interrupts are masked for
        // all of it.
        avr_device::interrupt::free(|_| {
            // Clear any stale watchdog reset flag first.
            let cpu = unsafe { &(*pac::CPU::ptr()) };
            cpu.mcusr.modify(|_, w| w.wdrf().clear_bit());

            // Open the change window, then within 4 cycles write the bare
            // prescaler, leaving WDE clear. With WDIE set afterwards, expiry
            // raises the wake interrupt rather than a full device reset.
            control!(self.regs).modify(|_, w| w.wdce().set_bit().wde().set_bit());
            control!(self.regs).write(|w| unsafe { w.bits(timeout.prescaler_bits()) });
            control!(self.regs).modify(|_, w| w.wdie().set_bit());
        });

        // Blocks until the expiry interrupt (or any other) fires.
        low_power::power_down();

        // If protection was armed before the sleep, transparently restore it
        // at its original period.
        if let Some(prior) = self.armed {
            self.enable_timeout(prior);
        }

        timeout.ms()
    }
}

#[cfg(feature = "embedded_hal")]
impl embedded_hal::watchdog::WatchdogEnable for Watchdog {
    type Time = Timeout;

    fn start<T: Into<Timeout>>(&mut self, period: T) {
        self.enable_timeout(period.into());
    }
}

#[cfg(feature = "embedded_hal")]
impl embedded_hal::watchdog::Watchdog for Watchdog {
    fn feed(&mut self) {
        self.feed();
    }
}

#[cfg(feature = "embedded_hal")]
impl embedded_hal::watchdog::WatchdogDisable for Watchdog {
    fn disable(&mut self) {
        self.disable();
    }
}

// Expiry in interrupt mode has to vector somewhere: with no handler defined,
// the unhandled-interrupt path resets the device, which is exactly what
// interrupt mode exists to avoid. The handler itself has nothing to do;
// execution resumes at the sleeping call site.
#[cfg(all(target_arch = "avr", feature = "rt"))]
macro_rules! wdt_vector {
    ($chip:ident) => {
        #[avr_device::interrupt($chip)]
        fn WDT() {}
    };
}

#[cfg(all(target_arch = "avr", feature = "rt", feature = "atmega168"))]
wdt_vector!(atmega168);
#[cfg(all(target_arch = "avr", feature = "rt", feature = "atmega328p"))]
wdt_vector!(atmega328p);
#[cfg(all(target_arch = "avr", feature = "rt", feature = "atmega328pb"))]
wdt_vector!(atmega328pb);
#[cfg(all(target_arch = "avr", feature = "rt", feature = "atmega32u4"))]
wdt_vector!(atmega32u4);
#[cfg(all(target_arch = "avr", feature = "rt", feature = "atmega1280"))]
wdt_vector!(atmega1280);
#[cfg(all(target_arch = "avr", feature = "rt", feature = "atmega2560"))]
wdt_vector!(atmega2560);
#[cfg(all(target_arch = "avr", feature = "rt", feature = "attiny85"))]
wdt_vector!(attiny85);
