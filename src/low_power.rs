//! This module contains code used to place the MCU in low power modes.
//! Reference the `Power Management and Sleep Modes` chapter of the megaAVR
//! datasheets (section 9 in the ATmega328P datasheet).

use cfg_if::cfg_if;

use crate::pac;

/// Values correspond to the SM bits of the sleep control register.
#[derive(Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum SleepMode {
    Idle = 0b000,
    AdcNoiseReduction = 0b001,
    /// The deepest mode: only a reset, the watchdog, TWI address match, or a
    /// level interrupt on an external pin can end it.
    PowerDown = 0b010,
    #[cfg(feature = "atmega")]
    PowerSave = 0b011,
    #[cfg(feature = "atmega")]
    Standby = 0b110,
    #[cfg(feature = "atmega")]
    ExtendedStandby = 0b111,
}

/// Enter `mode` and block until an interrupt fires.
///
/// Global interrupts are unmasked just before the `sleep` instruction;
/// sleeping with them masked would never wake. They remain unmasked after
/// this returns.
pub fn sleep(mode: SleepMode) {
    let cpu = unsafe { &(*pac::CPU::ptr()) };

    cfg_if! {
        if #[cfg(smcr)] {
            cpu.smcr
                .write(|w| unsafe { w.sm().bits(mode as u8).se().set_bit() });
        } else {
            // ATtiny: SE/SM live in MCUCR, alongside bits we must not disturb.
            cpu.mcucr
                .modify(|_, w| unsafe { w.sm().bits(mode as u8).se().set_bit() });
        }
    }

    unsafe { avr_device::interrupt::enable() };
    avr_device::asm::sleep();

    // Awake again. Clear the sleep enable bit, per the datasheet
    // recommendation to avoid an unintentional sleep.
    cfg_if! {
        if #[cfg(smcr)] {
            cpu.smcr.modify(|_, w| w.se().clear_bit());
        } else {
            cpu.mcucr.modify(|_, w| w.se().clear_bit());
        }
    }
}

/// Enter the deepest sleep mode available, power-down.
pub fn power_down() {
    sleep(SleepMode::PowerDown);
}
