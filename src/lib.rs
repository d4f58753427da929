//! Watchdog timer (WDT) driver for AVR MCUs, with support for using the same
//! peripheral to time power-down sleep.
//!
//! The watchdog can be armed in its classic role, hard-resetting the device
//! unless [`Watchdog::feed`] is called within the selected period, or borrowed
//! as a wake source: [`Watchdog::sleep`] reprograms it into interrupt-only
//! mode, enters power-down sleep until it expires, then transparently
//! restores whatever protection was armed before.
//!
//! Select exactly one chip feature, eg `atmega328p`. Programs flashed to an
//! MCU should also enable the `rt` feature so the watchdog expiry vector is
//! defined; without it, waking from [`Watchdog::sleep`] takes the
//! unhandled-interrupt path, which resets the device.

#![cfg_attr(not(test), no_std)]
#![cfg_attr(all(target_arch = "avr", feature = "rt"), feature(abi_avr_interrupt))]

// megaAVR PACs
#[cfg(feature = "atmega168")]
pub use avr_device::atmega168 as pac;

#[cfg(feature = "atmega328p")]
pub use avr_device::atmega328p as pac;

#[cfg(feature = "atmega328pb")]
pub use avr_device::atmega328pb as pac;

#[cfg(feature = "atmega32u4")]
pub use avr_device::atmega32u4 as pac;

#[cfg(feature = "atmega1280")]
pub use avr_device::atmega1280 as pac;

#[cfg(feature = "atmega2560")]
pub use avr_device::atmega2560 as pac;

// tinyAVR PACs
#[cfg(feature = "attiny85")]
pub use avr_device::attiny85 as pac;

#[cfg(chip)]
pub mod low_power;
pub mod timeout;
#[cfg(chip)]
pub mod wdt;

pub use timeout::{select_timeout, Timeout};
#[cfg(chip)]
pub use wdt::Watchdog;
