//! The discrete timeout ladder supported by the watchdog oscillator, and
//! selection of the best rung for a requested upper bound.
//!
//! Selection is pure arithmetic; nothing here touches the peripheral.

/// One of the watchdog periods the hardware can count. The discriminant is
/// the WDTO selector value whose WDP3..WDP0 bits go in the control register.
///
/// Periods are nominal: the watchdog runs from the internal 128kHz
/// oscillator, so actual periods drift with supply voltage and temperature.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Timeout {
    Ms15 = 0,
    Ms30 = 1,
    Ms60 = 2,
    Ms120 = 3,
    Ms250 = 4,
    Ms500 = 5,
    Ms1000 = 6,
    Ms2000 = 7,
    Ms4000 = 8,
    Ms8000 = 9,
}

impl Timeout {
    /// Every supported period, shortest first.
    pub const LADDER: [Self; 10] = [
        Self::Ms15,
        Self::Ms30,
        Self::Ms60,
        Self::Ms120,
        Self::Ms250,
        Self::Ms500,
        Self::Ms1000,
        Self::Ms2000,
        Self::Ms4000,
        Self::Ms8000,
    ];

    /// The guaranteed period, in milliseconds.
    pub const fn ms(self) -> u32 {
        match self {
            Self::Ms15 => 15,
            Self::Ms30 => 30,
            Self::Ms60 => 60,
            Self::Ms120 => 120,
            Self::Ms250 => 250,
            Self::Ms500 => 500,
            Self::Ms1000 => 1_000,
            Self::Ms2000 => 2_000,
            Self::Ms4000 => 4_000,
            Self::Ms8000 => 8_000,
        }
    }

    /// Longest supported period that does not exceed `max_period_ms`.
    ///
    /// `0` means "no bound requested" and selects the longest period, as does
    /// anything at or above it. Requests below the shortest period clamp up
    /// to [`Timeout::Ms15`]; this function never fails.
    pub fn from_max_period(max_period_ms: u32) -> Self {
        if max_period_ms == 0 {
            return Self::Ms8000;
        }
        // Walk from the longest rung down; the first at or below the request
        // wins, so exact rung values select themselves.
        for &timeout in Self::LADDER.iter().rev() {
            if timeout.ms() <= max_period_ms {
                return timeout;
            }
        }
        Self::Ms15
    }

    /// WDP3..WDP0 placed at their control register positions: WDP3 sits at
    /// bit 5, on the far side of WDE and WDCE, while WDP2..0 are bits 2..0.
    pub(crate) const fn prescaler_bits(self) -> u8 {
        let wdto = self as u8;
        ((wdto & 0b1000) << 2) | (wdto & 0b0111)
    }
}

/// Quantize a requested upper bound to `(selected rung, its period in ms)`.
///
/// The returned period is what [`crate::Watchdog::enable`] and
/// [`crate::Watchdog::sleep`] report for the same request.
pub fn select_timeout(max_period_ms: u32) -> (Timeout, u32) {
    let timeout = Timeout::from_max_period(max_period_ms);
    (timeout, timeout.ms())
}

impl From<u32> for Timeout {
    /// Quantizes; equivalent to [`Timeout::from_max_period`].
    fn from(max_period_ms: u32) -> Self {
        Self::from_max_period(max_period_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rung_values_select_themselves() {
        for &timeout in Timeout::LADDER.iter() {
            assert_eq!(Timeout::from_max_period(timeout.ms()), timeout);
        }
    }

    #[test]
    fn zero_selects_longest() {
        assert_eq!(select_timeout(0), (Timeout::Ms8000, 8_000));
    }

    #[test]
    fn above_ladder_clamps_to_longest() {
        assert_eq!(select_timeout(8_001), (Timeout::Ms8000, 8_000));
        assert_eq!(select_timeout(10_000), (Timeout::Ms8000, 8_000));
        assert_eq!(select_timeout(u32::MAX), (Timeout::Ms8000, 8_000));
    }

    #[test]
    fn below_ladder_clamps_to_shortest() {
        for request in 1..15 {
            assert_eq!(Timeout::from_max_period(request), Timeout::Ms15);
        }
    }

    #[test]
    fn rounds_down_between_rungs() {
        assert_eq!(select_timeout(16).1, 15);
        assert_eq!(select_timeout(50).1, 30);
        assert_eq!(select_timeout(300).1, 250);
        assert_eq!(select_timeout(999).1, 500);
        assert_eq!(select_timeout(1_999).1, 1_000);
        assert_eq!(select_timeout(7_999).1, 4_000);
    }

    #[test]
    fn monotonic_over_bounded_requests() {
        // 0 is excluded: it aliases "no bound", ie the longest period.
        let mut previous = 0;
        for request in 1..=9_000 {
            let (_, actual) = select_timeout(request);
            assert!(actual >= previous, "inversion at request {request}");
            previous = actual;
        }
    }

    #[test]
    fn selectors_are_wdto_values() {
        for (wdto, &timeout) in Timeout::LADDER.iter().enumerate() {
            assert_eq!(timeout as u8, wdto as u8);
        }
    }

    #[test]
    fn prescaler_bits_skip_wde_and_wdce() {
        // WDP3 moves from bit 3 of the selector to bit 5 of the register.
        assert_eq!(Timeout::Ms15.prescaler_bits(), 0b0000_0000);
        assert_eq!(Timeout::Ms2000.prescaler_bits(), 0b0000_0111);
        assert_eq!(Timeout::Ms4000.prescaler_bits(), 0b0010_0000);
        assert_eq!(Timeout::Ms8000.prescaler_bits(), 0b0010_0001);
    }

    #[test]
    fn quantizing_from_u32() {
        assert_eq!(Timeout::from(120_u32), Timeout::Ms120);
        assert_eq!(Timeout::from(121_u32), Timeout::Ms120);
    }
}
