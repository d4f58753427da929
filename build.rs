use cfg_aliases::cfg_aliases;

fn main() {
    cfg_aliases! {
        // The watchdog control register is named WDTCR on ATtiny parts, and
        // WDTCSR everywhere else. The bit layout is the same on both.
        wdtcr: { feature = "attiny" },
        // megaAVR parts have a dedicated sleep control register (SMCR);
        // ATtiny parts keep the SE/SM bits in MCUCR.
        smcr: { feature = "atmega" },
        // Any supported chip selected at all.
        chip: { any(feature = "atmega", feature = "attiny") },
    }
}
