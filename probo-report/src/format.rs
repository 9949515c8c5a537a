//! Time Formatting
//!
//! All internal timing is in nanoseconds; `TimeFormat` controls the unit
//! used for display. `Auto` picks a unit from the magnitude of the value.

/// Display unit for timing values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeFormat {
    /// Pick the unit from the value's magnitude.
    #[default]
    Auto,
    /// Seconds.
    Secs,
    /// Milliseconds.
    Millis,
    /// Microseconds.
    Micros,
    /// Nanoseconds.
    Nanos,
}

impl std::str::FromStr for TimeFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(TimeFormat::Auto),
            "s" | "secs" | "seconds" => Ok(TimeFormat::Secs),
            "ms" | "millis" | "milliseconds" => Ok(TimeFormat::Millis),
            "us" | "micros" | "microseconds" => Ok(TimeFormat::Micros),
            "ns" | "nanos" | "nanoseconds" => Ok(TimeFormat::Nanos),
            other => Err(format!("Unknown time format: {}", other)),
        }
    }
}

impl TimeFormat {
    /// Format a nanosecond value in this unit.
    pub fn format(&self, ns: f64) -> String {
        match self {
            TimeFormat::Auto => {
                if ns >= 1e9 {
                    format!("{:.3} s", ns / 1e9)
                } else if ns >= 1e6 {
                    format!("{:.3} ms", ns / 1e6)
                } else if ns >= 1e3 {
                    format!("{:.3} us", ns / 1e3)
                } else {
                    format!("{:.1} ns", ns)
                }
            }
            TimeFormat::Secs => format!("{:.6} s", ns / 1e9),
            TimeFormat::Millis => format!("{:.4} ms", ns / 1e6),
            TimeFormat::Micros => format!("{:.3} us", ns / 1e3),
            TimeFormat::Nanos => format!("{:.1} ns", ns),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parsing_aliases() {
        assert_eq!("auto".parse::<TimeFormat>(), Ok(TimeFormat::Auto));
        assert_eq!("ms".parse::<TimeFormat>(), Ok(TimeFormat::Millis));
        assert_eq!("millis".parse::<TimeFormat>(), Ok(TimeFormat::Millis));
        assert_eq!("US".parse::<TimeFormat>(), Ok(TimeFormat::Micros));
        assert!("minutes".parse::<TimeFormat>().is_err());
    }

    #[test]
    fn test_auto_picks_unit_by_magnitude() {
        assert_eq!(TimeFormat::Auto.format(12.0), "12.0 ns");
        assert_eq!(TimeFormat::Auto.format(1_500.0), "1.500 us");
        assert_eq!(TimeFormat::Auto.format(2_500_000.0), "2.500 ms");
        assert_eq!(TimeFormat::Auto.format(3_000_000_000.0), "3.000 s");
    }

    #[test]
    fn test_fixed_units() {
        assert_eq!(TimeFormat::Nanos.format(42.0), "42.0 ns");
        assert_eq!(TimeFormat::Millis.format(1_500_000.0), "1.5000 ms");
        assert_eq!(TimeFormat::Secs.format(500_000.0), "0.000500 s");
    }
}
