use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeFrameUnit {
    Minute,
    Hour,
    Day,
}

/// Bar interval as understood by a trading terminal (`M1`, `H4`, `D1`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeFrame {
    pub amount: u32,
    pub unit: TimeFrameUnit,
}

impl TimeFrame {
    /// The one-minute timeframe every volume comparison is computed on.
    pub const fn minute() -> Self {
        Self {
            amount: 1,
            unit: TimeFrameUnit::Minute,
        }
    }

    /// Terminal code of the timeframe, e.g. `M1`, `H4`, `D1`.
    pub fn code(&self) -> String {
        let prefix = match self.unit {
            TimeFrameUnit::Minute => "M",
            TimeFrameUnit::Hour => "H",
            TimeFrameUnit::Day => "D",
        };
        format!("{prefix}{}", self.amount)
    }
}

impl fmt::Display for TimeFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_codes() {
        assert_eq!(TimeFrame::minute().code(), "M1");
        let four_hours = TimeFrame {
            amount: 4,
            unit: TimeFrameUnit::Hour,
        };
        assert_eq!(four_hours.to_string(), "H4");
        let daily = TimeFrame {
            amount: 1,
            unit: TimeFrameUnit::Day,
        };
        assert_eq!(daily.code(), "D1");
    }
}
