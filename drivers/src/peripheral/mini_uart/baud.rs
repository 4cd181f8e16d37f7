use crate::hal::serial::UartError;

/// Mini UART baud register value for `baud` given the core clock.
///
/// `baudrate = clock / (8 * (divisor + 1))`, solved with floor division.
pub fn compute_divisor(baud: u32, clock_hz: u32) -> Result<u16, UartError> {
    if baud == 0 || baud > clock_hz / 8 {
        return Err(UartError::InvalidBaudRate);
    }

    // baud <= clock / 8, so neither the product nor the quotient underflows.
    let divisor = clock_hz / (8 * baud) - 1;
    u16::try_from(divisor).map_err(|_| UartError::BaudOverflow)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hal::serial::BaudRate;

    const CLOCK: u32 = 500_000_000;

    #[test]
    fn supported_rates_match_the_divisor_formula() {
        for rate in BaudRate::ALL {
            let b = rate.bps();
            let expected = CLOCK / (8 * b) - 1;
            assert_eq!(compute_divisor(b, CLOCK), Ok(expected as u16), "{rate}");
        }
        assert_eq!(compute_divisor(115200, CLOCK), Ok(541));
        assert_eq!(compute_divisor(9600, CLOCK), Ok(6509));
        assert_eq!(compute_divisor(115200, 250_000_000), Ok(270));
    }

    #[test]
    fn rejects_zero_and_too_fast_rates() {
        assert_eq!(compute_divisor(0, CLOCK), Err(UartError::InvalidBaudRate));
        assert_eq!(
            compute_divisor(CLOCK / 8 + 1, CLOCK),
            Err(UartError::InvalidBaudRate)
        );
        assert_eq!(compute_divisor(9600, 0), Err(UartError::InvalidBaudRate));
    }

    #[test]
    fn fastest_rate_gives_zero_divisor() {
        assert_eq!(compute_divisor(CLOCK / 8, CLOCK), Ok(0));
    }

    #[test]
    fn slow_rates_overflow_the_register() {
        assert_eq!(compute_divisor(100, CLOCK), Err(UartError::BaudOverflow));
        // 500 MHz / (8 * 954) - 1 = 65512, still fits.
        assert_eq!(compute_divisor(954, CLOCK), Ok(65512));
    }
}
