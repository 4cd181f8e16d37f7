//! Human-readable snapshots served by the read endpoints.

use crate::hal::serial::{BaudRate, DeviceConfig};
use crate::peripheral::mini_uart::{DeviceStats, StatusSnapshot};
use alloc::string::String;
use core::fmt::Write;

fn yes_no(flag: bool) -> &'static str {
    if flag { "Yes" } else { "No" }
}

pub fn config_text(config: &DeviceConfig) -> String {
    let mut out = String::new();
    let _ = write!(
        out,
        "UART Configuration\n\
         ==================\n\
         Baudrate: {}\n\
         Data bits: {}\n\
         System clock: {} Hz\n\
         \nSupported baud rates:\n  ",
        config.baud_rate,
        config.data_bits.count(),
        config.system_clock_hz,
    );

    for (i, rate) in BaudRate::ALL.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        let _ = write!(out, "{rate}");
    }

    out.push_str(
        "\n\nTo change configuration, write:\n  \
         echo \"baud=115200\" > /proc/uart_config\n  \
         echo \"bits=7\" > /proc/uart_config\n  \
         echo \"clear_fifo\" > /proc/uart_config\n",
    );
    out
}

pub fn status_text(status: &StatusSnapshot) -> String {
    let mut out = String::new();
    let _ = write!(
        out,
        "UART Status\n\
         ===========\n\
         TX FIFO empty: {}\n\
         TX FIFO full: {}\n\
         RX FIFO has data: {}\n\
         RX FIFO overrun: {}\n\
         TX FIFO level: {}\n\
         RX FIFO level: {}\n",
        yes_no(status.tx_empty),
        yes_no(status.tx_full),
        yes_no(status.rx_has_data),
        if status.rx_overrun { "Yes (ERROR!)" } else { "No" },
        status.tx_level,
        status.rx_level,
    );
    out
}

pub fn stats_text(stats: &DeviceStats) -> String {
    let mut out = String::new();
    let _ = write!(
        out,
        "UART Statistics\n\
         ===============\n\
         TX bytes: {}\n\
         RX bytes: {}\n\
         TX errors: {}\n\
         RX errors: {}\n\
         FIFO overruns: {}\n\
         \nTo reset: echo \"reset_stats\" > /proc/uart_config\n",
        stats.tx_bytes, stats.rx_bytes, stats.tx_errors, stats.rx_errors, stats.fifo_overruns,
    );
    out
}
