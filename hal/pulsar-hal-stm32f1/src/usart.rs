//! USART register binding
//!
//! Status polling and data register access for the polled serial path, plus
//! the DMA request enables and data register address the DMA channels need.

use embassy_stm32::pac::usart::{regs, Usart};
use pulsar_hal::SerialPort;

/// USART in 8N1 mode
pub struct UsartPort {
    regs: Usart,
}

impl UsartPort {
    /// Take over a USART, leaving it disabled until a divisor is set
    ///
    /// Word length and parity keep their reset values (8 bits, none).
    pub fn new(regs: Usart) -> Self {
        regs.cr1().modify(|w| w.set_ue(false));
        Self { regs }
    }

    /// Address of the data register, for DMA peripheral addressing
    pub fn data_register(&self) -> u32 {
        self.regs.dr().as_ptr() as u32
    }

    /// Route transmit and receive requests to DMA
    pub fn enable_dma(&mut self, transmit: bool, receive: bool) {
        self.regs.cr3().modify(|w| {
            w.set_dmat(transmit);
            w.set_dmar(receive);
        });
    }
}

impl SerialPort for UsartPort {
    fn tx_ready(&self) -> bool {
        self.regs.sr().read().txe()
    }

    fn write_data(&mut self, byte: u8) {
        self.regs.dr().write(|w| w.set_dr(u16::from(byte)));
    }

    fn rx_ready(&self) -> bool {
        self.regs.sr().read().rxne()
    }

    fn read_data(&mut self) -> u8 {
        self.regs.dr().read().dr() as u8
    }

    fn set_divisor(&mut self, divisor: u32) {
        self.regs.brr().write_value(regs::Brr(divisor));
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.regs.cr1().modify(|w| {
            w.set_ue(enabled);
            w.set_te(enabled);
            w.set_re(enabled);
        });
    }
}
