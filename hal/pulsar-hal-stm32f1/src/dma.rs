//! DMA1 channel bindings
//!
//! The F1 DMA controller has no request multiplexer: each peripheral
//! request is hard-wired to one channel (USART1 TX = channel 4, USART1 RX =
//! channel 5, TIM1 update = channel 5, ...), so the caller picks the channel
//! from the reference manual's request table.

use core::sync::atomic::{compiler_fence, Ordering};

use embassy_stm32::pac::bdma::{vals, Dma};
use pulsar_hal::{ChannelConfig, CircularDma, DmaPriority, TransmitDma};

/// DMA1 channel, numbered as in the reference manual
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DmaChannel {
    Ch1,
    Ch2,
    Ch3,
    Ch4,
    Ch5,
    Ch6,
    Ch7,
}

impl DmaChannel {
    /// Zero-based register index
    fn index(self) -> usize {
        self as usize
    }
}

/// Width of the peripheral data register
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PeripheralWidth {
    /// 8-bit register (USART data register)
    Byte,
    /// 16-bit register (timer compare register)
    HalfWord,
}

impl From<PeripheralWidth> for vals::Size {
    fn from(width: PeripheralWidth) -> Self {
        match width {
            PeripheralWidth::Byte => vals::Size::BITS8,
            PeripheralWidth::HalfWord => vals::Size::BITS16,
        }
    }
}

fn priority_bits(priority: DmaPriority) -> vals::Pl {
    match priority {
        DmaPriority::Low => vals::Pl::LOW,
        DmaPriority::Medium => vals::Pl::MEDIUM,
        DmaPriority::High => vals::Pl::HIGH,
        DmaPriority::VeryHigh => vals::Pl::VERY_HIGH,
    }
}

/// One-shot memory-to-peripheral channel
///
/// Memory is read a byte at a time and widened to the peripheral register
/// width, so a byte buffer can feed a 16-bit compare register. The
/// transfer-complete interrupt is enabled; the NVIC line is left to the
/// application.
pub struct OneShotDma {
    regs: Dma,
    channel: DmaChannel,
    peripheral: u32,
    width: PeripheralWidth,
    priority: DmaPriority,
}

impl OneShotDma {
    /// Bind `channel` to the peripheral register at `peripheral`
    pub fn new(
        regs: Dma,
        channel: DmaChannel,
        peripheral: u32,
        width: PeripheralWidth,
        config: &ChannelConfig,
    ) -> Self {
        let mut dma = Self {
            regs,
            channel,
            peripheral,
            width,
            priority: config.priority,
        };
        dma.disable();
        dma.clear_transfer_complete();
        dma
    }
}

impl TransmitDma for OneShotDma {
    fn start(&mut self, source: &[u8]) {
        let ch = self.regs.ch(self.channel.index());
        ch.cr().write(|w| {
            w.set_dir(vals::Dir::FROM_MEMORY);
            w.set_minc(true);
            w.set_msize(vals::Size::BITS8);
            w.set_psize(self.width.into());
            w.set_pl(priority_bits(self.priority));
            w.set_tcie(true);
        });
        ch.par().write_value(self.peripheral);
        ch.mar().write_value(source.as_ptr() as u32);
        debug_assert!(source.len() <= Self::MAX_TRANSFER);
        ch.ndtr().write(|w| w.set_ndt(source.len() as u16));

        // Buffer writes must land before the controller starts reading
        compiler_fence(Ordering::SeqCst);
        ch.cr().modify(|w| w.set_en(true));
    }

    fn is_active(&self) -> bool {
        self.regs.ch(self.channel.index()).cr().read().en()
    }

    fn transfer_complete(&self) -> bool {
        self.regs.isr().read().tcif(self.channel.index())
    }

    fn clear_transfer_complete(&mut self) {
        self.regs
            .ifcr()
            .write(|w| w.set_tcif(self.channel.index(), true));
    }

    fn disable(&mut self) {
        self.regs
            .ch(self.channel.index())
            .cr()
            .modify(|w| w.set_en(false));
        compiler_fence(Ordering::SeqCst);
    }
}

/// Free-running peripheral-to-memory channel
///
/// Runs in circular mode with no interrupts; software only ever looks at
/// the remaining count.
pub struct CircularDmaChannel {
    regs: Dma,
    channel: DmaChannel,
    peripheral: u32,
    priority: DmaPriority,
}

impl CircularDmaChannel {
    /// Bind `channel` to the 8-bit peripheral register at `peripheral`
    pub fn new(regs: Dma, channel: DmaChannel, peripheral: u32, config: &ChannelConfig) -> Self {
        let mut dma = Self {
            regs,
            channel,
            peripheral,
            priority: config.priority,
        };
        dma.stop();
        dma
    }
}

impl CircularDma for CircularDmaChannel {
    fn start(&mut self, destination: &mut [u8]) {
        let ch = self.regs.ch(self.channel.index());
        ch.cr().write(|w| {
            w.set_dir(vals::Dir::FROM_PERIPHERAL);
            w.set_circ(true);
            w.set_minc(true);
            w.set_msize(vals::Size::BITS8);
            w.set_psize(vals::Size::BITS8);
            w.set_pl(priority_bits(self.priority));
        });
        ch.par().write_value(self.peripheral);
        ch.mar().write_value(destination.as_mut_ptr() as u32);
        debug_assert!(destination.len() <= Self::MAX_TRANSFER);
        ch.ndtr().write(|w| w.set_ndt(destination.len() as u16));

        compiler_fence(Ordering::SeqCst);
        ch.cr().modify(|w| w.set_en(true));
    }

    fn stop(&mut self) {
        self.regs
            .ch(self.channel.index())
            .cr()
            .modify(|w| w.set_en(false));
        compiler_fence(Ordering::SeqCst);
    }

    fn is_active(&self) -> bool {
        self.regs.ch(self.channel.index()).cr().read().en()
    }

    fn remaining(&self) -> usize {
        usize::from(self.regs.ch(self.channel.index()).ndtr().read().ndt())
    }
}
