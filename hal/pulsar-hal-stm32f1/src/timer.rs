//! TIM1 PWM pulse generator
//!
//! Counts up in PWM mode 1 on one output channel and raises a DMA request
//! on every update event. The DMA channel writes the next compare code into
//! the channel's CCR register, so each period carries one encoded bit.

use embassy_stm32::pac::timer::{vals, TimAdv};
use pulsar_hal::{PulseTimer, TimerSetup};

/// PWM timer output driving a WS2812 data line
pub struct PwmPulseTimer {
    regs: TimAdv,
    /// Zero-based output channel (0 = CH1)
    channel: usize,
}

impl PwmPulseTimer {
    /// Bind output `channel` (0 = CH1 .. 3 = CH4) of an advanced timer
    ///
    /// The output pin must already be in alternate-function push-pull mode.
    pub fn new(regs: TimAdv, channel: usize) -> Self {
        debug_assert!(channel < 4);
        Self { regs, channel }
    }

    /// Address of the compare register the DMA channel must write
    pub fn compare_register(&self) -> u32 {
        self.regs.ccr(self.channel).as_ptr() as u32
    }
}

impl PulseTimer for PwmPulseTimer {
    fn configure(&mut self, setup: &TimerSetup) {
        let r = self.regs;
        r.cr1().modify(|w| {
            w.set_cen(false);
            w.set_dir(vals::Dir::UP);
        });
        r.psc().write_value(setup.prescaler);
        r.arr().write(|w| w.set_arr(setup.reload));
        // Load the prescaler now instead of at the first overflow
        r.egr().write(|w| w.set_ug(true));

        r.ccmr_output(self.channel / 2)
            .modify(|w| w.set_ocm(self.channel % 2, vals::Ocm::PWM_MODE1));
        r.ccr(self.channel).write(|w| w.set_ccr(0));
        r.ccer().modify(|w| w.set_cce(self.channel, true));
        r.bdtr().modify(|w| w.set_moe(true));
        r.dier().modify(|w| w.set_ude(true));
    }

    fn start(&mut self) {
        self.regs.cr1().modify(|w| w.set_cen(true));
    }

    fn stop(&mut self) {
        self.regs.cr1().modify(|w| w.set_cen(false));
    }

    fn set_counter(&mut self, value: u16) {
        self.regs.cnt().write(|w| w.set_cnt(value));
    }
}
