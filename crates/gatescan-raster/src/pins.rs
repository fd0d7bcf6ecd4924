//! Pins the stepper drives and samples.

use gatescan_circuit::{LoadError, PinMap};
use gatescan_core::PinId;

use crate::config::RasterConfig;

/// Clock, reset, and the eight video signals, resolved to state indices.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RasterPins {
    /// Clock input.
    pub clk: PinId,
    /// Active-low reset input.
    pub rst_n: PinId,
    /// Red, most significant bit.
    pub r1: PinId,
    /// Green, most significant bit.
    pub g1: PinId,
    /// Blue, most significant bit.
    pub b1: PinId,
    /// Red, least significant bit.
    pub r0: PinId,
    /// Green, least significant bit.
    pub g0: PinId,
    /// Blue, least significant bit.
    pub b0: PinId,
    /// Horizontal sync output.
    pub hsync: PinId,
    /// Vertical sync output.
    pub vsync: PinId,
}

impl RasterPins {
    /// Resolve every pin named by `config` through the description's pin
    /// map.
    pub fn resolve(map: &PinMap, config: &RasterConfig) -> Result<Self, LoadError> {
        let bus = &config.output_bus;
        let bit = |index: usize| map.require(&format!("{bus}[{index}]"));
        let layout = &config.layout;
        Ok(Self {
            clk: map.require(&config.clock_pin)?,
            rst_n: map.require(&config.reset_pin)?,
            r1: bit(layout.r1)?,
            g1: bit(layout.g1)?,
            b1: bit(layout.b1)?,
            r0: bit(layout.r0)?,
            g0: bit(layout.g0)?,
            b0: bit(layout.b0)?,
            hsync: bit(layout.hsync)?,
            vsync: bit(layout.vsync)?,
        })
    }

    /// Highest state index among the sampled output pins.
    pub(crate) fn max_output_index(&self) -> usize {
        [
            self.r1, self.g1, self.b1, self.r0, self.g0, self.b0, self.hsync, self.vsync,
        ]
        .iter()
        .map(|p| p.index())
        .max()
        .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gatescan_test_utils::fixtures::{self, VGA_PINS};

    fn vga_map() -> PinMap {
        VGA_PINS
            .iter()
            .map(|&(name, index)| (name.to_string(), PinId(index)))
            .collect()
    }

    #[test]
    fn tiny_vga_layout_resolves_fixture_pins() {
        let pins = RasterPins::resolve(&vga_map(), &RasterConfig::default()).unwrap();
        assert_eq!(pins.clk, fixtures::CLK);
        assert_eq!(pins.rst_n, fixtures::RST_N);
        assert_eq!(pins.r1, fixtures::R1);
        assert_eq!(pins.vsync, fixtures::VSYNC);
        assert_eq!(pins.b0, fixtures::B0);
        assert_eq!(pins.hsync, fixtures::HSYNC);
        assert_eq!(pins.max_output_index(), 9);
    }

    #[test]
    fn renamed_clock_must_exist() {
        let config = RasterConfig {
            clock_pin: "clk_in".into(),
            ..RasterConfig::default()
        };
        assert_eq!(
            RasterPins::resolve(&vga_map(), &config).unwrap_err(),
            LoadError::MissingPin {
                name: "clk_in".into()
            }
        );
    }
}
