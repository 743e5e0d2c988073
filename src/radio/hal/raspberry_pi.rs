//! # Raspberry Pi HAL Implementation
//!
//! Hardware abstraction layer for driving an Si4703 breakout from a
//! Raspberry Pi 4 or 5 using the rppal crate: I2C for register access and
//! GPIO for the reset sequence that selects two-wire mode.
//!
//! ## Wiring (40-pin header, BCM numbering)
//!
//! ```text
//! Pi Pin │ BCM GPIO │ Si4703 Pin │ Function
//! ───────┼──────────┼────────────┼──────────────────────────
//! 3      │ GPIO 2   │ SDIO       │ I2C SDA, held low at reset
//! 5      │ GPIO 3   │ SCLK       │ I2C SCL
//! 16     │ GPIO 23  │ RST        │ Reset (active low)
//! 18     │ GPIO 24  │ GPIO2      │ RDS/STC interrupt (optional)
//! ```
//!
//! The interrupt pin is only opened when `rds_interrupt_pin` is configured.
//! GPIO2 pulses low for 5 ms each time a new RDS group is ready, so the pin
//! is watched for falling edges rather than sampled.
//!
//! I2C must be enabled in `/boot/config.txt` (`dtparam=i2c_arm=on`).
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use si4703_rs::{RadioConfig, RaspberryPiHal, Si4703Driver};
//!
//! let config = RadioConfig::default();
//! let hal = RaspberryPiHal::new(&config)?;
//! let mut radio = Si4703Driver::new(hal, config)?;
//! radio.power_on(false)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use crate::config::RadioConfig;
use crate::constants::{REGISTER_COUNT, WRITE_START_REGISTER};
use crate::radio::hal::{Hal, HalError};
use rppal::gpio::{Gpio, InputPin, Trigger};
use rppal::i2c::I2c;
use std::thread;
use std::time::Duration;

/// Raspberry Pi HAL implementation for the Si4703
pub struct RaspberryPiHal {
    /// I2C bus with the tuner selected as slave
    i2c: I2c,
    /// Bus number for diagnostics
    bus: u8,
    /// GPIO2 interrupt line, armed for falling edges
    rds_interrupt: Option<InputPin>,
}

impl RaspberryPiHal {
    /// Reset the tuner into two-wire mode and open the I2C bus.
    ///
    /// # Returns
    ///
    /// * `Ok(RaspberryPiHal)` - Chip reset and bus ready
    /// * `Err(HalError)` - GPIO or I2C initialisation failed
    pub fn new(config: &RadioConfig) -> Result<Self, HalError> {
        reset_to_two_wire(config.reset_pin, config.sdio_pin)?;

        let mut i2c = I2c::with_bus(config.i2c_bus)
            .map_err(|e| HalError::Bus(format!("open /dev/i2c-{}: {e}", config.i2c_bus)))?;
        i2c.set_slave_address(config.i2c_address)
            .map_err(|e| HalError::Bus(e.to_string()))?;

        log::info!("Raspberry Pi HAL initialized:");
        log::info!("  I2C: bus {} address 0x{:02X}", config.i2c_bus, config.i2c_address);
        log::info!("  RESET: GPIO {}", config.reset_pin);
        log::info!("  SDIO: GPIO {}", config.sdio_pin);

        let rds_interrupt = match config.rds_interrupt_pin {
            Some(pin) => {
                log::info!("  RDS INT: GPIO {pin}");
                Some(open_interrupt_pin(pin)?)
            }
            None => None,
        };

        Ok(Self {
            i2c,
            bus: config.i2c_bus,
            rds_interrupt,
        })
    }

    /// I2C bus number in use
    pub fn bus(&self) -> u8 {
        self.bus
    }
}

/// Select the two-wire interface: SDIO must be low while RST rises.
///
/// SDIO is released afterwards, which hands the pin back to the I2C
/// peripheral. RST stays high when its handle is dropped.
fn reset_to_two_wire(reset_pin: u8, sdio_pin: u8) -> Result<(), HalError> {
    let gpio = Gpio::new().map_err(|e| HalError::Gpio(e.to_string()))?;
    let mut sdio = gpio
        .get(sdio_pin)
        .map_err(|e| HalError::Gpio(format!("SDIO GPIO {sdio_pin}: {e}")))?
        .into_output();
    let mut reset = gpio
        .get(reset_pin)
        .map_err(|e| HalError::Gpio(format!("RST GPIO {reset_pin}: {e}")))?
        .into_output();

    log::debug!("Resetting Si4703 into two-wire mode");
    sdio.set_low();
    reset.set_low();
    thread::sleep(Duration::from_millis(1));
    reset.set_high();
    thread::sleep(Duration::from_millis(1));

    reset.set_reset_on_drop(false);
    Ok(())
}

fn open_interrupt_pin(pin: u8) -> Result<InputPin, HalError> {
    let gpio = Gpio::new().map_err(|e| HalError::Gpio(e.to_string()))?;
    let mut input = gpio
        .get(pin)
        .map_err(|e| HalError::Gpio(format!("RDS INT GPIO {pin}: {e}")))?
        .into_input_pullup();
    input
        .set_interrupt(Trigger::FallingEdge)
        .map_err(|e| HalError::Gpio(format!("RDS INT GPIO {pin}: {e}")))?;
    Ok(input)
}

impl Hal for RaspberryPiHal {
    fn read_words(&mut self, buf: &mut [u16]) -> Result<(), HalError> {
        let mut bytes = [0u8; REGISTER_COUNT * 2];
        let len = buf.len().min(REGISTER_COUNT) * 2;
        let read = self
            .i2c
            .read(&mut bytes[..len])
            .map_err(|e| HalError::Bus(e.to_string()))?;
        if read != len {
            return Err(HalError::Nack);
        }
        for (word, pair) in buf.iter_mut().zip(bytes[..len].chunks_exact(2)) {
            *word = u16::from_be_bytes([pair[0], pair[1]]);
        }
        Ok(())
    }

    fn write_words(&mut self, first_register: u8, words: &[u16]) -> Result<(), HalError> {
        if first_register != WRITE_START_REGISTER {
            return Err(HalError::InvalidConfig(format!(
                "Si4703 writes always start at 0x{WRITE_START_REGISTER:02X}, got 0x{first_register:02X}"
            )));
        }
        let bytes: Vec<u8> = words.iter().flat_map(|w| w.to_be_bytes()).collect();
        let written = self
            .i2c
            .write(&bytes)
            .map_err(|e| HalError::Bus(e.to_string()))?;
        if written != bytes.len() {
            return Err(HalError::Nack);
        }
        Ok(())
    }

    fn delay_ms(&mut self, ms: u32) {
        thread::sleep(Duration::from_millis(u64::from(ms)));
    }

    fn rds_interrupt_pending(&mut self) -> Option<bool> {
        let pin = self.rds_interrupt.as_mut()?;
        // Non-blocking: reports an edge latched since the previous poll
        match pin.poll_interrupt(false, Some(Duration::ZERO)) {
            Ok(event) => Some(event.is_some()),
            Err(e) => {
                log::warn!("RDS interrupt poll failed, falling back to status read: {e}");
                None
            }
        }
    }
}
