//! Digital rain firmware for an ESP32-S3 with a 240x240 ST7789 TFT
//!
//! Wiring (SPI2, no MISO, CS tied low on the module):
//! - SCK  GPIO12
//! - MOSI GPIO11
//! - DC   GPIO46
//! - RST  GPIO47

#[cfg(target_os = "espidf")]
mod firmware {
    use anyhow::anyhow;
    use display_interface::DisplayError;
    use display_interface_spi::SPIInterface;
    use embedded_graphics::mono_font::ascii::FONT_10X20;
    use mipidsi::models::ST7789;
    use mipidsi::options::ColorInversion;
    use mipidsi::Builder;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    use esp_idf_svc::hal::delay::{Delay, FreeRtos};
    use esp_idf_svc::hal::gpio;
    use esp_idf_svc::hal::peripherals::Peripherals;
    use esp_idf_svc::hal::prelude::*;
    use esp_idf_svc::hal::spi;

    use digitalrain::canvas::PanelCanvas;
    use digitalrain::clock::SystemClock;
    use digitalrain::rain::{DigitalRain, Palette, RainConfig};

    const DISPLAY_WIDTH: u16 = 240;
    const DISPLAY_HEIGHT: u16 = 240;

    /// Letters revealed right after start-up
    const STARTUP_KEY_LENGTH: i32 = 12;

    fn display_error(context: &str, e: DisplayError) -> anyhow::Error {
        log::error!("{}: {:?}", context, e);
        anyhow!("{}: {:?}", context, e)
    }

    /// Hardware random number, seeded by the RF subsystem when it is running
    fn hardware_seed() -> u64 {
        // SAFETY: esp_random only reads the RNG register
        let (high, low) = unsafe {
            (
                esp_idf_svc::sys::esp_random(),
                esp_idf_svc::sys::esp_random(),
            )
        };
        (u64::from(high) << 32) | u64::from(low)
    }

    // https://docs.esp-rs.org/esp-idf-svc/esp_idf_svc/
    pub fn run() -> anyhow::Result<()> {
        // It is necessary to call this function once. Otherwise some patches to the runtime
        // implemented by esp-idf-sys might not link properly. See https://github.com/esp-rs/esp-idf-template/issues/71
        esp_idf_svc::sys::link_patches();

        // Bind the log crate to the ESP Logging facilities
        esp_idf_svc::log::EspLogger::initialize_default();

        let peripherals = Peripherals::take()?;
        let pins = peripherals.pins;

        log::info!("Configuring SPI for the ST7789");
        let spi = spi::SpiDeviceDriver::new_single(
            peripherals.spi2,
            pins.gpio12,                    // SCK
            pins.gpio11,                    // MOSI
            Option::<gpio::AnyIOPin>::None, // No MISO needed for display
            Option::<gpio::AnyOutputPin>::None,
            &spi::SpiDriverConfig::new(),
            &spi::SpiConfig::new()
                .baudrate(40.MHz().into())
                .data_mode(spi::config::MODE_3),
        )?;

        let dc = gpio::PinDriver::output(pins.gpio46)?;
        let rst = gpio::PinDriver::output(pins.gpio47)?;
        let mut delay = Delay::default();

        log::info!("Initializing {}x{} panel", DISPLAY_WIDTH, DISPLAY_HEIGHT);
        let panel = Builder::new(ST7789, SPIInterface::new(spi, dc))
            .display_size(DISPLAY_WIDTH, DISPLAY_HEIGHT)
            .invert_colors(ColorInversion::Inverted)
            .reset_pin(rst)
            .init(&mut delay)
            .map_err(|e| {
                log::error!("Display init failed: {:?}", e);
                anyhow!("Display init failed: {:?}", e)
            })?;

        let canvas = PanelCanvas::new(panel, &FONT_10X20);
        let mut rain = DigitalRain::new(
            canvas,
            RainConfig::default(),
            Palette::default(),
            SystemClock::new(),
            SmallRng::seed_from_u64(hardware_seed()),
        )?;

        rain.clear()
            .map_err(|e| display_error("Failed to clear display", e))?;

        let key = rain.set_key(STARTUP_KEY_LENGTH);
        log::info!("Revealing key {}", key);

        loop {
            rain.poll()
                .map_err(|e| display_error("Failed to draw frame", e))?;

            // Let the idle task run so the task watchdog stays fed
            FreeRtos::delay_ms(1);
        }
    }
}

#[cfg(target_os = "espidf")]
fn main() -> anyhow::Result<()> {
    firmware::run()
}

#[cfg(not(target_os = "espidf"))]
fn main() -> anyhow::Result<()> {
    anyhow::bail!("digitalrain firmware only runs on ESP-IDF targets, the animation engine is available as a library")
}
