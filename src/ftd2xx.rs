//! `Transport` implementation for FTDI adapters using the D2XX driver.
//!
//! Multi-channel parts such as the FT2232 enumerate one device per channel,
//! so the configured interface selects among the devices matching the
//! configured VID and PID, in enumeration order.

use std::time::Duration;
use libftd2xx::{BitMode, DeviceInfo, Ftdi, FtdiCommon};
use crate::config::DeviceConfig;
use crate::transport::{Error, Result, Settings, Transport};

/// USB transfer sizes accepted by `FT_SetUSBParameters`.
const MIN_TRANSFER_SIZE: usize = 64;
const MAX_TRANSFER_SIZE: usize = 65536;

pub struct Ftd2xxTransport {
    ft: Option<Ftdi>,
}

impl Ftd2xxTransport {
    /// Find the device matching `device` among the attached adapters.
    fn select(device: &DeviceConfig) -> Result<DeviceInfo> {
        let mut matching: Vec<DeviceInfo> = libftd2xx::list_devices()?
            .into_iter()
            .filter(|info| info.vendor_id == device.vid && info.product_id == device.pid)
            .collect();
        log::trace!("Found {} adapters matching {}", matching.len(), device);

        let index = device.interface.index();
        if index < matching.len() {
            Ok(matching.swap_remove(index))
        } else {
            Err(Error::NotFound)
        }
    }

    fn ft(&mut self) -> Result<&mut Ftdi> {
        self.ft.as_mut().ok_or(Error::Closed)
    }
}

/// Round `size` to a transfer size the driver accepts.
fn usb_transfer_size(size: usize) -> u32 {
    let size = size.max(MIN_TRANSFER_SIZE).min(MAX_TRANSFER_SIZE);
    (size - size % MIN_TRANSFER_SIZE) as u32
}

impl Transport for Ftd2xxTransport {
    fn open(device: &DeviceConfig) -> Result<Self> {
        log::debug!("Opening FTDI adapter {}", device);

        // Non-FTDI product IDs must be registered with the driver first.
        #[cfg(unix)]
        libftd2xx::set_vid_pid(device.vid, device.pid)?;

        let info = Self::select(device)?;
        log::debug!("Using adapter {:?} serial {:?}", info.description, info.serial_number);
        let mut ft = Ftdi::with_serial_number(&info.serial_number)?;
        ft.reset()?;
        Ok(Ftd2xxTransport { ft: Some(ft) })
    }

    fn configure(&mut self, settings: &Settings) -> Result<()> {
        let ft = self.ft()?;
        ft.set_usb_parameters(usb_transfer_size(settings.chunk_size))?;
        ft.set_bit_mode(settings.pin_mask, BitMode::SyncBitbang)?;
        ft.set_baud_rate(settings.baud_rate)?;
        Ok(())
    }

    fn set_latency(&mut self, level: u8) -> Result<()> {
        self.ft()?.set_latency_timer(Duration::from_millis(level as u64))?;
        Ok(())
    }

    fn write(&mut self, buf: &[u8]) -> Result<()> {
        log::trace!("TX: {} bytes", buf.len());
        self.ft()?.write_all(buf)?;
        Ok(())
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<()> {
        self.ft()?.read_all(buf)?;
        log::trace!("RX: {:02X?}", buf);
        Ok(())
    }

    fn purge_buffers(&mut self) -> Result<()> {
        self.ft()?.purge_all()?;
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        if let Some(mut ft) = self.ft.take() {
            log::debug!("Leaving bitbang mode");
            if let Err(e) = ft.set_bit_mode(0, BitMode::Reset) {
                log::warn!("Unable to leave bitbang mode: {}", e);
            }
            ft.close()?;
        }
        Ok(())
    }
}
