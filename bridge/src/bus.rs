//! The emulator channel and the typed memory client built on top of it.
//!
//! [`EmulatorBus`] is the narrow waist between this crate and whatever IPC
//! actually talks to the emulator (a Lua socket bridge in production, a byte
//! map in tests). All calls are synchronous and ordered; the channel carries
//! at most one outstanding request.
//!
//! [`MemoryClient`] adds little-endian typed reads, batched range reads and
//! per-scope call accounting. Transient short reads are surfaced as shorter
//! byte slices, not errors; callers validate lengths.

use crate::error::BridgeError;
use crate::metrics;

/// Outcome of a control-channel command, as reported by the emulator side.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct BusAck {
    pub ok: bool,
    pub endpoint: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl BusAck {
    #[must_use]
    pub const fn ok(endpoint: &'static str) -> Self {
        Self { ok: true, endpoint, error: None }
    }

    #[must_use]
    pub fn failed(endpoint: &'static str, error: impl Into<String>) -> Self {
        Self { ok: false, endpoint, error: Some(error.into()) }
    }
}

/// Raw emulator IPC surface (consumed interface).
///
/// `read_range` may return fewer bytes than requested on a transient bridge
/// hiccup; `read_ranges` returns the requested segments in request order,
/// each possibly short. Only a closed channel is an `Err`.
pub trait EmulatorBus {
    fn read_range(&mut self, addr: u32, len: usize) -> Result<Vec<u8>, BridgeError>;

    fn read_ranges(&mut self, ranges: &[(u32, usize)]) -> Result<Vec<Vec<u8>>, BridgeError> {
        ranges
            .iter()
            .map(|&(addr, len)| self.read_range(addr, len))
            .collect()
    }

    fn control(&mut self, command: &str) -> Result<BusAck, BridgeError>;
    fn press(&mut self, buttons: &[String]) -> Result<BusAck, BridgeError>;
    fn hold(&mut self, button: &str, frames: u32) -> Result<BusAck, BridgeError>;
    fn control_status(&mut self) -> Result<String, BridgeError>;

    fn screenshot(&mut self, path: &str) -> Result<BusAck, BridgeError>;
    fn save_state(&mut self, path: &str) -> Result<BusAck, BridgeError>;
    fn reset(&mut self) -> Result<BusAck, BridgeError>;
}

/// Typed reads plus metrics over a boxed [`EmulatorBus`].
pub struct MemoryClient {
    bus: Box<dyn EmulatorBus + Send>,
}

impl MemoryClient {
    #[must_use]
    pub fn new(bus: Box<dyn EmulatorBus + Send>) -> Self {
        Self { bus }
    }

    pub fn read_u8(&mut self, addr: u32) -> Result<u8, BridgeError> {
        let bytes = self.read_range(addr, 1)?;
        match bytes.first() {
            Some(&b) => Ok(b),
            None => Err(BridgeError::ShortRead { addr, wanted: 1, got: 0 }),
        }
    }

    pub fn read_u16(&mut self, addr: u32) -> Result<u16, BridgeError> {
        let bytes = self.read_range(addr, 2)?;
        match bytes.get(0..2) {
            Some(b) => Ok(u16::from_le_bytes([b[0], b[1]])),
            None => Err(BridgeError::ShortRead { addr, wanted: 2, got: bytes.len() }),
        }
    }

    pub fn read_u32(&mut self, addr: u32) -> Result<u32, BridgeError> {
        let bytes = self.read_range(addr, 4)?;
        match bytes.get(0..4) {
            Some(b) => Ok(u32::from_le_bytes([b[0], b[1], b[2], b[3]])),
            None => Err(BridgeError::ShortRead { addr, wanted: 4, got: bytes.len() }),
        }
    }

    /// Read `len` bytes at `addr`. The result may be shorter than `len`.
    pub fn read_range(&mut self, addr: u32, len: usize) -> Result<Vec<u8>, BridgeError> {
        let bytes = self.bus.read_range(addr, len)?;
        metrics::record_read(1, len as u64, bytes.len() as u64);
        Ok(bytes)
    }

    /// Batched read. Segments come back in request order, each possibly
    /// shorter than requested.
    pub fn read_ranges(&mut self, ranges: &[(u32, usize)]) -> Result<Vec<Vec<u8>>, BridgeError> {
        let out = self.bus.read_ranges(ranges)?;
        let requested: u64 = ranges.iter().map(|&(_, len)| len as u64).sum();
        let returned: u64 = out.iter().map(|b| b.len() as u64).sum();
        metrics::record_read(ranges.len() as u64, requested, returned);
        Ok(out)
    }

    pub fn control(&mut self, command: &str) -> Result<BusAck, BridgeError> {
        self.bus.control(command)
    }

    pub fn press(&mut self, buttons: &[String]) -> Result<BusAck, BridgeError> {
        self.bus.press(buttons)
    }

    pub fn hold(&mut self, button: &str, frames: u32) -> Result<BusAck, BridgeError> {
        self.bus.hold(button, frames)
    }

    pub fn control_status(&mut self) -> Result<String, BridgeError> {
        self.bus.control_status()
    }

    pub fn screenshot(&mut self, path: &str) -> Result<BusAck, BridgeError> {
        self.bus.screenshot(path)
    }

    pub fn save_state(&mut self, path: &str) -> Result<BusAck, BridgeError> {
        self.bus.save_state(path)
    }

    pub fn reset(&mut self) -> Result<BusAck, BridgeError> {
        self.bus.reset()
    }
}

/// In-memory bus backed by a sparse byte map. The test double used across
/// the workspace: unit tests poke bytes at absolute addresses and decoders
/// read them back through the normal client path.
#[derive(Default)]
pub struct FakeBus {
    memory: std::collections::HashMap<u32, u8>,
    pub control_log: Vec<String>,
    pub control_status_reply: String,
}

impl FakeBus {
    #[must_use]
    pub fn new() -> Self {
        Self {
            memory: std::collections::HashMap::new(),
            control_log: Vec::new(),
            control_status_reply: "queue=0,active=none".to_owned(),
        }
    }

    pub fn load(&mut self, addr: u32, bytes: &[u8]) {
        for (i, &b) in bytes.iter().enumerate() {
            self.memory.insert(addr + i as u32, b);
        }
    }

    pub fn load_u16(&mut self, addr: u32, value: u16) {
        self.load(addr, &value.to_le_bytes());
    }

    pub fn load_u32(&mut self, addr: u32, value: u32) {
        self.load(addr, &value.to_le_bytes());
    }
}

impl EmulatorBus for FakeBus {
    fn read_range(&mut self, addr: u32, len: usize) -> Result<Vec<u8>, BridgeError> {
        Ok((0..len as u32)
            .map(|i| self.memory.get(&(addr + i)).copied().unwrap_or(0))
            .collect())
    }

    fn control(&mut self, command: &str) -> Result<BusAck, BridgeError> {
        self.control_log.push(format!("control:{command}"));
        Ok(BusAck::ok("control"))
    }

    fn press(&mut self, buttons: &[String]) -> Result<BusAck, BridgeError> {
        self.control_log.push(format!("press:{}", buttons.join("+")));
        Ok(BusAck::ok("press"))
    }

    fn hold(&mut self, button: &str, frames: u32) -> Result<BusAck, BridgeError> {
        self.control_log.push(format!("hold:{button}:{frames}"));
        Ok(BusAck::ok("hold"))
    }

    fn control_status(&mut self) -> Result<String, BridgeError> {
        Ok(self.control_status_reply.clone())
    }

    fn screenshot(&mut self, path: &str) -> Result<BusAck, BridgeError> {
        self.control_log.push(format!("screenshot:{path}"));
        Ok(BusAck::ok("screenshot"))
    }

    fn save_state(&mut self, path: &str) -> Result<BusAck, BridgeError> {
        self.control_log.push(format!("save_state:{path}"));
        Ok(BusAck::ok("saveState"))
    }

    fn reset(&mut self) -> Result<BusAck, BridgeError> {
        self.control_log.push("reset".to_owned());
        Ok(BusAck::ok("reset"))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn typed_reads_are_little_endian() {
        let mut fake = FakeBus::new();
        fake.load(0x0200_0000, &[0x78, 0x56, 0x34, 0x12]);
        let mut client = MemoryClient::new(Box::new(fake));

        assert_eq!(client.read_u8(0x0200_0000).unwrap(), 0x78);
        assert_eq!(client.read_u16(0x0200_0000).unwrap(), 0x5678);
        assert_eq!(client.read_u32(0x0200_0000).unwrap(), 0x1234_5678);
    }

    #[test]
    fn batched_reads_keep_request_order() {
        let mut fake = FakeBus::new();
        fake.load(0x10, &[1, 2]);
        fake.load(0x20, &[3]);
        let mut client = MemoryClient::new(Box::new(fake));

        let out = client.read_ranges(&[(0x20, 1), (0x10, 2)]).unwrap();
        assert_eq!(out, vec![vec![3], vec![1, 2]]);
    }

    struct ClosedBus;
    impl EmulatorBus for ClosedBus {
        fn read_range(&mut self, _: u32, _: usize) -> Result<Vec<u8>, BridgeError> {
            Err(BridgeError::BridgeUnavailable)
        }
        fn control(&mut self, _: &str) -> Result<BusAck, BridgeError> {
            Err(BridgeError::BridgeUnavailable)
        }
        fn press(&mut self, _: &[String]) -> Result<BusAck, BridgeError> {
            Err(BridgeError::BridgeUnavailable)
        }
        fn hold(&mut self, _: &str, _: u32) -> Result<BusAck, BridgeError> {
            Err(BridgeError::BridgeUnavailable)
        }
        fn control_status(&mut self) -> Result<String, BridgeError> {
            Err(BridgeError::BridgeUnavailable)
        }
        fn screenshot(&mut self, _: &str) -> Result<BusAck, BridgeError> {
            Err(BridgeError::BridgeUnavailable)
        }
        fn save_state(&mut self, _: &str) -> Result<BusAck, BridgeError> {
            Err(BridgeError::BridgeUnavailable)
        }
        fn reset(&mut self) -> Result<BusAck, BridgeError> {
            Err(BridgeError::BridgeUnavailable)
        }
    }

    #[test]
    fn closed_channel_surfaces_bridge_unavailable() {
        let mut client = MemoryClient::new(Box::new(ClosedBus));
        assert_eq!(client.read_u32(0).unwrap_err(), BridgeError::BridgeUnavailable);
    }
}
