//! Stateful OSP message dispatcher (C5): routes decoded MIDs into epoch and
//! ephemeris events, applying the bias correction and satellite-mapping
//! rules of §4.5.
use crate::{
    error::DispatchError,
    ephemeris,
    glonass::GlonassAssembler,
    gps::GpsAssembler,
    message::{ClockStatus, Measurement, PackedEphemeris, PositionFix, ReceiverMasks, mid70},
};

/// Speed of light, m/s; used to turn the clock-status bias into a range
/// correction (§4.5).
const C: f64 = 299_792_458.0;
/// GPS L1 frequency, Hz; used for the cycle/Hz scaling of phase and Doppler.
const F_L1: f64 = 1_575_420_000.0;

/// One observation pushed into the active epoch's buffer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation {
    pub system: char,
    pub sat: u8,
    pub pseudorange: f64,
    pub carrier_phase: f64,
    pub doppler: f64,
    pub signal_strength: u8,
}

/// One completed ephemeris, already scaled to physical units by C4.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Ephemeris {
    Gps { sat: u8, matrix: [[f64; 4]; 8] },
    Glonass { slot: u8, matrix: [[f64; 4]; 4] },
}

/// One effect of feeding a message to [Dispatcher::dispatch].
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    ApproxPosition { x: f64, y: f64, z: f64, week: u16, tow: u32, nsv: u8 },
    ReceiverVersion(String),
    ObservationEpoch { week: u16, tow: f64, observations: Vec<Observation> },
    Ephemeris(Ephemeris),
}

/// Tunables the driver supplies; defaults match the receiver's own
/// power-on behaviour (bias correction on, no minimum satellite filter).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Config {
    pub min_nsv: u8,
    pub apply_bias_correction: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self { min_nsv: 0, apply_bias_correction: true }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
struct EpochState {
    week: u16,
    tow: u32,
    clk_offset: f64,
    clk_drift: f64,
}

pub struct Dispatcher {
    config: Config,
    epoch: EpochState,
    buffer: Vec<Observation>,
    /// Time tag of the first measurement buffered this epoch (§4.5).
    first_time_tag: Option<u32>,
    approx_position_recorded: bool,
    gps: GpsAssembler,
    glonass: GlonassAssembler,
}

impl Dispatcher {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            epoch: EpochState::default(),
            buffer: Vec::new(),
            first_time_tag: None,
            approx_position_recorded: false,
            gps: GpsAssembler::new(),
            glonass: GlonassAssembler::new(),
        }
    }

    /// Current `(week, tow)`, bias-corrected per §4.5; used downstream to
    /// timestamp ephemeris emissions, which carry no time tag of their own.
    pub fn current_week_tow(&self) -> (u16, f64) {
        (self.epoch.week, self.epoch.tow as f64 + self.epoch.clk_offset)
    }

    /// GLONASS carrier-frequency number for `slot`, if an almanac pair
    /// (strings 6..15) has resolved one (§4.3).
    pub fn glonass_carrier_frequency(&self, slot: u8) -> Option<i8> {
        self.glonass.table.carrier_frequency_number(slot)
    }

    /// Maps a receiver-assigned satellite id to `(system char, RINEX PRN)`
    /// per the satellite-number ranges of §6.
    fn map_satellite(&self, sat_id: u8) -> Result<(char, u8), DispatchError> {
        match sat_id {
            1..=32 => Ok(('G', sat_id)),
            70..=83 => Ok(('R', self.glonass.table.slot_for(sat_id).unwrap_or(sat_id))),
            101..=200 => Ok(('S', sat_id - 100)),
            _ => Err(DispatchError::UnknownSatellite),
        }
    }

    /// Dispatches one decoded MID. `mid` is the payload's first byte;
    /// `payload` is the full message body including that byte.
    pub fn dispatch(&mut self, mid: u8, payload: &[u8]) -> Result<Vec<Event>, DispatchError> {
        match mid {
            2 => self.handle_mid2(payload),
            6 => self.handle_mid6(payload),
            7 => self.handle_mid7(payload),
            8 => self.handle_mid8(payload),
            15 => self.handle_mid15(payload),
            19 => self.handle_mid19(payload),
            28 => self.handle_mid28(payload),
            70 => self.handle_mid70(payload),
            _ => Ok(Vec::new()),
        }
    }

    fn handle_mid2(&mut self, payload: &[u8]) -> Result<Vec<Event>, DispatchError> {
        let fix = PositionFix::parse(&payload[1..]).map_err(|_| DispatchError::BadLength)?;
        if fix.nsv < self.config.min_nsv {
            return Err(DispatchError::InsufficientSats);
        }
        if self.approx_position_recorded {
            return Ok(Vec::new());
        }
        self.approx_position_recorded = true;
        Ok(vec![Event::ApproxPosition {
            x: fix.x as f64,
            y: fix.y as f64,
            z: fix.z as f64,
            week: fix.week,
            tow: fix.tow,
            nsv: fix.nsv,
        }])
    }

    fn handle_mid6(&mut self, payload: &[u8]) -> Result<Vec<Event>, DispatchError> {
        let version = crate::message::SoftwareVersion::parse(&payload[1..]);
        Ok(vec![Event::ReceiverVersion(version.identification)])
    }

    fn handle_mid7(&mut self, payload: &[u8]) -> Result<Vec<Event>, DispatchError> {
        let status = ClockStatus::parse(&payload[1..]).map_err(|_| DispatchError::BadLength)?;
        let mut bias = status.bias as f64;
        if !self.config.apply_bias_correction {
            bias = 0.0;
        }
        self.epoch = EpochState {
            week: status.week,
            tow: status.tow,
            clk_offset: bias,
            clk_drift: status.drift as f64,
        };
        if self.buffer.is_empty() {
            return Ok(Vec::new());
        }
        let observations = self.close_epoch();
        Ok(vec![Event::ObservationEpoch {
            week: status.week,
            tow: status.tow as f64 + bias,
            observations,
        }])
    }

    fn close_epoch(&mut self) -> Vec<Observation> {
        self.first_time_tag = None;
        std::mem::take(&mut self.buffer)
    }

    fn handle_mid8(&mut self, payload: &[u8]) -> Result<Vec<Event>, DispatchError> {
        if payload.len() != 1 + 1 + 1 + 40 {
            return Err(DispatchError::BadLength);
        }
        let channel = payload[1];
        let sv = payload[2];
        let mut words = [0u32; 10];
        for (i, word) in words.iter_mut().enumerate() {
            let off = 3 + i * 4;
            *word = u32::from_be_bytes([payload[off], payload[off + 1], payload[off + 2], payload[off + 3]]);
        }
        let mut events = Vec::new();
        if (70..=83).contains(&sv) {
            if let Ok(Some(eph)) = self.glonass.ingest(channel, sv, words) {
                let mantissas = ephemeris::glonass_mantissas(&eph.strings);
                let matrix = ephemeris::scale_glonass_matrix(&mantissas);
                let slot = eph.slot.unwrap_or(sv);
                events.push(Event::Ephemeris(Ephemeris::Glonass { slot, matrix }));
            }
        } else if let Ok(Some(eph)) = self.gps.ingest(channel, sv, words) {
            let mantissas = ephemeris::gps_mantissas(
                &eph.half_words[0],
                &eph.half_words[1],
                &eph.half_words[2],
            );
            let float_matrix = ephemeris::scale_gps_matrix(&mantissas);
            events.push(Event::Ephemeris(Ephemeris::Gps { sat: eph.prn, matrix: float_matrix }));
        }
        Ok(events)
    }

    fn handle_mid15(&mut self, payload: &[u8]) -> Result<Vec<Event>, DispatchError> {
        let eph = PackedEphemeris::parse(&payload[1..]).map_err(|_| DispatchError::BadLength)?;
        let mantissas =
            ephemeris::gps_mantissas(&eph.half_words[0], &eph.half_words[1], &eph.half_words[2]);
        let matrix = ephemeris::scale_gps_matrix(&mantissas);
        Ok(vec![Event::Ephemeris(Ephemeris::Gps { sat: eph.sv, matrix })])
    }

    fn handle_mid19(&mut self, payload: &[u8]) -> Result<Vec<Event>, DispatchError> {
        ReceiverMasks::parse(&payload[1..]).map_err(|_| DispatchError::BadLength)?;
        // Masks affect acquisition, not the saved record set; recorded only
        // as a side effect for now (§4.5 "Records elevation/SNR masks").
        Ok(Vec::new())
    }

    fn handle_mid28(&mut self, payload: &[u8]) -> Result<Vec<Event>, DispatchError> {
        let m = Measurement::parse(&payload[1..]).map_err(|_| DispatchError::BadLength)?;
        match self.first_time_tag {
            Some(tag) if tag != m.time_tag => {
                self.buffer.clear();
                self.first_time_tag = Some(m.time_tag);
            }
            None => self.first_time_tag = Some(m.time_tag),
            _ => {}
        }

        let (system, sat) = match self.map_satellite(m.sat_id) {
            Ok(v) => v,
            Err(_) => return Ok(Vec::new()),
        };

        let mut pseudorange = m.pseudorange;
        let mut carrier_phase = if m.phase_valid() { m.carrier_phase } else { 0.0 };
        let mut doppler = if m.doppler_valid() { m.carrier_freq as f64 } else { 0.0 };

        if self.config.apply_bias_correction {
            pseudorange = m.pseudorange - self.epoch.clk_offset * C;
            if m.phase_valid() {
                carrier_phase = (m.carrier_phase - self.epoch.clk_offset * F_L1) * F_L1 / C;
            }
            if m.doppler_valid() {
                doppler = (m.carrier_freq as f64 - self.epoch.clk_drift) * F_L1 / C;
            }
        } else {
            if m.phase_valid() {
                carrier_phase = m.carrier_phase * F_L1 / C;
            }
            if m.doppler_valid() {
                doppler = m.carrier_freq as f64 * F_L1 / C;
            }
        }

        self.buffer.push(Observation {
            system,
            sat,
            pseudorange,
            carrier_phase,
            doppler,
            signal_strength: m.signal_strength_index(),
        });
        Ok(Vec::new())
    }

    fn handle_mid70(&mut self, payload: &[u8]) -> Result<Vec<Event>, DispatchError> {
        let blocks = mid70::parse(payload).map_err(|_| DispatchError::BadLength)?;
        let mut events = Vec::new();
        for block in blocks {
            if !block.valid {
                continue;
            }
            let mantissas = ephemeris::glonass_mantissas(&block.strings);
            let matrix = ephemeris::scale_glonass_matrix(&mantissas);
            events.push(Event::Ephemeris(Ephemeris::Glonass { slot: block.slot, matrix }));
        }
        Ok(events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mid7_payload(week: u16, tow: u32, nsv: u8, bias: u32) -> Vec<u8> {
        let mut v = vec![7u8];
        v.extend_from_slice(&week.to_be_bytes());
        v.extend_from_slice(&tow.to_be_bytes());
        v.push(nsv);
        v.extend_from_slice(&0u32.to_be_bytes());
        v.extend_from_slice(&bias.to_be_bytes());
        v
    }

    #[test]
    fn mid7_with_empty_buffer_emits_no_epoch() {
        let mut d = Dispatcher::new(Config::default());
        let events = d.dispatch(7, &mid7_payload(2200, 100, 8, 0)).unwrap();
        assert!(events.is_empty());
    }

    #[test]
    fn mid2_below_min_nsv_is_refused() {
        let mut d = Dispatcher::new(Config { min_nsv: 4, apply_bias_correction: true });
        let mut v = vec![2u8];
        v.extend_from_slice(&0i32.to_be_bytes());
        v.extend_from_slice(&0i32.to_be_bytes());
        v.extend_from_slice(&0i32.to_be_bytes());
        v.extend_from_slice(&0i16.to_be_bytes());
        v.extend_from_slice(&0i16.to_be_bytes());
        v.extend_from_slice(&0i16.to_be_bytes());
        v.extend_from_slice(&[0, 0, 0]);
        v.extend_from_slice(&2200u16.to_be_bytes());
        v.extend_from_slice(&0u32.to_be_bytes());
        v.push(2);
        assert_eq!(
            d.dispatch(2, &v).unwrap_err(),
            DispatchError::InsufficientSats
        );
    }

    #[test]
    fn mid2_records_position_only_once() {
        let mut d = Dispatcher::new(Config::default());
        let mut v = vec![2u8];
        v.extend_from_slice(&1i32.to_be_bytes());
        v.extend_from_slice(&2i32.to_be_bytes());
        v.extend_from_slice(&3i32.to_be_bytes());
        v.extend_from_slice(&0i16.to_be_bytes());
        v.extend_from_slice(&0i16.to_be_bytes());
        v.extend_from_slice(&0i16.to_be_bytes());
        v.extend_from_slice(&[0, 0, 0]);
        v.extend_from_slice(&2200u16.to_be_bytes());
        v.extend_from_slice(&0u32.to_be_bytes());
        v.push(4);
        let first = d.dispatch(2, &v).unwrap();
        assert_eq!(first.len(), 1);
        let second = d.dispatch(2, &v).unwrap();
        assert!(second.is_empty());
    }

    #[test]
    fn unknown_satellite_id_is_silently_dropped_from_mid28() {
        let mut d = Dispatcher::new(Config::default());
        let mut v = vec![28u8]; // MID byte, skipped by the parser
        v.push(1); // channel
        v.extend_from_slice(&1u32.to_be_bytes());
        v.push(250); // out of every known range
        v.extend_from_slice(&[0u8; 8 + 8 + 4 + 8]);
        v.extend_from_slice(&0u16.to_be_bytes());
        v.push(0);
        v.extend_from_slice(&[30u8; 10]);
        v.extend_from_slice(&0u16.to_be_bytes());
        let events = d.dispatch(28, &v).unwrap();
        assert!(events.is_empty());
    }
}
