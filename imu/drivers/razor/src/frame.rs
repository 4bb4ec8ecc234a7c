// Razor binary frame layout and field decoding

use crate::crc::compute_crc8_maxim;
use byteorder::{ByteOrder, LittleEndian};
use chrono::{DateTime, Local, SubsecRound};
use imu_traits::{ImuData, Vector3};
use serde::Serialize;

pub const SYNC_A: u8 = 0xAA;
pub const SYNC_B: u8 = 0xBB;

/// Bytes on the wire per frame: 2 sync + 49 payload + 1 checksum.
pub const FRAME_LEN: usize = 52;
/// Bytes read after the sync pair.
pub const BODY_LEN: usize = FRAME_LEN - 2;
/// Bytes covered by the checksum (sensor id through orientation).
pub const PAYLOAD_LEN: usize = BODY_LEN - 1;

// Offsets within the body, i.e. after the sync pair.
const SENSOR_ID_OFFSET: usize = 0;
const ACCELERATION_OFFSET: usize = 1;
const ANGULAR_RATE_OFFSET: usize = 13;
const MAGNETIC_FIELD_OFFSET: usize = 25;
const ORIENTATION_OFFSET: usize = 37;
const CHECKSUM_OFFSET: usize = 49;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Frame {
    pub sync_a: u8,
    pub sync_b: u8,
    pub sensor_id: u8,
    pub acceleration: Vector3,
    pub angular_rate: Vector3,
    pub magnetic_field: Vector3,
    /// Euler angles as sent: x = yaw, y = pitch, z = roll.
    pub orientation: Vector3,
    /// CRC-8/MAXIM as sent by the device. Not verified by the decoder.
    pub checksum: u8,
    /// Assigned by the decoder, 0 for the first frame of a session.
    pub sequence_index: u64,
    /// Wall-clock time the body finished reading, millisecond precision.
    pub capture_time: DateTime<Local>,
}

fn read_vector(body: &[u8], offset: usize) -> Vector3 {
    Vector3 {
        x: LittleEndian::read_f32(&body[offset..offset + 4]),
        y: LittleEndian::read_f32(&body[offset + 4..offset + 8]),
        z: LittleEndian::read_f32(&body[offset + 8..offset + 12]),
    }
}

fn write_vector(buf: &mut [u8], offset: usize, v: Vector3) {
    LittleEndian::write_f32(&mut buf[offset..offset + 4], v.x);
    LittleEndian::write_f32(&mut buf[offset + 4..offset + 8], v.y);
    LittleEndian::write_f32(&mut buf[offset + 8..offset + 12], v.z);
}

impl Frame {
    /// Decodes the 50 bytes that follow a `0xAA 0xBB` pair.
    pub fn decode(
        body: &[u8; BODY_LEN],
        sequence_index: u64,
        capture_time: DateTime<Local>,
    ) -> Self {
        Frame {
            sync_a: SYNC_A,
            sync_b: SYNC_B,
            sensor_id: body[SENSOR_ID_OFFSET],
            acceleration: read_vector(body, ACCELERATION_OFFSET),
            angular_rate: read_vector(body, ANGULAR_RATE_OFFSET),
            magnetic_field: read_vector(body, MAGNETIC_FIELD_OFFSET),
            orientation: read_vector(body, ORIENTATION_OFFSET),
            checksum: body[CHECKSUM_OFFSET],
            sequence_index,
            capture_time: capture_time.trunc_subsecs(3),
        }
    }

    /// The 49 checksummed bytes, re-encoded from the decoded fields.
    pub fn payload_bytes(&self) -> [u8; PAYLOAD_LEN] {
        let mut payload = [0u8; PAYLOAD_LEN];
        payload[SENSOR_ID_OFFSET] = self.sensor_id;
        write_vector(&mut payload, ACCELERATION_OFFSET, self.acceleration);
        write_vector(&mut payload, ANGULAR_RATE_OFFSET, self.angular_rate);
        write_vector(&mut payload, MAGNETIC_FIELD_OFFSET, self.magnetic_field);
        write_vector(&mut payload, ORIENTATION_OFFSET, self.orientation);
        payload
    }

    /// Wire form of the frame, carrying the received checksum unchanged.
    pub fn to_bytes(&self) -> [u8; FRAME_LEN] {
        let mut bytes = [0u8; FRAME_LEN];
        bytes[0] = self.sync_a;
        bytes[1] = self.sync_b;
        bytes[2..2 + PAYLOAD_LEN].copy_from_slice(&self.payload_bytes());
        bytes[FRAME_LEN - 1] = self.checksum;
        bytes
    }

    pub fn computed_checksum(&self) -> u8 {
        compute_crc8_maxim(&self.payload_bytes())
    }

    /// Whether the received checksum matches the payload. Consumers that want
    /// strict integrity filter on this; the decoder emits every frame.
    pub fn checksum_valid(&self) -> bool {
        self.computed_checksum() == self.checksum
    }
}

impl From<&Frame> for ImuData {
    fn from(frame: &Frame) -> Self {
        ImuData {
            accelerometer: Some(frame.acceleration),
            gyroscope: Some(frame.angular_rate),
            magnetometer: Some(frame.magnetic_field),
            euler: Some(frame.orientation),
            temperature: None,
        }
    }
}
