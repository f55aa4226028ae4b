//! LoRaWAN cryptographic operations
//!
//! This module provides the two primitives an ABP uplink needs:
//! - Payload encryption/decryption (AES-128 keystream, XOR)
//! - Message Integrity Code (MIC) computation (AES-CMAC)
//!
//! Both derive their per-frame input from the device address and the frame
//! counter, so a counter value must never be reused with another payload.

use aes::cipher::{generic_array::GenericArray, BlockEncrypt, KeyInit};
use aes::Aes128;
use cmac::{Cmac, Mac};

use crate::config::device::{AESKey, DevAddr};

/// MIC size in bytes
pub const MIC_SIZE: usize = 4;

/// Block size for AES-128
const BLOCK_SIZE: usize = 16;

/// Tag of the keystream input blocks (A_i)
const ENCRYPTION_BLOCK_TAG: u8 = 0x01;

/// Tag of the MIC leading block (B0)
const MIC_BLOCK_TAG: u8 = 0x49;

/// Direction identifiers for cryptographic operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    /// Uplink (device to network)
    Up = 0,
    /// Downlink (network to device)
    Down = 1,
}

/// Common 16-byte block layout shared by A_i and B0.
///
/// Bytes 1..5 stay zero, the counter occupies 32 bits with the upper half
/// zero.
fn nonce_block(tag: u8, dev_addr: DevAddr, fcnt: u16, dir: Direction) -> [u8; BLOCK_SIZE] {
    let mut block = [0u8; BLOCK_SIZE];
    block[0] = tag;
    block[5] = dir as u8;
    block[6..10].copy_from_slice(&dev_addr.to_le_bytes());
    block[10..14].copy_from_slice(&u32::from(fcnt).to_le_bytes());
    block
}

/// Encrypt or decrypt a payload in place
///
/// Keystream block `S_i` is AES-128 of `A_i` under `key`, where `A_i`
/// carries the device address, the frame counter and the block counter
/// `i + 1`. The payload is XORed with the keystream, the last block being
/// truncated to the remaining length. Applying the transform twice with the
/// same inputs restores the original bytes.
///
/// # Arguments
/// * `key` - Application session key
/// * `dev_addr` - Device address
/// * `fcnt` - Frame counter
/// * `dir` - Message direction
/// * `payload` - Data to encrypt/decrypt, any length
pub fn encrypt_payload(key: &AESKey, dev_addr: DevAddr, fcnt: u16, dir: Direction, payload: &mut [u8]) {
    let cipher = Aes128::new(GenericArray::from_slice(key.as_bytes()));
    let base = nonce_block(ENCRYPTION_BLOCK_TAG, dev_addr, fcnt, dir);

    for (i, chunk) in payload.chunks_mut(BLOCK_SIZE).enumerate() {
        let mut s = base;
        s[15] = (i + 1) as u8;
        cipher.encrypt_block((&mut s).into());

        for (byte, key_byte) in chunk.iter_mut().zip(s.iter()) {
            *byte ^= key_byte;
        }
    }
}

/// Compute the Message Integrity Code of a frame
///
/// AES-CMAC under the network key over `B0 | data`, truncated to
/// [`MIC_SIZE`] bytes. `data` is the MAC header, frame header, port and
/// encrypted payload; its length is folded into `B0`.
///
/// # Arguments
/// * `key` - Network session key
/// * `data` - Header and ciphertext to authenticate
/// * `dev_addr` - Device address
/// * `fcnt` - Frame counter
/// * `dir` - Message direction
pub fn compute_mic(
    key: &AESKey,
    data: &[u8],
    dev_addr: DevAddr,
    fcnt: u16,
    dir: Direction,
) -> [u8; MIC_SIZE] {
    let mut b0 = nonce_block(MIC_BLOCK_TAG, dev_addr, fcnt, dir);
    b0[15] = data.len() as u8;

    let mut cmac = <Cmac<Aes128> as Mac>::new(GenericArray::from_slice(key.as_bytes()));
    cmac.update(&b0);
    cmac.update(data);
    let tag = cmac.finalize().into_bytes();

    let mut mic = [0u8; MIC_SIZE];
    mic.copy_from_slice(&tag[..MIC_SIZE]);
    mic
}
