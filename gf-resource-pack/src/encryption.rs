//! String obfuscation used by version list files

use rand::RngCore;

/// Length of the key stored in version list headers
pub const ENCRYPT_KEY_LENGTH: usize = 4;

/// Generate a fresh random key
pub fn random_key() -> [u8; ENCRYPT_KEY_LENGTH] {
    let mut key = [0u8; ENCRYPT_KEY_LENGTH];
    rand::thread_rng().fill_bytes(&mut key);
    key
}

/// XOR every byte with the key, repeating the key as needed
pub fn xor_in_place(bytes: &mut [u8], key: &[u8]) {
    if key.is_empty() {
        return;
    }
    for (byte, k) in bytes.iter_mut().zip(key.iter().cycle()) {
        *byte ^= k;
    }
}
