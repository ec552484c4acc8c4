//! Code Generation
//!
//! Random voucher redemption codes and affiliate referral codes. The
//! alphabet drops 0/O/1/I so codes survive being read over the phone.
//! Uniqueness is enforced by the callers against the UNIQUE columns.

use rand::Rng;

const CODE_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

fn random_block(len: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..len)
        .map(|_| CODE_ALPHABET[rng.gen_range(0..CODE_ALPHABET.len())] as char)
        .collect()
}

/// Voucher redemption code, `LOY-XXXX-XXXX`
pub fn generate_voucher_code() -> String {
    format!("LOY-{}-{}", random_block(4), random_block(4))
}

/// Affiliate referral code, 8 characters
pub fn generate_referral_code() -> String {
    random_block(8)
}
