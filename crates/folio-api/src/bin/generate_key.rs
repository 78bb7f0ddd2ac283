//! Print a fresh `JWT_SECRET` suitable for `.env`.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use folio_core::config::MIN_JWT_SECRET_BYTES;
use rand::RngCore;

fn main() {
    let mut key = vec![0u8; MIN_JWT_SECRET_BYTES];
    rand::rng().fill_bytes(&mut key);
    println!("JWT_SECRET={}", STANDARD.encode(&key));
}
