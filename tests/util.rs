#![allow(dead_code)]

use certmodel::cert::{Certificate, RevocationList};

pub const CA_PEM: &str = include_str!("data/ca.pem");
pub const CA_DER: &[u8] = include_bytes!("data/ca.der");
pub const FULL_CRL_PEM: &str = include_str!("data/full_crl.pem");
pub const DELTA_CRL_PEM: &str = include_str!("data/delta_crl.pem");

/// SHA-1 of the CA public key, as printed by `openssl x509 -text`.
pub const CA_KEY_ID: [u8; 20] = [
    0xF1, 0x0B, 0x01, 0xBB, 0x41, 0x3C, 0x7A, 0x11, 0xA9, 0xBE, 0x4A, 0x80, 0x40, 0x34, 0x37, 0xCF,
    0xAB, 0xED, 0x61, 0x3C,
];

pub fn ca_certificate() -> Certificate {
    Certificate::from_pem(CA_PEM).unwrap()
}

pub fn full_crl() -> RevocationList {
    RevocationList::from_pem(FULL_CRL_PEM).unwrap()
}

pub fn delta_crl() -> RevocationList {
    RevocationList::from_pem(DELTA_CRL_PEM).unwrap()
}
