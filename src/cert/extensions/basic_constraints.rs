use const_oid::AssociatedOid;
use der::{Decode, oid::ObjectIdentifier};
use x509_cert::ext::pkix::BasicConstraints as X509BasicConstraints;

use super::{Extension, ExtensionType, encode_value};
use crate::error::{CertificationError, Result};
use crate::xml;

/// Represents the Basic Constraints extension.
///
/// This extension indicates whether the certificate is a CA certificate and its path length.
///
/// # Fields
/// * `ca` - Indicates if the certificate is a CA.
/// * `path_len` - The maximum number of intermediate CAs allowed, rendered `-1` when unset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BasicConstraints {
    critical: bool,
    ca: bool,
    path_len: Option<u32>,
}

impl BasicConstraints {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_ca(&mut self, ca: bool) {
        self.ca = ca;
    }

    pub fn is_ca(&self) -> bool {
        self.ca
    }

    pub fn set_path_len(&mut self, path_len: Option<u32>) {
        self.path_len = path_len;
    }

    pub fn path_len(&self) -> Option<u32> {
        self.path_len
    }
}

impl Extension for BasicConstraints {
    const OID: ObjectIdentifier = X509BasicConstraints::OID;
    const NAME: &'static str = "basicConstraints";
    const TYPE: ExtensionType = ExtensionType::BasicConstraints;

    fn is_critical(&self) -> bool {
        self.critical
    }

    fn set_critical(&mut self, critical: bool) {
        self.critical = critical;
    }

    fn to_x509_extension_value(&self) -> Result<Vec<u8>> {
        let path_len_constraint = self
            .path_len
            .map(u8::try_from)
            .transpose()
            .map_err(|_| {
                CertificationError::InvalidInput(format!(
                    "path length {} does not fit the encoding",
                    self.path_len.unwrap_or_default()
                ))
            })?;
        encode_value(&X509BasicConstraints {
            ca: self.ca,
            path_len_constraint,
        })
    }

    fn from_x509_extension_value(value: &[u8]) -> Result<Self> {
        let bc = X509BasicConstraints::from_der(value)?;
        Ok(Self {
            critical: false,
            ca: bc.ca,
            path_len: bc.path_len_constraint.map(u32::from),
        })
    }

    fn ext_value_xml(&self, tab: &str) -> String {
        let path_len = self.path_len.map(i64::from).unwrap_or(-1);
        let mut out = xml::element(tab, "ca", self.ca);
        out.push_str(&xml::element(tab, "pathLenConstraint", path_len));
        out
    }
}
