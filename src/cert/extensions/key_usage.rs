use const_oid::AssociatedOid;
use der::flagset::FlagSet;
use der::{Decode, oid::ObjectIdentifier as Asn1Oid};
use x509_cert::ext::pkix::{
    ExtendedKeyUsage as X509ExtendedKeyUsage, KeyUsage as X509KeyUsage,
};

pub use x509_cert::ext::pkix::KeyUsages;

use super::{Extension, ExtensionType, encode_value, header};
use crate::error::Result;
use crate::oid::ObjectIdentifier;
use crate::xml;

/// Represents the Key Usage extension.
///
/// This extension defines the purpose of the key contained in the certificate.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyUsage {
    critical: bool,
    usages: FlagSet<KeyUsages>,
}

impl KeyUsage {
    /// Every usage bit, in bit order.
    pub const ALL: [KeyUsages; 9] = [
        KeyUsages::DigitalSignature,
        KeyUsages::NonRepudiation,
        KeyUsages::KeyEncipherment,
        KeyUsages::DataEncipherment,
        KeyUsages::KeyAgreement,
        KeyUsages::KeyCertSign,
        KeyUsages::CRLSign,
        KeyUsages::EncipherOnly,
        KeyUsages::DecipherOnly,
    ];

    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_usage(&mut self, usage: KeyUsages, value: bool) {
        if value {
            self.usages |= usage;
        } else {
            self.usages -= usage;
        }
    }

    pub fn usage(&self, usage: KeyUsages) -> bool {
        self.usages.contains(usage)
    }

    pub fn usages(&self) -> FlagSet<KeyUsages> {
        self.usages
    }

    /// The element name of a usage bit.
    pub fn usage_name(usage: KeyUsages) -> &'static str {
        match usage {
            KeyUsages::DigitalSignature => "digitalSignature",
            KeyUsages::NonRepudiation => "nonRepudiation",
            KeyUsages::KeyEncipherment => "keyEncipherment",
            KeyUsages::DataEncipherment => "dataEncipherment",
            KeyUsages::KeyAgreement => "keyAgreement",
            KeyUsages::KeyCertSign => "keyCertSign",
            KeyUsages::CRLSign => "crlSign",
            KeyUsages::EncipherOnly => "encipherOnly",
            KeyUsages::DecipherOnly => "decipherOnly",
        }
    }
}

impl From<FlagSet<KeyUsages>> for KeyUsage {
    fn from(usages: FlagSet<KeyUsages>) -> Self {
        Self {
            critical: false,
            usages,
        }
    }
}

impl Extension for KeyUsage {
    const OID: Asn1Oid = <X509KeyUsage as AssociatedOid>::OID;
    const NAME: &'static str = "keyUsage";
    const TYPE: ExtensionType = ExtensionType::KeyUsage;

    fn is_critical(&self) -> bool {
        self.critical
    }

    fn set_critical(&mut self, critical: bool) {
        self.critical = critical;
    }

    fn to_x509_extension_value(&self) -> Result<Vec<u8>> {
        encode_value(&X509KeyUsage(self.usages))
    }

    fn from_x509_extension_value(value: &[u8]) -> Result<Self> {
        let ku = X509KeyUsage::from_der(value)?;
        Ok(Self::from(ku.0))
    }

    fn ext_value_xml(&self, tab: &str) -> String {
        Self::ALL
            .into_iter()
            .map(|usage| {
                xml::element(tab, Self::usage_name(usage), xml::flag(self.usage(usage)))
            })
            .collect()
    }
}

/// Represents the Extended Key Usage extension.
///
/// This extension indicates purposes for which the public key may be used.
/// Purposes keep the order they were added in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtendedKeyUsage {
    critical: bool,
    usages: Vec<ObjectIdentifier>,
}

impl ExtendedKeyUsage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_usage(&mut self, usage: ObjectIdentifier) {
        self.usages.push(usage);
    }

    pub fn usages(&self) -> &[ObjectIdentifier] {
        &self.usages
    }
}

impl Extension for ExtendedKeyUsage {
    const OID: Asn1Oid = X509ExtendedKeyUsage::OID;
    const NAME: &'static str = "extendedKeyUsage";
    const TYPE: ExtensionType = ExtensionType::ExtendedKeyUsage;

    fn is_critical(&self) -> bool {
        self.critical
    }

    fn set_critical(&mut self, critical: bool) {
        self.critical = critical;
    }

    fn to_x509_extension_value(&self) -> Result<Vec<u8>> {
        let oids = self
            .usages
            .iter()
            .map(ObjectIdentifier::to_x509_oid)
            .collect::<Result<Vec<_>>>()?;
        encode_value(&X509ExtendedKeyUsage(oids))
    }

    fn from_x509_extension_value(value: &[u8]) -> Result<Self> {
        let eku = X509ExtendedKeyUsage::from_der(value)?;
        Ok(Self {
            critical: false,
            usages: eku.0.into_iter().map(ObjectIdentifier::from_x509_oid).collect(),
        })
    }

    fn ext_value_xml(&self, tab: &str) -> String {
        self.usages
            .iter()
            .map(|usage| xml::element(tab, "usage", usage.display_name()))
            .collect()
    }

    // Usages sit directly in the extension element, without an extnValue block.
    fn xml_encoded(&self, tab: &str) -> String {
        let mut out = header(tab, Self::NAME, &self.object_identifier(), self.critical);
        out.push_str(&self.ext_value_xml(&format!("{tab}\t\t")));
        out.push_str(&xml::close(tab, Self::NAME));
        out
    }
}
