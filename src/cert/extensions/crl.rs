use const_oid::AssociatedOid;
use der::asn1::Uint;
use der::{Decode, oid::ObjectIdentifier as Asn1Oid};
use x509_cert::ext::pkix::{
    BaseCrlNumber as X509BaseCrlNumber, CrlDistributionPoints as X509CrlDistributionPoints,
    CrlNumber as X509CrlNumber,
};

use super::{Extension, ExtensionType, encode_value, render};
use crate::cert::distribution_point::DistributionPoint;
use crate::error::{CertificationError, Result};
use crate::xml;

/// Represents the CRL Distribution Points extension.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrlDistributionPoints {
    critical: bool,
    points: Vec<DistributionPoint>,
}

impl CrlDistributionPoints {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_distribution_point(&mut self, point: DistributionPoint) {
        self.points.push(point);
    }

    pub fn distribution_points(&self) -> &[DistributionPoint] {
        &self.points
    }
}

impl Extension for CrlDistributionPoints {
    const OID: Asn1Oid = X509CrlDistributionPoints::OID;
    const NAME: &'static str = "CRLDistributionPoints";
    const TYPE: ExtensionType = ExtensionType::CrlDistributionPoints;

    fn is_critical(&self) -> bool {
        self.critical
    }

    fn set_critical(&mut self, critical: bool) {
        self.critical = critical;
    }

    fn to_x509_extension_value(&self) -> Result<Vec<u8>> {
        let points = self
            .points
            .iter()
            .map(DistributionPoint::to_x509)
            .collect::<Result<Vec<_>>>()?;
        encode_value(&X509CrlDistributionPoints(points))
    }

    fn from_x509_extension_value(value: &[u8]) -> Result<Self> {
        let dps = X509CrlDistributionPoints::from_der(value)?;
        Ok(Self {
            critical: false,
            points: dps
                .0
                .iter()
                .map(DistributionPoint::from_x509)
                .collect::<Result<_>>()?,
        })
    }

    fn ext_value_xml(&self, tab: &str) -> String {
        let inner = xml::indent(tab);
        let body: String = self
            .points
            .iter()
            .map(|point| point.xml_encoded(&inner))
            .collect();
        xml::wrap(tab, "distributionPoints", &body)
    }
}

fn number_to_uint(number: u64) -> Result<Uint> {
    Uint::new(&number.to_be_bytes()).map_err(CertificationError::encoding)
}

fn uint_to_number(value: &Uint) -> Result<u64> {
    let bytes = value.as_bytes();
    if bytes.len() > 8 {
        return Err(CertificationError::UnsupportedValue(format!(
            "CRL number of {} bytes",
            bytes.len()
        )));
    }
    let mut buf = [0u8; 8];
    buf[8 - bytes.len()..].copy_from_slice(bytes);
    Ok(u64::from_be_bytes(buf))
}

/// Represents the Delta CRL Indicator extension.
///
/// # Fields
/// * `base_crl_number` - Number of the complete CRL this delta CRL updates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeltaCrlIndicator {
    critical: bool,
    base_crl_number: u64,
}

impl DeltaCrlIndicator {
    pub fn new(base_crl_number: u64) -> Self {
        Self {
            critical: false,
            base_crl_number,
        }
    }

    pub fn set_base_crl_number(&mut self, base_crl_number: u64) {
        self.base_crl_number = base_crl_number;
    }

    pub fn base_crl_number(&self) -> u64 {
        self.base_crl_number
    }
}

impl Extension for DeltaCrlIndicator {
    const OID: Asn1Oid = X509BaseCrlNumber::OID;
    const NAME: &'static str = "deltaCRLIndicator";
    const TYPE: ExtensionType = ExtensionType::DeltaCrlIndicator;

    fn is_critical(&self) -> bool {
        self.critical
    }

    fn set_critical(&mut self, critical: bool) {
        self.critical = critical;
    }

    fn to_x509_extension_value(&self) -> Result<Vec<u8>> {
        encode_value(&X509BaseCrlNumber(number_to_uint(self.base_crl_number)?))
    }

    fn from_x509_extension_value(value: &[u8]) -> Result<Self> {
        let base = X509BaseCrlNumber::from_der(value)?;
        Ok(Self::new(uint_to_number(&base.0)?))
    }

    /// The number sits one level below `tab`.
    fn ext_value_xml(&self, tab: &str) -> String {
        xml::element(&xml::indent(tab), "baseCRLNumber", self.base_crl_number)
    }

    fn xml_encoded(&self, tab: &str) -> String {
        render(
            tab,
            Self::NAME,
            &self.object_identifier(),
            self.critical,
            &self.ext_value_xml(&xml::indent(tab)),
        )
    }
}

/// Represents the CRL Number extension.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrlNumber {
    critical: bool,
    number: u64,
}

impl CrlNumber {
    pub fn new(number: u64) -> Self {
        Self {
            critical: false,
            number,
        }
    }

    pub fn set_number(&mut self, number: u64) {
        self.number = number;
    }

    pub fn number(&self) -> u64 {
        self.number
    }
}

impl Extension for CrlNumber {
    const OID: Asn1Oid = X509CrlNumber::OID;
    const NAME: &'static str = "cRLNumber";
    const TYPE: ExtensionType = ExtensionType::CrlNumber;

    fn is_critical(&self) -> bool {
        self.critical
    }

    fn set_critical(&mut self, critical: bool) {
        self.critical = critical;
    }

    fn to_x509_extension_value(&self) -> Result<Vec<u8>> {
        encode_value(&X509CrlNumber(number_to_uint(self.number)?))
    }

    fn from_x509_extension_value(value: &[u8]) -> Result<Self> {
        let number = X509CrlNumber::from_der(value)?;
        Ok(Self::new(uint_to_number(&number.0)?))
    }

    fn ext_value_xml(&self, tab: &str) -> String {
        xml::element(tab, "cRLNumber", self.number)
    }
}
