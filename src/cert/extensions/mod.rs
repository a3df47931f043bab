//! Typed certificate and CRL extensions.
//!
//! Each extension implements [`Extension`], which ties the type to its
//! identifier and provides the conversions to and from the native
//! [`x509_cert::ext::Extension`] record together with the XML rendering.
//! [`CertificateExtension`] dispatches an arbitrary record to the matching
//! type and keeps unknown extensions as a [`RawExtension`].

mod alt_name;
mod basic_constraints;
mod crl;
mod info_access;
mod key_identifier;
mod key_usage;
mod policies;

pub use alt_name::{IssuerAlternativeName, SubjectAlternativeName};
pub use basic_constraints::BasicConstraints;
pub use crl::{CrlDistributionPoints, CrlNumber, DeltaCrlIndicator};
pub use info_access::AuthorityInformationAccess;
pub use key_identifier::{AuthorityKeyIdentifier, SubjectKeyIdentifier};
pub use key_usage::{ExtendedKeyUsage, KeyUsage, KeyUsages};
pub use policies::CertificatePolicies;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use const_oid::ObjectIdentifier as Asn1Oid;
use const_oid::db::rfc5280;
use der::Encode;
use der::asn1::OctetString;
use log::debug;
use x509_cert::ext::Extension as X509Extension;

use crate::error::{CertificationError, Result};
use crate::oid::ObjectIdentifier;
use crate::xml;

/// Kind of an extension, as reported by [`Extension::type_name`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExtensionType {
    Unknown,
    BasicConstraints,
    KeyUsage,
    ExtendedKeyUsage,
    SubjectKeyIdentifier,
    AuthorityKeyIdentifier,
    SubjectAlternativeName,
    IssuerAlternativeName,
    CrlDistributionPoints,
    CertificatePolicies,
    DeltaCrlIndicator,
    CrlNumber,
    AuthorityInformationAccess,
}

/// Trait for typed X.509 extensions.
///
/// Implementors provide the value conversions and the inner XML; the native
/// record conversions and the outer XML template come for free.
///
/// # Example
/// ```
/// use certmodel::cert::extensions::{BasicConstraints, Extension, KeyUsage};
///
/// let mut bc = BasicConstraints::new();
/// bc.set_ca(true);
/// bc.set_path_len(Some(2));
///
/// let record = bc.to_x509_extension().unwrap();
/// let decoded = BasicConstraints::from_x509_extension(&record).unwrap();
/// assert_eq!(decoded, bc);
///
/// // a record carrying another identifier is rejected
/// assert!(KeyUsage::from_x509_extension(&record).is_err());
/// ```
pub trait Extension: Sized {
    /// The identifier the extension is registered under.
    const OID: Asn1Oid;

    /// Element name of the extension in XML output.
    const NAME: &'static str;

    /// Discriminant reported by [`Extension::type_name`].
    const TYPE: ExtensionType;

    fn is_critical(&self) -> bool;

    fn set_critical(&mut self, critical: bool);

    /// Encodes the extension value (the content of `extnValue`) as DER.
    fn to_x509_extension_value(&self) -> Result<Vec<u8>>;

    /// Decodes the extension value; the result is not critical.
    fn from_x509_extension_value(value: &[u8]) -> Result<Self>;

    /// Renders the typed fields, each line starting with `tab`.
    fn ext_value_xml(&self, tab: &str) -> String;

    fn object_identifier(&self) -> ObjectIdentifier {
        ObjectIdentifier::from_x509_oid(Self::OID)
    }

    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn type_name(&self) -> ExtensionType {
        Self::TYPE
    }

    /// Builds the native extension record.
    fn to_x509_extension(&self) -> Result<X509Extension> {
        Ok(X509Extension {
            extn_id: Self::OID,
            critical: self.is_critical(),
            extn_value: OctetString::new(self.to_x509_extension_value()?)
                .map_err(CertificationError::encoding)?,
        })
    }

    /// Builds the typed extension from a native record.
    ///
    /// # Returns
    /// The extension with the record's critical flag, or `ExtensionMismatch`
    /// when the record carries another identifier.
    fn from_x509_extension(extension: &X509Extension) -> Result<Self> {
        if extension.extn_id != Self::OID {
            return Err(CertificationError::ExtensionMismatch {
                expected: Self::OID.to_string(),
                found: extension.extn_id.to_string(),
            });
        }
        debug!("decoding {} extension", Self::NAME);
        let mut decoded = Self::from_x509_extension_value(extension.extn_value.as_bytes())?;
        decoded.set_critical(extension.critical);
        Ok(decoded)
    }

    fn xml_encoded(&self, tab: &str) -> String {
        let value_tab = format!("{tab}\t\t");
        render(
            tab,
            Self::NAME,
            &self.object_identifier(),
            self.is_critical(),
            &self.ext_value_xml(&value_tab),
        )
    }
}

/// DER-encodes a native extension value.
pub(crate) fn encode_value<T: Encode>(value: &T) -> Result<Vec<u8>> {
    value.to_der().map_err(CertificationError::encoding)
}

/// Opening element, `extnID` and `critical` lines.
pub(crate) fn header(tab: &str, element: &str, oid: &ObjectIdentifier, critical: bool) -> String {
    let inner = xml::indent(tab);
    let mut out = xml::open(tab, element);
    out.push_str(&xml::element(&inner, "extnID", oid.display_name()));
    out.push_str(&xml::element(
        &inner,
        "critical",
        if critical { "yes" } else { "no" },
    ));
    out
}

/// The full extension template with `value` inside an `extnValue` block.
pub(crate) fn render(
    tab: &str,
    element: &str,
    oid: &ObjectIdentifier,
    critical: bool,
    value: &str,
) -> String {
    let mut out = header(tab, element, oid, critical);
    out.push_str(&xml::wrap(&xml::indent(tab), "extnValue", value));
    out.push_str(&xml::close(tab, element));
    out
}

/// An extension kept as identifier, critical flag and opaque DER value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawExtension {
    oid: ObjectIdentifier,
    critical: bool,
    value: Vec<u8>,
}

impl RawExtension {
    pub fn new(oid: ObjectIdentifier, critical: bool, value: Vec<u8>) -> Self {
        Self {
            oid,
            critical,
            value,
        }
    }

    pub fn object_identifier(&self) -> &ObjectIdentifier {
        &self.oid
    }

    pub fn is_critical(&self) -> bool {
        self.critical
    }

    pub fn set_critical(&mut self, critical: bool) {
        self.critical = critical;
    }

    /// The DER extension value.
    pub fn value(&self) -> &[u8] {
        &self.value
    }

    pub fn to_x509_extension(&self) -> Result<X509Extension> {
        Ok(X509Extension {
            extn_id: self.oid.to_x509_oid()?,
            critical: self.critical,
            extn_value: OctetString::new(self.value.as_slice())
                .map_err(CertificationError::encoding)?,
        })
    }

    pub fn from_x509_extension(extension: &X509Extension) -> Self {
        Self {
            oid: ObjectIdentifier::from_x509_oid(extension.extn_id),
            critical: extension.critical,
            value: extension.extn_value.as_bytes().to_vec(),
        }
    }

    /// Renders an `<extension>` element with the base64 value inline.
    pub fn xml_encoded(&self, tab: &str) -> String {
        let mut out = header(tab, "extension", &self.oid, self.critical);
        out.push_str(&xml::element(
            &xml::indent(tab),
            "extnValue",
            STANDARD.encode(&self.value),
        ));
        out.push_str(&xml::close(tab, "extension"));
        out
    }
}

/// Any extension found in a certificate or CRL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CertificateExtension {
    BasicConstraints(BasicConstraints),
    KeyUsage(KeyUsage),
    ExtendedKeyUsage(ExtendedKeyUsage),
    SubjectKeyIdentifier(SubjectKeyIdentifier),
    AuthorityKeyIdentifier(AuthorityKeyIdentifier),
    SubjectAlternativeName(SubjectAlternativeName),
    IssuerAlternativeName(IssuerAlternativeName),
    CrlDistributionPoints(CrlDistributionPoints),
    CertificatePolicies(CertificatePolicies),
    DeltaCrlIndicator(DeltaCrlIndicator),
    CrlNumber(CrlNumber),
    AuthorityInformationAccess(AuthorityInformationAccess),
    Unknown(RawExtension),
}

macro_rules! dispatch {
    ($value:expr, $ext:ident => $typed:expr, $raw:ident => $unknown:expr) => {
        match $value {
            CertificateExtension::BasicConstraints($ext) => $typed,
            CertificateExtension::KeyUsage($ext) => $typed,
            CertificateExtension::ExtendedKeyUsage($ext) => $typed,
            CertificateExtension::SubjectKeyIdentifier($ext) => $typed,
            CertificateExtension::AuthorityKeyIdentifier($ext) => $typed,
            CertificateExtension::SubjectAlternativeName($ext) => $typed,
            CertificateExtension::IssuerAlternativeName($ext) => $typed,
            CertificateExtension::CrlDistributionPoints($ext) => $typed,
            CertificateExtension::CertificatePolicies($ext) => $typed,
            CertificateExtension::DeltaCrlIndicator($ext) => $typed,
            CertificateExtension::CrlNumber($ext) => $typed,
            CertificateExtension::AuthorityInformationAccess($ext) => $typed,
            CertificateExtension::Unknown($raw) => $unknown,
        }
    };
}

impl CertificateExtension {
    /// Decodes a native record into the matching typed extension.
    ///
    /// Identifiers without a typed counterpart are kept as
    /// [`CertificateExtension::Unknown`]; a known identifier with a value that
    /// does not decode is an error.
    pub fn from_x509_extension(extension: &X509Extension) -> Result<Self> {
        Ok(match extension.extn_id {
            rfc5280::ID_CE_BASIC_CONSTRAINTS => {
                Self::BasicConstraints(BasicConstraints::from_x509_extension(extension)?)
            }
            rfc5280::ID_CE_KEY_USAGE => Self::KeyUsage(KeyUsage::from_x509_extension(extension)?),
            rfc5280::ID_CE_EXT_KEY_USAGE => {
                Self::ExtendedKeyUsage(ExtendedKeyUsage::from_x509_extension(extension)?)
            }
            rfc5280::ID_CE_SUBJECT_KEY_IDENTIFIER => {
                Self::SubjectKeyIdentifier(SubjectKeyIdentifier::from_x509_extension(extension)?)
            }
            rfc5280::ID_CE_AUTHORITY_KEY_IDENTIFIER => Self::AuthorityKeyIdentifier(
                AuthorityKeyIdentifier::from_x509_extension(extension)?,
            ),
            rfc5280::ID_CE_SUBJECT_ALT_NAME => Self::SubjectAlternativeName(
                SubjectAlternativeName::from_x509_extension(extension)?,
            ),
            rfc5280::ID_CE_ISSUER_ALT_NAME => Self::IssuerAlternativeName(
                IssuerAlternativeName::from_x509_extension(extension)?,
            ),
            rfc5280::ID_CE_CRL_DISTRIBUTION_POINTS => {
                Self::CrlDistributionPoints(CrlDistributionPoints::from_x509_extension(extension)?)
            }
            rfc5280::ID_CE_CERTIFICATE_POLICIES => {
                Self::CertificatePolicies(CertificatePolicies::from_x509_extension(extension)?)
            }
            rfc5280::ID_CE_DELTA_CRL_INDICATOR => {
                Self::DeltaCrlIndicator(DeltaCrlIndicator::from_x509_extension(extension)?)
            }
            rfc5280::ID_CE_CRL_NUMBER => Self::CrlNumber(CrlNumber::from_x509_extension(extension)?),
            rfc5280::ID_PE_AUTHORITY_INFO_ACCESS => Self::AuthorityInformationAccess(
                AuthorityInformationAccess::from_x509_extension(extension)?,
            ),
            other => {
                debug!("keeping extension {other} as raw value");
                Self::Unknown(RawExtension::from_x509_extension(extension))
            }
        })
    }

    pub fn to_x509_extension(&self) -> Result<X509Extension> {
        dispatch!(self, ext => ext.to_x509_extension(), raw => raw.to_x509_extension())
    }

    pub fn object_identifier(&self) -> ObjectIdentifier {
        dispatch!(self, ext => ext.object_identifier(), raw => raw.object_identifier().clone())
    }

    pub fn is_critical(&self) -> bool {
        dispatch!(self, ext => ext.is_critical(), raw => raw.is_critical())
    }

    pub fn type_name(&self) -> ExtensionType {
        dispatch!(self, ext => ext.type_name(), _raw => ExtensionType::Unknown)
    }

    pub fn xml_encoded(&self, tab: &str) -> String {
        dispatch!(self, ext => ext.xml_encoded(tab), raw => raw.xml_encoded(tab))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn record(oid: Asn1Oid, critical: bool, value: &[u8]) -> X509Extension {
        X509Extension {
            extn_id: oid,
            critical,
            extn_value: OctetString::new(value).unwrap(),
        }
    }

    #[test]
    fn test_dispatch_known_extension() {
        let mut bc = BasicConstraints::new();
        bc.set_ca(true);
        bc.set_critical(true);
        let native = bc.to_x509_extension().unwrap();

        let ext = CertificateExtension::from_x509_extension(&native).unwrap();
        assert_eq!(ext, CertificateExtension::BasicConstraints(bc.clone()));
        assert_eq!(ext.type_name(), ExtensionType::BasicConstraints);
        assert!(ext.is_critical());
        assert_eq!(ext.object_identifier().name(), "basicConstraints");
        assert_eq!(ext.xml_encoded("\t"), bc.xml_encoded("\t"));
        assert_eq!(ext.to_x509_extension().unwrap(), native);
    }

    #[test]
    fn test_dispatch_unknown_extension() {
        let oid = Asn1Oid::new_unwrap("1.3.6.1.4.1.11129.2.4.2");
        let native = record(oid, false, &[0x04, 0x02, 0xca, 0xfe]);

        let ext = CertificateExtension::from_x509_extension(&native).unwrap();
        assert_eq!(ext.type_name(), ExtensionType::Unknown);
        assert_eq!(ext.to_x509_extension().unwrap(), native);

        let expected = "<extension>\n\
                        \t<extnID>1.3.6.1.4.1.11129.2.4.2</extnID>\n\
                        \t<critical>no</critical>\n\
                        \t<extnValue>BALK/g==</extnValue>\n\
                        </extension>\n";
        assert_eq!(ext.xml_encoded(""), expected);
    }

    #[test]
    fn test_dispatch_rejects_malformed_known_value() {
        let native = record(rfc5280::ID_CE_BASIC_CONSTRAINTS, false, &[0x01, 0x02]);
        assert!(CertificateExtension::from_x509_extension(&native).is_err());
    }

    #[test]
    fn test_mismatch_reports_both_identifiers() {
        let native = KeyUsage::new().to_x509_extension().unwrap();
        assert_eq!(
            BasicConstraints::from_x509_extension(&native).unwrap_err(),
            CertificationError::ExtensionMismatch {
                expected: "2.5.29.19".to_string(),
                found: "2.5.29.15".to_string(),
            }
        );
    }

    #[test]
    fn test_raw_extension_accessors() {
        let oid = ObjectIdentifier::from_x509_oid(Asn1Oid::new_unwrap("1.2.3.4"));
        let mut raw = RawExtension::new(oid.clone(), false, vec![0x05, 0x00]);
        raw.set_critical(true);
        assert!(raw.is_critical());
        assert_eq!(raw.object_identifier(), &oid);
        assert_eq!(raw.value(), &[0x05, 0x00]);
        assert!(RawExtension::default().to_x509_extension().is_err());
    }
}
