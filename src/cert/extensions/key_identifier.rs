use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use bon::Builder;
use const_oid::AssociatedOid;
use der::asn1::OctetString;
use der::{Decode, oid::ObjectIdentifier as Asn1Oid};
use sha1::{Digest, Sha1};
use x509_cert::ext::pkix::{
    AuthorityKeyIdentifier as X509AuthorityKeyIdentifier,
    SubjectKeyIdentifier as X509SubjectKeyIdentifier,
};
use x509_cert::serial_number::SerialNumber;
use x509_cert::spki::SubjectPublicKeyInfoOwned;

use super::{Extension, ExtensionType, encode_value, header};
use crate::error::{CertificationError, Result};
use crate::name::GeneralNames;
use crate::xml;

/// Represents the Subject Key Identifier extension.
///
/// # Fields
/// * `key_identifier` - Identifier of the subject's public key, empty by default.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubjectKeyIdentifier {
    critical: bool,
    key_identifier: Vec<u8>,
}

impl SubjectKeyIdentifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Derives the identifier from a public key: the SHA-1 hash of the
    /// `subjectPublicKey` bits (RFC 5280, section 4.2.1.2, method 1).
    pub fn from_public_key(spki: &SubjectPublicKeyInfoOwned) -> Self {
        let digest = Sha1::digest(spki.subject_public_key.raw_bytes());
        Self {
            critical: false,
            key_identifier: digest.to_vec(),
        }
    }

    pub fn set_key_identifier(&mut self, key_identifier: impl Into<Vec<u8>>) {
        self.key_identifier = key_identifier.into();
    }

    pub fn key_identifier(&self) -> &[u8] {
        &self.key_identifier
    }
}

impl Extension for SubjectKeyIdentifier {
    const OID: Asn1Oid = X509SubjectKeyIdentifier::OID;
    const NAME: &'static str = "subjectKeyIdentifier";
    const TYPE: ExtensionType = ExtensionType::SubjectKeyIdentifier;

    fn is_critical(&self) -> bool {
        self.critical
    }

    fn set_critical(&mut self, critical: bool) {
        self.critical = critical;
    }

    fn to_x509_extension_value(&self) -> Result<Vec<u8>> {
        encode_value(&X509SubjectKeyIdentifier(
            OctetString::new(self.key_identifier.as_slice())
                .map_err(CertificationError::encoding)?,
        ))
    }

    fn from_x509_extension_value(value: &[u8]) -> Result<Self> {
        let ski = X509SubjectKeyIdentifier::from_der(value)?;
        Ok(Self {
            critical: false,
            key_identifier: ski.0.as_bytes().to_vec(),
        })
    }

    fn ext_value_xml(&self, tab: &str) -> String {
        xml::element(tab, "keyIdentifier", STANDARD.encode(&self.key_identifier))
    }

    // The identifier is rendered inline as the extnValue text.
    fn xml_encoded(&self, tab: &str) -> String {
        let mut out = header(tab, Self::NAME, &self.object_identifier(), self.critical);
        out.push_str(&xml::element(
            &xml::indent(tab),
            "extnValue",
            STANDARD.encode(&self.key_identifier),
        ));
        out.push_str(&xml::close(tab, Self::NAME));
        out
    }
}

/// Represents the Authority Key Identifier extension.
///
/// This extension identifies the public key corresponding to the private key used to sign the certificate.
///
/// # Fields
/// * `key_identifier` - The key identifier.
/// * `authority_cert_issuer` - Names of the issuer of the authority's certificate.
/// * `authority_cert_serial_number` - Big-endian serial number of the authority's certificate,
///   without leading zeros.
#[derive(Debug, Clone, Default, PartialEq, Eq, Builder)]
pub struct AuthorityKeyIdentifier {
    #[builder(default)]
    critical: bool,
    #[builder(into)]
    key_identifier: Option<Vec<u8>>,
    #[builder(default)]
    authority_cert_issuer: GeneralNames,
    #[builder(into)]
    authority_cert_serial_number: Option<Vec<u8>>,
}

impl AuthorityKeyIdentifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_key_identifier(&mut self, key_identifier: impl Into<Vec<u8>>) {
        self.key_identifier = Some(key_identifier.into());
    }

    pub fn key_identifier(&self) -> Option<&[u8]> {
        self.key_identifier.as_deref()
    }

    pub fn set_authority_cert_issuer(&mut self, issuer: GeneralNames) {
        self.authority_cert_issuer = issuer;
    }

    pub fn authority_cert_issuer(&self) -> &GeneralNames {
        &self.authority_cert_issuer
    }

    /// Sets the serial number from its big-endian bytes; leading zeros are dropped.
    pub fn set_authority_cert_serial_number(&mut self, serial: &[u8]) {
        self.authority_cert_serial_number = Some(strip_leading_zeros(serial));
    }

    pub fn authority_cert_serial_number(&self) -> Option<&[u8]> {
        self.authority_cert_serial_number.as_deref()
    }
}

fn strip_leading_zeros(bytes: &[u8]) -> Vec<u8> {
    let start = bytes
        .iter()
        .position(|byte| *byte != 0)
        .unwrap_or(bytes.len().saturating_sub(1));
    bytes[start..].to_vec()
}

impl Extension for AuthorityKeyIdentifier {
    const OID: Asn1Oid = X509AuthorityKeyIdentifier::OID;
    const NAME: &'static str = "authorityKeyIdentifier";
    const TYPE: ExtensionType = ExtensionType::AuthorityKeyIdentifier;

    fn is_critical(&self) -> bool {
        self.critical
    }

    fn set_critical(&mut self, critical: bool) {
        self.critical = critical;
    }

    fn to_x509_extension_value(&self) -> Result<Vec<u8>> {
        let key_identifier = self
            .key_identifier
            .as_deref()
            .map(OctetString::new)
            .transpose()
            .map_err(CertificationError::encoding)?;
        let authority_cert_issuer = if self.authority_cert_issuer.is_empty() {
            None
        } else {
            Some(self.authority_cert_issuer.to_x509()?)
        };
        let authority_cert_serial_number = self
            .authority_cert_serial_number
            .as_deref()
            .map(SerialNumber::new)
            .transpose()
            .map_err(CertificationError::encoding)?;

        encode_value(&X509AuthorityKeyIdentifier {
            key_identifier,
            authority_cert_issuer,
            authority_cert_serial_number,
        })
    }

    fn from_x509_extension_value(value: &[u8]) -> Result<Self> {
        let aki = X509AuthorityKeyIdentifier::from_der(value)?;
        let authority_cert_issuer = match &aki.authority_cert_issuer {
            Some(names) => GeneralNames::from_x509(names)?,
            None => GeneralNames::new(),
        };
        Ok(Self {
            critical: false,
            key_identifier: aki.key_identifier.map(|id| id.as_bytes().to_vec()),
            authority_cert_issuer,
            authority_cert_serial_number: aki
                .authority_cert_serial_number
                .map(|sn| strip_leading_zeros(sn.as_bytes())),
        })
    }

    fn ext_value_xml(&self, tab: &str) -> String {
        let mut out = String::new();
        if let Some(key_identifier) = &self.key_identifier {
            out.push_str(&xml::element(
                tab,
                "keyIdentifier",
                STANDARD.encode(key_identifier),
            ));
        }
        if !self.authority_cert_issuer.is_empty() {
            out.push_str(&xml::wrap(
                tab,
                "authorityCertIssuer",
                &self.authority_cert_issuer.xml_encoded(&xml::indent(tab)),
            ));
        }
        if let Some(serial) = &self.authority_cert_serial_number {
            out.push_str(&xml::element(
                tab,
                "authorityCertSerialNumber",
                hex::encode_upper(serial),
            ));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cert::extensions::BasicConstraints;
    use crate::error::CertificationError;
    use crate::name::{GeneralName, RdnEntryType, RdnSequence};
    use der::asn1::BitString;
    use pretty_assertions::assert_eq;
    use x509_cert::spki::AlgorithmIdentifierOwned;

    const KEY_ID: &[u8] = b"identifier";

    fn issuer() -> GeneralNames {
        let mut rdn = RdnSequence::new();
        rdn.add_entry(RdnEntryType::CommonName, "Example CA");
        let mut name = GeneralName::new();
        name.set_directory_name(rdn);
        [name].into_iter().collect()
    }

    #[test]
    fn test_subject_key_identifier_xml() {
        let expected_empty = "tab<subjectKeyIdentifier>\n\
                              tab\t<extnID>subjectKeyIdentifier</extnID>\n\
                              tab\t<critical>no</critical>\n\
                              tab\t<extnValue></extnValue>\n\
                              tab</subjectKeyIdentifier>\n";
        assert_eq!(SubjectKeyIdentifier::new().xml_encoded("tab"), expected_empty);

        let mut ski = SubjectKeyIdentifier::new();
        ski.set_key_identifier(KEY_ID);
        let encoded = STANDARD.encode(KEY_ID);
        assert_eq!(encoded, "aWRlbnRpZmllcg==");
        assert_eq!(
            ski.xml_encoded(""),
            format!(
                "<subjectKeyIdentifier>\n\t<extnID>subjectKeyIdentifier</extnID>\n\t<critical>no</critical>\n\t<extnValue>{encoded}</extnValue>\n</subjectKeyIdentifier>\n"
            )
        );
        assert_eq!(
            ski.ext_value_xml("tab"),
            format!("tab<keyIdentifier>{encoded}</keyIdentifier>\n")
        );
    }

    #[test]
    fn test_subject_key_identifier_round_trip() {
        let mut ski = SubjectKeyIdentifier::new();
        ski.set_key_identifier(KEY_ID);
        let native = ski.to_x509_extension().unwrap();
        let decoded = SubjectKeyIdentifier::from_x509_extension(&native).unwrap();
        assert_eq!(decoded.key_identifier(), KEY_ID);

        let empty = SubjectKeyIdentifier::new().to_x509_extension().unwrap();
        let decoded = SubjectKeyIdentifier::from_x509_extension(&empty).unwrap();
        assert!(decoded.key_identifier().is_empty());
    }

    #[test]
    fn test_subject_key_identifier_from_public_key() {
        let spki = SubjectPublicKeyInfoOwned {
            algorithm: AlgorithmIdentifierOwned {
                oid: const_oid::db::rfc8410::ID_ED_25519,
                parameters: None,
            },
            subject_public_key: BitString::from_bytes(b"abc").unwrap(),
        };
        let ski = SubjectKeyIdentifier::from_public_key(&spki);
        assert_eq!(
            hex::encode(ski.key_identifier()),
            "a9993e364706816aba3e25717850c26c9cd0d89d"
        );
    }

    #[test]
    fn test_authority_key_identifier_empty_xml() {
        let aki = AuthorityKeyIdentifier::new();
        assert_eq!(aki.key_identifier(), None);
        assert_eq!(aki.ext_value_xml("\t\t"), "");
        let expected = "tab<authorityKeyIdentifier>\n\
                        tab\t<extnID>authorityKeyIdentifier</extnID>\n\
                        tab\t<critical>no</critical>\n\
                        tab\t<extnValue>\n\
                        tab\t</extnValue>\n\
                        tab</authorityKeyIdentifier>\n";
        assert_eq!(aki.xml_encoded("tab"), expected);
    }

    #[test]
    fn test_authority_key_identifier_builder_and_xml() {
        let aki = AuthorityKeyIdentifier::builder()
            .key_identifier(KEY_ID)
            .authority_cert_issuer(issuer())
            .authority_cert_serial_number([0x30, 0x39])
            .build();
        assert_eq!(aki.key_identifier(), Some(KEY_ID));
        assert_eq!(aki.authority_cert_serial_number(), Some(&[0x30, 0x39][..]));

        let mut expected = String::from("<keyIdentifier>aWRlbnRpZmllcg==</keyIdentifier>\n");
        expected.push_str("<authorityCertIssuer>\n");
        expected.push_str(&issuer().xml_encoded("\t"));
        expected.push_str("</authorityCertIssuer>\n");
        expected.push_str("<authorityCertSerialNumber>3039</authorityCertSerialNumber>\n");
        assert_eq!(aki.ext_value_xml(""), expected);
    }

    #[test]
    fn test_authority_key_identifier_round_trip() {
        let mut aki = AuthorityKeyIdentifier::new();
        aki.set_key_identifier(KEY_ID);
        aki.set_authority_cert_issuer(issuer());
        aki.set_authority_cert_serial_number(&12345u32.to_be_bytes());

        let native = aki.to_x509_extension().unwrap();
        assert_eq!(AuthorityKeyIdentifier::from_x509_extension(&native).unwrap(), aki);

        let empty = AuthorityKeyIdentifier::new().to_x509_extension().unwrap();
        assert_eq!(
            AuthorityKeyIdentifier::from_x509_extension(&empty).unwrap(),
            AuthorityKeyIdentifier::new()
        );
    }

    #[test]
    fn test_wrong_extension() {
        let native = BasicConstraints::new().to_x509_extension().unwrap();
        assert!(matches!(
            SubjectKeyIdentifier::from_x509_extension(&native),
            Err(CertificationError::ExtensionMismatch { .. })
        ));
        assert!(matches!(
            AuthorityKeyIdentifier::from_x509_extension(&native),
            Err(CertificationError::ExtensionMismatch { .. })
        ));
    }
}
