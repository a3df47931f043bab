use const_oid::AssociatedOid;
use der::{Decode, oid::ObjectIdentifier as Asn1Oid};
use x509_cert::ext::pkix::{IssuerAltName as X509IssuerAltName, SubjectAltName as X509SubjectAltName};

use super::{Extension, ExtensionType, encode_value};
use crate::error::Result;
use crate::name::{GeneralName, GeneralNames};

/// Represents the Subject Alternative Name (SAN) extension.
///
/// This extension specifies additional identities for the subject of the certificate.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubjectAlternativeName {
    critical: bool,
    names: GeneralNames,
}

/// Represents the Issuer Alternative Name extension.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IssuerAlternativeName {
    critical: bool,
    names: GeneralNames,
}

impl SubjectAlternativeName {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_general_name(&mut self, name: GeneralName) {
        self.names.add_general_name(name);
    }

    pub fn set_general_names(&mut self, names: GeneralNames) {
        self.names = names;
    }

    pub fn general_names(&self) -> &GeneralNames {
        &self.names
    }
}

impl IssuerAlternativeName {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_general_name(&mut self, name: GeneralName) {
        self.names.add_general_name(name);
    }

    pub fn set_general_names(&mut self, names: GeneralNames) {
        self.names = names;
    }

    pub fn general_names(&self) -> &GeneralNames {
        &self.names
    }
}

impl Extension for SubjectAlternativeName {
    const OID: Asn1Oid = X509SubjectAltName::OID;
    const NAME: &'static str = "subjectAlternativeName";
    const TYPE: ExtensionType = ExtensionType::SubjectAlternativeName;

    fn is_critical(&self) -> bool {
        self.critical
    }

    fn set_critical(&mut self, critical: bool) {
        self.critical = critical;
    }

    fn to_x509_extension_value(&self) -> Result<Vec<u8>> {
        encode_value(&X509SubjectAltName(self.names.to_x509()?))
    }

    fn from_x509_extension_value(value: &[u8]) -> Result<Self> {
        let san = X509SubjectAltName::from_der(value)?;
        Ok(Self {
            critical: false,
            names: GeneralNames::from_x509(&san.0)?,
        })
    }

    fn ext_value_xml(&self, tab: &str) -> String {
        self.names.xml_encoded(tab)
    }
}

impl Extension for IssuerAlternativeName {
    const OID: Asn1Oid = X509IssuerAltName::OID;
    const NAME: &'static str = "issuerAlternativeName";
    const TYPE: ExtensionType = ExtensionType::IssuerAlternativeName;

    fn is_critical(&self) -> bool {
        self.critical
    }

    fn set_critical(&mut self, critical: bool) {
        self.critical = critical;
    }

    fn to_x509_extension_value(&self) -> Result<Vec<u8>> {
        encode_value(&X509IssuerAltName(self.names.to_x509()?))
    }

    fn from_x509_extension_value(value: &[u8]) -> Result<Self> {
        let ian = X509IssuerAltName::from_der(value)?;
        Ok(Self {
            critical: false,
            names: GeneralNames::from_x509(&ian.0)?,
        })
    }

    fn ext_value_xml(&self, tab: &str) -> String {
        self.names.xml_encoded(tab)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cert::extensions::BasicConstraints;
    use crate::error::CertificationError;
    use crate::name::{RdnEntryType, RdnSequence};
    use crate::oid::ObjectIdentifierFactory;
    use pretty_assertions::assert_eq;

    fn general_names() -> GeneralNames {
        let mut rdn = RdnSequence::new();
        rdn.add_entry(RdnEntryType::CommonName, "Example Name");

        let mut names = vec![GeneralName::new(); 7];
        names[0].set_other_name("2.16.76.1.3.3", "00000000000100");
        names[1].set_rfc822_name("example@mail.com");
        names[2].set_dns_name("8.8.8.8");
        names[3].set_directory_name(rdn);
        names[4].set_uniform_resource_identifier("www.example.com");
        names[5].set_ip_address("127.0.0.1").unwrap();
        names[6].set_registered_id(ObjectIdentifierFactory::get_object_identifier("2.5.4.3").unwrap());
        names.into_iter().collect()
    }

    #[test]
    fn test_empty_xml() {
        let expected = "tab<subjectAlternativeName>\n\
                        tab\t<extnID>subjectAltName</extnID>\n\
                        tab\t<critical>no</critical>\n\
                        tab\t<extnValue>\n\
                        tab\t\t<generalNames>\n\
                        tab\t\t</generalNames>\n\
                        tab\t</extnValue>\n\
                        tab</subjectAlternativeName>\n";
        assert_eq!(SubjectAlternativeName::new().xml_encoded("tab"), expected);
    }

    #[test]
    fn test_ext_value_xml() {
        let mut san = SubjectAlternativeName::new();
        san.set_general_names(general_names());
        let expected = "tab<generalNames>\n\
                        tab\t<otherName>\n\
                        tab\t\t2.16.76.1.3.3 : 00000000000100\n\
                        tab\t</otherName>\n\
                        tab\t<rfc822Name>\n\
                        tab\t\texample@mail.com\n\
                        tab\t</rfc822Name>\n\
                        tab\t<dnsName>\n\
                        tab\t\t8.8.8.8\n\
                        tab\t</dnsName>\n\
                        tab\t<directoryName>\n\
                        tab\t\t<RDNSequence>\n\
                        tab\t\t\t<commonName>Example Name</commonName>\n\
                        tab\t\t</RDNSequence>\n\
                        tab\t</directoryName>\n\
                        tab\t<uniformResourceIdentifier>\n\
                        tab\t\twww.example.com\n\
                        tab\t</uniformResourceIdentifier>\n\
                        tab\t<iPAddress>\n\
                        tab\t\t127.0.0.1\n\
                        tab\t</iPAddress>\n\
                        tab\t<registeredID>\n\
                        tab\t\tCN\n\
                        tab\t</registeredID>\n\
                        tab</generalNames>\n";
        assert_eq!(san.ext_value_xml("tab"), expected);
    }

    #[test]
    fn test_x509_round_trip() {
        let mut san = SubjectAlternativeName::new();
        for name in &general_names() {
            san.add_general_name(name.clone());
        }
        let native = san.to_x509_extension().unwrap();
        let decoded = SubjectAlternativeName::from_x509_extension(&native).unwrap();
        assert_eq!(decoded.general_names(), &general_names());
        assert_eq!(decoded.xml_encoded(""), san.xml_encoded(""));
    }

    #[test]
    fn test_issuer_alternative_name() {
        let mut ian = IssuerAlternativeName::new();
        let mut uri = GeneralName::new();
        uri.set_uniform_resource_identifier("http://ca.example.com");
        ian.add_general_name(uri);
        ian.set_critical(true);

        let native = ian.to_x509_extension().unwrap();
        let decoded = IssuerAlternativeName::from_x509_extension(&native).unwrap();
        assert_eq!(decoded, ian);
        assert!(decoded.xml_encoded("").starts_with(
            "<issuerAlternativeName>\n\t<extnID>issuerAltName</extnID>\n\t<critical>yes</critical>\n"
        ));
    }

    #[test]
    fn test_wrong_extension() {
        let native = BasicConstraints::new().to_x509_extension().unwrap();
        assert!(matches!(
            SubjectAlternativeName::from_x509_extension(&native),
            Err(CertificationError::ExtensionMismatch { .. })
        ));
        let san = SubjectAlternativeName::new().to_x509_extension().unwrap();
        assert!(matches!(
            IssuerAlternativeName::from_x509_extension(&san),
            Err(CertificationError::ExtensionMismatch { .. })
        ));
    }
}
