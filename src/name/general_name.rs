use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use const_oid::ObjectIdentifier as Asn1Oid;
use der::asn1::{Any, Ia5String, OctetString};
use der::{Tag, Tagged};
use log::warn;
use x509_cert::ext::pkix::name::{GeneralName as X509GeneralName, OtherName as X509OtherName};

use super::rdn::RdnSequence;
use crate::error::{CertificationError, Result};
use crate::oid::ObjectIdentifier;
use crate::xml;

/// Discriminant of a [`GeneralName`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeneralNameType {
    Undefined,
    OtherName,
    Rfc822Name,
    DnsName,
    DirectoryName,
    UniformResourceIdentifier,
    IpAddress,
    RegisteredId,
}

impl GeneralNameType {
    /// The element name used in XML output.
    pub fn name(self) -> &'static str {
        match self {
            GeneralNameType::Undefined => "undefined",
            GeneralNameType::OtherName => "otherName",
            GeneralNameType::Rfc822Name => "rfc822Name",
            GeneralNameType::DnsName => "dnsName",
            GeneralNameType::DirectoryName => "directoryName",
            GeneralNameType::UniformResourceIdentifier => "uniformResourceIdentifier",
            GeneralNameType::IpAddress => "iPAddress",
            GeneralNameType::RegisteredId => "registeredID",
        }
    }
}

impl fmt::Display for GeneralNameType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One of the X.509 general name forms.
///
/// Each setter replaces the whole value, so the type and payload always
/// agree. Getters for a form other than the current one return `None`.
///
/// # Example
/// ```
/// use certmodel::name::{GeneralName, GeneralNameType};
///
/// let mut name = GeneralName::new();
/// assert_eq!(name.get_type(), GeneralNameType::Undefined);
///
/// name.set_dns_name("8.8.8.8");
/// assert_eq!(name.get_type(), GeneralNameType::DnsName);
/// assert_eq!(name.dns_name(), Some("8.8.8.8"));
///
/// name.set_other_name("2.16.76.1.3.3", "00000000000100");
/// assert_eq!(name.dns_name(), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum GeneralName {
    #[default]
    Undefined,
    /// An identifier and its value data.
    OtherName { oid: String, data: String },
    Rfc822Name(String),
    DnsName(String),
    DirectoryName(RdnSequence),
    UniformResourceIdentifier(String),
    IpAddress(IpAddr),
    RegisteredId(ObjectIdentifier),
}

impl GeneralName {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_type(&self) -> GeneralNameType {
        match self {
            GeneralName::Undefined => GeneralNameType::Undefined,
            GeneralName::OtherName { .. } => GeneralNameType::OtherName,
            GeneralName::Rfc822Name(_) => GeneralNameType::Rfc822Name,
            GeneralName::DnsName(_) => GeneralNameType::DnsName,
            GeneralName::DirectoryName(_) => GeneralNameType::DirectoryName,
            GeneralName::UniformResourceIdentifier(_) => GeneralNameType::UniformResourceIdentifier,
            GeneralName::IpAddress(_) => GeneralNameType::IpAddress,
            GeneralName::RegisteredId(_) => GeneralNameType::RegisteredId,
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.get_type().name()
    }

    pub fn set_other_name(&mut self, oid: impl Into<String>, data: impl Into<String>) {
        *self = GeneralName::OtherName {
            oid: oid.into(),
            data: data.into(),
        };
    }

    pub fn set_rfc822_name(&mut self, email: impl Into<String>) {
        *self = GeneralName::Rfc822Name(email.into());
    }

    pub fn set_dns_name(&mut self, dns: impl Into<String>) {
        *self = GeneralName::DnsName(dns.into());
    }

    pub fn set_directory_name(&mut self, name: RdnSequence) {
        *self = GeneralName::DirectoryName(name);
    }

    pub fn set_uniform_resource_identifier(&mut self, uri: impl Into<String>) {
        *self = GeneralName::UniformResourceIdentifier(uri.into());
    }

    /// Sets an IP address from its textual form (`127.0.0.1`, `::1`).
    ///
    /// The current value is kept when `address` does not parse.
    pub fn set_ip_address(&mut self, address: &str) -> Result<()> {
        let ip = address
            .parse::<IpAddr>()
            .map_err(|e| CertificationError::InvalidInput(format!("{address}: {e}")))?;
        *self = GeneralName::IpAddress(ip);
        Ok(())
    }

    pub fn set_registered_id(&mut self, oid: ObjectIdentifier) {
        *self = GeneralName::RegisteredId(oid);
    }

    /// The (identifier, data) pair of an other-name.
    pub fn other_name(&self) -> Option<(&str, &str)> {
        match self {
            GeneralName::OtherName { oid, data } => Some((oid.as_str(), data.as_str())),
            _ => None,
        }
    }

    pub fn rfc822_name(&self) -> Option<&str> {
        match self {
            GeneralName::Rfc822Name(email) => Some(email),
            _ => None,
        }
    }

    pub fn dns_name(&self) -> Option<&str> {
        match self {
            GeneralName::DnsName(dns) => Some(dns),
            _ => None,
        }
    }

    pub fn directory_name(&self) -> Option<&RdnSequence> {
        match self {
            GeneralName::DirectoryName(name) => Some(name),
            _ => None,
        }
    }

    pub fn uniform_resource_identifier(&self) -> Option<&str> {
        match self {
            GeneralName::UniformResourceIdentifier(uri) => Some(uri),
            _ => None,
        }
    }

    /// The address in textual form, dotted quad for IPv4.
    pub fn ip_address(&self) -> Option<String> {
        match self {
            GeneralName::IpAddress(ip) => Some(ip.to_string()),
            _ => None,
        }
    }

    pub fn registered_id(&self) -> Option<&ObjectIdentifier> {
        match self {
            GeneralName::RegisteredId(oid) => Some(oid),
            _ => None,
        }
    }

    /// Converts raw address octets to text: 4 bytes give a dotted quad, 16 bytes an IPv6 address.
    pub fn data_to_ip_address(data: &[u8]) -> Result<String> {
        ip_from_octets(data).map(|ip| ip.to_string())
    }

    /// Renders `{tab}<{typeName}>`, the payload one level deeper, then the closing tag.
    pub fn xml_encoded(&self, tab: &str) -> String {
        let inner = xml::indent(tab);
        let body = match self {
            GeneralName::Undefined => String::new(),
            GeneralName::OtherName { oid, data } => xml::line(&inner, format!("{oid} : {data}")),
            GeneralName::Rfc822Name(value)
            | GeneralName::DnsName(value)
            | GeneralName::UniformResourceIdentifier(value) => xml::line(&inner, value),
            GeneralName::DirectoryName(name) => name.xml_encoded(&inner),
            GeneralName::IpAddress(ip) => xml::line(&inner, ip),
            GeneralName::RegisteredId(oid) => xml::line(&inner, oid.display_name()),
        };
        xml::wrap(tab, self.type_name(), &body)
    }

    /// Converts to the native general name.
    ///
    /// # Returns
    /// The native value, or an error for the undefined form and for payloads
    /// the native string types reject.
    pub fn to_x509(&self) -> Result<X509GeneralName> {
        Ok(match self {
            GeneralName::Undefined => {
                return Err(CertificationError::UndefinedValue(
                    "general name type".to_string(),
                ));
            }
            GeneralName::OtherName { oid, data } => {
                let type_id = Asn1Oid::new(oid)
                    .map_err(|_| CertificationError::InvalidObjectIdentifier(oid.clone()))?;
                let value = OctetString::new(data.as_bytes())
                    .and_then(|octets| Any::encode_from(&octets))
                    .map_err(CertificationError::encoding)?;
                X509GeneralName::OtherName(X509OtherName { type_id, value })
            }
            GeneralName::Rfc822Name(email) => X509GeneralName::Rfc822Name(ia5(email)?),
            GeneralName::DnsName(dns) => X509GeneralName::DnsName(ia5(dns)?),
            GeneralName::DirectoryName(name) => X509GeneralName::DirectoryName(name.to_x509_name()?),
            GeneralName::UniformResourceIdentifier(uri) => {
                X509GeneralName::UniformResourceIdentifier(ia5(uri)?)
            }
            GeneralName::IpAddress(ip) => X509GeneralName::from(*ip),
            GeneralName::RegisteredId(oid) => X509GeneralName::RegisteredId(oid.to_x509_oid()?),
        })
    }

    /// Converts from the native general name. EDI party names are not supported.
    pub fn from_x509(name: &X509GeneralName) -> Result<Self> {
        Ok(match name {
            X509GeneralName::OtherName(other) => GeneralName::OtherName {
                oid: other.type_id.to_string(),
                data: other_name_data(&other.value),
            },
            X509GeneralName::Rfc822Name(email) => GeneralName::Rfc822Name(email.to_string()),
            X509GeneralName::DnsName(dns) => GeneralName::DnsName(dns.to_string()),
            X509GeneralName::DirectoryName(name) => {
                GeneralName::DirectoryName(RdnSequence::from_x509_name(name)?)
            }
            X509GeneralName::EdiPartyName(_) => {
                warn!("rejecting EDI party general name");
                return Err(CertificationError::UnsupportedValue(
                    "EDI party general name".to_string(),
                ));
            }
            X509GeneralName::UniformResourceIdentifier(uri) => {
                GeneralName::UniformResourceIdentifier(uri.to_string())
            }
            X509GeneralName::IpAddress(octets) => {
                GeneralName::IpAddress(ip_from_octets(octets.as_bytes())?)
            }
            X509GeneralName::RegisteredId(oid) => {
                GeneralName::RegisteredId(ObjectIdentifier::from_x509_oid(*oid))
            }
        })
    }
}

fn ia5(value: &str) -> Result<Ia5String> {
    Ia5String::new(value)
        .map_err(|e| CertificationError::InvalidInput(format!("{value:?} is not IA5: {e}")))
}

fn ip_from_octets(data: &[u8]) -> Result<IpAddr> {
    if let Ok(octets) = <[u8; 4]>::try_from(data) {
        return Ok(IpAddr::V4(Ipv4Addr::from(octets)));
    }
    if let Ok(octets) = <[u8; 16]>::try_from(data) {
        return Ok(IpAddr::V6(Ipv6Addr::from(octets)));
    }
    Err(CertificationError::InvalidInput(format!(
        "IP address of {} bytes",
        data.len()
    )))
}

// Text-like values come back as text, anything else as hex of the content octets.
fn other_name_data(value: &Any) -> String {
    let text_like = matches!(
        value.tag(),
        Tag::OctetString
            | Tag::Utf8String
            | Tag::PrintableString
            | Tag::Ia5String
            | Tag::VisibleString
    );
    match std::str::from_utf8(value.value()) {
        Ok(text) if text_like => text.to_string(),
        _ => hex::encode(value.value()),
    }
}

/// An ordered collection of [`GeneralName`] values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeneralNames {
    names: Vec<GeneralName>,
}

impl GeneralNames {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_general_name(&mut self, name: GeneralName) {
        self.names.push(name);
    }

    pub fn general_names(&self) -> &[GeneralName] {
        &self.names
    }

    pub fn number_of_entries(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn xml_encoded(&self, tab: &str) -> String {
        let inner = xml::indent(tab);
        let body: String = self
            .names
            .iter()
            .map(|name| name.xml_encoded(&inner))
            .collect();
        xml::wrap(tab, "generalNames", &body)
    }

    pub fn to_x509(&self) -> Result<Vec<X509GeneralName>> {
        self.names.iter().map(GeneralName::to_x509).collect()
    }

    pub fn from_x509(names: &[X509GeneralName]) -> Result<Self> {
        names.iter().map(GeneralName::from_x509).collect()
    }
}

impl FromIterator<GeneralName> for GeneralNames {
    fn from_iter<I: IntoIterator<Item = GeneralName>>(iter: I) -> Self {
        Self {
            names: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a GeneralNames {
    type Item = &'a GeneralName;
    type IntoIter = std::slice::Iter<'a, GeneralName>;

    fn into_iter(self) -> Self::IntoIter {
        self.names.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::name::RdnEntryType;
    use crate::oid::ObjectIdentifierFactory;
    use pretty_assertions::assert_eq;

    fn directory() -> RdnSequence {
        let mut rdn = RdnSequence::new();
        rdn.add_entry(RdnEntryType::CommonName, "Example Name");
        rdn
    }

    fn all_forms() -> Vec<GeneralName> {
        let mut other = GeneralName::new();
        other.set_other_name("2.16.76.1.3.3", "00000000000100");
        let mut email = GeneralName::new();
        email.set_rfc822_name("example@mail.com");
        let mut dns = GeneralName::new();
        dns.set_dns_name("8.8.8.8");
        let mut dir = GeneralName::new();
        dir.set_directory_name(directory());
        let mut uri = GeneralName::new();
        uri.set_uniform_resource_identifier("www.example.com");
        let mut ip = GeneralName::new();
        ip.set_ip_address("127.0.0.1").unwrap();
        let mut rid = GeneralName::new();
        rid.set_registered_id(ObjectIdentifierFactory::get_object_identifier("2.5.4.3").unwrap());
        vec![other, email, dns, dir, uri, ip, rid]
    }

    #[test]
    fn test_type_names() {
        let names: Vec<_> = all_forms().iter().map(GeneralName::type_name).collect();
        assert_eq!(
            names,
            vec![
                "otherName",
                "rfc822Name",
                "dnsName",
                "directoryName",
                "uniformResourceIdentifier",
                "iPAddress",
                "registeredID"
            ]
        );
        assert_eq!(GeneralName::new().type_name(), "undefined");
    }

    #[test]
    fn test_setters_replace_payload() {
        let mut name = GeneralName::new();
        name.set_dns_name("8.8.8.8");
        assert_eq!(name.dns_name(), Some("8.8.8.8"));
        name.set_other_name("2.16.76.1.3.3", "00000000000100");
        assert_eq!(name.get_type(), GeneralNameType::OtherName);
        assert_eq!(name.dns_name(), None);
        assert_eq!(name.other_name(), Some(("2.16.76.1.3.3", "00000000000100")));
        assert!(name.set_ip_address("not an address").is_err());
        assert_eq!(name.get_type(), GeneralNameType::OtherName);
    }

    #[test]
    fn test_xml_encoded() {
        let forms = all_forms();
        assert_eq!(
            forms[0].xml_encoded("\t"),
            "\t<otherName>\n\t\t2.16.76.1.3.3 : 00000000000100\n\t</otherName>\n"
        );
        assert_eq!(
            forms[3].xml_encoded(""),
            "<directoryName>\n\t<RDNSequence>\n\t\t<commonName>Example Name</commonName>\n\t</RDNSequence>\n</directoryName>\n"
        );
        assert_eq!(
            forms[5].xml_encoded("tab"),
            "tab<iPAddress>\ntab\t127.0.0.1\ntab</iPAddress>\n"
        );
        assert_eq!(
            forms[6].xml_encoded(""),
            "<registeredID>\n\tCN\n</registeredID>\n"
        );
        assert_eq!(GeneralName::new().xml_encoded(""), "<undefined>\n</undefined>\n");
    }

    #[test]
    fn test_x509_round_trip_preserves_xml() {
        for name in all_forms() {
            let native = name.to_x509().unwrap();
            let back = GeneralName::from_x509(&native).unwrap();
            assert_eq!(back.xml_encoded(""), name.xml_encoded(""));
            assert_eq!(back, name);
        }
    }

    #[test]
    fn test_unregistered_registered_id_keeps_dotted_form() {
        let mut first = GeneralName::new();
        first.set_registered_id(
            ObjectIdentifierFactory::get_object_identifier("1.3.6.1.4.1.55555.7").unwrap(),
        );
        let mut second = GeneralName::new();
        second.set_registered_id(
            ObjectIdentifierFactory::get_object_identifier("1.3.6.1.4.1.55555.8").unwrap(),
        );
        assert_eq!(
            first.xml_encoded(""),
            "<registeredID>\n\t1.3.6.1.4.1.55555.7\n</registeredID>\n"
        );
        assert_ne!(first.xml_encoded(""), second.xml_encoded(""));

        let back = GeneralName::from_x509(&first.to_x509().unwrap()).unwrap();
        assert_eq!(back, first);
        assert_eq!(
            back.registered_id().unwrap().oid().unwrap(),
            "1.3.6.1.4.1.55555.7"
        );
        assert_eq!(back.xml_encoded(""), first.xml_encoded(""));
    }

    #[test]
    fn test_undefined_has_no_native_form() {
        assert!(matches!(
            GeneralName::new().to_x509(),
            Err(CertificationError::UndefinedValue(_))
        ));
    }

    #[test]
    fn test_data_to_ip_address() {
        assert_eq!(GeneralName::data_to_ip_address(&[127, 0, 0, 1]).unwrap(), "127.0.0.1");
        let mut v6 = [0u8; 16];
        v6[15] = 1;
        assert_eq!(GeneralName::data_to_ip_address(&v6).unwrap(), "::1");
        assert!(GeneralName::data_to_ip_address(&[1, 2, 3]).is_err());
    }

    #[test]
    fn test_other_name_binary_value_is_hex() {
        let native = X509GeneralName::OtherName(X509OtherName {
            type_id: Asn1Oid::new_unwrap("1.3.6.1.4.1.311.20.2.3"),
            value: Any::new(Tag::BitString, vec![0x00, 0xff]).unwrap(),
        });
        let name = GeneralName::from_x509(&native).unwrap();
        assert_eq!(name.other_name(), Some(("1.3.6.1.4.1.311.20.2.3", "00ff")));
    }

    #[test]
    fn test_general_names_keep_order() {
        let names: GeneralNames = all_forms().into_iter().collect();
        assert_eq!(names.number_of_entries(), 7);

        let native = names.to_x509().unwrap();
        let back = GeneralNames::from_x509(&native).unwrap();
        assert_eq!(back, names);

        let mut expected = String::from("<generalNames>\n");
        for name in &names {
            expected.push_str(&name.xml_encoded("\t"));
        }
        expected.push_str("</generalNames>\n");
        assert_eq!(names.xml_encoded(""), expected);
        assert_eq!(
            GeneralNames::new().xml_encoded("\t"),
            "\t<generalNames>\n\t</generalNames>\n"
        );
    }
}
