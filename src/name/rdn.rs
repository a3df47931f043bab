use const_oid::ObjectIdentifier as Asn1Oid;
use const_oid::db::{rfc3280, rfc4519};
use der::asn1::{Any, BmpString, Ia5StringRef, PrintableStringRef, SetOfVec, Utf8StringRef};
use der::{Tag, Tagged};
use log::warn;
use x509_cert::attr::AttributeTypeAndValue;
use x509_cert::name::{Name, RelativeDistinguishedName};

use crate::error::{CertificationError, Result};
use crate::oid::ObjectIdentifier;
use crate::xml;

/// Attribute types a distinguished name entry can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RdnEntryType {
    Country,
    StateOrProvince,
    Locality,
    Organization,
    OrganizationUnit,
    CommonName,
    Email,
    DnQualifier,
    SerialNumber,
    Title,
    Surname,
    GivenName,
    Initials,
    Pseudonym,
    GenerationQualifier,
    DomainComponent,
}

impl RdnEntryType {
    /// Every entry type, in declaration order.
    pub const ALL: [RdnEntryType; 16] = [
        RdnEntryType::Country,
        RdnEntryType::StateOrProvince,
        RdnEntryType::Locality,
        RdnEntryType::Organization,
        RdnEntryType::OrganizationUnit,
        RdnEntryType::CommonName,
        RdnEntryType::Email,
        RdnEntryType::DnQualifier,
        RdnEntryType::SerialNumber,
        RdnEntryType::Title,
        RdnEntryType::Surname,
        RdnEntryType::GivenName,
        RdnEntryType::Initials,
        RdnEntryType::Pseudonym,
        RdnEntryType::GenerationQualifier,
        RdnEntryType::DomainComponent,
    ];

    /// The attribute type identifier.
    pub fn x509_oid(self) -> Asn1Oid {
        match self {
            RdnEntryType::Country => rfc4519::C,
            RdnEntryType::StateOrProvince => rfc4519::ST,
            RdnEntryType::Locality => rfc4519::L,
            RdnEntryType::Organization => rfc4519::O,
            RdnEntryType::OrganizationUnit => rfc4519::OU,
            RdnEntryType::CommonName => rfc4519::CN,
            RdnEntryType::Email => rfc3280::EMAIL_ADDRESS,
            RdnEntryType::DnQualifier => rfc4519::DN_QUALIFIER,
            RdnEntryType::SerialNumber => rfc4519::SERIAL_NUMBER,
            RdnEntryType::Title => rfc4519::TITLE,
            RdnEntryType::Surname => rfc4519::SN,
            RdnEntryType::GivenName => rfc4519::GIVEN_NAME,
            RdnEntryType::Initials => rfc4519::INITIALS,
            RdnEntryType::Pseudonym => rfc3280::PSEUDONYM,
            RdnEntryType::GenerationQualifier => rfc4519::GENERATION_QUALIFIER,
            RdnEntryType::DomainComponent => rfc4519::DC,
        }
    }

    /// Maps an attribute type identifier back to an entry type.
    pub fn from_x509_oid(oid: &Asn1Oid) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.x509_oid() == *oid)
    }

    /// The attribute type, resolved against the registry.
    pub fn object_identifier(self) -> ObjectIdentifier {
        ObjectIdentifier::from_x509_oid(self.x509_oid())
    }

    /// The registry short name (`CN`, `SN`, `emailAddress`, ...).
    pub fn short_name(self) -> &'static str {
        match self {
            RdnEntryType::Country => "C",
            RdnEntryType::StateOrProvince => "ST",
            RdnEntryType::Locality => "L",
            RdnEntryType::Organization => "O",
            RdnEntryType::OrganizationUnit => "OU",
            RdnEntryType::CommonName => "CN",
            RdnEntryType::Email => "emailAddress",
            RdnEntryType::DnQualifier => "dnQualifier",
            RdnEntryType::SerialNumber => "serialNumber",
            RdnEntryType::Title => "title",
            RdnEntryType::Surname => "SN",
            RdnEntryType::GivenName => "GN",
            RdnEntryType::Initials => "initials",
            RdnEntryType::Pseudonym => "pseudonym",
            RdnEntryType::GenerationQualifier => "generationQualifier",
            RdnEntryType::DomainComponent => "DC",
        }
    }

    /// The element name used in XML output.
    pub fn xml_name(self) -> &'static str {
        match self {
            RdnEntryType::Country => "countryName",
            RdnEntryType::StateOrProvince => "stateOrProvinceName",
            RdnEntryType::Locality => "localityName",
            RdnEntryType::Organization => "organizationName",
            RdnEntryType::OrganizationUnit => "organizationalUnitName",
            RdnEntryType::CommonName => "commonName",
            RdnEntryType::Email => "e-mail",
            RdnEntryType::DnQualifier => "dnQualifier",
            RdnEntryType::SerialNumber => "serialNumber",
            RdnEntryType::Title => "title",
            RdnEntryType::Surname => "surname",
            RdnEntryType::GivenName => "givenName",
            RdnEntryType::Initials => "initials",
            RdnEntryType::Pseudonym => "pseudonym",
            RdnEntryType::GenerationQualifier => "generationQualifier",
            RdnEntryType::DomainComponent => "domainComponent",
        }
    }

    // RFC 5280 appendix A string choices
    fn value_tag(self) -> Tag {
        match self {
            RdnEntryType::Country | RdnEntryType::DnQualifier | RdnEntryType::SerialNumber => {
                Tag::PrintableString
            }
            RdnEntryType::Email | RdnEntryType::DomainComponent => Tag::Ia5String,
            _ => Tag::Utf8String,
        }
    }
}

/// An ordered list of typed distinguished name entries.
///
/// The same type may appear any number of times; insertion order is kept in
/// lookups, XML output and native conversion.
///
/// # Example
/// ```
/// use certmodel::name::{RdnEntryType, RdnSequence};
///
/// let mut rdn = RdnSequence::new();
/// rdn.add_entry(RdnEntryType::CommonName, "Fulano da Silva");
/// rdn.add_entry(RdnEntryType::CommonName, "Fulana de Souza");
/// assert_eq!(
///     rdn.entries_of(RdnEntryType::CommonName),
///     vec!["Fulano da Silva", "Fulana de Souza"]
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RdnSequence {
    entries: Vec<(RdnEntryType, String)>,
}

impl RdnSequence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one entry.
    pub fn add_entry(&mut self, entry_type: RdnEntryType, value: impl Into<String>) {
        self.entries.push((entry_type, value.into()));
    }

    /// Appends one entry per value, keeping their relative order.
    pub fn add_entries<I, S>(&mut self, entry_type: RdnEntryType, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.entries
            .extend(values.into_iter().map(|value| (entry_type, value.into())));
    }

    /// All entries as (attribute type, value) pairs, in insertion order.
    pub fn entries(&self) -> Vec<(ObjectIdentifier, String)> {
        self.entries
            .iter()
            .map(|(entry_type, value)| (entry_type.object_identifier(), value.clone()))
            .collect()
    }

    /// The values of every entry of `entry_type`, in insertion order.
    pub fn entries_of(&self, entry_type: RdnEntryType) -> Vec<String> {
        self.entries
            .iter()
            .filter(|(t, _)| *t == entry_type)
            .map(|(_, value)| value.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn xml_encoded(&self, tab: &str) -> String {
        let inner = xml::indent(tab);
        let body: String = self
            .entries
            .iter()
            .map(|(entry_type, value)| xml::element(&inner, entry_type.xml_name(), value))
            .collect();
        xml::wrap(tab, "RDNSequence", &body)
    }

    /// Converts to a native name, one single-valued RDN per entry.
    pub fn to_x509_name(&self) -> Result<Name> {
        let rdns = self
            .entries
            .iter()
            .map(|(entry_type, value)| {
                let attribute = encode_attribute(*entry_type, value)?;
                Ok(RelativeDistinguishedName(
                    SetOfVec::try_from(vec![attribute]).map_err(CertificationError::encoding)?,
                ))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(x509_cert::name::RdnSequence(rdns))
    }

    /// Reads every supported attribute of a native name, RDN by RDN.
    pub fn from_x509_name(name: &Name) -> Result<Self> {
        let mut sequence = Self::new();
        for rdn in name.0.iter() {
            sequence.append_x509_rdn(rdn)?;
        }
        Ok(sequence)
    }

    /// Converts to a single multi-valued RDN.
    ///
    /// A SET OF is sorted on encoding, so entries may come back in DER order.
    pub fn to_x509_rdn(&self) -> Result<RelativeDistinguishedName> {
        let attributes = self
            .entries
            .iter()
            .map(|(entry_type, value)| encode_attribute(*entry_type, value))
            .collect::<Result<Vec<_>>>()?;
        Ok(RelativeDistinguishedName(
            SetOfVec::try_from(attributes).map_err(CertificationError::encoding)?,
        ))
    }

    pub fn from_x509_rdn(rdn: &RelativeDistinguishedName) -> Result<Self> {
        let mut sequence = Self::new();
        sequence.append_x509_rdn(rdn)?;
        Ok(sequence)
    }

    fn append_x509_rdn(&mut self, rdn: &RelativeDistinguishedName) -> Result<()> {
        for attribute in rdn.0.iter() {
            match RdnEntryType::from_x509_oid(&attribute.oid) {
                Some(entry_type) => {
                    let value = decode_directory_string(&attribute.value)?;
                    self.entries.push((entry_type, value));
                }
                None => warn!("skipping unsupported name attribute {}", attribute.oid),
            }
        }
        Ok(())
    }
}

fn encode_attribute(entry_type: RdnEntryType, value: &str) -> Result<AttributeTypeAndValue> {
    let invalid = |e: der::Error| {
        CertificationError::InvalidInput(format!("{} value {value:?}: {e}", entry_type.short_name()))
    };
    let value = match entry_type.value_tag() {
        Tag::PrintableString => Any::encode_from(&PrintableStringRef::new(value).map_err(invalid)?),
        Tag::Ia5String => Any::encode_from(&Ia5StringRef::new(value).map_err(invalid)?),
        _ => Any::encode_from(&Utf8StringRef::new(value).map_err(invalid)?),
    }
    .map_err(CertificationError::encoding)?;
    Ok(AttributeTypeAndValue {
        oid: entry_type.x509_oid(),
        value,
    })
}

pub(crate) fn decode_directory_string(value: &Any) -> Result<String> {
    match value.tag() {
        Tag::Utf8String
        | Tag::PrintableString
        | Tag::Ia5String
        | Tag::VisibleString
        | Tag::TeletexString => String::from_utf8(value.value().to_vec())
            .map_err(|e| CertificationError::DecodingError(e.to_string())),
        Tag::BmpString => Ok(value.decode_as::<BmpString>()?.to_string()),
        tag => Err(CertificationError::UnsupportedValue(format!(
            "text value tagged {tag}"
        ))),
    }
}
