use const_oid::AssociatedOid;
use der::{Decode, oid::ObjectIdentifier as Asn1Oid};
use x509_cert::ext::pkix::AuthorityInfoAccessSyntax;

use super::{Extension, ExtensionType, encode_value};
use crate::cert::access::AccessDescription;
use crate::error::Result;
use crate::xml;

/// Represents the Authority Information Access extension.
///
/// # Fields
/// * `descriptions` - Access descriptions in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthorityInformationAccess {
    critical: bool,
    descriptions: Vec<AccessDescription>,
}

impl AuthorityInformationAccess {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_access_description(&mut self, description: AccessDescription) {
        self.descriptions.push(description);
    }

    pub fn access_descriptions(&self) -> &[AccessDescription] {
        &self.descriptions
    }
}

impl Extension for AuthorityInformationAccess {
    const OID: Asn1Oid = AuthorityInfoAccessSyntax::OID;
    const NAME: &'static str = "authorityInformationAccess";
    const TYPE: ExtensionType = ExtensionType::AuthorityInformationAccess;

    fn is_critical(&self) -> bool {
        self.critical
    }

    fn set_critical(&mut self, critical: bool) {
        self.critical = critical;
    }

    fn to_x509_extension_value(&self) -> Result<Vec<u8>> {
        let descriptions = self
            .descriptions
            .iter()
            .map(AccessDescription::to_x509)
            .collect::<Result<Vec<_>>>()?;
        encode_value(&AuthorityInfoAccessSyntax(descriptions))
    }

    fn from_x509_extension_value(value: &[u8]) -> Result<Self> {
        let aia = AuthorityInfoAccessSyntax::from_der(value)?;
        Ok(Self {
            critical: false,
            descriptions: aia
                .0
                .iter()
                .map(AccessDescription::from_x509)
                .collect::<Result<_>>()?,
        })
    }

    fn ext_value_xml(&self, tab: &str) -> String {
        let inner = xml::indent(tab);
        let body: String = self
            .descriptions
            .iter()
            .map(|description| description.xml_encoded(&inner))
            .collect();
        xml::wrap(tab, "accessDescriptions", &body)
    }
}
