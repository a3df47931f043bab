//! Access descriptions used by the information access extensions.

use x509_cert::ext::pkix::AccessDescription as X509AccessDescription;

use crate::error::Result;
use crate::name::GeneralName;
use crate::oid::ObjectIdentifier;
use crate::xml;

/// How and where to reach information about the issuer or subject.
///
/// # Fields
/// * `access_method` - The access method, e.g. `caIssuers` or `OCSP`.
/// * `access_location` - Where the information can be found.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccessDescription {
    access_method: ObjectIdentifier,
    access_location: GeneralName,
}

impl AccessDescription {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_access_method(&mut self, method: ObjectIdentifier) {
        self.access_method = method;
    }

    pub fn access_method(&self) -> &ObjectIdentifier {
        &self.access_method
    }

    pub fn set_access_location(&mut self, location: GeneralName) {
        self.access_location = location;
    }

    pub fn access_location(&self) -> &GeneralName {
        &self.access_location
    }

    pub fn xml_encoded(&self, tab: &str) -> String {
        let inner = xml::indent(tab);
        let mut body = self.access_method.xml_encoded(&inner);
        body.push_str(&self.access_location.xml_encoded(&inner));
        xml::wrap(tab, "accessDescription", &body)
    }

    pub fn to_x509(&self) -> Result<X509AccessDescription> {
        Ok(X509AccessDescription {
            access_method: self.access_method.to_x509_oid()?,
            access_location: self.access_location.to_x509()?,
        })
    }

    pub fn from_x509(description: &X509AccessDescription) -> Result<Self> {
        Ok(Self {
            access_method: ObjectIdentifier::from_x509_oid(description.access_method),
            access_location: GeneralName::from_x509(&description.access_location)?,
        })
    }
}
