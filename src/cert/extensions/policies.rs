use const_oid::AssociatedOid;
use der::{Decode, oid::ObjectIdentifier as Asn1Oid};
use x509_cert::ext::pkix::CertificatePolicies as X509CertificatePolicies;

use super::{Extension, ExtensionType, encode_value};
use crate::cert::policy::PolicyInformation;
use crate::error::Result;

/// Represents the Certificate Policies extension.
///
/// An extension without policies renders an empty value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CertificatePolicies {
    critical: bool,
    policies: Vec<PolicyInformation>,
}

impl CertificatePolicies {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_policy_information(&mut self, policy: PolicyInformation) {
        self.policies.push(policy);
    }

    pub fn policy_informations(&self) -> &[PolicyInformation] {
        &self.policies
    }
}

impl Extension for CertificatePolicies {
    const OID: Asn1Oid = X509CertificatePolicies::OID;
    const NAME: &'static str = "certificatePolicies";
    const TYPE: ExtensionType = ExtensionType::CertificatePolicies;

    fn is_critical(&self) -> bool {
        self.critical
    }

    fn set_critical(&mut self, critical: bool) {
        self.critical = critical;
    }

    fn to_x509_extension_value(&self) -> Result<Vec<u8>> {
        let policies = self
            .policies
            .iter()
            .map(PolicyInformation::to_x509)
            .collect::<Result<Vec<_>>>()?;
        encode_value(&X509CertificatePolicies(policies))
    }

    fn from_x509_extension_value(value: &[u8]) -> Result<Self> {
        let policies = X509CertificatePolicies::from_der(value)?;
        Ok(Self {
            critical: false,
            policies: policies
                .0
                .iter()
                .map(PolicyInformation::from_x509)
                .collect::<Result<_>>()?,
        })
    }

    fn ext_value_xml(&self, tab: &str) -> String {
        self.policies
            .iter()
            .map(|policy| policy.xml_encoded(tab))
            .collect()
    }
}
