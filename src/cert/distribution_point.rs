//! CRL distribution points and their names.

use bon::Builder;
use der::flagset::FlagSet;
use x509_cert::ext::pkix::crl::dp::{DistributionPoint as X509DistributionPoint, Reasons};
use x509_cert::ext::pkix::name::DistributionPointName as X509DistributionPointName;

use crate::error::{CertificationError, Result};
use crate::name::{GeneralNames, RdnSequence};
use crate::xml;

/// Discriminant of a [`DistributionPointName`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DistributionPointNameType {
    Undefined,
    FullName,
    RelativeName,
}

/// Where a CRL can be obtained: a full name, or a name relative to the CRL issuer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DistributionPointName {
    #[default]
    Undefined,
    FullName(GeneralNames),
    RelativeName(RdnSequence),
}

impl DistributionPointName {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_full_name(&mut self, names: GeneralNames) {
        *self = DistributionPointName::FullName(names);
    }

    pub fn set_name_relative_to_crl_issuer(&mut self, name: RdnSequence) {
        *self = DistributionPointName::RelativeName(name);
    }

    pub fn full_name(&self) -> Option<&GeneralNames> {
        match self {
            DistributionPointName::FullName(names) => Some(names),
            _ => None,
        }
    }

    pub fn name_relative_to_crl_issuer(&self) -> Option<&RdnSequence> {
        match self {
            DistributionPointName::RelativeName(name) => Some(name),
            _ => None,
        }
    }

    pub fn get_type(&self) -> DistributionPointNameType {
        match self {
            DistributionPointName::Undefined => DistributionPointNameType::Undefined,
            DistributionPointName::FullName(_) => DistributionPointNameType::FullName,
            DistributionPointName::RelativeName(_) => DistributionPointNameType::RelativeName,
        }
    }

    pub fn xml_encoded(&self, tab: &str) -> String {
        let inner = xml::indent(tab);
        let body = match self {
            DistributionPointName::Undefined => xml::line(&inner, "undefined"),
            DistributionPointName::FullName(names) => names.xml_encoded(&inner),
            DistributionPointName::RelativeName(name) => name.xml_encoded(&inner),
        };
        xml::wrap(tab, "distributionPointName", &body)
    }

    pub fn to_x509(&self) -> Result<X509DistributionPointName> {
        match self {
            DistributionPointName::Undefined => Err(CertificationError::UndefinedValue(
                "distribution point name".to_string(),
            )),
            DistributionPointName::FullName(names) => {
                Ok(X509DistributionPointName::FullName(names.to_x509()?))
            }
            DistributionPointName::RelativeName(name) => Ok(
                X509DistributionPointName::NameRelativeToCRLIssuer(name.to_x509_rdn()?),
            ),
        }
    }

    pub fn from_x509(name: &X509DistributionPointName) -> Result<Self> {
        Ok(match name {
            X509DistributionPointName::FullName(names) => {
                DistributionPointName::FullName(GeneralNames::from_x509(names)?)
            }
            X509DistributionPointName::NameRelativeToCRLIssuer(rdn) => {
                DistributionPointName::RelativeName(RdnSequence::from_x509_rdn(rdn)?)
            }
        })
    }
}

/// Revocation reasons a distribution point covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReasonFlag {
    Unused,
    KeyCompromise,
    CaCompromise,
    AffiliationChanged,
    Superseded,
    CessationOfOperation,
    CertificateHold,
    PrivilegeWithdrawn,
    AaCompromise,
}

impl ReasonFlag {
    pub const ALL: [ReasonFlag; 9] = [
        ReasonFlag::Unused,
        ReasonFlag::KeyCompromise,
        ReasonFlag::CaCompromise,
        ReasonFlag::AffiliationChanged,
        ReasonFlag::Superseded,
        ReasonFlag::CessationOfOperation,
        ReasonFlag::CertificateHold,
        ReasonFlag::PrivilegeWithdrawn,
        ReasonFlag::AaCompromise,
    ];

    /// The element name used in XML output.
    pub fn name(self) -> &'static str {
        match self {
            ReasonFlag::Unused => "unused",
            ReasonFlag::KeyCompromise => "keyCompromise",
            ReasonFlag::CaCompromise => "caCompromise",
            ReasonFlag::AffiliationChanged => "affiliationChanged",
            ReasonFlag::Superseded => "superseded",
            ReasonFlag::CessationOfOperation => "cessationOfOperation",
            ReasonFlag::CertificateHold => "certificateHold",
            ReasonFlag::PrivilegeWithdrawn => "privilegeWithdrawn",
            ReasonFlag::AaCompromise => "aACompromise",
        }
    }

    fn reason(self) -> Reasons {
        match self {
            ReasonFlag::Unused => Reasons::Unused,
            ReasonFlag::KeyCompromise => Reasons::KeyCompromise,
            ReasonFlag::CaCompromise => Reasons::CaCompromise,
            ReasonFlag::AffiliationChanged => Reasons::AffiliationChanged,
            ReasonFlag::Superseded => Reasons::Superseded,
            ReasonFlag::CessationOfOperation => Reasons::CessationOfOperation,
            ReasonFlag::CertificateHold => Reasons::CertificateHold,
            ReasonFlag::PrivilegeWithdrawn => Reasons::PrivilegeWithdrawn,
            ReasonFlag::AaCompromise => Reasons::AaCompromise,
        }
    }

    // The last two reasons were added after the XML layout was fixed.
    fn always_rendered(self) -> bool {
        !matches!(self, ReasonFlag::PrivilegeWithdrawn | ReasonFlag::AaCompromise)
    }
}

/// One entry of the CRL distribution points extension.
///
/// # Fields
/// * `name` - Where the CRL is published.
/// * `reasons` - Reasons covered by the CRL; empty means all reasons.
/// * `crl_issuer` - The CRL issuer, when it differs from the certificate issuer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Builder)]
pub struct DistributionPoint {
    #[builder(default)]
    name: DistributionPointName,
    #[builder(default)]
    reasons: FlagSet<Reasons>,
    #[builder(default)]
    crl_issuer: GeneralNames,
}

impl DistributionPoint {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_distribution_point_name(&mut self, name: DistributionPointName) {
        self.name = name;
    }

    pub fn distribution_point_name(&self) -> &DistributionPointName {
        &self.name
    }

    pub fn set_reason_flag(&mut self, flag: ReasonFlag, value: bool) {
        if value {
            self.reasons |= flag.reason();
        } else {
            self.reasons -= flag.reason();
        }
    }

    pub fn reason_flag(&self, flag: ReasonFlag) -> bool {
        self.reasons.contains(flag.reason())
    }

    pub fn set_crl_issuer(&mut self, issuer: GeneralNames) {
        self.crl_issuer = issuer;
    }

    pub fn crl_issuer(&self) -> &GeneralNames {
        &self.crl_issuer
    }

    pub fn xml_encoded(&self, tab: &str) -> String {
        let inner = xml::indent(tab);
        let mut body = String::new();
        if self.name.get_type() != DistributionPointNameType::Undefined {
            body.push_str(&self.name.xml_encoded(&inner));
        }

        let flag_tab = xml::indent(&inner);
        let flags: String = ReasonFlag::ALL
            .into_iter()
            .filter(|flag| flag.always_rendered() || self.reason_flag(*flag))
            .map(|flag| xml::element(&flag_tab, flag.name(), xml::flag(self.reason_flag(flag))))
            .collect();
        body.push_str(&xml::wrap(&inner, "reasonFlag", &flags));

        if !self.crl_issuer.is_empty() {
            body.push_str(&self.crl_issuer.xml_encoded(&inner));
        }
        xml::wrap(tab, "distributionPoint", &body)
    }

    pub fn to_x509(&self) -> Result<X509DistributionPoint> {
        let distribution_point = match self.name {
            DistributionPointName::Undefined => None,
            ref name => Some(name.to_x509()?),
        };
        let crl_issuer = if self.crl_issuer.is_empty() {
            None
        } else {
            Some(self.crl_issuer.to_x509()?)
        };
        Ok(X509DistributionPoint {
            distribution_point,
            reasons: (!self.reasons.is_empty()).then_some(self.reasons),
            crl_issuer,
        })
    }

    pub fn from_x509(point: &X509DistributionPoint) -> Result<Self> {
        let name = match &point.distribution_point {
            Some(name) => DistributionPointName::from_x509(name)?,
            None => DistributionPointName::Undefined,
        };
        let crl_issuer = match &point.crl_issuer {
            Some(names) => GeneralNames::from_x509(names)?,
            None => GeneralNames::new(),
        };
        Ok(Self {
            name,
            reasons: point.reasons.unwrap_or_default(),
            crl_issuer,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::name::{GeneralName, RdnEntryType};
    use pretty_assertions::assert_eq;

    const REASONS: [bool; 7] = [true, false, false, true, false, true, true];

    fn full_name() -> DistributionPointName {
        let mut other = GeneralName::new();
        other.set_other_name("2.16.76.1.3.3", "00000000000100");
        let mut uri = GeneralName::new();
        uri.set_uniform_resource_identifier("codigofulano.com");
        let mut name = DistributionPointName::new();
        name.set_full_name([other, uri].into_iter().collect());
        name
    }

    // Listed in DER SET order so a round trip keeps the sequence unchanged.
    fn relative_name() -> DistributionPointName {
        let mut rdn = RdnSequence::new();
        rdn.add_entry(RdnEntryType::SerialNumber, "10203040");
        rdn.add_entry(RdnEntryType::CommonName, "Codigos Fulano");
        let mut name = DistributionPointName::new();
        name.set_name_relative_to_crl_issuer(rdn);
        name
    }

    fn crl_issuer() -> GeneralNames {
        let mut other = GeneralName::new();
        other.set_other_name("2.16.76.1.3.3", "00000000000200");
        let mut uri = GeneralName::new();
        uri.set_uniform_resource_identifier("crlissuer.com");
        [other, uri].into_iter().collect()
    }

    fn point(name: DistributionPointName, invert: bool) -> DistributionPoint {
        let mut point = DistributionPoint::builder()
            .name(name)
            .crl_issuer(crl_issuer())
            .build();
        for (flag, value) in ReasonFlag::ALL.into_iter().zip(REASONS) {
            point.set_reason_flag(flag, value != invert);
        }
        point
    }

    #[test]
    fn test_name_accessors() {
        let full = full_name();
        assert_eq!(full.get_type(), DistributionPointNameType::FullName);
        assert_eq!(full.full_name().unwrap().number_of_entries(), 2);
        assert!(full.name_relative_to_crl_issuer().is_none());

        let relative = relative_name();
        let rdn = relative.name_relative_to_crl_issuer().unwrap();
        assert_eq!(rdn.entries_of(RdnEntryType::CommonName), vec!["Codigos Fulano"]);
        assert_eq!(rdn.entries_of(RdnEntryType::SerialNumber), vec!["10203040"]);

        assert_eq!(
            DistributionPointName::new().get_type(),
            DistributionPointNameType::Undefined
        );
    }

    #[test]
    fn test_name_xml() {
        assert_eq!(
            DistributionPointName::new().xml_encoded("\t"),
            "\t<distributionPointName>\n\t\tundefined\n\t</distributionPointName>\n"
        );
        let full = full_name();
        assert_eq!(
            full.xml_encoded(""),
            format!(
                "<distributionPointName>\n{}</distributionPointName>\n",
                full.full_name().unwrap().xml_encoded("\t")
            )
        );
    }

    #[test]
    fn test_reason_flags() {
        let point = point(full_name(), false);
        for (flag, value) in ReasonFlag::ALL.into_iter().zip(REASONS) {
            assert_eq!(point.reason_flag(flag), value, "{}", flag.name());
        }
        assert!(!point.reason_flag(ReasonFlag::AaCompromise));

        let empty = DistributionPoint::new();
        assert!(ReasonFlag::ALL.into_iter().all(|flag| !empty.reason_flag(flag)));
    }

    #[test]
    fn test_xml_encoded() {
        let point = point(full_name(), false);
        let mut expected = String::from("<distributionPoint>\n");
        expected.push_str(&full_name().xml_encoded("\t"));
        expected.push_str("\t<reasonFlag>\n");
        for (flag, value) in ReasonFlag::ALL.into_iter().zip(REASONS) {
            let bit = if value { 1 } else { 0 };
            expected.push_str(&format!("\t\t<{0}>{bit}</{0}>\n", flag.name()));
        }
        expected.push_str("\t</reasonFlag>\n");
        expected.push_str(&crl_issuer().xml_encoded("\t"));
        expected.push_str("</distributionPoint>\n");
        assert_eq!(point.xml_encoded(""), expected);
    }

    #[test]
    fn test_empty_xml() {
        let expected = "<distributionPoint>\n\
                        \t<reasonFlag>\n\
                        \t\t<unused>0</unused>\n\
                        \t\t<keyCompromise>0</keyCompromise>\n\
                        \t\t<caCompromise>0</caCompromise>\n\
                        \t\t<affiliationChanged>0</affiliationChanged>\n\
                        \t\t<superseded>0</superseded>\n\
                        \t\t<cessationOfOperation>0</cessationOfOperation>\n\
                        \t\t<certificateHold>0</certificateHold>\n\
                        \t</reasonFlag>\n\
                        </distributionPoint>\n";
        assert_eq!(DistributionPoint::new().xml_encoded(""), expected);
    }

    #[test]
    fn test_late_reasons_render_when_set() {
        let mut point = DistributionPoint::new();
        point.set_reason_flag(ReasonFlag::AaCompromise, true);
        let xml = point.xml_encoded("");
        assert!(xml.contains("\t\t<aACompromise>1</aACompromise>\n"));
        assert!(!xml.contains("privilegeWithdrawn"));
    }

    #[test]
    fn test_x509_round_trip() {
        for point in [
            point(full_name(), false),
            point(relative_name(), true),
            DistributionPoint::new(),
        ] {
            let native = point.to_x509().unwrap();
            let back = DistributionPoint::from_x509(&native).unwrap();
            assert_eq!(back.xml_encoded(""), point.xml_encoded(""));
        }
    }
}
