//! Certificate policy substructures: policy information, qualifiers and user notices.

use bon::Builder;
use const_oid::db::rfc5280::{ID_QT_CPS, ID_QT_UNOTICE};
use der::Sequence;
use der::asn1::{Any, Ia5String, Utf8StringRef};
use log::warn;
use x509_cert::ext::pkix::certpolicy::{
    PolicyInformation as X509PolicyInformation, PolicyQualifierInfo as X509PolicyQualifierInfo,
};

use crate::error::{CertificationError, Result};
use crate::name::rdn::decode_directory_string;
use crate::oid::ObjectIdentifier;
use crate::xml;

/// ```text
/// NoticeReference ::= SEQUENCE {
///      organization     DisplayText,
///      noticeNumbers    SEQUENCE OF INTEGER }
/// ```
#[derive(Clone, Debug, Eq, PartialEq, Sequence)]
struct NoticeReferenceAsn1 {
    organization: Any,
    notice_numbers: Vec<i64>,
}

/// ```text
/// UserNotice ::= SEQUENCE {
///      noticeRef        NoticeReference OPTIONAL,
///      explicitText     DisplayText OPTIONAL }
/// ```
#[derive(Clone, Debug, Eq, PartialEq, Sequence)]
struct UserNoticeAsn1 {
    notice_ref: Option<NoticeReferenceAsn1>,
    explicit_text: Option<Any>,
}

fn display_text(text: &str) -> Result<Any> {
    Utf8StringRef::new(text)
        .and_then(|text| Any::encode_from(&text))
        .map_err(CertificationError::encoding)
}

static EMPTY_USER_NOTICE: UserNotice = UserNotice {
    organization: String::new(),
    notice_numbers: Vec::new(),
    explicit_text: String::new(),
};

/// A user notice policy qualifier.
///
/// # Fields
/// * `organization` - The organization of the notice reference.
/// * `notice_numbers` - The notice numbers of the notice reference.
/// * `explicit_text` - Text displayed to the relying party.
///
/// # Example
/// ```
/// use certmodel::cert::policy::UserNotice;
///
/// let notice = UserNotice::builder()
///     .organization("YoRHa")
///     .notice_numbers(vec![2])
///     .explicit_text("Glory to Mankind!")
///     .build();
/// assert_eq!(notice.notice_reference(), ("YoRHa", &[2][..]));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Builder)]
pub struct UserNotice {
    #[builder(into, default)]
    organization: String,
    #[builder(default)]
    notice_numbers: Vec<i64>,
    #[builder(into, default)]
    explicit_text: String,
}

impl UserNotice {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_notice_reference(&mut self, organization: impl Into<String>, notice_numbers: Vec<i64>) {
        self.organization = organization.into();
        self.notice_numbers = notice_numbers;
    }

    /// The (organization, notice numbers) pair; empty when no reference is set.
    pub fn notice_reference(&self) -> (&str, &[i64]) {
        (&self.organization, &self.notice_numbers)
    }

    pub fn set_explicit_text(&mut self, text: impl Into<String>) {
        self.explicit_text = text.into();
    }

    pub fn explicit_text(&self) -> &str {
        &self.explicit_text
    }

    pub fn has_notice_reference(&self) -> bool {
        !self.organization.is_empty() || !self.notice_numbers.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        !self.has_notice_reference() && self.explicit_text.is_empty()
    }

    pub fn xml_encoded(&self, tab: &str) -> String {
        let inner = xml::indent(tab);
        let mut body = String::new();
        if self.has_notice_reference() {
            let reference = xml::indent(&inner);
            let numbers = self
                .notice_numbers
                .iter()
                .map(i64::to_string)
                .collect::<Vec<_>>()
                .join(" ");
            body.push_str(&xml::open(&inner, "noticeRef"));
            body.push_str(&xml::element(&reference, "organization", &self.organization));
            body.push_str(&xml::element(&reference, "noticeNumbers", numbers));
            body.push_str(&xml::close(&inner, "noticeRef"));
        }
        if !self.explicit_text.is_empty() {
            body.push_str(&xml::element(&inner, "explicitText", &self.explicit_text));
        }
        xml::wrap(tab, "userNotice", &body)
    }

    /// Encodes the notice as a policy qualifier value.
    pub fn to_x509_qualifier(&self) -> Result<Any> {
        let notice_ref = if self.has_notice_reference() {
            Some(NoticeReferenceAsn1 {
                organization: display_text(&self.organization)?,
                notice_numbers: self.notice_numbers.clone(),
            })
        } else {
            None
        };
        let explicit_text = if self.explicit_text.is_empty() {
            None
        } else {
            Some(display_text(&self.explicit_text)?)
        };
        Any::encode_from(&UserNoticeAsn1 {
            notice_ref,
            explicit_text,
        })
        .map_err(CertificationError::encoding)
    }

    /// Decodes a policy qualifier value; an absent qualifier gives the empty notice.
    pub fn from_x509_qualifier(qualifier: Option<&Any>) -> Result<Self> {
        let Some(qualifier) = qualifier else {
            return Ok(Self::default());
        };
        let notice: UserNoticeAsn1 = qualifier.decode_as()?;
        let mut decoded = Self::default();
        if let Some(reference) = notice.notice_ref {
            decoded.organization = decode_directory_string(&reference.organization)?;
            decoded.notice_numbers = reference.notice_numbers;
        }
        if let Some(text) = notice.explicit_text {
            decoded.explicit_text = decode_directory_string(&text)?;
        }
        Ok(decoded)
    }
}

/// Which qualifier a [`PolicyQualifierInfo`] carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PolicyQualifierType {
    Undefined,
    CpsUri,
    UserNotice,
}

/// A policy qualifier: a CPS pointer or a user notice.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PolicyQualifierInfo {
    #[default]
    Undefined,
    CpsUri(String),
    UserNotice(UserNotice),
}

impl PolicyQualifierInfo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_cps_uri(&mut self, uri: impl Into<String>) {
        *self = PolicyQualifierInfo::CpsUri(uri.into());
    }

    pub fn set_user_notice(&mut self, notice: UserNotice) {
        *self = PolicyQualifierInfo::UserNotice(notice);
    }

    /// The CPS URI, empty for other qualifiers.
    pub fn cps_uri(&self) -> &str {
        match self {
            PolicyQualifierInfo::CpsUri(uri) => uri,
            _ => "",
        }
    }

    /// The user notice, empty for other qualifiers.
    pub fn user_notice(&self) -> &UserNotice {
        match self {
            PolicyQualifierInfo::UserNotice(notice) => notice,
            _ => &EMPTY_USER_NOTICE,
        }
    }

    pub fn get_type(&self) -> PolicyQualifierType {
        match self {
            PolicyQualifierInfo::Undefined => PolicyQualifierType::Undefined,
            PolicyQualifierInfo::CpsUri(_) => PolicyQualifierType::CpsUri,
            PolicyQualifierInfo::UserNotice(_) => PolicyQualifierType::UserNotice,
        }
    }

    /// `id-qt-cps`, `id-qt-unotice`, or the undefined identifier.
    pub fn object_identifier(&self) -> ObjectIdentifier {
        match self {
            PolicyQualifierInfo::Undefined => ObjectIdentifier::new(),
            PolicyQualifierInfo::CpsUri(_) => ObjectIdentifier::from_x509_oid(ID_QT_CPS),
            PolicyQualifierInfo::UserNotice(_) => ObjectIdentifier::from_x509_oid(ID_QT_UNOTICE),
        }
    }

    pub fn xml_encoded(&self, tab: &str) -> String {
        let inner = xml::indent(tab);
        let body = match self {
            PolicyQualifierInfo::Undefined => String::new(),
            PolicyQualifierInfo::CpsUri(uri) => {
                self.object_identifier().xml_encoded(&inner) + &xml::element(&inner, "cPSuri", uri)
            }
            PolicyQualifierInfo::UserNotice(notice) => {
                self.object_identifier().xml_encoded(&inner) + &notice.xml_encoded(&inner)
            }
        };
        xml::wrap(tab, "policyQualifierInfo", &body)
    }

    pub fn to_x509(&self) -> Result<X509PolicyQualifierInfo> {
        match self {
            PolicyQualifierInfo::Undefined => Err(CertificationError::UndefinedValue(
                "policy qualifier type".to_string(),
            )),
            PolicyQualifierInfo::CpsUri(uri) => {
                let uri = Ia5String::new(uri).map_err(|e| {
                    CertificationError::InvalidInput(format!("CPS URI {uri:?}: {e}"))
                })?;
                Ok(X509PolicyQualifierInfo {
                    policy_qualifier_id: ID_QT_CPS,
                    qualifier: Some(
                        Any::encode_from(&uri).map_err(CertificationError::encoding)?,
                    ),
                })
            }
            PolicyQualifierInfo::UserNotice(notice) => Ok(X509PolicyQualifierInfo {
                policy_qualifier_id: ID_QT_UNOTICE,
                qualifier: Some(notice.to_x509_qualifier()?),
            }),
        }
    }

    /// Converts from the native qualifier; an absent qualifier gives [`PolicyQualifierInfo::Undefined`].
    pub fn from_x509(info: Option<&X509PolicyQualifierInfo>) -> Result<Self> {
        let Some(info) = info else {
            return Ok(Self::Undefined);
        };
        match info.policy_qualifier_id {
            ID_QT_CPS => {
                let uri = match info.qualifier.as_ref() {
                    Some(value) => decode_directory_string(value)?,
                    None => String::new(),
                };
                Ok(PolicyQualifierInfo::CpsUri(uri))
            }
            ID_QT_UNOTICE => Ok(PolicyQualifierInfo::UserNotice(
                UserNotice::from_x509_qualifier(info.qualifier.as_ref())?,
            )),
            other => {
                warn!("unsupported policy qualifier {other}");
                Err(CertificationError::UnsupportedValue(format!(
                    "policy qualifier {other}"
                )))
            }
        }
    }
}

/// A policy identifier with its qualifiers.
///
/// # Fields
/// * `policy_identifier` - The policy, undefined until set.
/// * `qualifiers` - Qualifiers in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PolicyInformation {
    policy_identifier: ObjectIdentifier,
    qualifiers: Vec<PolicyQualifierInfo>,
}

impl PolicyInformation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_policy_identifier(&mut self, oid: ObjectIdentifier) {
        self.policy_identifier = oid;
    }

    pub fn policy_identifier(&self) -> &ObjectIdentifier {
        &self.policy_identifier
    }

    pub fn add_policy_qualifier_info(&mut self, qualifier: PolicyQualifierInfo) {
        self.qualifiers.push(qualifier);
    }

    pub fn policy_qualifiers_info(&self) -> &[PolicyQualifierInfo] {
        &self.qualifiers
    }

    pub fn xml_encoded(&self, tab: &str) -> String {
        let inner = xml::indent(tab);
        let mut body = self.policy_identifier.xml_encoded(&inner);
        for qualifier in &self.qualifiers {
            body.push_str(&qualifier.xml_encoded(&inner));
        }
        xml::wrap(tab, "policyInformation", &body)
    }

    pub fn to_x509(&self) -> Result<X509PolicyInformation> {
        let qualifiers = self
            .qualifiers
            .iter()
            .map(PolicyQualifierInfo::to_x509)
            .collect::<Result<Vec<_>>>()?;
        Ok(X509PolicyInformation {
            policy_identifier: self.policy_identifier.to_x509_oid()?,
            policy_qualifiers: (!qualifiers.is_empty()).then_some(qualifiers),
        })
    }

    pub fn from_x509(info: &X509PolicyInformation) -> Result<Self> {
        let qualifiers = info
            .policy_qualifiers
            .iter()
            .flatten()
            .map(|qualifier| PolicyQualifierInfo::from_x509(Some(qualifier)))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            policy_identifier: ObjectIdentifier::from_x509_oid(info.policy_identifier),
            qualifiers,
        })
    }
}
