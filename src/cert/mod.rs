pub mod access;
pub mod distribution_point;
pub mod extensions;
pub mod policy;

use der::{Decode, Encode};
use log::debug;
use x509_cert::crl::CertificateList;
use x509_cert::ext::Extension as X509Extension;

use crate::error::{CertificationError, Result};
use crate::name::RdnSequence;
use crate::pem_utils::{self, CERTIFICATE_LABEL, CRL_LABEL};
use crate::xml;
use extensions::{CertificateExtension, Extension, SubjectKeyIdentifier};

/// Represents a parsed X.509 certificate.
///
/// The wrapper keeps the native structure untouched and exposes the subject,
/// issuer and extensions through the crate's own model.
///
/// # Fields
/// * `inner` - The underlying `x509_cert::Certificate`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Certificate {
    pub inner: x509_cert::Certificate,
}

impl From<x509_cert::Certificate> for Certificate {
    fn from(inner: x509_cert::Certificate) -> Self {
        Self { inner }
    }
}

impl Certificate {
    /// Parses a DER encoded certificate.
    pub fn from_der(der: &[u8]) -> Result<Self> {
        Ok(Self {
            inner: x509_cert::Certificate::from_der(der)?,
        })
    }

    /// Parses a PEM encoded certificate.
    ///
    /// # Arguments
    /// * `pem` - Text holding a single `CERTIFICATE` block.
    pub fn from_pem(pem: &str) -> Result<Self> {
        Self::from_der(&pem_utils::pem_to_der(pem, CERTIFICATE_LABEL)?)
    }

    /// Serializes the certificate to DER format.
    ///
    /// # Returns
    /// A `Result` containing the DER-encoded certificate as a vector of bytes, or an error.
    pub fn to_der(&self) -> Result<Vec<u8>> {
        self.inner
            .to_der()
            .map_err(|e| CertificationError::EncodingError(e.to_string()))
    }

    /// Serializes the certificate to PEM format.
    pub fn to_pem(&self) -> Result<String> {
        Ok(pem_utils::der_to_pem(&self.to_der()?, CERTIFICATE_LABEL))
    }

    pub fn subject(&self) -> Result<RdnSequence> {
        RdnSequence::from_x509_name(&self.inner.tbs_certificate.subject)
    }

    pub fn issuer(&self) -> Result<RdnSequence> {
        RdnSequence::from_x509_name(&self.inner.tbs_certificate.issuer)
    }

    /// The serial number content octets.
    pub fn serial_number(&self) -> &[u8] {
        self.inner.tbs_certificate.serial_number.as_bytes()
    }

    /// Decodes every extension of the certificate, in certificate order.
    pub fn extensions(&self) -> Result<Vec<CertificateExtension>> {
        decode_all(self.inner.tbs_certificate.extensions.as_deref())
    }

    /// Looks up a single typed extension.
    ///
    /// # Returns
    /// `Ok(None)` when the certificate does not carry the extension.
    pub fn extension<E: Extension>(&self) -> Result<Option<E>> {
        find(self.inner.tbs_certificate.extensions.as_deref())
    }

    /// Computes the subject key identifier from the certificate's public key.
    pub fn subject_key_identifier_from_key(&self) -> SubjectKeyIdentifier {
        SubjectKeyIdentifier::from_public_key(&self.inner.tbs_certificate.subject_public_key_info)
    }

    /// Renders every extension inside an `<extensions>` element.
    pub fn xml_encoded(&self, tab: &str) -> Result<String> {
        Ok(render_all(tab, &self.extensions()?))
    }
}

/// Represents a parsed certificate revocation list.
///
/// # Fields
/// * `inner` - The underlying `x509_cert::crl::CertificateList`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevocationList {
    pub inner: CertificateList,
}

impl From<CertificateList> for RevocationList {
    fn from(inner: CertificateList) -> Self {
        Self { inner }
    }
}

impl RevocationList {
    pub fn from_der(der: &[u8]) -> Result<Self> {
        Ok(Self {
            inner: CertificateList::from_der(der)?,
        })
    }

    /// Parses a PEM encoded `X509 CRL` block.
    pub fn from_pem(pem: &str) -> Result<Self> {
        Self::from_der(&pem_utils::pem_to_der(pem, CRL_LABEL)?)
    }

    pub fn to_der(&self) -> Result<Vec<u8>> {
        self.inner
            .to_der()
            .map_err(|e| CertificationError::EncodingError(e.to_string()))
    }

    pub fn to_pem(&self) -> Result<String> {
        Ok(pem_utils::der_to_pem(&self.to_der()?, CRL_LABEL))
    }

    pub fn issuer(&self) -> Result<RdnSequence> {
        RdnSequence::from_x509_name(&self.inner.tbs_cert_list.issuer)
    }

    /// Serial numbers of the revoked certificates, in list order.
    pub fn revoked_serial_numbers(&self) -> Vec<Vec<u8>> {
        self.inner
            .tbs_cert_list
            .revoked_certificates
            .iter()
            .flatten()
            .map(|revoked| revoked.serial_number.as_bytes().to_vec())
            .collect()
    }

    /// Decodes the list-level extensions.
    pub fn crl_extensions(&self) -> Result<Vec<CertificateExtension>> {
        decode_all(self.inner.tbs_cert_list.crl_extensions.as_deref())
    }

    pub fn extension<E: Extension>(&self) -> Result<Option<E>> {
        find(self.inner.tbs_cert_list.crl_extensions.as_deref())
    }

    /// A CRL carrying a delta CRL indicator is a delta CRL.
    pub fn is_delta(&self) -> bool {
        self.inner
            .tbs_cert_list
            .crl_extensions
            .iter()
            .flatten()
            .any(|ext| ext.extn_id == extensions::DeltaCrlIndicator::OID)
    }

    pub fn xml_encoded(&self, tab: &str) -> Result<String> {
        Ok(render_all(tab, &self.crl_extensions()?))
    }
}

fn decode_all(records: Option<&[X509Extension]>) -> Result<Vec<CertificateExtension>> {
    records
        .unwrap_or_default()
        .iter()
        .map(CertificateExtension::from_x509_extension)
        .collect()
}

fn find<E: Extension>(records: Option<&[X509Extension]>) -> Result<Option<E>> {
    match records
        .unwrap_or_default()
        .iter()
        .find(|record| record.extn_id == E::OID)
    {
        Some(record) => E::from_x509_extension(record).map(Some),
        None => {
            debug!("no {} extension present", E::NAME);
            Ok(None)
        }
    }
}

fn render_all(tab: &str, extensions: &[CertificateExtension]) -> String {
    let inner = xml::indent(tab);
    let body: String = extensions
        .iter()
        .map(|extension| extension.xml_encoded(&inner))
        .collect();
    xml::wrap(tab, "extensions", &body)
}
