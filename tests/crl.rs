mod util;

use certmodel::cert::RevocationList;
use certmodel::cert::extensions::{
    AuthorityKeyIdentifier, CertificateExtension, CrlNumber, DeltaCrlIndicator, Extension,
};
use certmodel::error::CertificationError;
use certmodel::name::RdnEntryType;
use pretty_assertions::assert_eq;

pub type Result<T> = std::result::Result<T, CertificationError>;

#[test]
fn full_crl() -> Result<()> {
    let crl = util::full_crl();
    assert!(!crl.is_delta());
    assert_eq!(
        crl.issuer()?.entries_of(RdnEntryType::CommonName),
        vec!["Example CA"]
    );
    assert_eq!(crl.revoked_serial_numbers(), vec![vec![0x0B, 0xAD]]);

    let number = crl.extension::<CrlNumber>()?.unwrap();
    assert_eq!(number.number(), 42);
    assert!(crl.extension::<DeltaCrlIndicator>()?.is_none());

    let authority = crl.extension::<AuthorityKeyIdentifier>()?.unwrap();
    assert_eq!(authority.key_identifier(), Some(&util::CA_KEY_ID[..]));
    Ok(())
}

#[test]
fn delta_crl() -> Result<()> {
    let crl = util::delta_crl();
    assert!(crl.is_delta());
    assert!(crl.revoked_serial_numbers().is_empty());

    let delta = crl.extension::<DeltaCrlIndicator>()?.unwrap();
    assert!(delta.is_critical());
    assert_eq!(delta.base_crl_number(), 42);
    assert_eq!(crl.extension::<CrlNumber>()?.unwrap().number(), 44);

    assert_eq!(
        delta.xml_encoded(""),
        "<deltaCRLIndicator>\n\
         \t<extnID>deltaCRL</extnID>\n\
         \t<critical>yes</critical>\n\
         \t<extnValue>\n\
         \t\t<baseCRLNumber>42</baseCRLNumber>\n\
         \t</extnValue>\n\
         </deltaCRLIndicator>\n"
    );
    Ok(())
}

#[test]
fn crl_extensions_in_order() -> Result<()> {
    let crl = util::delta_crl();
    let extensions = crl.crl_extensions()?;
    assert_eq!(extensions.len(), 3);
    assert!(matches!(extensions[0], CertificateExtension::AuthorityKeyIdentifier(_)));
    assert!(matches!(extensions[1], CertificateExtension::DeltaCrlIndicator(_)));
    assert!(matches!(extensions[2], CertificateExtension::CrlNumber(_)));

    let records = crl.inner.tbs_cert_list.crl_extensions.clone().unwrap();
    for (record, extension) in records.iter().zip(&extensions) {
        assert_eq!(&extension.to_x509_extension()?, record);
    }

    let xml = crl.xml_encoded("")?;
    assert!(xml.contains("\t<cRLNumber>\n\t\t<extnID>crlNumber</extnID>\n"));
    assert!(xml.contains("\t\t\t<cRLNumber>44</cRLNumber>\n"));
    Ok(())
}

#[test]
fn pem_round_trip() -> Result<()> {
    let crl = util::full_crl();
    let pem = crl.to_pem()?;
    assert!(pem.starts_with("-----BEGIN X509 CRL-----"));
    assert_eq!(RevocationList::from_pem(&pem)?, crl);
    assert_eq!(RevocationList::from_der(&crl.to_der()?)?, crl);
    Ok(())
}

#[test]
fn certificate_is_not_a_crl() {
    assert!(matches!(
        RevocationList::from_pem(util::CA_PEM),
        Err(CertificationError::InvalidInput(_))
    ));
}
