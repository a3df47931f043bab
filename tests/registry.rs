use certmodel::cert::extensions::{ExtendedKeyUsage, Extension};
use certmodel::error::CertificationError;
use certmodel::oid::{FIRST_DYNAMIC_NID, ObjectIdentifierFactory, OidRegistry};
use pretty_assertions::assert_eq;

pub type Result<T> = std::result::Result<T, CertificationError>;

/// A registered identifier is visible to every later lookup and shows up by name in XML.
#[test]
fn register_globally() -> Result<()> {
    let cnpj = ObjectIdentifierFactory::create_object_identifier("2.16.76.1.3.3", "CNPJ")?;
    assert!(cnpj.nid().is_some_and(|nid| nid >= FIRST_DYNAMIC_NID));

    let by_name = ObjectIdentifierFactory::get_object_identifier("CNPJ")?;
    let by_oid = ObjectIdentifierFactory::get_object_identifier("2.16.76.1.3.3")?;
    assert_eq!(by_name, cnpj);
    assert_eq!(by_oid, cnpj);
    assert_eq!(
        ObjectIdentifierFactory::get_object_identifier_by_nid(cnpj.nid().unwrap_or_default())?,
        cnpj
    );

    let mut usage = ExtendedKeyUsage::new();
    usage.add_usage(cnpj);
    assert_eq!(usage.ext_value_xml("\t"), "\t<usage>CNPJ</usage>\n");

    assert!(matches!(
        ObjectIdentifierFactory::create_object_identifier("2.16.76.1.3.3", "CNPJ"),
        Err(CertificationError::AlreadyRegistered(_))
    ));
    Ok(())
}

#[test]
fn concurrent_registration() -> Result<()> {
    let registry = OidRegistry::new();
    let nids = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|index| {
                let registry = &registry;
                scope.spawn(move || {
                    registry
                        .create_object_identifier(
                            &format!("1.3.6.1.4.1.424242.{index}"),
                            &format!("attribute{index}"),
                        )
                        .map(|oid| oid.nid())
                })
            })
            .collect();
        handles
            .into_iter()
            .map(|handle| handle.join().unwrap())
            .collect::<Result<Vec<_>>>()
    })?;

    let mut nids: Vec<i32> = nids.into_iter().flatten().collect();
    nids.sort_unstable();
    let expected: Vec<i32> = (FIRST_DYNAMIC_NID..FIRST_DYNAMIC_NID + 8).collect();
    assert_eq!(nids, expected);

    for index in 0..8 {
        let oid = registry.get_object_identifier(&format!("attribute{index}"))?;
        assert_eq!(oid.oid()?, format!("1.3.6.1.4.1.424242.{index}"));
    }
    Ok(())
}
